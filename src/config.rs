use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,  // form posts only, in bytes
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub template_dir: String,
    pub page_size: usize,
    pub assignment_redirect_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(base_url: &str) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                max_body_size: 65536,
            },
            api: ApiConfig { base_url: base_url.to_string() },
            session: SessionConfig {
                cookie_name: "taskdesk_session".into(),
                secure: false,
            },
            ui: UiConfig {
                template_dir: "templates".into(),
                page_size: 10,
                assignment_redirect_secs: 2,
            },
        }
    }
}
