use serde::Deserialize;
use super::de;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Client {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub name: String,
    // GSTIN or internal code; uniqueness is enforced by the API
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub code: String,
}
