// Deserialisation helpers for the loosely typed JSON the task API returns.
use serde::{
    de::{self, value::StringDeserializer, DeserializeOwned},
    Deserialize, Deserializer,
};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(i64),
    Text(String),
}

/// Ids arrive as JSON numbers from some endpoints and numeric strings from others.
pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

/// Like [`id`], but null, missing and empty strings become `None`.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Num(n)) => Ok(Some(n)),
        Some(RawId::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawId::Text(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

pub fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blank strings are treated the same as absent values.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

/// Enum fields that may arrive as null or as a non-string. Anything that is
/// not a string naming a variant becomes `T::default()`.
pub fn lenient_enum<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => {
            T::deserialize(StringDeserializer::<de::value::Error>::new(s)).unwrap_or_default()
        }
        _ => T::default(),
    })
}
