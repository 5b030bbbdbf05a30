//! Lenient serde helpers
//!
//! The gate accepts numbers and booleans either as JSON natives or as their
//! string spelling. DTO fields use these with `#[serde(deserialize_with)]` so
//! that anything the gate let through also deserializes.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Integer {
    Native(i64),
    Text(String),
}

impl Integer {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Self::Native(n) => Ok(n),
            Self::Text(s) => s
                .parse()
                .map_err(|_| E::custom(format!("invalid integer: {s:?}"))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Boolean {
    Native(bool),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Number(serde_json::Number),
    Text(String),
}

pub fn optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Integer>::deserialize(deserializer)?
        .map(Integer::into_i64)
        .transpose()
}

pub fn optional_integer_list<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Integer>>::deserialize(deserializer)?
        .map(|items| items.into_iter().map(Integer::into_i64).collect())
        .transpose()
}

pub fn optional_boolean<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Boolean>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Boolean::Native(b)) => Ok(Some(b)),
        Some(Boolean::Text(s)) => match s.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("invalid boolean: {s:?}"))),
        },
    }
}

/// Decimal kept as its literal text so no precision is lost
pub fn decimal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Decimal::deserialize(deserializer)? {
        Decimal::Number(n) => n.to_string(),
        Decimal::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "optional_integer")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "optional_integer")]
        limit: Option<i64>,
        #[serde(default, deserialize_with = "optional_integer_list")]
        reminders: Option<Vec<i64>>,
        #[serde(default, deserialize_with = "optional_boolean")]
        all_day: Option<bool>,
        #[serde(deserialize_with = "decimal_text")]
        amount: String,
    }

    #[test]
    fn test_accepts_strings_and_natives() {
        let s: Sample = serde_json::from_str(
            r#"{"count":"3","limit":10,"reminders":[15,"60"],"all_day":"true","amount":12.5}"#,
        )
        .unwrap();
        assert_eq!(s.count, Some(3));
        assert_eq!(s.limit, Some(10));
        assert_eq!(s.reminders, Some(vec![15, 60]));
        assert_eq!(s.all_day, Some(true));
        assert_eq!(s.amount, "12.5");
    }

    #[test]
    fn test_missing_and_null_optionals() {
        let s: Sample =
            serde_json::from_str(r#"{"count":1,"limit":null,"amount":"0.10"}"#).unwrap();
        assert_eq!(s.limit, None);
        assert_eq!(s.reminders, None);
        assert_eq!(s.all_day, None);
        assert_eq!(s.amount, "0.10");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Sample>(r#"{"count":"x","amount":"1"}"#).is_err());
        assert!(
            serde_json::from_str::<Sample>(r#"{"count":1,"all_day":"yes","amount":"1"}"#).is_err()
        );
    }
}
