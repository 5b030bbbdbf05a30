//! Field Rules
//!
//! A [`Rule`] is one predicate applied to one field. Rules are plain data so
//! that route schemas can be declared as ordered lists and changed without
//! touching the gate's control flow.
//!
//! Query and path values always arrive as strings, body values as JSON, so
//! type rules accept either the native JSON type or its string spelling.

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value;
use url::Url;

/// Rule failure message
pub type RuleMessage = Cow<'static, str>;

/// Predicate used by [`Rule::Custom`]
#[derive(Clone, Copy)]
pub struct Predicate(pub fn(&Value) -> bool);

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A single declarative constraint on a field
#[derive(Debug, Clone)]
pub enum Rule {
    /// Field must be present and not `null`
    Required,
    /// String with at least one non-whitespace character
    NotBlank,
    /// String length in characters, inclusive bounds
    Length { min: usize, max: usize },
    /// Integer (JSON integer or decimal string) within optional bounds
    Integer { min: Option<i64>, max: Option<i64> },
    /// Plain decimal without exponent, at most `max_scale` fraction digits
    Decimal { max_scale: u32, positive: bool },
    /// `true` / `false`
    Boolean,
    /// Calendar date `YYYY-MM-DD`
    Date,
    /// Wall-clock time `HH:MM` (24h)
    Time,
    /// One of an enumerated set of strings
    OneOf(&'static [&'static str]),
    /// Absolute http(s) URL
    Url,
    /// JSON array with a bounded number of items
    List { max_items: usize },
    /// Every item of a JSON array satisfies the inner rule
    Each(Box<Rule>),
    /// Resource-specific predicate
    Custom {
        code: &'static str,
        message: &'static str,
        check: Predicate,
    },
}

impl Rule {
    pub const fn length(min: usize, max: usize) -> Self {
        Self::Length { min, max }
    }

    pub const fn max_length(max: usize) -> Self {
        Self::Length { min: 0, max }
    }

    pub const fn integer_range(min: i64, max: i64) -> Self {
        Self::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn min_integer(min: i64) -> Self {
        Self::Integer {
            min: Some(min),
            max: None,
        }
    }

    pub const fn positive_decimal(max_scale: u32) -> Self {
        Self::Decimal {
            max_scale,
            positive: true,
        }
    }

    pub fn each(rule: Rule) -> Self {
        Self::Each(Box::new(rule))
    }

    pub const fn custom(
        code: &'static str,
        message: &'static str,
        check: fn(&Value) -> bool,
    ) -> Self {
        Self::Custom {
            code,
            message,
            check: Predicate(check),
        }
    }

    /// Machine-readable rule code reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::NotBlank => "not_blank",
            Self::Length { .. } => "length",
            Self::Integer { .. } => "integer",
            Self::Decimal { .. } => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Time => "time",
            Self::OneOf(_) => "one_of",
            Self::Url => "url",
            Self::List { .. } => "list",
            Self::Each(inner) => inner.code(),
            Self::Custom { code, .. } => *code,
        }
    }

    /// Evaluate against a present, non-null value
    ///
    /// `Required` always passes here; absence is handled by the schema.
    pub fn evaluate(&self, value: &Value) -> Result<(), RuleMessage> {
        match self {
            Self::Required => Ok(()),
            Self::NotBlank => {
                let text = text(value)?;
                if text.trim().is_empty() {
                    Err("must not be blank".into())
                } else {
                    Ok(())
                }
            }
            Self::Length { min, max } => {
                let length = text(value)?.chars().count();
                if length < *min || length > *max {
                    Err(if *min == 0 {
                        format!("must be at most {max} characters").into()
                    } else {
                        format!("must be between {min} and {max} characters").into()
                    })
                } else {
                    Ok(())
                }
            }
            Self::Integer { min, max } => {
                let number = integer(value)?;
                if min.is_some_and(|min| number < min) || max.is_some_and(|max| number > max) {
                    Err(match (min, max) {
                        (Some(min), Some(max)) => format!("must be between {min} and {max}").into(),
                        (Some(min), None) => format!("must be at least {min}").into(),
                        (None, Some(max)) => format!("must be at most {max}").into(),
                        (None, None) => "is out of range".into(),
                    })
                } else {
                    Ok(())
                }
            }
            Self::Decimal {
                max_scale,
                positive,
            } => {
                let literal = decimal_literal(value)?;
                let number = parse_decimal(&literal).ok_or("must be a decimal number")?;
                if significant_scale(&number) > *max_scale {
                    return Err(format!("must have at most {max_scale} decimal places").into());
                }
                if *positive && number <= Decimal::ZERO {
                    return Err("must be greater than zero".into());
                }
                Ok(())
            }
            Self::Boolean => match scalar(value)? {
                Value::Bool(_) => Ok(()),
                Value::String(s) if s == "true" || s == "false" => Ok(()),
                _ => Err("must be true or false".into()),
            },
            Self::Date => {
                let text = text(value)?;
                if is_iso_date(text) {
                    Ok(())
                } else {
                    Err("must be a date in YYYY-MM-DD format".into())
                }
            }
            Self::Time => {
                let text = text(value)?;
                if text.len() == 5 && NaiveTime::parse_from_str(text, "%H:%M").is_ok() {
                    Ok(())
                } else {
                    Err("must be a time in HH:MM format".into())
                }
            }
            Self::OneOf(allowed) => {
                let text = text(value)?;
                if allowed.iter().any(|candidate| *candidate == text) {
                    Ok(())
                } else {
                    Err(format!("must be one of: {}", allowed.join(", ")).into())
                }
            }
            Self::Url => {
                let text = text(value)?;
                if is_http_url(text) {
                    Ok(())
                } else {
                    Err("must be an absolute http or https URL".into())
                }
            }
            Self::List { max_items } => {
                let items = list(value)?;
                if items.len() > *max_items {
                    Err(format!("must contain at most {max_items} items").into())
                } else {
                    Ok(())
                }
            }
            Self::Each(inner) => {
                for (index, item) in list(value)?.iter().enumerate() {
                    if item.is_null() {
                        return Err(format!("item {index} must not be null").into());
                    }
                    inner
                        .evaluate(item)
                        .map_err(|message| format!("item {index} {message}"))?;
                }
                Ok(())
            }
            Self::Custom { message, check, .. } => {
                if (check.0)(value) {
                    Ok(())
                } else {
                    Err(Cow::Borrowed(*message))
                }
            }
        }
    }
}

// ============================================================================
// Value helpers
// ============================================================================

/// Reject arrays (repeated query keys) and objects where a scalar is expected
fn scalar(value: &Value) -> Result<&Value, RuleMessage> {
    match value {
        Value::Array(_) => Err("must be a single value".into()),
        Value::Object(_) => Err("must not be an object".into()),
        _ => Ok(value),
    }
}

fn text(value: &Value) -> Result<&str, RuleMessage> {
    match scalar(value)? {
        Value::String(s) => Ok(s),
        _ => Err("must be a string".into()),
    }
}

fn list(value: &Value) -> Result<&Vec<Value>, RuleMessage> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err("must be a list".into()),
    }
}

fn integer(value: &Value) -> Result<i64, RuleMessage> {
    match scalar(value)? {
        Value::Number(n) => n.as_i64().ok_or_else(|| "must be an integer".into()),
        Value::String(s) => s.parse::<i64>().map_err(|_| "must be an integer".into()),
        _ => Err("must be an integer".into()),
    }
}

fn decimal_literal(value: &Value) -> Result<Cow<'_, str>, RuleMessage> {
    match scalar(value)? {
        Value::Number(n) => Ok(Cow::Owned(n.to_string())),
        Value::String(s) => Ok(Cow::Borrowed(s.as_str())),
        _ => Err("must be a decimal number".into()),
    }
}

/// Strict `YYYY-MM-DD` naming a real date
pub fn is_iso_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
        && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// Absolute http(s) URL in `scheme://host` form
///
/// Parsed with the WHATWG rules of the `url` crate; whitespace the parser
/// would silently strip is rejected up front.
pub fn is_http_url(text: &str) -> bool {
    if text.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Ok(url) = Url::parse(text) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some_and(|host| !host.is_empty())
        // `https:///x` and `https:x` parse, but carry no written host
        && text
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.starts_with('/'))
}

/// Parse a plain decimal literal (`-12.50`, `3`, `0.5`)
///
/// Exponents, digit separators and bare leading or trailing points are
/// rejected before the value goes through [`Decimal`].
pub fn parse_decimal(literal: &str) -> Option<Decimal> {
    let unsigned = literal.strip_prefix('-').unwrap_or(literal);
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "0"));
    let plain = !integer.is_empty()
        && !fraction.is_empty()
        && integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit());
    if !plain {
        return None;
    }
    Decimal::from_str_exact(literal).ok()
}

/// Fraction digits that carry value (`1.500` has scale 1)
pub fn significant_scale(value: &Decimal) -> u32 {
    value.normalize().scale()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fails(rule: &Rule, value: Value) -> bool {
        rule.evaluate(&value).is_err()
    }

    #[test]
    fn test_not_blank() {
        assert!(!fails(&Rule::NotBlank, json!("dinner")));
        assert!(fails(&Rule::NotBlank, json!("   ")));
        assert!(fails(&Rule::NotBlank, json!(12)));
    }

    #[test]
    fn test_length_counts_chars() {
        let rule = Rule::length(1, 3);
        assert!(!fails(&rule, json!("日本語")));
        assert!(fails(&rule, json!("日本語です")));
        assert!(fails(&rule, json!("")));
        assert_eq!(
            Rule::max_length(2).evaluate(&json!("abc")).unwrap_err(),
            "must be at most 2 characters"
        );
    }

    #[test]
    fn test_integer_accepts_json_and_strings() {
        let rule = Rule::integer_range(1, 100);
        assert!(!fails(&rule, json!(42)));
        assert!(!fails(&rule, json!("42")));
        assert!(fails(&rule, json!("4.2")));
        assert!(fails(&rule, json!(4.2)));
        assert!(fails(&rule, json!("notanumber")));
        assert!(fails(&rule, json!(0)));
        assert!(fails(&rule, json!("101")));
        assert_eq!(
            Rule::min_integer(0).evaluate(&json!(-1)).unwrap_err(),
            "must be at least 0"
        );
    }

    #[test]
    fn test_scalar_rules_reject_repeated_values() {
        let repeated = json!(["1", "2"]);
        assert_eq!(
            Rule::min_integer(0).evaluate(&repeated).unwrap_err(),
            "must be a single value"
        );
        assert!(fails(&Rule::Date, repeated));
    }

    #[test]
    fn test_decimal() {
        let rule = Rule::positive_decimal(2);
        assert!(!fails(&rule, json!("12.50")));
        assert!(!fails(&rule, json!(12.5)));
        assert!(!fails(&rule, json!("3")));
        assert!(!fails(&rule, json!("1.500")));
        assert!(fails(&rule, json!("1.505")));
        assert!(fails(&rule, json!("0.00")));
        assert!(fails(&rule, json!("-4")));
        assert!(fails(&rule, json!("1e3")));
        assert!(fails(&rule, json!("12.")));
        assert!(fails(&rule, json!(".5")));
        assert!(fails(&rule, json!("notanumber")));

        let signed = Rule::Decimal {
            max_scale: 2,
            positive: false,
        };
        assert!(!fails(&signed, json!("-4.25")));
    }

    #[test]
    fn test_boolean() {
        assert!(!fails(&Rule::Boolean, json!(true)));
        assert!(!fails(&Rule::Boolean, json!("false")));
        assert!(fails(&Rule::Boolean, json!("yes")));
        assert!(fails(&Rule::Boolean, json!(1)));
    }

    #[test]
    fn test_date_and_time() {
        assert!(!fails(&Rule::Date, json!("2024-02-29")));
        assert!(fails(&Rule::Date, json!("2023-02-29")));
        assert!(fails(&Rule::Date, json!("2024-2-9")));
        assert!(fails(&Rule::Date, json!("2024-02-29T10:00:00Z")));

        assert!(!fails(&Rule::Time, json!("09:30")));
        assert!(!fails(&Rule::Time, json!("23:59")));
        assert!(fails(&Rule::Time, json!("24:00")));
        assert!(fails(&Rule::Time, json!("9:30")));
    }

    #[test]
    fn test_one_of() {
        let rule = Rule::OneOf(&["image", "video"]);
        assert!(!fails(&rule, json!("video")));
        assert_eq!(
            rule.evaluate(&json!("audio")).unwrap_err(),
            "must be one of: image, video"
        );
    }

    #[test]
    fn test_url() {
        assert!(!fails(&Rule::Url, json!("https://cdn.example.com/a.jpg")));
        assert!(!fails(&Rule::Url, json!("http://localhost:9000/x")));
        assert!(fails(&Rule::Url, json!("ftp://example.com/a")));
        assert!(fails(&Rule::Url, json!("https://")));
        assert!(fails(&Rule::Url, json!("https:///path")));
        assert!(fails(&Rule::Url, json!("https:example.com")));
        assert!(fails(&Rule::Url, json!("https://exa mple.com")));
    }

    #[test]
    fn test_url_requires_a_well_formed_host() {
        for url in [
            "https://@/",
            "https://exa<mple>.com",
            "https://example.com:99999/x",
            "http://[::1/",
            " https://example.com",
            "https://example.com/a\tb",
        ] {
            assert!(!is_http_url(url), "{url:?}");
        }
        assert!(is_http_url("http://[::1]:8080/a"));
        assert!(is_http_url("https://user@example.com/p?q=1#frag"));
    }

    #[test]
    fn test_list_and_each() {
        assert!(!fails(&Rule::List { max_items: 2 }, json!([1, 2])));
        assert!(fails(&Rule::List { max_items: 2 }, json!([1, 2, 3])));
        assert!(fails(&Rule::List { max_items: 2 }, json!("1")));

        let each = Rule::each(Rule::integer_range(0, 60));
        assert_eq!(each.code(), "integer");
        assert!(!fails(&each, json!([0, "15", 60])));
        assert_eq!(
            each.evaluate(&json!([10, 61])).unwrap_err(),
            "item 1 must be between 0 and 60"
        );
    }

    #[test]
    fn test_custom() {
        let rule = Rule::custom("even", "must be even", |v| {
            v.as_i64().is_some_and(|n| n % 2 == 0)
        });
        assert_eq!(rule.code(), "even");
        assert!(!fails(&rule, json!(4)));
        assert_eq!(rule.evaluate(&json!(3)).unwrap_err(), "must be even");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("-0012.340"), Some(Decimal::new(-12_340, 3)));
        assert_eq!(significant_scale(&parse_decimal("12.340").unwrap()), 2);
        assert_eq!(significant_scale(&parse_decimal("7").unwrap()), 0);
        assert!(parse_decimal("0.000").unwrap().is_zero());
        for literal in ["", "-", ".5", "5.", "1e3", "1_000", "+5", "1.2.3", " 1"] {
            assert_eq!(parse_decimal(literal), None, "{literal:?}");
        }
        // Beyond the 28 digits a Decimal can hold
        assert_eq!(parse_decimal(&"9".repeat(40)), None);
    }
}
