//! Shared use-case helpers
//!
//! Conversions from raw input strings to domain types. Field names in errors
//! are the request's camelCase names.

use chrono::{NaiveDate, NaiveTime};
use kernel::validation::rule::is_iso_date;
use serde::Serialize;

use crate::domain::repository::PageRequest;
use crate::error::{MobileError, MobileResult};

/// One page of a list result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: PageRequest) -> Self {
        Self {
            items,
            limit: page.limit,
            offset: page.offset,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

pub(crate) fn parse_date(field: &'static str, value: &str) -> MobileResult<NaiveDate> {
    if !is_iso_date(value) {
        return Err(MobileError::invalid(field, "must be a date in YYYY-MM-DD format"));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| MobileError::invalid(field, "must be a date in YYYY-MM-DD format"))
}

pub(crate) fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> MobileResult<Option<NaiveDate>> {
    value.map(|v| parse_date(field, v)).transpose()
}

pub(crate) fn parse_optional_time(
    field: &'static str,
    value: Option<&str>,
) -> MobileResult<Option<NaiveTime>> {
    value
        .map(|v| {
            if v.len() != 5 {
                return Err(MobileError::invalid(field, "must be a time in HH:MM format"));
            }
            NaiveTime::parse_from_str(v, "%H:%M")
                .map_err(|_| MobileError::invalid(field, "must be a time in HH:MM format"))
        })
        .transpose()
}

/// Inclusive range; `from` must not be after `to`
pub(crate) fn parse_date_range(
    from: Option<&str>,
    to: Option<&str>,
) -> MobileResult<(Option<NaiveDate>, Option<NaiveDate>)> {
    let from = parse_optional_date("from", from)?;
    let to = parse_optional_date("to", to)?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(MobileError::invalid("to", "must not be before from"));
        }
    }
    Ok((from, to))
}

/// Trimmed, non-blank text of at most `max` characters
pub(crate) fn required_text(field: &'static str, value: &str, max: usize) -> MobileResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MobileError::invalid(field, "must not be blank"));
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Trimmed text of at most `max` characters; blank becomes `None`
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> MobileResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            check_length(field, trimmed, max)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> MobileResult<()> {
    if value.chars().count() > max {
        Err(MobileError::invalid(
            field,
            format!("must be at most {max} characters"),
        ))
    } else {
        Ok(())
    }
}
