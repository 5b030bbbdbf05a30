//! Domain Value Objects
//!
//! Immutable value types for the mobile domain. Each constructor enforces the
//! invariant the persisted record relies on, independently of the HTTP gate.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use derive_more::Display;
use kernel::validation::rule::is_http_url;
use kernel::validation::{parse_decimal, significant_scale};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Circle type name
// ============================================================================

/// Maximum length for a circle type name (in characters)
pub const CIRCLE_TYPE_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircleTypeNameError {
    #[error("must not be blank")]
    Empty,

    #[error("must be at most {max} characters (got {length})")]
    TooLong { length: usize, max: usize },
}

/// Circle type name
///
/// # Storage
/// - `display`: trimmed, NFKC normalized, case preserved
/// - `canonical`: lowercase form for uniqueness
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{display}")]
pub struct CircleTypeName {
    display: String,
    canonical: String,
}

impl CircleTypeName {
    /// NFKC-normalize, trim and check length
    pub fn new(input: impl AsRef<str>) -> Result<Self, CircleTypeNameError> {
        let display = input.as_ref().nfkc().collect::<String>().trim().to_string();
        if display.is_empty() {
            return Err(CircleTypeNameError::Empty);
        }
        let length = display.chars().count();
        if length > CIRCLE_TYPE_NAME_MAX_LENGTH {
            return Err(CircleTypeNameError::TooLong {
                length,
                max: CIRCLE_TYPE_NAME_MAX_LENGTH,
            });
        }
        let canonical = display.to_lowercase();
        Ok(Self { display, canonical })
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(display: String) -> Self {
        let canonical = display.to_lowercase();
        Self { display, canonical }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lowercase form used for uniqueness
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

// ============================================================================
// Money
// ============================================================================

/// Largest accepted amount in minor units (1 000 000 000.00)
pub const MAX_AMOUNT_MINOR: i64 = 100_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("must be a decimal number")]
    NotDecimal,

    #[error("must have at most 2 decimal places")]
    TooPrecise,

    #[error("must be greater than zero")]
    NotPositive,

    #[error("must not exceed 1000000000.00")]
    TooLarge,
}

/// Positive amount stored as minor units (cents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    minor_units: i64,
}

impl Money {
    /// Create from stored minor units
    pub fn from_minor_units(minor_units: i64) -> Result<Self, MoneyError> {
        if minor_units <= 0 {
            Err(MoneyError::NotPositive)
        } else if minor_units > MAX_AMOUNT_MINOR {
            Err(MoneyError::TooLarge)
        } else {
            Ok(Self { minor_units })
        }
    }

    /// Create from a major-unit amount such as `12.5`
    ///
    /// # Errors
    /// - more than two significant decimal places
    /// - zero or negative
    /// - above [`MAX_AMOUNT_MINOR`]
    pub fn from_decimal(amount: Decimal) -> Result<Self, MoneyError> {
        if significant_scale(&amount) > 2 {
            return Err(MoneyError::TooPrecise);
        }
        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        if amount > Decimal::new(MAX_AMOUNT_MINOR, 2) {
            return Err(MoneyError::TooLarge);
        }
        let minor_units = (amount * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or(MoneyError::TooLarge)?;
        Self::from_minor_units(minor_units)
    }

    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// Major-unit value with exactly two decimal places
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.minor_units, 2)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parse a plain decimal literal such as `12.5` or `1999.99`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = parse_decimal(s.trim()).ok_or(MoneyError::NotDecimal)?;
        Self::from_decimal(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

// ============================================================================
// Currency
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("must be a three-letter uppercase currency code")]
pub struct CurrencyError;

/// ISO 4217 style currency code (`USD`, `EUR`, `JPY`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct Currency(String);

impl Currency {
    /// Accept a code that is already three uppercase letters
    pub fn new(code: impl AsRef<str>) -> Result<Self, CurrencyError> {
        let code = code.as_ref();
        if Self::is_valid(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(CurrencyError)
        }
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(code: String) -> Self {
        Self(code)
    }

    /// Three uppercase ASCII letters
    pub fn is_valid(code: &str) -> bool {
        code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Enumerations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("must be one of: {}", .allowed.join(", "))]
pub struct UnknownCode {
    pub allowed: &'static [&'static str],
}

/// Expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ExpenseCategory {
    #[display("groceries")]
    Groceries,
    #[display("housing")]
    Housing,
    #[display("utilities")]
    Utilities,
    #[display("transport")]
    Transport,
    #[display("health")]
    Health,
    #[display("education")]
    Education,
    #[display("entertainment")]
    Entertainment,
    #[display("other")]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        Self::Groceries,
        Self::Housing,
        Self::Utilities,
        Self::Transport,
        Self::Health,
        Self::Education,
        Self::Entertainment,
        Self::Other,
    ];

    /// Wire and storage codes, in declaration order
    pub const CODES: &'static [&'static str] = &[
        "groceries",
        "housing",
        "utilities",
        "transport",
        "health",
        "education",
        "entertainment",
        "other",
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        Self::CODES[*self as usize]
    }
}

impl FromStr for ExpenseCategory {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.code() == s)
            .ok_or(UnknownCode {
                allowed: Self::CODES,
            })
    }
}

/// Gallery media kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MediaKind {
    #[display("image")]
    Image,
    #[display("video")]
    Video,
}

impl MediaKind {
    pub const CODES: &'static [&'static str] = &["image", "video"];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl FromStr for MediaKind {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(UnknownCode {
                allowed: Self::CODES,
            }),
        }
    }
}

// ============================================================================
// Media URL
// ============================================================================

/// Maximum stored URL length
pub const MEDIA_URL_MAX_LENGTH: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaUrlError {
    #[error("must be an absolute http or https URL")]
    NotHttp,

    #[error("must be at most {} characters", MEDIA_URL_MAX_LENGTH)]
    TooLong,
}

/// Absolute http(s) URL of an uploaded photo or video
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct MediaUrl(String);

impl MediaUrl {
    /// Accept an absolute http(s) URL with a host
    pub fn new(url: impl Into<String>) -> Result<Self, MediaUrlError> {
        let url = url.into();
        if url.chars().count() > MEDIA_URL_MAX_LENGTH {
            return Err(MediaUrlError::TooLong);
        }
        if !is_http_url(&url) {
            return Err(MediaUrlError::NotHttp);
        }
        Ok(Self(url))
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(url: String) -> Self {
        Self(url)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Event schedule
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("must not be set for an all-day event")]
    TimeOnAllDayEvent,

    #[error("requires startTime")]
    EndWithoutStart,

    #[error("must not be before startTime")]
    EndBeforeStart,
}

impl ScheduleError {
    /// Request field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            Self::TimeOnAllDayEvent => "allDay",
            Self::EndWithoutStart | Self::EndBeforeStart => "endTime",
        }
    }
}

/// Time-of-day placement of a calendar event
///
/// # Invariants
/// - all-day events carry no times
/// - an end time requires a start time and is not before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSchedule {
    AllDay,
    Timed {
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    },
}

impl EventSchedule {
    pub fn new(
        all_day: bool,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> Result<Self, ScheduleError> {
        if all_day {
            return if start.is_none() && end.is_none() {
                Ok(Self::AllDay)
            } else {
                Err(ScheduleError::TimeOnAllDayEvent)
            };
        }
        match (start, end) {
            (None, Some(_)) => Err(ScheduleError::EndWithoutStart),
            (Some(start), Some(end)) if end < start => Err(ScheduleError::EndBeforeStart),
            _ => Ok(Self::Timed { start, end }),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay)
    }

    pub fn start(&self) -> Option<NaiveTime> {
        match self {
            Self::AllDay => None,
            Self::Timed { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Option<NaiveTime> {
        match self {
            Self::AllDay => None,
            Self::Timed { end, .. } => *end,
        }
    }
}

// ============================================================================
// Reminders
// ============================================================================

/// At most this many reminders per event
pub const MAX_REMINDERS: usize = 5;

/// Latest reminder: four weeks before the event
pub const MAX_REMINDER_MINUTES: i64 = 40_320;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    #[error("must contain at most {} items", MAX_REMINDERS)]
    TooMany,

    #[error("must be between 0 and {} minutes (got {})", MAX_REMINDER_MINUTES, .0)]
    OutOfRange(i64),
}

/// Minutes-before offsets, de-duplicated and ascending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reminders(Vec<i32>);

impl Reminders {
    /// Sort and deduplicate lead times in minutes
    ///
    /// Each lead time must fall within 40320 minutes (four weeks).
    pub fn new(minutes: impl IntoIterator<Item = i64>) -> Result<Self, ReminderError> {
        let mut offsets = Vec::new();
        for value in minutes {
            if !(0..=MAX_REMINDER_MINUTES).contains(&value) {
                return Err(ReminderError::OutOfRange(value));
            }
            offsets.push(value as i32);
        }
        offsets.sort_unstable();
        offsets.dedup();
        if offsets.len() > MAX_REMINDERS {
            return Err(ReminderError::TooMany);
        }
        Ok(Self(offsets))
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(mut offsets: Vec<i32>) -> Self {
        offsets.sort_unstable();
        offsets.dedup();
        Self(offsets)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod circle_type_name {
        use super::*;

        #[test]
        fn test_normalizes_and_keeps_case() {
            // Full-width letters fold under NFKC
            let name = CircleTypeName::new("  Ｆａｍｉｌｙ ").unwrap();
            assert_eq!(name.as_str(), "Family");
            assert_eq!(name.canonical(), "family");
            assert_eq!(name.to_string(), "Family");
        }

        #[test]
        fn test_rejects_blank_and_long() {
            assert_eq!(CircleTypeName::new("   "), Err(CircleTypeNameError::Empty));
            assert!(matches!(
                CircleTypeName::new("x".repeat(51)),
                Err(CircleTypeNameError::TooLong { length: 51, .. })
            ));
            assert!(CircleTypeName::new("x".repeat(50)).is_ok());
        }
    }

    mod money {
        use super::*;

        #[test]
        fn test_parse() {
            assert_eq!("12.5".parse::<Money>().unwrap().minor_units(), 1250);
            assert_eq!("12.50".parse::<Money>().unwrap().minor_units(), 1250);
            assert_eq!("0.01".parse::<Money>().unwrap().minor_units(), 1);
            assert_eq!("7".parse::<Money>().unwrap().minor_units(), 700);
            assert_eq!("3.100".parse::<Money>().unwrap().minor_units(), 310);
            assert_eq!(
                "1000000000".parse::<Money>().unwrap().minor_units(),
                MAX_AMOUNT_MINOR
            );
        }

        #[test]
        fn test_parse_errors() {
            assert_eq!("abc".parse::<Money>(), Err(MoneyError::NotDecimal));
            assert_eq!("1.001".parse::<Money>(), Err(MoneyError::TooPrecise));
            assert_eq!("0.00".parse::<Money>(), Err(MoneyError::NotPositive));
            assert_eq!("-5".parse::<Money>(), Err(MoneyError::NotPositive));
            assert_eq!("1000000000.01".parse::<Money>(), Err(MoneyError::TooLarge));
            assert_eq!("99999999999999999999".parse::<Money>(), Err(MoneyError::TooLarge));
            assert_eq!("1e3".parse::<Money>(), Err(MoneyError::NotDecimal));
            assert_eq!("".parse::<Money>(), Err(MoneyError::NotDecimal));
        }

        #[test]
        fn test_from_decimal() {
            let amount = Money::from_decimal(Decimal::new(12_340, 3)).unwrap();
            assert_eq!(amount.minor_units(), 1234);
            assert_eq!(amount.to_decimal(), Decimal::new(1234, 2));
            assert_eq!(
                Money::from_decimal(Decimal::new(1, 3)),
                Err(MoneyError::TooPrecise)
            );
            assert_eq!(
                Money::from_decimal(Decimal::new(-1, 2)),
                Err(MoneyError::NotPositive)
            );
            assert_eq!(
                Money::from_decimal(Decimal::new(MAX_AMOUNT_MINOR + 1, 2)),
                Err(MoneyError::TooLarge)
            );
        }

        #[test]
        fn test_display() {
            assert_eq!(Money::from_minor_units(1250).unwrap().to_string(), "12.50");
            assert_eq!(Money::from_minor_units(5).unwrap().to_string(), "0.05");
        }
    }

    #[test]
    fn test_currency() {
        assert_eq!(Currency::new("EUR").unwrap().as_str(), "EUR");
        assert!(Currency::new("eur").is_err());
        assert!(Currency::new("EURO").is_err());
        assert!(Currency::new("").is_err());
    }

    #[test]
    fn test_expense_category_codes() {
        for category in ExpenseCategory::ALL {
            assert_eq!(category.code().parse::<ExpenseCategory>(), Ok(category));
            assert_eq!(category.to_string(), category.code());
        }
        let err = "pets".parse::<ExpenseCategory>().unwrap_err();
        assert!(err.to_string().starts_with("must be one of: groceries"));
    }

    #[test]
    fn test_media_kind_and_url() {
        assert_eq!("video".parse::<MediaKind>(), Ok(MediaKind::Video));
        assert!("audio".parse::<MediaKind>().is_err());

        assert!(MediaUrl::new("https://cdn.example.com/p/1.jpg").is_ok());
        assert_eq!(MediaUrl::new("file:///tmp/x"), Err(MediaUrlError::NotHttp));
        assert_eq!(MediaUrl::new("https://@/"), Err(MediaUrlError::NotHttp));
        assert_eq!(
            MediaUrl::new("https://cdn.example.com:70000/a.jpg"),
            Err(MediaUrlError::NotHttp)
        );
        let long = format!("https://example.com/{}", "a".repeat(2048));
        assert_eq!(MediaUrl::new(long), Err(MediaUrlError::TooLong));
    }

    mod schedule {
        use super::*;

        fn t(s: &str) -> Option<NaiveTime> {
            Some(NaiveTime::parse_from_str(s, "%H:%M").unwrap())
        }

        #[test]
        fn test_all_day() {
            assert_eq!(EventSchedule::new(true, None, None), Ok(EventSchedule::AllDay));
            assert_eq!(
                EventSchedule::new(true, t("09:00"), None),
                Err(ScheduleError::TimeOnAllDayEvent)
            );
        }

        #[test]
        fn test_timed() {
            let schedule = EventSchedule::new(false, t("09:00"), t("10:30")).unwrap();
            assert_eq!(schedule.start(), t("09:00"));
            assert_eq!(schedule.end(), t("10:30"));
            assert!(EventSchedule::new(false, t("09:00"), t("09:00")).is_ok());
            assert!(EventSchedule::new(false, None, None).is_ok());
        }

        #[test]
        fn test_invalid_end() {
            let err = EventSchedule::new(false, None, t("10:00")).unwrap_err();
            assert_eq!(err, ScheduleError::EndWithoutStart);
            assert_eq!(err.field(), "endTime");
            assert_eq!(
                EventSchedule::new(false, t("10:00"), t("09:59")),
                Err(ScheduleError::EndBeforeStart)
            );
        }
    }

    #[test]
    fn test_reminders_are_normalized() {
        let reminders = Reminders::new([60, 15, 60, 0]).unwrap();
        assert_eq!(reminders.as_slice(), &[0, 15, 60]);

        // Duplicates do not count towards the limit
        assert!(Reminders::new([5, 5, 10, 20, 30, 40, 40]).is_ok());
        assert_eq!(
            Reminders::new([1, 2, 3, 4, 5, 6]),
            Err(ReminderError::TooMany)
        );
        assert_eq!(
            Reminders::new([40_321]),
            Err(ReminderError::OutOfRange(40_321))
        );
        assert!(Reminders::new([-1]).is_err());
    }
}
