//! Common ID Types
//!
//! Type-safe ID wrappers for persisted records.
//! Records are keyed by database-assigned positive integers (`BIGSERIAL`).

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type ExpenseId = Id<markers::Expense>;
/// let id: ExpenseId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

/// Error returned when an identifier is not a positive integer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier must be a positive integer, got {0}")]
    NotPositive(i64),

    #[error("identifier is not an integer: {0:?}")]
    NotInteger(String),
}

impl<T> Id<T> {
    /// Create from a raw value, rejecting zero and negatives
    pub fn new(value: i64) -> Result<Self, IdError> {
        if value > 0 {
            Ok(Self::from_db(value))
        } else {
            Err(IdError::NotPositive(value))
        }
    }

    /// Create from a database value (assumes already valid)
    #[inline]
    pub const fn from_db(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the underlying integer
    #[inline]
    pub const fn get(&self) -> i64 {
        self.value
    }
}

// Manual impls so that marker types need not implement these traits.

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| IdError::NotInteger(s.to_string()))?;
        Self::new(value)
    }
}

impl<T> TryFrom<i64> for Id<T> {
    type Error = IdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for CalendarEvent IDs
    pub struct CalendarEvent;

    /// Marker for CircleType IDs
    pub struct CircleType;

    /// Marker for Expense IDs
    pub struct Expense;

    /// Marker for GalleryItem IDs
    pub struct GalleryItem;
}

/// Type aliases for common IDs
pub type CalendarEventId = Id<markers::CalendarEvent>;
pub type CircleTypeId = Id<markers::CircleType>;
pub type ExpenseId = Id<markers::Expense>;
pub type GalleryItemId = Id<markers::GalleryItem>;
