//! Domain Entities
//!
//! Persisted records of the mobile domain. `New*` types are the validated
//! field sets written on create and on full replacement.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{CalendarEventId, CircleTypeId, ExpenseId, GalleryItemId};

use crate::domain::value_objects::{
    CircleTypeName, Currency, EventSchedule, ExpenseCategory, MediaKind, MediaUrl, Money,
    Reminders,
};

/// Circle type - classifies family circles ("Family", "Grandparents")
#[derive(Debug, Clone, PartialEq)]
pub struct CircleType {
    pub id: CircleTypeId,
    pub name: CircleTypeName,
    pub description: Option<String>,
    pub max_members: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCircleType {
    pub name: CircleTypeName,
    pub description: Option<String>,
    pub max_members: Option<i32>,
}

/// Calendar event with its reminders
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: CalendarEventId,
    pub title: String,
    pub date: NaiveDate,
    pub schedule: EventSchedule,
    pub location: Option<String>,
    pub description: Option<String>,
    pub reminders: Reminders,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    pub schedule: EventSchedule,
    pub location: Option<String>,
    pub description: Option<String>,
    pub reminders: Reminders,
}

/// Household expense
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub title: String,
    pub amount: Money,
    pub currency: Currency,
    pub category: ExpenseCategory,
    pub spent_on: NaiveDate,
    pub paid_by: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub amount: Money,
    pub currency: Currency,
    pub category: ExpenseCategory,
    pub spent_on: NaiveDate,
    pub paid_by: Option<String>,
    pub note: Option<String>,
}

/// Photo or video shared with the family
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub id: GalleryItemId,
    pub media_url: MediaUrl,
    pub media_kind: MediaKind,
    pub caption: Option<String>,
    pub album: Option<String>,
    pub taken_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGalleryItem {
    pub media_url: MediaUrl,
    pub media_kind: MediaKind,
    pub caption: Option<String>,
    pub album: Option<String>,
    pub taken_on: Option<NaiveDate>,
}
