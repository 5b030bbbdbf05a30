//! API DTOs (Data Transfer Objects)
//!
//! Request bodies have already passed the route's validation gate, so the
//! field types here only need to accept what the gate accepts.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::validation::lenient;
use serde::{Deserialize, Serialize};

use crate::application::{
    CalendarEventInput, CalendarListInput, CircleTypeInput, ExpenseInput, ExpenseListInput,
    GalleryItemInput, GalleryListInput,
};
use crate::domain::{CalendarEvent, CircleType, Expense, GalleryItem};

/// `HH:MM`, matching what the API accepts
fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

// ============================================================================
// Pagination
// ============================================================================

/// `?limit=&offset=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ============================================================================
// Calendar
// ============================================================================

/// Calendar event create / replace request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventRequest {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_boolean")]
    pub all_day: Option<bool>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Minutes before the event
    #[serde(default, deserialize_with = "lenient::optional_integer_list")]
    pub reminders: Option<Vec<i64>>,
}

impl From<CalendarEventRequest> for CalendarEventInput {
    fn from(req: CalendarEventRequest) -> Self {
        Self {
            title: req.title,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            all_day: req.all_day.unwrap_or(false),
            location: req.location,
            description: req.description,
            reminders: req.reminders.unwrap_or_default(),
        }
    }
}

/// `GET /calendar` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<CalendarQuery> for CalendarListInput {
    fn from(query: CalendarQuery) -> Self {
        Self {
            from: query.from,
            to: query.to,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

/// Calendar event response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventResponse {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub all_day: bool,
    pub location: Option<String>,
    pub description: Option<String>,
    pub reminders: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CalendarEvent> for CalendarEventResponse {
    fn from(event: CalendarEvent) -> Self {
        Self {
            id: event.id.get(),
            title: event.title,
            date: event.date,
            start_time: event.schedule.start().map(format_time),
            end_time: event.schedule.end().map(format_time),
            all_day: event.schedule.is_all_day(),
            location: event.location,
            description: event.description,
            reminders: event.reminders.as_slice().to_vec(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

// ============================================================================
// Circle Types
// ============================================================================

/// Circle type create / replace request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleTypeRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_integer")]
    pub max_members: Option<i64>,
}

impl From<CircleTypeRequest> for CircleTypeInput {
    fn from(req: CircleTypeRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            max_members: req.max_members,
        }
    }
}

/// Circle type response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleTypeResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub max_members: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CircleType> for CircleTypeResponse {
    fn from(circle_type: CircleType) -> Self {
        Self {
            id: circle_type.id.get(),
            name: circle_type.name.to_string(),
            description: circle_type.description,
            max_members: circle_type.max_members,
            created_at: circle_type.created_at,
            updated_at: circle_type.updated_at,
        }
    }
}

// ============================================================================
// Expenses
// ============================================================================

/// Expense create / replace request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub title: String,
    /// Number or numeric string; kept as text until parsed into money
    #[serde(deserialize_with = "lenient::decimal_text")]
    pub amount: String,
    #[serde(default)]
    pub currency: Option<String>,
    pub category: String,
    pub spent_on: String,
    #[serde(default)]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl From<ExpenseRequest> for ExpenseInput {
    fn from(req: ExpenseRequest) -> Self {
        Self {
            title: req.title,
            amount: req.amount,
            currency: req.currency,
            category: req.category,
            spent_on: req.spent_on,
            paid_by: req.paid_by,
            note: req.note,
        }
    }
}

/// `GET /expenses` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseQuery {
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<ExpenseQuery> for ExpenseListInput {
    fn from(query: ExpenseQuery) -> Self {
        Self {
            category: query.category,
            from: query.from,
            to: query.to,
            amount: query.amount,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

/// Expense response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: i64,
    pub title: String,
    /// Decimal text, e.g. `"12.50"`
    pub amount: String,
    pub amount_minor: i64,
    pub currency: String,
    pub category: &'static str,
    pub spent_on: NaiveDate,
    pub paid_by: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id.get(),
            title: expense.title,
            amount: expense.amount.to_string(),
            amount_minor: expense.amount.minor_units(),
            currency: expense.currency.as_str().to_string(),
            category: expense.category.code(),
            spent_on: expense.spent_on,
            paid_by: expense.paid_by,
            note: expense.note,
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

// ============================================================================
// Gallery
// ============================================================================

/// Gallery item create / replace request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemRequest {
    pub media_url: String,
    pub media_kind: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub taken_on: Option<String>,
}

impl From<GalleryItemRequest> for GalleryItemInput {
    fn from(req: GalleryItemRequest) -> Self {
        Self {
            media_url: req.media_url,
            media_kind: req.media_kind,
            caption: req.caption,
            album: req.album,
            taken_on: req.taken_on,
        }
    }
}

/// `GET /gallery` query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryQuery {
    pub album: Option<String>,
    pub media_kind: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<GalleryQuery> for GalleryListInput {
    fn from(query: GalleryQuery) -> Self {
        Self {
            album: query.album,
            media_kind: query.media_kind,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

/// Gallery item response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemResponse {
    pub id: i64,
    pub media_url: String,
    pub media_kind: &'static str,
    pub caption: Option<String>,
    pub album: Option<String>,
    pub taken_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GalleryItem> for GalleryItemResponse {
    fn from(item: GalleryItem) -> Self {
        Self {
            id: item.id.get(),
            media_url: item.media_url.as_str().to_string(),
            media_kind: item.media_kind.code(),
            caption: item.caption,
            album: item.album,
            taken_on: item.taken_on,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{EventSchedule, ExpenseCategory, Money, Reminders};
    use chrono::TimeZone;
    use kernel::id::Id;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_calendar_request_is_camel_case_and_lenient() {
        let req: CalendarEventRequest = serde_json::from_str(
            r#"{"title":"Dentist","date":"2025-03-04","startTime":"09:30","allDay":"false","reminders":["15",60]}"#,
        )
        .unwrap();

        let input = CalendarEventInput::from(req);
        assert_eq!(input.start_time.as_deref(), Some("09:30"));
        assert!(!input.all_day);
        assert_eq!(input.reminders, vec![15, 60]);
    }

    #[test]
    fn test_calendar_request_defaults() {
        let req: CalendarEventRequest =
            serde_json::from_str(r#"{"title":"Picnic","date":"2025-06-01"}"#).unwrap();

        let input = CalendarEventInput::from(req);
        assert!(!input.all_day);
        assert!(input.reminders.is_empty());
        assert!(input.end_time.is_none());
    }

    #[test]
    fn test_expense_request_amount_accepts_number_or_text() {
        let from_number: ExpenseRequest = serde_json::from_str(
            r#"{"title":"Milk","amount":12.5,"category":"groceries","spentOn":"2025-03-01"}"#,
        )
        .unwrap();
        assert_eq!(from_number.amount, "12.5");

        let from_text: ExpenseRequest = serde_json::from_str(
            r#"{"title":"Milk","amount":"12.50","category":"groceries","spentOn":"2025-03-01","paidBy":"Sam"}"#,
        )
        .unwrap();
        assert_eq!(from_text.amount, "12.50");
        assert_eq!(from_text.paid_by.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_calendar_response_casing_and_times() {
        let event = CalendarEvent {
            id: Id::from_db(7),
            title: "Dentist".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            schedule: EventSchedule::Timed {
                start: NaiveTime::from_hms_opt(9, 30, 0),
                end: None,
            },
            location: None,
            description: None,
            reminders: Reminders::from_db(vec![60, 15]),
            created_at: timestamp(),
            updated_at: timestamp(),
        };

        let json = serde_json::to_value(CalendarEventResponse::from(event)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["date"], "2025-03-04");
        assert_eq!(json["startTime"], "09:30");
        assert!(json["endTime"].is_null());
        assert_eq!(json["allDay"], false);
        assert_eq!(json["reminders"], serde_json::json!([15, 60]));
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_expense_response_amount_forms() {
        let expense = Expense {
            id: Id::from_db(3),
            title: "Bus pass".to_string(),
            amount: Money::from_minor_units(1250).unwrap(),
            currency: crate::domain::value_objects::Currency::new("EUR").unwrap(),
            category: ExpenseCategory::Transport,
            spent_on: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
            paid_by: None,
            note: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        };

        let json = serde_json::to_value(ExpenseResponse::from(expense)).unwrap();
        assert_eq!(json["amount"], "12.50");
        assert_eq!(json["amountMinor"], 1250);
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["category"], "transport");
        assert_eq!(json["spentOn"], "2025-02-28");
    }
}
