//! Route Schemas
//!
//! Declarative request rules for every mobile route. The gate checks shape
//! only; invariants spanning several fields live in the use cases.

use kernel::validation::{RouteSchema, Rule};
use serde_json::Value;

use crate::domain::value_objects::{
    CIRCLE_TYPE_NAME_MAX_LENGTH, Currency, ExpenseCategory, MAX_REMINDER_MINUTES, MAX_REMINDERS,
    MEDIA_URL_MAX_LENGTH, MediaKind,
};

fn is_currency_code(value: &Value) -> bool {
    value.as_str().is_some_and(Currency::is_valid)
}

/// `{id}` path segment
fn by_id(name: &'static str) -> RouteSchema {
    RouteSchema::new(name).path("id", [Rule::Required, Rule::min_integer(1)])
}

/// `limit` / `offset` query parameters
fn paged(schema: RouteSchema) -> RouteSchema {
    schema
        .query("limit", [Rule::integer_range(1, 100)])
        .query("offset", [Rule::min_integer(0)])
}

// ============================================================================
// Calendar
// ============================================================================

pub fn list_calendar_events() -> RouteSchema {
    paged(
        RouteSchema::new("calendar.list")
            .query("from", [Rule::Date])
            .query("to", [Rule::Date]),
    )
}

fn calendar_event_body(schema: RouteSchema) -> RouteSchema {
    schema
        .body("title", [Rule::Required, Rule::NotBlank, Rule::length(1, 120)])
        .body("date", [Rule::Required, Rule::Date])
        .body("startTime", [Rule::Time])
        .body("endTime", [Rule::Time])
        .body("allDay", [Rule::Boolean])
        .body("location", [Rule::max_length(200)])
        .body("description", [Rule::max_length(2000)])
        .body(
            "reminders",
            [
                Rule::List {
                    max_items: MAX_REMINDERS,
                },
                Rule::each(Rule::integer_range(0, MAX_REMINDER_MINUTES)),
            ],
        )
}

pub fn create_calendar_event() -> RouteSchema {
    calendar_event_body(RouteSchema::new("calendar.create"))
}

pub fn get_calendar_event() -> RouteSchema {
    by_id("calendar.get")
}

pub fn update_calendar_event() -> RouteSchema {
    calendar_event_body(by_id("calendar.update"))
}

pub fn delete_calendar_event() -> RouteSchema {
    by_id("calendar.delete")
}

// ============================================================================
// Circle Types
// ============================================================================

pub fn list_circle_types() -> RouteSchema {
    paged(RouteSchema::new("circle_types.list"))
}

fn circle_type_body(schema: RouteSchema) -> RouteSchema {
    schema
        .body(
            "name",
            [
                Rule::Required,
                Rule::NotBlank,
                Rule::length(1, CIRCLE_TYPE_NAME_MAX_LENGTH),
            ],
        )
        .body("description", [Rule::max_length(500)])
        .body("maxMembers", [Rule::integer_range(1, 100)])
}

pub fn create_circle_type() -> RouteSchema {
    circle_type_body(RouteSchema::new("circle_types.create"))
}

pub fn get_circle_type() -> RouteSchema {
    by_id("circle_types.get")
}

pub fn update_circle_type() -> RouteSchema {
    circle_type_body(by_id("circle_types.update"))
}

pub fn delete_circle_type() -> RouteSchema {
    by_id("circle_types.delete")
}

// ============================================================================
// Expenses
// ============================================================================

pub fn list_expenses() -> RouteSchema {
    paged(
        RouteSchema::new("expenses.list")
            .query("category", [Rule::OneOf(ExpenseCategory::CODES)])
            .query("from", [Rule::Date])
            .query("to", [Rule::Date])
            .query("amount", [Rule::positive_decimal(2)]),
    )
}

fn expense_body(schema: RouteSchema) -> RouteSchema {
    schema
        .body("title", [Rule::Required, Rule::NotBlank, Rule::length(1, 120)])
        .body("amount", [Rule::Required, Rule::positive_decimal(2)])
        .body(
            "currency",
            [Rule::custom(
                "currency",
                "must be a three-letter uppercase currency code",
                is_currency_code,
            )],
        )
        .body(
            "category",
            [Rule::Required, Rule::OneOf(ExpenseCategory::CODES)],
        )
        .body("spentOn", [Rule::Required, Rule::Date])
        .body("paidBy", [Rule::max_length(80)])
        .body("note", [Rule::max_length(500)])
}

pub fn create_expense() -> RouteSchema {
    expense_body(RouteSchema::new("expenses.create"))
}

pub fn get_expense() -> RouteSchema {
    by_id("expenses.get")
}

pub fn update_expense() -> RouteSchema {
    expense_body(by_id("expenses.update"))
}

pub fn delete_expense() -> RouteSchema {
    by_id("expenses.delete")
}

// ============================================================================
// Gallery
// ============================================================================

pub fn list_gallery_items() -> RouteSchema {
    paged(
        RouteSchema::new("gallery.list")
            .query("album", [Rule::length(1, 60)])
            .query("mediaKind", [Rule::OneOf(MediaKind::CODES)]),
    )
}

fn gallery_item_body(schema: RouteSchema) -> RouteSchema {
    schema
        .body(
            "mediaUrl",
            [
                Rule::Required,
                Rule::Url,
                Rule::max_length(MEDIA_URL_MAX_LENGTH),
            ],
        )
        .body("mediaKind", [Rule::Required, Rule::OneOf(MediaKind::CODES)])
        .body("caption", [Rule::max_length(500)])
        .body("album", [Rule::length(1, 60)])
        .body("takenOn", [Rule::Date])
}

pub fn create_gallery_item() -> RouteSchema {
    gallery_item_body(RouteSchema::new("gallery.create"))
}

pub fn get_gallery_item() -> RouteSchema {
    by_id("gallery.get")
}

pub fn update_gallery_item() -> RouteSchema {
    gallery_item_body(by_id("gallery.update"))
}

pub fn delete_gallery_item() -> RouteSchema {
    by_id("gallery.delete")
}
