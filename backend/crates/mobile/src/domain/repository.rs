//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::NaiveDate;
use kernel::id::{CalendarEventId, CircleTypeId, ExpenseId, GalleryItemId};

use crate::domain::entities::{
    CalendarEvent, CircleType, Expense, GalleryItem, NewCalendarEvent, NewCircleType, NewExpense,
    NewGalleryItem,
};
use crate::domain::value_objects::{CircleTypeName, ExpenseCategory, MediaKind, Money};
use crate::error::MobileResult;

/// Offset pagination window (already clamped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

/// Calendar list filter (inclusive date range)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Expense list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub category: Option<ExpenseCategory>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Exact amount match
    pub amount: Option<Money>,
}

/// Gallery list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryFilter {
    pub album: Option<String>,
    pub media_kind: Option<MediaKind>,
}

/// Calendar event repository trait
#[trait_variant::make(CalendarRepository: Send)]
pub trait LocalCalendarRepository {
    /// Insert an event and its reminders atomically
    async fn create(&self, event: &NewCalendarEvent) -> MobileResult<CalendarEvent>;

    /// Events ordered by date, start time, id
    async fn list(
        &self,
        filter: &CalendarFilter,
        page: PageRequest,
    ) -> MobileResult<Vec<CalendarEvent>>;

    /// Event with its reminders in ascending order
    async fn find_by_id(&self, id: CalendarEventId) -> MobileResult<Option<CalendarEvent>>;

    /// Replace an event and its reminders atomically; `None` if absent
    async fn update(
        &self,
        id: CalendarEventId,
        event: &NewCalendarEvent,
    ) -> MobileResult<Option<CalendarEvent>>;

    /// Returns false if nothing was deleted
    async fn delete(&self, id: CalendarEventId) -> MobileResult<bool>;
}

/// Circle type repository trait
#[trait_variant::make(CircleTypeRepository: Send)]
pub trait LocalCircleTypeRepository {
    /// Insert a circle type
    ///
    /// A name taken concurrently surfaces as `MobileError::Duplicate`.
    async fn create(&self, circle_type: &NewCircleType) -> MobileResult<CircleType>;

    /// Circle types ordered by name
    async fn list(&self, page: PageRequest) -> MobileResult<Vec<CircleType>>;

    /// Find circle type by ID
    async fn find_by_id(&self, id: CircleTypeId) -> MobileResult<Option<CircleType>>;

    /// Check if a name is taken, ignoring case and optionally one record
    async fn exists_by_name(
        &self,
        name: &CircleTypeName,
        except: Option<CircleTypeId>,
    ) -> MobileResult<bool>;

    /// Replace every field; `None` if absent
    async fn update(
        &self,
        id: CircleTypeId,
        circle_type: &NewCircleType,
    ) -> MobileResult<Option<CircleType>>;

    /// Returns false if nothing was deleted
    async fn delete(&self, id: CircleTypeId) -> MobileResult<bool>;
}

/// Expense repository trait
#[trait_variant::make(ExpenseRepository: Send)]
pub trait LocalExpenseRepository {
    /// Insert an expense
    async fn create(&self, expense: &NewExpense) -> MobileResult<Expense>;

    /// Expenses ordered newest first
    async fn list(&self, filter: &ExpenseFilter, page: PageRequest) -> MobileResult<Vec<Expense>>;

    async fn find_by_id(&self, id: ExpenseId) -> MobileResult<Option<Expense>>;

    /// Replace every field; `None` if absent
    async fn update(&self, id: ExpenseId, expense: &NewExpense) -> MobileResult<Option<Expense>>;

    /// Returns false if nothing was deleted
    async fn delete(&self, id: ExpenseId) -> MobileResult<bool>;
}

/// Gallery repository trait
#[trait_variant::make(GalleryRepository: Send)]
pub trait LocalGalleryRepository {
    /// Insert a gallery item stamped with the current time
    async fn create(&self, item: &NewGalleryItem) -> MobileResult<GalleryItem>;

    /// Items ordered newest first
    async fn list(
        &self,
        filter: &GalleryFilter,
        page: PageRequest,
    ) -> MobileResult<Vec<GalleryItem>>;

    async fn find_by_id(&self, id: GalleryItemId) -> MobileResult<Option<GalleryItem>>;

    /// Replace caption, album and media; `created_at` is kept
    async fn update(
        &self,
        id: GalleryItemId,
        item: &NewGalleryItem,
    ) -> MobileResult<Option<GalleryItem>>;

    async fn delete(&self, id: GalleryItemId) -> MobileResult<bool>;
}

/// Store liveness check
#[trait_variant::make(StoreHealth: Send)]
pub trait LocalStoreHealth {
    /// Round-trip a trivial query
    async fn ping(&self) -> MobileResult<()>;
}

/// Everything the mobile router needs from one repository value
pub trait MobileRepository:
    CalendarRepository
    + CircleTypeRepository
    + ExpenseRepository
    + GalleryRepository
    + StoreHealth
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> MobileRepository for T where
    T: CalendarRepository
        + CircleTypeRepository
        + ExpenseRepository
        + GalleryRepository
        + StoreHealth
        + Clone
        + Send
        + Sync
        + 'static
{
}
