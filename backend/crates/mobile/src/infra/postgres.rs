//! PostgreSQL Repository Implementations

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::id::{CalendarEventId, CircleTypeId, ExpenseId, GalleryItemId, Id};
use platform::database::Database;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{
    CalendarEvent, CircleType, Expense, GalleryItem, NewCalendarEvent, NewCircleType, NewExpense,
    NewGalleryItem,
};
use crate::domain::repository::{
    CalendarFilter, CalendarRepository, CircleTypeRepository, ExpenseFilter, ExpenseRepository,
    GalleryFilter, GalleryRepository, PageRequest, StoreHealth,
};
use crate::domain::value_objects::{
    CircleTypeName, Currency, EventSchedule, ExpenseCategory, MediaKind, MediaUrl, Money,
    Reminders,
};
use crate::error::{MobileError, MobileResult};

/// PostgreSQL-backed mobile repository
#[derive(Clone)]
pub struct PgMobileRepository {
    db: Database,
}

impl PgMobileRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn pool(&self) -> MobileResult<&PgPool> {
        Ok(self.db.pool().await?)
    }
}

/// Turn a unique-constraint failure into a conflict
fn map_unique(err: sqlx::Error, message: impl FnOnce() -> String) -> MobileError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => MobileError::Duplicate(message()),
        _ => MobileError::Database(err),
    }
}

/// Stored value no longer satisfies its domain type
fn corrupt(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

// ============================================================================
// Circle Type Repository Implementation
// ============================================================================

const CIRCLE_TYPE_COLUMNS: &str =
    "id, name, description, max_members, created_at, updated_at";

impl CircleTypeRepository for PgMobileRepository {
    async fn create(&self, circle_type: &NewCircleType) -> MobileResult<CircleType> {
        let row = sqlx::query_as::<_, CircleTypeRow>(&format!(
            r#"
            INSERT INTO circle_types (name, name_canonical, description, max_members)
            VALUES ($1, $2, $3, $4)
            RETURNING {CIRCLE_TYPE_COLUMNS}
            "#
        ))
        .bind(circle_type.name.as_str())
        .bind(circle_type.name.canonical())
        .bind(circle_type.description.as_deref())
        .bind(circle_type.max_members)
        .fetch_one(self.pool().await?)
        .await
        .map_err(|e| {
            map_unique(e, || {
                format!("Circle type \"{}\" already exists", circle_type.name)
            })
        })?;

        Ok(row.into_circle_type())
    }

    async fn list(&self, page: PageRequest) -> MobileResult<Vec<CircleType>> {
        let rows = sqlx::query_as::<_, CircleTypeRow>(&format!(
            r#"
            SELECT {CIRCLE_TYPE_COLUMNS}
            FROM circle_types
            ORDER BY name_canonical, id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool().await?)
        .await?;

        Ok(rows.into_iter().map(CircleTypeRow::into_circle_type).collect())
    }

    async fn find_by_id(&self, id: CircleTypeId) -> MobileResult<Option<CircleType>> {
        let row = sqlx::query_as::<_, CircleTypeRow>(&format!(
            "SELECT {CIRCLE_TYPE_COLUMNS} FROM circle_types WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool().await?)
        .await?;

        Ok(row.map(CircleTypeRow::into_circle_type))
    }

    async fn exists_by_name(
        &self,
        name: &CircleTypeName,
        except: Option<CircleTypeId>,
    ) -> MobileResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM circle_types
                WHERE name_canonical = $1
                  AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name.canonical())
        .bind(except.map(|id| id.get()))
        .fetch_one(self.pool().await?)
        .await?;

        Ok(exists)
    }

    async fn update(
        &self,
        id: CircleTypeId,
        circle_type: &NewCircleType,
    ) -> MobileResult<Option<CircleType>> {
        let row = sqlx::query_as::<_, CircleTypeRow>(&format!(
            r#"
            UPDATE circle_types SET
                name = $2,
                name_canonical = $3,
                description = $4,
                max_members = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING {CIRCLE_TYPE_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(circle_type.name.as_str())
        .bind(circle_type.name.canonical())
        .bind(circle_type.description.as_deref())
        .bind(circle_type.max_members)
        .fetch_optional(self.pool().await?)
        .await
        .map_err(|e| {
            map_unique(e, || {
                format!("Circle type \"{}\" already exists", circle_type.name)
            })
        })?;

        Ok(row.map(CircleTypeRow::into_circle_type))
    }

    async fn delete(&self, id: CircleTypeId) -> MobileResult<bool> {
        let deleted = sqlx::query("DELETE FROM circle_types WHERE id = $1")
            .bind(id.get())
            .execute(self.pool().await?)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Calendar Repository Implementation
// ============================================================================

const CALENDAR_EVENT_COLUMNS: &str = "id, title, event_date, all_day, start_time, end_time, \
     location, description, created_at, updated_at";

/// Replace the reminder rows of one event inside a transaction
async fn write_reminders(
    tx: &mut Transaction<'_, Postgres>,
    event_id: i64,
    reminders: &Reminders,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM calendar_event_reminders WHERE event_id = $1")
        .bind(event_id)
        .execute(&mut **tx)
        .await?;

    if reminders.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO calendar_event_reminders (event_id, minutes_before)
        SELECT $1, minutes FROM UNNEST($2::INT4[]) AS minutes
        "#,
    )
    .bind(event_id)
    .bind(reminders.as_slice())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Load reminders for a batch of events, keyed by event id
async fn load_reminders(pool: &PgPool, event_ids: &[i64]) -> MobileResult<HashMap<i64, Vec<i32>>> {
    let mut by_event: HashMap<i64, Vec<i32>> = HashMap::new();
    if event_ids.is_empty() {
        return Ok(by_event);
    }

    let rows = sqlx::query_as::<_, (i64, i32)>(
        r#"
        SELECT event_id, minutes_before
        FROM calendar_event_reminders
        WHERE event_id = ANY($1)
        ORDER BY event_id, minutes_before
        "#,
    )
    .bind(event_ids)
    .fetch_all(pool)
    .await?;

    for (event_id, minutes) in rows {
        by_event.entry(event_id).or_default().push(minutes);
    }

    Ok(by_event)
}

impl CalendarRepository for PgMobileRepository {
    async fn create(&self, event: &NewCalendarEvent) -> MobileResult<CalendarEvent> {
        let mut tx = self.pool().await?.begin().await?;

        let row = sqlx::query_as::<_, CalendarEventRow>(&format!(
            r#"
            INSERT INTO calendar_events (
                title,
                event_date,
                all_day,
                start_time,
                end_time,
                location,
                description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CALENDAR_EVENT_COLUMNS}
            "#
        ))
        .bind(&event.title)
        .bind(event.date)
        .bind(event.schedule.is_all_day())
        .bind(event.schedule.start())
        .bind(event.schedule.end())
        .bind(event.location.as_deref())
        .bind(event.description.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        write_reminders(&mut tx, row.id, &event.reminders).await?;
        tx.commit().await?;

        Ok(row.into_event(event.reminders.clone()))
    }

    async fn list(
        &self,
        filter: &CalendarFilter,
        page: PageRequest,
    ) -> MobileResult<Vec<CalendarEvent>> {
        let pool = self.pool().await?;

        let rows = sqlx::query_as::<_, CalendarEventRow>(&format!(
            r#"
            SELECT {CALENDAR_EVENT_COLUMNS}
            FROM calendar_events
            WHERE ($1::DATE IS NULL OR event_date >= $1)
              AND ($2::DATE IS NULL OR event_date <= $2)
            ORDER BY event_date, start_time NULLS FIRST, id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.from)
        .bind(filter.to)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut reminders = load_reminders(pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let offsets = reminders.remove(&row.id).unwrap_or_default();
                row.into_event(Reminders::from_db(offsets))
            })
            .collect())
    }

    async fn find_by_id(&self, id: CalendarEventId) -> MobileResult<Option<CalendarEvent>> {
        let pool = self.pool().await?;

        let Some(row) = sqlx::query_as::<_, CalendarEventRow>(&format!(
            "SELECT {CALENDAR_EVENT_COLUMNS} FROM calendar_events WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(pool)
        .await?
        else {
            return Ok(None);
        };

        let mut reminders = load_reminders(pool, &[row.id]).await?;
        let offsets = reminders.remove(&row.id).unwrap_or_default();

        Ok(Some(row.into_event(Reminders::from_db(offsets))))
    }

    async fn update(
        &self,
        id: CalendarEventId,
        event: &NewCalendarEvent,
    ) -> MobileResult<Option<CalendarEvent>> {
        let mut tx = self.pool().await?.begin().await?;

        let row = sqlx::query_as::<_, CalendarEventRow>(&format!(
            r#"
            UPDATE calendar_events SET
                title = $2,
                event_date = $3,
                all_day = $4,
                start_time = $5,
                end_time = $6,
                location = $7,
                description = $8,
                updated_at = now()
            WHERE id = $1
            RETURNING {CALENDAR_EVENT_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(&event.title)
        .bind(event.date)
        .bind(event.schedule.is_all_day())
        .bind(event.schedule.start())
        .bind(event.schedule.end())
        .bind(event.location.as_deref())
        .bind(event.description.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back
        let Some(row) = row else {
            return Ok(None);
        };

        write_reminders(&mut tx, row.id, &event.reminders).await?;
        tx.commit().await?;

        Ok(Some(row.into_event(event.reminders.clone())))
    }

    async fn delete(&self, id: CalendarEventId) -> MobileResult<bool> {
        // Reminder rows go with the event (ON DELETE CASCADE)
        let deleted = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id.get())
            .execute(self.pool().await?)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Expense Repository Implementation
// ============================================================================

const EXPENSE_COLUMNS: &str = "id, title, amount_minor, currency, category, spent_on, paid_by, \
     note, created_at, updated_at";

impl ExpenseRepository for PgMobileRepository {
    async fn create(&self, expense: &NewExpense) -> MobileResult<Expense> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            INSERT INTO expenses (
                title,
                amount_minor,
                currency,
                category,
                spent_on,
                paid_by,
                note
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(&expense.title)
        .bind(expense.amount.minor_units())
        .bind(expense.currency.as_str())
        .bind(expense.category.code())
        .bind(expense.spent_on)
        .bind(expense.paid_by.as_deref())
        .bind(expense.note.as_deref())
        .fetch_one(self.pool().await?)
        .await?;

        row.into_expense()
    }

    async fn list(&self, filter: &ExpenseFilter, page: PageRequest) -> MobileResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE ($1::TEXT IS NULL OR category = $1)
              AND ($2::DATE IS NULL OR spent_on >= $2)
              AND ($3::DATE IS NULL OR spent_on <= $3)
              AND ($4::BIGINT IS NULL OR amount_minor = $4)
            ORDER BY spent_on DESC, id DESC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(filter.category.map(|c| c.code()))
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.amount.map(|a| a.minor_units()))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool().await?)
        .await?;

        rows.into_iter().map(ExpenseRow::into_expense).collect()
    }

    async fn find_by_id(&self, id: ExpenseId) -> MobileResult<Option<Expense>> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool().await?)
        .await?;

        row.map(ExpenseRow::into_expense).transpose()
    }

    async fn update(&self, id: ExpenseId, expense: &NewExpense) -> MobileResult<Option<Expense>> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            UPDATE expenses SET
                title = $2,
                amount_minor = $3,
                currency = $4,
                category = $5,
                spent_on = $6,
                paid_by = $7,
                note = $8,
                updated_at = now()
            WHERE id = $1
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(&expense.title)
        .bind(expense.amount.minor_units())
        .bind(expense.currency.as_str())
        .bind(expense.category.code())
        .bind(expense.spent_on)
        .bind(expense.paid_by.as_deref())
        .bind(expense.note.as_deref())
        .fetch_optional(self.pool().await?)
        .await?;

        row.map(ExpenseRow::into_expense).transpose()
    }

    async fn delete(&self, id: ExpenseId) -> MobileResult<bool> {
        let deleted = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id.get())
            .execute(self.pool().await?)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Gallery Repository Implementation
// ============================================================================

const GALLERY_ITEM_COLUMNS: &str =
    "id, media_url, media_kind, caption, album, taken_on, created_at, updated_at";

impl GalleryRepository for PgMobileRepository {
    async fn create(&self, item: &NewGalleryItem) -> MobileResult<GalleryItem> {
        let row = sqlx::query_as::<_, GalleryItemRow>(&format!(
            r#"
            INSERT INTO gallery_items (media_url, media_kind, caption, album, taken_on)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {GALLERY_ITEM_COLUMNS}
            "#
        ))
        .bind(item.media_url.as_str())
        .bind(item.media_kind.code())
        .bind(item.caption.as_deref())
        .bind(item.album.as_deref())
        .bind(item.taken_on)
        .fetch_one(self.pool().await?)
        .await?;

        row.into_item()
    }

    async fn list(
        &self,
        filter: &GalleryFilter,
        page: PageRequest,
    ) -> MobileResult<Vec<GalleryItem>> {
        let rows = sqlx::query_as::<_, GalleryItemRow>(&format!(
            r#"
            SELECT {GALLERY_ITEM_COLUMNS}
            FROM gallery_items
            WHERE ($1::TEXT IS NULL OR album = $1)
              AND ($2::TEXT IS NULL OR media_kind = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.album.as_deref())
        .bind(filter.media_kind.map(|k| k.code()))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool().await?)
        .await?;

        rows.into_iter().map(GalleryItemRow::into_item).collect()
    }

    async fn find_by_id(&self, id: GalleryItemId) -> MobileResult<Option<GalleryItem>> {
        let row = sqlx::query_as::<_, GalleryItemRow>(&format!(
            "SELECT {GALLERY_ITEM_COLUMNS} FROM gallery_items WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool().await?)
        .await?;

        row.map(GalleryItemRow::into_item).transpose()
    }

    async fn update(
        &self,
        id: GalleryItemId,
        item: &NewGalleryItem,
    ) -> MobileResult<Option<GalleryItem>> {
        let row = sqlx::query_as::<_, GalleryItemRow>(&format!(
            r#"
            UPDATE gallery_items SET
                media_url = $2,
                media_kind = $3,
                caption = $4,
                album = $5,
                taken_on = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING {GALLERY_ITEM_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(item.media_url.as_str())
        .bind(item.media_kind.code())
        .bind(item.caption.as_deref())
        .bind(item.album.as_deref())
        .bind(item.taken_on)
        .fetch_optional(self.pool().await?)
        .await?;

        row.map(GalleryItemRow::into_item).transpose()
    }

    async fn delete(&self, id: GalleryItemId) -> MobileResult<bool> {
        let deleted = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id.get())
            .execute(self.pool().await?)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Store Health
// ============================================================================

impl StoreHealth for PgMobileRepository {
    async fn ping(&self) -> MobileResult<()> {
        self.db.ping().await?;
        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CircleTypeRow {
    id: i64,
    name: String,
    description: Option<String>,
    max_members: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CircleTypeRow {
    fn into_circle_type(self) -> CircleType {
        CircleType {
            id: Id::from_db(self.id),
            name: CircleTypeName::from_db(self.name),
            description: self.description,
            max_members: self.max_members,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CalendarEventRow {
    id: i64,
    title: String,
    event_date: NaiveDate,
    all_day: bool,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    location: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CalendarEventRow {
    fn into_event(self, reminders: Reminders) -> CalendarEvent {
        let schedule = if self.all_day {
            EventSchedule::AllDay
        } else {
            EventSchedule::Timed {
                start: self.start_time,
                end: self.end_time,
            }
        };

        CalendarEvent {
            id: Id::from_db(self.id),
            title: self.title,
            date: self.event_date,
            schedule,
            location: self.location,
            description: self.description,
            reminders,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: i64,
    title: String,
    amount_minor: i64,
    currency: String,
    category: String,
    spent_on: NaiveDate,
    paid_by: Option<String>,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExpenseRow {
    fn into_expense(self) -> MobileResult<Expense> {
        let amount = Money::from_minor_units(self.amount_minor).map_err(corrupt)?;
        let category = self.category.parse::<ExpenseCategory>().map_err(corrupt)?;

        Ok(Expense {
            id: Id::from_db(self.id),
            title: self.title,
            amount,
            currency: Currency::from_db(self.currency),
            category,
            spent_on: self.spent_on,
            paid_by: self.paid_by,
            note: self.note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct GalleryItemRow {
    id: i64,
    media_url: String,
    media_kind: String,
    caption: Option<String>,
    album: Option<String>,
    taken_on: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GalleryItemRow {
    fn into_item(self) -> MobileResult<GalleryItem> {
        let media_kind = self.media_kind.parse::<MediaKind>().map_err(corrupt)?;

        Ok(GalleryItem {
            id: Id::from_db(self.id),
            media_url: MediaUrl::from_db(self.media_url),
            media_kind,
            caption: self.caption,
            album: self.album,
            taken_on: self.taken_on,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
