//! Calendar Use Case
//!
//! Family calendar events with optional times and reminders.

use std::sync::Arc;

use kernel::id::CalendarEventId;

use crate::application::common::{
    Page, optional_text, parse_date, parse_date_range, parse_optional_time, required_text,
};
use crate::application::config::MobileConfig;
use crate::domain::entities::{CalendarEvent, NewCalendarEvent};
use crate::domain::repository::{CalendarFilter, CalendarRepository};
use crate::domain::value_objects::{EventSchedule, Reminders};
use crate::error::{MobileError, MobileResult};

/// Create / replace input
#[derive(Debug, Clone, Default)]
pub struct CalendarEventInput {
    pub title: String,
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub all_day: bool,
    pub location: Option<String>,
    pub description: Option<String>,
    pub reminders: Vec<i64>,
}

impl CalendarEventInput {
    fn into_new(self) -> MobileResult<NewCalendarEvent> {
        let title = required_text("title", &self.title, 120)?;
        let date = parse_date("date", &self.date)?;
        let start = parse_optional_time("startTime", self.start_time.as_deref())?;
        let end = parse_optional_time("endTime", self.end_time.as_deref())?;
        let schedule = EventSchedule::new(self.all_day, start, end)
            .map_err(|e| MobileError::invalid(e.field(), e))?;
        let location = optional_text("location", self.location.as_deref(), 200)?;
        let description = optional_text("description", self.description.as_deref(), 2000)?;
        let reminders =
            Reminders::new(self.reminders).map_err(|e| MobileError::invalid("reminders", e))?;

        Ok(NewCalendarEvent {
            title,
            date,
            schedule,
            location,
            description,
            reminders,
        })
    }
}

/// List input
#[derive(Debug, Clone, Default)]
pub struct CalendarListInput {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Calendar use case
pub struct CalendarUseCase<R>
where
    R: CalendarRepository,
{
    repo: Arc<R>,
    config: Arc<MobileConfig>,
}

impl<R> CalendarUseCase<R>
where
    R: CalendarRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<MobileConfig>) -> Self {
        Self { repo, config }
    }

    /// Validate the schedule and reminders, then store the event
    pub async fn create(&self, input: CalendarEventInput) -> MobileResult<CalendarEvent> {
        let new_event = input.into_new()?;
        let event = self.repo.create(&new_event).await?;

        tracing::info!(
            event_id = %event.id,
            date = %event.date,
            reminders = event.reminders.as_slice().len(),
            "Calendar event created"
        );

        Ok(event)
    }

    /// List events in a date window
    ///
    /// `from` after `to` is rejected as an invalid `to` field.
    pub async fn list(&self, input: CalendarListInput) -> MobileResult<Page<CalendarEvent>> {
        let (from, to) = parse_date_range(input.from.as_deref(), input.to.as_deref())?;
        let page = self.config.page(input.limit, input.offset);
        let items = self.repo.list(&CalendarFilter { from, to }, page).await?;
        Ok(Page::new(items, page))
    }

    pub async fn get(&self, id: CalendarEventId) -> MobileResult<CalendarEvent> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| MobileError::not_found("Calendar event", id))
    }

    /// Full replacement, reminders included
    pub async fn update(
        &self,
        id: CalendarEventId,
        input: CalendarEventInput,
    ) -> MobileResult<CalendarEvent> {
        let new_event = input.into_new()?;
        let event = self
            .repo
            .update(id, &new_event)
            .await?
            .ok_or_else(|| MobileError::not_found("Calendar event", id))?;

        tracing::info!(event_id = %event.id, "Calendar event updated");

        Ok(event)
    }

    /// Delete an event; its reminders go with it
    pub async fn delete(&self, id: CalendarEventId) -> MobileResult<()> {
        if !self.repo.delete(id).await? {
            return Err(MobileError::not_found("Calendar event", id));
        }

        tracing::info!(event_id = %id, "Calendar event deleted");

        Ok(())
    }
}
