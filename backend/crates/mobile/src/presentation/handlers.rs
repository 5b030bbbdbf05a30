//! HTTP Handlers
//!
//! Every handler runs behind its route's validation gate; what arrives here
//! has the declared shape.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::id::markers;
use kernel::validation::{Params, PathId, Payload};
use std::sync::Arc;

use crate::application::config::MobileConfig;
use crate::application::{
    CalendarUseCase, CircleTypeUseCase, ExpenseUseCase, GalleryUseCase, Page,
};
use crate::domain::repository::MobileRepository;
use crate::error::MobileResult;
use crate::presentation::dto::{
    CalendarEventRequest, CalendarEventResponse, CalendarQuery, CircleTypeRequest,
    CircleTypeResponse, ExpenseQuery, ExpenseRequest, ExpenseResponse, GalleryItemRequest,
    GalleryItemResponse, GalleryQuery, PageQuery,
};

/// Shared state for mobile handlers
#[derive(Clone)]
pub struct MobileAppState<R>
where
    R: MobileRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<MobileConfig>,
}

// ============================================================================
// Calendar
// ============================================================================

/// GET /api/mobile/calendar
pub async fn list_calendar_events<R>(
    State(state): State<MobileAppState<R>>,
    Params(query): Params<CalendarQuery>,
) -> MobileResult<Json<Page<CalendarEventResponse>>>
where
    R: MobileRepository,
{
    let use_case = CalendarUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case.list(query.into()).await?;

    Ok(Json(page.map(CalendarEventResponse::from)))
}

/// POST /api/mobile/calendar
pub async fn create_calendar_event<R>(
    State(state): State<MobileAppState<R>>,
    Payload(req): Payload<CalendarEventRequest>,
) -> MobileResult<(StatusCode, Json<CalendarEventResponse>)>
where
    R: MobileRepository,
{
    let use_case = CalendarUseCase::new(state.repo.clone(), state.config.clone());
    let event = use_case.create(req.into()).await?;

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// GET /api/mobile/calendar/{id}
pub async fn get_calendar_event<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::CalendarEvent>,
) -> MobileResult<Json<CalendarEventResponse>>
where
    R: MobileRepository,
{
    let use_case = CalendarUseCase::new(state.repo.clone(), state.config.clone());
    let event = use_case.get(id).await?;

    Ok(Json(event.into()))
}

/// PUT /api/mobile/calendar/{id}
pub async fn update_calendar_event<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::CalendarEvent>,
    Payload(req): Payload<CalendarEventRequest>,
) -> MobileResult<Json<CalendarEventResponse>>
where
    R: MobileRepository,
{
    let use_case = CalendarUseCase::new(state.repo.clone(), state.config.clone());
    let event = use_case.update(id, req.into()).await?;

    Ok(Json(event.into()))
}

/// DELETE /api/mobile/calendar/{id}
pub async fn delete_calendar_event<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::CalendarEvent>,
) -> MobileResult<StatusCode>
where
    R: MobileRepository,
{
    let use_case = CalendarUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Circle Types
// ============================================================================

/// GET /api/mobile/circle-types
pub async fn list_circle_types<R>(
    State(state): State<MobileAppState<R>>,
    Params(query): Params<PageQuery>,
) -> MobileResult<Json<Page<CircleTypeResponse>>>
where
    R: MobileRepository,
{
    let use_case = CircleTypeUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case.list(query.limit, query.offset).await?;

    Ok(Json(page.map(CircleTypeResponse::from)))
}

/// POST /api/mobile/circle-types
pub async fn create_circle_type<R>(
    State(state): State<MobileAppState<R>>,
    Payload(req): Payload<CircleTypeRequest>,
) -> MobileResult<(StatusCode, Json<CircleTypeResponse>)>
where
    R: MobileRepository,
{
    let use_case = CircleTypeUseCase::new(state.repo.clone(), state.config.clone());
    let circle_type = use_case.create(req.into()).await?;

    Ok((StatusCode::CREATED, Json(circle_type.into())))
}

/// GET /api/mobile/circle-types/{id}
pub async fn get_circle_type<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::CircleType>,
) -> MobileResult<Json<CircleTypeResponse>>
where
    R: MobileRepository,
{
    let use_case = CircleTypeUseCase::new(state.repo.clone(), state.config.clone());
    let circle_type = use_case.get(id).await?;

    Ok(Json(circle_type.into()))
}

/// PUT /api/mobile/circle-types/{id}
pub async fn update_circle_type<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::CircleType>,
    Payload(req): Payload<CircleTypeRequest>,
) -> MobileResult<Json<CircleTypeResponse>>
where
    R: MobileRepository,
{
    let use_case = CircleTypeUseCase::new(state.repo.clone(), state.config.clone());
    let circle_type = use_case.update(id, req.into()).await?;

    Ok(Json(circle_type.into()))
}

/// DELETE /api/mobile/circle-types/{id}
pub async fn delete_circle_type<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::CircleType>,
) -> MobileResult<StatusCode>
where
    R: MobileRepository,
{
    let use_case = CircleTypeUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Expenses
// ============================================================================

/// GET /api/mobile/expenses
pub async fn list_expenses<R>(
    State(state): State<MobileAppState<R>>,
    Params(query): Params<ExpenseQuery>,
) -> MobileResult<Json<Page<ExpenseResponse>>>
where
    R: MobileRepository,
{
    let use_case = ExpenseUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case.list(query.into()).await?;

    Ok(Json(page.map(ExpenseResponse::from)))
}

/// POST /api/mobile/expenses
pub async fn create_expense<R>(
    State(state): State<MobileAppState<R>>,
    Payload(req): Payload<ExpenseRequest>,
) -> MobileResult<(StatusCode, Json<ExpenseResponse>)>
where
    R: MobileRepository,
{
    let use_case = ExpenseUseCase::new(state.repo.clone(), state.config.clone());
    let expense = use_case.create(req.into()).await?;

    Ok((StatusCode::CREATED, Json(expense.into())))
}

/// GET /api/mobile/expenses/{id}
pub async fn get_expense<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::Expense>,
) -> MobileResult<Json<ExpenseResponse>>
where
    R: MobileRepository,
{
    let use_case = ExpenseUseCase::new(state.repo.clone(), state.config.clone());
    let expense = use_case.get(id).await?;

    Ok(Json(expense.into()))
}

/// PUT /api/mobile/expenses/{id}
pub async fn update_expense<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::Expense>,
    Payload(req): Payload<ExpenseRequest>,
) -> MobileResult<Json<ExpenseResponse>>
where
    R: MobileRepository,
{
    let use_case = ExpenseUseCase::new(state.repo.clone(), state.config.clone());
    let expense = use_case.update(id, req.into()).await?;

    Ok(Json(expense.into()))
}

/// DELETE /api/mobile/expenses/{id}
pub async fn delete_expense<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::Expense>,
) -> MobileResult<StatusCode>
where
    R: MobileRepository,
{
    let use_case = ExpenseUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Gallery
// ============================================================================

/// GET /api/mobile/gallery
pub async fn list_gallery_items<R>(
    State(state): State<MobileAppState<R>>,
    Params(query): Params<GalleryQuery>,
) -> MobileResult<Json<Page<GalleryItemResponse>>>
where
    R: MobileRepository,
{
    let use_case = GalleryUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case.list(query.into()).await?;

    Ok(Json(page.map(GalleryItemResponse::from)))
}

/// POST /api/mobile/gallery
pub async fn create_gallery_item<R>(
    State(state): State<MobileAppState<R>>,
    Payload(req): Payload<GalleryItemRequest>,
) -> MobileResult<(StatusCode, Json<GalleryItemResponse>)>
where
    R: MobileRepository,
{
    let use_case = GalleryUseCase::new(state.repo.clone(), state.config.clone());
    let item = use_case.create(req.into()).await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /api/mobile/gallery/{id}
pub async fn get_gallery_item<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::GalleryItem>,
) -> MobileResult<Json<GalleryItemResponse>>
where
    R: MobileRepository,
{
    let use_case = GalleryUseCase::new(state.repo.clone(), state.config.clone());
    let item = use_case.get(id).await?;

    Ok(Json(item.into()))
}

/// PUT /api/mobile/gallery/{id}
pub async fn update_gallery_item<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::GalleryItem>,
    Payload(req): Payload<GalleryItemRequest>,
) -> MobileResult<Json<GalleryItemResponse>>
where
    R: MobileRepository,
{
    let use_case = GalleryUseCase::new(state.repo.clone(), state.config.clone());
    let item = use_case.update(id, req.into()).await?;

    Ok(Json(item.into()))
}

/// DELETE /api/mobile/gallery/{id}
pub async fn delete_gallery_item<R>(
    State(state): State<MobileAppState<R>>,
    PathId(id): PathId<markers::GalleryItem>,
) -> MobileResult<StatusCode>
where
    R: MobileRepository,
{
    let use_case = GalleryUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
