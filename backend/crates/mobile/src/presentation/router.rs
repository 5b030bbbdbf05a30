//! Mobile Router
//!
//! Each method on a path carries its own schema; `.route` on an existing
//! path merges the method routers.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use kernel::validation::with_schema;
use std::sync::Arc;

use crate::application::config::MobileConfig;
use crate::domain::repository::MobileRepository;
use crate::infra::postgres::PgMobileRepository;
use crate::presentation::handlers::{self, MobileAppState};
use crate::presentation::schema;

/// Create the mobile router with PostgreSQL repository
pub fn mobile_router(repo: PgMobileRepository, config: MobileConfig) -> Router {
    mobile_router_generic(repo, config)
}

/// Create a generic mobile router for any repository implementation
pub fn mobile_router_generic<R>(repo: R, config: MobileConfig) -> Router
where
    R: MobileRepository,
{
    let state = MobileAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        // Calendar
        .route(
            "/calendar",
            with_schema(
                get(handlers::list_calendar_events::<R>),
                schema::list_calendar_events(),
            ),
        )
        .route(
            "/calendar",
            with_schema(
                post(handlers::create_calendar_event::<R>),
                schema::create_calendar_event(),
            ),
        )
        .route(
            "/calendar/{id}",
            with_schema(
                get(handlers::get_calendar_event::<R>),
                schema::get_calendar_event(),
            ),
        )
        .route(
            "/calendar/{id}",
            with_schema(
                put(handlers::update_calendar_event::<R>),
                schema::update_calendar_event(),
            ),
        )
        .route(
            "/calendar/{id}",
            with_schema(
                delete(handlers::delete_calendar_event::<R>),
                schema::delete_calendar_event(),
            ),
        )
        // Circle types
        .route(
            "/circle-types",
            with_schema(
                get(handlers::list_circle_types::<R>),
                schema::list_circle_types(),
            ),
        )
        .route(
            "/circle-types",
            with_schema(
                post(handlers::create_circle_type::<R>),
                schema::create_circle_type(),
            ),
        )
        .route(
            "/circle-types/{id}",
            with_schema(
                get(handlers::get_circle_type::<R>),
                schema::get_circle_type(),
            ),
        )
        .route(
            "/circle-types/{id}",
            with_schema(
                put(handlers::update_circle_type::<R>),
                schema::update_circle_type(),
            ),
        )
        .route(
            "/circle-types/{id}",
            with_schema(
                delete(handlers::delete_circle_type::<R>),
                schema::delete_circle_type(),
            ),
        )
        // Expenses
        .route(
            "/expenses",
            with_schema(get(handlers::list_expenses::<R>), schema::list_expenses()),
        )
        .route(
            "/expenses",
            with_schema(post(handlers::create_expense::<R>), schema::create_expense()),
        )
        .route(
            "/expenses/{id}",
            with_schema(get(handlers::get_expense::<R>), schema::get_expense()),
        )
        .route(
            "/expenses/{id}",
            with_schema(put(handlers::update_expense::<R>), schema::update_expense()),
        )
        .route(
            "/expenses/{id}",
            with_schema(delete(handlers::delete_expense::<R>), schema::delete_expense()),
        )
        // Gallery
        .route(
            "/gallery",
            with_schema(
                get(handlers::list_gallery_items::<R>),
                schema::list_gallery_items(),
            ),
        )
        .route(
            "/gallery",
            with_schema(
                post(handlers::create_gallery_item::<R>),
                schema::create_gallery_item(),
            ),
        )
        .route(
            "/gallery/{id}",
            with_schema(
                get(handlers::get_gallery_item::<R>),
                schema::get_gallery_item(),
            ),
        )
        .route(
            "/gallery/{id}",
            with_schema(
                put(handlers::update_gallery_item::<R>),
                schema::update_gallery_item(),
            ),
        )
        .route(
            "/gallery/{id}",
            with_schema(
                delete(handlers::delete_gallery_item::<R>),
                schema::delete_gallery_item(),
            ),
        )
        .with_state(state)
}
