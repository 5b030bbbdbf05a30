//! Mobile Backend Module
//!
//! Routes consumed by the family mobile app, nested under `/api/mobile`.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, route schemas, router
//!
//! ## Resources
//! - Calendar events with reminders
//! - Circle types (unique names, case-insensitive)
//! - Household expenses (amounts kept in minor units)
//! - Gallery items (image / video links)
//!
//! ## Request Pipeline
//! - Every route declares a schema checked by `kernel::validation` before
//!   the handler runs (400 with per-field errors)
//! - Use cases enforce cross-field invariants (422) and uniqueness (409)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::MobileConfig;
pub use error::{MobileError, MobileResult};
pub use infra::postgres::PgMobileRepository;
pub use presentation::health::health_router;
pub use presentation::router::{mobile_router, mobile_router_generic};
