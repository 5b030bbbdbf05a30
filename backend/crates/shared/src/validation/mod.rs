//! Request Validation
//!
//! Declarative, per-route validation of path parameters, query parameters and
//! JSON bodies:
//!
//! - [`Rule`]: one constraint on one field
//! - [`RouteSchema`]: ordered fields and their rules for a route
//! - [`ValidationErrors`]: every violation found, converted into a 400
//!   [`AppError`](crate::error::app_error::AppError) with an `errors` list
//! - `gate` (feature `axum`): middleware that runs a schema before the handler

pub mod lenient;
pub mod report;
pub mod rule;
pub mod schema;

#[cfg(feature = "axum")]
pub mod extract;
#[cfg(feature = "axum")]
pub mod gate;

pub use report::{Location, ValidationErrors, Violation};
pub use rule::{Rule, parse_decimal, significant_scale};
pub use schema::{BodyInput, RequestInput, RouteSchema};

#[cfg(feature = "axum")]
pub use extract::{Params, PathId, Payload};
#[cfg(feature = "axum")]
pub use gate::{MAX_BODY_BYTES, validation_gate, with_schema};
