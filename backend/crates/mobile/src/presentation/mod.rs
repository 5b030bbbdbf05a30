//! Presentation Layer
//!
//! HTTP handlers, DTOs, route schemas and routers.

pub mod dto;
pub mod handlers;
pub mod health;
pub mod router;
pub mod schema;

pub use handlers::MobileAppState;
pub use health::health_router;
pub use router::{mobile_router, mobile_router_generic};
