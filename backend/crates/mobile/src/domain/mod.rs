//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entities;
pub mod repository;
pub mod value_objects;

// Re-exports
pub use entities::{CalendarEvent, CircleType, Expense, GalleryItem};
pub use repository::{
    CalendarRepository, CircleTypeRepository, ExpenseRepository, GalleryRepository,
    MobileRepository, StoreHealth,
};
