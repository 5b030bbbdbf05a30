//! Application Layer
//!
//! Use cases and application services.

pub mod calendar;
pub mod circle_type;
pub mod common;
pub mod config;
pub mod expense;
pub mod gallery;

// Re-exports
pub use calendar::{CalendarEventInput, CalendarListInput, CalendarUseCase};
pub use circle_type::{CircleTypeInput, CircleTypeUseCase};
pub use common::Page;
pub use config::MobileConfig;
pub use expense::{ExpenseInput, ExpenseListInput, ExpenseUseCase};
pub use gallery::{GalleryItemInput, GalleryListInput, GalleryUseCase};
