//! Filmhub Engine - storage adapters, use cases and the HTTP surface.

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
