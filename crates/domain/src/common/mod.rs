//! Common utility functions shared across the domain and engine crates.
//!
//! Pure functions only - no side effects, no I/O.

pub mod string;

// Re-export commonly used functions at crate root for convenience
pub use string::{is_blank, or_fallback};
