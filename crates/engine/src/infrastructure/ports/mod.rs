//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Storage access (in-memory or SQLite)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{FilmRepo, GenreRepo, MpaRepo, UserRepo};

// =============================================================================
// Types from types module (re-export for visibility)
// =============================================================================
pub use types::LinkMode;

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockFilmRepo, MockGenreRepo, MockMpaRepo, MockUserRepo};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
