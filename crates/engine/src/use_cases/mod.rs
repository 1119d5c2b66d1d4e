//! Use cases - user story orchestration over the storage ports.
//!
//! - [`Popularity`]: films, likes and the popularity ranking
//! - [`SocialGraph`]: users and friendships
//! - [`Catalog`]: genre and rating lookups

pub mod catalog;
pub mod error;
pub mod popularity;
pub mod social;
pub mod validation;

pub use catalog::Catalog;
pub use error::ServiceError;
pub use popularity::{Popularity, DEFAULT_POPULAR_LIMIT};
pub use social::SocialGraph;

#[cfg(test)]
mod backend_tests;
