//! Filmhub domain types.
//!
//! Plain data carriers for films, users, genres and rating classifications,
//! plus the typed identifiers storage assigns to them.

extern crate self as filmhub_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    seed_genres, seed_mpa, Film, FilmDraft, Genre, GenreRef, Mpa, MpaRef, NewFilm, NewUser,
    User, UserDraft, MAX_DESCRIPTION_LENGTH, RELEASE_DATE_FLOOR,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{FilmId, GenreId, MpaId, SequentialId, UserId};
