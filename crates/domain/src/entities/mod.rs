//! Domain entities
//!
//! Films and users are created and updated through the engine's use cases;
//! genres and ratings are seeded reference data.

mod film;
mod genre;
mod mpa;
mod user;

pub use film::{Film, FilmDraft, NewFilm, MAX_DESCRIPTION_LENGTH, RELEASE_DATE_FLOOR};
pub use genre::{seed_genres, Genre, GenreRef};
pub use mpa::{seed_mpa, Mpa, MpaRef};
pub use user::{NewUser, User, UserDraft};
