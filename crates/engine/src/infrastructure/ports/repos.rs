//! Repository port traits for storage access.
//!
//! Every implementation returns owned values. Nothing handed out by a
//! repository aliases stored state, and the only way to change stored state
//! is through these methods.

use async_trait::async_trait;
use filmhub_domain::{Film, FilmId, Genre, GenreId, Mpa, MpaId, NewFilm, NewUser, User, UserId};

use super::error::RepoError;

// =============================================================================
// Catalog Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilmRepo: Send + Sync {
    // CRUD
    /// Unknown and non-positive ids report `false`.
    async fn exists(&self, id: FilmId) -> Result<bool, RepoError>;
    async fn get(&self, id: FilmId) -> Result<Option<Film>, RepoError>;
    async fn list_all(&self) -> Result<Vec<Film>, RepoError>;
    /// Assigns the next id: one greater than the current maximum, or 1.
    async fn save(&self, film: &NewFilm) -> Result<Film, RepoError>;
    /// Overwrites every mutable field and replaces the genre set.
    async fn update(&self, id: FilmId, film: &NewFilm) -> Result<Film, RepoError>;

    // Likes
    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), RepoError>;
    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), RepoError>;

    // Ranking
    /// Descending like count; equal counts keep ascending id order.
    async fn most_popular(&self, limit: usize) -> Result<Vec<Film>, RepoError>;
}

// =============================================================================
// Social Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    // CRUD
    async fn exists(&self, id: UserId) -> Result<bool, RepoError>;
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn list_all(&self) -> Result<Vec<User>, RepoError>;
    async fn save(&self, user: &NewUser) -> Result<User, RepoError>;
    async fn update(&self, id: UserId, user: &NewUser) -> Result<User, RepoError>;

    // Friend links, recorded according to the store's LinkMode
    async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), RepoError>;
    async fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), RepoError>;

    // Queries
    async fn friends_of(&self, id: UserId) -> Result<Vec<User>, RepoError>;
    async fn mutual_friends(&self, id: UserId, other_id: UserId) -> Result<Vec<User>, RepoError>;
}

// =============================================================================
// Reference Data (read-only)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepo: Send + Sync {
    async fn exists(&self, id: GenreId) -> Result<bool, RepoError>;
    async fn get(&self, id: GenreId) -> Result<Option<Genre>, RepoError>;
    async fn list_all(&self) -> Result<Vec<Genre>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MpaRepo: Send + Sync {
    async fn exists(&self, id: MpaId) -> Result<bool, RepoError>;
    async fn get(&self, id: MpaId) -> Result<Option<Mpa>, RepoError>;
    async fn list_all(&self) -> Result<Vec<Mpa>, RepoError>;
}
