//! In-memory storage adapters
//!
//! All repositories of one [`MemoryRepositories`] share a single
//! [`MemoryState`] behind a `tokio::sync::RwLock`. Records are stored as
//! plain values and every read assembles a fresh copy, so callers can never
//! mutate stored state except through the repository methods.

mod arena;
mod catalog_repo;
mod film_repo;
mod relation;
mod user_repo;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use filmhub_domain::{
    seed_genres, seed_mpa, Film, FilmId, Genre, GenreId, Mpa, MpaId, NewFilm, User, UserId,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{LinkMode, RepoError};

pub use arena::IdArena;
pub use catalog_repo::{MemoryGenreRepo, MemoryMpaRepo};
pub use film_repo::MemoryFilmRepo;
pub use relation::RelationStore;
pub use user_repo::MemoryUserRepo;

/// Stored user fields; links live in the relation stores.
#[derive(Debug, Clone)]
struct UserRecord {
    email: String,
    login: String,
    name: String,
    birthday: NaiveDate,
}

/// Everything the in-memory repositories hold.
#[derive(Debug)]
pub struct MemoryState {
    films: IdArena<FilmId, NewFilm>,
    users: IdArena<UserId, UserRecord>,
    likes: RelationStore<FilmId, UserId>,
    friends: RelationStore<UserId, UserId>,
    genres: BTreeMap<GenreId, Genre>,
    mpa: BTreeMap<MpaId, Mpa>,
}

impl MemoryState {
    /// Empty catalog with seeded genres and ratings.
    pub fn new(friend_links: LinkMode) -> Self {
        Self {
            films: IdArena::new(),
            users: IdArena::new(),
            likes: RelationStore::directed(),
            friends: RelationStore::with_mode(friend_links),
            genres: seed_genres().into_iter().map(|g| (g.id, g)).collect(),
            mpa: seed_mpa().into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Rejects films whose rating or genres are not reference data.
    fn check_references(&self, film: &NewFilm) -> Result<(), RepoError> {
        if !self.mpa.contains_key(&film.mpa_id) {
            return Err(RepoError::not_found("Mpa", film.mpa_id));
        }
        if let Some(missing) = film.genre_ids.iter().find(|id| !self.genres.contains_key(id)) {
            return Err(RepoError::not_found("Genre", missing));
        }
        Ok(())
    }

    fn film(&self, id: FilmId) -> Result<Option<Film>, RepoError> {
        match self.films.get(id) {
            Some(record) => self.assemble_film(id, record).map(Some),
            None => Ok(None),
        }
    }

    fn assemble_film(&self, id: FilmId, record: &NewFilm) -> Result<Film, RepoError> {
        let mpa = self
            .mpa
            .get(&record.mpa_id)
            .cloned()
            .ok_or_else(|| RepoError::not_found("Mpa", record.mpa_id))?;
        let genres = record
            .genre_ids
            .iter()
            .filter_map(|genre_id| self.genres.get(genre_id).cloned())
            .collect();

        Ok(Film {
            id,
            name: record.name.clone(),
            description: record.description.clone(),
            release_date: record.release_date,
            duration: record.duration,
            mpa,
            genres,
            likes: self.likes.targets(id),
        })
    }

    fn all_films(&self) -> Result<Vec<Film>, RepoError> {
        self.films
            .iter()
            .map(|(id, record)| self.assemble_film(id, record))
            .collect()
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.users
            .get(id)
            .map(|record| self.assemble_user(id, record))
    }

    fn assemble_user(&self, id: UserId, record: &UserRecord) -> User {
        User {
            id,
            email: record.email.clone(),
            login: record.login.clone(),
            name: record.name.clone(),
            birthday: record.birthday,
            friends: self.friends.targets(id),
            liked_films: self.likes.sources(id),
        }
    }

    fn users_by_ids(&self, ids: impl IntoIterator<Item = UserId>) -> Vec<User> {
        // Friend links are only removed explicitly, so every id resolves.
        ids.into_iter().filter_map(|id| self.user(id)).collect()
    }
}

pub type SharedState = Arc<RwLock<MemoryState>>;

/// Repository bundle over one shared in-memory state.
#[derive(Clone)]
pub struct MemoryRepositories {
    pub film: Arc<MemoryFilmRepo>,
    pub user: Arc<MemoryUserRepo>,
    pub genre: Arc<MemoryGenreRepo>,
    pub mpa: Arc<MemoryMpaRepo>,
}

impl MemoryRepositories {
    pub fn new(friend_links: LinkMode) -> Self {
        let state: SharedState = Arc::new(RwLock::new(MemoryState::new(friend_links)));
        tracing::info!(friend_links = %friend_links, "Using in-memory storage");

        Self {
            film: Arc::new(MemoryFilmRepo::new(state.clone())),
            user: Arc::new(MemoryUserRepo::new(state.clone())),
            genre: Arc::new(MemoryGenreRepo::new(state.clone())),
            mpa: Arc::new(MemoryMpaRepo::new(state)),
        }
    }
}

impl Default for MemoryRepositories {
    fn default() -> Self {
        Self::new(LinkMode::default())
    }
}
