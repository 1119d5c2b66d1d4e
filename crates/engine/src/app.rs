//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    memory::MemoryRepositories,
    ports::{ClockPort, FilmRepo, GenreRepo, MpaRepo, UserRepo},
    sqlite::SqliteRepositories,
};
use crate::use_cases::{Catalog, Popularity, SocialGraph};

/// Main application state.
///
/// Holds the use cases built over the storage ports.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Storage ports, whichever adapter backs them.
#[derive(Clone)]
pub struct Repositories {
    pub film: Arc<dyn FilmRepo>,
    pub user: Arc<dyn UserRepo>,
    pub genre: Arc<dyn GenreRepo>,
    pub mpa: Arc<dyn MpaRepo>,
}

impl From<MemoryRepositories> for Repositories {
    fn from(repos: MemoryRepositories) -> Self {
        Self {
            film: repos.film,
            user: repos.user,
            genre: repos.genre,
            mpa: repos.mpa,
        }
    }
}

impl From<SqliteRepositories> for Repositories {
    fn from(repos: SqliteRepositories) -> Self {
        Self {
            film: repos.film,
            user: repos.user,
            genre: repos.genre,
            mpa: repos.mpa,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub popularity: Popularity,
    pub social: SocialGraph,
    pub catalog: Catalog,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repositories: impl Into<Repositories>, clock: Arc<dyn ClockPort>) -> Self {
        let repositories = repositories.into();

        let use_cases = UseCases {
            popularity: Popularity::new(
                repositories.film.clone(),
                repositories.user.clone(),
                repositories.genre.clone(),
                repositories.mpa.clone(),
            ),
            social: SocialGraph::new(repositories.user, clock),
            catalog: Catalog::new(repositories.genre, repositories.mpa),
        };

        Self { use_cases }
    }
}
