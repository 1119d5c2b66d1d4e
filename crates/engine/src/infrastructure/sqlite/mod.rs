//! SQLite storage adapters.
//!
//! Ids are `INTEGER PRIMARY KEY` rowids without `AUTOINCREMENT`, so SQLite
//! assigns one more than the largest id in the table (1 when empty).

mod catalog_repo;
mod film_repo;
mod user_repo;

use std::sync::Arc;

use filmhub_domain::{seed_genres, seed_mpa};
use sqlx::SqlitePool;

use crate::infrastructure::ports::{LinkMode, RepoError};

pub use catalog_repo::{SqliteGenreRepo, SqliteMpaRepo};
pub use film_repo::SqliteFilmRepo;
pub use user_repo::SqliteUserRepo;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS mpa (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS films (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        release_date TEXT NOT NULL,
        duration INTEGER NOT NULL,
        mpa_id INTEGER NOT NULL REFERENCES mpa(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS films_genres (
        film_id INTEGER NOT NULL REFERENCES films(id),
        genre_id INTEGER NOT NULL REFERENCES genres(id),
        PRIMARY KEY (film_id, genre_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        email TEXT NOT NULL,
        login TEXT NOT NULL,
        name TEXT NOT NULL,
        birthday TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS films_likes (
        film_id INTEGER NOT NULL REFERENCES films(id),
        user_id INTEGER NOT NULL,
        PRIMARY KEY (film_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users_friends (
        user_id INTEGER NOT NULL REFERENCES users(id),
        friend_id INTEGER NOT NULL REFERENCES users(id),
        PRIMARY KEY (user_id, friend_id)
    )
    "#,
];

/// Repository bundle over one SQLite connection pool.
#[derive(Clone)]
pub struct SqliteRepositories {
    pub film: Arc<SqliteFilmRepo>,
    pub user: Arc<SqliteUserRepo>,
    pub genre: Arc<SqliteGenreRepo>,
    pub mpa: Arc<SqliteMpaRepo>,
}

impl SqliteRepositories {
    /// Opens the database, creating tables and reference rows when missing.
    pub async fn connect(database_url: &str, friend_links: LinkMode) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        migrate(&pool).await?;
        tracing::info!(
            database_url = %database_url,
            friend_links = %friend_links,
            "Using SQLite storage"
        );

        Ok(Self {
            film: Arc::new(SqliteFilmRepo::new(pool.clone())),
            user: Arc::new(SqliteUserRepo::new(pool.clone(), friend_links)),
            genre: Arc::new(SqliteGenreRepo::new(pool.clone())),
            mpa: Arc::new(SqliteMpaRepo::new(pool)),
        })
    }
}

async fn migrate(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("migrate", e))?;
    }

    for mpa in seed_mpa() {
        sqlx::query("INSERT OR IGNORE INTO mpa (id, name) VALUES (?, ?)")
            .bind(mpa.id.get())
            .bind(&mpa.name)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("seed_mpa", e))?;
    }

    for genre in seed_genres() {
        sqlx::query("INSERT OR IGNORE INTO genres (id, name) VALUES (?, ?)")
            .bind(genre.id.get())
            .bind(&genre.name)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("seed_genres", e))?;
    }

    Ok(())
}

/// Opens a fresh database file inside `dir`.
#[cfg(test)]
pub(crate) async fn open_temp(dir: &tempfile::TempDir, friend_links: LinkMode) -> SqliteRepositories {
    let path = dir.path().join("filmhub.db");
    let url = format!("sqlite:{}?mode=rwc", path.to_string_lossy());
    SqliteRepositories::connect(&url, friend_links)
        .await
        .expect("open sqlite database")
}
