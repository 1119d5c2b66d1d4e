//! SQLite genre and rating lookups.

use async_trait::async_trait;
use filmhub_domain::{Genre, GenreId, Mpa, MpaId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::infrastructure::ports::{GenreRepo, MpaRepo, RepoError};

fn genre_from_row(row: &SqliteRow) -> Result<Genre, RepoError> {
    let decode = |e: sqlx::Error| RepoError::database("genres.decode", e);
    Ok(Genre::new(
        GenreId::new(row.try_get("id").map_err(decode)?),
        row.try_get::<String, _>("name").map_err(decode)?,
    ))
}

fn mpa_from_row(row: &SqliteRow) -> Result<Mpa, RepoError> {
    let decode = |e: sqlx::Error| RepoError::database("mpa.decode", e);
    Ok(Mpa::new(
        MpaId::new(row.try_get("id").map_err(decode)?),
        row.try_get::<String, _>("name").map_err(decode)?,
    ))
}

pub struct SqliteGenreRepo {
    pool: SqlitePool,
}

impl SqliteGenreRepo {
    pub(super) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreRepo for SqliteGenreRepo {
    async fn exists(&self, id: GenreId) -> Result<bool, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres WHERE id = ?")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("genres.exists", e))?;
        Ok(count > 0)
    }

    async fn get(&self, id: GenreId) -> Result<Option<Genre>, RepoError> {
        let row = sqlx::query("SELECT id, name FROM genres WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("genres.get", e))?;

        row.as_ref().map(genre_from_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Genre>, RepoError> {
        let rows = sqlx::query("SELECT id, name FROM genres ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("genres.list_all", e))?;

        rows.iter().map(genre_from_row).collect()
    }
}

pub struct SqliteMpaRepo {
    pool: SqlitePool,
}

impl SqliteMpaRepo {
    pub(super) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MpaRepo for SqliteMpaRepo {
    async fn exists(&self, id: MpaId) -> Result<bool, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mpa WHERE id = ?")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("mpa.exists", e))?;
        Ok(count > 0)
    }

    async fn get(&self, id: MpaId) -> Result<Option<Mpa>, RepoError> {
        let row = sqlx::query("SELECT id, name FROM mpa WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("mpa.get", e))?;

        row.as_ref().map(mpa_from_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Mpa>, RepoError> {
        let rows = sqlx::query("SELECT id, name FROM mpa ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("mpa.list_all", e))?;

        rows.iter().map(mpa_from_row).collect()
    }
}
