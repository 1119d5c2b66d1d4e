//! SQLite film repository.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use filmhub_domain::{Film, FilmId, Genre, GenreId, Mpa, MpaId, NewFilm, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::infrastructure::ports::{FilmRepo, RepoError};

const SELECT_FILM: &str = r#"
    SELECT f.id, f.name, f.description, f.release_date, f.duration,
           f.mpa_id, m.name AS mpa_name
    FROM films f
    JOIN mpa m ON m.id = f.mpa_id
"#;

pub struct SqliteFilmRepo {
    pool: SqlitePool,
}

impl SqliteFilmRepo {
    pub(super) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Builds a film from a `SELECT_FILM` row, loading its genres and likes.
    async fn hydrate(&self, row: &SqliteRow) -> Result<Film, RepoError> {
        let decode = |e: sqlx::Error| RepoError::database("films.decode", e);
        let id = FilmId::new(row.try_get("id").map_err(decode)?);
        let release_date: NaiveDate = row.try_get("release_date").map_err(decode)?;

        let genres = sqlx::query(
            r#"
            SELECT g.id, g.name
            FROM films_genres fg
            JOIN genres g ON g.id = fg.genre_id
            WHERE fg.film_id = ?
            ORDER BY g.id ASC
            "#,
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("films.genres", e))?
        .iter()
        .map(|g| {
            Ok(Genre::new(
                GenreId::new(g.try_get("id").map_err(decode)?),
                g.try_get::<String, _>("name").map_err(decode)?,
            ))
        })
        .collect::<Result<Vec<_>, RepoError>>()?;

        let likes = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM films_likes WHERE film_id = ? ORDER BY user_id",
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("films.likes", e))?
        .into_iter()
        .map(UserId::new)
        .collect::<BTreeSet<_>>();

        Ok(Film {
            id,
            name: row.try_get("name").map_err(decode)?,
            description: row.try_get("description").map_err(decode)?,
            release_date,
            duration: row.try_get("duration").map_err(decode)?,
            mpa: Mpa::new(
                MpaId::new(row.try_get("mpa_id").map_err(decode)?),
                row.try_get::<String, _>("mpa_name").map_err(decode)?,
            ),
            genres,
            likes,
        })
    }

    async fn hydrate_all(&self, rows: Vec<SqliteRow>) -> Result<Vec<Film>, RepoError> {
        let mut films = Vec::with_capacity(rows.len());
        for row in &rows {
            films.push(self.hydrate(row).await?);
        }
        Ok(films)
    }

    async fn fetch_saved(&self, id: FilmId) -> Result<Film, RepoError> {
        self.get(id)
            .await?
            .ok_or_else(|| RepoError::not_found("Film", id))
    }
}

/// Rejects films whose rating or genres are missing from reference tables.
async fn check_references(conn: &mut SqliteConnection, film: &NewFilm) -> Result<(), RepoError> {
    let mpa_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mpa WHERE id = ?")
        .bind(film.mpa_id.get())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepoError::database("films.check_mpa", e))?;
    if mpa_count == 0 {
        return Err(RepoError::not_found("Mpa", film.mpa_id));
    }

    for genre_id in &film.genre_ids {
        let genre_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres WHERE id = ?")
            .bind(genre_id.get())
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| RepoError::database("films.check_genres", e))?;
        if genre_count == 0 {
            return Err(RepoError::not_found("Genre", genre_id));
        }
    }
    Ok(())
}

/// Swaps the stored genre set of `film_id` for `genre_ids`.
async fn replace_genres(
    conn: &mut SqliteConnection,
    film_id: FilmId,
    genre_ids: &[GenreId],
) -> Result<(), RepoError> {
    sqlx::query("DELETE FROM films_genres WHERE film_id = ?")
        .bind(film_id.get())
        .execute(&mut *conn)
        .await
        .map_err(|e| RepoError::database("films.clear_genres", e))?;

    for genre_id in genre_ids {
        sqlx::query("INSERT OR IGNORE INTO films_genres (film_id, genre_id) VALUES (?, ?)")
            .bind(film_id.get())
            .bind(genre_id.get())
            .execute(&mut *conn)
            .await
            .map_err(|e| RepoError::database("films.add_genre", e))?;
    }
    Ok(())
}

#[async_trait]
impl FilmRepo for SqliteFilmRepo {
    async fn exists(&self, id: FilmId) -> Result<bool, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM films WHERE id = ?")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("films.exists", e))?;
        Ok(count > 0)
    }

    async fn get(&self, id: FilmId) -> Result<Option<Film>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_FILM} WHERE f.id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("films.get", e))?;

        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Film>, RepoError> {
        let rows = sqlx::query(&format!("{SELECT_FILM} ORDER BY f.id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("films.list_all", e))?;
        self.hydrate_all(rows).await
    }

    async fn save(&self, film: &NewFilm) -> Result<Film, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("films.save", e))?;

        check_references(&mut tx, film).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO films (name, description, release_date, duration, mpa_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa_id.get())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("films.save", e))?;
        let id = FilmId::new(result.last_insert_rowid());

        replace_genres(&mut tx, id, &film.genre_ids).await?;
        tx.commit()
            .await
            .map_err(|e| RepoError::database("films.save", e))?;

        tracing::debug!(film_id = %id, name = %film.name, "Film created");
        self.fetch_saved(id).await
    }

    async fn update(&self, id: FilmId, film: &NewFilm) -> Result<Film, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("films.update", e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM films WHERE id = ?")
            .bind(id.get())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepoError::database("films.update", e))?;
        if count == 0 {
            return Err(RepoError::not_found("Film", id));
        }
        check_references(&mut tx, film).await?;

        sqlx::query(
            r#"
            UPDATE films
            SET name = ?, description = ?, release_date = ?, duration = ?, mpa_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa_id.get())
        .bind(id.get())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("films.update", e))?;

        replace_genres(&mut tx, id, &film.genre_ids).await?;
        tx.commit()
            .await
            .map_err(|e| RepoError::database("films.update", e))?;

        tracing::debug!(film_id = %id, "Film updated");
        self.fetch_saved(id).await
    }

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), RepoError> {
        sqlx::query("INSERT OR IGNORE INTO films_likes (film_id, user_id) VALUES (?, ?)")
            .bind(film_id.get())
            .bind(user_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("films.add_like", e))?;
        tracing::debug!(film_id = %film_id, user_id = %user_id, "Like added");
        Ok(())
    }

    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM films_likes WHERE film_id = ? AND user_id = ?")
            .bind(film_id.get())
            .bind(user_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("films.remove_like", e))?;
        tracing::debug!(film_id = %film_id, user_id = %user_id, "Like removed");
        Ok(())
    }

    async fn most_popular(&self, limit: usize) -> Result<Vec<Film>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.name, f.description, f.release_date, f.duration,
                   f.mpa_id, m.name AS mpa_name, COUNT(l.user_id) AS like_count
            FROM films f
            JOIN mpa m ON m.id = f.mpa_id
            LEFT JOIN films_likes l ON l.film_id = f.id
            GROUP BY f.id
            ORDER BY like_count DESC, f.id ASC
            LIMIT ?
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("films.most_popular", e))?;
        self.hydrate_all(rows).await
    }
}
