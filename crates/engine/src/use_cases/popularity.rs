//! Film catalog use cases: film records, likes and the popularity ranking.

use std::sync::Arc;

use filmhub_domain::{Film, FilmDraft, FilmId, GenreId, NewFilm, UserId};

use super::validation::{check_film_fields, Violations};
use super::ServiceError;
use crate::infrastructure::ports::{FilmRepo, GenreRepo, MpaRepo, UserRepo};

/// Ranking size when the caller gives none.
pub const DEFAULT_POPULAR_LIMIT: i64 = 10;

pub struct Popularity {
    films: Arc<dyn FilmRepo>,
    users: Arc<dyn UserRepo>,
    genres: Arc<dyn GenreRepo>,
    mpa: Arc<dyn MpaRepo>,
}

impl Popularity {
    pub fn new(
        films: Arc<dyn FilmRepo>,
        users: Arc<dyn UserRepo>,
        genres: Arc<dyn GenreRepo>,
        mpa: Arc<dyn MpaRepo>,
    ) -> Self {
        Self {
            films,
            users,
            genres,
            mpa,
        }
    }

    pub async fn get_film(&self, id: FilmId) -> Result<Film, ServiceError> {
        self.films
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Film", id))
    }

    pub async fn list_films(&self) -> Result<Vec<Film>, ServiceError> {
        Ok(self.films.list_all().await?)
    }

    pub async fn create_film(&self, draft: FilmDraft) -> Result<Film, ServiceError> {
        let new_film = self.validate(draft).await?;
        let film = self.films.save(&new_film).await?;
        tracing::info!(film_id = %film.id, name = %film.name, "Created film");
        Ok(film)
    }

    /// Replaces every field of an existing film, genre set included.
    pub async fn update_film(&self, draft: FilmDraft) -> Result<Film, ServiceError> {
        let id = draft
            .id
            .ok_or_else(|| ServiceError::validation("Id must not be empty"))?;
        self.require_film(id).await?;

        let new_film = self.validate(draft).await?;
        let film = self.films.update(id, &new_film).await?;
        tracing::info!(film_id = %id, "Updated film");
        Ok(film)
    }

    pub async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), ServiceError> {
        self.require_film(film_id).await?;
        self.require_user(user_id).await?;
        self.films.add_like(film_id, user_id).await?;
        tracing::info!(film_id = %film_id, user_id = %user_id, "Film liked");
        Ok(())
    }

    pub async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), ServiceError> {
        self.require_film(film_id).await?;
        self.require_user(user_id).await?;
        self.films.remove_like(film_id, user_id).await?;
        tracing::info!(film_id = %film_id, user_id = %user_id, "Film like removed");
        Ok(())
    }

    /// Films by descending like count. `None` means [`DEFAULT_POPULAR_LIMIT`].
    pub async fn get_most_popular(&self, limit: Option<i64>) -> Result<Vec<Film>, ServiceError> {
        let limit = limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
        if limit <= 0 {
            return Err(ServiceError::validation(
                "Limit must be empty or greater than zero",
            ));
        }
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.films.most_popular(limit).await?)
    }

    async fn require_film(&self, id: FilmId) -> Result<(), ServiceError> {
        if !self.films.exists(id).await? {
            return Err(ServiceError::not_found("Film", id));
        }
        Ok(())
    }

    async fn require_user(&self, id: UserId) -> Result<(), ServiceError> {
        if !self.users.exists(id).await? {
            return Err(ServiceError::not_found("User", id));
        }
        Ok(())
    }

    /// Runs every film rule, reference lookups included, before failing.
    async fn validate(&self, draft: FilmDraft) -> Result<NewFilm, ServiceError> {
        let mut violations = Violations::new();
        let release_date = check_film_fields(&draft, &mut violations);

        let mpa_id = match draft.mpa_id() {
            Some(mpa_id) => {
                if !self.mpa.exists(mpa_id).await? {
                    violations.push(format!("Mpa not found with id = {mpa_id}"));
                }
                Some(mpa_id)
            }
            None => {
                violations.push("Mpa is required");
                None
            }
        };

        let genre_ids = draft.genre_ids();
        let mut missing: Vec<GenreId> = Vec::new();
        for genre_id in &genre_ids {
            if !self.genres.exists(*genre_id).await? {
                missing.push(*genre_id);
            }
        }
        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
            violations.push(format!("Genres not found with ids = [{}]", ids.join(", ")));
        }

        violations.finish()?;

        match (release_date, mpa_id) {
            (Some(release_date), Some(mpa_id)) => {
                let mut film = NewFilm::new(draft.name, release_date, draft.duration, mpa_id)
                    .with_genres(genre_ids);
                film.description = draft.description;
                Ok(film)
            }
            _ => Err(ServiceError::validation("Film is incomplete")),
        }
    }
}
