//! In-memory film repository.

use std::cmp::Reverse;

use async_trait::async_trait;
use filmhub_domain::{Film, FilmId, NewFilm, UserId};

use super::SharedState;
use crate::infrastructure::ports::{FilmRepo, RepoError};

pub struct MemoryFilmRepo {
    state: SharedState,
}

impl MemoryFilmRepo {
    pub(super) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

/// Copy of the draft with its genre ids in canonical (ascending, unique) form.
fn normalized(film: &NewFilm) -> NewFilm {
    let mut record = film.clone();
    record.genre_ids.sort();
    record.genre_ids.dedup();
    record
}

#[async_trait]
impl FilmRepo for MemoryFilmRepo {
    async fn exists(&self, id: FilmId) -> Result<bool, RepoError> {
        Ok(self.state.read().await.films.contains(id))
    }

    async fn get(&self, id: FilmId) -> Result<Option<Film>, RepoError> {
        self.state.read().await.film(id)
    }

    async fn list_all(&self) -> Result<Vec<Film>, RepoError> {
        self.state.read().await.all_films()
    }

    async fn save(&self, film: &NewFilm) -> Result<Film, RepoError> {
        let mut state = self.state.write().await;
        state.check_references(film)?;

        let record = normalized(film);
        let id = state.films.insert(record.clone());
        tracing::debug!(film_id = %id, name = %record.name, "Film created");
        state.assemble_film(id, &record)
    }

    async fn update(&self, id: FilmId, film: &NewFilm) -> Result<Film, RepoError> {
        let mut state = self.state.write().await;
        if !state.films.contains(id) {
            return Err(RepoError::not_found("Film", id));
        }
        state.check_references(film)?;

        let record = normalized(film);
        state.films.replace(id, record.clone());
        tracing::debug!(film_id = %id, "Film updated");
        state.assemble_film(id, &record)
    }

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if state.likes.insert(film_id, user_id) {
            tracing::debug!(film_id = %film_id, user_id = %user_id, "Like added");
        }
        Ok(())
    }

    async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if state.likes.remove(film_id, user_id) {
            tracing::debug!(film_id = %film_id, user_id = %user_id, "Like removed");
        }
        Ok(())
    }

    async fn most_popular(&self, limit: usize) -> Result<Vec<Film>, RepoError> {
        let mut films = self.state.read().await.all_films()?;
        // Stable: equal counts stay in id order.
        films.sort_by_key(|film| Reverse(film.like_count()));
        films.truncate(limit);
        Ok(films)
    }
}
