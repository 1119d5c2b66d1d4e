//! In-memory genre and rating lookups over seeded reference data.

use async_trait::async_trait;
use filmhub_domain::{Genre, GenreId, Mpa, MpaId};

use super::SharedState;
use crate::infrastructure::ports::{GenreRepo, MpaRepo, RepoError};

pub struct MemoryGenreRepo {
    state: SharedState,
}

impl MemoryGenreRepo {
    pub(super) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl GenreRepo for MemoryGenreRepo {
    async fn exists(&self, id: GenreId) -> Result<bool, RepoError> {
        Ok(self.state.read().await.genres.contains_key(&id))
    }

    async fn get(&self, id: GenreId) -> Result<Option<Genre>, RepoError> {
        Ok(self.state.read().await.genres.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Genre>, RepoError> {
        Ok(self.state.read().await.genres.values().cloned().collect())
    }
}

pub struct MemoryMpaRepo {
    state: SharedState,
}

impl MemoryMpaRepo {
    pub(super) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl MpaRepo for MemoryMpaRepo {
    async fn exists(&self, id: MpaId) -> Result<bool, RepoError> {
        Ok(self.state.read().await.mpa.contains_key(&id))
    }

    async fn get(&self, id: MpaId) -> Result<Option<Mpa>, RepoError> {
        Ok(self.state.read().await.mpa.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Mpa>, RepoError> {
        Ok(self.state.read().await.mpa.values().cloned().collect())
    }
}
