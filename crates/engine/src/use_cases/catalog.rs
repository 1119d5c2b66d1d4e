//! Read-only lookups over genres and rating classifications.

use std::sync::Arc;

use filmhub_domain::{Genre, GenreId, Mpa, MpaId};

use super::ServiceError;
use crate::infrastructure::ports::{GenreRepo, MpaRepo};

pub struct Catalog {
    genres: Arc<dyn GenreRepo>,
    mpa: Arc<dyn MpaRepo>,
}

impl Catalog {
    pub fn new(genres: Arc<dyn GenreRepo>, mpa: Arc<dyn MpaRepo>) -> Self {
        Self { genres, mpa }
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>, ServiceError> {
        Ok(self.genres.list_all().await?)
    }

    pub async fn get_genre(&self, id: GenreId) -> Result<Genre, ServiceError> {
        self.genres
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Genre", id))
    }

    pub async fn list_mpa(&self) -> Result<Vec<Mpa>, ServiceError> {
        Ok(self.mpa.list_all().await?)
    }

    pub async fn get_mpa(&self, id: MpaId) -> Result<Mpa, ServiceError> {
        self.mpa
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Mpa", id))
    }
}
