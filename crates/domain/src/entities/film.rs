//! Film entity - catalog records with rating, genres and likes
//!
//! Three shapes exist for a film:
//! - [`FilmDraft`] is what arrives from outside: raw, unvalidated, id optional
//! - [`NewFilm`] is a validated draft with references reduced to ids
//! - [`Film`] is the stored record with its rating and genres resolved

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{FilmId, Genre, GenreId, GenreRef, Mpa, MpaId, MpaRef, UserId};

/// Maximum length of a film description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// The first public film screening. No release may precede it.
pub const RELEASE_DATE_FLOOR: NaiveDate = match NaiveDate::from_ymd_opt(1895, 12, 28) {
    Some(date) => date,
    None => panic!("invalid release date floor"),
};

/// A stored film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "releaseDate")]
    pub release_date: NaiveDate,
    /// Running time in minutes
    pub duration: i32,
    pub mpa: Mpa,
    /// Ascending by genre id, no duplicates
    pub genres: Vec<Genre>,
    /// Users who liked this film
    pub likes: BTreeSet<UserId>,
}

impl Film {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn genre_ids(&self) -> Vec<GenreId> {
        self.genres.iter().map(|g| g.id).collect()
    }
}

/// Inbound film data. Nothing here is trusted until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmDraft {
    #[serde(default)]
    pub id: Option<FilmId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "releaseDate", alias = "release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub mpa: Option<MpaRef>,
    #[serde(default)]
    pub genres: Vec<GenreRef>,
}

impl FilmDraft {
    /// Genre ids in ascending order with duplicates removed.
    pub fn genre_ids(&self) -> Vec<GenreId> {
        self.genres
            .iter()
            .map(|g| g.id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn mpa_id(&self) -> Option<MpaId> {
        self.mpa.map(|m| m.id)
    }
}

/// A validated film ready for storage. References are plain ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFilm {
    pub name: String,
    pub description: Option<String>,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa_id: MpaId,
    /// Ascending, no duplicates
    pub genre_ids: Vec<GenreId>,
}

impl NewFilm {
    pub fn new(
        name: impl Into<String>,
        release_date: NaiveDate,
        duration: i32,
        mpa_id: MpaId,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            release_date,
            duration,
            mpa_id,
            genre_ids: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_genres(mut self, genre_ids: impl IntoIterator<Item = GenreId>) -> Self {
        self.genre_ids = genre_ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self
    }
}
