//! Genre - fixed category labels attachable to films

use serde::{Deserialize, Serialize};

use crate::GenreId;

/// A film genre. Seeded reference data, read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

impl Genre {
    pub fn new(id: GenreId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Genres every fresh store starts with, in ascending id order.
pub fn seed_genres() -> Vec<Genre> {
    [
        (1, "Comedy"),
        (2, "Drama"),
        (3, "Animation"),
        (4, "Thriller"),
        (5, "Documentary"),
        (6, "Action"),
    ]
    .into_iter()
    .map(|(id, name)| Genre::new(GenreId::new(id), name))
    .collect()
}

/// Reference to a genre by id, as it arrives in an inbound film draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRef {
    pub id: GenreId,
}
