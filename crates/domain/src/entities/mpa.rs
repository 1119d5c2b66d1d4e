//! Mpa - content rating classification

use serde::{Deserialize, Serialize};

use crate::MpaId;

/// A rating classification label (G, PG, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mpa {
    pub id: MpaId,
    pub name: String,
}

impl Mpa {
    pub fn new(id: MpaId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Ratings every fresh store starts with, in ascending id order.
pub fn seed_mpa() -> Vec<Mpa> {
    [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")]
        .into_iter()
        .map(|(id, name)| Mpa::new(MpaId::new(id), name))
        .collect()
}

/// Reference to a rating by id, as it arrives in an inbound film draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpaRef {
    pub id: MpaId,
}
