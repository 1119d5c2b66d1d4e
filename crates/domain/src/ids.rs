use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifiers allocated by storage as "one greater than the current maximum".
pub trait SequentialId: Copy + Ord {
    /// The identifier handed out when nothing has been stored yet.
    fn first() -> Self;

    /// The identifier directly after this one.
    fn next(self) -> Self;
}

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl SequentialId for $name {
            fn first() -> Self {
                Self(1)
            }

            fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| DomainError::invalid_id(format!("{} id '{}'", $label, s)))
            }
        }
    };
}

// Catalog entities
define_id!(FilmId, "Film");
define_id!(UserId, "User");

// Reference data
define_id!(GenreId, "Genre");
define_id!(MpaId, "Mpa");
