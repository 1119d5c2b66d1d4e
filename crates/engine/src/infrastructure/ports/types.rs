//! Shared types used by port implementations.

use std::fmt;
use std::str::FromStr;

use filmhub_domain::DomainError;

/// How a storage variant records a friend link.
///
/// The social graph always asks storage for both directions of a friendship.
/// In `Directed` mode each request stores exactly one ordered pair. In
/// `Mutual` mode each request stores both orderings, so the second request is
/// a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkMode {
    #[default]
    Directed,
    Mutual,
}

impl LinkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directed => "directed",
            Self::Mutual => "mutual",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directed" => Ok(Self::Directed),
            "mutual" => Ok(Self::Mutual),
            other => Err(DomainError::parse(format!("Unknown link mode: {}", other))),
        }
    }
}
