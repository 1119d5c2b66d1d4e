//! User entity - accounts that befriend each other and like films

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::or_fallback;
use crate::{FilmId, UserId};

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub login: String,
    /// Display name; equals the login when none was given
    pub name: String,
    pub birthday: NaiveDate,
    pub friends: BTreeSet<UserId>,
    pub liked_films: BTreeSet<FilmId>,
}

/// Inbound user data. Nothing here is trusted until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

/// A validated user ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub login: String,
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

impl NewUser {
    pub fn new(email: impl Into<String>, login: impl Into<String>, birthday: NaiveDate) -> Self {
        Self {
            email: email.into(),
            login: login.into(),
            name: None,
            birthday,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The name to store: the given name, or the login when it is missing or blank.
    pub fn display_name(&self) -> String {
        or_fallback(self.name.as_deref(), &self.login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birthday() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date")
    }

    #[test]
    fn display_name_falls_back_to_login() {
        let user = NewUser::new("neo@matrix.io", "neo", birthday());
        assert_eq!(user.display_name(), "neo");

        let blank = NewUser::new("neo@matrix.io", "neo", birthday()).with_name("   ");
        assert_eq!(blank.display_name(), "neo");
    }

    #[test]
    fn display_name_keeps_given_name() {
        let user = NewUser::new("neo@matrix.io", "neo", birthday()).with_name("Thomas");
        assert_eq!(user.display_name(), "Thomas");
    }

    #[test]
    fn draft_deserializes_without_optional_fields() {
        let draft: UserDraft =
            serde_json::from_str(r#"{"email":"a@b.c","login":"abcd","birthday":"2000-02-29"}"#)
                .expect("deserialize");
        assert_eq!(draft.name, None);
        assert_eq!(draft.id, None);
        assert_eq!(
            draft.birthday,
            NaiveDate::from_ymd_opt(2000, 2, 29)
        );
    }
}
