//! Common validation helpers for use cases.
//!
//! Rules report a [`Violation`]; a [`Violations`] collector gathers every
//! failure of one call so the caller sees all of them at once.

use std::sync::LazyLock;

use chrono::NaiveDate;
use filmhub_domain::{common::is_blank, FilmDraft, UserDraft, MAX_DESCRIPTION_LENGTH, RELEASE_DATE_FLOOR};
use regex_lite::Regex;

use super::ServiceError;

static LOGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{4,12}$").expect("valid regex"));

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("{field_name} must not be blank")]
    Empty { field_name: &'static str },

    #[error("{field_name} is required")]
    Missing { field_name: &'static str },

    #[error("{field_name} must be at most {max} characters")]
    TooLong { field_name: &'static str, max: usize },

    #[error("{field_name} {reason}")]
    Invalid {
        field_name: &'static str,
        reason: String,
    },
}

/// Validate a string is non-empty after trimming.
pub fn require_non_empty(value: &str, field_name: &'static str) -> Result<(), Violation> {
    if is_blank(value) {
        return Err(Violation::Empty { field_name });
    }
    Ok(())
}

/// Validate a string doesn't exceed max length, counted in characters.
pub fn require_max_length(
    value: &str,
    max: usize,
    field_name: &'static str,
) -> Result<(), Violation> {
    if value.chars().count() > max {
        return Err(Violation::TooLong { field_name, max });
    }
    Ok(())
}

/// Validate an optional value is present.
pub fn require_present<T: Copy>(value: Option<T>, field_name: &'static str) -> Result<T, Violation> {
    value.ok_or(Violation::Missing { field_name })
}

/// Collects rule failures for one call.
#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Records the failure of `rule`, if any, and passes its value through.
    pub fn check<T>(&mut self, rule: Result<T, Violation>) -> Option<T> {
        match rule {
            Ok(value) => Some(value),
            Err(violation) => {
                self.push(violation.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// `Ok(())` when nothing failed, otherwise every message joined by `"; "`.
    pub fn finish(self) -> Result<(), ServiceError> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let message = self.messages.join("; ");
        tracing::warn!(violations = %message, "Validation failed");
        Err(ServiceError::Validation(message))
    }
}

/// Field rules for a film that need no storage lookups.
///
/// Returns the release date when it is present so callers can build the
/// stored record once every other check has passed.
pub fn check_film_fields(draft: &FilmDraft, violations: &mut Violations) -> Option<NaiveDate> {
    violations.check(require_non_empty(&draft.name, "Name"));
    if let Some(description) = &draft.description {
        violations.check(require_max_length(
            description,
            MAX_DESCRIPTION_LENGTH,
            "Description",
        ));
    }
    if draft.duration < 0 {
        violations.push(
            Violation::Invalid {
                field_name: "Duration",
                reason: "must not be negative".to_string(),
            }
            .to_string(),
        );
    }

    let release_date = violations.check(require_present(draft.release_date, "Release date"))?;
    if release_date < RELEASE_DATE_FLOOR {
        violations.push(
            Violation::Invalid {
                field_name: "Release date",
                reason: format!("must not be before {RELEASE_DATE_FLOOR}"),
            }
            .to_string(),
        );
        return None;
    }
    Some(release_date)
}

/// Field rules for a user, judged against `today`.
pub fn check_user_fields(
    draft: &UserDraft,
    today: NaiveDate,
    violations: &mut Violations,
) -> Option<NaiveDate> {
    if violations.check(require_non_empty(&draft.email, "Email")).is_some()
        && (!draft.email.contains('@') || draft.email.chars().any(char::is_whitespace))
    {
        violations.push(
            Violation::Invalid {
                field_name: "Email",
                reason: "must be a valid address containing '@'".to_string(),
            }
            .to_string(),
        );
    }

    if violations.check(require_non_empty(&draft.login, "Login")).is_some()
        && !LOGIN_RE.is_match(&draft.login)
    {
        violations.push(
            Violation::Invalid {
                field_name: "Login",
                reason: "must be of 4 to 12 length with no special characters".to_string(),
            }
            .to_string(),
        );
    }

    let birthday = violations.check(require_present(draft.birthday, "Birthday"))?;
    if birthday > today {
        violations.push(
            Violation::Invalid {
                field_name: "Birthday",
                reason: "must not be in the future".to_string(),
            }
            .to_string(),
        );
        return None;
    }
    Some(birthday)
}
