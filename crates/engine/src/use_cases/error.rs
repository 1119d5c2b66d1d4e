//! Error type shared by the catalog, popularity and social graph use cases.

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// One or more business rules failed; every violated rule is listed.
    #[error("{0}")]
    Validation(String),

    #[error("{entity_type} not found with id = {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Storage fault. Never retried.
    #[error("Repository error: {0}")]
    Repo(RepoError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Repo(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_not_found_stays_not_found() {
        let err = ServiceError::from(RepoError::not_found("User", 4));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User not found with id = 4");
    }

    #[test]
    fn database_faults_pass_through() {
        let err = ServiceError::from(RepoError::database("films.get", "locked"));
        assert!(matches!(err, ServiceError::Repo(RepoError::Database { .. })));
    }
}
