//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory roster/profile state and serialize its mutations.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - In-memory state only changes after the backing document was saved.
//! - Stats persistence is best-effort; stats are derived data.

use crate::model::entry::{EntryId, EntryValidationError};
use crate::repo::kv_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod profile_service;
pub mod roster_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for roster and profile use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Entry input violates model invariants.
    Validation(EntryValidationError),
    /// Target entry does not exist in the current roster.
    EntryNotFound(EntryId),
    /// Target challenge does not exist.
    ChallengeNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::ChallengeNotFound(id) => write!(f, "challenge not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::EntryNotFound(_) | Self::ChallengeNotFound(_) => None,
        }
    }
}

impl From<EntryValidationError> for ServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}
