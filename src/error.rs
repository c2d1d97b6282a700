use crate::model::InfluencerId;
use thiserror::Error;

/// Application-level result; store and form code return their own error types.
pub type Result<T> = anyhow::Result<T>;

/// Failures surfaced by [`crate::store::DirectoryStore`]. None of them are fatal
/// to the store; the caller re-presents the form or refreshes the view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("influencer '{0}' not found")]
    NotFound(InfluencerId),
    #[error("duplicate influencer id '{0}'")]
    DuplicateId(InfluencerId),
    #[error("could not generate a unique id after {attempts} attempts")]
    IdSpaceExhausted { attempts: usize },
}

/// Form input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,
    #[error("'{0}' is not an image file")]
    NotAnImage(String),
}
