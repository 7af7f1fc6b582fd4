use crate::query::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<roads_model::ModelError> for CoreError {
    fn from(err: roads_model::ModelError) -> Self {
        CoreError::Invalid(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
