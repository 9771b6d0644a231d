use thiserror::Error;

use crate::infrastructure::persistence::error::DbError;

/// Errors raised at the decoder boundary
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    #[error("Invalid genesis data: {0}")]
    Genesis(String),
    #[error("Failed to decode block: {0}")]
    Block(String),
    #[error("Failed to decode action output: {0}")]
    Output(String),
}

/// Errors raised by special-case action handlers
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{action}: required field '{field}' is missing")]
    MissingField { action: &'static str, field: &'static str },
    #[error("{action}: field '{field}' is malformed: {reason}")]
    InvalidField {
        action: &'static str,
        field: &'static str,
        reason: String,
    },
    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

/// Error type for block ingestion
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Decoder is not initialized; call initialize with genesis data first")]
    NotInitialized,
    #[error(transparent)]
    DecodeError(#[from] DecodeError),
    #[error("Action {action_index} of transaction {tx_hash} failed post-processing: {source}")]
    HandlerError {
        tx_hash: String,
        action_index: usize,
        #[source]
        source: HandlerError,
    },
    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

impl From<sea_orm::DbErr> for IngestError {
    fn from(err: sea_orm::DbErr) -> Self {
        IngestError::DbError(DbError::from(err))
    }
}
