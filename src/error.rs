use thiserror::Error;

use crate::model::EntryId;

pub type EngineResult<T> = Result<T, EngineError>;

/// Every rejected transition leaves the input state untouched; the caller only
/// sees the kind and a short machine-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid turn: {0}")]
    InvalidTurn(&'static str),
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("bank entry not found: {0}")]
    StaleBankEntry(EntryId),
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
    #[error("snapshot rejected: {0}")]
    Snapshot(String),
}

impl EngineError {
    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "engine invariant violated");
        EngineError::InternalInvariantViolation(reason)
    }

    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidTurn(_) => "invalid_turn",
            EngineError::InvalidAction(_) => "invalid_action",
            EngineError::StaleBankEntry(_) => "stale_bank_entry",
            EngineError::InternalInvariantViolation(_) => "internal_invariant_violation",
            EngineError::Snapshot(_) => "snapshot",
        }
    }

    pub fn reason(&self) -> String {
        match self {
            EngineError::InvalidTurn(r) => (*r).to_string(),
            EngineError::InvalidAction(r) | EngineError::InternalInvariantViolation(r) | EngineError::Snapshot(r) => r.clone(),
            EngineError::StaleBankEntry(id) => format!("entry:{id}"),
        }
    }
}
