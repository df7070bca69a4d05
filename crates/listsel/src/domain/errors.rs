//! Domain-specific errors.

use thiserror::Error;

/// Error returned when a model option cannot be parsed from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown selection mode '{0}'")]
    UnknownMode(String),
    #[error("unknown cursor overflow policy '{0}'")]
    UnknownCursorOverflow(String),
    #[error("unknown shift overflow policy '{0}'")]
    UnknownShiftOverflow(String),
}
