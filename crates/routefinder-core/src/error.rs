use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to the form collaborator. None of them leave the graph
/// modified.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("A route is still being revealed. Cancel it before solving again.")]
    Busy,
}

impl RouteError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::Busy => "busy",
        }
    }
}
