use std::time::Duration;

use thiserror::Error;

/// Shown to the user whenever an insight request fails.
pub const USER_FAILURE_MESSAGE: &str =
    "Failed to generate AI insights. Please check your API configuration.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsightError {
    #[error("invalid insight input: {0}")]
    InvalidInput(String),

    #[error("insight provider failed: {0}")]
    ExternalService(String),

    #[error("insight provider did not answer within {0:?}")]
    Timeout(Duration),

    /// A newer request was issued while this one was pending; its result was discarded.
    #[error("insight request superseded by a newer one")]
    Superseded,
}

impl InsightError {
    /// Message for the insights panel. `None` for superseded requests, which are
    /// dropped silently.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            InsightError::Superseded => None,
            _ => Some(USER_FAILURE_MESSAGE),
        }
    }
}
