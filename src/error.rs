//! Error types for the dashboard core.

use thiserror::Error;

use crate::models::EntryId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// Transport failure or a non-2xx response. The message is the server's
    /// `error` field when it sent one, otherwise the operation's fallback.
    #[error("{message}")]
    NetworkOrServer { message: String },

    /// A required form field is missing; raised before any request is built.
    #[error("{message}")]
    Validation { message: String },

    /// The id is not (or no longer) in the entry store.
    #[error("entry {id} not found")]
    NotFoundLocally { id: EntryId },
}

impl DashboardError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::NetworkOrServer {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
