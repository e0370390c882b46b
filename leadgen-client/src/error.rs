use shared_types::SearchFormError;

use crate::gateway::GatewayError;
use crate::view_state::{RowAction, View};

/// Client error types
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    SearchForm(#[from] SearchFormError),

    #[error("cannot navigate from {from} to {to}")]
    Navigation { from: View, to: View },

    #[error("{action} is already running for {name}")]
    AlreadyInFlight { name: String, action: RowAction },

    #[error("{action} is only available on the dashboard, not on {view}")]
    OffDashboard { action: RowAction, view: View },

    #[error("no company named {0} in the current results")]
    UnknownCompany(String),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("already logged in")]
    AlreadyAuthenticated,

    #[error("{0}")]
    AuthRejected(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("request cancelled")]
    Cancelled,

    #[error("background task failed: {0}")]
    TaskFailed(String),

    #[error("session storage error: {0}")]
    Session(String),
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Session(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Session(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
