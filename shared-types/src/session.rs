use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Local "logged in" marker.
///
/// Nothing here is verified by the backend; it only decides which view the
/// client opens on. Treat it as a convenience, not as authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub logged_in: bool,
    pub username: Option<String>,
    pub logged_in_at: Option<i64>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(username: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            username: Some(username.into()),
            logged_in_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::anonymous();
    }
}
