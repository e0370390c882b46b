use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Best-effort split of a free-text location such as `"Austin, TX, USA"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LocationParts {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Best-effort split of a free-text contact line such as
/// `"Jane Doe jane@example.com"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactParts {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}
