use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_LEAD_SOURCE: &str = "Company Search App";
pub const DEFAULT_LEAD_STATUS: &str = "New";

/// Body of `POST /api/crm/lead`. Built at submit time, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CrmLead {
    pub company_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub employee_count: Option<u32>,
    pub revenue: Option<String>,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    pub lead_source: Option<String>,
    pub lead_status: Option<String>,
}

/// Body of `POST /api/crm/contact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CrmContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub title: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CrmConfirmation {
    #[serde(default)]
    pub message: String,
    #[ts(type = "any")]
    #[serde(default)]
    pub crm_response: Option<serde_json::Value>,
}
