use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::company::null_as_default;

/// Body of `POST /api/scrape_leads`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScrapeRequest {
    pub industry: Option<String>,
    pub location: Option<String>,
}

impl ScrapeRequest {
    pub fn new(industry: &str, location: &str) -> Self {
        Self {
            industry: non_empty(industry),
            location: non_empty(location),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedLead {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
}
