use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod analytics;
pub mod auth;
pub mod company;
pub mod contact;
pub mod crm;
pub mod scrape;
pub mod search;
pub mod session;

pub use analytics::{
    AnalyticsSnapshot, AnalyticsTrends, DailyLeadCount, DetailedAnalytics, LeadAnalytics,
    MonthlyProjection, PotentialTrendPoint, TopLead, Trend,
};
pub use auth::{AuthOutcome, Credentials, ErrorDetail};
pub use company::{Company, CompanyPatch, EnrichRequest, InsightsRequest, InsightsResponse};
pub use contact::{ContactParts, LocationParts};
pub use crm::{CrmConfirmation, CrmContact, CrmLead, DEFAULT_LEAD_SOURCE, DEFAULT_LEAD_STATUS};
pub use scrape::{ScrapeRequest, ScrapedLead};
pub use search::{SearchForm, SearchFormError, SearchParams};
pub use session::Session;

/// Plain acknowledgement returned by endpoints with nothing else to say
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
