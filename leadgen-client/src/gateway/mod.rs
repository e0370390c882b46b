//! Request gateway: one call per backend capability.
//!
//! Calls are fire-once. Nothing here retries, caches or touches client
//! state; callers decide what to do with the result.

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use shared_types::{
    AnalyticsSnapshot, AuthOutcome, Company, CompanyPatch, CrmConfirmation, CrmContact, CrmLead,
    Credentials, InsightsResponse, MessageResponse, ScrapeRequest, ScrapedLead, SearchParams,
};

/// Why a single HTTP round trip failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Gateway error types, one per backend capability
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("search failed: {0}")]
    SearchFailed(RequestFailure),

    #[error("enrichment failed: {0}")]
    EnrichmentFailed(RequestFailure),

    #[error("insights failed: {0}")]
    InsightsFailed(RequestFailure),

    #[error("CRM submit failed: {0}")]
    CrmSubmitFailed(RequestFailure),

    #[error("scrape failed: {0}")]
    ScrapeFailed(RequestFailure),

    #[error("analytics fetch failed: {0}")]
    AnalyticsFetchFailed(RequestFailure),

    #[error("authentication request failed: {0}")]
    AuthFailed(RequestFailure),

    #[error("lead request failed: {0}")]
    LeadRequestFailed(RequestFailure),
}

impl GatewayError {
    pub fn failure(&self) -> &RequestFailure {
        match self {
            GatewayError::SearchFailed(f)
            | GatewayError::EnrichmentFailed(f)
            | GatewayError::InsightsFailed(f)
            | GatewayError::CrmSubmitFailed(f)
            | GatewayError::ScrapeFailed(f)
            | GatewayError::AnalyticsFetchFailed(f)
            | GatewayError::AuthFailed(f)
            | GatewayError::LeadRequestFailed(f) => f,
        }
    }
}

/// Backend contract. [`HttpGateway`] is the production implementation.
#[async_trait]
pub trait LeadBackend: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Company>, GatewayError>;

    /// Returns only the fields the backend could fill in.
    async fn enrich(&self, company_name: &str) -> Result<CompanyPatch, GatewayError>;

    async fn fetch_insights(&self, company: &Company) -> Result<InsightsResponse, GatewayError>;

    async fn add_to_crm(&self, lead: &CrmLead) -> Result<CrmConfirmation, GatewayError>;

    async fn add_contact_to_crm(
        &self,
        contact: &CrmContact,
    ) -> Result<CrmConfirmation, GatewayError>;

    async fn scrape_leads(&self, request: &ScrapeRequest)
        -> Result<Vec<ScrapedLead>, GatewayError>;

    async fn fetch_analytics(&self) -> Result<AnalyticsSnapshot, GatewayError>;

    /// `Ok(Rejected)` when the backend answered with an error status;
    /// `Err` only when it could not be reached.
    async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, GatewayError>;

    async fn register(&self, credentials: &Credentials) -> Result<AuthOutcome, GatewayError>;

    async fn list_leads(&self) -> Result<Vec<Company>, GatewayError>;

    async fn get_lead(&self, id: &str) -> Result<Company, GatewayError>;

    async fn create_lead(&self, lead: &Company) -> Result<Company, GatewayError>;

    async fn update_lead(&self, id: &str, patch: &CompanyPatch) -> Result<Company, GatewayError>;

    /// An empty success body yields a default confirmation.
    async fn delete_lead(&self, id: &str) -> Result<MessageResponse, GatewayError>;

    async fn search_leads(&self, query: &str) -> Result<Vec<Company>, GatewayError>;
}
