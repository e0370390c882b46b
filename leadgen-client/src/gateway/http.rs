use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use shared_types::{
    AnalyticsSnapshot, AuthOutcome, Company, CompanyPatch, CrmConfirmation, CrmContact, CrmLead,
    Credentials, EnrichRequest, ErrorDetail, InsightsRequest, InsightsResponse, MessageResponse,
    ScrapeRequest, ScrapedLead, SearchParams,
};
use tracing::{debug, warn};

use super::{GatewayError, LeadBackend, RequestFailure};

/// JSON-over-HTTP gateway to the lead backend.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/api/leads/{id}` with `id` escaped as a single path segment.
    fn lead_url(&self, id: &str) -> Result<Url, RequestFailure> {
        let mut url = Url::parse(&self.url("/api/leads"))
            .map_err(|e| RequestFailure::Transport(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RequestFailure::Transport("base URL cannot take a path".to_string()))?
            .push(id);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RequestFailure> {
        let response = Self::send_checked(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RequestFailure::Decode(e.to_string()))
    }

    async fn send_confirmation(request: RequestBuilder) -> Result<MessageResponse, RequestFailure> {
        let response = Self::send_checked(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| RequestFailure::Decode(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(MessageResponse::default());
        }
        serde_json::from_str(&body).map_err(|e| RequestFailure::Decode(e.to_string()))
    }

    async fn send_checked(request: RequestBuilder) -> Result<reqwest::Response, RequestFailure> {
        let response = request
            .send()
            .await
            .map_err(|e| RequestFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorDetail>()
                .await
                .ok()
                .and_then(|body| body.detail);
            return Err(RequestFailure::Status {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response)
    }

    async fn authenticate(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<AuthOutcome, GatewayError> {
        debug!("POST {} for user {}", path, credentials.username);

        let result = Self::send_checked(self.client.post(self.url(path)).json(credentials)).await;
        match result {
            Ok(_) => Ok(AuthOutcome::Granted),
            Err(RequestFailure::Status { status, detail }) => {
                debug!("{} rejected with HTTP {}", path, status);
                Ok(AuthOutcome::Rejected { message: detail })
            }
            Err(failure) => {
                warn!("{} failed: {}", path, failure);
                Err(GatewayError::AuthFailed(failure))
            }
        }
    }
}

fn logged<T>(
    call: &str,
    result: Result<T, RequestFailure>,
    wrap: fn(RequestFailure) -> GatewayError,
) -> Result<T, GatewayError> {
    result.map_err(|failure| {
        warn!("{} failed: {}", call, failure);
        wrap(failure)
    })
}

#[async_trait]
impl LeadBackend for HttpGateway {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Company>, GatewayError> {
        debug!("POST /api/search {:?}", params);
        let request = self.client.post(self.url("/api/search")).json(params);
        logged("search", self.send_json(request).await, GatewayError::SearchFailed)
    }

    async fn enrich(&self, company_name: &str) -> Result<CompanyPatch, GatewayError> {
        debug!("POST /api/enrich for {}", company_name);
        let body = EnrichRequest {
            company_name: company_name.to_string(),
        };
        let request = self.client.post(self.url("/api/enrich")).json(&body);
        logged("enrich", self.send_json(request).await, GatewayError::EnrichmentFailed)
    }

    async fn fetch_insights(&self, company: &Company) -> Result<InsightsResponse, GatewayError> {
        debug!("POST /api/insights for {}", company.name);
        let body = InsightsRequest {
            company: company.clone(),
        };
        let request = self.client.post(self.url("/api/insights")).json(&body);
        logged("insights", self.send_json(request).await, GatewayError::InsightsFailed)
    }

    async fn add_to_crm(&self, lead: &CrmLead) -> Result<CrmConfirmation, GatewayError> {
        debug!("POST /api/crm/lead for {}", lead.company_name);
        let request = self.client.post(self.url("/api/crm/lead")).json(lead);
        logged("crm lead", self.send_json(request).await, GatewayError::CrmSubmitFailed)
    }

    async fn add_contact_to_crm(
        &self,
        contact: &CrmContact,
    ) -> Result<CrmConfirmation, GatewayError> {
        debug!("POST /api/crm/contact for {}", contact.email);
        let request = self.client.post(self.url("/api/crm/contact")).json(contact);
        logged("crm contact", self.send_json(request).await, GatewayError::CrmSubmitFailed)
    }

    async fn scrape_leads(
        &self,
        request: &ScrapeRequest,
    ) -> Result<Vec<ScrapedLead>, GatewayError> {
        debug!("POST /api/scrape_leads {:?}", request);
        let request = self.client.post(self.url("/api/scrape_leads")).json(request);
        logged("scrape", self.send_json(request).await, GatewayError::ScrapeFailed)
    }

    async fn fetch_analytics(&self) -> Result<AnalyticsSnapshot, GatewayError> {
        debug!("GET /api/analytics");
        let request = self.client.get(self.url("/api/analytics"));
        logged(
            "analytics",
            self.send_json(request).await,
            GatewayError::AnalyticsFetchFailed,
        )
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, GatewayError> {
        self.authenticate("/api/login", credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<AuthOutcome, GatewayError> {
        self.authenticate("/api/register", credentials).await
    }

    async fn list_leads(&self) -> Result<Vec<Company>, GatewayError> {
        let request = self.client.get(self.url("/api/leads"));
        logged("list leads", self.send_json(request).await, GatewayError::LeadRequestFailed)
    }

    async fn get_lead(&self, id: &str) -> Result<Company, GatewayError> {
        debug!("GET /api/leads/{}", id);
        let result = match self.lead_url(id) {
            Ok(url) => self.send_json(self.client.get(url)).await,
            Err(failure) => Err(failure),
        };
        logged("get lead", result, GatewayError::LeadRequestFailed)
    }

    async fn create_lead(&self, lead: &Company) -> Result<Company, GatewayError> {
        debug!("POST /api/leads for {}", lead.name);
        let request = self.client.post(self.url("/api/leads")).json(lead);
        logged("create lead", self.send_json(request).await, GatewayError::LeadRequestFailed)
    }

    async fn update_lead(&self, id: &str, patch: &CompanyPatch) -> Result<Company, GatewayError> {
        debug!("PUT /api/leads/{}", id);
        let result = match self.lead_url(id) {
            Ok(url) => self.send_json(self.client.put(url).json(patch)).await,
            Err(failure) => Err(failure),
        };
        logged("update lead", result, GatewayError::LeadRequestFailed)
    }

    async fn delete_lead(&self, id: &str) -> Result<MessageResponse, GatewayError> {
        debug!("DELETE /api/leads/{}", id);
        let result = match self.lead_url(id) {
            Ok(url) => Self::send_confirmation(self.client.delete(url)).await,
            Err(failure) => Err(failure),
        };
        logged("delete lead", result, GatewayError::LeadRequestFailed)
    }

    async fn search_leads(&self, query: &str) -> Result<Vec<Company>, GatewayError> {
        let request = self
            .client
            .get(self.url("/api/leads/search"))
            .query(&[("q", query)]);
        logged("search leads", self.send_json(request).await, GatewayError::LeadRequestFailed)
    }
}
