//! In-memory [`LeadBackend`] for coordinator tests.

use async_trait::async_trait;
use shared_types::{
    AnalyticsSnapshot, AuthOutcome, Company, CompanyPatch, CrmConfirmation, CrmContact, CrmLead,
    Credentials, InsightsResponse, LeadAnalytics, MessageResponse, ScrapeRequest, ScrapedLead,
    SearchParams,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use crate::gateway::{GatewayError, LeadBackend, RequestFailure};

pub const VALID_PASSWORD: &str = "secret";

#[derive(Default)]
pub struct FakeBackend {
    companies: Mutex<Vec<Company>>,
    patches: Mutex<HashMap<String, CompanyPatch>>,
    failing: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_companies(companies: Vec<Company>) -> Self {
        let backend = Self::default();
        backend.set_companies(companies);
        backend
    }

    pub fn set_companies(&self, companies: Vec<Company>) {
        *self.companies.lock().unwrap() = companies;
    }

    pub fn set_patch(&self, name: &str, patch: CompanyPatch) {
        self.patches.lock().unwrap().insert(name.to_string(), patch);
    }

    /// Make every call of `call` fail with HTTP 500.
    pub fn fail(&self, call: &'static str) {
        self.failing.lock().unwrap().insert(call);
    }

    /// Block the call logged as `key` until [`FakeBackend::release`].
    pub fn hold(&self, key: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, key: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(key) {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == key).count()
    }

    /// Wait until `key` has been called at least once.
    pub async fn wait_for_call(&self, key: &str) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.call_count(key) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("backend call {} never happened", key));
    }

    async fn enter(&self, key: String) {
        self.calls.lock().unwrap().push(key.clone());
        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn check(
        &self,
        call: &'static str,
        wrap: fn(RequestFailure) -> GatewayError,
    ) -> Result<(), GatewayError> {
        if self.failing.lock().unwrap().contains(call) {
            return Err(wrap(RequestFailure::Status {
                status: 500,
                detail: None,
            }));
        }
        Ok(())
    }

    fn lookup(&self, id: &str) -> Result<Company, GatewayError> {
        self.companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| {
                GatewayError::LeadRequestFailed(RequestFailure::Status {
                    status: 404,
                    detail: Some("Lead not found".to_string()),
                })
            })
    }
}

#[async_trait]
impl LeadBackend for FakeBackend {
    async fn search(&self, _params: &SearchParams) -> Result<Vec<Company>, GatewayError> {
        self.enter("search".to_string()).await;
        self.check("search", GatewayError::SearchFailed)?;
        Ok(self.companies.lock().unwrap().clone())
    }

    async fn enrich(&self, company_name: &str) -> Result<CompanyPatch, GatewayError> {
        self.enter(format!("enrich:{}", company_name)).await;
        self.check("enrich", GatewayError::EnrichmentFailed)?;
        Ok(self
            .patches
            .lock()
            .unwrap()
            .get(company_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_insights(&self, company: &Company) -> Result<InsightsResponse, GatewayError> {
        self.enter(format!("insights:{}", company.name)).await;
        self.check("insights", GatewayError::InsightsFailed)?;
        Ok(InsightsResponse {
            insights_summary: format!("{} looks promising", company.name),
        })
    }

    async fn add_to_crm(&self, lead: &CrmLead) -> Result<CrmConfirmation, GatewayError> {
        self.enter(format!("crm:{}", lead.company_name)).await;
        self.check("crm", GatewayError::CrmSubmitFailed)?;
        Ok(CrmConfirmation {
            message: "Lead created successfully".to_string(),
            crm_response: None,
        })
    }

    async fn add_contact_to_crm(
        &self,
        contact: &CrmContact,
    ) -> Result<CrmConfirmation, GatewayError> {
        self.enter(format!("crm-contact:{}", contact.email)).await;
        self.check("crm", GatewayError::CrmSubmitFailed)?;
        Ok(CrmConfirmation {
            message: "Contact created successfully".to_string(),
            crm_response: None,
        })
    }

    async fn scrape_leads(
        &self,
        request: &ScrapeRequest,
    ) -> Result<Vec<ScrapedLead>, GatewayError> {
        self.enter("scrape".to_string()).await;
        self.check("scrape", GatewayError::ScrapeFailed)?;
        Ok(vec![ScrapedLead {
            name: "Scraped Co".to_string(),
            industry: request.industry.clone().unwrap_or_default(),
            location: request.location.clone().unwrap_or_default(),
            website: "scraped.example".to_string(),
            description: None,
            contact_info: None,
        }])
    }

    async fn fetch_analytics(&self) -> Result<AnalyticsSnapshot, GatewayError> {
        self.enter("analytics".to_string()).await;
        self.check("analytics", GatewayError::AnalyticsFetchFailed)?;
        Ok(AnalyticsSnapshot::Summary(LeadAnalytics {
            lead_distribution: [("High".to_string(), 3)].into_iter().collect(),
            lead_projection: Vec::new(),
            top_leads: Vec::new(),
        }))
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthOutcome, GatewayError> {
        self.enter("login".to_string()).await;
        self.check("login", GatewayError::AuthFailed)?;
        if credentials.password == VALID_PASSWORD {
            Ok(AuthOutcome::Granted)
        } else {
            Ok(AuthOutcome::Rejected {
                message: Some("Incorrect username or password".to_string()),
            })
        }
    }

    async fn register(&self, _credentials: &Credentials) -> Result<AuthOutcome, GatewayError> {
        self.enter("register".to_string()).await;
        self.check("register", GatewayError::AuthFailed)?;
        Ok(AuthOutcome::Granted)
    }

    async fn list_leads(&self) -> Result<Vec<Company>, GatewayError> {
        self.enter("leads".to_string()).await;
        self.check("leads", GatewayError::LeadRequestFailed)?;
        Ok(self.companies.lock().unwrap().clone())
    }

    async fn get_lead(&self, id: &str) -> Result<Company, GatewayError> {
        self.enter(format!("lead:{}", id)).await;
        self.lookup(id)
    }

    async fn create_lead(&self, lead: &Company) -> Result<Company, GatewayError> {
        self.enter("create-lead".to_string()).await;
        let mut companies = self.companies.lock().unwrap();
        let mut created = lead.clone();
        created.id = Some(format!("lead-{}", companies.len() + 1));
        companies.push(created.clone());
        Ok(created)
    }

    async fn update_lead(&self, id: &str, patch: &CompanyPatch) -> Result<Company, GatewayError> {
        self.enter(format!("update-lead:{}", id)).await;
        let mut updated = self.lookup(id)?;
        updated.apply_patch(patch);
        Ok(updated)
    }

    async fn delete_lead(&self, id: &str) -> Result<MessageResponse, GatewayError> {
        self.enter(format!("delete-lead:{}", id)).await;
        self.lookup(id)?;
        self.companies
            .lock()
            .unwrap()
            .retain(|c| c.id.as_deref() != Some(id));
        Ok(MessageResponse {
            message: "Lead deleted".to_string(),
        })
    }

    async fn search_leads(&self, query: &str) -> Result<Vec<Company>, GatewayError> {
        self.enter(format!("search-leads:{}", query)).await;
        let query = query.to_lowercase();
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }
}
