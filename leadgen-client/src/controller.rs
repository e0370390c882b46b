use extractors::crm_lead_from_company;
use shared_types::{Credentials, ScrapeRequest, SearchForm, SearchParams, Session};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::gateway::{GatewayError, LeadBackend};
use crate::helpers::session_store::SessionStore;
use crate::view_state::{Notification, Outcome, RequestKind, RowAction, Ticket, View, ViewState};

/// Drives [`ViewState`] with real backend calls.
///
/// Every call runs on its own tokio task so navigation can abort it. The
/// state lock is only taken around synchronous transitions.
pub struct Controller<B: LeadBackend + 'static> {
    backend: Arc<B>,
    state: Arc<Mutex<ViewState>>,
    in_flight: Arc<Mutex<HashMap<Ticket, AbortHandle>>>,
    session_store: Option<SessionStore>,
}

impl<B: LeadBackend + 'static> Clone for Controller<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            state: self.state.clone(),
            in_flight: self.in_flight.clone(),
            session_store: self.session_store.clone(),
        }
    }
}

impl<B: LeadBackend + 'static> Controller<B> {
    pub fn new(backend: B, session: Session) -> Self {
        Self {
            backend: Arc::new(backend),
            state: Arc::new(Mutex::new(ViewState::new(session))),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            session_store: None,
        }
    }

    /// Persist login and logout to `store`.
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().await
    }

    pub async fn drain_notifications(&self) -> Vec<Notification> {
        self.state.lock().await.drain_notifications()
    }

    async fn dispatch<T, F>(
        &self,
        ticket: Ticket,
        call: F,
    ) -> Result<std::result::Result<T, GatewayError>>
    where
        T: Send + 'static,
        F: Future<Output = std::result::Result<T, GatewayError>> + Send + 'static,
    {
        let mut in_flight = self.in_flight.lock().await;
        let handle = tokio::spawn(call);
        in_flight.insert(ticket, handle.abort_handle());
        drop(in_flight);

        let joined = handle.await;
        self.in_flight.lock().await.remove(&ticket);

        match joined {
            Ok(result) => Ok(result),
            Err(e) => {
                self.state.lock().await.abandon(ticket);
                if e.is_cancelled() {
                    debug!("Request {} was cancelled", ticket);
                    Err(ClientError::Cancelled)
                } else {
                    warn!("Request {} failed: {}", ticket, e);
                    Err(ClientError::TaskFailed(e.to_string()))
                }
            }
        }
    }

    async fn abort(&self, tickets: Vec<Ticket>) {
        if tickets.is_empty() {
            return;
        }

        let mut in_flight = self.in_flight.lock().await;
        for ticket in tickets {
            if let Some(handle) = in_flight.remove(&ticket) {
                handle.abort();
            }
        }
    }

    pub async fn navigate(&self, to: View) -> Result<()> {
        let cancelled = self.state.lock().await.navigate(to)?;
        self.abort(cancelled).await;
        Ok(())
    }

    /// Validate the raw form, then search. Bad bounds become a notification
    /// and no request is sent.
    pub async fn search(&self, form: &SearchForm) -> Result<Outcome> {
        let params = match form.to_params() {
            Ok(params) => params,
            Err(e) => {
                self.state
                    .lock()
                    .await
                    .push_notification(Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        self.search_params(params).await
    }

    pub async fn search_params(&self, params: SearchParams) -> Result<Outcome> {
        let ticket = self.state.lock().await.begin_search(params.clone())?;

        let backend = self.backend.clone();
        let result = self
            .dispatch(ticket, async move { backend.search(&params).await })
            .await?;

        self.state.lock().await.complete_search(ticket, result)
    }

    pub async fn enrich(&self, name: &str) -> Result<Outcome> {
        let (ticket, company) = self.state.lock().await.begin_row(name, RowAction::Enrich)?;

        let backend = self.backend.clone();
        let result = self
            .dispatch(ticket, async move { backend.enrich(&company.name).await })
            .await?;

        self.state.lock().await.complete_enrich(ticket, result)
    }

    /// Fetch insights for a row and open the insights view on success.
    pub async fn insights(&self, name: &str) -> Result<Outcome> {
        let (ticket, company) = self
            .state
            .lock()
            .await
            .begin_row(name, RowAction::Insights)?;

        let backend = self.backend.clone();
        let result = self
            .dispatch(ticket, async move { backend.fetch_insights(&company).await })
            .await?;

        let outcome = self.state.lock().await.complete_insights(ticket, result)?;
        if outcome == Outcome::Applied {
            self.navigate(View::Insights).await?;
        }
        Ok(outcome)
    }

    pub async fn add_to_crm(&self, name: &str) -> Result<Outcome> {
        let (ticket, company) = self
            .state
            .lock()
            .await
            .begin_row(name, RowAction::CrmSubmit)?;

        let lead = crm_lead_from_company(&company);
        let backend = self.backend.clone();
        let result = self
            .dispatch(ticket, async move { backend.add_to_crm(&lead).await })
            .await?;

        self.state.lock().await.complete_crm(ticket, result)
    }

    /// Scrape new leads. When a search has run before, it is repeated so the
    /// dashboard picks up whatever the scrape stored.
    pub async fn scrape(&self, industry: &str, location: &str) -> Result<Outcome> {
        let ticket = self.state.lock().await.begin_scrape()?;

        let request = ScrapeRequest::new(industry, location);
        let backend = self.backend.clone();
        let result = self
            .dispatch(ticket, async move { backend.scrape_leads(&request).await })
            .await?;

        let outcome = self.state.lock().await.complete_scrape(ticket, result)?;
        if outcome == Outcome::Applied {
            let last_search = self.state.lock().await.last_search().cloned();
            if let Some(params) = last_search {
                if let Err(e) = self.search_params(params).await {
                    warn!("Refreshing results after scrape failed: {}", e);
                }
            }
        }
        Ok(outcome)
    }

    pub async fn open_analytics(&self) -> Result<Outcome> {
        if self.state.lock().await.view() != View::Analytics {
            self.navigate(View::Analytics).await?;
        }
        let ticket = self.state.lock().await.begin_analytics()?;

        let backend = self.backend.clone();
        let result = self
            .dispatch(ticket, async move { backend.fetch_analytics().await })
            .await?;

        self.state.lock().await.complete_analytics(ticket, result)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Outcome> {
        self.authenticate(RequestKind::Login, Credentials::new(username, password))
            .await
    }

    /// Register a new account. The password is checked against its
    /// confirmation before anything is sent.
    pub async fn register(&self, username: &str, password: &str, confirm: &str) -> Result<Outcome> {
        if password != confirm {
            self.state
                .lock()
                .await
                .push_notification(Notification::error("Passwords do not match"));
            return Err(ClientError::PasswordMismatch);
        }

        self.authenticate(RequestKind::Register, Credentials::new(username, password))
            .await
    }

    async fn authenticate(&self, kind: RequestKind, credentials: Credentials) -> Result<Outcome> {
        let ticket = self.state.lock().await.begin_auth(kind)?;

        let username = credentials.username.clone();
        let backend = self.backend.clone();
        let result = self
            .dispatch(ticket, async move {
                match kind {
                    RequestKind::Register => backend.register(&credentials).await,
                    _ => backend.login(&credentials).await,
                }
            })
            .await?;

        let (outcome, session) = {
            let mut state = self.state.lock().await;
            let outcome = state.complete_auth(ticket, &username, result)?;
            (outcome, state.session().clone())
        };

        if outcome == Outcome::Applied {
            if let Some(store) = &self.session_store {
                store.save(&session)?;
            }
        }
        Ok(outcome)
    }

    pub async fn logout(&self) -> Result<()> {
        let cancelled = self.state.lock().await.logout();
        self.abort(cancelled).await;

        if let Some(store) = &self.session_store {
            store.clear()?;
        }
        info!("Logged out");
        Ok(())
    }
}
