//! Screen state, result list and in-flight request bookkeeping.
//!
//! Everything here is synchronous. The async [`crate::Controller`] starts a
//! request with one of the `begin_*` methods, runs the backend call, then
//! hands the result to the matching `complete_*` method. Completions are
//! applied in the order they arrive.

use shared_types::{
    AnalyticsSnapshot, AuthOutcome, Company, CompanyPatch, CrmConfirmation, InsightsResponse,
    ScrapedLead, SearchParams, Session,
};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::gateway::GatewayError;
use crate::ranking::rank;
use crate::reconcile::{contains, reconcile, Reconciliation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Register,
    Dashboard,
    Insights,
    Analytics,
    Scrape,
}

impl View {
    pub fn requires_session(self) -> bool {
        !matches!(self, View::Login | View::Register)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Login => "login",
            View::Register => "register",
            View::Dashboard => "dashboard",
            View::Insights => "insights",
            View::Analytics => "analytics",
            View::Scrape => "scrape",
        };
        f.write_str(name)
    }
}

/// Per-row actions that show a loading flag on their row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Enrich,
    Insights,
    CrmSubmit,
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RowAction::Enrich => "enrichment",
            RowAction::Insights => "insights",
            RowAction::CrmSubmit => "CRM submit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Search,
    Row(RowAction),
    Scrape,
    Analytics,
    Login,
    Register,
}

impl RequestKind {
    /// The view whose screen shows this request's result.
    pub fn origin(self) -> View {
        match self {
            RequestKind::Search | RequestKind::Row(_) => View::Dashboard,
            RequestKind::Scrape => View::Scrape,
            RequestKind::Analytics => View::Analytics,
            RequestKind::Login => View::Login,
            RequestKind::Register => View::Register,
        }
    }
}

/// Identity of one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(Uuid);

impl Ticket {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct PendingRequest {
    kind: RequestKind,
    row: Option<String>,
    generation: u64,
}

/// What happened to a completed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The response arrived for a request that was cancelled, or for rows
    /// that a newer search already replaced.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Transient user-facing message, the toast of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

pub struct ViewState {
    session: Session,
    view: View,
    results: Vec<Company>,
    generation: u64,
    pending: HashMap<Ticket, PendingRequest>,
    selected: Option<Company>,
    scraped: Vec<ScrapedLead>,
    analytics: Option<AnalyticsSnapshot>,
    last_search: Option<SearchParams>,
    notifications: VecDeque<Notification>,
}

impl ViewState {
    /// Opens on the dashboard when `session` says the user is logged in,
    /// otherwise on the login screen.
    pub fn new(session: Session) -> Self {
        let view = if session.logged_in {
            View::Dashboard
        } else {
            View::Login
        };

        Self {
            session,
            view,
            results: Vec::new(),
            generation: 0,
            pending: HashMap::new(),
            selected: None,
            scraped: Vec::new(),
            analytics: None,
            last_search: None,
            notifications: VecDeque::new(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.logged_in
    }

    pub fn results(&self) -> &[Company] {
        &self.results
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected_company(&self) -> Option<&Company> {
        self.selected.as_ref()
    }

    pub fn scraped_leads(&self) -> &[ScrapedLead] {
        &self.scraped
    }

    pub fn analytics(&self) -> Option<&AnalyticsSnapshot> {
        self.analytics.as_ref()
    }

    pub fn last_search(&self) -> Option<&SearchParams> {
        self.last_search.as_ref()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.pending.values().any(|p| p.kind == kind)
    }

    /// Whether `name` shows a loading flag for `action`.
    pub fn is_busy(&self, name: &str, action: RowAction) -> bool {
        self.pending
            .values()
            .any(|p| p.kind == RequestKind::Row(action) && p.row.as_deref() == Some(name))
    }

    pub fn busy_rows(&self, action: RowAction) -> Vec<&str> {
        self.pending
            .values()
            .filter(|p| p.kind == RequestKind::Row(action))
            .filter_map(|p| p.row.as_deref())
            .collect()
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn can_navigate(&self, to: View) -> bool {
        use View::*;

        match (self.session.logged_in, self.view, to) {
            (_, from, to) if from == to => true,
            (false, Login, Register) | (false, Register, Login) => true,
            (true, Dashboard, Insights) => self.selected.is_some(),
            (true, Dashboard, Analytics | Scrape) => true,
            (true, Insights | Analytics | Scrape, Dashboard) => true,
            _ => false,
        }
    }

    /// Switch screens.
    ///
    /// Requests started from the view being left are dropped and their
    /// tickets returned so the caller can abort the underlying calls. Leaving
    /// the dashboard drops the result list; the selected company survives.
    pub fn navigate(&mut self, to: View) -> Result<Vec<Ticket>> {
        if !self.can_navigate(to) {
            return Err(ClientError::Navigation {
                from: self.view,
                to,
            });
        }
        if self.view == to {
            return Ok(Vec::new());
        }

        let left = self.view;
        let cancelled = self.cancel_where(|p| p.kind.origin() == left);
        match left {
            View::Dashboard => {
                self.results.clear();
                self.generation += 1;
            }
            View::Insights => self.selected = None,
            _ => {}
        }

        debug!("Navigating from {} to {}", left, to);
        self.view = to;
        Ok(cancelled)
    }

    /// Clear the session and everything derived from it.
    pub fn logout(&mut self) -> Vec<Ticket> {
        let cancelled = self.cancel_where(|_| true);

        info!(
            "Logging out {}",
            self.session.username.as_deref().unwrap_or("anonymous user")
        );
        self.session.clear();
        self.view = View::Login;
        self.results.clear();
        self.selected = None;
        self.scraped.clear();
        self.analytics = None;
        self.last_search = None;
        cancelled
    }

    /// Forget a request whose task died without producing a response.
    pub fn abandon(&mut self, ticket: Ticket) {
        if self.pending.remove(&ticket).is_some() {
            debug!("Abandoned request {}", ticket);
        }
    }

    fn cancel_where(&mut self, predicate: impl Fn(&PendingRequest) -> bool) -> Vec<Ticket> {
        let tickets: Vec<Ticket> = self
            .pending
            .iter()
            .filter(|(_, p)| predicate(p))
            .map(|(ticket, _)| *ticket)
            .collect();

        for ticket in &tickets {
            self.pending.remove(ticket);
        }
        if !tickets.is_empty() {
            debug!("Cancelled {} in-flight request(s)", tickets.len());
        }
        tickets
    }

    fn register_pending(&mut self, kind: RequestKind, row: Option<String>) -> Ticket {
        let ticket = Ticket::new();
        self.pending.insert(
            ticket,
            PendingRequest {
                kind,
                row,
                generation: self.generation,
            },
        );
        ticket
    }

    fn require_session(&self) -> Result<()> {
        if self.session.logged_in {
            Ok(())
        } else {
            Err(ClientError::NotAuthenticated)
        }
    }

    pub fn begin_search(&mut self, params: SearchParams) -> Result<Ticket> {
        self.require_session()?;
        self.last_search = Some(params);
        Ok(self.register_pending(RequestKind::Search, None))
    }

    /// Start a row action and return a snapshot of the targeted company.
    ///
    /// Rows are only actionable while the dashboard is showing them.
    pub fn begin_row(&mut self, name: &str, action: RowAction) -> Result<(Ticket, Company)> {
        self.require_session()?;
        if self.view != View::Dashboard {
            return Err(ClientError::OffDashboard {
                action,
                view: self.view,
            });
        }

        let company = self
            .results
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| ClientError::UnknownCompany(name.to_string()))?;

        if self.is_busy(name, action) {
            return Err(ClientError::AlreadyInFlight {
                name: name.to_string(),
                action,
            });
        }

        let ticket = self.register_pending(RequestKind::Row(action), Some(name.to_string()));
        Ok((ticket, company))
    }

    pub fn begin_scrape(&mut self) -> Result<Ticket> {
        self.require_session()?;
        Ok(self.register_pending(RequestKind::Scrape, None))
    }

    pub fn begin_analytics(&mut self) -> Result<Ticket> {
        self.require_session()?;
        Ok(self.register_pending(RequestKind::Analytics, None))
    }

    pub fn begin_auth(&mut self, kind: RequestKind) -> Result<Ticket> {
        if self.session.logged_in {
            return Err(ClientError::AlreadyAuthenticated);
        }
        Ok(self.register_pending(kind, None))
    }

    /// Replace the result list with a fresh, ranked search response.
    pub fn complete_search(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<Vec<Company>, GatewayError>,
    ) -> Result<Outcome> {
        if self.pending.remove(&ticket).is_none() {
            return Ok(Outcome::Discarded);
        }

        match result {
            Ok(companies) => {
                info!("Search returned {} companies", companies.len());
                self.results = rank(companies);
                self.generation += 1;
                Ok(Outcome::Applied)
            }
            Err(e) => {
                self.push_notification(Notification::error(
                    "Failed to search companies. Please try again.",
                ));
                Err(e.into())
            }
        }
    }

    pub fn complete_enrich(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<CompanyPatch, GatewayError>,
    ) -> Result<Outcome> {
        let Some((pending, name)) = self.take_row(ticket) else {
            return Ok(Outcome::Discarded);
        };

        match result {
            Ok(patch) => {
                if self.is_stale(&pending, &name) {
                    debug!("Dropping stale enrichment for {}", name);
                    return Ok(Outcome::Discarded);
                }
                self.results = reconcile(&self.results, &Reconciliation::Enriched { name, patch });
                Ok(Outcome::Applied)
            }
            Err(e) => {
                self.push_notification(Notification::error(format!(
                    "Failed to enrich {}. Please try again.",
                    name
                )));
                Err(e.into())
            }
        }
    }

    /// Store the summary on its row and select that company for the insights
    /// screen. Navigation is left to the caller.
    pub fn complete_insights(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<InsightsResponse, GatewayError>,
    ) -> Result<Outcome> {
        let Some((pending, name)) = self.take_row(ticket) else {
            return Ok(Outcome::Discarded);
        };

        match result {
            Ok(response) => {
                if self.is_stale(&pending, &name) {
                    debug!("Dropping stale insights for {}", name);
                    return Ok(Outcome::Discarded);
                }
                self.results = reconcile(
                    &self.results,
                    &Reconciliation::Insights {
                        name: name.clone(),
                        summary: response.insights_summary,
                    },
                );
                self.selected = self.results.iter().find(|c| c.name == name).cloned();
                Ok(Outcome::Applied)
            }
            Err(e) => {
                self.push_notification(Notification::error(format!(
                    "Failed to get insights for {}. Please try again.",
                    name
                )));
                Err(e.into())
            }
        }
    }

    pub fn complete_crm(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<CrmConfirmation, GatewayError>,
    ) -> Result<Outcome> {
        let Some((_, name)) = self.take_row(ticket) else {
            return Ok(Outcome::Discarded);
        };

        match result {
            Ok(confirmation) => {
                info!("CRM accepted {}: {}", name, confirmation.message);
                self.push_notification(Notification::success(format!(
                    "Successfully added {} to CRM!",
                    name
                )));
                Ok(Outcome::Applied)
            }
            Err(e) => {
                self.push_notification(Notification::error(format!(
                    "Failed to add {} to CRM. Please try again.",
                    name
                )));
                Err(e.into())
            }
        }
    }

    pub fn complete_scrape(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<Vec<ScrapedLead>, GatewayError>,
    ) -> Result<Outcome> {
        if self.pending.remove(&ticket).is_none() {
            return Ok(Outcome::Discarded);
        }

        match result {
            Ok(leads) => {
                self.push_notification(Notification::success(format!(
                    "Scraped {} new leads!",
                    leads.len()
                )));
                self.scraped = leads;
                Ok(Outcome::Applied)
            }
            Err(e) => {
                self.push_notification(Notification::error(
                    "Failed to scrape leads. Please try again.",
                ));
                Err(e.into())
            }
        }
    }

    pub fn complete_analytics(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<AnalyticsSnapshot, GatewayError>,
    ) -> Result<Outcome> {
        if self.pending.remove(&ticket).is_none() {
            return Ok(Outcome::Discarded);
        }

        match result {
            Ok(snapshot) => {
                self.analytics = Some(snapshot);
                Ok(Outcome::Applied)
            }
            Err(e) => {
                self.push_notification(Notification::error(
                    "Failed to load analytics. Please try again.",
                ));
                Err(e.into())
            }
        }
    }

    /// Grant the session on success and move to the dashboard.
    ///
    /// Rejections surface the backend's message verbatim when it sent one.
    pub fn complete_auth(
        &mut self,
        ticket: Ticket,
        username: &str,
        result: std::result::Result<AuthOutcome, GatewayError>,
    ) -> Result<Outcome> {
        let Some(pending) = self.pending.remove(&ticket) else {
            return Ok(Outcome::Discarded);
        };
        let registering = pending.kind == RequestKind::Register;

        match result {
            Ok(AuthOutcome::Granted) => {
                info!("Session granted for {}", username);
                self.session = Session::for_user(username);
                self.view = View::Dashboard;
                Ok(Outcome::Applied)
            }
            Ok(AuthOutcome::Rejected { message }) => {
                let fallback = if registering {
                    "Registration failed"
                } else {
                    "Login failed"
                };
                let message = message.unwrap_or_else(|| fallback.to_string());
                self.push_notification(Notification::error(message.clone()));
                Err(ClientError::AuthRejected(message))
            }
            Err(e) => {
                let message = if registering {
                    "An error occurred during registration."
                } else {
                    "An error occurred during login."
                };
                self.push_notification(Notification::error(message));
                Err(e.into())
            }
        }
    }

    fn take_row(&mut self, ticket: Ticket) -> Option<(PendingRequest, String)> {
        let pending = self.pending.remove(&ticket)?;
        let name = pending.row.clone()?;
        Some((pending, name))
    }

    fn is_stale(&self, pending: &PendingRequest, name: &str) -> bool {
        pending.generation != self.generation || !contains(&self.results, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RequestFailure;

    fn logged_in() -> ViewState {
        ViewState::new(Session::for_user("jane"))
    }

    fn with_results(companies: Vec<Company>) -> ViewState {
        let mut state = logged_in();
        let ticket = state.begin_search(SearchParams::default()).unwrap();
        state.complete_search(ticket, Ok(companies)).unwrap();
        state
    }

    fn http_500() -> RequestFailure {
        RequestFailure::Status {
            status: 500,
            detail: None,
        }
    }

    fn ranked_names(state: &ViewState) -> Vec<(String, u32)> {
        state
            .results()
            .iter()
            .map(|c| (c.name.clone(), c.rank.unwrap()))
            .collect()
    }

    #[test]
    fn test_initial_view_follows_session() {
        assert_eq!(ViewState::new(Session::anonymous()).view(), View::Login);
        assert_eq!(logged_in().view(), View::Dashboard);
    }

    #[test]
    fn test_navigation_rules() {
        let mut state = ViewState::new(Session::anonymous());
        assert!(state.navigate(View::Dashboard).is_err());
        state.navigate(View::Register).unwrap();
        state.navigate(View::Login).unwrap();

        let mut state = logged_in();
        state.navigate(View::Analytics).unwrap();
        assert!(matches!(
            state.navigate(View::Scrape),
            Err(ClientError::Navigation {
                from: View::Analytics,
                to: View::Scrape
            })
        ));
        state.navigate(View::Dashboard).unwrap();
        state.navigate(View::Scrape).unwrap();
        state.navigate(View::Dashboard).unwrap();

        // Login is only reachable through logout
        assert!(state.navigate(View::Login).is_err());
        // Insights needs a selected company
        assert!(state.navigate(View::Insights).is_err());
    }

    #[test]
    fn test_login_grants_dashboard() {
        let mut state = ViewState::new(Session::anonymous());
        let ticket = state.begin_auth(RequestKind::Login).unwrap();

        let outcome = state
            .complete_auth(ticket, "jane", Ok(AuthOutcome::Granted))
            .unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(state.view(), View::Dashboard);
        assert_eq!(state.session().username.as_deref(), Some("jane"));
        assert!(matches!(
            state.begin_auth(RequestKind::Login),
            Err(ClientError::AlreadyAuthenticated)
        ));
    }

    #[test]
    fn test_login_rejection_uses_backend_message() {
        let mut state = ViewState::new(Session::anonymous());
        let ticket = state.begin_auth(RequestKind::Login).unwrap();

        let err = state
            .complete_auth(
                ticket,
                "jane",
                Ok(AuthOutcome::Rejected {
                    message: Some("Incorrect username or password".to_string()),
                }),
            )
            .unwrap_err();

        assert!(matches!(err, ClientError::AuthRejected(ref m) if m == "Incorrect username or password"));
        assert_eq!(state.view(), View::Login);
        assert_eq!(
            state.drain_notifications(),
            vec![Notification::error("Incorrect username or password")]
        );
    }

    #[test]
    fn test_register_rejection_falls_back() {
        let mut state = ViewState::new(Session::anonymous());
        state.navigate(View::Register).unwrap();
        let ticket = state.begin_auth(RequestKind::Register).unwrap();

        let _ = state.complete_auth(ticket, "jane", Ok(AuthOutcome::Rejected { message: None }));
        assert_eq!(
            state.drain_notifications(),
            vec![Notification::error("Registration failed")]
        );

        let ticket = state.begin_auth(RequestKind::Register).unwrap();
        let _ = state.complete_auth(
            ticket,
            "jane",
            Err(GatewayError::AuthFailed(RequestFailure::Transport(
                "refused".to_string(),
            ))),
        );
        assert_eq!(
            state.drain_notifications(),
            vec![Notification::error("An error occurred during registration.")]
        );
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut state = with_results(vec![Company::new("A")]);
        let (ticket, _) = state.begin_row("A", RowAction::Enrich).unwrap();

        let cancelled = state.logout();

        assert_eq!(cancelled, vec![ticket]);
        assert_eq!(state.view(), View::Login);
        assert!(!state.is_authenticated());
        assert!(state.results().is_empty());
        assert!(state.last_search().is_none());
        assert_eq!(state.pending_count(), 0);
        assert!(matches!(
            state.begin_search(SearchParams::default()),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_search_ranks_results() {
        let state = with_results(vec![
            Company::new("A").with_score(5.0),
            Company::new("B").with_score(8.0),
        ]);

        assert_eq!(
            ranked_names(&state),
            vec![("B".to_string(), 1), ("A".to_string(), 2)]
        );
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn test_failed_search_keeps_previous_results() {
        let mut state = with_results(vec![Company::new("A").with_score(1.0)]);
        let before = state.results().to_vec();

        let ticket = state.begin_search(SearchParams::default()).unwrap();
        let err = state
            .complete_search(ticket, Err(GatewayError::SearchFailed(http_500())))
            .unwrap_err();

        assert!(matches!(err, ClientError::Gateway(GatewayError::SearchFailed(_))));
        assert_eq!(state.results(), before.as_slice());
        assert_eq!(state.generation(), 1);
        assert_eq!(
            state.drain_notifications(),
            vec![Notification::error("Failed to search companies. Please try again.")]
        );
    }

    #[test]
    fn test_enrichment_merge_reranks() {
        let mut state = with_results(vec![
            Company::new("A").with_score(5.0),
            Company::new("B").with_score(8.0),
        ]);

        let (ticket, company) = state.begin_row("A", RowAction::Enrich).unwrap();
        assert_eq!(company.name, "A");
        assert!(state.is_busy("A", RowAction::Enrich));

        let patch = CompanyPatch {
            probability_score: Some(9.0),
            ..Default::default()
        };
        let outcome = state.complete_enrich(ticket, Ok(patch)).unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert!(!state.is_busy("A", RowAction::Enrich));
        assert_eq!(
            ranked_names(&state),
            vec![("A".to_string(), 1), ("B".to_string(), 2)]
        );
    }

    #[test]
    fn test_failed_enrichment_clears_flag() {
        let mut state = with_results(vec![Company::new("A")]);
        let (ticket, _) = state.begin_row("A", RowAction::Enrich).unwrap();

        let result = state.complete_enrich(ticket, Err(GatewayError::EnrichmentFailed(http_500())));

        assert!(result.is_err());
        assert!(!state.is_busy("A", RowAction::Enrich));
        assert_eq!(
            state.drain_notifications(),
            vec![Notification::error("Failed to enrich A. Please try again.")]
        );
    }

    #[test]
    fn test_same_row_same_action_is_rejected() {
        let mut state = with_results(vec![Company::new("A"), Company::new("B")]);
        state.begin_row("A", RowAction::Enrich).unwrap();

        assert!(matches!(
            state.begin_row("A", RowAction::Enrich),
            Err(ClientError::AlreadyInFlight { action: RowAction::Enrich, .. })
        ));
        // Other rows and other actions on the same row are fine
        state.begin_row("B", RowAction::Enrich).unwrap();
        state.begin_row("A", RowAction::CrmSubmit).unwrap();

        let mut busy = state.busy_rows(RowAction::Enrich);
        busy.sort_unstable();
        assert_eq!(busy, vec!["A", "B"]);
    }

    #[test]
    fn test_concurrent_rows_clear_only_their_own_flag() {
        let mut state = with_results(vec![Company::new("A"), Company::new("B")]);
        let (ticket_a, _) = state.begin_row("A", RowAction::Enrich).unwrap();
        let (ticket_b, _) = state.begin_row("B", RowAction::Enrich).unwrap();

        state
            .complete_enrich(ticket_b, Ok(CompanyPatch::default()))
            .unwrap();
        assert!(state.is_busy("A", RowAction::Enrich));
        assert!(!state.is_busy("B", RowAction::Enrich));

        let _ = state.complete_enrich(ticket_a, Err(GatewayError::EnrichmentFailed(http_500())));
        assert!(!state.is_busy("A", RowAction::Enrich));
    }

    #[test]
    fn test_enrichment_after_new_search_is_discarded() {
        let mut state = with_results(vec![Company::new("A"), Company::new("B")]);
        let (ticket, _) = state.begin_row("A", RowAction::Enrich).unwrap();

        // A newer search lands first and still contains "A"
        let search = state.begin_search(SearchParams::default()).unwrap();
        state
            .complete_search(search, Ok(vec![Company::new("A").with_score(1.0)]))
            .unwrap();

        let patch = CompanyPatch {
            probability_score: Some(9.0),
            ..Default::default()
        };
        let outcome = state.complete_enrich(ticket, Ok(patch)).unwrap();

        assert_eq!(outcome, Outcome::Discarded);
        assert_eq!(state.results()[0].probability_score, Some(1.0));
        assert!(!state.is_busy("A", RowAction::Enrich));
    }

    #[test]
    fn test_row_actions_need_the_dashboard() {
        let mut state = with_results(vec![Company::new("A")]);
        state.navigate(View::Scrape).unwrap();

        // The refresh after a scrape refills the list while Scrape is showing
        let ticket = state.begin_search(SearchParams::default()).unwrap();
        state
            .complete_search(ticket, Ok(vec![Company::new("A")]))
            .unwrap();
        assert_eq!(state.results().len(), 1);

        assert!(matches!(
            state.begin_row("A", RowAction::Insights),
            Err(ClientError::OffDashboard {
                action: RowAction::Insights,
                view: View::Scrape
            })
        ));
        assert_eq!(state.pending_count(), 0);
        assert!(state.selected_company().is_none());
    }

    #[test]
    fn test_unknown_row_is_rejected() {
        let mut state = with_results(vec![Company::new("A")]);

        assert!(matches!(
            state.begin_row("Z", RowAction::Insights),
            Err(ClientError::UnknownCompany(ref n)) if n == "Z"
        ));
    }

    #[test]
    fn test_insights_select_company_without_reranking() {
        let mut state = with_results(vec![
            Company::new("A").with_score(5.0),
            Company::new("B").with_score(8.0),
        ]);
        let (ticket, _) = state.begin_row("A", RowAction::Insights).unwrap();

        state
            .complete_insights(
                ticket,
                Ok(InsightsResponse {
                    insights_summary: "Strong growth".to_string(),
                }),
            )
            .unwrap();

        assert_eq!(
            state.selected_company().unwrap().insights_summary.as_deref(),
            Some("Strong growth")
        );
        assert_eq!(
            ranked_names(&state),
            vec![("B".to_string(), 1), ("A".to_string(), 2)]
        );

        state.navigate(View::Insights).unwrap();
        assert!(state.results().is_empty());
        assert_eq!(state.selected_company().unwrap().name, "A");

        state.navigate(View::Dashboard).unwrap();
        assert!(state.selected_company().is_none());
    }

    #[test]
    fn test_navigation_cancels_requests_from_left_view() {
        let mut state = with_results(vec![Company::new("A")]);
        let (enrich, _) = state.begin_row("A", RowAction::Enrich).unwrap();

        let cancelled = state.navigate(View::Analytics).unwrap();
        assert_eq!(cancelled, vec![enrich]);
        assert!(!state.is_busy("A", RowAction::Enrich));

        let analytics = state.begin_analytics().unwrap();
        let outcome = state
            .complete_enrich(enrich, Ok(CompanyPatch::default()))
            .unwrap();
        assert_eq!(outcome, Outcome::Discarded);

        // Analytics started here survives until we leave
        assert!(state.is_pending(RequestKind::Analytics));
        let cancelled = state.navigate(View::Dashboard).unwrap();
        assert_eq!(cancelled, vec![analytics]);
    }

    #[test]
    fn test_crm_notifications() {
        let mut state = with_results(vec![Company::new("Acme")]);

        let (ticket, _) = state.begin_row("Acme", RowAction::CrmSubmit).unwrap();
        state
            .complete_crm(
                ticket,
                Ok(CrmConfirmation {
                    message: "Lead created successfully".to_string(),
                    crm_response: None,
                }),
            )
            .unwrap();

        let (ticket, _) = state.begin_row("Acme", RowAction::CrmSubmit).unwrap();
        let _ = state.complete_crm(ticket, Err(GatewayError::CrmSubmitFailed(http_500())));

        assert_eq!(
            state.drain_notifications(),
            vec![
                Notification::success("Successfully added Acme to CRM!"),
                Notification::error("Failed to add Acme to CRM. Please try again."),
            ]
        );
        assert!(!state.is_busy("Acme", RowAction::CrmSubmit));
    }

    #[test]
    fn test_scrape_stores_leads() {
        let mut state = logged_in();
        state.navigate(View::Scrape).unwrap();
        let ticket = state.begin_scrape().unwrap();

        let lead = ScrapedLead {
            name: "Scraped Co".to_string(),
            industry: "Retail".to_string(),
            location: "Lyon, France".to_string(),
            website: "scraped.example".to_string(),
            description: None,
            contact_info: None,
        };
        state.complete_scrape(ticket, Ok(vec![lead])).unwrap();

        assert_eq!(state.scraped_leads().len(), 1);
        assert_eq!(
            state.drain_notifications(),
            vec![Notification::success("Scraped 1 new leads!")]
        );
    }
}
