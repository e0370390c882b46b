use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Response of `GET /api/analytics`.
///
/// The backend has shipped two shapes for this endpoint and neither has
/// been retired, so both are accepted. The detailed shape is tried first
/// because its required fields never appear in the summary shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum AnalyticsSnapshot {
    Detailed(DetailedAnalytics),
    Summary(LeadAnalytics),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeadAnalytics {
    pub lead_distribution: BTreeMap<String, u64>,
    pub lead_projection: Vec<MonthlyProjection>,
    pub top_leads: Vec<TopLead>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyProjection {
    pub month: String,
    pub actual: u64,
    pub projected: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopLead {
    pub name: String,
    pub score: f64,
    pub trend: Trend,
    /// Percent change as rendered by the backend, e.g. `"+12%"`.
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetailedAnalytics {
    pub total_leads: u64,
    pub potential_distribution: BTreeMap<String, u64>,
    pub industry_distribution: BTreeMap<String, u64>,
    pub employee_size_distribution: BTreeMap<String, u64>,
    pub revenue_distribution: BTreeMap<String, u64>,
    pub trends: AnalyticsTrends,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalyticsTrends {
    #[serde(default)]
    pub daily_leads: Vec<DailyLeadCount>,
    #[serde(default)]
    pub potential_trend: Vec<PotentialTrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyLeadCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PotentialTrendPoint {
    pub date: String,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub low: u64,
}

impl DetailedAnalytics {
    /// The `n` largest industries, biggest first; equal counts keep name order.
    pub fn top_industries(&self, n: usize) -> Vec<(&str, u64)> {
        let mut industries: Vec<(&str, u64)> = self
            .industry_distribution
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        industries.sort_by(|a, b| b.1.cmp(&a.1));
        industries.truncate(n);
        industries
    }
}
