use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// A company lead as returned by the search backend.
///
/// `name` is the identity key inside one result set; the backend does not
/// hand out stable ids for search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Only set by the leads CRUD endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employee_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub probability_score: Option<f64>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub insights_summary: Option<String>,
}

/// Reads an explicit `null` the same way as a missing field.
///
/// The backend models most company columns as optional and sends `null` for
/// the ones it could not fill.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            industry: String::new(),
            location: String::new(),
            employee_count: 0,
            revenue: String::new(),
            website: String::new(),
            description: None,
            contact_info: None,
            probability_score: None,
            rank: None,
            insights_summary: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.probability_score = Some(score);
        self
    }

    /// Score used for ordering; missing or NaN scores count as zero.
    pub fn effective_score(&self) -> f64 {
        match self.probability_score {
            Some(score) if !score.is_nan() => score,
            _ => 0.0,
        }
    }

    /// Overwrite the fields present in `patch`, leaving the rest untouched.
    pub fn apply_patch(&mut self, patch: &CompanyPatch) {
        if let Some(id) = &patch.id {
            self.id = Some(id.clone());
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(industry) = &patch.industry {
            self.industry = industry.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(count) = patch.employee_count {
            self.employee_count = count;
        }
        if let Some(revenue) = &patch.revenue {
            self.revenue = revenue.clone();
        }
        if let Some(website) = &patch.website {
            self.website = website.clone();
        }
        if patch.description.is_some() {
            self.description = patch.description.clone();
        }
        if patch.contact_info.is_some() {
            self.contact_info = patch.contact_info.clone();
        }
        if patch.probability_score.is_some() {
            self.probability_score = patch.probability_score;
        }
        if patch.rank.is_some() {
            self.rank = patch.rank;
        }
        if patch.insights_summary.is_some() {
            self.insights_summary = patch.insights_summary.clone();
        }
    }
}

/// Partial company returned by enrichment and accepted by lead updates.
///
/// A field that is `None` was absent from the payload and must not
/// overwrite anything on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EnrichRequest {
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InsightsRequest {
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub insights_summary: String,
}
