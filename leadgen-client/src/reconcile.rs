use shared_types::{Company, CompanyPatch};

use crate::ranking::rank;

/// A backend response that targets one row of the result list.
#[derive(Debug, Clone)]
pub enum Reconciliation {
    Enriched { name: String, patch: CompanyPatch },
    Insights { name: String, summary: String },
}

impl Reconciliation {
    pub fn name(&self) -> &str {
        match self {
            Reconciliation::Enriched { name, .. } | Reconciliation::Insights { name, .. } => name,
        }
    }
}

pub fn contains(current: &[Company], name: &str) -> bool {
    current.iter().any(|c| c.name == name)
}

/// Merge a row response into the result list, matching on company name.
///
/// Enrichment may move the score, so the whole list is re-ranked after it.
/// Insights never touch scores and keep the current order. A response for a
/// name that is no longer listed leaves the list as it is.
pub fn reconcile(current: &[Company], update: &Reconciliation) -> Vec<Company> {
    if !contains(current, update.name()) {
        return current.to_vec();
    }

    match update {
        Reconciliation::Enriched { name, patch } => {
            // Name is the identity key and rank is ours to assign
            let patch = CompanyPatch {
                name: None,
                rank: None,
                ..patch.clone()
            };

            let merged = current
                .iter()
                .cloned()
                .map(|mut company| {
                    if &company.name == name {
                        company.apply_patch(&patch);
                    }
                    company
                })
                .collect();
            rank(merged)
        }
        Reconciliation::Insights { name, summary } => current
            .iter()
            .cloned()
            .map(|mut company| {
                if &company.name == name {
                    company.insights_summary = Some(summary.clone());
                }
                company
            })
            .collect(),
    }
}
