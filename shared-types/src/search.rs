use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Raw search form values as typed by the user.
///
/// Employee bounds stay strings here; use [`SearchForm::to_params`] to get
/// the wire body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    pub company_name: String,
    pub industry: String,
    pub location: String,
    pub min_employees: String,
    pub max_employees: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchFormError {
    #[error("{field} must be a whole number, got {value:?}")]
    InvalidBound { field: &'static str, value: String },
}

/// Body of `POST /api/search`.
///
/// An unset bound serializes as `null`; the backend reads `0` as a real
/// bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub company_name: String,
    pub industry: String,
    pub location: String,
    pub min_employees: Option<u32>,
    pub max_employees: Option<u32>,
}

impl SearchForm {
    pub fn to_params(&self) -> Result<SearchParams, SearchFormError> {
        Ok(SearchParams {
            company_name: self.company_name.clone(),
            industry: self.industry.clone(),
            location: self.location.clone(),
            min_employees: parse_bound("minEmployees", &self.min_employees)?,
            max_employees: parse_bound("maxEmployees", &self.max_employees)?,
        })
    }
}

fn parse_bound(field: &'static str, raw: &str) -> Result<Option<u32>, SearchFormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| SearchFormError::InvalidBound {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds_serialize_as_null() {
        let form = SearchForm {
            industry: "Software".to_string(),
            ..Default::default()
        };

        let params = form.to_params().unwrap();
        let json = serde_json::to_value(&params).unwrap();

        assert!(json["minEmployees"].is_null());
        assert!(json["maxEmployees"].is_null());
        assert_eq!(json["industry"], "Software");
        assert_eq!(json["companyName"], "");
    }

    #[test]
    fn test_bounds_are_parsed() {
        let form = SearchForm {
            min_employees: " 50 ".to_string(),
            max_employees: "0".to_string(),
            ..Default::default()
        };

        let params = form.to_params().unwrap();
        assert_eq!(params.min_employees, Some(50));
        assert_eq!(params.max_employees, Some(0));
    }

    #[test]
    fn test_invalid_bound_is_rejected() {
        let form = SearchForm {
            max_employees: "lots".to_string(),
            ..Default::default()
        };

        let err = form.to_params().unwrap_err();
        assert_eq!(
            err,
            SearchFormError::InvalidBound {
                field: "maxEmployees",
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_negative_bound_is_rejected() {
        let form = SearchForm {
            min_employees: "-5".to_string(),
            ..Default::default()
        };

        assert!(form.to_params().is_err());
    }
}
