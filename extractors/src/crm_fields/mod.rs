mod contact;
mod location;
mod website;

pub use contact::split_contact;
pub use location::split_location;
pub use website::normalize_website;

use shared_types::{Company, CrmLead, DEFAULT_LEAD_SOURCE, DEFAULT_LEAD_STATUS};

/// Build the CRM lead payload for a company.
///
/// Location and contact text are split heuristically; empty strings and a
/// zero employee count are sent as `null`.
pub fn crm_lead_from_company(company: &Company) -> CrmLead {
    let location = split_location(&company.location);
    let contact = company
        .contact_info
        .as_deref()
        .map(split_contact)
        .unwrap_or_default();

    CrmLead {
        company_name: company.name.clone(),
        first_name: contact.first_name,
        last_name: contact.last_name,
        email: contact.email,
        phone: None,
        website: normalize_website(&company.website),
        industry: non_empty(&company.industry),
        city: location.city,
        state: location.state,
        country: location.country,
        employee_count: (company.employee_count > 0).then_some(company.employee_count),
        revenue: non_empty(&company.revenue),
        description: company.description.as_deref().and_then(non_empty),
        contact_info: company.contact_info.as_deref().and_then(non_empty),
        lead_source: Some(DEFAULT_LEAD_SOURCE.to_string()),
        lead_status: Some(DEFAULT_LEAD_STATUS.to_string()),
    }
}

fn non_empty(value: &str) -> Option<String> {
    Some(value.to_string()).filter(|s| !s.is_empty())
}
