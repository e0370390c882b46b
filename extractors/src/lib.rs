//! Extractors Crate
//!
//! Pulls structured fields out of the free-text columns a lead search
//! returns. Everything here is a pure function over `shared-types` values.
//!
//! # Available Extractors
//!
//! - `split_location`: `"City, State, Country"` into [`shared_types::LocationParts`]
//! - `split_contact`: a contact line into [`shared_types::ContactParts`]
//! - `normalize_website`: adds a scheme to bare domains
//! - `crm_lead_from_company`: assembles the CRM lead payload from the above
//!
//! # Example
//!
//! ```rust
//! use extractors::crm_lead_from_company;
//! use shared_types::Company;
//!
//! let mut company = Company::new("Acme");
//! company.location = "Austin, TX, USA".to_string();
//!
//! let lead = crm_lead_from_company(&company);
//! assert_eq!(lead.city.as_deref(), Some("Austin"));
//! ```

pub mod crm_fields;

pub use crm_fields::{crm_lead_from_company, normalize_website, split_contact, split_location};
