//! Client side of the lead generation dashboard: backend gateway, ranking,
//! and the screen state the front ends render.

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod helpers;
pub mod ranking;
pub mod reconcile;
pub mod view_state;

#[cfg(test)]
mod testing;

pub use controller::Controller;
pub use error::{ClientError, Result};
pub use gateway::{GatewayError, HttpGateway, LeadBackend, RequestFailure};
pub use ranking::rank;
pub use reconcile::{reconcile, Reconciliation};
pub use view_state::{Notification, Outcome, RowAction, Severity, View, ViewState};
