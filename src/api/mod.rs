//! Purpose: Public client surface for the CDF REST API.
//! Exports: `CogniteClient`, `ClientConfig`, and one handle type per resource family.
//! Role: Resource handles borrow the client and translate typed DTOs to HTTP calls.
//! Invariants: Every call returns `ApiResult`; transport and API failures share `Error`.

mod client;
pub mod config;
mod events;
mod files;
mod graphql;
mod login;
mod models;
mod raw;
mod relationships;
mod timeseries;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use client::{ApiResult, CogniteClient};
pub use config::ClientConfig;
pub use events::Events;
pub use files::Files;
pub use graphql::GraphQl;
pub use login::Login;
pub use models::DataModels;
pub use raw::Raw;
pub use relationships::Relationships;
pub use timeseries::TimeSeriesResource;
