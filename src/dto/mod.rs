//! Wire-format types for the CDF API, one module per resource family.

pub mod common;
pub mod events;
pub mod files;
pub mod graphql;
pub mod login;
pub mod models;
pub mod query;
pub mod raw;
pub mod relationships;
pub mod timeseries;

pub use common::{
    IDENTITY, Identity, InstanceId, Items, ItemsWithCursor, ItemsWithIgnoreUnknownIds, Metadata,
    TimeRange, format_timestamp_ms,
};
pub use query::{NoParams, QueryPairs, QueryParams};
