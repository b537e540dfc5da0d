//! Purpose: Client library for the Cognite Data Fusion REST API, used by the `cdf` CLI and tests.
//! Exports: `api` (client, config, resource handles), `dto` (wire types), `core` (errors and
//! the untagged-union decoder).
//! Role: Typed request/response models plus a blocking HTTP client.
//! Invariants: Polymorphic payloads without a type tag decode through `core::union` only.
//! Invariants: Every fallible public operation returns `core::error::Error`.
pub mod api;
pub mod core;
pub mod dto;
#[doc(hidden)]
pub mod json;
