//! Purpose: Internal JSON parsing boundary shared by the HTTP client and the `cdf` CLI.
//! Exports: `parse` module with decode helpers and failure categorization.
//! Role: Single seam for body decoding so callsites avoid ad hoc parse logic.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub mod parse;
