//! Purpose: Token and session introspection calls.
//! Exports: `Login`.
//! Invariants: Both endpoints live outside the project prefix.

use super::client::{ApiResult, CogniteClient};
use crate::dto::login::{LoginStatus, LoginStatusEnvelope, TokenInspection};
use crate::dto::query::NoParams;

pub struct Login<'a> {
    client: &'a CogniteClient,
}

impl<'a> Login<'a> {
    pub(crate) fn new(client: &'a CogniteClient) -> Self {
        Self { client }
    }

    /// Projects, groups, and capabilities granted to the current bearer token.
    pub fn inspect_token(&self) -> ApiResult<TokenInspection> {
        self.client
            .get_root_json(&["api", "v1", "token", "inspect"], &NoParams)
    }

    pub fn status(&self) -> ApiResult<LoginStatus> {
        let envelope: LoginStatusEnvelope =
            self.client.get_root_json(&["login", "status"], &NoParams)?;
        Ok(envelope.data)
    }
}
