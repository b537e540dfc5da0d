//! Purpose: Blocking HTTP client for the CDF REST API.
//! Exports: `CogniteClient`, `ApiResult`.
//! Role: Owns transport, auth headers, URL building, and error-envelope mapping for every
//! resource wrapper.
//! Invariants: Base URLs are http(s) with no path; request paths are built segment by segment.
//! Invariants: Non-2xx responses become `Error` values carrying status and `x-request-id`.
//! Invariants: No retries; each call issues exactly one request.
#![allow(clippy::result_large_err)]

use super::config::ClientConfig;
use super::{DataModels, Events, Files, GraphQl, Login, Raw, Relationships, TimeSeriesResource};
use crate::core::error::{Error, ErrorKind};
use crate::dto::query::{NoParams, QueryParams};
use crate::json::parse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

pub type ApiResult<T> = Result<T, Error>;

const SDK_HEADER: &str = concat!("CogniteRustSdk:", env!("CARGO_PKG_VERSION"));
const DEFAULT_APP_ID: &str = "cognite-sdk-rust";
const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct CogniteClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    project: String,
    token: Option<String>,
    app_id: String,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    missing: Vec<Value>,
    #[serde(default)]
    duplicated: Vec<Value>,
}

impl CogniteClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        if config.project.trim().is_empty() {
            return Err(Error::new(ErrorKind::Usage).with_message("project must not be empty"));
        }
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                project: config.project,
                token: config.token,
                app_id: config.app_id.unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
                agent,
            }),
        })
    }

    pub fn from_env() -> ApiResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn project(&self) -> &str {
        &self.inner.project
    }

    pub fn events(&self) -> Events<'_> {
        Events::new(self)
    }

    pub fn files(&self) -> Files<'_> {
        Files::new(self)
    }

    pub fn timeseries(&self) -> TimeSeriesResource<'_> {
        TimeSeriesResource::new(self)
    }

    pub fn raw(&self) -> Raw<'_> {
        Raw::new(self)
    }

    pub fn relationships(&self) -> Relationships<'_> {
        Relationships::new(self)
    }

    pub fn login(&self) -> Login<'_> {
        Login::new(self)
    }

    pub fn models(&self) -> DataModels<'_> {
        DataModels::new(self)
    }

    pub fn graphql(&self) -> GraphQl<'_> {
        GraphQl::new(self)
    }

    /// GET `/api/v1/projects/<project>/<segments>` with `query` appended.
    pub fn get_json<R, Q>(&self, segments: &[&str], query: &Q) -> ApiResult<R>
    where
        R: DeserializeOwned,
        Q: QueryParams + ?Sized,
    {
        let url = self.project_url(segments)?;
        self.get_json_at(url, query)
    }

    /// POST a JSON body to `/api/v1/projects/<project>/<segments>`.
    pub fn post_json<T, R>(&self, segments: &[&str], body: &T) -> ApiResult<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.post_json_with(segments, &NoParams, body)
    }

    pub(crate) fn post_json_with<Q, T, R>(
        &self,
        segments: &[&str],
        query: &Q,
        body: &T,
    ) -> ApiResult<R>
    where
        Q: QueryParams + ?Sized,
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut url = self.project_url(segments)?;
        append_query(&mut url, query);
        let response = self.execute("POST", &url, Some(encode_body(body)?))?;
        read_json_response(response)
    }

    /// POST where the response body carries nothing of interest (deletes, row inserts).
    pub(crate) fn post_empty<Q, T>(
        &self,
        segments: &[&str],
        query: &Q,
        body: &T,
    ) -> ApiResult<()>
    where
        Q: QueryParams + ?Sized,
        T: Serialize + ?Sized,
    {
        let mut url = self.project_url(segments)?;
        append_query(&mut url, query);
        let response = self.execute("POST", &url, Some(encode_body(body)?))?;
        response.into_string().map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read response body")
                .with_source(err)
        })?;
        Ok(())
    }

    /// GET a path relative to the base URL rather than the project.
    pub(crate) fn get_root_json<R, Q>(&self, segments: &[&str], query: &Q) -> ApiResult<R>
    where
        R: DeserializeOwned,
        Q: QueryParams + ?Sized,
    {
        let url = build_url(&self.inner.base_url, segments)?;
        self.get_json_at(url, query)
    }

    fn get_json_at<R, Q>(&self, mut url: Url, query: &Q) -> ApiResult<R>
    where
        R: DeserializeOwned,
        Q: QueryParams + ?Sized,
    {
        append_query(&mut url, query);
        let response = self.execute("GET", &url, None)?;
        read_json_response(response)
    }

    fn project_url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut path = vec!["api", "v1", "projects", self.inner.project.as_str()];
        path.extend_from_slice(segments);
        build_url(&self.inner.base_url, &path)
    }

    fn execute(&self, method: &str, url: &Url, body: Option<String>) -> ApiResult<ureq::Response> {
        tracing::debug!(method, url = %url, "sending request");
        let request = self.request(method, url).set("Accept", "application/json");
        let response = match body {
            Some(payload) => request
                .set("Content-Type", "application/json")
                .send_string(&payload),
            None => request.call(),
        };

        match response {
            Ok(resp) => {
                let request_id = resp.header(REQUEST_ID_HEADER).unwrap_or("-");
                tracing::debug!(status = resp.status(), request_id, "received response");
                Ok(resp)
            }
            Err(ureq::Error::Status(code, resp)) => Err(parse_error_response(code, resp)),
            Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Io)
                .with_message(format!("request to {url} failed"))
                .with_source(err)),
        }
    }

    fn request(&self, method: &str, url: &Url) -> ureq::Request {
        let mut request = self
            .inner
            .agent
            .request(method, url.as_str())
            .set("x-cdp-sdk", SDK_HEADER)
            .set("x-cdp-app", &self.inner.app_id);
        if let Some(token) = &self.inner.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        request
    }
}

impl std::fmt::Debug for CogniteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CogniteClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("project", &self.inner.project)
            .field("app_id", &self.inner.app_id)
            .finish_non_exhaustive()
    }
}

fn append_query<Q: QueryParams + ?Sized>(url: &mut Url, query: &Q) {
    let pairs = query.to_query_params();
    if pairs.is_empty() {
        return;
    }
    let mut serializer = url.query_pairs_mut();
    for (name, value) in &pairs {
        serializer.append_pair(name, value);
    }
}

fn encode_body<T: Serialize + ?Sized>(body: &T) -> ApiResult<String> {
    serde_json::to_string(body).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode request json")
            .with_source(err)
    })
}

fn normalize_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid base url: {raw}"))
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(
            Error::new(ErrorKind::Usage).with_message("base url must use http or https scheme")
        );
    }
    if url.path() != "/" && !url.path().is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message("base url must not include a path"));
    }
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn build_url(base_url: &Url, segments: &[&str]) -> ApiResult<Url> {
    let mut url = base_url.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            Error::new(ErrorKind::Usage).with_message("base url cannot be a base")
        })?;
        path.clear();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

fn read_json_response<R>(response: ureq::Response) -> ApiResult<R>
where
    R: DeserializeOwned,
{
    let request_id = response.header(REQUEST_ID_HEADER).map(str::to_string);
    let status = response.status();
    let body = response.into_string().map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read response body")
            .with_source(err)
    })?;
    parse::from_str(&body).map_err(|err| {
        let mut error = Error::new(ErrorKind::Decode)
            .with_message(format!("invalid response json: {err}"))
            .with_hint(parse::hint_for_error(&err, "response body"))
            .with_status(status);
        if let Some(request_id) = request_id {
            error = error.with_request_id(request_id);
        }
        error.with_source(err)
    })
}

fn parse_error_response(status: u16, response: ureq::Response) -> Error {
    let request_id = response.header(REQUEST_ID_HEADER).map(str::to_string);
    let body = response.into_string().unwrap_or_default();
    let envelope = parse::from_str::<ErrorEnvelope>(&body).ok();
    let kind = match &envelope {
        Some(envelope) if status == 400 && !envelope.error.missing.is_empty() => {
            ErrorKind::NotFound
        }
        Some(envelope) if status == 400 && !envelope.error.duplicated.is_empty() => {
            ErrorKind::AlreadyExists
        }
        _ => error_kind_from_status(status),
    };
    let mut err = Error::new(kind).with_status(status);
    match envelope {
        Some(envelope) => {
            let api = envelope.error;
            err = err
                .with_message(
                    api.message
                        .unwrap_or_else(|| format!("request failed with status {status}")),
                )
                .with_missing(api.missing)
                .with_duplicated(api.duplicated);
        }
        None => {
            err = err.with_message(format!("request failed with status {status}"));
        }
    }
    if let Some(request_id) = request_id {
        err = err.with_request_id(request_id);
    }
    tracing::debug!(status, error = %err, "request failed");
    err
}

fn error_kind_from_status(status: u16) -> ErrorKind {
    match status {
        400 | 422 => ErrorKind::Usage,
        401 => ErrorKind::Auth,
        403 => ErrorKind::Permission,
        404 => ErrorKind::NotFound,
        409 => ErrorKind::AlreadyExists,
        429 | 503 => ErrorKind::Busy,
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Io,
    }
}
