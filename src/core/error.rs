use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

use super::union::DecodeError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Auth,
    Permission,
    NotFound,
    AlreadyExists,
    Busy,
    Server,
    Decode,
    Io,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    status: Option<u16>,
    request_id: Option<String>,
    missing: Vec<Value>,
    duplicated: Vec<Value>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            status: None,
            request_id: None,
            missing: Vec::new(),
            duplicated: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// HTTP status of the failed response, when the error came from the API.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Identities the API reported as unknown (`error.missing`).
    pub fn missing(&self) -> &[Value] {
        &self.missing
    }

    /// Identities the API reported as conflicting (`error.duplicated`).
    pub fn duplicated(&self) -> &[Value] {
        &self.duplicated
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_missing(mut self, missing: Vec<Value>) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_duplicated(mut self, duplicated: Vec<Value>) -> Self {
        self.duplicated = duplicated;
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {status})")?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request id: {request_id})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::new(ErrorKind::Decode)
            .with_message(err.to_string())
            .with_source(err)
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Auth => 3,
        ErrorKind::Permission => 4,
        ErrorKind::NotFound => 5,
        ErrorKind::AlreadyExists => 6,
        ErrorKind::Busy => 7,
        ErrorKind::Server => 8,
        ErrorKind::Decode => 9,
        ErrorKind::Io => 10,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, to_exit_code};
    use crate::core::union::{DecodeError, JsonKind};
    use serde_json::json;
    use std::error::Error as _;

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::Auth, 3),
            (ErrorKind::Permission, 4),
            (ErrorKind::NotFound, 5),
            (ErrorKind::AlreadyExists, 6),
            (ErrorKind::Busy, 7),
            (ErrorKind::Server, 8),
            (ErrorKind::Decode, 9),
            (ErrorKind::Io, 10),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn display_includes_status_and_request_id() {
        let err = Error::new(ErrorKind::NotFound)
            .with_message("Events not found")
            .with_status(404)
            .with_request_id("req-1")
            .with_missing(vec![json!({"id": 7})]);
        assert_eq!(
            err.to_string(),
            "NotFound: Events not found (status: 404) (request id: req-1)"
        );
        assert_eq!(err.missing(), &[json!({"id": 7})]);
        assert!(err.duplicated().is_empty());
    }

    #[test]
    fn decode_error_converts_with_source() {
        let decode = DecodeError::NotAnObject {
            union: "Identity",
            actual: JsonKind::Array,
        };
        let err = Error::from(decode);
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.message().expect("message").contains("Identity"));
        assert!(err.source().is_some());
    }
}
