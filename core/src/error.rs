//! Error types for the Cockpit client.
//!
//! # Design
//! Caller mistakes caught before any network activity are `InvalidArgument`.
//! Everything that happens once a request is sent (transport failure,
//! non-200 status, unparsable body, error field embedded in a 200 body)
//! surfaces as one `ClientError` carrying the request and, when one was
//! received, the response. `ClientError` is built complete where the failure
//! is detected and has no setters.

use std::fmt::Write as _;

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse, TransportError};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `CockpitClient`.
#[derive(Debug, Error)]
pub enum Error {
    /// The call was rejected before a request was built.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The configured base URL is not an absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A required configuration variable is not set.
    #[error("missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    #[error(transparent)]
    Client(Box<ClientError>),
}

impl Error {
    /// The request/response context, if the failure happened after sending.
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            Error::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientError> for Error {
    fn from(err: ClientError) -> Self {
        Error::Client(Box::new(err))
    }
}

/// Which failure signal produced a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// The transport could not complete the exchange.
    Transport,
    /// The response status was not 200.
    Status,
    /// Status 200, but the body is not a JSON object or array.
    Unparsable,
    /// Status 200 with an `error` field in the body.
    EmbeddedError,
}

/// A failed exchange with the API, with full request/response context.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClientError {
    kind: ClientErrorKind,
    message: String,
    code: Option<&'static str>,
    request: Option<HttpRequest>,
    response: Option<HttpResponse>,
    #[source]
    source: Option<TransportError>,
}

impl ClientError {
    /// A failure detected on a received response.
    pub(crate) fn from_exchange(
        kind: ClientErrorKind,
        message: impl Into<String>,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            request: Some(request.clone()),
            response: Some(response.clone()),
            source: None,
        }
    }

    /// Wrap a transport failure. Message and code mirror the transport error,
    /// which is kept as the source.
    pub(crate) fn transport(request: &HttpRequest, err: TransportError) -> Self {
        Self {
            kind: ClientErrorKind::Transport,
            message: err.message().to_string(),
            code: Some(err.code()),
            request: Some(request.clone()),
            response: err.response().cloned(),
            source: Some(err),
        }
    }

    pub fn kind(&self) -> ClientErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Identifying code of the underlying transport failure.
    pub fn code(&self) -> Option<&'static str> {
        self.code
    }

    pub fn request(&self) -> Option<&HttpRequest> {
        self.request.as_ref()
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    /// Multi-line report with the request target and the response, for logs.
    pub fn details(&self) -> String {
        let mut out = self.message.clone();
        if let Some(request) = &self.request {
            let _ = write!(out, "\nRequest: {} {}", request.method, request.request_target());
        }
        if let Some(response) = &self.response {
            let _ = write!(out, "\nResponse:\nstatus: {}\nbody: {}", response.status, response.body);
        }
        out
    }
}
