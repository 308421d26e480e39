//! HTTP exchange types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The client builds an `HttpRequest`,
//! hands it to a `Transport`, and inspects the returned `HttpResponse` itself,
//! so the exchange can be recorded and replayed in diagnostics without
//! holding on to any connection state.
//!
//! The transport owns everything below the HTTP-response level: connection
//! handling, TLS, redirects and timeouts. Anything that goes wrong there is a
//! `TransportError`.

use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

/// HTTP method for a request. The client only issues reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request described as plain data.
///
/// `url` is absolute: base URL, path and query string already joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Look up a header value, ignoring ASCII case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Path and query of the request URL, e.g. `/api/pages/menus?`.
    ///
    /// Falls back to the full URL when it does not parse.
    pub fn request_target(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => match parsed.query() {
                Some(query) => format!("{}?{query}", parsed.path()),
                None => parsed.path().to_string(),
            },
            Err(_) => self.url.clone(),
        }
    }
}

/// A received response described as plain data.
///
/// The body is owned text, so every read sees the full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Per-call options passed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// When set, non-2xx responses must be reported as a
    /// `TransportErrorKind::Status` failure carrying the response.
    pub http_errors: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self { http_errors: true }
    }
}

/// Sends one request and returns the response, or fails below the HTTP
/// response level.
pub trait Transport {
    fn send(&self, request: &HttpRequest, options: &SendOptions) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest, options: &SendOptions) -> Result<HttpResponse, TransportError> {
        (**self).send(request, options)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest, options: &SendOptions) -> Result<HttpResponse, TransportError> {
        (**self).send(request, options)
    }
}

/// Coarse classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established.
    Connect,
    /// The host name did not resolve.
    Dns,
    Timeout,
    Io,
    /// A non-2xx response, reported only when `SendOptions::http_errors` is set.
    Status,
    Other,
}

impl TransportErrorKind {
    /// Stable identifying code, carried over into `ClientError::code`.
    pub fn code(&self) -> &'static str {
        match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Dns => "dns",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Io => "io",
            TransportErrorKind::Status => "status",
            TransportErrorKind::Other => "other",
        }
    }
}

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Failure raised by a `Transport`. May carry a partial response.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    response: Option<HttpResponse>,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
            source: None,
        }
    }

    pub fn with_response(mut self, response: HttpResponse) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }
}
