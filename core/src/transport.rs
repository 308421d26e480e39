//! Blocking transport backed by `ureq`.
//!
//! The agent never turns an HTTP status into an error on its own; status
//! handling follows `SendOptions::http_errors`. Once the status line has
//! arrived, every failure carries the response received so far.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::http::{HttpMethod, HttpRequest, HttpResponse, SendOptions, Transport, TransportError, TransportErrorKind};

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
    body_limit: u64,
}

impl UreqTransport {
    /// Transport without a timeout.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Transport that aborts any exchange taking longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self {
            agent,
            timeout,
            body_limit: u64::MAX,
        }
    }

    /// Cap on the response body size in bytes. Unlimited by default.
    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn body_limit(&self) -> u64 {
        self.body_limit
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest, options: &SendOptions) -> Result<HttpResponse, TransportError> {
        let started = Instant::now();
        let result = self.exchange(request, options);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => debug!(
                method = %request.method,
                url = %request.url,
                status = response.status,
                elapsed_ms,
                "exchange complete"
            ),
            Err(err) => warn!(
                method = %request.method,
                url = %request.url,
                code = err.code(),
                elapsed_ms,
                error = %err,
                "exchange failed"
            ),
        }
        result
    }
}

impl UreqTransport {
    fn exchange(&self, request: &HttpRequest, options: &SendOptions) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(request.url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(map_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect();
        let mut received = HttpResponse {
            status,
            headers,
            body: String::new(),
        };

        let bytes = match response.body_mut().with_config().limit(self.body_limit).read_to_vec() {
            Ok(bytes) => bytes,
            Err(err) => return Err(map_error(err).with_response(received)),
        };
        let response = match String::from_utf8(bytes) {
            Ok(body) => {
                received.body = body;
                received
            }
            Err(err) => {
                received.body = String::from_utf8_lossy(err.as_bytes()).into_owned();
                return Err(TransportError::new(TransportErrorKind::Io, "response body is not valid UTF-8")
                    .with_response(received)
                    .with_source(err.utf8_error()));
            }
        };

        if options.http_errors && !response.is_success() {
            return Err(TransportError::new(TransportErrorKind::Status, format!("http status: {status}")).with_response(response));
        }
        Ok(response)
    }
}

fn map_error(err: ureq::Error) -> TransportError {
    let kind = match &err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound => TransportErrorKind::Dns,
        ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused => TransportErrorKind::Connect,
        ureq::Error::Io(_) => TransportErrorKind::Io,
        _ => TransportErrorKind::Other,
    };
    TransportError::new(kind, err.to_string()).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_kept() {
        let transport = UreqTransport::with_timeout(Duration::from_secs(3));
        assert_eq!(transport.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(UreqTransport::default().timeout(), None);
    }

    #[test]
    fn body_limit_defaults_to_unlimited() {
        assert_eq!(UreqTransport::new().body_limit(), u64::MAX);
        assert_eq!(UreqTransport::new().with_body_limit(1024).body_limit(), 1024);
    }

    #[test]
    fn io_errors_are_classified() {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(map_error(ureq::Error::Io(refused)).kind(), TransportErrorKind::Connect);

        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert_eq!(map_error(ureq::Error::Io(reset)).kind(), TransportErrorKind::Io);
    }

    #[test]
    fn lookup_failures_are_dns() {
        let err = map_error(ureq::Error::HostNotFound);
        assert_eq!(err.code(), "dns");
    }
}
