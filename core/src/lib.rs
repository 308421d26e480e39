//! Read-only client for the Cockpit headless CMS API.
//!
//! # Overview
//! `CockpitClient` wraps the pages, menus and content collection endpoints.
//! Each call sends one GET request through a `Transport`, keeps that
//! request/response pair for inspection, and returns the decoded JSON body.
//!
//! # Design
//! - The network sits behind the `Transport` trait. `UreqTransport`
//!   (feature `ureq`, on by default) is the blocking implementation; tests
//!   plug in scripted transports.
//! - Failures after a request is sent all surface as one `ClientError`
//!   carrying the request and response: transport failure, non-200 status,
//!   an unparsable body, or an `error` field inside a 200 body.
//! - Content queries are checked against an allow-list before anything is
//!   sent; rejected calls return `Error::InvalidArgument`.
//!
//! ```no_run
//! use cockpit_client::{ClientConfig, CockpitClient, Query};
//!
//! fn main() -> Result<(), cockpit_client::Error> {
//!     let config = ClientConfig::new("https://cms.example/api", "server-token");
//!     let mut client = CockpitClient::from_config(&config)?;
//!
//!     let faq = client.content_items("faq", &Query::new().param("limit", 10))?;
//!     println!("{faq}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
mod response;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod validate;

pub use client::{CockpitClient, PageOptions};
pub use config::ClientConfig;
pub use error::{ClientError, ClientErrorKind, Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, SendOptions, Transport, TransportError, TransportErrorKind};
pub use query::{ParamValue, Query};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use validate::CONTENT_QUERY_KEYS;
