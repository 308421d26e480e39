//! Request execution and the public read operations.
//!
//! # Design
//! `CockpitClient` owns a `Transport` and a one-slot history of the most
//! recent exchange. Every call clears the slot, sends exactly one request and
//! records it, together with the response when one came back, before the
//! response is classified. A failed call therefore leaves its own exchange in
//! the slot, never a stale earlier one.
//!
//! Operations take `&mut self`: one call is in flight per instance. Callers
//! that need concurrency use one client per thread or wrap it in a lock.

use serde_json::Value;
use url::Url;

use crate::error::{ClientError, Error};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, SendOptions, Transport};
use crate::query::{build_url, Query};
use crate::response;
use crate::validate;

const API_KEY_HEADER: &str = "api-key";

/// The last request sent and the response it got, if any.
#[derive(Debug, Default)]
struct History {
    request: Option<HttpRequest>,
    response: Option<HttpResponse>,
}

impl History {
    fn clear(&mut self) {
        self.request = None;
        self.response = None;
    }

    fn record(&mut self, request: HttpRequest, response: Option<HttpResponse>) {
        self.request = Some(request);
        self.response = response;
    }
}

/// Optional parameters for the page endpoints. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    pub locale: Option<String>,
    /// Depth to which linked content is resolved.
    pub populate: Option<u32>,
}

impl PageOptions {
    pub fn locale(locale: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            ..Self::default()
        }
    }

    fn apply(&self, query: &mut Query) {
        if let Some(locale) = &self.locale {
            query.insert("locale", locale);
        }
        if let Some(populate) = self.populate {
            query.insert("populate", populate);
        }
    }

    fn to_query(&self) -> Query {
        let mut query = Query::new();
        self.apply(&mut query);
        query
    }
}

/// Read-only client for the Cockpit CMS API.
#[derive(Debug)]
pub struct CockpitClient<T> {
    transport: T,
    base_url: Url,
    token: String,
    history: History,
}

impl<T: Transport> CockpitClient<T> {
    /// `base_url` is the API endpoint, e.g. `https://example.tld/api/`;
    /// trailing slashes are normalised to exactly one.
    ///
    /// # Errors
    /// Returns `Error::InvalidUrl` if `base_url` is not an absolute URL, and
    /// `Error::InvalidArgument` if it cannot carry a path (`mailto:` and the
    /// like).
    pub fn new(transport: T, base_url: &str, token: &str) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidArgument(format!("base URL '{base_url}' cannot carry a path")));
        }
        Ok(Self {
            transport,
            base_url,
            token: token.to_string(),
            history: History::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The last request sent, or `None` before the first call.
    pub fn last_request(&self) -> Option<&HttpRequest> {
        self.history.request.as_ref()
    }

    /// The response to the last request, or `None` before the first call or
    /// when the transport failed without a response.
    pub fn last_response(&self) -> Option<&HttpResponse> {
        self.history.response.as_ref()
    }

    /// `GET pages/menus`
    pub fn menus(&mut self) -> Result<Value, Error> {
        self.get(&["pages", "menus"], &Query::new())
    }

    /// `GET pages/menu/{name}`
    pub fn menu(&mut self, name: &str) -> Result<Value, Error> {
        self.get(&["pages", "menu", name], &Query::new())
    }

    /// `GET pages/pages`
    pub fn pages(&mut self) -> Result<Value, Error> {
        self.get(&["pages", "pages"], &Query::new())
    }

    /// `GET pages/page/{id}`
    pub fn page(&mut self, id: &str, options: &PageOptions) -> Result<Value, Error> {
        self.get(&["pages", "page", id], &options.to_query())
    }

    /// `GET pages/page?route={route}`, e.g. `route = "/about"`.
    pub fn page_by_route(&mut self, route: &str, options: &PageOptions) -> Result<Value, Error> {
        let mut query = Query::new().param("route", route);
        options.apply(&mut query);
        self.get(&["pages", "page"], &query)
    }

    /// `GET pages/routes`
    pub fn routes(&mut self, options: &PageOptions) -> Result<Value, Error> {
        self.get(&["pages", "routes"], &options.to_query())
    }

    /// `GET pages/settings`
    pub fn settings(&mut self, options: &PageOptions) -> Result<Value, Error> {
        self.get(&["pages", "settings"], &options.to_query())
    }

    /// `GET pages/sitemap`
    pub fn sitemap(&mut self) -> Result<Value, Error> {
        self.get(&["pages", "sitemap"], &Query::new())
    }

    /// `GET content/items/{model}`
    ///
    /// # Errors
    /// `Error::InvalidArgument` without sending anything if `model` is blank
    /// or `params` has a key outside [`validate::CONTENT_QUERY_KEYS`].
    pub fn content_items(&mut self, model: &str, params: &Query) -> Result<Value, Error> {
        validate::content_items(model, params)?;
        self.get(&["content", "items", model], params)
    }

    /// Path segments are percent-encoded one by one.
    fn get(&mut self, segments: &[&str], query: &Query) -> Result<Value, Error> {
        let url = build_url(&self.base_url, segments, query);
        self.execute(HttpMethod::Get, url)
    }

    fn execute(&mut self, method: HttpMethod, url: String) -> Result<Value, Error> {
        self.history.clear();

        let request = HttpRequest {
            method,
            url,
            headers: vec![(API_KEY_HEADER.to_string(), self.token.clone())],
        };
        let options = SendOptions { http_errors: false };

        match self.transport.send(&request, &options) {
            Ok(response) => {
                let result = response::process(&request, &response);
                self.history.record(request, Some(response));
                Ok(result?)
            }
            Err(err) => {
                let client_err = ClientError::transport(&request, err);
                self.history.record(request, client_err.response().cloned());
                Err(client_err.into())
            }
        }
    }
}

#[cfg(feature = "ureq")]
impl CockpitClient<crate::transport::UreqTransport> {
    /// Client over the default blocking transport.
    pub fn from_config(config: &crate::config::ClientConfig) -> Result<Self, Error> {
        let transport = crate::transport::UreqTransport::with_timeout(config.timeout());
        Self::new(transport, &config.base_url, &config.token)
    }
}
