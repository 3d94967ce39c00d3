//! HTTP client for the aviation API, routed through a CORS relay.
//!
//! The relay answers `GET <proxy>?url=<target>` with a JSON envelope whose
//! `contents` field is the upstream body as a string. One attempt per
//! request, no timeout, no caching.

use flyby_core::{FetchError, RouteQuery};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.aviationapi.com";
pub const DEFAULT_PROXY_BASE: &str = "https://api.allorigins.win/get";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid base URL {url}: {reason}")]
pub struct InvalidUrl {
    pub url: String,
    pub reason: String,
}

/// API and relay base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_base: Url,
    proxy_base: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_PROXY_BASE).expect("default endpoints are valid")
    }
}

impl Endpoints {
    /// Parse and validate both base URLs.
    pub fn new(api_base: &str, proxy_base: &str) -> Result<Self, InvalidUrl> {
        let mut api_base = parse_base(api_base)?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }
        Ok(Self {
            api_base,
            proxy_base: parse_base(proxy_base)?,
        })
    }

    /// Aviation API base URL.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Relay base URL.
    pub fn proxy_base(&self) -> &Url {
        &self.proxy_base
    }

    fn api_url(&self, path: &str) -> Url {
        let mut url = self.api_base.clone();
        url.set_path(&format!("{}{}", self.api_base.path(), path));
        url
    }

    /// Unfiltered route listing.
    pub fn routes_url(&self) -> Url {
        self.api_url("v1/preferred-routes")
    }

    /// Filtered search with only the constrained fields as parameters.
    pub fn search_url(&self, query: &RouteQuery) -> Url {
        let mut url = self.api_url("v1/preferred-routes/search");
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query.params() {
                pairs.append_pair(name, value);
            }
        }
        url
    }

    /// Airport lookup for one FAA or ICAO code.
    pub fn airport_url(&self, code: &str) -> Url {
        let mut url = self.api_url("v1/airports");
        url.query_pairs_mut().append_pair("apt", code);
        url
    }

    /// Relay URL carrying `target` as its encoded `url` parameter.
    pub fn relay_url(&self, target: &Url) -> Url {
        let mut relay = self.proxy_base.clone();
        relay.query_pairs_mut().append_pair("url", target.as_str());
        relay
    }
}

fn parse_base(raw: &str) -> Result<Url, InvalidUrl> {
    let invalid = |reason: String| InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("not a hierarchical URL".to_string()));
    }
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {}", other))),
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    contents: Option<String>,
    #[serde(default)]
    status: Option<EnvelopeStatus>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeStatus {
    #[serde(default)]
    http_code: Option<u16>,
}

/// Decode a relay envelope and parse its embedded payload.
pub fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| FetchError::Protocol(format!("malformed relay envelope: {}", e)))?;

    if let Some(code) = envelope.status.and_then(|s| s.http_code) {
        if !(200..300).contains(&code) {
            return Err(FetchError::Protocol(format!("upstream returned HTTP {}", code)));
        }
    }

    let contents = envelope
        .contents
        .ok_or_else(|| FetchError::Protocol("relay envelope missing contents".to_string()))?;

    Ok(serde_json::from_str(&contents)?)
}

/// Client for the aviation API through the relay.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    pub(crate) client: Client,
    pub(crate) endpoints: Endpoints,
}

impl Default for ProxyClient {
    fn default() -> Self {
        Self::new(Endpoints::default())
    }
}

impl ProxyClient {
    /// Create a new relay client.
    pub fn new(endpoints: Endpoints) -> Self {
        Self::with_client(Client::new(), endpoints)
    }

    /// Use a preconfigured `reqwest` client (proxy settings, TLS, ...).
    pub fn with_client(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Endpoints this client talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch `target` through the relay and parse the payload as `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, target: &Url) -> Result<T, FetchError> {
        let relay = self.endpoints.relay_url(target);
        tracing::debug!(url = %target, "fetching through relay");

        let response = self
            .client
            .get(relay)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Protocol(format!("relay returned HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        unwrap_envelope(&body)
    }

    /// Like [`fetch`](Self::fetch), but a failure is logged and yields
    /// `T::default()` instead.
    pub async fn fetch_or_default<T>(&self, target: &Url) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.fetch(target).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(url = %target, error = %e, "relay fetch failed, using empty payload");
                T::default()
            }
        }
    }
}
