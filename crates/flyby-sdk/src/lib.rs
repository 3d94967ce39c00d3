//! Fly-by SDK - aviation API access through the CORS relay
//!
//! Provides the relay client, the airport lookup and the async route
//! browser that drives the core coordinator.

pub mod airports;
pub mod browser;
pub mod client;
pub mod source;

pub use airports::{AirportCode, AirportLookup};
pub use browser::RouteBrowser;
pub use client::{unwrap_envelope, Endpoints, InvalidUrl, ProxyClient, DEFAULT_API_BASE, DEFAULT_PROXY_BASE};
pub use source::RouteSource;
