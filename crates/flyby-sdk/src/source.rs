//! Route data source seam between the browser and the network.

use async_trait::async_trait;
use flyby_core::{FetchError, Route, RouteQuery};

use crate::client::ProxyClient;

/// Anything that can produce the unfiltered route set and filtered searches.
#[async_trait]
pub trait RouteSource: Send + Sync {
    async fn fetch_all_routes(&self) -> Result<Vec<Route>, FetchError>;

    async fn search_routes(&self, query: &RouteQuery) -> Result<Vec<Route>, FetchError>;
}

#[async_trait]
impl RouteSource for ProxyClient {
    async fn fetch_all_routes(&self) -> Result<Vec<Route>, FetchError> {
        let target = self.endpoints.routes_url();
        self.fetch(&target).await
    }

    async fn search_routes(&self, query: &RouteQuery) -> Result<Vec<Route>, FetchError> {
        let target = self.endpoints.search_url(query);
        tracing::info!(url = %target, "searching preferred routes");
        self.fetch(&target).await
    }
}
