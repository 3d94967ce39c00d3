//! Async driver for the route filter view.
//!
//! Owns the repository, the coordinator and a [`RouteSource`]. Remote
//! searches are polled in the caller's task through a `FuturesUnordered`
//! set, so overlapping requests interleave cooperatively and their results
//! pass through the coordinator's generation check.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use flyby_core::{
    ErrorPolicy, FetchError, FilterField, FilterOptions, FilterSelection, FilterValue, LoadError,
    QueryCoordinator, QueryState, Route, RouteRepository, Step, Ticket,
};

use crate::source::RouteSource;

type Completion = (Ticket, Result<Vec<Route>, FetchError>);

pub struct RouteBrowser<S> {
    source: Arc<S>,
    repository: RouteRepository,
    coordinator: QueryCoordinator,
    options: FilterOptions,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl<S> std::fmt::Debug for RouteBrowser<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteBrowser")
            .field("repository", &self.repository)
            .field("coordinator", &self.coordinator)
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl<S: RouteSource + 'static> RouteBrowser<S> {
    /// Create a browser over `source` with an empty, unloaded cache.
    pub fn new(source: S, policy: ErrorPolicy) -> Self {
        Self::with_shared_source(Arc::new(source), policy)
    }

    /// Create a browser over a source shared with the caller.
    pub fn with_shared_source(source: Arc<S>, policy: ErrorPolicy) -> Self {
        Self {
            source,
            repository: RouteRepository::new(),
            coordinator: QueryCoordinator::new(policy),
            options: FilterOptions::default(),
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Load the route cache (once) and publish the initial result set.
    pub async fn init(&mut self) -> Result<(), LoadError> {
        self.repository.begin_load()?;
        tracing::info!("Loading preferred routes...");

        let outcome = self.source.fetch_all_routes().await;
        match &outcome {
            Ok(routes) => tracing::info!("Cached {} preferred routes", routes.len()),
            Err(e) => tracing::error!("Error fetching routes: {}", e),
        }
        self.repository.finish_load(outcome)?;

        self.options = FilterOptions::from_routes(self.repository.all_routes());
        let step = self.coordinator.on_repository_settled(&mut self.repository);
        self.dispatch(step);
        Ok(())
    }

    /// Replace the whole selection. An unchanged selection is a no-op.
    pub fn select(&mut self, selection: FilterSelection) {
        if selection == *self.coordinator.selection() {
            return;
        }
        tracing::debug!("Current filters: {}", selection);
        let step = self
            .coordinator
            .on_selection_changed(selection, &self.repository);
        self.dispatch(step);
    }

    /// Change one selector.
    pub fn set_field(&mut self, field: FilterField, value: FilterValue) {
        let selection = self.coordinator.selection().with(field, value);
        self.select(selection);
    }

    fn dispatch(&mut self, step: Step) {
        let Step::Fetch(ticket) = step else {
            return;
        };
        tracing::debug!(
            generation = ticket.generation,
            params = ?ticket.query.params(),
            "issuing filtered search"
        );
        let source = Arc::clone(&self.source);
        self.in_flight.push(Box::pin(async move {
            let outcome = source.search_routes(&ticket.query).await;
            (ticket, outcome)
        }));
    }

    /// Number of searches still awaiting resolution, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait for the next search to resolve and apply it.
    ///
    /// Returns `None` when nothing is in flight, otherwise whether the
    /// result was current and updated the state.
    pub async fn next_completion(&mut self) -> Option<bool> {
        let (ticket, outcome) = self.in_flight.next().await?;
        if let Err(e) = &outcome {
            tracing::warn!(generation = ticket.generation, "Error fetching filtered routes: {}", e);
        }
        let applied = self.coordinator.complete(&ticket, outcome);
        if !applied {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.coordinator.latest_generation(),
                "discarding stale search result"
            );
        }
        Some(applied)
    }

    /// Drive every in-flight search to completion.
    pub async fn settle(&mut self) -> &QueryState {
        while self.next_completion().await.is_some() {}
        self.coordinator.state()
    }

    pub fn state(&self) -> &QueryState {
        self.coordinator.state()
    }

    pub fn selection(&self) -> &FilterSelection {
        self.coordinator.selection()
    }

    /// Selector options, derived from the unfiltered cache only.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn repository(&self) -> &RouteRepository {
        &self.repository
    }
}
