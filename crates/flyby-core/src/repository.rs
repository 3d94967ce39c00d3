//! Owner of the unfiltered route collection.
//!
//! The collection is loaded exactly once and never invalidated. Readers
//! borrow it: the filter extractor sees it uncapped, the coordinator's
//! default path sees the first [`RESULT_CAP`] entries.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::error::FetchError;
use crate::models::{Route, RESULT_CAP};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryState {
    Uninitialized,
    Loading,
    Ready {
        routes: Vec<Route>,
        fetched_at: DateTime<Utc>,
    },
    Failed(FetchError),
}

/// Invalid repository transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("route repository load already started")]
    AlreadyStarted,
    #[error("route repository is not loading")]
    NotLoading,
}

#[derive(Debug)]
pub struct RouteRepository {
    state: RepositoryState,
    failure_reported: bool,
}

impl Default for RouteRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteRepository {
    /// Create an uninitialized repository.
    pub fn new() -> Self {
        Self {
            state: RepositoryState::Uninitialized,
            failure_reported: false,
        }
    }

    /// Current load state.
    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    /// `Uninitialized -> Loading`. Only the first call succeeds.
    pub fn begin_load(&mut self) -> Result<(), LoadError> {
        match self.state {
            RepositoryState::Uninitialized => {
                self.state = RepositoryState::Loading;
                Ok(())
            }
            _ => Err(LoadError::AlreadyStarted),
        }
    }

    /// `Loading -> Ready | Failed`.
    pub fn finish_load(&mut self, outcome: Result<Vec<Route>, FetchError>) -> Result<(), LoadError> {
        if !matches!(self.state, RepositoryState::Loading) {
            return Err(LoadError::NotLoading);
        }
        self.state = match outcome {
            Ok(routes) => RepositoryState::Ready {
                routes,
                fetched_at: Utc::now(),
            },
            Err(err) => RepositoryState::Failed(err),
        };
        Ok(())
    }

    /// True while the initial load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, RepositoryState::Loading)
    }

    /// True once the load has succeeded or failed.
    pub fn is_settled(&self) -> bool {
        matches!(
            self.state,
            RepositoryState::Ready { .. } | RepositoryState::Failed(_)
        )
    }

    /// The full cached collection; empty unless `Ready`.
    pub fn all_routes(&self) -> &[Route] {
        match &self.state {
            RepositoryState::Ready { routes, .. } => routes.as_slice(),
            _ => &[],
        }
    }

    /// The cached collection capped for the default display path.
    pub fn default_view(&self) -> &[Route] {
        let routes = self.all_routes();
        &routes[..routes.len().min(RESULT_CAP)]
    }

    /// When the cache was filled.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            RepositoryState::Ready { fetched_at, .. } => Some(*fetched_at),
            _ => None,
        }
    }

    /// The load failure, if the load failed.
    pub fn failure(&self) -> Option<&FetchError> {
        match &self.state {
            RepositoryState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The load failure, handed out at most once.
    pub fn take_failure(&mut self) -> Option<FetchError> {
        if self.failure_reported {
            return None;
        }
        let failure = self.failure().cloned();
        if failure.is_some() {
            self.failure_reported = true;
        }
        failure
    }
}
