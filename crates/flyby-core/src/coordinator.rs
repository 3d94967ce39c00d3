//! Query coordination: cached slice vs. remote search, and the
//! loading/error lifecycle of the result panel.
//!
//! Every selection change starts a new generation. Remote work is handed
//! out as a [`Ticket`] carrying that generation; when the fetch resolves the
//! ticket comes back through [`QueryCoordinator::complete`], and only the
//! most recently issued generation may touch [`QueryState`].

use serde::{Deserialize, Serialize};

use crate::error::{ErrorInfo, FetchError};
use crate::models::{FilterField, FilterSelection, FilterValue, Route, RESULT_CAP};
use crate::query::RouteQuery;
use crate::repository::RouteRepository;

/// What happens to visible results when a remote search fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Keep the last successfully resolved results visible
    #[default]
    Retain,
    /// Drop results so only the error is shown
    Clear,
}

impl ErrorPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "retain" | "keep" => Some(Self::Retain),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

/// Result panel state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub results: Vec<Route>,
    pub is_loading: bool,
    pub error: Option<ErrorInfo>,
    /// Generation the current results/error belong to
    pub generation: u64,
}

/// Mutually exclusive render states of the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState<'a> {
    Loading,
    Failed {
        message: &'a str,
        stale: &'a [Route],
    },
    Empty,
    Results(&'a [Route]),
}

impl QueryState {
    /// Which of the render states applies.
    pub fn display(&self) -> DisplayState<'_> {
        if self.is_loading {
            DisplayState::Loading
        } else if let Some(error) = &self.error {
            DisplayState::Failed {
                message: &error.message,
                stale: &self.results,
            }
        } else if self.results.is_empty() {
            DisplayState::Empty
        } else {
            DisplayState::Results(&self.results)
        }
    }
}

/// Where the results for a selection come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Capped slice of the repository cache, no remote call
    Slice(Vec<Route>),
    /// Cache not loaded yet; resolved by `on_repository_settled`
    Pending,
    Remote(RouteQuery),
}

/// Decide how to resolve `selection` against the repository.
pub fn plan(selection: &FilterSelection, repository: &RouteRepository) -> QueryPlan {
    match RouteQuery::from_selection(selection) {
        None if !repository.is_settled() => QueryPlan::Pending,
        None => QueryPlan::Slice(repository.default_view().to_vec()),
        Some(query) => QueryPlan::Remote(query),
    }
}

/// An issued remote search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub query: RouteQuery,
}

/// Outcome of applying a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing for the caller to run
    Settled,
    /// Caller must run the search and hand the result to `complete`
    Fetch(Ticket),
}

#[derive(Debug, Default)]
pub struct QueryCoordinator {
    selection: FilterSelection,
    state: QueryState,
    latest: u64,
    policy: ErrorPolicy,
}

impl QueryCoordinator {
    /// Create a coordinator with the given failure policy.
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Current filter selection.
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Current result panel state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Most recently issued generation.
    pub fn latest_generation(&self) -> u64 {
        self.latest
    }

    /// True if `ticket` belongs to the latest generation.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.latest
    }

    /// React to a new selection.
    pub fn on_selection_changed(
        &mut self,
        selection: FilterSelection,
        repository: &RouteRepository,
    ) -> Step {
        self.selection = selection;
        self.evaluate(repository)
    }

    /// Change a single selector.
    pub fn set_field(
        &mut self,
        field: FilterField,
        value: FilterValue,
        repository: &RouteRepository,
    ) -> Step {
        let selection = self.selection.with(field, value);
        self.on_selection_changed(selection, repository)
    }

    /// Re-evaluate once the repository's initial load has finished.
    ///
    /// A load failure is surfaced here, once.
    pub fn on_repository_settled(&mut self, repository: &mut RouteRepository) -> Step {
        let failure = repository.take_failure();
        let step = self.evaluate(repository);
        if let Some(err) = failure {
            self.state.error = Some(ErrorInfo::from(&err));
        }
        step
    }

    fn evaluate(&mut self, repository: &RouteRepository) -> Step {
        self.latest += 1;
        let generation = self.latest;
        self.state.is_loading = true;

        match plan(&self.selection, repository) {
            QueryPlan::Slice(routes) => {
                self.resolve(generation, routes);
                Step::Settled
            }
            QueryPlan::Pending => Step::Settled,
            QueryPlan::Remote(query) => Step::Fetch(Ticket { generation, query }),
        }
    }

    /// Apply a finished remote search. Returns `false` for stale tickets,
    /// which leave the state untouched.
    pub fn complete(&mut self, ticket: &Ticket, outcome: Result<Vec<Route>, FetchError>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match outcome {
            Ok(routes) => self.resolve(ticket.generation, routes),
            Err(err) => {
                self.state.is_loading = false;
                self.state.error = Some(ErrorInfo::from(&err));
                self.state.generation = ticket.generation;
                if self.policy == ErrorPolicy::Clear {
                    self.state.results.clear();
                }
            }
        }
        true
    }

    fn resolve(&mut self, generation: u64, mut routes: Vec<Route>) {
        routes.truncate(RESULT_CAP);
        self.state = QueryState {
            results: routes,
            is_loading: false,
            error: None,
            generation,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_repo(routes: Vec<Route>) -> RouteRepository {
        let mut repo = RouteRepository::new();
        repo.begin_load().unwrap();
        repo.finish_load(Ok(routes)).unwrap();
        repo
    }

    fn many(n: usize) -> Vec<Route> {
        (0..n)
            .map(|i| Route::new("JFK", format!("D{i:03}"), "FL350", format!("J{i}")))
            .collect()
    }

    fn expect_fetch(step: Step) -> Ticket {
        match step {
            Step::Fetch(ticket) => ticket,
            Step::Settled => panic!("expected a remote fetch"),
        }
    }

    #[test]
    fn unfiltered_selection_slices_cache() {
        let mut repo = ready_repo(many(80));
        let mut coordinator = QueryCoordinator::default();

        let step = coordinator.on_repository_settled(&mut repo);
        assert_eq!(step, Step::Settled);
        let state = coordinator.state();
        assert!(!state.is_loading);
        assert_eq!(state.results.len(), RESULT_CAP);
        assert_eq!(state.results.as_slice(), &repo.all_routes()[..RESULT_CAP]);
    }

    #[test]
    fn filtered_selection_issues_remote_query() {
        let repo = ready_repo(many(3));
        let mut coordinator = QueryCoordinator::default();

        let ticket = expect_fetch(coordinator.on_selection_changed(
            FilterSelection::new("JFK", "All", "FL350"),
            &repo,
        ));
        assert_eq!(ticket.query.params(), vec![("origin", "JFK"), ("alt", "FL350")]);
        assert!(coordinator.state().is_loading);
        assert_eq!(coordinator.state().display(), DisplayState::Loading);
    }

    #[test]
    fn remote_results_are_capped() {
        let repo = ready_repo(Vec::new());
        let mut coordinator = QueryCoordinator::default();
        let ticket = expect_fetch(coordinator.set_field(
            FilterField::Origin,
            FilterValue::parse("JFK"),
            &repo,
        ));

        assert!(coordinator.complete(&ticket, Ok(many(75))));
        assert_eq!(coordinator.state().results.len(), RESULT_CAP);
        assert!(!coordinator.state().is_loading);
    }

    #[test]
    fn stale_resolution_is_discarded() {
        let repo = ready_repo(many(2));
        let mut coordinator = QueryCoordinator::default();

        let a = expect_fetch(coordinator.set_field(FilterField::Origin, "JFK".into(), &repo));
        let b = expect_fetch(coordinator.set_field(FilterField::Altitude, "FL330".into(), &repo));
        assert!(b.generation > a.generation);

        let b_routes = vec![Route::new("JFK", "ORD", "FL330", "J2")];
        assert!(coordinator.complete(&b, Ok(b_routes.clone())));
        assert!(!coordinator.complete(&a, Ok(many(10))));

        assert_eq!(coordinator.state().results, b_routes);
        assert_eq!(coordinator.state().generation, b.generation);
    }

    #[test]
    fn stale_error_does_not_override_newer_success() {
        let repo = ready_repo(many(2));
        let mut coordinator = QueryCoordinator::default();

        let a = expect_fetch(coordinator.set_field(FilterField::Origin, "JFK".into(), &repo));
        let b = expect_fetch(coordinator.set_field(FilterField::Origin, "BOS".into(), &repo));
        assert!(!coordinator.complete(&a, Err(FetchError::Transport("reset".into()))));
        // Still waiting on b
        assert!(coordinator.state().is_loading);
        assert!(coordinator.complete(&b, Ok(Vec::new())));
        assert_eq!(coordinator.state().error, None);
        assert_eq!(coordinator.state().display(), DisplayState::Empty);
    }

    #[test]
    fn switching_back_to_all_supersedes_inflight_fetch() {
        let repo = ready_repo(many(5));
        let mut coordinator = QueryCoordinator::default();

        let a = expect_fetch(coordinator.set_field(FilterField::Origin, "JFK".into(), &repo));
        let step = coordinator.set_field(FilterField::Origin, FilterValue::All, &repo);
        assert_eq!(step, Step::Settled);
        assert!(!coordinator.complete(&a, Ok(Vec::new())));
        assert_eq!(coordinator.state().results.len(), 5);
    }

    #[test]
    fn failure_retains_previous_results_by_default() {
        let mut repo = ready_repo(many(4));
        let mut coordinator = QueryCoordinator::default();
        coordinator.on_repository_settled(&mut repo);

        let ticket = expect_fetch(coordinator.set_field(FilterField::Origin, "JFK".into(), &repo));
        coordinator.complete(&ticket, Err(FetchError::Protocol("HTTP 502".into())));

        let state = coordinator.state();
        assert!(!state.is_loading);
        assert_eq!(state.results.len(), 4);
        match state.display() {
            DisplayState::Failed { message, stale } => {
                assert_eq!(message, "protocol error: HTTP 502");
                assert_eq!(stale.len(), 4);
            }
            other => panic!("unexpected display state {other:?}"),
        }
    }

    #[test]
    fn failure_clears_results_under_clear_policy() {
        let mut repo = ready_repo(many(4));
        let mut coordinator = QueryCoordinator::new(ErrorPolicy::Clear);
        coordinator.on_repository_settled(&mut repo);

        let ticket = expect_fetch(coordinator.set_field(FilterField::Origin, "JFK".into(), &repo));
        coordinator.complete(&ticket, Err(FetchError::Parse("expected array".into())));

        assert!(coordinator.state().results.is_empty());
        assert!(matches!(
            coordinator.state().display(),
            DisplayState::Failed { stale: [], .. }
        ));
    }

    #[test]
    fn newer_error_replaces_older_error() {
        let repo = ready_repo(Vec::new());
        let mut coordinator = QueryCoordinator::default();

        let a = expect_fetch(coordinator.set_field(FilterField::Origin, "JFK".into(), &repo));
        coordinator.complete(&a, Err(FetchError::Transport("dns".into())));
        let b = expect_fetch(coordinator.set_field(FilterField::Origin, "BOS".into(), &repo));
        coordinator.complete(&b, Err(FetchError::Protocol("HTTP 500".into())));

        let error = coordinator.state().error.as_ref().unwrap();
        assert_eq!(error.message, "protocol error: HTTP 500");
    }

    #[test]
    fn repository_failure_surfaces_once() {
        let mut repo = RouteRepository::new();
        repo.begin_load().unwrap();
        repo.finish_load(Err(FetchError::Protocol("envelope missing contents".into())))
            .unwrap();
        let mut coordinator = QueryCoordinator::default();

        assert_eq!(coordinator.on_repository_settled(&mut repo), Step::Settled);
        assert!(coordinator.state().results.is_empty());
        assert!(coordinator.state().error.is_some());

        // A later unfiltered selection does not resurrect the load error
        coordinator.on_selection_changed(FilterSelection::default(), &repo);
        assert_eq!(coordinator.state().error, None);
        assert_eq!(coordinator.state().display(), DisplayState::Empty);
    }

    #[test]
    fn unfiltered_selection_waits_for_initial_load() {
        let mut repo = RouteRepository::new();
        assert_eq!(plan(&FilterSelection::default(), &repo), QueryPlan::Pending);

        repo.begin_load().unwrap();
        let mut coordinator = QueryCoordinator::default();
        let step = coordinator.on_selection_changed(FilterSelection::default(), &repo);
        assert_eq!(step, Step::Settled);
        assert!(repo.is_loading());
        assert!(coordinator.state().is_loading);
        assert_eq!(coordinator.state().display(), DisplayState::Loading);

        repo.finish_load(Ok(many(3))).unwrap();
        assert_eq!(coordinator.on_repository_settled(&mut repo), Step::Settled);
        assert!(!coordinator.state().is_loading);
        assert_eq!(coordinator.state().results.len(), 3);
    }

    #[test]
    fn filtered_selection_does_not_wait_for_initial_load() {
        let mut repo = RouteRepository::new();
        repo.begin_load().unwrap();
        let mut coordinator = QueryCoordinator::default();

        let ticket = expect_fetch(coordinator.set_field(FilterField::Origin, "JFK".into(), &repo));
        assert_eq!(ticket.query.params(), vec![("origin", "JFK")]);
        assert_eq!(coordinator.state().display(), DisplayState::Loading);
    }

    #[test]
    fn error_policy_parses() {
        assert_eq!(ErrorPolicy::parse("Clear"), Some(ErrorPolicy::Clear));
        assert_eq!(ErrorPolicy::parse("retain"), Some(ErrorPolicy::Retain));
        assert_eq!(ErrorPolicy::parse("drop"), None);
    }
}
