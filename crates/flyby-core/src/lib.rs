//! Fly-by core - preferred-route model and query coordination
//!
//! Pure logic with no I/O: the route repository state machine, filter value
//! extraction, filtered-search query building and the generation-checked
//! query coordinator.

pub mod coordinator;
pub mod error;
pub mod filter;
pub mod models;
pub mod query;
pub mod repository;

pub use coordinator::{
    plan, DisplayState, ErrorPolicy, QueryCoordinator, QueryPlan, QueryState, Step, Ticket,
};
pub use error::{ErrorInfo, ErrorKind, FetchError, ValidationError};
pub use filter::{distinct_values, FilterOptions};
pub use models::{AirportRecord, FilterField, FilterSelection, FilterValue, Route, ALL, RESULT_CAP};
pub use query::RouteQuery;
pub use repository::{LoadError, RepositoryState, RouteRepository};
