//! Selectable filter values derived from the cached route collection.

use crate::models::{FilterField, FilterValue, Route, ALL};
use serde::Serialize;
use std::collections::HashSet;

/// `"All"` followed by each distinct value of `field`, in first-seen order.
pub fn distinct_values(routes: &[Route], field: FilterField) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = vec![ALL.to_string()];
    for route in routes {
        let value = route.field(field);
        // A literal "All" in the data would collide with the sentinel
        if value == ALL {
            continue;
        }
        if seen.insert(value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Option lists for all three selectors.
///
/// Built from the unfiltered repository cache only, so the selectors stay
/// stable while the result panel changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub origin: Vec<String>,
    pub destination: Vec<String>,
    pub altitude: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::from_routes(&[])
    }
}

impl FilterOptions {
    /// Build selector options from the unfiltered cache.
    pub fn from_routes(routes: &[Route]) -> Self {
        Self {
            origin: distinct_values(routes, FilterField::Origin),
            destination: distinct_values(routes, FilterField::Destination),
            altitude: distinct_values(routes, FilterField::Altitude),
        }
    }

    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Origin => &self.origin,
            FilterField::Destination => &self.destination,
            FilterField::Altitude => &self.altitude,
        }
    }

    /// Whether `value` is one of the offered options for `field`.
    pub fn contains(&self, field: FilterField, value: &FilterValue) -> bool {
        match value {
            FilterValue::All => true,
            FilterValue::Only(value) => self.values(field).iter().any(|v| v == value),
        }
    }
}
