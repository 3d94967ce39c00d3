//! Filtered-search query built from a selection.

use crate::models::{FilterField, FilterSelection};
use serde::Serialize;

/// Parameters for one filtered-search request.
///
/// Holds only the constrained fields; an unfiltered selection has no query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RouteQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(rename = "dest", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(rename = "alt", skip_serializing_if = "Option::is_none")]
    pub altitude: Option<String>,
}

impl RouteQuery {
    /// Query for `selection`, or `None` when every field is `All`.
    pub fn from_selection(selection: &FilterSelection) -> Option<Self> {
        if selection.is_unfiltered() {
            return None;
        }
        Some(Self {
            origin: selection.origin.as_constraint().map(str::to_string),
            destination: selection.destination.as_constraint().map(str::to_string),
            altitude: selection.altitude.as_constraint().map(str::to_string),
        })
    }

    fn value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Origin => self.origin.as_deref(),
            FilterField::Destination => self.destination.as_deref(),
            FilterField::Altitude => self.altitude.as_deref(),
        }
    }

    /// Query-string pairs in `origin`, `dest`, `alt` order.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        FilterField::ALL_FIELDS
            .iter()
            .filter_map(|field| self.value(*field).map(|v| (field.query_param(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_selection_has_no_query() {
        assert_eq!(RouteQuery::from_selection(&FilterSelection::default()), None);
    }

    #[test]
    fn params_contain_only_constrained_fields() {
        let query = RouteQuery::from_selection(&FilterSelection::new("JFK", "All", "All")).unwrap();
        assert_eq!(query.params(), vec![("origin", "JFK")]);

        let query =
            RouteQuery::from_selection(&FilterSelection::new("All", "ORD", "FL330")).unwrap();
        assert_eq!(query.params(), vec![("dest", "ORD"), ("alt", "FL330")]);
    }

    #[test]
    fn params_map_every_field_name() {
        let query =
            RouteQuery::from_selection(&FilterSelection::new("JFK", "LAX", "FL350")).unwrap();
        assert_eq!(
            query.params(),
            vec![("origin", "JFK"), ("dest", "LAX"), ("alt", "FL350")]
        );
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["dest"], "LAX");
        assert_eq!(json["alt"], "FL350");
    }
}
