//! Core data models for preferred routes, filters and airports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of routes surfaced to the result panel on any path.
pub const RESULT_CAP: usize = 50;

/// Sentinel label meaning "no constraint" on a filter field.
pub const ALL: &str = "All";

/// A published preferred route between two airports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    pub destination: String,
    pub altitude: String,
    pub route: String,
    /// Effective hours, as published by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours3: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub route_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<String>,
    /// Departure ARTCC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_artcc: Option<String>,
    /// Arrival ARTCC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_artcc: Option<String>,
}

impl Route {
    /// Build a route from the four filterable/displayed fields.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        altitude: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            altitude: altitude.into(),
            route: route.into(),
            hours1: None,
            hours2: None,
            hours3: None,
            route_type: None,
            area: None,
            aircraft: None,
            flow: None,
            seq: None,
            d_artcc: None,
            a_artcc: None,
        }
    }

    /// Value of a filterable field.
    pub fn field(&self, field: FilterField) -> &str {
        match field {
            FilterField::Origin => &self.origin,
            FilterField::Destination => &self.destination,
            FilterField::Altitude => &self.altitude,
        }
    }

    /// Render key for a route at `position` in a result list.
    ///
    /// Routes have no server-assigned id, so the position disambiguates
    /// duplicates within one collection.
    pub fn display_key(&self, position: usize) -> String {
        format!(
            "{}-{}-{}-{}",
            self.origin, self.destination, self.altitude, position
        )
    }
}

/// The three filterable route fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Origin,
    Destination,
    Altitude,
}

impl FilterField {
    pub const ALL_FIELDS: [FilterField; 3] = [
        FilterField::Origin,
        FilterField::Destination,
        FilterField::Altitude,
    ];

    /// Query parameter name used by the filtered-search endpoint.
    pub fn query_param(self) -> &'static str {
        match self {
            FilterField::Origin => "origin",
            FilterField::Destination => "dest",
            FilterField::Altitude => "alt",
        }
    }

    /// Human-readable selector label.
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Origin => "Origin",
            FilterField::Destination => "Destination",
            FilterField::Altitude => "Altitude",
        }
    }

    /// Parse a field name or its query-parameter alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "origin" | "orig" => Some(Self::Origin),
            "destination" | "dest" => Some(Self::Destination),
            "altitude" | "alt" => Some(Self::Altitude),
            _ => None,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One filter field's selected value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterValue {
    /// No constraint on this field
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    /// Parse a selector value; `"All"` and blank input mean no constraint.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            FilterValue::All
        } else {
            FilterValue::Only(value.to_string())
        }
    }

    /// True when the field is unconstrained.
    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }

    /// The constrained value, if any.
    pub fn as_constraint(&self) -> Option<&str> {
        match self {
            FilterValue::All => None,
            FilterValue::Only(value) => Some(value),
        }
    }

    /// Selector text, `All` included.
    pub fn as_str(&self) -> &str {
        match self {
            FilterValue::All => ALL,
            FilterValue::Only(value) => value,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::parse(value)
    }
}

impl Serialize for FilterValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FilterValue::parse(&raw))
    }
}

/// The current origin/destination/altitude selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub origin: FilterValue,
    #[serde(default)]
    pub destination: FilterValue,
    #[serde(default)]
    pub altitude: FilterValue,
}

impl FilterSelection {
    /// Build a selection from three selector values.
    pub fn new(
        origin: impl Into<FilterValue>,
        destination: impl Into<FilterValue>,
        altitude: impl Into<FilterValue>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            altitude: altitude.into(),
        }
    }

    /// True when every field is `All`.
    pub fn is_unfiltered(&self) -> bool {
        self.origin.is_all() && self.destination.is_all() && self.altitude.is_all()
    }

    /// Selected value for one field.
    pub fn get(&self, field: FilterField) -> &FilterValue {
        match field {
            FilterField::Origin => &self.origin,
            FilterField::Destination => &self.destination,
            FilterField::Altitude => &self.altitude,
        }
    }

    /// Copy of this selection with one field replaced.
    pub fn with(&self, field: FilterField, value: impl Into<FilterValue>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            FilterField::Origin => next.origin = value,
            FilterField::Destination => next.destination = value,
            FilterField::Altitude => next.altitude = value,
        }
        next
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "origin={} destination={} altitude={}",
            self.origin, self.destination, self.altitude
        )
    }
}

/// Airport facility record returned by the airport lookup endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirportRecord {
    pub site_number: Option<String>,
    pub facility_name: Option<String>,
    pub faa_ident: Option<String>,
    pub icao_ident: Option<String>,
    pub region: Option<String>,
    pub district_office: Option<String>,
    pub state: Option<String>,
    pub state_full: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub ownership: Option<String>,
    #[serde(rename = "use")]
    pub facility_use: Option<String>,
    pub manager: Option<String>,
    pub manager_phone: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub elevation: Option<String>,
    pub control_tower: Option<String>,
    pub status: Option<String>,
}

impl AirportRecord {
    /// Whether the facility reports a control tower.
    pub fn has_control_tower(&self) -> bool {
        self.control_tower.as_deref() == Some("Y")
    }
}
