//! Airport lookup by FAA or ICAO code.

use flyby_core::{AirportRecord, ValidationError};
use serde_json::{Map, Value};

use crate::client::ProxyClient;

/// A non-blank, upper-cased airport code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportCode(String);

impl AirportCode {
    /// Trim and upper-case `input`; blank input is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let code = input.trim();
        if code.is_empty() {
            return Err(ValidationError::MissingCode);
        }
        Ok(Self(code.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirportLookup {
    Found(AirportRecord),
    NotFound,
}

impl AirportLookup {
    pub const NOT_FOUND_MESSAGE: &'static str = "No data found for the provided code.";
}

impl ProxyClient {
    /// Validate `input` and look the airport up.
    ///
    /// Blank input fails validation without touching the network; every
    /// fetch failure collapses into [`AirportLookup::NotFound`].
    pub async fn lookup_airport(&self, input: &str) -> Result<AirportLookup, ValidationError> {
        let code = AirportCode::parse(input)?;
        Ok(self.lookup_airport_code(&code).await)
    }

    /// Look up an already validated code.
    pub async fn lookup_airport_code(&self, code: &AirportCode) -> AirportLookup {
        let target = self.endpoints.airport_url(code.as_str());
        let payload: Map<String, Value> = self.fetch_or_default(&target).await;
        select_airport(payload, code)
    }
}

/// Pick the record for `code` out of a payload keyed by airport code.
///
/// Falls back to the first key in document order when the provider keys the
/// response differently (e.g. FAA vs ICAO ident).
pub fn select_airport(mut payload: Map<String, Value>, code: &AirportCode) -> AirportLookup {
    let entry = match payload.remove(code.as_str()) {
        Some(entry) => entry,
        None => match payload.into_iter().next() {
            Some((_, entry)) => entry,
            None => return AirportLookup::NotFound,
        },
    };

    let records: Vec<AirportRecord> = match serde_json::from_value(entry) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(code = code.as_str(), error = %e, "unexpected airport payload shape");
            return AirportLookup::NotFound;
        }
    };

    match records.into_iter().next() {
        Some(record) if record.facility_name.is_some() => AirportLookup::Found(record),
        _ => AirportLookup::NotFound,
    }
}
