//! Plain-text rendering of the result panel, selectors and airport card.

use chrono::{DateTime, Utc};
use flyby_core::{
    AirportRecord, DisplayState, FilterField, FilterOptions, FilterSelection, QueryState, Route,
};

pub const LOADING: &str = "Loading... Please wait...";
pub const NO_RESULTS: &str = "No results found.";

pub fn render_route(route: &Route, position: usize) -> String {
    format!(
        "[{}] {}\n  Origin: {}\n  Destination: {}\n  Altitude: {}\n",
        route.display_key(position),
        route.route,
        route.origin,
        route.destination,
        route.altitude
    )
}

fn render_routes(routes: &[Route]) -> String {
    routes
        .iter()
        .enumerate()
        .map(|(position, route)| render_route(route, position))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_state(state: &QueryState) -> String {
    match state.display() {
        DisplayState::Loading => format!("{}\n", LOADING),
        DisplayState::Empty => format!("{}\n", NO_RESULTS),
        DisplayState::Failed { message, stale } => {
            let mut out = format!("Oops !! Error fetching data: {}\n", message);
            if !stale.is_empty() {
                out.push_str(&format!("Showing {} previous results:\n\n", stale.len()));
                out.push_str(&render_routes(stale));
            }
            out
        }
        DisplayState::Results(routes) => render_routes(routes),
    }
}

pub fn render_selection(selection: &FilterSelection) -> String {
    format!(
        "Filter by: Origin={} Destination={} Altitude={}\n",
        selection.origin, selection.destination, selection.altitude
    )
}

pub fn render_options(options: &FilterOptions, field: FilterField) -> String {
    format!("{}: {}\n", field.label(), options.values(field).join(", "))
}

pub fn render_cache_status(fetched_at: Option<DateTime<Utc>>, cached: usize) -> String {
    match fetched_at {
        Some(at) => format!(
            "{} routes cached at {}\n",
            cached,
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => "Route cache unavailable\n".to_string(),
    }
}

pub fn render_airport(record: &AirportRecord) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    format!(
        "{}\n{}, {}\n  FAA Code: {}\n  ICAO Code: {}\n  City: {}\n  State: {}\n  Elevation: {} ft\n  Control Tower: {}\n",
        field(&record.facility_name),
        field(&record.city),
        field(&record.state_full),
        field(&record.faa_ident),
        field(&record.icao_ident),
        field(&record.city),
        field(&record.state_full),
        field(&record.elevation),
        if record.has_control_tower() { "Yes" } else { "No" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyby_core::{ErrorInfo, ErrorKind};

    #[test]
    fn renders_mutually_exclusive_states() {
        let mut state = QueryState {
            is_loading: true,
            ..Default::default()
        };
        assert_eq!(render_state(&state), "Loading... Please wait...\n");

        state.is_loading = false;
        assert_eq!(render_state(&state), "No results found.\n");

        state.error = Some(ErrorInfo {
            kind: ErrorKind::Transport,
            message: "transport error: dns".into(),
        });
        assert_eq!(
            render_state(&state),
            "Oops !! Error fetching data: transport error: dns\n"
        );
    }

    #[test]
    fn renders_route_cards_with_keys() {
        let state = QueryState {
            results: vec![
                Route::new("JFK", "LAX", "FL350", "J1"),
                Route::new("JFK", "LAX", "FL350", "J1"),
            ],
            ..Default::default()
        };
        let out = render_state(&state);
        assert!(out.contains("[JFK-LAX-FL350-0] J1"));
        assert!(out.contains("[JFK-LAX-FL350-1] J1"));
        assert!(out.contains("  Destination: LAX"));
    }

    #[test]
    fn renders_stale_results_after_error() {
        let state = QueryState {
            results: vec![Route::new("JFK", "ORD", "FL330", "J2")],
            error: Some(ErrorInfo {
                kind: ErrorKind::Protocol,
                message: "protocol error: HTTP 500".into(),
            }),
            ..Default::default()
        };
        let out = render_state(&state);
        assert!(out.starts_with("Oops !! Error fetching data: protocol error: HTTP 500\n"));
        assert!(out.contains("Showing 1 previous results"));
    }

    #[test]
    fn renders_options_line() {
        let options = FilterOptions::from_routes(&[Route::new("JFK", "LAX", "FL350", "J1")]);
        assert_eq!(render_options(&options, FilterField::Origin), "Origin: All, JFK\n");
    }

    #[test]
    fn renders_airport_card() {
        let record = AirportRecord {
            facility_name: Some("JOHN F KENNEDY INTL".into()),
            city: Some("NEW YORK".into()),
            state_full: Some("NEW YORK".into()),
            elevation: Some("13".into()),
            control_tower: Some("Y".into()),
            ..Default::default()
        };
        let out = render_airport(&record);
        assert!(out.starts_with("JOHN F KENNEDY INTL\nNEW YORK, NEW YORK\n"));
        assert!(out.contains("Elevation: 13 ft"));
        assert!(out.contains("Control Tower: Yes"));
    }
}
