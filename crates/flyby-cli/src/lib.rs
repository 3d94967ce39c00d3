//! Fly-by CLI - command line front end for the route browser.
//!
//! Subcommands:
//! - routes: list preferred routes, optionally filtered
//! - options: list the selectable filter values
//! - airport: look up an airport by FAA or ICAO code
//! - browse: interactive filter session

pub mod browse;
pub mod config;
pub mod render;

pub use config::Config;
