//! Fly-by - browse FAA preferred routes and airports through a CORS relay

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flyby_cli::{browse, render, Config};
use flyby_core::{ErrorPolicy, FilterField, FilterSelection, ALL};
use flyby_sdk::{AirportLookup, ProxyClient, RouteBrowser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Aviation API base URL (overrides FLYBY_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// CORS relay URL (overrides FLYBY_PROXY_BASE)
    #[arg(long, global = true)]
    proxy_base: Option<String>,

    /// Clear visible results when a filtered search fails
    #[arg(long, global = true)]
    clear_on_error: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search flights: list preferred routes, filtered by origin/destination/altitude
    Routes {
        #[arg(long, default_value = ALL)]
        origin: String,

        #[arg(long, visible_alias = "dest", default_value = ALL)]
        destination: String,

        #[arg(long, visible_alias = "alt", default_value = ALL)]
        altitude: String,

        /// Print the result panel state as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the selectable values for each filter
    Options {
        /// Only this field (origin, destination, altitude)
        #[arg(long)]
        field: Option<String>,
    },
    /// Search airports by FAA or ICAO code
    Airport {
        code: String,

        #[arg(long)]
        json: bool,
    },
    /// Interactive filter session
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "flyby=debug" } else { "flyby=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let mut config = Config::from_env();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if let Some(proxy_base) = cli.proxy_base {
        config.proxy_base = proxy_base;
    }
    if cli.clear_on_error {
        config.error_policy = ErrorPolicy::Clear;
    }
    tracing::debug!("Using {:?}", config);

    let client = ProxyClient::new(config.endpoints()?);

    match cli.command {
        Command::Routes {
            origin,
            destination,
            altitude,
            json,
        } => {
            let mut browser = RouteBrowser::new(client, config.error_policy);
            browser.init().await?;

            let selection = FilterSelection::new(
                origin.as_str(),
                destination.as_str(),
                altitude.as_str(),
            );
            for field in FilterField::ALL_FIELDS {
                let value = selection.get(field);
                if !browser.options().contains(field, value) {
                    tracing::warn!("{} {} is not in the cached route set", field, value);
                }
            }

            if !selection.is_unfiltered() {
                browser.select(selection);
            }
            let state = browser.settle().await;

            if json {
                println!("{}", serde_json::to_string_pretty(state)?);
            } else {
                print!("{}", render::render_state(state));
            }
        }
        Command::Options { field } => {
            let fields = match field {
                Some(name) => vec![FilterField::parse(&name)
                    .with_context(|| format!("unknown filter field {:?}", name))?],
                None => FilterField::ALL_FIELDS.to_vec(),
            };

            let mut browser = RouteBrowser::new(client, config.error_policy);
            browser.init().await?;
            let repository = browser.repository();
            print!(
                "{}",
                render::render_cache_status(repository.fetched_at(), repository.all_routes().len())
            );
            for field in fields {
                print!("{}", render::render_options(browser.options(), field));
            }
        }
        Command::Airport { code, json } => {
            // Validation failure surfaces as the command's error, before any request
            let lookup = client.lookup_airport(&code).await?;
            match lookup {
                AirportLookup::Found(record) if json => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                AirportLookup::Found(record) => print!("{}", render::render_airport(&record)),
                AirportLookup::NotFound => println!("{}", AirportLookup::NOT_FOUND_MESSAGE),
            }
        }
        Command::Browse => {
            let mut browser = RouteBrowser::new(client, config.error_policy);
            println!("{}", render::LOADING);
            browser.init().await?;
            browse::run(&mut browser).await?;
        }
    }

    Ok(())
}
