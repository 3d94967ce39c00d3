//! Interactive filter session.
//!
//! Reads selector changes from stdin while in-flight searches resolve in
//! the same task, so a burst of changes produces overlapping requests and
//! only the latest one reaches the screen.

use anyhow::Result;
use flyby_core::{FilterField, FilterSelection, FilterValue};
use flyby_sdk::{RouteBrowser, RouteSource};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

pub const HELP: &str = "\
Commands:
  origin <value>        set the origin filter (All clears it)
  destination <value>   set the destination filter
  altitude <value>      set the altitude filter
  reset                 clear every filter
  show                  print the current filters and results
  options [field]       list selectable values
  help                  print this message
  quit                  leave the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Set(FilterField, FilterValue),
    Reset,
    Show,
    Options(Option<FilterField>),
    Help,
    Quit,
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(BrowseCommand::Show);
        };
        let rest: Vec<&str> = parts.collect();

        match head.to_lowercase().as_str() {
            "reset" => Ok(BrowseCommand::Reset),
            "show" => Ok(BrowseCommand::Show),
            "help" | "?" => Ok(BrowseCommand::Help),
            "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
            "options" => match rest.first() {
                None => Ok(BrowseCommand::Options(None)),
                Some(name) => FilterField::parse(name)
                    .map(|field| BrowseCommand::Options(Some(field)))
                    .ok_or_else(|| format!("Unknown field: {}", name)),
            },
            other => {
                let field = FilterField::parse(other)
                    .ok_or_else(|| format!("Unknown command: {} (try help)", other))?;
                if rest.is_empty() {
                    return Err(format!("Usage: {} <value>", other));
                }
                Ok(BrowseCommand::Set(field, FilterValue::parse(&rest.join(" "))))
            }
        }
    }
}

fn apply<S: RouteSource + 'static>(browser: &mut RouteBrowser<S>, command: BrowseCommand) {
    match command {
        BrowseCommand::Set(field, value) => {
            if !browser.options().contains(field, &value) {
                println!("{} {} is not in the cached route set, searching anyway", field, value);
            }
            browser.set_field(field, value);
            print!("{}", render::render_selection(browser.selection()));
            print!("{}", render::render_state(browser.state()));
        }
        BrowseCommand::Reset => {
            browser.select(FilterSelection::default());
            print!("{}", render::render_selection(browser.selection()));
            print!("{}", render::render_state(browser.state()));
        }
        BrowseCommand::Show => {
            print!("{}", render::render_selection(browser.selection()));
            print!("{}", render::render_state(browser.state()));
        }
        BrowseCommand::Options(field) => {
            let fields = match field {
                Some(field) => vec![field],
                None => FilterField::ALL_FIELDS.to_vec(),
            };
            for field in fields {
                print!("{}", render::render_options(browser.options(), field));
            }
        }
        BrowseCommand::Help => print!("{}", HELP),
        BrowseCommand::Quit => {}
    }
}

/// Run the session until `quit` or end of input.
pub async fn run<S: RouteSource + 'static>(browser: &mut RouteBrowser<S>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{}", HELP);
    print!(
        "{}",
        render::render_cache_status(
            browser.repository().fetched_at(),
            browser.repository().all_routes().len()
        )
    );
    apply(browser, BrowseCommand::Show);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match BrowseCommand::parse(&line) {
                    Ok(BrowseCommand::Quit) => break,
                    Ok(command) => apply(browser, command),
                    Err(message) => println!("{}", message),
                }
            }
            Some(applied) = browser.next_completion(), if browser.in_flight() > 0 => {
                if applied {
                    print!("{}", render::render_state(browser.state()));
                }
            }
        }
    }

    Ok(())
}
