use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use clap::{Args, Subcommand, ValueEnum};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use ar_core::config::DEFAULT_MAX_PAGE_SIZE;
use ar_core::query::is_blank;
use ar_core::{ArgumentApi, AspectSpace, Config, FetchMode, Result};
use ar_render::chart::dimension_label;
use ar_render::{layout_bar_chart, ArgumentTable, ChartConfig};

use crate::session::{run_query_cycle, QueryOutcome, QuerySession};

const DEFAULT_CELL_WIDTH: usize = 60;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum QueryCommands {
    /// Fetch every argument matching a query
    Search(SearchArgs),
    /// Show the aspect space of a query
    Aspects {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Write the bar chart as SVG to this file
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Read queries from stdin, one per line. A new line cancels the query still running.
    Interactive {
        /// Widest table cell, in terminal columns
        #[arg(long, default_value_t = DEFAULT_CELL_WIDTH)]
        cell_width: usize,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Search terms
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
    /// Largest page requested from the service
    #[arg(long, default_value_t = DEFAULT_MAX_PAGE_SIZE)]
    pub max_page_size: u64,
    /// Page requests in flight; 1 fetches pages one after another
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,
    /// Print an aligned table or a JSON document
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// Write the aspect-space bar chart as SVG to this file
    #[arg(long)]
    pub chart: Option<PathBuf>,
    /// Widest table cell, in terminal columns
    #[arg(long, default_value_t = DEFAULT_CELL_WIDTH)]
    pub cell_width: usize,
}

impl SearchArgs {
    pub fn fetch_mode(&self) -> FetchMode {
        match self.concurrency {
            1 => FetchMode::Sequential,
            n => FetchMode::Concurrent(n),
        }
    }
}

pub async fn handle_command(command: QueryCommands, api: Arc<dyn ArgumentApi>, config: Config) -> Result<()> {
    match command {
        QueryCommands::Search(args) => {
            let config = config
                .with_max_page_size(args.max_page_size)
                .with_fetch_mode(args.fetch_mode());
            config.validate()?;

            let raw_query = args.query.join(" ");
            if is_blank(&raw_query) {
                warn!("Nothing to search for");
                return Ok(());
            }

            let outcome = run_query_cycle(api, &raw_query, &config).await;
            let report = match args.format {
                OutputFormat::Table => format_outcome(&outcome, args.cell_width),
                OutputFormat::Json => outcome_json(&outcome)?,
            };
            println!("{}", report);

            if let Err(e) = &outcome.aspects {
                error!("Aspect space for {:?} failed: {}", outcome.raw_query, e);
            }
            if let Some(path) = &args.chart {
                write_chart(path, outcome.aspects.as_ref().map_err(clone_error)?, &ChartConfig::default())?;
            }
            outcome.arguments.map(|_| ())
        }
        QueryCommands::Aspects { query, chart } => {
            config.validate()?;
            let raw_query = query.join(" ");
            if is_blank(&raw_query) {
                warn!("Nothing to search for");
                return Ok(());
            }

            let normalized = ar_core::query::normalize(&raw_query);
            let space = api.fetch_aspect_space(&normalized).await?;
            print!("{}", format_aspect_space(&space));
            if let Some(path) = &chart {
                write_chart(path, &space, &ChartConfig::default())?;
            }
            Ok(())
        }
        QueryCommands::Interactive { cell_width } => {
            config.validate()?;
            run_interactive(api, config, cell_width).await
        }
    }
}

async fn run_interactive(api: Arc<dyn ArgumentApi>, config: Config, cell_width: usize) -> Result<()> {
    let (mut session, mut outcomes) = QuerySession::new(api, config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Enter a query per line (Ctrl-D to quit)");

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if session.submit(&line) {
                        debug!("Submitted {:?}", line);
                    }
                }
                None => break,
            },
            Some(outcome) = outcomes.recv() => {
                println!("{}", format_outcome(&outcome, cell_width));
            }
        }
    }

    session.wait().await?;
    while let Ok(outcome) = outcomes.try_recv() {
        println!("{}", format_outcome(&outcome, cell_width));
    }
    Ok(())
}

/// Human-readable report of one query cycle. A failed fetch is reported
/// distinctly from an empty result.
pub fn format_outcome(outcome: &QueryOutcome, cell_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Query: {} ({})", outcome.raw_query, outcome.query);

    match &outcome.arguments {
        Ok(arguments) if arguments.is_empty() => {
            out.push_str("No arguments found.\n");
        }
        Ok(arguments) => {
            out.push_str(&ArgumentTable::from_arguments(arguments).render_text(cell_width));
            let _ = writeln!(out, "{} arguments", arguments.len());
        }
        Err(e) if e.is_partial() => {
            let items = e.partial_items();
            out.push_str(&ArgumentTable::from_arguments(items).render_text(cell_width));
            let _ = writeln!(out, "Incomplete: {}", e);
        }
        Err(e) => {
            let _ = writeln!(out, "Argument fetch failed: {}", e);
        }
    }

    match &outcome.aspects {
        Ok(space) => {
            out.push_str("Aspect space:\n");
            out.push_str(&format_aspect_space(space));
        }
        Err(e) => {
            let _ = writeln!(out, "Aspect space unavailable: {}", e);
        }
    }
    out
}

pub fn format_aspect_space(space: &AspectSpace) -> String {
    if space.dimensions.is_empty() {
        return "  (empty)\n".to_string();
    }
    let mut out = String::new();
    for dimension in &space.dimensions {
        let _ = writeln!(out, "  {:>8.3}  {}", dimension.weight, dimension_label(dimension));
    }
    out
}

pub fn outcome_json(outcome: &QueryOutcome) -> Result<String> {
    let (arguments, error) = match &outcome.arguments {
        Ok(arguments) => (arguments.as_slice(), None),
        Err(e) => (e.partial_items(), Some(e.to_string())),
    };
    let value = json!({
        "query": outcome.raw_query,
        "normalizedQuery": outcome.query,
        "fetchedAt": outcome.fetched_at.to_rfc3339(),
        "complete": error.is_none(),
        "count": arguments.len(),
        "arguments": arguments,
        "argumentsError": error,
        "aspectSpace": outcome.aspects.as_ref().ok(),
        "aspectSpaceError": outcome.aspects.as_ref().err().map(|e| e.to_string()),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn write_chart(path: &Path, space: &AspectSpace, config: &ChartConfig) -> Result<()> {
    let chart = layout_bar_chart(space, config);
    std::fs::write(path, chart.to_svg())?;
    info!("📊 Wrote chart with {} bars to {}", chart.bars.len(), path.display());
    Ok(())
}

/// Errors are not `Clone`; the chart needs its own copy of the message.
fn clone_error(e: &ar_core::Error) -> ar_core::Error {
    ar_core::Error::External(anyhow::anyhow!("aspect space unavailable: {}", e))
}
