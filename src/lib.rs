pub mod chart;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod io_utils;
pub mod metrics;
pub mod numeric;
pub mod roles;
pub mod session;
pub mod sort;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, InputArgs, ViewArgs},
    config::Heuristics,
    dataset::ParseOptions,
    session::Session,
    sort::SortDirective,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("stock_lens", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Roles(args) => handle_roles(&args),
        Commands::Summary(args) => handle_summary(&args),
        Commands::Rows(args) => handle_rows(&args),
        Commands::Chart(args) => handle_chart(&args),
        Commands::Export(args) => handle_export(&args),
    }
}

/// Reads, decodes, and parses the input into a first session revision.
fn load_session(args: &InputArgs) -> Result<(Session, u8)> {
    let heuristics = Heuristics::load_or_default(args.config.as_deref())?;
    debug!("Heuristics: {heuristics:?}");
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Loading '{}' with delimiter '{}'",
        args.input.display(),
        io_utils::printable_delimiter(delimiter)
    );
    let text = io_utils::read_input_text(&args.input, encoding)?;
    let session = Session::new(heuristics)
        .load(&text, ParseOptions { delimiter })
        .with_context(|| format!("Parsing {:?}", args.input))?;
    Ok((session, delimiter))
}

/// Applies the column choice, filters, and sort as successive revisions.
fn apply_view(session: Session, view: &ViewArgs, sort: Option<&str>) -> Result<Session> {
    if let Some(column) = view.column.as_deref() {
        let dataset = session
            .dataset()
            .ok_or_else(|| anyhow!("No dataset loaded"))?;
        if !dataset.has_column(column) {
            return Err(anyhow!("Column '{column}' not found"));
        }
        if !session.roles().is_numeric(column) {
            return Err(anyhow!(
                "Column '{column}' is not numeric and cannot be totalled or charted"
            ));
        }
    }
    let sort = sort.map(SortDirective::parse).transpose()?;
    if let Some(directive) = &sort
        && !session
            .dataset()
            .is_some_and(|dataset| dataset.has_column(&directive.column))
    {
        return Err(anyhow!("Sort column '{}' not found", directive.column));
    }
    Ok(session
        .with_selected_column(view.column.as_deref())
        .with_search(view.search.as_str())
        .with_stock_filter(view.stock.as_str())
        .with_sort(sort))
}

fn handle_roles(args: &cli::RolesArgs) -> Result<()> {
    let (session, _) = load_session(&args.input)?;
    let roles = session.roles();
    if args.json {
        println!("{}", serde_json::to_string_pretty(roles)?);
        return Ok(());
    }
    let dataset = session
        .dataset()
        .ok_or_else(|| anyhow!("No dataset loaded"))?;
    let rows = dataset
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            vec![
                (idx + 1).to_string(),
                column.clone(),
                roles.labels_for(column).join(", "),
            ]
        })
        .collect::<Vec<_>>();
    let headers = vec!["#".to_string(), "column".to_string(), "roles".to_string()];
    table::print_table(&headers, &rows);
    info!("Classified {} column(s)", rows.len());
    Ok(())
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let (session, _) = load_session(&args.input)?;
    let session = apply_view(session, &args.view, None)?;
    let view = session
        .view()
        .ok_or_else(|| anyhow!("No dataset loaded"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view.summary)?);
    } else {
        let headers = vec!["metric".to_string(), "value".to_string()];
        table::print_table(&headers, &view.summary.display_rows());
    }
    info!(
        "Summarised {} of {} record(s) using column {:?}",
        view.summary.record_count,
        view.dataset.len(),
        view.selected_column
    );
    Ok(())
}

fn handle_rows(args: &cli::RowsArgs) -> Result<()> {
    let (session, _) = load_session(&args.input)?;
    let session = apply_view(session, &args.view, args.sort.as_deref())?;
    let view = session
        .view()
        .ok_or_else(|| anyhow!("No dataset loaded"))?;
    let image_idx = view
        .roles
        .image_column
        .as_deref()
        .and_then(|column| view.dataset.column_index(column));
    let limit = args.limit.unwrap_or(usize::MAX);
    let rows = view
        .rows
        .iter()
        .take(limit)
        .map(|record| {
            record
                .values()
                .iter()
                .enumerate()
                .map(|(idx, cell)| {
                    if Some(idx) == image_idx && !cell.is_empty() {
                        format!("[img] {cell}")
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    table::print_table(view.dataset.headers(), &rows);
    info!(
        "Displayed {} of {} visible row(s)",
        rows.len(),
        view.visible.len()
    );
    Ok(())
}

fn handle_chart(args: &cli::ChartArgs) -> Result<()> {
    let (session, _) = load_session(&args.input)?;
    let session = apply_view(session, &args.view, None)?;
    let view = session
        .view()
        .ok_or_else(|| anyhow!("No dataset loaded"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view.chart)?);
    } else {
        let value_header = view.selected_column.unwrap_or("value").to_string();
        let headers = vec!["label".to_string(), value_header];
        table::print_table(&headers, &chart::display_rows(&view.chart));
    }
    info!("Projected {} chart point(s)", view.chart.len());
    Ok(())
}

fn handle_export(args: &cli::ExportArgs) -> Result<()> {
    let (session, input_delimiter) = load_session(&args.input)?;
    let session = apply_view(session, &args.view, args.sort.as_deref())?;
    let view = session
        .view()
        .ok_or_else(|| anyhow!("No dataset loaded"))?;
    let delimiter = args.output_delimiter.unwrap_or(input_delimiter);
    let mut writer = io_utils::open_csv_writer(args.output.as_deref(), delimiter)?;
    let written = export::write_records(&mut writer, view.dataset.headers(), &view.rows)?;
    match &args.output {
        Some(path) if !io_utils::is_dash(path) => {
            info!("Exported {written} row(s) to {path:?}")
        }
        _ => info!("Exported {written} row(s) to stdout"),
    }
    Ok(())
}
