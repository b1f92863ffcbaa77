//! greenbench CLI - Energy benchmarks for submitted code

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use greenbench_core::svg::to_svg;
use greenbench_core::validation::validate_chart_size;
use greenbench_core::views::{tab_summary, HistoryRow, OverviewView};
use greenbench_core::{
    find_region, normalize, ChartSurface, Dashboard, FormData, HistoryStore, Notifier,
    SubmissionContext, SubmissionRequest, Tab,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

mod client;
mod error;
mod report;
mod store;

use client::{BenchmarkClient, DEFAULT_ENDPOINT};
use report::{generate_report, ReportConfig};
use store::FileStore;

const EMPTY_STATE: &str =
    "No Results Yet\nSubmit your code to see benchmark results here.";

/// greenbench: measure the energy and carbon cost of running your code
#[derive(Parser, Debug)]
#[command(name = "greenbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the current result and the history
    #[arg(long, global = true, env = "GREENBENCH_STATE_DIR", default_value = ".greenbench")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit code to the benchmark service and record the result
    Submit(SubmitArgs),
    /// Record a saved benchmark service response
    Ingest(IngestArgs),
    /// List recorded results, newest first
    History(HistoryArgs),
    /// Print one tab of a recorded result
    Show(ShowArgs),
    /// Write the CPU/memory chart of a result as SVG
    Chart(ChartArgs),
    /// Write a standalone HTML report of a result
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct FormArgs {
    #[arg(long)]
    repo_url: String,

    #[arg(long)]
    entrypoint: String,

    /// Watts per CPU core [default: the CPU model preset, else 2.5]
    #[arg(long)]
    cpu_watt: Option<f64>,

    /// Watts per GB of RAM
    #[arg(long, default_value = "0.15")]
    ram_watt: f64,

    /// Baseline container draw in watts
    #[arg(long, default_value = "0.3")]
    baseline_watt: f64,

    /// Seconds the service waits on the container
    #[arg(long, default_value = "60")]
    timeout: u64,

    #[arg(
        long,
        default_value = "Rough estimates for M1 MacBook Air - ADJUST FOR YOUR HARDWARE"
    )]
    notes: String,

    /// eGRID subregion code, e.g. CAMX or RFCW
    #[arg(long, default_value = "CAMX")]
    region: String,

    /// Display name of the grid region [default: looked up from --region]
    #[arg(long)]
    region_name: Option<String>,

    /// Carbon intensity in kg CO2 per kWh [default: the region's rate]
    #[arg(long)]
    co2_rate: Option<f64>,

    /// CPU preset such as "Apple M2"; sets the per-core wattage
    #[arg(long, default_value = "Custom")]
    cpu_model: String,
}

impl FormArgs {
    /// Resolve presets, then apply explicit overrides on top.
    ///
    /// An unknown region is only accepted together with `--co2-rate`.
    fn to_form_data(&self) -> error::Result<FormData> {
        let mut form = FormData {
            repo_url: self.repo_url.trim().to_string(),
            entrypoint: self.entrypoint.trim().to_string(),
            ram_watt: self.ram_watt,
            baseline_watt: self.baseline_watt,
            timeout: self.timeout,
            notes: self.notes.clone(),
            egrid_region: self.region.trim().to_string(),
            ..FormData::default()
        };

        match find_region(&self.region) {
            Some(region) => form.apply_region(region),
            None if self.co2_rate.is_none() => {
                return Err(error::Error::Validation(format!(
                    "Unknown eGRID region '{}'; pass --co2-rate to use it anyway",
                    self.region
                )));
            }
            None => debug!("Region {} is not in the eGRID table", self.region),
        }
        if let Some(rate) = self.co2_rate {
            form.co2_rate = rate;
        }

        if form.select_cpu_model(&self.cpu_model) {
            debug!("Using CPU preset {} ({} W/core)", self.cpu_model, form.cpu_watt);
        }
        if let Some(watts) = self.cpu_watt {
            form.cpu_watt = watts;
        }

        form.validate()?;
        Ok(form)
    }
}

#[derive(Parser, Debug)]
struct SubmitArgs {
    #[command(flatten)]
    form: FormArgs,

    #[arg(long, env = "GREENBENCH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[derive(Parser, Debug)]
struct IngestArgs {
    /// Saved JSON response of the benchmark service
    #[arg(short, long, value_name = "FILE")]
    response: PathBuf,

    #[command(flatten)]
    form: FormArgs,
}

#[derive(Parser, Debug)]
struct HistoryArgs {
    #[arg(short, long, default_value = "10")]
    limit: usize,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// History entry to promote to the current result
    #[arg(long)]
    id: Option<String>,

    #[arg(short, long, default_value = "overview")]
    tab: Tab,
}

#[derive(Parser, Debug)]
struct ChartArgs {
    #[arg(long)]
    id: Option<String>,

    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    #[arg(long, default_value = "800")]
    width: f64,

    #[arg(long, default_value = "300")]
    height: f64,

    /// Pointer position in chart pixels; draws the hover marker
    #[arg(long)]
    hover_x: Option<f64>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[arg(long)]
    id: Option<String>,

    #[arg(short, long, value_name = "FILE", default_value = "greenbench-report.html")]
    output: PathBuf,

    #[arg(long, default_value = "Benchmark Results")]
    title: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    debug!("Using state directory {:?}", cli.state_dir);

    match cli.command {
        Commands::Submit(args) => submit_command(&cli.state_dir, args),
        Commands::Ingest(args) => ingest_command(&cli.state_dir, args),
        Commands::History(args) => history_command(&cli.state_dir, args),
        Commands::Show(args) => show_command(&cli.state_dir, args),
        Commands::Chart(args) => chart_command(&cli.state_dir, args),
        Commands::Export(args) => export_command(&cli.state_dir, args),
    }
}

fn submit_command(state_dir: &Path, args: SubmitArgs) -> Result<()> {
    let form = args.form.to_form_data()?;
    let client = BenchmarkClient::new(&args.endpoint)
        .with_context(|| format!("Invalid benchmark endpoint: {}", args.endpoint))?;

    let context = SubmissionContext::new(form, args.form.region_name.clone(), Utc::now());
    let request = SubmissionRequest::from_form(&context.form_data);

    info!(
        "Running {} from {} on {} (timeout {}s)",
        request.data.code_entrypoint,
        request.data.repo_url,
        client.endpoint(),
        request.data.container_wait_timeout
    );

    record_response(state_dir, &context, || {
        client.submit(&request).map_err(anyhow::Error::from)
    })
}

fn ingest_command(state_dir: &Path, args: IngestArgs) -> Result<()> {
    let form = args.form.to_form_data()?;
    let context = SubmissionContext::new(form, args.form.region_name.clone(), Utc::now());

    record_response(state_dir, &context, || {
        let content = std::fs::read_to_string(&args.response)
            .with_context(|| format!("Failed to read response file: {:?}", args.response))?;
        serde_json::from_str::<Value>(&content)
            .with_context(|| format!("Response file is not JSON: {:?}", args.response))
    })
}

/// Fetch a response, normalize and record it, then show the refreshed dashboard.
///
/// The dashboard only learns about the new result through the notification,
/// exactly as any other observer of the state directory would.
fn record_response<F>(state_dir: &Path, context: &SubmissionContext, fetch: F) -> Result<()>
where
    F: FnOnce() -> Result<Value>,
{
    let mut notifier = Notifier::new();
    let mut dashboard =
        Dashboard::new(HistoryStore::new(FileStore::new(state_dir))).with_events(notifier.subscribe());
    dashboard.mount();
    dashboard.begin_submission();

    let result = match fetch().and_then(|response| {
        normalize(&response, context).context("Benchmark service returned an unusable response")
    }) {
        Ok(result) => result,
        Err(e) => {
            dashboard.submission_failed(format!("{:#}", e));
            return Err(e.context(format!("Benchmark {} failed", context.benchmark_id)));
        }
    };

    let mut history = HistoryStore::new(FileStore::new(state_dir));
    let evicted = history
        .record(&result)
        .with_context(|| format!("Failed to record result in {:?}", history.store().dir()))?;
    for entry in &evicted {
        info!("History full, dropped {}", entry.id);
    }
    info!("Recorded {} ({})", result.benchmark_id, result.status);

    notifier.notify();
    if !dashboard.poll_events() {
        warn!("Dashboard missed the update notification");
    }

    match dashboard.active() {
        Some(active) => print!("{}", OverviewView::new(active, dashboard.log_content()).summary()),
        None => println!("{}", EMPTY_STATE),
    }

    Ok(())
}

fn history_command(state_dir: &Path, args: HistoryArgs) -> Result<()> {
    let history = HistoryStore::new(FileStore::new(state_dir));
    let entries = history.load();

    if entries.is_empty() {
        println!("{}", EMPTY_STATE);
        return Ok(());
    }

    let current_id = history.current().map(|r| r.benchmark_id);

    println!("## Recent Benchmarks\n");
    for entry in entries.iter().rev().take(args.limit) {
        let row = HistoryRow::new(entry, current_id.as_deref());
        let marker = if row.selected { "*" } else { " " };
        println!("{} {}  {}", marker, row.id, row.label);
        println!("    {}", row.detail);
    }

    Ok(())
}

/// Mount the dashboard and optionally promote `id` to the current result
fn open_dashboard(state_dir: &Path, id: Option<&str>) -> Result<Dashboard<FileStore>> {
    let mut dashboard = Dashboard::new(HistoryStore::new(FileStore::new(state_dir)));
    dashboard.mount();

    if let Some(id) = id {
        if !dashboard.select(id) {
            anyhow::bail!("History entry '{}' not found", id);
        }
    }

    Ok(dashboard)
}

fn show_command(state_dir: &Path, args: ShowArgs) -> Result<()> {
    let mut dashboard = open_dashboard(state_dir, args.id.as_deref())?;
    dashboard.set_tab(args.tab);

    match dashboard.active() {
        Some(result) => print!(
            "{}",
            tab_summary(dashboard.tab(), result, dashboard.log_content())
        ),
        None => println!("{}", EMPTY_STATE),
    }

    Ok(())
}

fn chart_command(state_dir: &Path, args: ChartArgs) -> Result<()> {
    validate_chart_size(args.width, args.height)?;

    let mut dashboard = open_dashboard(state_dir, args.id.as_deref())?
        .with_surface(ChartSurface::new(args.width, args.height));

    if dashboard.active().is_none() {
        anyhow::bail!("No result to chart");
    }

    if let Some(x) = args.hover_x {
        match dashboard.pointer_move(x) {
            Some(hover) => {
                println!("Time: {:.1}s", hover.elapsed);
                println!("CPU: {:.2}%", hover.cpu);
                println!("Memory: {:.2} MiB", hover.mem);
            }
            None => info!("No sample within reach of x={}", x),
        }
    }

    let svg = to_svg(dashboard.surface(), &dashboard.chart());
    std::fs::write(&args.output, svg)
        .map_err(|e| error::Error::FileWrite {
            path: args.output.display().to_string(),
            source: e,
        })
        .with_context(|| "Failed to write chart")?;

    info!("Wrote chart to {:?}", args.output);
    Ok(())
}

fn export_command(state_dir: &Path, args: ExportArgs) -> Result<()> {
    let dashboard = open_dashboard(state_dir, args.id.as_deref())?;

    let Some(result) = dashboard.active() else {
        anyhow::bail!("No result to export");
    };

    let config = ReportConfig {
        title: args.title,
        ..Default::default()
    };
    let html = generate_report(result, dashboard.entries(), &config)
        .with_context(|| "Failed to render report")?;

    std::fs::write(&args.output, html)
        .map_err(|e| error::Error::FileWrite {
            path: args.output.display().to_string(),
            source: e,
        })
        .with_context(|| "Failed to write report")?;

    info!("Wrote report to {:?}", args.output);
    Ok(())
}
