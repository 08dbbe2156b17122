use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::api::{self, PipelineReport};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::log::ActivityLogger;
use crate::tools::analyze::{AnalysisReport, TimeWindow};
use crate::tools::browse::chromium::ChromiumLauncher;
use crate::tools::scrape::{ScrapeReport, ScrapeRequest};
use crate::types::{ApiResponse, DateWindow};

/// A century; anything longer is not a rolling window.
const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Parser)]
#[command(name = "prowl", version, about = "Discover and rank e-commerce listings (JSON only)")]
pub struct Cli {
    /// Debug-level diagnostics on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Config file (defaults to the user config, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape a keyword into a raw JSON artifact
    Scrape(ScrapeArgs),
    /// Filter, group and rank a raw artifact
    Analyze(AnalyzeArgs),
    /// Scrape then analyze
    Run(RunArgs),
    /// Show the activity log
    Logs(LogsArgs),
}

#[derive(Args)]
struct SearchArgs {
    keyword: String,
    /// YYYY-MM-DD
    start_date: String,
    /// YYYY-MM-DD
    end_date: String,
}

#[derive(Args)]
struct SessionArgs {
    /// Candidate budget in result pages
    #[arg(long, default_value_t = 1)]
    max_pages: usize,
    /// Proxy address, e.g. http://127.0.0.1:8080
    #[arg(long)]
    proxy: Option<String>,
    /// Cookie file (JSON array)
    #[arg(long)]
    cookies: Option<PathBuf>,
    /// Run the browser without a window
    #[arg(long)]
    headless: bool,
}

impl SessionArgs {
    fn request(&self, search: &SearchArgs) -> ScrapeRequest {
        ScrapeRequest {
            max_pages: self.max_pages,
            proxy: self.proxy.clone(),
            cookies: self.cookies.clone(),
            headless: self.headless,
            ..ScrapeRequest::new(&search.keyword, &search.start_date, &search.end_date)
        }
    }
}

#[derive(Args)]
struct ScrapeArgs {
    #[command(flatten)]
    search: SearchArgs,
    out: PathBuf,
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Args)]
struct AnalyzeArgs {
    input: PathBuf,
    out: PathBuf,
    /// Rolling window in days
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS), conflicts_with_all = ["from", "to"])]
    days: Option<i64>,
    /// Literal window start, YYYY-MM-DD (needs --to)
    #[arg(long, requires = "to")]
    from: Option<String>,
    /// Literal window end, YYYY-MM-DD (needs --from)
    #[arg(long, requires = "from")]
    to: Option<String>,
}

impl AnalyzeArgs {
    fn window(&self) -> Result<Option<TimeWindow>> {
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            return Ok(Some(TimeWindow::Range(DateWindow::parse(from, to)?)));
        }
        Ok(self.days.map(|days| TimeWindow::Rolling { days }))
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    search: SearchArgs,
    raw_out: PathBuf,
    analysis_out: PathBuf,
    #[command(flatten)]
    session: SessionArgs,
    /// Rolling window in days
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS))]
    days: Option<i64>,
    /// Filter by the literal start/end dates instead of a rolling window
    #[arg(long, conflicts_with = "days")]
    strict_dates: bool,
}

#[derive(Args)]
struct LogsArgs {
    #[arg(long)]
    keyword: Option<String>,
    /// Only failures
    #[arg(long)]
    errors: bool,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    crate::log::init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let ok = runtime.block_on(dispatch(cli))?;

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn dispatch(cli: Cli) -> anyhow::Result<bool> {
    let config = cli.config.as_deref();
    match cli.cmd {
        Command::Scrape(args) => finish(scrape_cmd(args, config).await),
        Command::Analyze(args) => finish(analyze_cmd(args, config)),
        Command::Run(args) => finish(run_cmd(args, config).await),
        Command::Logs(args) => finish(
            ActivityLogger::new().and_then(|logger| logger.read_logs(args.keyword.as_deref(), args.errors)),
        ),
    }
}

async fn scrape_cmd(args: ScrapeArgs, config: Option<&Path>) -> Result<ScrapeReport> {
    let cfg = PipelineConfig::resolve(config)?;
    let req = args.session.request(&args.search);
    api::scrape_to_file(&ChromiumLauncher::new(), &req, &cfg.scrape, &args.out).await
}

fn analyze_cmd(args: AnalyzeArgs, config: Option<&Path>) -> Result<AnalysisReport> {
    let mut cfg = PipelineConfig::resolve(config)?;
    if let Some(window) = args.window()? {
        cfg.analysis.window = window;
    }
    api::analyze_file(&args.input, &args.out, &cfg.analysis)
}

async fn run_cmd(args: RunArgs, config: Option<&Path>) -> Result<PipelineReport> {
    let mut cfg = PipelineConfig::resolve(config)?;
    if let Some(days) = args.days {
        cfg.analysis.window = TimeWindow::Rolling { days };
    }
    let req = args.session.request(&args.search);
    api::run_pipeline(
        &ChromiumLauncher::new(),
        &req,
        &cfg,
        &args.raw_out,
        &args.analysis_out,
        args.strict_dates,
    )
    .await
}

fn finish<T: serde::Serialize>(res: Result<T>) -> anyhow::Result<bool> {
    let ok = res.is_ok();
    match res {
        Ok(v) => print_json(&ApiResponse::ok(v))?,
        Err(e) => print_json(&ApiResponse::<()>::err(e.to_string()))?,
    }
    Ok(ok)
}

fn print_json<T: serde::Serialize>(val: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
