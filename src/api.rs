use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::store::write_json;
use crate::tools::analyze::{AnalysisConfig, AnalysisReport, Analyzer, TimeWindow};
use crate::tools::browse::BrowserLauncher;
use crate::tools::scrape::{scrape_keyword, ScrapeConfig, ScrapeReport, ScrapeRequest};

// Helper function for logging - ignores errors to not break main operations
fn log_info(keyword: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = crate::log::ActivityLogger::new() {
        let _ = logger.info(keyword, event, details);
    }
}

fn log_error(keyword: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = crate::log::ActivityLogger::new() {
        let _ = logger.error(keyword, event, details);
    }
}

fn log_outcome<T>(keyword: Option<&str>, event: &str, started: Instant, result: &Result<T>) {
    let elapsed = started.elapsed().as_millis();
    match result {
        Ok(_) => log_info(keyword, event, Some(&format!("succeeded in {elapsed}ms"))),
        Err(e) => log_error(keyword, event, Some(&format!("failed in {elapsed}ms: {e}"))),
    }
}

/// Scrape a keyword and write the raw batch to `out`.
///
/// The artifact is complete once this returns; an empty batch is still written.
pub async fn scrape_to_file(
    launcher: &dyn BrowserLauncher,
    req: &ScrapeRequest,
    cfg: &ScrapeConfig,
    out: &Path,
) -> Result<ScrapeReport> {
    let started = Instant::now();
    let result = scrape_and_write(launcher, req, cfg, out).await;
    log_outcome(Some(&req.keyword), "scrape", started, &result);
    result
}

async fn scrape_and_write(
    launcher: &dyn BrowserLauncher,
    req: &ScrapeRequest,
    cfg: &ScrapeConfig,
    out: &Path,
) -> Result<ScrapeReport> {
    let records = scrape_keyword(launcher, req, cfg).await?;
    write_json(out, &records)?;
    Ok(ScrapeReport {
        keyword: req.keyword.clone(),
        output: out.display().to_string(),
        records: records.len(),
    })
}

/// Analyze a raw artifact into a ranked one.
pub fn analyze_file(input: &Path, output: &Path, cfg: &AnalysisConfig) -> Result<AnalysisReport> {
    let started = Instant::now();
    let result = Analyzer::new(cfg.clone()).analyze_file(input, output);
    log_outcome(None, "analyze", started, &result);
    result
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub scrape: ScrapeReport,
    pub analysis: AnalysisReport,
}

/// Scrape, persist the raw batch, then analyze it.
///
/// With `strict_dates` the analysis keeps only records inside the request's
/// literal start/end dates instead of the configured window.
pub async fn run_pipeline(
    launcher: &dyn BrowserLauncher,
    req: &ScrapeRequest,
    cfg: &PipelineConfig,
    raw_out: &Path,
    analysis_out: &Path,
    strict_dates: bool,
) -> Result<PipelineReport> {
    let started = Instant::now();
    let result = pipeline(launcher, req, cfg, raw_out, analysis_out, strict_dates).await;
    log_outcome(Some(&req.keyword), "run", started, &result);
    result
}

async fn pipeline(
    launcher: &dyn BrowserLauncher,
    req: &ScrapeRequest,
    cfg: &PipelineConfig,
    raw_out: &Path,
    analysis_out: &Path,
    strict_dates: bool,
) -> Result<PipelineReport> {
    let mut analysis_cfg = cfg.analysis.clone();
    if strict_dates {
        analysis_cfg.window = TimeWindow::Range(req.validate()?);
    }
    let scrape = scrape_to_file(launcher, req, &cfg.scrape, raw_out).await?;
    let analysis = analyze_file(raw_out, analysis_out, &analysis_cfg)?;
    Ok(PipelineReport { scrape, analysis })
}
