//! Scrape Orchestrator
//!
//! Drives one browser session through search, harvest and a sequential
//! detail fetch per candidate. Failures of individual candidates are logged
//! and skipped; the session is always closed before returning.

pub mod types;

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

pub use types::*;

use crate::error::Result;
use crate::tools::browse::{load_cookies, BrowserLauncher, BrowserSession, PageSnapshot};
use crate::tools::clean::truncate_chars;
use crate::tools::extract::extract;
use crate::tools::harvest::harvest_page;
use crate::types::RawItemRecord;

/// Scrape one keyword into raw records, in candidate order.
///
/// Only invalid parameters and a browser that cannot be launched are errors.
/// An unreachable search page yields an empty batch.
pub async fn scrape_keyword(
    launcher: &dyn BrowserLauncher,
    req: &ScrapeRequest,
    cfg: &ScrapeConfig,
) -> Result<Vec<RawItemRecord>> {
    enter(ScrapeStage::Init);
    req.validate()?;
    let search_url = cfg.search_url_for(&req.keyword)?;
    let max_candidates = req.max_candidates(cfg);

    enter(ScrapeStage::SessionOpen);
    let mut session = launcher.launch(&cfg.session_options(req)).await?;
    attach_cookies(session.as_mut(), req, cfg).await;

    let records = crawl(session.as_mut(), &search_url, max_candidates, cfg).await;

    enter(ScrapeStage::Closed);
    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close browser session");
    }
    info!(keyword = %req.keyword, records = records.len(), "scrape finished");
    Ok(records)
}

fn enter(stage: ScrapeStage) {
    debug!(%stage, "scrape stage");
}

async fn attach_cookies(session: &mut dyn BrowserSession, req: &ScrapeRequest, cfg: &ScrapeConfig) {
    let Some(path) = req.cookies.as_deref() else {
        return;
    };
    if !path.exists() {
        warn!(path = %path.display(), "cookie file not found; continuing without cookies");
        return;
    }
    let cookies = match load_cookies(path, &cfg.cookie_fallback_url) {
        Ok(cookies) => cookies,
        Err(e) => {
            warn!(error = %e, "failed to load cookies; continuing without cookies");
            return;
        }
    };
    match session.set_cookies(&cookies).await {
        Ok(()) => info!(count = cookies.len(), "cookies attached"),
        Err(e) => warn!(error = %e, "failed to attach cookies; continuing without cookies"),
    }
}

async fn crawl(
    session: &mut dyn BrowserSession,
    search_url: &str,
    max_candidates: usize,
    cfg: &ScrapeConfig,
) -> Vec<RawItemRecord> {
    enter(ScrapeStage::Searching);
    let search = match open_page(session, search_url, cfg.nav_timeout_ms, cfg.search_settle_ms).await {
        Ok(page) => page,
        Err(e) => {
            warn!(url = search_url, error = %e, "search page unavailable; returning no results");
            return Vec::new();
        }
    };

    enter(ScrapeStage::Harvesting);
    let base = if search.url.is_empty() { search_url } else { search.url.as_str() };
    let candidates = harvest_page(&search.html, base, max_candidates, &cfg.candidate_patterns);
    info!(count = candidates.len(), "candidates harvested");

    let total = candidates.len();
    let detail_timeout = Duration::from_millis(cfg.detail_timeout_ms);
    let mut records = Vec::with_capacity(total);
    for (index, url) in candidates.iter().enumerate() {
        enter(ScrapeStage::FetchingDetail { index, total });
        match tokio::time::timeout(detail_timeout, fetch_detail(session, url, cfg)).await {
            Ok(Ok(record)) => records.push(record),
            Ok(Err(e)) => warn!(url = %url, error = %e, "skipping candidate"),
            Err(_) => warn!(url = %url, timeout_ms = cfg.detail_timeout_ms, "candidate timed out; skipping"),
        }
        if index + 1 < total {
            pause(cfg.request_gap_ms).await;
        }
    }
    records
}

async fn open_page(
    session: &mut dyn BrowserSession,
    url: &str,
    timeout_ms: u64,
    settle_ms: u64,
) -> Result<PageSnapshot> {
    session.navigate(url, Duration::from_millis(timeout_ms)).await?;
    pause(settle_ms).await;
    session.snapshot().await
}

async fn fetch_detail(
    session: &mut dyn BrowserSession,
    url: &str,
    cfg: &ScrapeConfig,
) -> Result<RawItemRecord> {
    let page = open_page(session, url, cfg.nav_timeout_ms, cfg.detail_settle_ms).await?;
    let fields = extract(&page.html, &page.body_text, &cfg.extract);
    Ok(RawItemRecord {
        url: url.to_string(),
        title: fields.title.unwrap_or_default(),
        price: fields.price,
        origin: fields.origin.unwrap_or_default(),
        shop_name: fields.shop_name.unwrap_or_default(),
        description: fields.description,
        scrape_time: Utc::now(),
        raw_text_snippet: truncate_chars(&page.body_text, cfg.snippet_chars),
    })
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
