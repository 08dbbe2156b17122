use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ProwlError, Result};
use crate::tools::browse::{SessionOptions, DEFAULT_USER_AGENT};
use crate::tools::extract::ExtractConfig;
use crate::tools::harvest::DEFAULT_CANDIDATE_PATTERNS;
use crate::types::DateWindow;

/// Tunables for a scrape run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeConfig {
    /// Search endpoint; the keyword is appended as a path segment.
    pub search_url: String,
    /// Where cookies without a domain or URL are attached.
    pub cookie_fallback_url: String,
    pub user_agent: String,
    pub candidate_patterns: Vec<String>,
    pub candidates_per_page: usize,
    pub nav_timeout_ms: u64,
    /// Upper bound on one candidate's navigate + settle + extract.
    pub detail_timeout_ms: u64,
    pub search_settle_ms: u64,
    pub detail_settle_ms: u64,
    pub request_gap_ms: u64,
    pub snippet_chars: usize,
    pub extract: ExtractConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.douyin.com/search".to_string(),
            cookie_fallback_url: "https://www.douyin.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            candidate_patterns: DEFAULT_CANDIDATE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            candidates_per_page: 10,
            nav_timeout_ms: 30_000,
            detail_timeout_ms: 45_000,
            search_settle_ms: 1_500,
            detail_settle_ms: 1_000,
            request_gap_ms: 300,
            snippet_chars: 1_000,
            extract: ExtractConfig::default(),
        }
    }
}

impl ScrapeConfig {
    /// Search page URL for a keyword.
    pub fn search_url_for(&self, keyword: &str) -> Result<String> {
        let mut url = Url::parse(&self.search_url)
            .map_err(|e| ProwlError::Config(format!("invalid searchUrl {:?}: {e}", self.search_url)))?;
        url.path_segments_mut()
            .map_err(|_| ProwlError::Config(format!("searchUrl {:?} cannot take a path", self.search_url)))?
            .pop_if_empty()
            .push(keyword.trim());
        Ok(url.to_string())
    }

    pub(crate) fn session_options(&self, req: &ScrapeRequest) -> SessionOptions {
        SessionOptions {
            headless: req.headless,
            proxy: req.proxy.clone().filter(|p| !p.trim().is_empty()),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Parameters of one scrape run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub keyword: String,
    /// `YYYY-MM-DD`; recorded with the run, used for filtering only on request.
    pub start_date: String,
    pub end_date: String,
    pub max_pages: usize,
    pub proxy: Option<String>,
    pub cookies: Option<PathBuf>,
    pub headless: bool,
}

impl ScrapeRequest {
    pub fn new(keyword: impl Into<String>, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            max_pages: 1,
            proxy: None,
            cookies: None,
            headless: false,
        }
    }

    /// Check the request and return its date window.
    pub fn validate(&self) -> Result<DateWindow> {
        if self.keyword.trim().is_empty() {
            return Err(ProwlError::InvalidParams("keyword must not be empty".into()));
        }
        if self.max_pages < 1 {
            return Err(ProwlError::InvalidParams("max_pages must be at least 1".into()));
        }
        DateWindow::parse(&self.start_date, &self.end_date)
    }

    /// Candidate cap for this run.
    pub fn max_candidates(&self, cfg: &ScrapeConfig) -> usize {
        self.max_pages.saturating_mul(cfg.candidates_per_page)
    }
}

/// Where a scrape run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStage {
    Init,
    SessionOpen,
    Searching,
    Harvesting,
    FetchingDetail { index: usize, total: usize },
    Closed,
}

impl fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeStage::Init => write!(f, "init"),
            ScrapeStage::SessionOpen => write!(f, "session-open"),
            ScrapeStage::Searching => write!(f, "searching"),
            ScrapeStage::Harvesting => write!(f, "harvesting"),
            ScrapeStage::FetchingDetail { index, total } => {
                write!(f, "fetching-detail {}/{}", index + 1, total)
            }
            ScrapeStage::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of a scrape written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    pub keyword: String,
    pub output: String,
    pub records: usize,
}
