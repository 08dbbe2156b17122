//! Browser Sessions
//!
//! The seam between the scrape orchestrator and a real browser. The
//! orchestrator only talks to [`BrowserLauncher`] and [`BrowserSession`];
//! [`chromium::ChromiumLauncher`] is the production implementation.

pub mod chromium;
mod cookies;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use cookies::{load_cookies, parse_cookies, CookieEntry};

/// Desktop Chrome user agent sent by default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// How a session is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub headless: bool,
    /// Opaque proxy address, e.g. `http://127.0.0.1:8080`.
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: true,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// What the extractor and harvester need from a rendered page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSnapshot {
    /// Final URL after redirects.
    pub url: String,
    pub title: String,
    /// Rendered (visible) text of the body.
    pub body_text: String,
    pub html: String,
}

/// Opens browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: &SessionOptions) -> Result<Box<dyn BrowserSession>>;
}

/// One browser with a single page, driven sequentially.
#[async_trait]
pub trait BrowserSession: Send {
    /// Attach cookies to the session before any navigation.
    async fn set_cookies(&mut self, cookies: &[CookieEntry]) -> Result<()>;

    /// Navigate the page, bounded by `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Capture the currently rendered page.
    async fn snapshot(&self) -> Result<PageSnapshot>;

    /// Release the page and the browser.
    async fn close(self: Box<Self>) -> Result<()>;
}
