//! Chromium-backed sessions via chromiumoxide.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use url::Url;

use super::{BrowserLauncher, BrowserSession, CookieEntry, PageSnapshot, SessionOptions};
use crate::error::{ProwlError, Result};

/// Environment variable pointing at a Chrome/Chromium executable.
pub const CHROME_PATH_ENV: &str = "PROWL_CHROME_PATH";

const SNAPSHOT_SCRIPT: &str = r#"JSON.stringify({
    url: window.location.href,
    title: document.title || "",
    bodyText: document.body ? document.body.innerText : "",
    html: document.documentElement ? document.documentElement.outerHTML : ""
})"#;

/// Launches a local Chromium per session.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    /// Use `PROWL_CHROME_PATH` when set, otherwise let chromiumoxide find a browser.
    pub fn new() -> Self {
        let executable = std::env::var_os(CHROME_PATH_ENV)
            .map(PathBuf::from)
            .filter(|p| p.exists());
        Self { executable }
    }

    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            executable: Some(path.into()),
        }
    }

    fn config(&self, options: &SessionOptions) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", options.user_agent));
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(proxy) = options.proxy.as_deref().and_then(proxy_server_arg) {
            builder = builder.arg(format!("--proxy-server={proxy}"));
        }
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(ProwlError::Browser)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, options: &SessionOptions) -> Result<Box<dyn BrowserSession>> {
        let config = self.config(options)?;
        let (mut browser, mut handler) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = match open_page(&browser, &options.user_agent).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(e);
            }
        };

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler,
        }))
    }
}

async fn open_page(browser: &Browser, user_agent: &str) -> Result<Page> {
    let page = browser.new_page("about:blank").await?;
    page.set_user_agent(user_agent).await?;
    Ok(page)
}

/// A running Chromium with one page.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn set_cookies(&mut self, cookies: &[CookieEntry]) -> Result<()> {
        let params: Vec<CookieParam> = cookies.iter().map(cookie_param).collect();
        if params.is_empty() {
            return Ok(());
        }
        self.page.set_cookies(params).await?;
        Ok(())
    }

    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ProwlError::navigation(url, e)),
            Err(_) => Err(ProwlError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        let raw: String = self
            .page
            .evaluate(SNAPSHOT_SCRIPT)
            .await?
            .into_value()
            .map_err(|e| ProwlError::Browser(format!("unexpected snapshot result: {e}")))?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumSession {
            mut browser,
            page,
            handler,
        } = *self;
        let _ = page.close().await;
        let closed = browser.close().await;
        handler.abort();
        closed?;
        Ok(())
    }
}

fn cookie_param(cookie: &CookieEntry) -> CookieParam {
    let mut param = CookieParam::new(cookie.name.clone(), cookie.value.clone());
    param.url = cookie.url.clone();
    param.domain = cookie.domain.clone();
    param.path = cookie.path.clone();
    param.secure = Some(cookie.secure);
    param.http_only = Some(cookie.http_only);
    param
}

/// Proxy address in the form Chromium accepts on its command line.
///
/// Credentials cannot be passed this way, so they are dropped with a warning.
/// Unparseable addresses are passed through untouched.
pub fn proxy_server_arg(proxy: &str) -> Option<String> {
    let proxy = proxy.trim();
    if proxy.is_empty() {
        return None;
    }
    let Ok(url) = Url::parse(proxy) else {
        return Some(proxy.to_string());
    };
    if url.host_str().is_none() {
        return Some(proxy.to_string());
    }
    if !url.username().is_empty() || url.password().is_some() {
        tracing::warn!("proxy credentials are not supported by the browser and were dropped");
    }
    let mut arg = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        arg.push_str(&format!(":{port}"));
    }
    Some(arg)
}
