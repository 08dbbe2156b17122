//! Pipeline tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::api::run_pipeline;
    use crate::config::PipelineConfig;
    use crate::error::{ProwlError, Result};
    use crate::tools::analyze::TimeWindow;
    use crate::tools::browse::{BrowserLauncher, BrowserSession, CookieEntry, PageSnapshot, SessionOptions};
    use crate::tools::scrape::{ScrapeConfig, ScrapeRequest};

    /// Serves fixed pages keyed by URL.
    struct StaticSite(HashMap<String, PageSnapshot>);

    struct StaticSession {
        pages: HashMap<String, PageSnapshot>,
        current: PageSnapshot,
    }

    #[async_trait]
    impl BrowserLauncher for StaticSite {
        async fn launch(&self, _options: &SessionOptions) -> Result<Box<dyn BrowserSession>> {
            Ok(Box::new(StaticSession {
                pages: self.0.clone(),
                current: PageSnapshot::default(),
            }))
        }
    }

    #[async_trait]
    impl BrowserSession for StaticSession {
        async fn set_cookies(&mut self, _cookies: &[CookieEntry]) -> Result<()> {
            Ok(())
        }

        async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<()> {
            self.current = self
                .pages
                .get(url)
                .cloned()
                .ok_or_else(|| ProwlError::navigation(url, "not found"))?;
            Ok(())
        }

        async fn snapshot(&self) -> Result<PageSnapshot> {
            Ok(self.current.clone())
        }

        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    fn page(html: &str, body: &str) -> PageSnapshot {
        PageSnapshot {
            url: String::new(),
            title: String::new(),
            body_text: body.to_string(),
            html: html.to_string(),
        }
    }

    fn site() -> StaticSite {
        let mut pages = HashMap::new();
        pages.insert(
            "https://mall.test/search/%E6%A0%B8%E6%A1%83".to_string(),
            page(
                r#"<html><body>
                    <a href="/goods/1">a</a>
                    <a href="/goods/2">b</a>
                    <a href="/goods/3">c</a>
                </body></html>"#,
                "",
            ),
        );
        pages.insert(
            "https://mall.test/goods/1".to_string(),
            page(
                r#"<html><body><h1>新疆特级核桃500g</h1><div class="goods-desc">新疆核桃 手剥</div></body></html>"#,
                "¥39.9\n产地：新疆",
            ),
        );
        pages.insert(
            "https://mall.test/goods/2".to_string(),
            page(
                r#"<html><body><h1>新疆特级核桃 500G</h1><div class="goods-desc">新疆产地核桃手剥</div></body></html>"#,
                "¥35\n产地：新疆",
            ),
        );
        pages.insert(
            "https://mall.test/goods/3".to_string(),
            page(r#"<html><body><h1>云南纸皮核桃1kg</h1></body></html>"#, "29元"),
        );
        StaticSite(pages)
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            scrape: ScrapeConfig {
                search_url: "https://mall.test/search".into(),
                search_settle_ms: 0,
                detail_settle_ms: 0,
                request_gap_ms: 0,
                ..ScrapeConfig::default()
            },
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_pipeline_scrapes_then_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.json");
        let ranked = dir.path().join("ranked.json");
        let req = ScrapeRequest::new("核桃", "2025-08-06", "2025-09-05");

        let report = run_pipeline(&site(), &req, &config(), &raw, &ranked, false)
            .await
            .unwrap();
        assert_eq!(report.scrape.records, 3);
        assert_eq!(report.analysis.kept, 3);
        assert_eq!(report.analysis.groups, 2);

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&raw).unwrap()).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 3);
        assert_eq!(raw[0]["url"], "https://mall.test/goods/1");

        let ranked: Value = serde_json::from_str(&std::fs::read_to_string(&ranked).unwrap()).unwrap();
        let urls: Vec<&str> = ranked
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["url"].as_str().unwrap())
            .collect();
        assert_eq!(
            urls,
            ["https://mall.test/goods/2", "https://mall.test/goods/1", "https://mall.test/goods/3"]
        );
        assert_eq!(ranked[0]["score"], 8 + 200 + 200);
        assert_eq!(ranked[1]["score"], 7 + 150 + 200);
        // no description on the page
        assert_eq!(ranked[2]["desc_len"], 0);
        assert_eq!(ranked[2]["score"], 0);
        assert_eq!(ranked[0]["comp_group"], ranked[1]["comp_group"]);
        assert_ne!(ranked[0]["comp_group"], ranked[2]["comp_group"]);
    }

    #[tokio::test]
    async fn test_strict_dates_filter_by_literal_window() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.json");
        let ranked = dir.path().join("ranked.json");
        // A window far in the past: every fresh record falls outside it.
        let req = ScrapeRequest::new("核桃", "2001-01-01", "2001-01-31");

        let report = run_pipeline(&site(), &req, &config(), &raw, &ranked, true)
            .await
            .unwrap();
        assert_eq!(report.scrape.records, 3);
        assert_eq!(report.analysis.kept, 0);

        let ranked: Value = serde_json::from_str(&std::fs::read_to_string(&ranked).unwrap()).unwrap();
        assert_eq!(ranked, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unreachable_search_still_writes_empty_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.json");
        let ranked = dir.path().join("ranked.json");
        let req = ScrapeRequest::new("红枣", "2025-08-06", "2025-09-05");

        let report = run_pipeline(&site(), &req, &config(), &raw, &ranked, false)
            .await
            .unwrap();
        assert_eq!(report.scrape.records, 0);
        assert_eq!(report.analysis.loaded, 0);
        assert!(raw.exists());
        assert!(ranked.exists());
    }

    #[test]
    fn test_default_window_is_thirty_days() {
        assert_eq!(
            PipelineConfig::default().analysis.window,
            TimeWindow::Rolling { days: 30 }
        );
    }
}
