use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProwlError, Result};

/// One cookie as exported by common browser tooling.
///
/// Either `url` or `domain` locates the cookie; [`parse_cookies`] fills in
/// whichever is needed so every entry is usable by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieEntry {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

impl CookieEntry {
    fn resolve(mut self, fallback_url: &str) -> Self {
        let has_domain = self.domain.as_deref().is_some_and(|d| !d.trim().is_empty());
        let has_url = self.url.as_deref().is_some_and(|u| !u.trim().is_empty());
        if !has_domain {
            self.domain = None;
        }
        if !has_url {
            self.url = None;
        }
        if !has_url && !has_domain {
            self.url = Some(fallback_url.to_string());
        }
        if has_domain && self.path.is_none() {
            self.path = Some("/".to_string());
        }
        self
    }
}

/// Parse a cookie file body.
///
/// Accepts a JSON array of cookie objects, or a storage-state object with a
/// `cookies` array. Entries without a name are skipped.
pub fn parse_cookies(raw: &str, fallback_url: &str) -> Result<Vec<CookieEntry>> {
    let value: Value = serde_json::from_str(raw)?;
    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("cookies") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ProwlError::InvalidParams(
                    "cookie object has no `cookies` array".into(),
                ))
            }
        },
        _ => {
            return Err(ProwlError::InvalidParams(
                "cookie file must be a JSON array".into(),
            ))
        }
    };

    let mut cookies = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<CookieEntry>(entry) {
            Ok(cookie) if !cookie.name.trim().is_empty() => {
                cookies.push(cookie.resolve(fallback_url))
            }
            Ok(_) => tracing::warn!(index, "skipping cookie without a name"),
            Err(e) => tracing::warn!(index, error = %e, "skipping malformed cookie"),
        }
    }
    Ok(cookies)
}

/// Read and parse a cookie file.
pub fn load_cookies(path: &Path, fallback_url: &str) -> Result<Vec<CookieEntry>> {
    let cookie_error = |reason: String| ProwlError::Cookies {
        path: path.display().to_string(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| cookie_error(e.to_string()))?;
    parse_cookies(&raw, fallback_url).map_err(|e| cookie_error(e.to_string()))
}
