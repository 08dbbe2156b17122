use chrono::{DateTime, Duration, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::{format_timestamp, DateWindow, RawItemRecord};

/// Which records survive the time filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeWindow {
    /// `scrape_time >= now - days`, inclusive at the cutoff.
    Rolling { days: i64 },
    /// Inclusive calendar dates, UTC.
    Range(DateWindow),
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::Rolling { days: 30 }
    }
}

impl TimeWindow {
    pub fn contains(&self, ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            TimeWindow::Rolling { days } => match rolling_cutoff(*days, now) {
                Some(cutoff) => ts >= cutoff,
                // reaches past the representable range: no lower bound
                None => true,
            },
            TimeWindow::Range(window) => window.contains(ts),
        }
    }
}

fn rolling_cutoff(days: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|span| now.checked_sub_signed(span))
}

/// Infer `region` when the analysis text mentions `keyword`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRule {
    pub keyword: String,
    pub region: String,
}

/// Everything the analysis engine is parameterised by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub window: TimeWindow,
    /// Tracked keywords; each becomes a `kw_<keyword>` column, in this order.
    pub keywords: Vec<String>,
    pub keyword_weight: u64,
    pub preferred_region: String,
    pub region_bonus: u64,
    pub region_rules: Vec<RegionRule>,
    /// Titles at or above this similarity (0-100) join the seed's group.
    pub similarity_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: TimeWindow::default(),
            keywords: ["核桃", "产地", "新疆", "手剥"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            keyword_weight: 50,
            preferred_region: "新疆".to_string(),
            region_bonus: 200,
            region_rules: vec![RegionRule {
                keyword: "新疆".to_string(),
                region: "新疆".to_string(),
            }],
            similarity_threshold: 80.0,
        }
    }
}

/// A loaded input record plus any columns the engine does not own.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    pub record: RawItemRecord,
    pub extra: Map<String, Value>,
}

impl From<RawItemRecord> for InputRecord {
    fn from(record: RawItemRecord) -> Self {
        Self {
            record,
            extra: Map::new(),
        }
    }
}

/// A record after feature extraction, grouping and scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedItemRecord {
    /// Input record with `origin` normalized.
    pub record: RawItemRecord,
    pub extra: Map<String, Value>,
    pub desc_len: usize,
    /// `(keyword, present)` in configured keyword order.
    pub keyword_flags: Vec<(String, bool)>,
    pub comp_group: usize,
    pub score: u64,
}

impl Serialize for AnalyzedItemRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let r = &self.record;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("url", &r.url)?;
        map.serialize_entry("title", &r.title)?;
        map.serialize_entry("price", &r.price)?;
        map.serialize_entry("origin", &r.origin)?;
        map.serialize_entry("shop_name", &r.shop_name)?;
        if let Some(description) = &r.description {
            map.serialize_entry("description", description)?;
        }
        map.serialize_entry("scrape_time", &format_timestamp(&r.scrape_time))?;
        map.serialize_entry("raw_text_snippet", &r.raw_text_snippet)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("desc_len", &self.desc_len)?;
        for (keyword, hit) in &self.keyword_flags {
            map.serialize_entry(&format!("kw_{keyword}"), &u8::from(*hit))?;
        }
        map.serialize_entry("comp_group", &self.comp_group)?;
        map.serialize_entry("score", &self.score)?;
        map.end()
    }
}

/// How many analyzed records carry one normalized origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginStat {
    pub origin: String,
    pub count: usize,
}

/// Outcome of analysing one artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub input: String,
    pub output: String,
    pub loaded: usize,
    pub kept: usize,
    pub groups: usize,
    pub top_score: Option<u64>,
    pub origins: Vec<OriginStat>,
}
