//! Analysis Engine
//!
//! One synchronous pass over a whole batch: load, time-window filter,
//! feature extraction, competitor grouping, scoring and a stable sort by
//! descending score.

mod features;
mod group;
mod load;
mod score;
mod tests;
pub mod types;

use std::path::Path;

use chrono::{DateTime, Utc};

pub use types::*;

use crate::error::{ProwlError, Result};
use crate::store::{read_json, write_json};

pub struct Analyzer {
    cfg: AnalysisConfig,
}

impl Analyzer {
    pub fn new(cfg: AnalysisConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    /// Analyze a batch against the current time.
    pub fn analyze(&self, batch: Vec<InputRecord>) -> Vec<AnalyzedItemRecord> {
        self.analyze_at(batch, Utc::now())
    }

    /// Analyze a batch with an explicit "now" for the rolling window.
    pub fn analyze_at(&self, batch: Vec<InputRecord>, now: DateTime<Utc>) -> Vec<AnalyzedItemRecord> {
        let loaded = batch.len();
        let kept: Vec<InputRecord> = batch
            .into_iter()
            .filter(|item| self.cfg.window.contains(item.record.scrape_time, now))
            .collect();
        tracing::debug!(loaded, kept = kept.len(), "time window applied");

        let titles: Vec<&str> = kept.iter().map(|item| item.record.title.as_str()).collect();
        let groups = group::assign_groups(&titles, self.cfg.similarity_threshold);

        let mut analyzed: Vec<AnalyzedItemRecord> = kept
            .into_iter()
            .zip(groups)
            .map(|(item, comp_group)| self.annotate(item, comp_group))
            .collect();
        analyzed.sort_by(|a, b| b.score.cmp(&a.score));
        analyzed
    }

    fn annotate(&self, item: InputRecord, comp_group: usize) -> AnalyzedItemRecord {
        let InputRecord { mut record, extra } = item;
        let feats = features::features(&record, &self.cfg);
        let hits = feats.keyword_flags.iter().filter(|(_, hit)| *hit).count();
        let score = score::score(feats.desc_len, hits, &feats.origin, &self.cfg);
        record.origin = feats.origin;
        AnalyzedItemRecord {
            record,
            extra,
            desc_len: feats.desc_len,
            keyword_flags: feats.keyword_flags,
            comp_group,
            score,
        }
    }

    /// Load `input`, analyze it and write the ranked batch to `output`.
    pub fn analyze_file(&self, input: &Path, output: &Path) -> Result<AnalysisReport> {
        let now = Utc::now();
        let batch = load_batch(input, now)?;
        let loaded = batch.len();
        let analyzed = self.analyze_at(batch, now);
        write_batch(output, &analyzed)?;

        Ok(AnalysisReport {
            input: input.display().to_string(),
            output: output.display().to_string(),
            loaded,
            kept: analyzed.len(),
            groups: group_count(&analyzed),
            top_score: analyzed.first().map(|r| r.score),
            origins: origin_stats(&analyzed),
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Parse an artifact body into input records.
pub fn parse_batch(raw: &str, now: DateTime<Utc>) -> Result<Vec<InputRecord>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    load::records_from_value(value, now)
}

/// Read an input artifact. Any failure here is fatal for the run.
pub fn load_batch(path: &Path, now: DateTime<Utc>) -> Result<Vec<InputRecord>> {
    let value = read_json(path)?;
    load::records_from_value(value, now).map_err(|e| ProwlError::input(path, e))
}

/// Write the full ranked batch.
pub fn write_batch(path: &Path, records: &[AnalyzedItemRecord]) -> Result<()> {
    write_json(path, records)
}

/// Record count per normalized origin, most common first, ties in first-seen order.
pub fn origin_stats(records: &[AnalyzedItemRecord]) -> Vec<OriginStat> {
    let mut stats: Vec<OriginStat> = Vec::new();
    for record in records {
        let origin = &record.record.origin;
        match stats.iter_mut().find(|s| &s.origin == origin) {
            Some(stat) => stat.count += 1,
            None => stats.push(OriginStat {
                origin: origin.clone(),
                count: 1,
            }),
        }
    }
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

fn group_count(records: &[AnalyzedItemRecord]) -> usize {
    crate::dedupe!(records.iter().map(|r| r.comp_group)).len()
}
