//! Configured entry point tying the aggregation passes together.

use crate::aggregator::AggregatedEntity;
use crate::dimension::Dimension;
use crate::heatmap::{bin_activity, Heatmap};
use crate::normalizer::RecordNormalizer;
use crate::period::{bucketize, Granularity, Measure, PeriodBucket};
use crate::range::{DateRange, RangeMapper};
use crate::ranking::rank_top;
use crate::record::ActivityRecord;
use crate::slider::RangeSlider;
use chronicle_common::{SourceDomain, TimeBracket};
use chronicle_config::Config;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Runs every aggregation with the limits and layouts from one [`Config`].
#[derive(Debug, Clone)]
pub struct ActivityEngine {
    normalizers: HashMap<SourceDomain, RecordNormalizer>,
    brackets: Vec<TimeBracket>,
    default_top_n: usize,
    podcast_top_n: usize,
}

impl ActivityEngine {
    /// Builds an engine from validated configuration.
    pub fn new(config: &Config) -> Self {
        let normalizers = SourceDomain::ALL
            .into_iter()
            .map(|domain| (domain, RecordNormalizer::for_domain(config, domain)))
            .collect();

        info!(
            timezone = ?config.engine.timezone,
            brackets = config.heatmap.brackets.len(),
            "Activity engine ready"
        );

        Self {
            normalizers,
            brackets: config.heatmap.brackets.clone(),
            default_top_n: config.engine.default_top_n,
            podcast_top_n: config.engine.podcast_top_n,
        }
    }

    /// Normalizer for `domain`.
    pub fn normalizer(&self, domain: SourceDomain) -> Option<&RecordNormalizer> {
        self.normalizers.get(&domain)
    }

    /// Normalizes a raw export of `domain`.
    pub fn load(&self, domain: SourceDomain, raw: &Value) -> Vec<ActivityRecord> {
        self.normalizer(domain)
            .map(|normalizer| normalizer.normalize_batch(raw))
            .unwrap_or_default()
    }

    /// Configured ranking size for `dimension`.
    pub const fn limit_for(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Podcast => self.podcast_top_n,
            _ => self.default_top_n,
        }
    }

    /// Top entities of `dimension` at the configured size.
    pub fn top(&self, records: &[ActivityRecord], dimension: Dimension) -> Vec<AggregatedEntity> {
        rank_top(records, dimension, self.limit_for(dimension))
    }

    /// Dense series over `range`.
    pub fn timeline(
        &self,
        records: &[ActivityRecord],
        range: DateRange,
        granularity: Granularity,
        measure: &Measure,
    ) -> Vec<PeriodBucket> {
        bucketize(records, range.start, range.end, granularity, measure)
    }

    /// Heatmap over the configured brackets.
    pub fn heatmap(&self, records: &[ActivityRecord], filter_key: Option<&str>) -> Heatmap {
        bin_activity(records, &self.brackets, filter_key)
    }

    /// Slider spanning the records' dates, `None` when nothing is dated.
    pub fn slider(&self, records: &[ActivityRecord]) -> Option<RangeSlider> {
        RangeMapper::from_records(records).map(RangeSlider::new)
    }
}
