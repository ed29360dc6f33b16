//! Top-N rankings over a dimension.

use crate::aggregator::{aggregate_group, group_by, AggregatedEntity};
use crate::dimension::{Dimension, RankMetric};
use crate::record::ActivityRecord;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Ranks the `n` largest groups of `dimension`.
///
/// Records failing the dimension's filter are dropped before grouping. The
/// sort is stable, so groups with equal metrics keep the order in which
/// their first record appeared.
#[instrument(skip(records), fields(records = records.len()))]
pub fn rank_top(records: &[ActivityRecord], dimension: Dimension, n: usize) -> Vec<AggregatedEntity> {
    let strategy = dimension.strategy();

    let kept = records.iter().filter(|record| (strategy.keep)(record));
    let groups = group_by(kept, strategy.group_key);

    let mut entities: Vec<AggregatedEntity> = groups
        .iter()
        .map(|group| aggregate_group(group, strategy))
        .collect();

    entities.sort_by(|a, b| compare(strategy.rank_by, a, b));
    entities.truncate(n);

    debug!("Ranked {} {} entities", entities.len(), dimension);
    entities
}

/// [`rank_top`] with the dimension's own default size.
pub fn rank_top_default(records: &[ActivityRecord], dimension: Dimension) -> Vec<AggregatedEntity> {
    rank_top(records, dimension, dimension.strategy().default_limit)
}

/// [`rank_top`] keyed by a dimension name; unknown names rank nothing.
pub fn rank_top_named(records: &[ActivityRecord], dimension: &str, n: usize) -> Vec<AggregatedEntity> {
    match dimension.parse::<Dimension>() {
        Ok(dimension) => rank_top(records, dimension, n),
        Err(e) => {
            debug!(error = %e, "Ignoring ranking request");
            Vec::new()
        }
    }
}

/// Descending by metric, equal values compare equal so the stable sort keeps input order.
fn compare(metric: RankMetric, a: &AggregatedEntity, b: &AggregatedEntity) -> Ordering {
    match metric {
        RankMetric::PlayCount => b.play_count.cmp(&a.play_count),
        RankMetric::TotalMinutes => b.total_minutes.total_cmp(&a.total_minutes),
    }
}
