//! Dimension grouping and per-group metric aggregation.

use crate::dimension::{DimensionStrategy, IndicatorType};
use crate::record::ActivityRecord;
use chronicle_common::finite_or_zero;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Records sharing one dimension key, in input order.
///
/// Only [`group_by`] builds groups, so every group holds at least one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    key: String,
    first: &'a ActivityRecord,
    records: Vec<&'a ActivityRecord>,
}

impl<'a> Group<'a> {
    fn new(key: String, first: &'a ActivityRecord) -> Self {
        Self {
            key,
            first,
            records: vec![first],
        }
    }

    /// Key produced by the grouping function.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Members, in the order they were encountered.
    pub fn records(&self) -> &[&'a ActivityRecord] {
        &self.records
    }

    /// First record of the group.
    pub const fn first(&self) -> &'a ActivityRecord {
        self.first
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the group has no members; never true for a built group.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Summary row handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedEntity {
    /// Group key.
    pub name: String,
    /// Label to show.
    pub display_name: String,
    /// Number of records in the group.
    pub play_count: u64,
    /// Summed duration in minutes.
    pub total_minutes: f64,
    /// Secondary value (popularity or release year).
    pub indicator_value: Option<f64>,
    /// How to format `indicator_value`.
    pub indicator_type: Option<IndicatorType>,
}

/// Groups `records` by `key_fn`, ordering groups by first appearance.
pub fn group_by<'a, F>(records: impl IntoIterator<Item = &'a ActivityRecord>, key_fn: F) -> Vec<Group<'a>>
where
    F: Fn(&ActivityRecord) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for record in records {
        let key = key_fn(record);
        match index.get(&key) {
            Some(&slot) => groups[slot].records.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group::new(key, record));
            }
        }
    }

    groups
}

/// Reduces one group with the dimension's labelling and indicator rules.
///
/// Display name and indicator come from the first record only; the source
/// data is assumed to carry the same popularity for every play of an entity.
pub fn aggregate_group(group: &Group<'_>, strategy: &DimensionStrategy) -> AggregatedEntity {
    let first = group.first();
    let indicator = (strategy.indicator)(first);

    let total_minutes = group
        .records
        .iter()
        .map(|record| record.minutes())
        .sum::<f64>();

    AggregatedEntity {
        name: group.key.clone(),
        display_name: (strategy.display_name)(first),
        play_count: group.len() as u64,
        total_minutes: finite_or_zero(total_minutes),
        indicator_value: indicator.value.filter(|v| v.is_finite()),
        indicator_type: indicator.kind,
    }
}
