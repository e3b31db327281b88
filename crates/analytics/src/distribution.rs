//! Categorical distributions — per-source and per-status bucket summaries
//! over an already-filtered lead set.

use remindhub_core::types::Lead;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub key: String,
    pub count: u64,
    pub total_kg: f64,
    /// Best-known value per lead: final → deal → potential.
    pub total_value: f64,
}

/// Buckets by source (`manual` when the row carries none), sorted
/// descending by count. The sort is stable, so ties keep first-encountered
/// order and the head bucket is the "top source".
pub fn by_source(leads: &[&Lead]) -> Vec<DistributionBucket> {
    let mut buckets = accumulate(leads, |l| l.source_key().to_string());
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Buckets by status, in first-encountered order. The presentation layer
/// applies its own ordering when it needs one.
pub fn by_status(leads: &[&Lead]) -> Vec<DistributionBucket> {
    accumulate(leads, |l| l.status.as_str().to_string())
}

pub fn top_source(buckets: &[DistributionBucket]) -> Option<&DistributionBucket> {
    buckets.first()
}

fn accumulate(leads: &[&Lead], key_fn: impl Fn(&Lead) -> String) -> Vec<DistributionBucket> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<DistributionBucket> = Vec::new();

    for lead in leads {
        let key = key_fn(lead);
        let i = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push(DistributionBucket {
                key,
                count: 0,
                total_kg: 0.0,
                total_value: 0.0,
            });
            buckets.len() - 1
        });
        buckets[i].count += 1;
        buckets[i].total_kg += lead.weight();
        buckets[i].total_value += lead.pipeline_value();
    }

    buckets
}
