//! Funnel engine — per-transition durations derived from the audit trail,
//! and stage-pair summaries projected onto the canonical pipeline.

use crate::audit::StatusChange;
use chrono::{DateTime, Utc};
use remindhub_core::types::{Lead, LeadStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Grouping key for one observed transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionKey {
    pub from: String,
    pub to: String,
}

impl TransitionKey {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Average duration and sample count for one adjacent stage pair. An
/// unobserved pair carries the sentinel `avg_ms = 0.0, count = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: LeadStatus,
    pub to: LeadStatus,
    pub avg_ms: f64,
    pub count: u64,
}

/// Time spent in each observed transition, keyed by (from, to).
///
/// The previous timestamp for a lead's first record is the lead's
/// `created_at`; for later records it is the preceding record's timestamp.
/// Durations are milliseconds and strictly positive: zero or negative gaps
/// (clock skew, duplicated timestamps) are discarded so they cannot pull
/// averages down. A first record whose lead is missing from the snapshot
/// has no reference point and is skipped as a gap.
pub fn collect_transition_durations(
    leads: &[Lead],
    changes_by_lead: &HashMap<String, Vec<StatusChange>>,
) -> HashMap<TransitionKey, Vec<i64>> {
    let created_at: HashMap<&str, DateTime<Utc>> = leads
        .iter()
        .map(|l| (l.id.as_str(), l.created_at))
        .collect();

    // Sorted iteration keeps per-key duration lists deterministic when
    // several leads contribute to the same transition.
    let mut lead_ids: Vec<&String> = changes_by_lead.keys().collect();
    lead_ids.sort();

    let mut durations: HashMap<TransitionKey, Vec<i64>> = HashMap::new();
    for lead_id in lead_ids {
        let changes = &changes_by_lead[lead_id];
        for (i, change) in changes.iter().enumerate() {
            let previous = if i == 0 {
                match created_at.get(lead_id.as_str()) {
                    Some(t) => *t,
                    None => {
                        debug!(%lead_id, "Audit rows reference a lead absent from the snapshot, skipping first transition");
                        continue;
                    }
                }
            } else {
                changes[i - 1].at
            };

            let elapsed = (change.at - previous).num_milliseconds();
            if elapsed <= 0 {
                continue;
            }
            durations
                .entry(TransitionKey::new(change.from.as_str(), change.to.as_str()))
                .or_default()
                .push(elapsed);
        }
    }
    durations
}

/// Project observed durations onto the configured stage order.
///
/// The output always has `stages.len() - 1` rows regardless of how sparse
/// the audit log is, so the presentation layer never special-cases missing
/// data. Keys outside the canonical adjacency list (including the
/// `("", first_status)` entry a brand-new lead produces) are ignored here
/// but remain in the duration map for other consumers.
pub fn summarize_funnel(
    durations: &HashMap<TransitionKey, Vec<i64>>,
    stages: &[LeadStatus],
) -> Vec<StageTransition> {
    stages
        .windows(2)
        .map(|pair| {
            let key = TransitionKey::new(pair[0].as_str(), pair[1].as_str());
            match durations.get(&key) {
                Some(times) if !times.is_empty() => StageTransition {
                    from: pair[0],
                    to: pair[1],
                    avg_ms: times.iter().sum::<i64>() as f64 / times.len() as f64,
                    count: times.len() as u64,
                },
                _ => StageTransition {
                    from: pair[0],
                    to: pair[1],
                    avg_ms: 0.0,
                    count: 0,
                },
            }
        })
        .collect()
}

/// Render a millisecond duration for display: `2d 1h`, `3h 5m`, `45m`,
/// or `-` when there is nothing to show.
pub fn format_duration(ms: i64) -> String {
    if ms <= 0 {
        return "-".to_string();
    }
    let mins = ms / 60_000;
    let hours = mins / 60;
    let days = hours / 24;
    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins % 60)
    } else {
        format!("{}m", mins)
    }
}
