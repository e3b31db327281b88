//! Audit log reader — filters, parses, and groups status-change rows
//! before the funnel engine touches them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use remindhub_core::types::AuditRecord;
use std::collections::HashMap;
use tracing::warn;

/// A parsed status transition for one lead. `from` is empty for the
/// first-ever record of a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub from: String,
    pub to: String,
    pub at: DateTime<Utc>,
}

/// Group audit rows by lead, keeping only rows for `tracked_field`.
///
/// The upstream query is expected to pre-filter and pre-order, but neither
/// is trusted: rows for other fields are dropped, and each lead's rows are
/// re-sorted by timestamp (stable, so equal timestamps keep their original
/// sequence position). A row whose timestamp cannot be parsed is excluded
/// and logged rather than aborting the batch.
pub fn read_status_changes(
    records: &[AuditRecord],
    tracked_field: &str,
) -> HashMap<String, Vec<StatusChange>> {
    let mut by_lead: HashMap<String, Vec<StatusChange>> = HashMap::new();

    for record in records {
        if record.field_name != tracked_field {
            continue;
        }
        let Some(at) = parse_timestamp(&record.created_at) else {
            warn!(
                record_id = %record.id,
                lead_id = %record.lead_id,
                raw = %record.created_at,
                "Skipping audit row with unparsable timestamp"
            );
            continue;
        };
        by_lead.entry(record.lead_id.clone()).or_default().push(StatusChange {
            from: record.old_value.clone(),
            to: record.new_value.clone(),
            at,
        });
    }

    for changes in by_lead.values_mut() {
        changes.sort_by_key(|c| c.at);
    }

    by_lead
}

/// The store emits RFC 3339 timestamps; older rows carry bare dates.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    raw.parse::<NaiveDate>()
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
