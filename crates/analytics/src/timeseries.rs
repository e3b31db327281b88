//! Monthly lead series backing the "over time" charts.

use remindhub_core::types::{Lead, LeadStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Bucket key, `YYYY-MM`.
    pub month: String,
    pub count: u64,
    pub total_kg: f64,
    pub deals: u64,
}

/// Bucket leads by creation month, ascending. Months with no leads in the
/// filtered set simply don't appear; the chart renders what it gets.
pub fn monthly_series(leads: &[&Lead]) -> Vec<MonthlyPoint> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut points: Vec<MonthlyPoint> = Vec::new();

    for lead in leads {
        let month = lead.created_at.format("%Y-%m").to_string();
        let i = *index.entry(month.clone()).or_insert_with(|| {
            points.push(MonthlyPoint {
                month,
                count: 0,
                total_kg: 0.0,
                deals: 0,
            });
            points.len() - 1
        });
        points[i].count += 1;
        points[i].total_kg += lead.weight();
        if lead.status == LeadStatus::Completed {
            points[i].deals += 1;
        }
    }

    points.sort_by(|a, b| a.month.cmp(&b.month));
    points
}
