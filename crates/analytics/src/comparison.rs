//! Period comparison engine — windowed lead filtering and
//! period-over-period metric deltas.

use remindhub_core::types::{DateRange, Lead, LeadSource, LeadStatus, LeadType};
use serde::{Deserialize, Serialize};

/// Exact-match predicates applied on top of the date window.
/// `None` means "all" (no constraint).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LeadFilter {
    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub lead_type: Option<LeadType>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(source) = self.source {
            if lead.source != Some(source) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if lead.status != status {
                return false;
            }
        }
        if let Some(lead_type) = self.lead_type {
            if lead.lead_type != lead_type {
                return false;
            }
        }
        true
    }
}

/// Leads whose `created_at` falls inside `range` (inclusive) and that
/// pass every predicate in `filter`.
pub fn filter_leads<'a>(leads: &'a [Lead], range: DateRange, filter: &LeadFilter) -> Vec<&'a Lead> {
    leads
        .iter()
        .filter(|l| range.contains(l.created_at) && filter.matches(l))
        .collect()
}

/// Headline metrics for one filtered set of leads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub count: u64,
    pub total_kg: f64,
    /// Leads that reached `completed`.
    pub deals: u64,
    /// Realized value summed over deals only.
    pub revenue: f64,
}

impl PeriodMetrics {
    pub fn compute(leads: &[&Lead]) -> Self {
        let mut metrics = Self::default();
        for lead in leads {
            metrics.count += 1;
            metrics.total_kg += lead.weight();
            if lead.status == LeadStatus::Completed {
                metrics.deals += 1;
                metrics.revenue += lead.closed_value();
            }
        }
        metrics
    }
}

/// Signed percentage delta per metric, current vs previous period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricChange {
    pub count: i64,
    pub total_kg: i64,
    pub deals: i64,
    pub revenue: i64,
}

/// Metrics for the primary range, plus the preceding equal-length range
/// when compare mode is on. `previous` and `change` are absent otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current: PeriodMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PeriodMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<MetricChange>,
}

/// Rounded signed percentage change. A zero previous value yields 100 when
/// the current value is positive ("new activity from nothing") and 0
/// otherwise, so the division never blows up.
pub fn pct_change(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    (((current - previous) / previous) * 100.0).round() as i64
}

pub fn compare_periods(
    leads: &[Lead],
    range: DateRange,
    filter: &LeadFilter,
    compare_mode: bool,
) -> PeriodComparison {
    let current = PeriodMetrics::compute(&filter_leads(leads, range, filter));
    if !compare_mode {
        return PeriodComparison {
            current,
            previous: None,
            change: None,
        };
    }

    let previous = PeriodMetrics::compute(&filter_leads(leads, range.comparison_range(), filter));
    let change = MetricChange {
        count: pct_change(current.count as f64, previous.count as f64),
        total_kg: pct_change(current.total_kg, previous.total_kg),
        deals: pct_change(current.deals as f64, previous.deals as f64),
        revenue: pct_change(current.revenue, previous.revenue),
    };

    PeriodComparison {
        current,
        previous: Some(previous),
        change: Some(change),
    }
}
