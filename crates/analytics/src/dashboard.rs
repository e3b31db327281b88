//! Daily dashboard overview — composes the aggregators into the single
//! view model the landing page renders.

use crate::chats::{chat_stats, ChatStats};
use crate::distribution::{by_source, top_source, DistributionBucket};
use crate::funnel::StageTransition;
use chrono::{DateTime, Utc};
use remindhub_core::types::{ChatRecord, DateRange, Lead, LeadStatus, LeadType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    /// Leads created since midnight.
    pub lead_count: u64,
    pub total_kg: f64,
    pub b2c_kg: f64,
    pub b2b_kg: f64,
    /// Potential value summed over today's leads.
    pub potential_revenue: f64,
    pub deals: u64,
    /// Percent of today's leads that reached `completed`, rounded.
    pub conversion_rate: i64,
    pub chats: ChatStats,
    pub sources: Vec<DistributionBucket>,
    pub top_source: Option<String>,
    /// Per-status lead counts over the funnel stages plus `lost`.
    pub status_counts: Vec<StatusCount>,
    /// Adjacent stage-pair durations from the full audit history, not just
    /// today's window.
    pub funnel: Vec<StageTransition>,
    pub generated_at: DateTime<Utc>,
}

pub fn build_overview(
    leads: &[Lead],
    chats: &[ChatRecord],
    funnel: Vec<StageTransition>,
    stages: &[LeadStatus],
    top_sources_limit: usize,
    now: DateTime<Utc>,
) -> DashboardOverview {
    let window = DateRange::today(now);
    let today: Vec<&Lead> = leads
        .iter()
        .filter(|l| window.contains(l.created_at))
        .collect();

    let total_kg: f64 = today.iter().map(|l| l.weight()).sum();
    let b2c_kg: f64 = today
        .iter()
        .filter(|l| l.lead_type == LeadType::B2c)
        .map(|l| l.weight())
        .sum();
    let b2b_kg: f64 = today
        .iter()
        .filter(|l| l.lead_type == LeadType::B2b)
        .map(|l| l.weight())
        .sum();
    let potential_revenue: f64 = today.iter().map(|l| l.potential_value).sum();
    let deals = today
        .iter()
        .filter(|l| l.status == LeadStatus::Completed)
        .count() as u64;
    let conversion_rate = if today.is_empty() {
        0
    } else {
        ((deals as f64 / today.len() as f64) * 100.0).round() as i64
    };

    let mut sources = by_source(&today);
    let top = top_source(&sources).map(|b| b.key.clone());
    sources.truncate(top_sources_limit);

    let status_counts = stages
        .iter()
        .copied()
        .chain([LeadStatus::Lost])
        .map(|status| StatusCount {
            status,
            count: today.iter().filter(|l| l.status == status).count() as u64,
        })
        .collect();

    DashboardOverview {
        lead_count: today.len() as u64,
        total_kg,
        b2c_kg,
        b2b_kg,
        potential_revenue,
        deals,
        conversion_rate,
        chats: chat_stats(chats),
        sources,
        top_source: top,
        status_counts,
        funnel,
        generated_at: now,
    }
}
