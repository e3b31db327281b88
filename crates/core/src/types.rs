use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lead pipeline status. The first seven variants form the canonical
/// funnel; `Lost` and `Cancelled` are terminal states reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    NotFollowedUp,
    FollowedUp,
    InProgress,
    PickedUp,
    SignContract,
    Completed,
    Lost,
    Cancelled,
}

impl LeadStatus {
    /// Wire label as stored in lead rows and audit log values.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::NotFollowedUp => "not_followed_up",
            LeadStatus::FollowedUp => "followed_up",
            LeadStatus::InProgress => "in_progress",
            LeadStatus::PickedUp => "picked_up",
            LeadStatus::SignContract => "sign_contract",
            LeadStatus::Completed => "completed",
            LeadStatus::Lost => "lost",
            LeadStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(LeadStatus::New),
            "not_followed_up" => Some(LeadStatus::NotFollowedUp),
            "followed_up" => Some(LeadStatus::FollowedUp),
            "in_progress" => Some(LeadStatus::InProgress),
            "picked_up" => Some(LeadStatus::PickedUp),
            "sign_contract" => Some(LeadStatus::SignContract),
            "completed" => Some(LeadStatus::Completed),
            "lost" => Some(LeadStatus::Lost),
            "cancelled" => Some(LeadStatus::Cancelled),
            _ => None,
        }
    }
}

/// Acquisition channel a lead arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Whatsapp,
    Web,
    Instagram,
    Referral,
    Campaign,
    Partner,
    Manual,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Whatsapp => "whatsapp",
            LeadSource::Web => "web",
            LeadSource::Instagram => "instagram",
            LeadSource::Referral => "referral",
            LeadSource::Campaign => "campaign",
            LeadSource::Partner => "partner",
            LeadSource::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    B2c,
    B2b,
}

/// A CRM lead row. Created and mutated externally; the analytics core
/// treats it as read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub lead_type: LeadType,
    pub status: LeadStatus,
    pub source: Option<LeadSource>,
    pub estimated_kg: f64,
    pub actual_kg: Option<f64>,
    pub potential_value: f64,
    pub deal_value: Option<f64>,
    pub final_value: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub last_contacted: DateTime<Utc>,
    pub next_follow_up: Option<DateTime<Utc>>,
}

impl Lead {
    /// Weight contribution in kg: `actual_kg` when present and positive,
    /// else `estimated_kg`, else 0. Every weight aggregation goes through
    /// this resolver so the fallback chain stays consistent.
    pub fn weight(&self) -> f64 {
        match self.actual_kg {
            Some(kg) if kg > 0.0 => kg,
            _ if self.estimated_kg > 0.0 => self.estimated_kg,
            _ => 0.0,
        }
    }

    /// Realized revenue for a closed deal: `final_value` → `deal_value` → 0.
    pub fn closed_value(&self) -> f64 {
        first_positive(&[self.final_value, self.deal_value]).unwrap_or(0.0)
    }

    /// Best-known monetary value at any stage:
    /// `final_value` → `deal_value` → `potential_value` → 0.
    pub fn pipeline_value(&self) -> f64 {
        first_positive(&[self.final_value, self.deal_value, Some(self.potential_value)])
            .unwrap_or(0.0)
    }

    /// Source bucket key, defaulting to `manual` when the row carries none.
    pub fn source_key(&self) -> &'static str {
        self.source.unwrap_or(LeadSource::Manual).as_str()
    }
}

fn first_positive(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().find(|v| *v > 0.0)
}

/// One row of the append-only lead audit log. `created_at` is kept as the
/// raw store timestamp; the audit reader parses it defensively so a single
/// malformed row cannot blank the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub lead_id: String,
    pub field_name: String,
    /// Empty string means "no prior state" (the first-ever record).
    pub old_value: String,
    pub new_value: String,
    pub created_at: String,
}

/// A chat thread as delivered by the message store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub first_response_at: Option<DateTime<Utc>>,
    pub is_answered: bool,
    pub unread: u32,
}

/// An inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Midnight-to-now window containing `now`, used by the daily overview.
    pub fn today(now: DateTime<Utc>) -> Self {
        Self {
            from: now.date_naive().and_time(NaiveTime::MIN).and_utc(),
            to: now,
        }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.from && t <= self.to
    }

    pub fn duration(&self) -> chrono::Duration {
        self.to - self.from
    }

    /// The equal-length window immediately preceding `from`, used for
    /// period-over-period comparison.
    pub fn comparison_range(&self) -> Self {
        let d = self.duration();
        Self {
            from: self.from - d,
            to: self.to - d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lead(estimated: f64, actual: Option<f64>) -> Lead {
        let t = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        Lead {
            id: "L001".into(),
            lead_type: LeadType::B2c,
            status: LeadStatus::New,
            source: None,
            estimated_kg: estimated,
            actual_kg: actual,
            potential_value: 0.0,
            deal_value: None,
            final_value: None,
            created_at: t,
            last_contacted: t,
            next_follow_up: None,
        }
    }

    #[test]
    fn test_weight_fallback_chain() {
        assert_eq!(lead(10.0, Some(12.0)).weight(), 12.0);
        assert_eq!(lead(10.0, Some(0.0)).weight(), 10.0);
        assert_eq!(lead(10.0, None).weight(), 10.0);
        assert_eq!(lead(0.0, None).weight(), 0.0);
    }

    #[test]
    fn test_value_priority_chains() {
        let mut l = lead(0.0, None);
        l.potential_value = 200.0;
        assert_eq!(l.closed_value(), 0.0);
        assert_eq!(l.pipeline_value(), 200.0);

        l.deal_value = Some(500.0);
        assert_eq!(l.closed_value(), 500.0);
        assert_eq!(l.pipeline_value(), 500.0);

        l.final_value = Some(450.0);
        assert_eq!(l.closed_value(), 450.0);
        assert_eq!(l.pipeline_value(), 450.0);
    }

    #[test]
    fn test_comparison_range_immediately_precedes() {
        let from = Utc.with_ymd_and_hms(2025, 12, 11, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 12, 21, 0, 0, 0).unwrap();
        let prev = DateRange::new(from, to).comparison_range();
        assert_eq!(prev.to, from);
        assert_eq!(prev.from, from - chrono::Duration::days(10));
        assert_eq!(prev.duration(), chrono::Duration::days(10));
    }

    #[test]
    fn test_status_labels_round_trip() {
        for s in [
            LeadStatus::New,
            LeadStatus::NotFollowedUp,
            LeadStatus::SignContract,
            LeadStatus::Cancelled,
        ] {
            assert_eq!(LeadStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(LeadStatus::parse("archived"), None);
    }
}
