//! End-to-end flow: audit rows and lead snapshot in, funnel summary and
//! dashboard overview out.

use chrono::{DateTime, Utc};
use remindhub_analytics::funnel::TransitionKey;
use remindhub_analytics::{
    build_overview, collect_transition_durations, read_status_changes, summarize_funnel,
};
use remindhub_core::types::{AuditRecord, ChatRecord, Lead, LeadSource, LeadStatus, LeadType};
use remindhub_core::AppConfig;
use uuid::Uuid;

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn lead(id: &str, created: &str, status: LeadStatus, source: LeadSource, kg: f64) -> Lead {
    Lead {
        id: id.into(),
        lead_type: LeadType::B2c,
        status,
        source: Some(source),
        estimated_kg: kg,
        actual_kg: None,
        potential_value: 100_000.0,
        deal_value: None,
        final_value: None,
        created_at: at(created),
        last_contacted: at(created),
        next_follow_up: None,
    }
}

fn audit(lead_id: &str, field: &str, old: &str, new: &str, created: &str) -> AuditRecord {
    AuditRecord {
        id: Uuid::new_v4(),
        lead_id: lead_id.into(),
        field_name: field.into(),
        old_value: old.into(),
        new_value: new.into(),
        created_at: created.into(),
    }
}

fn fixture() -> (Vec<Lead>, Vec<AuditRecord>, Vec<ChatRecord>) {
    let leads = vec![
        lead("L001", "2025-12-01T00:00:00Z", LeadStatus::InProgress, LeadSource::Whatsapp, 25.0),
        lead("L002", "2025-12-15T08:00:00Z", LeadStatus::New, LeadSource::Whatsapp, 10.0),
        lead("L003", "2025-12-15T09:00:00Z", LeadStatus::Completed, LeadSource::Web, 40.0),
    ];
    let audits = vec![
        audit("L001", "status", "", "new", "2025-12-01T00:05:00Z"),
        audit("L001", "status", "new", "in_progress", "2025-12-02T00:05:00Z"),
        // Noise the reader must shrug off.
        audit("L001", "assigned_pic", "Andi", "Budi", "2025-12-01T06:00:00Z"),
        audit("L002", "status", "", "new", "garbled"),
    ];
    let chats = vec![ChatRecord {
        id: "C1".into(),
        created_at: at("2025-12-15T08:00:00Z"),
        first_response_at: Some(at("2025-12-15T08:12:00Z")),
        is_answered: true,
        unread: 0,
    }];
    (leads, audits, chats)
}

#[test]
fn test_full_pipeline_produces_overview() {
    let (leads, audits, chats) = fixture();
    let config = AppConfig::default();
    let now = at("2025-12-15T14:00:00Z");

    let changes = read_status_changes(&audits, &config.tracked_field);
    let durations = collect_transition_durations(&leads, &changes);

    // The L001 scenario: 5 minutes to first status, a day to in_progress.
    assert_eq!(durations[&TransitionKey::new("", "new")], vec![5 * 60_000]);
    assert_eq!(
        durations[&TransitionKey::new("new", "in_progress")],
        vec![24 * 60 * 60_000]
    );

    let summary = summarize_funnel(&durations, &config.funnel_stages);
    assert_eq!(summary.len(), config.funnel_stages.len() - 1);
    assert_eq!(summary[0].count, 0, "(new, not_followed_up) never observed");

    let overview = build_overview(
        &leads,
        &chats,
        summary,
        &config.funnel_stages,
        config.top_sources_limit,
        now,
    );

    // Only L002 and L003 were created today.
    assert_eq!(overview.lead_count, 2);
    assert_eq!(overview.total_kg, 50.0);
    assert_eq!(overview.deals, 1);
    assert_eq!(overview.conversion_rate, 50);
    assert_eq!(overview.chats.answered, 1);
    assert_eq!(overview.chats.avg_response_ms, 12.0 * 60_000.0);
    assert_eq!(overview.funnel.len(), 6);
}

#[test]
fn test_pipeline_is_idempotent() {
    let (leads, audits, chats) = fixture();
    let config = AppConfig::default();
    let now = at("2025-12-15T14:00:00Z");

    let run = || {
        let changes = read_status_changes(&audits, &config.tracked_field);
        let durations = collect_transition_durations(&leads, &changes);
        let summary = summarize_funnel(&durations, &config.funnel_stages);
        build_overview(
            &leads,
            &chats,
            summary,
            &config.funnel_stages,
            config.top_sources_limit,
            now,
        )
    };

    assert_eq!(run(), run());
}
