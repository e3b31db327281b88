//! Chat responsiveness metrics for the inbox cards.

use remindhub_core::types::ChatRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatStats {
    pub answered: u64,
    pub unanswered: u64,
    /// Mean time from chat creation to first agent reply, over chats that
    /// have one. Zero when no chat has been replied to yet.
    pub avg_response_ms: f64,
}

/// A chat counts as answered when the store's `is_answered` flag is set.
/// The flag is the single source of truth; the last-message-sender
/// heuristic some clients used is intentionally not reimplemented.
pub fn chat_stats(chats: &[ChatRecord]) -> ChatStats {
    let answered = chats.iter().filter(|c| c.is_answered).count() as u64;
    let unanswered = chats.len() as u64 - answered;

    let response_times: Vec<i64> = chats
        .iter()
        .filter_map(|c| {
            c.first_response_at
                .map(|r| (r - c.created_at).num_milliseconds())
        })
        .filter(|ms| *ms > 0)
        .collect();

    let avg_response_ms = if response_times.is_empty() {
        0.0
    } else {
        response_times.iter().sum::<i64>() as f64 / response_times.len() as f64
    };

    ChatStats {
        answered,
        unanswered,
        avg_response_ms,
    }
}
