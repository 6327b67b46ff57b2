//! Client-side ordering and slicing applied before rendering.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDateTime, Utc};

use super::types::{Agent, Task};

/// Number of agents the selector shows before "show all".
pub const AGENT_PREVIEW_LIMIT: usize = 4;

/// Parse a server timestamp.
///
/// Accepts RFC 3339 and offset-less ISO-8601 (read as UTC), which is what
/// the backend emits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

/// Sort tasks newest first by `created_at`.
///
/// Tasks whose timestamp cannot be parsed go last, keeping their relative order.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by_cached_key(|task| Reverse(parse_timestamp(&task.created_at)));
}

/// The agents to display: all of them, or the first `limit`.
pub fn visible_agents(agents: &[Agent], show_all: bool, limit: usize) -> &[Agent] {
    if show_all {
        agents
    } else {
        &agents[..agents.len().min(limit)]
    }
}
