//! Rule-based scout responses.
//!
//! A query is lowercased and checked against an ordered rule table; the
//! first rule whose predicate matches builds the reply. No state is kept
//! between calls.

use crate::analysis::{build_hotspots, describe_low_seat_runs, hotspot_preview, RunInsights};
use crate::models::{ChatReply, Run, RunCard};
use serde::Serialize;
use tracing::debug;

/// Identifies a rule in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Empty,
    NamedRun,
    Insights,
    Seats,
    Hotspots,
    Broadcast,
    Thanks,
    Suggest,
    Fallback,
}

/// A `{predicate, handler}` pair. `query` is already lowercased.
pub struct Rule {
    pub id: RuleId,
    pub predicate: fn(query: &str, runs: &[Run]) -> bool,
    pub handler: fn(query: &str, runs: &[Run]) -> ChatReply,
}

/// The rule table, in precedence order.
pub static RULES: &[Rule] = &[
    Rule {
        id: RuleId::Empty,
        predicate: |query, _| query.trim().is_empty(),
        handler: |_, _| {
            ChatReply::text(
                "Try asking me about hotspots, seat alerts, or broadcast strategies — or use the quick buttons below.",
            )
        },
    },
    Rule {
        id: RuleId::NamedRun,
        predicate: |query, runs| find_matching_run(query, runs).is_some(),
        handler: describe_named_run,
    },
    Rule {
        id: RuleId::Insights,
        predicate: |query, _| contains_any(query, &["insight", "stat", "summary"]),
        handler: |_, runs| describe_run_insights(runs),
    },
    Rule {
        id: RuleId::Seats,
        predicate: |query, _| contains_any(query, &["seat", "full", "capacity"]),
        handler: |_, runs| describe_low_seat_runs(runs),
    },
    Rule {
        id: RuleId::Hotspots,
        predicate: |query, _| contains_any(query, &["hotspot", "where", "run"]),
        handler: |_, runs| {
            ChatReply::text(format!(
                "Here are some run hotspots right now:\n{}",
                hotspot_preview(&build_hotspots(runs))
            ))
        },
    },
    Rule {
        id: RuleId::Broadcast,
        predicate: |query, _| contains_any(query, &["broadcast", "tip"]),
        handler: |_, runs| describe_broadcast_ideas(runs),
    },
    Rule {
        id: RuleId::Thanks,
        predicate: |query, _| query.contains("thank"),
        handler: |_, _| {
            ChatReply::text("Happy to help! Ping me anytime you're scouting for drop points.")
        },
    },
    Rule {
        id: RuleId::Suggest,
        predicate: |query, _| contains_any(query, &["suggest", "idea"]),
        handler: |_, _| {
            ChatReply::text(
                "If you want to broadcast, target areas with study spaces (Hunt, Talley) or dorm clusters (Wolf Ridge).",
            )
        },
    },
    Rule {
        id: RuleId::Fallback,
        predicate: |_, _| true,
        handler: |_, _| fallback_reply(),
    },
];

fn contains_any(query: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| query.contains(needle))
}

fn fallback_reply() -> ChatReply {
    ChatReply::text(
        "I'm tuned for BrickyardBytes chatter. Want hotspots, seat alerts, or promo tips? I can also break down a specific run if you mention it by name.",
    )
}

/// Find the first run whose restaurant name appears in the query, else the
/// first whose drop point does. Matching is case-insensitive.
pub fn find_matching_run<'a>(query: &str, runs: &'a [Run]) -> Option<&'a Run> {
    let normalized = query.to_lowercase();
    let mentions = |field: Option<&str>| {
        field
            .map(|name| name.trim().to_lowercase())
            .is_some_and(|name| normalized.contains(&name))
    };

    runs.iter()
        .find(|run| mentions(run.restaurant.as_deref()))
        .or_else(|| runs.iter().find(|run| mentions(run.drop_point.as_deref())))
}

fn describe_named_run(query: &str, runs: &[Run]) -> ChatReply {
    match find_matching_run(query, runs) {
        Some(run) => ChatReply::with_cards(
            format!(
                "Here is the live scoop on {} near {}:",
                run.restaurant_label(),
                run.drop_label()
            ),
            vec![RunCard::from(run)],
        ),
        None => fallback_reply(),
    }
}

/// Snapshot summary with the most-joined runs attached.
pub fn describe_run_insights(runs: &[Run]) -> ChatReply {
    RunInsights::from_runs(runs).to_reply()
}

/// Broadcast game plan built around the current top hotspots.
pub fn describe_broadcast_ideas(runs: &[Run]) -> ChatReply {
    let preview = hotspot_preview(&build_hotspots(runs));
    ChatReply::text(format!(
        "Broadcast game-plan:\n{}\nHardcoded tip: rotate between a study core (Talley/Hunt) and residence-heavy zone (Wolf Ridge) to catch both lunch and dinner traffic.",
        preview
    ))
}

/// The first rule matching the query.
pub fn select_rule(query: &str, runs: &[Run]) -> &'static Rule {
    let cleaned = query.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.predicate)(&cleaned, runs))
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// Craft the scout's reply to a free-text query.
pub fn respond(query: &str, runs: &[Run]) -> ChatReply {
    let cleaned = query.to_lowercase();
    let rule = select_rule(&cleaned, runs);
    debug!("Query matched rule {:?}", rule.id);
    (rule.handler)(&cleaned, runs)
}
