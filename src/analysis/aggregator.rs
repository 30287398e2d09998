//! Run aggregation and statistics.
//!
//! This module computes the live snapshot summary shown by the scout:
//! fill rate, busiest drop point, soonest departure, low-seat alerts and
//! the most-joined runs. Every function is total over any run list.

use crate::models::{ChatReply, Run, RunCard};
use serde::Serialize;
use std::cmp::Reverse;

/// Maximum number of cards attached to a summary or alert.
pub const MAX_CARDS: usize = 3;

/// Runs at or below this many open seats are flagged as almost full.
pub const LOW_SEAT_THRESHOLD: i64 = 1;

/// Text returned when there are no runs to summarize.
pub const NO_RUNS_TEXT: &str =
    "No live runs right now. I will stick with campus presets until a runner goes active.";

/// Drop point with the most runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropCount {
    /// Display label, in the casing of its first occurrence.
    pub label: String,
    pub count: usize,
}

/// Summary statistics over a run list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunInsights {
    pub total_runs: usize,
    pub open_seats: i64,
    pub joined_total: i64,
    pub fill_rate_percent: f64,
    pub busiest_drop: Option<DropCount>,
    pub soonest_run: Option<Run>,
    pub low_seat_runs: Vec<Run>,
    pub top_cards: Vec<RunCard>,
}

impl RunInsights {
    /// Compute the summary for a run list. An empty list yields zeroed
    /// totals and no busiest drop or soonest run.
    pub fn from_runs(runs: &[Run]) -> Self {
        let open_seats = runs
            .iter()
            .map(|r| r.seats_remaining)
            .fold(0i64, i64::saturating_add);
        let joined_total = runs.iter().map(Run::joined).fold(0i64, i64::saturating_add);

        Self {
            total_runs: runs.len(),
            open_seats,
            joined_total,
            fill_rate_percent: fill_rate(joined_total, open_seats),
            busiest_drop: busiest_drop(runs),
            soonest_run: soonest_run(runs).cloned(),
            low_seat_runs: low_seat_runs(runs).into_iter().cloned().collect(),
            top_cards: top_cards(runs),
        }
    }

    /// True when there was nothing to aggregate.
    pub fn is_empty(&self) -> bool {
        self.total_runs == 0
    }

    /// Render the three-line snapshot text.
    pub fn summary_text(&self) -> String {
        if self.is_empty() {
            return NO_RUNS_TEXT.to_string();
        }

        let mut lines = Vec::new();

        lines.push(format!(
            "Live snapshot: {} runs | fill {:.0}% | {} seats open.",
            self.total_runs, self.fill_rate_percent, self.open_seats
        ));

        let (label, count) = match &self.busiest_drop {
            Some(drop) => (drop.label.as_str(), drop.count),
            None => ("collecting data", 0),
        };
        lines.push(format!(
            "Busiest drop: {} ({} run{}).",
            label,
            count,
            if count == 1 { "" } else { "s" }
        ));

        let soonest = match &self.soonest_run {
            Some(run) if run.restaurant.is_some() => format!(
                "{} → {} at {}",
                run.restaurant_label(),
                run.drop_label(),
                run.eta_label()
            ),
            _ => "Waiting for the next ETA".to_string(),
        };
        lines.push(format!("Soonest departure: {}.", soonest));

        lines.join("\n")
    }

    /// Snapshot text plus the most-joined run cards.
    pub fn to_reply(&self) -> ChatReply {
        if self.is_empty() {
            return ChatReply::text(NO_RUNS_TEXT);
        }
        ChatReply::with_cards(self.summary_text(), self.top_cards.clone())
    }
}

/// `joined / (joined + open) * 100`, or 0 when nothing is on offer.
pub fn fill_rate(joined: i64, open_seats: i64) -> f64 {
    let denominator = joined.saturating_add(open_seats);
    if denominator <= 0 {
        return 0.0;
    }
    (joined as f64 / denominator as f64) * 100.0
}

/// Find the drop point shared by the most runs.
///
/// Labels are grouped case-insensitively after trimming; ties go to the
/// label encountered first.
pub fn busiest_drop(runs: &[Run]) -> Option<DropCount> {
    let mut groups: Vec<(String, DropCount)> = Vec::new();

    for run in runs {
        let label = run.drop_label();
        let key = label.to_lowercase();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.count += 1,
            None => groups.push((
                key,
                DropCount {
                    label: label.to_string(),
                    count: 1,
                },
            )),
        }
    }

    // min_by_key keeps the first of equal elements
    groups
        .into_iter()
        .map(|(_, group)| group)
        .min_by_key(|group| Reverse(group.count))
}

/// Run with the lexicographically smallest ETA. Runs without an ETA sort last.
pub fn soonest_run(runs: &[Run]) -> Option<&Run> {
    runs.iter()
        .min_by(|a, b| match (a.eta.as_deref(), b.eta.as_deref()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
}

/// Runs that are almost full, first [`MAX_CARDS`] in input order.
pub fn low_seat_runs(runs: &[Run]) -> Vec<&Run> {
    runs.iter()
        .filter(|run| run.seats_remaining <= LOW_SEAT_THRESHOLD)
        .take(MAX_CARDS)
        .collect()
}

/// Cards for the most-joined runs (stable on ties).
pub fn top_cards(runs: &[Run]) -> Vec<RunCard> {
    let mut ranked: Vec<&Run> = runs.iter().collect();
    ranked.sort_by_key(|run| Reverse(run.joined()));
    ranked.into_iter().take(MAX_CARDS).map(RunCard::from).collect()
}

/// Low-seat alert reply.
pub fn describe_low_seat_runs(runs: &[Run]) -> ChatReply {
    let urgent = low_seat_runs(runs);

    if urgent.is_empty() {
        return ChatReply::text(
            "No runs are near capacity right now. Plenty of seats if you hop in soon!",
        );
    }

    ChatReply::with_cards(
        "These runs are almost full — grab a seat quickly:",
        urgent.into_iter().map(RunCard::from).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_run(restaurant: &str, drop: &str, capacity: i64, seats: i64, eta: &str) -> Run {
        Run {
            id: format!("{}-{}", restaurant, drop),
            restaurant: Some(restaurant.to_string()),
            drop_point: Some(drop.to_string()),
            eta: if eta.is_empty() {
                None
            } else {
                Some(eta.to_string())
            },
            capacity,
            seats_remaining: seats,
            ..Run::default()
        }
    }

    #[test]
    fn test_empty_run_list() {
        let insights = RunInsights::from_runs(&[]);

        assert_eq!(insights.total_runs, 0);
        assert_eq!(insights.open_seats, 0);
        assert_eq!(insights.fill_rate_percent, 0.0);
        assert!(insights.busiest_drop.is_none());
        assert!(insights.soonest_run.is_none());
        assert!(insights.low_seat_runs.is_empty());
        assert!(insights.top_cards.is_empty());
        assert_eq!(insights.summary_text(), NO_RUNS_TEXT);
        assert!(insights.to_reply().cards.is_empty());
    }

    #[test]
    fn test_two_run_snapshot() {
        let runs = vec![
            create_test_run("A", "X", 4, 0, "10:00"),
            create_test_run("B", "Y", 2, 2, "09:00"),
        ];

        let insights = RunInsights::from_runs(&runs);

        assert_eq!(insights.open_seats, 2);
        assert_eq!(insights.joined_total, 4);
        assert!((insights.fill_rate_percent - 66.666).abs() < 0.01);
        assert_eq!(insights.soonest_run.as_ref().map(|r| r.restaurant_label()), Some("B"));

        let text = insights.summary_text();
        assert!(text.contains("Live snapshot: 2 runs | fill 67% | 2 seats open."));
        assert!(text.contains("Busiest drop: X (1 run)."));
        assert!(text.contains("Soonest departure: B → Y at 09:00."));
    }

    #[test]
    fn test_fill_rate_zero_denominator() {
        assert_eq!(fill_rate(0, 0), 0.0);
        let runs = vec![create_test_run("A", "X", 0, 0, "")];
        assert_eq!(RunInsights::from_runs(&runs).fill_rate_percent, 0.0);
    }

    #[test]
    fn test_busiest_drop_case_insensitive() {
        let runs = vec![
            create_test_run("A", "Talley", 4, 1, ""),
            create_test_run("B", "Hunt", 4, 1, ""),
            create_test_run("C", " talley ", 4, 1, ""),
        ];

        let drop = busiest_drop(&runs).unwrap();
        assert_eq!(drop.label, "Talley");
        assert_eq!(drop.count, 2);
    }

    #[test]
    fn test_busiest_drop_tie_goes_to_first() {
        let runs = vec![
            create_test_run("A", "Hunt", 4, 1, ""),
            create_test_run("B", "Talley", 4, 1, ""),
        ];
        assert_eq!(busiest_drop(&runs).unwrap().label, "Hunt");
    }

    #[test]
    fn test_missing_drop_point_grouped_as_placeholder() {
        let mut run = create_test_run("A", "X", 4, 1, "");
        run.drop_point = None;
        let drop = busiest_drop(&[run]).unwrap();
        assert_eq!(drop.label, "Drop TBD");
    }

    #[test]
    fn test_soonest_run_missing_eta_sorts_last() {
        let runs = vec![
            create_test_run("NoEta", "X", 4, 1, ""),
            create_test_run("Late", "X", 4, 1, "11:00"),
            create_test_run("Early", "X", 4, 1, "08:30"),
        ];
        assert_eq!(soonest_run(&runs).unwrap().restaurant_label(), "Early");
    }

    #[test]
    fn test_soonest_run_without_restaurant() {
        let mut run = create_test_run("A", "X", 4, 1, "09:00");
        run.restaurant = None;
        let text = RunInsights::from_runs(&[run]).summary_text();
        assert!(text.contains("Soonest departure: Waiting for the next ETA."));
    }

    #[test]
    fn test_low_seat_runs_order_preserved() {
        let runs = vec![
            create_test_run("First", "X", 4, 1, ""),
            create_test_run("Second", "X", 4, 0, ""),
            create_test_run("Third", "X", 4, 3, ""),
        ];

        let urgent = low_seat_runs(&runs);
        assert_eq!(urgent.len(), 2);
        assert_eq!(urgent[0].restaurant_label(), "First");
        assert_eq!(urgent[1].restaurant_label(), "Second");
    }

    #[test]
    fn test_low_seat_runs_capped() {
        let runs: Vec<Run> = (0..5)
            .map(|i| create_test_run(&format!("R{}", i), "X", 4, 0, ""))
            .collect();
        assert_eq!(low_seat_runs(&runs).len(), MAX_CARDS);
        assert_eq!(describe_low_seat_runs(&runs).cards.len(), MAX_CARDS);
    }

    #[test]
    fn test_describe_low_seat_runs_none() {
        let runs = vec![create_test_run("A", "X", 4, 3, "")];
        let reply = describe_low_seat_runs(&runs);
        assert!(reply.text.starts_with("No runs are near capacity"));
        assert!(reply.cards.is_empty());
    }

    #[test]
    fn test_extreme_seat_counts_do_not_overflow() {
        let runs = vec![
            create_test_run("Huge", "X", i64::MAX, -1, ""),
            create_test_run("Odd", "X", 0, i64::MAX, ""),
            create_test_run("Small", "Y", 4, 5, ""),
        ];

        let insights = RunInsights::from_runs(&runs);
        assert_eq!(insights.total_runs, 3);
        assert_eq!(insights.open_seats, i64::MAX);
        assert_eq!(insights.joined_total, i64::MAX);
        assert!(insights.fill_rate_percent.is_finite());
        assert!((0.0..=100.0).contains(&insights.fill_rate_percent));
        assert!(!insights.summary_text().is_empty());
    }

    #[test]
    fn test_top_cards_ranked_by_joined() {
        let runs = vec![
            create_test_run("Light", "X", 4, 3, ""),
            create_test_run("Packed", "X", 5, 0, ""),
            create_test_run("Half", "X", 4, 2, ""),
            create_test_run("Also Light", "X", 4, 3, ""),
        ];

        let cards = top_cards(&runs);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].title, "Packed → X");
        assert_eq!(cards[1].title, "Half → X");
        assert_eq!(cards[2].title, "Light → X");
        assert_eq!(cards[0].detail, "5 joined · 0 seats left");
    }
}
