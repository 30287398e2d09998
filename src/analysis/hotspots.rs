//! Hotspot suggestions.
//!
//! Hotspots are the unique restaurant/drop-point pairs among the live runs.
//! With no live runs the scout falls back to a fixed set of campus presets.

use crate::models::{Hotspot, Run};

/// How many hotspots a preview lists.
pub const PREVIEW_LEN: usize = 3;

const PRESET_HOTSPOTS: [(&str, &str); 3] = [
    (
        "Talley Student Union",
        "Most runs head here around lunch. Expect lots of Port City Java orders.",
    ),
    (
        "Hunt Library Cafe",
        "Common Grounds stays busy during study jams, especially evenings.",
    ),
    (
        "EB2 Atrium",
        "Engineering students often stage drop-offs near the EBII Lobby.",
    ),
];

/// The campus preset hotspots.
pub fn preset_hotspots() -> Vec<Hotspot> {
    PRESET_HOTSPOTS
        .iter()
        .map(|(name, tip)| Hotspot {
            name: name.to_string(),
            tip: tip.to_string(),
        })
        .collect()
}

/// Group runs into hotspots by restaurant/drop-point pair, first seen first.
pub fn build_hotspots(runs: &[Run]) -> Vec<Hotspot> {
    let mut seen: Vec<(Option<&str>, Option<&str>)> = Vec::new();
    let mut hotspots = Vec::new();

    for run in runs {
        let key = (run.restaurant.as_deref(), run.drop_point.as_deref());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        hotspots.push(Hotspot {
            name: run.restaurant_label().to_string(),
            tip: format!(
                "Drop near {} · {} seats open",
                run.drop_label(),
                run.seats_remaining
            ),
        });
    }

    if hotspots.is_empty() {
        preset_hotspots()
    } else {
        hotspots
    }
}

/// Numbered preview lines: `1. name — tip`.
pub fn hotspot_preview(hotspots: &[Hotspot]) -> String {
    hotspots
        .iter()
        .take(PREVIEW_LEN)
        .enumerate()
        .map(|(idx, spot)| format!("{}. {} — {}", idx + 1, spot.name, spot.tip))
        .collect::<Vec<_>>()
        .join("\n")
}
