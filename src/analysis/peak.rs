//! Peak bonus window selection.
//!
//! The backend forecasts which hours of the day earn runners bonus points.
//! This module only picks which forecast entry to feature and formats it.

use crate::models::PeakHour;

/// Hour featured when the forecast contains it (the dinner rush).
pub const FEATURED_HOUR: u8 = 17;

/// Pick the entry to feature: hour 17 when present, otherwise the earliest hour.
/// Entries without an hour are never featured.
pub fn featured_peak(peaks: &[PeakHour]) -> Option<&PeakHour> {
    let mut ordered: Vec<&PeakHour> = peaks.iter().filter(|p| p.hour.is_some()).collect();
    ordered.sort_by_key(|p| p.hour);

    ordered
        .iter()
        .find(|p| p.hour == Some(FEATURED_HOUR))
        .or_else(|| ordered.first())
        .copied()
}

/// Format an hour as a one-hour window, e.g. `23:00 - 00:00`.
pub fn format_window(hour: u8) -> String {
    format!("{:02}:00 - {:02}:00", hour, (u16::from(hour) + 1) % 24)
}

/// Banner text for the featured window, if any.
pub fn peak_banner(peaks: &[PeakHour]) -> Option<String> {
    let hour = featured_peak(peaks)?.hour?;
    Some(format!(
        "Bonus active from {}. Run now to earn extra points.",
        format_window(hour)
    ))
}
