//! Data models for the run scout.
//!
//! This module contains the read-only snapshots received from the
//! BrickyardBytes backend (runs and their orders) plus the small display
//! structures handed to the rendering layer. Optional and loosely-typed
//! backend fields are normalized once, at deserialization time.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Placeholder shown when a run has no restaurant.
pub const UNKNOWN_RESTAURANT: &str = "Unknown spot";
/// Placeholder shown when a run has no drop point.
pub const UNKNOWN_DROP: &str = "Drop TBD";
/// Placeholder shown when a run has no ETA.
pub const UNKNOWN_ETA: &str = "TBD";

/// A broadcast grouped food order, as listed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Backend identifier (integers are stored in their decimal form).
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub restaurant: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub drop_point: Option<String>,
    /// Free-text ETA. Compared as a string, never parsed.
    #[serde(default, deserialize_with = "lenient_text")]
    pub eta: Option<String>,
    /// Total seats offered by the runner.
    #[serde(default, deserialize_with = "lenient_int")]
    pub capacity: i64,
    /// Seats still open.
    #[serde(default, deserialize_with = "lenient_int")]
    pub seats_remaining: i64,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub runner_username: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_orders")]
    pub orders: Vec<Order>,
}

impl Run {
    /// Number of participants who have joined: `capacity - seats_remaining`, never negative.
    pub fn joined(&self) -> i64 {
        self.capacity.saturating_sub(self.seats_remaining).max(0)
    }

    /// Restaurant name for display (trimmed).
    pub fn restaurant_label(&self) -> &str {
        self.restaurant.as_deref().map(str::trim).unwrap_or(UNKNOWN_RESTAURANT)
    }

    /// Drop point for display (trimmed).
    pub fn drop_label(&self) -> &str {
        self.drop_point.as_deref().map(str::trim).unwrap_or(UNKNOWN_DROP)
    }

    /// ETA for display.
    pub fn eta_label(&self) -> &str {
        self.eta.as_deref().unwrap_or(UNKNOWN_ETA)
    }
}

/// A single participant's order within a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    /// Item description as typed by the participant.
    #[serde(default, deserialize_with = "lenient_text")]
    pub items: Option<String>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_opt_float", skip_serializing_if = "Option::is_none")]
    pub tip: Option<f64>,
    /// Delivery status (`pending`, `delivered`, ...).
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub user_username: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Order {
    /// Customer label: email, then username, then `User #id`.
    pub fn customer_label(&self) -> String {
        if let Some(email) = &self.user_email {
            return email.clone();
        }
        if let Some(name) = &self.user_username {
            return name.clone();
        }
        match &self.user_id {
            Some(id) => format!("User #{}", id),
            None => "Unknown customer".to_string(),
        }
    }

    /// Delivery status, defaulting to `pending`.
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("pending")
    }
}

/// Display card referencing a specific run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCard {
    pub id: String,
    /// `restaurant → drop point`
    pub title: String,
    /// `ETA {eta}`
    pub subtitle: String,
    /// `{joined} joined · {seats} seat(s) left`
    pub detail: String,
}

impl From<&Run> for RunCard {
    fn from(run: &Run) -> Self {
        let seats = run.seats_remaining;
        Self {
            id: run.id.clone(),
            title: format!("{} → {}", run.restaurant_label(), run.drop_label()),
            subtitle: format!("ETA {}", run.eta_label()),
            detail: format!(
                "{} joined · {} seat{} left",
                run.joined(),
                seats,
                if seats == 1 { "" } else { "s" }
            ),
        }
    }
}

impl fmt::Display for RunCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} | {} | {}", self.id, self.title, self.subtitle, self.detail)
    }
}

/// A restaurant/drop-point pairing suggested as a gathering point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub name: String,
    pub tip: String,
}

/// Reply payload from the scout: text plus optional run cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<RunCard>,
}

impl ChatReply {
    /// A reply with no cards.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cards: Vec::new(),
        }
    }

    pub fn with_cards(text: impl Into<String>, cards: Vec<RunCard>) -> Self {
        Self {
            text: text.into(),
            cards,
        }
    }
}

/// One entry of the backend's peak forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakHour {
    /// Hour of day (0-23). Entries without a usable hour are ignored for display.
    #[serde(default, deserialize_with = "lenient_hour")]
    pub hour: Option<u8>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub demand_score: f64,
    #[serde(default, deserialize_with = "lenient_float")]
    pub utilization_ratio: f64,
    #[serde(default, deserialize_with = "lenient_float")]
    pub avg_orders_per_day: f64,
    #[serde(default, deserialize_with = "lenient_float")]
    pub avg_runs_per_day: f64,
}

/// Response body of the peak forecast endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeakForecast {
    #[serde(default)]
    pub peak_forecast: Vec<PeakHour>,
}

/// Response body of the run load estimate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadEstimate {
    pub assessment: String,
}

/// Response body of the run description endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionSuggestion {
    pub suggestion: String,
}

/// Coerce a JSON value to an integer: numbers are truncated, numeric strings
/// are parsed, everything else becomes 0.
pub fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Coerce a JSON value to a float with the same rules as [`coerce_int`].
pub fn coerce_float(value: &Value) -> f64 {
    let f = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    if f.is_finite() {
        f
    } else {
        0.0
    }
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_int(&value))
}

fn lenient_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_float(&value))
}

/// Absent or null stays `None`; anything else coerces like [`coerce_float`].
fn lenient_opt_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        other => Ok(Some(coerce_float(&other))),
    }
}

fn lenient_hour<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .filter(|h| *h < 24)
        .and_then(|h| u8::try_from(h).ok()))
}

/// Strings stay strings, numbers become their decimal form, blanks become `None`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Ok(None),
    };
    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// A non-array `orders` field is treated as empty; malformed entries are skipped.
fn lenient_orders<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Order>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Parse a run list from a JSON payload. Anything that is not an array yields
/// an empty list; entries that are not objects are skipped.
pub fn parse_run_list(value: Value) -> Vec<Run> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_joined_clamps_at_zero() {
        let run = Run {
            capacity: 2,
            seats_remaining: 5,
            ..Run::default()
        };
        assert_eq!(run.joined(), 0);

        let run = Run {
            capacity: 4,
            seats_remaining: 1,
            ..Run::default()
        };
        assert_eq!(run.joined(), 3);
    }

    #[test]
    fn test_joined_saturates_on_extreme_values() {
        let run = Run {
            capacity: i64::MAX,
            seats_remaining: -1,
            ..Run::default()
        };
        assert_eq!(run.joined(), i64::MAX);

        let run = Run {
            capacity: i64::MIN,
            seats_remaining: 1,
            ..Run::default()
        };
        assert_eq!(run.joined(), 0);
    }

    #[test]
    fn test_order_tip_is_lenient() {
        let run: Run = serde_json::from_value(json!({
            "id": 3,
            "orders": [
                {"id": 1, "tip": "1.50"},
                {"id": 2, "tip": "abc"},
                {"id": 3, "tip": null},
                {"id": 4, "tip": 2}
            ]
        }))
        .unwrap();

        let tips: Vec<Option<f64>> = run.orders.iter().map(|o| o.tip).collect();
        assert_eq!(tips, vec![Some(1.5), Some(0.0), None, Some(2.0)]);
    }

    #[test]
    fn test_labels_are_trimmed() {
        let run = Run {
            restaurant: Some("  Port City Java ".to_string()),
            drop_point: Some(" Talley ".to_string()),
            ..Run::default()
        };
        assert_eq!(run.restaurant_label(), "Port City Java");
        assert_eq!(run.drop_label(), "Talley");
        assert_eq!(RunCard::from(&run).title, "Port City Java → Talley");
    }

    #[test]
    fn test_lenient_run_fields() {
        let run: Run = serde_json::from_value(json!({
            "id": 42,
            "restaurant": "Port City Java",
            "drop_point": "   ",
            "capacity": "4",
            "seats_remaining": null,
            "orders": "not a list"
        }))
        .unwrap();

        assert_eq!(run.id, "42");
        assert_eq!(run.restaurant.as_deref(), Some("Port City Java"));
        assert_eq!(run.drop_point, None);
        assert_eq!(run.drop_label(), UNKNOWN_DROP);
        assert_eq!(run.eta_label(), UNKNOWN_ETA);
        assert_eq!(run.capacity, 4);
        assert_eq!(run.seats_remaining, 0);
        assert!(run.orders.is_empty());
    }

    #[test]
    fn test_non_numeric_capacity_is_zero() {
        let run: Run = serde_json::from_value(json!({"capacity": "lots", "seats_remaining": {}}))
            .unwrap();
        assert_eq!(run.capacity, 0);
        assert_eq!(run.seats_remaining, 0);
    }

    #[test]
    fn test_run_card_projection() {
        let run = Run {
            id: "7".to_string(),
            restaurant: Some("Totable Cafe".to_string()),
            drop_point: Some("Hunt Library".to_string()),
            eta: Some("12:30".to_string()),
            capacity: 4,
            seats_remaining: 1,
            ..Run::default()
        };
        let card = RunCard::from(&run);
        assert_eq!(card.title, "Totable Cafe → Hunt Library");
        assert_eq!(card.subtitle, "ETA 12:30");
        assert_eq!(card.detail, "3 joined · 1 seat left");

        let empty = RunCard::from(&Run::default());
        assert_eq!(empty.title, "Unknown spot → Drop TBD");
        assert_eq!(empty.subtitle, "ETA TBD");
        assert_eq!(empty.detail, "0 joined · 0 seats left");
    }

    #[test]
    fn test_order_customer_label() {
        let order: Order = serde_json::from_value(json!({"user_id": 9, "amount": "12.5"})).unwrap();
        assert_eq!(order.customer_label(), "User #9");
        assert_eq!(order.amount, 12.5);
        assert_eq!(order.status_label(), "pending");

        let order = Order {
            user_email: Some("wolf@ncsu.edu".to_string()),
            user_username: Some("wolf".to_string()),
            ..Order::default()
        };
        assert_eq!(order.customer_label(), "wolf@ncsu.edu");
    }

    #[test]
    fn test_parse_run_list_tolerates_garbage() {
        assert!(parse_run_list(json!({"detail": "nope"})).is_empty());

        let runs = parse_run_list(json!([{"id": 1}, 5, "x", {"id": "b"}]));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].id, "b");
    }

    #[test]
    fn test_peak_hour_out_of_range() {
        let hour: PeakHour = serde_json::from_value(json!({"hour": 30, "demand_score": 1.2})).unwrap();
        assert_eq!(hour.hour, None);
        let hour: PeakHour = serde_json::from_value(json!({"hour": "17"})).unwrap();
        assert_eq!(hour.hour, None);
    }
}
