//! Terminal and JSON rendering.
//!
//! This module turns scout replies, transcripts and run details into the
//! text printed by the CLI.

use crate::models::{ChatReply, Run, RunCard};
use crate::scout::transcript::{ChatMessage, Sender};
use anyhow::Result;
use serde::Serialize;

/// Render a reply as terminal text: the message lines, then one block per card.
pub fn render_reply(reply: &ChatReply) -> String {
    let mut output = String::new();

    output.push_str(&reply.text);
    output.push('\n');

    if !reply.cards.is_empty() {
        output.push('\n');
        for card in &reply.cards {
            output.push_str(&render_card(card));
        }
    }

    output
}

/// Render a single run card.
fn render_card(card: &RunCard) -> String {
    let mut block = String::new();

    block.push_str(&format!("  🍱 {}\n", card.title));
    block.push_str(&format!("     {}\n", card.subtitle));
    block.push_str(&format!("     {}\n", card.detail));
    if !card.id.is_empty() {
        block.push_str(&format!("     View run ↗ /runs/{}\n", card.id));
    }

    block
}

/// Render the whole transcript, oldest first.
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    let mut output = String::new();

    for message in messages {
        let speaker = match message.from {
            Sender::User => "You",
            Sender::Ai => "Scout",
        };
        let stamp = message
            .sent_at
            .map(|t| format!(" ({})", t.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default();

        output.push_str(&format!("{}{}:\n", speaker, stamp));
        for line in message.text.lines() {
            output.push_str(&format!("  {}\n", line));
        }
        for card in &message.cards {
            output.push_str(&format!("  - {}\n", card));
        }
        output.push('\n');
    }

    output
}

/// Render run details for the load command.
pub fn render_run_details(run: &Run) -> String {
    let mut section = String::new();

    section.push_str(&format!("{} → {}\n", run.restaurant_label(), run.drop_label()));
    section.push_str(&format!("  ETA: {}\n", run.eta_label()));
    if let Some(ref status) = run.status {
        section.push_str(&format!("  Status: {}\n", status));
    }
    if let Some(ref runner) = run.runner_username {
        section.push_str(&format!("  Runner: {}\n", runner));
    }
    section.push_str(&format!(
        "  Seats: {} joined, {} left of {}\n",
        run.joined(),
        run.seats_remaining,
        run.capacity
    ));

    if run.orders.is_empty() {
        section.push_str("  No orders yet.\n");
    } else {
        section.push_str(&format!("  Orders ({}):\n", run.orders.len()));
        for order in &run.orders {
            section.push_str(&format!(
                "    - {}: {} ${:.2} [{}]\n",
                order.customer_label(),
                order.items.as_deref().unwrap_or("Order"),
                order.amount,
                order.status_label()
            ));
        }
    }

    section
}

/// Pretty JSON for any serializable output.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Order;

    fn create_test_reply() -> ChatReply {
        ChatReply::with_cards(
            "These runs are almost full — grab a seat quickly:",
            vec![RunCard {
                id: "12".to_string(),
                title: "Totable Cafe → Hunt Library".to_string(),
                subtitle: "ETA 12:30".to_string(),
                detail: "3 joined · 1 seat left".to_string(),
            }],
        )
    }

    #[test]
    fn test_render_reply() {
        let text = render_reply(&create_test_reply());

        assert!(text.starts_with("These runs are almost full"));
        assert!(text.contains("Totable Cafe → Hunt Library"));
        assert!(text.contains("3 joined · 1 seat left"));
        assert!(text.contains("/runs/12"));
    }

    #[test]
    fn test_render_reply_without_cards() {
        let text = render_reply(&ChatReply::text("Happy to help!"));
        assert_eq!(text, "Happy to help!\n");
    }

    #[test]
    fn test_render_transcript() {
        let messages = vec![
            ChatMessage::greeting(),
            ChatMessage::user("seats?"),
            ChatMessage::ai(create_test_reply()),
        ];

        let text = render_transcript(&messages);
        assert!(text.starts_with("Scout:\n  Hi! I am your campus-run scout."));
        assert!(text.contains("You ("));
        assert!(text.contains("  - [12] Totable Cafe → Hunt Library"));
    }

    #[test]
    fn test_render_run_details() {
        let run = Run {
            restaurant: Some("Talley".to_string()),
            capacity: 4,
            seats_remaining: 3,
            orders: vec![Order {
                items: Some("Combo meal".to_string()),
                amount: 18.0,
                user_username: Some("wolfie".to_string()),
                ..Order::default()
            }],
            ..Run::default()
        };

        let text = render_run_details(&run);
        assert!(text.contains("Talley → Drop TBD"));
        assert!(text.contains("Seats: 1 joined, 3 left of 4"));
        assert!(text.contains("wolfie: Combo meal $18.00 [pending]"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&create_test_reply()).unwrap();
        assert!(json.contains("\"text\""));
        assert!(json.contains("\"cards\""));
    }
}
