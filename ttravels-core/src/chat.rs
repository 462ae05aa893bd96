//! Chat transcript model and the normalized assistant reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ttravels_shared::json;
use uuid::Uuid;

use crate::trip_plan::TripPlan;

/// Format version of the persisted transcript.
pub const TRANSCRIPT_VERSION: u32 = 1;

pub fn new_conversation_id(now: DateTime<Utc>) -> String {
    format!("default_{}", now.timestamp_millis())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Save progress of a plan card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveState {
    #[default]
    Unsaved,
    Saving,
    Saved { id: Option<String> },
}

/// A trip plan shown inside the chat, with its own selection and save state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCard {
    pub plan: TripPlan,
    #[serde(default)]
    pub save: SaveState,
}

impl PlanCard {
    pub fn new(plan: TripPlan) -> Self {
        Self { plan, save: SaveState::Unsaved }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    #[serde(default)]
    pub icon: String,
    pub text: String,
    #[serde(default)]
    pub action: Option<String>,
}

impl QuickAction {
    /// Message sent when the button is pressed.
    pub fn message(&self) -> String {
        match self.action.as_deref() {
            Some("book") => format!("I want to {}", self.text.to_lowercase()),
            _ => self.text.clone(),
        }
    }
}

/// Button that opens a booking page, or sends its text when it has no URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingAction {
    #[serde(default)]
    pub icon: String,
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: Uuid,
    pub role: Role,
    /// Rendered bubble content.
    pub html: String,
    /// Visible text of `html`, compared when deduplicating.
    pub plain_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<PlanCard>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_actions: Vec<QuickAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub booking_actions: Vec<BookingAction>,
}

impl ChatEntry {
    pub fn new(role: Role, html: impl Into<String>, plain_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            html: html.into(),
            plain_text: plain_text.into().trim().to_string(),
            card: None,
            quick_actions: Vec::new(),
            booking_actions: Vec::new(),
        }
    }

    pub fn with_card(mut self, card: PlanCard) -> Self {
        self.card = Some(card);
        self
    }
}

/// Ordered chat history for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default = "default_version")]
    pub version: u32,
    pub conversation_id: String,
    #[serde(default)]
    entries: Vec<ChatEntry>,
}

fn default_version() -> u32 {
    TRANSCRIPT_VERSION
}

impl Transcript {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            conversation_id: conversation_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry. An assistant entry whose visible text repeats the
    /// assistant entry directly before it is dropped; returns whether the
    /// entry was added.
    pub fn push(&mut self, entry: ChatEntry) -> bool {
        if entry.role == Role::Assistant && !entry.plain_text.is_empty() {
            if let Some(last) = self.entries.last() {
                if last.role == Role::Assistant && last.plain_text == entry.plain_text {
                    return false;
                }
            }
        }
        self.entries.push(entry);
        true
    }

    pub fn get(&self, id: Uuid) -> Option<&ChatEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut ChatEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// The last entry, when it is the assistant's. Action buttons attach here.
    pub fn last_assistant_mut(&mut self) -> Option<&mut ChatEntry> {
        self.entries.last_mut().filter(|e| e.role == Role::Assistant)
    }

    /// Text read aloud by the speaker button.
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.entries
            .last()
            .filter(|e| e.role == Role::Assistant && !e.plain_text.is_empty())
            .map(|e| e.plain_text.as_str())
    }
}

/// An assistant response reduced to what the widget shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    pub error: Option<String>,
    pub text: Option<String>,
    pub transcribed_text: Option<String>,
    pub audio: Option<String>,
    pub trip_plan: Option<TripPlan>,
    pub hotel_results: Vec<Value>,
    pub suggestions: Vec<String>,
    pub quick_actions: Vec<QuickAction>,
    pub booking_actions: Vec<BookingAction>,
}

impl ChatReply {
    /// Fields may sit at the top level or under `response_data`.
    pub fn from_response(doc: &Value) -> Self {
        let plan = ["/trip_plan", "/response_data/trip_plan"]
            .iter()
            .filter_map(|p| doc.pointer(p))
            .find(|v| !v.is_null())
            .map(TripPlan::from_value)
            .filter(TripPlan::has_details);

        let hotels = ["/hotel_results", "/response_data/hotel_results"]
            .iter()
            .map(|p| json::array(doc, p))
            .find(|a| !a.is_empty())
            .unwrap_or(&[])
            .iter()
            .map(|h| match h {
                Value::String(raw) => serde_json::from_str(raw).unwrap_or(Value::Null),
                other => other.clone(),
            })
            .filter(Value::is_object)
            .collect();

        Self {
            error: json::text(doc.get("error")),
            text: json::first_text(doc, &["/reply", "/reply_text"]),
            transcribed_text: json::text(doc.get("transcribed_text")),
            audio: json::text(doc.get("audio")),
            trip_plan: plan,
            hotel_results: hotels,
            suggestions: json::strings(doc, "/response_data/suggestions"),
            quick_actions: actions(doc, "/response_data/quick_actions"),
            booking_actions: actions(doc, "/response_data/booking_actions"),
        }
    }
}

fn actions<T: for<'de> Deserialize<'de>>(doc: &Value, pointer: &str) -> Vec<T> {
    json::array(doc, pointer)
        .iter()
        .filter_map(|a| serde_json::from_value(a.clone()).ok())
        .collect()
}

/// Notifications without a truthy `read` flag.
pub fn unread_count(notifications: &[Value]) -> usize {
    notifications
        .iter()
        .filter(|n| json::text(n.get("read")).is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assistant(text: &str) -> ChatEntry {
        ChatEntry::new(Role::Assistant, format!("<p>{}</p>", text), text)
    }

    #[test]
    fn test_consecutive_assistant_duplicates_are_dropped() {
        let mut transcript = Transcript::new("default_1");
        assert!(transcript.push(assistant("Here are some hotels")));
        assert!(!transcript.push(assistant("Here are some hotels")));
        assert_eq!(transcript.entries().len(), 1);

        assert!(transcript.push(ChatEntry::new(Role::User, "again", "again")));
        assert!(transcript.push(ChatEntry::new(Role::User, "again", "again")));
        assert!(transcript.push(assistant("Here are some hotels")));
        assert_eq!(transcript.entries().len(), 4);
    }

    #[test]
    fn test_blank_assistant_entries_are_kept() {
        let mut transcript = Transcript::new("default_1");
        assert!(transcript.push(assistant("")));
        assert!(transcript.push(assistant("  ")));
        assert_eq!(transcript.entries().len(), 2);
    }

    #[test]
    fn test_transcript_persists_cards() {
        let mut transcript = Transcript::new("default_42");
        let plan = TripPlan::from_value(&json!({"details": {"destination": "Goa"}, "hotels": [{"name": "Taj"}]}));
        let entry = assistant("Your Trip to Goa").with_card(PlanCard::new(plan));
        let id = entry.id;
        transcript.push(entry);

        let stored = serde_json::to_string(&transcript).unwrap();
        let mut restored: Transcript = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, transcript);

        let card = restored.get_mut(id).and_then(|e| e.card.as_mut()).unwrap();
        card.plan.select_hotel(0).unwrap();
        card.save = SaveState::Saved { id: Some("p1".into()) };
        assert!(restored.get(id).unwrap().card.as_ref().unwrap().plan.selected_hotel.is_some());
    }

    #[test]
    fn test_reply_reads_nested_fields() {
        let reply = ChatReply::from_response(&json!({
            "reply_text": "Planned!",
            "response_data": {
                "trip_plan": {"details": {"destination": "Kerala", "days": 5}},
                "hotel_results": ["{\"name\": \"Backwater Inn\"}", {"name": "Kumarakom Lake"}, "junk"],
                "suggestions": ["Find hotels", "Book a flight"],
                "quick_actions": [{"icon": "ri-flight-takeoff-line", "text": "Book Flight", "action": "book"}],
                "booking_actions": [{"text": "Open hotels", "url": "/hotels"}]
            }
        }));
        assert_eq!(reply.text.as_deref(), Some("Planned!"));
        assert_eq!(reply.trip_plan.unwrap().destination().as_deref(), Some("Kerala"));
        assert_eq!(reply.hotel_results.len(), 2);
        assert_eq!(reply.suggestions.len(), 2);
        assert_eq!(reply.quick_actions[0].message(), "I want to book flight");
        assert_eq!(reply.booking_actions[0].url.as_deref(), Some("/hotels"));
    }

    #[test]
    fn test_reply_without_plan_details() {
        let reply = ChatReply::from_response(&json!({"reply": "Hi", "trip_plan": {"flights": []}, "error": ""}));
        assert!(reply.trip_plan.is_none());
        assert!(reply.error.is_none());

        let failed = ChatReply::from_response(&json!({"error": "quota exceeded"}));
        assert_eq!(failed.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_unread_notifications() {
        let notes = [json!({"read": true}), json!({"read": false}), json!({"title": "x"})];
        assert_eq!(unread_count(&notes), 2);
    }

    #[test]
    fn test_conversation_id_format() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(new_conversation_id(now), "default_1700000000123");
    }
}
