//! Chat widget markup: bubbles, greeting, action buttons and plan cards.

use comrak::{markdown_to_html, Options};
use ttravels_core::chat::{BookingAction, ChatEntry, PlanCard, QuickAction, Role, SaveState};
use ttravels_shared::html;
use uuid::Uuid;

use crate::trip;

pub const DEFAULT_SUGGESTIONS: [&str; 4] = ["Book a flight", "Find hotels", "Places to visit", "Track my booking"];

/// Markup and visible text of a user message.
pub fn user_content(text: &str) -> (String, String) {
    (format!("<p>{}</p>", html::escape_multiline(text)), text.trim().to_string())
}

/// Assistant text is trusted markup when it looks like HTML, Markdown otherwise.
pub fn assistant_content(text: &str) -> (String, String) {
    let markup = if html::looks_like_markup(text) {
        text.to_string()
    } else {
        markdown_to_html(text, &Options::default())
    };
    let plain = html::plain_text(&markup);
    (markup, plain)
}

pub fn greeting_entry() -> ChatEntry {
    let text = "<p>👋 Hi there! I'm your TTravels Assistant. How can I help you today?</p>";
    let mut entry = ChatEntry::new(Role::Assistant, text, html::plain_text(text));
    entry.quick_actions = vec![
        QuickAction { icon: "ri-mic-line".into(), text: "Search by Voice".into(), action: Some("voice".into()) },
        QuickAction { icon: "ri-lightbulb-line".into(), text: "Travel Suggestions".into(), action: None },
        QuickAction { icon: "ri-calendar-check-line".into(), text: "Manage Bookings".into(), action: None },
    ];
    entry
}

pub fn error_entry(message: &str) -> ChatEntry {
    let (markup, plain) = user_content(&format!("Error: {}", message));
    ChatEntry::new(Role::Assistant, markup, plain)
}

fn quick_action_button(action: &QuickAction) -> String {
    format!(
        r#"<button data-quick-action="{}" class="px-3 py-1 text-sm bg-gray-100 text-gray-700 rounded-full hover:bg-gray-200"><i class="{}"></i> {}</button>"#,
        html::escape(&action.message()),
        html::escape(&action.icon),
        html::escape(&action.text)
    )
}

fn booking_action_button(action: &BookingAction) -> String {
    match &action.url {
        Some(url) => format!(
            r#"<a href="{}" class="px-3 py-1 text-sm bg-primary-600 text-white rounded-full hover:bg-primary-700"><i class="{}"></i> {}</a>"#,
            html::escape(url),
            html::escape(&action.icon),
            html::escape(&action.text)
        ),
        None => format!(
            r#"<button data-quick-action="{}" class="px-3 py-1 text-sm bg-primary-600 text-white rounded-full hover:bg-primary-700"><i class="{}"></i> {}</button>"#,
            html::escape(&action.text),
            html::escape(&action.icon),
            html::escape(&action.text)
        ),
    }
}

/// Suggestion chips under the input; an empty list falls back to the defaults.
pub fn suggestion_chips(suggestions: &[String]) -> String {
    let chip = |s: &str| {
        format!(
            r#"<button data-suggestion="{0}" class="px-3 py-1 text-sm bg-white border border-gray-300 rounded-full hover:bg-gray-50">{0}</button>"#,
            html::escape(s)
        )
    };
    if suggestions.is_empty() {
        DEFAULT_SUGGESTIONS.iter().map(|s| chip(s)).collect()
    } else {
        suggestions.iter().map(|s| chip(s)).collect()
    }
}

fn save_controls(card_id: Uuid, save: &SaveState) -> String {
    match save {
        SaveState::Unsaved => format!(
            r#"<button data-save-card="{}" class="px-3 py-1 text-sm bg-primary-600 text-white rounded-lg hover:bg-primary-700">Save</button>"#,
            card_id
        ),
        SaveState::Saving => {
            r#"<button disabled class="px-3 py-1 text-sm bg-gray-400 text-white rounded-lg">Saving...</button>"#.to_string()
        }
        SaveState::Saved { .. } => r#"<span class="text-sm text-green-700">Saved to your plans ✅</span><button disabled class="px-3 py-1 text-sm bg-green-600 text-white rounded-lg">Saved</button>"#.to_string(),
    }
}

/// Plan card for a chat entry. Rendered from the card model only.
pub fn plan_card(card_id: Uuid, card: &PlanCard) -> String {
    let plan = &card.plan;
    let scope = card_id.to_string();
    let destination = plan.destination().unwrap_or_else(|| "your destination".to_string());

    format!(
        r#"<div class="trip-plan-card bg-white border border-gray-200 rounded-lg p-4 mt-2" data-card="{scope}"><div class="flex justify-between items-center mb-4"><h3 class="text-lg font-bold text-gray-900">Your Trip to {destination}</h3><div class="flex items-center space-x-2">{save}<a href="/dashboard" class="px-3 py-1 text-sm border border-primary-600 text-primary-600 rounded-lg">View Dashboard</a></div></div>{flights}{hotels}{attractions}{itinerary}</div>"#,
        scope = scope,
        destination = html::escape(&destination),
        save = save_controls(card_id, &card.save),
        flights = trip::flight_section(&scope, plan),
        hotels = trip::hotel_section(&scope, plan),
        attractions = trip::attraction_section(plan),
        itinerary = trip::itinerary_section(plan),
    )
}

/// One message bubble with its card and action buttons.
pub fn entry(entry: &ChatEntry) -> String {
    let (wrapper, bubble) = match entry.role {
        Role::User => ("flex justify-end mb-4", "bg-primary-600 text-white rounded-lg px-4 py-2 max-w-xs"),
        Role::Assistant => ("flex justify-start mb-4", "bg-gray-100 text-gray-900 rounded-lg px-4 py-2 max-w-md"),
    };

    let mut body = entry.html.clone();
    if let Some(card) = &entry.card {
        body.push_str(&plan_card(entry.id, card));
    }
    if !entry.quick_actions.is_empty() {
        let buttons: String = entry.quick_actions.iter().map(quick_action_button).collect();
        body.push_str(&format!(r#"<div class="flex flex-wrap gap-2 mt-2">{}</div>"#, buttons));
    }
    if !entry.booking_actions.is_empty() {
        let links: String = entry.booking_actions.iter().map(booking_action_button).collect();
        body.push_str(&format!(r#"<div class="flex flex-wrap gap-2 mt-2">{}</div>"#, links));
    }

    format!(
        r#"<div class="{}" data-entry="{}"><div class="{}">{}</div></div>"#,
        wrapper, entry.id, bubble, body
    )
}

pub fn transcript(entries: &[ChatEntry]) -> String {
    entries.iter().map(entry).collect()
}

/// Unread badge; hidden at zero.
pub fn notification_badge(unread: usize) -> String {
    if unread == 0 {
        return r#"<span class="notification-badge hidden"></span>"#.to_string();
    }
    format!(
        r#"<span class="notification-badge absolute -top-1 -right-1 bg-red-500 text-white text-xs rounded-full h-5 w-5 flex items-center justify-center">{}</span>"#,
        unread
    )
}
