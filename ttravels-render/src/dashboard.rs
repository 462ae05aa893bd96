//! Customer dashboard: booking cards, saved plan cards and the plan dialog.

use ttravels_core::dashboard::{BookingCard, BookingKind, PlanDetail, SavedPlanCard};
use ttravels_core::status::BookingStatus;
use ttravels_shared::{format, html};

use crate::badge;

pub fn loading(what: &str) -> String {
    format!(
        r#"<div class="text-center py-8 text-gray-500">Loading your {}...</div>"#,
        html::escape(what)
    )
}

pub fn error(message: &str) -> String {
    format!(r#"<div class="text-center py-8 text-red-600">{}</div>"#, html::escape(message))
}

pub fn no_bookings() -> String {
    r#"<div class="text-center py-12"><h3 class="text-lg font-medium text-gray-900 mb-2">No bookings found</h3><p class="text-gray-600 mb-4">You haven't made any bookings yet.</p><a href="/" class="px-4 py-2 bg-primary-600 text-white rounded-lg hover:bg-primary-700">Start Booking</a></div>"#.to_string()
}

pub fn no_saved_plans() -> String {
    r#"<div class="text-center py-12"><h3 class="text-lg font-medium text-gray-900 mb-2">No saved trip plans yet</h3><a href="/ai-assistant" class="px-4 py-2 bg-primary-600 text-white rounded-lg hover:bg-primary-700">Plan a Trip with AI</a></div>"#.to_string()
}

pub fn welcome(name: Option<&str>) -> String {
    format!("Welcome back, {}!", html::escape(name.unwrap_or("Traveller")))
}

fn icon(kind: &BookingKind) -> &'static str {
    match kind {
        BookingKind::Flights => "ri-flight-takeoff-line",
        BookingKind::Hotels => "ri-hotel-line",
        BookingKind::Trains => "ri-train-line",
        BookingKind::Buses => "ri-bus-line",
        BookingKind::Cars => "ri-car-line",
        BookingKind::Other(_) => "ri-file-list-line",
    }
}

fn plural(n: u32, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn when(card: &BookingCard) -> Option<String> {
    let date = card.date.as_deref().map(format::format_date);
    let time = card.time.as_deref().map(format::format_time);
    match (date, time) {
        (Some(d), Some(t)) => Some(format!("{} at {}", d, t)),
        (Some(d), None) => Some(d),
        (None, Some(t)) => Some(t),
        (None, None) => None,
    }
}

/// Type-specific detail lines of a booking card.
fn detail_lines(card: &BookingCard) -> Vec<String> {
    let mut lines = Vec::new();
    match card.kind {
        BookingKind::Flights => {
            if let Some(number) = &card.flight_number {
                lines.push(format!("Flight {}", number));
            }
            lines.extend(when(card));
            lines.push(plural(card.passengers, "passenger"));
        }
        BookingKind::Hotels => {
            lines.extend(card.location.clone());
            if let (Some(check_in), Some(check_out)) = (&card.check_in, &card.check_out) {
                lines.push(format!("{} - {}", format::format_date(check_in), format::format_date(check_out)));
            }
            lines.push(plural(card.guests, "guest"));
        }
        BookingKind::Trains => {
            if let Some(number) = &card.train_number {
                lines.push(format!("Train {}", number));
            }
            lines.extend(when(card));
            lines.push(plural(card.passengers, "passenger"));
        }
        BookingKind::Buses => {
            lines.extend(card.operator.clone());
            lines.extend(when(card));
            lines.push(plural(card.passengers, "passenger"));
        }
        BookingKind::Cars | BookingKind::Other(_) => lines.extend(when(card)),
    }
    lines
}

pub fn booking_card(card: &BookingCard) -> String {
    let id = html::escape(&card.id);
    let details: String = detail_lines(card)
        .iter()
        .map(|line| format!(r#"<p class="text-sm text-gray-600">{}</p>"#, html::escape(line)))
        .collect();

    let mut actions = format!(
        r#"<button data-action="view" data-id="{}" class="text-primary-600 hover:text-primary-800 text-sm font-medium">View Details</button>"#,
        id
    );
    match card.status {
        BookingStatus::Confirmed | BookingStatus::Pending => actions.push_str(&format!(
            r#"<button data-action="cancel" data-id="{}" class="text-red-600 hover:text-red-800 text-sm font-medium">Cancel</button>"#,
            id
        )),
        BookingStatus::Completed => actions.push_str(&format!(
            r#"<button data-action="download" data-id="{}" class="text-gray-600 hover:text-gray-800 text-sm font-medium">Download</button>"#,
            id
        )),
        _ => {}
    }

    let booked = card
        .booking_date
        .as_deref()
        .map(|d| format!(r#"<p class="text-xs text-gray-500">Booked on {}</p>"#, html::escape(&format::format_date(d))))
        .unwrap_or_default();

    format!(
        r#"<div class="bg-white rounded-lg shadow-sm border border-gray-200 p-6" data-booking="{id}"><div class="flex justify-between items-start mb-4"><div class="flex items-center"><i class="{icon} text-2xl text-primary-600 mr-3"></i><div><h3 class="font-semibold text-gray-900">{title}</h3><p class="text-sm text-gray-500">Booking ID: {id}</p></div></div>{badge}</div><div class="space-y-1 mb-4">{details}</div><div class="flex justify-between items-center pt-4 border-t border-gray-100"><div><p class="text-lg font-bold text-gray-900">{price}</p>{booked}</div><div class="flex space-x-3">{actions}</div></div></div>"#,
        id = id,
        icon = icon(&card.kind),
        title = html::escape(&card.title),
        badge = badge::pill(badge::booking_class(&card.status), card.status.as_str()),
        details = details,
        price = format::format_inr(card.price),
        booked = booked,
        actions = actions,
    )
}

pub fn booking_grid(cards: &[&BookingCard]) -> String {
    if cards.is_empty() {
        return no_bookings();
    }
    let items: String = cards.iter().map(|c| booking_card(c)).collect();
    format!(r#"<div class="grid grid-cols-1 md:grid-cols-2 gap-6">{}</div>"#, items)
}

pub fn saved_plan_card(card: &SavedPlanCard) -> String {
    let id = html::escape(&card.id);
    let dates = match (&card.start_date, &card.end_date) {
        (Some(start), Some(end)) => format!(
            r#"<p class="text-sm text-gray-600">{} - {}</p>"#,
            html::escape(&format::format_date(start)),
            html::escape(&format::format_date(end))
        ),
        _ => String::new(),
    };
    let mut chips: String = card
        .visible_highlights()
        .iter()
        .map(|h| format!(r#"<span class="px-2 py-1 text-xs bg-primary-50 text-primary-700 rounded-full">{}</span>"#, html::escape(h)))
        .collect();
    if card.hidden_highlights() > 0 {
        chips.push_str(&format!(
            r#"<span class="px-2 py-1 text-xs bg-gray-100 text-gray-600 rounded-full">+{} more</span>"#,
            card.hidden_highlights()
        ));
    }
    let cost = if card.estimated_cost > 0.0 {
        format!(r#"<p class="font-semibold text-gray-900">{}</p>"#, format::format_inr(card.estimated_cost))
    } else {
        String::new()
    };
    let saved = card
        .saved_date
        .as_deref()
        .map(|d| format!(r#"<p class="text-xs text-gray-500">Saved {}</p>"#, html::escape(&format::format_date(d))))
        .unwrap_or_default();

    format!(
        r#"<div class="bg-white rounded-lg shadow-sm border border-gray-200 overflow-hidden" data-plan="{id}"><img src="{image}" alt="{destination}" class="w-full h-40 object-cover"><div class="p-4"><div class="flex justify-between items-start mb-2"><h3 class="font-semibold text-gray-900">{destination}</h3><span class="text-sm text-gray-500">{duration}</span></div>{dates}<p class="text-sm text-gray-700 mb-3 line-clamp-2">{summary}</p><div class="flex flex-wrap gap-1 mb-3">{chips}</div><div class="flex justify-between items-center">{cost}{saved}<div class="flex space-x-2"><button data-action="view-plan" data-id="{id}" class="text-primary-600 text-sm font-medium">View</button><a href="/edit-trip/{id}" class="text-indigo-600 text-sm font-medium">Edit</a><button data-action="delete-plan" data-id="{id}" class="text-red-600 text-sm font-medium">Delete</button></div></div></div></div>"#,
        id = id,
        image = html::escape(&card.image_url),
        destination = html::escape(&card.destination),
        duration = html::escape(&card.duration),
        dates = dates,
        summary = html::escape(&card.summary),
        chips = chips,
        cost = cost,
        saved = saved,
    )
}

pub fn saved_plan_grid(cards: &[SavedPlanCard]) -> String {
    if cards.is_empty() {
        return no_saved_plans();
    }
    let items: String = cards.iter().map(saved_plan_card).collect();
    format!(
        r#"<h2 class="text-xl font-semibold text-gray-900 mb-4">My Saved Trip Plans</h2><div class="grid grid-cols-1 md:grid-cols-3 gap-6">{}</div>"#,
        items
    )
}

/// Body of the saved-plan dialog.
pub fn plan_modal(detail: &PlanDetail) -> String {
    let hotels = if detail.hotels.is_empty() {
        r#"<p class="text-gray-500">No hotels available.</p>"#.to_string()
    } else {
        detail
            .hotels
            .iter()
            .map(|h| {
                format!(
                    r#"<div class="p-3 border border-gray-200 rounded-lg"><p class="font-medium text-gray-900">{}</p><p class="text-sm text-gray-600">Rating: {}</p><p class="text-sm text-gray-600">Price: {}</p></div>"#,
                    html::escape(&h.name),
                    html::escape(h.rating.as_deref().unwrap_or("N/A")),
                    html::escape(&h.price)
                )
            })
            .collect()
    };

    format!(
        r#"<div class="space-y-6"><h3 class="text-xl font-bold text-gray-900">{title}</h3><div><h4 class="font-semibold text-gray-900 mb-2">Itinerary</h4><div class="text-sm text-gray-700">{itinerary}</div></div><div><h4 class="font-semibold text-gray-900 mb-2">Hotels</h4><div class="space-y-2">{hotels}</div></div><div class="flex justify-end pt-4 border-t"><a href="{edit}" class="px-4 py-2 bg-primary-600 text-white rounded-lg hover:bg-primary-700">Edit Trip</a></div></div>"#,
        title = html::escape(&detail.title),
        itinerary = html::escape_multiline(&detail.itinerary),
        hotels = hotels,
        edit = html::escape(&detail.edit_url()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use ttravels_core::api::SavedPlanDocument;

    #[test]
    fn test_flight_card_details() {
        let card = BookingCard::from_document(&json!({
            "$id": "B1",
            "type": "flight",
            "status": "confirmed",
            "fare_total": 5400,
            "details": "{\"flight\": {\"airline\": \"IndiGo\", \"flight_number\": \"6E 201\", \"date\": \"2025-03-01\", \"departure_time\": \"06:30\", \"passengers\": 2}}"
        }));
        let html = booking_card(&card);
        assert!(html.contains("IndiGo"));
        assert!(html.contains("1 Mar 2025 at 6:30 AM"));
        assert!(html.contains("2 passengers"));
        assert!(html.contains("₹5,400"));
        assert!(html.contains(r#"data-action="cancel""#));
    }

    #[test]
    fn test_completed_card_offers_download() {
        let card = BookingCard::from_document(&json!({"$id": "H1", "type": "hotel", "status": "completed"}));
        let html = booking_card(&card);
        assert!(html.contains(r#"data-action="download""#));
        assert!(!html.contains(r#"data-action="cancel""#));
        assert!(html.contains("1 guest"));
    }

    #[test]
    fn test_empty_states() {
        assert!(booking_grid(&[]).contains("No bookings found"));
        assert!(saved_plan_grid(&[]).contains("Plan a Trip with AI"));
        assert!(error("boom").contains("text-red-600"));
    }

    #[test]
    fn test_saved_plan_highlight_overflow() {
        let card = SavedPlanCard::from_document(&json!({
            "id": "p1",
            "trip_plan": {"details": {"destination": "Kerala", "days": 5}, "highlights": ["A", "B", "C", "D", "E"]}
        }));
        let html = saved_plan_card(&card);
        assert!(html.contains("+2 more"));
        assert!(html.contains("5 Days"));
        assert!(html.contains(r#"href="/edit-trip/p1""#));
    }

    #[test]
    fn test_plan_modal_defaults() {
        let doc = SavedPlanDocument { id: None, title: None, trip_plan: json!({}) };
        let detail = PlanDetail::from_document("p9", &doc);
        let html = plan_modal(&detail);
        assert!(html.contains("Trip Details"));
        assert!(html.contains("No itinerary available."));
        assert!(html.contains("No hotels available."));
        assert!(html.contains("/edit-trip/p9"));
    }
}
