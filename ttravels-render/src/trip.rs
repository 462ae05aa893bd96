//! Trip plan sections shared by the chat plan card and the trip editor.

use std::sync::LazyLock;

use regex::Regex;
use ttravels_core::trip_plan::{Attraction, FlightOption, HotelOption, TripPlan};
use ttravels_shared::html;

/// Flights listed on a chat card.
pub const CARD_FLIGHTS: usize = 5;
/// Attractions listed on a chat card.
pub const CARD_ATTRACTIONS: usize = 5;

const SELECTED: &str = "ring-2 ring-primary-600 bg-primary-50";
const SELECTED_BADGE: &str =
    r#"<span class="px-2 py-1 text-xs font-semibold rounded-full bg-green-100 text-green-800">Selected</span>"#;

static DAY_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(Day \d+:)").ok());

/// Escaped itinerary with line breaks kept and `Day N:` labels in bold.
pub fn itinerary_html(text: &str) -> String {
    let escaped = html::escape(text);
    let bolded = match DAY_LABEL.as_ref() {
        Some(re) => re.replace_all(&escaped, "<strong>$1</strong>").into_owned(),
        None => escaped,
    };
    bolded.replace('\n', "<br>")
}

fn select_control(scope: &str, kind: &str, index: usize, selected: bool) -> String {
    if selected {
        return SELECTED_BADGE.to_string();
    }
    format!(
        r#"<button data-scope="{}" data-select="{}" data-index="{}" class="px-3 py-1 text-sm bg-primary-600 text-white rounded-lg hover:bg-primary-700">Select</button>"#,
        html::escape(scope),
        kind,
        index
    )
}

fn ring(selected: bool) -> &'static str {
    if selected {
        SELECTED
    } else {
        "border-gray-200"
    }
}

fn price_line(price: &str, currency: Option<&str>) -> String {
    match currency {
        Some(currency) => format!("₹{} {}", html::escape(price), html::escape(currency)),
        None => format!("₹{}", html::escape(price)),
    }
}

pub fn flight_item(scope: &str, index: usize, flight: &FlightOption, selected: bool) -> String {
    let mut lines = String::new();
    if let Some(time) = &flight.departure_time {
        lines.push_str(&format!(r#"<p class="text-sm text-gray-600">Departure: {}</p>"#, html::escape(time)));
    }
    if let Some(time) = &flight.arrival_time {
        lines.push_str(&format!(r#"<p class="text-sm text-gray-600">Arrival: {}</p>"#, html::escape(time)));
    }
    if let Some(duration) = &flight.duration {
        lines.push_str(&format!(r#"<p class="text-sm text-gray-600">Duration: {}</p>"#, html::escape(duration)));
    }

    format!(
        r#"<div class="p-3 border rounded-lg {ring}"><div class="flex justify-between items-start"><div><p class="font-medium text-gray-900">{airline}</p><p class="text-sm text-gray-600">{origin} → {destination}</p>{lines}</div><div class="text-right"><p class="font-semibold text-primary-600">{price}</p>{control}</div></div></div>"#,
        ring = ring(selected),
        airline = html::escape(&flight.airline),
        origin = html::escape(&flight.origin),
        destination = html::escape(&flight.destination),
        lines = lines,
        price = price_line(&flight.price, flight.currency.as_deref()),
        control = select_control(scope, "flight", index, selected),
    )
}

pub fn hotel_item(scope: &str, index: usize, hotel: &HotelOption, selected: bool) -> String {
    let rating = match (&hotel.rating, &hotel.reviews) {
        (Some(r), Some(n)) => format!(r#"<p class="text-sm text-gray-600">⭐ {} ({} reviews)</p>"#, html::escape(r), html::escape(n)),
        (Some(r), None) => format!(r#"<p class="text-sm text-gray-600">⭐ {}</p>"#, html::escape(r)),
        _ => String::new(),
    };
    let address = hotel
        .address
        .as_deref()
        .map(|a| format!(r#"<p class="text-xs text-gray-500">{}</p>"#, html::escape(a)))
        .unwrap_or_default();

    format!(
        r#"<div class="p-3 border rounded-lg {ring}"><div class="flex justify-between items-start"><div><p class="font-medium text-gray-900">{name}</p>{rating}{address}</div><div class="text-right"><p class="font-semibold text-primary-600">{price}</p>{control}</div></div></div>"#,
        ring = ring(selected),
        name = html::escape(&hotel.name),
        rating = rating,
        address = address,
        price = price_line(&hotel.price, None),
        control = select_control(scope, "hotel", index, selected),
    )
}

fn attraction_item(attraction: &Attraction) -> String {
    let rating = attraction
        .rating
        .as_deref()
        .map(|r| format!(" <span class=\"text-sm text-gray-600\">⭐ {}</span>", html::escape(r)))
        .unwrap_or_default();
    format!(r#"<li class="text-gray-700">{}{}</li>"#, html::escape(&attraction.name), rating)
}

/// Flights section of a plan card, first [`CARD_FLIGHTS`] only.
pub fn flight_section(scope: &str, plan: &TripPlan) -> String {
    if plan.flights.is_empty() {
        return String::new();
    }
    let items: String = plan
        .flight_options()
        .iter()
        .enumerate()
        .take(CARD_FLIGHTS)
        .map(|(i, f)| flight_item(scope, i, f, plan.is_flight_selected(f)))
        .collect();
    format!(
        r#"<div class="mb-4"><h4 class="font-semibold text-gray-900 mb-2">Flight Options ({})</h4><div class="space-y-2">{}</div></div>"#,
        plan.flights.len(),
        items
    )
}

pub fn hotel_section(scope: &str, plan: &TripPlan) -> String {
    if plan.hotels.is_empty() {
        return String::new();
    }
    let items: String = plan
        .hotel_options()
        .iter()
        .enumerate()
        .map(|(i, h)| hotel_item(scope, i, h, plan.is_hotel_selected(h)))
        .collect();
    format!(
        r#"<div class="mb-4"><h4 class="font-semibold text-gray-900 mb-1">Hotel Options ({})</h4><p class="text-sm text-gray-500 mb-2">Select a hotel to add to your trip plan</p><div class="space-y-2">{}</div></div>"#,
        plan.hotels.len(),
        items
    )
}

pub fn attraction_section(plan: &TripPlan) -> String {
    if plan.attractions.is_empty() {
        return String::new();
    }
    let items: String = plan
        .attraction_options()
        .iter()
        .take(CARD_ATTRACTIONS)
        .map(attraction_item)
        .collect();
    format!(
        r#"<div class="mb-4"><h4 class="font-semibold text-gray-900 mb-2">Top Attractions to Visit</h4><ul class="list-disc list-inside space-y-1">{}</ul></div>"#,
        items
    )
}

pub fn itinerary_section(plan: &TripPlan) -> String {
    let days = plan.days().unwrap_or_else(|| "N".to_string());
    format!(
        r#"<div class="mb-4"><h4 class="font-semibold text-gray-900 mb-2">Your {}-Day Itinerary</h4><div class="text-sm text-gray-700">{}</div></div>"#,
        html::escape(&days),
        itinerary_html(&plan.itinerary_text())
    )
}

// ============================================================================
// Trip editor
// ============================================================================

/// Every hotel of the plan with its selection state, or the empty notice.
pub fn editor_hotels(plan: &TripPlan) -> String {
    if plan.hotels.is_empty() {
        return r#"<p class="text-gray-500">No hotels available.</p>"#.to_string();
    }
    plan.hotel_options()
        .iter()
        .enumerate()
        .map(|(i, h)| hotel_item("editor", i, h, plan.is_hotel_selected(h)))
        .collect()
}

pub fn editor_flights(plan: &TripPlan) -> String {
    if plan.flights.is_empty() {
        return r#"<p class="text-gray-500">No flights available.</p>"#.to_string();
    }
    plan.flight_options()
        .iter()
        .enumerate()
        .map(|(i, f)| flight_item("editor", i, f, plan.is_flight_selected(f)))
        .collect()
}

pub fn editor_header(plan: &TripPlan) -> String {
    let destination = plan.destination().unwrap_or_else(|| "your destination".to_string());
    format!(
        r#"<h1 class="text-2xl font-bold text-gray-900">Edit Trip to {}</h1>"#,
        html::escape(&destination)
    )
}

/// One bubble of the editor's side chat. Text is always escaped.
pub fn editor_message(from_user: bool, text: &str) -> String {
    let (align, colour) = if from_user {
        ("justify-end", "bg-primary-600 text-white")
    } else {
        ("justify-start", "bg-gray-100 text-gray-800")
    };
    format!(
        r#"<div class="flex {}"><div class="max-w-xs px-4 py-2 rounded-lg {}">{}</div></div>"#,
        align,
        colour,
        html::escape_multiline(text)
    )
}

/// Save button label for the current in-flight state.
pub fn save_button_label(saving: bool) -> &'static str {
    if saving {
        "Saving..."
    } else {
        "Save Changes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan() -> TripPlan {
        TripPlan::from_value(&json!({
            "details": {"destination": "Jaipur", "days": 3},
            "flights": (0..7).map(|i| json!({"airline": format!("Air {}", i), "price": 4000 + i})).collect::<Vec<_>>(),
            "hotels": [{"name": "Rambagh <Palace>", "price": 9000, "rating": 4.7, "reviews": 1200}, {"name": "Pearl"}],
            "itinerary_text": "Day 1: Amber Fort\nDay 2: City Palace & Hawa Mahal"
        }))
    }

    #[test]
    fn test_itinerary_bolds_day_labels() {
        let html = itinerary_html("Day 1: Arrive\nDay 12: Leave <early>");
        assert_eq!(
            html,
            "<strong>Day 1:</strong> Arrive<br><strong>Day 12:</strong> Leave &lt;early&gt;"
        );
    }

    #[test]
    fn test_flight_section_caps_list_but_counts_all() {
        let section = flight_section("card-1", &plan());
        assert!(section.contains("Flight Options (7)"));
        assert_eq!(section.matches(r#"data-select="flight""#).count(), CARD_FLIGHTS);
    }

    #[test]
    fn test_selected_hotel_shows_badge() {
        let mut plan = plan();
        plan.select_hotel(1).unwrap();
        let section = hotel_section("card-1", &plan);
        assert!(section.contains("Rambagh &lt;Palace&gt;"));
        assert!(section.contains("⭐ 4.7 (1200 reviews)"));
        assert_eq!(section.matches(">Selected</span>").count(), 1);
        assert_eq!(section.matches(r#"data-select="hotel""#).count(), 1);
        assert!(section.contains(SELECTED));
    }

    #[test]
    fn test_editor_empty_lists() {
        let empty = TripPlan::from_value(&json!({"details": {"destination": "Agra"}}));
        assert!(editor_hotels(&empty).contains("No hotels available."));
        assert!(editor_flights(&empty).contains("No flights available."));
        assert!(itinerary_section(&empty).contains("Here&#039;s your -day trip plan to Agra."));
    }
}
