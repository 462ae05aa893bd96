//! Flight search page: autocomplete dropdown, result cards and status panels.

use regex::RegexBuilder;
use ttravels_core::airports::Airport;
use ttravels_core::flights::FlightResult;
use ttravels_shared::{format, html};

pub const LOGO_PLACEHOLDER: &str = "https://via.placeholder.com/40";

/// Escapes `text` and wraps case-insensitive matches of `query` in a highlight span.
pub fn highlight(text: &str, query: &str) -> String {
    let escaped = html::escape(text);
    let needle = html::escape(query.trim());
    if needle.is_empty() {
        return escaped;
    }
    match RegexBuilder::new(&format!("({})", regex::escape(&needle)))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re
            .replace_all(&escaped, r#"<span class="font-semibold text-blue-600">$1</span>"#)
            .into_owned(),
        Err(_) => escaped,
    }
}

fn suggestion_item(airport: &Airport, query: &str) -> String {
    format!(
        r#"<div class="px-4 py-2 hover:bg-gray-100 cursor-pointer" data-airport="{label}"><div class="flex justify-between"><span class="font-medium">{city}</span><span class="text-gray-500">{code}</span></div><div class="text-sm text-gray-500">{name}</div></div>"#,
        label = html::escape(&airport.label()),
        city = highlight(airport.city, query),
        code = highlight(airport.code, query),
        name = highlight(airport.name, query),
    )
}

/// Dropdown for a typed query.
pub fn suggestions(airports: &[&Airport], query: &str) -> String {
    if airports.is_empty() {
        return r#"<div class="px-4 py-2 text-gray-500">No airports found. Try a different search term.</div>"#.to_string();
    }
    airports.iter().map(|a| suggestion_item(a, query)).collect()
}

/// Dropdown shown on focus of an empty input.
pub fn popular(airports: &[&Airport]) -> String {
    let items: String = airports.iter().map(|a| suggestion_item(a, "")).collect();
    format!(
        r#"<div class="px-4 py-2 text-xs font-semibold text-gray-500 uppercase">Popular airports</div>{}"#,
        items
    )
}

pub fn results_count(count: usize) -> String {
    if count == 1 {
        "1 flight found".to_string()
    } else {
        format!("{} flights found", count)
    }
}

fn clock(raw: Option<&str>) -> String {
    raw.map(format::format_time).unwrap_or_else(|| "--".to_string())
}

pub fn flight_card(index: usize, flight: &FlightResult) -> String {
    let mut header = Vec::new();
    if !flight.flight_number.is_empty() {
        header.push(html::escape(&flight.flight_number));
    }
    header.push(flight.stop_label());
    if let Some(class) = &flight.travel_class {
        header.push(html::escape(class));
    }

    let price = match flight.price {
        Some(p) => format!(r#"<p class="text-2xl font-bold text-gray-900">{}</p>"#, format::format_inr(p)),
        None => r#"<p class="text-sm text-gray-500">Price not available</p>"#.to_string(),
    };
    let duration = flight
        .duration_minutes
        .map(format::format_duration)
        .unwrap_or_default();

    let mut extras = String::new();
    if let Some(plane) = &flight.airplane {
        extras.push_str(&format!(r#"<p class="text-sm text-gray-600">Aircraft: {}</p>"#, html::escape(plane)));
    }
    if let Some(legroom) = &flight.legroom {
        extras.push_str(&format!(r#"<p class="text-sm text-gray-600">Legroom: {}</p>"#, html::escape(legroom)));
    }
    let amenities = flight.amenities();
    if !amenities.is_empty() {
        let items: String = amenities.iter().map(|a| format!("<li>{}</li>", html::escape(a))).collect();
        extras.push_str(&format!(
            r#"<h5 class="font-medium text-gray-900 mt-2">Flight Features</h5><ul class="text-sm text-gray-600 list-disc list-inside">{}</ul>"#,
            items
        ));
    }
    if !flight.baggage.is_empty() {
        extras.push_str(&format!(
            r#"<p class="text-sm text-gray-600 mt-2">Baggage: {}</p>"#,
            html::escape(&flight.baggage.join(", "))
        ));
    }

    format!(
        r#"<div class="bg-white rounded-lg shadow-sm border border-gray-200 p-6 mb-4" data-flight="{index}"><div class="flex justify-between items-center"><div class="flex items-center"><img src="{logo}" alt="{airline}" class="w-10 h-10 mr-3"><div><h3 class="font-semibold text-gray-900">{airline}</h3><p class="text-sm text-gray-500">{header}</p></div></div><div class="flex items-center space-x-8"><div class="text-center"><p class="text-lg font-semibold">{departure}</p><p class="text-sm text-gray-500">{origin}</p></div><div class="text-center"><p class="text-sm text-gray-500">{duration}</p><p class="text-xs text-gray-400">{stops}</p></div><div class="text-center"><p class="text-lg font-semibold">{arrival}</p><p class="text-sm text-gray-500">{destination}</p></div></div><div class="text-right">{price}<button data-select-flight="{index}" class="mt-2 px-4 py-2 bg-primary-600 text-white rounded-lg hover:bg-primary-700">Select Flight</button></div></div><details class="mt-4"><summary class="text-sm text-primary-600 cursor-pointer">Show details</summary><div class="mt-2">{extras}</div></details></div>"#,
        index = index,
        logo = html::escape(flight.airline_logo.as_deref().unwrap_or(LOGO_PLACEHOLDER)),
        airline = html::escape(&flight.airline),
        header = header.join(" • "),
        departure = clock(flight.departure_time.as_deref()),
        origin = html::escape(&flight.origin),
        duration = duration,
        stops = flight.stop_label(),
        arrival = clock(flight.arrival_time.as_deref()),
        destination = html::escape(&flight.destination),
        price = price,
        extras = extras,
    )
}

pub fn result_list(flights: &[&FlightResult]) -> String {
    flights
        .iter()
        .enumerate()
        .map(|(i, f)| flight_card(i, f))
        .collect()
}

/// Airline checkboxes for the filter sidebar.
pub fn airline_filters(airlines: &[String]) -> String {
    airlines
        .iter()
        .map(|a| {
            format!(
                r#"<label class="flex items-center"><input type="checkbox" name="airline" value="{0}" class="mr-2">{0}</label>"#,
                html::escape(a)
            )
        })
        .collect()
}

pub fn loading() -> String {
    r#"<div class="text-center py-12"><div class="animate-spin h-8 w-8 border-b-2 border-primary-600 rounded-full mx-auto mb-4"></div><p class="text-gray-600">Searching for flights</p></div>"#.to_string()
}

pub fn search_failed(message: &str) -> String {
    format!(
        r#"<div class="text-center py-12"><h3 class="text-lg font-medium text-gray-900 mb-2">Search failed</h3><p class="text-gray-600 mb-4">{}</p><button data-action="retry-search" class="px-4 py-2 bg-primary-600 text-white rounded-lg">Retry Search</button></div>"#,
        html::escape(message)
    )
}
