use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use ttravels_shared::json;

use crate::{CoreError, CoreResult};

/// An AI-generated trip plan.
///
/// Candidate flights, hotels and attractions are kept as the backend sent them
/// so that saving submits exactly what was received plus the user's selection.
/// Fields this client does not interpret (itinerary objects, budget notes, ...)
/// survive in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    #[serde(default, deserialize_with = "object_or_empty")]
    pub details: Map<String, Value>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub flights: Vec<Value>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub hotels: Vec<Value>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub attractions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_flight: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_hotel: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn object_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map<String, Value>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(json::embedded_object(Some(&value)))
}

fn list_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

impl TripPlan {
    /// Builds a plan from an object or a JSON-encoded string. Anything
    /// unreadable gives an empty plan.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(json::embedded(Some(value))).unwrap_or_default()
    }

    /// Hotel search results arrive without a plan around them; wrap them in one.
    pub fn from_hotel_results(results: &[Value]) -> Self {
        let destination = results
            .first()
            .and_then(|first| json::first_text(first, &["/destination", "/city"]))
            .unwrap_or_default();
        let mut details = Map::new();
        details.insert("destination".to_string(), Value::String(destination));
        Self {
            details,
            hotels: results.to_vec(),
            ..Default::default()
        }
    }

    /// A plan without details has nothing to show.
    pub fn has_details(&self) -> bool {
        !self.details.is_empty()
    }

    pub fn destination(&self) -> Option<String> {
        json::text(self.details.get("destination"))
    }

    pub fn days(&self) -> Option<String> {
        json::text(self.details.get("days"))
    }

    /// Title used when saving: the destination, or empty.
    pub fn title(&self) -> String {
        self.destination().unwrap_or_default()
    }

    pub fn flight_options(&self) -> Vec<FlightOption> {
        self.flights.iter().map(FlightOption::from_entry).collect()
    }

    pub fn hotel_options(&self) -> Vec<HotelOption> {
        self.hotels.iter().map(HotelOption::from_entry).collect()
    }

    pub fn attraction_options(&self) -> Vec<Attraction> {
        self.attractions.iter().map(Attraction::from_entry).collect()
    }

    pub fn select_hotel(&mut self, index: usize) -> CoreResult<&Value> {
        let hotel = self
            .hotels
            .get(index)
            .cloned()
            .ok_or(CoreError::InvalidSelection { kind: "hotel", index })?;
        Ok(&*self.selected_hotel.insert(hotel))
    }

    pub fn select_flight(&mut self, index: usize) -> CoreResult<&Value> {
        let flight = self
            .flights
            .get(index)
            .cloned()
            .ok_or(CoreError::InvalidSelection { kind: "flight", index })?;
        Ok(&*self.selected_flight.insert(flight))
    }

    /// Selection is matched on airline and price, not on position, so it
    /// survives the backend regenerating the candidate list.
    pub fn is_flight_selected(&self, option: &FlightOption) -> bool {
        self.selected_flight.as_ref().is_some_and(|selected| {
            let selected = FlightOption::from_entry(selected);
            selected.airline == option.airline && selected.price == option.price
        })
    }

    pub fn is_hotel_selected(&self, option: &HotelOption) -> bool {
        self.selected_hotel.as_ref().is_some_and(|selected| {
            json::text(selected.get("name")).as_deref() == Some(option.name.as_str())
                || json::text(selected.get("title")).as_deref() == Some(option.name.as_str())
        })
    }

    /// Narrative itinerary: the summary or free text if present, else the
    /// day-by-day entries, else a one-line fallback.
    pub fn itinerary_text(&self) -> String {
        let object = self.extra.get("itinerary_object").and_then(Value::as_object);

        let direct = object
            .and_then(|o| json::text(o.get("summary")))
            .or_else(|| json::text(self.extra.get("itinerary_text")))
            .or_else(|| json::text(self.extra.get("itinerary")));
        if let Some(text) = direct {
            return text;
        }

        let days: Vec<String> = object
            .and_then(|o| o.get("day_by_day"))
            .and_then(Value::as_array)
            .map(|days| days.iter().filter(|d| d.is_object()).map(describe_day).collect())
            .unwrap_or_default();
        if !days.is_empty() {
            return days.join("\n\n");
        }

        format!(
            "Here's your {}-day trip plan to {}.",
            self.days().unwrap_or_default(),
            self.destination().unwrap_or_else(|| "your destination".to_string())
        )
    }

    pub fn set_itinerary_text(&mut self, text: impl Into<String>) {
        self.extra.insert("itinerary_text".to_string(), Value::String(text.into()));
    }
}

fn describe_day(day: &Value) -> String {
    let mut line = format!("Day {}", json::text(day.get("day")).unwrap_or_default());
    if let Some(title) = json::text(day.get("title")) {
        line.push_str(": ");
        line.push_str(&title);
    }
    if let Some(details) = json::text(day.get("details")) {
        line.push('\n');
        line.push_str(&details);
    }
    line
}

/// Display record for a candidate flight inside a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightOption {
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub price: String,
    pub currency: Option<String>,
    pub duration: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

impl FlightOption {
    pub fn from_entry(entry: &Value) -> Self {
        Self {
            airline: json::first_text(entry, &["/airline", "/airline_name", "/airline/name"])
                .unwrap_or_else(|| "Flight".to_string()),
            origin: json::first_text(entry, &["/origin", "/departure_airport/id", "/departure"])
                .unwrap_or_else(|| "Origin".to_string()),
            destination: json::first_text(entry, &["/destination", "/arrival_airport/id", "/arrival"])
                .unwrap_or_else(|| "Destination".to_string()),
            price: json::first_text(entry, &["/price", "/amount", "/local_prices/0/price"])
                .unwrap_or_else(|| "N/A".to_string()),
            currency: json::text(entry.get("currency")),
            duration: json::first_text(entry, &["/total_duration", "/duration"]),
            departure_time: json::first_text(entry, &["/departure_time", "/departure_airport/time"]),
            arrival_time: json::first_text(entry, &["/arrival_time", "/arrival_airport/time"]),
        }
    }
}

/// Display record for a candidate hotel.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelOption {
    pub name: String,
    pub price: String,
    pub rating: Option<String>,
    pub reviews: Option<String>,
    pub address: Option<String>,
}

impl HotelOption {
    pub fn from_entry(entry: &Value) -> Self {
        Self {
            name: json::first_text(entry, &["/name", "/title"]).unwrap_or_else(|| "Hotel".to_string()),
            price: json::first_text(entry, &["/price", "/rate", "/lowest_price"])
                .unwrap_or_else(|| "N/A".to_string()),
            rating: json::first_text(entry, &["/rating", "/star_rating"]),
            reviews: json::text(entry.get("reviews")),
            address: json::first_text(entry, &["/address", "/vicinity"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attraction {
    pub name: String,
    pub rating: Option<String>,
    pub address: Option<String>,
}

impl Attraction {
    pub fn from_entry(entry: &Value) -> Self {
        Self {
            name: json::first_text(entry, &["/name", "/title"]).unwrap_or_else(|| "Attraction".to_string()),
            rating: json::text(entry.get("rating")),
            address: json::text(entry.get("address")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn goa_plan() -> TripPlan {
        TripPlan::from_value(&json!({
            "details": {"destination": "Goa", "days": 4},
            "flights": [
                {"airline": "IndiGo", "price": 5200, "departure_airport": {"id": "DEL", "time": "2025-02-01 06:00"}},
                {"airline_name": "Vistara", "amount": "6100"}
            ],
            "hotels": [
                {"name": "Taj Fort Aguada", "price": "₹14,000", "rating": 4.7},
                {"title": "Beach Hut", "rate": "₹2,100"}
            ],
            "itinerary_object": {"day_by_day": [
                {"day": 1, "title": "Arrive", "details": "Check in"},
                {"day": 2, "title": "Beaches"}
            ]},
            "budget_notes": "mid-range"
        }))
    }

    #[test]
    fn test_select_hotel_sets_exact_entry_and_round_trips() {
        let mut plan = goa_plan();
        let expected = plan.hotels[1].clone();
        plan.select_hotel(1).unwrap();
        assert_eq!(plan.selected_hotel.as_ref(), Some(&expected));

        let encoded = serde_json::to_string(&plan).unwrap();
        let decoded: TripPlan = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, plan);
        assert_eq!(decoded.selected_hotel, Some(expected));
        assert_eq!(decoded.extra["budget_notes"], "mid-range");
    }

    #[test]
    fn test_out_of_range_selection_is_rejected() {
        let mut plan = goa_plan();
        let err = plan.select_hotel(7).unwrap_err();
        assert_eq!(err.to_string(), "Invalid hotel selection.");
        assert!(plan.selected_hotel.is_none());
        assert!(plan.select_flight(2).is_err());
    }

    #[test]
    fn test_selection_matches_by_fields_after_regeneration() {
        let mut plan = goa_plan();
        plan.select_flight(0).unwrap();
        plan.select_hotel(1).unwrap();

        plan.hotels.reverse();
        plan.flights.reverse();

        let hotels = plan.hotel_options();
        assert!(plan.is_hotel_selected(&hotels[0]));
        assert!(!plan.is_hotel_selected(&hotels[1]));

        let flights = plan.flight_options();
        assert!(!plan.is_flight_selected(&flights[0]));
        assert!(plan.is_flight_selected(&flights[1]));
    }

    #[test]
    fn test_malformed_plan_string_gives_empty_plan() {
        let plan = TripPlan::from_value(&json!("{\"details\": "));
        assert_eq!(plan, TripPlan::default());
        assert!(!plan.has_details());
    }

    #[test]
    fn test_non_array_candidates_are_empty() {
        let plan = TripPlan::from_value(&json!({
            "details": "{\"destination\": \"Ooty\"}",
            "flights": {"error": "quota exceeded"}
        }));
        assert!(plan.flights.is_empty());
        assert_eq!(plan.destination().as_deref(), Some("Ooty"));
    }

    #[test]
    fn test_option_adapters_apply_fallbacks() {
        let plan = goa_plan();
        let flights = plan.flight_options();
        assert_eq!(flights[0].origin, "DEL");
        assert_eq!(flights[0].departure_time.as_deref(), Some("2025-02-01 06:00"));
        assert_eq!(flights[1].airline, "Vistara");
        assert_eq!(flights[1].price, "6100");
        assert_eq!(flights[1].destination, "Destination");

        let hotels = plan.hotel_options();
        assert_eq!(hotels[1].name, "Beach Hut");
        assert_eq!(hotels[1].price, "₹2,100");
        assert_eq!(hotels[0].rating.as_deref(), Some("4.7"));
    }

    #[test]
    fn test_itinerary_text_sources() {
        let plan = goa_plan();
        assert_eq!(plan.itinerary_text(), "Day 1: Arrive\nCheck in\n\nDay 2: Beaches");

        let mut with_text = plan.clone();
        with_text.set_itinerary_text("Relax all week");
        assert_eq!(with_text.itinerary_text(), "Relax all week");

        let bare = TripPlan::from_value(&json!({"details": {"days": "3"}}));
        assert_eq!(bare.itinerary_text(), "Here's your 3-day trip plan to your destination.");
    }

    #[test]
    fn test_hotel_results_are_wrapped() {
        let plan = TripPlan::from_hotel_results(&[json!({"city": "Jaipur", "name": "Rambagh"})]);
        assert_eq!(plan.destination().as_deref(), Some("Jaipur"));
        assert_eq!(plan.hotels.len(), 1);

        let unnamed = TripPlan::from_hotel_results(&[json!({"name": "Lake View"})]);
        assert!(unnamed.has_details());
        assert_eq!(unnamed.destination(), None);
    }
}
