use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde_json::Value;
use std::collections::BTreeSet;
use ttravels_shared::{format, json};

use crate::airports;
use crate::api::FlightSearchRequest;
use crate::{CoreError, CoreResult};

pub const DEFAULT_PRICE_MAX: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripType {
    OneWay,
    #[default]
    RoundTrip,
}

/// Raw state of the search form.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub from: String,
    pub to: String,
    pub departure: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub trip_type: TripType,
    pub passengers: u32,
    pub cabin_class: String,
}

impl SearchForm {
    /// Departure tomorrow, return a week after that.
    pub fn with_default_dates(today: NaiveDate) -> Self {
        let departure = today + Duration::days(1);
        Self {
            from: String::new(),
            to: String::new(),
            departure: Some(departure),
            return_date: Some(departure + Duration::days(7)),
            trip_type: TripType::RoundTrip,
            passengers: 1,
            cabin_class: "economy".to_string(),
        }
    }

    pub fn swap_airports(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Switching to a round trip makes sure the return date is after departure.
    pub fn set_trip_type(&mut self, trip_type: TripType) {
        self.trip_type = trip_type;
        if trip_type == TripType::RoundTrip {
            if let Some(departure) = self.departure {
                if self.return_date.map_or(true, |r| r <= departure) {
                    self.return_date = Some(departure + Duration::days(7));
                }
            }
        }
    }

    /// Checks the form in the order the user fills it in and returns the
    /// request body on success.
    pub fn validate(&self) -> CoreResult<FlightSearchRequest> {
        let invalid = |msg: &str| Err(CoreError::ValidationError(msg.to_string()));

        let from = airports::extract_code(&self.from);
        let to = airports::extract_code(&self.to);
        if from.is_empty() {
            return invalid("Please select a departure airport");
        }
        if to.is_empty() {
            return invalid("Please select an arrival airport");
        }
        if from == to {
            return invalid("Departure and arrival airports cannot be the same");
        }
        let Some(departure) = self.departure else {
            return invalid("Please select a departure date");
        };

        let return_date = match self.trip_type {
            TripType::OneWay => None,
            TripType::RoundTrip => match self.return_date {
                None => return invalid("Please select a return date"),
                Some(r) if r < departure => return invalid("Return date must be after departure date"),
                Some(r) => Some(r),
            },
        };

        Ok(FlightSearchRequest {
            from,
            to,
            departure: departure.format("%Y-%m-%d").to_string(),
            return_date: return_date.map(|d| d.format("%Y-%m-%d").to_string()),
            passengers: self.passengers.max(1),
            cabin_class: self.cabin_class.clone(),
        })
    }
}

/// A flight from the search response.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightResult {
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub duration_minutes: Option<u32>,
    pub stops: u32,
    pub price: Option<f64>,
    pub travel_class: Option<String>,
    pub airplane: Option<String>,
    pub legroom: Option<String>,
    pub extensions: Vec<String>,
    pub airline_logo: Option<String>,
    pub baggage: Vec<String>,
}

impl FlightResult {
    pub fn from_document(doc: &Value) -> Self {
        Self {
            airline: json::first_text(doc, &["/airline", "/flights/0/airline"]).unwrap_or_else(|| "Airline".to_string()),
            flight_number: json::first_text(doc, &["/flight_number", "/flightNumber", "/flights/0/flight_number"])
                .unwrap_or_default(),
            origin: json::first_text(doc, &["/origin", "/flights/0/departure_airport/id"]).unwrap_or_default(),
            destination: json::first_text(doc, &["/destination", "/flights/0/arrival_airport/id"]).unwrap_or_default(),
            departure_time: json::first_text(doc, &["/departure_time", "/departureTime", "/flights/0/departure_airport/time"]),
            arrival_time: json::first_text(doc, &["/arrival_time", "/arrivalTime", "/flights/0/arrival_airport/time"]),
            duration_minutes: json::first_number(doc, &["/duration", "/total_duration"]).map(|m| m as u32),
            stops: json::number(doc.get("stops")).map(|s| s as u32).unwrap_or(0),
            price: json::number(doc.get("price")),
            travel_class: json::text(doc.get("travel_class")),
            airplane: json::text(doc.get("airplane")),
            legroom: json::text(doc.get("legroom")),
            extensions: json::strings(doc, "/extensions"),
            airline_logo: json::first_text(doc, &["/airline_logo", "/airlineLogo"]),
            baggage: json::strings(doc, "/baggage_prices/together"),
        }
    }

    pub fn departure_clock(&self) -> Option<NaiveTime> {
        self.departure_time.as_deref().and_then(format::parse_clock)
    }

    pub fn arrival_clock(&self) -> Option<NaiveTime> {
        self.arrival_time.as_deref().and_then(format::parse_clock)
    }

    /// "Non-stop", "1 stop", "2 stops".
    pub fn stop_label(&self) -> String {
        match self.stops {
            0 => "Non-stop".to_string(),
            1 => "1 stop".to_string(),
            n => format!("{} stops", n),
        }
    }

    /// Extensions that describe on-board amenities.
    pub fn amenities(&self) -> Vec<String> {
        const KEYWORDS: [&str; 6] = ["wi-fi", "usb", "entertainment", "meal", "power", "seat"];
        self.extensions
            .iter()
            .filter(|e| {
                let lower = e.to_lowercase();
                KEYWORDS.iter().any(|k| lower.contains(k))
            })
            .map(|e| e.replace("Carbon emissions estimate:", "").trim().to_string())
            .collect()
    }
}

/// Departure windows offered by the time filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "morning" => Some(TimeBucket::Morning),
            "afternoon" => Some(TimeBucket::Afternoon),
            "evening" => Some(TimeBucket::Evening),
            "night" => Some(TimeBucket::Night),
            _ => None,
        }
    }

    /// Morning 05-12, afternoon 12-17, evening 17-22, night 22-05.
    pub fn of(time: NaiveTime) -> Self {
        match time.hour() {
            5..=11 => TimeBucket::Morning,
            12..=16 => TimeBucket::Afternoon,
            17..=21 => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    DurationAsc,
    DepartureAsc,
    ArrivalAsc,
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "price_desc" => SortKey::PriceDesc,
            "duration_asc" => SortKey::DurationAsc,
            "departure_asc" => SortKey::DepartureAsc,
            "arrival_asc" => SortKey::ArrivalAsc,
            _ => SortKey::PriceAsc,
        }
    }
}

/// Filter panel state. Empty sets mean "no restriction".
#[derive(Debug, Clone, PartialEq)]
pub struct FlightFilter {
    pub price_max: f64,
    pub airlines: BTreeSet<String>,
    /// Stop counts; `2` stands for two or more.
    pub stops: BTreeSet<u32>,
    pub times: BTreeSet<TimeBucket>,
    pub sort: SortKey,
}

impl Default for FlightFilter {
    fn default() -> Self {
        Self {
            price_max: DEFAULT_PRICE_MAX,
            airlines: BTreeSet::new(),
            stops: BTreeSet::new(),
            times: BTreeSet::new(),
            sort: SortKey::PriceAsc,
        }
    }
}

impl FlightFilter {
    pub fn matches(&self, flight: &FlightResult) -> bool {
        if flight.price.is_some_and(|p| p > self.price_max) {
            return false;
        }
        if !self.airlines.is_empty() && !self.airlines.contains(&flight.airline) {
            return false;
        }
        if !self.stops.is_empty() && !self.stops.contains(&flight.stops.min(2)) {
            return false;
        }
        if !self.times.is_empty() {
            let bucket = flight.departure_clock().map(TimeBucket::of);
            if !bucket.is_some_and(|b| self.times.contains(&b)) {
                return false;
            }
        }
        true
    }

    /// Filters then sorts; recomputed from the full result set on every change.
    pub fn apply<'a>(&self, flights: &'a [FlightResult]) -> Vec<&'a FlightResult> {
        let mut out: Vec<&FlightResult> = flights.iter().filter(|f| self.matches(f)).collect();
        sort_flights(&mut out, self.sort);
        out
    }
}

/// Missing prices, durations and times sort last.
pub fn sort_flights(flights: &mut [&FlightResult], key: SortKey) {
    fn last_if_none<T: PartialOrd>(a: Option<T>, b: Option<T>) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (a, b) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    match key {
        SortKey::PriceAsc => flights.sort_by(|a, b| last_if_none(a.price, b.price)),
        SortKey::PriceDesc => flights.sort_by(|a, b| last_if_none(a.price.map(|p| -p), b.price.map(|p| -p))),
        SortKey::DurationAsc => flights.sort_by(|a, b| last_if_none(a.duration_minutes, b.duration_minutes)),
        SortKey::DepartureAsc => flights.sort_by(|a, b| last_if_none(a.departure_clock(), b.departure_clock())),
        SortKey::ArrivalAsc => flights.sort_by(|a, b| last_if_none(a.arrival_clock(), b.arrival_clock())),
    }
}

/// Airlines present in a result set, for the airline filter checkboxes.
pub fn airline_facets(flights: &[FlightResult]) -> Vec<String> {
    flights
        .iter()
        .map(|f| f.airline.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn form(from: &str, to: &str) -> SearchForm {
        SearchForm {
            from: from.to_string(),
            to: to.to_string(),
            ..SearchForm::with_default_dates(day("2025-01-10"))
        }
    }

    fn message(result: CoreResult<FlightSearchRequest>) -> String {
        match result {
            Err(CoreError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_order() {
        assert_eq!(message(form("", "GOI").validate()), "Please select a departure airport");
        assert_eq!(message(form("DEL", " ").validate()), "Please select an arrival airport");
        assert_eq!(
            message(form("Delhi (DEL)", "del").validate()),
            "Departure and arrival airports cannot be the same"
        );

        let mut no_departure = form("DEL", "GOI");
        no_departure.departure = None;
        assert_eq!(message(no_departure.validate()), "Please select a departure date");

        let mut no_return = form("DEL", "GOI");
        no_return.return_date = None;
        assert_eq!(message(no_return.validate()), "Please select a return date");

        let mut backwards = form("DEL", "GOI");
        backwards.return_date = Some(day("2025-01-05"));
        assert_eq!(message(backwards.validate()), "Return date must be after departure date");
    }

    #[test]
    fn test_valid_form_builds_request() {
        let request = form("Delhi (DEL)", "Goa (GOI)").validate().unwrap();
        assert_eq!(request.from, "DEL");
        assert_eq!(request.to, "GOI");
        assert_eq!(request.departure, "2025-01-11");
        assert_eq!(request.return_date.as_deref(), Some("2025-01-18"));

        let mut one_way = form("DEL", "GOI");
        one_way.set_trip_type(TripType::OneWay);
        one_way.return_date = None;
        assert_eq!(one_way.validate().unwrap().return_date, None);
    }

    #[test]
    fn test_round_trip_switch_repairs_return_date() {
        let mut f = form("DEL", "GOI");
        f.trip_type = TripType::OneWay;
        f.return_date = None;
        f.set_trip_type(TripType::RoundTrip);
        assert_eq!(f.return_date, Some(day("2025-01-18")));
    }

    fn results() -> Vec<FlightResult> {
        [
            json!({"airline": "IndiGo", "price": 5200, "duration": 130, "stops": 0, "departure_time": "2025-01-11 06:30", "arrival_time": "2025-01-11 08:40"}),
            json!({"airline": "Air India", "price": 4100, "duration": 185, "stops": 1, "departure_time": "2025-01-11 13:15", "arrival_time": "2025-01-11 16:20"}),
            json!({"airline": "Vistara", "price": 7600, "duration": 125, "stops": 0, "departure_time": "2025-01-11 19:05", "arrival_time": "2025-01-11 21:10"}),
            json!({"airline": "SpiceJet", "duration": 300, "stops": 2, "departure_time": "2025-01-11 23:50", "arrival_time": "2025-01-12 04:50"}),
            json!({"airline": "IndiGo", "price": 3900, "duration": 140, "stops": 3, "departure_time": "2025-01-11 02:10"}),
        ]
        .iter()
        .map(FlightResult::from_document)
        .collect()
    }

    #[test]
    fn test_price_asc_is_non_decreasing() {
        let flights = results();
        let sorted = FlightFilter::default().apply(&flights);
        let prices: Vec<f64> = sorted.iter().filter_map(|f| f.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sorted.last().unwrap().airline, "SpiceJet");
    }

    #[test]
    fn test_price_desc_and_duration() {
        let flights = results();
        let by_price = FlightFilter { sort: SortKey::PriceDesc, ..Default::default() }.apply(&flights);
        assert_eq!(by_price[0].airline, "Vistara");
        assert_eq!(by_price.last().unwrap().airline, "SpiceJet");

        let by_duration = FlightFilter { sort: SortKey::DurationAsc, ..Default::default() }.apply(&flights);
        assert_eq!(by_duration[0].airline, "Vistara");
    }

    #[test]
    fn test_filters_combine() {
        let flights = results();
        let mut filter = FlightFilter { price_max: 6000.0, ..Default::default() };
        assert_eq!(filter.apply(&flights).len(), 4);

        filter.stops = BTreeSet::from([2]);
        let multi_stop: Vec<&str> = filter.apply(&flights).iter().map(|f| f.airline.as_str()).collect();
        assert_eq!(multi_stop, vec!["IndiGo", "SpiceJet"]);

        filter.stops.clear();
        filter.times = BTreeSet::from([TimeBucket::Night]);
        assert_eq!(filter.apply(&flights).len(), 2);

        filter.times = BTreeSet::from([TimeBucket::Morning, TimeBucket::Afternoon]);
        filter.airlines = BTreeSet::from(["IndiGo".to_string()]);
        assert_eq!(filter.apply(&flights).len(), 1);
    }

    #[test]
    fn test_result_adapter_and_facets() {
        let flights = results();
        assert_eq!(flights[3].price, None);
        assert_eq!(flights[0].stop_label(), "Non-stop");
        assert_eq!(flights[4].stop_label(), "3 stops");
        assert_eq!(airline_facets(&flights), vec!["Air India", "IndiGo", "SpiceJet", "Vistara"]);

        let segment = FlightResult::from_document(&json!({
            "flights": [{"airline": "Akasa Air", "flight_number": "QP 1102",
                          "departure_airport": {"id": "BOM", "time": "2025-01-11 09:00"}}],
            "total_duration": 95,
            "extensions": ["Wi-Fi for a fee", "Carbon emissions estimate: 74 kg"]
        }));
        assert_eq!(segment.airline, "Akasa Air");
        assert_eq!(segment.origin, "BOM");
        assert_eq!(segment.duration_minutes, Some(95));
        assert_eq!(segment.amenities(), vec!["Wi-Fi for a fee".to_string()]);
    }

    #[test]
    fn test_time_buckets() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(TimeBucket::of(t(5, 0)), TimeBucket::Morning);
        assert_eq!(TimeBucket::of(t(12, 0)), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::of(t(21, 59)), TimeBucket::Evening);
        assert_eq!(TimeBucket::of(t(4, 59)), TimeBucket::Night);
    }
}
