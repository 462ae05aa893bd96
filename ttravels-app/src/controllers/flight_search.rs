use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{error, info, warn};
use ttravels_core::airports::{self, Direction};
use ttravels_core::flights::{airline_facets, FlightFilter, FlightResult, SearchForm, SortKey, TimeBucket, TripType};
use ttravels_core::CoreError;
use ttravels_render::flights as view;
use ttravels_store::local_store::{self, keys};

use crate::ui::{Slot, ToastKind, Ui};
use crate::AppContext;

/// What the booking form picks up from local storage after "Select Flight".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDraft {
    #[serde(rename = "type")]
    pub kind: String,
    pub service: String,
    pub route: String,
    pub date: String,
    pub passengers: u32,
    pub amount: f64,
    #[serde(rename = "flightDetails")]
    pub flight_details: Value,
}

/// Flight search page. Results are fetched once per search; filters and
/// sorting are recomputed over the full result set on every change.
pub struct FlightSearchController<U: Ui> {
    ctx: AppContext,
    ui: U,
    form: SearchForm,
    filter: FlightFilter,
    docs: Vec<Value>,
    results: Vec<FlightResult>,
}

impl<U: Ui> FlightSearchController<U> {
    pub fn new(ctx: AppContext, ui: U) -> Self {
        let form = SearchForm::with_default_dates(ctx.today);
        let filter = FlightFilter {
            price_max: ctx.config.search.default_price_max,
            ..FlightFilter::default()
        };
        Self {
            ctx,
            ui,
            form,
            filter,
            docs: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn filter(&self) -> &FlightFilter {
        &self.filter
    }

    pub fn results(&self) -> &[FlightResult] {
        &self.results
    }

    /// Flights currently listed, in display order.
    pub fn visible(&self) -> Vec<&FlightResult> {
        self.filter.apply(&self.results)
    }

    // ========================================================================
    // Form
    // ========================================================================

    /// Popular airports for an empty input, matches otherwise.
    pub fn type_airport(&mut self, direction: Direction, query: &str) {
        match direction {
            Direction::From => self.form.from = query.to_string(),
            Direction::To => self.form.to = query.to_string(),
        }
        let search = &self.ctx.config.search;
        let typed = query.trim().chars().count();
        let html = if typed == 0 {
            view::popular(&airports::popular(direction))
        } else if typed < search.autocomplete_min_chars {
            String::new()
        } else {
            let matches = airports::suggest(query, search.autocomplete_min_chars, search.autocomplete_limit);
            view::suggestions(&matches, query)
        };
        self.ui.render(Slot::AirportSuggestions, html);
    }

    pub fn pick_airport(&mut self, direction: Direction, code: &str) -> bool {
        let Some(airport) = airports::by_code(code) else {
            warn!(code, "Unknown airport picked");
            return false;
        };
        match direction {
            Direction::From => self.form.from = airport.label(),
            Direction::To => self.form.to = airport.label(),
        }
        self.ui.render(Slot::AirportSuggestions, String::new());
        true
    }

    pub fn swap_airports(&mut self) {
        self.form.swap_airports();
    }

    pub fn set_trip_type(&mut self, trip_type: TripType) {
        self.form.set_trip_type(trip_type);
    }

    pub fn set_dates(&mut self, departure: Option<NaiveDate>, return_date: Option<NaiveDate>) {
        self.form.departure = departure;
        self.form.return_date = return_date;
    }

    pub fn set_passengers(&mut self, passengers: u32, cabin_class: &str) {
        self.form.passengers = passengers.max(1);
        self.form.cabin_class = cabin_class.to_string();
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Validates, posts the search and shows the results. Returns the number
    /// of flights received.
    pub async fn search(&mut self) -> usize {
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(CoreError::ValidationError(message)) => {
                warn!(%message, "Search form rejected");
                self.ui.toast(ToastKind::Error, &message);
                return 0;
            }
            Err(e) => {
                self.ui.toast(ToastKind::Error, &e.to_string());
                return 0;
            }
        };

        self.ui.render(Slot::FlightResults, view::loading());
        let docs = match self.ctx.api.search_flights(&request).await {
            Ok(docs) => docs,
            Err(e) => {
                error!(from = %request.from, to = %request.to, error = %e, "Flight search failed");
                self.docs.clear();
                self.results.clear();
                self.ui
                    .render(Slot::FlightResults, view::search_failed(&e.user_message()));
                self.ui.render(Slot::FlightCount, view::results_count(0));
                return 0;
            }
        };

        self.results = docs.iter().map(FlightResult::from_document).collect();
        self.docs = docs;
        info!(count = self.results.len(), "Flight results received");
        if self.results.is_empty() {
            self.ui.toast(
                ToastKind::Error,
                "Search Error: No flights were returned for this query.",
            );
        }
        let airlines = airline_facets(&self.results);
        self.ui
            .render(Slot::AirlineFilters, view::airline_filters(&airlines));
        self.render_results();
        self.results.len()
    }

    fn render_results(&mut self) {
        let visible = self.filter.apply(&self.results);
        let count = view::results_count(visible.len());
        let list = view::result_list(&visible);
        self.ui.render(Slot::FlightCount, count);
        self.ui.render(Slot::FlightResults, list);
    }

    // ========================================================================
    // Filters
    // ========================================================================

    pub fn set_price_max(&mut self, price_max: f64) {
        self.filter.price_max = price_max;
        self.render_results();
    }

    pub fn toggle_airline(&mut self, airline: &str, on: bool) {
        if on {
            self.filter.airlines.insert(airline.to_string());
        } else {
            self.filter.airlines.remove(airline);
        }
        self.render_results();
    }

    /// `2` stands for two or more stops.
    pub fn set_stops(&mut self, stops: BTreeSet<u32>) {
        self.filter.stops = stops;
        self.render_results();
    }

    pub fn set_times(&mut self, times: BTreeSet<TimeBucket>) {
        self.filter.times = times;
        self.render_results();
    }

    pub fn sort_by(&mut self, sort: SortKey) {
        self.filter.sort = sort;
        self.render_results();
    }

    pub fn reset_filters(&mut self) {
        self.filter = FlightFilter {
            price_max: self.ctx.config.search.default_price_max,
            ..FlightFilter::default()
        };
        self.render_results();
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Stores the flight at `index` of the listed results for the booking
    /// form and moves there.
    pub fn select_flight(&mut self, index: usize) -> bool {
        let draft = {
            let visible = self.filter.apply(&self.results);
            let Some(flight) = visible.get(index) else {
                warn!(index, "Selected flight is not listed");
                return false;
            };
            let details = self
                .results
                .iter()
                .position(|r| std::ptr::eq(r, *flight))
                .and_then(|i| self.docs.get(i))
                .cloned()
                .unwrap_or(Value::Null);
            draft_for(flight, details)
        };

        if let Err(e) = local_store::set_json(self.ctx.store.as_ref(), keys::CURRENT_BOOKING, &draft) {
            error!(error = %e, "Could not store selected flight");
            self.ui.toast(ToastKind::Error, "Could not save your selection.");
            return false;
        }
        info!(service = %draft.service, "Flight selected for booking");
        self.ui.navigate("booking/flight.html");
        true
    }
}

fn draft_for(flight: &FlightResult, details: Value) -> BookingDraft {
    BookingDraft {
        kind: "flight".to_string(),
        service: format!("{} {}", flight.airline, flight.flight_number)
            .trim()
            .to_string(),
        route: format!("{} → {}", flight.origin, flight.destination)
            .trim()
            .to_string(),
        date: flight.departure_time.clone().unwrap_or_default(),
        passengers: 1,
        amount: flight.price.unwrap_or(0.0),
        flight_details: details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use crate::ui::RecordingUi;
    use serde_json::json;
    use std::sync::Arc;
    use ttravels_core::ApiError;
    use ttravels_store::{AppConfig, KeyValueStore, MemoryStore};

    fn page(api: Arc<FakeApi>, store: Arc<MemoryStore>) -> FlightSearchController<RecordingUi> {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let ctx = AppContext::new(api, store, AppConfig::default()).with_today(today);
        FlightSearchController::new(ctx, RecordingUi::new())
    }

    fn flights() -> Value {
        json!([
            {"airline": "IndiGo", "flight_number": "6E 201", "origin": "DEL", "destination": "BOM", "departure_time": "2025-01-11 06:30", "price": 5400, "stops": 0},
            {"airline": "Air India", "flight_number": "AI 887", "origin": "DEL", "destination": "BOM", "departure_time": "2025-01-11 14:10", "price": 4100, "stops": 1},
            {"airline": "Vistara", "flight_number": "UK 955", "origin": "DEL", "destination": "BOM", "departure_time": "2025-01-11 19:45", "price": 7200, "stops": 0},
        ])
    }

    #[test]
    fn test_default_dates() {
        let page = page(Arc::new(FakeApi::new()), Arc::new(MemoryStore::new()));
        assert_eq!(page.form().departure, NaiveDate::from_ymd_opt(2025, 1, 11));
        assert_eq!(page.form().return_date, NaiveDate::from_ymd_opt(2025, 1, 18));
    }

    #[test]
    fn test_autocomplete() {
        let mut page = page(Arc::new(FakeApi::new()), Arc::new(MemoryStore::new()));
        page.type_airport(Direction::From, "");
        assert!(page.ui().slot(Slot::AirportSuggestions).contains("Popular airports"));

        page.type_airport(Direction::From, "mum");
        assert!(page.ui().slot(Slot::AirportSuggestions).contains("BOM"));

        page.type_airport(Direction::To, "zzzz");
        assert!(page.ui().slot(Slot::AirportSuggestions).contains("No airports found."));

        assert!(page.pick_airport(Direction::To, "GOI"));
        assert_eq!(page.form().to, "Goa (GOI)");
    }

    #[tokio::test]
    async fn test_validation_stops_search() {
        let api = Arc::new(FakeApi::new());
        let mut page = page(api.clone(), Arc::new(MemoryStore::new()));
        page.pick_airport(Direction::From, "DEL");
        page.pick_airport(Direction::To, "DEL");

        assert_eq!(page.search().await, 0);
        assert_eq!(
            page.ui().toasts,
            vec![(ToastKind::Error, "Departure and arrival airports cannot be the same".to_string())]
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_filter_sort() {
        let api = Arc::new(FakeApi::new());
        api.reply("search", Ok(flights()));
        let mut page = page(api.clone(), Arc::new(MemoryStore::new()));
        page.pick_airport(Direction::From, "DEL");
        page.pick_airport(Direction::To, "BOM");
        page.set_trip_type(TripType::OneWay);

        assert_eq!(page.search().await, 3);
        let sent = &api.calls_to("search")[0];
        assert_eq!(sent["from"], "DEL");
        assert!(sent.get("return").is_none());
        assert_eq!(page.ui().slot(Slot::FlightCount), "3 flights found");

        let prices: Vec<f64> = page.visible().iter().filter_map(|f| f.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));

        page.set_stops(BTreeSet::from([0]));
        page.set_times(BTreeSet::from([TimeBucket::Evening]));
        assert_eq!(page.ui().slot(Slot::FlightCount), "1 flight found");
        assert_eq!(page.visible()[0].airline, "Vistara");

        page.reset_filters();
        page.sort_by(SortKey::PriceDesc);
        assert_eq!(page.visible()[0].airline, "Vistara");
    }

    #[tokio::test]
    async fn test_empty_results_and_failure() {
        let api = Arc::new(FakeApi::new());
        api.reply("search", Ok(json!([])))
            .reply("search", Err(ApiError::Rejected("Invalid airport code".into())));
        let mut page = page(api, Arc::new(MemoryStore::new()));
        page.pick_airport(Direction::From, "DEL");
        page.pick_airport(Direction::To, "BOM");

        page.search().await;
        assert_eq!(
            page.ui().toasts,
            vec![(ToastKind::Error, "Search Error: No flights were returned for this query.".to_string())]
        );

        page.search().await;
        let results = page.ui().slot(Slot::FlightResults);
        assert!(results.contains("Search failed"));
        assert!(results.contains("Invalid airport code"));
    }

    #[tokio::test]
    async fn test_select_stores_draft() {
        let api = Arc::new(FakeApi::new());
        api.reply("search", Ok(flights()));
        let store = Arc::new(MemoryStore::new());
        let mut page = page(api, store.clone());
        page.pick_airport(Direction::From, "DEL");
        page.pick_airport(Direction::To, "BOM");
        page.search().await;

        assert!(page.select_flight(0));
        let draft: Value = local_store::get_json(store.as_ref(), keys::CURRENT_BOOKING)
            .unwrap()
            .unwrap();
        assert_eq!(draft["service"], "Air India AI 887");
        assert_eq!(draft["route"], "DEL → BOM");
        assert_eq!(draft["amount"], 4100.0);
        assert_eq!(draft["flightDetails"]["flight_number"], "AI 887");
        assert_eq!(page.ui().navigations, vec!["booking/flight.html"]);

        assert!(!page.select_flight(9));
        assert!(store.get(keys::CURRENT_BOOKING).unwrap().is_some());
    }
}
