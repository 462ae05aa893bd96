use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use ttravels_app::controllers::{
    AdminPanelController, AssistantController, BookingManagementController, DashboardController,
    EditTripController, FlightSearchController,
};
use ttravels_app::{AppContext, RecordingUi, Slot, ToastKind};
use ttravels_core::airports::Direction;
use ttravels_core::api::AdminCollection;
use ttravels_core::chat::SaveState;
use ttravels_core::dashboard::DashboardTab;
use ttravels_core::flights::{SortKey, TripType};
use ttravels_store::app_config::ApiConfig;
use ttravels_store::local_store::keys;
use ttravels_store::{ApiClient, AppConfig, KeyValueStore, MemoryStore};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context(server: &MockServer, store: Arc<MemoryStore>) -> AppContext {
    let api = ApiClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .unwrap();
    let mut config = AppConfig::default();
    config.listing.debounce_ms = 0;
    AppContext::new(Arc::new(api), store, config).with_today(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
}

#[tokio::test]
async fn test_admin_table_shows_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": "db down"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "users": [{"$id": "u1", "fname": "Ravi <b>", "lname": "Kumar", "email": "ravi@example.in"}]
        })))
        .mount(&server)
        .await;

    let ctx = context(&server, Arc::new(MemoryStore::new()));
    let mut page = AdminPanelController::new(ctx, RecordingUi::new());
    page.load(AdminCollection::Bookings).await;
    page.load(AdminCollection::Users).await;

    assert!(page.ui().slot(Slot::AdminTable(AdminCollection::Bookings)).contains("db down"));
    let users = page.ui().slot(Slot::AdminTable(AdminCollection::Users));
    assert!(users.contains("Ravi &lt;b&gt; Kumar"));
    assert!(!users.contains("<b>"));
    assert_eq!(page.users().len(), 1);
}

#[tokio::test]
async fn test_chat_plan_select_then_save_needs_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Here is your Goa plan",
            "trip_plan": {
                "details": {"destination": "Goa", "days": 3},
                "hotels": [{"name": "Taj Fort Aguada", "price": 12000}, {"name": "W Goa", "price": 18000}],
                "flights": [{"airline": "IndiGo", "price": 4500}]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/save-trip-plan"))
        .and(body_partial_json(json!({"trip_plan": {"selected_hotel": {"name": "W Goa"}}})))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "login required"})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, Arc::new(MemoryStore::new()));
    let mut chat = AssistantController::new(ctx, RecordingUi::agreeing());
    chat.open();
    chat.send_text("Plan 3 days in Goa").await;

    let entry = chat
        .transcript()
        .entries()
        .iter()
        .find(|e| e.card.is_some())
        .map(|e| e.id)
        .unwrap();
    assert!(chat.select_hotel(entry, 1));
    assert!(!chat.save_plan(entry).await);

    assert_eq!(chat.card(entry).unwrap().save, SaveState::Unsaved);
    assert_eq!(chat.ui().navigations, vec!["/login"]);
}

#[tokio::test]
async fn test_dashboard_delete_reloads_saved_plans() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/my-saved-plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "plans": [{"id": "tp_1", "title": "Weekend", "trip_plan": {"details": {"destination": "Goa", "days": 3}}}]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete-trip-plan/tp_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(keys::CACHED_USER, r#"{"fname": "Meera"}"#).unwrap();
    let mut page = DashboardController::new(context(&server, store), RecordingUi::agreeing());
    page.open(DashboardTab::SavedPlans).await;

    assert_eq!(page.ui().slot(Slot::DashboardWelcome), "Welcome back, Meera!");
    assert!(page.ui().slot(Slot::DashboardContent).contains("3 Days"));

    assert!(page.delete_plan("tp_1").await);
    assert_eq!(
        page.ui().toasts,
        vec![(ToastKind::Success, "Trip plan deleted successfully".to_string())]
    );
}

#[tokio::test]
async fn test_booking_management_filters_by_date() {
    let server = MockServer::start().await;
    let bookings: Vec<Value> = (1..=6)
        .map(|n| {
            json!({
                "$id": format!("BK{}", n),
                "type": "flight",
                "status": "confirmed",
                "created_at": format!("2025-02-{:02}T10:00:00Z", n * 4),
                "contact_info": {"name": format!("Traveller {}", n), "email": format!("t{}@example.in", n)},
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/admin/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "bookings": bookings})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(keys::ADMIN_FLAG, "true").unwrap();
    let mut page = BookingManagementController::new(context(&server, store), RecordingUi::new());
    assert!(page.init().await);
    assert_eq!(page.ledger().filtered_len(), 6);

    page.filter_dates(NaiveDate::from_ymd_opt(2025, 2, 8), NaiveDate::from_ymd_opt(2025, 2, 16));
    let ids: Vec<&str> = page.ledger().filtered().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["BK2", "BK3", "BK4"]);

    page.search("traveller 3");
    assert_eq!(page.ledger().filtered_len(), 1);
    assert!(page.ui().slot(Slot::ManagementTable).contains("BK3"));
}

#[tokio::test]
async fn test_flight_search_sorts_merged_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"from": "BLR", "to": "GOI"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "best_flights": [
                {"airline": "IndiGo", "flight_number": "6E 511", "price": 3900, "departure_time": "2025-03-02 07:10"}
            ],
            "other_flights": [
                {"airline": "Akasa Air", "flight_number": "QP 1342", "price": 3100, "departure_time": "2025-03-02 13:25"},
                {"airline": "Air India", "flight_number": "AI 2870", "price": 6200, "departure_time": "2025-03-02 20:05"}
            ]
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let mut page = FlightSearchController::new(context(&server, store.clone()), RecordingUi::new());
    page.pick_airport(Direction::From, "BLR");
    page.pick_airport(Direction::To, "GOI");
    page.set_trip_type(TripType::OneWay);

    assert_eq!(page.search().await, 3);
    let airlines: Vec<&str> = page.visible().iter().map(|f| f.airline.as_str()).collect();
    assert_eq!(airlines, vec!["Akasa Air", "IndiGo", "Air India"]);
    assert!(page.ui().toasts.is_empty());

    page.sort_by(SortKey::PriceDesc);
    assert!(page.select_flight(0));
    let stored = store.get(keys::CURRENT_BOOKING).unwrap().unwrap();
    let draft: Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(draft["service"], "Air India AI 2870");
    assert_eq!(draft["date"], "2025-03-02 20:05");
}

#[tokio::test]
async fn test_flight_search_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "SerpApi quota exceeded"})))
        .mount(&server)
        .await;

    let mut page = FlightSearchController::new(context(&server, Arc::new(MemoryStore::new())), RecordingUi::new());
    page.pick_airport(Direction::From, "DEL");
    page.pick_airport(Direction::To, "CCU");

    assert_eq!(page.search().await, 0);
    assert!(page.ui().slot(Slot::FlightResults).contains("SerpApi quota exceeded"));
    assert!(!page.ui().toasts.iter().any(|(kind, _)| *kind == ToastKind::Success));
}

#[tokio::test]
async fn test_edit_trip_saves_through_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/saved-trip-plan/tp_7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "plan": {
                "id": "tp_7",
                "title": "Kerala backwaters",
                "trip_plan": {
                    "details": {"destination": "Alleppey", "days": 2},
                    "hotels": [{"name": "Lake Palace Resort"}],
                    "itinerary_text": "Day 1: Houseboat"
                }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/update-trip-plan/tp_7"))
        .and(body_partial_json(json!({"trip_plan": {"itinerary_text": "Day 1: Houseboat\nDay 2: Marari beach"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = EditTripController::new(context(&server, Arc::new(MemoryStore::new())), RecordingUi::new());
    assert!(page.load("tp_7").await);
    assert!(page.ui().slot(Slot::TripHeader).contains("Alleppey"));

    assert!(page.save("Day 1: Houseboat\nDay 2: Marari beach").await);
    assert_eq!(page.ui().alerts, vec!["Changes saved successfully!"]);
    assert_eq!(page.ui().navigations, vec!["/dashboard"]);
}
