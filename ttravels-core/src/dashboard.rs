//! Customer dashboard view models: booking cards and saved trip plans.

use serde_json::Value;
use ttravels_shared::{json, Masked};

use crate::api::SavedPlanDocument;
use crate::status::BookingStatus;
use crate::trip_plan::{HotelOption, TripPlan};

pub const DEFAULT_TRIP_IMAGE: &str = "/static/img/default-trip.jpg";

/// Service category of a booking, named the way the dashboard tabs are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookingKind {
    Flights,
    Hotels,
    Trains,
    Buses,
    Cars,
    Other(String),
}

impl BookingKind {
    /// Accepts singular or plural forms (`flight`, `Flights`, `bus`, `buses`).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "flight" | "flights" => BookingKind::Flights,
            "hotel" | "hotels" => BookingKind::Hotels,
            "train" | "trains" => BookingKind::Trains,
            "bus" | "buses" => BookingKind::Buses,
            "car" | "cars" => BookingKind::Cars,
            other => BookingKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BookingKind::Flights => "flights",
            BookingKind::Hotels => "hotels",
            BookingKind::Trains => "trains",
            BookingKind::Buses => "buses",
            BookingKind::Cars => "cars",
            BookingKind::Other(raw) => raw,
        }
    }
}

/// Dashboard tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardTab {
    All,
    Kind(BookingKind),
    SavedPlans,
}

impl DashboardTab {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "all" => DashboardTab::All,
            "saved-plans" | "saved" => DashboardTab::SavedPlans,
            other => DashboardTab::Kind(BookingKind::parse(other)),
        }
    }

    pub fn includes(&self, card: &BookingCard) -> bool {
        match self {
            DashboardTab::All => true,
            DashboardTab::Kind(kind) => card.kind == *kind,
            DashboardTab::SavedPlans => false,
        }
    }
}

/// A booking as shown on the customer dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingCard {
    pub id: String,
    pub kind: BookingKind,
    pub title: String,
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub location: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub train_name: Option<String>,
    pub train_number: Option<String>,
    pub operator: Option<String>,
    pub bus_number: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: BookingStatus,
    pub price: f64,
    pub passengers: u32,
    pub guests: u32,
    pub booking_date: Option<String>,
    pub contact_email: Masked<String>,
    pub contact_phone: Masked<String>,
}

impl BookingCard {
    pub fn from_document(doc: &Value) -> Self {
        let details = json::embedded(doc.get("details"));
        let contact = json::embedded(doc.get("contact_info"));

        Self {
            id: json::first_text(doc, &["/$id", "/booking_id", "/id"]).unwrap_or_default(),
            kind: BookingKind::parse(&json::text(doc.get("type")).unwrap_or_default()),
            title: first_of(
                &details,
                doc,
                &["/hotel/name", "/flight/airline", "/train/train_name", "/bus/route", "/car/car"],
                &["/service", "/service_type"],
            )
            .unwrap_or_else(|| "Booking".to_string()),
            airline: first_of(&details, doc, &["/flight/airline"], &["/airline"]),
            flight_number: first_of(&details, doc, &["/flight/flight_number"], &["/flight_number"]),
            location: first_of(&details, doc, &["/hotel/address"], &["/location"]),
            check_in: first_of(&details, doc, &["/hotel/check_in"], &["/check_in"]),
            check_out: first_of(&details, doc, &["/hotel/check_out"], &["/check_out"]),
            train_name: first_of(&details, doc, &["/train/train_name"], &["/train_name"]),
            train_number: first_of(&details, doc, &["/train/train_number"], &["/train_number"]),
            operator: first_of(&details, doc, &["/bus/operator"], &["/operator"]),
            bus_number: first_of(&details, doc, &["/bus/bus_number"], &["/bus_number"]),
            date: first_of(&details, doc, &["/flight/date", "/train/date", "/bus/date"], &["/date"]),
            time: first_of(
                &details,
                doc,
                &["/flight/departure_time", "/train/departure_time", "/bus/departure_time"],
                &["/time"],
            ),
            status: json::first_text(doc, &["/payment_status", "/status"])
                .map(BookingStatus::from)
                .unwrap_or(BookingStatus::Confirmed),
            price: json::first_number(doc, &["/fare_total", "/amount"]).unwrap_or(0.0),
            passengers: count_of(
                &details,
                doc,
                &["/flight/passengers", "/train/passengers", "/bus/passengers"],
                &["/num_passengers", "/passengers"],
            ),
            guests: count_of(&details, doc, &["/hotel/guests"], &["/num_guests", "/guests"]),
            booking_date: json::first_text(doc, &["/created_at", "/booking_date", "/booked_at"]),
            contact_email: Masked(json::text(contact.get("email")).unwrap_or_default()),
            contact_phone: Masked(json::text(contact.get("phone")).unwrap_or_default()),
        }
    }
}

fn first_of(details: &Value, doc: &Value, detail_paths: &[&str], doc_paths: &[&str]) -> Option<String> {
    json::first_text(details, detail_paths).or_else(|| json::first_text(doc, doc_paths))
}

fn count_of(details: &Value, doc: &Value, detail_paths: &[&str], doc_paths: &[&str]) -> u32 {
    json::first_number(details, detail_paths)
        .or_else(|| json::first_number(doc, doc_paths))
        .map(|n| n.max(1.0) as u32)
        .unwrap_or(1)
}

/// A saved AI trip plan on the "Saved plans" tab.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedPlanCard {
    pub id: String,
    pub destination: String,
    pub duration: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image_url: String,
    pub summary: String,
    pub highlights: Vec<String>,
    pub estimated_cost: f64,
    pub saved_date: Option<String>,
}

impl SavedPlanCard {
    pub const VISIBLE_HIGHLIGHTS: usize = 3;

    pub fn from_document(doc: &Value) -> Self {
        let plan = json::embedded(doc.get("trip_plan"));
        let details = match plan.get("details") {
            Some(details @ Value::Object(_)) => details.clone(),
            _ => plan.clone(),
        };

        let duration = json::text(details.get("days"))
            .map(|days| format!("{} Days", days))
            .or_else(|| json::first_text(&plan, &["/duration", "/days"]))
            .unwrap_or_default();

        let mut highlights = json::strings(&plan, "/highlights");
        if highlights.is_empty() {
            highlights = json::strings(&details, "/highlights");
        }
        if highlights.is_empty() {
            highlights = json::strings(&plan, "/tags");
        }

        Self {
            id: json::first_text(doc, &["/id", "/raw/$id"]).unwrap_or_default(),
            destination: json::first_text(&details, &["/destination", "/city"])
                .or_else(|| json::first_text(&plan, &["/destination", "/title"]))
                .or_else(|| json::text(doc.get("title")))
                .unwrap_or_else(|| "Trip".to_string()),
            duration,
            start_date: json::first_text(&details, &["/start_date", "/startDate", "/departure_date", "/from"]),
            end_date: json::first_text(&details, &["/end_date", "/endDate", "/return_date", "/to"]),
            image_url: json::text(details.get("image"))
                .or_else(|| json::first_text(&plan, &["/imageUrl", "/image"]))
                .unwrap_or_else(|| DEFAULT_TRIP_IMAGE.to_string()),
            summary: json::first_text(&plan, &["/itinerary_text", "/summary", "/itinerary"])
                .or_else(|| json::text(details.get("summary")))
                .unwrap_or_default(),
            highlights,
            estimated_cost: json::first_number(&plan, &["/estimated_cost", "/estimatedCost"])
                .or_else(|| json::number(details.get("estimated_cost")))
                .unwrap_or(0.0),
            saved_date: json::first_text(doc, &["/saved_at", "/raw/created_at"]),
        }
    }

    pub fn visible_highlights(&self) -> &[String] {
        let end = self.highlights.len().min(Self::VISIBLE_HIGHLIGHTS);
        &self.highlights[..end]
    }

    /// Count for the "+N more" chip.
    pub fn hidden_highlights(&self) -> usize {
        self.highlights.len().saturating_sub(Self::VISIBLE_HIGHLIGHTS)
    }
}

/// Content of the saved-plan details dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDetail {
    pub id: String,
    pub title: String,
    pub itinerary: String,
    pub hotels: Vec<HotelOption>,
}

impl PlanDetail {
    pub fn from_document(id: &str, doc: &SavedPlanDocument) -> Self {
        let plan: TripPlan = doc.plan();
        let title = doc
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| plan.destination())
            .unwrap_or_else(|| "Trip Details".to_string());
        let itinerary = json::text(plan.extra.get("itinerary_text"))
            .or_else(|| json::text(plan.extra.get("summary_text")))
            .unwrap_or_else(|| "No itinerary available.".to_string());

        Self {
            id: id.to_string(),
            title,
            itinerary,
            hotels: plan.hotel_options(),
        }
    }

    pub fn edit_url(&self) -> String {
        format!("/edit-trip/{}", self.id)
    }
}
