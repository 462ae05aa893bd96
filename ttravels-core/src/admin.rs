//! Admin table rows and the adapters that build them from backend documents.

use serde_json::Value;
use ttravels_shared::json;

use crate::status::{BookingStatus, PaymentStatus, UserStatus};
use crate::trip_plan::TripPlan;

/// One row of the admin bookings table.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminBooking {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub service: String,
    pub details: String,
    pub date: Option<String>,
    pub amount: f64,
    pub status: BookingStatus,
}

impl AdminBooking {
    /// `details` and `contact_info` may be stored as JSON strings; unreadable
    /// values are treated as empty objects.
    pub fn from_document(doc: &Value) -> Self {
        let details = json::embedded(doc.get("details"));
        let contact = json::embedded(doc.get("contact_info"));

        Self {
            id: json::first_text(doc, &["/$id", "/booking_id", "/id"]).unwrap_or_default(),
            user_id: json::text(doc.get("user_id")).unwrap_or_else(|| "-".to_string()),
            email: json::text(contact.get("email")).unwrap_or_else(|| "-".to_string()),
            service: json::text(doc.get("type")).unwrap_or_else(|| "-".to_string()),
            details: json::first_text(
                &details,
                &[
                    "/hotel/name",
                    "/flight/airline",
                    "/train/train_name",
                    "/bus/route",
                    "/car/car",
                    "/service_type",
                ],
            )
            .unwrap_or_else(|| "-".to_string()),
            date: json::first_text(doc, &["/created_at", "/booking_date", "/booked_at"]),
            amount: json::first_number(doc, &["/fare_total", "/amount"]).unwrap_or(0.0),
            status: json::first_text(doc, &["/payment_status", "/status"])
                .map(BookingStatus::from)
                .unwrap_or(BookingStatus::Confirmed),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub joined: Option<String>,
    /// The users collection does not carry a booking count.
    pub bookings: Option<u32>,
    pub status: UserStatus,
}

impl AdminUser {
    pub fn from_document(doc: &Value) -> Self {
        let first = json::text(doc.get("fname"));
        let last = json::text(doc.get("lname"));
        let name = match (first, last) {
            (Some(f), Some(l)) => format!("{} {}", f, l),
            (Some(n), None) | (None, Some(n)) => n,
            (None, None) => "-".to_string(),
        };

        Self {
            id: json::first_text(doc, &["/$id", "/id"]).unwrap_or_default(),
            name,
            email: json::text(doc.get("email")).unwrap_or_else(|| "-".to_string()),
            phone: json::text(doc.get("mobile")).unwrap_or_else(|| "-".to_string()),
            joined: json::first_text(doc, &["/$createdAt", "/created_at"]),
            bookings: None,
            status: json::text(doc.get("status"))
                .map(UserStatus::from)
                .unwrap_or(UserStatus::Active),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminPayment {
    pub id: String,
    pub booking_id: String,
    pub user_id: String,
    pub amount: f64,
    pub method: String,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub date: Option<String>,
}

impl AdminPayment {
    pub fn from_document(doc: &Value) -> Self {
        let dash = || "-".to_string();
        Self {
            id: json::first_text(doc, &["/$id", "/payment_id", "/id"]).unwrap_or_else(dash),
            booking_id: json::text(doc.get("booking_id")).unwrap_or_else(dash),
            user_id: json::text(doc.get("user_id")).unwrap_or_else(dash),
            amount: json::number(doc.get("amount")).unwrap_or(0.0),
            method: json::text(doc.get("method")).unwrap_or_else(dash),
            status: PaymentStatus::from(json::text(doc.get("status")).unwrap_or_else(dash)),
            transaction_id: json::text(doc.get("transaction_id")).unwrap_or_else(dash),
            date: json::first_text(doc, &["/timestamp", "/created_at"]),
        }
    }
}

/// A saved AI trip plan as listed on the AI logs tab.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminAiLog {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub destination: String,
    pub created_at: Option<String>,
}

impl AdminAiLog {
    pub fn from_document(doc: &Value) -> Self {
        let plan = json::embedded(doc.get("trip_plan"));
        Self {
            id: json::first_text(doc, &["/$id", "/id"]).unwrap_or_default(),
            user_id: json::text(doc.get("user_id")).unwrap_or_else(|| "-".to_string()),
            title: json::text(doc.get("title")).unwrap_or_else(|| "-".to_string()),
            destination: json::first_text(&plan, &["/details/destination", "/destination"])
                .unwrap_or_else(|| "-".to_string()),
            created_at: json::first_text(doc, &["/$createdAt", "/created_at", "/createdAt"]),
        }
    }

    /// Full plan carried by a single-log response, for the details dialog.
    pub fn plan_of(doc: &Value) -> TripPlan {
        TripPlan::from_value(doc.get("trip_plan").unwrap_or(&Value::Null))
    }
}
