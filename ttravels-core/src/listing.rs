//! In-memory booking and user lists behind the admin management pages.
//!
//! The pages load everything once, then search, filter and paginate locally.
//! Status changes made here (cancel, suspend) are optimistic and never sent
//! to the backend.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use ttravels_shared::{format, json, Masked};

use crate::dashboard::BookingKind;
use crate::status::{BookingStatus, UserStatus};
use crate::{CoreError, CoreResult};

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub trait Keyed {
    fn key(&self) -> &str;
}

pub trait RecordFilter<T> {
    fn matches(&self, item: &T) -> bool;
}

/// Page position over the filtered set. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Pagination {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1))
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Number of rows on the current page.
    pub fn showing(&self) -> usize {
        let start = (self.page - 1) * self.page_size;
        self.total.saturating_sub(start).min(self.page_size)
    }
}

/// Holds the full record set and the filtered view over it.
///
/// `base` is the filter `clear` returns to; it also carries context such as
/// the reference date that clearing must keep.
#[derive(Debug, Clone)]
pub struct Ledger<T, F> {
    records: Vec<T>,
    visible: Vec<usize>,
    base: F,
    filter: F,
    page: usize,
    page_size: usize,
}

impl<T: Keyed, F: RecordFilter<T> + Clone + Default> Ledger<T, F> {
    pub fn new(records: Vec<T>, page_size: usize) -> Self {
        Self::with_filter(records, page_size, F::default())
    }
}

impl<T: Keyed, F: RecordFilter<T> + Clone> Ledger<T, F> {
    pub fn with_filter(records: Vec<T>, page_size: usize, base: F) -> Self {
        let mut ledger = Self {
            records,
            visible: Vec::new(),
            filter: base.clone(),
            base,
            page: 1,
            page_size: page_size.max(1),
        };
        ledger.refilter();
        ledger
    }

    /// Replaces the active filter and returns to page 1.
    pub fn apply(&mut self, filter: F) {
        self.filter = filter;
        self.page = 1;
        self.refilter();
    }

    /// Back to the base filter, on page 1.
    pub fn clear(&mut self) {
        self.apply(self.base.clone());
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn filtered(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().map(move |&i| &self.records[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// Records on the current page.
    pub fn page_items(&self) -> Vec<&T> {
        self.filtered()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            page_size: self.page_size,
            total: self.visible.len(),
        }
    }

    /// Moves to `page` if it exists; returns whether the page changed.
    pub fn change_page(&mut self, page: usize) -> bool {
        let pages = self.pagination().total_pages();
        if page >= 1 && page <= pages && page != self.page {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.records.iter().find(|r| r.key() == key)
    }

    /// Mutates one record in place, then re-evaluates the filter.
    pub fn update(&mut self, key: &str, change: impl FnOnce(&mut T)) -> CoreResult<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.key() == key)
            .ok_or_else(|| CoreError::NotFound(key.to_string()))?;
        change(record);
        self.refilter();
        Ok(())
    }

    fn refilter(&mut self) {
        let filter = &self.filter;
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(total = self.records.len(), visible = self.visible.len(), "ledger refiltered");
        let pages = self.pagination().total_pages().max(1);
        self.page = self.page.clamp(1, pages);
    }
}

// ============================================================================
// Bookings
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
}

/// What was booked, by service type.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceDetails {
    Flight {
        route: String,
        time: Option<String>,
        class: Option<String>,
        date: Option<String>,
    },
    Hotel {
        location: String,
        rooms: u32,
        check_in: Option<String>,
        check_out: Option<String>,
    },
    Train {
        route: String,
        class: Option<String>,
        date: Option<String>,
    },
    Bus {
        route: String,
        seats: Vec<String>,
        date: Option<String>,
    },
    Car {
        pickup: String,
        drop: String,
        start_date: Option<String>,
        end_date: Option<String>,
    },
    Other,
}

fn route_of(details: &Value, section: &str) -> String {
    if let Some(route) = json::text(details.pointer(&format!("/{}/route", section))) {
        return route;
    }
    let (from_key, origin_key) = (format!("/{}/from", section), format!("/{}/origin", section));
    let (to_key, destination_key) = (format!("/{}/to", section), format!("/{}/destination", section));
    let from = json::first_text(details, &[from_key.as_str(), origin_key.as_str()]);
    let to = json::first_text(details, &[to_key.as_str(), destination_key.as_str()]);
    match (from, to) {
        (Some(from), Some(to)) => format!("{} → {}", from, to),
        (Some(one), None) | (None, Some(one)) => one,
        (None, None) => "-".to_string(),
    }
}

fn first_date(doc: &Value, pointers: &[&str]) -> Option<NaiveDate> {
    json::first_text(doc, pointers).and_then(|raw| format::parse_date(&raw))
}

impl ServiceDetails {
    fn from_details(kind: &BookingKind, details: &Value) -> Self {
        let route = |section: &str| route_of(details, section);

        match kind {
            BookingKind::Flights => ServiceDetails::Flight {
                route: route("flight"),
                time: json::text(details.pointer("/flight/departure_time")),
                class: json::first_text(details, &["/flight/class", "/flight/travel_class"]),
                date: json::text(details.pointer("/flight/date")),
            },
            BookingKind::Hotels => ServiceDetails::Hotel {
                location: json::first_text(details, &["/hotel/address", "/hotel/location", "/hotel/city"])
                    .unwrap_or_else(|| "-".to_string()),
                rooms: json::number(details.pointer("/hotel/rooms")).map(|n| n as u32).unwrap_or(1),
                check_in: json::text(details.pointer("/hotel/check_in")),
                check_out: json::text(details.pointer("/hotel/check_out")),
            },
            BookingKind::Trains => ServiceDetails::Train {
                route: route("train"),
                class: json::first_text(details, &["/train/class", "/train/travel_class"]),
                date: json::text(details.pointer("/train/date")),
            },
            BookingKind::Buses => ServiceDetails::Bus {
                route: route("bus"),
                seats: match details.pointer("/bus/seats") {
                    Some(Value::Array(_)) => json::strings(details, "/bus/seats"),
                    other => json::text(other).into_iter().collect(),
                },
                date: json::text(details.pointer("/bus/date")),
            },
            BookingKind::Cars => ServiceDetails::Car {
                pickup: json::first_text(details, &["/car/pickup", "/car/pickup_location"])
                    .unwrap_or_else(|| "-".to_string()),
                drop: json::first_text(details, &["/car/drop", "/car/drop_location"])
                    .unwrap_or_else(|| "-".to_string()),
                start_date: json::text(details.pointer("/car/start_date")),
                end_date: json::text(details.pointer("/car/end_date")),
            },
            BookingKind::Other(_) => ServiceDetails::Other,
        }
    }

    /// One-line description for the table ("DEL → BOM • 06:30").
    pub fn summary(&self) -> String {
        match self {
            ServiceDetails::Flight { route, time, .. } => {
                format!("{} • {}", route, time.as_deref().unwrap_or("-"))
            }
            ServiceDetails::Hotel { location, rooms, .. } => format!("{} • {} room(s)", location, rooms),
            ServiceDetails::Train { route, class, .. } => {
                format!("{} • {}", route, class.as_deref().unwrap_or("-"))
            }
            ServiceDetails::Bus { route, seats, .. } => format!("{} • {}", route, seats.join(", ")),
            ServiceDetails::Car { pickup, drop, .. } => format!("{} → {}", pickup, drop),
            ServiceDetails::Other => String::new(),
        }
    }

    /// Travel date, or the stay/rental span.
    pub fn travel_dates(&self) -> String {
        let date = |d: &Option<String>| d.as_deref().map(format::format_date).unwrap_or_else(|| "-".to_string());
        match self {
            ServiceDetails::Flight { date: d, .. }
            | ServiceDetails::Train { date: d, .. }
            | ServiceDetails::Bus { date: d, .. } => date(d),
            ServiceDetails::Hotel { check_in, check_out, .. } => format!("{} - {}", date(check_in), date(check_out)),
            ServiceDetails::Car { start_date, end_date, .. } => format!("{} - {}", date(start_date), date(end_date)),
            ServiceDetails::Other => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagedBooking {
    pub id: String,
    pub kind: BookingKind,
    pub customer: Customer,
    pub service_name: String,
    pub service: ServiceDetails,
    pub amount: f64,
    pub status: BookingStatus,
    pub booking_date: Option<NaiveDate>,
}

impl ManagedBooking {
    pub fn from_document(doc: &Value) -> Self {
        let details = json::embedded(doc.get("details"));
        let contact = json::embedded(doc.get("contact_info"));
        let kind = BookingKind::parse(&json::text(doc.get("type")).unwrap_or_default());

        Self {
            id: json::first_text(doc, &["/$id", "/booking_id", "/id"]).unwrap_or_default(),
            customer: Customer {
                name: json::text(contact.get("name"))
                    .or_else(|| json::first_text(doc, &["/user_name", "/user_id"]))
                    .unwrap_or_else(|| "-".to_string()),
                email: Masked(json::text(contact.get("email")).unwrap_or_default()),
                phone: Masked(json::text(contact.get("phone")).unwrap_or_default()),
            },
            service_name: json::first_text(
                &details,
                &["/hotel/name", "/flight/airline", "/train/train_name", "/bus/operator", "/car/car", "/service_type"],
            )
            .unwrap_or_else(|| kind.as_str().to_string()),
            service: ServiceDetails::from_details(&kind, &details),
            kind,
            amount: json::first_number(doc, &["/fare_total", "/amount"]).unwrap_or(0.0),
            status: json::first_text(doc, &["/payment_status", "/status"])
                .map(BookingStatus::from)
                .unwrap_or(BookingStatus::Confirmed),
            booking_date: first_date(doc, &["/created_at", "/booking_date", "/booked_at"]),
        }
    }
}

impl Keyed for ManagedBooking {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub search: String,
    pub kind: Option<BookingKind>,
    pub status: Option<BookingStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter<ManagedBooking> for BookingFilter {
    fn matches(&self, booking: &ManagedBooking) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_match = needle.is_empty()
            || booking.id.to_lowercase().contains(&needle)
            || booking.customer.name.to_lowercase().contains(&needle)
            || booking.customer.email.expose().to_lowercase().contains(&needle)
            || booking.service_name.to_lowercase().contains(&needle);

        let kind_match = self.kind.as_ref().map_or(true, |k| *k == booking.kind);
        let status_match = self.status.as_ref().map_or(true, |s| *s == booking.status);

        let date_match = match (self.date_from, self.date_to) {
            (None, None) => true,
            (from, to) => booking.booking_date.is_some_and(|date| {
                from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
            }),
        };

        search_match && kind_match && status_match && date_match
    }
}

pub type BookingLedger = Ledger<ManagedBooking, BookingFilter>;

// ============================================================================
// Users
// ============================================================================

/// Registration-date buckets offered by the user filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinedWithin {
    Today,
    Week,
    Month,
    Year,
}

impl JoinedWithin {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "today" => Some(JoinedWithin::Today),
            "week" => Some(JoinedWithin::Week),
            "month" => Some(JoinedWithin::Month),
            "year" => Some(JoinedWithin::Year),
            _ => None,
        }
    }

    /// Today: same day. Week: the last seven days. Month and year are calendar periods.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            JoinedWithin::Today => date == today,
            JoinedWithin::Week => date >= today - chrono::Duration::days(7),
            JoinedWithin::Month => date.month() == today.month() && date.year() == today.year(),
            JoinedWithin::Year => date.year() == today.year(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagedUser {
    pub id: String,
    pub name: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
    pub registration_date: Option<NaiveDate>,
    pub last_login: Option<NaiveDate>,
    pub status: UserStatus,
    pub bookings: Option<u32>,
    pub total_spent: f64,
}

impl ManagedUser {
    pub fn from_document(doc: &Value) -> Self {
        let base = crate::admin::AdminUser::from_document(doc);
        Self {
            id: base.id,
            name: base.name,
            email: Masked(if base.email == "-" { String::new() } else { base.email }),
            phone: Masked(if base.phone == "-" { String::new() } else { base.phone }),
            registration_date: first_date(doc, &["/$createdAt", "/created_at", "/registration_date"]),
            last_login: first_date(doc, &["/last_login", "/lastLogin", "/$updatedAt"]),
            status: base.status,
            bookings: json::first_number(doc, &["/bookings", "/booking_count"]).map(|n| n as u32),
            total_spent: json::first_number(doc, &["/total_spent", "/totalSpent"]).unwrap_or(0.0),
        }
    }
}

impl Keyed for ManagedUser {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserFilter {
    pub search: String,
    pub status: Option<UserStatus>,
    pub joined: Option<JoinedWithin>,
    pub today: NaiveDate,
}

impl UserFilter {
    /// No constraints; registration buckets are measured from `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            search: String::new(),
            status: None,
            joined: None,
            today,
        }
    }
}

impl RecordFilter<ManagedUser> for UserFilter {
    fn matches(&self, user: &ManagedUser) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_match = needle.is_empty()
            || user.name.to_lowercase().contains(&needle)
            || user.email.expose().to_lowercase().contains(&needle)
            || user.phone.expose().contains(&needle);

        let status_match = self.status.as_ref().map_or(true, |s| *s == user.status);
        let date_match = match self.joined {
            None => true,
            Some(bucket) => user
                .registration_date
                .is_some_and(|date| bucket.contains(date, self.today)),
        };

        search_match && status_match && date_match
    }
}

pub type UserLedger = Ledger<ManagedUser, UserFilter>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub suspended: usize,
    pub new_this_month: usize,
}

impl UserStats {
    /// Counts over every loaded user, independent of the active filter.
    pub fn compute(users: &[ManagedUser], today: NaiveDate) -> Self {
        Self {
            total: users.len(),
            active: users.iter().filter(|u| u.status == UserStatus::Active).count(),
            suspended: users.iter().filter(|u| u.status == UserStatus::Suspended).count(),
            new_this_month: users
                .iter()
                .filter(|u| {
                    u.registration_date
                        .is_some_and(|d| JoinedWithin::Month.contains(d, today))
                })
                .count(),
        }
    }
}
