//! Booking and user management pages: table rows, detail dialogs, pagination.

use chrono::NaiveDate;
use ttravels_core::dashboard::BookingKind;
use ttravels_core::listing::{ManagedBooking, ManagedUser, Pagination, ServiceDetails, UserStats};
use ttravels_core::status::{BookingStatus, UserStatus};
use ttravels_shared::{format, html};

use crate::badge;

fn service_icon(kind: &BookingKind) -> &'static str {
    match kind {
        BookingKind::Flights => "✈️",
        BookingKind::Hotels => "🏨",
        BookingKind::Trains => "🚆",
        BookingKind::Buses => "🚌",
        BookingKind::Cars => "🚗",
        BookingKind::Other(_) => "📄",
    }
}

fn day(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%-d %b %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Cancel is offered while the booking is still live.
fn can_cancel(status: &BookingStatus) -> bool {
    !matches!(status, BookingStatus::Cancelled | BookingStatus::Completed)
}

pub fn booking_row(booking: &ManagedBooking) -> String {
    let id = html::escape(&booking.id);
    let cancel = if can_cancel(&booking.status) {
        format!(r#"<button data-action="cancel" data-id="{}" class="text-red-600 hover:text-red-900">Cancel</button>"#, id)
    } else {
        String::new()
    };

    format!(
        r#"<tr class="hover:bg-gray-50"><td class="px-6 py-4 whitespace-nowrap"><input type="checkbox" class="rounded border-gray-300" value="{id}"></td><td class="px-6 py-4 whitespace-nowrap"><div class="text-sm font-medium text-gray-900">{id}</div><div class="text-sm text-gray-500">Booked: {booked}</div></td><td class="px-6 py-4 whitespace-nowrap"><div class="text-sm font-medium text-gray-900">{name}</div><div class="text-sm text-gray-500">{email}</div><div class="text-sm text-gray-500">{phone}</div></td><td class="px-6 py-4 whitespace-nowrap"><div class="flex items-center"><span class="text-lg mr-2">{icon}</span><div><div class="text-sm font-medium text-gray-900">{service}</div><div class="text-sm text-gray-500">{summary}</div></div></div></td><td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{travel}</td><td class="px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900">{amount}</td><td class="px-6 py-4 whitespace-nowrap">{badge}</td><td class="px-6 py-4 whitespace-nowrap text-sm font-medium"><div class="flex space-x-2"><button data-action="view" data-id="{id}" class="text-primary-600 hover:text-primary-900">View</button><button data-action="edit" data-id="{id}" class="text-indigo-600 hover:text-indigo-900">Edit</button>{cancel}</div></td></tr>"#,
        id = id,
        booked = day(booking.booking_date),
        name = html::escape(&booking.customer.name),
        email = html::escape(booking.customer.email.expose()),
        phone = html::escape(booking.customer.phone.expose()),
        icon = service_icon(&booking.kind),
        service = html::escape(&booking.service_name),
        summary = html::escape(&booking.service.summary()),
        travel = html::escape(&booking.service.travel_dates()),
        amount = format::format_inr(booking.amount),
        badge = badge::pill(badge::booking_class(&booking.status), booking.status.as_str()),
        cancel = cancel,
    )
}

pub const BOOKING_COLUMNS: usize = 8;
pub const USER_COLUMNS: usize = 7;

/// Table body for one page: the rows, or a single row saying nothing matched.
pub fn table_page(rows: Vec<String>, columns: usize, what: &str) -> String {
    if rows.is_empty() {
        return format!(
            r#"<tr><td colspan="{}" class="px-6 py-4 text-center text-gray-500">No {} found</td></tr>"#,
            columns, what
        );
    }
    rows.concat()
}

pub fn loading_rows(columns: usize) -> String {
    format!(
        r#"<tr><td colspan="{}" class="px-6 py-4 text-center text-gray-500">Loading...</td></tr>"#,
        columns
    )
}

pub fn error_rows(columns: usize, message: &str) -> String {
    format!(
        r#"<tr><td colspan="{}" class="px-6 py-4 text-center text-red-600">{}</td></tr>"#,
        columns,
        html::escape(message)
    )
}

fn field(label: &str, value: &str) -> String {
    format!(r#"<p><span class="font-medium">{}:</span> {}</p>"#, label, html::escape(value))
}

fn date_field(label: &str, value: &Option<String>) -> String {
    field(label, &value.as_deref().map(format::format_date).unwrap_or_else(|| "-".to_string()))
}

fn service_fields(booking: &ManagedBooking) -> String {
    let name = &booking.service_name;
    match &booking.service {
        ServiceDetails::Flight { route, time, class, date } => [
            field("Flight", name),
            field("Route", route),
            date_field("Date", date),
            field("Time", time.as_deref().unwrap_or("-")),
            field("Class", class.as_deref().unwrap_or("-")),
        ]
        .concat(),
        ServiceDetails::Hotel { location, rooms, check_in, check_out } => [
            field("Hotel", name),
            field("Location", location),
            date_field("Check-in", check_in),
            date_field("Check-out", check_out),
            field("Rooms", &rooms.to_string()),
        ]
        .concat(),
        ServiceDetails::Train { route, class, date } => [
            field("Train", name),
            field("Route", route),
            date_field("Date", date),
            field("Class", class.as_deref().unwrap_or("-")),
        ]
        .concat(),
        ServiceDetails::Bus { route, seats, date } => [
            field("Bus", name),
            field("Route", route),
            date_field("Date", date),
            field("Seats", &seats.join(", ")),
        ]
        .concat(),
        ServiceDetails::Car { pickup, drop, start_date, end_date } => [
            field("Car", name),
            field("Pickup", pickup),
            field("Drop", drop),
            date_field("Start Date", start_date),
            date_field("End Date", end_date),
        ]
        .concat(),
        ServiceDetails::Other => String::new(),
    }
}

pub fn booking_details(booking: &ManagedBooking) -> String {
    let id = html::escape(&booking.id);
    let cancel = if can_cancel(&booking.status) {
        format!(r#"<button data-action="cancel" data-id="{}" class="px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700 transition-colors">Cancel Booking</button>"#, id)
    } else {
        String::new()
    };

    format!(
        r#"<div class="space-y-6"><div class="flex justify-between items-start"><div><h4 class="text-lg font-semibold text-gray-900">Booking {id}</h4><p class="text-sm text-gray-600">Booked on {booked}</p></div>{badge}</div><div class="grid grid-cols-1 md:grid-cols-2 gap-6"><div><h5 class="font-medium text-gray-900 mb-3">Customer Information</h5><div class="space-y-2 text-sm">{name}{email}{phone}</div></div><div><h5 class="font-medium text-gray-900 mb-3">Service Details</h5><div class="space-y-2 text-sm">{service}</div></div></div><div><h5 class="font-medium text-gray-900 mb-3">Payment Information</h5><div class="bg-gray-50 p-4 rounded-lg"><div class="flex justify-between items-center"><span class="font-medium">Total Amount:</span><span class="text-lg font-bold text-gray-900">{amount}</span></div></div></div><div class="flex justify-end space-x-3 pt-4 border-t"><button data-action="edit" data-id="{id}" class="px-4 py-2 bg-primary-600 text-white rounded-lg hover:bg-primary-700 transition-colors">Edit Booking</button>{cancel}</div></div>"#,
        id = id,
        booked = day(booking.booking_date),
        badge = badge::pill(badge::booking_class(&booking.status), booking.status.as_str()),
        name = field("Name", &booking.customer.name),
        email = field("Email", booking.customer.email.expose()),
        phone = field("Phone", booking.customer.phone.expose()),
        service = service_fields(booking),
        amount = format::format_inr(booking.amount),
        cancel = cancel,
    )
}

fn last_login(user: &ManagedUser, today: NaiveDate) -> String {
    user.last_login
        .map(|date| format::days_ago(date, today))
        .unwrap_or_else(|| "Never".to_string())
}

/// Suspend for active users, Activate for everyone else.
fn status_button(user: &ManagedUser, dialog: bool) -> String {
    let (action, label, colour) = match user.status {
        UserStatus::Active => ("suspend", "Suspend", "red"),
        _ => ("activate", "Activate", "green"),
    };
    let id = html::escape(&user.id);
    if dialog {
        format!(
            r#"<button data-action="{}" data-id="{}" class="px-4 py-2 bg-{}-600 text-white rounded-lg transition-colors">{} User</button>"#,
            action, id, colour, label
        )
    } else {
        format!(
            r#"<button data-action="{}" data-id="{}" class="text-{}-600 hover:text-{}-900">{}</button>"#,
            action, id, colour, colour, label
        )
    }
}

pub fn user_row(user: &ManagedUser, today: NaiveDate) -> String {
    let initial: String = user.name.chars().take(1).collect();
    let id = html::escape(&user.id);

    format!(
        r#"<tr class="hover:bg-gray-50"><td class="px-6 py-4 whitespace-nowrap"><input type="checkbox" class="rounded border-gray-300" value="{id}"></td><td class="px-6 py-4 whitespace-nowrap"><div class="flex items-center"><div class="h-10 w-10 bg-primary-100 rounded-full flex items-center justify-center"><span class="text-primary-600 font-medium text-sm">{initial}</span></div><div class="ml-4"><div class="text-sm font-medium text-gray-900">{name}</div><div class="text-sm text-gray-500">ID: {id}</div></div></div></td><td class="px-6 py-4 whitespace-nowrap"><div class="text-sm text-gray-900">{email}</div><div class="text-sm text-gray-500">{phone}</div></td><td class="px-6 py-4 whitespace-nowrap"><div class="text-sm text-gray-900">{registered}</div><div class="text-sm text-gray-500">Member since</div></td><td class="px-6 py-4 whitespace-nowrap"><div class="text-sm text-gray-900">{bookings} bookings</div><div class="text-sm text-gray-500">Last login: {login}</div></td><td class="px-6 py-4 whitespace-nowrap">{badge}</td><td class="px-6 py-4 whitespace-nowrap text-sm font-medium"><div class="flex space-x-2"><button data-action="view" data-id="{id}" class="text-primary-600 hover:text-primary-900">View</button><button data-action="edit" data-id="{id}" class="text-indigo-600 hover:text-indigo-900">Edit</button>{toggle}</div></td></tr>"#,
        id = id,
        initial = html::escape(&initial),
        name = html::escape(&user.name),
        email = html::escape(user.email.expose()),
        phone = html::escape(user.phone.expose()),
        registered = day(user.registration_date),
        bookings = user.bookings.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
        login = last_login(user, today),
        badge = badge::pill(badge::user_class(&user.status), user.status.as_str()),
        toggle = status_button(user, false),
    )
}

pub fn user_details(user: &ManagedUser) -> String {
    let initial: String = user.name.chars().take(1).collect();
    format!(
        r#"<div class="space-y-6"><div class="flex items-center space-x-4"><div class="h-16 w-16 bg-primary-100 rounded-full flex items-center justify-center"><span class="text-primary-600 font-bold text-xl">{initial}</span></div><div><h4 class="text-xl font-semibold text-gray-900">{name}</h4><p class="text-gray-600">User ID: {id}</p>{badge}</div></div><div class="grid grid-cols-1 md:grid-cols-2 gap-6"><div><h5 class="font-medium text-gray-900 mb-3">Contact Information</h5><div class="space-y-2 text-sm">{email}{phone}</div></div><div><h5 class="font-medium text-gray-900 mb-3">Account Details</h5><div class="space-y-2 text-sm">{registered}{login}</div></div></div><div><h5 class="font-medium text-gray-900 mb-3">Booking Statistics</h5><div class="grid grid-cols-2 gap-4"><div class="bg-gray-50 p-4 rounded-lg"><div class="text-2xl font-bold text-gray-900">{bookings}</div><div class="text-sm text-gray-600">Total Bookings</div></div><div class="bg-gray-50 p-4 rounded-lg"><div class="text-2xl font-bold text-gray-900">{spent}</div><div class="text-sm text-gray-600">Total Spent</div></div></div></div><div class="flex justify-end space-x-3 pt-4 border-t"><button data-action="edit" data-id="{id}" class="px-4 py-2 bg-primary-600 text-white rounded-lg hover:bg-primary-700 transition-colors">Edit User</button>{toggle}</div></div>"#,
        initial = html::escape(&initial),
        name = html::escape(&user.name),
        id = html::escape(&user.id),
        badge = badge::pill(badge::user_class(&user.status), user.status.as_str()),
        email = field("Email", user.email.expose()),
        phone = field("Phone", user.phone.expose()),
        registered = field("Registration", &day(user.registration_date)),
        login = field("Last Login", &day(user.last_login)),
        bookings = user.bookings.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
        spent = format::format_inr(user.total_spent),
        toggle = status_button(user, true),
    )
}

/// "Showing X of Y" plus page controls; prev/next are disabled at the ends.
pub fn pagination(p: &Pagination) -> String {
    let disabled = |on: bool| if on { "" } else { " disabled" };
    format!(
        r#"<div class="flex items-center justify-between"><p class="text-sm text-gray-700">Showing <span id="showingCount">{showing}</span> of <span id="totalCount">{total}</span></p><div class="flex items-center space-x-2"><button data-action="prev-page"{prev}>Previous</button><span>Page <span id="currentPage">{page}</span> of <span id="totalPages">{pages}</span></span><button data-action="next-page"{next}>Next</button></div></div>"#,
        showing = p.showing(),
        total = p.total,
        page = p.page,
        pages = p.total_pages(),
        prev = disabled(p.has_prev()),
        next = disabled(p.has_next()),
    )
}

pub fn user_stats(stats: &UserStats) -> String {
    format!(
        r#"<div class="grid grid-cols-4 gap-4"><div><span id="totalUsers">{}</span> Total Users</div><div><span id="activeUsers">{}</span> Active</div><div><span id="suspendedUsers">{}</span> Suspended</div><div><span id="newUsers">{}</span> New This Month</div></div>"#,
        stats.total, stats.active, stats.suspended, stats.new_this_month
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hotel_booking(status: &str) -> ManagedBooking {
        ManagedBooking::from_document(&json!({
            "$id": "HT001",
            "type": "hotel",
            "status": status,
            "amount": 15000,
            "created_at": "2025-01-12",
            "contact_info": {"name": "Priya", "email": "priya@example.in", "phone": "+91 98765 43210"},
            "details": {"hotel": {"name": "Taj Palace", "city": "Delhi", "rooms": 2, "check_in": "2025-01-20", "check_out": "2025-01-22"}}
        }))
    }

    #[test]
    fn test_booking_row_shows_contact_and_dates() {
        let row = booking_row(&hotel_booking("confirmed"));
        assert!(row.contains("priya@example.in"));
        assert!(row.contains("Delhi • 2 room(s)"));
        assert!(row.contains("20 Jan 2025 - 22 Jan 2025"));
        assert!(row.contains("₹15,000"));
        assert!(row.contains(r#"data-action="cancel""#));
    }

    #[test]
    fn test_completed_booking_cannot_be_cancelled() {
        let booking = hotel_booking("completed");
        assert!(!booking_row(&booking).contains(r#"data-action="cancel""#));
        assert!(!booking_details(&booking).contains("Cancel Booking"));
        assert!(booking_details(&booking).contains("<span class=\"font-medium\">Rooms:</span> 2"));
    }

    #[test]
    fn test_pagination_controls() {
        let first = pagination(&Pagination { page: 1, page_size: 10, total: 25 });
        assert!(first.contains(r#"data-action="prev-page" disabled"#));
        assert!(first.contains(r#"data-action="next-page">"#));
        assert!(first.contains(r#"<span id="totalPages">3</span>"#));

        let last = pagination(&Pagination { page: 3, page_size: 10, total: 25 });
        assert!(last.contains(r#"<span id="showingCount">5</span>"#));
        assert!(last.contains(r#"data-action="next-page" disabled"#));
    }

    #[test]
    fn test_user_row_last_login() {
        let user = ManagedUser::from_document(&json!({
            "$id": "u1",
            "fname": "Ravi",
            "status": "suspended",
            "last_login": "2025-01-14",
            "created_at": "2024-12-01"
        }));
        let today = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();
        let row = user_row(&user, today);
        assert!(row.contains("Last login: 2 days ago"));
        assert!(row.contains(r#"data-action="activate""#));
        assert!(user_details(&user).contains("Activate User"));
    }
}
