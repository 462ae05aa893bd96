//! Rows of the admin panel tables.

use ttravels_core::admin::{AdminAiLog, AdminBooking, AdminPayment, AdminUser};
use ttravels_core::api::AdminCollection;
use ttravels_shared::{format, html};

use crate::badge;

const CELL: &str = "px-6 py-4 whitespace-nowrap text-sm text-gray-900";
const ID_CELL: &str = "px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900";

/// Column count of each table; state rows span all of them.
pub fn columns(collection: AdminCollection) -> usize {
    match collection {
        AdminCollection::Bookings | AdminCollection::Users => 7,
        AdminCollection::Payments => 8,
        AdminCollection::AiLogs => 6,
    }
}

fn state_row(collection: AdminCollection, class: &str, text: &str) -> String {
    format!(
        r#"<tr><td colspan="{}" class="text-center py-4{}">{}</td></tr>"#,
        columns(collection),
        class,
        html::escape(text)
    )
}

pub fn loading_row(collection: AdminCollection) -> String {
    state_row(collection, "", "Loading...")
}

pub fn error_row(collection: AdminCollection, message: &str) -> String {
    state_row(collection, " text-red-600", message)
}

/// Rows, or the "No ... found." row when there are none.
pub fn table_body(collection: AdminCollection, rows: Vec<String>) -> String {
    if rows.is_empty() {
        return state_row(collection, "", &format!("No {} found.", collection.label()));
    }
    rows.concat()
}

fn date_cell(date: Option<&str>) -> String {
    html::escape(&date.map(format::format_date).unwrap_or_else(|| "-".to_string()))
}

fn action(kind: &str, id: &str, class: &str, label: &str) -> String {
    format!(
        r#"<button data-action="{}" data-id="{}" class="{}">{}</button>"#,
        kind,
        html::escape(id),
        class,
        label
    )
}

pub fn booking_row(booking: &AdminBooking) -> String {
    let mut actions = action("view", &booking.id, "text-primary-600 hover:text-primary-900 mr-3", "View");
    actions.push_str(&action("edit", &booking.id, "text-indigo-600 hover:text-indigo-900 mr-3", "Edit"));
    if booking.status.is_cancellable() {
        actions.push_str(&action("cancel", &booking.id, "text-red-600 hover:text-red-900", "Cancel"));
    }

    format!(
        r#"<tr><td class="{id_cell}">{id}</td><td class="px-6 py-4 whitespace-nowrap"><div class="text-sm font-medium text-gray-900">{user}</div><div class="text-sm text-gray-500">{email}</div></td><td class="px-6 py-4 whitespace-nowrap"><div class="text-sm font-medium text-gray-900">{service}</div><div class="text-sm text-gray-500">{details}</div></td><td class="{cell}">{date}</td><td class="{cell}">{amount}</td><td class="px-6 py-4 whitespace-nowrap">{badge}</td><td class="px-6 py-4 whitespace-nowrap text-sm font-medium">{actions}</td></tr>"#,
        id_cell = ID_CELL,
        cell = CELL,
        id = html::escape(&booking.id),
        user = html::escape(&booking.user_id),
        email = html::escape(&booking.email),
        service = html::escape(&booking.service),
        details = html::escape(&booking.details),
        date = date_cell(booking.date.as_deref()),
        amount = format::format_inr(booking.amount),
        badge = badge::pill(badge::booking_class(&booking.status), booking.status.as_str()),
        actions = actions,
    )
}

pub fn user_row(user: &AdminUser) -> String {
    let initial: String = user.name.chars().take(1).collect();
    let toggle = match user.status {
        ttravels_core::status::UserStatus::Active => {
            action("suspend", &user.id, "text-red-600 hover:text-red-900", "Suspend")
        }
        _ => action("activate", &user.id, "text-green-600 hover:text-green-900", "Activate"),
    };

    format!(
        r#"<tr><td class="px-6 py-4 whitespace-nowrap"><div class="flex items-center"><div class="h-10 w-10 bg-primary-100 rounded-full flex items-center justify-center"><span class="text-primary-600 font-medium text-sm">{initial}</span></div><div class="ml-4"><div class="text-sm font-medium text-gray-900">{name}</div></div></div></td><td class="{cell}">{email}</td><td class="{cell}">{phone}</td><td class="{cell}">{joined}</td><td class="{cell}">{bookings}</td><td class="px-6 py-4 whitespace-nowrap">{badge}</td><td class="px-6 py-4 whitespace-nowrap text-sm font-medium">{view}{edit}{toggle}</td></tr>"#,
        cell = CELL,
        initial = html::escape(&initial),
        name = html::escape(&user.name),
        email = html::escape(&user.email),
        phone = html::escape(&user.phone),
        joined = date_cell(user.joined.as_deref()),
        bookings = user.bookings.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
        badge = badge::pill(badge::user_class(&user.status), user.status.as_str()),
        view = action("view", &user.id, "text-primary-600 hover:text-primary-900 mr-3", "View"),
        edit = action("edit", &user.id, "text-indigo-600 hover:text-indigo-900 mr-3", "Edit"),
        toggle = toggle,
    )
}

pub fn payment_row(payment: &AdminPayment) -> String {
    format!(
        r#"<tr><td class="{id_cell}">{id}</td><td class="{cell}">{booking}</td><td class="{cell}">{user}</td><td class="{cell}">{amount}</td><td class="{cell}">{method}</td><td class="px-6 py-4 whitespace-nowrap">{badge}</td><td class="{cell}">{transaction}</td><td class="{cell}">{date}</td></tr>"#,
        id_cell = ID_CELL,
        cell = CELL,
        id = html::escape(&payment.id),
        booking = html::escape(&payment.booking_id),
        user = html::escape(&payment.user_id),
        amount = format::format_inr(payment.amount),
        method = html::escape(&payment.method),
        badge = badge::pill(badge::payment_class(&payment.status), payment.status.as_str()),
        transaction = html::escape(&payment.transaction_id),
        date = date_cell(payment.date.as_deref()),
    )
}

pub fn ai_log_row(log: &AdminAiLog) -> String {
    format!(
        r#"<tr><td class="{id_cell}">{id}</td><td class="{cell}">{user}</td><td class="{cell}">{title}</td><td class="{cell}">{destination}</td><td class="{cell}">{created}</td><td class="px-6 py-4 whitespace-nowrap text-sm font-medium">{view}{delete}</td></tr>"#,
        id_cell = ID_CELL,
        cell = CELL,
        id = html::escape(&log.id),
        user = html::escape(&log.user_id),
        title = html::escape(&log.title),
        destination = html::escape(&log.destination),
        created = date_cell(log.created_at.as_deref()),
        view = action("view", &log.id, "text-primary-600 hover:text-primary-900 mr-3", "View"),
        delete = action("delete", &log.id, "text-red-600 hover:text-red-900", "Delete"),
    )
}
