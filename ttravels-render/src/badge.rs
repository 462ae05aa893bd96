use ttravels_core::status::{BookingStatus, PaymentStatus, UserStatus};
use ttravels_shared::{format, html};

pub const GREEN: &str = "bg-green-100 text-green-800";
pub const YELLOW: &str = "bg-yellow-100 text-yellow-800";
pub const RED: &str = "bg-red-100 text-red-800";
pub const BLUE: &str = "bg-blue-100 text-blue-800";
/// Style for any status outside the known set.
pub const GRAY: &str = "bg-gray-100 text-gray-800";

pub fn booking_class(status: &BookingStatus) -> &'static str {
    match status {
        BookingStatus::Confirmed => GREEN,
        BookingStatus::Pending => YELLOW,
        BookingStatus::Cancelled => RED,
        BookingStatus::Completed => BLUE,
        BookingStatus::Other(_) => GRAY,
    }
}

pub fn payment_class(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Success | PaymentStatus::Completed | PaymentStatus::Paid => GREEN,
        PaymentStatus::Pending => YELLOW,
        PaymentStatus::Failed | PaymentStatus::Cancelled => RED,
        PaymentStatus::Refunded => BLUE,
        PaymentStatus::Other(_) => GRAY,
    }
}

pub fn user_class(status: &UserStatus) -> &'static str {
    match status {
        UserStatus::Active => GREEN,
        UserStatus::Suspended => RED,
        UserStatus::Other(_) => GRAY,
    }
}

/// Rounded status pill with a capitalised label.
pub fn pill(class: &str, label: &str) -> String {
    format!(
        r#"<span class="inline-flex px-2 py-1 text-xs font-semibold rounded-full {}">{}</span>"#,
        class,
        html::escape(&format::capitalize(label))
    )
}
