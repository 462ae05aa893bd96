//! One controller per page. Each owns its view model and its `Ui`.

pub mod admin;
pub mod assistant;
pub mod bookings;
pub mod dashboard;
pub mod edit_trip;
pub mod flight_search;
pub mod users;

pub use admin::AdminPanelController;
pub use assistant::AssistantController;
pub use bookings::BookingManagementController;
pub use dashboard::DashboardController;
pub use edit_trip::EditTripController;
pub use flight_search::FlightSearchController;
pub use users::UserManagementController;

use tracing::warn;
use ttravels_store::local_store::keys;

use crate::ui::Ui;
use crate::AppContext;

/// The management pages trust a flag left in local storage at admin login.
fn has_admin_flag(ctx: &AppContext) -> bool {
    match ctx.store.get(keys::ADMIN_FLAG) {
        Ok(Some(value)) => !value.is_empty() && value != "false",
        Ok(None) => false,
        Err(e) => {
            warn!(error = %e, "Could not read admin flag");
            false
        }
    }
}

fn logout(ctx: &AppContext, ui: &mut impl Ui) {
    if let Err(e) = ctx.store.remove(keys::ADMIN_FLAG) {
        warn!(error = %e, "Could not clear admin flag");
    }
    ui.navigate("/index.html");
}
