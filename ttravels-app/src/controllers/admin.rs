//! Admin panel: four read-only tables plus the AI log actions.
//!
//! Booking and user row actions change only the rows held here; the backend
//! has no endpoint for them.

use serde_json::Value;
use tracing::{error, info, warn};
use ttravels_core::admin::{AdminAiLog, AdminBooking, AdminPayment, AdminUser};
use ttravels_core::api::AdminCollection;
use ttravels_core::status::{BookingStatus, UserStatus};
use ttravels_render::admin as view;
use ttravels_shared::format;

use crate::ui::{Slot, Ui};
use crate::AppContext;

pub struct AdminPanelController<U: Ui> {
    ctx: AppContext,
    ui: U,
    bookings: Vec<AdminBooking>,
    users: Vec<AdminUser>,
}

impl<U: Ui> AdminPanelController<U> {
    pub fn new(ctx: AppContext, ui: U) -> Self {
        Self {
            ctx,
            ui,
            bookings: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn bookings(&self) -> &[AdminBooking] {
        &self.bookings
    }

    pub fn users(&self) -> &[AdminUser] {
        &self.users
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Loading row, fetch, then rows or an error row spanning the table.
    pub async fn load(&mut self, collection: AdminCollection) {
        let slot = Slot::AdminTable(collection);
        self.ui.render(slot, view::loading_row(collection));

        let docs = match self.ctx.api.admin_collection(collection).await {
            Ok(docs) => docs,
            Err(e) => {
                error!(collection = collection.path_segment(), error = %e, "Failed to load admin table");
                self.ui.render(slot, view::error_row(collection, &e.user_message()));
                return;
            }
        };

        let rows = match collection {
            AdminCollection::Bookings => {
                self.bookings = docs.iter().map(AdminBooking::from_document).collect();
                self.bookings.iter().map(view::booking_row).collect()
            }
            AdminCollection::Users => {
                self.users = docs.iter().map(AdminUser::from_document).collect();
                self.users.iter().map(view::user_row).collect()
            }
            AdminCollection::Payments => docs
                .iter()
                .map(AdminPayment::from_document)
                .map(|p| view::payment_row(&p))
                .collect(),
            AdminCollection::AiLogs => docs
                .iter()
                .map(AdminAiLog::from_document)
                .map(|log| view::ai_log_row(&log))
                .collect(),
        };
        info!(collection = collection.path_segment(), count = docs.len(), "Admin table rendered");
        self.ui.render(slot, view::table_body(collection, rows));
    }

    pub async fn load_bookings(&mut self) {
        self.load(AdminCollection::Bookings).await
    }

    pub async fn load_users(&mut self) {
        self.load(AdminCollection::Users).await
    }

    pub async fn load_payments(&mut self) {
        self.load(AdminCollection::Payments).await
    }

    pub async fn load_ai_logs(&mut self) {
        self.load(AdminCollection::AiLogs).await
    }

    /// Loads every table, as the panel does when it opens.
    pub async fn load_all(&mut self) {
        for collection in [
            AdminCollection::Bookings,
            AdminCollection::Users,
            AdminCollection::Payments,
            AdminCollection::AiLogs,
        ] {
            self.load(collection).await;
        }
    }

    fn rerender_bookings(&mut self) {
        let rows = self.bookings.iter().map(view::booking_row).collect();
        self.ui.render(
            Slot::AdminTable(AdminCollection::Bookings),
            view::table_body(AdminCollection::Bookings, rows),
        );
    }

    fn rerender_users(&mut self) {
        let rows = self.users.iter().map(view::user_row).collect();
        self.ui.render(
            Slot::AdminTable(AdminCollection::Users),
            view::table_body(AdminCollection::Users, rows),
        );
    }

    // ========================================================================
    // Row actions
    // ========================================================================

    pub fn view_booking(&mut self, id: &str) {
        self.ui.alert(&format!("Viewing booking: {}", id));
    }

    pub fn edit_booking(&mut self, id: &str) {
        self.ui.alert(&format!("Editing booking: {}", id));
    }

    /// Returns whether the booking was cancelled.
    pub fn cancel_booking(&mut self, id: &str) -> bool {
        if !self
            .ui
            .confirm(&format!("Are you sure you want to cancel booking {}?", id))
        {
            return false;
        }
        let Some(booking) = self.bookings.iter_mut().find(|b| b.id == id) else {
            warn!(id, "Cancel requested for unknown booking");
            return false;
        };
        booking.status = BookingStatus::Cancelled;
        self.rerender_bookings();
        info!(id, "Booking cancelled locally");
        self.ui.alert(&format!("Booking {} cancelled", id));
        true
    }

    pub fn view_user(&mut self, id: &str) {
        self.ui.alert(&format!("Viewing user: {}", id));
    }

    pub fn edit_user(&mut self, id: &str) {
        self.ui.alert(&format!("Editing user: {}", id));
    }

    pub fn suspend_user(&mut self, id: &str) -> bool {
        self.set_user_status(id, UserStatus::Suspended)
    }

    pub fn activate_user(&mut self, id: &str) -> bool {
        self.set_user_status(id, UserStatus::Active)
    }

    fn set_user_status(&mut self, id: &str, status: UserStatus) -> bool {
        let (verb, done) = match status {
            UserStatus::Suspended => ("suspend", "suspended"),
            _ => ("activate", "activated"),
        };
        if !self
            .ui
            .confirm(&format!("Are you sure you want to {} this user?", verb))
        {
            return false;
        }
        let Some(user) = self.users.iter_mut().find(|u| u.id == id) else {
            warn!(id, "Status change requested for unknown user");
            return false;
        };
        user.status = status;
        self.rerender_users();
        info!(id, verb, "User status changed locally");
        self.ui.alert(&format!("User {} {}", id, done));
        true
    }

    // ========================================================================
    // AI logs
    // ========================================================================

    pub async fn view_ai_log(&mut self, id: &str) {
        match self.ctx.api.admin_ai_log(id).await {
            Ok(doc) => self.ui.alert(&ai_log_details(&doc)),
            Err(e) => {
                error!(id, error = %e, "Failed to load AI log");
                self.ui.alert(&format!("Error: {}", e.user_message()));
            }
        }
    }

    /// Deletes after confirmation and reloads the table.
    pub async fn delete_ai_log(&mut self, id: &str) -> bool {
        let question = format!("Are you sure you want to delete this AI log (Plan ID: {})?", id);
        if !self.ui.confirm(&question) {
            return false;
        }
        match self.ctx.api.delete_admin_ai_log(id).await {
            Ok(()) => {
                self.ui.alert("AI log deleted successfully");
                self.load_ai_logs().await;
                true
            }
            Err(e) => {
                error!(id, error = %e, "Failed to delete AI log");
                self.ui.alert(&format!("Error: {}", e.user_message()));
                false
            }
        }
    }

    pub fn logout(&mut self) {
        if self.ui.confirm("Are you sure you want to logout?") {
            self.ui.navigate("/admin/logout");
        }
    }
}

fn ai_log_details(doc: &Value) -> String {
    let log = AdminAiLog::from_document(doc);
    let destination = AdminAiLog::plan_of(doc)
        .destination()
        .unwrap_or_else(|| "N/A".to_string());
    let created = log
        .created_at
        .as_deref()
        .map(format::format_date)
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "AI Log Details:\n\nPlan ID: {}\nUser ID: {}\nTitle: {}\nDestination: {}\nCreated: {}",
        log.id, log.user_id, log.title, destination, created
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use crate::ui::RecordingUi;
    use serde_json::json;
    use std::sync::Arc;
    use ttravels_core::ApiError;
    use ttravels_store::{AppConfig, MemoryStore};

    fn controller(api: Arc<FakeApi>, ui: RecordingUi) -> AdminPanelController<RecordingUi> {
        let ctx = AppContext::new(api, Arc::new(MemoryStore::new()), AppConfig::default());
        AdminPanelController::new(ctx, ui)
    }

    #[tokio::test]
    async fn test_server_error_fills_one_row() {
        let api = Arc::new(FakeApi::new());
        api.reply("admin/payments", Err(ApiError::Rejected("db down".into())));
        let mut panel = controller(api, RecordingUi::new());

        panel.load_payments().await;

        let body = panel.ui().slot(Slot::AdminTable(AdminCollection::Payments));
        assert_eq!(body.matches("<tr>").count(), 1);
        assert!(body.contains(r#"colspan="8""#));
        assert!(body.contains("db down"));
    }

    #[tokio::test]
    async fn test_cancel_needs_confirmation() {
        let api = Arc::new(FakeApi::new());
        api.reply(
            "admin/bookings",
            Ok(json!([{"$id": "bk_1", "type": "hotel", "status": "confirmed"}])),
        );
        let mut panel = controller(api, RecordingUi::new());
        panel.load_bookings().await;

        panel.ui_mut().answer_next(false);
        assert!(!panel.cancel_booking("bk_1"));
        assert_eq!(panel.bookings()[0].status, BookingStatus::Confirmed);

        panel.ui_mut().answer_next(true);
        assert!(panel.cancel_booking("bk_1"));
        assert_eq!(panel.bookings()[0].status, BookingStatus::Cancelled);
        assert_eq!(panel.ui().alerts, vec!["Booking bk_1 cancelled"]);
    }

    #[tokio::test]
    async fn test_suspend_user() {
        let api = Arc::new(FakeApi::new());
        api.reply("admin/users", Ok(json!([{"$id": "u_1", "fname": "Asha"}])));
        let mut panel = controller(api, RecordingUi::agreeing());
        panel.load_users().await;

        assert!(panel.suspend_user("u_1"));
        assert_eq!(panel.users()[0].status, UserStatus::Suspended);
        assert_eq!(panel.ui().confirms, vec!["Are you sure you want to suspend this user?"]);
        assert_eq!(panel.ui().alerts, vec!["User u_1 suspended"]);
    }

    #[tokio::test]
    async fn test_ai_log_view_and_delete() {
        let api = Arc::new(FakeApi::new());
        api.reply(
            "admin/ai-log",
            Ok(json!({
                "$id": "plan_7",
                "user_id": "u_2",
                "title": "Goa",
                "trip_plan": "{\"details\": {\"destination\": \"Goa\"}}"
            })),
        )
        .reply("admin/ai-log/delete", Ok(json!({})))
        .reply("admin/ai-logs", Ok(json!([])));
        let mut panel = controller(api.clone(), RecordingUi::agreeing());

        panel.view_ai_log("plan_7").await;
        assert!(panel.ui().alerts[0].contains("Plan ID: plan_7"));
        assert!(panel.ui().alerts[0].contains("Destination: Goa"));
        assert!(panel.ui().alerts[0].contains("Created: N/A"));

        assert!(panel.delete_ai_log("plan_7").await);
        assert_eq!(panel.ui().alerts[1], "AI log deleted successfully");
        assert_eq!(api.calls_to("admin/ai-logs").len(), 1);
        assert!(panel
            .ui()
            .slot(Slot::AdminTable(AdminCollection::AiLogs))
            .contains("No AI logs found."));
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let api = Arc::new(FakeApi::new());
        let mut panel = controller(api.clone(), RecordingUi::new());
        assert!(!panel.delete_ai_log("plan_7").await);
        assert!(api.calls().is_empty());
    }
}
