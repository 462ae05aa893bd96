use std::time::Duration;
use tracing::{error, info, warn};
use ttravels_core::api::AdminCollection;
use ttravels_core::listing::{JoinedWithin, ManagedUser, UserFilter, UserLedger, UserStats};
use ttravels_core::status::UserStatus;
use ttravels_render::management as view;

use crate::debounce::Debouncer;
use crate::ui::{Slot, Ui};
use crate::AppContext;

/// Admin user management. Registration buckets are measured from the
/// context's `today`.
pub struct UserManagementController<U: Ui> {
    ctx: AppContext,
    ui: U,
    ledger: UserLedger,
    debounce: Debouncer,
}

impl<U: Ui> UserManagementController<U> {
    pub fn new(ctx: AppContext, ui: U) -> Self {
        let ledger = UserLedger::with_filter(Vec::new(), ctx.config.listing.page_size, UserFilter::new(ctx.today));
        let debounce = Debouncer::new(Duration::from_millis(ctx.config.listing.debounce_ms));
        Self {
            ctx,
            ui,
            ledger,
            debounce,
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn ledger(&self) -> &UserLedger {
        &self.ledger
    }

    pub fn stats(&self) -> UserStats {
        UserStats::compute(self.ledger.all(), self.ctx.today)
    }

    pub async fn init(&mut self) -> bool {
        if !super::has_admin_flag(&self.ctx) {
            info!("Admin flag missing; leaving user management");
            self.ui.navigate("/index.html");
            return false;
        }
        self.load().await;
        true
    }

    pub async fn load(&mut self) {
        self.ui
            .render(Slot::ManagementTable, view::loading_rows(view::USER_COLUMNS));
        match self.ctx.api.admin_collection(AdminCollection::Users).await {
            Ok(docs) => {
                let users: Vec<ManagedUser> = docs.iter().map(ManagedUser::from_document).collect();
                info!(count = users.len(), "Users loaded");
                self.ledger =
                    UserLedger::with_filter(users, self.ctx.config.listing.page_size, UserFilter::new(self.ctx.today));
                self.render();
            }
            Err(e) => {
                error!(error = %e, "Failed to load users");
                self.ui.render(
                    Slot::ManagementTable,
                    view::error_rows(view::USER_COLUMNS, &e.user_message()),
                );
            }
        }
    }

    fn render(&mut self) {
        let today = self.ctx.today;
        let rows = self
            .ledger
            .page_items()
            .into_iter()
            .map(|u| view::user_row(u, today))
            .collect();
        self.ui
            .render(Slot::ManagementTable, view::table_page(rows, view::USER_COLUMNS, "users"));
        self.ui
            .render(Slot::ManagementPagination, view::pagination(&self.ledger.pagination()));
        self.ui.render(Slot::UserStats, view::user_stats(&self.stats()));
    }

    fn refilter(&mut self, change: impl FnOnce(&mut UserFilter)) {
        let mut filter = self.ledger.filter().clone();
        change(&mut filter);
        self.ledger.apply(filter);
        self.render();
    }

    pub fn debouncer(&self) -> Debouncer {
        self.debounce.clone()
    }

    pub fn search(&mut self, text: &str) {
        let text = text.to_string();
        self.refilter(|f| f.search = text);
    }

    pub async fn search_debounced(&mut self, text: &str) -> bool {
        let ticket = self.debounce.ticket();
        if !self.debounce.settled(ticket).await {
            return false;
        }
        self.search(text);
        true
    }

    pub fn filter_status(&mut self, status: Option<UserStatus>) {
        self.refilter(|f| f.status = status);
    }

    pub fn filter_joined(&mut self, joined: Option<JoinedWithin>) {
        self.refilter(|f| f.joined = joined);
    }

    pub fn clear_filters(&mut self) {
        self.ledger.clear();
        self.render();
    }

    pub fn change_page(&mut self, page: usize) -> bool {
        let moved = self.ledger.change_page(page);
        if moved {
            self.render();
        }
        moved
    }

    pub fn next_page(&mut self) -> bool {
        let page = self.ledger.pagination().page + 1;
        self.change_page(page)
    }

    pub fn prev_page(&mut self) -> bool {
        let page = self.ledger.pagination().page.saturating_sub(1);
        self.change_page(page)
    }

    pub fn view_user(&mut self, id: &str) {
        match self.ledger.get(id) {
            Some(user) => {
                let details = view::user_details(user);
                self.ui.render(Slot::ManagementDetails, details);
            }
            None => warn!(id, "View requested for unknown user"),
        }
    }

    pub fn edit_user(&mut self, id: &str) {
        self.ui.alert(&format!(
            "Edit user functionality would be implemented here for user: {}",
            id
        ));
    }

    pub fn suspend_user(&mut self, id: &str) -> bool {
        self.set_status(id, UserStatus::Suspended)
    }

    pub fn activate_user(&mut self, id: &str) -> bool {
        self.set_status(id, UserStatus::Active)
    }

    /// Local change only; the details dialog is refreshed if it shows this user.
    fn set_status(&mut self, id: &str, status: UserStatus) -> bool {
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
        if let Err(e) = self.ledger.update(id, |u| u.status = status) {
            warn!(id, error = %e, "Status change requested for unknown user");
            return false;
        }
        self.render();
        if let Some(user) = self.ledger.get(id) {
            let details = view::user_details(user);
            self.ui.render(Slot::ManagementDetails, details);
        }
        info!(id, verb, "User status changed locally");
        self.ui.alert(&format!("User {} has been {}", id, done));
        true
    }

    pub fn logout(&mut self) {
        super::logout(&self.ctx, &mut self.ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use crate::ui::RecordingUi;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Arc;
    use ttravels_store::local_store::keys;
    use ttravels_store::{AppConfig, KeyValueStore, MemoryStore};

    async fn loaded() -> UserManagementController<RecordingUi> {
        let api = Arc::new(FakeApi::new());
        api.reply(
            "admin/users",
            Ok(json!([
                {"$id": "u1", "fname": "Asha", "lname": "Rao", "email": "asha@example.in", "$createdAt": "2025-03-14"},
                {"$id": "u2", "fname": "Vikram", "mobile": "9876543210", "$createdAt": "2025-03-02", "status": "suspended"},
                {"$id": "u3", "fname": "Meera", "$createdAt": "2024-12-30"},
            ])),
        );
        let store = Arc::new(MemoryStore::new());
        store.set(keys::ADMIN_FLAG, "true").unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let ctx = AppContext::new(api, store, AppConfig::default()).with_today(today);
        let mut page = UserManagementController::new(ctx, RecordingUi::agreeing());
        assert!(page.init().await);
        page
    }

    #[tokio::test]
    async fn test_stats_and_buckets() {
        let mut page = loaded().await;
        let stats = page.stats();
        assert_eq!((stats.total, stats.active, stats.suspended, stats.new_this_month), (3, 2, 1, 2));
        assert!(page.ui().slot(Slot::UserStats).contains(r#"<span id="newUsers">2</span>"#));

        page.filter_joined(Some(JoinedWithin::Week));
        assert_eq!(page.ledger().filtered_len(), 1);
        page.filter_joined(Some(JoinedWithin::Year));
        assert_eq!(page.ledger().filtered_len(), 2);

        page.clear_filters();
        assert_eq!(page.ledger().filtered_len(), 3);
        assert_eq!(page.ledger().filter().today, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        page.filter_joined(Some(JoinedWithin::Week));
        assert_eq!(page.ledger().filtered_len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_phone() {
        let mut page = loaded().await;
        page.search("98765");
        let ids: Vec<&str> = page.ledger().filtered().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u2"]);
    }

    #[tokio::test]
    async fn test_activate_updates_stats() {
        let mut page = loaded().await;
        assert!(page.activate_user("u2"));
        assert_eq!(page.stats().suspended, 0);
        assert_eq!(page.ui().alerts, vec!["User u2 has been activated"]);
        assert!(page.ui().slot(Slot::ManagementDetails).contains("User ID: u2"));
    }
}
