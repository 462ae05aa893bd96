use serde_json::Value;
use tracing::{error, info, warn};
use ttravels_core::dashboard::{BookingCard, DashboardTab, PlanDetail, SavedPlanCard};
use ttravels_render::dashboard as view;
use ttravels_shared::json;
use ttravels_store::local_store::{self, keys};

use crate::ui::{Slot, ToastKind, Ui};
use crate::AppContext;

/// Customer dashboard: booking tabs, saved plans and the plan dialog.
pub struct DashboardController<U: Ui> {
    ctx: AppContext,
    ui: U,
    tab: DashboardTab,
    bookings: Vec<BookingCard>,
    plans: Vec<SavedPlanCard>,
}

impl<U: Ui> DashboardController<U> {
    pub fn new(ctx: AppContext, ui: U) -> Self {
        Self {
            ctx,
            ui,
            tab: DashboardTab::All,
            bookings: Vec::new(),
            plans: Vec::new(),
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn tab(&self) -> &DashboardTab {
        &self.tab
    }

    pub fn bookings(&self) -> &[BookingCard] {
        &self.bookings
    }

    pub fn plans(&self) -> &[SavedPlanCard] {
        &self.plans
    }

    pub async fn open(&mut self, tab: DashboardTab) {
        let name = self.cached_user_name();
        self.ui
            .render(Slot::DashboardWelcome, view::welcome(name.as_deref()));
        self.show_tab(tab).await;
    }

    fn cached_user_name(&self) -> Option<String> {
        match local_store::get_json::<Value>(self.ctx.store.as_ref(), keys::CACHED_USER) {
            Ok(user) => user.and_then(|u| json::first_text(&u, &["/name", "/fname", "/first_name"])),
            Err(e) => {
                warn!(error = %e, "Could not read cached user");
                None
            }
        }
    }

    /// Refetches on every switch; nothing is cached between tabs.
    pub async fn show_tab(&mut self, tab: DashboardTab) {
        info!(?tab, "Showing dashboard tab");
        self.tab = tab;
        if self.tab == DashboardTab::SavedPlans {
            self.load_saved_plans().await;
        } else {
            self.load_bookings().await;
        }
    }

    async fn load_bookings(&mut self) {
        self.ui.render(Slot::DashboardContent, view::loading("bookings"));
        match self.ctx.api.my_bookings().await {
            Ok(docs) => {
                self.bookings = docs.iter().map(BookingCard::from_document).collect();
                let visible: Vec<&BookingCard> = self.bookings.iter().filter(|c| self.tab.includes(c)).collect();
                let grid = view::booking_grid(&visible);
                self.ui.render(Slot::DashboardContent, grid);
            }
            Err(e) => {
                error!(error = %e, "Failed to load bookings");
                self.ui
                    .render(Slot::DashboardContent, view::error(&e.user_message()));
            }
        }
    }

    async fn load_saved_plans(&mut self) {
        self.ui.render(Slot::DashboardContent, view::loading("saved plans"));
        match self.ctx.api.my_saved_plans().await {
            Ok(docs) => {
                self.plans = docs.iter().map(SavedPlanCard::from_document).collect();
                self.ui
                    .render(Slot::DashboardContent, view::saved_plan_grid(&self.plans));
            }
            Err(e) => {
                error!(error = %e, "Failed to load saved plans");
                self.ui
                    .render(Slot::DashboardContent, view::error(&e.user_message()));
            }
        }
    }

    // ========================================================================
    // Saved plans
    // ========================================================================

    /// Fetches the full plan only when its dialog is opened.
    pub async fn view_plan(&mut self, id: &str) {
        match self.ctx.api.saved_trip_plan(id).await {
            Ok(doc) => {
                let detail = PlanDetail::from_document(id, &doc);
                self.ui.render(Slot::PlanModal, view::plan_modal(&detail));
            }
            Err(e) => {
                error!(id, error = %e, "Failed to load trip plan");
                self.ui.toast(
                    ToastKind::Error,
                    &format!("Failed to load trip plan: {}", e.user_message()),
                );
            }
        }
    }

    /// A failed delete leaves the list as it was.
    pub async fn delete_plan(&mut self, id: &str) -> bool {
        if !self
            .ui
            .confirm("Are you sure you want to delete this trip plan? This action cannot be undone.")
        {
            return false;
        }
        match self.ctx.api.delete_trip_plan(id).await {
            Ok(()) => {
                self.ui
                    .toast(ToastKind::Success, "Trip plan deleted successfully");
                self.load_saved_plans().await;
                true
            }
            Err(e) => {
                error!(id, error = %e, "Failed to delete trip plan");
                self.ui.toast(
                    ToastKind::Error,
                    &format!("Failed to delete trip plan: {}", e.user_message()),
                );
                false
            }
        }
    }

    // ========================================================================
    // Booking actions
    // ========================================================================

    pub fn view_booking(&mut self, id: &str) {
        self.ui
            .toast(ToastKind::Info, &format!("Viewing details for booking {}", id));
    }

    pub fn cancel_booking(&mut self, id: &str) -> bool {
        if !self.ui.confirm("Are you sure you want to cancel this booking?") {
            return false;
        }
        self.ui.toast(
            ToastKind::Success,
            &format!("Booking {} cancelled successfully", id),
        );
        true
    }

    pub fn download_ticket(&mut self, id: &str) {
        self.ui
            .toast(ToastKind::Info, &format!("Downloading ticket for booking {}", id));
    }
}
