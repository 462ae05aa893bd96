use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use ttravels_core::api::AdminCollection;
use ttravels_core::dashboard::BookingKind;
use ttravels_core::listing::{BookingFilter, BookingLedger, ManagedBooking};
use ttravels_core::status::BookingStatus;
use ttravels_render::management as view;

use crate::debounce::Debouncer;
use crate::ui::{Slot, Ui};
use crate::AppContext;

/// Admin booking management: loads every booking once, then searches,
/// filters and pages locally.
pub struct BookingManagementController<U: Ui> {
    ctx: AppContext,
    ui: U,
    ledger: BookingLedger,
    debounce: Debouncer,
}

impl<U: Ui> BookingManagementController<U> {
    pub fn new(ctx: AppContext, ui: U) -> Self {
        let ledger = BookingLedger::new(Vec::new(), ctx.config.listing.page_size);
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

    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    /// Sends non-admins back to the home page; otherwise loads the list.
    pub async fn init(&mut self) -> bool {
        if !super::has_admin_flag(&self.ctx) {
            info!("Admin flag missing; leaving booking management");
            self.ui.navigate("/index.html");
            return false;
        }
        self.load().await;
        true
    }

    pub async fn load(&mut self) {
        self.ui
            .render(Slot::ManagementTable, view::loading_rows(view::BOOKING_COLUMNS));
        match self.ctx.api.admin_collection(AdminCollection::Bookings).await {
            Ok(docs) => {
                let bookings: Vec<ManagedBooking> = docs.iter().map(ManagedBooking::from_document).collect();
                info!(count = bookings.len(), "Bookings loaded");
                self.ledger = BookingLedger::new(bookings, self.ctx.config.listing.page_size);
                self.render();
            }
            Err(e) => {
                error!(error = %e, "Failed to load bookings");
                self.ui.render(
                    Slot::ManagementTable,
                    view::error_rows(view::BOOKING_COLUMNS, &e.user_message()),
                );
            }
        }
    }

    fn render(&mut self) {
        let rows = self.ledger.page_items().into_iter().map(view::booking_row).collect();
        self.ui.render(
            Slot::ManagementTable,
            view::table_page(rows, view::BOOKING_COLUMNS, "bookings"),
        );
        self.ui
            .render(Slot::ManagementPagination, view::pagination(&self.ledger.pagination()));
    }

    // ========================================================================
    // Filters
    // ========================================================================

    fn refilter(&mut self, change: impl FnOnce(&mut BookingFilter)) {
        let mut filter = self.ledger.filter().clone();
        change(&mut filter);
        debug!(?filter, "Applying booking filter");
        self.ledger.apply(filter);
        self.render();
    }

    /// Input handlers wait on a clone of this before calling `search`.
    pub fn debouncer(&self) -> Debouncer {
        self.debounce.clone()
    }

    pub fn search(&mut self, text: &str) {
        let text = text.to_string();
        self.refilter(|f| f.search = text);
    }

    /// Applies the search once typing has paused; returns whether it ran.
    pub async fn search_debounced(&mut self, text: &str) -> bool {
        let ticket = self.debounce.ticket();
        if !self.debounce.settled(ticket).await {
            return false;
        }
        self.search(text);
        true
    }

    pub fn filter_kind(&mut self, kind: Option<BookingKind>) {
        self.refilter(|f| f.kind = kind);
    }

    pub fn filter_status(&mut self, status: Option<BookingStatus>) {
        self.refilter(|f| f.status = status);
    }

    /// Inclusive on both ends.
    pub fn filter_dates(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.refilter(|f| {
            f.date_from = from;
            f.date_to = to;
        });
    }

    pub fn clear_filters(&mut self) {
        self.ledger.clear();
        self.render();
    }

    // ========================================================================
    // Pages
    // ========================================================================

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

    // ========================================================================
    // Row actions
    // ========================================================================

    pub fn view_booking(&mut self, id: &str) {
        match self.ledger.get(id) {
            Some(booking) => {
                let details = view::booking_details(booking);
                self.ui.render(Slot::ManagementDetails, details);
            }
            None => warn!(id, "View requested for unknown booking"),
        }
    }

    pub fn edit_booking(&mut self, id: &str) {
        self.ui.alert(&format!(
            "Edit booking functionality would be implemented here for booking: {}",
            id
        ));
    }

    /// Marks the booking cancelled here only; nothing is sent to the backend.
    pub fn cancel_booking(&mut self, id: &str) -> bool {
        if !self
            .ui
            .confirm(&format!("Are you sure you want to cancel booking {}?", id))
        {
            return false;
        }
        if let Err(e) = self.ledger.update(id, |b| b.status = BookingStatus::Cancelled) {
            warn!(id, error = %e, "Cancel requested for unknown booking");
            return false;
        }
        self.render();
        info!(id, "Booking cancelled locally");
        self.ui.alert(&format!("Booking {} has been cancelled", id));
        true
    }

    pub fn logout(&mut self) {
        super::logout(&self.ctx, &mut self.ui);
    }
}
