//! The page surface controllers draw on: named slots, dialogs, toasts, navigation.

use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use ttravels_core::api::AdminCollection;
use ttravels_shared::html;

/// Regions of a page that receive rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    AdminTable(AdminCollection),
    ManagementTable,
    ManagementDetails,
    ManagementPagination,
    UserStats,
    ChatMessages,
    ChatSuggestions,
    NotificationBadge,
    DashboardWelcome,
    DashboardContent,
    PlanModal,
    TripHeader,
    TripHotels,
    TripFlights,
    TripItinerary,
    TripChat,
    TripSaveButton,
    FlightResults,
    FlightCount,
    AirlineFilters,
    AirportSuggestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

pub trait Ui: Send {
    /// Replaces the content of `slot`.
    fn render(&mut self, slot: Slot, html: String);

    fn alert(&mut self, message: &str);

    fn confirm(&mut self, message: &str) -> bool;

    fn toast(&mut self, kind: ToastKind, message: &str);

    fn navigate(&mut self, url: &str);
}

/// Keeps everything it is asked to show. Confirmations are answered from a
/// queue of scripted replies, then with the default.
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub slots: HashMap<Slot, String>,
    pub alerts: Vec<String>,
    pub confirms: Vec<String>,
    pub toasts: Vec<(ToastKind, String)>,
    pub navigations: Vec<String>,
    answers: VecDeque<bool>,
    default_answer: bool,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirms everything not otherwise scripted.
    pub fn agreeing() -> Self {
        Self {
            default_answer: true,
            ..Self::default()
        }
    }

    pub fn answer_next(&mut self, answer: bool) {
        self.answers.push_back(answer);
    }

    pub fn slot(&self, slot: Slot) -> &str {
        self.slots.get(&slot).map(String::as_str).unwrap_or("")
    }
}

impl Ui for RecordingUi {
    fn render(&mut self, slot: Slot, html: String) {
        self.slots.insert(slot, html);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.answers.pop_front().unwrap_or(self.default_answer)
    }

    fn toast(&mut self, kind: ToastKind, message: &str) {
        self.toasts.push((kind, message.to_string()));
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }
}

/// Prints slots to stdout (or a given writer) and dialogs to stderr.
pub struct TerminalUi {
    assume_yes: bool,
    /// Print markup instead of its visible text.
    raw_html: bool,
    out: Box<dyn Write + Send>,
}

impl TerminalUi {
    pub fn new(assume_yes: bool, raw_html: bool) -> Self {
        Self::with_writer(assume_yes, raw_html, Box::new(io::stdout()))
    }

    pub fn with_writer(assume_yes: bool, raw_html: bool, out: Box<dyn Write + Send>) -> Self {
        Self { assume_yes, raw_html, out }
    }
}

impl Ui for TerminalUi {
    fn render(&mut self, slot: Slot, markup: String) {
        let body = if self.raw_html { markup } else { html::text_lines(&markup) };
        if let Err(e) = writeln!(self.out, "[{:?}]\n{}", slot, body.trim_end()) {
            tracing::warn!(?slot, error = %e, "Failed to write slot");
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("ALERT: {}", message);
    }

    fn confirm(&mut self, message: &str) -> bool {
        eprintln!("CONFIRM: {} -> {}", message, if self.assume_yes { "yes" } else { "no" });
        self.assume_yes
    }

    fn toast(&mut self, kind: ToastKind, message: &str) {
        eprintln!("{:?}: {}", kind, message);
    }

    fn navigate(&mut self, url: &str) {
        eprintln!("NAVIGATE: {}", url);
    }
}
