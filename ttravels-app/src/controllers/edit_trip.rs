use tracing::{error, info, warn};
use ttravels_core::api::EditTripChatRequest;
use ttravels_core::TripPlan;
use ttravels_render::trip as view;

use crate::ui::{Slot, Ui};
use crate::AppContext;

const PROCESSING: &str = "Processing your request...";

/// Trip editor for one saved plan. The plan lives here; every change goes
/// through the model and the affected sections are rendered from it.
pub struct EditTripController<U: Ui> {
    ctx: AppContext,
    ui: U,
    plan_id: String,
    plan: Option<TripPlan>,
    /// Rendered chat bubbles, oldest first.
    chat: Vec<String>,
}

impl<U: Ui> EditTripController<U> {
    pub fn new(ctx: AppContext, ui: U) -> Self {
        Self {
            ctx,
            ui,
            plan_id: String::new(),
            plan: None,
            chat: Vec::new(),
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn plan(&self) -> Option<&TripPlan> {
        self.plan.as_ref()
    }

    /// Any failure sends the user back to the dashboard.
    pub async fn load(&mut self, plan_id: &str) -> bool {
        let plan_id = plan_id.trim();
        if plan_id.is_empty() {
            self.ui.alert("Invalid plan ID");
            self.ui.navigate("/dashboard");
            return false;
        }
        match self.ctx.api.saved_trip_plan(plan_id).await {
            Ok(doc) => {
                info!(plan_id, "Trip plan loaded for editing");
                self.plan_id = plan_id.to_string();
                self.plan = Some(doc.plan());
                self.render_all();
                self.ui
                    .render(Slot::TripSaveButton, view::save_button_label(false).to_string());
                true
            }
            Err(e) => {
                error!(plan_id, error = %e, "Failed to load trip plan");
                self.ui
                    .alert(&format!("Failed to load trip plan: {}", e.user_message()));
                self.ui.navigate("/dashboard");
                false
            }
        }
    }

    fn render_all(&mut self) {
        let Some(plan) = &self.plan else {
            return;
        };
        let header = view::editor_header(plan);
        let hotels = view::editor_hotels(plan);
        let flights = view::editor_flights(plan);
        let itinerary = view::itinerary_html(&plan.itinerary_text());
        self.ui.render(Slot::TripHeader, header);
        self.ui.render(Slot::TripHotels, hotels);
        self.ui.render(Slot::TripFlights, flights);
        self.ui.render(Slot::TripItinerary, itinerary);
    }

    pub fn select_hotel(&mut self, index: usize) -> bool {
        let Some(plan) = self.plan.as_mut() else {
            return false;
        };
        let selected = plan.select_hotel(index).map(|_| ());
        match selected {
            Ok(_) => {
                let hotels = view::editor_hotels(plan);
                self.ui.render(Slot::TripHotels, hotels);
                true
            }
            Err(e) => {
                warn!(index, "Hotel index out of range");
                self.ui.alert(&e.to_string());
                false
            }
        }
    }

    pub fn select_flight(&mut self, index: usize) -> bool {
        let Some(plan) = self.plan.as_mut() else {
            return false;
        };
        let selected = plan.select_flight(index).map(|_| ());
        match selected {
            Ok(_) => {
                let flights = view::editor_flights(plan);
                self.ui.render(Slot::TripFlights, flights);
                true
            }
            Err(e) => {
                warn!(index, "Flight index out of range");
                self.ui.alert(&e.to_string());
                false
            }
        }
    }

    fn render_chat(&mut self, pending: Option<&str>) {
        let mut html = self.chat.concat();
        if let Some(text) = pending {
            html.push_str(&view::editor_message(false, text));
        }
        self.ui.render(Slot::TripChat, html);
    }

    /// Asks the assistant to change the plan; a returned plan replaces the
    /// current one wholesale.
    pub async fn chat(&mut self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }
        let Some(current) = self.plan.clone() else {
            return;
        };
        self.chat.push(view::editor_message(true, message));
        self.render_chat(Some(PROCESSING));

        let request = EditTripChatRequest {
            user_message: message.to_string(),
            current_plan: current,
            plan_id: self.plan_id.clone(),
        };
        let reply = match self.ctx.api.edit_trip_chat(&request).await {
            Ok(reply) => {
                if let Some(updated) = &reply.updated_plan {
                    info!(plan_id = %self.plan_id, "Assistant returned an updated plan");
                    self.plan = Some(TripPlan::from_value(updated));
                    self.render_all();
                }
                reply.message()
            }
            Err(e) => {
                error!(plan_id = %self.plan_id, error = %e, "Trip edit chat failed");
                "Sorry, I encountered an error. Please try again.".to_string()
            }
        };
        self.chat.push(view::editor_message(false, &reply));
        self.render_chat(None);
    }

    /// Writes the edited itinerary into the plan and stores it. The save
    /// button reads "Saving..." while the request is out.
    pub async fn save(&mut self, itinerary_text: &str) -> bool {
        let Some(plan) = self.plan.as_mut() else {
            return false;
        };
        plan.set_itinerary_text(itinerary_text);
        let plan = plan.clone();

        self.ui
            .render(Slot::TripSaveButton, view::save_button_label(true).to_string());
        let result = self.ctx.api.update_trip_plan(&self.plan_id, &plan).await;
        self.ui
            .render(Slot::TripSaveButton, view::save_button_label(false).to_string());

        match result {
            Ok(()) => {
                info!(plan_id = %self.plan_id, "Trip plan saved");
                self.ui.alert("Changes saved successfully!");
                self.ui.navigate("/dashboard");
                true
            }
            Err(e) => {
                error!(plan_id = %self.plan_id, error = %e, "Failed to save trip plan");
                self.ui
                    .alert(&format!("Failed to save changes: {}", e.user_message()));
                false
            }
        }
    }
}
