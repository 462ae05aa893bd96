//! AI assistant chat widget.
//!
//! The transcript is the model: every entry, plan card and save state lives
//! in it, the widget is rendered from it, and it is persisted after each
//! change so a reload continues the same conversation.

use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use ttravels_core::api::{ChatTextRequest, SaveTripPlanRequest};
use ttravels_core::chat::{self as model, ChatEntry, ChatReply, PlanCard, QuickAction, Role, SaveState, Transcript};
use ttravels_core::{ApiError, TripPlan};
use ttravels_render::chat as view;
use ttravels_store::local_store::{self, keys};
use uuid::Uuid;

use crate::error::AppResult;
use crate::ui::{Slot, Ui};
use crate::voice::{self, AudioPlayer, AudioRecorder, VoiceError};
use crate::AppContext;

/// How often the notification badge is refreshed while the widget is open.
pub const NOTIFICATION_POLL: Duration = Duration::from_secs(30);

pub struct AssistantController<U: Ui> {
    ctx: AppContext,
    ui: U,
    transcript: Transcript,
    recorder: Option<Box<dyn AudioRecorder>>,
    player: Option<Box<dyn AudioPlayer>>,
    unread: usize,
}

impl<U: Ui> AssistantController<U> {
    pub fn new(ctx: AppContext, ui: U) -> Self {
        Self {
            ctx,
            ui,
            transcript: Transcript::new(String::new()),
            recorder: None,
            player: None,
            unread: 0,
        }
    }

    pub fn with_recorder(mut self, recorder: Box<dyn AudioRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_player(mut self, player: Box<dyn AudioPlayer>) -> Self {
        self.player = Some(player);
        self
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn conversation_id(&self) -> &str {
        &self.transcript.conversation_id
    }

    pub fn unread(&self) -> usize {
        self.unread
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Restores the stored conversation, or starts one with a greeting.
    pub fn open(&mut self) {
        let store = self.ctx.store.as_ref();
        let conversation_id = match store.get(keys::CONVERSATION_ID) {
            Ok(Some(id)) if !id.is_empty() => id,
            Ok(_) => self.start_conversation(),
            Err(e) => {
                warn!(error = %e, "Could not read conversation id");
                self.start_conversation()
            }
        };

        let stored = local_store::get_json::<Transcript>(self.ctx.store.as_ref(), keys::CHAT_HISTORY)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Could not read chat history");
                None
            })
            .filter(|t| t.conversation_id == conversation_id);
        self.transcript = stored.unwrap_or_else(|| Transcript::new(conversation_id.clone()));
        if self.transcript.is_empty() {
            self.transcript.push(view::greeting_entry());
        }
        info!(conversation_id = %conversation_id, entries = self.transcript.entries().len(), "Chat opened");

        self.persist();
        self.render();
        self.ui
            .render(Slot::ChatSuggestions, view::suggestion_chips(&[]));
    }

    fn start_conversation(&self) -> String {
        let id = model::new_conversation_id(Utc::now());
        if let Err(e) = self.ctx.store.set(keys::CONVERSATION_ID, &id) {
            warn!(error = %e, "Could not store conversation id");
        }
        id
    }

    /// Forgets the history and starts a new server-side conversation.
    pub fn clear_chat(&mut self) {
        let id = self.start_conversation();
        self.transcript = Transcript::new(id);
        self.transcript.push(view::greeting_entry());
        self.persist();
        self.render();
        self.ui
            .render(Slot::ChatSuggestions, view::suggestion_chips(&[]));
    }

    fn persist(&self) {
        if let Err(e) = local_store::set_json(self.ctx.store.as_ref(), keys::CHAT_HISTORY, &self.transcript) {
            warn!(error = %e, "Could not persist chat history");
        }
    }

    fn render(&mut self) {
        let html = view::transcript(self.transcript.entries());
        self.ui.render(Slot::ChatMessages, html);
    }

    fn push(&mut self, entry: ChatEntry) -> bool {
        let added = self.transcript.push(entry);
        if !added {
            debug!("Dropped repeated assistant message");
        }
        added
    }

    fn push_assistant_text(&mut self, text: &str) -> bool {
        let (markup, plain) = view::assistant_content(text);
        self.push(ChatEntry::new(Role::Assistant, markup, plain))
    }

    fn push_user_text(&mut self, text: &str) {
        let (markup, plain) = view::user_content(text);
        self.push(ChatEntry::new(Role::User, markup, plain));
    }

    // ========================================================================
    // Sending
    // ========================================================================

    pub async fn send_text(&mut self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }
        self.push_user_text(message);
        self.persist();
        self.render();

        let request = ChatTextRequest {
            message: message.to_string(),
            conversation_id: self.transcript.conversation_id.clone(),
        };
        match self.ctx.api.chat_text(&request).await {
            Ok(doc) => self.handle_reply(ChatReply::from_response(&doc)),
            Err(e) => {
                error!(error = %e, "Chat request failed");
                self.push_assistant_text("Sorry, there was an error contacting the assistant.");
                self.persist();
                self.render();
            }
        }
    }

    /// Records a clip, uploads it and shows the transcription as the user's message.
    pub async fn send_voice(&mut self) {
        let max = Duration::from_secs(self.ctx.config.chat.voice_max_seconds);
        let Some(recorder) = self.recorder.as_mut() else {
            self.ui.alert(&VoiceError::Unsupported.to_string());
            return;
        };
        let clip = match voice::record_clip(recorder.as_mut(), max).await {
            Ok(clip) => clip,
            Err(e) => {
                warn!(error = %e, "Recording failed");
                self.ui.alert(&e.to_string());
                return;
            }
        };

        let conversation_id = self.transcript.conversation_id.clone();
        match self.ctx.api.chat_voice(clip, &conversation_id).await {
            Ok(doc) => {
                let reply = ChatReply::from_response(&doc);
                if let Some(said) = reply.transcribed_text.as_deref().filter(|t| !t.trim().is_empty()) {
                    self.push_user_text(said);
                }
                self.handle_reply(reply);
            }
            Err(e) => {
                error!(error = %e, "Voice request failed");
                self.push_assistant_text("Sorry, there was an error processing your voice.");
                self.persist();
                self.render();
            }
        }
    }

    /// `voice` starts a recording; every other action sends its message.
    pub async fn quick_action(&mut self, action: &QuickAction) {
        if action.action.as_deref() == Some("voice") {
            self.send_voice().await;
        } else {
            self.send_text(&action.message()).await;
        }
    }

    fn handle_reply(&mut self, reply: ChatReply) {
        if let Some(message) = &reply.error {
            warn!(error = %message, "Assistant returned an error");
            self.push(view::error_entry(message));
        }

        let plan = reply.trip_plan.clone().or_else(|| {
            (!reply.hotel_results.is_empty()).then(|| TripPlan::from_hotel_results(&reply.hotel_results))
        });

        let added = match reply.text.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(text) => self.push_assistant_text(text),
            None => false,
        };
        if let Some(plan) = plan {
            info!(destination = ?plan.destination(), "Showing trip plan card");
            let host = if added {
                self.transcript.last_assistant_mut().filter(|last| last.card.is_none())
            } else {
                None
            };
            match host {
                Some(last) => last.card = Some(PlanCard::new(plan)),
                None => {
                    self.push(ChatEntry::new(Role::Assistant, "", "").with_card(PlanCard::new(plan)));
                }
            }
        }

        if !reply.quick_actions.is_empty() || !reply.booking_actions.is_empty() {
            if let Some(last) = self.transcript.last_assistant_mut() {
                last.quick_actions.extend(reply.quick_actions.iter().cloned());
                last.booking_actions.extend(reply.booking_actions.iter().cloned());
            }
        }

        self.persist();
        self.render();
        self.ui
            .render(Slot::ChatSuggestions, view::suggestion_chips(&reply.suggestions));

        if let Some(audio) = &reply.audio {
            if let Err(e) = self.play(audio) {
                warn!(error = %e, "Could not play reply audio");
            }
        }
    }

    fn play(&mut self, payload: &str) -> Result<(), VoiceError> {
        let Some(player) = self.player.as_mut() else {
            return Ok(());
        };
        player.play(voice::decode_audio_payload(payload)?)
    }

    /// Reads the latest assistant reply aloud.
    pub async fn speak_last(&mut self) -> AppResult<()> {
        let Some(text) = self.transcript.last_assistant_text().map(str::to_string) else {
            return Ok(());
        };
        if let Some(audio) = self.ctx.api.text_to_speech(&text).await? {
            self.play(&audio)?;
        }
        Ok(())
    }

    // ========================================================================
    // Plan cards
    // ========================================================================

    fn card_mut(&mut self, entry_id: Uuid) -> Option<&mut PlanCard> {
        self.transcript.get_mut(entry_id).and_then(|e| e.card.as_mut())
    }

    pub fn card(&self, entry_id: Uuid) -> Option<&PlanCard> {
        self.transcript.get(entry_id).and_then(|e| e.card.as_ref())
    }

    pub fn select_hotel(&mut self, entry_id: Uuid, index: usize) -> bool {
        let selected = match self.card_mut(entry_id) {
            Some(card) => card.plan.select_hotel(index).is_ok(),
            None => false,
        };
        if !selected {
            warn!(%entry_id, index, "Invalid hotel selection");
            self.ui.alert("Invalid hotel selection.");
            return false;
        }
        self.push_assistant_text("Hotel selected! It will be saved when you save the trip plan.");
        self.persist();
        self.render();
        true
    }

    pub fn select_flight(&mut self, entry_id: Uuid, index: usize) -> bool {
        let selected = match self.card_mut(entry_id) {
            Some(card) => card.plan.select_flight(index).is_ok(),
            None => false,
        };
        if !selected {
            warn!(%entry_id, index, "Invalid flight selection");
            self.ui.alert("Invalid flight selection.");
            return false;
        }
        self.push_assistant_text("Flight selected! It will be saved when you save the trip plan.");
        self.persist();
        self.render();
        true
    }

    fn set_save_state(&mut self, entry_id: Uuid, state: SaveState) {
        if let Some(card) = self.card_mut(entry_id) {
            card.save = state;
        }
        self.persist();
        self.render();
    }

    /// Saves the card's plan with its selections. Returns whether it was saved.
    pub async fn save_plan(&mut self, entry_id: Uuid) -> bool {
        let plan = match self.card_mut(entry_id) {
            Some(card) if card.save == SaveState::Unsaved => card.plan.clone(),
            Some(_) => return false,
            None => {
                warn!(%entry_id, "Save requested for unknown card");
                return false;
            }
        };
        self.set_save_state(entry_id, SaveState::Saving);

        let request = SaveTripPlanRequest {
            title: plan.title(),
            trip_plan: plan,
        };
        match self.ctx.api.save_trip_plan(&request).await {
            Ok(id) => {
                info!(%entry_id, plan_id = ?id, "Trip plan saved");
                self.set_save_state(entry_id, SaveState::Saved { id });
                true
            }
            Err(e) => {
                error!(%entry_id, error = %e, "Failed to save trip plan");
                self.set_save_state(entry_id, SaveState::Unsaved);
                match e {
                    ApiError::Unauthenticated => {
                        if self
                            .ui
                            .confirm("You must be logged in to save trip plans. Log in now?")
                        {
                            self.ui.navigate("/login");
                        }
                    }
                    ApiError::Network(_) => self.ui.alert("Unable to save plan at the moment."),
                    ApiError::Decode(_) => self.ui.alert("Failed to save trip plan"),
                    other => self.ui.alert(&other.user_message()),
                }
                false
            }
        }
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub async fn refresh_notifications(&mut self) {
        match self.ctx.api.notifications().await {
            Ok(items) => {
                self.unread = model::unread_count(&items);
                self.ui
                    .render(Slot::NotificationBadge, view::notification_badge(self.unread));
            }
            Err(e) => debug!(error = %e, "Notifications unavailable"),
        }
    }

    /// Refreshes the badge every `every` until `stop` turns true or its sender goes away.
    pub async fn poll_notifications(&mut self, every: Duration, mut stop: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(every);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh_notifications().await,
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
    }
}
