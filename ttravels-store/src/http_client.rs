//! reqwest implementation of [`TravelApi`] against the TTravels backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use ttravels_core::api::{
    AdminCollection, ApiError, ApiResult, ChatTextRequest, EditTripChatRequest, EditTripReply, FlightSearchRequest,
    SaveTripPlanRequest, SavedPlanDocument, TravelApi, VoiceClip,
};
use ttravels_core::TripPlan;
use ttravels_shared::json as lenient;

use crate::app_config::ApiConfig;
use crate::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and applies the envelope rules shared by every
    /// endpoint. `fallback` is the message used when the server gives none.
    async fn send(&self, request: RequestBuilder, fallback: &str) -> ApiResult<Value> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let doc: Option<Value> = serde_json::from_str(&body).ok();
        let server_message = doc.as_ref().and_then(|d| lenient::first_text(d, &["/error", "/message"]));
        debug!(%status, path = %url, "response received");

        match status {
            StatusCode::UNAUTHORIZED => return Err(ApiError::Unauthenticated),
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound(server_message.unwrap_or(url))),
            s if !s.is_success() => {
                return Err(ApiError::Status {
                    status: s.as_u16(),
                    message: server_message.unwrap_or_else(|| fallback.to_string()),
                })
            }
            _ => {}
        }

        let doc = doc.ok_or_else(|| ApiError::Decode(format!("{} returned a non-JSON body", url)))?;
        if doc.get("success") == Some(&Value::Bool(false)) {
            return Err(ApiError::Rejected(server_message.unwrap_or_else(|| fallback.to_string())));
        }
        Ok(doc)
    }

    async fn get(&self, path: &str, fallback: &str) -> ApiResult<Value> {
        self.send(self.client.get(self.url(path)), fallback).await
    }

    async fn delete(&self, path: &str, fallback: &str) -> ApiResult<Value> {
        self.send(self.client.delete(self.url(path)), fallback).await
    }

    async fn post<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B, fallback: &str) -> ApiResult<Value> {
        self.send(self.client.post(self.url(path)).json(body), fallback).await
    }
}

fn list(doc: &Value, key: &str) -> Vec<Value> {
    lenient::array(doc, &format!("/{}", key)).to_vec()
}

#[async_trait]
impl TravelApi for ApiClient {
    async fn admin_collection(&self, collection: AdminCollection) -> ApiResult<Vec<Value>> {
        let fallback = format!("Failed to load {}", collection.label());
        let doc = self
            .get(&format!("/api/admin/{}", collection.path_segment()), &fallback)
            .await?;
        let items = list(&doc, collection.response_key());
        info!(collection = collection.path_segment(), count = items.len(), "admin collection loaded");
        Ok(items)
    }

    async fn admin_ai_log(&self, id: &str) -> ApiResult<Value> {
        let doc = self.get(&format!("/api/admin/ai-logs/{}", id), "Failed to load AI log").await?;
        doc.get("log")
            .cloned()
            .ok_or_else(|| ApiError::Decode("response has no log".into()))
    }

    async fn delete_admin_ai_log(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/api/admin/ai-logs/{}", id), "Failed to delete AI log").await?;
        info!(id, "AI log deleted");
        Ok(())
    }

    async fn chat_text(&self, request: &ChatTextRequest) -> ApiResult<Value> {
        debug!(conversation_id = %request.conversation_id, "sending chat message");
        self.post("/api/chat-text", request, "Failed to contact the assistant").await
    }

    async fn chat_voice(&self, clip: VoiceClip, conversation_id: &str) -> ApiResult<Value> {
        debug!(?clip, conversation_id, "uploading voice clip");
        let part = Part::bytes(clip.bytes)
            .file_name(clip.file_name)
            .mime_str(&clip.mime)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let form = Form::new()
            .part("audio", part)
            .text("conversation_id", conversation_id.to_string());

        self.send(
            self.client.post(self.url("/api/chat-voice")).multipart(form),
            "Failed to process voice message",
        )
        .await
    }

    async fn text_to_speech(&self, text: &str) -> ApiResult<Option<String>> {
        let doc = self.post("/api/text-to-speech", &json!({ "text": text }), "Failed to synthesize speech").await?;
        Ok(lenient::text(doc.get("audio")))
    }

    async fn notifications(&self) -> ApiResult<Vec<Value>> {
        let doc = self.get("/api/notifications", "Failed to load notifications").await?;
        Ok(list(&doc, "notifications"))
    }

    async fn save_trip_plan(&self, request: &SaveTripPlanRequest) -> ApiResult<Option<String>> {
        let doc = self.post("/api/save-trip-plan", request, "Failed to save trip plan").await?;
        let id = lenient::text(doc.get("trip_plan_id"));
        info!(title = %request.title, id = ?id, "trip plan saved");
        Ok(id)
    }

    async fn my_bookings(&self) -> ApiResult<Vec<Value>> {
        let doc = self.get("/api/my-bookings", "Failed to load bookings").await?;
        Ok(list(&doc, "bookings"))
    }

    async fn my_saved_plans(&self) -> ApiResult<Vec<Value>> {
        let doc = self.get("/api/my-saved-plans", "Failed to load saved plans").await?;
        Ok(list(&doc, "plans"))
    }

    async fn saved_trip_plan(&self, id: &str) -> ApiResult<SavedPlanDocument> {
        let doc = self
            .get(&format!("/api/saved-trip-plan/{}", id), "Failed to load trip plan")
            .await?;
        let plan = doc
            .get("plan")
            .cloned()
            .ok_or_else(|| ApiError::Decode("response has no plan".into()))?;
        serde_json::from_value(plan).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn delete_trip_plan(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/api/delete-trip-plan/{}", id), "Failed to delete trip plan")
            .await?;
        info!(id, "trip plan deleted");
        Ok(())
    }

    async fn update_trip_plan(&self, id: &str, plan: &TripPlan) -> ApiResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/api/update-trip-plan/{}", id)))
            .json(&json!({ "trip_plan": plan }));
        self.send(request, "Failed to update trip plan").await?;
        info!(id, "trip plan updated");
        Ok(())
    }

    async fn edit_trip_chat(&self, request: &EditTripChatRequest) -> ApiResult<EditTripReply> {
        let doc = self.post("/api/edit-trip-chat", request, "Failed to edit trip plan").await?;
        serde_json::from_value(doc).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn search_flights(&self, request: &FlightSearchRequest) -> ApiResult<Vec<Value>> {
        info!(from = %request.from, to = %request.to, departure = %request.departure, "searching flights");
        let doc = self.post("/search", request, "Internal server error").await?;
        if let Some(error) = lenient::text(doc.get("error")) {
            return Err(ApiError::Rejected(error));
        }
        let mut flights = list(&doc, "best_flights");
        flights.extend(list(&doc, "other_flights"));
        Ok(flights)
    }
}
