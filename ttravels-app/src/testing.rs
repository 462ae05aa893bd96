//! In-memory `TravelApi` with scripted replies for controller unit tests.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use ttravels_core::api::{
    AdminCollection, ChatTextRequest, EditTripChatRequest, EditTripReply, FlightSearchRequest, SaveTripPlanRequest,
    SavedPlanDocument, VoiceClip,
};
use ttravels_core::{ApiError, ApiResult, TravelApi, TripPlan};

/// Replies are queued per endpoint name. The last queued reply of an
/// endpoint keeps being returned; an endpoint with nothing queued answers
/// `NotFound`.
///
/// Endpoint names: `admin/<segment>`, `admin/ai-log`, `admin/ai-log/delete`,
/// `chat-text`, `chat-voice`, `text-to-speech`, `notifications`,
/// `save-trip-plan`, `my-bookings`, `my-saved-plans`, `saved-trip-plan`,
/// `delete-trip-plan`, `update-trip-plan`, `edit-trip-chat`, `search`.
#[derive(Debug, Default)]
pub struct FakeApi {
    replies: Mutex<HashMap<String, VecDeque<ApiResult<Value>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, endpoint: &str, response: ApiResult<Value>) -> &Self {
        lock(&self.replies)
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Every call made so far, with the request body or id it carried.
    pub fn calls(&self) -> Vec<(String, Value)> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Value> {
        lock(&self.calls)
            .iter()
            .filter(|(name, _)| name == endpoint)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn answer(&self, endpoint: &str, body: impl Serialize) -> ApiResult<Value> {
        let body = serde_json::to_value(body).unwrap_or(Value::Null);
        lock(&self.calls).push((endpoint.to_string(), body));

        let mut replies = lock(&self.replies);
        match replies.get_mut(endpoint) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Err(ApiError::NotFound(endpoint.into()))),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or(Err(ApiError::NotFound(endpoint.into()))),
            None => Err(ApiError::NotFound(endpoint.to_string())),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl TravelApi for FakeApi {
    async fn admin_collection(&self, collection: AdminCollection) -> ApiResult<Vec<Value>> {
        let endpoint = format!("admin/{}", collection.path_segment());
        self.answer(&endpoint, Value::Null).map(list)
    }

    async fn admin_ai_log(&self, id: &str) -> ApiResult<Value> {
        self.answer("admin/ai-log", json!({ "id": id }))
    }

    async fn delete_admin_ai_log(&self, id: &str) -> ApiResult<()> {
        self.answer("admin/ai-log/delete", json!({ "id": id })).map(drop)
    }

    async fn chat_text(&self, request: &ChatTextRequest) -> ApiResult<Value> {
        self.answer("chat-text", request)
    }

    async fn chat_voice(&self, clip: VoiceClip, conversation_id: &str) -> ApiResult<Value> {
        let body = json!({ "file_name": clip.file_name, "mime": clip.mime, "conversation_id": conversation_id });
        self.answer("chat-voice", body)
    }

    async fn text_to_speech(&self, text: &str) -> ApiResult<Option<String>> {
        self.answer("text-to-speech", json!({ "text": text }))
            .map(|v| v.as_str().map(str::to_string))
    }

    async fn notifications(&self) -> ApiResult<Vec<Value>> {
        self.answer("notifications", Value::Null).map(list)
    }

    async fn save_trip_plan(&self, request: &SaveTripPlanRequest) -> ApiResult<Option<String>> {
        self.answer("save-trip-plan", request)
            .map(|v| v.as_str().map(str::to_string))
    }

    async fn my_bookings(&self) -> ApiResult<Vec<Value>> {
        self.answer("my-bookings", Value::Null).map(list)
    }

    async fn my_saved_plans(&self) -> ApiResult<Vec<Value>> {
        self.answer("my-saved-plans", Value::Null).map(list)
    }

    async fn saved_trip_plan(&self, id: &str) -> ApiResult<SavedPlanDocument> {
        decode(self.answer("saved-trip-plan", json!({ "id": id }))?)
    }

    async fn delete_trip_plan(&self, id: &str) -> ApiResult<()> {
        self.answer("delete-trip-plan", json!({ "id": id })).map(drop)
    }

    async fn update_trip_plan(&self, id: &str, plan: &TripPlan) -> ApiResult<()> {
        self.answer("update-trip-plan", json!({ "id": id, "trip_plan": plan }))
            .map(drop)
    }

    async fn edit_trip_chat(&self, request: &EditTripChatRequest) -> ApiResult<EditTripReply> {
        decode(self.answer("edit-trip-chat", request)?)
    }

    async fn search_flights(&self, request: &FlightSearchRequest) -> ApiResult<Vec<Value>> {
        self.answer("search", request).map(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_reply_repeats() {
        let api = FakeApi::new();
        api.reply("notifications", Ok(json!([{"read": false}])))
            .reply("notifications", Ok(json!([])));

        assert_eq!(api.notifications().await.unwrap().len(), 1);
        assert!(api.notifications().await.unwrap().is_empty());
        assert!(api.notifications().await.unwrap().is_empty());
        assert_eq!(api.calls_to("notifications").len(), 3);
        assert!(matches!(api.my_bookings().await, Err(ApiError::NotFound(_))));
    }
}
