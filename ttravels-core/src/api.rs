use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::trip_plan::TripPlan;

/// Failures of a backend call, as the pages need to tell them apart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    /// 2xx response carrying `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Not logged in")]
    Unauthenticated,
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Message to show the user: the server's own wording where it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } | ApiError::Rejected(message) | ApiError::NotFound(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Admin data domains served under `/api/admin/<segment>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminCollection {
    Bookings,
    Users,
    Payments,
    AiLogs,
}

impl AdminCollection {
    pub fn path_segment(self) -> &'static str {
        match self {
            AdminCollection::Bookings => "bookings",
            AdminCollection::Users => "users",
            AdminCollection::Payments => "payments",
            AdminCollection::AiLogs => "ai-logs",
        }
    }

    /// Key of the document array in the response envelope.
    pub fn response_key(self) -> &'static str {
        match self {
            AdminCollection::AiLogs => "logs",
            other => other.path_segment(),
        }
    }

    /// Human name used in default error text ("Failed to load AI logs").
    pub fn label(self) -> &'static str {
        match self {
            AdminCollection::Bookings => "bookings",
            AdminCollection::Users => "users",
            AdminCollection::Payments => "payments",
            AdminCollection::AiLogs => "AI logs",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTextRequest {
    pub message: String,
    pub conversation_id: String,
}

/// A recorded voice message ready for upload.
#[derive(Clone, PartialEq)]
pub struct VoiceClip {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub file_name: String,
}

impl VoiceClip {
    pub fn webm(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "audio/webm".to_string(),
            file_name: "voice.webm".to_string(),
        }
    }
}

impl std::fmt::Debug for VoiceClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceClip")
            .field("mime", &self.mime)
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveTripPlanRequest {
    pub title: String,
    pub trip_plan: TripPlan,
}

/// A saved plan as returned by `/api/saved-trip-plan/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedPlanDocument {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub trip_plan: Value,
}

impl SavedPlanDocument {
    pub fn plan(&self) -> TripPlan {
        TripPlan::from_value(&self.trip_plan)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditTripChatRequest {
    pub user_message: String,
    pub current_plan: TripPlan,
    pub plan_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditTripReply {
    #[serde(default)]
    pub updated_plan: Option<Value>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub bot_reply: Option<String>,
}

impl EditTripReply {
    pub fn message(&self) -> String {
        self.reply
            .clone()
            .filter(|r| !r.is_empty())
            .or_else(|| self.bot_reply.clone().filter(|r| !r.is_empty()))
            .unwrap_or_else(|| "I've updated your trip plan.".to_string())
    }
}

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSearchRequest {
    pub from: String,
    pub to: String,
    pub departure: String,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub passengers: u32,
    #[serde(rename = "cabinClass")]
    pub cabin_class: String,
}

/// Backend operations used by the pages.
///
/// Heterogeneous documents come back as raw JSON; each page normalizes them
/// through the adapter for its document type.
#[async_trait]
pub trait TravelApi: Send + Sync {
    async fn admin_collection(&self, collection: AdminCollection) -> ApiResult<Vec<Value>>;

    async fn admin_ai_log(&self, id: &str) -> ApiResult<Value>;

    async fn delete_admin_ai_log(&self, id: &str) -> ApiResult<()>;

    async fn chat_text(&self, request: &ChatTextRequest) -> ApiResult<Value>;

    async fn chat_voice(&self, clip: VoiceClip, conversation_id: &str) -> ApiResult<Value>;

    /// Returns the synthesized audio payload (data URI or bare base64), if any.
    async fn text_to_speech(&self, text: &str) -> ApiResult<Option<String>>;

    async fn notifications(&self) -> ApiResult<Vec<Value>>;

    /// Returns the id the backend assigned to the saved plan.
    async fn save_trip_plan(&self, request: &SaveTripPlanRequest) -> ApiResult<Option<String>>;

    async fn my_bookings(&self) -> ApiResult<Vec<Value>>;

    async fn my_saved_plans(&self) -> ApiResult<Vec<Value>>;

    async fn saved_trip_plan(&self, id: &str) -> ApiResult<SavedPlanDocument>;

    async fn delete_trip_plan(&self, id: &str) -> ApiResult<()>;

    async fn update_trip_plan(&self, id: &str, plan: &TripPlan) -> ApiResult<()>;

    async fn edit_trip_chat(&self, request: &EditTripChatRequest) -> ApiResult<EditTripReply>;

    /// Returns the flight documents of the search response.
    async fn search_flights(&self, request: &FlightSearchRequest) -> ApiResult<Vec<Value>>;
}
