//! Microphone and speaker seams for the chat widget.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};
use ttravels_core::api::VoiceClip;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("Audio recording not supported on this device.")]
    Unsupported,
    #[error("Microphone access denied. Please allow microphone access to use voice features.")]
    PermissionDenied,
    #[error("No audio was recorded.")]
    Empty,
    #[error("Audio device error: {0}")]
    Device(String),
    #[error("Could not decode audio response.")]
    BadAudio,
}

#[async_trait]
pub trait AudioRecorder: Send {
    async fn start(&mut self) -> Result<(), VoiceError>;

    /// Resolves when the user presses stop.
    async fn stop_requested(&mut self);

    /// Ends the recording and returns the encoded clip.
    async fn finish(&mut self) -> Result<Vec<u8>, VoiceError>;
}

pub trait AudioPlayer: Send {
    fn play(&mut self, audio: DecodedAudio) -> Result<(), VoiceError>;
}

/// Records one clip, stopping at the user's request or after `max`.
pub async fn record_clip(recorder: &mut dyn AudioRecorder, max: Duration) -> Result<VoiceClip, VoiceError> {
    recorder.start().await?;
    info!(max_secs = max.as_secs(), "recording started");
    if tokio::time::timeout(max, recorder.stop_requested()).await.is_err() {
        debug!("recording reached the time limit");
    }
    let bytes = recorder.finish().await?;
    if bytes.is_empty() {
        return Err(VoiceError::Empty);
    }
    Ok(VoiceClip::webm(bytes))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    pub mime: String,
    pub bytes: Vec<u8>,
}

static DATA_URI: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)^data:([^;]+);base64,(.+)$").ok());

/// Decodes a `data:<mime>;base64,<payload>` URI or bare base64, which is
/// taken as `audio/mpeg`. Whitespace inside the payload is ignored.
pub fn decode_audio_payload(payload: &str) -> Result<DecodedAudio, VoiceError> {
    let payload = payload.trim();
    let (mime, encoded) = match DATA_URI.as_ref().and_then(|re| re.captures(payload)) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => ("audio/mpeg".to_string(), payload.to_string()),
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|_| VoiceError::BadAudio)?;
    if bytes.is_empty() {
        return Err(VoiceError::BadAudio);
    }
    Ok(DecodedAudio { mime, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubRecorder {
        stops: bool,
        clip: Vec<u8>,
    }

    #[async_trait]
    impl AudioRecorder for StubRecorder {
        async fn start(&mut self) -> Result<(), VoiceError> {
            Ok(())
        }

        async fn stop_requested(&mut self) {
            if !self.stops {
                std::future::pending::<()>().await;
            }
        }

        async fn finish(&mut self) -> Result<Vec<u8>, VoiceError> {
            Ok(std::mem::take(&mut self.clip))
        }
    }

    #[test]
    fn test_data_uri_keeps_mime() {
        let audio = decode_audio_payload("data:audio/wav;base64,UklG\nRg==").unwrap();
        assert_eq!(audio.mime, "audio/wav");
        assert_eq!(audio.bytes, b"RIFF");
    }

    #[test]
    fn test_bare_base64_defaults_to_mpeg() {
        let audio = decode_audio_payload("  SUQz  ").unwrap();
        assert_eq!(audio.mime, "audio/mpeg");
        assert_eq!(audio.bytes, b"ID3");
        assert_eq!(decode_audio_payload("%%%"), Err(VoiceError::BadAudio));
    }

    #[tokio::test]
    async fn test_recording_stops_at_limit() {
        let mut recorder = StubRecorder { stops: false, clip: vec![1, 2, 3] };
        let clip = record_clip(&mut recorder, Duration::from_millis(20)).await.unwrap();
        assert_eq!(clip.file_name, "voice.webm");
        assert_eq!(clip.mime, "audio/webm");
    }

    #[tokio::test]
    async fn test_empty_recording_is_rejected() {
        let mut recorder = StubRecorder { stops: true, clip: Vec::new() };
        let err = record_clip(&mut recorder, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err, VoiceError::Empty);
    }
}
