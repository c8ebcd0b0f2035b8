//! Typed actions exchanged between the extension's page, popup and background parts

use crate::render::parse_timestamp;
use serde::{Deserialize, Serialize};

/// Playback position as sent by the popup: seconds or a time string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaybackTime {
    Seconds(f64),
    Text(String),
}

impl PlaybackTime {
    /// Position in seconds, `None` when it cannot be understood
    pub fn seconds(&self) -> Option<f64> {
        match self {
            PlaybackTime::Seconds(s) if s.is_finite() && *s >= 0.0 => Some(*s),
            PlaybackTime::Seconds(_) => None,
            PlaybackTime::Text(text) => parse_timestamp(text),
        }
    }
}

/// A request from one extension component to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionMessage {
    NavigateToTime { time: PlaybackTime },
    GetVideoDetails,
    VerifyConnection,
    QuickSummarize,
    QuickKeyPointsWiki,
    QuickTimestamps,
}

impl ExtensionMessage {
    /// Parse a raw JSON message
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn action(&self) -> &'static str {
        match self {
            ExtensionMessage::NavigateToTime { .. } => "navigateToTime",
            ExtensionMessage::GetVideoDetails => "getVideoDetails",
            ExtensionMessage::VerifyConnection => "verifyConnection",
            ExtensionMessage::QuickSummarize => "quickSummarize",
            ExtensionMessage::QuickKeyPointsWiki => "quickKeyPointsWiki",
            ExtensionMessage::QuickTimestamps => "quickTimestamps",
        }
    }
}
