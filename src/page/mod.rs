/// Page context tracking
///
/// Resolves which video the user is looking at from the page URL and document,
/// and notifies dependents when in-page navigation switches to another video.

pub mod context;
pub mod extract;

pub use context::{PageChange, PageContext};
pub use extract::{extract_title, extract_video_id};

use serde::{Deserialize, Serialize};

/// The (identifier, title) pair for the video currently being viewed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoRef {
    /// Opaque video identifier, never empty
    id: String,
    /// Display title, best-effort
    title: String,
}

impl VideoRef {
    /// Create a video reference; `None` when the identifier is empty
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Option<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return None;
        }

        Some(Self {
            id,
            title: title.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Canonical watch URL for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}
