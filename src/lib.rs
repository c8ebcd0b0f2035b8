/// YouTube Insights - Rust Implementation
///
/// Client core for requesting AI-generated insights about the YouTube video
/// being watched: summaries, chapter timestamps, key terms with Wikipedia
/// context and comment sentiment, served by a separate insights backend.

pub mod config;
pub mod dispatch;
pub mod messages;
pub mod page;
pub mod render;
pub mod segments;
pub mod session;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder, ConfigError};
pub use crate::dispatch::{
    BackendClient, DispatchError, Feature, FeatureBackend, FeatureParams, FeaturePayload,
    FeatureRequest, FeatureResult,
};
pub use crate::messages::ExtensionMessage;
pub use crate::page::{PageChange, PageContext, VideoRef};
pub use crate::render::{render, render_error, Rendered};
pub use crate::segments::{SegmentState, SegmentSummaryCache};
pub use crate::session::InsightSession;
