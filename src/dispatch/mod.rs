/// Feature request dispatch
///
/// Turns a feature request for a video into one HTTP call against the
/// insights backend and yields exactly one terminal result.

pub mod client;
pub mod error;
pub mod feature;
pub mod models;

pub use client::BackendClient;
pub use error::DispatchError;
pub use feature::{Feature, FeatureParams, FeatureRequest, UnknownFeature};
pub use models::{
    decode_response, FeaturePayload, KeyPoint, Segment, SegmentSummaryPayload, SentimentReport,
    SentimentStats, SummaryPayload, WikipediaInfo,
};

use async_trait::async_trait;

/// Terminal outcome of one feature request
pub type FeatureResult = Result<FeaturePayload, DispatchError>;

/// Something that can answer feature requests
#[async_trait]
pub trait FeatureBackend: Send + Sync {
    /// Issue the request and wait for its single result
    async fn dispatch(&self, request: &FeatureRequest) -> FeatureResult;

    /// Whether the backend answers its health endpoint
    async fn verify_connection(&self) -> bool;
}
