use crate::page::VideoRef;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Analysis types supported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "summarize")]
    Summarize,
    #[serde(rename = "timestamps")]
    Timestamps,
    #[serde(rename = "keypoints_wiki")]
    KeyPointsWiki,
    #[serde(rename = "factcheck")]
    FactCheck,
    #[serde(rename = "segment_summary")]
    SegmentSummary,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown feature: {0}")]
pub struct UnknownFeature(pub String);

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Summarize,
        Feature::Timestamps,
        Feature::KeyPointsWiki,
        Feature::FactCheck,
        Feature::SegmentSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Summarize => "summarize",
            Feature::Timestamps => "timestamps",
            Feature::KeyPointsWiki => "keypoints_wiki",
            Feature::FactCheck => "factcheck",
            Feature::SegmentSummary => "segment_summary",
        }
    }

    /// Endpoint path relative to the backend base URL
    pub fn path(&self) -> String {
        format!("/api/{}", self.as_str())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}

/// Feature-specific request options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureParams {
    Summarize { min_length: u32, max_length: u32 },
    Timestamps,
    KeyPointsWiki { num_points: u32 },
    FactCheck,
    SegmentSummary { segment_id: u32 },
}

impl FeatureParams {
    pub fn feature(&self) -> Feature {
        match self {
            FeatureParams::Summarize { .. } => Feature::Summarize,
            FeatureParams::Timestamps => Feature::Timestamps,
            FeatureParams::KeyPointsWiki { .. } => Feature::KeyPointsWiki,
            FeatureParams::FactCheck => Feature::FactCheck,
            FeatureParams::SegmentSummary { .. } => Feature::SegmentSummary,
        }
    }
}

/// One user-initiated request for a feature on a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRequest {
    video: VideoRef,
    params: FeatureParams,
}

impl FeatureRequest {
    pub fn new(video: VideoRef, params: FeatureParams) -> Self {
        Self { video, params }
    }

    pub fn feature(&self) -> Feature {
        self.params.feature()
    }

    pub fn video(&self) -> &VideoRef {
        &self.video
    }

    pub fn params(&self) -> &FeatureParams {
        &self.params
    }

    /// JSON body sent to the feature endpoint
    pub fn body(&self) -> Value {
        let video_id = self.video.id();
        match &self.params {
            FeatureParams::Summarize { min_length, max_length } => json!({
                "videoId": video_id,
                "minLength": min_length,
                "maxLength": max_length,
            }),
            FeatureParams::Timestamps | FeatureParams::FactCheck => json!({
                "videoId": video_id,
            }),
            // The backend reads `numTerms`; `numPoints` is the client-facing name
            FeatureParams::KeyPointsWiki { num_points } => json!({
                "videoId": video_id,
                "numPoints": num_points,
                "numTerms": num_points,
            }),
            FeatureParams::SegmentSummary { segment_id } => json!({
                "videoId": video_id,
                "segmentId": segment_id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> VideoRef {
        VideoRef::new("abc123", "Test Video").unwrap()
    }

    #[test]
    fn test_feature_paths() {
        assert_eq!(Feature::Summarize.path(), "/api/summarize");
        assert_eq!(Feature::KeyPointsWiki.path(), "/api/keypoints_wiki");
        assert_eq!(Feature::FactCheck.path(), "/api/factcheck");
        assert_eq!(Feature::SegmentSummary.path(), "/api/segment_summary");
    }

    #[test]
    fn test_feature_from_str() {
        for feature in Feature::ALL {
            assert_eq!(feature.as_str().parse::<Feature>(), Ok(feature));
        }
        assert_eq!(
            "sentiment".parse::<Feature>(),
            Err(UnknownFeature("sentiment".to_string()))
        );
    }

    #[test]
    fn test_summarize_body() {
        let request = FeatureRequest::new(
            video(),
            FeatureParams::Summarize { min_length: 150, max_length: 300 },
        );
        assert_eq!(request.feature(), Feature::Summarize);
        assert_eq!(
            request.body(),
            json!({"videoId": "abc123", "minLength": 150, "maxLength": 300})
        );
    }

    #[test]
    fn test_keypoints_body_carries_both_count_names() {
        let request = FeatureRequest::new(video(), FeatureParams::KeyPointsWiki { num_points: 5 });
        let body = request.body();
        assert_eq!(body["numPoints"], 5);
        assert_eq!(body["numTerms"], 5);
    }

    #[test]
    fn test_segment_summary_body() {
        let request = FeatureRequest::new(video(), FeatureParams::SegmentSummary { segment_id: 3 });
        assert_eq!(request.feature(), Feature::SegmentSummary);
        assert_eq!(request.body(), json!({"videoId": "abc123", "segmentId": 3}));
    }

    #[test]
    fn test_plain_bodies() {
        for params in [FeatureParams::Timestamps, FeatureParams::FactCheck] {
            let request = FeatureRequest::new(video(), params);
            assert_eq!(request.body(), json!({"videoId": "abc123"}));
        }
    }
}
