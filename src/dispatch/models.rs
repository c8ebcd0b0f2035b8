//! Wire models for backend responses

use super::{DispatchError, Feature};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// `summarize` payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryPayload {
    pub summary: String,
    #[serde(default)]
    pub transcript: String,
}

/// A chapter produced by the `timestamps` feature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub segment_id: u32,
    /// Offset from the start of the video
    #[serde(rename = "time")]
    pub start_time_seconds: f64,
    #[serde(default)]
    pub formatted_time: String,
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimestampsPayload {
    pub timestamps: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WikipediaInfo {
    pub title: String,
    pub summary: String,
    pub url: String,
}

/// A key term, optionally enriched with an encyclopedia lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyPoint {
    #[serde(alias = "key_term")]
    pub key_point: String,
    #[serde(default)]
    pub wikipedia_info: Option<WikipediaInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyPointsPayload {
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<KeyPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentStats {
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub total_comments: u64,
}

/// `factcheck` payload: aggregate comment sentiment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentReport {
    pub sentiment: SentimentStats,
    #[serde(default)]
    pub comments_sample: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentSummaryPayload {
    pub summary: String,
    #[serde(default)]
    pub formatted_time: String,
    #[serde(default, rename = "segmentId")]
    pub segment_id: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Decoded success payload, one variant per feature
#[derive(Debug, Clone, PartialEq)]
pub enum FeaturePayload {
    Summary(SummaryPayload),
    Timestamps(Vec<Segment>),
    KeyPoints(Vec<KeyPoint>),
    Sentiment(SentimentReport),
    SegmentSummary(SegmentSummaryPayload),
}

impl FeaturePayload {
    pub fn feature(&self) -> Feature {
        match self {
            FeaturePayload::Summary(_) => Feature::Summarize,
            FeaturePayload::Timestamps(_) => Feature::Timestamps,
            FeaturePayload::KeyPoints(_) => Feature::KeyPointsWiki,
            FeaturePayload::Sentiment(_) => Feature::FactCheck,
            FeaturePayload::SegmentSummary(_) => Feature::SegmentSummary,
        }
    }

    pub fn segments(&self) -> Option<&[Segment]> {
        match self {
            FeaturePayload::Timestamps(segments) => Some(segments.as_slice()),
            _ => None,
        }
    }
}

/// Decode a response body for `feature`
///
/// A body whose `status` is anything but `"success"` is an application error
/// carrying the backend's `error` field.
pub fn decode_response(feature: Feature, body: &str) -> Result<FeaturePayload, DispatchError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| DispatchError::InvalidResponse(format!("malformed JSON: {}", e)))?;

    // Any status other than the string "success" is an application error
    if value.get("status").and_then(Value::as_str) != Some("success") {
        let message = value.get("error").and_then(Value::as_str).map(str::to_string);
        return Err(DispatchError::from_backend(message));
    }

    match feature {
        Feature::Summarize => decode(value).map(FeaturePayload::Summary),
        Feature::Timestamps => {
            let payload: TimestampsPayload = decode(value)?;
            validate_segments(&payload.timestamps)?;
            Ok(FeaturePayload::Timestamps(payload.timestamps))
        }
        Feature::KeyPointsWiki => {
            decode::<KeyPointsPayload>(value).map(|p| FeaturePayload::KeyPoints(p.key_points))
        }
        Feature::FactCheck => decode(value).map(FeaturePayload::Sentiment),
        Feature::SegmentSummary => decode(value).map(FeaturePayload::SegmentSummary),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, DispatchError> {
    serde_json::from_value(value).map_err(|e| DispatchError::InvalidResponse(e.to_string()))
}

/// Segment ids must be unique and start times non-negative
fn validate_segments(segments: &[Segment]) -> Result<(), DispatchError> {
    let mut seen = HashSet::new();
    for segment in segments {
        if !seen.insert(segment.segment_id) {
            return Err(DispatchError::InvalidResponse(format!(
                "duplicate segment_id {}",
                segment.segment_id
            )));
        }
        if !segment.start_time_seconds.is_finite() || segment.start_time_seconds < 0.0 {
            return Err(DispatchError::InvalidResponse(format!(
                "segment {} has invalid start time {}",
                segment.segment_id, segment.start_time_seconds
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_timestamps() {
        let body = r#"{"status":"success","videoId":"abc","timestamps":[
            {"segment_id":0,"time":12.5,"formatted_time":"0:12","title":"Intro","keywords":["hello"]}
        ]}"#;

        let payload = decode_response(Feature::Timestamps, body).unwrap();
        let segments = payload.segments().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].segment_id, 0);
        assert_eq!(segments[0].start_time_seconds, 12.5);
        assert_eq!(segments[0].formatted_time, "0:12");
        assert_eq!(segments[0].keywords, vec!["hello".to_string()]);
    }

    #[test]
    fn test_error_status_uses_backend_message() {
        let body = r#"{"status":"error","error":"quota exceeded"}"#;
        let err = decode_response(Feature::Summarize, body).unwrap_err();
        assert_eq!(err, DispatchError::Backend("quota exceeded".to_string()));
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_missing_status_is_unknown_error() {
        let err = decode_response(Feature::FactCheck, r#"{"message":"coming soon"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Unknown error");
    }

    #[test]
    fn test_malformed_json() {
        let err = decode_response(Feature::Summarize, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, DispatchError::InvalidResponse(_)));
    }

    #[test]
    fn test_duplicate_segment_ids_rejected() {
        let body = r#"{"status":"success","timestamps":[
            {"segment_id":1,"time":0,"title":"A"},
            {"segment_id":1,"time":30,"title":"B"}
        ]}"#;
        let err = decode_response(Feature::Timestamps, body).unwrap_err();
        assert!(err.to_string().contains("duplicate segment_id 1"));
    }

    #[test]
    fn test_negative_start_time_rejected() {
        let body = r#"{"status":"success","timestamps":[{"segment_id":0,"time":-1,"title":"A"}]}"#;
        assert!(decode_response(Feature::Timestamps, body).is_err());
    }

    #[test]
    fn test_non_string_status_fields_are_backend_errors() {
        let err = decode_response(Feature::Summarize, r#"{"status":"error","error":{"code":429}}"#)
            .unwrap_err();
        assert_eq!(err, DispatchError::Backend("Unknown error".to_string()));

        let err = decode_response(Feature::Summarize, r#"{"status":500,"error":"quota exceeded"}"#)
            .unwrap_err();
        assert_eq!(err, DispatchError::Backend("quota exceeded".to_string()));

        let err = decode_response(Feature::Timestamps, "[1, 2]").unwrap_err();
        assert_eq!(err, DispatchError::Backend("Unknown error".to_string()));
    }

    #[test]
    fn test_key_points_accept_backend_field_name() {
        let body = r#"{"status":"success","keyPoints":[
            {"key_term":"Ownership","wikipedia_info":{"title":"Ownership","summary":"...","url":"https://en.wikipedia.org/wiki/Ownership"}},
            {"key_point":"Borrowing","wikipedia_info":null}
        ]}"#;

        match decode_response(Feature::KeyPointsWiki, body).unwrap() {
            FeaturePayload::KeyPoints(points) => {
                assert_eq!(points.len(), 2);
                assert_eq!(points[0].key_point, "Ownership");
                assert!(points[0].wikipedia_info.is_some());
                assert_eq!(points[1].key_point, "Borrowing");
                assert!(points[1].wikipedia_info.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_decode_sentiment() {
        let body = r#"{"status":"success","sentiment":{"positive_percentage":75.5,"negative_percentage":24.5,"total_comments":200},"comments_sample":["great","meh"]}"#;

        match decode_response(Feature::FactCheck, body).unwrap() {
            FeaturePayload::Sentiment(report) => {
                assert_eq!(report.sentiment.total_comments, 200);
                assert_eq!(report.sentiment.positive_percentage, 75.5);
                assert_eq!(report.comments_sample.len(), 2);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_missing_payload_field_is_invalid() {
        let err = decode_response(Feature::Summarize, r#"{"status":"success"}"#).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidResponse(_)));
    }
}
