/// Result rendering
///
/// Turns a feature outcome into ordered display elements plus the interactions
/// a UI should bind to them. Holds no state of its own.

pub mod time;

pub use time::{format_timestamp, parse_timestamp};

use crate::dispatch::{DispatchError, FeaturePayload, KeyPoint, Segment, SentimentReport};
use serde::Serialize;

/// One piece of display content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedElement {
    pub element_id: String,
    pub content: String,
}

/// A handler to register against a rendered element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    /// Clicking the element seeks playback
    SeekTo { element_id: String, seconds: f64 },
    /// Clicking the element expands the segment's summary
    FetchSegmentSummary { element_id: String, segment_id: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rendered {
    pub elements: Vec<RenderedElement>,
    pub interactions: Vec<Interaction>,
}

impl Rendered {
    fn push(&mut self, element_id: impl Into<String>, content: impl Into<String>) {
        self.elements.push(RenderedElement {
            element_id: element_id.into(),
            content: content.into(),
        });
    }

    /// Plain-text rendering, one element per line
    pub fn to_text(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Element id for a chapter row
pub fn segment_element_id(segment_id: u32) -> String {
    format!("segment-{}", segment_id)
}

/// Element id for a chapter's expandable summary
pub fn segment_summary_element_id(segment_id: u32) -> String {
    format!("segment-summary-{}", segment_id)
}

/// Render a successful payload
pub fn render(payload: &FeaturePayload) -> Rendered {
    let mut out = Rendered::default();

    match payload {
        FeaturePayload::Summary(summary) => out.push("summary", summary.summary.trim()),
        FeaturePayload::Timestamps(segments) => render_segments(&mut out, segments),
        FeaturePayload::KeyPoints(points) => render_key_points(&mut out, points),
        FeaturePayload::Sentiment(report) => render_sentiment(&mut out, report),
        FeaturePayload::SegmentSummary(segment) => {
            let id = segment
                .segment_id
                .map(segment_summary_element_id)
                .unwrap_or_else(|| "segment-summary".to_string());
            out.push(id, segment.summary.trim());
        }
    }

    out
}

/// Render a failure as a single error element
pub fn render_error(err: &DispatchError) -> Rendered {
    let mut out = Rendered::default();
    out.push("error", format!("Error: {}", err));
    out
}

fn render_segments(out: &mut Rendered, segments: &[Segment]) {
    if segments.is_empty() {
        out.push("timestamps-empty", "No timestamps were generated for this video.");
        return;
    }

    for segment in segments {
        let element_id = segment_element_id(segment.segment_id);
        let time = if segment.formatted_time.is_empty() {
            format_timestamp(segment.start_time_seconds)
        } else {
            segment.formatted_time.clone()
        };

        let mut line = format!("{} {}", time, segment.title);
        if !segment.keywords.is_empty() {
            line.push_str(&format!(" [{}]", segment.keywords.join(", ")));
        }
        out.push(element_id.clone(), line);

        out.interactions.push(Interaction::SeekTo {
            element_id: element_id.clone(),
            seconds: segment.start_time_seconds,
        });
        out.interactions.push(Interaction::FetchSegmentSummary {
            element_id,
            segment_id: segment.segment_id,
        });
    }
}

fn render_key_points(out: &mut Rendered, points: &[KeyPoint]) {
    if points.is_empty() {
        out.push("keypoints-empty", "No key terms were found for this video.");
        return;
    }

    for (i, point) in points.iter().enumerate() {
        let content = match &point.wikipedia_info {
            Some(info) => format!("{}: {} ({})", point.key_point, info.summary.trim(), info.url),
            None => point.key_point.clone(),
        };
        out.push(format!("keypoint-{}", i), content);
    }
}

fn render_sentiment(out: &mut Rendered, report: &SentimentReport) {
    let stats = &report.sentiment;
    out.push(
        "sentiment",
        format!(
            "Positive: {:.2}% | Negative: {:.2}% | Comments analyzed: {}",
            stats.positive_percentage, stats.negative_percentage, stats.total_comments
        ),
    );

    for (i, comment) in report.comments_sample.iter().enumerate() {
        out.push(format!("comment-{}", i), format!("\"{}\"", comment.trim()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{SegmentSummaryPayload, SentimentStats, SummaryPayload, WikipediaInfo};

    fn segment(id: u32, time: f64, formatted: &str, title: &str) -> Segment {
        Segment {
            segment_id: id,
            start_time_seconds: time,
            formatted_time: formatted.to_string(),
            title: title.to_string(),
            keywords: vec![],
        }
    }

    #[test]
    fn test_render_summary() {
        let rendered = render(&FeaturePayload::Summary(SummaryPayload {
            summary: "  A short summary. ".to_string(),
            transcript: "long transcript".to_string(),
        }));
        assert_eq!(rendered.elements.len(), 1);
        assert_eq!(rendered.elements[0].element_id, "summary");
        assert_eq!(rendered.elements[0].content, "A short summary.");
        assert!(rendered.interactions.is_empty());
    }

    #[test]
    fn test_render_segments_registers_interactions() {
        let mut intro = segment(0, 12.5, "0:12", "Intro");
        intro.keywords = vec!["hello".to_string(), "world".to_string()];
        let rendered = render(&FeaturePayload::Timestamps(vec![
            intro,
            segment(1, 95.0, "", "Main part"),
        ]));

        assert_eq!(rendered.elements[0].element_id, "segment-0");
        assert_eq!(rendered.elements[0].content, "0:12 Intro [hello, world]");
        assert_eq!(rendered.elements[1].content, "1:35 Main part");

        assert_eq!(rendered.interactions.len(), 4);
        assert_eq!(
            rendered.interactions[0],
            Interaction::SeekTo { element_id: "segment-0".to_string(), seconds: 12.5 }
        );
        assert_eq!(
            rendered.interactions[3],
            Interaction::FetchSegmentSummary { element_id: "segment-1".to_string(), segment_id: 1 }
        );
    }

    #[test]
    fn test_render_empty_segments() {
        let rendered = render(&FeaturePayload::Timestamps(vec![]));
        assert_eq!(rendered.elements[0].element_id, "timestamps-empty");
    }

    #[test]
    fn test_render_key_points() {
        let rendered = render(&FeaturePayload::KeyPoints(vec![
            KeyPoint {
                key_point: "Borrow checker".to_string(),
                wikipedia_info: Some(WikipediaInfo {
                    title: "Rust".to_string(),
                    summary: "Rust is a language.".to_string(),
                    url: "https://en.wikipedia.org/wiki/Rust".to_string(),
                }),
            },
            KeyPoint { key_point: "Lifetimes".to_string(), wikipedia_info: None },
        ]));

        assert_eq!(
            rendered.elements[0].content,
            "Borrow checker: Rust is a language. (https://en.wikipedia.org/wiki/Rust)"
        );
        assert_eq!(rendered.elements[1].element_id, "keypoint-1");
        assert_eq!(rendered.elements[1].content, "Lifetimes");
    }

    #[test]
    fn test_render_sentiment() {
        let rendered = render(&FeaturePayload::Sentiment(SentimentReport {
            sentiment: SentimentStats {
                positive_percentage: 80.0,
                negative_percentage: 20.0,
                total_comments: 10,
            },
            comments_sample: vec!["Great video".to_string()],
        }));

        assert_eq!(
            rendered.to_text(),
            "Positive: 80.00% | Negative: 20.00% | Comments analyzed: 10\n\"Great video\""
        );
    }

    #[test]
    fn test_render_segment_summary_and_error() {
        let rendered = render(&FeaturePayload::SegmentSummary(SegmentSummaryPayload {
            summary: "Covers setup.".to_string(),
            formatted_time: "0:12".to_string(),
            segment_id: Some(3),
            title: None,
        }));
        assert_eq!(rendered.elements[0].element_id, "segment-summary-3");

        let rendered = render_error(&DispatchError::Http { status: 500, detail: None });
        assert_eq!(rendered.elements[0].element_id, "error");
        assert!(rendered.elements[0].content.contains("500"));
    }
}
