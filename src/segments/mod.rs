/// Segment interaction caching
///
/// Chapters returned by the timestamps feature can each be expanded into a
/// summary. Summaries are fetched lazily and kept for the rest of the session.

pub mod cache;

pub use cache::{SegmentOutcome, SegmentState, SegmentSummaryCache};
