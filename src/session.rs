//! Insight session: the single owner of page context, backend and segment cache

use crate::config::{Config, ConfigError};
use crate::dispatch::{
    BackendClient, DispatchError, Feature, FeatureBackend, FeatureParams, FeaturePayload,
    FeatureRequest, FeatureResult,
};
use crate::messages::ExtensionMessage;
use crate::page::{PageChange, PageContext, VideoRef};
use crate::render::{render, render_error};
use crate::segments::{SegmentOutcome, SegmentSummaryCache};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

type InFlight = Arc<Mutex<HashSet<(Feature, String)>>>;

/// Marks a (feature, video) pair busy until dropped
struct InFlightGuard {
    in_flight: InFlight,
    key: (Feature, String),
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.key);
    }
}

/// Coordinates one popup/content-script session
pub struct InsightSession {
    config: Config,
    page: PageContext,
    backend: Arc<dyn FeatureBackend>,
    segments: SegmentSummaryCache,
    in_flight: InFlight,
}

impl InsightSession {
    pub fn new(config: Config, backend: Arc<dyn FeatureBackend>) -> Self {
        let page = PageContext::new(config.page.clone());
        Self {
            config,
            page,
            backend,
            segments: SegmentSummaryCache::new(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Session talking HTTP to the configured backend
    pub fn connect(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let backend = BackendClient::new(&config.backend)?;
        Ok(Self::new(config, Arc::new(backend)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    pub fn segments(&self) -> &SegmentSummaryCache {
        &self.segments
    }

    /// Current video, if any
    pub fn video(&self) -> Option<VideoRef> {
        self.page.current_video_ref()
    }

    /// Feed a page update; switching videos discards the segment cache
    pub async fn observe_page(&self, page_url: &str, html: Option<&str>) -> PageChange {
        let change = self.page.observe(page_url, html);
        if let PageChange::Navigated(_) = change {
            self.segments.clear().await;
            debug!("Segment cache cleared after navigation");
        }
        change
    }

    /// Request parameters built from configured defaults
    ///
    /// `None` for `segment_summary`, which needs a segment id.
    pub fn default_params(&self, feature: Feature) -> Option<FeatureParams> {
        let defaults = &self.config.features;
        match feature {
            Feature::Summarize => Some(FeatureParams::Summarize {
                min_length: defaults.summary_min_length,
                max_length: defaults.summary_max_length,
            }),
            Feature::Timestamps => Some(FeatureParams::Timestamps),
            Feature::KeyPointsWiki => Some(FeatureParams::KeyPointsWiki {
                num_points: defaults.key_points,
            }),
            Feature::FactCheck => Some(FeatureParams::FactCheck),
            Feature::SegmentSummary => None,
        }
    }

    fn require_video(&self) -> Result<VideoRef, DispatchError> {
        self.video().ok_or_else(|| {
            DispatchError::InvalidRequest("No YouTube video detected on this page".to_string())
        })
    }

    fn claim(&self, feature: Feature, video: &VideoRef) -> Result<InFlightGuard, DispatchError> {
        let key = (feature, video.id().to_string());
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(key.clone()) {
            return Err(DispatchError::InvalidRequest(format!(
                "A {} request is already in progress for this video",
                feature
            )));
        }
        Ok(InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
        })
    }

    /// Run a feature on the current video with default parameters
    pub async fn request(&self, feature: Feature) -> FeatureResult {
        let params = self.default_params(feature).ok_or_else(|| {
            DispatchError::InvalidRequest(format!("{} requires a segment id", feature))
        })?;
        self.request_with(params).await
    }

    /// Run a feature on the current video with explicit parameters
    ///
    /// A repeated trigger for the same feature and video is rejected while the
    /// first one is still running.
    pub async fn request_with(&self, params: FeatureParams) -> FeatureResult {
        let video = self.require_video()?;
        let _guard = self.claim(params.feature(), &video)?;

        info!("📨 Requesting {} for {}", params.feature(), video.id());
        let request = FeatureRequest::new(video, params);
        self.backend.dispatch(&request).await
    }

    /// Summary of one chapter of the current video, fetched at most once
    ///
    /// The cache generation is read before the video: navigation updates the
    /// page first and clears the cache second, so a fetcher bound to a stale
    /// video always carries a stale generation and is refused.
    pub async fn segment_summary(&self, segment_id: u32) -> SegmentOutcome {
        let generation = self.segments.generation().await;
        let video = self.require_video()?;
        let backend = Arc::clone(&self.backend);

        self.segments
            .get_or_fetch_in(generation, segment_id, move || async move {
                let request = FeatureRequest::new(video, FeatureParams::SegmentSummary { segment_id });
                match backend.dispatch(&request).await? {
                    FeaturePayload::SegmentSummary(payload) => Ok(payload.summary),
                    other => Err(DispatchError::InvalidResponse(format!(
                        "expected segment summary, got {} payload",
                        other.feature()
                    ))),
                }
            })
            .await
    }

    /// Show or hide a chapter's summary panel
    pub async fn toggle_segment(&self, segment_id: u32) -> bool {
        self.segments.toggle_visibility(segment_id).await
    }

    pub async fn verify_connection(&self) -> bool {
        self.backend.verify_connection().await
    }

    /// Answer an extension action with a JSON response
    pub async fn handle_message(&self, message: ExtensionMessage) -> Value {
        debug!("Handling {} message", message.action());

        match message {
            ExtensionMessage::NavigateToTime { time } => match time.seconds() {
                Some(seconds) => json!({ "success": true, "seekTo": seconds }),
                None => json!({ "success": false, "error": "Invalid playback time" }),
            },
            ExtensionMessage::GetVideoDetails => match self.video() {
                Some(video) => json!({
                    "success": true,
                    "videoId": video.id(),
                    "videoTitle": video.title(),
                }),
                None => json!({
                    "success": false,
                    "error": "No YouTube video detected on this page",
                }),
            },
            ExtensionMessage::VerifyConnection => {
                if self.verify_connection().await {
                    json!({ "success": true, "connected": true })
                } else {
                    let err = DispatchError::Connection {
                        base_url: self.config.backend.base_url.clone(),
                    };
                    json!({ "success": false, "connected": false, "error": err.to_string() })
                }
            }
            ExtensionMessage::QuickSummarize => self.quick(Feature::Summarize).await,
            ExtensionMessage::QuickKeyPointsWiki => self.quick(Feature::KeyPointsWiki).await,
            ExtensionMessage::QuickTimestamps => self.quick(Feature::Timestamps).await,
        }
    }

    async fn quick(&self, feature: Feature) -> Value {
        match self.request(feature).await {
            Ok(payload) => json!({
                "success": true,
                "feature": feature,
                "rendered": render(&payload),
            }),
            Err(err) => json!({
                "success": false,
                "feature": feature,
                "error": err.to_string(),
                "rendered": render_error(&err),
            }),
        }
    }
}
