use super::{extract_title, extract_video_id, VideoRef};
use crate::config::PageConfig;
use tokio::sync::watch;
use tracing::{debug, info};

/// Outcome of re-resolving the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    /// Same video, same title
    Unchanged,
    /// Same video, the title resolved to something better
    TitleUpdated,
    /// Navigation moved to another video, or away from any video
    Navigated(Option<VideoRef>),
}

/// Tracks the video shown on the active page
///
/// Owned by one coordinating component. Dependents hold a receiver from
/// [`PageContext::subscribe`] and are woken only when the identifier changes.
#[derive(Debug)]
pub struct PageContext {
    config: PageConfig,
    sender: watch::Sender<Option<VideoRef>>,
}

impl PageContext {
    pub fn new(config: PageConfig) -> Self {
        let (sender, _) = watch::channel(None);
        Self { config, sender }
    }

    /// The video currently displayed, if the page is a video page
    pub fn current_video_ref(&self) -> Option<VideoRef> {
        self.sender.borrow().clone()
    }

    /// Receiver notified whenever navigation changes the video identifier
    pub fn subscribe(&self) -> watch::Receiver<Option<VideoRef>> {
        self.sender.subscribe()
    }

    /// Re-resolve identifier and title after the document mutated
    ///
    /// `html` is the current document, when available. Without it the title
    /// falls back to the configured default.
    pub fn observe(&self, page_url: &str, html: Option<&str>) -> PageChange {
        let next_id = extract_video_id(page_url);
        let resolve_title = || match html {
            Some(html) => extract_title(html, &self.config.title_selectors, &self.config.default_title),
            None => self.config.default_title.clone(),
        };

        let mut change = PageChange::Unchanged;
        self.sender.send_if_modified(|current| {
            let (current_id, current_title) = match current.as_ref() {
                Some(video) => (Some(video.id().to_string()), video.title().to_string()),
                None => (None, String::new()),
            };

            match (current_id, next_id) {
                (Some(current_id), Some(id)) if current_id == id => {
                    let title = resolve_title();
                    // A loading document must not erase a title we already resolved
                    if title != current_title && title != self.config.default_title {
                        *current = VideoRef::new(id, title);
                        change = PageChange::TitleUpdated;
                    }
                    false
                }
                (None, None) => false,
                (_, id) => {
                    let next = id.and_then(|id| VideoRef::new(id, resolve_title()));
                    *current = next.clone();
                    change = PageChange::Navigated(next);
                    true
                }
            }
        });

        match &change {
            PageChange::Navigated(Some(video)) => {
                info!("🎬 Video page detected: {} ({})", video.title(), video.id())
            }
            PageChange::Navigated(None) => info!("Left video page"),
            PageChange::TitleUpdated => debug!("Video title updated"),
            PageChange::Unchanged => {}
        }

        change
    }
}

impl Default for PageContext {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}
