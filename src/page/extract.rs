//! Passive reads of video metadata from a page URL and document

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Extract the video identifier from a page URL
///
/// Watch pages carry it in the `v` query parameter; short links and shorts
/// carry it as a path segment. Any other page has no identifier.
pub fn extract_video_id(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    let host = url.host_str()?.trim_start_matches("www.");

    let id = if host == "youtu.be" {
        url.path_segments()?.next().map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        match url.path() {
            "/watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            path => path
                .strip_prefix("/shorts/")
                .and_then(|rest| rest.split('/').next())
                .map(str::to_string),
        }
    } else {
        None
    };

    id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())
}

/// Extract the video title from the page document
///
/// Tries each selector in order and returns the first heading with visible
/// text. A page without one resolves to `default_title`.
pub fn extract_title(html: &str, selectors: &[String], default_title: &str) -> String {
    let document = Html::parse_document(html);

    for raw in selectors {
        let selector = match Selector::parse(raw) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Skipping invalid title selector '{}': {:?}", raw, e);
                continue;
            }
        };

        for element in document.select(&selector) {
            let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                debug!("Resolved title via '{}': {}", raw, text);
                return text;
            }
        }
    }

    debug!("No title element found, using default title");
    default_title.to_string()
}

/// Collapse runs of whitespace and trim
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;

    #[test]
    fn test_watch_url_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://m.youtube.com/watch?feature=share&v=abc123"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_short_links_and_shorts() {
        assert_eq!(extract_video_id("https://youtu.be/abc123?si=xyz"), Some("abc123".to_string()));
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/short42"),
            Some("short42".to_string())
        );
    }

    #[test]
    fn test_non_video_pages() {
        assert_eq!(extract_video_id("https://www.youtube.com/"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(extract_video_id("https://www.youtube.com/results?search_query=rust"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=abc123"), None);
        assert_eq!(extract_video_id("not a url"), None);
    }

    #[test]
    fn test_title_from_heading() {
        let page = PageConfig::default();
        let html = r#"<html><body>
            <div id="title"><h1>
                Rust   in
                100 Seconds
            </h1></div>
        </body></html>"#;

        let title = extract_title(html, &page.title_selectors, &page.default_title);
        assert_eq!(title, "Rust in 100 Seconds");
    }

    #[test]
    fn test_selector_order_wins() {
        let selectors = vec!["h1.primary".to_string(), "h1".to_string()];
        let html = r#"<h1>Other heading</h1><h1 class="primary">Primary</h1>"#;
        assert_eq!(extract_title(html, &selectors, "fallback"), "Primary");
    }

    #[test]
    fn test_missing_title_falls_back() {
        let page = PageConfig::default();
        let html = "<html><body><div>No heading here</div></body></html>";
        assert_eq!(
            extract_title(html, &page.title_selectors, &page.default_title),
            "YouTube Video"
        );
    }

    #[test]
    fn test_empty_heading_and_bad_selector_fall_back() {
        let selectors = vec!["h1[".to_string(), "h1".to_string()];
        let html = "<h1>   </h1>";
        assert_eq!(extract_title(html, &selectors, "YouTube Video"), "YouTube Video");
    }
}
