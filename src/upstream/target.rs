//! Target URL construction.

use url::Url;

use crate::config::UpstreamConfig;
use crate::error::{ForwardError, ForwardResult};

/// Build `<base_url>/stream-<id>.php?<query>`.
///
/// The document name is pushed as one percent-encoded path segment, so the
/// stream id cannot escape the stream directory or add query parameters.
pub fn stream_target(upstream: &UpstreamConfig, stream_id: &str) -> ForwardResult<Url> {
    let mut url = Url::parse(&upstream.base_url)
        .map_err(|e| ForwardError::InvalidTarget(e.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| ForwardError::InvalidTarget(format!("'{}' cannot be a base", upstream.base_url)))?
        .pop_if_empty()
        .push(&format!("stream-{}.php", stream_id));

    if upstream.query.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&upstream.query));
    }
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(base_url: &str) -> UpstreamConfig {
        UpstreamConfig {
            base_url: base_url.to_string(),
            ..UpstreamConfig::default()
        }
    }

    #[test]
    fn default_template() {
        let url = stream_target(&UpstreamConfig::default(), "445").unwrap();
        assert_eq!(
            url.as_str(),
            "https://dlhd.dad/stream/stream-445.php?disableads=1&no-reload=1&autoplay=1"
        );
    }

    #[test]
    fn trailing_slash_is_optional() {
        let with = stream_target(&upstream("https://dlhd.dad/stream/"), "7").unwrap();
        let without = stream_target(&upstream("https://dlhd.dad/stream"), "7").unwrap();
        assert_eq!(with, without);

        let root = stream_target(&upstream("https://dlhd.dad"), "7").unwrap();
        assert_eq!(root.path(), "/stream-7.php");
    }

    #[test]
    fn base_query_is_replaced() {
        let url = stream_target(&upstream("http://127.0.0.1:9000/s/?old=1#frag"), "1").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/s/stream-1.php?disableads=1&no-reload=1&autoplay=1"
        );
    }

    #[test]
    fn empty_query_drops_question_mark() {
        let config = UpstreamConfig {
            query: String::new(),
            ..UpstreamConfig::default()
        };
        let url = stream_target(&config, "445").unwrap();
        assert_eq!(url.as_str(), "https://dlhd.dad/stream/stream-445.php");
    }

    #[test]
    fn id_cannot_inject_path_or_query() {
        let url = stream_target(&UpstreamConfig::default(), "../admin?x=1#y").unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 2);
        assert!(url.path().starts_with("/stream/stream-..%2Fadmin%3Fx=1%23y"));
        assert_eq!(url.query(), Some("disableads=1&no-reload=1&autoplay=1"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn unusable_base_is_invalid_target() {
        let err = stream_target(&upstream("data:text/plain,hi"), "1").unwrap_err();
        assert!(matches!(err, ForwardError::InvalidTarget(_)));

        let err = stream_target(&upstream("not a url"), "1").unwrap_err();
        assert!(matches!(err, ForwardError::InvalidTarget(_)));
    }
}
