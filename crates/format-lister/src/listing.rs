use log::error;

use crate::{MetadataProvider, ProviderError, ResponsePayload, summarize_formats};

/// Provider messages meaning the video does not exist, was removed or is private.
/// `410 Gone` is how reqwest renders the status behind a failed `rusty_ytdl` fetch.
pub const UNAVAILABLE_PATTERNS: &[&str] = &[
    "Status code: 410",
    "No video id found",
    "Video not found",
    "Video is private",
    "410 Gone",
];
/// Provider messages meaning access was refused, typically a region restriction.
/// Besides the HTTP status, YouTube's playability reasons for geo-blocked videos are
/// matched since `rusty_ytdl` passes them through.
pub const ACCESS_DENIED_PATTERNS: &[&str] = &[
    "Status code: 403",
    "403 Forbidden",
    "not available in your country",
    "not made this video available in your country",
];

/// How a failed lookup is reported to the caller.
///
/// Both policies are served side by side on separate endpoints: `Classified` maps known
/// provider messages to 404/403, `Generic` reports every failure as a 500.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorPolicy {
    Classified,
    Generic,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("Video ID (v) parameter is missing. Example: {endpoint}?v=xxxxxxxx")]
    MissingParameter { endpoint: String },
    #[error("Video ID '{video_id}' was not found on YouTube, or is private/removed.")]
    VideoUnavailable { video_id: String },
    #[error("Access to video ID '{video_id}' was denied (region restriction or similar).")]
    AccessDenied { video_id: String },
    #[error("Unexpected error while fetching video info: {source}")]
    Provider { source: ProviderError },
}

impl ListingError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameter { .. } => 400,
            Self::VideoUnavailable { .. } => 404,
            Self::AccessDenied { .. } => 403,
            Self::Provider { .. } => 500,
        }
    }
}

impl ErrorPolicy {
    pub fn classify(self, video_id: &str, err: ProviderError) -> ListingError {
        match self {
            Self::Classified if err.contains_any(UNAVAILABLE_PATTERNS) => {
                ListingError::VideoUnavailable {
                    video_id: video_id.to_string(),
                }
            }
            Self::Classified if err.contains_any(ACCESS_DENIED_PATTERNS) => {
                ListingError::AccessDenied {
                    video_id: video_id.to_string(),
                }
            }
            _ => ListingError::Provider { source: err },
        }
    }
}

/// Looks up `video_id` and returns the summary of its listable formats.
///
/// A missing or empty id fails with [`ListingError::MissingParameter`] without touching
/// the provider. `endpoint` only feeds the usage hint in that message.
pub async fn list_formats<P: MetadataProvider>(
    provider: &P,
    video_id: Option<&str>,
    endpoint: &str,
    policy: ErrorPolicy,
) -> Result<ResponsePayload, ListingError> {
    let Some(video_id) = video_id.filter(|id| !id.is_empty()) else {
        return Err(ListingError::MissingParameter {
            endpoint: endpoint.to_string(),
        });
    };

    let metadata = match provider.get_info(video_id).await {
        Ok(metadata) => metadata,
        Err(e) => {
            error!("Error fetching info for video ID {video_id}: {e}");
            return Err(policy.classify(video_id, e));
        }
    };

    Ok(ResponsePayload::new(
        video_id,
        metadata.title,
        summarize_formats(&metadata.formats),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::{FormatDescriptor, VideoMetadata};

    struct FakeProvider {
        result: Result<VideoMetadata, ProviderError>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn ok(title: &str, formats: serde_json::Value) -> Self {
            let formats: Vec<FormatDescriptor> = serde_json::from_value(formats).unwrap();
            Self {
                result: Ok(VideoMetadata {
                    title: title.to_string(),
                    formats,
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(ProviderError::new(message)),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl MetadataProvider for FakeProvider {
        async fn get_info(&self, _video_id: &str) -> Result<VideoMetadata, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    const ENDPOINT: &str = "/api/itag";

    #[tokio::test]
    async fn missing_id_skips_the_provider() {
        let provider = FakeProvider::ok("unused", json!([]));
        for id in [None, Some("")] {
            let err = list_formats(&provider, id, ENDPOINT, ErrorPolicy::Classified)
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert!(err.to_string().contains("/api/itag?v="));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lists_formats_in_provider_order() {
        let provider = FakeProvider::ok(
            "Some title",
            json!([
                {"itag": 251, "mimeType": "audio/webm; codecs=\"opus\"", "audioBitrate": 160, "audioCodec": "opus"},
                {"itag": 18, "container": "mp4", "qualityLabel": "360p", "videoCodec": "avc1", "audioCodec": "mp4a"},
                {"itag": null, "qualityLabel": "720p"}
            ]),
        );

        let payload = list_formats(&provider, Some("abc"), ENDPOINT, ErrorPolicy::Classified)
            .await
            .unwrap();

        assert_eq!(payload.video_id, "abc");
        assert_eq!(payload.title, "Some title");
        let itags: Vec<_> = payload.itags.iter().map(|s| s.itag.as_str()).collect();
        assert_eq!(itags, ["251", "18"]);
        assert_eq!(payload.itags[0].ext, "webm");
        assert_eq!(payload.itags[0].resolution, "audio only");
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let provider = FakeProvider::ok(
            "t",
            json!([{"itag": 18, "qualityLabel": "360p"}, {"itag": 140, "audioBitrate": 128}]),
        );
        let first = list_formats(&provider, Some("abc"), ENDPOINT, ErrorPolicy::Generic)
            .await
            .unwrap();
        let second = list_formats(&provider, Some("abc"), ENDPOINT, ErrorPolicy::Generic)
            .await
            .unwrap();
        assert_eq!(first.to_pretty_json().unwrap(), second.to_pretty_json().unwrap());
    }

    #[tokio::test]
    async fn gone_video_depends_on_policy() {
        let provider = FakeProvider::failing("Status code: 410");

        let classified = list_formats(&provider, Some("abc"), ENDPOINT, ErrorPolicy::Classified)
            .await
            .unwrap_err();
        assert_eq!(classified.status_code(), 404);
        assert!(classified.to_string().contains("'abc'"));

        let generic = list_formats(&provider, Some("abc"), ENDPOINT, ErrorPolicy::Generic)
            .await
            .unwrap_err();
        assert_eq!(generic.status_code(), 500);
        assert!(generic.to_string().ends_with("Status code: 410"));
    }

    #[test]
    fn classification_patterns() {
        let classify = |message: &str| {
            ErrorPolicy::Classified
                .classify("abc", ProviderError::new(message))
                .status_code()
        };
        assert_eq!(classify("No video id found: abc"), 404);
        assert_eq!(classify("Status code: 403"), 403);
        let http = |status: &str| {
            format!("HTTP status client error ({status}) for url (https://www.youtube.com/)")
        };
        assert_eq!(classify(&http("403 Forbidden")), 403);
        assert_eq!(classify(&http("410 Gone")), 404);
        assert_eq!(
            classify("The uploader has not made this video available in your country"),
            403
        );
        assert_eq!(classify("connection reset by peer"), 500);

        let generic = ErrorPolicy::Generic.classify("abc", ProviderError::new("Status code: 403"));
        assert_eq!(generic.status_code(), 500);
    }
}
