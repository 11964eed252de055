use std::future::Future;

use crate::format::FormatDescriptor;

/// What the provider knows about one video.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub formats: Vec<FormatDescriptor>,
}

/// A failed metadata lookup. The message text is the only signal it carries.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn contains_any(&self, patterns: &[&str]) -> bool {
        patterns.iter().any(|pattern| self.message.contains(pattern))
    }
}

/// Source of video metadata, usually backed by the video platform itself.
pub trait MetadataProvider: Send + Sync + 'static {
    fn get_info(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<VideoMetadata, ProviderError>> + Send;
}
