use log::debug;
use rusty_ytdl::{Video, VideoFormat};

use crate::{FormatDescriptor, MetadataProvider, ProviderError, VideoMetadata};

/// Metadata provider backed by YouTube through `rusty_ytdl`.
#[derive(Clone, Debug, Default)]
pub struct YtdlProvider;

impl YtdlProvider {
    pub fn new() -> Self {
        Self
    }
}

/// The parts of a `rusty_ytdl` format that end up in a [`FormatDescriptor`].
#[derive(Clone, Debug, Default)]
struct FormatFields<'a> {
    itag: u64,
    mime: String,
    container: &'a str,
    video_codec: Option<&'a str>,
    audio_codec: Option<&'a str>,
    quality_label: Option<&'a str>,
    audio_bitrate: Option<u64>,
    bitrate: u64,
}

impl<'a> From<&'a VideoFormat> for FormatFields<'a> {
    fn from(format: &'a VideoFormat) -> Self {
        Self {
            itag: format.itag,
            mime: format.mime_type.mime.to_string(),
            container: &format.mime_type.container,
            video_codec: format.mime_type.video_codec.as_deref(),
            audio_codec: format.mime_type.audio_codec.as_deref(),
            quality_label: format.quality_label.as_deref(),
            audio_bitrate: format.audio_bitrate,
            bitrate: format.bitrate,
        }
    }
}

impl From<FormatFields<'_>> for FormatDescriptor {
    // rusty_ytdl reports a missing bitrate as 0, which the listing treats as absent.
    fn from(fields: FormatFields<'_>) -> Self {
        Self {
            itag: Some(fields.itag),
            mime_type: Some(fields.mime),
            container: Some(fields.container.to_string()),
            quality_label: fields.quality_label.map(str::to_string),
            audio_bitrate: fields.audio_bitrate,
            bitrate: Some(fields.bitrate),
            video_codec: fields.video_codec.map(str::to_string),
            audio_codec: fields.audio_codec.map(str::to_string),
        }
    }
}

fn descriptor(format: &VideoFormat) -> FormatDescriptor {
    FormatFields::from(format).into()
}

impl MetadataProvider for YtdlProvider {
    async fn get_info(&self, video_id: &str) -> Result<VideoMetadata, ProviderError> {
        let video = Video::new(video_id).map_err(|e| ProviderError::new(e.to_string()))?;
        let info = video
            .get_info()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;

        let formats: Vec<FormatDescriptor> = info.formats.iter().map(descriptor).collect();
        debug!("{video_id}: provider returned {} formats", formats.len());

        Ok(VideoMetadata {
            title: info.video_details.title,
            formats,
        })
    }
}
