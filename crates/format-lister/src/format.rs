use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "unknown";
pub const AUDIO_ONLY: &str = "audio only";
pub const NONE: &str = "none";

/// One encoding variant of a video, as reported by the metadata provider.
///
/// Every field is optional: the provider's player response omits whatever does not
/// apply to a given variant, and `null` is accepted wherever a value is expected.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatDescriptor {
    pub itag: Option<u64>,
    pub mime_type: Option<String>,
    pub container: Option<String>,
    pub quality_label: Option<String>,
    pub audio_bitrate: Option<u64>,
    pub bitrate: Option<u64>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
}

/// The reduced record returned to the caller for each listable format.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct FormatSummary {
    pub itag: String,
    pub ext: String,
    pub resolution: String,
    pub vcodec: String,
    pub acodec: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub video_id: String,
    pub title: String,
    pub itags: Vec<FormatSummary>,
}

impl ResponsePayload {
    pub fn new(
        video_id: impl Into<String>,
        title: impl Into<String>,
        itags: Vec<FormatSummary>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            itags,
        }
    }

    /// Two-space indented JSON, the body of a successful response.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// Zero and the empty string count as absent, like any other missing value.
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn number(value: Option<u64>) -> Option<u64> {
    value.filter(|n| *n != 0)
}

impl FormatDescriptor {
    pub fn itag(&self) -> Option<u64> {
        number(self.itag)
    }

    /// A format is listed when it has an itag and carries some quality information.
    pub fn is_listable(&self) -> bool {
        self.itag().is_some()
            && (text(&self.quality_label).is_some()
                || number(self.audio_bitrate).is_some()
                || number(self.bitrate).is_some())
    }

    /// Container extension: the explicit container, else the mime subtype without its
    /// parameters (`audio/webm; codecs="opus"` gives `webm`).
    pub fn extension(&self) -> String {
        if let Some(container) = text(&self.container) {
            return container.to_string();
        }
        text(&self.mime_type)
            .and_then(|mime| mime.split_once('/'))
            .map(|(_, subtype)| subtype.split(';').next().unwrap_or_default().trim())
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    pub fn resolution(&self) -> String {
        match text(&self.quality_label) {
            Some(label) => label.to_string(),
            None if number(self.audio_bitrate).is_some() => AUDIO_ONLY.to_string(),
            None => UNKNOWN.to_string(),
        }
    }

    pub fn summarize(&self) -> Option<FormatSummary> {
        if !self.is_listable() {
            return None;
        }
        Some(FormatSummary {
            itag: self.itag()?.to_string(),
            ext: self.extension(),
            resolution: self.resolution(),
            vcodec: text(&self.video_codec).unwrap_or(NONE).to_string(),
            acodec: text(&self.audio_codec).unwrap_or(NONE).to_string(),
        })
    }
}

/// Keeps the listable formats and projects them, preserving the provider's order.
pub fn summarize_formats<'a>(
    formats: impl IntoIterator<Item = &'a FormatDescriptor>,
) -> Vec<FormatSummary> {
    formats
        .into_iter()
        .filter_map(FormatDescriptor::summarize)
        .collect()
}
