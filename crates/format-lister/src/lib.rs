//! Lists the encoding variants ("itags") of a YouTube video.
//!
//! The heavy lifting of talking to YouTube is done by a [`MetadataProvider`]; this crate
//! filters what the provider returns down to the formats carrying quality information,
//! projects each of them to a [`FormatSummary`] and maps provider failures to
//! [`ListingError`]s according to an [`ErrorPolicy`].

mod format;
mod listing;
mod provider;
mod ytdl;

pub use format::{FormatDescriptor, FormatSummary, ResponsePayload, summarize_formats};
pub use listing::{
    ACCESS_DENIED_PATTERNS, ErrorPolicy, ListingError, UNAVAILABLE_PATTERNS, list_formats,
};
pub use provider::{MetadataProvider, ProviderError, VideoMetadata};
pub use ytdl::YtdlProvider;
