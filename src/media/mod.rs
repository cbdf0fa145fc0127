// Access to the video host through external tools
//
// - Commands: generic external tool invocation plus the ffmpeg builder
// - YtDlp: yt-dlp argument builders
// - Source: VideoSource implementation on top of yt-dlp

pub mod commands;
pub mod source;
pub mod ytdlp;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use source::*;
pub use ytdlp::*;

use crate::config::FetcherConfig;
use crate::error::Result;
use crate::video::VideoRef;

/// One downloadable rendition of a caption track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFormat {
    pub ext: String,
    pub url: String,
}

/// The subset of yt-dlp's info document the pipeline reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    /// Manually authored tracks keyed by language
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subtitles: BTreeMap<String, Vec<CaptionFormat>>,
    /// Generated tracks keyed by language
    #[serde(default, deserialize_with = "null_as_empty")]
    pub automatic_captions: BTreeMap<String, Vec<CaptionFormat>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistInfo {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entries: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Operations against the video host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Title, duration and available caption tracks
    async fn metadata(&self, video: &VideoRef) -> Result<VideoMetadata>;

    /// Download the audio-only stream into `dir`, returning the file path
    async fn download_audio(&self, video: &VideoRef, dir: &Path) -> Result<PathBuf>;

    /// Direct URL of the audio-only stream
    async fn audio_stream_url(&self, video: &VideoRef) -> Result<String>;

    /// Flat listing of a channel page or search query
    async fn playlist(&self, url: &str, max_results: usize) -> Result<PlaylistInfo>;

    /// Check that the underlying tool can be executed
    fn check_availability(&self) -> Result<String>;
}

/// Factory for creating video source instances
pub struct VideoSourceFactory;

impl VideoSourceFactory {
    /// Create the default (yt-dlp based) video source
    pub fn create_source(config: FetcherConfig) -> Box<dyn VideoSource> {
        Box::new(source::YtDlpSource::new(config))
    }
}
