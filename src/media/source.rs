use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{PlaylistInfo, VideoMetadata, VideoSource, YtDlpCommandBuilder};
use crate::config::FetcherConfig;
use crate::error::{Result, ScriptError};
use crate::video::VideoRef;

/// Video source driving the yt-dlp command-line tool
pub struct YtDlpSource {
    command_builder: YtDlpCommandBuilder,
}

impl YtDlpSource {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            command_builder: YtDlpCommandBuilder::new(config.binary_path),
        }
    }
}

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn metadata(&self, video: &VideoRef) -> Result<VideoMetadata> {
        info!("Fetching metadata for {}", video);

        let stdout = self
            .command_builder
            .metadata(&video.watch_url())
            .execute(ScriptError::Fetch)
            .await?;

        let metadata: VideoMetadata = serde_json::from_str(&stdout)
            .map_err(|e| ScriptError::Fetch(format!("Failed to parse yt-dlp metadata: {}", e)))?;

        debug!(
            "Metadata: title={:?}, {} manual and {} automatic caption languages",
            metadata.title,
            metadata.subtitles.len(),
            metadata.automatic_captions.len()
        );
        Ok(metadata)
    }

    async fn download_audio(&self, video: &VideoRef, dir: &Path) -> Result<PathBuf> {
        info!("Downloading audio for {} into {}", video, dir.display());

        let template = dir.join("audio.%(ext)s");
        let stdout = self
            .command_builder
            .download_audio(&video.watch_url(), &template)
            .execute(ScriptError::Recognition)
            .await?;

        let path = last_line(&stdout)
            .map(PathBuf::from)
            .ok_or_else(|| ScriptError::Recognition("yt-dlp did not report the audio file".to_string()))?;

        if !path.exists() {
            return Err(ScriptError::Recognition(format!(
                "Downloaded audio not found at {}",
                path.display()
            )));
        }

        info!("Audio downloaded to {}", path.display());
        Ok(path)
    }

    async fn audio_stream_url(&self, video: &VideoRef) -> Result<String> {
        let stdout = self
            .command_builder
            .stream_url(&video.watch_url())
            .execute(ScriptError::Playback)
            .await?;

        stdout
            .lines()
            .map(str::trim)
            .find(|l| l.starts_with("http://") || l.starts_with("https://"))
            .map(str::to_string)
            .ok_or_else(|| ScriptError::Playback(format!("No audio stream found for {}", video)))
    }

    async fn playlist(&self, url: &str, max_results: usize) -> Result<PlaylistInfo> {
        debug!("Listing {} (max {})", url, max_results);

        let stdout = self
            .command_builder
            .flat_playlist(url, max_results)
            .execute(ScriptError::Fetch)
            .await?;

        serde_json::from_str(&stdout)
            .map_err(|e| ScriptError::Fetch(format!("Failed to parse yt-dlp listing: {}", e)))
    }

    fn check_availability(&self) -> Result<String> {
        self.command_builder.version_check().probe()
    }
}

fn last_line(output: &str) -> Option<&str> {
    output.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}
