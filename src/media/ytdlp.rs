use std::path::Path;

use super::MediaCommand;

/// Format selector for audio-only streams
pub const AUDIO_FORMAT: &str = "bestaudio/best";

/// Builder for yt-dlp invocations
pub struct YtDlpCommandBuilder {
    binary_path: String,
}

impl YtDlpCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    fn base(&self, description: &str) -> MediaCommand {
        MediaCommand::new(&self.binary_path, description).args(["--no-warnings", "--no-progress"])
    }

    /// Full video info as one JSON document, caption track listings included
    pub fn metadata(&self, url: &str) -> MediaCommand {
        self.base("Video metadata fetch")
            .args(["--dump-single-json", "--skip-download", "--no-playlist"])
            .arg(url)
    }

    /// Download the best audio stream and print the final file path
    pub fn download_audio<P: AsRef<Path>>(&self, url: &str, output_template: P) -> MediaCommand {
        self.base("Audio download")
            .args(["-f", AUDIO_FORMAT, "--no-playlist", "--no-simulate"])
            .args(["--print", "after_move:filepath"])
            .arg("-o")
            .arg(output_template.as_ref().to_string_lossy().to_string())
            .arg(url)
    }

    /// Direct URL of the audio-only stream
    pub fn stream_url(&self, url: &str) -> MediaCommand {
        self.base("Audio stream lookup")
            .args(["-f", AUDIO_FORMAT, "--get-url", "--no-playlist"])
            .arg(url)
    }

    /// Flat listing of a channel, playlist or `ytsearchN:` query
    pub fn flat_playlist(&self, url: &str, max_results: usize) -> MediaCommand {
        self.base("Playlist listing")
            .args(["--flat-playlist", "--dump-single-json"])
            .arg("--playlist-end")
            .arg(max_results.to_string())
            .arg(url)
    }

    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "yt-dlp version check").arg("--version")
    }
}
