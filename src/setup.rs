use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::path::PathBuf;
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, ScriptError};
use crate::media::{MediaCommand, VideoSourceFactory};
use crate::player;
use crate::transcribe::TranscriberFactory;

/// Working directory for logs and downloaded models
pub const APP_DIR: &str = ".ytscript";

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub filename: String,
    pub url: String,
    pub size_mb: f64,
}

/// Outcome of probing one external tool
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: &'static str,
    pub purpose: &'static str,
    pub result: std::result::Result<String, String>,
}

/// whisper.cpp model file name for a model size
pub fn model_filename(name: &str) -> String {
    format!("ggml-{}.bin", name)
}

pub struct SetupManager {
    client: Client,
    app_dir: PathBuf,
}

impl SetupManager {
    pub fn new() -> Result<Self> {
        Self::with_app_dir(PathBuf::from(APP_DIR))
    }

    pub fn with_app_dir(app_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ytscript/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, app_dir })
    }

    pub fn models_dir(&self) -> PathBuf {
        self.app_dir.join("models")
    }

    pub fn get_available_models(&self) -> Vec<ModelInfo> {
        [
            ("tiny", 75.0),
            ("tiny.en", 75.0),
            ("base", 142.0),
            ("base.en", 142.0),
            ("small", 466.0),
            ("small.en", 466.0),
            ("medium", 1500.0),
            ("medium.en", 1500.0),
            ("large-v3", 2900.0),
        ]
        .into_iter()
        .map(|(name, size_mb)| {
            let filename = model_filename(name);
            ModelInfo {
                url: format!("{}/{}", MODEL_BASE_URL, filename),
                name: name.to_string(),
                filename,
                size_mb,
            }
        })
        .collect()
    }

    pub fn find_model(&self, name: &str) -> Result<ModelInfo> {
        self.get_available_models()
            .into_iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ScriptError::Config(format!("Unknown whisper.cpp model '{}'", name)))
    }

    pub fn is_downloaded(&self, model: &ModelInfo) -> bool {
        self.models_dir().join(&model.filename).exists()
    }

    pub async fn download_model(&self, model: &ModelInfo) -> Result<PathBuf> {
        let models_dir = self.models_dir();
        let local_path = models_dir.join(&model.filename);

        if local_path.exists() {
            info!("Model {} already exists at {}", model.name, local_path.display());
            return Ok(local_path);
        }

        async_fs::create_dir_all(&models_dir).await?;
        info!("Downloading {} model ({:.1} MB)...", model.name, model.size_mb);

        let mut response = self.client.get(&model.url).send().await?;
        if !response.status().is_success() {
            return Err(ScriptError::Config(format!(
                "Failed to download model {}: HTTP {}",
                model.name,
                response.status()
            )));
        }

        let total = response
            .content_length()
            .unwrap_or((model.size_mb * 1_000_000.0) as u64);
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .map_err(|e| ScriptError::Config(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );

        // Only complete downloads get the final name
        let temp_path = local_path.with_extension("tmp");
        let mut file = async_fs::File::create(&temp_path).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            pb.inc(chunk.len() as u64);
        }
        file.flush().await?;
        drop(file);

        async_fs::rename(&temp_path, &local_path).await?;

        pb.finish_with_message(format!("Downloaded {}", model.name));
        info!("Successfully downloaded {} to {}", model.name, local_path.display());
        Ok(local_path)
    }

    /// Probe every external tool the configuration relies on
    pub fn check_tools(&self, config: &Config) -> Vec<ToolStatus> {
        let source = VideoSourceFactory::create_source(config.fetcher.clone());
        let transcriber =
            TranscriberFactory::create_transcriber(config.transcriber.clone(), self.models_dir());
        let player_binary = player::resolve_player_binary(&config.player);

        vec![
            ToolStatus {
                name: "yt-dlp",
                purpose: "metadata, captions, audio download",
                result: source.check_availability().map_err(|e| e.to_string()),
            },
            ToolStatus {
                name: "ffmpeg",
                purpose: "audio decoding for speech recognition",
                result: MediaCommand::new(&config.transcriber.ffmpeg_path, "ffmpeg version check")
                    .arg("-version")
                    .probe()
                    .map_err(|e| e.to_string()),
            },
            ToolStatus {
                name: "recognizer",
                purpose: "speech recognition fallback",
                result: transcriber.check_availability().map_err(|e| e.to_string()),
            },
            ToolStatus {
                name: "ffplay",
                purpose: "audio playback",
                result: MediaCommand::new(player_binary.to_string_lossy(), "ffplay version check")
                    .arg("-version")
                    .probe()
                    .map_err(|e| e.to_string()),
            },
        ]
    }
}
