use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, ScriptError};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "ytscript.toml";

/// Environment variable pointing at an ffmpeg installation directory
pub const FFMPEG_PATH_ENV: &str = "FFMPEG_PATH";

pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

fn default_max_chunk_chars() -> usize {
    4500
}

fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub transcriber: TranscriberConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Path to the yt-dlp binary
    pub binary_path: String,
    /// Caption languages in order of preference
    pub caption_languages: Vec<String>,
    /// Accept automatically generated captions when no manual track exists
    pub include_automatic: bool,
    /// Caption rendition to download
    pub caption_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Which speech recognition tool to drive
    pub implementation: TranscriberImplementation,
    /// Path to the recognizer binary (`whisper` or `whisper-cli`)
    pub binary_path: String,
    /// Model size; fixed for every run
    pub model: String,
    /// Spoken language forced on the recognizer; detected when unset
    #[serde(default)]
    pub language: Option<String>,
    /// Path to ffmpeg, used to prepare audio for whisper.cpp
    pub ffmpeg_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriberImplementation {
    /// OpenAI Whisper command-line tool
    #[serde(rename = "openai")]
    OpenAI,
    /// whisper.cpp `whisper-cli`
    #[serde(rename = "whisper_cpp")]
    WhisperCpp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Translation backend
    pub provider: TranslationProvider,
    /// Backend endpoint; the provider default is used when unset
    pub endpoint: Option<String>,
    /// LLM model, only used by the Ollama provider
    pub model: String,
    /// Language a transcript must be in to be translated
    pub source_language: String,
    /// Language produced by translation
    pub target_language: String,
    /// Largest piece of text sent in one request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Public Google Translate endpoint
    Google,
    /// Local Ollama server
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Player binary name or path
    pub binary_path: String,
    /// ffmpeg installation directory searched before PATH
    pub ffmpeg_dir: Option<PathBuf>,
    /// Arguments passed before the stream URL
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `<stem>_script.txt` and `<stem>_translated.txt`
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    pub max_results: usize,
    pub favorites: Vec<FavoriteChannel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteChannel {
    pub name: String,
    pub url: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            binary_path: "yt-dlp".to_string(),
            caption_languages: vec!["en".to_string(), "ko".to_string()],
            include_automatic: true,
            caption_format: "json3".to_string(),
        }
    }
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            implementation: TranscriberImplementation::OpenAI,
            binary_path: "whisper".to_string(),
            model: "small".to_string(),
            language: None,
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::Google,
            endpoint: None,
            model: "llama3.2:3b".to_string(),
            source_language: "en".to_string(),
            target_language: "ko".to_string(),
            max_chunk_chars: default_max_chunk_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffplay".to_string(),
            ffmpeg_dir: None,
            args: vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            favorites: vec![
                FavoriteChannel {
                    name: "English Podcast Zone".to_string(),
                    url: "https://www.youtube.com/@EnglishPodcastZone/videos".to_string(),
                },
                FavoriteChannel {
                    name: "Learn English with Bob the Canadian".to_string(),
                    url: "https://www.youtube.com/@LearnEnglishwithBobtheCanadian/videos"
                        .to_string(),
                },
            ],
        }
    }
}

impl TranslateConfig {
    /// Endpoint in effect for the configured provider
    pub fn endpoint(&self) -> &str {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint,
            (None, TranslationProvider::Google) => DEFAULT_GOOGLE_ENDPOINT,
            (None, TranslationProvider::Ollama) => DEFAULT_OLLAMA_ENDPOINT,
        }
    }
}

impl ChannelsConfig {
    pub fn favorite(&self, name: &str) -> Option<&FavoriteChannel> {
        let wanted = name.trim().to_lowercase();
        self.favorites
            .iter()
            .find(|f| f.name.to_lowercase() == wanted)
            .or_else(|| {
                self.favorites
                    .iter()
                    .find(|f| f.name.to_lowercase().contains(&wanted))
            })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScriptError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ScriptError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScriptError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ScriptError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load from an explicit path, else `ytscript.toml` in the working
    /// directory, else defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Config::default(),
        };

        config.apply_env_overrides(std::env::var_os(FFMPEG_PATH_ENV).map(PathBuf::from));
        Ok(config)
    }

    fn apply_env_overrides(&mut self, ffmpeg_dir: Option<PathBuf>) {
        if let Some(dir) = ffmpeg_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.player.ffmpeg_dir = Some(dir);
        }
    }
}
