// whisper.cpp implementation, driven through `whisper-cli`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{
    Transcriber,
    common::{
        AbstractTranscription, AbstractTranscriptionSegment, TranscriptionMapper,
        language_or_unknown, read_json_output,
    },
};
use crate::config::TranscriberConfig;
use crate::error::{Result, ScriptError};
use crate::media::{MediaCommand, MediaCommandBuilder};
use crate::setup::model_filename;

/// whisper.cpp `-oj` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOutput {
    pub result: WhisperCppResult,
    #[serde(default)]
    pub transcription: Vec<WhisperCppSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppResult {
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppSegment {
    pub offsets: WhisperCppOffsets,
    pub text: String,
}

/// Segment bounds in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOffsets {
    pub from: i64,
    pub to: i64,
}

/// Mapper for Whisper.cpp format to abstract format
pub struct WhisperCppMapper;

impl TranscriptionMapper<WhisperCppOutput> for WhisperCppMapper {
    fn to_abstract_transcription(output: WhisperCppOutput) -> Result<AbstractTranscription> {
        let segments: Vec<AbstractTranscriptionSegment> = output
            .transcription
            .into_iter()
            .map(|seg| AbstractTranscriptionSegment {
                start_time: seg.offsets.from as f64 / 1000.0,
                end_time: seg.offsets.to as f64 / 1000.0,
                text: seg.text.trim().to_string(),
            })
            .collect();

        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let duration = segments.last().map(|seg| seg.end_time);

        Ok(AbstractTranscription {
            text,
            segments,
            language: language_or_unknown(output.result.language),
            duration,
        })
    }
}

pub struct WhisperCppTranscriber {
    config: TranscriberConfig,
    media: MediaCommandBuilder,
    models_dir: PathBuf,
}

impl WhisperCppTranscriber {
    pub fn new(config: TranscriberConfig, models_dir: PathBuf) -> Self {
        let media = MediaCommandBuilder::new(&config.ffmpeg_path);
        Self {
            config,
            media,
            models_dir,
        }
    }

    /// Configured model as a file path: explicit paths are kept, names
    /// resolve to `ggml-<name>.bin` in the models directory.
    fn model_path(&self) -> PathBuf {
        let model = &self.config.model;
        if model.ends_with(".bin") || model.contains('/') || model.contains('\\') {
            PathBuf::from(model)
        } else {
            self.models_dir.join(model_filename(model))
        }
    }

    fn build_command(
        &self,
        model_path: &Path,
        wav_path: &Path,
        output_base: &Path,
        language: Option<&str>,
    ) -> MediaCommand {
        MediaCommand::new(&self.config.binary_path, "whisper.cpp transcription")
            .arg("-m")
            .arg(model_path.to_string_lossy().to_string())
            .arg("-f")
            .arg(wav_path.to_string_lossy().to_string())
            .args(["-oj", "-np"])
            .arg("-of")
            .arg(output_base.to_string_lossy().to_string())
            .args(["-l", language.unwrap_or("auto")])
    }
}

#[async_trait]
impl Transcriber for WhisperCppTranscriber {
    async fn transcribe<'a>(&self, audio_path: &Path, language: Option<&'a str>) -> Result<AbstractTranscription> {
        let model_path = self.model_path();
        if !model_path.exists() {
            return Err(ScriptError::Recognition(format!(
                "whisper.cpp model not found at {} (run `ytscript models --download`)",
                model_path.display()
            )));
        }

        info!(
            "Transcribing {} with whisper.cpp ({})",
            audio_path.display(),
            model_path.display()
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| ScriptError::Recognition(format!("Failed to create temp directory: {}", e)))?;
        let wav_path = temp_dir.path().join("audio.wav");
        let output_base = temp_dir.path().join("transcript");

        self.media
            .whisper_wav(audio_path, wav_path.as_path())
            .execute(ScriptError::Media)
            .await?;

        self.build_command(&model_path, &wav_path, &output_base, language)
            .execute(ScriptError::Recognition)
            .await?;

        let json_file = output_base.with_extension("json");
        debug!("Reading whisper.cpp output from {}", json_file.display());

        let output: WhisperCppOutput = read_json_output(&json_file)?;
        WhisperCppMapper::to_abstract_transcription(output)
    }

    fn model_name(&self) -> String {
        self.config.model.clone()
    }

    fn check_availability(&self) -> Result<String> {
        MediaCommand::new(&self.config.binary_path, "whisper.cpp availability check")
            .arg("--help")
            .probe()?;
        self.media.version_check().probe()?;

        let model_path = self.model_path();
        if model_path.exists() {
            Ok(format!("{} ({})", self.config.binary_path, model_path.display()))
        } else {
            Err(ScriptError::Config(format!(
                "whisper.cpp model missing: {}",
                model_path.display()
            )))
        }
    }
}
