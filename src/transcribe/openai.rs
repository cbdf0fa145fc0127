// OpenAI Whisper Python implementation, driven through its command-line tool

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
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
use crate::media::MediaCommand;

/// OpenAI Whisper specific JSON output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperOutput {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<OpenAIWhisperSegment>,
    pub language: Option<String>,
}

/// OpenAI Whisper specific segment format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperSegment {
    pub id: u64,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Mapper for OpenAI Whisper format to abstract format
pub struct OpenAIWhisperMapper;

impl TranscriptionMapper<OpenAIWhisperOutput> for OpenAIWhisperMapper {
    fn to_abstract_transcription(whisper_output: OpenAIWhisperOutput) -> Result<AbstractTranscription> {
        let segments: Vec<AbstractTranscriptionSegment> = whisper_output
            .segments
            .into_iter()
            .map(|seg| AbstractTranscriptionSegment {
                start_time: seg.start,
                end_time: seg.end,
                text: seg.text.trim().to_string(),
            })
            .collect();

        let duration = segments.last().map(|seg| seg.end_time);

        Ok(AbstractTranscription {
            text: whisper_output.text,
            segments,
            language: language_or_unknown(whisper_output.language),
            duration,
        })
    }
}

/// OpenAI Whisper implementation
pub struct OpenAITranscriber {
    config: TranscriberConfig,
}

impl OpenAITranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    fn build_command(&self, audio_path: &Path, output_dir: &Path, language: Option<&str>) -> MediaCommand {
        let mut cmd = MediaCommand::new(&self.config.binary_path, "Whisper transcription")
            .arg(audio_path.to_string_lossy().to_string())
            .args(["--model", self.config.model.as_str()])
            .arg("--output_dir")
            .arg(output_dir.to_string_lossy().to_string())
            .args(["--output_format", "json", "--verbose", "False"]);

        if let Some(lang) = language {
            cmd = cmd.arg("--language").arg(lang);
        }
        cmd
    }
}

#[async_trait]
impl Transcriber for OpenAITranscriber {
    async fn transcribe<'a>(&self, audio_path: &Path, language: Option<&'a str>) -> Result<AbstractTranscription> {
        info!(
            "Transcribing {} with OpenAI Whisper (model {})",
            audio_path.display(),
            self.config.model
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| ScriptError::Recognition(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        self.build_command(audio_path, output_dir, language)
            .execute(ScriptError::Recognition)
            .await?;

        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| ScriptError::Recognition("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));
        debug!("Reading whisper output from {}", json_file.display());

        let whisper_output: OpenAIWhisperOutput = read_json_output(&json_file)?;
        OpenAIWhisperMapper::to_abstract_transcription(whisper_output)
    }

    fn model_name(&self) -> String {
        self.config.model.clone()
    }

    fn check_availability(&self) -> Result<String> {
        MediaCommand::new(&self.config.binary_path, "Whisper availability check")
            .arg("--help")
            .probe()
            .map(|_| format!("{} (model {})", self.config.binary_path, self.config.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapper() {
        let json = r#"{
            "text": " Bonjour tout le monde.",
            "segments": [
                {"id": 0, "seek": 0, "start": 0.0, "end": 2.5, "text": " Bonjour tout le monde.", "tokens": [1, 2]}
            ],
            "language": "fr"
        }"#;
        let output: OpenAIWhisperOutput = serde_json::from_str(json).unwrap();
        let transcription = OpenAIWhisperMapper::to_abstract_transcription(output).unwrap();

        assert_eq!(transcription.language, "fr");
        assert_eq!(transcription.duration, Some(2.5));
        assert_eq!(transcription.cleaned_text(), "Bonjour tout le monde.");
    }

    #[test]
    fn test_command_uses_fixed_model() {
        let transcriber = OpenAITranscriber::new(TranscriberConfig::default());
        let cmd = transcriber.build_command(Path::new("/tmp/audio.webm"), Path::new("/tmp/out"), None);
        let joined = cmd.args.join(" ");
        assert!(joined.starts_with("/tmp/audio.webm --model small --output_dir /tmp/out"));
        assert!(!joined.contains("--language"));
    }
}
