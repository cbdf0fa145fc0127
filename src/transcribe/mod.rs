// Speech recognition backends
//
// - OpenAI: OpenAI Whisper Python command-line tool
// - WhisperCpp: whisper.cpp `whisper-cli`
//
// Each backend parses its own JSON output and maps it onto
// AbstractTranscription through a TranscriptionMapper.

pub mod common;
pub mod openai;
pub mod whisper_cpp;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use common::*;
use crate::config::{TranscriberConfig, TranscriberImplementation};
use crate::error::Result;

/// Main trait for transcription operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file; `language` forces the spoken language,
    /// `None` lets the model detect it
    async fn transcribe<'a>(&self, audio_path: &Path, language: Option<&'a str>) -> Result<AbstractTranscription>;

    /// Model size in use
    fn model_name(&self) -> String;

    /// Check that the recognizer (and its model) can be used
    fn check_availability(&self) -> Result<String>;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    pub fn create_transcriber(config: TranscriberConfig, models_dir: PathBuf) -> Box<dyn Transcriber> {
        match config.implementation {
            TranscriberImplementation::OpenAI => Box::new(openai::OpenAITranscriber::new(config)),
            TranscriberImplementation::WhisperCpp => {
                Box::new(whisper_cpp::WhisperCppTranscriber::new(config, models_dir))
            }
        }
    }
}
