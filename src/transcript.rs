use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language;

/// How a caption track was produced by the video host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionKind {
    Manual,
    Automatic,
}

/// Where the transcript text came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptSource {
    Captions { track_language: String, kind: CaptionKind },
    SpeechRecognition { model: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    /// Declared (captions) or detected (recognition) language tag
    pub language: String,
    pub source: TranscriptSource,
}

impl Transcript {
    pub fn from_captions(text: String, track_language: &str, kind: CaptionKind) -> Self {
        Self {
            text,
            language: language::base_subtag(track_language),
            source: TranscriptSource::Captions {
                track_language: track_language.to_string(),
                kind,
            },
        }
    }

    pub fn from_recognition(text: String, language: String, model: &str) -> Self {
        Self {
            text,
            language,
            source: TranscriptSource::SpeechRecognition {
                model: model.to_string(),
            },
        }
    }

    pub fn is_english(&self) -> bool {
        language::is_english(&self.language, &self.text)
    }

    pub fn used_recognition(&self) -> bool {
        matches!(self.source, TranscriptSource::SpeechRecognition { .. })
    }
}

impl fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Captions { track_language, kind: CaptionKind::Manual } => {
                write!(f, "captions ({})", track_language)
            }
            Self::Captions { track_language, kind: CaptionKind::Automatic } => {
                write!(f, "automatic captions ({})", track_language)
            }
            Self::SpeechRecognition { model } => write!(f, "speech recognition (model {})", model),
        }
    }
}
