use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Video fetch error: {0}")]
    Fetch(String),

    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No transcript could be produced for video {0}")]
    NoTranscript(String),
}

/// Coarse failure category reported to the user when a pipeline action fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    Input,
    Fetch,
    Recognition,
    Translation,
    Playback,
    Config,
    Io,
}

impl ScriptError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Input(_) => FailureKind::Input,
            Self::Fetch(_) | Self::Http(_) | Self::Json(_) => FailureKind::Fetch,
            Self::Recognition(_) | Self::Media(_) | Self::NoTranscript(_) => {
                FailureKind::Recognition
            }
            Self::Translation(_) => FailureKind::Translation,
            Self::Playback(_) => FailureKind::Playback,
            Self::Config(_) | Self::Toml(_) => FailureKind::Config,
            Self::Io(_) => FailureKind::Io,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Input => "input",
            Self::Fetch => "fetch",
            Self::Recognition => "recognition",
            Self::Translation => "translation",
            Self::Playback => "playback",
            Self::Config => "configuration",
            Self::Io => "io",
        };
        f.write_str(label)
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ScriptError::Input("empty".into()).kind(), FailureKind::Input);
        assert_eq!(ScriptError::Media("ffmpeg".into()).kind(), FailureKind::Recognition);
        assert_eq!(ScriptError::NoTranscript("abc".into()).kind(), FailureKind::Recognition);
        assert_eq!(ScriptError::Config("bad".into()).kind(), FailureKind::Config);
    }

    #[test]
    fn test_fetch_message_is_kept_verbatim() {
        let err = ScriptError::Fetch("ERROR: [youtube] abc: Private video".into());
        assert!(err.to_string().ends_with("ERROR: [youtube] abc: Private video"));
    }
}
