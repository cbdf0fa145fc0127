use std::fmt;
use url::Url;

use crate::error::{Result, ScriptError};

const VIDEO_ID_LEN: usize = 11;

/// A validated reference to one YouTube video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    id: String,
}

impl VideoRef {
    /// Parse a user supplied link or bare video id.
    ///
    /// Accepts `watch?v=`, `youtu.be/`, `/shorts/`, `/live/` and `/embed/`
    /// links on YouTube hosts. Everything else is rejected before any
    /// network access happens.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScriptError::Input("video URL is empty".to_string()));
        }

        if is_video_id(trimmed) {
            return Ok(Self {
                id: trimmed.to_string(),
            });
        }

        let parsed = Url::parse(trimmed)
            .map_err(|e| ScriptError::Input(format!("'{}' is not a valid URL: {}", trimmed, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ScriptError::Input(format!(
                "unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }

        let host = parsed.host_str().unwrap_or_default().to_lowercase();
        let id = if host == "youtu.be" {
            parsed
                .path()
                .split('/')
                .find(|part| !part.is_empty())
                .map(str::to_string)
        } else if is_youtube_host(&host) {
            id_from_youtube_url(&parsed)
        } else {
            return Err(ScriptError::Input(format!(
                "'{}' is not a YouTube URL",
                trimmed
            )));
        };

        match id {
            Some(id) if is_video_id(&id) => Ok(Self { id }),
            Some(id) => Err(ScriptError::Input(format!("'{}' is not a valid video id", id))),
            None => Err(ScriptError::Input(format!(
                "no video id found in '{}'",
                trimmed
            ))),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical watch URL handed to external tools
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.watch_url())
    }
}

fn is_youtube_host(host: &str) -> bool {
    matches!(
        host,
        "youtube.com" | "www.youtube.com" | "m.youtube.com" | "music.youtube.com"
    )
}

fn id_from_youtube_url(parsed: &Url) -> Option<String> {
    if let Some(id) = parsed
        .query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.to_string())
    {
        return Some(id);
    }

    let parts: Vec<&str> = parsed.path().split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        ["shorts" | "live" | "embed", id, ..] => Some((*id).to_string()),
        _ => None,
    }
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
