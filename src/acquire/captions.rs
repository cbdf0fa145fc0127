use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::{AcquisitionContext, TranscriptStrategy};
use crate::config::FetcherConfig;
use crate::error::{Result, ScriptError};
use crate::language::base_subtag;
use crate::media::{CaptionFormat, VideoMetadata};
use crate::text::clean_text;
use crate::transcript::{CaptionKind, Transcript};

const ORIGINAL_SUFFIX: &str = "-orig";

/// A caption track chosen for download
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language: String,
    pub kind: CaptionKind,
    pub url: String,
}

/// Pick the best caption track. Languages are tried in order; for each one
/// a manual track beats an automatic one.
pub fn select_caption_track(
    metadata: &VideoMetadata,
    preferred_languages: &[String],
    include_automatic: bool,
    format: &str,
) -> Option<CaptionTrack> {
    for language in preferred_languages {
        if let Some(track) = find_track(&metadata.subtitles, language, format, CaptionKind::Manual) {
            return Some(track);
        }
        if include_automatic {
            if let Some(track) = find_automatic_track(&metadata.automatic_captions, language, format) {
                return Some(track);
            }
        }
    }
    None
}

fn find_track(
    tracks: &BTreeMap<String, Vec<CaptionFormat>>,
    language: &str,
    format: &str,
    kind: CaptionKind,
) -> Option<CaptionTrack> {
    let wanted = base_subtag(language);

    // Exact key first, then any key sharing the base subtag; the first one
    // offering the requested format wins
    let exact = tracks.get_key_value(language);
    let by_base = tracks
        .iter()
        .filter(|(key, _)| key.as_str() != language && base_subtag(key) == wanted);

    exact.into_iter().chain(by_base).find_map(|(key, formats)| {
        formats.iter().find(|f| f.ext == format).map(|f| CaptionTrack {
            language: key.clone(),
            kind,
            url: f.url.clone(),
        })
    })
}

/// Automatic captions include machine translations of the original speech
/// track. When yt-dlp marks the original with `-orig`, only those tracks
/// are eligible.
fn find_automatic_track(
    tracks: &BTreeMap<String, Vec<CaptionFormat>>,
    language: &str,
    format: &str,
) -> Option<CaptionTrack> {
    if tracks.keys().any(|k| k.ends_with(ORIGINAL_SUFFIX)) {
        let originals: BTreeMap<String, Vec<CaptionFormat>> = tracks
            .iter()
            .filter(|(k, _)| k.ends_with(ORIGINAL_SUFFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        find_track(&originals, language, format, CaptionKind::Automatic)
    } else {
        find_track(tracks, language, format, CaptionKind::Automatic)
    }
}

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Segment>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// Flatten a json3 caption document into one whitespace-normalized string
pub fn parse_json3(content: &str) -> Result<String> {
    let document: Json3Document = serde_json::from_str(content)
        .map_err(|e| ScriptError::Fetch(format!("Failed to parse caption track: {}", e)))?;

    let lines: Vec<String> = document
        .events
        .iter()
        .map(|event| event.segs.iter().map(|s| s.utf8.as_str()).collect::<String>())
        .filter(|line| !line.trim().is_empty())
        .collect();

    Ok(clean_text(&lines.join(" ")))
}

/// First strategy: use a caption track published with the video
pub struct CaptionStrategy {
    client: Client,
    config: FetcherConfig,
}

impl CaptionStrategy {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn download_track(&self, track: &CaptionTrack) -> Result<String> {
        debug!("Downloading {:?} caption track ({})", track.kind, track.language);

        let response = self
            .client
            .get(&track.url)
            .send()
            .await
            .map_err(|e| ScriptError::Fetch(format!("Caption download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ScriptError::Fetch(format!(
                "Caption download failed with HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScriptError::Fetch(format!("Failed to read caption track: {}", e)))?;
        parse_json3(&body)
    }
}

#[async_trait]
impl TranscriptStrategy for CaptionStrategy {
    fn name(&self) -> &'static str {
        "captions"
    }

    async fn acquire(&self, context: &AcquisitionContext) -> Result<Option<Transcript>> {
        let Some(track) = select_caption_track(
            &context.metadata,
            &context.preferred_languages,
            self.config.include_automatic,
            &self.config.caption_format,
        ) else {
            info!("No caption track in {:?}", context.preferred_languages);
            return Ok(None);
        };

        info!("Using {:?} captions in '{}'", track.kind, track.language);
        let text = self.download_track(&track).await?;
        if text.is_empty() {
            info!("Caption track '{}' is empty", track.language);
            return Ok(None);
        }

        Ok(Some(Transcript::from_captions(text, &track.language, track.kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats(lang: &str) -> Vec<CaptionFormat> {
        vec![
            CaptionFormat {
                ext: "vtt".to_string(),
                url: format!("https://captions/{}.vtt", lang),
            },
            CaptionFormat {
                ext: "json3".to_string(),
                url: format!("https://captions/{}.json3", lang),
            },
        ]
    }

    fn langs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_manual_beats_automatic() {
        let mut metadata = VideoMetadata::default();
        metadata.subtitles.insert("en".into(), formats("en"));
        metadata.automatic_captions.insert("en".into(), formats("en-auto"));

        let track = select_caption_track(&metadata, &langs(&["en"]), true, "json3").unwrap();
        assert_eq!(track.kind, CaptionKind::Manual);
        assert_eq!(track.url, "https://captions/en.json3");
    }

    #[test]
    fn test_language_order_wins_over_kind() {
        let mut metadata = VideoMetadata::default();
        metadata.subtitles.insert("ko".into(), formats("ko"));
        metadata.automatic_captions.insert("en-orig".into(), formats("en-orig"));
        metadata.automatic_captions.insert("ko".into(), formats("ko-translated"));

        let track = select_caption_track(&metadata, &langs(&["en", "ko"]), true, "json3").unwrap();
        assert_eq!(track.kind, CaptionKind::Automatic);
        assert_eq!(track.language, "en-orig");
    }

    #[test]
    fn test_regional_variant_matches_base_language() {
        let mut metadata = VideoMetadata::default();
        metadata.subtitles.insert("en-US".into(), formats("en-US"));

        let track = select_caption_track(&metadata, &langs(&["en"]), true, "json3").unwrap();
        assert_eq!(track.language, "en-US");
    }

    #[test]
    fn test_regional_variant_used_when_exact_lacks_format() {
        let mut metadata = VideoMetadata::default();
        metadata.subtitles.insert(
            "en".into(),
            vec![CaptionFormat {
                ext: "vtt".into(),
                url: "https://captions/en.vtt".into(),
            }],
        );
        metadata.subtitles.insert("en-US".into(), formats("en-US"));

        let track = select_caption_track(&metadata, &langs(&["en"]), true, "json3").unwrap();
        assert_eq!(track.language, "en-US");
        assert_eq!(track.url, "https://captions/en-US.json3");
    }

    #[test]
    fn test_machine_translated_automatic_tracks_are_ignored() {
        let mut metadata = VideoMetadata::default();
        metadata.automatic_captions.insert("ja-orig".into(), formats("ja-orig"));
        metadata.automatic_captions.insert("en".into(), formats("en"));
        metadata.automatic_captions.insert("ko".into(), formats("ko"));

        assert_eq!(select_caption_track(&metadata, &langs(&["en", "ko"]), true, "json3"), None);
    }

    #[test]
    fn test_automatic_disabled() {
        let mut metadata = VideoMetadata::default();
        metadata.automatic_captions.insert("en".into(), formats("en"));
        assert_eq!(select_caption_track(&metadata, &langs(&["en"]), false, "json3"), None);
    }

    #[test]
    fn test_missing_format_is_skipped() {
        let mut metadata = VideoMetadata::default();
        metadata.subtitles.insert(
            "en".into(),
            vec![CaptionFormat {
                ext: "srv1".into(),
                url: "https://captions/en.srv1".into(),
            }],
        );
        assert_eq!(select_caption_track(&metadata, &langs(&["en"]), true, "json3"), None);
    }

    #[test]
    fn test_parse_json3() {
        let content = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 1000, "segs": [{"utf8": "Hello"}, {"utf8": " there,"}]},
                {"tStartMs": 500, "aAppend": 1, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 1000, "dDurationMs": 1000},
                {"tStartMs": 1000, "dDurationMs": 1000, "segs": [{"utf8": "general\nKenobi."}]}
            ]
        }"#;
        assert_eq!(parse_json3(content).unwrap(), "Hello there, general Kenobi.");
    }

    #[test]
    fn test_parse_json3_rejects_garbage() {
        let err = parse_json3("<html>").unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Fetch);
    }
}
