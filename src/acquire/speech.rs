use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{AcquisitionContext, TranscriptStrategy};
use crate::error::{Result, ScriptError};
use crate::media::VideoSource;
use crate::transcribe::Transcriber;
use crate::transcript::Transcript;

/// Fallback strategy: download the audio and run speech recognition on it.
/// The audio lives in a temporary directory removed once recognition ends.
pub struct SpeechRecognitionStrategy {
    source: Arc<dyn VideoSource>,
    transcriber: Box<dyn Transcriber>,
    language: Option<String>,
}

impl SpeechRecognitionStrategy {
    pub fn new(
        source: Arc<dyn VideoSource>,
        transcriber: Box<dyn Transcriber>,
        language: Option<String>,
    ) -> Self {
        Self {
            source,
            transcriber,
            language,
        }
    }
}

#[async_trait]
impl TranscriptStrategy for SpeechRecognitionStrategy {
    fn name(&self) -> &'static str {
        "speech recognition"
    }

    async fn acquire(&self, context: &AcquisitionContext) -> Result<Option<Transcript>> {
        let work_dir = tempfile::tempdir()?;
        let audio = self.source.download_audio(&context.video, work_dir.path()).await?;

        let model = self.transcriber.model_name();
        info!("Running speech recognition with model {}", model);
        let transcription = self
            .transcriber
            .transcribe(&audio, self.language.as_deref())
            .await?;

        let text = transcription.cleaned_text();
        if text.is_empty() {
            return Err(ScriptError::Recognition(
                "speech recognition produced no text".to_string(),
            ));
        }

        info!(
            "Recognized {} characters from {:.0}s of audio, language {}",
            text.chars().count(),
            transcription.duration.unwrap_or_default(),
            transcription.language
        );
        Ok(Some(Transcript::from_recognition(text, transcription.language, &model)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MockVideoSource, VideoMetadata};
    use crate::transcribe::{AbstractTranscription, MockTranscriber};
    use crate::video::VideoRef;

    fn context() -> AcquisitionContext {
        AcquisitionContext {
            video: VideoRef::parse("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            metadata: VideoMetadata::default(),
            preferred_languages: vec!["en".to_string()],
        }
    }

    fn transcription(text: &str, language: &str) -> AbstractTranscription {
        AbstractTranscription {
            text: text.to_string(),
            segments: vec![],
            language: language.to_string(),
            duration: Some(3.0),
        }
    }

    fn source_with_audio() -> Arc<dyn VideoSource> {
        let mut source = MockVideoSource::new();
        source
            .expect_download_audio()
            .times(1)
            .returning(|_, dir| Ok(dir.join("audio.webm")));
        Arc::new(source)
    }

    #[tokio::test]
    async fn test_recognized_transcript() {
        let mut transcriber = MockTranscriber::new();
        transcriber.expect_model_name().return_const("small".to_string());
        transcriber
            .expect_transcribe()
            .withf(|path, language| path.ends_with("audio.webm") && language.is_none())
            .times(1)
            .returning(|_, _| Ok(transcription("  Hello   world. ", "en")));

        let strategy = SpeechRecognitionStrategy::new(source_with_audio(), Box::new(transcriber), None);
        let transcript = strategy.acquire(&context()).await.unwrap().unwrap();

        assert_eq!(transcript.text, "Hello world.");
        assert_eq!(transcript.language, "en");
        assert!(transcript.used_recognition());
        assert_eq!(transcript.source.to_string(), "speech recognition (model small)");
    }

    #[tokio::test]
    async fn test_forced_language_is_passed_through() {
        let mut transcriber = MockTranscriber::new();
        transcriber.expect_model_name().return_const("small".to_string());
        transcriber
            .expect_transcribe()
            .withf(|_, language| *language == Some("ja"))
            .returning(|_, _| Ok(transcription("こんにちは", "ja")));

        let strategy = SpeechRecognitionStrategy::new(
            source_with_audio(),
            Box::new(transcriber),
            Some("ja".to_string()),
        );
        let transcript = strategy.acquire(&context()).await.unwrap().unwrap();
        assert!(!transcript.is_english());
    }

    #[tokio::test]
    async fn test_empty_recognition_is_an_error() {
        let mut transcriber = MockTranscriber::new();
        transcriber.expect_model_name().return_const("small".to_string());
        transcriber
            .expect_transcribe()
            .returning(|_, _| Ok(transcription("   ", "en")));

        let strategy = SpeechRecognitionStrategy::new(source_with_audio(), Box::new(transcriber), None);
        let err = strategy.acquire(&context()).await.unwrap_err();
        assert!(matches!(err, ScriptError::Recognition(_)));
    }

    #[tokio::test]
    async fn test_download_failure_skips_recognition() {
        let mut source = MockVideoSource::new();
        source
            .expect_download_audio()
            .returning(|_, _| Err(ScriptError::Recognition("HTTP Error 403".into())));

        let mut transcriber = MockTranscriber::new();
        transcriber.expect_model_name().return_const("small".to_string());
        transcriber.expect_transcribe().never();

        let strategy = SpeechRecognitionStrategy::new(Arc::new(source), Box::new(transcriber), None);
        let err = strategy.acquire(&context()).await.unwrap_err();
        assert_eq!(err.to_string(), "Speech recognition error: HTTP Error 403");
    }
}
