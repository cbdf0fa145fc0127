use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::acquire::{
    AcquisitionContext, CaptionStrategy, SpeechRecognitionStrategy, TranscriptAcquirer,
    TranscriptStrategy,
};
use crate::artifacts::{derive_stem, persist_artifacts, ArtifactPaths};
use crate::config::Config;
use crate::error::{FailureKind, Result, ScriptError};
use crate::media::{VideoSource, VideoSourceFactory};
use crate::player::{AudioPlayer, FfplayPlayer, PlaybackHandle};
use crate::setup::SetupManager;
use crate::transcribe::TranscriberFactory;
use crate::transcript::Transcript;
use crate::translate::{translate_text, Translator, TranslatorFactory};
use crate::video::VideoRef;

/// One pipeline invocation
#[derive(Debug, Clone, Default)]
pub struct ScriptRequest {
    pub url: String,
    /// Display title; names the output files when given
    pub title: Option<String>,
    /// Caption language tried before the configured ones
    pub language: Option<String>,
    pub translate: bool,
    /// Overrides `[output] directory`
    pub output_dir: Option<PathBuf>,
}

impl ScriptRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            translate: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptResult {
    pub video: VideoRef,
    pub stem: String,
    pub transcript: Transcript,
    pub translation: Option<String>,
    /// Set when translation was attempted and failed; the transcript is
    /// still persisted
    pub translation_error: Option<String>,
    pub artifacts: ArtifactPaths,
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Success(ScriptResult),
    Failure { kind: FailureKind, message: String },
}

impl From<ScriptError> for PipelineOutcome {
    fn from(error: ScriptError) -> Self {
        Self::Failure {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

pub struct Workflow {
    config: Config,
    source: Arc<dyn VideoSource>,
    acquirer: TranscriptAcquirer,
    translator: Box<dyn Translator>,
    player: Box<dyn AudioPlayer>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let source: Arc<dyn VideoSource> =
            Arc::from(VideoSourceFactory::create_source(config.fetcher.clone()));
        let transcriber = TranscriberFactory::create_transcriber(
            config.transcriber.clone(),
            SetupManager::new()?.models_dir(),
        );

        let strategies: Vec<Box<dyn TranscriptStrategy>> = vec![
            Box::new(CaptionStrategy::new(config.fetcher.clone())),
            Box::new(SpeechRecognitionStrategy::new(
                source.clone(),
                transcriber,
                config.transcriber.language.clone(),
            )),
        ];

        let translator = TranslatorFactory::create_translator(config.translate.clone())?;
        let player = Box::new(FfplayPlayer::new(config.player.clone()));

        Ok(Self::with_components(
            config,
            source,
            TranscriptAcquirer::new(strategies),
            translator,
            player,
        ))
    }

    pub fn with_components(
        config: Config,
        source: Arc<dyn VideoSource>,
        acquirer: TranscriptAcquirer,
        translator: Box<dyn Translator>,
        player: Box<dyn AudioPlayer>,
    ) -> Self {
        Self {
            config,
            source,
            acquirer,
            translator,
            player,
        }
    }

    /// Run the pipeline and fold every failure into the outcome
    pub async fn run(&self, request: &ScriptRequest) -> PipelineOutcome {
        match self.try_run(request).await {
            Ok(result) => PipelineOutcome::Success(result),
            Err(e) => {
                warn!("Pipeline failed: {}", e);
                e.into()
            }
        }
    }

    pub async fn try_run(&self, request: &ScriptRequest) -> Result<ScriptResult> {
        let video = VideoRef::parse(&request.url)?;
        info!("Processing video {}", video);

        // Step 1: metadata and caption inventory
        let metadata = self.source.metadata(&video).await?;

        // Step 2: captions, else speech recognition
        let context = AcquisitionContext {
            video: video.clone(),
            preferred_languages: self.preferred_languages(request.language.as_deref()),
            metadata,
        };
        let transcript = self.acquirer.acquire(&context).await?;

        // Step 3: translation, English only
        let (translation, translation_error) = if request.translate && transcript.is_english() {
            match self.translate(&transcript.text).await {
                Ok(text) => (Some(text), None),
                Err(e) => {
                    warn!("Translation failed, keeping the transcript: {}", e);
                    (None, Some(e.to_string()))
                }
            }
        } else {
            info!("Skipping translation (language: {})", transcript.language);
            (None, None)
        };

        // Step 4: artifacts
        let stem = derive_stem(
            request.title.as_deref(),
            context.metadata.title.as_deref(),
            video.id(),
        );
        let output_dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.output.directory.clone());
        let artifacts =
            persist_artifacts(&output_dir, &stem, &transcript.text, translation.as_deref()).await?;

        Ok(ScriptResult {
            video,
            stem,
            transcript,
            translation,
            translation_error,
            artifacts,
        })
    }

    async fn translate(&self, text: &str) -> Result<String> {
        let settings = &self.config.translate;
        translate_text(
            self.translator.as_ref(),
            text,
            &settings.source_language,
            &settings.target_language,
            settings.max_chunk_chars,
        )
        .await
    }

    fn preferred_languages(&self, requested: Option<&str>) -> Vec<String> {
        let configured = self.config.fetcher.caption_languages.iter().map(String::as_str);

        let mut languages: Vec<String> = Vec::new();
        for language in requested.into_iter().chain(configured) {
            let language = language.trim();
            if !language.is_empty() && !languages.iter().any(|l| l == language) {
                languages.push(language.to_string());
            }
        }
        languages
    }

    /// Start audio-only playback of a video without waiting for it to end
    pub async fn play(&self, url: &str) -> Result<PlaybackHandle> {
        let video = VideoRef::parse(url)?;
        let stream_url = self.source.audio_stream_url(&video).await?;
        info!("Playing audio stream of {}", video);
        self.player.launch(&stream_url)
    }
}
