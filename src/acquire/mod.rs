// Transcript acquisition
//
// Strategies run in order and the first one producing a transcript wins:
// - Captions: a published caption track, no audio download
// - Speech: audio download plus speech recognition

pub mod captions;
pub mod speech;

use async_trait::async_trait;
use tracing::{debug, info};

pub use captions::*;
pub use speech::*;

use crate::error::{Result, ScriptError};
use crate::media::VideoMetadata;
use crate::transcript::Transcript;
use crate::video::VideoRef;

/// Everything a strategy may look at for one video
#[derive(Debug, Clone)]
pub struct AcquisitionContext {
    pub video: VideoRef,
    pub metadata: VideoMetadata,
    /// Caption languages in order of preference
    pub preferred_languages: Vec<String>,
}

/// One way of obtaining a transcript
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` hands over to the next strategy; an error stops the chain
    async fn acquire(&self, context: &AcquisitionContext) -> Result<Option<Transcript>>;
}

pub struct TranscriptAcquirer {
    strategies: Vec<Box<dyn TranscriptStrategy>>,
}

impl TranscriptAcquirer {
    pub fn new(strategies: Vec<Box<dyn TranscriptStrategy>>) -> Self {
        Self { strategies }
    }

    pub async fn acquire(&self, context: &AcquisitionContext) -> Result<Transcript> {
        for strategy in &self.strategies {
            debug!("Trying {} strategy for {}", strategy.name(), context.video);
            if let Some(transcript) = strategy.acquire(context).await? {
                info!("Transcript obtained from {}", transcript.source);
                return Ok(transcript);
            }
        }

        Err(ScriptError::NoTranscript(context.video.id().to_string()))
    }
}
