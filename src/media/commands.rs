use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, ScriptError};

/// Maps a failure message onto the error category of the calling stage
pub type ErrorStage = fn(String) -> ScriptError;

/// External tool invocation: binary, arguments and a short description
/// used in logs and error messages.
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    pub fn audio_sample_rate(self, rate: u32) -> Self {
        self.arg("-ar").arg(rate.to_string())
    }

    pub fn audio_channels(self, channels: u32) -> Self {
        self.arg("-ac").arg(channels.to_string())
    }

    /// Run to completion and return stdout. Spawn failures and non-zero
    /// exits are reported through `stage` with stderr attached.
    pub async fn execute(&self, stage: ErrorStage) -> Result<String> {
        debug!("Executing command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| stage(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(stage(format!("{} failed: {}", self.description, stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Blocking availability probe; returns the first line the tool prints.
    pub fn probe(&self) -> Result<String> {
        let output = std::process::Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ScriptError::Config(format!("{} not found: {}", self.binary_path, e)))?;

        if !output.status.success() {
            return Err(ScriptError::Config(format!(
                "{} exited with {}",
                self.description, output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let first_line = stdout
            .lines()
            .chain(stderr.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("available")
            .to_string();
        Ok(first_line)
    }
}

/// Builder for ffmpeg invocations
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// 16 kHz mono PCM, the input format whisper.cpp expects
    pub fn whisper_wav<P: AsRef<Path>>(&self, audio_path: P, wav_path: P) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Audio conversion")
            .input(audio_path)
            .no_video()
            .audio_codec("pcm_s16le")
            .audio_sample_rate(16000)
            .audio_channels(1)
            .overwrite()
            .output(wav_path)
    }

    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "ffmpeg version check").arg("-version")
    }
}
