use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info};

use crate::config::PlayerConfig;
use crate::error::{Result, ScriptError};

/// A launched player process. Dropping the handle leaves the process running.
#[derive(Debug)]
pub struct PlaybackHandle {
    pub pid: u32,
    pub stream_url: String,
    child: Child,
}

impl PlaybackHandle {
    /// Block until the player exits
    pub fn wait(mut self) -> Result<ExitStatus> {
        self.child
            .wait()
            .map_err(|e| ScriptError::Playback(format!("Failed to wait for player: {}", e)))
    }
}

/// Audio-only playback of a stream URL
pub trait AudioPlayer: Send + Sync {
    /// Spawn the player and return without waiting for it
    fn launch(&self, stream_url: &str) -> Result<PlaybackHandle>;
}

/// Player backed by ffplay
pub struct FfplayPlayer {
    config: PlayerConfig,
}

impl FfplayPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }
}

impl AudioPlayer for FfplayPlayer {
    fn launch(&self, stream_url: &str) -> Result<PlaybackHandle> {
        let binary = resolve_player_binary(&self.config);
        debug!("Launching {} {:?} <stream>", binary.display(), self.config.args);

        let child = Command::new(&binary)
            .args(&self.config.args)
            .arg(stream_url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ScriptError::Playback(format!(
                    "Player executable '{}' not found; install ffmpeg or set FFMPEG_PATH",
                    binary.display()
                )),
                _ => ScriptError::Playback(format!("Failed to launch {}: {}", binary.display(), e)),
            })?;

        let pid = child.id();
        info!("Audio playback started (pid {})", pid);

        Ok(PlaybackHandle {
            pid,
            stream_url: stream_url.to_string(),
            child,
        })
    }
}

/// Pick the player executable: an explicit path as configured, else the
/// ffmpeg directory (`bin/` first, then its root), else the bare name for a
/// PATH lookup.
pub fn resolve_player_binary(config: &PlayerConfig) -> PathBuf {
    let configured = Path::new(&config.binary_path);
    if configured.components().count() > 1 {
        return configured.to_path_buf();
    }

    if let Some(dir) = &config.ffmpeg_dir {
        let file_name = executable_name(&config.binary_path);
        for candidate in [dir.join("bin").join(&file_name), dir.join(&file_name)] {
            if candidate.is_file() {
                return candidate;
            }
        }
    }

    configured.to_path_buf()
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) && Path::new(name).extension().is_none() {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_dir(dir: Option<PathBuf>) -> PlayerConfig {
        PlayerConfig {
            ffmpeg_dir: dir,
            ..PlayerConfig::default()
        }
    }

    #[test]
    fn test_resolution_prefers_bin_directory() {
        let dir = tempfile::tempdir().unwrap();
        let name = executable_name("ffplay");
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin").join(&name), b"").unwrap();
        std::fs::write(dir.path().join(&name), b"").unwrap();

        let resolved = resolve_player_binary(&config_with_dir(Some(dir.path().to_path_buf())));
        assert_eq!(resolved, dir.path().join("bin").join(&name));
    }

    #[test]
    fn test_resolution_falls_back_to_root_then_path() {
        let dir = tempfile::tempdir().unwrap();
        let name = executable_name("ffplay");

        let resolved = resolve_player_binary(&config_with_dir(Some(dir.path().to_path_buf())));
        assert_eq!(resolved, PathBuf::from("ffplay"));

        std::fs::write(dir.path().join(&name), b"").unwrap();
        let resolved = resolve_player_binary(&config_with_dir(Some(dir.path().to_path_buf())));
        assert_eq!(resolved, dir.path().join(&name));
    }

    #[test]
    fn test_missing_player_is_playback_error() {
        let player = FfplayPlayer::new(PlayerConfig {
            binary_path: "definitely-not-ffplay".to_string(),
            ..PlayerConfig::default()
        });
        let err = player.launch("https://example.com/audio").unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Playback);
        assert!(err.to_string().contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_returns_without_waiting() {
        let player = FfplayPlayer::new(PlayerConfig {
            binary_path: "sleep".to_string(),
            ffmpeg_dir: None,
            args: vec![],
        });
        let started = std::time::Instant::now();
        let handle = player.launch("2").unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert!(handle.pid > 0);
        assert!(handle.wait().unwrap().success());
    }
}
