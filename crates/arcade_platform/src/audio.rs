//! Fire-and-forget WAV playback through the platform's stock command-line
//! player.
//!
//! No handle is given back to the caller and nothing is mixed or queued:
//! overlapping calls simply overlap. The trigger keeps the spawned player
//! processes so `stop` can end all of them at once.

use std::path::Path;
use std::process::{Child, Command, Stdio};

use arcade_core::ArcadeError;

#[derive(Default)]
pub struct AudioTrigger {
    players: Vec<Child>,
}

impl AudioTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, path: &Path) -> Result<(), ArcadeError> {
        self.reap();
        if !path.is_file() {
            return Err(ArcadeError::Audio(format!(
                "sound file '{}' not found",
                path.display()
            )));
        }
        let child = player_command(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ArcadeError::Audio(format!("cannot start player for '{}': {e}", path.display()))
            })?;
        log::debug!("Playing '{}' (pid {})", path.display(), child.id());
        self.players.push(child);
        Ok(())
    }

    /// Best-effort halt of every sound started by `play`.
    pub fn stop(&mut self) -> Result<(), ArcadeError> {
        let mut failures = 0;
        for mut child in self.players.drain(..) {
            if let Ok(Some(_)) = child.try_wait() {
                continue;
            }
            if let Err(e) = child.kill() {
                log::warn!("Could not stop player pid {}: {e}", child.id());
                failures += 1;
            }
            let _ = child.wait();
        }
        if failures > 0 {
            return Err(ArcadeError::Audio(format!(
                "{failures} player process(es) could not be stopped"
            )));
        }
        Ok(())
    }

    /// Number of player processes that may still be running.
    pub fn active_players(&mut self) -> usize {
        self.reap();
        self.players.len()
    }

    fn reap(&mut self) {
        self.players
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

#[cfg(target_os = "windows")]
fn player_command(path: &Path) -> Command {
    let quoted = path.display().to_string().replace('\'', "''");
    let mut cmd = Command::new("powershell");
    cmd.args([
        "-NoProfile",
        "-NonInteractive",
        "-Command",
        &format!("(New-Object Media.SoundPlayer '{quoted}').PlaySync()"),
    ]);
    cmd
}

#[cfg(target_os = "macos")]
fn player_command(path: &Path) -> Command {
    let mut cmd = Command::new("afplay");
    cmd.arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn player_command(path: &Path) -> Command {
    let mut cmd = Command::new("aplay");
    cmd.arg("-q").arg(path);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_audio_error() {
        let mut audio = AudioTrigger::new();
        let err = audio
            .play(Path::new("/no/such/sound.wav"))
            .expect_err("missing file should fail");
        assert!(matches!(err, ArcadeError::Audio(_)));
        assert_eq!(audio.active_players(), 0);
    }

    #[test]
    fn stop_with_nothing_playing_is_ok() {
        let mut audio = AudioTrigger::new();
        audio.stop().expect("nothing to stop");
    }

    #[test]
    fn player_command_passes_path() {
        let cmd = player_command(Path::new("jump.wav"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.iter().any(|a| a.contains("jump.wav")));
    }
}
