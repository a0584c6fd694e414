//! Alert playback: a haptic pulse plus an audio cue when a timer finishes
//!
//! The alert is a single process-wide resource shared by every timer slot.
//! All failures are logged and swallowed so they never reach timer bookkeeping.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::Mutex,
};

use tokio::{
    process::{Child, Command},
    runtime::Handle,
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

/// Shared alert resource used by the coordinator.
///
/// Both calls must tolerate being issued redundantly and from several slots in
/// quick succession. `play_alert` on an already active alert restarts it.
pub trait AlertChannel: Send + Sync {
    fn play_alert(&self);
    fn stop_alert(&self);
}

/// Vibration pattern requested from the haptic command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    Timer,
    General,
}

impl HapticPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticPattern::Timer => "timer",
            HapticPattern::General => "general",
        }
    }
}

/// Where the alert sound and haptic pulse come from
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Sound file; `None` disables audio
    pub sound: Option<PathBuf>,
    /// Program that plays `sound`
    pub player: String,
    /// Program invoked with a pattern name; `None` disables haptics
    pub haptic_command: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sound: None,
            player: "paplay".to_string(),
            haptic_command: None,
        }
    }
}

/// Alert channel that drives external programs
#[derive(Debug)]
pub struct CommandAlert {
    config: AlertConfig,
    /// Sound file verified at construction; `None` when missing or unconfigured
    sound: Option<PathBuf>,
    playback: Mutex<Option<Child>>,
    haptic: Mutex<Option<JoinHandle<()>>>,
}

impl CommandAlert {
    /// Build the alert, checking the sound file up front so the tick path
    /// never touches the filesystem
    pub fn new(config: AlertConfig) -> Self {
        let sound = config.sound.as_deref().and_then(prepare_sound);
        Self {
            config,
            sound,
            playback: Mutex::new(None),
            haptic: Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn is_playing(&self) -> bool {
        match self.playback.lock() {
            Ok(mut playback) => playback
                .as_mut()
                .is_some_and(|child| matches!(child.try_wait(), Ok(None))),
            Err(_) => false,
        }
    }

    fn pulse_haptic(&self, runtime: &Handle) {
        let Some(command) = self.config.haptic_command.clone() else {
            return;
        };

        let task = runtime.spawn(async move {
            if let Err(e) = run_haptic(&command, HapticPattern::Timer).await {
                debug!("Primary vibration pattern failed: {}, trying fallback", e);
                if let Err(e) = run_haptic(&command, HapticPattern::General).await {
                    warn!("Vibration failed: {}", e);
                }
            }
        });

        match self.haptic.lock() {
            Ok(mut haptic) => {
                if let Some(previous) = haptic.replace(task) {
                    previous.abort();
                }
            }
            Err(e) => warn!("Failed to track haptic pulse: {}", e),
        }
    }

    fn restart_playback(&self) {
        let Some(sound) = self.sound.as_ref() else {
            return;
        };

        let mut playback = match self.playback.lock() {
            Ok(playback) => playback,
            Err(e) => {
                error!("Failed to lock alert playback: {}", e);
                return;
            }
        };

        if let Some(mut child) = playback.take() {
            debug!("Alert already playing, restarting");
            if let Err(e) = kill_if_running(&mut child) {
                warn!("Failed to stop previous alert sound: {}", e);
            }
        }

        match Command::new(&self.config.player)
            .arg(sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => *playback = Some(child),
            Err(e) => error!("Sound playback failed with {}: {}", self.config.player, e),
        }
    }
}

impl AlertChannel for CommandAlert {
    fn play_alert(&self) {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Cannot play alert outside the async runtime: {}", e);
                return;
            }
        };

        if self.config.sound.is_none() && self.config.haptic_command.is_none() {
            info!("Alert fired (no sound or haptic command configured)");
            return;
        }

        self.pulse_haptic(&runtime);
        self.restart_playback();
    }

    fn stop_alert(&self) {
        match self.playback.lock() {
            Ok(mut playback) => {
                if let Some(mut child) = playback.take() {
                    if let Err(e) = kill_if_running(&mut child) {
                        warn!("Stop alert sound failed: {}", e);
                    }
                }
            }
            Err(e) => warn!("Stop alert sound failed: {}", e),
        }

        match self.haptic.lock() {
            Ok(mut haptic) => {
                if let Some(task) = haptic.take() {
                    // Aborting drops the pending command, which kills its child
                    task.abort();
                }
            }
            Err(e) => warn!("Stop vibration failed: {}", e),
        }
    }
}

fn prepare_sound(path: &Path) -> Option<PathBuf> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            info!("Alert sound prepared: {}", path.display());
            Some(path.to_path_buf())
        }
        Ok(_) => {
            error!("Alert sound {} is not a file, audio disabled", path.display());
            None
        }
        Err(e) => {
            error!("Alert sound init failed for {}: {}, audio disabled", path.display(), e);
            None
        }
    }
}

fn kill_if_running(child: &mut Child) -> std::io::Result<()> {
    match child.try_wait()? {
        Some(_) => Ok(()),
        None => child.start_kill(),
    }
}

async fn run_haptic(command: &str, pattern: HapticPattern) -> Result<(), String> {
    let output = Command::new(command)
        .arg(pattern.as_str())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", command, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} {} failed: {}", command, pattern.as_str(), stderr));
    }

    Ok(())
}
