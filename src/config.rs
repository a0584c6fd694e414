//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::services::AlertConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "multi-timer")]
#[command(about = "Run several countdown timers side by side with a shared alert")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Maximum number of concurrent timers
    #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_timers: u16,

    /// Timers created at startup
    #[arg(long, default_value = "1")]
    pub initial_timers: u16,

    /// Sound file played when a timer finishes
    #[arg(long)]
    pub alert_sound: Option<PathBuf>,

    /// Program used to play the alert sound
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Program invoked with a vibration pattern name ("timer" or "general")
    #[arg(long)]
    pub haptic_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timers to create at startup, never more than the maximum
    pub fn startup_timers(&self) -> usize {
        usize::from(self.initial_timers.min(self.max_timers))
    }

    pub fn alert_config(&self) -> AlertConfig {
        AlertConfig {
            sound: self.alert_sound.clone(),
            player: self.player.clone(),
            haptic_command: self.haptic_command.clone(),
        }
    }
}
