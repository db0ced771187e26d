//! Command definitions for the countdown CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{PickedDuration, MAX_HOURS, MAX_MINUTES, MAX_SECONDS};

// ============================================================================
// CLI Structure
// ============================================================================

/// Countdown timer with alert sound, vibration and desktop notification
#[derive(Parser, Debug)]
#[command(
    name = "countdown",
    version,
    about = "ターミナルで動くカウントダウンタイマー",
    long_about = "時間を設定してカウントダウンを開始します。\n\
                  終了時に着信音・バイブレーション（端末ベル）・デスクトップ通知でお知らせします。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preferences file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub prefs_file: Option<PathBuf>,

    /// Directory containing bundled ringtone assets
    #[arg(long, global = true, value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Write logs to this file while the terminal UI is running
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the interactive timer
    Run(RunArgs),

    /// List available ringtones
    Ringtones,

    /// Select the alert ringtone by title
    Select {
        /// Ringtone title as shown by `ringtones`
        title: String,
    },

    /// Turn alert vibration on or off
    Vibration {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Play a ringtone once
    Preview {
        /// Ringtone title as shown by `ringtones`
        title: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// On/off switch argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Initial hours (0-23)
    #[arg(
        short = 'H',
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..i64::from(MAX_HOURS))
    )]
    pub hours: u32,

    /// Initial minutes (0-59)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..i64::from(MAX_MINUTES))
    )]
    pub minutes: u32,

    /// Initial seconds (0-59)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..i64::from(MAX_SECONDS))
    )]
    pub seconds: u32,

    /// Do not vibrate when the timer ends (this run only)
    #[arg(long)]
    pub no_vibration: bool,
}

impl RunArgs {
    /// The initial picker value.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is out of range.
    pub fn picked(&self) -> Result<PickedDuration, String> {
        PickedDuration::new(self.hours, self.minutes, self.seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
