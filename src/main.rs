//! Countdown Timer CLI
//!
//! Pick a duration, start the countdown and get alerted when it ends:
//! - Looping ringtone (bundled asset or synthesized system tone)
//! - Vibration pulse, rendered as the terminal bell
//! - Desktop notification as a fallback channel

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::time::{sleep, Duration, Instant};

use countdown::app::{run_tui, App};
use countdown::cli::{Cli, Commands, Display, RunArgs};
use countdown::notification::{
    DesktopNotificationCenter, LocalNotificationScheduler, NotificationScheduler,
};
use countdown::preferences::{PreferenceStore, PreferencesError};
use countdown::sound::{
    ringtone, AlertPlayer, AssetLibrary, RodioAlertPlayer, SoundSource, TerminalBell,
};

/// Longest a `preview` waits for playback to end.
const PREVIEW_LIMIT: Duration = Duration::from_secs(10);

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_tracing(&cli) {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Returns true if the command opens the terminal UI.
fn is_interactive(cli: &Cli) -> bool {
    matches!(cli.command, None | Some(Commands::Run(_)))
}

/// Initializes the tracing subscriber for logging.
///
/// The terminal UI owns stdout, so while it runs logs go to `--log-file`
/// or nowhere.
fn init_tracing(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    if !is_interactive(cli) {
        builder.with_writer(io::stderr).init();
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("ログファイルを作成できません: {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(io::sink).init();
    }

    Ok(())
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let library = cli
        .assets_dir
        .clone()
        .map(AssetLibrary::new)
        .unwrap_or_default();
    let prefs_path = cli.prefs_file.clone().or_else(PreferenceStore::default_path);

    tracing::info!("Assets: {}", library.dir().display());

    match cli.command {
        Some(Commands::Run(args)) => run(args, prefs_path, library).await?,
        None => run(RunArgs::default(), prefs_path, library).await?,
        Some(Commands::Ringtones) => {
            let store = PreferenceStore::load_or_default(prefs_path);
            Display::show_ringtones(store.get(), &library);
        }
        Some(Commands::Select { title }) => {
            let mut store = load_store(prefs_path)?;
            let selected = store.select_ringtone(&title)?;
            Display::show_select_success(selected);
        }
        Some(Commands::Vibration { state }) => {
            let mut store = load_store(prefs_path)?;
            store.set_vibration_enabled(state.is_on())?;
            Display::show_vibration_success(state.is_on());
        }
        Some(Commands::Preview { title }) => preview(&title, library).await?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Loads the preference file for editing. Unlike the UI, a corrupt file is
/// an error here rather than being silently replaced.
fn load_store(path: Option<PathBuf>) -> Result<PreferenceStore> {
    let path = path.context("設定ディレクトリが見つかりません。--prefs-file で指定してください")?;
    PreferenceStore::load(path).map_err(|e| anyhow::anyhow!("{} ({})", e, e.suggestion()))
}

/// Opens the interactive timer.
async fn run(args: RunArgs, prefs_path: Option<PathBuf>, library: AssetLibrary) -> Result<()> {
    let picked = args.picked().map_err(anyhow::Error::msg)?;
    let preferences = PreferenceStore::load_or_default(prefs_path);

    let notifier: Arc<dyn NotificationScheduler> = Arc::new(LocalNotificationScheduler::new(
        Arc::new(DesktopNotificationCenter::new(library.clone())),
    ));
    let player: Arc<dyn AlertPlayer> =
        Arc::new(RodioAlertPlayer::new(library, Arc::new(TerminalBell)));

    let app = App::new(picked, preferences, player, notifier, args.no_vibration);
    run_tui(app).await
}

/// Plays a ringtone once and waits for it to end.
async fn preview(title: &str, library: AssetLibrary) -> Result<()> {
    let selected = ringtone::find_by_title(title)
        .ok_or_else(|| PreferencesError::UnknownRingtone(title.to_string()))?;

    Display::show_preview(selected, &SoundSource::for_ringtone(selected, &library));

    let player = RodioAlertPlayer::new(library, Arc::new(TerminalBell));
    player.preview(selected)?;

    let deadline = Instant::now() + PREVIEW_LIMIT;
    while player.is_playing() && Instant::now() < deadline {
        sleep(Duration::from_millis(100)).await;
    }
    player.stop_all();

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_is_interactive() {
        let cli = Cli::parse_from(["countdown"]);
        assert!(is_interactive(&cli));
    }

    #[test]
    fn test_run_is_interactive() {
        let cli = Cli::parse_from(["countdown", "run", "--minutes", "5"]);
        assert!(is_interactive(&cli));
    }

    #[test]
    fn test_preference_commands_are_not_interactive() {
        for args in [
            vec!["countdown", "ringtones"],
            vec!["countdown", "select", "Bell"],
            vec!["countdown", "vibration", "on"],
            vec!["countdown", "preview", "Bell"],
        ] {
            let cli = Cli::parse_from(args);
            assert!(!is_interactive(&cli));
        }
    }

    #[test]
    fn test_load_store_without_path() {
        assert!(load_store(None).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
