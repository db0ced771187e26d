//! Display utilities for the countdown CLI.
//!
//! This module provides formatted output for:
//! - The ringtone catalog
//! - Preference changes
//! - Error messages

use crate::preferences::Preferences;
use crate::sound::{ringtone, AssetLibrary, Ringtone, SoundSource};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the ringtone catalog, marking the selected entry.
    pub fn show_ringtones(preferences: &Preferences, library: &AssetLibrary) {
        println!("着信音一覧");
        println!("─────────────────────────────");
        let selected = preferences.selected_ringtone();
        for entry in ringtone::catalog() {
            println!("{}", Self::format_ringtone(entry, selected, library));
        }
        println!();
        println!(
            "バイブレーション: {}",
            Self::on_off(preferences.vibration_enabled)
        );
    }

    /// Shows a success message for ringtone selection.
    pub fn show_select_success(ringtone: &Ringtone) {
        println!("* 着信音を「{}」に設定しました", ringtone.title);
    }

    /// Shows a success message for the vibration toggle.
    pub fn show_vibration_success(enabled: bool) {
        println!("* バイブレーションを{}にしました", Self::on_off(enabled));
    }

    /// Shows which sound a preview is playing.
    pub fn show_preview(ringtone: &Ringtone, source: &SoundSource) {
        match source {
            SoundSource::Asset { name, .. } => {
                println!("> 「{}」を再生しています ({})", ringtone.title, name);
            }
            SoundSource::System { id } => {
                println!("> 「{}」を再生しています (システム音 {})", ringtone.title, id);
            }
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Formats one catalog line.
    fn format_ringtone(entry: &Ringtone, selected: &Ringtone, library: &AssetLibrary) -> String {
        let marker = if entry.id == selected.id { "*" } else { " " };
        let source = match SoundSource::for_ringtone(entry, library) {
            SoundSource::Asset { name, .. } => name,
            SoundSource::System { id } => format!("システム音 {}", id),
        };
        format!("{} {:<8} {}", marker, entry.title, source)
    }

    fn on_off(enabled: bool) -> &'static str {
        if enabled {
            "オン"
        } else {
            "オフ"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_selected_system_tone() {
            let library = AssetLibrary::new("/nonexistent");
            let default = ringtone::default_ringtone();
            let line = Display::format_ringtone(default, default, &library);
            assert!(line.starts_with('*'));
            assert!(line.contains("Default"));
            assert!(line.contains("システム音 1005"));
        }

        #[test]
        fn test_format_missing_asset_falls_back() {
            let library = AssetLibrary::new("/nonexistent");
            let bell = ringtone::find_by_title("Bell").unwrap();
            let line = Display::format_ringtone(bell, ringtone::default_ringtone(), &library);
            assert!(line.starts_with(' '));
            assert!(line.contains("システム音 1013"));
        }

        #[test]
        fn test_format_present_asset() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("bell.wav"), b"RIFF").unwrap();
            let library = AssetLibrary::new(dir.path());

            let bell = ringtone::find_by_title("Bell").unwrap();
            let line = Display::format_ringtone(bell, bell, &library);
            assert!(line.contains("bell.wav"));
        }

        #[test]
        fn test_on_off() {
            assert_eq!(Display::on_off(true), "オン");
            assert_eq!(Display::on_off(false), "オフ");
        }
    }
}
