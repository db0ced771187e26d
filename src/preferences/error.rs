//! Preference persistence error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// Reading or writing the preferences file failed.
    #[error("設定ファイルの読み書きに失敗しました ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preferences file is not valid JSON.
    #[error("設定ファイルの形式が不正です ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No ringtone with the given title exists.
    #[error("着信音が見つかりません: {0}")]
    UnknownRingtone(String),
}

impl PreferencesError {
    /// Returns true if the file exists but could not be understood.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io { .. } => "設定ディレクトリの権限を確認してください",
            Self::Parse { .. } => "設定ファイルを削除すると既定値に戻ります",
            Self::UnknownRingtone(_) => "`countdown ringtones` で一覧を確認してください",
        }
    }
}
