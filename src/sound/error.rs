//! Sound system error types.
//!
//! Every variant is recoverable: callers fall back to a system tone or skip
//! audio entirely, so these errors are logged rather than shown.

use thiserror::Error;

/// Errors that can occur in the alert sound system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Bundled asset was not found in the assets directory.
    #[error("サウンドファイルが見つかりません: {0}")]
    AssetNotFound(String),

    /// Failed to decode the audio file.
    #[error("サウンドファイルのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// Failed to create a sink on the output stream.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the bundled asset.
    #[must_use]
    pub fn is_asset_error(&self) -> bool {
        matches!(self, Self::AssetNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if playback should fall back to the system tone.
    #[must_use]
    pub fn should_fallback_to_system(&self) -> bool {
        self.is_asset_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "オーディオデバイスを接続してください",
            Self::AssetNotFound(_) => "システムサウンドで再生を試みます",
            Self::DecodeError(_) => "サウンドファイルが破損している可能性があります",
            Self::StreamError(_) => "オーディオ設定を確認してください",
        }
    }
}
