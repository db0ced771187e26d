//! Notification system error types.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to deliver a notification to the desktop.
    #[error("通知の送信に失敗しました: {0}")]
    SendFailed(String),

    /// No async runtime is available to hold the delayed notification.
    #[error("通知スケジューラが利用できません: {0}")]
    SchedulerUnavailable(String),

    /// Notifications were not permitted or no notification service exists.
    #[error("通知センターが利用できません")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if the error means notifications are off for this session.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotAvailable | Self::SchedulerUnavailable(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "通知センターを確認してください",
            Self::SchedulerUnavailable(_) => "アプリケーションを再起動してください",
            Self::NotAvailable => "デスクトップの通知設定を確認してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotificationError::NotAvailable;
        assert_eq!(err.to_string(), "通知センターが利用できません");

        let err = NotificationError::SendFailed("dbus".to_string());
        assert!(err.to_string().contains("dbus"));
    }

    #[test]
    fn test_is_unavailable() {
        assert!(NotificationError::NotAvailable.is_unavailable());
        assert!(NotificationError::SchedulerUnavailable("x".into()).is_unavailable());
        assert!(!NotificationError::SendFailed("x".into()).is_unavailable());
    }

    #[test]
    fn test_suggestion() {
        assert!(NotificationError::NotAvailable.suggestion().contains("通知設定"));
    }
}
