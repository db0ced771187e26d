//! Timer engine error types.

use thiserror::Error;

use crate::types::TimerPhase;

/// Errors returned by timer operations.
///
/// None of these change state: an invalid action is simply inert.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// The action is not valid from the current phase.
    #[error("{action}は{}状態では実行できません", phase_label(.phase))]
    InvalidTransition {
        action: &'static str,
        phase: TimerPhase,
    },

    /// Start was requested with a zero duration.
    #[error("時間が設定されていません")]
    ZeroDuration,

    /// The duration pickers cannot be edited in this phase.
    #[error("{}状態では時間を変更できません", phase_label(.0))]
    NotEditable(TimerPhase),

    /// The event receiver has been dropped.
    #[error("イベントの送信に失敗しました")]
    ChannelClosed,
}

fn phase_label(phase: &TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Idle => "停止",
        TimerPhase::Running => "実行中",
        TimerPhase::Paused => "一時停止",
        TimerPhase::Finished => "終了",
    }
}

impl TimerError {
    /// Returns true if the error only reflects a disabled control.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::ZeroDuration | Self::NotEditable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = TimerError::InvalidTransition {
            action: "一時停止",
            phase: TimerPhase::Idle,
        };
        assert_eq!(err.to_string(), "一時停止は停止状態では実行できません");
    }

    #[test]
    fn test_not_editable_display() {
        let err = TimerError::NotEditable(TimerPhase::Running);
        assert_eq!(err.to_string(), "実行中状態では時間を変更できません");
    }

    #[test]
    fn test_is_inert() {
        assert!(TimerError::ZeroDuration.is_inert());
        assert!(TimerError::NotEditable(TimerPhase::Finished).is_inert());
        assert!(!TimerError::ChannelClosed.is_inert());
    }
}
