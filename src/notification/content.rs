//! Notification content construction.
//!
//! This module provides a builder for the "timer done" notification record
//! with a fluent API.

/// Identifier of the single pending end-of-timer notification.
pub const TIMER_DONE_ID: &str = "countdown.timer-done";

/// Fixed notification title.
pub const TIMER_DONE_TITLE: &str = "タイマー終了";

/// Fixed notification body.
pub const TIMER_DONE_BODY: &str = "設定した時間になりました";

/// Application name reported to the notification service.
pub const APP_NAME: &str = "countdown";

/// The sound a notification asks the desktop to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationSound {
    /// The platform default notification sound
    Default,
    /// A bundled asset, by file name
    Named(String),
}

/// A notification record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub sound: NotificationSound,
}

impl NotificationContent {
    /// The end-of-timer notification, optionally carrying a bundled sound.
    #[must_use]
    pub fn timer_done(sound_asset: Option<&str>) -> Self {
        let builder = NotificationContentBuilder::new(TIMER_DONE_ID)
            .title(TIMER_DONE_TITLE)
            .body(TIMER_DONE_BODY);

        match sound_asset {
            Some(name) => builder.sound(name),
            None => builder,
        }
        .build()
    }
}

/// Builder for constructing notification content.
#[derive(Debug, Clone)]
pub struct NotificationContentBuilder {
    content: NotificationContent,
}

impl NotificationContentBuilder {
    /// Creates a builder for a notification with the given identifier.
    #[must_use]
    pub fn new(identifier: &str) -> Self {
        Self {
            content: NotificationContent {
                identifier: identifier.to_string(),
                title: String::new(),
                body: String::new(),
                sound: NotificationSound::Default,
            },
        }
    }

    /// Sets the notification title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.content.title = title.to_string();
        self
    }

    /// Sets the notification body text.
    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.content.body = body.to_string();
        self
    }

    /// Sets a named bundled sound.
    #[must_use]
    pub fn sound(mut self, name: &str) -> Self {
        self.content.sound = NotificationSound::Named(name.to_string());
        self
    }

    /// Builds the content.
    #[must_use]
    pub fn build(self) -> NotificationContent {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_done_default_sound() {
        let content = NotificationContent::timer_done(None);
        assert_eq!(content.identifier, TIMER_DONE_ID);
        assert_eq!(content.title, TIMER_DONE_TITLE);
        assert_eq!(content.body, TIMER_DONE_BODY);
        assert_eq!(content.sound, NotificationSound::Default);
    }

    #[test]
    fn test_timer_done_named_sound() {
        let content = NotificationContent::timer_done(Some("bell.wav"));
        assert_eq!(content.sound, NotificationSound::Named("bell.wav".to_string()));
    }

    #[test]
    fn test_builder() {
        let content = NotificationContentBuilder::new("id")
            .title("t")
            .body("b")
            .build();
        assert_eq!(content.identifier, "id");
        assert_eq!(content.title, "t");
        assert_eq!(content.body, "b");
        assert_eq!(content.sound, NotificationSound::Default);
    }
}
