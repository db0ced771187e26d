//! Ringtone selection screen state.

use crate::sound::ringtone::{self, Ringtone};

/// Cursor over the ringtone catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingtoneScreen {
    cursor: usize,
}

impl RingtoneScreen {
    /// Opens the screen with the cursor on `selected`.
    #[must_use]
    pub fn open(selected: &Ringtone) -> Self {
        Self {
            cursor: ringtone::index_of(selected),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn highlighted(&self) -> &'static Ringtone {
        let catalog = ringtone::catalog();
        &catalog[self.cursor.min(catalog.len() - 1)]
    }

    /// Moves the cursor, wrapping at both ends.
    pub fn move_by(&mut self, delta: i32) {
        let len = i64::try_from(ringtone::catalog().len()).unwrap_or(i64::MAX);
        let next = (i64::try_from(self.cursor).unwrap_or(0) + i64::from(delta)).rem_euclid(len);
        self.cursor = usize::try_from(next).unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_on_selected() {
        let bell = ringtone::find_by_title("Bell").unwrap();
        let screen = RingtoneScreen::open(bell);
        assert_eq!(screen.highlighted(), bell);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut screen = RingtoneScreen::open(ringtone::default_ringtone());
        assert_eq!(screen.cursor(), 0);

        screen.move_by(-1);
        assert_eq!(screen.cursor(), ringtone::catalog().len() - 1);

        screen.move_by(1);
        assert_eq!(screen.cursor(), 0);
    }
}
