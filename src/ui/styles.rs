use ratatui::style::{Color, Modifier, Style};

use crate::types::TimerPhase;

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row / focused picker style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Countdown display style per phase
pub fn display_style(phase: TimerPhase) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match phase {
        TimerPhase::Idle => base.fg(Color::Gray),
        TimerPhase::Running => base.fg(Color::Magenta),
        TimerPhase::Paused => base.fg(Color::Yellow),
        TimerPhase::Finished => base.fg(Color::Red),
    }
}

/// Bright half of the ringing pulse
pub fn pulse_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Progress gauge
pub fn gauge_style() -> Style {
    Style::default().fg(Color::Cyan).bg(Color::Black)
}

/// Enabled transport button
pub fn enabled_button_style() -> Style {
    Style::default()
        .fg(Color::LightGreen)
        .add_modifier(Modifier::BOLD)
}

/// Disabled transport button
pub fn disabled_button_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Key hint text
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Transient notice line
pub fn notice_style() -> Style {
    Style::default().fg(Color::Yellow)
}
