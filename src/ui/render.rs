//! Drawing with ratatui.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

use super::ringtones::RingtoneScreen;
use super::styles;
use super::view::TimerView;
use crate::app::{App, Screen};
use crate::sound::ringtone;
use crate::types::DurationField;

/// Draws the current screen.
pub fn draw(f: &mut Frame, app: &App) {
    let [body, footer] = split_footer(f.size());

    match app.screen() {
        Screen::Timer => render_timer(f, app, body),
        Screen::Ringtones(screen) => render_ringtones(f, app, screen, body),
    }
    render_footer(f, app, footer);
}

fn split_footer(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);
    [chunks[0], chunks[1]]
}

fn pane(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style())
        .title(Span::styled(title, styles::title_style()))
}

// ── Timer screen ─────────────────────────────────────────────────────

fn render_timer(f: &mut Frame, app: &App, area: Rect) {
    let view = TimerView::project(app.engine().get_state());

    let block = pane(" countdown ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let display_style = if app.animation().is_bright() {
        styles::pulse_style()
    } else {
        styles::display_style(view.phase)
    };
    let display = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", view.display),
        display_style,
    )))
    .alignment(Alignment::Center);
    f.render_widget(display, rows[1]);

    let gauge = Gauge::default()
        .gauge_style(styles::gauge_style())
        .ratio(view.progress)
        .label(format!("{:.0}%", view.progress * 100.0));
    f.render_widget(gauge, rows[2]);

    if view.pickers_visible {
        render_pickers(f, app, rows[3]);
    }

    render_buttons(f, &view, rows[4]);
    render_alert_settings(f, app, rows[5]);
}

fn render_pickers(f: &mut Frame, app: &App, area: Rect) {
    let picked = app.engine().get_state().picked;
    let fields = [
        (DurationField::Hours, "時"),
        (DurationField::Minutes, "分"),
        (DurationField::Seconds, "秒"),
    ];

    let mut spans = Vec::new();
    for (field, unit) in fields {
        let style = if field == app.focused_field() {
            styles::selected_style()
        } else {
            styles::default_style()
        };
        spans.push(Span::styled(format!(" {:02} ", picked.get(field)), style));
        spans.push(Span::raw(format!("{}  ", unit)));
    }

    let pickers = Paragraph::new(vec![
        Line::from(""),
        Line::from(spans),
        Line::from(Span::styled("←/→ 選択  ↑/↓ 変更", styles::hint_style())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(pickers, area);
}

fn button(label: &str, enabled: bool) -> Span<'_> {
    let style = if enabled {
        styles::enabled_button_style()
    } else {
        styles::disabled_button_style()
    };
    Span::styled(format!("[{}]", label), style)
}

fn render_buttons(f: &mut Frame, view: &TimerView, area: Rect) {
    let line = if view.show_stop_ringing {
        Line::from(Span::styled("[x: アラームを止める]", styles::pulse_style()))
    } else {
        Line::from(vec![
            button("開始", view.start_enabled),
            Span::raw(" "),
            button("一時停止", view.pause_enabled),
            Span::raw(" "),
            button("再開", view.resume_enabled),
            Span::raw(" "),
            button("停止", view.stop_enabled),
        ])
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_alert_settings(f: &mut Frame, app: &App, area: Rect) {
    let ringtone = app.preferences().get().selected_ringtone();
    let vibration = if app.vibration_enabled() { "オン" } else { "オフ" };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("着信音: ", styles::hint_style()),
            Span::styled(ringtone.title, styles::default_style()),
            Span::styled("  バイブレーション: ", styles::hint_style()),
            Span::styled(vibration, styles::default_style()),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

// ── Ringtone screen ──────────────────────────────────────────────────

fn render_ringtones(f: &mut Frame, app: &App, screen: &RingtoneScreen, area: Rect) {
    let block = pane(" 着信音 ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(inner);

    let selected = app.preferences().get().selected_ringtone();
    let items: Vec<ListItem> = ringtone::catalog()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let marker = if entry.id == selected.id { "✓" } else { " " };
            let style = if index == screen.cursor() {
                styles::selected_style()
            } else {
                styles::default_style()
            };
            ListItem::new(Line::from(format!(" {} {}", marker, entry.title))).style(style)
        })
        .collect();
    f.render_widget(List::new(items), rows[0]);

    let vibration = if app.preferences().get().vibration_enabled {
        "オン"
    } else {
        "オフ"
    };
    let toggle = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" バイブレーション: ", styles::hint_style()),
            Span::styled(vibration, styles::default_style()),
        ]),
    ]);
    f.render_widget(toggle, rows[1]);
}

// ── Footer ───────────────────────────────────────────────────────────

fn key_hints(screen: &Screen) -> &'static str {
    match screen {
        Screen::Timer => "space 開始/一時停止/再開  enter 切替  s 停止  x アラーム停止  r 着信音  q 終了",
        Screen::Ringtones(_) => "↑/↓ 移動  enter 選択  v バイブレーション  esc 戻る  q 終了",
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let notice = match app.notice() {
        Some(text) => Line::from(Span::styled(text.to_string(), styles::notice_style())),
        None => Line::from(""),
    };
    let lines = vec![
        notice,
        Line::from(Span::styled(key_hints(app.screen()), styles::hint_style())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
