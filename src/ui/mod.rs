pub mod components;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::state::AppState;
use self::theme::*;
use self::components::{
    analyze::render_analyze,
    help::render_help,
    sidebar::render_sidebar,
    status_bar::render_status_bar,
};

/// Root render function, called every frame
pub fn render(f: &mut Frame, state: &AppState) {
    let size = f.area();

    // ── Outer layout: content + status bar ───────────────────────────────
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // top: sidebar + main
            Constraint::Length(4), // bottom: status bar
        ])
        .split(size);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(28), // sidebar
            Constraint::Min(0),     // main content
        ])
        .split(main_chunks[0]);

    render_sidebar(f, top_chunks[0], state);
    render_analyze(f, top_chunks[1], state);
    render_status_bar(f, main_chunks[1], state);

    // ── Auth screen overlay (if not authenticated) ────────────────────────
    if !state.is_authenticated {
        render_auth_overlay(f, size, state);
    }

    if state.show_help {
        render_help(f, size, state);
    }

    if let Some(ref notif) = state.notification {
        render_notification(f, size, notif.is_error, &notif.message);
    }
}

fn render_auth_overlay(f: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(70, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(" 🎵 moodlist — Spotify Login ", title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(border_style(true))
        .style(normal_style().bg(BG_ALT));

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let lines = if let Some(ref url) = state.auth_url {
        vec![
            Line::from(Span::raw("")),
            Line::from(Span::styled("  Opening browser for Spotify login...", accent_style())),
            Line::from(Span::raw("")),
            Line::from(Span::styled("  If the browser didn't open, visit:", dim_style())),
            Line::from(Span::raw("")),
            Line::from(Span::styled(format!("  {url}"), hot_pink_style())),
            Line::from(Span::raw("")),
            Line::from(Span::styled("  Waiting for authorization...", dim_style())),
        ]
    } else {
        vec![
            Line::from(Span::raw("")),
            Line::from(Span::styled("  Connecting to Spotify...", accent_style())),
        ]
    };

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(ratatui::widgets::Wrap { trim: false }),
        inner,
    );
}

fn render_notification(f: &mut Frame, area: Rect, is_error: bool, message: &str) {
    let toast_width = (message.width().min(60) as u16 + 6).min(area.width);
    let toast_area = Rect {
        x: area.width.saturating_sub(toast_width + 2),
        y: area.height.saturating_sub(8),
        width: toast_width,
        height: 3,
    };

    f.render_widget(Clear, toast_area);

    let style = if is_error { error_style() } else { success_style() };
    let icon = if is_error { "✖ " } else { "✔ " };

    let para = Paragraph::new(Line::from(vec![
        Span::styled(icon, style),
        Span::styled(truncate(message, 60), style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style),
    )
    .alignment(Alignment::Left);

    f.render_widget(para, toast_area);
}

/// Cuts `s` to at most `max` terminal columns, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
