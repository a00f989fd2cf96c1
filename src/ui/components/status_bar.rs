use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::state::AppState;
use moodlist::mood::MAX_PLAYLIST_ITEMS;
use super::super::theme::*;

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(state.confirm_create))
        .style(normal_style());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let first = if state.confirm_create {
        confirm_line(state)
    } else if let Some(summary) = state.summary() {
        Line::from(Span::styled(format!(" {summary}"), normal_style()))
    } else {
        Line::from(Span::styled(" 🎵 Filter your Spotify playlist by mood and create a new one instantly!", dim_style()))
    };

    let hints = if state.input.editing {
        vec![
            key_hint("Enter", "analyze"),
            key_hint("Tab", "mood"),
            key_hint("Esc", "done"),
            key_hint("Ctrl+U", "clear"),
        ]
    } else {
        vec![
            key_hint("i", "edit url"),
            key_hint("Enter", "analyze"),
            key_hint("m", "mood"),
            key_hint("c", "create playlist"),
            key_hint("?", "help"),
            key_hint("q", "quit"),
        ]
    };
    let second = Line::from(hints.into_iter().flatten().collect::<Vec<_>>());

    f.render_widget(Paragraph::new(vec![first, second]), inner);
}

fn confirm_line(state: &AppState) -> Line<'static> {
    let count = state
        .session
        .analysis
        .as_ref()
        .map(|a| a.selected().min(MAX_PLAYLIST_ITEMS))
        .unwrap_or(0);
    Line::from(vec![
        Span::styled(format!(" 🎵 Create a playlist with {count} songs? "), hot_pink_style()),
        Span::styled("[y]", accent_style()),
        Span::styled(" yes  ", dim_style()),
        Span::styled("[n]", accent_style()),
        Span::styled(" no", dim_style()),
    ])
}

fn key_hint(key: &str, desc: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" [{key}] "), accent_style()),
        Span::styled(desc.to_string(), muted_style()),
    ]
}
