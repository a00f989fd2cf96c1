use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::state::AppState;
use super::super::{centered_rect, theme::*};

pub fn render_help(f: &mut Frame, area: Rect, _state: &AppState) {
    let popup_area = centered_rect(60, 70, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" ❓ Keybindings ", title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(border_style(true))
        .style(normal_style());

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(inner);

    let left = vec![
        section("Playlist"),
        Line::from(Span::raw("")),
        key_line("i / /", "Edit playlist URL"),
        key_line("Enter / a", "Analyze playlist"),
        key_line("m / Tab", "Switch Happy / Sad"),
        key_line("c", "Create playlist"),
        key_line("y / n", "Confirm / cancel"),
        key_line("o", "Open new playlist"),
        key_line("r", "Start over"),
    ];

    let right = vec![
        section("Navigation"),
        Line::from(Span::raw("")),
        key_line("↑ / k", "Move up"),
        key_line("↓ / j", "Move down"),
        key_line("Esc / b", "Back"),
        key_line("[1]", "Mood filter"),
        key_line("[2]", "All matches"),
        Line::from(Span::raw("")),
        key_line("?", "Toggle this help"),
        key_line("q", "Quit"),
    ];

    f.render_widget(Paragraph::new(left), cols[0]);
    f.render_widget(Paragraph::new(right), cols[1]);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {title}"), hot_pink_style()))
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", muted_style()),
        Span::styled(format!("{key:<10}"), accent_style()),
        Span::styled(desc.to_string(), normal_style()),
    ])
}
