use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::state::{ActiveScreen, AppState};
use super::super::{theme::*, truncate};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render_analyze(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // url input
            Constraint::Min(0),    // results
        ])
        .split(area);

    render_input(f, chunks[0], state);

    if let Some(ref busy) = state.busy {
        let frame = SPINNER[(state.tick as usize) % SPINNER.len()];
        let para = Paragraph::new(Line::from(vec![
            Span::styled(format!("  {frame} "), hot_pink_style()),
            Span::styled(busy.clone(), dim_style()),
        ]))
        .block(results_block(" Results ".to_string(), false));
        f.render_widget(para, chunks[1]);
        return;
    }

    render_results(f, chunks[1], state);
}

fn render_input(f: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.input.editing;
    let cursor = if focused && (state.tick / 5) % 2 == 0 { "│" } else { "" };
    let block = Block::default()
        .title(Span::styled(" 🔗 Public Spotify playlist URL ", title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(focused))
        .style(normal_style().bg(BG_ALT));

    let max = area.width.saturating_sub(5) as usize;
    let text = if state.input.text.is_empty() && !focused {
        Span::styled("Press [i] and paste a playlist link...", muted_style())
    } else {
        // keep the tail visible while typing a long link
        let chars: Vec<char> = state.input.text.chars().collect();
        let start = chars.len().saturating_sub(max);
        Span::styled(chars[start..].iter().collect::<String>(), accent_style())
    };

    let para = Paragraph::new(Line::from(vec![
        Span::styled(" ", muted_style()),
        text,
        Span::styled(cursor, hot_pink_style()),
    ]))
    .block(block);
    f.render_widget(para, area);
}

fn results_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(Span::styled(title, title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(focused))
        .style(normal_style().bg(BG))
}

fn render_results(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(ref analysis) = state.session.analysis else {
        let para = Paragraph::new(vec![
            Line::from(Span::styled("  Paste a playlist link, pick a mood and press", muted_style())),
            Line::from(Span::styled("  Enter to analyze the playlist!", accent_style())),
        ])
        .block(results_block(" Results ".to_string(), false));
        f.render_widget(para, area);
        return;
    };

    let tracks = state.visible_tracks();
    let title = match state.active_screen {
        ActiveScreen::Filtered => format!(" {} songs ({}) ", analysis.mood, tracks.len()),
        ActiveScreen::AllMatches => format!(" All matches ({}) ", tracks.len()),
    };

    if tracks.is_empty() {
        let msg = state.summary().unwrap_or_default();
        let para = Paragraph::new(Line::from(Span::styled(format!("  {msg}"), muted_style())))
            .block(results_block(title, false));
        f.render_widget(para, area);
        return;
    }

    let col = (area.width.saturating_sub(22) / 2) as usize;
    let rows: Vec<Row> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Row::new(vec![
                Cell::from(Span::styled(format!("{:>3}", i + 1), muted_style())),
                Cell::from(Span::styled(truncate(&t.track.singer, col), dim_style())),
                Cell::from(Span::styled(truncate(&t.track.song_name, col), normal_style())),
                Cell::from(Span::styled(t.mood.to_string(), mood_style(t.mood))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(40),
            Constraint::Percentage(45),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["  #", "Singer", "Song name", "Mood"]).style(header_style()))
    .block(results_block(title, true))
    .row_highlight_style(selected_style())
    .highlight_symbol("▶ ");

    let mut table_state = TableState::default().with_selected(Some(state.selected_row.min(tracks.len() - 1)));
    f.render_stateful_widget(table, area, &mut table_state);
}
