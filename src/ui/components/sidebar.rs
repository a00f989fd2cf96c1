use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use strum::IntoEnumIterator;

use crate::app::state::{ActiveScreen, AppState};
use moodlist::mood::Mood;
use super::super::{theme::*, truncate};

const NAV_ITEMS: &[(&str, &str, ActiveScreen)] = &[
    ("1", "🎯  Mood filter", ActiveScreen::Filtered),
    ("2", "📋  All matches", ActiveScreen::AllMatches),
];

fn mood_desc(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "energetic, positive, upbeat",
        Mood::Sad => "low energy, low valence, slow",
    }
}

pub fn render_sidebar(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(Span::styled(" 🎵 moodlist ", title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(false))
        .style(normal_style());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tagline
            Constraint::Length(3), // nav items
            Constraint::Length(1), // separator
            Constraint::Length(6), // mood selector
            Constraint::Length(1), // separator
            Constraint::Min(0),    // session
        ])
        .split(inner);

    let tagline = Paragraph::new(Line::from(vec![
        Span::styled(" filter by ", dim_style()),
        Span::styled("mood", hot_pink_style()),
    ]));
    f.render_widget(tagline, chunks[0]);

    let items: Vec<ListItem> = NAV_ITEMS
        .iter()
        .map(|(key, label, screen)| {
            let is_active = state.active_screen == *screen;
            let prefix = if is_active { " ▶ " } else { "   " };
            let style = if is_active {
                Style::default().fg(BG).bg(HOT_PINK).add_modifier(Modifier::BOLD)
            } else {
                normal_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, if is_active { Style::default().fg(BG).bg(HOT_PINK) } else { muted_style() }),
                Span::styled(format!("[{key}] {label}"), style),
            ]))
        })
        .collect();
    f.render_widget(List::new(items), chunks[1]);

    render_separator(f, chunks[2]);
    render_mood_selector(f, chunks[3], state);
    render_separator(f, chunks[4]);
    render_session(f, chunks[5], state);
}

fn render_separator(f: &mut Frame, area: Rect) {
    let sep_width = area.width.saturating_sub(4) as usize;
    let sep = Paragraph::new(Line::from(Span::styled(
        format!("  {}", "─".repeat(sep_width)),
        muted_style(),
    )));
    f.render_widget(sep, area);
}

fn render_mood_selector(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = vec![Line::from(Span::styled("  Mood  [m]", accent_style()))];
    for mood in Mood::iter() {
        let is_sel = mood == state.mood;
        lines.push(Line::from(vec![
            Span::styled(if is_sel { "  ▶ " } else { "    " }, if is_sel { success_style() } else { muted_style() }),
            Span::styled(
                mood.to_string(),
                if is_sel { mood_style(mood).add_modifier(Modifier::BOLD) } else { dim_style() },
            ),
        ]));
        if is_sel {
            lines.push(Line::from(Span::styled(format!("      {}", mood_desc(mood)), muted_style())));
        }
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_session(f: &mut Frame, area: Rect, state: &AppState) {
    let width = area.width.saturating_sub(4) as usize;
    let session = &state.session;

    let mut lines = vec![
        Line::from(Span::styled("  Session", accent_style())),
        Line::from(vec![
            Span::styled("  id      ", muted_style()),
            Span::styled(session.id.clone(), dim_style()),
        ]),
        Line::from(vec![
            Span::styled("  songs   ", muted_style()),
            Span::styled(state.dataset_size.to_string(), dim_style()),
        ]),
    ];

    if let Some(at) = session.analyzed_at {
        lines.push(Line::from(vec![
            Span::styled("  run at  ", muted_style()),
            Span::styled(at.format("%H:%M:%S").to_string(), dim_style()),
        ]));
    }
    if let Some(ref a) = session.analysis {
        lines.push(Line::from(vec![
            Span::styled("  matched ", muted_style()),
            Span::styled(a.total().to_string(), normal_style()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  kept    ", muted_style()),
            Span::styled(a.selected().to_string(), mood_style(a.mood)),
        ]));
    }
    if let Some(ref url) = session.created_playlist_url {
        lines.push(Line::from(Span::raw("")));
        lines.push(Line::from(Span::styled("  🎧 New playlist [o]", success_style())));
        lines.push(Line::from(Span::styled(format!("  {}", truncate(url, width)), hot_pink_style())));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
