use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN, TEXT_MUTED};
use crate::action::Action;
use crate::state::BrowseMode;

pub const SEARCH_PLACEHOLDER: &str = "Search Pokemon by name";

/// Query field plus the Search / Back / collection labels.
#[derive(Default)]
pub struct SearchBar;

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub editing: bool,
    pub loading: bool,
    pub mode: BrowseMode,
    pub collection_visible: bool,
    pub is_focused: bool,
}

/// Label of the collection toggle for the current view.
pub fn toggle_label(collection_visible: bool) -> &'static str {
    if collection_visible {
        "Go Catch More Pokemon"
    } else {
        "Caught Pokemon"
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.editing {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) => Some(Action::SearchInput(ch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.editing {
            Style::default().fg(ACCENT_TEAL)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title("SEARCH")
            .border_style(border)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut labels = vec![Span::styled("[/] Search", label_style())];
        if props.mode == BrowseMode::Search {
            labels.push(Span::raw("  "));
            labels.push(Span::styled("[b] Back", label_style()));
        }
        labels.push(Span::raw("  "));
        labels.push(Span::styled(
            format!("[Tab] {}", toggle_label(props.collection_visible)),
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        ));
        let labels_width = labels.iter().map(|span| span.width() as u16).sum::<u16>();

        let chunks = Layout::horizontal([
            Constraint::Min(1),
            Constraint::Length(labels_width.saturating_add(1)),
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(query_line(&props)), chunks[0]);
        frame.render_widget(
            Paragraph::new(Line::from(labels)).alignment(Alignment::Right),
            chunks[1],
        );
    }
}

fn label_style() -> Style {
    Style::default().fg(ACCENT_TEAL)
}

fn query_line(props: &SearchBarProps<'_>) -> Line<'static> {
    let mut spans = Vec::new();
    if props.query.is_empty() && !props.editing {
        spans.push(Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(TEXT_MUTED)));
    } else {
        spans.push(Span::styled(
            props.query.to_string(),
            Style::default().fg(TEXT_MAIN),
        ));
    }
    if props.editing {
        spans.push(Span::styled(
            "_",
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    if props.loading {
        spans.push(Span::styled("  searching...", Style::default().fg(ACCENT_GOLD)));
    }
    Line::from(spans)
}
