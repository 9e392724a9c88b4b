use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{Component, ACCENT_TEAL, BG_HIGHLIGHT, TEXT_DIM, TEXT_MAIN, TEXT_MUTED};
use crate::action::Action;
use crate::pagination::{page_window, PageItem};

/// `Prev … p-1 [p] p+1 … Next`
#[derive(Default)]
pub struct PaginationBar;

pub struct PaginationBarProps {
    pub current: u32,
    pub total: u32,
    pub loading: bool,
}

pub fn pagination_line(current: u32, total: u32) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, item) in page_window(current, total).into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(match item {
            PageItem::Prev { enabled } => Span::styled("< Prev", edge_style(enabled)),
            PageItem::Next { enabled } => Span::styled("Next >", edge_style(enabled)),
            PageItem::Ellipsis => Span::styled("...", Style::default().fg(TEXT_DIM)),
            PageItem::Page {
                number,
                active: true,
            } => Span::styled(
                format!("[{number}]"),
                Style::default()
                    .fg(TEXT_MAIN)
                    .bg(BG_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            PageItem::Page { number, .. } => {
                Span::styled(number.to_string(), Style::default().fg(TEXT_MAIN))
            }
        });
    }
    Line::from(spans)
}

fn edge_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(ACCENT_TEAL)
    } else {
        Style::default()
            .fg(TEXT_MUTED)
            .add_modifier(Modifier::DIM)
    }
}

impl Component<Action> for PaginationBar {
    type Props<'a> = PaginationBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let mut line = pagination_line(props.current, props.total);
        if props.loading {
            line.spans
                .push(Span::styled("  loading...", Style::default().fg(TEXT_DIM)));
        }
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}
