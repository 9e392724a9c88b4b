use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::{Notice, NoticeKind};

const POPUP_MAX_WIDTH: u16 = 44;
const POPUP_HEIGHT: u16 = 4;

/// Bottom-right notification with a close hint.
#[derive(Default)]
pub struct MessagePopup;

pub struct MessagePopupProps<'a> {
    pub notice: &'a Notice,
}

/// Where the popup lands inside `area`.
pub fn popup_area(area: Rect) -> Rect {
    let width = POPUP_MAX_WIDTH.min(area.width);
    let height = POPUP_HEIGHT.min(area.height);
    Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - height,
        width,
        height,
    }
}

impl Component<Action> for MessagePopup {
    type Props<'a> = MessagePopupProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let (accent, title) = match props.notice.kind {
            NoticeKind::Success => (ACCENT_TEAL, " OK "),
            NoticeKind::Info => (ACCENT_GOLD, " NOTE "),
            NoticeKind::Error => (ACCENT_RED, " ERROR "),
        };
        let popup = popup_area(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                title,
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(
                Line::from(vec![
                    Span::styled(" Esc ", Style::default().fg(accent)),
                    Span::styled("close ", Style::default().fg(TEXT_DIM)),
                ])
                .right_aligned(),
            )
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(props.notice.text.as_str())
                .block(block)
                .wrap(Wrap { trim: true }),
            popup,
        );
    }
}
