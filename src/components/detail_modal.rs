use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::card_grid::card_lines;
use super::detail_card::stat_lines;
use super::{Component, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::PokemonDetail;

pub const MODAL_WIDTH: u16 = 64;
pub const MODAL_HEIGHT: u16 = 18;

/// Centered overlay with the full stat block of the selected Pokemon.
pub struct DetailModal {
    modal: Modal,
}

pub struct DetailModalProps<'a> {
    pub pokemon: &'a PokemonDetail,
    pub is_focused: bool,
}

impl Default for DetailModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// The overlay rect inside `area`.
    pub fn area(area: Rect) -> Rect {
        centered_rect(MODAL_WIDTH.min(area.width), MODAL_HEIGHT.min(area.height), area)
    }
}

impl Component<Action> for DetailModal {
    type Props<'a> = DetailModalProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char('q') => {
                    Some(Action::DetailClose)
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let pokemon = props.pokemon;
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(1), // Name
                Constraint::Length(1), // Spacer
                Constraint::Length(3), // Type / abilities / sprite
                Constraint::Length(1), // Spacer
                Constraint::Min(1),    // Stats
                Constraint::Length(1), // Hint
            ])
            .split(content_area);

            let name = Line::from(vec![
                Span::styled(
                    pokemon.name.clone(),
                    Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  #{}", pokemon.id), Style::default().fg(TEXT_DIM)),
            ]);
            frame.render_widget(Paragraph::new(name), chunks[0]);
            frame.render_widget(Paragraph::new(card_lines(pokemon)), chunks[2]);
            frame.render_widget(Paragraph::new(stat_lines(pokemon)), chunks[4]);
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("Esc", Style::default().fg(ACCENT_TEAL)),
                    Span::styled(" close", Style::default().fg(TEXT_DIM)),
                ])),
                chunks[5],
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: Self::area(area),
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(BG_PANEL),
                        padding: Padding::all(1),
                        border: None,
                        fg: Some(TEXT_MAIN),
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DetailClose,
                render_content: &mut render_content,
            },
        );
    }
}
