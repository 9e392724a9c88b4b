use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{
    comma_list, Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_HIGHLIGHT, BG_PANEL,
    TEXT_DIM, TEXT_MAIN, TEXT_MUTED,
};
use crate::action::Action;
use crate::collection::CaughtStore;
use crate::state::PokemonDetail;

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 7;

/// Responsive grid of Pokemon cards with a keyboard cursor.
#[derive(Default)]
pub struct CardGrid;

pub struct CardGridProps<'a> {
    pub cards: &'a [PokemonDetail],
    pub cursor: usize,
    pub columns: usize,
    pub caught: &'a CaughtStore,
    /// Cards come from the caught collection: Release instead of Catch.
    pub collection_view: bool,
    pub empty_text: &'a str,
    pub is_focused: bool,
}

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        let columns = props.columns.max(1) as i16;
        let card = props.cards.get(props.cursor);
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::CursorMove(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::CursorMove(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorMove(-columns)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorMove(columns)),
            KeyCode::Enter | KeyCode::Char('d') => card.cloned().map(Action::DetailShow),
            KeyCode::Char('c') if !props.collection_view => {
                card.cloned().map(Action::PokemonCatch)
            }
            KeyCode::Char('x') | KeyCode::Char('r') if props.collection_view => {
                card.map(|pokemon| Action::PokemonRelease(pokemon.id))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if props.cards.is_empty() {
            let text = Paragraph::new(props.empty_text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM));
            frame.render_widget(text, area);
            return;
        }

        let columns = props.columns.max(1);
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let cursor_row = props.cursor / columns;
        let first_row = (cursor_row + 1).saturating_sub(visible_rows);

        let rows =
            Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(area);
        let column_constraints = vec![Constraint::Ratio(1, columns as u32); columns];

        for (row_index, row_area) in rows.iter().enumerate() {
            let start = (first_row + row_index) * columns;
            if start >= props.cards.len() {
                break;
            }
            let cells = Layout::horizontal(column_constraints.clone()).split(*row_area);
            for (offset, cell) in cells.iter().enumerate() {
                let index = start + offset;
                let Some(pokemon) = props.cards.get(index) else {
                    break;
                };
                let card = Card {
                    pokemon,
                    selected: index == props.cursor,
                    caught: props.caught.contains(pokemon.id),
                    collection_view: props.collection_view,
                };
                card.render(frame, *cell);
            }
        }
    }
}

struct Card<'a> {
    pokemon: &'a PokemonDetail,
    selected: bool,
    caught: bool,
    collection_view: bool,
}

impl Card<'_> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let (border, bg) = if self.selected {
            (Style::default().fg(ACCENT_TEAL), BG_HIGHLIGHT)
        } else {
            (Style::default().fg(TEXT_DIM), BG_PANEL)
        };
        let mut title = vec![Span::styled(
            format!(" {} ", self.pokemon.name),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        )];
        if self.caught && !self.collection_view {
            title.push(Span::styled("* ", Style::default().fg(ACCENT_GOLD)));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(title))
            .title_bottom(Line::from(format!(" #{} ", self.pokemon.id)).right_aligned())
            .border_style(border)
            .style(Style::default().bg(bg).fg(TEXT_MAIN));

        let mut lines = card_lines(self.pokemon);
        lines.push(self.actions_line());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn actions_line(&self) -> Line<'static> {
        let key = Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD);
        let label = Style::default().fg(TEXT_DIM);
        if self.collection_view {
            Line::from(vec![
                Span::styled("x", Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD)),
                Span::styled(" Release  ", label),
                Span::styled("d", key),
                Span::styled(" Detail", label),
            ])
        } else {
            Line::from(vec![
                Span::styled("c", key),
                Span::styled(" Catch  ", label),
                Span::styled("d", key),
                Span::styled(" Detail", label),
            ])
        }
    }
}

/// Type, abilities and sprite rows shared by every card layout.
pub(crate) fn card_lines(pokemon: &PokemonDetail) -> Vec<Line<'static>> {
    let label = Style::default().fg(TEXT_DIM);
    vec![
        Line::from(vec![
            Span::styled("Type: ", label),
            Span::raw(comma_list(&pokemon.type_names())),
        ]),
        Line::from(vec![
            Span::styled("Abilities: ", label),
            Span::raw(comma_list(&pokemon.ability_names())),
        ]),
        match pokemon.sprite_url() {
            Some(url) => Line::from(Span::styled(url.to_string(), Style::default().fg(TEXT_MUTED))),
            None => Line::from(Span::styled("[no sprite]", Style::default().fg(TEXT_MUTED))),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AbilitySlot, NamedRef, Sprites, TypeSlot};
    use tui_dispatch::testing::*;

    fn mon(id: u32, name: &str) -> PokemonDetail {
        PokemonDetail {
            id,
            name: name.to_string(),
            sprites: Sprites {
                front_default: Some(format!("https://img/{id}.png")),
            },
            types: vec![TypeSlot {
                type_info: NamedRef {
                    name: "electric".into(),
                },
            }],
            abilities: vec![
                AbilitySlot {
                    ability: NamedRef {
                        name: "static".into(),
                    },
                },
                AbilitySlot {
                    ability: NamedRef {
                        name: "lightning-rod".into(),
                    },
                },
            ],
            stats: Vec::new(),
        }
    }

    fn props<'a>(cards: &'a [PokemonDetail], caught: &'a CaughtStore) -> CardGridProps<'a> {
        CardGridProps {
            cards,
            cursor: 0,
            columns: 2,
            caught,
            collection_view: false,
            empty_text: "nothing here",
            is_focused: true,
        }
    }

    #[test]
    fn test_vertical_move_steps_a_row() {
        let cards = vec![mon(1, "a"), mon(2, "b"), mon(3, "c")];
        let caught = CaughtStore::default();
        let mut grid = CardGrid;
        let actions: Vec<_> = grid
            .handle_event(&EventKind::Key(key("j")), props(&cards, &caught))
            .into_iter()
            .collect();
        actions.assert_first(Action::CursorMove(2));
    }

    #[test]
    fn test_catch_uses_cursor_card() {
        let cards = vec![mon(1, "a"), mon(25, "pikachu")];
        let caught = CaughtStore::default();
        let mut grid = CardGrid;
        let actions: Vec<_> = grid
            .handle_event(
                &EventKind::Key(key("c")),
                CardGridProps {
                    cursor: 1,
                    ..props(&cards, &caught)
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::PokemonCatch(mon(25, "pikachu")));
    }

    #[test]
    fn test_release_only_in_collection() {
        let cards = vec![mon(25, "pikachu")];
        let caught = CaughtStore::default();
        let mut grid = CardGrid;

        let actions: Vec<_> = grid
            .handle_event(&EventKind::Key(key("x")), props(&cards, &caught))
            .into_iter()
            .collect();
        actions.assert_empty();

        let actions: Vec<_> = grid
            .handle_event(
                &EventKind::Key(key("x")),
                CardGridProps {
                    collection_view: true,
                    ..props(&cards, &caught)
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::PokemonRelease(25));
    }

    #[test]
    fn test_render_card_fields() {
        let cards = vec![mon(25, "pikachu"), mon(26, "raichu")];
        let caught = CaughtStore::default();
        let mut render = RenderHarness::new(100, CARD_HEIGHT);
        let mut grid = CardGrid;
        let output = render.render_to_string_plain(|frame| {
            grid.render(frame, frame.area(), props(&cards, &caught));
        });

        assert!(output.contains("pikachu"));
        assert!(output.contains("raichu"));
        assert!(output.contains("Type: electric"));
        assert!(output.contains("Abilities: static, lightning-rod"));
        assert!(output.contains("Catch"));
    }

    #[test]
    fn test_render_empty_text() {
        let caught = CaughtStore::default();
        let mut render = RenderHarness::new(40, 5);
        let mut grid = CardGrid;
        let output = render.render_to_string_plain(|frame| {
            grid.render(frame, frame.area(), props(&[], &caught));
        });
        assert!(output.contains("nothing here"));
    }
}
