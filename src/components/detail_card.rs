use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::card_grid::card_lines;
use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::PokemonDetail;

/// Widest bar drawn for a base stat.
const STAT_BAR_WIDTH: u32 = 20;
/// Base stat that fills the whole bar.
const STAT_BAR_MAX: u32 = 255;

/// The single search result, with its stat block.
#[derive(Default)]
pub struct DetailCard;

pub struct DetailCardProps<'a> {
    pub pokemon: &'a PokemonDetail,
    pub caught: bool,
}

pub(crate) fn stat_lines(pokemon: &PokemonDetail) -> Vec<Line<'static>> {
    if pokemon.stats.is_empty() {
        return vec![Line::from(Span::styled(
            "No stats.",
            Style::default().fg(TEXT_DIM),
        ))];
    }
    pokemon
        .stats
        .iter()
        .map(|slot| {
            let filled = (slot.base_stat.min(STAT_BAR_MAX) * STAT_BAR_WIDTH).div_ceil(STAT_BAR_MAX);
            Line::from(vec![
                Span::styled(
                    format!("{:<16}", slot.stat.name),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::styled(
                    format!("{:>3} ", slot.base_stat),
                    Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "#".repeat(filled as usize),
                    Style::default().fg(ACCENT_TEAL),
                ),
            ])
        })
        .collect()
}

impl Component<Action> for DetailCard {
    type Props<'a> = DetailCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let pokemon = props.pokemon;
        let mut title = vec![Span::styled(
            format!(" {} #{} ", pokemon.name, pokemon.id),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        )];
        if props.caught {
            title.push(Span::styled("caught ", Style::default().fg(ACCENT_GOLD)));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(title))
            .border_style(Style::default().fg(ACCENT_TEAL))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Type / abilities / sprite
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Stats
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(card_lines(pokemon)).wrap(Wrap { trim: true }),
            chunks[0],
        );
        frame.render_widget(Paragraph::new(stat_lines(pokemon)), chunks[2]);
    }
}
