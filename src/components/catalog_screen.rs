use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{
    CardGrid, CardGridProps, Component, DetailCard, DetailCardProps, DetailModal,
    DetailModalProps, MessagePopup, MessagePopupProps, PaginationBar, PaginationBarProps,
    SearchBar, SearchBarProps, ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::AppState;

/// Root screen: search bar, cards, pagination, status bar and overlays.
pub struct CatalogScreen {
    search_bar: SearchBar,
    grid: CardGrid,
    detail_card: DetailCard,
    detail_modal: DetailModal,
    pagination: PaginationBar,
    popup: MessagePopup,
    status_bar: StatusBar,
}

pub struct CatalogScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Screen regions, top to bottom.
#[derive(Clone, Copy, Debug)]
pub struct ScreenLayout {
    pub search: Rect,
    pub body: Rect,
    pub pagination: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn split(area: Rect) -> Self {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Search bar
            Constraint::Min(1),    // Cards
            Constraint::Length(1), // Pagination
            Constraint::Length(3), // Status bar
        ])
        .split(area);
        Self {
            search: chunks[0],
            body: chunks[1],
            pagination: chunks[2],
            status: chunks[3],
        }
    }
}

impl Default for CatalogScreen {
    fn default() -> Self {
        Self {
            search_bar: SearchBar,
            grid: CardGrid,
            detail_card: DetailCard,
            detail_modal: DetailModal::new(),
            pagination: PaginationBar,
            popup: MessagePopup,
            status_bar: StatusBar::new(),
        }
    }
}

impl CatalogScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys while the search field is being edited.
    pub fn handle_search_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        self.search_bar
            .handle_event(event, search_bar_props(state, true))
            .into_iter()
            .collect()
    }

    /// Keys while the detail overlay is open.
    pub fn handle_detail_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        let Some(pokemon) = state.selected.as_ref() else {
            return Vec::new();
        };
        self.detail_modal
            .handle_event(
                event,
                DetailModalProps {
                    pokemon,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    /// Keys on the main screen: view switches, paging, then the card cursor.
    pub fn handle_browse_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('/') => Some(Action::SearchStart),
            KeyCode::Tab | KeyCode::Char('v') => Some(Action::CollectionToggle),
            KeyCode::Char('b') | KeyCode::Backspace
                if state.is_searching() && !state.collection_visible =>
            {
                Some(Action::SearchBack)
            }
            KeyCode::Char('n') | KeyCode::PageDown => Some(if state.collection_visible {
                Action::CollectionPageNext
            } else {
                Action::CatalogPageNext
            }),
            KeyCode::Char('p') | KeyCode::PageUp => Some(if state.collection_visible {
                Action::CollectionPagePrev
            } else {
                Action::CatalogPagePrev
            }),
            KeyCode::F(5) if !state.collection_visible && !state.is_searching() => {
                Some(Action::CatalogFetch)
            }
            KeyCode::Esc if state.message.is_some() => Some(Action::MessageDismiss),
            _ => None,
        };
        if let Some(action) = action {
            return vec![action];
        }

        self.grid
            .handle_event(event, grid_props(state, true))
            .into_iter()
            .collect()
    }
}

fn search_bar_props(state: &AppState, is_focused: bool) -> SearchBarProps<'_> {
    SearchBarProps {
        query: &state.search.query,
        editing: state.search.editing,
        loading: state.search.loading,
        mode: state.mode,
        collection_visible: state.collection_visible,
        is_focused,
    }
}

fn grid_props(state: &AppState, is_focused: bool) -> CardGridProps<'_> {
    let empty_text = if state.collection_visible {
        "You have not caught any Pokemon yet."
    } else if state.page_loading {
        "Loading..."
    } else {
        "No Pokemon to show."
    };
    CardGridProps {
        cards: state.visible_cards(),
        cursor: state.cursor,
        columns: state.grid_columns(),
        caught: &state.caught,
        collection_view: state.collection_visible,
        empty_text,
        is_focused,
    }
}

impl Component<Action> for CatalogScreen {
    type Props<'a> = CatalogScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let state = props.state;
        if state.selected.is_some() {
            self.handle_detail_event(event, state)
        } else if state.search.editing {
            self.handle_search_event(event, state)
        } else {
            self.handle_browse_event(event, state)
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(
            Block::default().style(Style::default().bg(BG_BASE).fg(TEXT_MAIN)),
            area,
        );
        let layout = ScreenLayout::split(area);

        self.search_bar.render(
            frame,
            layout.search,
            search_bar_props(state, props.is_focused),
        );

        let body_focused = props.is_focused && state.selected.is_none() && !state.search.editing;
        if state.is_searching() && !state.collection_visible {
            if let Some(pokemon) = state.catalog.first() {
                self.detail_card.render(
                    frame,
                    layout.body,
                    DetailCardProps {
                        pokemon,
                        caught: state.caught.contains(pokemon.id),
                    },
                );
            }
        } else {
            self.grid
                .render(frame, layout.body, grid_props(state, body_focused));
        }

        if state.collection_visible {
            if state.caught_total_pages() > 0 {
                self.pagination.render(
                    frame,
                    layout.pagination,
                    PaginationBarProps {
                        current: state.caught_page,
                        total: state.caught_total_pages(),
                        loading: false,
                    },
                );
            }
        } else if !state.is_searching() {
            self.pagination.render(
                frame,
                layout.pagination,
                PaginationBarProps {
                    current: state.page,
                    total: state.total_pages,
                    loading: state.page_loading,
                },
            );
        }

        self.render_status(frame, layout.status, state);

        if let Some(notice) = state.message.as_ref() {
            self.popup
                .render(frame, layout.body, MessagePopupProps { notice });
        }
        if let Some(pokemon) = state.selected.as_ref() {
            self.detail_modal.render(
                frame,
                area,
                DetailModalProps {
                    pokemon,
                    is_focused: props.is_focused,
                },
            );
        }
    }
}

impl CatalogScreen {
    fn render_status(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let hints = status_hints(state);
        let caught = format!("Caught: {}", state.caught.len());
        let caught_span = Span::styled(caught.as_str(), Style::default().fg(ACCENT_GOLD));
        let items = [StatusBarItem::span(caught_span)];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: Some(Style::default().fg(ACCENT_TEAL)),
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.selected.is_some() {
        return vec![StatusBarHint::new("Esc", "Close")];
    }
    if state.search.editing {
        return vec![
            StatusBarHint::new("Enter", "Search"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }

    let mut hints = vec![
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("arrows", "Move"),
        StatusBarHint::new("d", "Detail"),
    ];
    if state.collection_visible {
        hints.push(StatusBarHint::new("x", "Release"));
    } else {
        hints.push(StatusBarHint::new("c", "Catch"));
    }
    if state.collection_visible || !state.is_searching() {
        hints.push(StatusBarHint::new("n/p", "Page"));
    }
    if state.is_searching() && !state.collection_visible {
        hints.push(StatusBarHint::new("b", "Back"));
    }
    hints.push(StatusBarHint::new("Tab", "Collection"));
    if state.message.is_some() {
        hints.push(StatusBarHint::new("Esc", "Dismiss"));
    }
    hints.push(StatusBarHint::new("q", "Quit"));
    hints
}
