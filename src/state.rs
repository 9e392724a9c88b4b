//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::collection::{CaughtStore, SharedRepository};
use crate::pagination::{self, CAUGHT_ITEMS_PER_PAGE};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sprites {
    pub front_default: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub type_info: NamedRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AbilitySlot {
    pub ability: NamedRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatSlot {
    pub stat: NamedRef,
    pub base_stat: u32,
}

/// A fully resolved Pokemon, kept in the same shape the API returns it so
/// the caught collection file stays readable by anything that speaks PokeAPI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
}

impl PokemonDetail {
    pub fn type_names(&self) -> Vec<&str> {
        self.types
            .iter()
            .map(|slot| slot.type_info.name.as_str())
            .collect()
    }

    pub fn ability_names(&self) -> Vec<&str> {
        self.abilities
            .iter()
            .map(|slot| slot.ability.name.as_str())
            .collect()
    }

    pub fn sprite_url(&self) -> Option<&str> {
        self.sprites.front_default.as_deref()
    }
}

/// One resolved page of the remote listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogPage {
    pub items: Vec<PokemonDetail>,
    pub total_count: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BrowseMode {
    #[default]
    Browse,
    Search,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub editing: bool,
    pub query: String,
    pub loading: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// Transient corner notification. Stays until dismissed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),

    /// Cards of the current listing page, or the single search result.
    pub catalog: Vec<PokemonDetail>,
    pub page: u32,
    pub total_count: u32,
    pub total_pages: u32,
    pub page_loading: bool,
    /// Bumped on every page or search request; results tagged with an
    /// older value are dropped.
    pub generation: u64,
    /// Same tagging for name searches, kept apart so a search never
    /// cancels a page load.
    pub search_generation: u64,

    pub mode: BrowseMode,
    pub search: SearchState,

    pub collection_visible: bool,
    pub caught: CaughtStore,
    pub caught_page: u32,

    pub cursor: usize,
    pub selected: Option<PokemonDetail>,
    pub message: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SharedRepository::default())
    }
}

impl AppState {
    /// Fresh browse state on page 1, with the caught collection loaded from
    /// `repository`.
    pub fn new(repository: SharedRepository) -> Self {
        Self {
            terminal_size: (80, 24),
            catalog: Vec::new(),
            page: 1,
            total_count: 0,
            total_pages: 0,
            page_loading: false,
            generation: 0,
            search_generation: 0,
            mode: BrowseMode::Browse,
            search: SearchState::default(),
            collection_visible: false,
            caught: CaughtStore::open(repository),
            caught_page: 1,
            cursor: 0,
            selected: None,
            message: None,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.mode == BrowseMode::Search
    }

    pub fn caught_total_pages(&self) -> u32 {
        pagination::total_pages(self.caught.len() as u32, CAUGHT_ITEMS_PER_PAGE)
    }

    pub fn caught_page_items(&self) -> &[PokemonDetail] {
        self.caught.page(self.caught_page, CAUGHT_ITEMS_PER_PAGE)
    }

    /// The cards currently on screen, in grid order.
    pub fn visible_cards(&self) -> &[PokemonDetail] {
        if self.collection_visible {
            self.caught_page_items()
        } else {
            &self.catalog
        }
    }

    pub fn cursor_card(&self) -> Option<&PokemonDetail> {
        self.visible_cards().get(self.cursor)
    }

    /// Grid columns for the current terminal width.
    pub fn grid_columns(&self) -> usize {
        grid_columns(self.terminal_size.0)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_cards().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    pub fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn next_search_generation(&mut self) -> u64 {
        self.search_generation = self.search_generation.wrapping_add(1);
        self.search_generation
    }
}

/// Responsive column count: one column on narrow terminals, up to four.
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=99 => 2,
        100..=139 => 3,
        _ => 4,
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry("page", ron_string(&self.page))
                .entry("total_pages", ron_string(&self.total_pages))
                .entry("total_count", ron_string(&self.total_count))
                .entry("cards", ron_string(&self.catalog.len()))
                .entry("generation", ron_string(&self.generation))
                .entry("loading", ron_string(&self.page_loading)),
            DebugSection::new("Search")
                .entry("mode", ron_string(&self.mode))
                .entry("query", ron_string(&self.search.query))
                .entry("generation", ron_string(&self.search_generation))
                .entry("editing", ron_string(&self.search.editing))
                .entry("loading", ron_string(&self.search.loading)),
            DebugSection::new("Collection")
                .entry("visible", ron_string(&self.collection_visible))
                .entry("caught", ron_string(&self.caught.len()))
                .entry("page", ron_string(&self.caught_page))
                .entry("total_pages", ron_string(&self.caught_total_pages())),
            DebugSection::new("View")
                .entry("cursor", ron_string(&self.cursor))
                .entry(
                    "selected",
                    ron_string(&self.selected.as_ref().map(|p| p.name.clone())),
                )
                .entry("message", ron_string(&self.message)),
        ]
    }
}
