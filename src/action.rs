//! Actions: user intents from the screen and results from effect tasks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{CatalogPage, PokemonDetail};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Enter browse mode on page 1 and fetch it
    Init,

    // ===== Catalog category =====
    /// Re-fetch the current browse page
    CatalogFetch,
    CatalogDidLoad { generation: u64, page: CatalogPage },
    CatalogDidError { generation: u64, error: String },
    CatalogPageSet(u32),
    CatalogPageNext,
    CatalogPagePrev,

    // ===== Search category =====
    SearchStart,
    SearchCancel,
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
    SearchDidLoad { generation: u64, pokemon: PokemonDetail },
    SearchDidNotFind { generation: u64, name: String },
    SearchDidError { generation: u64, error: String },
    /// Leave search mode and reload the browse page
    SearchBack,

    // ===== Collection category =====
    CollectionToggle,
    CollectionPageSet(u32),
    CollectionPageNext,
    CollectionPagePrev,

    // ===== Pokemon category =====
    PokemonCatch(PokemonDetail),
    PokemonRelease(u32),

    // ===== Cursor / detail / message =====
    CursorMove(i16),
    CursorSelect(usize),
    DetailShow(PokemonDetail),
    DetailClose,
    MessageDismiss,

    // ===== UI category =====
    UiTerminalResize(u16, u16),
    Render,

    Quit,
}
