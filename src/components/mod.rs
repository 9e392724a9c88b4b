pub mod card_grid;
pub mod catalog_screen;
pub mod detail_card;
pub mod detail_modal;
pub mod message_popup;
pub mod pagination_bar;
pub mod search_bar;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use card_grid::{CardGrid, CardGridProps, CARD_HEIGHT};
pub use catalog_screen::{CatalogScreen, CatalogScreenProps};
pub use detail_card::{DetailCard, DetailCardProps};
pub use detail_modal::{DetailModal, DetailModalProps};
pub use message_popup::{MessagePopup, MessagePopupProps};
pub use pagination_bar::{PaginationBar, PaginationBarProps};
pub use search_bar::{SearchBar, SearchBarProps};

use ratatui::style::Color;

pub(crate) const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub(crate) const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub(crate) const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub(crate) const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub(crate) const TEXT_MUTED: Color = Color::Rgb(90, 104, 116);
pub(crate) const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub(crate) const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub(crate) const ACCENT_RED: Color = Color::Rgb(226, 92, 92);

/// `a, b, c`, or a dash when there is nothing to list.
pub(crate) fn comma_list(items: &[&str]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
