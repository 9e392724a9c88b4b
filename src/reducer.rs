//! Reducer - (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::api::normalize_name;
use crate::effect::Effect;
use crate::pagination::{self, clamp_page, ITEMS_PER_PAGE};
use crate::state::{AppState, BrowseMode, Notice, PokemonDetail};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.page = 1;
            state.mode = BrowseMode::Browse;
            state.collection_visible = false;
            state.selected = None;
            state.message = None;
            state.cursor = 0;
            request_page(state)
        }

        // ===== Catalog =====
        Action::CatalogFetch => request_page(state),

        Action::CatalogDidLoad { generation, page } => {
            if generation != state.generation {
                tracing::debug!(generation, current = state.generation, "dropping stale page");
                return DispatchResult::unchanged();
            }
            state.page_loading = false;
            state.total_count = page.total_count;
            state.total_pages = pagination::total_pages(page.total_count, ITEMS_PER_PAGE);
            if state.total_pages > 0 && state.page > state.total_pages {
                tracing::info!(
                    page = state.page,
                    total_pages = state.total_pages,
                    "page past the end of the catalog, moving to the last page"
                );
                state.page = state.total_pages;
                return request_page(state);
            }
            state.catalog = page.items;
            state.mode = BrowseMode::Browse;
            state.cursor = 0;
            DispatchResult::changed()
        }

        Action::CatalogDidError { generation, error } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            tracing::warn!(page = state.page, %error, "failed to load catalog page");
            state.page_loading = false;
            DispatchResult::changed()
        }

        Action::CatalogPageSet(page) => set_catalog_page(state, page),
        Action::CatalogPageNext => set_catalog_page(state, state.page.saturating_add(1)),
        Action::CatalogPagePrev => set_catalog_page(state, state.page.saturating_sub(1)),

        // ===== Search =====
        Action::SearchStart => {
            if state.search.editing {
                return DispatchResult::unchanged();
            }
            state.search.editing = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.editing {
                return DispatchResult::unchanged();
            }
            state.search.editing = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.search.editing {
                return DispatchResult::unchanged();
            }
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if !state.search.editing || state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.editing = false;
            let name = normalize_name(&state.search.query);
            if name.is_empty() {
                return DispatchResult::changed();
            }
            state.search.loading = true;
            let generation = state.next_search_generation();
            DispatchResult::changed_with(Effect::SearchPokemon { name, generation })
        }

        Action::SearchDidLoad {
            generation,
            pokemon,
        } => {
            if generation != state.search_generation {
                tracing::debug!(generation, "dropping stale search result");
                return DispatchResult::unchanged();
            }
            if state.page_loading {
                // The result replaces the cards; a page still in flight must not.
                state.next_generation();
                state.page_loading = false;
            }
            state.search.loading = false;
            state.catalog = vec![pokemon];
            state.total_pages = 1;
            state.mode = BrowseMode::Search;
            state.collection_visible = false;
            state.cursor = 0;
            DispatchResult::changed()
        }

        Action::SearchDidNotFind { generation, name } => {
            if generation != state.search_generation {
                return DispatchResult::unchanged();
            }
            tracing::info!(%name, "search found nothing");
            state.search.loading = false;
            state.message = Some(Notice::error(format!("No Pokémon named \"{name}\"")));
            DispatchResult::changed()
        }

        Action::SearchDidError { generation, error } => {
            if generation != state.search_generation {
                return DispatchResult::unchanged();
            }
            tracing::warn!(%error, "search failed");
            state.search.loading = false;
            state.message = Some(Notice::error(format!("Search failed: {error}")));
            DispatchResult::changed()
        }

        Action::SearchBack => {
            if state.mode != BrowseMode::Search {
                return DispatchResult::unchanged();
            }
            state.search.query.clear();
            state.search.editing = false;
            state.search.loading = false;
            state.next_search_generation();
            state.mode = BrowseMode::Browse;
            state.cursor = 0;
            request_page(state)
        }

        // ===== Collection =====
        Action::CollectionToggle => {
            state.collection_visible = !state.collection_visible;
            state.caught_page = clamp_page(state.caught_page, state.caught_total_pages());
            state.cursor = 0;
            DispatchResult::changed()
        }

        Action::CollectionPageSet(page) => set_caught_page(state, page),
        Action::CollectionPageNext => set_caught_page(state, state.caught_page.saturating_add(1)),
        Action::CollectionPagePrev => set_caught_page(state, state.caught_page.saturating_sub(1)),

        // ===== Pokemon =====
        Action::PokemonCatch(pokemon) => {
            state.message = Some(catch_pokemon(state, pokemon));
            DispatchResult::changed()
        }

        Action::PokemonRelease(id) => {
            let Some(name) = state.caught.get(id).map(|pokemon| pokemon.name.clone()) else {
                tracing::debug!(id, "release ignored, pokemon is not caught");
                return DispatchResult::unchanged();
            };
            match state.caught.remove(id) {
                Ok(_) => {
                    tracing::info!(id, %name, "released");
                    state.message = Some(Notice::success(format!("{name} has been released!")));
                    state.caught_page =
                        clamp_page(state.caught_page, state.caught_total_pages());
                    state.clamp_cursor();
                }
                Err(error) => {
                    tracing::error!(id, %error, "failed to persist release");
                    state.message =
                        Some(Notice::error(format!("Could not release {name}: {error}")));
                }
            }
            DispatchResult::changed()
        }

        // ===== Cursor / detail / message =====
        Action::CursorMove(delta) => {
            let len = state.visible_cards().len();
            if len == 0 {
                return DispatchResult::unchanged();
            }
            let next = (state.cursor as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
            if next == state.cursor {
                return DispatchResult::unchanged();
            }
            state.cursor = next;
            DispatchResult::changed()
        }

        Action::CursorSelect(index) => {
            if index >= state.visible_cards().len() || index == state.cursor {
                return DispatchResult::unchanged();
            }
            state.cursor = index;
            DispatchResult::changed()
        }

        Action::DetailShow(pokemon) => {
            state.selected = Some(pokemon);
            DispatchResult::changed()
        }

        Action::DetailClose => {
            if state.selected.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::MessageDismiss => {
            if state.message.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn request_page(state: &mut AppState) -> DispatchResult<Effect> {
    state.page_loading = true;
    let generation = state.next_generation();
    DispatchResult::changed_with(Effect::LoadCatalogPage {
        page: state.page,
        generation,
    })
}

fn set_catalog_page(state: &mut AppState, page: u32) -> DispatchResult<Effect> {
    if state.is_searching() || page == 0 || page == state.page {
        return DispatchResult::unchanged();
    }
    // Until the first load reports a total, only page 1 is known to exist.
    if page > state.total_pages.max(1) {
        return DispatchResult::unchanged();
    }
    state.page = page;
    state.cursor = 0;
    request_page(state)
}

fn set_caught_page(state: &mut AppState, page: u32) -> DispatchResult<Effect> {
    if page == 0 || page > state.caught_total_pages() || page == state.caught_page {
        return DispatchResult::unchanged();
    }
    state.caught_page = page;
    state.cursor = 0;
    DispatchResult::changed()
}

fn catch_pokemon(state: &mut AppState, pokemon: PokemonDetail) -> Notice {
    let name = pokemon.name.clone();
    let id = pokemon.id;
    match state.caught.add(pokemon) {
        Ok(true) => {
            tracing::info!(id, %name, "caught");
            Notice::success(format!("{name} has been caught!"))
        }
        Ok(false) => Notice::info(format!("{name} is already in your collection")),
        Err(error) => {
            tracing::error!(id, %error, "failed to persist catch");
            Notice::error(format!("Could not catch {name}: {error}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CatalogPage, NoticeKind};

    fn mon(id: u32, name: &str) -> PokemonDetail {
        PokemonDetail {
            id,
            name: name.to_string(),
            sprites: Default::default(),
            types: Vec::new(),
            abilities: Vec::new(),
            stats: Vec::new(),
        }
    }

    fn loaded_page(count: usize, total_count: u32) -> CatalogPage {
        CatalogPage {
            items: (1..=count as u32).map(|id| mon(id, &format!("mon-{id}"))).collect(),
            total_count,
        }
    }

    #[test]
    fn test_init_requests_first_page() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert!(state.page_loading);
        assert_eq!(
            result.effects,
            vec![Effect::LoadCatalogPage {
                page: 1,
                generation: 1
            }]
        );
    }

    #[test]
    fn test_page_load_recomputes_total_pages() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let generation = state.generation;

        reducer(
            &mut state,
            Action::CatalogDidLoad {
                generation,
                page: loaded_page(20, 1302),
            },
        );

        assert!(!state.page_loading);
        assert_eq!(state.total_pages, 66);
        assert_eq!(state.catalog.len(), 20);
    }

    #[test]
    fn test_stale_page_is_dropped() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let stale = state.generation;
        reducer(
            &mut state,
            Action::CatalogDidLoad {
                generation: stale,
                page: loaded_page(20, 100),
            },
        );
        reducer(&mut state, Action::CatalogPageNext);
        reducer(&mut state, Action::CatalogPageNext);
        assert_eq!(state.page, 3);

        let result = reducer(
            &mut state,
            Action::CatalogDidLoad {
                generation: stale + 1,
                page: loaded_page(3, 100),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.catalog.len(), 20);
        assert!(state.page_loading);
    }

    #[test]
    fn test_page_failure_leaves_cards() {
        let mut state = AppState {
            catalog: vec![mon(1, "bulbasaur")],
            ..Default::default()
        };
        reducer(&mut state, Action::CatalogFetch);
        let generation = state.generation;

        reducer(
            &mut state,
            Action::CatalogDidError {
                generation,
                error: "timeout".into(),
            },
        );

        assert!(!state.page_loading);
        assert_eq!(state.catalog.len(), 1);
        assert!(state.message.is_none());
    }

    #[test]
    fn test_prev_disabled_on_first_page() {
        let mut state = AppState {
            total_pages: 3,
            ..Default::default()
        };
        let result = reducer(&mut state, Action::CatalogPagePrev);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_next_disabled_on_last_page() {
        let mut state = AppState {
            page: 3,
            total_pages: 3,
            ..Default::default()
        };
        let result = reducer(&mut state, Action::CatalogPageNext);
        assert!(!result.changed);
        assert_eq!(state.page, 3);
    }

    #[test]
    fn test_page_past_end_is_clamped_and_refetched() {
        let mut state = AppState {
            page: 9,
            ..Default::default()
        };
        reducer(&mut state, Action::CatalogFetch);
        let generation = state.generation;

        let result = reducer(
            &mut state,
            Action::CatalogDidLoad {
                generation,
                page: loaded_page(0, 45),
            },
        );

        assert_eq!(state.page, 3);
        assert_eq!(
            result.effects,
            vec![Effect::LoadCatalogPage {
                page: 3,
                generation: generation + 1
            }]
        );
    }

    #[test]
    fn test_search_typing_and_submit() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchStart);
        for ch in " PiKa".chars() {
            reducer(&mut state, Action::SearchInput(ch));
        }
        reducer(&mut state, Action::SearchBackspace);
        reducer(&mut state, Action::SearchInput('a'));

        let result = reducer(&mut state, Action::SearchSubmit);

        assert!(!state.search.editing);
        assert!(state.search.loading);
        assert_eq!(
            result.effects,
            vec![Effect::SearchPokemon {
                name: "pika".into(),
                generation: state.search_generation
            }]
        );
    }

    #[test]
    fn test_blank_search_does_nothing() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchStart);
        reducer(&mut state, Action::SearchInput(' '));
        let result = reducer(&mut state, Action::SearchSubmit);
        assert!(result.effects.is_empty());
        assert_eq!(state.mode, BrowseMode::Browse);
    }

    #[test]
    fn test_search_not_found_keeps_mode_and_reports() {
        let mut state = AppState::default();
        state.search.query = "missingno".into();
        reducer(&mut state, Action::SearchSubmit);
        let generation = state.search_generation;

        reducer(
            &mut state,
            Action::SearchDidNotFind {
                generation,
                name: "missingno".into(),
            },
        );

        assert_eq!(state.mode, BrowseMode::Browse);
        let message = state.message.as_ref().unwrap();
        assert_eq!(message.kind, NoticeKind::Error);
        assert!(message.text.contains("missingno"));
    }

    #[test]
    fn test_search_drops_in_flight_page() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let page_generation = state.generation;
        state.search.query = "pikachu".into();
        reducer(&mut state, Action::SearchSubmit);
        let search_generation = state.search_generation;

        reducer(
            &mut state,
            Action::SearchDidLoad {
                generation: search_generation,
                pokemon: mon(25, "pikachu"),
            },
        );
        let result = reducer(
            &mut state,
            Action::CatalogDidLoad {
                generation: page_generation,
                page: loaded_page(20, 1302),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.mode, BrowseMode::Search);
        assert_eq!(state.catalog.len(), 1);
    }

    #[test]
    fn test_failed_search_keeps_page_load() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let page_generation = state.generation;
        state.search.query = "missingno".into();
        reducer(&mut state, Action::SearchSubmit);
        let search_generation = state.search_generation;

        reducer(
            &mut state,
            Action::SearchDidNotFind {
                generation: search_generation,
                name: "missingno".into(),
            },
        );
        assert!(state.page_loading);

        let result = reducer(
            &mut state,
            Action::CatalogDidLoad {
                generation: page_generation,
                page: loaded_page(20, 1302),
            },
        );

        assert!(result.changed);
        assert_eq!(state.mode, BrowseMode::Browse);
        assert_eq!(state.catalog.len(), 20);
        assert_eq!(state.total_pages, 66);
        assert!(!state.page_loading);
    }

    #[test]
    fn test_search_result_after_back_is_dropped() {
        let mut state = AppState {
            total_pages: 66,
            mode: BrowseMode::Search,
            ..Default::default()
        };
        state.search.query = "mew".into();
        reducer(&mut state, Action::SearchSubmit);
        let search_generation = state.search_generation;
        reducer(&mut state, Action::SearchBack);

        let result = reducer(
            &mut state,
            Action::SearchDidLoad {
                generation: search_generation,
                pokemon: mon(151, "mew"),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.mode, BrowseMode::Browse);
        assert!(!state.search.loading);
    }

    #[test]
    fn test_page_beyond_known_total_is_rejected() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::CatalogPageSet(u32::MAX));
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.page, 1);

        state.total_pages = 66;
        assert!(!reducer(&mut state, Action::CatalogPageSet(u32::MAX)).changed);
        assert!(reducer(&mut state, Action::CatalogPageSet(66)).changed);
        assert_eq!(state.page, 66);
    }

    #[test]
    fn test_back_restores_browse_with_fresh_fetch() {
        let mut state = AppState {
            page: 4,
            total_pages: 66,
            mode: BrowseMode::Search,
            ..Default::default()
        };
        state.search.query = "pikachu".into();

        let result = reducer(&mut state, Action::SearchBack);

        assert_eq!(state.mode, BrowseMode::Browse);
        assert!(state.search.query.is_empty());
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::LoadCatalogPage { page: 4, .. }]
        ));
    }

    #[test]
    fn test_paging_ignored_while_searching() {
        let mut state = AppState {
            total_pages: 66,
            mode: BrowseMode::Search,
            ..Default::default()
        };
        let result = reducer(&mut state, Action::CatalogPageSet(2));
        assert!(!result.changed);
    }

    #[test]
    fn test_catch_sets_message() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PokemonCatch(mon(25, "pikachu")));

        assert_eq!(state.caught.len(), 1);
        assert_eq!(
            state.message,
            Some(Notice::success("pikachu has been caught!"))
        );
    }

    #[test]
    fn test_catch_twice_keeps_one_entry() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PokemonCatch(mon(25, "pikachu")));
        reducer(&mut state, Action::PokemonCatch(mon(25, "pikachu")));

        assert_eq!(state.caught.len(), 1);
        assert_eq!(state.message.map(|m| m.kind), Some(NoticeKind::Info));
    }

    #[test]
    fn test_release_absent_id_is_noop() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PokemonCatch(mon(1, "bulbasaur")));
        reducer(&mut state, Action::MessageDismiss);

        let result = reducer(&mut state, Action::PokemonRelease(404));

        assert!(!result.changed);
        assert_eq!(state.caught.len(), 1);
        assert!(state.message.is_none());
    }

    #[test]
    fn test_release_clamps_collection_page() {
        let mut state = AppState::default();
        for id in 1..=11 {
            reducer(&mut state, Action::PokemonCatch(mon(id, &format!("mon-{id}"))));
        }
        reducer(&mut state, Action::CollectionToggle);
        reducer(&mut state, Action::CollectionPageNext);
        assert_eq!(state.caught_page, 2);

        reducer(&mut state, Action::PokemonRelease(11));

        assert_eq!(state.caught_page, 1);
        assert_eq!(state.caught_total_pages(), 1);
        assert_eq!(
            state.message,
            Some(Notice::success("mon-11 has been released!"))
        );
    }

    #[test]
    fn test_collection_paging_bounds() {
        let mut state = AppState::default();
        for id in 1..=23 {
            reducer(&mut state, Action::PokemonCatch(mon(id, &format!("mon-{id}"))));
        }
        reducer(&mut state, Action::CollectionToggle);

        assert_eq!(state.caught_total_pages(), 3);
        assert!(reducer(&mut state, Action::CollectionPageSet(3)).changed);
        assert_eq!(state.visible_cards().len(), 3);
        assert!(!reducer(&mut state, Action::CollectionPageNext).changed);
        assert!(!reducer(&mut state, Action::CollectionPageSet(0)).changed);
    }

    #[test]
    fn test_cursor_stays_inside_cards() {
        let mut state = AppState {
            catalog: loaded_page(5, 5).items,
            ..Default::default()
        };
        reducer(&mut state, Action::CursorMove(3));
        assert_eq!(state.cursor, 3);
        reducer(&mut state, Action::CursorMove(10));
        assert_eq!(state.cursor, 4);
        reducer(&mut state, Action::CursorMove(-10));
        assert_eq!(state.cursor, 0);
        assert!(!reducer(&mut state, Action::CursorSelect(9)).changed);
    }

    #[test]
    fn test_detail_and_message_slots() {
        let mut state = AppState::default();
        reducer(&mut state, Action::DetailShow(mon(25, "pikachu")));
        assert_eq!(state.selected.as_ref().map(|p| p.id), Some(25));

        assert!(reducer(&mut state, Action::DetailClose).changed);
        assert!(!reducer(&mut state, Action::DetailClose).changed);
        assert!(!reducer(&mut state, Action::MessageDismiss).changed);
    }
}
