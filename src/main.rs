//! Pokecatch - browse PokeAPI and keep a caught collection

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokecatch::action::Action;
use pokecatch::api::{self, CatalogError, PokeApiClient, SharedCatalog, API_BASE};
use pokecatch::collection::{JsonFileRepository, MemoryRepository, SharedRepository};
use pokecatch::components::{CatalogScreen, CatalogScreenProps, Component, DetailModal};
use pokecatch::effect::Effect;
use pokecatch::logging;
use pokecatch::reducer::reducer;
use pokecatch::state::AppState;
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

const APP_DIR: &str = "pokecatch";

/// Browse the Pokemon catalog and keep the ones you catch
#[derive(Parser, Debug)]
#[command(name = "pokecatch")]
#[command(about = "Browse PokeAPI in the terminal and build a caught collection")]
struct Args {
    /// PokeAPI base URL
    #[arg(long, default_value = API_BASE)]
    api_base: String,

    /// Directory holding the caught collection (default: platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep the caught collection in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Directory for log files (default: <data dir>/logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokeComponentId {
    Screen,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokeContext {
    Main,
    Search,
    Detail,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        if self.selected.is_some() {
            Some(PokeComponentId::Detail)
        } else if self.search.editing {
            Some(PokeComponentId::Search)
        } else {
            Some(PokeComponentId::Screen)
        }
    }

    fn modal(&self) -> Option<PokeComponentId> {
        if self.selected.is_some() {
            Some(PokeComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::Screen => PokeContext::Main,
            PokeComponentId::Search => PokeContext::Search,
            PokeComponentId::Detail => PokeContext::Detail,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        data_dir,
        ephemeral,
        log_dir,
        debug: debug_args,
    } = Args::parse();

    let data_dir = data_dir.or_else(|| dirs_next::data_local_dir().map(|dir| dir.join(APP_DIR)));
    let log_dir = log_dir
        .or_else(|| data_dir.as_ref().map(|dir| dir.join("logs")))
        .unwrap_or_else(|| PathBuf::from(".logs"));
    let _log_guard = logging::init_logging(&log_dir)?;

    let repository = match data_dir.filter(|_| !ephemeral) {
        Some(dir) => {
            let repository = JsonFileRepository::new(&dir);
            tracing::info!(path = %repository.path().display(), "using caught collection file");
            SharedRepository::new(repository)
        }
        None => {
            tracing::info!("caught collection kept in memory");
            SharedRepository::new(MemoryRepository::new())
        }
    };
    let catalog: SharedCatalog = Arc::new(PokeApiClient::new(api_base));

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let mut state = debug
        .load_state_or_else_async(|| {
            let repository = repository.clone();
            async move { Ok::<AppState, io::Error>(AppState::new(repository)) }
        })
        .await
        .map_err(debug_error)?;
    if let Ok((width, height)) = crossterm::terminal::size() {
        state.terminal_size = (width, height);
    }

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, catalog).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("exiting");
    Ok(())
}

struct PokeUi {
    screen: CatalogScreen,
}

impl PokeUi {
    fn new() -> Self {
        Self {
            screen: CatalogScreen::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        event_ctx.set_component_area(PokeComponentId::Screen, area);
        event_ctx.set_component_area(PokeComponentId::Search, Rect { height: 3, ..area });
        if state.selected.is_some() {
            event_ctx.set_component_area(PokeComponentId::Detail, DetailModal::area(area));
        } else {
            event_ctx.component_areas.remove(&PokeComponentId::Detail);
        }

        let props = CatalogScreenProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.screen.render(frame, area, props);
    }

    fn handle_screen_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handler_response(self.screen.handle_browse_event(event, state))
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = self.screen.handle_search_event(event, state);
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = self.screen.handle_detail_event(event, state);
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    catalog: SharedCatalog,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_screen = Rc::clone(&ui);
    bus.register(PokeComponentId::Screen, move |event, state| {
        ui_screen
            .borrow_mut()
            .handle_screen_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokeComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokeComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, catalog.clone()),
        )
        .await
}

/// Run catalog requests as tasks; a new request replaces the in-flight one
/// of the same kind.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, catalog: SharedCatalog) {
    match effect {
        Effect::LoadCatalogPage { page, generation } => {
            ctx.tasks().spawn(TaskKey::new("catalog_page"), async move {
                match api::fetch_page(catalog.as_ref(), page).await {
                    Ok(page) => Action::CatalogDidLoad { generation, page },
                    Err(error) => Action::CatalogDidError {
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::SearchPokemon { name, generation } => {
            ctx.tasks().spawn(TaskKey::new("catalog_search"), async move {
                match api::fetch_by_name(catalog.as_ref(), &name).await {
                    Ok(pokemon) => Action::SearchDidLoad {
                        generation,
                        pokemon,
                    },
                    Err(CatalogError::NotFound(name)) => {
                        Action::SearchDidNotFind { generation, name }
                    }
                    Err(error) => Action::SearchDidError {
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
    }
}
