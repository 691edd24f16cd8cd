//! Application state machine
//!
//! Menu, game and editor are separate states, each owning only its own
//! data. Transitions go through one table so every path is visible in a
//! single place.

use glam::Vec2;

use crate::ViewportContext;
use crate::config::GameConfig;
use crate::level::{Editor, Level, LoadOutcome};
use crate::sim::{GameSession, TickInput};

/// Requests that move the application between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    StartGame,
    OpenEditor,
    BackToMenu,
    Quit,
}

/// Which state the application is in, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Game,
    Editor,
    Exiting,
}

/// Target screen for `event` from `from`, or `None` if the event does not
/// apply there. `Exiting` is terminal.
pub fn transition(from: Screen, event: AppEvent) -> Option<Screen> {
    match (from, event) {
        (Screen::Exiting, _) => None,
        (_, AppEvent::Quit) => Some(Screen::Exiting),
        (Screen::Menu, AppEvent::StartGame) => Some(Screen::Game),
        (Screen::Menu, AppEvent::OpenEditor) => Some(Screen::Editor),
        (Screen::Game | Screen::Editor, AppEvent::BackToMenu) => Some(Screen::Menu),
        _ => None,
    }
}

/// Current state and the data it owns
#[derive(Debug, Clone)]
pub enum AppState {
    Menu,
    Game(GameSession),
    Editor(Editor),
    Exiting,
}

impl AppState {
    pub fn screen(&self) -> Screen {
        match self {
            AppState::Menu => Screen::Menu,
            AppState::Game(_) => Screen::Game,
            AppState::Editor(_) => Screen::Editor,
            AppState::Exiting => Screen::Exiting,
        }
    }
}

/// Input collected by the frontend for one frame. Clicks and key presses
/// are edge-triggered.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer position in viewport space
    pub pointer: Option<Vec2>,
    /// Left click in game: launch the ball
    pub launch: bool,
    /// Return to the menu from game or editor
    pub menu_toggle: bool,
    /// Left click in editor
    pub select: bool,
    /// Right click in editor
    pub place: bool,
    /// Modifier held with `place`
    pub place_indestructible: bool,
    /// Delete in editor
    pub clear: bool,
    pub save: bool,
}

/// The application
#[derive(Debug)]
pub struct App {
    state: AppState,
    pub config: GameConfig,
    viewport: ViewportContext,
}

impl App {
    pub fn new(config: GameConfig, viewport: ViewportContext) -> Self {
        Self {
            state: AppState::Menu,
            config,
            viewport,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn viewport(&self) -> ViewportContext {
        self.viewport
    }

    pub fn is_running(&self) -> bool {
        self.screen() != Screen::Exiting
    }

    /// Apply an event. Returns false if it does not apply to the current
    /// state, in which case nothing changes.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        let from = self.screen();
        let Some(to) = transition(from, event) else {
            log::debug!("Ignoring {event:?} in {from:?}");
            return false;
        };

        log::info!("{from:?} -> {to:?}");
        self.state = match to {
            Screen::Menu => AppState::Menu,
            Screen::Game => AppState::Game(GameSession::start(&self.config, &self.viewport)),
            Screen::Editor => AppState::Editor(self.open_editor()),
            Screen::Exiting => AppState::Exiting,
        };
        true
    }

    /// Advance one frame
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        if input.menu_toggle && matches!(self.screen(), Screen::Game | Screen::Editor) {
            self.handle_event(AppEvent::BackToMenu);
            return;
        }

        match &mut self.state {
            AppState::Game(session) => {
                let tick = TickInput {
                    pointer: input.pointer,
                    launch: input.launch,
                };
                session.tick(&tick, dt, &self.viewport);
            }
            AppState::Editor(editor) => {
                if input.select {
                    if let Some(pointer) = input.pointer {
                        editor.select_at(pointer);
                    }
                }
                if input.place {
                    editor.place_at_selection(input.place_indestructible);
                }
                if input.clear {
                    editor.clear_selection();
                }
                if input.save {
                    // Failure is reported on the status line
                    let _ = editor.save(&self.config.level_path);
                }
            }
            AppState::Menu | AppState::Exiting => {}
        }
    }

    /// Follow a window resize. Degenerate sizes (minimized window) are
    /// ignored and the last valid viewport is kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = ViewportContext::new(width, height);
        if !viewport.is_valid() {
            log::debug!("Ignoring resize to {width}x{height}");
            return;
        }
        self.viewport = viewport;

        match &mut self.state {
            AppState::Game(session) => session.resize(&viewport),
            AppState::Editor(editor) => editor.resize(&viewport),
            AppState::Menu | AppState::Exiting => {}
        }
    }

    /// Status line for the current state
    pub fn status(&self) -> String {
        match &self.state {
            AppState::Game(session) => session.status(),
            AppState::Editor(editor) => editor.status.clone(),
            AppState::Menu | AppState::Exiting => String::new(),
        }
    }

    fn open_editor(&self) -> Editor {
        let mut level = Level::default();
        let outcome = level.load(&self.config.level_path);
        if !outcome.is_success() {
            log::warn!(
                "Level file issues during editor init ({outcome:?}); check {}",
                self.config.level_path.display()
            );
        }

        let mut editor = Editor::new(level.into_grid(), &self.viewport);
        if outcome == LoadOutcome::Unreadable {
            log::warn!(
                "Saving disabled: {} exists but could not be read",
                self.config.level_path.display()
            );
            editor.protect_file();
        }
        editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{CellCoord, GridCell};
    use crate::sim::SessionPhase;

    fn temp_config(name: &str) -> GameConfig {
        let dir = std::env::temp_dir()
            .join(format!("brickbreak-app-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = GameConfig {
            level_path: dir.join("level.txt"),
            ..Default::default()
        };
        let _ = std::fs::remove_file(&config.level_path);
        config
    }

    fn app(name: &str) -> App {
        App::new(temp_config(name), ViewportContext::new(1200.0, 800.0))
    }

    #[test]
    fn test_transition_table() {
        use AppEvent::*;
        assert_eq!(transition(Screen::Menu, StartGame), Some(Screen::Game));
        assert_eq!(transition(Screen::Menu, OpenEditor), Some(Screen::Editor));
        assert_eq!(transition(Screen::Menu, BackToMenu), None);
        assert_eq!(transition(Screen::Game, BackToMenu), Some(Screen::Menu));
        assert_eq!(transition(Screen::Editor, BackToMenu), Some(Screen::Menu));
        assert_eq!(transition(Screen::Game, OpenEditor), None);
        assert_eq!(transition(Screen::Editor, StartGame), None);
        for from in [Screen::Menu, Screen::Game, Screen::Editor] {
            assert_eq!(transition(from, Quit), Some(Screen::Exiting));
        }
        for event in [StartGame, OpenEditor, BackToMenu, Quit] {
            assert_eq!(transition(Screen::Exiting, event), None);
        }
    }

    #[test]
    fn test_start_game_and_toggle_back() {
        let mut app = app("game");
        assert!(app.handle_event(AppEvent::StartGame));
        match app.state() {
            AppState::Game(session) => assert_eq!(session.phase(), SessionPhase::Serve),
            other => panic!("expected game, got {other:?}"),
        }
        assert_eq!(app.status(), "Click to launch ball");

        let input = FrameInput {
            menu_toggle: true,
            ..Default::default()
        };
        app.update(&input, 1.0 / 60.0);
        assert_eq!(app.screen(), Screen::Menu);
    }

    #[test]
    fn test_editor_flow_saves_level() {
        let mut app = app("editor");
        app.handle_event(AppEvent::OpenEditor);

        let target = match app.state() {
            AppState::Editor(editor) => {
                editor.grid.geometry().cell_rect(CellCoord::new(3, 6)).center()
            }
            other => panic!("expected editor, got {other:?}"),
        };

        let select = FrameInput {
            pointer: Some(target),
            select: true,
            ..Default::default()
        };
        app.update(&select, 0.0);
        assert!(app.status().starts_with("Selected [3,6]"));

        let place = FrameInput {
            place: true,
            place_indestructible: true,
            save: true,
            ..Default::default()
        };
        app.update(&place, 0.0);
        assert_eq!(app.status(), "Level saved successfully!");

        let mut level = Level::default();
        level.load(&app.config.level_path);
        assert_eq!(level.grid().get(CellCoord::new(3, 6)), Some(GridCell::Indestructible));
    }

    #[test]
    fn test_unreadable_level_is_not_overwritten() {
        let mut app = app("unreadable");
        // A directory exists but cannot be read as a level file
        let dir = app.config.level_path.with_file_name("level-dir");
        std::fs::create_dir_all(&dir).unwrap();
        app.config.level_path = dir.clone();

        app.handle_event(AppEvent::OpenEditor);
        match app.state() {
            AppState::Editor(editor) => assert!(editor.is_protected()),
            other => panic!("expected editor, got {other:?}"),
        }

        let save = FrameInput {
            save: true,
            ..Default::default()
        };
        app.update(&save, 0.0);
        assert_eq!(app.status(), "ERROR: Could not save level!");
        assert!(dir.is_dir());
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut app = app("quit");
        app.handle_event(AppEvent::OpenEditor);
        assert!(app.handle_event(AppEvent::Quit));
        assert!(!app.is_running());
        assert!(!app.handle_event(AppEvent::StartGame));
        assert_eq!(app.screen(), Screen::Exiting);
    }

    #[test]
    fn test_invalid_resize_ignored() {
        let mut app = app("resize");
        app.handle_event(AppEvent::StartGame);
        app.resize(0.0, 600.0);
        assert_eq!(app.viewport(), ViewportContext::new(1200.0, 800.0));

        app.resize(1600.0, 900.0);
        assert_eq!(app.viewport(), ViewportContext::new(1600.0, 900.0));
        match app.state() {
            AppState::Game(session) => assert_eq!(session.paddle.center_x(), 800.0),
            other => panic!("expected game, got {other:?}"),
        }
    }
}
