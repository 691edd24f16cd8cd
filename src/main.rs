//! Brickbreak entry point
//!
//! Headless frontend: inspect and edit the level file, or run a scripted
//! game through the same state machine a windowed frontend would drive.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use brickbreak::consts::{GRID_COLS, GRID_ROWS};
use brickbreak::level::{CellCoord, LoadOutcome};
use brickbreak::persistence::format_grid;
use brickbreak::sim::SessionPhase;
use brickbreak::{
    App, AppEvent, AppState, Editor, FrameInput, GameConfig, GridStore, Level, ViewportContext,
};

/// Fixed frame step for headless runs
const FRAME_DT: f32 = 1.0 / 60.0;

/// Ball-and-paddle brick breaker with a level editor.
#[derive(Debug, Parser)]
#[command(name = "brickbreak", version, about)]
struct Args {
    /// Config file (JSON). Missing fields and a missing file use defaults.
    #[arg(short, long, default_value = "brickbreak.json", value_name = "FILE")]
    config: PathBuf,

    /// Level file, overriding the one named in the config
    #[arg(short, long, value_name = "FILE")]
    level: Option<PathBuf>,

    /// Viewport width
    #[arg(long, default_value = "1024", value_name = "PX")]
    width: f32,

    /// Viewport height
    #[arg(long, default_value = "768", value_name = "PX")]
    height: f32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the level grid
    Show,
    /// Overwrite the level file with the default layout
    Reset,
    /// Write the effective config to the config file
    InitConfig,
    /// Play a game headlessly with the paddle tracking the ball
    Simulate {
        /// Frames to run at 60 fps
        #[arg(short, long, default_value = "3600")]
        frames: u32,
        /// RNG seed, overriding the config
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Change one cell of the level file
    Edit {
        #[arg(long)]
        row: usize,
        #[arg(long)]
        col: usize,
        /// Place an indestructible brick instead of the row's tier
        #[arg(long, conflicts_with = "clear")]
        indestructible: bool,
        /// Empty the cell
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = GameConfig::load(&args.config);
    if let Some(level) = args.level {
        config.level_path = level;
    }
    let viewport = ViewportContext::new(args.width, args.height);
    if !viewport.is_valid() {
        bail!("viewport must be positive, got {}x{}", args.width, args.height);
    }

    match args.command {
        Command::Show => show(&config),
        Command::Reset => {
            Level::new(GridStore::default_layout())
                .save(&config.level_path)
                .context("resetting level")?;
            println!("Wrote default layout to {}", config.level_path.display());
            Ok(())
        }
        Command::InitConfig => {
            config.save(&args.config).context("writing config")?;
            println!("Wrote config to {}", args.config.display());
            Ok(())
        }
        Command::Simulate { frames, seed } => {
            if let Some(seed) = seed {
                config.seed = seed;
            }
            simulate(config, viewport, frames)
        }
        Command::Edit {
            row,
            col,
            indestructible,
            clear,
        } => edit(&config, viewport, CellCoord::new(row, col), indestructible, clear),
    }
}

fn show(config: &GameConfig) -> Result<()> {
    let mut level = Level::default();
    let outcome = level.load(&config.level_path);
    print!("{}", format_grid(level.grid().cells()));
    println!(
        "{}: {} destructible bricks ({})",
        config.level_path.display(),
        level.grid().destructible_count(),
        describe(outcome)
    );
    Ok(())
}

fn describe(outcome: LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Loaded => "loaded".to_string(),
        LoadOutcome::Partial { invalid_cells } => {
            format!("{invalid_cells} invalid cells set to empty")
        }
        LoadOutcome::CreatedDefault => "created default layout".to_string(),
        LoadOutcome::Unreadable => "unreadable, showing default layout".to_string(),
    }
}

fn simulate(config: GameConfig, viewport: ViewportContext, frames: u32) -> Result<()> {
    let mut app = App::new(config, viewport);
    app.handle_event(AppEvent::StartGame);

    let mut played = 0;
    for frame in 0..frames {
        let AppState::Game(session) = app.state() else {
            bail!("game did not start");
        };
        if session.phase().is_finished() {
            break;
        }

        let input = FrameInput {
            pointer: Some(session.ball.pos),
            launch: session.phase() == SessionPhase::Serve,
            ..Default::default()
        };
        app.update(&input, FRAME_DT);
        played = frame + 1;
    }

    let AppState::Game(session) = app.state() else {
        bail!("game ended unexpectedly");
    };
    println!(
        "frames: {played}  score: {}  lives: {}  bricks left: {}  phase: {}",
        session.score,
        session.lives,
        session.level.active_count(),
        session.phase().as_str()
    );
    Ok(())
}

fn edit(
    config: &GameConfig,
    viewport: ViewportContext,
    cell: CellCoord,
    indestructible: bool,
    clear: bool,
) -> Result<()> {
    if cell.row >= GRID_ROWS || cell.col >= GRID_COLS {
        bail!(
            "cell [{},{}] is outside the {GRID_ROWS}x{GRID_COLS} grid",
            cell.row,
            cell.col
        );
    }

    let mut level = Level::default();
    if level.load(&config.level_path) == LoadOutcome::Unreadable {
        bail!(
            "{} exists but could not be read; refusing to overwrite it",
            config.level_path.display()
        );
    }
    let mut editor = Editor::new(level.into_grid(), &viewport);

    let target = editor.grid.geometry().cell_rect(cell).center();
    editor.select_at(target);
    if clear {
        editor.clear_selection();
    } else {
        editor.place_at_selection(indestructible);
    }
    let summary = editor.status.clone();
    editor
        .save(&config.level_path)
        .with_context(|| format!("saving {}", config.level_path.display()))?;

    println!("{summary}\n{}", editor.status);
    Ok(())
}
