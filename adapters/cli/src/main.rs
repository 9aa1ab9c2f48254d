#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Snake Arena in a terminal.

mod clock;
mod input;
mod settings;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Instant,
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event as TerminalEvent};
use snake_arena_core::{
    BoardSize, Canvas, CellCoord, CellRect, Color, Command, Event, Painter, Viewer,
};
use snake_arena_rendering::{GridCanvas, HeadlessRenderer, Renderer};
use snake_arena_rendering_terminal::TerminalRenderer;
use snake_arena_world::{self as world, query, Config, World};
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use clock::FixedClock;
use input::Input;
use settings::Settings;

const DEFAULT_SIM_HZ: u32 = 20;
const DEFAULT_RENDER_HZ: u32 = 60;
const STATUS_ROWS: u32 = 1;

/// Terminal snake on a wrapping board.
#[derive(Debug, Parser)]
#[command(name = "snake-arena", version)]
struct Args {
    /// Board width in cells; defaults to the terminal width.
    #[arg(long)]
    width: Option<u32>,
    /// Board height in cells; defaults to the terminal height minus the status line.
    #[arg(long)]
    height: Option<u32>,
    /// Seed for the world's random number generator.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// File receiving log output; the terminal itself is used for the game.
    #[arg(long, value_name = "PATH", default_value = "snake-arena.log")]
    log_file: PathBuf,
    /// Runs this many ticks without a terminal and prints the final frame.
    #[arg(long, value_name = "TICKS")]
    headless_ticks: Option<u64>,
    /// Simulation ticks per second.
    #[arg(long)]
    sim_hz: Option<u32>,
    /// Maximum frames rendered per second.
    #[arg(long)]
    render_hz: Option<u32>,
}

/// Launch parameters after layering flags over the settings file.
#[derive(Debug)]
struct Launch {
    settings: Settings,
    board: Option<BoardSize>,
    seed: Option<u64>,
    sim_hz: u32,
    render_hz: u32,
}

impl Launch {
    fn resolve(args: &Args, settings: Settings) -> Result<Self> {
        let width = args.width.or(settings.width);
        let height = args.height.or(settings.height);
        let board = match (width, height) {
            (Some(width), Some(height)) => {
                ensure!(width > 0 && height > 0, "board dimensions must be positive");
                Some(BoardSize::new(width, height))
            }
            _ => None,
        };
        let sim_hz = args.sim_hz.or(settings.sim_hz).unwrap_or(DEFAULT_SIM_HZ);
        let render_hz = args
            .render_hz
            .or(settings.render_hz)
            .unwrap_or(DEFAULT_RENDER_HZ);
        ensure!(sim_hz > 0, "--sim-hz must be positive");
        ensure!(render_hz > 0, "--render-hz must be positive");

        Ok(Self {
            seed: args.seed.or(settings.seed),
            settings,
            board,
            sim_hz,
            render_hz,
        })
    }

    fn world_config(&self, board: BoardSize) -> Config {
        let config = self.settings.apply_to(Config::new(board));
        match self.seed {
            Some(seed) => config.with_rng_seed(seed),
            None => config,
        }
    }
}

/// Entry point for the Snake Arena command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let launch = Launch::resolve(&args, settings)?;
    debug!(?launch, "launch resolved");

    match args.headless_ticks {
        Some(ticks) => run_headless(&launch, ticks),
        None => run_terminal(&launch),
    }
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run_headless(launch: &Launch, ticks: u64) -> Result<()> {
    let board = launch.board.unwrap_or_else(|| Config::default().board());
    let mut renderer = HeadlessRenderer::new(board.width(), board.height() + STATUS_ROWS);
    renderer
        .initialize()
        .context("failed to initialise headless renderer")?;
    let mut canvas = renderer.create_canvas();
    let mut world = World::new(launch.world_config(board));
    info!(ticks, "headless run started");

    let mut events = Vec::new();
    present(&mut world, &mut renderer, &mut canvas, false)?;
    for _ in 0..ticks {
        world::apply(&mut world, Command::Tick, &mut events);
        log_events(&mut events);
        present(&mut world, &mut renderer, &mut canvas, false)?;
    }
    renderer.dispose().context("failed to dispose headless renderer")?;

    println!("{}", query::welcome_banner(&world));
    for line in canvas.lines() {
        println!("{}", line.trim_end());
    }
    info!(
        ticks = query::tick_index(&world),
        rows = renderer.flushed().len(),
        "headless run finished"
    );
    Ok(())
}

fn run_terminal(launch: &Launch) -> Result<()> {
    let mut renderer = TerminalRenderer::stdout();
    renderer
        .initialize()
        .context("failed to initialise terminal")?;
    let outcome = drive_terminal(launch, &mut renderer);
    renderer.dispose().context("failed to restore terminal")?;
    outcome
}

fn drive_terminal(launch: &Launch, renderer: &mut TerminalRenderer) -> Result<()> {
    let (width, height) = renderer.on_resized()?;
    let follow_display = launch.board.is_none();
    let board = launch.board.unwrap_or_else(|| display_board(width, height));
    let mut world = World::new(launch.world_config(board));
    let mut canvas = renderer.create_canvas();
    info!(
        banner = query::welcome_banner(&world),
        width = board.width(),
        height = board.height(),
        "terminal session started"
    );

    let start = Instant::now();
    let mut simulation = FixedClock::new(launch.sim_hz, start);
    let mut frames = FixedClock::new(launch.render_hz, start);
    let mut events = Vec::new();
    let mut repaint = true;

    loop {
        let now = Instant::now();
        let wait = simulation.until_due(now).min(frames.until_due(now));
        if event::poll(wait).context("failed to poll terminal events")? {
            match event::read().context("failed to read terminal event")? {
                TerminalEvent::Key(key) => match input::map_key(key) {
                    Some(Input::Quit) => break,
                    Some(Input::Steer(operation)) => world::apply(
                        &mut world,
                        Command::QueueOperation { operation },
                        &mut events,
                    ),
                    None => {}
                },
                TerminalEvent::Resize(..) => {
                    let (width, height) = renderer.on_resized()?;
                    canvas = renderer.create_canvas();
                    repaint = true;
                    if follow_display {
                        world::apply(
                            &mut world,
                            Command::ResizeBoard {
                                size: display_board(width, height),
                            },
                            &mut events,
                        );
                    }
                }
                _ => {}
            }
        }

        let now = Instant::now();
        if simulation.is_due(now) {
            world::apply(&mut world, Command::Tick, &mut events);
        }
        log_events(&mut events);
        if frames.is_due(now) {
            present(&mut world, renderer, &mut canvas, repaint)?;
            repaint = false;
        }
    }

    info!(
        ticks = query::tick_index(&world),
        score = query::snake_view(&world).map_or(0, |snake| snake.score),
        "terminal session ended"
    );
    Ok(())
}

fn display_board(width: u32, height: u32) -> BoardSize {
    BoardSize::new(width, height.saturating_sub(STATUS_ROWS))
}

/// Paints and flushes a frame when the world changed, then acknowledges it.
fn present<R: Renderer>(
    world: &mut World,
    renderer: &mut R,
    canvas: &mut GridCanvas,
    force: bool,
) -> Result<()> {
    if !force && !query::needs_render(world) {
        return Ok(());
    }
    world.paint_on(canvas);
    paint_status(world, canvas);
    let report = renderer.render(canvas).context("failed to render frame")?;
    if report.is_complete() {
        let mut events = Vec::new();
        world::apply(world, Command::ConfirmRender, &mut events);
    }
    Ok(())
}

fn paint_status(world: &World, canvas: &mut GridCanvas) {
    let row = i32::try_from(query::board_size(world).height()).unwrap_or(i32::MAX);
    let width = canvas.width();
    let window = CellRect::from_origin_and_size(CellCoord::new(0, row), width, STATUS_ROWS);
    let (score, length) = query::snake_view(world)
        .map_or((0, 0), |snake| (snake.score, snake.body.len() + 1));

    let text = format!("score {score:<5} length {length:<4} arrows steer, q quits");
    let line = format!("{text:<width$}", width = width as usize);
    let mut viewer = Viewer::bind(canvas, window);
    viewer.put_str(0, 0, &line);
    viewer.colors(
        CellRect::from_origin_and_size(CellCoord::new(0, 0), width, STATUS_ROWS),
        Color::White,
    );
}

fn log_events(events: &mut Vec<Event>) {
    for event in events.drain(..) {
        match event {
            Event::FoodEaten {
                kind, bonus, score, ..
            } => info!(?kind, bonus, score, "snake ate"),
            Event::BoardResized { size } => {
                info!(width = size.width(), height = size.height(), "board resized")
            }
            other => trace!(event = ?other, "world event"),
        }
    }
}
