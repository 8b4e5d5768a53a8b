#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod clock;
mod input;
mod render;
mod settings;
mod terminal;

pub use clock::GenerationClock;
pub use input::{Command, InputClassifier, InputEvent, Key, PointerButton};
pub use render::{CellSink, CellStyle, Pan, render_world, two_digit_glyphs};
pub use settings::{
    Annotation, CellGlyphs, DEFAULT_FRAME_INTERVAL, DEFAULT_SPEED, ParseColorError, Rgb,
    SPEED_RANGE, Settings,
};
pub use terminal::{CrosstermModes, Terminal, TerminalModes, TerminalSink};

use anyhow::{Context, Result};
use life_grid::{DEFAULT_RESIZE_FLOOR, GridSize, ResizeOutcome, World};
use log::{debug, info, trace, warn};
use std::io;
use std::thread;
use std::time::{Duration, Instant};

/// Events handled per frame before drawing, so a flood of input cannot
/// starve rendering.
const MAX_EVENTS_PER_FRAME: usize = 64;

/// Runs `build_world`'s world in the terminal until the user quits. The
/// terminal is restored on every exit path.
pub fn animate<W, F>(settings: Settings, build_world: F) -> Result<()>
where
    W: World,
    F: FnOnce(GridSize) -> Result<W>,
{
    let mut terminal = Terminal::enter()?;
    let result = run(&mut terminal, settings, build_world);
    let restored = terminal.leave();
    first_error(result, restored)
}

/// A failed run outranks a failed restore, which is only logged then.
fn first_error(result: Result<()>, restored: Result<()>) -> Result<()> {
    match (result, restored) {
        (Err(err), Err(restore_err)) => {
            warn!("terminal not restored: {restore_err:#}");
            Err(err)
        }
        (result, restored) => result.and(restored),
    }
}

fn run<W, F>(terminal: &mut Terminal, settings: Settings, build_world: F) -> Result<()>
where
    W: World,
    F: FnOnce(GridSize) -> Result<W>,
{
    let (columns, rows) = terminal.size()?;
    let size = GridSize::from_display(columns, rows).at_least(DEFAULT_RESIZE_FLOOR);
    let world = build_world(size).context("failed to build world")?;
    info!("starting on a {size} grid");

    let mut app = App::new(world, settings, Instant::now());
    app.on_display_size(columns, rows);
    while app.is_running() {
        app.on_frame(terminal)?;
    }
    info!("quit after {} generations", app.world().grid().generation());
    Ok(())
}

/// The simulation plus everything the user can change about how it runs
/// and is shown.
pub struct App<W: World> {
    world: W,
    settings: Settings,
    pan: Pan,
    clock: GenerationClock,
    classifier: InputClassifier,
    running: bool,
}

impl<W: World> App<W> {
    pub fn new(world: W, settings: Settings, now: Instant) -> Self {
        let clock = GenerationClock::new(now, settings.step_interval());
        Self {
            world,
            settings,
            pan: Pan::default(),
            clock,
            classifier: InputClassifier::new(),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    fn on_frame(&mut self, terminal: &mut Terminal) -> Result<()> {
        let frame_start = Instant::now();

        for _ in 0..MAX_EVENTS_PER_FRAME {
            let Some(event) = terminal.poll_event(Duration::ZERO)? else {
                break;
            };
            if let Some(command) = self.classifier.classify(event).and_then(Command::from_input) {
                self.on_command(command, Instant::now());
            }
        }
        if !self.running {
            return Ok(());
        }

        let (columns, rows) = terminal.size()?;
        self.on_display_size(columns, rows);
        terminal.sink().resize(columns, rows);

        let now = Instant::now();
        if !self.settings.paused && self.clock.due(now, self.settings.step_interval()) {
            self.on_time_step();
        }
        self.on_redraw(terminal.sink())?;

        if let Some(rest) = self.settings.frame_interval.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
        Ok(())
    }

    pub fn on_command(&mut self, command: Command, now: Instant) {
        trace!("{command:?}");
        let size = self.world.grid().size();
        let topology = self.world.topology();
        match command {
            Command::Quit => {
                info!("quit requested");
                self.running = false;
            }
            Command::TogglePause => {
                self.settings.toggle_pause();
                if !self.settings.paused {
                    self.clock.restart(now, self.settings.step_interval());
                }
                debug!("paused: {}", self.settings.paused);
            }
            Command::SpeedUp | Command::SlowDown => {
                if command == Command::SpeedUp {
                    self.settings.speed_up();
                } else {
                    self.settings.slow_down();
                }
                self.clock.restart(now, self.settings.step_interval());
                debug!("speed now {}", self.settings.speed);
            }
            Command::Reset => {
                info!("reset");
                self.world.reset();
            }
            Command::Clear => self.world.clear(),
            Command::SingleStep => {
                if self.settings.paused {
                    self.on_time_step();
                }
            }
            Command::ToggleNeighborCounts => {
                self.settings.show_neighbor_counts = !self.settings.show_neighbor_counts
            }
            Command::ToggleAge => self.settings.show_age = !self.settings.show_age,
            Command::ToggleStatus => self.settings.show_status = !self.settings.show_status,
            Command::Pan { d_col, d_row } => self.pan.shift(d_col, d_row, size, topology),
            Command::DragPan { d_column, d_row } => self.pan.drag(d_column, d_row, size, topology),
            Command::ToggleCellAt { row: 0, .. } if self.settings.show_status => {}
            Command::ToggleCellAt { column, row } => {
                if let Some(loc) = self.pan.from_screen(column, row, size, topology)
                    && let Ok(alive) = self.world.toggle_cell(loc)
                {
                    debug!("toggled {loc:?} to alive={alive}");
                }
            }
            Command::Resize { columns, rows } => self.on_display_size(columns, rows),
        }
    }

    /// Follows the display size; the grid ignores sizes below its floor.
    pub fn on_display_size(&mut self, columns: u16, rows: u16) {
        let requested = GridSize::from_display(columns, rows);
        if let ResizeOutcome::Resized { .. } = self.world.resize(requested) {
            self.pan.normalize(requested, self.world.topology());
        }
    }

    pub fn on_time_step(&mut self) {
        let summary = self.world.update();
        trace!(
            "generation {}: {summary:?}",
            self.world.grid().generation()
        );
    }

    pub fn on_redraw<S: CellSink>(&mut self, sink: &mut S) -> io::Result<()> {
        if self.settings.annotation() == Annotation::NeighborCount {
            self.world.refresh_neighbor_counts();
        }
        render_world(self.world.grid(), &self.settings, &self.pan, sink)
    }
}
