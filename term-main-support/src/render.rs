use crate::settings::{Annotation, Rgb, Settings};
use life_grid::{GridSize, LifeGrid, Loc, Topology};
use log::trace;
use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellStyle {
    pub foreground: Rgb,
    pub background: Rgb,
}

impl CellStyle {
    pub fn inverted(&self) -> Self {
        Self {
            foreground: self.background,
            background: self.foreground,
        }
    }
}

/// Something that can show live cells on a character-cell display.
pub trait CellSink {
    fn display_size(&self) -> (u16, u16);

    fn begin_frame(&mut self) {}

    /// Draws one cell's glyph pair starting at `column`.
    fn put_cell(&mut self, column: u16, row: u16, glyphs: [char; 2], style: CellStyle);

    fn put_text(&mut self, column: u16, row: u16, text: &str, style: CellStyle);

    fn end_frame(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Viewport offset in cells. The display shows the grid starting at cell
/// (`row`, `col`).
///
/// On a toroidal grid the offset rotates the torus and is kept modulo the
/// grid size. On a bounded grid it is clamped so that at least one column
/// and one row of the grid stay on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pan {
    pub row: i32,
    pub col: i32,
    column_residue: i32,
}

impl Pan {
    pub fn shift(&mut self, d_col: i32, d_row: i32, size: GridSize, topology: Topology) {
        self.col = self.col.saturating_add(d_col);
        self.row = self.row.saturating_add(d_row);
        self.normalize(size, topology);
    }

    /// Pans by screen columns and rows. Two screen columns make one cell, so
    /// odd column deltas are carried over to the next drag.
    pub fn drag(&mut self, d_column: i32, d_row: i32, size: GridSize, topology: Topology) {
        let columns = self.column_residue + d_column;
        self.column_residue = columns % 2;
        self.shift(columns / 2, d_row, size, topology);
    }

    pub fn normalize(&mut self, size: GridSize, topology: Topology) {
        let (width, height) = (size.width as i32, size.height as i32);
        match topology {
            Topology::Toroidal => {
                self.col = self.col.rem_euclid(width);
                self.row = self.row.rem_euclid(height);
            }
            Topology::Bounded => {
                self.col = self.col.clamp(1 - width, width - 1);
                self.row = self.row.clamp(1 - height, height - 1);
            }
        }
    }

    /// Screen cell (`row`, `col`) of a grid cell, which may be off screen.
    pub fn to_view(&self, loc: Loc, size: GridSize, topology: Topology) -> (i64, i64) {
        let row = loc.row as i64 - self.row as i64;
        let col = loc.col as i64 - self.col as i64;
        if topology.wraps() {
            (row.rem_euclid(size.height as i64), col.rem_euclid(size.width as i64))
        } else {
            (row, col)
        }
    }

    /// Grid cell under a screen position, if any.
    pub fn from_screen(&self, column: u16, row: u16, size: GridSize, topology: Topology) -> Option<Loc> {
        let mut row = row as i64 + self.row as i64;
        let mut col = (column / 2) as i64 + self.col as i64;
        if topology.wraps() {
            row = row.rem_euclid(size.height as i64);
            col = col.rem_euclid(size.width as i64);
        }
        let loc = Loc::new(u32::try_from(row).ok()?, u32::try_from(col).ok()?);
        size.contains(loc).then_some(loc)
    }
}

/// Decimal value modulo 100 as two digits.
pub fn two_digit_glyphs(value: u32) -> [char; 2] {
    let value = value % 100;
    let digit = |d: u32| char::from_digit(d, 10).unwrap_or('?');
    [digit(value / 10), digit(value % 10)]
}

/// Draws every visible live cell plus the optional status line.
pub fn render_world<S: CellSink>(grid: &LifeGrid, settings: &Settings, pan: &Pan, sink: &mut S) -> io::Result<()> {
    let (columns, rows) = sink.display_size();
    let size = grid.size();
    let topology = settings.topology();
    let style = CellStyle {
        foreground: settings.foreground,
        background: settings.background,
    };
    let annotation = match settings.annotation() {
        Annotation::NeighborCount if !grid.counts_valid() => {
            trace!("neighbor counts stale, drawing plain glyphs");
            Annotation::None
        }
        annotation => annotation,
    };

    sink.begin_frame();
    for (loc, cell) in grid.live_cells() {
        let (view_row, view_col) = pan.to_view(loc, size, topology);
        let column = view_col * 2;
        if view_row < 0 || view_row >= rows as i64 || column < 0 || column + 1 >= columns as i64 {
            continue;
        }
        let glyphs = match annotation {
            Annotation::None => settings.cell_glyphs.0,
            Annotation::NeighborCount => grid
                .neighbor_count(loc)
                .map(|count| two_digit_glyphs(count as u32))
                .unwrap_or(settings.cell_glyphs.0),
            Annotation::Age => two_digit_glyphs(cell.age()),
        };
        sink.put_cell(column as u16, view_row as u16, glyphs, style);
    }

    if settings.show_status && rows > 0 {
        let status = status_line(grid, settings);
        let text: String = status.chars().take(columns as usize).collect();
        sink.put_text(0, 0, &text, style.inverted());
    }
    sink.end_frame()
}

fn status_line(grid: &LifeGrid, settings: &Settings) -> String {
    format!(
        " gen {}  pop {}  speed {}  {}{}{} ",
        grid.generation(),
        grid.population(),
        settings.speed,
        grid.size(),
        if settings.wrap { "  wrap" } else { "" },
        if settings.paused { "  [paused]" } else { "" },
    )
}
