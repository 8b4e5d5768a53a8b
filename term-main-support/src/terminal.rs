use crate::render::{CellSink, CellStyle};
use crate::settings::Rgb;
use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
    EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue};
use log::{debug, warn};
use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScreenCell {
    ch: char,
    style: Option<CellStyle>,
}

const BLANK: ScreenCell = ScreenCell { ch: ' ', style: None };

/// A [`CellSink`] that keeps the last drawn frame and writes only the
/// screen cells that changed since then.
pub struct TerminalSink<W: Write> {
    out: W,
    columns: u16,
    rows: u16,
    prev: Vec<ScreenCell>,
    next: Vec<ScreenCell>,
    needs_clear: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, columns: u16, rows: u16) -> Self {
        let mut sink = Self {
            out,
            columns: 0,
            rows: 0,
            prev: Vec::new(),
            next: Vec::new(),
            needs_clear: true,
        };
        sink.reset_buffers(columns, rows);
        sink
    }

    /// After a size change the screen contents are unknown, so the next
    /// frame starts from a cleared screen.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        if (columns, rows) == (self.columns, self.rows) {
            return;
        }
        debug!("display resized to {columns}x{rows}");
        self.reset_buffers(columns, rows);
    }

    fn reset_buffers(&mut self, columns: u16, rows: u16) {
        let num_cells = columns as usize * rows as usize;
        self.columns = columns;
        self.rows = rows;
        self.prev = vec![BLANK; num_cells];
        self.next = vec![BLANK; num_cells];
        self.needs_clear = true;
    }

    fn set(&mut self, column: u16, row: u16, cell: ScreenCell) {
        if column < self.columns && row < self.rows {
            let index = row as usize * self.columns as usize + column as usize;
            self.next[index] = cell;
        }
    }

    fn flush_changes(&mut self) -> io::Result<()> {
        let mut last_style = None;
        for row in 0..self.rows {
            let mut cursor_at = None;
            for column in 0..self.columns {
                let index = row as usize * self.columns as usize + column as usize;
                let cell = self.next[index];
                if cell == self.prev[index] {
                    continue;
                }
                if cursor_at != Some(column) {
                    queue!(self.out, cursor::MoveTo(column, row))?;
                }
                if last_style != Some(cell.style) {
                    match cell.style {
                        Some(style) => queue!(
                            self.out,
                            SetForegroundColor(color(style.foreground)),
                            SetBackgroundColor(color(style.background))
                        )?,
                        None => queue!(self.out, ResetColor)?,
                    }
                    last_style = Some(cell.style);
                }
                queue!(self.out, Print(cell.ch))?;
                cursor_at = Some(column + 1);
            }
        }
        self.prev.copy_from_slice(&self.next);
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.components();
    Color::Rgb { r, g, b }
}

impl<W: Write> CellSink for TerminalSink<W> {
    fn display_size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    fn begin_frame(&mut self) {
        self.next.fill(BLANK);
    }

    fn put_cell(&mut self, column: u16, row: u16, glyphs: [char; 2], style: CellStyle) {
        let style = Some(style);
        self.set(column, row, ScreenCell { ch: glyphs[0], style });
        self.set(column.saturating_add(1), row, ScreenCell { ch: glyphs[1], style });
    }

    fn put_text(&mut self, column: u16, row: u16, text: &str, style: CellStyle) {
        let style = Some(style);
        for (ch, column) in text.chars().zip(column..) {
            self.set(column, row, ScreenCell { ch, style });
        }
    }

    fn end_frame(&mut self) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        if self.needs_clear {
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
            self.prev.fill(BLANK);
            self.needs_clear = false;
        }
        self.flush_changes()?;
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

/// The process-wide terminal state that lives outside the output stream.
pub trait TerminalModes {
    fn enable_raw_mode(&mut self) -> io::Result<()>;
    fn disable_raw_mode(&mut self) -> io::Result<()>;
    fn size(&self) -> io::Result<(u16, u16)>;
}

#[derive(Debug, Default)]
pub struct CrosstermModes;

impl TerminalModes for CrosstermModes {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

/// Owns the terminal while the simulation runs: raw mode, the alternate
/// screen, mouse capture and a hidden cursor. Everything is restored by
/// [`Terminal::leave`] or on drop, including when entering fails halfway.
pub struct Terminal<W: Write = BufWriter<Stdout>, M: TerminalModes = CrosstermModes> {
    sink: TerminalSink<W>,
    modes: M,
    active: bool,
}

impl Terminal {
    pub fn enter() -> Result<Self> {
        Self::enter_with(BufWriter::with_capacity(16384, io::stdout()), CrosstermModes)
    }
}

impl<W: Write, M: TerminalModes> Terminal<W, M> {
    pub fn enter_with(out: W, modes: M) -> Result<Self> {
        let mut result = Self {
            sink: TerminalSink::new(out, 0, 0),
            modes,
            active: true,
        };
        result
            .modes
            .enable_raw_mode()
            .context("failed to enable raw mode")?;
        execute!(
            result.sink.out,
            EnterAlternateScreen,
            EnableMouseCapture,
            DisableLineWrap,
            cursor::Hide
        )
        .context("failed to enter alternate screen")?;
        let (columns, rows) = result.size()?;
        result.sink.resize(columns, rows);
        Ok(result)
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        self.modes.size().context("failed to read terminal size")
    }

    pub fn poll_event(&self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    pub fn sink(&mut self) -> &mut TerminalSink<W> {
        &mut self.sink
    }

    /// Runs every restore step even if an earlier one fails.
    pub fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let screen = execute!(
            self.sink.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("failed to leave alternate screen");
        let raw = self
            .modes
            .disable_raw_mode()
            .context("failed to disable raw mode");
        screen.and(raw)
    }
}

impl<W: Write, M: TerminalModes> Drop for Terminal<W, M> {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            warn!("terminal not restored: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const STYLE: CellStyle = CellStyle {
        foreground: Rgb::BLUE,
        background: Rgb::WHITE,
    };

    fn frame(sink: &mut TerminalSink<Vec<u8>>, draw: impl FnOnce(&mut TerminalSink<Vec<u8>>)) -> String {
        sink.out.clear();
        sink.begin_frame();
        draw(sink);
        sink.end_frame().unwrap();
        String::from_utf8(sink.out.clone()).unwrap()
    }

    #[test]
    fn unchanged_frames_write_no_cells() {
        let mut sink = TerminalSink::new(Vec::new(), 10, 4);
        let first = frame(&mut sink, |sink| sink.put_cell(2, 1, ['<', '>'], STYLE));
        assert!(first.contains("<>"));

        let second = frame(&mut sink, |sink| sink.put_cell(2, 1, ['<', '>'], STYLE));
        assert!(!second.contains('<'));
        assert!(!second.contains('>'));
    }

    #[test]
    fn removed_cells_are_blanked() {
        let mut sink = TerminalSink::new(Vec::new(), 10, 4);
        frame(&mut sink, |sink| sink.put_cell(2, 1, ['<', '>'], STYLE));
        let erased = frame(&mut sink, |_| {});
        assert!(erased.contains("  "));
        assert!(!erased.contains('<'));
    }

    #[test]
    fn drawing_outside_the_display_is_dropped() {
        let mut sink = TerminalSink::new(Vec::new(), 4, 2);
        let output = frame(&mut sink, |sink| {
            sink.put_cell(3, 0, ['a', 'b'], STYLE);
            sink.put_text(0, 5, "hidden", STYLE);
        });
        assert!(output.contains('a'));
        assert!(!output.contains('b'));
        assert!(!output.contains("hidden"));
    }

    #[derive(Clone, Default)]
    struct SharedOutput(Rc<RefCell<Vec<u8>>>);

    impl SharedOutput {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeModes {
        raw: Rc<Cell<bool>>,
        raw_fails: bool,
        size_fails: bool,
    }

    impl TerminalModes for FakeModes {
        fn enable_raw_mode(&mut self) -> io::Result<()> {
            if self.raw_fails {
                return Err(io::Error::other("not a tty"));
            }
            self.raw.set(true);
            Ok(())
        }

        fn disable_raw_mode(&mut self) -> io::Result<()> {
            self.raw.set(false);
            Ok(())
        }

        fn size(&self) -> io::Result<(u16, u16)> {
            if self.size_fails {
                Err(io::Error::other("no size"))
            } else {
                Ok((40, 12))
            }
        }
    }

    const ENTER_ALTERNATE_SCREEN: &str = "\x1b[?1049h";
    const LEAVE_ALTERNATE_SCREEN: &str = "\x1b[?1049l";
    const SHOW_CURSOR: &str = "\x1b[?25h";

    #[test]
    fn enter_and_leave_restore_the_terminal() {
        let output = SharedOutput::default();
        let raw = Rc::new(Cell::new(false));
        let modes = FakeModes {
            raw: raw.clone(),
            ..FakeModes::default()
        };
        let mut terminal = Terminal::enter_with(output.clone(), modes).unwrap();
        assert!(raw.get());
        assert_eq!(terminal.sink().display_size(), (40, 12));
        assert!(!output.text().contains(LEAVE_ALTERNATE_SCREEN));

        terminal.leave().unwrap();
        assert!(!raw.get());
        assert!(output.text().contains(LEAVE_ALTERNATE_SCREEN));
        assert!(output.text().contains(SHOW_CURSOR));
    }

    #[test]
    fn failed_size_query_still_restores() {
        let output = SharedOutput::default();
        let raw = Rc::new(Cell::new(false));
        let modes = FakeModes {
            raw: raw.clone(),
            size_fails: true,
            ..FakeModes::default()
        };
        assert!(Terminal::enter_with(output.clone(), modes).is_err());
        assert!(!raw.get());
        assert!(output.text().contains(LEAVE_ALTERNATE_SCREEN));
        assert!(output.text().contains(SHOW_CURSOR));
    }

    #[test]
    fn failed_raw_mode_leaves_no_alternate_screen() {
        let output = SharedOutput::default();
        let modes = FakeModes {
            raw_fails: true,
            ..FakeModes::default()
        };
        let err = Terminal::enter_with(output.clone(), modes).err().unwrap();
        assert!(format!("{err:#}").contains("raw mode"));
        assert!(!output.text().contains(ENTER_ALTERNATE_SCREEN));
    }

    #[test]
    fn resize_forces_a_full_redraw() {
        let mut sink = TerminalSink::new(Vec::new(), 10, 4);
        frame(&mut sink, |sink| sink.put_text(0, 0, "status", STYLE));
        sink.resize(12, 5);
        assert_eq!(sink.display_size(), (12, 5));
        let redrawn = frame(&mut sink, |sink| sink.put_text(0, 0, "status", STYLE));
        assert!(redrawn.contains("status"));
    }
}
