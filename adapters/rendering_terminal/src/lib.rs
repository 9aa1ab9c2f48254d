#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Crossterm-backed terminal renderer for Snake Arena.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use snake_arena_core::Color;
use snake_arena_rendering::{
    flush_dirty_rows, Cell, GridCanvas, RenderError, RenderReport, Renderer,
};
use tracing::{debug, warn};

/// Renderer drawing onto a terminal through crossterm.
///
/// When bound to the process's stdout the renderer owns the terminal: it
/// switches to raw mode and the alternate screen on initialisation and
/// restores both on disposal or drop.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write = Stdout> {
    out: W,
    owns_terminal: bool,
    width: u16,
    height: u16,
    active: bool,
}

impl TerminalRenderer<Stdout> {
    /// Creates a renderer that takes over the process's terminal.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            owns_terminal: true,
            width: 0,
            height: 0,
            active: false,
        }
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer writing escape sequences to `out` for a display of
    /// fixed size, without touching terminal modes.
    #[must_use]
    pub fn with_writer(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            owns_terminal: false,
            width,
            height,
            active: false,
        }
    }

    /// Writer receiving the escape sequences.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn refresh_size(&mut self) -> Result<(), RenderError> {
        if self.owns_terminal {
            let (width, height) = terminal::size()?;
            self.width = width;
            self.height = height;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn initialize(&mut self) -> Result<(), RenderError> {
        if self.owns_terminal {
            enable_raw_mode()?;
            queue!(self.out, EnterAlternateScreen, Hide)?;
        }
        queue!(self.out, Clear(ClearType::All))?;
        self.out.flush()?;
        self.refresh_size()?;
        self.active = true;
        debug!(width = self.width, height = self.height, "terminal initialised");
        Ok(())
    }

    fn on_resized(&mut self) -> Result<(u32, u32), RenderError> {
        if !self.active {
            return Err(RenderError::NotInitialized);
        }
        self.refresh_size()?;
        queue!(self.out, Clear(ClearType::All))?;
        self.out.flush()?;
        Ok((u32::from(self.width), u32::from(self.height)))
    }

    fn create_canvas(&mut self) -> GridCanvas {
        GridCanvas::new(u32::from(self.width), u32::from(self.height))
    }

    fn render(&mut self, canvas: &mut GridCanvas) -> Result<RenderReport, RenderError> {
        if !self.active {
            return Err(RenderError::NotInitialized);
        }
        let height = self.height;
        let report = flush_dirty_rows(canvas, |row, cells| {
            let Ok(line) = u16::try_from(row) else {
                return Err(RenderError::RowOutOfRange {
                    row,
                    height: u32::from(height),
                });
            };
            write_row(&mut self.out, line, cells).map_err(RenderError::from)
        });
        self.out.flush()?;
        if !report.is_complete() {
            warn!(failed = report.failed, "frame flushed partially");
        }
        Ok(report)
    }

    fn dispose(&mut self) -> Result<(), RenderError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(self.out, ResetColor)?;
        if self.owns_terminal {
            queue!(self.out, Show, LeaveAlternateScreen)?;
            self.out.flush()?;
            disable_raw_mode()?;
        } else {
            self.out.flush()?;
        }
        debug!("terminal restored");
        Ok(())
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        if let Err(error) = self.dispose() {
            warn!(%error, "failed to restore terminal");
        }
    }
}

/// Writes one row, switching colour only where consecutive cells differ.
fn write_row<W: Write>(out: &mut W, row: u16, cells: &[Cell]) -> io::Result<()> {
    queue!(out, MoveTo(0, row))?;
    let mut run = String::new();
    let mut run_color = None;
    for cell in cells {
        if run_color != Some(cell.color) {
            if let Some(color) = run_color {
                queue!(out, SetForegroundColor(terminal_color(color)), Print(&run))?;
                run.clear();
            }
            run_color = Some(cell.color);
        }
        run.push(cell.glyph);
    }
    if let Some(color) = run_color {
        queue!(out, SetForegroundColor(terminal_color(color)), Print(&run))?;
    }
    queue!(out, ResetColor)
}

fn terminal_color(color: Color) -> TermColor {
    match color {
        Color::Default => TermColor::Reset,
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Yellow => TermColor::Yellow,
        Color::Blue => TermColor::Blue,
        Color::White => TermColor::White,
    }
}
