#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Arena adapters.
//!
//! The world paints onto a [`GridCanvas`], which remembers which rows changed
//! since they were last flushed. Backends implement [`Renderer`] and push only
//! those rows to the display.

use snake_arena_core::{Canvas, CellCoord, CellRect, Color};
use thiserror::Error;
use tracing::warn;

const BLANK: char = ' ';

/// Failures raised by rendering backends.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the display failed.
    #[error("display I/O failed")]
    Io(#[from] std::io::Error),
    /// A row outside the canvas was addressed.
    #[error("row {row} is outside a canvas of {height} rows")]
    RowOutOfRange {
        /// Requested row.
        row: u32,
        /// Number of rows on the canvas.
        height: u32,
    },
    /// The backend was used before [`Renderer::initialize`] or after
    /// [`Renderer::dispose`].
    #[error("renderer is not initialised")]
    NotInitialized,
}

/// Single character cell with its requested colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Character shown in the cell.
    pub glyph: char,
    /// Foreground colour of the cell.
    pub color: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: BLANK,
            color: Color::Default,
        }
    }
}

/// In-memory character grid that tracks which rows changed.
///
/// Each row is compared against what was last flushed for it, so painting a
/// background and then the same foreground over it leaves the row clean.
#[derive(Clone, Debug)]
pub struct GridCanvas {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    presented: Vec<Cell>,
    forced: Vec<bool>,
}

impl GridCanvas {
    /// Creates a blank canvas whose rows all need an initial flush.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let cells = vec![Cell::default(); cell_count(width, height)];
        Self {
            width,
            height,
            presented: cells.clone(),
            cells,
            forced: vec![true; height as usize],
        }
    }

    /// Discards the contents and adopts new dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Cells of the requested row, left to right.
    #[must_use]
    pub fn row(&self, row: u32) -> Option<&[Cell]> {
        self.cells.get(self.row_range(row)?)
    }

    /// Characters of the requested row as a string.
    #[must_use]
    pub fn row_text(&self, row: u32) -> Option<String> {
        self.row(row)
            .map(|cells| cells.iter().map(|cell| cell.glyph).collect())
    }

    /// Every row of the canvas as text, top to bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.height).filter_map(|row| self.row_text(row)).collect()
    }

    /// Reports whether the row changed since it was last flushed.
    #[must_use]
    pub fn is_row_dirty(&self, row: u32) -> bool {
        let Some(range) = self.row_range(row) else {
            return false;
        };
        self.forced.get(row as usize).copied().unwrap_or(false)
            || self.cells.get(range.clone()) != self.presented.get(range)
    }

    /// Indices of every dirty row, top to bottom.
    pub fn dirty_rows(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.height).filter(|row| self.is_row_dirty(*row))
    }

    /// Records that the row reached the display with its current contents.
    pub fn mark_clean(&mut self, row: u32) {
        let Some(range) = self.row_range(row) else {
            return;
        };
        if let (Some(presented), Some(cells)) =
            (self.presented.get_mut(range.clone()), self.cells.get(range))
        {
            presented.copy_from_slice(cells);
        }
        if let Some(forced) = self.forced.get_mut(row as usize) {
            *forced = false;
        }
    }

    /// Forces every row to be flushed again, e.g. after the display was cleared.
    pub fn mark_all_dirty(&mut self) {
        self.forced.iter_mut().for_each(|forced| *forced = true);
    }

    fn row_range(&self, row: u32) -> Option<std::ops::Range<usize>> {
        if row >= self.height {
            return None;
        }
        let start = row as usize * self.width as usize;
        Some(start..start + self.width as usize)
    }

    fn cell_mut(&mut self, column: i32, row: i32) -> Option<&mut Cell> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        self.cells
            .get_mut(row as usize * self.width as usize + column as usize)
    }
}

fn cell_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

impl Canvas for GridCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put_char(&mut self, column: i32, row: i32, glyph: char) {
        if let Some(cell) = self.cell_mut(column, row) {
            *cell = Cell {
                glyph,
                color: Color::Default,
            };
        }
    }

    fn color(&mut self, column: i32, row: i32, color: Color) {
        if let Some(cell) = self.cell_mut(column, row) {
            cell.color = color;
        }
    }

    fn colors(&mut self, rect: CellRect, color: Color) {
        let origin = rect.origin();
        for row in 0..rect.height() {
            for column in 0..rect.width() {
                let cell = CellCoord::new(
                    origin.column().saturating_add_unsigned(column),
                    origin.row().saturating_add_unsigned(row),
                );
                self.color(cell.column(), cell.row(), color);
            }
        }
    }
}

/// Outcome of flushing a canvas to the display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Rows written successfully.
    pub flushed: usize,
    /// Rows whose write failed; they stay dirty for the next pass.
    pub failed: usize,
}

impl RenderReport {
    /// Reports whether every dirty row reached the display.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Writes every dirty row through `write_row`, clearing marks on success.
///
/// Row failures are logged and swallowed so one bad row never aborts a frame.
pub fn flush_dirty_rows<F>(canvas: &mut GridCanvas, mut write_row: F) -> RenderReport
where
    F: FnMut(u32, &[Cell]) -> Result<(), RenderError>,
{
    let rows: Vec<u32> = canvas.dirty_rows().collect();
    let mut report = RenderReport::default();
    for row in rows {
        let Some(cells) = canvas.row(row) else {
            continue;
        };
        match write_row(row, cells) {
            Ok(()) => {
                canvas.mark_clean(row);
                report.flushed += 1;
            }
            Err(error) => {
                warn!(row, %error, "row flush failed");
                report.failed += 1;
            }
        }
    }
    report
}

/// Rendering backend capable of presenting a [`GridCanvas`].
pub trait Renderer {
    /// Prepares the display for drawing.
    fn initialize(&mut self) -> Result<(), RenderError>;

    /// Re-reads the display size after it changed and returns the new
    /// dimensions in cells.
    fn on_resized(&mut self) -> Result<(u32, u32), RenderError>;

    /// Creates a canvas matching the current display size.
    fn create_canvas(&mut self) -> GridCanvas;

    /// Flushes the canvas rows that changed since the last render.
    fn render(&mut self, canvas: &mut GridCanvas) -> Result<RenderReport, RenderError>;

    /// Restores the display to its original state.
    fn dispose(&mut self) -> Result<(), RenderError>;
}

/// Row written by the [`HeadlessRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlushedRow {
    /// Index of the row.
    pub row: u32,
    /// Characters of the row at the time it was flushed.
    pub text: String,
}

/// Display-less backend that records every row it flushes.
#[derive(Debug)]
pub struct HeadlessRenderer {
    width: u32,
    height: u32,
    initialized: bool,
    flushed: Vec<FlushedRow>,
}

impl HeadlessRenderer {
    /// Creates a backend emulating a display of the provided size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            initialized: false,
            flushed: Vec::new(),
        }
    }

    /// Emulates the display changing size; takes effect on [`Renderer::on_resized`].
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Rows flushed so far, in flush order.
    #[must_use]
    pub fn flushed(&self) -> &[FlushedRow] {
        &self.flushed
    }

    /// Drains the recorded rows.
    pub fn take_flushed(&mut self) -> Vec<FlushedRow> {
        std::mem::take(&mut self.flushed)
    }
}

impl Renderer for HeadlessRenderer {
    fn initialize(&mut self) -> Result<(), RenderError> {
        self.initialized = true;
        Ok(())
    }

    fn on_resized(&mut self) -> Result<(u32, u32), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }
        Ok((self.width, self.height))
    }

    fn create_canvas(&mut self) -> GridCanvas {
        GridCanvas::new(self.width, self.height)
    }

    fn render(&mut self, canvas: &mut GridCanvas) -> Result<RenderReport, RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }
        let flushed = &mut self.flushed;
        Ok(flush_dirty_rows(canvas, |row, cells| {
            flushed.push(FlushedRow {
                row,
                text: cells.iter().map(|cell| cell.glyph).collect(),
            });
            Ok(())
        }))
    }

    fn dispose(&mut self) -> Result<(), RenderError> {
        self.initialized = false;
        Ok(())
    }
}
