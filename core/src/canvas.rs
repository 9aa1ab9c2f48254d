//! Character-cell drawing contracts and the clipping [`Viewer`].

use crate::{CellCoord, CellRect};

/// Colours a canvas may attach to cells.
///
/// Monochrome backends are free to ignore every colour request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Whatever the display uses when nothing was requested.
    Default,
    /// Red foreground.
    Red,
    /// Green foreground.
    Green,
    /// Yellow foreground.
    Yellow,
    /// Blue foreground.
    Blue,
    /// White foreground.
    White,
}

/// Bounded character grid that painters write onto.
///
/// Writes outside `0..width` × `0..height` are silently dropped; they are never
/// reported as errors.
pub trait Canvas {
    /// Number of columns addressable on the canvas.
    fn width(&self) -> u32;

    /// Number of rows addressable on the canvas.
    fn height(&self) -> u32;

    /// Writes a single character, ignoring out-of-bounds cells.
    fn put_char(&mut self, column: i32, row: i32, glyph: char);

    /// Writes consecutive characters starting at the provided cell.
    ///
    /// The text is truncated at the right edge; rows outside the canvas are a
    /// no-op.
    fn put_str(&mut self, column: i32, row: i32, text: &str) {
        if row < 0 || i64::from(row) >= i64::from(self.height()) {
            return;
        }
        let right_edge = i64::from(self.width());
        for (offset, glyph) in text.chars().enumerate() {
            let target = i64::from(column) + offset as i64;
            if target >= right_edge {
                break;
            }
            if let Ok(target) = i32::try_from(target) {
                self.put_char(target, row, glyph);
            }
        }
    }

    /// Applies a colour to one cell.
    fn color(&mut self, _column: i32, _row: i32, _color: Color) {}

    /// Applies a colour to every cell of the rectangle.
    fn colors(&mut self, _rect: CellRect, _color: Color) {}
}

/// Anything that knows how to draw itself onto a [`Canvas`].
pub trait Painter {
    /// Paints the receiver onto the canvas.
    fn paint_on(&self, canvas: &mut dyn Canvas);
}

/// Clipping proxy that exposes a sub-rectangle of another canvas.
///
/// Coordinates written through the viewer are relative to the window origin
/// and anything falling outside the window is discarded before it reaches the
/// bound canvas. The viewer borrows its target only for as long as a single
/// paint call needs it.
pub struct Viewer<'a> {
    target: &'a mut dyn Canvas,
    window: CellRect,
}

impl<'a> Viewer<'a> {
    /// Binds a viewer to `target`, exposing only `window`.
    #[must_use]
    pub fn bind(target: &'a mut dyn Canvas, window: CellRect) -> Self {
        Self { target, window }
    }

    /// Window of the bound canvas visible through the viewer.
    #[must_use]
    pub const fn window(&self) -> CellRect {
        self.window
    }

    fn translate(&self, column: i32, row: i32) -> Option<(i32, i32)> {
        let local = CellRect::from_origin_and_size(
            CellCoord::new(0, 0),
            self.window.width(),
            self.window.height(),
        );
        if !local.contains(CellCoord::new(column, row)) {
            return None;
        }
        let origin = self.window.origin();
        let column = origin.column().checked_add(column)?;
        let row = origin.row().checked_add(row)?;
        Some((column, row))
    }
}

impl Canvas for Viewer<'_> {
    fn width(&self) -> u32 {
        self.window.width()
    }

    fn height(&self) -> u32 {
        self.window.height()
    }

    fn put_char(&mut self, column: i32, row: i32, glyph: char) {
        if let Some((column, row)) = self.translate(column, row) {
            self.target.put_char(column, row, glyph);
        }
    }

    fn color(&mut self, column: i32, row: i32, color: Color) {
        if let Some((column, row)) = self.translate(column, row) {
            self.target.color(column, row, color);
        }
    }

    fn colors(&mut self, rect: CellRect, color: Color) {
        let left = rect.origin().column().max(0);
        let top = rect.origin().row().max(0);
        let right = (i64::from(rect.origin().column()) + i64::from(rect.width()))
            .min(i64::from(self.window.width()));
        let bottom = (i64::from(rect.origin().row()) + i64::from(rect.height()))
            .min(i64::from(self.window.height()));
        let width = u32::try_from(right - i64::from(left)).unwrap_or(0);
        let height = u32::try_from(bottom - i64::from(top)).unwrap_or(0);
        if width == 0 || height == 0 {
            return;
        }
        if let Some((column, row)) = self.translate(left, top) {
            let clipped = CellRect::from_origin_and_size(CellCoord::new(column, row), width, height);
            self.target.colors(clipped, color);
        }
    }
}
