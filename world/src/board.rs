//! Playing field dimensions and background painting.

use snake_arena_core::{BoardSize, Canvas, EntityId, Painter};

use crate::entity::{TickContext, Tickable};

/// Background of the arena.
///
/// The occupancy grid is allocated to the board's dimensions but nothing
/// writes to it yet; it is reserved for obstacle placement.
#[derive(Debug)]
pub(crate) struct Board {
    size: BoardSize,
    occupancy: Vec<Option<EntityId>>,
}

impl Board {
    pub(crate) fn new(size: BoardSize) -> Self {
        Self {
            size,
            occupancy: vec![None; cell_count(size)],
        }
    }

    pub(crate) const fn size(&self) -> BoardSize {
        self.size
    }

    pub(crate) fn resize(&mut self, size: BoardSize) {
        self.size = size;
        self.occupancy = vec![None; cell_count(size)];
    }

    pub(crate) fn occupancy(&self) -> &[Option<EntityId>] {
        &self.occupancy
    }
}

fn cell_count(size: BoardSize) -> usize {
    let cells = u64::from(size.width()) * u64::from(size.height());
    usize::try_from(cells).unwrap_or(0)
}

impl Tickable for Board {
    fn tick(&mut self, _ticks: u64, _ctx: &mut TickContext<'_>) {}
}

impl Painter for Board {
    fn paint_on(&self, canvas: &mut dyn Canvas) {
        let width = self.size.width().min(canvas.width());
        let height = self.size.height().min(canvas.height());
        let blank = " ".repeat(usize::try_from(width).unwrap_or(0));
        for row in 0..height {
            canvas.put_str(0, i32::try_from(row).unwrap_or(i32::MAX), &blank);
        }
    }
}
