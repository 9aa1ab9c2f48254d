//! Food variants and their per-tick motion policies.

use rand::Rng;
use snake_arena_core::{
    Canvas, CellCoord, CellRect, Color, Direction, FoodKind, FoodSpec, Motion, Painter, Vector,
    Viewer,
};

use crate::entity::{Collidable, Peer, Reaction, TickContext, Tickable};

/// Food placed on the board by the spawner.
///
/// Collisions use the anchor cell only, even for variants whose glyph spans
/// several columns.
#[derive(Debug)]
pub(crate) struct Food {
    kind: FoodKind,
    cell: CellCoord,
    motion: Motion,
    velocity: Vector,
}

impl Food {
    pub(crate) fn from_spec(spec: FoodSpec) -> Self {
        Self {
            kind: spec.kind,
            cell: spec.cell,
            motion: spec.motion,
            velocity: Direction::Right.vector(),
        }
    }

    pub(crate) const fn kind(&self) -> FoodKind {
        self.kind
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    fn step(&mut self, vector: Vector, ctx: &mut TickContext<'_>) {
        self.cell = self.cell.offset(vector);
        if !ctx.board.contains(self.cell) {
            ctx.expire();
        }
        ctx.mark_dirty();
    }
}

fn food_color(kind: FoodKind) -> Color {
    match kind {
        FoodKind::Toad => Color::Green,
        FoodKind::Rat => Color::White,
        FoodKind::Bird => Color::Blue,
    }
}

fn fires<R: Rng + ?Sized>(ticks: u64, interval: u32, rng: &mut R) -> bool {
    let divisor = rng.gen_range(1..=interval.max(1));
    ticks % u64::from(divisor) == 0
}

impl Tickable for Food {
    fn tick(&mut self, ticks: u64, ctx: &mut TickContext<'_>) {
        match self.motion {
            Motion::Stationary => {}
            Motion::RandomWalk { motivation } => {
                if fires(ticks, motivation, ctx.rng) {
                    let direction = Direction::ALL[ctx.rng.gen_range(0..Direction::ALL.len())];
                    self.step(direction.vector(), ctx);
                }
            }
            Motion::ErraticFlight {
                turn_interval,
                move_interval,
            } => {
                if fires(ticks, turn_interval, ctx.rng) {
                    self.velocity =
                        Vector::new(ctx.rng.gen_range(-1..=1), ctx.rng.gen_range(-1..=1));
                }
                if fires(ticks, move_interval, ctx.rng) {
                    self.step(self.velocity, ctx);
                }
            }
        }
    }
}

impl Collidable for Food {
    fn footprint(&self) -> Vec<CellCoord> {
        vec![self.cell]
    }

    fn on_collided(&mut self, other: &Peer) -> Reaction {
        match other.snake_head {
            Some(head) if head == self.cell => Reaction::Eaten { kind: self.kind },
            _ => Reaction::Ignore,
        }
    }
}

impl Painter for Food {
    fn paint_on(&self, canvas: &mut dyn Canvas) {
        let glyph = self.kind.glyph();
        let width = u32::try_from(glyph.chars().count()).unwrap_or(u32::MAX);
        let window = CellRect::from_origin_and_size(self.cell, width, 1);
        let mut viewer = Viewer::bind(canvas, window);
        viewer.put_str(0, 0, glyph);
        viewer.colors(
            CellRect::from_origin_and_size(CellCoord::new(0, 0), width, 1),
            food_color(self.kind),
        );
    }
}
