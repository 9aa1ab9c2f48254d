//! Tagged entity record and the capability traits it dispatches through.

use rand_chacha::ChaCha8Rng;
use snake_arena_core::{BoardSize, Canvas, CellCoord, EntityId, Event, FoodKind, FoodSpec, Painter};

use crate::{board::Board, food::Food, snake::Snake, spawner::FoodSpawner};

/// Everything a tickable may touch while it advances.
///
/// Structural changes never happen through the context: entities only report
/// that they expired or that new food should be staged, and the world turns
/// those reports into queued mutations once the entity returns.
pub(crate) struct TickContext<'a> {
    pub(crate) board: BoardSize,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) events: &'a mut Vec<Event>,
    pub(crate) spawned: Vec<FoodSpec>,
    dirty: &'a mut bool,
    expired: bool,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(
        board: BoardSize,
        rng: &'a mut ChaCha8Rng,
        dirty: &'a mut bool,
        events: &'a mut Vec<Event>,
    ) -> Self {
        Self {
            board,
            rng,
            events,
            spawned: Vec::new(),
            dirty,
            expired: false,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        *self.dirty = true;
    }

    pub(crate) fn expire(&mut self) {
        self.expired = true;
    }

    pub(crate) fn into_outcome(self) -> (bool, Vec<FoodSpec>) {
        (self.expired, self.spawned)
    }
}

/// Advances once per simulation step.
pub(crate) trait Tickable {
    /// `ticks` already includes the current step.
    fn tick(&mut self, ticks: u64, ctx: &mut TickContext<'_>);
}

/// Other side of a contact, as seen by the unit reacting to it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Peer {
    pub(crate) snake_head: Option<CellCoord>,
}

/// What a unit wants done after reacting to a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reaction {
    Ignore,
    Eaten { kind: FoodKind },
}

/// Positioned unit that takes part in the collision phase.
pub(crate) trait Collidable {
    fn footprint(&self) -> Vec<CellCoord>;

    fn on_collided(&mut self, _other: &Peer) -> Reaction {
        Reaction::Ignore
    }
}

#[derive(Debug)]
pub(crate) enum EntityKind {
    Board(Board),
    Snake(Snake),
    Food(Food),
    Spawner(FoodSpawner),
}

/// Single record stored in the world's entity table.
#[derive(Debug)]
pub(crate) struct Entity {
    pub(crate) ticks: u64,
    pub(crate) active: bool,
    pub(crate) kind: EntityKind,
}

impl Entity {
    pub(crate) fn new(kind: EntityKind) -> Self {
        Self {
            ticks: 0,
            active: true,
            kind,
        }
    }

    pub(crate) fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.ticks = self.ticks.wrapping_add(1);
        let ticks = self.ticks;
        match &mut self.kind {
            EntityKind::Board(board) => board.tick(ticks, ctx),
            EntityKind::Snake(snake) => snake.tick(ticks, ctx),
            EntityKind::Food(food) => food.tick(ticks, ctx),
            EntityKind::Spawner(spawner) => spawner.tick(ticks, ctx),
        }
    }

    /// Cells the entity occupies; entities without a position occupy none.
    pub(crate) fn footprint(&self) -> Vec<CellCoord> {
        match &self.kind {
            EntityKind::Snake(snake) => snake.footprint(),
            EntityKind::Food(food) => food.footprint(),
            EntityKind::Board(_) | EntityKind::Spawner(_) => Vec::new(),
        }
    }

    pub(crate) fn on_collided(&mut self, other: &Peer) -> Reaction {
        match &mut self.kind {
            EntityKind::Snake(snake) => snake.on_collided(other),
            EntityKind::Food(food) => food.on_collided(other),
            EntityKind::Board(_) | EntityKind::Spawner(_) => Reaction::Ignore,
        }
    }

    pub(crate) fn as_peer(&self) -> Peer {
        let snake_head = match &self.kind {
            EntityKind::Snake(snake) => Some(snake.head()),
            _ => None,
        };
        Peer { snake_head }
    }

    pub(crate) fn snake(&self) -> Option<&Snake> {
        match &self.kind {
            EntityKind::Snake(snake) => Some(snake),
            _ => None,
        }
    }

    pub(crate) fn snake_mut(&mut self) -> Option<&mut Snake> {
        match &mut self.kind {
            EntityKind::Snake(snake) => Some(snake),
            _ => None,
        }
    }

    pub(crate) fn food(&self) -> Option<&Food> {
        match &self.kind {
            EntityKind::Food(food) => Some(food),
            _ => None,
        }
    }
}

impl Painter for Entity {
    fn paint_on(&self, canvas: &mut dyn Canvas) {
        match &self.kind {
            EntityKind::Board(board) => board.paint_on(canvas),
            EntityKind::Snake(snake) => snake.paint_on(canvas),
            EntityKind::Food(food) => food.paint_on(canvas),
            EntityKind::Spawner(_) => {}
        }
    }
}

/// Hands out monotonically increasing identifiers.
#[derive(Debug)]
pub(crate) struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    pub(crate) fn new() -> Self {
        Self { next: 0 }
    }

    pub(crate) fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
