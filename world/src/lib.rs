#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake Arena.
//!
//! The world owns every entity, the registries that decide which entities are
//! ticked, collided and painted, and the deferred mutation log that keeps
//! those registries stable while they are walked. Adapters drive it through
//! [`apply`] and observe it through [`query`] and its [`Painter`] impl.

mod board;
mod config;
mod entity;
mod food;
mod mutations;
mod snake;
mod spawner;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_arena_core::{
    BoardSize, Canvas, Command, EntityId, Event, FoodKind, FoodSpec, Operation, Painter,
    WELCOME_BANNER,
};
use snake_arena_system_collision::{detect, Collider, Contact};
use snake_arena_system_spawning::Spawning;
use tracing::{debug, trace};

use board::Board;
use entity::{Entity, EntityAllocator, EntityKind, Reaction, TickContext};
use food::Food;
use mutations::{Mutation, MutationQueue, Registration};
use snake::Snake;
use spawner::FoodSpawner;

pub use config::{Config, SpeedStep, SpeedTable};

/// Represents the authoritative Snake Arena world state.
///
/// Identifiers are allocated monotonically, so iterating the registries in
/// identifier order visits entities in the order they were added.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: Config,
    board: EntityId,
    snake: EntityId,
    entities: BTreeMap<EntityId, Entity>,
    staged: BTreeMap<EntityId, Entity>,
    tickables: BTreeSet<EntityId>,
    game_units: BTreeSet<EntityId>,
    mutations: MutationQueue,
    operations: VecDeque<Operation>,
    allocator: EntityAllocator,
    rng: ChaCha8Rng,
    tick_index: u64,
    dirty: bool,
}

impl World {
    /// Creates a new world with the board, snake and food spawner in place.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let board_size = config.board();
        let snake = Snake::new(
            board_size,
            config.initial_length(),
            config.speed_table().clone(),
        );
        let spawner = FoodSpawner::new(Spawning::new(*config.spawning()));

        let mut world = Self {
            banner: WELCOME_BANNER,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
            config,
            board: EntityId::new(0),
            snake: EntityId::new(0),
            entities: BTreeMap::new(),
            staged: BTreeMap::new(),
            tickables: BTreeSet::new(),
            game_units: BTreeSet::new(),
            mutations: MutationQueue::default(),
            operations: VecDeque::new(),
            allocator: EntityAllocator::new(),
            tick_index: 0,
            dirty: true,
        };
        world.board = world.stage(
            EntityKind::Board(Board::new(board_size)),
            Registration::Tickable,
        );
        world.snake = world.stage(EntityKind::Snake(snake), Registration::GameUnit);
        let _ = world.stage(EntityKind::Spawner(spawner), Registration::Tickable);

        let mut events = Vec::new();
        world.drain_mutations(&mut events);
        world
    }

    fn board_size(&self) -> BoardSize {
        match self.entities.get(&self.board).map(|entity| &entity.kind) {
            Some(EntityKind::Board(board)) => board.size(),
            _ => self.config.board(),
        }
    }

    /// Reserves an identifier and queues the entity's registration.
    fn stage(&mut self, kind: EntityKind, registration: Registration) -> EntityId {
        let id = self.allocator.allocate();
        let _ = self.staged.insert(id, Entity::new(kind));
        self.mutations.push(Mutation::Add {
            entity: id,
            registration,
        });
        id
    }

    fn stage_food(&mut self, spec: FoodSpec, out_events: &mut Vec<Event>) -> EntityId {
        let kind = spec.kind;
        let cell = spec.cell;
        let food = self.stage(
            EntityKind::Food(Food::from_spec(spec)),
            Registration::GameUnit,
        );
        debug!(food = food.get(), ?kind, ?cell, "food staged");
        out_events.push(Event::FoodSpawned { food, kind, cell });
        food
    }

    /// Deactivates the entity now and queues its removal for the drain point.
    ///
    /// Destroying an entity that is already inactive or unknown does nothing.
    fn destroy(&mut self, id: EntityId) {
        let entity = match self.entities.get_mut(&id) {
            Some(entity) => Some(entity),
            None => self.staged.get_mut(&id),
        };
        let Some(entity) = entity else {
            return;
        };
        if !entity.active {
            return;
        }
        entity.active = false;
        self.mutations.push(Mutation::Remove { entity: id });
        trace!(entity = id.get(), "entity destroyed");
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.apply_queued_operation(out_events);
        self.tick_entities(out_events);
        self.resolve_collisions(out_events);
        self.drain_mutations(out_events);
    }

    /// Applies the most recent operation and discards every older one.
    fn apply_queued_operation(&mut self, out_events: &mut Vec<Event>) {
        let Some(operation) = self.operations.pop_back() else {
            return;
        };
        self.operations.clear();

        let Some(snake) = self
            .entities
            .get_mut(&self.snake)
            .filter(|entity| entity.active)
            .and_then(|entity| entity.snake_mut())
        else {
            return;
        };
        let to = operation.direction();
        if let Some(from) = snake.set_direction(to) {
            self.dirty = true;
            out_events.push(Event::DirectionChanged { from, to });
        }
    }

    fn tick_entities(&mut self, out_events: &mut Vec<Event>) {
        let board = self.board_size();
        let tickables: Vec<EntityId> = self.tickables.iter().copied().collect();
        for id in tickables {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            if !entity.active {
                continue;
            }

            let mut ctx = TickContext::new(board, &mut self.rng, &mut self.dirty, out_events);
            entity.tick(&mut ctx);
            let (expired, spawned) = ctx.into_outcome();

            if expired {
                self.destroy(id);
            }
            for spec in spawned {
                let _ = self.stage_food(spec, out_events);
            }
        }
    }

    fn resolve_collisions(&mut self, out_events: &mut Vec<Event>) {
        let snapshot: Vec<Collider> = self
            .game_units
            .iter()
            .filter_map(|id| {
                let entity = self.entities.get(id)?;
                entity
                    .active
                    .then(|| Collider::new(*id, entity.footprint()))
            })
            .collect();

        let mut contacts = Vec::new();
        detect(&snapshot, &mut contacts);
        for contact in contacts {
            self.resolve_contact(contact, out_events);
        }
    }

    /// Notifies both sides of a contact, each with the other as argument.
    fn resolve_contact(&mut self, contact: Contact, out_events: &mut Vec<Event>) {
        self.dispatch_collision(contact.first, contact.second, out_events);
        self.dispatch_collision(contact.second, contact.first, out_events);
    }

    fn dispatch_collision(&mut self, target: EntityId, other: EntityId, out_events: &mut Vec<Event>) {
        let Some(peer) = self
            .entities
            .get(&other)
            .filter(|entity| entity.active)
            .map(Entity::as_peer)
        else {
            return;
        };
        let Some(entity) = self
            .entities
            .get_mut(&target)
            .filter(|entity| entity.active)
        else {
            return;
        };

        match entity.on_collided(&peer) {
            Reaction::Ignore => {}
            Reaction::Eaten { kind } => self.feed_snake(target, kind, out_events),
        }
    }

    fn feed_snake(&mut self, food: EntityId, kind: FoodKind, out_events: &mut Vec<Event>) {
        let board = self.board_size();
        let Some(snake) = self
            .entities
            .get_mut(&self.snake)
            .and_then(|entity| entity.snake_mut())
        else {
            return;
        };
        let bonus = kind.bonus();
        snake.feed(bonus, kind.growth(), board);
        let score = snake.score();

        self.destroy(food);
        self.dirty = true;
        debug!(food = food.get(), ?kind, score, "food eaten");
        out_events.push(Event::FoodEaten {
            food,
            kind,
            bonus,
            score,
        });
    }

    /// Applies every queued mutation, including any queued while draining.
    fn drain_mutations(&mut self, out_events: &mut Vec<Event>) {
        while let Some(mutation) = self.mutations.pop() {
            match mutation {
                Mutation::Add {
                    entity,
                    registration,
                } => {
                    let Some(record) = self.staged.remove(&entity) else {
                        continue;
                    };
                    let _ = self.entities.insert(entity, record);
                    let _ = self.tickables.insert(entity);
                    if registration == Registration::GameUnit {
                        let _ = self.game_units.insert(entity);
                    }
                    self.dirty = true;
                    trace!(entity = entity.get(), ?registration, "entity added");
                }
                Mutation::Remove { entity } => {
                    let _ = self.tickables.remove(&entity);
                    let _ = self.game_units.remove(&entity);
                    let removed = self.entities.remove(&entity).is_some()
                        || self.staged.remove(&entity).is_some();
                    if removed {
                        self.dirty = true;
                        debug!(entity = entity.get(), "entity removed");
                        out_events.push(Event::EntityRemoved { entity });
                    }
                }
            }
        }
    }

    /// Replaces the board dimensions, folds the snake onto the new board and
    /// removes every food left outside it.
    fn resize(&mut self, size: BoardSize, out_events: &mut Vec<Event>) {
        if let Some(EntityKind::Board(board)) = self
            .entities
            .get_mut(&self.board)
            .map(|entity| &mut entity.kind)
        {
            board.resize(size);
        }
        if let Some(snake) = self
            .entities
            .get_mut(&self.snake)
            .and_then(|entity| entity.snake_mut())
        {
            snake.fold_onto(size);
        }
        self.dirty = true;
        debug!(width = size.width(), height = size.height(), "board resized");
        out_events.push(Event::BoardResized { size });

        let stranded: Vec<EntityId> = self
            .game_units
            .iter()
            .copied()
            .filter(|id| {
                self.entities
                    .get(id)
                    .filter(|entity| entity.active)
                    .and_then(Entity::food)
                    .is_some_and(|food| !size.contains(food.cell()))
            })
            .collect();
        for id in stranded {
            self.destroy(id);
        }
        self.drain_mutations(out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Painter for World {
    /// Paints the board background first, then every active game unit.
    fn paint_on(&self, canvas: &mut dyn Canvas) {
        if let Some(board) = self.entities.get(&self.board) {
            board.paint_on(canvas);
        }
        for id in &self.game_units {
            if let Some(entity) = self.entities.get(id).filter(|entity| entity.active) {
                entity.paint_on(canvas);
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.tick(out_events),
        Command::QueueOperation { operation } => {
            trace!(?operation, "operation queued");
            world.operations.push_back(operation);
        }
        Command::ResizeBoard { size } => world.resize(size, out_events),
        Command::ConfirmRender => world.dirty = false,
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Config, World};
    use snake_arena_core::{BoardSize, CellCoord, Direction, EntityId, FoodKind};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether anything visible changed since the last confirmed render.
    #[must_use]
    pub fn needs_render(world: &World) -> bool {
        world.dirty
    }

    /// Current board dimensions.
    #[must_use]
    pub fn board_size(world: &World) -> BoardSize {
        world.board_size()
    }

    /// Number of structural mutations waiting for the drain point.
    ///
    /// Always zero between commands, since every tick ends by draining.
    #[must_use]
    pub fn pending_mutations(world: &World) -> usize {
        world.mutations.len()
    }

    /// Captures the snake's state, if the snake is still registered.
    #[must_use]
    pub fn snake_view(world: &World) -> Option<SnakeView> {
        let snake = world.entities.get(&world.snake)?.snake()?;
        Some(SnakeView {
            head: snake.head(),
            body: snake.body().collect(),
            direction: snake.direction(),
            last_tail: snake.last_tail(),
            score: snake.score(),
            speed: snake.speed(),
        })
    }

    /// Captures every active food on the board.
    #[must_use]
    pub fn food_view(world: &World) -> FoodView {
        let snapshots = world
            .game_units
            .iter()
            .filter_map(|id| {
                let entity = world.entities.get(id).filter(|entity| entity.active)?;
                let food = entity.food()?;
                Some(FoodSnapshot {
                    id: *id,
                    kind: food.kind(),
                    cell: food.cell(),
                    ticks: entity.ticks,
                })
            })
            .collect();
        FoodView { snapshots }
    }

    /// Counts the entries of every registry.
    #[must_use]
    pub fn registry_sizes(world: &World) -> RegistrySizes {
        RegistrySizes {
            entities: world.entities.len(),
            staged: world.staged.len(),
            tickables: world.tickables.len(),
            game_units: world.game_units.len(),
        }
    }

    /// Exposes a read-only view of the board's occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        let (size, cells) = match world
            .entities
            .get(&world.board)
            .map(|entity| &entity.kind)
        {
            Some(super::EntityKind::Board(board)) => (board.size(), board.occupancy()),
            _ => (BoardSize::new(0, 0), &[][..]),
        };
        OccupancyView { size, cells }
    }

    /// Read-only snapshot of the snake.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SnakeView {
        /// Cell occupied by the head.
        pub head: CellCoord,
        /// Body segments from the neck to the tail.
        pub body: Vec<CellCoord>,
        /// Current heading.
        pub direction: Direction,
        /// Tail evicted by the most recent move; growth anchors here.
        pub last_tail: CellCoord,
        /// Accumulated score.
        pub score: u32,
        /// Ticks between two moves at the current score.
        pub speed: u32,
    }

    /// Read-only snapshot describing all active food.
    #[derive(Clone, Debug)]
    pub struct FoodView {
        snapshots: Vec<FoodSnapshot>,
    }

    impl FoodView {
        /// Iterator over the captured food snapshots in registration order.
        pub fn iter(&self) -> impl Iterator<Item = &FoodSnapshot> {
            self.snapshots.iter()
        }

        /// Number of active food entities.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the board holds no food.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<FoodSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single food used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FoodSnapshot {
        /// Identifier of the food entity.
        pub id: EntityId,
        /// Variant of the food.
        pub kind: FoodKind,
        /// Anchor cell of the food.
        pub cell: CellCoord,
        /// Ticks the food has processed since it was registered.
        pub ticks: u64,
    }

    /// Entry counts of the world's registries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RegistrySizes {
        /// Registered entities, active or awaiting removal.
        pub entities: usize,
        /// Entities waiting for their registration to be applied.
        pub staged: usize,
        /// Entities ticked every step.
        pub tickables: usize,
        /// Entities collided and painted.
        pub game_units: usize,
    }

    /// Read-only view into the board's occupancy grid.
    #[derive(Clone, Copy, Debug)]
    pub struct OccupancyView<'a> {
        size: BoardSize,
        cells: &'a [Option<EntityId>],
    }

    impl OccupancyView<'_> {
        /// Returns the entity recorded on the provided cell, if any.
        #[must_use]
        pub fn occupant(&self, cell: CellCoord) -> Option<EntityId> {
            if !self.size.contains(cell) {
                return None;
            }
            let column = usize::try_from(cell.column()).ok()?;
            let row = usize::try_from(cell.row()).ok()?;
            let width = usize::try_from(self.size.width()).ok()?;
            self.cells.get(row * width + column).copied().flatten()
        }

        /// Provides the dimensions of the underlying occupancy grid.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            (self.size.width(), self.size.height())
        }
    }
}
