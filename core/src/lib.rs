#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Painting flows the other way: the world implements [`Painter`]
//! and writes onto any [`Canvas`] an adapter hands it.

mod canvas;

pub use canvas::{Canvas, Color, Painter, Viewer};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Snake Arena.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by exactly one step.
    Tick,
    /// Queues a directional intent captured by the input layer.
    QueueOperation {
        /// Intent to apply on a later tick.
        operation: Operation,
    },
    /// Replaces the board dimensions, typically after the display resized.
    ResizeBoard {
        /// New board dimensions measured in cells.
        size: BoardSize,
    },
    /// Acknowledges that the last paint reached the display.
    ConfirmRender,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks processed since the world was created.
        tick: u64,
    },
    /// Confirms that a queued operation turned the snake.
    DirectionChanged {
        /// Heading before the change.
        from: Direction,
        /// Heading after the change.
        to: Direction,
    },
    /// Confirms that the snake's head advanced between two cells.
    SnakeMoved {
        /// Cell the head occupied before moving.
        from: CellCoord,
        /// Cell the head occupies after wrapping onto the board.
        to: CellCoord,
    },
    /// Announces that the spawner staged a new food entity.
    FoodSpawned {
        /// Identifier reserved for the food.
        food: EntityId,
        /// Variant of the food.
        kind: FoodKind,
        /// Cell the food appears on.
        cell: CellCoord,
    },
    /// Reports that the snake ate a food entity.
    FoodEaten {
        /// Identifier of the eaten food.
        food: EntityId,
        /// Variant of the eaten food.
        kind: FoodKind,
        /// Score awarded for the meal.
        bonus: u32,
        /// Snake score after the meal.
        score: u32,
    },
    /// Confirms that an entity left the registries at the drain point.
    EntityRemoved {
        /// Identifier of the removed entity.
        entity: EntityId,
    },
    /// Announces that the board dimensions changed.
    BoardResized {
        /// Dimensions after the resize.
        size: BoardSize,
    },
}

/// Discrete directional intents accepted from the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Turn the snake towards decreasing rows.
    MoveUp,
    /// Turn the snake towards increasing rows.
    MoveDown,
    /// Turn the snake towards decreasing columns.
    MoveLeft,
    /// Turn the snake towards increasing columns.
    MoveRight,
}

impl Operation {
    /// Heading the operation asks the snake to take.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::MoveUp => Direction::Up,
            Self::MoveDown => Direction::Down,
            Self::MoveLeft => Direction::Left,
            Self::MoveRight => Direction::Right,
        }
    }
}

/// Cardinal headings available on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every heading, in the order random walkers draw from.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector travelled by one step in this direction.
    #[must_use]
    pub const fn vector(self) -> Vector {
        match self {
            Self::Up => Vector::new(0, -1),
            Self::Down => Vector::new(0, 1),
            Self::Left => Vector::new(-1, 0),
            Self::Right => Vector::new(1, 0),
        }
    }

    /// Heading that would reverse this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Integer displacement on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    dx: i32,
    dy: i32,
}

impl Vector {
    /// Creates a new displacement.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Column delta.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Row delta.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }
}

/// Unique identifier assigned to an entity by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed: wandering food may step off the board before it is
/// destroyed, and painters may address cells left of or above a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell displaced by the provided vector.
    #[must_use]
    pub const fn offset(self, vector: Vector) -> Self {
        Self {
            column: self.column.saturating_add(vector.dx()),
            row: self.row.saturating_add(vector.dy()),
        }
    }
}

/// Dimensions of the playing field measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    width: u32,
    height: u32,
}

impl BoardSize {
    /// Creates a new board size descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell at the centre of the board, rounding towards the origin.
    #[must_use]
    pub fn center(&self) -> CellCoord {
        CellCoord::new(clamp_to_i32(self.width / 2), clamp_to_i32(self.height / 2))
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= 0
            && cell.row() >= 0
            && i64::from(cell.column()) < i64::from(self.width)
            && i64::from(cell.row()) < i64::from(self.height)
    }

    /// Folds the cell back onto the board, treating each axis as a ring.
    ///
    /// A zero-sized axis leaves the coordinate on that axis untouched.
    #[must_use]
    pub fn wrap(&self, cell: CellCoord) -> CellCoord {
        CellCoord::new(
            wrap_axis(cell.column(), self.width),
            wrap_axis(cell.row(), self.height),
        )
    }
}

fn wrap_axis(value: i32, extent: u32) -> i32 {
    if extent == 0 {
        return value;
    }
    let wrapped = i64::from(value).rem_euclid(i64::from(extent));
    i32::try_from(wrapped).unwrap_or(0)
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    width: u32,
    height: u32,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column = i64::from(cell.column()) - i64::from(self.origin.column());
        let row = i64::from(cell.row()) - i64::from(self.origin.row());
        column >= 0 && row >= 0 && column < i64::from(self.width) && row < i64::from(self.height)
    }
}

/// Variants of food the spawner can place on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// Stationary food worth a small bonus.
    Toad,
    /// Random-walking food that flees off the board edges.
    Rat,
    /// Erratic flier with a three-cell footprint.
    Bird,
}

impl FoodKind {
    /// Score awarded when the snake eats the food.
    #[must_use]
    pub const fn bonus(self) -> u32 {
        match self {
            Self::Toad => 3,
            Self::Rat => 5,
            Self::Bird => 10,
        }
    }

    /// Number of body segments the snake gains from the meal.
    #[must_use]
    pub const fn growth(self) -> u32 {
        match self {
            Self::Toad => 1,
            Self::Rat => 2,
            Self::Bird => 3,
        }
    }

    /// Characters painted for the food, left to right from its anchor cell.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Toad => "X",
            Self::Rat => "L",
            Self::Bird => "^-^",
        }
    }
}

/// Per-tick motion policy assigned to a food when it is spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Never moves.
    Stationary,
    /// Steps one cell in a random cardinal direction at a random cadence.
    RandomWalk {
        /// Upper bound of the divisor re-rolled every tick; lower is livelier.
        motivation: u32,
    },
    /// Keeps a persistent random velocity that is re-rolled now and then.
    ErraticFlight {
        /// Upper bound of the divisor deciding when the velocity changes.
        turn_interval: u32,
        /// Upper bound of the divisor deciding when the food moves.
        move_interval: u32,
    },
}

/// Blueprint for a food entity emitted by the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FoodSpec {
    /// Variant of the food.
    pub kind: FoodKind,
    /// Cell the food appears on.
    pub cell: CellCoord,
    /// Motion policy applied every tick.
    pub motion: Motion,
}

#[cfg(test)]
mod tests {
    use super::{BoardSize, CellCoord, CellRect, Direction, EntityId, FoodKind, Operation};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn entity_id_round_trips_through_bincode() {
        assert_round_trip(&EntityId::new(42));
    }

    #[test]
    fn cell_coord_round_trips_with_negative_components() {
        assert_round_trip(&CellCoord::new(-3, 7));
    }

    #[test]
    fn opposite_table_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn opposite_vectors_cancel_out() {
        for direction in Direction::ALL {
            let there = direction.vector();
            let back = direction.opposite().vector();
            assert_eq!(there.dx() + back.dx(), 0);
            assert_eq!(there.dy() + back.dy(), 0);
        }
    }

    #[test]
    fn operations_map_onto_matching_directions() {
        assert_eq!(Operation::MoveUp.direction(), Direction::Up);
        assert_eq!(Operation::MoveDown.direction(), Direction::Down);
        assert_eq!(Operation::MoveLeft.direction(), Direction::Left);
        assert_eq!(Operation::MoveRight.direction(), Direction::Right);
    }

    #[test]
    fn wrap_folds_each_axis_independently() {
        let board = BoardSize::new(20, 10);
        assert_eq!(board.wrap(CellCoord::new(20, 4)), CellCoord::new(0, 4));
        assert_eq!(board.wrap(CellCoord::new(-1, 4)), CellCoord::new(19, 4));
        assert_eq!(board.wrap(CellCoord::new(5, 10)), CellCoord::new(5, 0));
        assert_eq!(board.wrap(CellCoord::new(5, -1)), CellCoord::new(5, 9));
        assert_eq!(board.wrap(CellCoord::new(7, 3)), CellCoord::new(7, 3));
    }

    #[test]
    fn contains_rejects_cells_on_the_far_edges() {
        let board = BoardSize::new(4, 3);
        assert!(board.contains(CellCoord::new(3, 2)));
        assert!(!board.contains(CellCoord::new(4, 2)));
        assert!(!board.contains(CellCoord::new(3, 3)));
        assert!(!board.contains(CellCoord::new(-1, 0)));
    }

    #[test]
    fn center_rounds_towards_origin() {
        assert_eq!(BoardSize::new(20, 10).center(), CellCoord::new(10, 5));
        assert_eq!(BoardSize::new(7, 5).center(), CellCoord::new(3, 2));
    }

    #[test]
    fn cell_rect_contains_only_interior_cells() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(2, 1), 3, 1);
        assert!(rect.contains(CellCoord::new(2, 1)));
        assert!(rect.contains(CellCoord::new(4, 1)));
        assert!(!rect.contains(CellCoord::new(5, 1)));
        assert!(!rect.contains(CellCoord::new(2, 2)));
    }

    #[test]
    fn glyph_width_matches_variant_footprint() {
        assert_eq!(FoodKind::Toad.glyph().chars().count(), 1);
        assert_eq!(FoodKind::Rat.glyph().chars().count(), 1);
        assert_eq!(FoodKind::Bird.glyph().chars().count(), 3);
    }
}
