//! Tunable parameters of the world.

use snake_arena_core::BoardSize;
use snake_arena_system_spawning::Config as SpawningConfig;

const DEFAULT_BOARD: BoardSize = BoardSize::new(40, 20);
const DEFAULT_INITIAL_LENGTH: u32 = 7;
const DEFAULT_RNG_SEED: u64 = 0x5eed_c0de_2b4f_7a91;

/// One step of the score to speed lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedStep {
    /// Scores strictly below this value use the step.
    pub score_below: u32,
    /// Ticks between two snake moves while the step applies.
    pub ticks_per_move: u32,
}

impl SpeedStep {
    /// Creates a new step.
    #[must_use]
    pub const fn new(score_below: u32, ticks_per_move: u32) -> Self {
        Self {
            score_below,
            ticks_per_move,
        }
    }
}

/// Discrete lookup from score to snake speed.
///
/// Speed is the number of ticks between two moves, so a larger value is a
/// slower snake. Steps are consulted in order and the first one whose bound
/// exceeds the score wins; scores past every step use the floor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeedTable {
    steps: Vec<SpeedStep>,
    floor: u32,
}

impl SpeedTable {
    /// Creates a table from ordered steps and the speed used past the last one.
    #[must_use]
    pub fn new(steps: Vec<SpeedStep>, floor: u32) -> Self {
        Self { steps, floor }
    }

    /// Ordered steps consulted before the floor.
    #[must_use]
    pub fn steps(&self) -> &[SpeedStep] {
        &self.steps
    }

    /// Speed used once the score passes every step.
    #[must_use]
    pub const fn floor(&self) -> u32 {
        self.floor
    }

    /// Ticks per move for the provided score; never below one.
    #[must_use]
    pub fn ticks_per_move(&self, score: u32) -> u32 {
        self.steps
            .iter()
            .find(|step| score < step.score_below)
            .map_or(self.floor, |step| step.ticks_per_move)
            .max(1)
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self::new(
            vec![
                SpeedStep::new(10, 5),
                SpeedStep::new(30, 4),
                SpeedStep::new(40, 3),
                SpeedStep::new(50, 2),
            ],
            1,
        )
    }
}

/// Configuration parameters required to construct a [`crate::World`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    board: BoardSize,
    initial_length: u32,
    speed_table: SpeedTable,
    rng_seed: u64,
    spawning: SpawningConfig,
}

impl Config {
    /// Creates a configuration for the provided board using default tuning.
    #[must_use]
    pub fn new(board: BoardSize) -> Self {
        Self {
            board,
            initial_length: DEFAULT_INITIAL_LENGTH,
            speed_table: SpeedTable::default(),
            rng_seed: DEFAULT_RNG_SEED,
            spawning: SpawningConfig::default(),
        }
    }

    /// Replaces the number of body segments the snake starts with.
    #[must_use]
    pub fn with_initial_length(mut self, initial_length: u32) -> Self {
        self.initial_length = initial_length;
        self
    }

    /// Replaces the score to speed lookup.
    #[must_use]
    pub fn with_speed_table(mut self, speed_table: SpeedTable) -> Self {
        self.speed_table = speed_table;
        self
    }

    /// Replaces the seed of the world's random number generator.
    #[must_use]
    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Replaces the food spawning configuration.
    #[must_use]
    pub fn with_spawning(mut self, spawning: SpawningConfig) -> Self {
        self.spawning = spawning;
        self
    }

    /// Board dimensions the world starts with.
    #[must_use]
    pub const fn board(&self) -> BoardSize {
        self.board
    }

    /// Number of body segments behind the head at start.
    #[must_use]
    pub const fn initial_length(&self) -> u32 {
        self.initial_length
    }

    /// Score to speed lookup.
    #[must_use]
    pub const fn speed_table(&self) -> &SpeedTable {
        &self.speed_table
    }

    /// Seed of the world's random number generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Food spawning configuration.
    #[must_use]
    pub const fn spawning(&self) -> &SpawningConfig {
        &self.spawning
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD)
    }
}
