#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted food spawning system.
//!
//! The spawner has no position of its own. On every tick whose index matches
//! the configured cadence it draws one random board cell and one weighted
//! outcome, which is either a food blueprint or nothing at all.

use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};
use snake_arena_core::{BoardSize, CellCoord, FoodKind, FoodSpec, Motion};

const DEFAULT_PERIOD: u64 = 20;
const DEFAULT_PHASE: u64 = 1;

/// Relative likelihood of every spawn outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnWeights {
    /// Weight of spawning a [`FoodKind::Bird`].
    pub bird: u32,
    /// Weight of spawning a [`FoodKind::Rat`].
    pub rat: u32,
    /// Weight of spawning a [`FoodKind::Toad`].
    pub toad: u32,
    /// Weight of skipping the spawn entirely.
    pub nothing: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            bird: 5,
            rat: 10,
            toad: 22,
            nothing: 64,
        }
    }
}

/// Inclusive bounds of a randomised interval parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalRange {
    min: u32,
    max: u32,
}

impl IntervalRange {
    /// Creates a new range; bounds are reordered and clamped to at least one.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        let low = min.min(max).max(1);
        let high = min.max(max).max(1);
        Self {
            min: low,
            max: high,
        }
    }

    /// Smallest value the range can produce.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Largest value the range can produce.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    period: u64,
    phase: u64,
    weights: SpawnWeights,
    rat_motivation: IntervalRange,
    bird_turn_interval: IntervalRange,
    bird_move_interval: IntervalRange,
}

impl Config {
    /// Creates a configuration firing when `tick % period == phase`.
    ///
    /// A zero period disables spawning, and so does a `phase` that is not
    /// smaller than `period`.
    #[must_use]
    pub fn new(period: u64, phase: u64) -> Self {
        Self {
            period,
            phase,
            weights: SpawnWeights::default(),
            rat_motivation: IntervalRange::new(1, 50),
            bird_turn_interval: IntervalRange::new(20, 100),
            bird_move_interval: IntervalRange::new(1, 10),
        }
    }

    /// Replaces the outcome weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: SpawnWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replaces the range rat motivations are drawn from.
    #[must_use]
    pub const fn with_rat_motivation(mut self, range: IntervalRange) -> Self {
        self.rat_motivation = range;
        self
    }

    /// Replaces the ranges bird turn and move intervals are drawn from.
    #[must_use]
    pub const fn with_bird_intervals(
        mut self,
        turn: IntervalRange,
        movement: IntervalRange,
    ) -> Self {
        self.bird_turn_interval = turn;
        self.bird_move_interval = movement;
        self
    }

    /// Number of ticks between spawn attempts.
    #[must_use]
    pub const fn period(&self) -> u64 {
        self.period
    }

    /// Tick offset inside each period at which the attempt happens.
    #[must_use]
    pub const fn phase(&self) -> u64 {
        self.phase
    }

    /// Outcome weights used by the draw.
    #[must_use]
    pub const fn weights(&self) -> SpawnWeights {
        self.weights
    }

    /// Range rat motivations are drawn from.
    #[must_use]
    pub const fn rat_motivation(&self) -> IntervalRange {
        self.rat_motivation
    }

    /// Range bird turn intervals are drawn from.
    #[must_use]
    pub const fn bird_turn_interval(&self) -> IntervalRange {
        self.bird_turn_interval
    }

    /// Range bird move intervals are drawn from.
    #[must_use]
    pub const fn bird_move_interval(&self) -> IntervalRange {
        self.bird_move_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD, DEFAULT_PHASE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Spawn(FoodKind),
    Nothing,
}

const OUTCOMES: [Outcome; 4] = [
    Outcome::Spawn(FoodKind::Bird),
    Outcome::Spawn(FoodKind::Rat),
    Outcome::Spawn(FoodKind::Toad),
    Outcome::Nothing,
];

/// Pure system that turns spawn cadence ticks into food blueprints.
#[derive(Clone, Debug)]
pub struct Spawning {
    config: Config,
    distribution: Option<WeightedIndex<u32>>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    ///
    /// All-zero weights leave the system permanently idle.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let weights = config.weights;
        let distribution =
            WeightedIndex::new([weights.bird, weights.rat, weights.toad, weights.nothing]).ok();
        Self {
            config,
            distribution,
        }
    }

    /// Configuration the system was built from.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Reports whether the provided tick is a spawn attempt.
    #[must_use]
    pub fn is_spawn_tick(&self, tick: u64) -> bool {
        self.config.period != 0 && tick % self.config.period == self.config.phase
    }

    /// Draws at most one food blueprint for the provided tick.
    pub fn handle<R: Rng + ?Sized>(
        &self,
        tick: u64,
        board: BoardSize,
        rng: &mut R,
        out: &mut Vec<FoodSpec>,
    ) {
        if !self.is_spawn_tick(tick) || board.width() == 0 || board.height() == 0 {
            return;
        }
        let Some(distribution) = self.distribution.as_ref() else {
            return;
        };

        let cell = random_cell(board, rng);
        let outcome = OUTCOMES[distribution.sample(rng)];
        let Outcome::Spawn(kind) = outcome else {
            return;
        };

        out.push(FoodSpec {
            kind,
            cell,
            motion: self.motion_for(kind, rng),
        });
    }

    fn motion_for<R: Rng + ?Sized>(&self, kind: FoodKind, rng: &mut R) -> Motion {
        match kind {
            FoodKind::Toad => Motion::Stationary,
            FoodKind::Rat => Motion::RandomWalk {
                motivation: self.config.rat_motivation.sample(rng),
            },
            FoodKind::Bird => Motion::ErraticFlight {
                turn_interval: self.config.bird_turn_interval.sample(rng),
                move_interval: self.config.bird_move_interval.sample(rng),
            },
        }
    }
}

fn random_cell<R: Rng + ?Sized>(board: BoardSize, rng: &mut R) -> CellCoord {
    let column = rng.gen_range(0..board.width());
    let row = rng.gen_range(0..board.height());
    CellCoord::new(
        i32::try_from(column).unwrap_or(i32::MAX),
        i32::try_from(row).unwrap_or(i32::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_range_reorders_and_clamps_bounds() {
        let range = IntervalRange::new(10, 0);
        assert_eq!(range.min(), 1);
        assert_eq!(range.max(), 10);
    }

    #[test]
    fn zero_period_never_spawns() {
        let spawning = Spawning::new(Config::new(0, 0));
        assert!(!spawning.is_spawn_tick(0));
        assert!(!spawning.is_spawn_tick(20));
    }

    #[test]
    fn all_zero_weights_disable_the_draw() {
        let weights = SpawnWeights {
            bird: 0,
            rat: 0,
            toad: 0,
            nothing: 0,
        };
        let spawning = Spawning::new(Config::default().with_weights(weights));
        assert!(spawning.distribution.is_none());
    }
}
