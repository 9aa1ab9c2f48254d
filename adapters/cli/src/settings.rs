//! Optional TOML settings file layered beneath the command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use snake_arena_system_spawning::{Config as SpawningConfig, IntervalRange, SpawnWeights};
use snake_arena_world::{Config, SpeedStep, SpeedTable};
use thiserror::Error;

/// Reasons a settings file could not be used.
#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Values read from a settings file; anything omitted keeps its default.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) sim_hz: Option<u32>,
    pub(crate) render_hz: Option<u32>,
    pub(crate) snake: SnakeSettings,
    pub(crate) spawning: SpawningSettings,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SnakeSettings {
    initial_length: Option<u32>,
    speed_steps: Option<Vec<SpeedStepSettings>>,
    speed_floor: Option<u32>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct SpeedStepSettings {
    score_below: u32,
    ticks_per_move: u32,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawningSettings {
    period: Option<u64>,
    phase: Option<u64>,
    weights: Option<WeightSettings>,
    rat_motivation: Option<[u32; 2]>,
    bird_turn_interval: Option<[u32; 2]>,
    bird_move_interval: Option<[u32; 2]>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct WeightSettings {
    bird: u32,
    rat: u32,
    toad: u32,
    nothing: u32,
}

impl Settings {
    /// Reads and validates the settings file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("sim_hz", self.sim_hz),
            ("render_hz", self.render_hz),
        ];
        for (field, value) in positive {
            if value == Some(0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        if let Some(steps) = &self.snake.speed_steps {
            let ascending = steps
                .windows(2)
                .all(|pair| pair[0].score_below < pair[1].score_below);
            if !ascending {
                return Err(SettingsError::Invalid {
                    field: "snake.speed_steps",
                    reason: "score bounds must be strictly increasing",
                });
            }
        }

        let defaults = SpawningConfig::default();
        let period = self.spawning.period.unwrap_or(defaults.period());
        let phase = self.spawning.phase.unwrap_or(defaults.phase());
        if period != 0 && phase >= period {
            return Err(SettingsError::Invalid {
                field: "spawning.phase",
                reason: "must be smaller than spawning.period",
            });
        }

        if let Some(weights) = &self.spawning.weights {
            if weights.bird == 0 && weights.rat == 0 && weights.toad == 0 && weights.nothing == 0 {
                return Err(SettingsError::Invalid {
                    field: "spawning.weights",
                    reason: "at least one weight must be positive",
                });
            }
        }
        Ok(())
    }

    /// Layers the file's snake, spawning and seed values over `config`.
    pub(crate) fn apply_to(&self, mut config: Config) -> Config {
        if let Some(length) = self.snake.initial_length {
            config = config.with_initial_length(length);
        }
        if let Some(seed) = self.seed {
            config = config.with_rng_seed(seed);
        }
        if self.snake.speed_steps.is_some() || self.snake.speed_floor.is_some() {
            config = config.with_speed_table(self.speed_table());
        }
        let spawning = self.spawning_config(config.spawning());
        config.with_spawning(spawning)
    }

    fn speed_table(&self) -> SpeedTable {
        let defaults = SpeedTable::default();
        let floor = self.snake.speed_floor.unwrap_or(defaults.floor());
        let steps = match &self.snake.speed_steps {
            Some(steps) => steps
                .iter()
                .map(|step| SpeedStep::new(step.score_below, step.ticks_per_move))
                .collect(),
            None => defaults.steps().to_vec(),
        };
        SpeedTable::new(steps, floor)
    }

    fn spawning_config(&self, base: &SpawningConfig) -> SpawningConfig {
        let settings = &self.spawning;
        let weights = settings
            .weights
            .as_ref()
            .map_or(base.weights(), |weights| SpawnWeights {
                bird: weights.bird,
                rat: weights.rat,
                toad: weights.toad,
                nothing: weights.nothing,
            });
        let range = |value: Option<[u32; 2]>, fallback: IntervalRange| {
            value.map_or(fallback, |[min, max]| IntervalRange::new(min, max))
        };

        SpawningConfig::new(
            settings.period.unwrap_or(base.period()),
            settings.phase.unwrap_or(base.phase()),
        )
        .with_weights(weights)
        .with_rat_motivation(range(settings.rat_motivation, base.rat_motivation()))
        .with_bird_intervals(
            range(settings.bird_turn_interval, base.bird_turn_interval()),
            range(settings.bird_move_interval, base.bird_move_interval()),
        )
    }
}
