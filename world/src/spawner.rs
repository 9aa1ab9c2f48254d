//! Positionless tickable that periodically stages new food.

use snake_arena_system_spawning::Spawning;

use crate::entity::{TickContext, Tickable};

#[derive(Debug)]
pub(crate) struct FoodSpawner {
    spawning: Spawning,
}

impl FoodSpawner {
    pub(crate) fn new(spawning: Spawning) -> Self {
        Self { spawning }
    }
}

impl Tickable for FoodSpawner {
    fn tick(&mut self, ticks: u64, ctx: &mut TickContext<'_>) {
        self.spawning
            .handle(ticks, ctx.board, ctx.rng, &mut ctx.spawned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use snake_arena_core::{BoardSize, FoodKind};
    use snake_arena_system_spawning::{Config, SpawnWeights};

    #[test]
    fn reports_blueprints_through_the_context() {
        let config = Config::new(3, 0).with_weights(SpawnWeights {
            bird: 0,
            rat: 0,
            toad: 1,
            nothing: 0,
        });
        let mut spawner = FoodSpawner::new(Spawning::new(config));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut dirty = false;
        let mut events = Vec::new();

        let mut counts = Vec::new();
        for ticks in 1..=6 {
            let mut ctx = TickContext::new(BoardSize::new(8, 4), &mut rng, &mut dirty, &mut events);
            spawner.tick(ticks, &mut ctx);
            let (expired, spawned) = ctx.into_outcome();
            assert!(!expired);
            assert!(spawned.iter().all(|spec| spec.kind == FoodKind::Toad));
            counts.push(spawned.len());
        }

        assert_eq!(counts, vec![0, 0, 1, 0, 0, 1]);
        assert!(!dirty);
    }
}
