use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_arena_core::{BoardSize, FoodKind, FoodSpec, Motion};
use snake_arena_system_spawning::{Config, IntervalRange, SpawnWeights, Spawning};

fn only(kind: FoodKind) -> SpawnWeights {
    SpawnWeights {
        bird: u32::from(kind == FoodKind::Bird),
        rat: u32::from(kind == FoodKind::Rat),
        toad: u32::from(kind == FoodKind::Toad),
        nothing: 0,
    }
}

fn run(spawning: &Spawning, board: BoardSize, seed: u64, ticks: u64) -> Vec<(u64, FoodSpec)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut log = Vec::new();
    for tick in 1..=ticks {
        let mut out = Vec::new();
        spawning.handle(tick, board, &mut rng, &mut out);
        log.extend(out.into_iter().map(|spec| (tick, spec)));
    }
    log
}

#[test]
fn default_cadence_attempts_on_the_configured_phase() {
    let spawning = Spawning::new(Config::default().with_weights(only(FoodKind::Toad)));
    let log = run(&spawning, BoardSize::new(40, 20), 7, 100);

    let ticks: Vec<u64> = log.iter().map(|(tick, _)| *tick).collect();
    assert_eq!(ticks, vec![1, 21, 41, 61, 81]);
}

#[test]
fn nothing_only_weights_never_spawn() {
    let weights = SpawnWeights {
        bird: 0,
        rat: 0,
        toad: 0,
        nothing: 1,
    };
    let spawning = Spawning::new(Config::new(1, 0).with_weights(weights));
    assert!(run(&spawning, BoardSize::new(10, 10), 3, 500).is_empty());
}

#[test]
fn phase_outside_the_period_never_fires() {
    let spawning = Spawning::new(Config::new(5, 5).with_weights(only(FoodKind::Toad)));
    assert!(run(&spawning, BoardSize::new(10, 10), 3, 200).is_empty());
}

#[test]
fn spawned_cells_lie_on_the_board() {
    let board = BoardSize::new(7, 3);
    let spawning = Spawning::new(Config::new(1, 0));
    let log = run(&spawning, board, 99, 2_000);

    assert!(!log.is_empty());
    for (_, spec) in &log {
        assert!(board.contains(spec.cell), "{:?} is off the board", spec.cell);
    }
}

#[test]
fn empty_board_never_spawns() {
    let spawning = Spawning::new(Config::new(1, 0).with_weights(only(FoodKind::Toad)));
    assert!(run(&spawning, BoardSize::new(0, 5), 1, 50).is_empty());
    assert!(run(&spawning, BoardSize::new(5, 0), 1, 50).is_empty());
}

#[test]
fn motions_follow_the_variant_and_configured_ranges() {
    let board = BoardSize::new(20, 20);

    let toads = Spawning::new(Config::new(1, 0).with_weights(only(FoodKind::Toad)));
    for (_, spec) in run(&toads, board, 5, 50) {
        assert_eq!(spec.kind, FoodKind::Toad);
        assert_eq!(spec.motion, Motion::Stationary);
    }

    let rats = Spawning::new(
        Config::new(1, 0)
            .with_weights(only(FoodKind::Rat))
            .with_rat_motivation(IntervalRange::new(3, 6)),
    );
    for (_, spec) in run(&rats, board, 5, 200) {
        assert_eq!(spec.kind, FoodKind::Rat);
        let Motion::RandomWalk { motivation } = spec.motion else {
            panic!("rats walk, got {:?}", spec.motion);
        };
        assert!((3..=6).contains(&motivation));
    }

    let birds = Spawning::new(
        Config::new(1, 0)
            .with_weights(only(FoodKind::Bird))
            .with_bird_intervals(IntervalRange::new(20, 100), IntervalRange::new(1, 10)),
    );
    for (_, spec) in run(&birds, board, 5, 200) {
        assert_eq!(spec.kind, FoodKind::Bird);
        let Motion::ErraticFlight {
            turn_interval,
            move_interval,
        } = spec.motion
        else {
            panic!("birds fly, got {:?}", spec.motion);
        };
        assert!((20..=100).contains(&turn_interval));
        assert!((1..=10).contains(&move_interval));
    }
}

#[test]
fn default_weights_favour_skipping() {
    let spawning = Spawning::new(Config::new(1, 0));
    let log = run(&spawning, BoardSize::new(40, 20), 2024, 10_000);

    let count = |kind: FoodKind| log.iter().filter(|(_, spec)| spec.kind == kind).count();
    assert!(log.len() < 6_000, "spawned {} times", log.len());
    assert!(count(FoodKind::Toad) > count(FoodKind::Rat));
    assert!(count(FoodKind::Rat) > count(FoodKind::Bird));
    assert!(count(FoodKind::Bird) > 0);
}

#[test]
fn identical_seeds_produce_identical_spawns() {
    let spawning = Spawning::new(Config::new(3, 1));
    let board = BoardSize::new(16, 9);
    assert_eq!(run(&spawning, board, 11, 600), run(&spawning, board, 11, 600));
}
