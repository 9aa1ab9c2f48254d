use snake_arena_core::{BoardSize, CellCoord, Command, Direction, Event, Operation};
use snake_arena_system_spawning::{Config as SpawningConfig, SpawnWeights};
use snake_arena_world::{self as world, query, Config, SpeedTable, World};

fn quiet_config(board: BoardSize) -> Config {
    let spawning = SpawningConfig::default().with_weights(SpawnWeights {
        bird: 0,
        rat: 0,
        toad: 0,
        nothing: 1,
    });
    Config::new(board).with_spawning(spawning)
}

fn tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);
    events
}

fn moves(events: &[Event]) -> Vec<(CellCoord, CellCoord)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::SnakeMoved { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

#[test]
fn snake_waits_for_its_speed_before_moving() {
    let mut world = World::new(quiet_config(BoardSize::new(20, 10)));
    let start = query::snake_view(&world).expect("snake");
    assert_eq!(start.head, CellCoord::new(10, 5));
    assert_eq!(start.body.len(), 7);
    assert_eq!(start.speed, 5);

    for expected_tick in 1..=4 {
        let events = tick(&mut world);
        assert_eq!(
            events.first(),
            Some(&Event::TimeAdvanced {
                tick: expected_tick
            })
        );
        assert!(moves(&events).is_empty());
    }
    assert_eq!(query::snake_view(&world).expect("snake"), start);

    let events = tick(&mut world);
    assert_eq!(
        moves(&events),
        vec![(CellCoord::new(10, 5), CellCoord::new(11, 5))]
    );

    let moved = query::snake_view(&world).expect("snake");
    assert_eq!(moved.head, CellCoord::new(11, 5));
    assert_eq!(moved.body.len(), 7);
    assert_eq!(moved.body[0], start.head);
    assert_eq!(moved.body[6], start.body[5]);
    assert!(!moved.body.contains(&start.body[6]));
    assert_eq!(moved.last_tail, start.body[6]);
}

#[test]
fn head_wraps_across_the_right_edge() {
    let config = quiet_config(BoardSize::new(20, 10)).with_speed_table(SpeedTable::new(Vec::new(), 1));
    let mut world = World::new(config);

    let mut log = Vec::new();
    for _ in 0..10 {
        log.extend(moves(&tick(&mut world)));
    }

    assert_eq!(log.len(), 10);
    assert!(log.contains(&(CellCoord::new(19, 5), CellCoord::new(0, 5))));
    assert_eq!(
        query::snake_view(&world).expect("snake").head,
        CellCoord::new(0, 5)
    );
}

#[test]
fn head_wraps_across_the_top_edge() {
    let config = quiet_config(BoardSize::new(20, 10)).with_speed_table(SpeedTable::new(Vec::new(), 1));
    let mut world = World::new(config);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::QueueOperation {
            operation: Operation::MoveUp,
        },
        &mut events,
    );

    let mut log = Vec::new();
    for _ in 0..6 {
        log.extend(moves(&tick(&mut world)));
    }

    assert_eq!(log[0], (CellCoord::new(10, 5), CellCoord::new(10, 4)));
    assert!(log.contains(&(CellCoord::new(10, 0), CellCoord::new(10, 9))));
    assert_eq!(
        query::snake_view(&world).expect("snake").direction,
        Direction::Up
    );
}

#[test]
fn dirty_flag_is_sticky_until_a_render_is_confirmed() {
    let mut world = World::new(quiet_config(BoardSize::new(20, 10)));
    assert!(query::needs_render(&world));

    let mut events = Vec::new();
    world::apply(&mut world, Command::ConfirmRender, &mut events);
    assert!(!query::needs_render(&world));

    let _ = tick(&mut world);
    assert!(!query::needs_render(&world), "nothing moved on tick one");

    for _ in 0..4 {
        let _ = tick(&mut world);
    }
    assert!(query::needs_render(&world));
    let _ = tick(&mut world);
    assert!(query::needs_render(&world));

    world::apply(&mut world, Command::ConfirmRender, &mut events);
    assert!(!query::needs_render(&world));
    assert!(events.is_empty());
}

#[test]
fn accepted_turn_marks_the_world_dirty() {
    let mut world = World::new(quiet_config(BoardSize::new(20, 10)));
    let mut events = Vec::new();
    world::apply(&mut world, Command::ConfirmRender, &mut events);
    world::apply(
        &mut world,
        Command::QueueOperation {
            operation: Operation::MoveDown,
        },
        &mut events,
    );
    assert!(events.is_empty());

    let events = tick(&mut world);
    assert!(events.contains(&Event::DirectionChanged {
        from: Direction::Right,
        to: Direction::Down,
    }));
    assert!(query::needs_render(&world));
}

#[test]
fn every_tick_drains_the_mutation_log() {
    let spawning = SpawningConfig::new(2, 0);
    let mut world = World::new(Config::new(BoardSize::new(30, 15)).with_spawning(spawning));
    for _ in 0..200 {
        let _ = tick(&mut world);
        assert_eq!(query::pending_mutations(&world), 0);
        assert_eq!(query::registry_sizes(&world).staged, 0);
    }
    let sizes = query::registry_sizes(&world);
    assert_eq!(sizes.tickables, sizes.entities);
    assert_eq!(sizes.game_units, sizes.entities - 2);
    assert_eq!(query::food_view(&world).len(), sizes.game_units - 1);
}

#[test]
fn wandering_food_never_outlives_the_board() {
    let spawning = SpawningConfig::new(1, 0).with_weights(SpawnWeights {
        bird: 1,
        rat: 1,
        toad: 0,
        nothing: 0,
    });
    let board = BoardSize::new(6, 4);
    let mut world = World::new(Config::new(board).with_spawning(spawning));

    let mut removed = 0;
    for _ in 0..300 {
        let events = tick(&mut world);
        removed += events
            .iter()
            .filter(|event| matches!(event, Event::EntityRemoved { .. }))
            .count();
        for food in query::food_view(&world).iter() {
            assert!(board.contains(food.cell), "food {:?} left the board", food.id);
        }
    }
    assert!(removed > 0);
}
