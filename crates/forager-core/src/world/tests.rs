use super::*;
use crate::config::StopRule;
use rand::Rng;

fn make_config(num_agents: usize) -> SimConfig {
    SimConfig {
        num_agents,
        iterations_per_frame: 1,
        ..SimConfig::default()
    }
}

fn make_world(positions: &[[usize; 2]], fill: f64, config: SimConfig) -> World {
    let agents = positions
        .iter()
        .enumerate()
        .map(|(i, &[x, y])| Agent::new(i as u32, x, y))
        .collect();
    let environment = Environment::filled(config.grid_width, config.grid_height, fill);
    World::new(agents, environment, config).unwrap()
}

fn agent_by_id(world: &World, id: u32) -> &Agent {
    world.agents().iter().find(|a| a.id == id).unwrap()
}

#[test]
fn two_foragers_on_uniform_grid_end_with_equal_stores() {
    // Kept away from the edges: a wrap would put them ~99 cells apart in
    // planar distance and suppress the second share.
    let config = SimConfig {
        neighbourhood_radius: 20.0,
        ..make_config(2)
    };
    let mut world = make_world(&[[50, 50], [50, 55]], 20.0, config);
    world.sweep();

    for agent in world.agents() {
        assert!((agent.store - 10.0).abs() < 1e-9, "store was {}", agent.store);
    }
    assert!((world.environment().total() - (20.0 * 10_000.0 - 20.0)).abs() < 1e-6);
}

#[test]
fn two_foragers_at_origin_conserve_what_they_ate() {
    let config = SimConfig {
        neighbourhood_radius: 20.0,
        ..make_config(2)
    };
    let mut world = make_world(&[[0, 0], [0, 5]], 20.0, config);
    world.sweep();

    assert!((world.store_total() - 20.0).abs() < 1e-9);
    for agent in world.agents() {
        assert!(
            [5.0, 10.0, 15.0].contains(&agent.store),
            "unexpected store {}",
            agent.store
        );
        assert!(agent.x < 100 && agent.y < 100);
    }
}

#[test]
fn sweep_preserves_agent_identity() {
    let positions: Vec<[usize; 2]> = (0..8).map(|i| [i * 10, i * 5]).collect();
    let mut world = make_world(&positions, 15.0, make_config(8));
    for _ in 0..5 {
        world.sweep();
    }
    let mut ids: Vec<u32> = world.agents().iter().map(|a| a.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..8).collect::<Vec<_>>());
    assert_eq!(world.sweep_index(), 5);
}

#[test]
fn share_updates_sequentially_within_one_call() {
    let mut world = make_world(&[[5, 5], [5, 5], [5, 5]], 0.0, make_config(3));
    world.agents[0].store = 0.0;
    world.agents[1].store = 8.0;
    world.agents[2].store = 16.0;

    let shared = world.share_with_neighbours(0, 1.0);

    assert_eq!(shared, 2);
    // 0 & 8 -> 4, then the updated 4 & 16 -> 10
    assert_eq!(world.agents[0].store, 10.0);
    assert_eq!(world.agents[1].store, 4.0);
    assert_eq!(world.agents[2].store, 10.0);
}

#[test]
fn share_equalises_pair_and_preserves_sum() {
    let mut world = make_world(&[[10, 10], [13, 14]], 0.0, make_config(2));
    world.agents[0].store = 7.0;
    world.agents[1].store = 30.0;

    assert_eq!(world.share_with_neighbours(1, 5.0), 1);
    assert_eq!(world.agents[0].store, world.agents[1].store);
    assert!((world.agents[0].store + world.agents[1].store - 37.0).abs() < 1e-12);
}

#[test]
fn share_ignores_agents_beyond_radius() {
    let mut world = make_world(&[[10, 10], [40, 10], [12, 10]], 0.0, make_config(3));
    world.agents[0].store = 10.0;
    world.agents[1].store = 100.0;
    world.agents[2].store = 0.0;

    assert_eq!(world.share_with_neighbours(0, 20.0), 1);
    assert_eq!(world.agents[1].store, 100.0);
    assert_eq!(world.agents[0].store, 5.0);
    assert_eq!(world.agents[2].store, 5.0);
}

#[test]
fn share_radius_is_inclusive() {
    let mut world = make_world(&[[0, 0], [3, 4]], 0.0, make_config(2));
    world.agents[1].store = 2.0;
    assert_eq!(world.share_with_neighbours(0, 5.0), 1);
    assert_eq!(world.agents[0].store, 1.0);
}

#[test]
fn lone_agent_does_not_share_with_itself() {
    let mut world = make_world(&[[1, 1]], 0.0, make_config(1));
    world.agents[0].store = 42.0;
    assert_eq!(world.share_with_neighbours(0, 100.0), 0);
    assert_eq!(world.agents[0].store, 42.0);
}

#[test]
fn exceeding_max_store_stops_with_single_record() {
    let config = SimConfig {
        max_store: 5.0,
        ..make_config(2)
    };
    let mut world = make_world(&[[50, 50], [50, 55]], 20.0, config);

    world.run_frame();
    assert_eq!(world.state(), RunState::Stopped);
    let record = world.stop_record().cloned().expect("stop record should be emitted");
    assert_eq!(record.frame, 1);
    assert_eq!(record.sweeps, 1);
    assert!((record.store_total - 20.0).abs() < 1e-9);

    // Stopped is terminal.
    let timings = world.run_frame();
    assert_eq!(timings.total_us, 0);
    assert_eq!(world.frame_index(), 1);
    assert_eq!(world.sweep_index(), 1);
    assert_eq!(world.stop_record(), Some(&record));
}

#[test]
fn run_reports_stop_once() {
    let config = SimConfig {
        max_store: 5.0,
        ..make_config(2)
    };
    let mut world = make_world(&[[50, 50], [50, 55]], 20.0, config);
    let summary = world.run(1).unwrap();

    assert!(summary.stopped);
    assert_eq!(summary.frames_run, 1);
    assert_eq!(summary.samples.len(), 1);
    assert_eq!(summary.samples[0].frame, 1);
    let record = summary.stop_record.expect("stop record should be emitted");
    assert!((record.store_total - summary.final_store_total).abs() < 1e-9);

    let again = world.run(1).unwrap();
    assert_eq!(again.frames_run, 1);
    assert!(again.samples.is_empty());
    assert_eq!(again.sweep_time_us, 0);
    assert_eq!(again.stop_record, Some(record));
}

#[test]
fn run_is_bounded_by_max_frames() {
    let config = SimConfig {
        max_frames: 5,
        iterations_per_frame: 2,
        ..make_config(3)
    };
    let mut world = make_world(&[[1, 1], [20, 20], [60, 60]], 0.0, config);
    let summary = world.run(2).unwrap();

    assert!(!summary.stopped);
    assert!(summary.stop_record.is_none());
    assert_eq!(summary.frames_run, 5);
    assert_eq!(summary.sweeps_run, 10);
    let frames: Vec<usize> = summary.samples.iter().map(|s| s.frame).collect();
    assert_eq!(frames, vec![2, 4, 5]);
    assert_eq!(world.state(), RunState::Running);
}

#[test]
fn run_rejects_zero_sample_interval() {
    let mut world = make_world(&[[1, 1]], 0.0, make_config(1));
    assert_eq!(world.run(0).unwrap_err(), RunError::InvalidSampleEvery);
}

#[test]
fn any_agent_rule_sees_full_agent_anywhere_in_order() {
    for seed in 0..10 {
        let config = SimConfig {
            seed,
            neighbourhood_radius: 0.0,
            ..make_config(3)
        };
        let mut world = make_world(&[[0, 0], [50, 50], [20, 80]], 0.0, config);
        world.agents[0].store = 5000.0;
        world.run_frame();
        assert_eq!(world.state(), RunState::Stopped);
    }
}

#[test]
fn last_processed_rule_only_inspects_final_agent() {
    let mut saw_stopped = false;
    let mut saw_running = false;
    for seed in 0..20 {
        let config = SimConfig {
            seed,
            neighbourhood_radius: 0.0,
            stop_rule: StopRule::LastProcessed,
            ..make_config(3)
        };
        let mut world = make_world(&[[0, 0], [50, 50], [20, 80]], 0.0, config);
        world.agents[0].store = 5000.0;
        world.run_frame();

        let rich_was_last = world.agents().last().map(|a| a.id) == Some(0);
        let stopped = world.state() == RunState::Stopped;
        assert_eq!(stopped, rich_was_last, "seed {seed}");
        saw_stopped |= stopped;
        saw_running |= !stopped;
    }
    assert!(saw_stopped && saw_running);
}

#[test]
fn long_run_keeps_stores_and_cells_non_negative_and_conserved() {
    let mut rng = crate::rng::create_rng(5);
    let rows: Vec<Vec<f64>> = (0..40)
        .map(|_| (0..40).map(|_| rng.random_range(0.0..50.0)).collect())
        .collect();
    let environment = Environment::from_rows(rows).unwrap();
    let config = SimConfig {
        num_agents: 30,
        grid_width: 40,
        grid_height: 40,
        neighbourhood_radius: 5.0,
        max_store: 1e12,
        ..SimConfig::default()
    };
    let mut world = World::populate(environment, config, &[]).unwrap();
    let initial = world.environment().total() + world.store_total();

    for _ in 0..50 {
        world.run_frame();
        assert!(world.agents().iter().all(|a| a.store >= 0.0));
        assert!(world.agents().iter().all(|a| a.x < 40 && a.y < 40));
        assert!(world.environment().data().iter().all(|&v| v >= 0.0));
        let now = world.environment().total() + world.store_total();
        assert!((now - initial).abs() < 1e-6, "drifted from {initial} to {now}");
    }
    let cell_sum: f64 = world.environment().data().iter().sum();
    assert!((cell_sum - world.environment().total()).abs() < 1e-6);
}

#[test]
fn same_seed_reproduces_run() {
    let build = || {
        let config = SimConfig {
            seed: 99,
            ..make_config(6)
        };
        let environment = Environment::filled(100, 100, 30.0);
        World::populate(environment, config, &[[3, 4]]).unwrap()
    };
    let mut a = build();
    let mut b = build();
    for _ in 0..3 {
        a.run_frame();
        b.run_frame();
    }
    assert_eq!(a.agents(), b.agents());
    assert_eq!(a.environment(), b.environment());
}

#[test]
fn populate_uses_supplied_coordinates_first() {
    let environment = Environment::filled(100, 100, 0.0);
    let world = World::populate(environment, make_config(3), &[[7, 9], [0, 99]]).unwrap();
    assert_eq!(agent_by_id(&world, 0).x, 7);
    assert_eq!(agent_by_id(&world, 0).y, 9);
    assert_eq!((agent_by_id(&world, 1).x, agent_by_id(&world, 1).y), (0, 99));
    let third = agent_by_id(&world, 2);
    assert!(third.x < 100 && third.y < 100);
}

#[test]
fn populate_rejects_coordinates_outside_grid() {
    let environment = Environment::filled(100, 100, 0.0);
    assert!(matches!(
        World::populate(environment, make_config(1), &[[100, 3]]),
        Err(WorldInitError::AgentOutOfBounds { id: 0, x: 100, y: 3 })
    ));
}

#[test]
fn new_rejects_grid_size_mismatch() {
    let agents = vec![Agent::new(0, 0, 0)];
    let environment = Environment::filled(10, 20, 1.0);
    assert!(matches!(
        World::new(agents, environment, make_config(1)),
        Err(WorldInitError::GridSizeMismatch {
            expected: (100, 100),
            actual: (10, 20)
        })
    ));
}

#[test]
fn new_rejects_agent_count_mismatch_and_duplicates() {
    let environment = Environment::filled(100, 100, 1.0);
    assert!(matches!(
        World::new(vec![Agent::new(0, 0, 0)], environment.clone(), make_config(2)),
        Err(WorldInitError::AgentCountMismatch {
            expected: 2,
            actual: 1
        })
    ));
    assert_eq!(
        World::new(
            vec![Agent::new(4, 0, 0), Agent::new(4, 1, 1)],
            environment,
            make_config(2)
        )
        .err(),
        Some(WorldInitError::DuplicateAgentId(4))
    );
}

#[test]
fn new_surfaces_config_errors() {
    let environment = Environment::filled(100, 100, 1.0);
    let err = World::new(Vec::new(), environment, make_config(0))
        .err()
        .expect("zero agents should be rejected");
    assert_eq!(err, WorldInitError::Config(SimConfigError::InvalidNumAgents));
    assert!(err.source().is_some());
}
