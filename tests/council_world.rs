// Run:
//   cargo test --test council_world -- --nocapture
//
// Exercises the world end to end the way the council loop drives it:
// spawning a population, querying entity state, steering inputs, and
// observing tick/input/output snapshots.

use std::sync::{Arc, Once};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

use govsim::prelude::*;
use govsim::{SpawnError, WorldError};

#[derive(Clone, Debug, PartialEq)]
struct IdentityComponent {
    name: String,
    age: u8,
}

#[derive(Clone, Debug, PartialEq)]
struct StatComponent {
    health: i32,
    money: i64,
}

#[derive(Clone, Debug, PartialEq)]
struct MoodComponent {
    happiness: i32,
}

fn identity(name: &str, age: u8) -> IdentityComponent {
    IdentityComponent {
        name: name.into(),
        age,
    }
}

/// Installs the log subscriber once; `RUST_LOG` controls verbosity.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Average happiness across the population, recomputed per observation.
struct ApprovalRating;

impl Output for ApprovalRating {
    fn name(&self) -> &str {
        "approval_rating"
    }

    fn description(&self) -> &str {
        "The current approval rating of the population"
    }

    fn compute(&self, world: &WorldView<'_>) -> OutputValue {
        let query = Query::new().with::<MoodComponent>();

        let mut total = 0i64;
        let mut people = 0usize;
        for result in world.query(&query) {
            let moods = result.column::<MoodComponent>().expect("mood column");
            total += moods.iter().map(|m| m.happiness as i64).sum::<i64>();
            people += result.count();
        }

        let value = if people == 0 {
            json!(0)
        } else {
            json!(total / people as i64)
        };

        OutputValue {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            value,
        }
    }
}

#[test]
fn identity_and_stat_archetypes_never_merge() -> WorldResult<()> {
    init_tracing();
    let world = World::new();

    let a = world.spawn(
        Bundle::new()
            .with(identity("Ada", 36))
            .with(StatComponent { health: 100, money: 10 }),
    )?;
    let b = world.spawn(Bundle::new().with(identity("Blaise", 39)))?;

    let results = world.query(&Query::new().with::<IdentityComponent>())?;
    assert_eq!(results.len(), 2);

    for result in &results {
        assert_eq!(result.count(), 1);
        match result.signature().len() {
            1 => assert_eq!(result.entities(), &[b]),
            2 => assert_eq!(result.entities(), &[a]),
            other => panic!("unexpected signature width {other}"),
        }
    }

    // Only A has both.
    let both = world.query(&Query::new().with::<IdentityComponent>().with::<StatComponent>())?;
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].entities(), &[a]);
    Ok(())
}

#[test]
fn archetype_count_tracks_distinct_type_sets() -> WorldResult<()> {
    init_tracing();
    let world = World::new();

    world.spawn(Bundle::new().with(identity("a", 1)))?;
    world.spawn(
        Bundle::new()
            .with(identity("b", 2))
            .with(StatComponent { health: 90, money: 0 }),
    )?;
    // Same composition in the opposite order lands in the same archetype.
    world.spawn(
        Bundle::new()
            .with(StatComponent { health: 80, money: 5 })
            .with(identity("c", 3)),
    )?;
    world.spawn(Bundle::new().with(MoodComponent { happiness: 70 }))?;
    world.spawn(Bundle::new().with(identity("d", 4)))?;

    assert_eq!(world.archetype_count()?, 3);
    assert_eq!(world.entity_count()?, 5);
    Ok(())
}

#[test]
fn query_includes_entity_iff_subset() -> WorldResult<()> {
    init_tracing();
    let world = World::new();

    let full = world.spawn(
        Bundle::new()
            .with(identity("Ada", 36))
            .with(StatComponent { health: 100, money: 10 })
            .with(MoodComponent { happiness: 100 }),
    )?;

    let contains = |results: &[QueryResult]| {
        results.iter().any(|r| r.entities().contains(&full))
    };

    // Every subset of the entity's composition matches.
    assert!(contains(&world.query(&Query::new())?));
    assert!(contains(&world.query(&Query::new().with::<IdentityComponent>())?));
    assert!(contains(&world.query(&Query::new().with::<StatComponent>())?));
    assert!(contains(
        &world.query(&Query::new().with::<IdentityComponent>().with::<MoodComponent>())?
    ));
    assert!(contains(
        &world.query(
            &Query::new()
                .with::<IdentityComponent>()
                .with::<StatComponent>()
                .with::<MoodComponent>()
        )?
    ));

    // A type the entity lacks excludes it, even when never stored anywhere.
    #[derive(Clone, Debug)]
    struct Unused;
    let results = world.query(&Query::new().with::<IdentityComponent>().with::<Unused>())?;
    assert!(results.is_empty());
    Ok(())
}

#[test]
fn query_results_are_point_in_time_snapshots() -> WorldResult<()> {
    init_tracing();
    let world = World::new();
    world.spawn(Bundle::new().with(identity("a", 1)))?;

    let before = world.query(&Query::new().with::<IdentityComponent>())?;
    assert_eq!(before[0].count(), 1);

    world.spawn(Bundle::new().with(identity("b", 2)))?;

    // The already-returned result does not grow.
    assert_eq!(before[0].count(), 1);
    assert_eq!(before[0].column::<IdentityComponent>().unwrap().len(), 1);

    let after = world.query(&Query::new().with::<IdentityComponent>())?;
    assert_eq!(after[0].count(), 2);
    Ok(())
}

#[test]
fn consumers_rebuild_rows_with_their_own_mapping() -> WorldResult<()> {
    init_tracing();
    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        health: i32,
    }

    let world = World::new();
    world.spawn(
        Bundle::new()
            .with(identity("Ada", 36))
            .with(StatComponent { health: 90, money: 10 }),
    )?;
    world.spawn(
        Bundle::new()
            .with(identity("Blaise", 39))
            .with(StatComponent { health: 70, money: 3 }),
    )?;

    let mut persons = Vec::new();
    for result in world.query(&Query::new().with::<IdentityComponent>().with::<StatComponent>())? {
        let identities = result.column::<IdentityComponent>().map_err(WorldError::from)?;
        let stats = result.column::<StatComponent>().map_err(WorldError::from)?;
        for row in 0..result.count() {
            persons.push(Person {
                name: identities[row].name.clone(),
                health: stats[row].health,
            });
        }
    }

    assert_eq!(
        persons,
        vec![
            Person { name: "Ada".into(), health: 90 },
            Person { name: "Blaise".into(), health: 70 },
        ]
    );
    Ok(())
}

#[test]
fn duplicate_component_values_are_rejected() {
    init_tracing();
    let world = World::new();
    let err = world
        .spawn(
            Bundle::new()
                .with(identity("x", 1))
                .with(identity("y", 2)),
        )
        .unwrap_err();
    assert!(matches!(err, WorldError::Spawn(SpawnError::Duplicate(_))));
}

#[test]
fn entity_ids_are_sequential_and_indexed() -> WorldResult<()> {
    init_tracing();
    let world = World::new();
    let first = world.spawn(Bundle::new().with(identity("a", 1)))?;
    let second = world.spawn(Bundle::new().with(MoodComponent { happiness: 1 }))?;

    assert_eq!(first, 0);
    assert_eq!(second, 1);
    assert_ne!(world.entity_archetype(first)?, world.entity_archetype(second)?);
    assert_eq!(world.entity_archetype(99)?, None);
    Ok(())
}

#[test]
fn budget_input_survives_concurrent_writers() -> WorldResult<()> {
    init_tracing();
    let world = Arc::new(World::new());
    world.register_input(Arc::new(SimpleInput::new(
        "budget",
        "Discretionary spending available this cycle",
        1000,
    )))?;

    let input = world.get_input("budget")?.expect("budget registered");
    assert_eq!(input.get(), json!(1000));

    // One caller lowers the budget; a different caller reads the new value.
    input.set(json!(900));
    let other = world.get_input("budget")?.expect("budget registered");
    assert_eq!(other.get(), json!(900));

    assert!(world.get_input("deficit")?.is_none());

    let mut handles = Vec::new();
    for worker in 0..8u64 {
        let world = Arc::clone(&world);
        handles.push(thread::spawn(move || {
            for i in 0..100u64 {
                let action = Action {
                    input: "budget".into(),
                    value: json!(worker * 1000 + i),
                };
                assert!(world.apply_action(&action).unwrap());
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // The stored value is whichever write landed last, never garbage.
    let final_value = world.get_input("budget")?.unwrap().get();
    let n = final_value.as_u64().expect("budget stays an integer");
    assert!(n < 8000);
    Ok(())
}

#[test]
fn unknown_action_target_is_reported_not_fatal() -> WorldResult<()> {
    init_tracing();
    let world = World::new();
    let applied = world.apply_action(&Action {
        input: "tax_rate".into(),
        value: json!(0.2),
    })?;
    assert!(!applied);
    Ok(())
}

#[test]
fn five_ticks_advance_clock_and_observation() -> WorldResult<()> {
    init_tracing();
    let world = World::new();
    assert_eq!(world.current_tick()?, 0);

    for _ in 0..5 {
        world.tick(Duration::from_secs(1))?;
    }

    assert_eq!(world.current_tick()?, 5);
    assert_eq!(world.elapsed()?, Duration::from_secs(5));

    let observation = world.observe()?;
    assert_eq!(observation.tick, 5);
    assert!(observation.timestamp > 0);
    Ok(())
}

#[test]
fn observation_bundles_inputs_and_fresh_outputs() -> WorldResult<()> {
    init_tracing();
    let world = World::new();

    for happiness in [60, 80, 100] {
        world.spawn(
            Bundle::new()
                .with(identity("citizen", 30))
                .with(MoodComponent { happiness }),
        )?;
    }

    world.register_input(Arc::new(SimpleInput::new("budget", "spending", 1000)))?;
    world.register_output(Arc::new(ApprovalRating))?;
    assert!(world.get_output("approval_rating")?.is_some());
    assert!(world.get_output("inflation")?.is_none());

    let observation = world.observe()?;
    assert_eq!(observation.inputs.get("budget"), Some(&json!(1000)));

    let approval = observation.outputs.get("approval_rating").expect("output computed");
    assert_eq!(approval.value, json!(80));

    // Outputs are recomputed fresh: a mood shift shows up on the next
    // observation without re-registration.
    world.spawn(
        Bundle::new()
            .with(identity("critic", 50))
            .with(MoodComponent { happiness: 0 }),
    )?;
    let observation = world.observe()?;
    let approval = observation.outputs.get("approval_rating").expect("output computed");
    assert_eq!(approval.value, json!(60));

    // Observations serialize deterministically for prompt construction.
    let serialized: Value = serde_json::to_value(&observation).unwrap();
    assert!(serialized.get("tick").is_some());
    assert!(serialized["outputs"]["approval_rating"]["value"].is_number());
    Ok(())
}
