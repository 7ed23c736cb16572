mod common;

use common::{AntBuilder, WorldBuilder};
use formicarium_data::{AntRole, AntState, DeathCause, PheromoneKind, SimEvent, Target};

#[test]
fn test_overdrain_death_leaves_corpse() {
    // One tick whose drain exceeds the ant's remaining energy.
    let mut world = WorldBuilder::new()
        .with_config(|c| c.world.tick_step = 10.0)
        .with_ant(AntBuilder::new().at(400.0, 400.0).energy(5.0).build())
        .build();

    let events = world.tick_once();

    assert_eq!(world.colony.population(), 0, "dead ant left on the roster");
    assert_eq!(world.corpses.len(), 1);
    let corpse = &world.corpses[0];
    assert!(corpse.x.is_finite() && corpse.y.is_finite());
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::AntDied {
            cause: DeathCause::Starvation,
            ..
        }
    )));
    assert_eq!(world.colony.total_deaths, 1);
}

#[test]
fn test_spawn_refused_when_storage_short() {
    let mut world = WorldBuilder::new().build();
    world.colony.storage = 9.0;
    let config = world.config.clone();
    assert!(world.colony.spawn_ant(&config, &mut world.rng).is_none());
    assert_eq!(world.colony.population(), 0);
    assert_eq!(world.colony.storage, 9.0);
}

#[test]
fn test_food_trail_vanishes_by_max_age() {
    let mut world = WorldBuilder::new().build();
    let id = world
        .pheromones
        .deposit(500.0, 500.0, PheromoneKind::FoodTrail, 1.0);

    let max_age = world.config.pheromone.food_trail_max_age;
    let ticks = (max_age / world.config.world.tick_step).ceil() as u64 + 1;
    for _ in 0..ticks {
        world.tick_once();
    }
    assert!(world.pheromones.get(id).is_none());
}

#[test]
fn test_danger_marks_repel_ants() {
    let mut world = WorldBuilder::new()
        .with_ant(AntBuilder::new().at(520.0, 500.0).build())
        .build();
    world
        .pheromones
        .deposit(500.0, 500.0, PheromoneKind::Danger, 1.5);

    let start = world.colony.ants[0].distance_to(500.0, 500.0);
    for _ in 0..40 {
        world.tick_once();
    }
    let ant = &world.colony.ants[0];
    let end = ant.distance_to(500.0, 500.0);
    assert!(
        end > start + 20.0,
        "ant failed to flee the danger mark ({start:.1} -> {end:.1})"
    );
}

#[test]
fn test_trail_guides_ant_to_food() {
    // A laid trail between the ant and a food source; the ant should
    // walk the gradient and end up collecting.
    let mut world = WorldBuilder::new()
        .with_ant(AntBuilder::new().at(300.0, 600.0).build())
        .with_food(560.0, 600.0, 100.0)
        .build();
    // Intensity rises toward the food, the way fresher marks laid by a
    // returning carrier would read.
    for i in 0..5 {
        let x = 340.0 + i as f64 * 40.0;
        let base = 0.4 + i as f32 * 0.15;
        world
            .pheromones
            .deposit(x, 600.0, PheromoneKind::FoodTrail, base);
    }

    let mut collected = false;
    for _ in 0..500 {
        world.tick_once();
        let source = world.food.iter().next().unwrap();
        if source.amount < 100.0 || world.colony.ants[0].carried_food > 0.0 {
            collected = true;
            break;
        }
    }
    assert!(collected, "trail never led the ant to the food");
}

#[test]
fn test_follower_count_tracks_trail_pursuit() {
    let mut world = WorldBuilder::new()
        .with_ant(AntBuilder::new().at(300.0, 600.0).build())
        .build();
    let id = world
        .pheromones
        .deposit(380.0, 600.0, PheromoneKind::FoodTrail, 1.0);

    world.tick_once();
    assert_eq!(world.colony.ants[0].target, Some(Target::Trail(id)));
    assert_eq!(world.pheromones.get(id).unwrap().followers, 1);
}

#[test]
fn test_raid_triggers_soldiers_and_hiders() {
    let mut world = WorldBuilder::new()
        .with_ant(
            AntBuilder::new()
                .at(1000.0, 600.0)
                .role(AntRole::Soldier)
                .build(),
        )
        .with_ant(AntBuilder::new().at(980.0, 600.0).build())
        .build();
    // March a termite straight onto the nest.
    world.termites.push(formicarium_data::Termite::new(
        900,
        1060.0,
        600.0,
        world.config.termite.max_health,
    ));

    let mut soldier_engaged = false;
    let mut worker_hid = false;
    let mut termite_hurt = false;
    for _ in 0..200 {
        world.tick_once();
        let soldier = world
            .colony
            .ants
            .iter()
            .find(|a| a.role == AntRole::Soldier);
        let worker = world
            .colony
            .ants
            .iter()
            .find(|a| a.role != AntRole::Soldier);
        if soldier.is_some_and(|a| a.state == AntState::AttackingTermite) {
            soldier_engaged = true;
        }
        if worker.is_some_and(|a| a.state == AntState::Hiding) {
            worker_hid = true;
        }
        if world
            .termites
            .first()
            .is_none_or(|t| t.health < world.config.termite.max_health)
        {
            termite_hurt = true;
        }
        if world.termites.is_empty() {
            break;
        }
    }
    assert!(soldier_engaged, "soldier never engaged the termite");
    assert!(worker_hid, "worker never hid during the attack");
    assert!(termite_hurt, "termite took no damage");
}

#[test]
fn test_attack_end_releases_hiders() {
    let mut world = WorldBuilder::new()
        .with_ant(AntBuilder::new().at(1000.0, 600.0).build())
        .build();
    world.termites.push(formicarium_data::Termite::new(
        901,
        5.0,
        5.0,
        world.config.termite.max_health,
    ));
    world.tick_once();
    assert_eq!(world.colony.ants[0].state, AntState::Hiding);

    // Kill the raider; the next ticks end the attack and release the ant.
    world.termites[0].health = 0.0;
    let mut events = world.tick_once();
    events.extend(world.tick_once());
    assert!(events.iter().any(|e| matches!(e, SimEvent::AttackEnded)));
    assert_ne!(world.colony.ants[0].state, AntState::Hiding);
}

#[test]
fn test_puddle_kills_and_tallies() {
    let mut pinned = AntBuilder::new()
        .at(700.0, 300.0)
        .state(AntState::Resting)
        .build();
    pinned.rest_timer = 1000.0; // stays put inside the puddle

    let mut world = WorldBuilder::new()
        .with_puddle(700.0, 300.0)
        .with_ant(pinned)
        .build();

    let lethal = world.config.hazard.exposure_death_time;
    let ticks = (lethal / world.config.world.tick_step).ceil() as u64 + 2;
    let mut all_events = Vec::new();
    for _ in 0..ticks {
        all_events.extend(world.tick_once());
    }

    assert_eq!(world.colony.population(), 0);
    assert!(all_events.iter().any(|e| matches!(
        e,
        SimEvent::AntDied {
            cause: DeathCause::Hazard,
            ..
        }
    )));
    let puddle = world.hazards.iter().next().unwrap();
    assert_eq!(puddle.death_count, 1);
    // The dying ant warned the colony on its way down.
    assert!(world.pheromones.count_of(PheromoneKind::Danger) > 0);
    assert_eq!(world.corpses.len(), 1);
}

#[test]
fn test_corpse_recovery_round_trip() {
    let mut world = WorldBuilder::new()
        .with_ant(AntBuilder::new().at(800.0, 600.0).build())
        .build();
    world.corpses.push(formicarium_data::Corpse {
        id: 77,
        x: 850.0,
        y: 600.0,
        collected: false,
    });

    let mut recovered = false;
    for _ in 0..400 {
        let events = world.tick_once();
        if events
            .iter()
            .any(|e| matches!(e, SimEvent::CorpseCollected { id: 77 }))
        {
            recovered = true;
            break;
        }
    }
    assert!(recovered, "corpse never recovered");
    assert!(world.corpses.is_empty());
    assert_eq!(world.colony.corpses_recovered, 1);
}
