//! # Formicarium Core
//!
//! The simulation engine for Formicarium: an ant colony modeled as
//! autonomous agents coordinating through decaying chemical signals.
//!
//! This crate contains the deterministic tick logic, including:
//! - The spatial pheromone field with type-specific decay
//! - Ant behavioral state machines with priority-resolved drives
//! - Colony reproduction (queen flights, the egg/larva/pupa pipeline)
//! - Termite raids and puddle hazards
//! - Tick orchestration driven from elapsed host time
//!
//! ## Architecture
//!
//! One synchronous pass per fixed tick processes every subsystem in a
//! fixed order; agents read shared state through a `SystemContext` and
//! write it through command buffers applied between passes. All
//! randomness flows through a single seeded RNG, so equal seeds replay
//! equal runs.
//!
//! ## Example
//!
//! ```
//! use formicarium_core::config::SimConfig;
//! use formicarium_core::world::World;
//!
//! let mut config = SimConfig::default();
//! config.world.seed = Some(42);
//! let mut world = World::new(config).unwrap();
//!
//! // Drive it like a host render loop would.
//! let _events = world.advance(100.0);
//! let snapshot = world.snapshot();
//! assert_eq!(snapshot.tick, 2);
//! ```

/// Fixed-step clock fed by host wall-clock deltas
pub mod clock;
/// Colony life-cycle: roster, spawning, queen, brood, evolution
pub mod colony;
/// Configuration management for simulation parameters
pub mod config;
/// Outbound event sink
pub mod events;
/// Depletable food sources
pub mod food;
/// Puddle hazards and danger-signal reinforcement
pub mod hazard;
/// Performance metrics collection and logging
pub mod metrics;
/// Spatial pheromone field with typed decay
pub mod pheromone;
/// Random world events (rain, raids, reseeding)
pub mod scheduler;
/// Read-only snapshots for presentation
pub mod snapshot;
/// Per-tick agent systems (behavior, movement, commands)
pub mod systems;
/// Host-facing terrain interface
pub mod terrain;
/// Termite raids
pub mod termite;
/// World orchestration and tick order
pub mod world;

pub use config::SimConfig;
pub use events::{EventSink, NullSink, VecSink};
pub use metrics::{init_logging, Metrics};
pub use terrain::{OpenGround, TerrainQuery, WorldBounds};
pub use world::World;
