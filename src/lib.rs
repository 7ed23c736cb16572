//! Formicarium: an ant colony simulation engine.
//!
//! This facade re-exports the workspace crates for hosts and tests:
//! [`formicarium_data`] holds the plain state types, [`formicarium_core`]
//! the tick logic.

pub use formicarium_core as core;
pub use formicarium_data as data;

pub use formicarium_core::config::SimConfig;
pub use formicarium_core::world::World;
pub use formicarium_core::{init_logging, EventSink, NullSink, OpenGround, TerrainQuery, VecSink};
pub use formicarium_data::{SimEvent, SimSnapshot};
