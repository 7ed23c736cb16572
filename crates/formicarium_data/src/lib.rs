//! Plain data model for the Formicarium simulation.
//!
//! This crate holds the serializable state types shared between the
//! simulation core and its hosts. It contains no behavior beyond trivial
//! constructors and accessors; all tick logic lives in `formicarium_core`.

pub mod data;

pub use data::ant::{Ant, AntRole, AntState, DeathCause, Target};
pub use data::events::SimEvent;
pub use data::pheromone::{PheromoneDeposit, PheromoneKind};
pub use data::resource::{Corpse, FoodSource, Puddle};
pub use data::stats::{BroodCounts, QueenPhase, SimSnapshot, Weather};
pub use data::termite::{Termite, TermiteState};
