use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ant::{AntRole, DeathCause};

/// Outbound event reported by the simulation. The presentation layer may
/// visualize these; the core never depends on the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimEvent {
    AntSpawned {
        id: Uuid,
        role: AntRole,
    },
    AntDied {
        id: Uuid,
        cause: DeathCause,
        x: f64,
        y: f64,
    },
    CorpseCollected {
        id: u64,
    },
    FoodDepleted {
        id: u64,
        x: f64,
        y: f64,
    },
    FoodSeeded {
        id: u64,
        x: f64,
        y: f64,
    },
    QueenDesignated {
        id: Uuid,
    },
    QueenFlightStarted,
    EggsLaid {
        count: u32,
    },
    GenerationAdvanced {
        generation: u32,
    },
    ReliefIssued {
        energy: f64,
    },
    AttackStarted,
    AttackEnded,
    TermiteSpawned {
        id: u64,
    },
    TermiteSlain {
        id: u64,
    },
    RainStarted,
    RainEnded,
    PuddleFormed {
        id: u64,
        x: f64,
        y: f64,
    },
}
