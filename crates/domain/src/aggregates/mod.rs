//! Aggregates - entities with identity and invariants

mod campaign;
mod npc;

pub use campaign::Campaign;
pub use npc::Npc;
