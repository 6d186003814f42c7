//! sl-core: shared vocabulary for the sluice controller.
//!
//! Contains:
//! - door (sides, door states, lock types, valve row positions)
//! - water (ordered water levels)
//! - light (signal states and signal locations)
//! - chamber (macro-operation the chamber is performing)
//! - error (shared error types)

pub mod chamber;
pub mod door;
pub mod error;
pub mod light;
pub mod water;

// Re-exports: nice ergonomics for downstream crates
pub use chamber::ChamberMacroState;
pub use door::{DoorSide, DoorState, DoorType, LockTypes, ValveRowPosition};
pub use error::{CoreError, CoreResult};
pub use light::{LightFacing, LightLocation, LightState};
pub use water::WaterLevel;
