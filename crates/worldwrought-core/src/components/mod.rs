//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to character entities.
//! Cross-character behavior lives in systems.

mod character;
mod needs;
mod schedule;
mod social;

pub use character::*;
pub use needs::*;
pub use schedule::*;
pub use social::*;
