//! Systems - logic that operates on components and the colony singletons

mod colony;
mod events;
mod lineage;
mod mood;
mod needs;
mod production;
mod schedule;
mod social;

pub use colony::*;
pub use events::*;
pub use lineage::*;
pub use mood::*;
pub use needs::*;
pub use production::*;
pub use schedule::*;
pub use social::*;
