//! WorldWrought Core - Colony & Character Simulation Engine
//!
//! A headless, tick-driven simulation of a settlement: characters with
//! decaying needs, a mood, beliefs, grudges and friendships, grouped into
//! families and working a shared colony stockpile toward bigger settlements.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Characters
//! - **Components**: Pure data attached to characters (Identity, Needs, Mood, NemesisLedger, etc.)
//! - **Systems**: Logic that queries and updates components, plus the colony,
//!   lineage and event-bus singletons
//!
//! [`SimulationEngine`](engine::SimulationEngine) owns all of it and is the
//! only handle callers need.
//!
//! # Example
//!
//! ```rust,no_run
//! use worldwrought_core::prelude::*;
//!
//! let mut engine = SimulationEngine::with_config(SimulationConfig::default());
//! let citizens = engine.generate(8);
//! engine.add_nemesis(citizens[0], citizens[1], 0.5);
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SimulationConfig;
    pub use crate::engine::SimulationEngine;
    pub use crate::generation::CharacterSheet;
    pub use crate::systems::{ColonyEvent, ColonyObserver, ParentRole};
}
