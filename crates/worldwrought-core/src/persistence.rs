//! Save/Load functionality for persisting simulation state
//!
//! Uses bincode for a compact binary snapshot of the entire simulation.
//! Each character's components are serialized individually, then the
//! entities are respawned on load. Ledgers key on `CharacterId`, so nothing
//! needs remapping when the new `hecs::Entity` handles differ.

use std::io::{Read, Write};

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::*;
use crate::config::SimulationConfig;
use crate::systems::{ColonySystem, FamilyTree};

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Engine bookkeeping that travels with a save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineClock {
    /// Simulated seconds since start
    pub sim_time: f64,
    pub time_scale: f32,
    /// Next `CharacterId` to hand out
    pub next_id: u32,
    pub production_round: u64,
}

/// Serializable snapshot of the simulation state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub clock: EngineClock,
    pub config: SimulationConfig,
    pub colony: ColonySystem,
    pub lineage: FamilyTree,
    /// All characters with their components, ordered by id
    pub characters: Vec<SerializableCharacter>,
}

/// Every component a character can carry; optional ones as `Option`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableCharacter {
    pub identity: Identity,
    pub mood: Option<Mood>,
    pub belief: Option<Belief>,
    pub needs: Option<Needs>,
    pub traits: Option<Traits>,
    pub nemeses: Option<NemesisLedger>,
    pub relationships: Option<Relationships>,
    pub schedule: Option<JobSchedule>,
    pub companion: Option<Companion>,
}

fn serialize_characters(world: &World) -> Vec<SerializableCharacter> {
    let mut characters: Vec<SerializableCharacter> = world
        .iter()
        .filter_map(|entity_ref| {
            let identity = entity_ref.get::<&Identity>()?;
            Some(SerializableCharacter {
                identity: (*identity).clone(),
                mood: entity_ref.get::<&Mood>().map(|c| *c),
                belief: entity_ref.get::<&Belief>().map(|c| *c),
                needs: entity_ref.get::<&Needs>().map(|c| (*c).clone()),
                traits: entity_ref.get::<&Traits>().map(|c| (*c).clone()),
                nemeses: entity_ref.get::<&NemesisLedger>().map(|c| (*c).clone()),
                relationships: entity_ref.get::<&Relationships>().map(|c| (*c).clone()),
                schedule: entity_ref.get::<&JobSchedule>().map(|c| (*c).clone()),
                companion: entity_ref.get::<&Companion>().map(|c| (*c).clone()),
            })
        })
        .collect();
    characters.sort_by_key(|c| c.identity.id);
    characters
}

/// Spawn a character entity with all its saved components
fn spawn_character(world: &mut World, sc: SerializableCharacter) -> Entity {
    let entity = world.spawn((sc.identity,));

    // Inserting into a live entity we just spawned cannot fail
    if let Some(c) = sc.mood {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = sc.belief {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = sc.needs {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = sc.traits {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = sc.nemeses {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = sc.relationships {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = sc.schedule {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = sc.companion {
        let _ = world.insert_one(entity, c);
    }
    entity
}

/// Save the complete simulation to a writer
pub fn save_simulation<W: Write>(
    writer: W,
    world: &World,
    clock: &EngineClock,
    config: &SimulationConfig,
    colony: &ColonySystem,
    lineage: &FamilyTree,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        clock: clock.clone(),
        config: config.clone(),
        colony: colony.clone(),
        lineage: lineage.clone(),
        characters: serialize_characters(world),
    };

    bincode::serialize_into(writer, &save_data)?;
    log::info!(
        "saved {} characters at t={:.1}s",
        save_data.characters.len(),
        clock.sim_time
    );
    Ok(())
}

/// Result of loading a simulation
pub struct LoadedSimulation {
    pub world: World,
    pub clock: EngineClock,
    pub config: SimulationConfig,
    pub colony: ColonySystem,
    pub lineage: FamilyTree,
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let count = save_data.characters.len();
    let mut world = World::new();
    for sc in save_data.characters {
        spawn_character(&mut world, sc);
    }
    log::info!("loaded {} characters", count);

    Ok(LoadedSimulation {
        world,
        clock: save_data.clock,
        config: save_data.config,
        colony: save_data.colony,
        lineage: save_data.lineage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimulationEngine;

    #[test]
    fn test_save_load_roundtrip() {
        let config = SimulationConfig {
            seed: Some(11),
            ..Default::default()
        };
        let mut engine = SimulationEngine::with_config(config);
        let ids = engine.generate(4);
        engine.add_nemesis(ids[0], ids[1], 0.7);
        engine.modify_relationship(ids[2], ids[3], -0.4);
        engine.add_resource("stone", 12);
        for _ in 0..10 {
            engine.update(1.0);
        }

        let mut save_buffer = Vec::new();
        engine.save(&mut save_buffer).expect("Save failed");

        let mut loaded = SimulationEngine::new();
        loaded.load(&save_buffer[..]).expect("Load failed");

        assert_eq!(loaded.sim_time(), engine.sim_time());
        assert_eq!(loaded.character_count(), 4);
        assert_eq!(loaded.hostility(ids[0], ids[1]), engine.hostility(ids[0], ids[1]));
        assert_eq!(loaded.relationship(ids[2], ids[3]), -0.4);
        assert_eq!(loaded.colony().resources(), engine.colony().resources());
        assert_eq!(loaded.colony().citizens(), engine.colony().citizens());
        for &id in &ids {
            assert_eq!(loaded.mood(id), engine.mood(id));
            assert_eq!(loaded.identity(id), engine.identity(id));
        }

        // New characters keep getting fresh ids
        let next = loaded.spawn_random_citizen();
        assert!(!ids.contains(&next));
    }

    #[test]
    fn test_version_mismatch() {
        let data = SaveData {
            version: SAVE_VERSION + 1,
            clock: EngineClock {
                sim_time: 0.0,
                time_scale: 1.0,
                next_id: 0,
                production_round: 0,
            },
            config: SimulationConfig::default(),
            colony: ColonySystem::new(),
            lineage: FamilyTree::new(),
            characters: Vec::new(),
        };
        let bytes = bincode::serialize(&data).unwrap();
        match load_simulation(&bytes[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            _ => panic!("expected a version mismatch"),
        }
    }

    #[test]
    fn test_truncated_input() {
        assert!(matches!(
            load_simulation(&[1u8, 2, 3][..]),
            Err(SaveError::Bincode(_))
        ));
    }
}
