//! Production system - citizens gather for the colony stockpile

use hecs::{Entity, World};

use super::colony::ColonySystem;
use super::needs::fulfill_need;
use crate::components::{Identity, NeedType};
use crate::config::SimulationConfig;

/// What citizens gather in a given production round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gathering {
    Food,
    Wood,
}

impl Gathering {
    /// Even rounds gather food, odd rounds wood
    pub fn for_round(round: u64) -> Self {
        if round % 2 == 0 {
            Gathering::Food
        } else {
            Gathering::Wood
        }
    }
}

/// Run one production round. Every citizen gathers once; gathering food
/// feeds the gatherer, gathering wood rests them.
///
/// Returns the number of citizens that gathered.
pub fn production_system(
    world: &mut World,
    colony: &mut ColonySystem,
    round: u64,
    config: &SimulationConfig,
) -> usize {
    let gatherers: Vec<Entity> = world
        .query::<&Identity>()
        .iter()
        .filter(|(_, identity)| colony.is_citizen(identity.id))
        .map(|(entity, _)| entity)
        .collect();

    let colony_config = &config.colony;
    let (resource, per_gather, need, fulfills) = match Gathering::for_round(round) {
        Gathering::Food => (
            ColonySystem::FOOD,
            colony_config.food_per_gather,
            NeedType::Hunger,
            colony_config.gather_food_fulfills,
        ),
        Gathering::Wood => (
            ColonySystem::WOOD,
            colony_config.wood_per_gather,
            NeedType::Rest,
            colony_config.gather_wood_fulfills,
        ),
    };

    for &entity in &gatherers {
        fulfill_need(world, entity, need, fulfills, &config.needs);
    }

    let count = gatherers.len();
    colony.add_resource(resource, per_gather * count as i64);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CharacterId, Needs};

    fn citizen(world: &mut World, colony: &mut ColonySystem, id: u32) -> Entity {
        let mut needs = Needs::new();
        needs.ensure(NeedType::Hunger, 1.0, 0.0).fulfill(-0.5);
        let entity = world.spawn((Identity::new(CharacterId(id), "Worker", 30), needs));
        colony.add_citizen(world, entity, None);
        entity
    }

    #[test]
    fn test_rounds_alternate() {
        let mut world = World::new();
        let mut colony = ColonySystem::new();
        let config = SimulationConfig::default();
        let worker = citizen(&mut world, &mut colony, 1);
        citizen(&mut world, &mut colony, 2);
        // Not a citizen: gathers nothing
        world.spawn((Identity::new(CharacterId(3), "Drifter", 30),));

        assert_eq!(production_system(&mut world, &mut colony, 0, &config), 2);
        assert_eq!(colony.resource_amount("food"), 2);
        assert_eq!(colony.resource_amount("wood"), 0);

        production_system(&mut world, &mut colony, 1, &config);
        assert_eq!(colony.resource_amount("wood"), 2);

        let needs = world.get::<&Needs>(worker).unwrap();
        assert!((needs.get(NeedType::Hunger).unwrap().current() - 0.6).abs() < 1e-5);
        // Rest was created lazily at full, then topped up (clamped)
        assert_eq!(needs.get(NeedType::Rest).unwrap().current(), 1.0);
    }

    #[test]
    fn test_no_citizens_no_change() {
        let mut world = World::new();
        let mut colony = ColonySystem::new();
        assert_eq!(
            production_system(&mut world, &mut colony, 0, &SimulationConfig::default()),
            0
        );
        assert!(colony.resources().is_empty());
        assert!(colony.drain_events().is_empty());
    }
}
