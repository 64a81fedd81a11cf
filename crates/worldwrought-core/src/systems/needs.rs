//! Needs system - decays needs over time

use crate::components::{CharacterId, Identity, NeedType, Needs};
use crate::config::NeedsConfig;
use hecs::{Entity, World};

/// Decay every character's needs
pub fn needs_system(world: &mut World, delta_seconds: f32) {
    for (_, needs) in world.query_mut::<&mut Needs>() {
        needs.update(delta_seconds);
    }
}

/// Fulfill one need, creating it from the lazy defaults if the character
/// never had it. Returns false if the entity doesn't exist.
pub fn fulfill_need(
    world: &mut World,
    entity: Entity,
    need_type: NeedType,
    amount: f32,
    config: &NeedsConfig,
) -> bool {
    if !world.contains(entity) {
        return false;
    }
    if world.get::<&Needs>(entity).is_err() && world.insert_one(entity, Needs::new()).is_err() {
        return false;
    }
    match world.get::<&mut Needs>(entity) {
        Ok(mut needs) => {
            needs
                .ensure(need_type, config.lazy_max, config.lazy_decay_rate)
                .fulfill(amount);
            true
        }
        Err(_) => false,
    }
}

/// Find characters whose least satisfied need is below threshold
pub fn find_urgent_needs(world: &World, threshold: f32) -> Vec<(CharacterId, NeedType)> {
    let mut urgent = Vec::new();

    for (_, (identity, needs)) in world.query::<(&Identity, &Needs)>().iter() {
        if let Some(need_type) = needs.most_urgent(threshold) {
            urgent.push((identity.id, need_type));
        }
    }

    urgent
}
