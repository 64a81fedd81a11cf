//! Mood system - need-derived mood and incremental mood changes

use hecs::{Entity, World};

use crate::components::{Belief, Mood, MoodModel, Needs};

/// Recompute need-derived moods as the mean need satisfaction.
///
/// Only touches characters whose mood model is [`MoodModel::NeedAverage`];
/// incremental moods are left to `modify_mood`.
pub fn mood_system(world: &mut World) {
    for (_, (mood, needs)) in world.query_mut::<(&mut Mood, Option<&Needs>)>() {
        if mood.model != MoodModel::NeedAverage {
            continue;
        }
        mood.value = needs.map_or(1.0, Needs::average_satisfaction);
    }
}

/// Apply a mood delta plus the character's live belief modifier.
///
/// Returns false if the entity has no mood or its mood is need-derived.
pub fn modify_mood(world: &mut World, entity: Entity, amount: f32) -> bool {
    let Ok((mood, belief)) = world.query_one_mut::<(&mut Mood, Option<&Belief>)>(entity) else {
        return false;
    };
    let modifier = belief.map_or(0.0, |b| b.modifier);
    let applied = mood.modify(amount, modifier);
    if !applied {
        log::debug!("mood change on {:?} ignored: mood is need-derived", entity);
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::NeedType;

    #[test]
    fn test_need_average_mood() {
        let mut world = World::new();
        let mut needs = Needs::new();
        needs.ensure(NeedType::Hunger, 1.0, 0.0).fulfill(-1.0);
        needs.ensure(NeedType::Rest, 1.0, 0.0);
        let derived = world.spawn((Mood::new(0.9, MoodModel::NeedAverage), needs.clone()));
        let incremental = world.spawn((Mood::new(0.9, MoodModel::Incremental), needs));
        let no_needs = world.spawn((Mood::new(0.2, MoodModel::NeedAverage),));

        mood_system(&mut world);

        assert!((world.get::<&Mood>(derived).unwrap().value - 0.5).abs() < 1e-5);
        assert_eq!(world.get::<&Mood>(incremental).unwrap().value, 0.9);
        assert_eq!(world.get::<&Mood>(no_needs).unwrap().value, 1.0);
    }

    #[test]
    fn test_modify_mood_reads_belief() {
        let mut world = World::new();
        let entity = world.spawn((Mood::default(), Belief { modifier: 0.05 }));
        assert!(modify_mood(&mut world, entity, 0.1));
        assert!((world.get::<&Mood>(entity).unwrap().value - 0.65).abs() < 1e-5);

        world.get::<&mut Belief>(entity).unwrap().modifier = -0.05;
        modify_mood(&mut world, entity, 0.0);
        assert!((world.get::<&Mood>(entity).unwrap().value - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_modify_mood_without_belief() {
        let mut world = World::new();
        let entity = world.spawn((Mood::default(),));
        assert!(modify_mood(&mut world, entity, -0.2));
        assert!((world.get::<&Mood>(entity).unwrap().value - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_modify_mood_rejected_for_derived() {
        let mut world = World::new();
        let entity = world.spawn((Mood::new(0.4, MoodModel::NeedAverage),));
        assert!(!modify_mood(&mut world, entity, 0.3));
        assert_eq!(world.get::<&Mood>(entity).unwrap().value, 0.4);
    }
}
