//! Social system - interactions, grudges and relationship scores between characters

use hecs::{Entity, World};

use super::mood::modify_mood;
use crate::components::{CharacterId, Identity, NemesisLedger, Relationships};

/// Mood change from one interaction
pub const INTERACTION_MOOD: f32 = 0.1;
/// Hostility added when meeting a nemesis
pub const NEMESIS_GRUDGE: f32 = 0.1;
/// Hostility forgiven after a pleasant interaction
pub const FORGIVENESS: f32 = 0.05;

fn identity_of(world: &World, entity: Entity) -> Option<(CharacterId, String)> {
    world
        .get::<&Identity>(entity)
        .ok()
        .map(|identity| (identity.id, identity.name.clone()))
}

/// Record (or deepen) `actor`'s grudge against `target`.
///
/// No-op when either entity lacks an identity, when they are the same
/// character, or when `actor` has no nemesis ledger.
pub fn add_nemesis(world: &mut World, actor: Entity, target: Entity, hostility: f32) -> bool {
    let Some((target_id, target_name)) = identity_of(world, target) else {
        return false;
    };
    let Ok(mut ledger) = world.get::<&mut NemesisLedger>(actor) else {
        return false;
    };
    if ledger.owner() == target_id {
        return false;
    }
    ledger.add(target_id, &target_name, hostility);
    true
}

/// Forgive part of `actor`'s grudge against `target`
pub fn reduce_hostility(world: &mut World, actor: Entity, target: CharacterId, amount: f32) {
    if let Ok(mut ledger) = world.get::<&mut NemesisLedger>(actor) {
        ledger.reduce(target, amount);
    }
}

/// One-sided interaction: `actor` meets `other`.
///
/// Meeting a nemesis sours the actor's mood and deepens the grudge; anyone
/// else lifts the mood and eases any lingering hostility. Only `actor` changes.
pub fn interact(world: &mut World, actor: Entity, other: Entity) -> bool {
    if actor == other {
        return false;
    }
    let Some((other_id, _)) = identity_of(world, other) else {
        return false;
    };
    if identity_of(world, actor).is_some_and(|(id, _)| id == other_id) {
        return false;
    }

    let is_nemesis = world
        .get::<&NemesisLedger>(actor)
        .map(|ledger| ledger.is_nemesis(other_id))
        .unwrap_or(false);

    if is_nemesis {
        modify_mood(world, actor, -INTERACTION_MOOD);
        add_nemesis(world, actor, other, NEMESIS_GRUDGE);
    } else {
        modify_mood(world, actor, INTERACTION_MOOD);
        reduce_hostility(world, actor, other_id, FORGIVENESS);
    }
    true
}

/// Shift `actor`'s opinion of `other`, clamped to -1.0..=1.0
pub fn modify_relationship(world: &mut World, actor: Entity, other: CharacterId, delta: f32) -> bool {
    match world.get::<&mut Relationships>(actor) {
        Ok(mut relationships) => {
            if relationships.owner() == other {
                return false;
            }
            relationships.modify(other, delta);
            true
        }
        Err(_) => false,
    }
}

/// Remove every reference to a departing character from all ledgers
pub fn forget_character(world: &mut World, departed: CharacterId) {
    for (_, ledger) in world.query_mut::<&mut NemesisLedger>() {
        ledger.forget(departed);
    }
    for (_, relationships) in world.query_mut::<&mut Relationships>() {
        relationships.forget(departed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Mood;

    fn spawn(world: &mut World, id: u32, name: &str) -> Entity {
        let id = CharacterId(id);
        world.spawn((
            Identity::new(id, name, 30),
            Mood::default(),
            NemesisLedger::new(id),
            Relationships::new(id),
        ))
    }

    fn mood(world: &World, entity: Entity) -> f32 {
        world.get::<&Mood>(entity).unwrap().value
    }

    #[test]
    fn test_interact_with_stranger_lifts_mood() {
        let mut world = World::new();
        let a = spawn(&mut world, 1, "Ada");
        let b = spawn(&mut world, 2, "Bram");

        assert!(interact(&mut world, a, b));
        assert!((mood(&world, a) - 0.6).abs() < 1e-5);
        assert_eq!(mood(&world, b), 0.5);
    }

    #[test]
    fn test_interact_with_nemesis() {
        let mut world = World::new();
        let a = spawn(&mut world, 1, "Ada");
        let b = spawn(&mut world, 2, "Bram");
        add_nemesis(&mut world, a, b, 0.5);

        interact(&mut world, a, b);

        assert!((mood(&world, a) - 0.4).abs() < 1e-5);
        let ledger = world.get::<&NemesisLedger>(a).unwrap();
        assert!((ledger.hostility(CharacterId(2)) - 0.6).abs() < 1e-5);
        assert_eq!(ledger.profile(CharacterId(2)).unwrap().name, "Bram");
    }

    #[test]
    fn test_forgiveness_ends_grudge() {
        let mut world = World::new();
        let a = spawn(&mut world, 1, "Ada");
        let b = spawn(&mut world, 2, "Bram");
        add_nemesis(&mut world, a, b, 0.04);
        reduce_hostility(&mut world, a, CharacterId(2), FORGIVENESS);

        // No longer a nemesis, so this is a pleasant meeting
        interact(&mut world, a, b);
        assert!((mood(&world, a) - 0.6).abs() < 1e-5);
        assert!(!world
            .get::<&NemesisLedger>(a)
            .unwrap()
            .is_nemesis(CharacterId(2)));
    }

    #[test]
    fn test_interact_with_self_is_noop() {
        let mut world = World::new();
        let a = spawn(&mut world, 1, "Ada");
        assert!(!interact(&mut world, a, a));
        assert!(!add_nemesis(&mut world, a, a, 0.5));
        assert_eq!(mood(&world, a), 0.5);
    }

    #[test]
    fn test_relationships_are_one_sided() {
        let mut world = World::new();
        let a = spawn(&mut world, 1, "Ada");
        let b = spawn(&mut world, 2, "Bram");
        modify_relationship(&mut world, a, CharacterId(2), 0.4);

        assert_eq!(
            world.get::<&Relationships>(a).unwrap().get(CharacterId(2)),
            0.4
        );
        assert_eq!(
            world.get::<&Relationships>(b).unwrap().get(CharacterId(1)),
            0.0
        );
        assert!(!modify_relationship(&mut world, a, CharacterId(1), 0.4));
    }

    #[test]
    fn test_forget_character() {
        let mut world = World::new();
        let a = spawn(&mut world, 1, "Ada");
        let b = spawn(&mut world, 2, "Bram");
        add_nemesis(&mut world, a, b, 0.5);
        modify_relationship(&mut world, a, CharacterId(2), -0.5);

        forget_character(&mut world, CharacterId(2));

        let ledger = world.get::<&NemesisLedger>(a).unwrap();
        assert!(!ledger.is_nemesis(CharacterId(2)));
        assert_eq!(ledger.profile(CharacterId(2)).unwrap().name, "Bram");
        assert!(world.get::<&Relationships>(a).unwrap().scores().is_empty());
    }
}
