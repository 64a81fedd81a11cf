//! Schedule system - advances NPC job routines and feeds mood back

use hecs::World;

use crate::components::{Belief, JobSchedule, JobType, Mood};

/// Tick every job schedule and apply the current job's mood effect.
///
/// The effect is applied every tick, including the tick a transition happens.
pub fn schedule_system(world: &mut World, delta_seconds: f32) {
    for (_, (schedule, mood, belief)) in
        world.query_mut::<(&mut JobSchedule, &mut Mood, Option<&Belief>)>()
    {
        let Some(job) = schedule.tick(delta_seconds) else {
            continue;
        };
        let modifier = belief.map_or(0.0, |b| b.modifier);
        mood.modify(job.mood_rate() * delta_seconds, modifier);
    }
}

/// Characters currently performing a job
pub fn count_performing(world: &World, job: JobType) -> usize {
    world
        .query::<&JobSchedule>()
        .iter()
        .filter(|(_, s)| s.current_job() == Some(job))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::MoodModel;

    #[test]
    fn test_sleep_restores_mood() {
        let mut world = World::new();
        let entity = world.spawn((
            JobSchedule::new(vec![JobType::Sleep], vec![10.0]),
            Mood::new(0.5, MoodModel::Incremental),
        ));

        for _ in 0..5 {
            schedule_system(&mut world, 1.0);
        }

        let mood = world.get::<&Mood>(entity).unwrap().value;
        assert!((mood - 0.55).abs() < 1e-4);
    }

    #[test]
    fn test_mutiny_drains_and_transitions_apply_new_job() {
        let mut world = World::new();
        let entity = world.spawn((
            JobSchedule::new(vec![JobType::Celebrate, JobType::Mutiny], vec![1.0, 100.0]),
            Mood::new(0.5, MoodModel::Incremental),
        ));

        // First tick exhausts Celebrate, so Mutiny is applied
        schedule_system(&mut world, 1.0);
        let mood = world.get::<&Mood>(entity).unwrap().value;
        assert!((mood - 0.48).abs() < 1e-4);
        assert_eq!(count_performing(&world, JobType::Mutiny), 1);
    }

    #[test]
    fn test_belief_is_added_per_tick() {
        let mut world = World::new();
        let entity = world.spawn((
            JobSchedule::new(vec![JobType::Idle], vec![100.0]),
            Mood::new(0.5, MoodModel::Incremental),
            Belief { modifier: 0.01 },
        ));
        schedule_system(&mut world, 1.0);
        let mood = world.get::<&Mood>(entity).unwrap().value;
        assert!((mood - 0.509).abs() < 1e-4);
    }
}
