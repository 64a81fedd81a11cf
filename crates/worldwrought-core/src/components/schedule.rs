//! Job schedule component - a looping, time-driven routine for NPCs

use serde::{Deserialize, Serialize};

/// High-level activities an NPC can be scheduled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    Idle,
    Sleep,
    Eat,
    Work,
    Patrol,
    Train,
    Craft,
    Farm,
    LeadSquad,
    Fight,
    ReturnHome,
    Celebrate,
    Complain,
    Promote,
    Defect,
    Mutiny,
    Legend,
}

impl JobType {
    /// Mood change per second while performing this job
    pub fn mood_rate(&self) -> f32 {
        match self {
            JobType::Sleep => 0.01,
            JobType::Eat => 0.02,
            JobType::Celebrate => 0.03,
            JobType::Work | JobType::Patrol | JobType::Train | JobType::Craft | JobType::Farm => {
                -0.005
            }
            JobType::Complain | JobType::Defect | JobType::Mutiny => -0.02,
            _ => -0.001,
        }
    }
}

/// Sleep, eat, work, eat, patrol, celebrate: a 24-second day
pub const DAILY_ROUTINE_JOBS: [JobType; 6] = [
    JobType::Sleep,
    JobType::Eat,
    JobType::Work,
    JobType::Eat,
    JobType::Patrol,
    JobType::Celebrate,
];
pub const DAILY_ROUTINE_DURATIONS: [f32; 6] = [6.0, 2.0, 8.0, 2.0, 4.0, 2.0];

/// Looping sequence of jobs with per-slot durations (seconds).
///
/// If `durations` is shorter than `schedule` it is cycled by index modulo its
/// length; an empty duration list gives every slot one second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSchedule {
    schedule: Vec<JobType>,
    durations: Vec<f32>,
    current_index: usize,
    time_remaining: f32,
}

impl JobSchedule {
    const FALLBACK_DURATION: f32 = 1.0;

    pub fn new(schedule: Vec<JobType>, durations: Vec<f32>) -> Self {
        let mut s = Self {
            schedule,
            durations,
            current_index: 0,
            time_remaining: 0.0,
        };
        s.reset();
        s
    }

    /// Sleep, eat, work, eat, patrol, celebrate
    pub fn daily_routine() -> Self {
        Self::new(DAILY_ROUTINE_JOBS.to_vec(), DAILY_ROUTINE_DURATIONS.to_vec())
    }

    pub fn current_job(&self) -> Option<JobType> {
        self.schedule.get(self.current_index).copied()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    /// Back to the first slot with its full duration
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.time_remaining = self.duration_for(0);
    }

    /// Move to the next slot, wrapping at the end
    pub fn advance(&mut self) {
        if self.schedule.is_empty() {
            return;
        }
        self.current_index = (self.current_index + 1) % self.schedule.len();
        self.time_remaining = self.duration_for(self.current_index);
    }

    /// Count down and return the job to perform this tick, or None for an empty schedule.
    pub fn tick(&mut self, delta_seconds: f32) -> Option<JobType> {
        if self.schedule.is_empty() {
            return None;
        }
        self.time_remaining -= delta_seconds;
        if self.time_remaining <= 0.0 {
            self.advance();
        }
        self.current_job()
    }

    fn duration_for(&self, index: usize) -> f32 {
        if self.durations.is_empty() {
            return Self::FALLBACK_DURATION;
        }
        self.durations[index % self.durations.len()]
    }
}

impl Default for JobSchedule {
    fn default() -> Self {
        Self::daily_routine()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_once_after_seven_seconds() {
        let mut schedule = JobSchedule::new(vec![JobType::Sleep, JobType::Eat], vec![6.0, 2.0]);
        let mut transitions = 0;
        let mut last = schedule.current_job();
        for _ in 0..7 {
            let job = schedule.tick(1.0);
            if job != last {
                transitions += 1;
            }
            last = job;
        }
        assert_eq!(transitions, 1);
        assert_eq!(schedule.current_job(), Some(JobType::Eat));
        assert!((schedule.time_remaining() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_durations_cycle_when_short() {
        let mut schedule = JobSchedule::new(
            vec![JobType::Work, JobType::Eat, JobType::Sleep],
            vec![3.0, 1.0],
        );
        schedule.advance();
        schedule.advance();
        assert_eq!(schedule.current_job(), Some(JobType::Sleep));
        assert_eq!(schedule.time_remaining(), 3.0);
        schedule.advance();
        assert_eq!(schedule.current_index(), 0);
    }

    #[test]
    fn test_empty_durations_fall_back() {
        let schedule = JobSchedule::new(vec![JobType::Idle], Vec::new());
        assert_eq!(schedule.time_remaining(), 1.0);
    }

    #[test]
    fn test_empty_schedule_is_inert() {
        let mut schedule = JobSchedule::new(Vec::new(), vec![2.0]);
        assert_eq!(schedule.tick(5.0), None);
        assert_eq!(schedule.time_remaining(), 2.0);
    }

    #[test]
    fn test_reset() {
        let mut schedule = JobSchedule::daily_routine();
        schedule.tick(6.0);
        assert_eq!(schedule.current_job(), Some(JobType::Eat));
        schedule.reset();
        assert_eq!(schedule.current_job(), Some(JobType::Sleep));
        assert_eq!(schedule.time_remaining(), 6.0);
    }

    #[test]
    fn test_mood_rates() {
        assert!(JobType::Celebrate.mood_rate() > JobType::Eat.mood_rate());
        assert!(JobType::Mutiny.mood_rate() < JobType::Farm.mood_rate());
        assert_eq!(JobType::Legend.mood_rate(), -0.001);
    }
}
