//! Character sheets and creation-time traits.
//!
//! A [`CharacterSheet`] is everything needed to spawn a character. Traits are
//! applied to the sheet exactly once, before the entity exists.

use crate::components::{Belief, Companion, JobSchedule, Mood, Needs, Traits};
use crate::config::SimulationConfig;

/// A named modifier applied once when a character is created
pub trait CharacterTrait {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Adjust the sheet. Called exactly once per character.
    fn apply(&self, sheet: &mut CharacterSheet);
}

/// Needs decay more slowly
#[derive(Debug, Clone, Copy)]
pub struct Hardy {
    /// Multiplier on every decay rate (0.5 halves decay)
    pub decay_factor: f32,
}

impl Default for Hardy {
    fn default() -> Self {
        Self { decay_factor: 0.75 }
    }
}

impl CharacterTrait for Hardy {
    fn name(&self) -> &str {
        "Hardy"
    }

    fn description(&self) -> &str {
        "Endures hunger and fatigue longer than most."
    }

    fn apply(&self, sheet: &mut CharacterSheet) {
        for need in sheet.needs.iter_mut() {
            need.scale_decay(self.decay_factor);
        }
    }
}

/// Faith colors every mood change
#[derive(Debug, Clone, Copy)]
pub struct Devout {
    pub belief_bonus: f32,
}

impl Default for Devout {
    fn default() -> Self {
        Self { belief_bonus: 0.001 }
    }
}

impl CharacterTrait for Devout {
    fn name(&self) -> &str {
        "Devout"
    }

    fn description(&self) -> &str {
        "Finds comfort in belief; small boost to every mood change."
    }

    fn apply(&self, sheet: &mut CharacterSheet) {
        sheet.belief.modifier += self.belief_bonus;
    }
}

/// Blueprint for spawning a character
#[derive(Debug, Clone)]
pub struct CharacterSheet {
    pub name: String,
    /// Family roster to join on spawn, if any
    pub family: Option<String>,
    pub age: u32,
    pub mood: Mood,
    pub belief: Belief,
    pub needs: Needs,
    pub traits: Traits,
    pub schedule: Option<JobSchedule>,
    pub companion: Option<Companion>,
}

impl CharacterSheet {
    /// A bare character: no needs, no schedule, neutral mood
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            family: None,
            age,
            mood: Mood::default(),
            belief: Belief::default(),
            needs: Needs::new(),
            traits: Traits::default(),
            schedule: None,
            companion: None,
        }
    }

    /// A citizen with the configured default needs, mood model and schedule
    pub fn citizen(name: impl Into<String>, age: u32, config: &SimulationConfig) -> Self {
        let mut sheet = Self::new(name, age);
        sheet.mood = Mood::new(config.mood.initial, config.mood.model);
        for spec in &config.needs.defaults {
            sheet.needs.ensure(spec.need_type, spec.max, spec.decay_rate);
        }
        sheet.schedule = Some(JobSchedule::new(
            config.schedule.jobs.clone(),
            config.schedule.durations.clone(),
        ));
        sheet
    }

    pub fn in_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_belief(mut self, modifier: f32) -> Self {
        self.belief.modifier = modifier;
        self
    }

    pub fn with_schedule(mut self, schedule: JobSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn as_companion(mut self) -> Self {
        self.companion = Some(Companion::default());
        self
    }

    /// Apply a trait now. The same trait name is never applied twice.
    pub fn with_trait(mut self, character_trait: &dyn CharacterTrait) -> Self {
        if self.traits.has(character_trait.name()) {
            return self;
        }
        character_trait.apply(&mut self);
        self.traits.0.push(character_trait.name().to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::NeedType;

    #[test]
    fn test_citizen_has_default_needs() {
        let sheet = CharacterSheet::citizen("Ada", 30, &SimulationConfig::default());
        assert_eq!(sheet.needs.len(), 4);
        assert_eq!(
            sheet.needs.get(NeedType::Social).map(|n| n.decay_rate()),
            Some(0.005)
        );
        assert!(sheet.schedule.is_some());
    }

    #[test]
    fn test_trait_applied_once() {
        let devout = Devout { belief_bonus: 0.1 };
        let sheet = CharacterSheet::new("Ada", 30)
            .with_trait(&devout)
            .with_trait(&devout);
        assert!((sheet.belief.modifier - 0.1).abs() < 1e-6);
        assert_eq!(sheet.traits.0, vec!["Devout".to_string()]);
    }

    #[test]
    fn test_hardy_slows_decay() {
        let sheet = CharacterSheet::citizen("Bo", 40, &SimulationConfig::default())
            .with_trait(&Hardy { decay_factor: 0.5 });
        let hunger = sheet.needs.get(NeedType::Hunger).unwrap();
        assert!((hunger.decay_rate() - 0.005).abs() < 1e-6);
    }
}
