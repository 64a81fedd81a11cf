//! Character components: identity, mood, belief, traits, companion state.

use serde::{Deserialize, Serialize};

/// Stable handle for a character, allocated by the engine.
///
/// Ledgers (nemeses, relationships, families) key on this rather than on
/// `hecs::Entity` so they survive save/load.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct CharacterId(pub u32);

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who a character is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: CharacterId,
    pub name: String,
    /// Kept in sync by `Family::add_member` / `Family::remove_member`
    pub family_name: String,
    /// Years
    pub age: u32,
}

impl Identity {
    pub fn new(id: CharacterId, name: impl Into<String>, age: u32) -> Self {
        Self {
            id,
            name: name.into(),
            family_name: String::new(),
            age,
        }
    }

    pub fn with_family(mut self, family_name: impl Into<String>) -> Self {
        self.family_name = family_name.into();
        self
    }

    pub fn full_name(&self) -> String {
        if self.family_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.family_name)
        }
    }
}

/// Which component owns a character's mood value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoodModel {
    /// Adjusted by deltas (`modify_mood`), biased by belief
    #[default]
    Incremental,
    /// Recomputed every tick as the mean need satisfaction
    NeedAverage,
}

/// Wellbeing, 0.0 (depressed) to 1.0 (ecstatic)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub value: f32,
    pub model: MoodModel,
}

impl Mood {
    pub fn new(value: f32, model: MoodModel) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            model,
        }
    }

    /// Apply a delta plus belief bias. Returns false when the mood is need-derived.
    pub fn modify(&mut self, amount: f32, belief_modifier: f32) -> bool {
        if self.model != MoodModel::Incremental {
            return false;
        }
        self.value = (self.value + amount + belief_modifier).clamp(0.0, 1.0);
        true
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self::new(0.5, MoodModel::Incremental)
    }
}

/// Static bias added to every incremental mood change
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub modifier: f32,
}

/// Names of traits applied when the character was created
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traits(pub Vec<String>);

impl Traits {
    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|t| t.eq_ignore_ascii_case(name))
    }
}

/// Outcome of a loyalty check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoyaltyState {
    Loyal,
    ConsideringBetrayal,
}

/// Companion following the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    /// 0.0 (disloyal) to 1.0 (devoted)
    pub loyalty: f32,
    pub level: u32,
    pub title: String,
    pub following: bool,
}

impl Default for Companion {
    fn default() -> Self {
        Self {
            loyalty: 0.5,
            level: 1,
            title: "Follower".to_string(),
            following: true,
        }
    }
}

impl Companion {
    const BETRAYAL_THRESHOLD: f32 = 0.1;

    pub fn modify_loyalty(&mut self, amount: f32) {
        self.loyalty = (self.loyalty + amount).clamp(0.0, 1.0);
    }

    pub fn level_up(&mut self, new_title: Option<&str>) {
        self.level += 1;
        if let Some(title) = new_title.filter(|t| !t.trim().is_empty()) {
            self.title = title.to_string();
        }
    }

    pub fn evaluate_loyalty(&self) -> LoyaltyState {
        if self.loyalty <= Self::BETRAYAL_THRESHOLD {
            LoyaltyState::ConsideringBetrayal
        } else {
            LoyaltyState::Loyal
        }
    }
}
