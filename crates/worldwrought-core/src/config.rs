//! Simulation configuration.
//!
//! Every tunable lives here with a `Default` that matches the stock game.
//! Values can be overridden from a TOML file; missing keys keep their defaults.
//!
//! ```toml
//! seed = 42
//! initial_citizens = 8
//!
//! [colony]
//! wood_per_tier = 10
//! stone_per_tier = 5
//! upgrade_interval = 1.0
//!
//! [[needs.defaults]]
//! need_type = "Hunger"
//! max = 1.0
//! decay_rate = 0.01
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{
    JobType, MoodModel, NeedType, DAILY_ROUTINE_DURATIONS, DAILY_ROUTINE_JOBS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Starting parameters for one need
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedSpec {
    pub need_type: NeedType,
    pub max: f32,
    pub decay_rate: f32,
}

impl NeedSpec {
    pub const fn new(need_type: NeedType, max: f32, decay_rate: f32) -> Self {
        Self {
            need_type,
            max,
            decay_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    /// Needs every new citizen starts with
    pub defaults: Vec<NeedSpec>,
    /// Max for a need created lazily by `fulfill_need`
    pub lazy_max: f32,
    /// Decay rate for a need created lazily by `fulfill_need`
    pub lazy_decay_rate: f32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            defaults: vec![
                NeedSpec::new(NeedType::Hunger, 1.0, 0.01),
                NeedSpec::new(NeedType::Rest, 1.0, 0.01),
                NeedSpec::new(NeedType::Social, 1.0, 0.005),
                NeedSpec::new(NeedType::Recreation, 1.0, 0.002),
            ],
            lazy_max: 1.0,
            lazy_decay_rate: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    pub model: MoodModel,
    pub initial: f32,
    /// Belief modifiers of generated citizens are drawn from ±this range
    pub belief_spread: f32,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            model: MoodModel::Incremental,
            initial: 0.5,
            belief_spread: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub jobs: Vec<JobType>,
    /// Seconds per slot, cycled if shorter than `jobs`
    pub durations: Vec<f32>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            jobs: DAILY_ROUTINE_JOBS.to_vec(),
            durations: DAILY_ROUTINE_DURATIONS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Wood required per tier step: advancing from T costs `wood_per_tier * (T + 1)`
    pub wood_per_tier: i64,
    pub stone_per_tier: i64,
    /// Seconds between gathering rounds (0 disables gathering)
    pub production_interval: f32,
    /// Seconds between automatic upgrade attempts (0 attempts every tick)
    pub upgrade_interval: f32,
    pub food_per_gather: i64,
    pub wood_per_gather: i64,
    /// Hunger restored when a citizen gathers food
    pub gather_food_fulfills: f32,
    /// Rest restored when a citizen gathers wood
    pub gather_wood_fulfills: f32,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            wood_per_tier: 10,
            stone_per_tier: 5,
            production_interval: 1.0,
            upgrade_interval: 0.0,
            food_per_gather: 1,
            wood_per_gather: 1,
            gather_food_fulfills: 0.1,
            gather_wood_fulfills: 0.05,
        }
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// RNG seed for citizen generation; None draws from entropy
    pub seed: Option<u64>,
    pub initial_citizens: usize,
    pub time_scale: f32,
    pub needs: NeedsConfig,
    pub mood: MoodConfig,
    pub schedule: ScheduleConfig,
    pub colony: ColonyConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initial_citizens: 5,
            time_scale: 1.0,
            needs: NeedsConfig::default(),
            mood: MoodConfig::default(),
            schedule: ScheduleConfig::default(),
            colony: ColonyConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.time_scale < 0.0 {
            return Err(invalid("time_scale", "must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.mood.initial) {
            return Err(invalid("mood.initial", "must be within 0.0..=1.0"));
        }
        if self.mood.belief_spread < 0.0 {
            return Err(invalid("mood.belief_spread", "must be non-negative"));
        }
        for spec in &self.needs.defaults {
            if spec.max < 0.0 || spec.decay_rate < 0.0 {
                return Err(invalid(
                    "needs.defaults",
                    format!("{:?} has a negative max or decay rate", spec.need_type),
                ));
            }
        }
        let mut seen = Vec::new();
        for spec in &self.needs.defaults {
            if seen.contains(&spec.need_type) {
                return Err(invalid(
                    "needs.defaults",
                    format!("{:?} listed twice", spec.need_type),
                ));
            }
            seen.push(spec.need_type);
        }
        if self.needs.lazy_max < 0.0 || self.needs.lazy_decay_rate < 0.0 {
            return Err(invalid("needs.lazy_*", "must be non-negative"));
        }
        if self.schedule.durations.iter().any(|d| *d <= 0.0) {
            return Err(invalid("schedule.durations", "every duration must be positive"));
        }
        let colony = &self.colony;
        if colony.wood_per_tier < 0 || colony.stone_per_tier < 0 {
            return Err(invalid("colony.*_per_tier", "must be non-negative"));
        }
        if colony.production_interval < 0.0 || colony.upgrade_interval < 0.0 {
            return Err(invalid("colony.*_interval", "must be non-negative"));
        }
        if colony.food_per_gather < 0 || colony.wood_per_gather < 0 {
            return Err(invalid("colony.*_per_gather", "must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 7
            initial_citizens = 12

            [colony]
            wood_per_tier = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.initial_citizens, 12);
        assert_eq!(config.colony.wood_per_tier, 20);
        assert_eq!(config.colony.stone_per_tier, 5);
        assert_eq!(config.needs.defaults.len(), 4);
    }

    #[test]
    fn test_enum_values_parse() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [mood]
            model = "NeedAverage"

            [schedule]
            jobs = ["Farm", "Eat", "Sleep"]
            durations = [4.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.mood.model, MoodModel::NeedAverage);
        assert_eq!(config.schedule.jobs.len(), 3);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SimulationConfig::from_toml_str("time_scale = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "time_scale", .. }));

        let err = SimulationConfig::from_toml_str("[schedule]\ndurations = [0.0]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = SimulationConfig::from_toml_str("initial_citizens = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
