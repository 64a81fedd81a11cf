//! Social components: nemesis ledger with narrative profiles, relationship scores

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::CharacterId;

/// Narrative record of a nemesis, created when a grudge first forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NemesisProfile {
    pub name: String,
    pub rank: u32,
    pub traits: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub personality: String,
    pub history: Vec<String>,
}

impl NemesisProfile {
    pub fn new(name: impl Into<String>, rank: u32) -> Self {
        Self {
            name: name.into(),
            rank,
            traits: Vec::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            personality: String::new(),
            history: Vec::new(),
        }
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }
}

/// Personal enemies of one character ("owner"), hostility 0.0-1.0.
///
/// An entry is removed from `hostility` exactly when it reaches 0. Profiles are
/// never removed implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NemesisLedger {
    owner: CharacterId,
    hostility: BTreeMap<CharacterId, f32>,
    profiles: BTreeMap<CharacterId, NemesisProfile>,
}

impl NemesisLedger {
    pub const DEFAULT_HOSTILITY: f32 = 0.5;
    pub const DEFAULT_PERSONALITY: &'static str = "Vengeful";

    pub fn new(owner: CharacterId) -> Self {
        Self {
            owner,
            hostility: BTreeMap::new(),
            profiles: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> CharacterId {
        self.owner
    }

    /// Add a nemesis or deepen an existing grudge. `name` seeds the profile
    /// if one has to be created.
    pub fn add(&mut self, target: CharacterId, name: &str, hostility: f32) {
        if target == self.owner {
            return;
        }
        match self.hostility.get_mut(&target) {
            Some(value) => *value = (*value + hostility).clamp(0.0, 1.0),
            None => {
                let value = hostility.clamp(0.0, 1.0);
                if value <= 0.0 {
                    // A zero grudge would violate removal-on-zero
                    return;
                }
                self.hostility.insert(target, value);
                self.profiles.entry(target).or_insert_with(|| {
                    NemesisProfile::new(name, 0).with_personality(Self::DEFAULT_PERSONALITY)
                });
            }
        }
        if self.hostility.get(&target).is_some_and(|v| *v <= 0.0) {
            self.hostility.remove(&target);
        }
    }

    /// Lower hostility, floored at 0. Forgiven nemeses leave the ledger.
    pub fn reduce(&mut self, target: CharacterId, amount: f32) {
        if let Some(value) = self.hostility.get_mut(&target) {
            *value = (*value - amount).max(0.0);
            if *value <= 0.0 {
                self.hostility.remove(&target);
            }
        }
    }

    pub fn is_nemesis(&self, target: CharacterId) -> bool {
        self.hostility.contains_key(&target)
    }

    /// 0.0 when not a nemesis
    pub fn hostility(&self, target: CharacterId) -> f32 {
        self.hostility.get(&target).copied().unwrap_or(0.0)
    }

    pub fn nemeses(&self) -> &BTreeMap<CharacterId, f32> {
        &self.hostility
    }

    pub fn profile(&self, target: CharacterId) -> Option<&NemesisProfile> {
        self.profiles.get(&target)
    }

    pub fn profiles(&self) -> &BTreeMap<CharacterId, NemesisProfile> {
        &self.profiles
    }

    /// Append an entry to a nemesis' history. False if no profile exists.
    pub fn record_history(&mut self, target: CharacterId, entry: impl Into<String>) -> bool {
        match self.profiles.get_mut(&target) {
            Some(profile) => {
                profile.history.push(entry.into());
                true
            }
            None => false,
        }
    }

    /// Raise a nemesis' rank, returning the new rank
    pub fn promote(&mut self, target: CharacterId) -> Option<u32> {
        self.profiles.get_mut(&target).map(|profile| {
            profile.rank += 1;
            profile.rank
        })
    }

    /// Drop profiles of characters that are no longer nemeses. Returns how many were removed.
    pub fn prune_forgiven_profiles(&mut self) -> usize {
        let before = self.profiles.len();
        let hostility = &self.hostility;
        self.profiles.retain(|id, _| hostility.contains_key(id));
        before - self.profiles.len()
    }

    /// Drop hostility toward a character that left the world. Its profile stays.
    pub(crate) fn forget(&mut self, target: CharacterId) {
        self.hostility.remove(&target);
    }
}

/// Relationship scores toward other characters, -1.0 (hatred) to 1.0 (friendship).
///
/// Stored per owner; A's score toward B says nothing about B's toward A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationships {
    owner: CharacterId,
    scores: BTreeMap<CharacterId, f32>,
}

impl Relationships {
    pub fn new(owner: CharacterId) -> Self {
        Self {
            owner,
            scores: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> CharacterId {
        self.owner
    }

    pub fn modify(&mut self, other: CharacterId, delta: f32) {
        if other == self.owner {
            return;
        }
        let score = self.scores.entry(other).or_insert(0.0);
        *score = (*score + delta).clamp(-1.0, 1.0);
    }

    /// 0.0 (neutral) when never touched
    pub fn get(&self, other: CharacterId) -> f32 {
        self.scores.get(&other).copied().unwrap_or(0.0)
    }

    pub fn scores(&self) -> &BTreeMap<CharacterId, f32> {
        &self.scores
    }

    pub(crate) fn forget(&mut self, other: CharacterId) {
        self.scores.remove(&other);
    }
}
