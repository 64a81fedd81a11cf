//! Colony - citizens, family rosters, the resource ledger and settlement tiers
//!
//! Resource names are case-insensitive and stored trimmed and lower-cased.
//! A resource whose stock drops to zero or below is removed from the ledger.
//! `try_consume_resources` is all-or-nothing: it validates the whole basket
//! before touching any stock.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use super::events::ColonyEvent;
use crate::components::{CharacterId, Identity};

/// Flat family membership list. Keeps each member's `Identity::family_name` in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub name: String,
    members: Vec<CharacterId>,
}

impl Family {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[CharacterId] {
        &self.members
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.members.contains(&id)
    }

    /// Idempotent. Returns true if the character was newly added.
    pub fn add_member(&mut self, identity: &mut Identity) -> bool {
        if self.contains(identity.id) {
            return false;
        }
        self.members.push(identity.id);
        identity.family_name = self.name.clone();
        true
    }

    /// Idempotent. Returns true if the character was a member.
    pub fn remove_member(&mut self, identity: &mut Identity) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != identity.id);
        if self.members.len() == before {
            return false;
        }
        identity.family_name.clear();
        true
    }
}

/// Settlement tier names: village, town, city, nation, federation
pub fn tier_name(tier: u32) -> &'static str {
    match tier {
        0 => "village",
        1 => "town",
        2 => "city",
        3 => "nation",
        _ => "federation",
    }
}

fn normalize_resource(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Colony state (singleton, stored in engine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonySystem {
    citizens: Vec<CharacterId>,
    families: Vec<Family>,
    resources: BTreeMap<String, i64>,
    settlement_tier: u32,
    wood_per_tier: i64,
    stone_per_tier: i64,
    #[serde(skip)]
    pending: Vec<ColonyEvent>,
}

impl Default for ColonySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ColonySystem {
    pub const WOOD: &'static str = "wood";
    pub const STONE: &'static str = "stone";
    pub const FOOD: &'static str = "food";

    pub fn new() -> Self {
        Self::with_tier_costs(10, 5)
    }

    /// Advancing from tier T costs `wood_per_tier * (T + 1)` wood and
    /// `stone_per_tier * (T + 1)` stone.
    pub fn with_tier_costs(wood_per_tier: i64, stone_per_tier: i64) -> Self {
        Self {
            citizens: Vec::new(),
            families: Vec::new(),
            resources: BTreeMap::new(),
            settlement_tier: 0,
            wood_per_tier,
            stone_per_tier,
            pending: Vec::new(),
        }
    }

    // --- Citizens & families ---

    pub fn citizens(&self) -> &[CharacterId] {
        &self.citizens
    }

    pub fn is_citizen(&self, id: CharacterId) -> bool {
        self.citizens.contains(&id)
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&Family> {
        self.families.iter().find(|f| f.name == name)
    }

    /// Track a family roster, creating it if needed
    pub fn ensure_family(&mut self, name: &str) -> &mut Family {
        match self.families.iter().position(|f| f.name == name) {
            Some(idx) => &mut self.families[idx],
            None => {
                self.families.push(Family::new(name));
                let last = self.families.len() - 1;
                &mut self.families[last]
            }
        }
    }

    /// Register a citizen, optionally placing them in a family.
    ///
    /// Fails if the entity has no identity or is already a citizen.
    pub fn add_citizen(&mut self, world: &mut World, entity: Entity, family: Option<&str>) -> bool {
        let Ok(mut identity) = world.get::<&mut Identity>(entity) else {
            return false;
        };
        if self.is_citizen(identity.id) {
            return false;
        }
        self.citizens.push(identity.id);
        if let Some(name) = family.filter(|n| !n.trim().is_empty()) {
            self.ensure_family(name).add_member(&mut identity);
        }
        self.pending.push(ColonyEvent::CitizenAdded {
            citizen: identity.id,
        });
        true
    }

    /// Remove a citizen from the colony and from every family roster.
    pub fn remove_citizen(&mut self, world: &mut World, entity: Entity) -> bool {
        let Ok(mut identity) = world.get::<&mut Identity>(entity) else {
            return false;
        };
        let id = identity.id;
        let before = self.citizens.len();
        self.citizens.retain(|c| *c != id);
        if self.citizens.len() == before {
            return false;
        }
        for family in &mut self.families {
            family.remove_member(&mut identity);
        }
        self.pending.push(ColonyEvent::CitizenRemoved { citizen: id });
        true
    }

    // --- Resources ---

    pub fn resources(&self) -> &BTreeMap<String, i64> {
        &self.resources
    }

    /// 0 for unknown or blank names
    pub fn resource_amount(&self, name: &str) -> i64 {
        normalize_resource(name)
            .and_then(|key| self.resources.get(&key).copied())
            .unwrap_or(0)
    }

    /// Add (or, with a negative amount, remove) stock. Blank names and zero
    /// amounts are ignored. Stock at or below zero is deleted; stock
    /// saturates at `i64::MAX`.
    pub fn add_resource(&mut self, name: &str, amount: i64) {
        if amount == 0 {
            return;
        }
        let Some(key) = normalize_resource(name) else {
            return;
        };
        let current = self.resources.get(&key).copied().unwrap_or(0);
        self.set_stock(key, current.saturating_add(amount));
    }

    fn set_stock(&mut self, key: String, amount: i64) {
        let reported = if amount <= 0 {
            self.resources.remove(&key);
            0
        } else {
            self.resources.insert(key.clone(), amount);
            amount
        };
        self.pending.push(ColonyEvent::ResourceChanged {
            resource: key,
            amount: reported,
        });
    }

    /// Deduct every entry of `cost`, or nothing at all.
    ///
    /// Fails without mutation if any name is blank, any amount is negative,
    /// or stock is short for any entry. Entries naming the same resource
    /// (case-insensitively) are summed before checking; a sum that overflows
    /// `i64` is unaffordable.
    pub fn try_consume_resources(&mut self, cost: &[(&str, i64)]) -> bool {
        let mut required: BTreeMap<String, i64> = BTreeMap::new();
        for (name, amount) in cost {
            let Some(key) = normalize_resource(name) else {
                return false;
            };
            if *amount < 0 {
                return false;
            }
            let total = required.entry(key).or_insert(0);
            match total.checked_add(*amount) {
                Some(sum) => *total = sum,
                None => return false,
            }
        }

        let affordable = required
            .iter()
            .all(|(key, amount)| self.resources.get(key).copied().unwrap_or(0) >= *amount);
        if !affordable {
            return false;
        }

        for (key, amount) in required {
            if amount == 0 {
                continue;
            }
            let current = self.resources.get(&key).copied().unwrap_or(0);
            self.set_stock(key, current - amount);
        }
        true
    }

    // --- Settlement ---

    pub fn settlement_tier(&self) -> u32 {
        self.settlement_tier
    }

    /// Wood and stone needed to leave the current tier
    pub fn upgrade_cost(&self) -> [(&'static str, i64); 2] {
        let step = i64::from(self.settlement_tier) + 1;
        [
            (Self::WOOD, self.wood_per_tier * step),
            (Self::STONE, self.stone_per_tier * step),
        ]
    }

    /// Consume the upgrade cost and advance one tier, or change nothing.
    pub fn try_upgrade_settlement(&mut self) -> bool {
        let cost = self.upgrade_cost();
        if !self.try_consume_resources(&cost) {
            log::debug!(
                "not enough resources to leave tier {} (need {:?})",
                self.settlement_tier,
                cost
            );
            return false;
        }
        self.settlement_tier += 1;
        log::info!(
            "settlement upgraded to tier {} ({})",
            self.settlement_tier,
            tier_name(self.settlement_tier)
        );
        self.pending.push(ColonyEvent::SettlementUpgraded {
            tier: self.settlement_tier,
        });
        true
    }

    /// Take the queued change notifications
    pub fn drain_events(&mut self) -> Vec<ColonyEvent> {
        std::mem::take(&mut self.pending)
    }
}
