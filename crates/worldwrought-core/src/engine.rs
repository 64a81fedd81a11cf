//! Simulation engine - main entry point for running the simulation
//!
//! The engine is the application context: it owns the ECS world, the colony,
//! the lineage registry and the observer bus, and every operation on a
//! character goes through it by [`CharacterId`].

use std::collections::{BTreeMap, HashMap};

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::config::SimulationConfig;
use crate::generation::{random_citizen, CharacterSheet};
use crate::persistence::{EngineClock, SaveError};
use crate::systems::*;

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all character entities
    pub world: World,
    /// Simulated seconds since start
    sim_time: f64,
    config: SimulationConfig,
    colony: ColonySystem,
    lineage: FamilyTree,
    observers: EventBus,
    index: HashMap<CharacterId, Entity>,
    next_id: u32,
    rng: StdRng,

    // Update timing
    production_round: u64,
    last_production: f64,
    last_upgrade: f64,

    time_scale: f32,
}

impl SimulationEngine {
    /// Create a new empty simulation with the default configuration
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world: World::new(),
            sim_time: 0.0,
            colony: ColonySystem::with_tier_costs(
                config.colony.wood_per_tier,
                config.colony.stone_per_tier,
            ),
            lineage: FamilyTree::new(),
            observers: EventBus::new(),
            index: HashMap::new(),
            next_id: 0,
            rng,
            production_round: 0,
            last_production: 0.0,
            last_upgrade: 0.0,
            time_scale: config.time_scale.max(0.0),
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn colony(&self) -> &ColonySystem {
        &self.colony
    }

    pub fn lineage(&self) -> &FamilyTree {
        &self.lineage
    }

    // --- Spawning ---

    /// Spawn `count` random citizens
    pub fn generate(&mut self, count: usize) -> Vec<CharacterId> {
        let ids: Vec<CharacterId> = (0..count).map(|_| self.spawn_random_citizen()).collect();
        log::info!("generated {} citizens", ids.len());
        ids
    }

    pub fn spawn_random_citizen(&mut self) -> CharacterId {
        let sheet = random_citizen(&self.config, &mut self.rng);
        self.spawn_citizen(sheet)
    }

    /// Spawn a character that is not a colony citizen. A family name on the
    /// sheet goes into the lineage registry only; `Identity::family_name`
    /// stays blank until the character joins a colony family.
    pub fn spawn_character(&mut self, sheet: CharacterSheet) -> CharacterId {
        let id = CharacterId(self.next_id);
        self.next_id += 1;

        if let Some(family) = sheet.family.as_deref() {
            self.lineage.register_character(id, family);
        }
        let identity = Identity::new(id, sheet.name, sheet.age);

        let entity = self.world.spawn((
            identity,
            sheet.mood,
            sheet.belief,
            sheet.needs,
            sheet.traits,
            NemesisLedger::new(id),
            Relationships::new(id),
        ));
        // The entity was spawned just above, so these cannot fail
        if let Some(schedule) = sheet.schedule {
            let _ = self.world.insert_one(entity, schedule);
        }
        if let Some(companion) = sheet.companion {
            let _ = self.world.insert_one(entity, companion);
        }

        self.index.insert(id, entity);
        id
    }

    /// Spawn a character and register it as a colony citizen (and family member)
    pub fn spawn_citizen(&mut self, sheet: CharacterSheet) -> CharacterId {
        let family = sheet.family.clone();
        let id = self.spawn_character(sheet);
        self.add_citizen(id, family.as_deref().map(str::trim));
        log::debug!("citizen {} joined the colony", id);
        id
    }

    /// Despawn a character, dropping it from the colony and from every
    /// other character's hostility and relationship ledgers. Lineage keeps it
    /// as an ancestor.
    pub fn remove_character(&mut self, id: CharacterId) -> bool {
        let Some(entity) = self.index.remove(&id) else {
            return false;
        };
        self.colony.remove_citizen(&mut self.world, entity);
        forget_character(&mut self.world, id);
        let _ = self.world.despawn(entity);
        self.flush_events();
        log::info!("character {} left the world", id);
        true
    }

    // --- Lookup ---

    pub fn entity(&self, id: CharacterId) -> Option<Entity> {
        self.index.get(&id).copied()
    }

    pub fn character_count(&self) -> usize {
        self.index.len()
    }

    /// All living characters, ascending
    pub fn character_ids(&self) -> Vec<CharacterId> {
        let mut ids: Vec<CharacterId> = self.index.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn identity(&self, id: CharacterId) -> Option<Identity> {
        let entity = self.entity(id)?;
        self.world.get::<&Identity>(entity).ok().map(|i| (*i).clone())
    }

    fn age_of(&self, id: CharacterId) -> Option<u32> {
        let entity = self.entity(id)?;
        self.world.get::<&Identity>(entity).ok().map(|i| i.age)
    }

    pub fn mood(&self, id: CharacterId) -> Option<f32> {
        let entity = self.entity(id)?;
        self.world.get::<&Mood>(entity).ok().map(|m| m.value)
    }

    /// Current satisfaction of a need; `None` if the character never had it
    pub fn need_level(&self, id: CharacterId, need_type: NeedType) -> Option<f32> {
        let entity = self.entity(id)?;
        let needs = self.world.get::<&Needs>(entity).ok()?;
        needs.get(need_type).map(Need::current)
    }

    /// Characters whose least satisfied need is below `threshold`
    pub fn characters_with_urgent_needs(&self, threshold: f32) -> Vec<(CharacterId, NeedType)> {
        find_urgent_needs(&self.world, threshold)
    }

    // --- Character operations ---

    pub fn modify_mood(&mut self, id: CharacterId, amount: f32) -> bool {
        match self.entity(id) {
            Some(entity) => modify_mood(&mut self.world, entity, amount),
            None => false,
        }
    }

    /// `actor` meets `other`; see [`crate::systems::interact`]
    pub fn interact(&mut self, actor: CharacterId, other: CharacterId) -> bool {
        match (self.entity(actor), self.entity(other)) {
            (Some(a), Some(b)) => interact(&mut self.world, a, b),
            _ => false,
        }
    }

    /// Fulfill a need, creating it from the lazy defaults if missing
    pub fn fulfill_need(&mut self, id: CharacterId, need_type: NeedType, amount: f32) -> bool {
        match self.entity(id) {
            Some(entity) => fulfill_need(
                &mut self.world,
                entity,
                need_type,
                amount,
                &self.config.needs,
            ),
            None => false,
        }
    }

    pub fn add_nemesis(&mut self, actor: CharacterId, target: CharacterId, hostility: f32) -> bool {
        match (self.entity(actor), self.entity(target)) {
            (Some(a), Some(t)) => add_nemesis(&mut self.world, a, t, hostility),
            _ => false,
        }
    }

    /// False unless both characters exist
    pub fn reduce_hostility(&mut self, actor: CharacterId, target: CharacterId, amount: f32) -> bool {
        if self.entity(target).is_none() {
            return false;
        }
        match self.entity(actor) {
            Some(a) => {
                reduce_hostility(&mut self.world, a, target, amount);
                true
            }
            None => false,
        }
    }

    fn ledger(&self, actor: CharacterId) -> Option<hecs::Ref<'_, NemesisLedger>> {
        let entity = self.entity(actor)?;
        self.world.get::<&NemesisLedger>(entity).ok()
    }

    pub fn is_nemesis(&self, actor: CharacterId, target: CharacterId) -> bool {
        self.ledger(actor).is_some_and(|l| l.is_nemesis(target))
    }

    pub fn hostility(&self, actor: CharacterId, target: CharacterId) -> f32 {
        self.ledger(actor).map_or(0.0, |l| l.hostility(target))
    }

    /// Snapshot of `actor`'s nemeses; later changes don't affect it
    pub fn nemeses(&self, actor: CharacterId) -> BTreeMap<CharacterId, f32> {
        self.ledger(actor)
            .map(|l| l.nemeses().clone())
            .unwrap_or_default()
    }

    pub fn nemesis_profile(&self, actor: CharacterId, target: CharacterId) -> Option<NemesisProfile> {
        self.ledger(actor)?.profile(target).cloned()
    }

    /// False unless both characters exist
    pub fn modify_relationship(&mut self, actor: CharacterId, other: CharacterId, delta: f32) -> bool {
        if self.entity(other).is_none() {
            return false;
        }
        match self.entity(actor) {
            Some(a) => modify_relationship(&mut self.world, a, other, delta),
            None => false,
        }
    }

    pub fn relationship(&self, actor: CharacterId, other: CharacterId) -> f32 {
        self.entity(actor)
            .and_then(|e| self.world.get::<&Relationships>(e).ok().map(|r| r.get(other)))
            .unwrap_or(0.0)
    }

    // --- Companions ---

    pub fn modify_loyalty(&mut self, id: CharacterId, amount: f32) -> bool {
        let Some(entity) = self.entity(id) else {
            return false;
        };
        match self.world.get::<&mut Companion>(entity) {
            Ok(mut companion) => {
                companion.modify_loyalty(amount);
                true
            }
            Err(_) => false,
        }
    }

    pub fn level_up_companion(&mut self, id: CharacterId, title: Option<&str>) -> Option<u32> {
        let entity = self.entity(id)?;
        let mut companion = self.world.get::<&mut Companion>(entity).ok()?;
        companion.level_up(title);
        Some(companion.level)
    }

    /// `None` if the character is not a companion
    pub fn evaluate_loyalty(&self, id: CharacterId) -> Option<LoyaltyState> {
        let entity = self.entity(id)?;
        let companion = self.world.get::<&Companion>(entity).ok()?;
        let state = companion.evaluate_loyalty();
        if state == LoyaltyState::ConsideringBetrayal {
            log::warn!(
                "companion {} is considering betrayal (loyalty {:.2})",
                id,
                companion.loyalty
            );
        }
        Some(state)
    }

    // --- Colony ---

    pub fn add_citizen(&mut self, id: CharacterId, family: Option<&str>) -> bool {
        let Some(entity) = self.entity(id) else {
            return false;
        };
        let added = self.colony.add_citizen(&mut self.world, entity, family);
        if added {
            if let Ok(identity) = self.world.get::<&Identity>(entity) {
                self.lineage.register_character(id, &identity.family_name);
            }
        }
        self.flush_events();
        added
    }

    pub fn remove_citizen(&mut self, id: CharacterId) -> bool {
        let Some(entity) = self.entity(id) else {
            return false;
        };
        let removed = self.colony.remove_citizen(&mut self.world, entity);
        self.flush_events();
        removed
    }

    pub fn add_resource(&mut self, name: &str, amount: i64) {
        self.colony.add_resource(name, amount);
        self.flush_events();
    }

    pub fn resource_amount(&self, name: &str) -> i64 {
        self.colony.resource_amount(name)
    }

    pub fn try_consume_resources(&mut self, cost: &[(&str, i64)]) -> bool {
        let consumed = self.colony.try_consume_resources(cost);
        self.flush_events();
        consumed
    }

    pub fn try_upgrade_settlement(&mut self) -> bool {
        let upgraded = self.colony.try_upgrade_settlement();
        self.flush_events();
        upgraded
    }

    pub fn subscribe(&mut self, observer: Box<dyn ColonyObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn flush_events(&mut self) {
        let events = self.colony.drain_events();
        if !events.is_empty() {
            self.observers.dispatch(events);
        }
    }

    // --- Lineage ---

    pub fn add_child(&mut self, parent: CharacterId, child: CharacterId, role: ParentRole) -> bool {
        self.lineage.add_child(parent, child, role)
    }

    /// Oldest living member of a family's lineage
    pub fn heir(&self, family: &str) -> Option<CharacterId> {
        self.lineage.heir(family, |id| self.age_of(id))
    }

    // --- Time ---

    /// Update the simulation by delta_seconds
    pub fn update(&mut self, delta_seconds: f32) {
        let scaled_delta = delta_seconds.max(0.0) * self.time_scale;
        self.sim_time += f64::from(scaled_delta);

        needs_system(&mut self.world, scaled_delta);
        mood_system(&mut self.world);
        schedule_system(&mut self.world, scaled_delta);

        let production_interval = f64::from(self.config.colony.production_interval);
        if production_interval > 0.0 && due(self.sim_time, self.last_production, production_interval) {
            production_system(
                &mut self.world,
                &mut self.colony,
                self.production_round,
                &self.config,
            );
            self.production_round += 1;
            self.last_production = self.sim_time;
        }

        let upgrade_interval = f64::from(self.config.colony.upgrade_interval);
        if due(self.sim_time, self.last_upgrade, upgrade_interval) {
            self.colony.try_upgrade_settlement();
            self.last_upgrade = self.sim_time;
        }

        self.flush_events();
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Simulated seconds since start
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    // --- Persistence ---

    fn clock(&self) -> EngineClock {
        EngineClock {
            sim_time: self.sim_time,
            time_scale: self.time_scale,
            next_id: self.next_id,
            production_round: self.production_round,
        }
    }

    /// Save simulation state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        crate::persistence::save_simulation(
            writer,
            &self.world,
            &self.clock(),
            &self.config,
            &self.colony,
            &self.lineage,
        )
    }

    /// Load simulation state from a reader. Subscribers are kept.
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = crate::persistence::load_simulation(reader)?;

        self.world = loaded.world;
        self.config = loaded.config;
        self.colony = loaded.colony;
        self.lineage = loaded.lineage;
        self.sim_time = loaded.clock.sim_time;
        self.time_scale = loaded.clock.time_scale;
        self.next_id = loaded.clock.next_id;
        self.production_round = loaded.clock.production_round;

        self.index = self
            .world
            .query::<&Identity>()
            .iter()
            .map(|(entity, identity)| (identity.id, entity))
            .collect();

        // Reset update timers
        self.last_production = self.sim_time;
        self.last_upgrade = self.sim_time;

        Ok(())
    }
}

/// A throttled system runs once time has moved at least `interval` past its last run
fn due(now: f64, last: f64, interval: f64) -> bool {
    let elapsed = now - last;
    elapsed > 0.0 && elapsed >= interval
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
