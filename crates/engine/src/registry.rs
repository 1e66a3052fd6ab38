//! Build-time registries
//!
//! Populated once at application startup, read-only thereafter. All
//! behavior the serialized world refers to by name lives here: op
//! handlers, card definitions, NPC templates, location/item/stat
//! catalogs, named action scripts, and periodic clock effects.
//!
//! Lookups of names that content references but never registered are
//! fatal authoring errors, raised immediately.

use std::collections::HashMap;

use suncrest_domain::{
    Card, CardId, DomainError, Instruction, ItemId, LocationId, NpcId, Reminder, Schedule, Value,
    WorldState,
};

use crate::interpreter::ExecCtx;
use crate::ops;

/// Evaluates one instruction. Handlers are plain functions; any state
/// they need travels through the [`ExecCtx`].
pub type OpHandler = fn(&mut ExecCtx<'_>, &Instruction) -> Result<Value, DomainError>;

/// What a card's per-tick hook decided about the card's future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTick {
    Keep,
    Remove,
}

type AfterUpdateHook =
    Box<dyn Fn(&mut ExecCtx<'_>, &mut Card) -> Result<CardTick, DomainError> + Send + Sync>;
type RemindersFn = Box<dyn Fn(&WorldState, &Card) -> Vec<Reminder> + Send + Sync>;

/// Behavior for one card id: a per-tick update hook and an on-demand
/// reminder producer. Instances carry only data; this is the code half.
pub struct CardDef {
    pub after_update: AfterUpdateHook,
    pub reminders: RemindersFn,
}

impl CardDef {
    /// A card with no tick behavior and no reminders (plain traits).
    pub fn inert() -> Self {
        Self {
            after_update: Box::new(|_, _| Ok(CardTick::Keep)),
            reminders: Box::new(|_, _| Vec::new()),
        }
    }
}

/// Immutable NPC template: display data, weekly schedule, and named
/// dialogue scripts.
pub struct NpcTemplate {
    pub name: String,
    pub description: String,
    pub schedule: Schedule,
    pub scripts: HashMap<String, Instruction>,
}

impl NpcTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schedule: Schedule::default(),
            scripts: HashMap::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn script(mut self, name: impl Into<String>, script: Instruction) -> Self {
        self.scripts.insert(name.into(), script);
        self
    }
}

pub struct LocationDef {
    pub name: String,
    /// Runs after `move` lands the player here.
    pub on_arrive: Option<Instruction>,
}

impl LocationDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_arrive: None,
        }
    }

    pub fn on_arrive(mut self, script: Instruction) -> Self {
        self.on_arrive = Some(script);
        self
    }
}

pub struct ItemDef {
    pub name: String,
}

/// Bounds for a stat or reputation track. Deltas clamp here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatDef {
    pub min: i64,
    pub max: i64,
}

impl Default for StatDef {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

/// A script applied once per interval boundary the clock crosses.
pub struct PeriodicEffect {
    pub interval_seconds: i64,
    pub script: Instruction,
}

pub struct Registry {
    ops: HashMap<String, OpHandler>,
    cards: HashMap<CardId, CardDef>,
    npcs: HashMap<NpcId, NpcTemplate>,
    locations: HashMap<LocationId, LocationDef>,
    items: HashMap<ItemId, ItemDef>,
    stats: HashMap<String, StatDef>,
    reputations: HashMap<String, StatDef>,
    actions: HashMap<String, Instruction>,
    periodic: Vec<PeriodicEffect>,
    currency: ItemId,
}

impl Registry {
    /// A registry with the core op set installed. Content registration
    /// happens on top of this before any world state is created.
    pub fn new() -> Self {
        let mut registry = Self {
            ops: HashMap::new(),
            cards: HashMap::new(),
            npcs: HashMap::new(),
            locations: HashMap::new(),
            items: HashMap::new(),
            stats: HashMap::new(),
            reputations: HashMap::new(),
            actions: HashMap::new(),
            periodic: Vec::new(),
            currency: ItemId::new("money"),
        };
        ops::install(&mut registry);
        registry
    }

    // -------------------------------------------------------------------------
    // Registration (init-time only)
    // -------------------------------------------------------------------------

    /// Core-set installation; names are static and distinct by
    /// construction, so this skips the duplicate check.
    pub(crate) fn install_op(&mut self, name: &'static str, handler: OpHandler) {
        self.ops.insert(name.to_string(), handler);
    }

    pub fn register_op(&mut self, name: &str, handler: OpHandler) -> Result<(), DomainError> {
        if self.ops.contains_key(name) {
            return Err(DomainError::duplicate("instruction", name));
        }
        self.ops.insert(name.to_string(), handler);
        Ok(())
    }

    pub fn register_card(&mut self, id: impl Into<CardId>, def: CardDef) {
        self.cards.insert(id.into(), def);
    }

    pub fn register_npc(&mut self, id: impl Into<NpcId>, template: NpcTemplate) {
        self.npcs.insert(id.into(), template);
    }

    pub fn register_location(&mut self, id: impl Into<LocationId>, def: LocationDef) {
        self.locations.insert(id.into(), def);
    }

    pub fn register_item(&mut self, id: impl Into<ItemId>, name: impl Into<String>) {
        self.items.insert(id.into(), ItemDef { name: name.into() });
    }

    pub fn register_stat(&mut self, name: impl Into<String>, def: StatDef) {
        self.stats.insert(name.into(), def);
    }

    pub fn register_reputation(&mut self, name: impl Into<String>, def: StatDef) {
        self.reputations.insert(name.into(), def);
    }

    pub fn register_action(&mut self, name: impl Into<String>, script: Instruction) {
        self.actions.insert(name.into(), script);
    }

    pub fn register_periodic(&mut self, interval_seconds: i64, script: Instruction) {
        self.periodic.push(PeriodicEffect {
            interval_seconds,
            script,
        });
    }

    pub fn set_currency(&mut self, item: impl Into<ItemId>) {
        self.currency = item.into();
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn op(&self, name: &str) -> Result<OpHandler, DomainError> {
        self.ops
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::UnknownInstruction(name.to_string()))
    }

    pub fn card_def(&self, id: &CardId) -> Result<&CardDef, DomainError> {
        self.cards
            .get(id)
            .ok_or_else(|| DomainError::unknown_id("card", id.as_str()))
    }

    pub fn npc_template(&self, id: &NpcId) -> Result<&NpcTemplate, DomainError> {
        self.npcs
            .get(id)
            .ok_or_else(|| DomainError::unknown_id("npc", id.as_str()))
    }

    pub fn location_def(&self, id: &LocationId) -> Result<&LocationDef, DomainError> {
        self.locations
            .get(id)
            .ok_or_else(|| DomainError::unknown_id("location", id.as_str()))
    }

    pub fn item_def(&self, id: &ItemId) -> Result<&ItemDef, DomainError> {
        self.items
            .get(id)
            .ok_or_else(|| DomainError::unknown_id("item", id.as_str()))
    }

    pub fn stat_def(&self, name: &str) -> Result<StatDef, DomainError> {
        self.stats
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::unknown_id("stat", name))
    }

    pub fn reputation_def(&self, name: &str) -> Result<StatDef, DomainError> {
        self.reputations
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::unknown_id("reputation", name))
    }

    pub fn action(&self, name: &str) -> Result<&Instruction, DomainError> {
        self.actions
            .get(name)
            .ok_or_else(|| DomainError::UnknownAction(name.to_string()))
    }

    pub fn periodic_effects(&self) -> &[PeriodicEffect] {
        &self.periodic
    }

    pub fn currency(&self) -> &ItemId {
        &self.currency
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_ops_are_installed() {
        let registry = Registry::new();
        assert!(registry.op("seq").is_ok());
        assert!(registry.op("skillCheck").is_ok());
        assert!(registry.op("pushScenePages").is_ok());
    }

    #[test]
    fn unknown_names_are_fatal() {
        let registry = Registry::new();
        assert!(matches!(
            registry.op("summonDragon"),
            Err(DomainError::UnknownInstruction(_))
        ));
        assert!(matches!(
            registry.stat_def("Charm"),
            Err(DomainError::UnknownId { kind: "stat", .. })
        ));
        assert!(matches!(
            registry.action("fly"),
            Err(DomainError::UnknownAction(_))
        ));
    }

    #[test]
    fn duplicate_op_registration_is_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register_op("seq", |_, _| Ok(Value::Null))
            .expect_err("duplicate");
        assert!(matches!(err, DomainError::DuplicateRegistration { .. }));
    }
}
