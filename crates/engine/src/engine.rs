//! Engine facade - the single mutation entry point
//!
//! The presentation layer reads snapshots through the query surface and
//! mutates exclusively through `take_action`. Actions run to completion
//! one at a time; every action ends with a card tick.

use std::collections::BTreeMap;

use suncrest_domain::{
    Card, DomainError, Instruction, ItemId, NpcId, Reminder, Scene, Value, WorldState, WorldTime,
};
use tracing::{debug, info_span};

use crate::cards;
use crate::interpreter::{exec, ExecCtx};
use crate::persistence;
use crate::registry::Registry;
use crate::rng::{Roller, ThreadRoller};
use crate::scene_flow;

/// Built-in router action: resume the next queued page.
pub const ACTION_ADVANCE: &str = "advanceScene";
/// Built-in router action: run a displayed option by index.
pub const ACTION_CHOOSE: &str = "choose";
/// Built-in router action: purchase from the open shop.
pub const ACTION_BUY: &str = "buy";

pub type ActionParams = BTreeMap<String, Value>;

pub struct Engine {
    registry: Registry,
    world: WorldState,
    roller: Box<dyn Roller>,
}

impl Engine {
    pub fn new(registry: Registry, world: WorldState) -> Self {
        Self::with_roller(registry, world, Box::new(ThreadRoller))
    }

    pub fn with_roller(registry: Registry, world: WorldState, roller: Box<dyn Roller>) -> Self {
        Self {
            registry,
            world,
            roller,
        }
    }

    /// Resume a playthrough from a serialized world document.
    pub fn from_saved(registry: Registry, data: &str) -> Result<Self, DomainError> {
        Ok(Self::new(registry, persistence::load(data)?))
    }

    /// As [`Engine::from_saved`], with an explicit randomness source, so
    /// a restored playthrough can be driven deterministically.
    pub fn from_saved_with_roller(
        registry: Registry,
        data: &str,
        roller: Box<dyn Roller>,
    ) -> Result<Self, DomainError> {
        Ok(Self::with_roller(registry, persistence::load(data)?, roller))
    }

    pub fn save(&self) -> Result<String, DomainError> {
        persistence::save(&self.world)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn scene(&self) -> &Scene {
        &self.world.scene
    }

    pub fn time(&self) -> WorldTime {
        self.world.time
    }

    pub fn inventory(&self) -> &BTreeMap<ItemId, i64> {
        &self.world.player.inventory
    }

    pub fn stats(&self) -> &BTreeMap<String, i64> {
        &self.world.player.stats
    }

    pub fn cards(&self) -> &[Card] {
        &self.world.player.cards
    }

    pub fn reminders(&self) -> Result<Vec<Reminder>, DomainError> {
        cards::reminders(&self.world, &self.registry)
    }

    pub fn npcs_at_player_location(&self) -> Vec<&NpcId> {
        self.world.npcs_at_player_location()
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Run a content script directly, outside the action router. Used to
    /// bootstrap a playthrough (the opening sequence).
    pub fn run(&mut self, script: &Instruction) -> Result<(), DomainError> {
        let mut ctx = ExecCtx::new(&mut self.world, &self.registry, self.roller.as_mut());
        exec(&mut ctx, script)?;
        cards::tick(&mut ctx)
    }

    /// The sole mutation entry point for the presentation layer.
    ///
    /// `advanceScene` and `choose` resume the continuation stack; `buy`
    /// drops pending pages but keeps the shop display; any other name
    /// must be a registered action script and starts from a cleared
    /// scene. Every action ends with a card tick.
    pub fn take_action(&mut self, name: &str, params: &ActionParams) -> Result<(), DomainError> {
        let span = info_span!("take_action", action = name);
        let _guard = span.enter();

        match name {
            ACTION_ADVANCE => {
                let mut ctx =
                    ExecCtx::new(&mut self.world, &self.registry, self.roller.as_mut());
                scene_flow::advance(&mut ctx)?;
            }
            ACTION_CHOOSE => self.choose(params)?,
            ACTION_BUY => self.buy(params)?,
            _ => {
                let script = self.registry.action(name)?.clone();
                // A fresh context: pending continuations do not survive
                // navigating to a different activity.
                self.world.scene.clear();
                let mut ctx =
                    ExecCtx::new(&mut self.world, &self.registry, self.roller.as_mut());
                exec(&mut ctx, &script)?;
            }
        }

        let mut ctx = ExecCtx::new(&mut self.world, &self.registry, self.roller.as_mut());
        cards::tick(&mut ctx)
    }

    fn choose(&mut self, params: &ActionParams) -> Result<(), DomainError> {
        let index = params
            .get("index")
            .and_then(Value::as_int)
            .ok_or_else(|| DomainError::missing_arg(ACTION_CHOOSE, 0, "option index"))?;
        let run = usize::try_from(index)
            .ok()
            .and_then(|i| self.world.scene.options.get(i))
            .map(|option| option.run.clone())
            .ok_or_else(|| DomainError::bad_arg(ACTION_CHOOSE, 0, "option index"))?;
        debug!(index, op = %run.op, "option chosen");
        // The chosen option owns the display from here; queued pages stay.
        self.world.scene.clear_display();
        let mut ctx = ExecCtx::new(&mut self.world, &self.registry, self.roller.as_mut());
        exec(&mut ctx, &run)?;
        // A plain body leaves no options behind; re-offer Continue so the
        // queued pages stay reachable.
        scene_flow::ensure_continue(&mut ctx);
        Ok(())
    }

    fn buy(&mut self, params: &ActionParams) -> Result<(), DomainError> {
        let item = params
            .get("item")
            .and_then(Value::as_text)
            .map(ItemId::new)
            .ok_or_else(|| DomainError::missing_arg(ACTION_BUY, 0, "item"))?;
        let Some(shop) = &self.world.scene.shop else {
            return Err(DomainError::validation("no shop is open"));
        };
        let Some(entry) = shop.stock.iter().find(|e| e.item == item) else {
            return Err(DomainError::validation(format!(
                "{} is not stocked here",
                item
            )));
        };
        let price = entry.price;
        let name = self.registry.item_def(&item)?.name.clone();
        let currency = self.registry.currency().clone();

        // Purchases abandon pending continuations but keep the shop open.
        self.world.scene.stack.clear();

        let funds = self.world.player.item_count(&currency);
        if funds < price {
            self.world.scene.paragraph(format!("You can't afford the {}.", name));
            return Ok(());
        }
        if funds == price {
            self.world.player.inventory.remove(&currency);
        } else {
            self.world.player.inventory.insert(currency, funds - price);
        }
        let held = self.world.player.item_count(&item);
        self.world.player.inventory.insert(item, held + 1);
        debug!(%name, price, "purchase");
        self.world.scene.paragraph(format!("Bought {}.", name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{LocationDef, NpcTemplate, StatDef};
    use crate::rng::ScriptedRoller;
    use suncrest_domain::script;

    const MONDAY: i64 = 1_704_067_200;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_item("money", "Money");
        registry.register_item("soda", "Soda");
        registry.register_npc("emma", NpcTemplate::new("Emma"));
        registry.register_location("kiosk", LocationDef::new("Kiosk"));
        registry.register_stat("Fitness", StatDef::default());
        registry.register_action(
            "work_out",
            script::seq(vec![script::text("You lift."), script::add_stat("Fitness", 1)]),
        );
        registry
    }

    fn engine() -> Engine {
        let world = WorldState::new(WorldTime::from_seconds(MONDAY), "kiosk");
        Engine::with_roller(registry(), world, Box::new(ScriptedRoller::default()))
    }

    fn choose_params(index: i64) -> ActionParams {
        let mut params = ActionParams::new();
        params.insert("index".into(), Value::Int(index));
        params
    }

    #[test]
    fn named_action_clears_pending_pages_before_running() {
        let mut engine = engine();
        engine
            .run(&script::scenes(vec![
                vec![script::text("one")],
                vec![script::text("two")],
            ]))
            .expect("run");
        assert!(engine.scene().has_pending_pages());

        engine.take_action("work_out", &ActionParams::new()).expect("action");
        assert!(!engine.scene().has_pending_pages());
        assert_eq!(engine.stats().get("Fitness"), Some(&1));
    }

    #[test]
    fn unknown_action_is_fatal() {
        let mut engine = engine();
        let err = engine
            .take_action("fly", &ActionParams::new())
            .expect_err("unknown");
        assert_eq!(err, DomainError::UnknownAction("fly".into()));
    }

    #[test]
    fn choose_requires_a_valid_index() {
        let mut engine = engine();
        engine
            .run(&script::option("Wave", script::text("You wave.")))
            .expect("run");
        assert!(engine
            .take_action(ACTION_CHOOSE, &ActionParams::new())
            .is_err());
        assert!(engine
            .take_action(ACTION_CHOOSE, &choose_params(5))
            .is_err());
        engine
            .take_action(ACTION_CHOOSE, &choose_params(0))
            .expect("choose");
        assert_eq!(engine.scene().content.len(), 1);
    }

    #[test]
    fn plain_option_body_keeps_queued_pages_reachable() {
        let mut engine = engine();
        engine
            .run(&script::scenes(vec![
                vec![
                    script::text("pick"),
                    script::option("Wave", script::text("You wave.")),
                ],
                vec![script::text("later")],
            ]))
            .expect("run");
        // The page brought its own option, so no Continue yet.
        assert_eq!(engine.scene().options.len(), 1);
        assert_eq!(engine.scene().options[0].label, "Wave");

        // A body that is plain text neither advances nor branches; the
        // queued page must still be reachable afterwards.
        engine
            .take_action(ACTION_CHOOSE, &choose_params(0))
            .expect("choose");
        assert!(engine.scene().has_pending_pages());
        assert_eq!(engine.scene().options.len(), 1);
        assert_eq!(engine.scene().options[0].label, "Continue");

        engine
            .take_action(ACTION_ADVANCE, &ActionParams::new())
            .expect("advance");
        assert_eq!(engine.scene().content.len(), 1);
        assert!(!engine.scene().has_pending_pages());
        assert!(engine.scene().options.is_empty());
    }

    #[test]
    fn buying_moves_currency_and_stock() {
        let mut engine = engine();
        engine
            .run(&script::seq(vec![
                script::add_item("money", 5),
                script::open_shop("emma", vec![("soda", 3)]),
            ]))
            .expect("run");

        let mut params = ActionParams::new();
        params.insert("item".into(), Value::from("soda"));
        engine.take_action(ACTION_BUY, &params).expect("buy");
        assert_eq!(engine.inventory().get(&ItemId::new("soda")), Some(&1));
        assert_eq!(engine.inventory().get(&ItemId::new("money")), Some(&2));
        // Shop stays open for a second purchase; funds run out this time.
        engine.take_action(ACTION_BUY, &params).expect("buy");
        assert_eq!(engine.inventory().get(&ItemId::new("soda")), Some(&1));
        assert_eq!(engine.inventory().get(&ItemId::new("money")), Some(&2));
    }
}
