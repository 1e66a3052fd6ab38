//! Card lifecycle: acquisition, per-tick updates, reminder collection
//!
//! Card instances are plain data on the player; the matching [`CardDef`]
//! in the registry supplies behavior. Every player action is followed by
//! one tick over all held cards.

use suncrest_domain::{
    Card, CardId, DomainError, Instruction, LocationId, NpcId, Reminder, Urgency, WorldState,
    MINUTE,
};
use tracing::debug;

use crate::interpreter::{exec, ExecCtx};
use crate::registry::{CardDef, CardTick, Registry};

/// Add a card to the player's hand. A second copy of a held id is an
/// idempotent reject: no mutation, returns false. The card's behavior
/// must be registered; an unregistered id is a content bug.
pub fn add_card(ctx: &mut ExecCtx<'_>, card: Card) -> Result<bool, DomainError> {
    ctx.registry.card_def(&card.id)?;
    if ctx.world.player.has_card(&card.id) {
        debug!(card = %card.id, "duplicate card rejected");
        return Ok(false);
    }
    debug!(card = %card.id, kind = ?card.kind, "card added");
    ctx.world.player.cards.push(card);
    Ok(true)
}

/// Run every held card's update hook once. Hooks may mutate their card,
/// apply world effects, and ask for removal. The card under update is
/// taken out of the hand for the duration of its hook, so hooks can run
/// scripts that themselves touch other cards.
pub fn tick(ctx: &mut ExecCtx<'_>) -> Result<(), DomainError> {
    let held: Vec<CardId> = ctx.world.player.cards.iter().map(|c| c.id.clone()).collect();
    for id in held {
        // An earlier hook this tick may have removed it already.
        let Some(index) = ctx.world.player.cards.iter().position(|c| c.id == id) else {
            continue;
        };
        let mut card = ctx.world.player.cards.remove(index);
        let registry = ctx.registry;
        let def = registry.card_def(&id)?;
        match (def.after_update)(ctx, &mut card)? {
            CardTick::Keep => {
                let at = index.min(ctx.world.player.cards.len());
                ctx.world.player.cards.insert(at, card);
            }
            CardTick::Remove => {
                debug!(card = %id, "card removed by update hook");
            }
        }
    }
    Ok(())
}

/// Collect reminders from all unsettled cards, most urgent first.
/// Recomputed from scratch on every call; nothing is cached.
pub fn reminders(world: &WorldState, registry: &Registry) -> Result<Vec<Reminder>, DomainError> {
    let mut out = Vec::new();
    for card in &world.player.cards {
        if card.is_settled() {
            continue;
        }
        let def = registry.card_def(&card.id)?;
        out.extend((def.reminders)(world, card));
    }
    out.sort_by(|a, b| b.urgency.cmp(&a.urgency));
    Ok(out)
}

// =============================================================================
// Stock definitions
// =============================================================================

/// A card that removes itself once the world clock passes its `until`
/// field (epoch seconds). Timed buffs and hangovers.
pub fn expiring() -> CardDef {
    CardDef {
        after_update: Box::new(|ctx: &mut ExecCtx<'_>, card: &mut Card| {
            let done = card
                .number("until")
                .is_some_and(|until| ctx.world.time.seconds() >= until);
            Ok(if done { CardTick::Remove } else { CardTick::Keep })
        }),
        reminders: Box::new(|_, _| Vec::new()),
    }
}

/// The canonical time-windowed encounter: meet `npc` at `location` within
/// `window_minutes` of the instance's `start` field (epoch seconds).
///
/// Reminders escalate as the date approaches; during the window the NPC
/// is held at the venue. If the window elapses and the instance's
/// `started` flag was never set, `missed` runs exactly once and the card
/// removes itself.
pub fn appointment(
    npc: NpcId,
    location: LocationId,
    window_minutes: i64,
    missed: Instruction,
) -> CardDef {
    let window = window_minutes * MINUTE;
    let reminder_npc = npc.clone();
    let reminder_location = location.clone();
    CardDef {
        after_update: Box::new(move |ctx: &mut ExecCtx<'_>, card: &mut Card| {
            if card.is_settled() {
                return Ok(CardTick::Remove);
            }
            let Some(start) = card.number("start") else {
                return Ok(CardTick::Keep);
            };
            let now = ctx.world.time.seconds();
            if now < start {
                return Ok(CardTick::Keep);
            }
            if now < start + window {
                // Window open: hold the NPC at the venue until it closes.
                let state = ctx.world.npc_mut(&npc);
                state.location_override = Some(suncrest_domain::LocationOverride {
                    location: location.clone(),
                    until: start + window,
                });
                state.location = Some(location.clone());
                return Ok(CardTick::Keep);
            }
            if card.flag("started") {
                return Ok(CardTick::Remove);
            }
            debug!(card = %card.id, "appointment window elapsed, applying penalty");
            exec(ctx, &missed)?;
            Ok(CardTick::Remove)
        }),
        reminders: Box::new(move |world: &WorldState, card: &Card| {
            if card.flag("started") {
                return Vec::new();
            }
            let Some(start) = card.number("start") else {
                return Vec::new();
            };
            let now = world.time.seconds();
            if now >= start + window {
                return Vec::new();
            }
            let when = suncrest_domain::WorldTime::from_seconds(start);
            let (text, urgency) = if now >= start {
                (
                    format!("{} is waiting at {}", reminder_npc, reminder_location),
                    Urgency::Urgent,
                )
            } else if world.time.day_number() == when.day_number() {
                (
                    format!(
                        "Meet {} at {} today, {}",
                        reminder_npc,
                        reminder_location,
                        when.display_time()
                    ),
                    Urgency::Warning,
                )
            } else {
                (
                    format!("Meet {} at {} on {}", reminder_npc, reminder_location, when.display_date()),
                    Urgency::Info,
                )
            };
            vec![Reminder::new(card.id.clone(), text, urgency)]
        }),
    }
}
