//! World-effect ops: inventory, stats, cards, timers, movement
//!
//! Numeric effects clamp to registered bounds and report the applied
//! delta to the scene. A delta clamped to zero is silent, and a `hidden`
//! flag in the trailing options map suppresses feedback outright.

use suncrest_domain::{
    Card, CardId, CardKind, DomainError, FieldValue, Instruction, ItemId, LocationId,
    LocationOverride, NpcId, Value, MINUTE,
};

use crate::cards;
use crate::clock;
use crate::interpreter::{exec, ExecCtx};
use crate::registry::StatDef;

fn feedback(ctx: &mut ExecCtx<'_>, hidden: bool, label: &str, applied: i64) {
    if !hidden && applied != 0 {
        ctx.world.scene.paragraph(format!("{} {:+}", label, applied));
    }
}

/// Apply `delta` to `current` within `def`'s bounds; returns the new
/// value and the change actually applied.
fn clamped(current: i64, delta: i64, def: StatDef) -> (i64, i64) {
    let next = (current + delta).clamp(def.min, def.max);
    (next, next - current)
}

pub(super) fn op_add_item(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let item = ItemId::new(instr.text_arg(0)?);
    let name = ctx.registry.item_def(&item)?.name.clone();
    let delta = instr.int_arg(1)?;
    let current = ctx.world.player.item_count(&item);
    let next = (current + delta).max(0);
    if next == 0 {
        ctx.world.player.inventory.remove(&item);
    } else {
        ctx.world.player.inventory.insert(item, next);
    }
    feedback(ctx, instr.flag("hidden"), &name, next - current);
    Ok(Value::Null)
}

pub(super) fn op_add_stat(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let stat = instr.text_arg(0)?.to_string();
    let def = ctx.registry.stat_def(&stat)?;
    let delta = instr.int_arg(1)?;
    let (next, applied) = clamped(ctx.world.player.stat(&stat), delta, def);
    if next == 0 {
        ctx.world.player.stats.remove(&stat);
    } else {
        ctx.world.player.stats.insert(stat.clone(), next);
    }
    feedback(ctx, instr.flag("hidden"), &stat, applied);
    Ok(Value::Null)
}

/// NPC stats (affection, suspicion) are free-form names clamped to the
/// default 0..100 track.
pub(super) fn op_add_npc_stat(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    let name = ctx.registry.npc_template(&npc)?.name.clone();
    let stat = instr.text_arg(1)?.to_string();
    let delta = instr.int_arg(2)?;
    let state = ctx.world.npc_mut(&npc);
    let (next, applied) = clamped(state.stat(&stat), delta, StatDef::default());
    if next == 0 {
        state.stats.remove(&stat);
    } else {
        state.stats.insert(stat.clone(), next);
    }
    let label = format!("{}: {}", name, stat);
    feedback(ctx, instr.flag("hidden"), &label, applied);
    Ok(Value::Null)
}

pub(super) fn op_add_reputation(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let track = instr.text_arg(0)?.to_string();
    let def = ctx.registry.reputation_def(&track)?;
    let delta = instr.int_arg(1)?;
    let (next, applied) = clamped(ctx.world.player.reputation(&track), delta, def);
    if next == 0 {
        ctx.world.player.reputations.remove(&track);
    } else {
        ctx.world.player.reputations.insert(track.clone(), next);
    }
    let label = format!("{} reputation", track);
    feedback(ctx, instr.flag("hidden"), &label, applied);
    Ok(Value::Null)
}

/// Stamp the named timer with the current time. Overwrites freely.
pub(super) fn op_set_timer(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let name = instr.text_arg(0)?.to_string();
    let now = ctx.world.time.seconds();
    ctx.world.player.timers.insert(name, now);
    Ok(Value::Null)
}

pub(super) fn op_time_lapse(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let minutes = instr.int_arg(0)?;
    clock::advance_minutes(ctx, minutes)?;
    Ok(Value::Null)
}

/// Relocate the player. NPC placements re-resolve at the new position
/// and the destination's arrival script (if any) runs in place.
pub(super) fn op_move(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let location = LocationId::new(instr.text_arg(0)?);
    let on_arrive = ctx.registry.location_def(&location)?.on_arrive.clone();
    ctx.world.location = location;
    clock::refresh_npcs(ctx.world, ctx.registry)?;
    if let Some(script) = on_arrive {
        exec(ctx, &script)?;
    }
    Ok(Value::Null)
}

// -----------------------------------------------------------------------------
// Cards
// -----------------------------------------------------------------------------

fn parse_kind(op: &str, raw: &str) -> Result<CardKind, DomainError> {
    match raw {
        "quest" => Ok(CardKind::Quest),
        "effect" => Ok(CardKind::Effect),
        "trait" => Ok(CardKind::Trait),
        "date" => Ok(CardKind::Date),
        _ => Err(DomainError::bad_arg(op, 1, "card kind")),
    }
}

fn parse_fields(
    op: &str,
    index: usize,
    instr: &Instruction,
) -> Result<Vec<(String, FieldValue)>, DomainError> {
    let Some(value) = instr.args.get(index) else {
        return Ok(Vec::new());
    };
    let Value::Map(map) = value else {
        return Err(DomainError::bad_arg(op, index, "field map"));
    };
    map.iter()
        .map(|(key, value)| {
            let field = match value {
                Value::Bool(b) => FieldValue::Bool(*b),
                Value::Int(n) => FieldValue::Number(*n),
                Value::Text(s) => FieldValue::Text(s.clone()),
                _ => return Err(DomainError::bad_arg(op, index, "field map")),
            };
            Ok((key.clone(), field))
        })
        .collect()
}

fn add_card_of_kind(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
    kind: CardKind,
    fields_index: usize,
) -> Result<Value, DomainError> {
    let id = CardId::new(instr.text_arg(0)?);
    let mut card = Card::new(id, kind);
    for (key, value) in parse_fields(&instr.op, fields_index, instr)? {
        card.set_field(key, value);
    }
    let added = cards::add_card(ctx, card)?;
    Ok(Value::Bool(added))
}

pub(super) fn op_add_card(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let kind = parse_kind(&instr.op, instr.text_arg(1)?)?;
    add_card_of_kind(ctx, instr, kind, 2)
}

pub(super) fn op_add_quest(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    add_card_of_kind(ctx, instr, CardKind::Quest, 1)
}

pub(super) fn op_add_effect(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    add_card_of_kind(ctx, instr, CardKind::Effect, 1)
}

pub(super) fn op_remove_card(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let id = CardId::new(instr.text_arg(0)?);
    let removed = ctx.world.player.remove_card(&id).is_some();
    Ok(Value::Bool(removed))
}

pub(super) fn op_complete_card(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let id = CardId::new(instr.text_arg(0)?);
    if let Some(card) = ctx.world.player.card_mut(&id) {
        card.completed = true;
    }
    Ok(Value::Null)
}

pub(super) fn op_fail_card(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let id = CardId::new(instr.text_arg(0)?);
    if let Some(card) = ctx.world.player.card_mut(&id) {
        card.failed = true;
    }
    Ok(Value::Null)
}

/// Set one field on a held card. Setting a field on a card no longer
/// held is a quiet no-op: scripts race card removal legitimately.
pub(super) fn op_set_card_field(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let id = CardId::new(instr.text_arg(0)?);
    let key = instr.text_arg(1)?.to_string();
    let field = match instr.require_arg(2, "field value")? {
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Int(n) => FieldValue::Number(*n),
        Value::Text(s) => FieldValue::Text(s.clone()),
        _ => return Err(DomainError::bad_arg(&instr.op, 2, "field value")),
    };
    match ctx.world.player.card_mut(&id) {
        Some(card) => {
            card.set_field(key, field);
            Ok(Value::Bool(true))
        }
        None => Ok(Value::Bool(false)),
    }
}

// -----------------------------------------------------------------------------
// NPCs
// -----------------------------------------------------------------------------

pub(super) fn op_learn_name(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    ctx.world.npc_mut(&npc).known = true;
    Ok(Value::Null)
}

pub(super) fn op_set_relationship(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    let status = instr.text_arg(1)?.to_string();
    ctx.world.npc_mut(&npc);
    ctx.world.player.relationships.insert(npc, status);
    Ok(Value::Null)
}

/// Place an NPC at a location for a bounded stretch, overriding their
/// schedule until the override expires.
pub(super) fn op_npc_to_location(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    let location = LocationId::new(instr.text_arg(1)?);
    ctx.registry.location_def(&location)?;
    let minutes = instr.int_arg(2)?;
    let until = ctx.world.time.seconds() + minutes * MINUTE;
    let state = ctx.world.npc_mut(&npc);
    state.location = Some(location.clone());
    state.location_override = Some(LocationOverride { location, until });
    Ok(Value::Null)
}
