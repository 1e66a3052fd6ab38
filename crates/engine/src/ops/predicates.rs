//! Predicate ops: world queries evaluated to script truthiness
//!
//! Predicates never mutate. Asking about an NPC that was never
//! instantiated is an ordinary false/zero, not an error; referencing an
//! unregistered name is.

use suncrest_domain::{CardId, DomainError, Instruction, ItemId, LocationId, NpcId, Value, MINUTE};

use crate::interpreter::ExecCtx;

pub(super) fn op_has_item(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let item = ItemId::new(instr.text_arg(0)?);
    ctx.registry.item_def(&item)?;
    let needed = instr.opt_int_arg(1)?.unwrap_or(1);
    Ok(Value::Bool(ctx.world.player.item_count(&item) >= needed))
}

pub(super) fn op_stat_at_least(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let stat = instr.text_arg(0)?;
    ctx.registry.stat_def(stat)?;
    let threshold = instr.int_arg(1)?;
    Ok(Value::Bool(ctx.world.player.stat(stat) >= threshold))
}

/// Numeric form: reads as 0 for an NPC never met.
pub(super) fn op_npc_stat(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    let stat = instr.text_arg(1)?;
    let value = ctx.world.npc(&npc).map_or(0, |n| n.stat(stat));
    Ok(Value::Int(value))
}

pub(super) fn op_npc_stat_at_least(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    let stat = instr.text_arg(1)?;
    let threshold = instr.int_arg(2)?;
    let value = ctx.world.npc(&npc).map_or(0, |n| n.stat(stat));
    Ok(Value::Bool(value >= threshold))
}

pub(super) fn op_npc_present(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    let here = ctx
        .world
        .npc(&npc)
        .is_some_and(|n| n.location.as_ref() == Some(&ctx.world.location));
    Ok(Value::Bool(here))
}

pub(super) fn op_knows_npc(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    Ok(Value::Bool(ctx.world.npc(&npc).is_some_and(|n| n.known)))
}

pub(super) fn op_at_location(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let location = LocationId::new(instr.text_arg(0)?);
    ctx.registry.location_def(&location)?;
    Ok(Value::Bool(ctx.world.location == location))
}

/// True once at least the given minutes have passed since the named
/// timer was stamped. A timer never set reads false.
pub(super) fn op_timer_elapsed(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let name = instr.text_arg(0)?;
    let minutes = instr.int_arg(1)?;
    let elapsed = ctx
        .world
        .player
        .timer(name)
        .is_some_and(|set| ctx.world.time.seconds() - set >= minutes * MINUTE);
    Ok(Value::Bool(elapsed))
}

pub(super) fn op_has_card(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let id = CardId::new(instr.text_arg(0)?);
    ctx.registry.card_def(&id)?;
    Ok(Value::Bool(ctx.world.player.has_card(&id)))
}

/// True while the current hour is inside [start, end); the range may
/// wrap past midnight, same as schedule entries.
pub(super) fn op_time_between(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let start = instr.int_arg(0)?;
    let end = instr.int_arg(1)?;
    if !(0..=23).contains(&start) || !(0..=23).contains(&end) {
        return Err(DomainError::bad_arg(&instr.op, 0, "hour 0-23"));
    }
    let hour = i64::from(ctx.world.time.hour());
    let inside = if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    };
    Ok(Value::Bool(inside))
}
