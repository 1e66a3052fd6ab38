//! World clock: time advancement, periodic effects, NPC placement
//!
//! Time only moves through `advance`; every advance applies periodic
//! effects per interval boundary crossed and then re-resolves where each
//! instantiated NPC stands at the new time.

use suncrest_domain::{DomainError, Instruction, WorldState, MINUTE};
use tracing::debug;

use crate::interpreter::{exec, ExecCtx};
use crate::registry::Registry;

pub fn advance_minutes(ctx: &mut ExecCtx<'_>, minutes: i64) -> Result<(), DomainError> {
    advance(ctx, minutes * MINUTE)
}

/// Advance the clock by `seconds`. Each registered periodic effect runs
/// once per interval boundary the jump crosses, so one large skip applies
/// the full cumulative effect.
pub fn advance(ctx: &mut ExecCtx<'_>, seconds: i64) -> Result<(), DomainError> {
    if seconds <= 0 {
        return Ok(());
    }
    let before = ctx.world.time;
    ctx.world.time = before.advanced_by(seconds);
    let now = ctx.world.time;
    debug!(seconds, at = %now.display_date(), "clock advanced");

    let effects: Vec<(i64, Instruction)> = ctx
        .registry
        .periodic_effects()
        .iter()
        .map(|e| (e.interval_seconds, e.script.clone()))
        .collect();
    for (interval, script) in effects {
        let crossings = before.boundaries_crossed(now, interval);
        if crossings > 0 {
            debug!(interval, crossings, "periodic effect");
        }
        for _ in 0..crossings {
            exec(ctx, &script)?;
        }
    }

    refresh_npcs(ctx.world, ctx.registry)
}

/// Re-resolve every instantiated NPC's location: an unexpired override
/// wins, an expired one is dropped, otherwise the template schedule
/// decides (no match means offscreen).
pub fn refresh_npcs(world: &mut WorldState, registry: &Registry) -> Result<(), DomainError> {
    let now = world.time;
    for (id, npc) in world.npcs.iter_mut() {
        if let Some(active) = &npc.location_override {
            if active.until > now.seconds() {
                npc.location = Some(active.location.clone());
                continue;
            }
            npc.location_override = None;
        }
        npc.location = registry.npc_template(id)?.schedule.resolve(now);
    }
    Ok(())
}
