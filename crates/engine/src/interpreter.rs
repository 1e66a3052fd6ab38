//! Instruction interpreter
//!
//! `exec` evaluates one instruction and returns its value (predicates,
//! inline expressions); `exec_all` runs a list purely for its scene and
//! world side effects. Dispatch goes through the registry: an
//! unregistered name is a content bug and raises immediately.

use suncrest_domain::{DomainError, Instruction, Value, WorldState};

use crate::registry::Registry;
use crate::rng::Roller;

/// Everything a handler may touch: the world, the read-only registry,
/// and the injected randomness source. Exclusively single-writer - one
/// action executes to completion before another begins.
pub struct ExecCtx<'a> {
    pub world: &'a mut WorldState,
    pub registry: &'a Registry,
    pub roller: &'a mut dyn Roller,
}

impl<'a> ExecCtx<'a> {
    pub fn new(world: &'a mut WorldState, registry: &'a Registry, roller: &'a mut dyn Roller) -> Self {
        Self {
            world,
            registry,
            roller,
        }
    }
}

pub fn exec(ctx: &mut ExecCtx<'_>, instruction: &Instruction) -> Result<Value, DomainError> {
    let handler = ctx.registry.op(&instruction.op)?;
    handler(ctx, instruction)
}

pub fn exec_all(ctx: &mut ExecCtx<'_>, instructions: &[Instruction]) -> Result<(), DomainError> {
    for instruction in instructions {
        exec(ctx, instruction)?;
    }
    Ok(())
}

/// Evaluate a predicate instruction down to script truthiness.
pub fn eval_truthy(ctx: &mut ExecCtx<'_>, instruction: &Instruction) -> Result<bool, DomainError> {
    Ok(exec(ctx, instruction)?.is_truthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRoller;
    use suncrest_domain::{script, WorldTime};

    #[test]
    fn unregistered_instruction_raises_immediately() {
        let registry = Registry::new();
        let mut world = WorldState::new(WorldTime::from_seconds(0), "home");
        let mut roller = ScriptedRoller::default();
        let mut ctx = ExecCtx::new(&mut world, &registry, &mut roller);
        let err = exec(&mut ctx, &Instruction::new("summonDragon")).expect_err("unknown op");
        assert_eq!(err, DomainError::UnknownInstruction("summonDragon".into()));
    }

    #[test]
    fn exec_all_stops_at_the_first_authoring_error() {
        let registry = Registry::new();
        let mut world = WorldState::new(WorldTime::from_seconds(0), "home");
        let mut roller = ScriptedRoller::default();
        let mut ctx = ExecCtx::new(&mut world, &registry, &mut roller);
        let list = [script::text("fine"), Instruction::new("nope")];
        assert!(exec_all(&mut ctx, &list).is_err());
        // The first instruction ran before the error surfaced.
        assert_eq!(ctx.world.scene.content.len(), 1);
    }
}
