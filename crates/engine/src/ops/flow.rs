//! Control-flow ops: sequencing, conditionals, random choice, skill
//! checks, and looping menus.

use suncrest_domain::{DomainError, Instruction, SceneOption, Value};
use tracing::debug;

use super::instrs_at;
use crate::interpreter::{eval_truthy, exec, ExecCtx};

pub(super) fn op_seq(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    for child in instrs_at(instr, 0)? {
        exec(ctx, child)?;
    }
    Ok(Value::Null)
}

pub(super) fn op_when(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let pred = instr.instr_arg(0)?;
    if eval_truthy(ctx, pred)? {
        for child in instrs_at(instr, 1)? {
            exec(ctx, child)?;
        }
    }
    Ok(Value::Null)
}

pub(super) fn op_unless(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let pred = instr.instr_arg(0)?;
    if !eval_truthy(ctx, pred)? {
        for child in instrs_at(instr, 1)? {
            exec(ctx, child)?;
        }
    }
    Ok(Value::Null)
}

/// `(condition, branch)` pairs in order; first truthy condition wins and
/// later conditions are never evaluated. A trailing lone list is the
/// default branch.
pub(super) fn op_cond(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let mut index = 0;
    while index < instr.args.len() {
        match &instr.args[index] {
            Value::Instr(pred) => {
                if index + 1 >= instr.args.len() {
                    return Err(DomainError::bad_arg(
                        &instr.op,
                        index + 1,
                        "branch list after condition",
                    ));
                }
                if eval_truthy(ctx, pred)? {
                    for child in instrs_at(instr, index + 1)? {
                        exec(ctx, child)?;
                    }
                    return Ok(Value::Null);
                }
                index += 2;
            }
            Value::List(_) if index == instr.args.len() - 1 => {
                // Default branch: no condition matched.
                for child in instrs_at(instr, index)? {
                    exec(ctx, child)?;
                }
                return Ok(Value::Null);
            }
            _ => {
                return Err(DomainError::bad_arg(
                    &instr.op,
                    index,
                    "condition instruction or default branch list",
                ));
            }
        }
    }
    Ok(Value::Null)
}

/// Uniform choice over the eligible pool. Entries are either bare
/// instructions, `{if, do}` gates (eligible while `if` is truthy), or
/// falsy placeholders, which are filtered out before the draw.
pub(super) fn op_random(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let entries = instr.list_arg(0)?.to_vec();
    let mut eligible: Vec<Instruction> = Vec::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        match entry {
            Value::Instr(body) => eligible.push((**body).clone()),
            Value::Map(map) => {
                let body = map
                    .get("do")
                    .and_then(Value::as_instr)
                    .ok_or_else(|| DomainError::bad_arg(&instr.op, position, "gated {if, do} entry"))?;
                let open = match map.get("if").and_then(Value::as_instr) {
                    Some(pred) => eval_truthy(ctx, pred)?,
                    None => true,
                };
                if open {
                    eligible.push(body.clone());
                }
            }
            falsy if !falsy.is_truthy() => {}
            _ => {
                return Err(DomainError::bad_arg(
                    &instr.op,
                    position,
                    "instruction or gated entry",
                ));
            }
        }
    }
    if eligible.is_empty() {
        return Ok(Value::Null);
    }
    let chosen = ctx.roller.pick(eligible.len());
    debug!(pool = eligible.len(), chosen, "random selection");
    exec(ctx, &eligible[chosen])
}

/// Skill check: success chance is `clamp(50 + stat - difficulty, 1, 99)`
/// on a d100. A roll of 100 always fails, whatever the stat - certainty
/// is never on the table.
///
/// Predicate form returns the boolean; with an `{onSuccess, onFailure}`
/// options map it executes the matching branch instead.
pub(super) fn op_skill_check(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let skill = instr.text_arg(0)?;
    ctx.registry.stat_def(skill)?;
    let difficulty = instr.int_arg(1)?;
    let stat = ctx.world.player.stat(skill);

    let threshold = (50 + stat - difficulty).clamp(1, 99);
    let roll = ctx.roller.d100();
    let success = roll < 100 && roll <= threshold;
    debug!(skill, difficulty, stat, threshold, roll, success, "skill check");

    let branch_key = if success { "onSuccess" } else { "onFailure" };
    if let Some(branch) = instr.options().and_then(|m| m.get(branch_key)) {
        let Value::List(children) = branch else {
            return Err(DomainError::bad_arg(&instr.op, 2, "list of instructions"));
        };
        for child in children {
            let child = child
                .as_instr()
                .ok_or_else(|| DomainError::bad_arg(&instr.op, 2, "list of instructions"))?;
            exec(ctx, &child.clone())?;
        }
    }
    Ok(Value::Bool(success))
}

/// Present condition-gated choices; non-exit choices re-present the menu
/// after their body runs, which re-evaluates every condition.
pub(super) fn op_menu(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let entries = instr.list_arg(0)?.to_vec();
    for (position, entry) in entries.iter().enumerate() {
        let Value::Map(map) = entry else {
            return Err(DomainError::bad_arg(&instr.op, position, "menu entry map"));
        };
        if let Some(pred) = map.get("if").and_then(Value::as_instr) {
            if !eval_truthy(ctx, &pred.clone())? {
                continue;
            }
        }
        let label = map
            .get("label")
            .and_then(Value::as_text)
            .ok_or_else(|| DomainError::bad_arg(&instr.op, position, "menu entry label"))?;
        let mut body: Vec<Instruction> = match map.get("do") {
            Some(Value::List(items)) => items
                .iter()
                .map(|item| {
                    item.as_instr()
                        .cloned()
                        .ok_or_else(|| DomainError::bad_arg(&instr.op, position, "menu entry body"))
                })
                .collect::<Result<_, _>>()?,
            _ => Vec::new(),
        };
        let exit = map.get("exit").is_some_and(Value::is_truthy);
        if !exit {
            // Loop: run the body, then show this menu again.
            body.push(instr.clone());
        }
        ctx.world
            .scene
            .add_option(SceneOption::new(label, suncrest_domain::script::seq(body)));
    }
    Ok(Value::Null)
}

pub(super) fn op_not(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let pred = instr.instr_arg(0)?.clone();
    Ok(Value::Bool(!eval_truthy(ctx, &pred)?))
}

pub(super) fn op_chance(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let percent = instr.int_arg(0)?;
    Ok(Value::Bool(ctx.roller.d100() <= percent))
}
