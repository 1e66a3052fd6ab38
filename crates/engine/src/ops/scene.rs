//! Scene content and continuation-flow ops.

use suncrest_domain::{
    DomainError, Instruction, NpcId, SceneOption, Shop, ShopEntry, Value,
};

use super::{pages_at, pages_from_value};
use crate::interpreter::{eval_truthy, ExecCtx};
use crate::scene_flow;

pub(super) fn op_text(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let text = instr.text_arg(0)?.to_string();
    ctx.world.scene.paragraph(text);
    Ok(Value::Null)
}

/// Dialogue attributed to an NPC. Referencing an NPC instantiates it; the
/// known-name flag decides whether the presentation layer may show the
/// proper name.
pub(super) fn op_speech(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    let text = instr.text_arg(1)?.to_string();
    ctx.world.npc_mut(&npc);
    ctx.world.scene.speech(Some(npc), text);
    Ok(Value::Null)
}

pub(super) fn op_option(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let label = instr.text_arg(0)?.to_string();
    let run = instr.instr_arg(1)?.clone();
    ctx.world.scene.add_option(SceneOption::new(label, run));
    Ok(Value::Null)
}

pub(super) fn op_clear_scene(
    ctx: &mut ExecCtx<'_>,
    _instr: &Instruction,
) -> Result<Value, DomainError> {
    ctx.world.scene.clear();
    Ok(Value::Null)
}

pub(super) fn op_advance_scene(
    ctx: &mut ExecCtx<'_>,
    _instr: &Instruction,
) -> Result<Value, DomainError> {
    scene_flow::advance(ctx)?;
    Ok(Value::Null)
}

pub(super) fn op_push_scene_pages(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let pages = pages_at(instr, 0)?;
    scene_flow::push_pages_back(ctx, pages);
    Ok(Value::Null)
}

/// Multi-page sequence: queue all pages, then play the first immediately.
pub(super) fn op_scenes(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let pages = pages_at(instr, 0)?;
    scene_flow::push_pages_back(ctx, pages);
    scene_flow::advance(ctx)?;
    Ok(Value::Null)
}

/// A chosen branch: its pages play before the enclosing sequence resumes.
pub(super) fn op_branch(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let pages = pages_at(instr, 0)?;
    scene_flow::push_pages_front(ctx, pages);
    scene_flow::advance(ctx)?;
    Ok(Value::Null)
}

/// Present branch options. Each eligible branch becomes an option whose
/// action prepends that branch's pages (epilogue already spliced in by
/// the builder) and advances into them.
pub(super) fn op_choice(ctx: &mut ExecCtx<'_>, instr: &Instruction) -> Result<Value, DomainError> {
    let entries = instr.list_arg(0)?.to_vec();
    for (position, entry) in entries.iter().enumerate() {
        let Value::Map(map) = entry else {
            return Err(DomainError::bad_arg(&instr.op, position, "branch entry map"));
        };
        if let Some(pred) = map.get("if").and_then(Value::as_instr) {
            if !eval_truthy(ctx, pred)? {
                continue;
            }
        }
        let label = map
            .get("label")
            .and_then(Value::as_text)
            .ok_or_else(|| DomainError::bad_arg(&instr.op, position, "branch entry label"))?;
        let pages_value = map
            .get("pages")
            .ok_or_else(|| DomainError::bad_arg(&instr.op, position, "branch entry pages"))?;
        // Validate the page shape now, at authoring-visible time, even
        // though the option stores the raw value.
        pages_from_value(&instr.op, position, pages_value)?;
        let run = Instruction::with_args("branch", vec![pages_value.clone()]);
        ctx.world
            .scene
            .add_option(SceneOption::new(label, run));
    }
    Ok(Value::Null)
}

pub(super) fn op_open_shop(
    ctx: &mut ExecCtx<'_>,
    instr: &Instruction,
) -> Result<Value, DomainError> {
    let npc = NpcId::new(instr.text_arg(0)?);
    ctx.registry.npc_template(&npc)?;
    let mut stock = Vec::new();
    for (position, entry) in instr.list_arg(1)?.iter().enumerate() {
        let Value::Map(map) = entry else {
            return Err(DomainError::bad_arg(&instr.op, position, "shop entry map"));
        };
        let item = map
            .get("item")
            .and_then(Value::as_text)
            .ok_or_else(|| DomainError::bad_arg(&instr.op, position, "shop entry item"))?;
        let price = map
            .get("price")
            .and_then(Value::as_int)
            .ok_or_else(|| DomainError::bad_arg(&instr.op, position, "shop entry price"))?;
        let item = suncrest_domain::ItemId::new(item);
        ctx.registry.item_def(&item)?;
        stock.push(ShopEntry { item, price });
    }
    ctx.world.npc_mut(&npc);
    ctx.world.scene.shop = Some(Shop {
        npc: Some(npc),
        stock,
    });
    Ok(Value::Null)
}
