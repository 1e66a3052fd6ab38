//! The instruction library: control flow, scene content, world effects,
//! and predicates. Each op is a plain handler function registered by
//! name; `install` wires the full core set into a fresh registry.

mod effects;
mod flow;
mod predicates;
mod scene;

use suncrest_domain::{DomainError, Instruction, Page, Value};

use crate::registry::Registry;

pub(crate) fn install(registry: &mut Registry) {
    // Control flow
    registry.install_op("seq", flow::op_seq);
    registry.install_op("when", flow::op_when);
    registry.install_op("unless", flow::op_unless);
    registry.install_op("cond", flow::op_cond);
    registry.install_op("random", flow::op_random);
    registry.install_op("skillCheck", flow::op_skill_check);
    registry.install_op("menu", flow::op_menu);
    registry.install_op("not", flow::op_not);
    registry.install_op("chance", flow::op_chance);

    // Scene content and continuation flow
    registry.install_op("text", scene::op_text);
    registry.install_op("speech", scene::op_speech);
    registry.install_op("option", scene::op_option);
    registry.install_op("clearScene", scene::op_clear_scene);
    registry.install_op("advanceScene", scene::op_advance_scene);
    registry.install_op("pushScenePages", scene::op_push_scene_pages);
    registry.install_op("scenes", scene::op_scenes);
    registry.install_op("branch", scene::op_branch);
    registry.install_op("choice", scene::op_choice);
    registry.install_op("openShop", scene::op_open_shop);

    // World effects
    registry.install_op("addItem", effects::op_add_item);
    registry.install_op("addStat", effects::op_add_stat);
    registry.install_op("addNpcStat", effects::op_add_npc_stat);
    registry.install_op("addReputation", effects::op_add_reputation);
    registry.install_op("setTimer", effects::op_set_timer);
    registry.install_op("timeLapse", effects::op_time_lapse);
    registry.install_op("move", effects::op_move);
    registry.install_op("addCard", effects::op_add_card);
    registry.install_op("addQuest", effects::op_add_quest);
    registry.install_op("addEffect", effects::op_add_effect);
    registry.install_op("removeCard", effects::op_remove_card);
    registry.install_op("completeCard", effects::op_complete_card);
    registry.install_op("failCard", effects::op_fail_card);
    registry.install_op("setCardField", effects::op_set_card_field);
    registry.install_op("learnName", effects::op_learn_name);
    registry.install_op("setRelationship", effects::op_set_relationship);
    registry.install_op("npcToLocation", effects::op_npc_to_location);

    // Predicates
    registry.install_op("hasItem", predicates::op_has_item);
    registry.install_op("statAtLeast", predicates::op_stat_at_least);
    registry.install_op("npcStat", predicates::op_npc_stat);
    registry.install_op("npcStatAtLeast", predicates::op_npc_stat_at_least);
    registry.install_op("npcPresent", predicates::op_npc_present);
    registry.install_op("knowsNpc", predicates::op_knows_npc);
    registry.install_op("atLocation", predicates::op_at_location);
    registry.install_op("timerElapsed", predicates::op_timer_elapsed);
    registry.install_op("hasCard", predicates::op_has_card);
    registry.install_op("timeBetween", predicates::op_time_between);
}

/// Borrow the list-of-instructions argument at `index`.
pub(crate) fn instrs_at<'i>(
    instr: &'i Instruction,
    index: usize,
) -> Result<Vec<&'i Instruction>, DomainError> {
    instr
        .list_arg(index)?
        .iter()
        .map(|value| {
            value
                .as_instr()
                .ok_or_else(|| DomainError::bad_arg(&instr.op, index, "list of instructions"))
        })
        .collect()
}

/// Clone the list-of-pages argument (`[[instr, ...], ...]`) at `index`.
pub(crate) fn pages_at(instr: &Instruction, index: usize) -> Result<Vec<Page>, DomainError> {
    pages_from_value(&instr.op, index, instr.require_arg(index, "list of pages")?)
}

/// Clone a list-of-pages value, e.g. the `pages` entry of a choice branch.
pub(crate) fn pages_from_value(
    op: &str,
    index: usize,
    value: &Value,
) -> Result<Vec<Page>, DomainError> {
    let Value::List(pages) = value else {
        return Err(DomainError::bad_arg(op, index, "list of pages"));
    };
    pages
        .iter()
        .map(|page| {
            let Value::List(items) = page else {
                return Err(DomainError::bad_arg(op, index, "list of pages"));
            };
            items
                .iter()
                .map(|item| {
                    item.as_instr()
                        .cloned()
                        .ok_or_else(|| DomainError::bad_arg(op, index, "list of pages"))
                })
                .collect()
        })
        .collect()
}
