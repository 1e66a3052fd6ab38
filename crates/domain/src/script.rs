//! Script builders - pure-data constructors for instruction trees
//!
//! Content modules compose these at registration time. Every call builds a
//! fresh tree; nothing here holds or mutates shared state, so the same
//! registered script can run any number of times without cross-run
//! leakage (the engine additionally clones pages at push time).

use std::collections::BTreeMap;

use crate::instruction::{Instruction, Value};
use crate::scene::Page;

// =============================================================================
// Control flow
// =============================================================================

pub fn seq(children: Vec<Instruction>) -> Instruction {
    Instruction::new("seq").arg(children)
}

pub fn when(pred: Instruction, then: Vec<Instruction>) -> Instruction {
    Instruction::new("when").arg(pred).arg(then)
}

pub fn unless(pred: Instruction, then: Vec<Instruction>) -> Instruction {
    Instruction::new("unless").arg(pred).arg(then)
}

/// `(condition, branch)` pairs evaluated in order; the first truthy
/// condition wins. An optional trailing default runs when none match.
pub fn cond(pairs: Vec<(Instruction, Vec<Instruction>)>, default: Option<Vec<Instruction>>) -> Instruction {
    let mut instr = Instruction::new("cond");
    for (pred, branch) in pairs {
        instr = instr.arg(pred).arg(branch);
    }
    if let Some(branch) = default {
        instr = instr.arg(branch);
    }
    instr
}

pub fn random(children: Vec<Instruction>) -> Instruction {
    Instruction::new("random").arg(children.into_iter().map(Value::from).collect::<Vec<_>>())
}

/// A gated entry for [`random`]: eligible only while `pred` is truthy.
pub fn random_if(pred: Instruction, body: Instruction) -> Value {
    let mut map = BTreeMap::new();
    map.insert("if".to_string(), Value::from(pred));
    map.insert("do".to_string(), Value::from(body));
    Value::Map(map)
}

pub fn random_entries(entries: Vec<Value>) -> Instruction {
    Instruction::new("random").arg(entries)
}

/// Predicate form: returns a boolean when executed.
pub fn skill_check(skill: &str, difficulty: i64) -> Instruction {
    Instruction::new("skillCheck").arg(skill).arg(difficulty)
}

/// Branching form: runs `on_success` or `on_failure` instead of returning.
pub fn skill_check_branch(
    skill: &str,
    difficulty: i64,
    on_success: Vec<Instruction>,
    on_failure: Vec<Instruction>,
) -> Instruction {
    let mut map = BTreeMap::new();
    map.insert("onSuccess".to_string(), Value::from(on_success));
    map.insert("onFailure".to_string(), Value::from(on_failure));
    Instruction::new("skillCheck")
        .arg(skill)
        .arg(difficulty)
        .arg(Value::Map(map))
}

/// One entry of a [`menu`]. Non-exit entries re-present the menu after
/// their body runs; exit entries terminate the loop.
#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub label: String,
    pub condition: Option<Instruction>,
    pub body: Vec<Instruction>,
    pub exit: bool,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>, body: Vec<Instruction>) -> Self {
        Self {
            label: label.into(),
            condition: None,
            body,
            exit: false,
        }
    }

    pub fn exit(label: impl Into<String>, body: Vec<Instruction>) -> Self {
        Self {
            label: label.into(),
            condition: None,
            body,
            exit: true,
        }
    }

    pub fn when(mut self, condition: Instruction) -> Self {
        self.condition = Some(condition);
        self
    }

    fn into_value(self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("label".to_string(), Value::from(self.label));
        if let Some(pred) = self.condition {
            map.insert("if".to_string(), Value::from(pred));
        }
        map.insert("do".to_string(), Value::from(self.body));
        if self.exit {
            map.insert("exit".to_string(), Value::Bool(true));
        }
        Value::Map(map)
    }
}

pub fn menu(entries: Vec<MenuEntry>) -> Instruction {
    Instruction::new("menu").arg(
        entries
            .into_iter()
            .map(MenuEntry::into_value)
            .collect::<Vec<_>>(),
    )
}

// =============================================================================
// Scene content
// =============================================================================

pub fn text(content: &str) -> Instruction {
    Instruction::new("text").arg(content)
}

pub fn speech(npc: &str, content: &str) -> Instruction {
    Instruction::new("speech").arg(npc).arg(content)
}

pub fn option(label: &str, run: Instruction) -> Instruction {
    Instruction::new("option").arg(label).arg(run)
}

pub fn clear_scene() -> Instruction {
    Instruction::new("clearScene")
}

pub fn advance_scene() -> Instruction {
    Instruction::new("advanceScene")
}

fn pages_value(pages: Vec<Page>) -> Value {
    Value::List(pages.into_iter().map(Value::from).collect())
}

/// Queue `pages` behind the current display without advancing.
pub fn push_scene_pages(pages: Vec<Page>) -> Instruction {
    Instruction::new("pushScenePages").arg(pages_value(pages))
}

/// A multi-page sequence: page one plays immediately, the rest wait on
/// the continuation stack behind "Continue".
pub fn scenes(pages: Vec<Page>) -> Instruction {
    Instruction::new("scenes").arg(pages_value(pages))
}

/// One branch of a [`choice`].
#[derive(Debug, Clone)]
pub struct Branch {
    pub label: String,
    pub condition: Option<Instruction>,
    pub pages: Vec<Page>,
}

impl Branch {
    pub fn new(label: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            label: label.into(),
            condition: None,
            pages,
        }
    }

    pub fn when(mut self, condition: Instruction) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// A player branch point inside a multi-page sequence. Each branch plays
/// its own pages, then resumes whatever the enclosing sequence still has
/// queued. The shared `epilogue` is spliced onto the LAST page of each
/// branch here at build time - an extra stack frame would cost the player
/// a redundant Continue click.
pub fn choice(branches: Vec<Branch>, epilogue: Page) -> Instruction {
    let mut entries = Vec::with_capacity(branches.len());
    for branch in branches {
        let mut pages = branch.pages;
        if pages.is_empty() {
            pages.push(Page::new());
        }
        if let Some(last) = pages.last_mut() {
            last.extend(epilogue.iter().cloned());
        }
        let mut map = BTreeMap::new();
        map.insert("label".to_string(), Value::from(branch.label));
        if let Some(pred) = branch.condition {
            map.insert("if".to_string(), Value::from(pred));
        }
        map.insert("pages".to_string(), pages_value(pages));
        entries.push(Value::Map(map));
    }
    Instruction::new("choice").arg(entries)
}

pub fn open_shop(npc: &str, stock: Vec<(&str, i64)>) -> Instruction {
    let entries = stock
        .into_iter()
        .map(|(item, price)| {
            let mut map = BTreeMap::new();
            map.insert("item".to_string(), Value::from(item));
            map.insert("price".to_string(), Value::from(price));
            Value::Map(map)
        })
        .collect::<Vec<_>>();
    Instruction::new("openShop").arg(npc).arg(entries)
}

// =============================================================================
// World effects
// =============================================================================

pub fn add_item(item: &str, delta: i64) -> Instruction {
    Instruction::new("addItem").arg(item).arg(delta)
}

pub fn add_stat(stat: &str, delta: i64) -> Instruction {
    Instruction::new("addStat").arg(stat).arg(delta)
}

/// Hidden variant: applies the delta without scene feedback.
pub fn add_stat_hidden(stat: &str, delta: i64) -> Instruction {
    let mut map = BTreeMap::new();
    map.insert("hidden".to_string(), Value::Bool(true));
    Instruction::new("addStat")
        .arg(stat)
        .arg(delta)
        .arg(Value::Map(map))
}

pub fn add_npc_stat(npc: &str, stat: &str, delta: i64) -> Instruction {
    Instruction::new("addNpcStat").arg(npc).arg(stat).arg(delta)
}

pub fn add_reputation(track: &str, delta: i64) -> Instruction {
    Instruction::new("addReputation").arg(track).arg(delta)
}

pub fn set_timer(name: &str) -> Instruction {
    Instruction::new("setTimer").arg(name)
}

pub fn time_lapse(minutes: i64) -> Instruction {
    Instruction::new("timeLapse").arg(minutes)
}

pub fn move_to(location: &str) -> Instruction {
    Instruction::new("move").arg(location)
}

pub fn add_quest(id: &str, fields: Vec<(&str, Value)>) -> Instruction {
    Instruction::new("addQuest").arg(id).arg(fields_map(fields))
}

pub fn add_effect(id: &str, fields: Vec<(&str, Value)>) -> Instruction {
    Instruction::new("addEffect").arg(id).arg(fields_map(fields))
}

pub fn add_card(id: &str, kind: &str, fields: Vec<(&str, Value)>) -> Instruction {
    Instruction::new("addCard")
        .arg(id)
        .arg(kind)
        .arg(fields_map(fields))
}

fn fields_map(fields: Vec<(&str, Value)>) -> Value {
    Value::Map(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

pub fn remove_card(id: &str) -> Instruction {
    Instruction::new("removeCard").arg(id)
}

pub fn complete_card(id: &str) -> Instruction {
    Instruction::new("completeCard").arg(id)
}

pub fn fail_card(id: &str) -> Instruction {
    Instruction::new("failCard").arg(id)
}

pub fn set_card_field(id: &str, key: &str, value: impl Into<Value>) -> Instruction {
    Instruction::new("setCardField").arg(id).arg(key).arg(value)
}

pub fn learn_name(npc: &str) -> Instruction {
    Instruction::new("learnName").arg(npc)
}

pub fn set_relationship(npc: &str, status: &str) -> Instruction {
    Instruction::new("setRelationship").arg(npc).arg(status)
}

/// Relocate an NPC for `minutes`, overriding their schedule.
pub fn npc_to_location(npc: &str, location: &str, minutes: i64) -> Instruction {
    Instruction::new("npcToLocation")
        .arg(npc)
        .arg(location)
        .arg(minutes)
}

// =============================================================================
// Predicates
// =============================================================================

pub fn has_item(item: &str) -> Instruction {
    Instruction::new("hasItem").arg(item)
}

pub fn has_items(item: &str, count: i64) -> Instruction {
    Instruction::new("hasItem").arg(item).arg(count)
}

pub fn stat_at_least(stat: &str, threshold: i64) -> Instruction {
    Instruction::new("statAtLeast").arg(stat).arg(threshold)
}

pub fn npc_stat(npc: &str, stat: &str) -> Instruction {
    Instruction::new("npcStat").arg(npc).arg(stat)
}

pub fn npc_stat_at_least(npc: &str, stat: &str, threshold: i64) -> Instruction {
    Instruction::new("npcStatAtLeast")
        .arg(npc)
        .arg(stat)
        .arg(threshold)
}

pub fn npc_present(npc: &str) -> Instruction {
    Instruction::new("npcPresent").arg(npc)
}

pub fn knows_npc(npc: &str) -> Instruction {
    Instruction::new("knowsNpc").arg(npc)
}

pub fn at_location(location: &str) -> Instruction {
    Instruction::new("atLocation").arg(location)
}

/// True once at least `minutes` have passed since the named timer was set.
pub fn timer_elapsed(name: &str, minutes: i64) -> Instruction {
    Instruction::new("timerElapsed").arg(name).arg(minutes)
}

pub fn has_card(id: &str) -> Instruction {
    Instruction::new("hasCard").arg(id)
}

pub fn time_between(start_hour: i64, end_hour: i64) -> Instruction {
    Instruction::new("timeBetween").arg(start_hour).arg(end_hour)
}

pub fn chance(percent: i64) -> Instruction {
    Instruction::new("chance").arg(percent)
}

pub fn not(pred: Instruction) -> Instruction {
    Instruction::new("not").arg(pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_produce_fresh_trees_per_call() {
        let a = scenes(vec![vec![text("one")], vec![text("two")]]);
        let b = scenes(vec![vec![text("one")], vec![text("two")]]);
        assert_eq!(a, b);
        // Mutating one tree must not reach the other.
        let mut c = a.clone();
        c.args.clear();
        assert_ne!(c, b);
        assert_eq!(a, b);
    }

    #[test]
    fn choice_splices_epilogue_onto_last_page_of_each_branch() {
        let built = choice(
            vec![
                Branch::new("Stay", vec![vec![text("you stay")]]),
                Branch::new(
                    "Go",
                    vec![vec![text("you pack")], vec![text("you leave")]],
                ),
            ],
            vec![text("Either way, night falls."), add_stat("Mood", 1)],
        );
        let entries = built.list_arg(0).expect("entries");
        let page_len = |entry: &Value, page: usize| -> usize {
            let Value::Map(map) = entry else { panic!("map") };
            let Some(Value::List(pages)) = map.get("pages") else {
                panic!("pages")
            };
            let Some(Value::List(instrs)) = pages.get(page) else {
                panic!("page")
            };
            instrs.len()
        };
        // One-page branch: 1 own instruction + 2 epilogue instructions.
        assert_eq!(page_len(&entries[0], 0), 3);
        // Two-page branch: epilogue lands on the LAST page only.
        assert_eq!(page_len(&entries[1], 0), 1);
        assert_eq!(page_len(&entries[1], 1), 3);
    }

    #[test]
    fn cond_interleaves_pairs_and_trailing_default() {
        let built = cond(
            vec![
                (has_item("coin"), vec![text("rich")]),
                (stat_at_least("Charm", 5), vec![text("charming")]),
            ],
            Some(vec![text("neither")]),
        );
        // Two pairs plus the default: five arguments.
        assert_eq!(built.args.len(), 5);
    }

    #[test]
    fn menu_entry_shapes_are_serializable() {
        let built = menu(vec![
            MenuEntry::new("Chat", vec![text("You chat.")]).when(npc_present("emma")),
            MenuEntry::exit("Leave", vec![text("You leave.")]),
        ]);
        let json = serde_json::to_string(&built).expect("serialize");
        let back: Instruction = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, built);
    }
}
