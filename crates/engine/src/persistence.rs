//! Whole-state persistence
//!
//! One JSON document holds the entire mutable world, continuation stack
//! included. Registries are code and are rebuilt at startup; the save
//! only carries data, so definitions can evolve between sessions as long
//! as the ids content refers to stay registered.

use std::fs;
use std::path::Path;

use suncrest_domain::{DomainError, WorldState};
use tracing::info;

pub fn save(world: &WorldState) -> Result<String, DomainError> {
    serde_json::to_string_pretty(world).map_err(|e| DomainError::persistence(e.to_string()))
}

pub fn load(data: &str) -> Result<WorldState, DomainError> {
    serde_json::from_str(data).map_err(|e| DomainError::persistence(e.to_string()))
}

pub fn save_to_file(world: &WorldState, path: &Path) -> Result<(), DomainError> {
    let data = save(world)?;
    fs::write(path, data).map_err(|e| DomainError::persistence(e.to_string()))?;
    info!(path = %path.display(), "world saved");
    Ok(())
}

pub fn load_from_file(path: &Path) -> Result<WorldState, DomainError> {
    let data = fs::read_to_string(path).map_err(|e| DomainError::persistence(e.to_string()))?;
    let world = load(&data)?;
    info!(path = %path.display(), "world loaded");
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use suncrest_domain::{script, Card, CardId, CardKind, NpcId, SceneOption, WorldTime};

    fn populated_world() -> WorldState {
        let mut world = WorldState::new(WorldTime::from_seconds(1_704_067_200), "home");
        world.player.stats.insert("Fitness".into(), 12);
        world.player.timers.insert("smoked".into(), 1_704_000_000);
        world
            .player
            .cards
            .push(Card::new(CardId::new("q_intro"), CardKind::Quest).with_field("step", 2_i64));
        world.npc_mut(&NpcId::new("emma")).known = true;
        world.scene.paragraph("Page one.");
        world.scene.stack.push_back(vec![script::text("two")]);
        world.scene.stack.push_back(vec![script::text("three")]);
        world.scene.add_option(SceneOption::new(
            "Continue",
            suncrest_domain::Instruction::new("advanceScene"),
        ));
        world
    }

    #[test]
    fn round_trip_preserves_the_continuation_stack_in_order() {
        let world = populated_world();
        let data = save(&world).expect("save");
        let back = load(&data).expect("load");
        assert_eq!(back, world);
        let ops: Vec<_> = back
            .scene
            .stack
            .iter()
            .flat_map(|page| page.iter().map(|i| i.op.clone()))
            .collect();
        assert_eq!(ops, vec!["text", "text"]);
    }

    #[test]
    fn zero_and_default_values_are_omitted_on_save() {
        let world = WorldState::new(WorldTime::from_seconds(0), "home");
        let data = save(&world).expect("save");
        assert!(!data.contains("npcs"));
        assert!(!data.contains("scene"));
        assert!(!data.contains("reputations"));
        let back = load(&data).expect("load");
        assert_eq!(back.player.reputation("police"), 0);
    }

    #[test]
    fn garbage_input_is_a_persistence_error() {
        assert!(matches!(
            load("not json"),
            Err(DomainError::Persistence(_))
        ));
    }
}
