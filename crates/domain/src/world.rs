//! World state - the single mutable aggregate
//!
//! Owned exclusively by the engine; the presentation layer reads
//! snapshots and issues named actions. Everything here is plain
//! structured data (string/number/bool/array/object), which is the whole
//! persistence contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game_time::WorldTime;
use crate::ids::{LocationId, NpcId};
use crate::npc::Npc;
use crate::player::Player;
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub time: WorldTime,
    pub location: LocationId,
    #[serde(default)]
    pub player: Player,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub npcs: BTreeMap<NpcId, Npc>,
    #[serde(default, skip_serializing_if = "scene_is_empty")]
    pub scene: Scene,
}

fn scene_is_empty(scene: &Scene) -> bool {
    scene == &Scene::default()
}

impl WorldState {
    pub fn new(start: WorldTime, location: impl Into<LocationId>) -> Self {
        Self {
            time: start,
            location: location.into(),
            player: Player::default(),
            npcs: BTreeMap::new(),
            scene: Scene::default(),
        }
    }

    /// Fetch-or-create: NPCs come into being on first reference and are
    /// never destroyed afterwards.
    pub fn npc_mut(&mut self, id: &NpcId) -> &mut Npc {
        self.npcs
            .entry(id.clone())
            .or_insert_with(|| Npc::new(id.clone()))
    }

    pub fn npc(&self, id: &NpcId) -> Option<&Npc> {
        self.npcs.get(id)
    }

    /// NPCs currently co-located with the player.
    pub fn npcs_at_player_location(&self) -> Vec<&NpcId> {
        self.npcs
            .iter()
            .filter(|(_, npc)| npc.location.as_ref() == Some(&self.location))
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npc_mut_creates_lazily_once() {
        let mut world = WorldState::new(WorldTime::from_seconds(0), "home");
        assert!(world.npc(&NpcId::new("aunt")).is_none());
        world.npc_mut(&NpcId::new("aunt")).known = true;
        world.npc_mut(&NpcId::new("aunt")).stats.insert("affection".into(), 3);
        let aunt = world.npc(&NpcId::new("aunt")).expect("created");
        assert!(aunt.known);
        assert_eq!(aunt.stat("affection"), 3);
        assert_eq!(world.npcs.len(), 1);
    }

    #[test]
    fn co_located_npcs_query() {
        let mut world = WorldState::new(WorldTime::from_seconds(0), "gym");
        world.npc_mut(&NpcId::new("emma")).location = Some(LocationId::new("gym"));
        world.npc_mut(&NpcId::new("aunt")).location = Some(LocationId::new("home"));
        world.npc_mut(&NpcId::new("ghost"));
        let here = world.npcs_at_player_location();
        assert_eq!(here, vec![&NpcId::new("emma")]);
    }
}
