//! Player record - inventory, stats, cards, timers, relationships

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::ids::{CardId, ItemId, NpcId};

/// The player's mutable record. Every collection defaults empty and is
/// omitted from the serialized form when empty, so saves written before a
/// field existed still load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inventory: BTreeMap<ItemId, i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stats: BTreeMap<String, i64>,
    /// Standing with factions/groups; a track never touched is absent and
    /// reads as zero.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reputations: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<Card>,
    /// Named timestamps for "time elapsed since X" predicates.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub timers: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outfits: Vec<String>,
    /// Relationship status per NPC (e.g. "dating").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<NpcId, String>,
}

impl Player {
    pub fn item_count(&self, item: &ItemId) -> i64 {
        self.inventory.get(item).copied().unwrap_or(0)
    }

    pub fn stat(&self, name: &str) -> i64 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    pub fn reputation(&self, name: &str) -> i64 {
        self.reputations.get(name).copied().unwrap_or(0)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn card_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| &c.id == id)
    }

    pub fn has_card(&self, id: &CardId) -> bool {
        self.card(id).is_some()
    }

    pub fn remove_card(&mut self, id: &CardId) -> Option<Card> {
        let index = self.cards.iter().position(|c| &c.id == id)?;
        Some(self.cards.remove(index))
    }

    pub fn timer(&self, name: &str) -> Option<i64> {
        self.timers.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardKind;

    #[test]
    fn untouched_tracks_read_as_zero_and_serialize_away() {
        let player = Player::default();
        assert_eq!(player.reputation("police"), 0);
        assert_eq!(player.stat("Fitness"), 0);
        let json = serde_json::to_string(&player).expect("serialize");
        assert_eq!(json, "{}");
        let back: Player = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(back, player);
    }

    #[test]
    fn card_lookup_by_id() {
        let mut player = Player::default();
        player
            .cards
            .push(Card::new(CardId::new("q1"), CardKind::Quest));
        assert!(player.has_card(&CardId::new("q1")));
        assert!(player.remove_card(&CardId::new("q1")).is_some());
        assert!(!player.has_card(&CardId::new("q1")));
    }
}
