//! Scene - the player-facing content/options/continuation-stack bundle
//!
//! The continuation stack is the part that makes multi-page sequences
//! resumable: an ordered queue of not-yet-run instruction pages, drained
//! front-first by `advanceScene`. The whole scene, stack included, must
//! survive serialization with exact page order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, NpcId};
use crate::instruction::Instruction;

/// One queued unit of deferred work: an ordered list of instructions.
pub type Page = Vec<Instruction>;

/// A single displayed content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ContentItem {
    /// Narration
    Paragraph { text: String },
    /// A line of dialogue, optionally attributed to an NPC
    Speech {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        npc: Option<NpcId>,
        text: String,
    },
}

/// A player-facing choice. Choosing it runs `run` through the interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneOption {
    pub label: String,
    pub run: Instruction,
}

impl SceneOption {
    pub fn new(label: impl Into<String>, run: Instruction) -> Self {
        Self {
            label: label.into(),
            run,
        }
    }
}

/// Active shop payload: who is selling and what, at which price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub npc: Option<NpcId>,
    pub stock: Vec<ShopEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopEntry {
    pub item: ItemId,
    pub price: i64,
}

/// The unit of player-facing state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SceneOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc: Option<NpcId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<Shop>,
    /// Pages waiting to run once the current options are exhausted.
    #[serde(default, skip_serializing_if = "VecDeque::is_empty")]
    pub stack: VecDeque<Page>,
}

impl Scene {
    pub fn paragraph(&mut self, text: impl Into<String>) {
        self.content.push(ContentItem::Paragraph { text: text.into() });
    }

    pub fn speech(&mut self, npc: Option<NpcId>, text: impl Into<String>) {
        self.content.push(ContentItem::Speech {
            npc,
            text: text.into(),
        });
    }

    pub fn add_option(&mut self, option: SceneOption) {
        self.options.push(option);
    }

    /// Drop displayed content and options, keeping the stack. Used when a
    /// continuation page takes over the display.
    pub fn clear_display(&mut self) {
        self.content.clear();
        self.options.clear();
        self.npc = None;
        self.shop = None;
    }

    /// Full reset: display plus any pending continuations. Navigating away
    /// always discards pending pages.
    pub fn clear(&mut self) {
        self.clear_display();
        self.stack.clear();
    }

    pub fn has_pending_pages(&self) -> bool {
        !self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_with_stack_round_trips_in_order() {
        let mut scene = Scene::default();
        scene.paragraph("Page one.");
        scene.stack.push_back(vec![Instruction::new("text").arg("two")]);
        scene.stack.push_back(vec![Instruction::new("text").arg("three")]);
        scene.add_option(SceneOption::new("Continue", Instruction::new("advanceScene")));

        let json = serde_json::to_string(&scene).expect("serialize");
        let back: Scene = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, scene);
        let first = back.stack.front().and_then(|p| p.first());
        assert_eq!(first.map(|i| i.op.as_str()), Some("text"));
    }

    #[test]
    fn clear_discards_pending_pages_but_clear_display_keeps_them() {
        let mut scene = Scene::default();
        scene.paragraph("hello");
        scene.stack.push_back(vec![Instruction::new("text").arg("later")]);

        scene.clear_display();
        assert!(scene.content.is_empty());
        assert!(scene.has_pending_pages());

        scene.clear();
        assert!(!scene.has_pending_pages());
    }

    #[test]
    fn empty_scene_serializes_to_empty_object() {
        let json = serde_json::to_string(&Scene::default()).expect("serialize");
        assert_eq!(json, "{}");
    }
}
