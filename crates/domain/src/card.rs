//! Card entity - typed, identified lifecycle records
//!
//! Quests, timed effects, traits, and scheduled encounters are all cards:
//! an id, a kind, a free-form field bag, and two lifecycle flags. Behavior
//! (per-tick updates, reminder production) lives in the engine's card
//! definition registry, keyed by card id; the instance carries only
//! mutable per-playthrough data so it serializes cleanly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::CardId;

/// Category of card. `Date` covers scheduled encounters with a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Quest,
    Effect,
    Trait,
    Date,
}

/// One entry in a card's free-form field bag.
///
/// A small closed set of value kinds rather than arbitrary JSON, so typed
/// accessors stay honest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

impl Card {
    pub fn new(id: CardId, kind: CardKind) -> Self {
        Self {
            id,
            kind,
            fields: BTreeMap::new(),
            completed: false,
            failed: false,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// A card past its useful life contributes no reminders and no updates.
    pub fn is_settled(&self) -> bool {
        self.completed || self.failed
    }

    pub fn number(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(FieldValue::Bool(true)))
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }
}

// =============================================================================
// Reminders
// =============================================================================

/// Display priority for a reminder. Ordering is `Info < Warning < Urgent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Info,
    Warning,
    Urgent,
}

/// An urgency-tagged, on-demand-computed user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub card: CardId,
    pub text: String,
    pub urgency: Urgency,
}

impl Reminder {
    pub fn new(card: CardId, text: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            card,
            text: text.into(),
            urgency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_bag_round_trips_with_mixed_kinds() {
        let card = Card::new(CardId::new("date_with_emma"), CardKind::Date)
            .with_field("dateStart", 86_400_i64)
            .with_field("dateStarted", false)
            .with_field("dateLocation", "park");
        let json = serde_json::to_string(&card).expect("serialize");
        let back: Card = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, card);
        assert_eq!(back.number("dateStart"), Some(86_400));
        assert!(!back.flag("dateStarted"));
        assert_eq!(back.text("dateLocation"), Some("park"));
    }

    #[test]
    fn default_false_flags_are_omitted_from_serialized_form() {
        let card = Card::new(CardId::new("q"), CardKind::Quest);
        let json = serde_json::to_string(&card).expect("serialize");
        assert!(!json.contains("completed"));
        assert!(!json.contains("failed"));
        let back: Card = serde_json::from_str(&json).expect("deserialize");
        assert!(!back.completed && !back.failed);
    }

    #[test]
    fn urgency_tiers_order_for_display() {
        assert!(Urgency::Info < Urgency::Warning);
        assert!(Urgency::Warning < Urgency::Urgent);
    }
}
