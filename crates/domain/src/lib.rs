//! Suncrest domain layer.
//!
//! Pure data model for the narrative simulation core: serializable
//! instructions and script builders, the scene/continuation stack, cards
//! and reminders, NPC schedules, the player record, and the world-state
//! aggregate. No RNG and no I/O - nondeterminism is injected at the
//! engine seam.

pub mod card;
pub mod error;
pub mod game_time;
pub mod ids;
pub mod instruction;
pub mod npc;
pub mod player;
pub mod scene;
pub mod script;
pub mod world;

pub use card::{Card, CardKind, FieldValue, Reminder, Urgency};
pub use error::DomainError;
pub use game_time::{TimeOfDay, Weekday, WorldTime, DAY, HOUR, MINUTE};
pub use ids::{CardId, ItemId, LocationId, NpcId};
pub use instruction::{Instruction, Value};
pub use npc::{LocationOverride, Npc, Schedule, ScheduleEntry};
pub use player::Player;
pub use scene::{ContentItem, Page, Scene, SceneOption, Shop, ShopEntry};
pub use world::WorldState;
