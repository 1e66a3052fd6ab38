//! Suncrest engine layer.
//!
//! Everything stateful and behavioral on top of the pure domain model:
//! the instruction interpreter and its op library, build-time registries,
//! the scene continuation stack, card lifecycle and reminders, the world
//! clock, whole-state persistence, and the [`Engine`] facade the
//! presentation layer drives.

pub mod cards;
pub mod clock;
mod engine;
pub mod interpreter;
mod ops;
pub mod persistence;
pub mod registry;
pub mod rng;
pub mod scene_flow;

pub use engine::{ActionParams, Engine, ACTION_ADVANCE, ACTION_BUY, ACTION_CHOOSE};
pub use interpreter::{exec, exec_all, ExecCtx};
pub use registry::{
    CardDef, CardTick, ItemDef, LocationDef, NpcTemplate, OpHandler, PeriodicEffect, Registry,
    StatDef,
};
pub use rng::{Roller, ScriptedRoller, ThreadRoller};
