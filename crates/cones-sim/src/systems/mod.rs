//! Systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only). They do not own state. Cone state lives in components, hose
//! state in the engine.

pub mod cleanup;
pub mod cone_spawner;
pub mod hose_control;
pub mod movement;
pub mod snapshot;
pub mod targeting;
