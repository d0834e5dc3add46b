//! Build propagation engine: applies the platform defaults to every module,
//! layers managed versions and module-specific dependencies on top, and
//! freezes the result into a `ModuleConfig`.

pub mod conflict;
pub mod graph;
pub mod managed;
pub mod pipeline;
pub mod stage;
pub mod state;
