//! Extension points for hosts embedding the engine.

pub mod observers;

pub use observers::{EngineContext, EngineEvent, EngineObserver};
