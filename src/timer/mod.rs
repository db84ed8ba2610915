//! Timer snapshot types consumed from the page layer.
//!
//! The page layer owns creation, mutation and persistence of timers; this
//! crate only reads them.

pub mod types;

pub use types::{load_save, LocalSave, SaveError, TimerContainer, TimerData};
