//! Aggregate title for running timers.
//!
//! # Data Flow
//! ```text
//! LocalSave.timers
//!     → aggregator.rs (count running, pick the single runner)
//!     → format (complete time, decoded name)
//!     → sink.rs (externally owned display title)
//! ```
//!
//! # Design Decisions
//! - Title computation is pure; the sink is the only side effect
//! - Nothing is retained between updates

pub mod aggregator;
pub mod sink;

pub use aggregator::{compute_title, running_count, running_timer, update_title, NO_RUNNING_TIMERS};
pub use sink::{RecordingTitle, TerminalTitle, TitleError, TitleSink};
