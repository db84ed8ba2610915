//! Formatting utilities.
//!
//! # Responsibilities
//! - Split a millisecond duration into hour/minute/second components
//! - Render the "complete time" used in titles (`H:MM:SS` or `M:SS`)
//! - Decode HTML character references in timer names
//!
//! # Design Decisions
//! - All functions are pure and total over `u64` milliseconds
//! - Decoding follows textarea semantics: entities decode, tags survive

pub mod html;
pub mod time;

pub use html::decode_html;
pub use time::{complete_time, hours, minutes, seconds, with_leading_zero};
