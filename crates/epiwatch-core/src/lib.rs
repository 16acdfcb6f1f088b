//! `epiwatch-core` — shared types, configuration and error taxonomy.
//!
//! Everything the other EpiWatch crates agree on lives here: the normalized
//! schedule data model ([`types::ScheduleSnapshot`]), the chat identity type
//! used as the registry key, and the process configuration loaded from
//! `epiwatch.toml` plus environment overrides.

pub mod config;
pub mod error;
pub mod types;

pub use config::EpiwatchConfig;
pub use error::{EpiwatchError, Result};
pub use types::{ChatIdentity, Destination, ScheduleSnapshot, ShowEntry};
