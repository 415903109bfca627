//! Compiles architecture specific perf event descriptions into hardware programmable event groups.
//!
//! Event definition files list the events to collect on a platform, one per line, with `;`
//! marking the end of a multiplexed group. The compiler drops events the running platform cannot
//! count (see [`Metadata`](metadata::Metadata)) and replicates uncore groups once per discovered
//! device instance.

#![deny(missing_docs, missing_debug_implementations)]

mod errors;
pub use errors::{Error, FormatError, Result};

pub mod config;
pub use config::{LoadConfig, Scope};

pub mod groups;
pub use groups::{load_event_groups, EventDefinition, EventGroups, GroupDefinition};

pub mod metadata;
pub use metadata::Metadata;
