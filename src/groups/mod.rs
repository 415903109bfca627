//! Compile event definition files into perf event groups for the running platform.
//!
//! Event definitions pass through four stages: each line is parsed into an [`EventDefinition`],
//! filtered against the platform [`Metadata`], assembled into [`GroupDefinition`]s at every `;`
//! terminator and finally groups of uncore events are replicated once per device instance.

use crate::{LoadConfig, Metadata, Result};
use log::warn;

mod definition;
pub use definition::{EventDefinition, GroupDefinition, CPU_DEVICE};

mod filter;
pub use filter::{check_collectable, is_collectable, Exclusion};

mod assembler;
pub use assembler::{assemble, Assembly, EVENT_SEPARATOR, GROUP_TERMINATOR};

mod uncore;
pub use uncore::{expand_uncore_group, expand_uncore_groups, UncoreTemplate};

mod source;
pub use source::{builtin, EventSource};

/// Groups ready to be programmed into the counters and the events that were left out.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventGroups {
    /// Non-empty event groups in source order, with uncore groups expanded per device.
    pub groups: Vec<GroupDefinition>,
    /// Sorted names of the events that cannot be collected on the platform.
    pub uncollectable: Vec<String>,
}

impl EventGroups {
    /// Total number of events over all groups.
    pub fn event_count(&self) -> usize {
        self.groups.iter().map(GroupDefinition::len).sum()
    }
}

/// Compile the event groups for the platform described by `metadata`.
///
/// Events are read from `config.override_path` when set and from the built-in definitions for
/// the platform's architecture, vendor and microarchitecture otherwise. I/O and format errors
/// abort the load; events the platform cannot collect are only reported.
pub fn load_event_groups(config: &LoadConfig, metadata: &Metadata) -> Result<EventGroups> {
    let reader = EventSource::select(config, metadata).open()?;
    let assembly = assemble(reader, metadata, config.scope)?;
    let groups = expand_uncore_groups(assembly.groups, metadata)?;
    if !assembly.uncollectable.is_empty() {
        warn!(
            "Events not collectable on target: {:?}",
            assembly.uncollectable
        );
    }
    Ok(EventGroups {
        groups,
        uncollectable: assembly.uncollectable.into_iter().collect(),
    })
}
