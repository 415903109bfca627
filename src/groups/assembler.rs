use super::definition::{EventDefinition, GroupDefinition};
use super::filter::is_collectable;
use crate::{Metadata, Result, Scope};
use log::warn;
use std::collections::BTreeSet;
use std::io::BufRead;

/// Ends a multiplexed group.
pub const GROUP_TERMINATOR: char = ';';

/// Separates events within a group.
pub const EVENT_SEPARATOR: char = ',';

/// Groups of collectable events together with the names of the events that were dropped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Assembly {
    /// Non-empty groups in source order.
    pub groups: Vec<GroupDefinition>,
    /// Names of events the platform cannot collect.
    pub uncollectable: BTreeSet<String>,
}

/// Read event definitions from `reader` and partition the collectable ones into groups.
///
/// Blank lines and `#` comments are skipped. A line ending in `;` closes the current group;
/// groups left empty by filtering are dropped. Any read or parse error aborts the whole assembly.
pub fn assemble<R: BufRead>(reader: R, metadata: &Metadata, scope: Scope) -> Result<Assembly> {
    let mut assembly = Assembly::default();
    let mut group = GroupDefinition::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let ends_group = line.ends_with(GROUP_TERMINATOR);
        let body = line
            .strip_suffix(|c: char| c == GROUP_TERMINATOR || c == EVENT_SEPARATOR)
            .unwrap_or(line);
        // A bare `;` only closes the group.
        if !body.is_empty() {
            let event = EventDefinition::parse(body)?;
            if is_collectable(&event, metadata, scope) {
                group.push(event);
            } else {
                assembly.uncollectable.insert(event.name);
            }
        }
        if ends_group {
            if group.is_empty() {
                warn!("No collectable events in group ending with {}", line);
            } else {
                assembly.groups.push(group);
            }
            group = GroupDefinition::new();
        }
    }
    if !group.is_empty() {
        warn!(
            "Discarding {} events after the last group terminator: {:?}",
            group.len(),
            group.names()
        );
    }
    Ok(assembly)
}
