use crate::FormatError;
use derive_more::{From, Index, IntoIterator};

/// Device tag of explicitly tagged core events.
pub const CPU_DEVICE: &str = "cpu";

/// A single perf event read from an event definition file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct EventDefinition {
    /// Source text of the event, without the trailing separator.
    pub raw: String,
    /// Symbolic name of the event.
    pub name: String,
    /// PMU the event is counted on.
    ///
    /// Empty for plain core events, `cpu` for tagged core events and the device type (e.g.
    /// `cha`) for uncore events.
    pub device: String,
}

impl EventDefinition {
    /// Parse one line of an event definition file.
    ///
    /// The line must already be trimmed and have its trailing `,` or `;` removed. A line with a
    /// single field is a bare event name. Otherwise the last field must be `name='<NAME>'`,
    /// optionally followed by `/`, and the device is the first field up to its first `/`.
    pub fn parse(line: &str) -> Result<Self, FormatError> {
        if line.is_empty() {
            return Err(FormatError::Empty);
        }
        let fields: Vec<&str> = line.split(',').collect();
        match fields.as_slice() {
            [] => Err(FormatError::Empty),
            [name] => Ok(EventDefinition {
                raw: line.into(),
                name: (*name).into(),
                device: String::new(),
            }),
            [first, .., last] => {
                let quoted = last
                    .strip_prefix("name=")
                    .ok_or_else(|| FormatError::MissingNameField(line.into()))?;
                let name = unquote(quoted.strip_suffix('/').unwrap_or(quoted))
                    .ok_or_else(|| FormatError::UnquotedName(line.into()))?;
                let device = first.split('/').next().unwrap_or("");
                Ok(EventDefinition {
                    raw: line.into(),
                    name: name.into(),
                    device: device.into(),
                })
            }
        }
    }

    /// Name without any `:` modifiers, e.g. `instructions` for `instructions:u`.
    #[inline]
    pub fn base_name(&self) -> &str {
        self.name.split(':').next().unwrap_or("")
    }

    /// Event is counted on a core PMU, whether tagged `cpu` or untagged.
    #[inline]
    pub fn is_core(&self) -> bool {
        self.device.is_empty() || self.device == CPU_DEVICE
    }
}

/// Strip a matching pair of single or double quotes around `s`.
fn unquote(s: &str) -> Option<&str> {
    ['\'', '"']
        .iter()
        .find(|&&q| s.len() >= 2 && s.starts_with(q) && s.ends_with(q))
        .map(|_| &s[1..s.len() - 1])
}

/// Events that are programmed into the hardware counters together.
///
/// Order matters: it is the order in which counters are assigned.
#[derive(Debug, Default, Clone, PartialEq, Eq, From, Index, IntoIterator)]
pub struct GroupDefinition {
    #[index]
    #[into_iterator(owned, ref)]
    events: Vec<EventDefinition>,
}

impl GroupDefinition {
    /// Create an empty group.
    pub fn new() -> Self {
        GroupDefinition::default()
    }

    /// Number of events in the group.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the group has no events.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over the events of the group.
    pub fn iter(&self) -> std::slice::Iter<'_, EventDefinition> {
        self.events.iter()
    }

    /// First event of the group, which decides the device of the whole group.
    #[inline]
    pub fn leader(&self) -> Option<&EventDefinition> {
        self.events.first()
    }

    /// Names of the events in counter order.
    pub fn names(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.name.as_str()).collect()
    }

    pub(crate) fn push(&mut self, event: EventDefinition) {
        self.events.push(event);
    }
}
