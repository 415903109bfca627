use super::definition::{EventDefinition, GroupDefinition};
use crate::{FormatError, Metadata};
use log::{debug, warn};

/// Pieces of an uncore event of the form `<type>/event=0x..,umask=0x..[,...],name='<name>'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UncoreTemplate<'a> {
    /// Device type, e.g. `cha`.
    pub device_type: &'a str,
    /// Event code including its `0x` prefix.
    pub event_code: &'a str,
    /// Unit mask including its `0x` prefix, followed by any further config fields.
    pub umask: &'a str,
    /// Name of the event.
    pub name: &'a str,
}

/// Split `s` into a `0x` prefixed run of hex digits and the remainder.
fn take_hex(s: &str) -> Option<(&str, &str)> {
    let digits = s.strip_prefix("0x")?;
    let len = digits
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or_else(|| digits.len());
    if len == 0 {
        return None;
    }
    Some(s.split_at(2 + len))
}

impl<'a> UncoreTemplate<'a> {
    /// Split the raw text of an uncore event into its template fields.
    ///
    /// Text after the closing quote of the name (usually `/`) is ignored.
    pub fn parse(raw: &'a str) -> Result<Self, FormatError> {
        let err = || FormatError::UnexpectedRawEvent(raw.into());

        // The device type spans the whole text before the first `/`.
        let slash = raw.find('/').ok_or_else(err)?;
        let (device_type, rest) = (&raw[..slash], &raw[slash + 1..]);
        if device_type.is_empty()
            || !device_type
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(err());
        }

        let (event_code, rest) = take_hex(rest.strip_prefix("event=").ok_or_else(err)?)
            .ok_or_else(err)?;
        let rest = rest.strip_prefix(",umask=").ok_or_else(err)?;
        take_hex(rest).ok_or_else(err)?;

        // The name is the last `name=` field, the umask keeps any config in between.
        let name_idx = rest.rfind(",name='").ok_or_else(err)?;
        let umask = &rest[..name_idx];
        let quoted = &rest[name_idx + ",name='".len()..];
        let name = &quoted[..quoted.rfind('\'').ok_or_else(err)?];

        Ok(UncoreTemplate {
            device_type,
            event_code,
            umask,
            name,
        })
    }

    /// Instantiate the template for the device instance `id`.
    pub fn instantiate(&self, device: &str, id: u32) -> EventDefinition {
        let name = format!("{}.{}", self.name, id);
        let raw = format!(
            "uncore_{}_{}/event={},umask={},name='{}'/",
            self.device_type, id, self.event_code, self.umask, name
        );
        EventDefinition {
            raw,
            name,
            device: device.into(),
        }
    }
}

/// Replicate `group` once for every device instance in `ids`.
pub fn expand_uncore_group(
    group: &GroupDefinition,
    ids: &[u32],
) -> Result<Vec<GroupDefinition>, FormatError> {
    let templates = group
        .iter()
        .map(|e| UncoreTemplate::parse(&e.raw).map(|t| (t, e.device.as_str())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids
        .iter()
        .map(|&id| {
            GroupDefinition::from(
                templates
                    .iter()
                    .map(|(t, device)| t.instantiate(device, id))
                    .collect::<Vec<_>>(),
            )
        })
        .collect())
}

/// Expand every group whose device is an uncore device type into one group per device instance.
///
/// The device of a group is the device of its first event; groups are expected not to mix
/// devices. Groups for device types with no instances are dropped. Core groups pass through.
pub fn expand_uncore_groups(
    groups: Vec<GroupDefinition>,
    metadata: &Metadata,
) -> Result<Vec<GroupDefinition>, FormatError> {
    let mut expanded = Vec::with_capacity(groups.len());
    for group in groups {
        let device = match group.leader() {
            Some(e) => e.device.as_str(),
            None => continue,
        };
        match metadata.uncore_device_ids(device) {
            Some(ids) if ids.is_empty() => {
                warn!("No uncore devices found - {}", device);
            }
            Some(ids) => {
                debug!("Expanding {} group across {} devices", device, ids.len());
                expanded.extend(expand_uncore_group(&group, ids)?);
            }
            None => expanded.push(group),
        }
    }
    Ok(expanded)
}
