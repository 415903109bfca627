use super::definition::{EventDefinition, CPU_DEVICE};
use crate::{Metadata, Scope};
use log::debug;

/// Reason an event cannot be collected on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Topdown event needing fixed counter TMA support.
    FixedTmaUnsupported,
    /// Off-core response event on a platform without uncore support.
    OffcoreUnsupported,
    /// Off-core response event outside system-wide scope.
    OffcoreNotSystemWide,
    /// Uncore event outside system-wide scope.
    UncoreNotSystemWide,
    /// Uncore event for a device type the platform does not have.
    UncoreDeviceNotFound,
    /// Uncore event without an `event` or `umask` encoding.
    UncoreMissingEncoding,
    /// `ref-cycles` on a platform that cannot count it.
    RefCyclesUnsupported,
    /// Cstate or power event outside system-wide scope.
    PowerNotSystemWide,
    /// Event missing from the perf event list.
    NotSupportedByPerf,
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Exclusion::FixedTmaUnsupported => "Fixed counter TMA not supported on target",
            Exclusion::OffcoreUnsupported => "Off-core response events not supported on target",
            Exclusion::OffcoreNotSystemWide => {
                "Off-core response events not supported in process or cgroup scope"
            }
            Exclusion::UncoreNotSystemWide => "Uncore events not supported in process or cgroup scope",
            Exclusion::UncoreDeviceNotFound => "Uncore device not found",
            Exclusion::UncoreMissingEncoding => "Uncore event missing umask or event",
            Exclusion::RefCyclesUnsupported => "ref-cycles not supported on target",
            Exclusion::PowerNotSystemWide => {
                "Cstate and power events not supported in process or cgroup scope"
            }
            Exclusion::NotSupportedByPerf => "Event not supported by perf",
        };
        f.write_str(s)
    }
}

/// Topdown events that live on the fixed counters.
fn is_fixed_tma(name: &str) -> bool {
    name == "TOPDOWN.SLOTS" || name.starts_with("PERF_METRICS.")
}

/// Decide whether `event` can be collected on the platform described by `metadata`.
///
/// Rules are checked in order and the first one that applies decides.
pub fn check_collectable(
    event: &EventDefinition,
    metadata: &Metadata,
    scope: Scope,
) -> Result<(), Exclusion> {
    if !metadata.supports_fixed_tma && is_fixed_tma(&event.name) {
        return Err(Exclusion::FixedTmaUnsupported);
    }

    if event.device == CPU_DEVICE {
        if !event.name.starts_with("OCR") {
            return Ok(());
        }
        return if !metadata.supports_uncore {
            Err(Exclusion::OffcoreUnsupported)
        } else if !scope.is_system_wide() {
            Err(Exclusion::OffcoreNotSystemWide)
        } else {
            Ok(())
        };
    }

    if !event.device.is_empty() {
        return if !scope.is_system_wide() {
            Err(Exclusion::UncoreNotSystemWide)
        } else if metadata.uncore_device_ids(&event.device).is_none() {
            Err(Exclusion::UncoreDeviceNotFound)
        } else if !event.raw.contains("umask") && !event.raw.contains("event") {
            Err(Exclusion::UncoreMissingEncoding)
        } else {
            Ok(())
        };
    }

    // Untagged core event from here on.
    if !metadata.supports_ref_cycles && event.name.contains("ref-cycles") {
        return Err(Exclusion::RefCyclesUnsupported);
    }
    if !scope.is_system_wide()
        && (event.name.contains("cstate_") || event.name.contains("power/energy"))
    {
        return Err(Exclusion::PowerNotSystemWide);
    }
    if !metadata.supports_perf_event(event.base_name()) {
        return Err(Exclusion::NotSupportedByPerf);
    }
    Ok(())
}

/// Check if `event` can be collected, logging why when it cannot.
pub fn is_collectable(event: &EventDefinition, metadata: &Metadata, scope: Scope) -> bool {
    match check_collectable(event, metadata, scope) {
        Ok(()) => true,
        Err(reason) if event.device.is_empty() => {
            debug!("{} - {}", reason, event.name);
            false
        }
        Err(reason) => {
            debug!("{} - {} on {}", reason, event.name, event.device);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> Metadata {
        let mut md = Metadata {
            supports_fixed_tma: true,
            supports_uncore: true,
            supports_ref_cycles: true,
            ..Default::default()
        };
        md.uncore_device_ids.insert("cha".into(), vec![0, 1]);
        md.uncore_device_ids.insert("upi".into(), vec![]);
        for name in &[
            "instructions",
            "cpu-cycles",
            "ref-cycles",
            "power/energy-pkg/",
            "cstate_core/c6-residency/",
        ] {
            md.perf_supported_events.insert((*name).into());
        }
        md
    }

    fn event(line: &str) -> EventDefinition {
        EventDefinition::parse(line).unwrap()
    }

    #[test]
    fn test_fixed_tma() {
        let slots = event("cpu/event=0x00,umask=0x04,period=10000003,name='TOPDOWN.SLOTS'/");
        let metrics = event("cpu/event=0x00,umask=0x81,period=10000003,name='PERF_METRICS.BAD_SPECULATION'/");
        let mut md = platform();
        assert_eq!(check_collectable(&slots, &md, Scope::System), Ok(()));
        md.supports_fixed_tma = false;
        assert_eq!(
            check_collectable(&slots, &md, Scope::System),
            Err(Exclusion::FixedTmaUnsupported)
        );
        assert!(!is_collectable(&metrics, &md, Scope::System));
    }

    #[test]
    fn test_cpu_event_fast_accept() {
        let evt = event("cpu/event=0xc0,umask=0x00,name='INST_RETIRED.ANY'/");
        let md = Metadata::default();
        assert!(is_collectable(&evt, &md, Scope::System));
        assert!(is_collectable(&evt, &md, Scope::Process));
        assert!(is_collectable(&evt, &md, Scope::Cgroup));
    }

    #[test]
    fn test_offcore_response() {
        let evt = event("cpu/event=0x2a,umask=0x01,offcore_rsp=0x104000477,name='OCR.READS_TO_CORE.LOCAL_DRAM'/");
        let mut md = platform();
        assert!(is_collectable(&evt, &md, Scope::System));
        assert_eq!(
            check_collectable(&evt, &md, Scope::Process),
            Err(Exclusion::OffcoreNotSystemWide)
        );
        assert_eq!(
            check_collectable(&evt, &md, Scope::Cgroup),
            Err(Exclusion::OffcoreNotSystemWide)
        );
        md.supports_uncore = false;
        assert_eq!(
            check_collectable(&evt, &md, Scope::System),
            Err(Exclusion::OffcoreUnsupported)
        );
    }

    #[test]
    fn test_uncore_events() {
        let md = platform();
        let cha = event("cha/event=0x35,umask=0xc80ffe01,name='UNC_CHA_TOR_INSERTS.IA_MISS_CRD'/");
        assert!(is_collectable(&cha, &md, Scope::System));
        assert_eq!(
            check_collectable(&cha, &md, Scope::Process),
            Err(Exclusion::UncoreNotSystemWide)
        );
        let imc = event("imc/event=0x04,umask=0x0f,name='UNC_M_CAS_COUNT.RD'/");
        assert_eq!(
            check_collectable(&imc, &md, Scope::System),
            Err(Exclusion::UncoreDeviceNotFound)
        );
        // Present with no instances still passes, expansion drops the group.
        let upi = event("upi/event=0x02,umask=0x0f,name='UNC_UPI_TxL_FLITS.ALL_DATA'/");
        assert!(is_collectable(&upi, &md, Scope::System));
        let bare = event("cha/config=0x1234,name='UNC_CHA_CLOCKTICKS'/");
        assert_eq!(
            check_collectable(&bare, &md, Scope::System),
            Err(Exclusion::UncoreMissingEncoding)
        );
    }

    #[test]
    fn test_ref_cycles() {
        let evt = event("ref-cycles");
        let mut md = platform();
        assert!(is_collectable(&evt, &md, Scope::Process));
        md.supports_ref_cycles = false;
        assert_eq!(
            check_collectable(&evt, &md, Scope::System),
            Err(Exclusion::RefCyclesUnsupported)
        );
    }

    #[test]
    fn test_power_and_cstate_need_system_scope() {
        let md = platform();
        for line in &["power/energy-pkg/", "cstate_core/c6-residency/"] {
            let evt = event(line);
            assert!(is_collectable(&evt, &md, Scope::System));
            assert_eq!(
                check_collectable(&evt, &md, Scope::Cgroup),
                Err(Exclusion::PowerNotSystemWide)
            );
        }
    }

    #[test]
    fn test_perf_supported_events() {
        let md = platform();
        assert!(is_collectable(&event("instructions"), &md, Scope::System));
        assert!(is_collectable(&event("instructions:u"), &md, Scope::Process));
        assert_eq!(
            check_collectable(&event("branch-misses"), &md, Scope::System),
            Err(Exclusion::NotSupportedByPerf)
        );
    }
}
