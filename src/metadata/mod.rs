//! Description of the target platform consumed by the event group compiler.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

mod perf_list;
pub use perf_list::parse_perf_list;

mod sysfs;
pub use sysfs::discover_uncore_devices;

/// Snapshot of the capabilities of the machine being measured.
///
/// Produced by a separate discovery step and only read by the compiler.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Architecture, e.g. `x86_64`.
    pub architecture: String,
    /// CPU vendor string, e.g. `GenuineIntel`.
    pub vendor: String,
    /// Microarchitecture, e.g. `SPR` or `SPR_XCC`.
    pub microarchitecture: String,
    /// Topdown events can be counted on fixed counters.
    pub supports_fixed_tma: bool,
    /// Uncore and off-core response events can be counted.
    pub supports_uncore: bool,
    /// The `ref-cycles` event can be counted.
    pub supports_ref_cycles: bool,
    /// Uncore device type (e.g. `cha`) to the ids of its instances on this machine.
    pub uncore_device_ids: HashMap<String, Vec<u32>>,
    /// Event names the kernel perf subsystem reports as available.
    pub perf_supported_events: HashSet<String>,
}

impl Metadata {
    /// Load a JSON snapshot.
    pub fn from_json_str(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a JSON snapshot from `path`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Metadata::from_json_str(&s)
    }

    /// Check if perf lists `name` as an available event.
    #[inline]
    pub fn supports_perf_event(&self, name: &str) -> bool {
        self.perf_supported_events.contains(name)
    }

    /// Instance ids of uncore device type `device`, if the platform has that device type.
    #[inline]
    pub fn uncore_device_ids(&self, device: &str) -> Option<&[u32]> {
        self.uncore_device_ids.get(device).map(Vec::as_slice)
    }

    /// Lowercased microarchitecture without its variant suffix, e.g. `spr` for `SPR_XCC`.
    pub fn microarchitecture_root(&self) -> String {
        self.microarchitecture
            .split('_')
            .next()
            .unwrap_or("")
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let md = Metadata::from_json_str(
            r#"{
                "architecture": "x86_64",
                "vendor": "GenuineIntel",
                "microarchitecture": "SPR_XCC",
                "supports_fixed_tma": true,
                "uncore_device_ids": {"cha": [0, 1, 2], "imc": []},
                "perf_supported_events": ["instructions", "cpu-cycles"]
            }"#,
        )
        .unwrap();
        assert_eq!(md.vendor, "GenuineIntel");
        assert!(md.supports_fixed_tma);
        assert!(!md.supports_uncore);
        assert_eq!(md.uncore_device_ids("cha"), Some(&[0, 1, 2][..]));
        assert_eq!(md.uncore_device_ids("imc"), Some(&[][..]));
        assert_eq!(md.uncore_device_ids("upi"), None);
        assert!(md.supports_perf_event("instructions"));
        assert!(!md.supports_perf_event("instr"));
        assert_eq!(md.microarchitecture_root(), "spr");
    }

    #[test]
    fn test_from_bad_json() {
        match Metadata::from_json_str("{\"vendor\": 5}") {
            Err(crate::Error::Json(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_from_json_file() {
        let md = Metadata {
            architecture: "x86_64".into(),
            microarchitecture: "ICX".into(),
            ..Default::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &md).unwrap();
        let loaded = Metadata::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, md);
        assert_eq!(loaded.microarchitecture_root(), "icx");
    }
}
