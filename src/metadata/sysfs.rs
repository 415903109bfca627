use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

lazy_static! {
    /// Splits `uncore_<type>_<id>` PMU names.
    static ref UNCORE_PMU: Regex = Regex::new(r"^uncore_(\w+)_(\d+)$").unwrap();
}

/// Find the uncore PMU instances registered in a sysfs devices directory.
///
/// `devices_dir` is normally `/sys/devices`. Each `uncore_<type>_<id>` entry contributes `id` to
/// the list for `<type>`; the lists are sorted. Entries without a numeric suffix (single instance
/// PMUs such as `uncore_arb`) are skipped.
pub fn discover_uncore_devices<P: AsRef<Path>>(
    devices_dir: P,
) -> crate::Result<HashMap<String, Vec<u32>>> {
    let pattern = devices_dir.as_ref().join("uncore_*");
    let mut devices: HashMap<String, Vec<u32>> = HashMap::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry?;
        let name = match path.file_name().and_then(|x| x.to_str()) {
            Some(n) => n,
            None => continue,
        };
        match UNCORE_PMU.captures(name) {
            Some(caps) => {
                let id = caps[2].parse::<u32>()?;
                devices.entry(caps[1].into()).or_default().push(id);
            }
            None => trace!("Skipping uncore PMU without instance id - {}", name),
        }
    }
    for ids in devices.values_mut() {
        ids.sort_unstable();
    }
    debug!("Discovered uncore devices - {:?}", devices);
    Ok(devices)
}
