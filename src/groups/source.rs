use crate::{LoadConfig, Metadata, Result};
use log::info;
use std::io::{BufRead, BufReader, Cursor};
use std::path::PathBuf;

macro_rules! builtin_events {
    ($($key: expr),* $(,)?) => {
        /// Event definition files compiled into the library, keyed by their resource path.
        static BUILTIN_EVENTS: &[(&str, &str)] = &[
            $(($key, include_str!(concat!("../../resources/", $key))),)*
        ];
    };
}

builtin_events!(
    "events/x86_64/GenuineIntel/icx.txt",
    "events/x86_64/GenuineIntel/icx_nofixedtma.txt",
    "events/x86_64/GenuineIntel/spr.txt",
    "events/x86_64/GenuineIntel/spr_nofixedtma.txt",
    "events/x86_64/GenuineIntel/emr.txt",
    "events/x86_64/GenuineIntel/emr_nofixedtma.txt",
    "events/x86_64/AuthenticAMD/genoa.txt",
);

/// Microarchitectures with alternate event files for parts without fixed counter TMA.
const NOFIXEDTMA_UARCHS: &[&str] = &["icx", "spr", "emr"];

/// Where event definitions are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    /// A file supplied by the caller.
    File(PathBuf),
    /// A resource compiled into the library.
    Builtin(String),
}

impl EventSource {
    /// Pick the source for `metadata`, preferring the override path in `config`.
    pub fn select(config: &LoadConfig, metadata: &Metadata) -> Self {
        if let Some(ref path) = config.override_path {
            return EventSource::File(path.clone());
        }
        let uarch = metadata.microarchitecture_root();
        // Use alternate events when TMA fixed counters are not supported.
        let alternate =
            if !metadata.supports_fixed_tma && NOFIXEDTMA_UARCHS.contains(&uarch.as_str()) {
                "_nofixedtma"
            } else {
                ""
            };
        EventSource::Builtin(format!(
            "events/{}/{}/{}{}.txt",
            metadata.architecture, metadata.vendor, uarch, alternate
        ))
    }

    /// Open the source for line by line reading.
    pub fn open(&self) -> Result<Box<dyn BufRead>> {
        info!("Reading event definitions from {:?}", self);
        match self {
            EventSource::File(path) => Ok(Box::new(BufReader::new(std::fs::File::open(path)?))),
            EventSource::Builtin(key) => {
                let text = builtin(key).ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("no built-in event definitions at {}", key),
                    )
                })?;
                Ok(Box::new(Cursor::new(text)))
            }
        }
    }
}

/// Look up a built-in event definition file.
pub fn builtin(key: &str) -> Option<&'static str> {
    BUILTIN_EVENTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
}
