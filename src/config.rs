//! Caller supplied configuration for compiling event groups.

use crate::{Error, Result};
use log::debug;
use std::path::PathBuf;

/// Environment variable naming an event definition file that replaces the built-in one.
pub const EVENTS_OVERRIDE_VAR: &str = "PERF_GROUPS_EVENTS";

/// Environment variable holding the collection scope.
pub const SCOPE_VAR: &str = "PERF_GROUPS_SCOPE";

/// Granularity at which counters are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Whole machine.
    System,
    /// A single process.
    Process,
    /// A control group.
    Cgroup,
}

impl Scope {
    /// Uncore, off-core response, cstate and power events need the whole machine.
    #[inline]
    pub fn is_system_wide(self) -> bool {
        self == Scope::System
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::System
    }
}

impl std::str::FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Scope::System),
            "process" => Ok(Scope::Process),
            "cgroup" => Ok(Scope::Cgroup),
            _ => Err(Error::UnknownScope(s.into())),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Scope::System => "system",
            Scope::Process => "process",
            Scope::Cgroup => "cgroup",
        };
        f.write_str(s)
    }
}

/// Options for a single call to [`load_event_groups`](crate::load_event_groups).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadConfig {
    /// Event definition file to use instead of the built-in resource.
    pub override_path: Option<PathBuf>,
    /// Requested collection scope.
    pub scope: Scope,
}

impl LoadConfig {
    /// System-wide collection from the built-in resources.
    pub fn new() -> Self {
        LoadConfig::default()
    }

    /// Read events from `path` instead of the built-in resource.
    pub fn override_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.override_path = Some(path.into());
        self
    }

    /// Set the collection scope.
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Build a configuration from `PERF_GROUPS_EVENTS` and `PERF_GROUPS_SCOPE`.
    ///
    /// Unset variables fall back to the defaults. An empty override path is treated as unset.
    pub fn from_env() -> Result<Self> {
        let mut config = LoadConfig::default();
        if let Some(path) = read_var(EVENTS_OVERRIDE_VAR)? {
            if !path.is_empty() {
                config.override_path = Some(path.into());
            }
        }
        if let Some(scope) = read_var(SCOPE_VAR)? {
            config.scope = scope.parse()?;
        }
        debug!("Loaded configuration from environment - {:?}", config);
        Ok(config)
    }
}

/// Read an optional environment variable.
fn read_var(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(v) => Ok(Some(v)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_str() {
        assert_eq!("system".parse::<Scope>().unwrap(), Scope::System);
        assert_eq!("Process".parse::<Scope>().unwrap(), Scope::Process);
        assert_eq!(" CGROUP ".parse::<Scope>().unwrap(), Scope::Cgroup);
        match "thread".parse::<Scope>() {
            Err(Error::UnknownScope(s)) => assert_eq!(s, "thread"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_scope_display_roundtrip() {
        for scope in &[Scope::System, Scope::Process, Scope::Cgroup] {
            assert_eq!(scope.to_string().parse::<Scope>().unwrap(), *scope);
        }
        assert!(Scope::default().is_system_wide());
        assert!(!Scope::Cgroup.is_system_wide());
    }

    #[test]
    fn test_config_builder() {
        let config = LoadConfig::new()
            .override_path("/tmp/events.txt")
            .scope(Scope::Process);
        assert_eq!(config.override_path, Some(PathBuf::from("/tmp/events.txt")));
        assert_eq!(config.scope, Scope::Process);
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var(EVENTS_OVERRIDE_VAR, "/tmp/custom.txt");
        std::env::set_var(SCOPE_VAR, "cgroup");
        let config = LoadConfig::from_env().unwrap();
        std::env::remove_var(EVENTS_OVERRIDE_VAR);
        std::env::remove_var(SCOPE_VAR);
        assert_eq!(config.override_path, Some(PathBuf::from("/tmp/custom.txt")));
        assert_eq!(config.scope, Scope::Cgroup);
    }
}
