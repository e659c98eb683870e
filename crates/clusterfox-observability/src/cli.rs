// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug flags
//!
//! Supports `--debug-clusterfox-agent` style arguments, plain crate names coming
//! from a repeatable `--debug <crate>` option, and the `CLUSTERFOX_DEBUG`
//! environment variable.

use std::collections::BTreeSet;
use std::env;

use crate::{filter_target, KNOWN_CRATES};

/// Environment variable listing crates to debug (`all` or comma-separated)
pub const DEBUG_ENV_VAR: &str = "CLUSTERFOX_DEBUG";

/// Set of crates with debug logging enabled
///
/// # Example
/// ```rust
/// use clusterfox_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_names(["agent"]);
/// assert!(flags.is_enabled("clusterfox-agent"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse `--debug-{crate-name}` and `--debug-all` from raw arguments
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = Self::default();
        for arg in args {
            if let Some(name) = arg.strip_prefix("--debug-") {
                flags.enable(name);
            }
        }
        flags
    }

    /// Build from crate names (`all`, full names, or names without the `clusterfox-` prefix)
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for name in names {
            flags.enable(name.as_ref());
        }
        flags
    }

    /// Enable a crate by name; `all` enables every known crate
    pub fn enable(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if name == "all" {
            self.enabled_crates
                .extend(KNOWN_CRATES.iter().map(|c| c.to_string()));
            return;
        }
        self.enabled_crates.insert(canonical_name(name));
    }

    /// Merge crates listed in `CLUSTERFOX_DEBUG`
    pub fn merge_env(&mut self) {
        if let Ok(value) = env::var(DEBUG_ENV_VAR) {
            for name in value.split(',') {
                self.enable(name);
            }
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(&canonical_name(crate_name))
    }

    pub fn enabled_crates(&self) -> impl Iterator<Item = &str> {
        self.enabled_crates.iter().map(String::as_str)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// `DEBUG` if enabled for the crate, `INFO` otherwise
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// `EnvFilter` directive string: one `target=debug` per crate, then the base level
    ///
    /// Targets use the module path form (`clusterfox_agent`), which is what
    /// tracing records for events emitted from a crate.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates
            .iter()
            .map(|name| format!("{}=debug", filter_target(name)))
            .collect();
        filters.push(base_level.to_lowercase());
        filters.join(",")
    }
}

fn canonical_name(name: &str) -> String {
    let name = name.trim().replace('_', "-");
    if name.starts_with("clusterfox-") || name == "clusterfox" {
        name
    } else {
        let prefixed = format!("clusterfox-{}", name);
        if KNOWN_CRATES.contains(&prefixed.as_str()) {
            prefixed
        } else {
            name
        }
    }
}

/// Debug flags from CLI names plus the `CLUSTERFOX_DEBUG` environment variable
pub fn parse_debug_flags<I, S>(cli_names: I) -> CrateDebugFlags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = CrateDebugFlags::from_names(cli_names);
    flags.merge_env();
    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug all                    Enable debug logging for all crates
  --debug <crate-name>           Enable debug logging for a specific crate (repeatable)

Available crates:
  {}

Environment Variable:
  {env}=<crate-name>[,<crate-name>]  Enable debug for crates (comma-separated)
  {env}=all                          Enable debug for all crates
"#,
        KNOWN_CRATES.join(", "),
        env = DEBUG_ENV_VAR
    )
}
