//! Generator configuration
//!
//! Read from the environment:
//! - `INVENTORY_GEN_DEBUG`: when truthy, the prepared inventory is dumped
//! - `INVENTORY_GEN_DUMP`: where to dump it (default `inventory.debug.yml`)
//!
//! The dump is for inspection only; nothing reads it back.

use std::path::{Path, PathBuf};

use serde_yaml::Mapping;
use tracing::info;

use crate::error::Result;

pub const DEBUG_ENV: &str = "INVENTORY_GEN_DEBUG";
pub const DUMP_PATH_ENV: &str = "INVENTORY_GEN_DUMP";
pub const DEFAULT_DUMP_PATH: &str = "inventory.debug.yml";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Target of the debug dump, `None` when dumping is off
    pub debug_dump: Option<PathBuf>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup(DEBUG_ENV).is_some_and(|flag| is_truthy(&flag));
        let debug_dump = enabled.then(|| {
            lookup(DUMP_PATH_ENV)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DUMP_PATH))
        });
        Self { debug_dump }
    }

    pub fn with_debug_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_dump = Some(path.into());
        self
    }
}

fn is_truthy(flag: &str) -> bool {
    matches!(
        flag.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Serialise `inventory` as YAML to `path`
pub fn write_debug_dump(inventory: &Mapping, path: &Path) -> Result<()> {
    let text = serde_yaml::to_string(inventory)?;
    std::fs::write(path, text)?;
    info!("Wrote inventory debug dump to {}", path.display());
    Ok(())
}
