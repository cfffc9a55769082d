use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slotvec_common::{Result, error::Error};

use crate::naming::NamingStrategy;

/// Setup-time parameters of an [`MmapAllocator`](crate::MmapAllocator).
///
/// Missing fields take their defaults when deserialized:
///
/// ```
/// use slotvec_storage::{MmapConfig, NamingStrategy};
///
/// let config = MmapConfig::from_json(r#"{ "dir": "/var/lib/qf" }"#).unwrap();
/// assert!(config.bit_packed);
/// assert_eq!(config.naming, NamingStrategy::Probe);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MmapConfig {
    /// Directory holding the `mmap.<n>` backing files. Must exist.
    pub dir: PathBuf,
    /// Store values bit-packed (`true`) or one per word (`false`).
    pub bit_packed: bool,
    pub naming: NamingStrategy,
}

impl MmapConfig {
    pub fn new(dir: impl Into<PathBuf>) -> MmapConfig {
        MmapConfig {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn with_bit_packed(mut self, bit_packed: bool) -> MmapConfig {
        self.bit_packed = bit_packed;
        self
    }

    pub fn with_naming(mut self, naming: NamingStrategy) -> MmapConfig {
        self.naming = naming;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn from_json(json: &str) -> Result<MmapConfig> {
        serde_json::from_str(json).map_err(|e| Error::invalid_arg("config", e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::invalid_arg("config", e.to_string()))
    }
}

impl Default for MmapConfig {
    fn default() -> Self {
        MmapConfig {
            dir: PathBuf::from("."),
            bit_packed: true,
            naming: NamingStrategy::Probe,
        }
    }
}
