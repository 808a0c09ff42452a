//! Engine configuration
//!
//! ```toml
//! variant = "half-layout"
//!
//! [half_layout]
//! table = "half-qwerty"
//! hold_key = "SPACE"
//! repeat_delay_ms = 500
//! extra_pairs = [["1", "0"]]
//!
//! [dual_action]
//! enabled = true
//! key = "CAPSLOCK"
//! threshold_ms = 500
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::RemapTable;
use crate::error::{Error, Result};
use crate::types::{HangulLayout, VirtualKey};

/// Which composer a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionVariant {
    #[default]
    Hangul,
    HalfLayout,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub variant: SessionVariant,
    pub hangul: HangulConfig,
    pub half_layout: HalfLayoutConfig,
    pub dual_action: DualActionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HangulConfig {
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalfLayoutConfig {
    pub table: String,
    pub hold_key: String,
    pub repeat_delay_ms: u64,
    pub extra_pairs: Vec<[String; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualActionConfig {
    pub enabled: bool,
    pub key: String,
    pub threshold_ms: u64,
}

impl Default for HangulConfig {
    fn default() -> Self {
        Self {
            layout: "macime".to_string(),
        }
    }
}

impl Default for HalfLayoutConfig {
    fn default() -> Self {
        Self {
            table: "half-qwerty".to_string(),
            hold_key: "SPACE".to_string(),
            repeat_delay_ms: 500,
            extra_pairs: Vec::new(),
        }
    }
}

impl Default for DualActionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key: "CAPSLOCK".to_string(),
            threshold_ms: 500,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

impl HangulConfig {
    pub fn resolve_layout(&self) -> Result<HangulLayout> {
        HangulLayout::from_name(&self.layout)
    }
}

impl HalfLayoutConfig {
    /// Modifier keys only report flag changes, so they can never engage the layer
    pub fn resolve_hold_key(&self) -> Result<VirtualKey> {
        let key = VirtualKey::from_name(&self.hold_key)?;
        if key.is_modifier_key() {
            return Err(Error::InvalidConfig(format!(
                "modifier key {} cannot be the hold key",
                key.name()
            )));
        }
        Ok(key)
    }

    pub fn repeat_delay(&self) -> Duration {
        Duration::from_millis(self.repeat_delay_ms)
    }

    /// Build the remap table, extra pairs included
    pub fn resolve_table(&self, hold_key: VirtualKey) -> Result<RemapTable> {
        let mut table = match self.table.trim().to_lowercase().as_str() {
            "half-qwerty" | "half_qwerty" => RemapTable::half_qwerty(),
            "none" | "" => RemapTable::default(),
            other => return Err(Error::InvalidConfig(format!("unknown remap table: {}", other))),
        };

        for [a, b] in &self.extra_pairs {
            table.insert_pair(VirtualKey::from_name(a)?, VirtualKey::from_name(b)?)?;
        }

        if table.contains(hold_key) {
            return Err(Error::InvalidConfig(format!(
                "hold key {} cannot also be remapped",
                hold_key.name()
            )));
        }
        Ok(table)
    }
}

impl DualActionConfig {
    pub fn resolve_key(&self) -> Result<VirtualKey> {
        VirtualKey::from_name(&self.key)
    }

    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.threshold_ms)
    }
}
