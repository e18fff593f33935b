//! Patch pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PatchError, PatchResult};

/// Configuration for [`SchemaPatcher`](crate::SchemaPatcher).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Append default-value data operations for newly added nodes.
    pub enrich_defaults: bool,
    /// Emit a `replace` for nodes that moved and whose own attributes
    /// changed as well. When off, such content changes are not patched.
    pub replace_moved_content: bool,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            enrich_defaults: true,
            replace_moved_content: true,
        }
    }
}

impl PatchConfig {
    /// Schema operations only.
    pub fn schema_only() -> Self {
        Self {
            enrich_defaults: false,
            ..Default::default()
        }
    }

    /// Parse from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> PatchResult<Self> {
        toml::from_str(s).map_err(|e| PatchError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> PatchResult<String> {
        toml::to_string(self).map_err(|e| PatchError::Config(e.to_string()))
    }
}
