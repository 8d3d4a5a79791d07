//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetargetError};

/// Top-level settings for a retargeting session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Drive the puppet object itself from a performer bone (removes the
    /// extra root bone some engines insist on). When false, root targets
    /// passed to bind are ignored.
    pub use_root_retarget: bool,
    pub bake: BakeConfig,
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| RetargetError::Parse(format!("config: {e}")))
    }
}

/// Space in which baked bone transforms are keyed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySpace {
    /// Relative to the puppet parent bone (or the puppet root for top-level bones).
    #[default]
    Local,
    /// Absolute world transform.
    World,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    pub space: KeySpace,
    pub location: bool,
    pub rotation: bool,
    pub scale: bool,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            space: KeySpace::Local,
            location: true,
            rotation: true,
            scale: true,
        }
    }
}
