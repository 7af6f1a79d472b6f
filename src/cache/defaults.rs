//! Application-wide default cache modes

use super::{CacheMode, CacheProperty};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default cache mode per property, applied when no declaration decides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDefaults {
    /// Default for visibility
    pub visibility: CacheMode,
    /// Default for enablement
    pub enablement: CacheMode,
    /// Default for titles
    pub title: CacheMode,
    /// Default for values
    pub value: CacheMode,
    /// Default for options
    pub options: CacheMode,
}

impl PolicyDefaults {
    /// Same default for every property
    pub fn uniform(mode: CacheMode) -> Self {
        Self {
            visibility: mode,
            enablement: mode,
            title: mode,
            value: mode,
            options: mode,
        }
    }

    /// Default for `property`
    pub fn get(&self, property: CacheProperty) -> CacheMode {
        match property {
            CacheProperty::Visibility => self.visibility,
            CacheProperty::Enablement => self.enablement,
            CacheProperty::Title => self.title,
            CacheProperty::Value => self.value,
            CacheProperty::Options => self.options,
        }
    }

    /// Override the default for one property
    pub fn with(mut self, property: CacheProperty, mode: CacheMode) -> Self {
        match property {
            CacheProperty::Visibility => self.visibility = mode,
            CacheProperty::Enablement => self.enablement = mode,
            CacheProperty::Title => self.title = mode,
            CacheProperty::Value => self.value = mode,
            CacheProperty::Options => self.options = mode,
        }
        self
    }

    /// Load defaults from JSON; missing properties default to `off`
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self::uniform(CacheMode::Off)
    }
}
