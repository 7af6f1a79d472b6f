// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cache modes and cacheable properties

use crate::error::ContractViolation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caching decision for one property.
///
/// Variants compare by identity only; their order is not a priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// No decision at this declaration site
    #[default]
    Unspecified,
    /// Recompute on every request
    Off,
    /// Keep the computed value until explicitly cleared
    On,
    /// Keep the computed value for the duration of one request
    RequestScoped,
}

impl CacheMode {
    /// Whether this mode is a decision
    pub fn is_specified(self) -> bool {
        self != CacheMode::Unspecified
    }

    /// Whether computed values are stored at all
    pub fn is_cached(self) -> bool {
        matches!(self, CacheMode::On | CacheMode::RequestScoped)
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheMode::Unspecified => "unspecified",
            CacheMode::Off => "off",
            CacheMode::On => "on",
            CacheMode::RequestScoped => "request_scoped",
        })
    }
}

/// Computed UI property whose caching can be declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheProperty {
    /// Whether the element is shown
    Visibility,
    /// Whether the element accepts input
    Enablement,
    /// Display title
    Title,
    /// Current value
    Value,
    /// Selectable options
    Options,
}

impl CacheProperty {
    /// All recognized properties
    pub const ALL: [CacheProperty; 5] = [
        CacheProperty::Visibility,
        CacheProperty::Enablement,
        CacheProperty::Title,
        CacheProperty::Value,
        CacheProperty::Options,
    ];

    /// Property name as used in declarations
    pub fn as_str(self) -> &'static str {
        match self {
            CacheProperty::Visibility => "visibility",
            CacheProperty::Enablement => "enablement",
            CacheProperty::Title => "title",
            CacheProperty::Value => "value",
            CacheProperty::Options => "options",
        }
    }
}

impl FromStr for CacheProperty {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheProperty::ALL
            .into_iter()
            .find(|property| property.as_str() == s)
            .ok_or_else(|| ContractViolation::new(format!("unknown cache property '{s}'")))
    }
}

impl fmt::Display for CacheProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
