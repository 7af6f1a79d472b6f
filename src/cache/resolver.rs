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

//! Effective cache policy resolution
//!
//! Fragments are scanned in precedence order. The first fragment that decides
//! the property (named slot first, catch-all second) wins; fragments without a
//! decision are skipped. When nothing decides, the caller's default applies.

use super::{CacheMode, CacheProperty, DeclarationFragment, PolicyDefaults};
use crate::error::ContractViolation;
use std::borrow::Borrow;

/// Resolve the effective cache mode of `property`.
///
/// Iteration stops at the first deciding fragment, so lazily produced
/// fragments after it are never requested.
pub fn resolve_policy<I>(property: CacheProperty, fragments: I, default: CacheMode) -> CacheMode
where
    I: IntoIterator,
    I::Item: Borrow<DeclarationFragment>,
{
    let decision = fragments
        .into_iter()
        .find_map(|fragment| fragment.borrow().decide(property));

    match decision {
        Some(mode) => {
            log::debug!("cache policy for {property}: {mode}");
            mode
        }
        None => {
            log::debug!("cache policy for {property}: default {default}");
            default
        }
    }
}

/// Resolve the effective cache mode of a property given by name.
///
/// Unknown names are rejected before any fragment is inspected.
pub fn resolve_policy_named<I>(
    property: &str,
    fragments: I,
    default: CacheMode,
) -> Result<CacheMode, ContractViolation>
where
    I: IntoIterator,
    I::Item: Borrow<DeclarationFragment>,
{
    let property = property.parse::<CacheProperty>()?;
    Ok(resolve_policy(property, fragments, default))
}

/// Effective cache modes of all properties at one binding site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectivePolicies {
    visibility: CacheMode,
    enablement: CacheMode,
    title: CacheMode,
    value: CacheMode,
    options: CacheMode,
}

impl EffectivePolicies {
    /// Resolve every property against the same fragments
    pub fn resolve(fragments: &[DeclarationFragment], defaults: &PolicyDefaults) -> Self {
        let resolve = |property| resolve_policy(property, fragments, defaults.get(property));
        Self {
            visibility: resolve(CacheProperty::Visibility),
            enablement: resolve(CacheProperty::Enablement),
            title: resolve(CacheProperty::Title),
            value: resolve(CacheProperty::Value),
            options: resolve(CacheProperty::Options),
        }
    }

    /// Effective mode of `property`
    pub fn get(&self, property: CacheProperty) -> CacheMode {
        match property {
            CacheProperty::Visibility => self.visibility,
            CacheProperty::Enablement => self.enablement,
            CacheProperty::Title => self.title,
            CacheProperty::Value => self.value,
            CacheProperty::Options => self.options,
        }
    }
}
