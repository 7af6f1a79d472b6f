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

//! Per-node memoization of computed property values

use super::{CacheMode, CacheProperty};
use crate::model::Value;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Identifies one request; request-scoped values are reused only within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone)]
enum Stored {
    Permanent(Value),
    Request(RequestId, Value),
}

/// Memoizes computed values per property according to a cache mode.
///
/// The mode is supplied on every call, usually from
/// [`effective_policy`](super::effective_policy). The lock is not held while
/// computing, so a compute function may read other properties of the same node.
#[derive(Debug, Default)]
pub struct PropertyCache {
    entries: Mutex<FxHashMap<CacheProperty, Stored>>,
}

impl PropertyCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value of `property` if `mode` allows reusing it in `request`,
    /// otherwise compute it and store the result as `mode` dictates
    pub fn get_or_compute<F, E>(
        &self,
        property: CacheProperty,
        mode: CacheMode,
        request: RequestId,
        compute: F,
    ) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
    {
        if !mode.is_cached() {
            return compute();
        }

        let hit = match (mode, self.entries.lock().get(&property)) {
            (CacheMode::On, Some(Stored::Permanent(value))) => Some(value.clone()),
            (CacheMode::RequestScoped, Some(Stored::Request(id, value))) if *id == request => {
                Some(value.clone())
            }
            _ => None,
        };
        if let Some(value) = hit {
            return Ok(value);
        }

        let value = compute()?;
        let stored = match mode {
            CacheMode::RequestScoped => Stored::Request(request, value.clone()),
            _ => Stored::Permanent(value.clone()),
        };
        self.entries.lock().insert(property, stored);
        Ok(value)
    }

    /// Forget the stored value of one property
    pub fn invalidate(&self, property: CacheProperty) {
        self.entries.lock().remove(&property);
    }

    /// Forget all stored values
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Whether a value is stored for `property`
    pub fn contains(&self, property: CacheProperty) -> bool {
        self.entries.lock().contains_key(&property)
    }
}
