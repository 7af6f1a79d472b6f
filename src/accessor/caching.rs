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

//! Memoizing accessor resolver

use super::{Accessor, AccessorResolver};
use crate::model::TypeKey;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics about accessor cache performance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverCacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of (type, name) pairs cached
    pub entries: usize,
}

impl ResolverCacheStats {
    /// Calculate cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            (self.hits as f64) / ((self.hits + self.misses) as f64) * 100.0
        }
    }
}

/// Resolver wrapper memoizing results per `(type, name)` pair.
///
/// Negative results are cached as well. An entry is never replaced once
/// written, so concurrent resolvers racing on the same key agree on the
/// stored accessor.
pub struct CachingResolver<R> {
    inner: R,
    cache: DashMap<(TypeKey, Arc<str>), Option<Accessor>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<R: AccessorResolver> CachingResolver<R> {
    /// Wrap a resolver
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The wrapped resolver
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Current cache statistics
    pub fn stats(&self) -> ResolverCacheStats {
        ResolverCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
        }
    }
}

impl<R: AccessorResolver> AccessorResolver for CachingResolver<R> {
    fn resolve(&self, type_key: &TypeKey, name: &str) -> Option<Accessor> {
        let key = (type_key.clone(), Arc::from(name));

        if let Some(hit) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.value().clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let resolved = self.inner.resolve(type_key, name);
        log::debug!(
            "accessor cache miss for {type_key}.{name}: {}",
            if resolved.is_some() { "resolved" } else { "not found" }
        );

        self.cache.entry(key).or_insert(resolved).value().clone()
    }
}
