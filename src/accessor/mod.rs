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

//! Accessor resolution
//!
//! An [`Accessor`] is a read capability, optionally paired with a write
//! capability, bound to one `(type, name)` pair. [`AccessorResolver`] finds
//! accessors; resolution is a pure function of its inputs, so results may be
//! memoized ([`CachingResolver`]).

mod caching;
mod registry;

pub use caching::{CachingResolver, ResolverCacheStats};
pub use registry::{AccessorRegistry, BeanAccessors};

use crate::evaluator::{EvaluationError, EvaluationResult};
use crate::model::{TypeKey, Value};
use std::fmt;
use std::sync::Arc;

/// Read half of an accessor
pub type ReadFn = dyn Fn(&Value) -> EvaluationResult<Value> + Send + Sync;

/// Write half of an accessor
pub type WriteFn = dyn Fn(&Value, Value) -> EvaluationResult<()> + Send + Sync;

/// Resolved property of one runtime type
#[derive(Clone)]
pub struct Accessor {
    owner: TypeKey,
    name: Arc<str>,
    read: Arc<ReadFn>,
    write: Option<Arc<WriteFn>>,
}

impl Accessor {
    /// Create a read-only accessor
    pub fn read_only<R>(owner: TypeKey, name: impl Into<Arc<str>>, read: R) -> Self
    where
        R: Fn(&Value) -> EvaluationResult<Value> + Send + Sync + 'static,
    {
        Self {
            owner,
            name: name.into(),
            read: Arc::new(read),
            write: None,
        }
    }

    /// Add a write capability
    pub fn with_write<W>(mut self, write: W) -> Self
    where
        W: Fn(&Value, Value) -> EvaluationResult<()> + Send + Sync + 'static,
    {
        self.write = Some(Arc::new(write));
        self
    }

    /// Type the accessor belongs to
    pub fn owner(&self) -> &TypeKey {
        &self.owner
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the property can be written
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Read the property from `target`
    pub fn read(&self, target: &Value) -> EvaluationResult<Value> {
        (self.read)(target)
    }

    /// Write the property on `target`
    pub fn write(&self, target: &Value, value: Value) -> EvaluationResult<()> {
        match &self.write {
            Some(write) => write(target, value),
            None => Err(EvaluationError::NotAssignable {
                expression: format!("{}.{}", self.owner, self.name),
            }),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// Locates accessors for a runtime type and a property name.
///
/// Matching is exact and case-sensitive. Implementations must answer the
/// same way for the same `(type, name)` pair so results can be memoized.
pub trait AccessorResolver: Send + Sync {
    /// Resolve `name` on `type_key`, `None` when the type has no such property
    fn resolve(&self, type_key: &TypeKey, name: &str) -> Option<Accessor>;
}

impl<R: AccessorResolver + ?Sized> AccessorResolver for Arc<R> {
    fn resolve(&self, type_key: &TypeKey, name: &str) -> Option<Accessor> {
        (**self).resolve(type_key, name)
    }
}
