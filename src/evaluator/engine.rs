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

//! Expression engine - the main entry point for evaluating path expressions

use super::EvaluationContext;
use crate::accessor::{AccessorResolver, CachingResolver, ResolverCacheStats};
use crate::ast::Expression;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::{PmNode, Value};
use crate::parser::parse_with_config;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

type MemoizingResolver = CachingResolver<Arc<dyn AccessorResolver>>;

/// Parses, caches and evaluates path expressions.
///
/// Compiled expressions are kept in an LRU cache keyed by their source text.
/// The engine is `Send + Sync` and can be shared between threads.
pub struct ExpressionEngine {
    config: EngineConfig,
    resolver: Arc<dyn AccessorResolver>,
    memo: Option<Arc<MemoizingResolver>>,
    compiled: Option<Mutex<LruCache<String, Arc<Expression>>>>,
}

impl ExpressionEngine {
    /// Create an engine with the default configuration
    pub fn new(resolver: Arc<dyn AccessorResolver>) -> Self {
        Self::build(resolver, EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(resolver: Arc<dyn AccessorResolver>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(resolver, config))
    }

    fn build(resolver: Arc<dyn AccessorResolver>, config: EngineConfig) -> Self {
        let memo = config
            .memoize_accessors
            .then(|| Arc::new(CachingResolver::new(Arc::clone(&resolver))));
        let resolver: Arc<dyn AccessorResolver> = match &memo {
            Some(memo) => Arc::clone(memo) as Arc<dyn AccessorResolver>,
            None => resolver,
        };
        let compiled = NonZeroUsize::new(config.ast_cache_size)
            .map(|capacity| Mutex::new(LruCache::new(capacity)));

        Self {
            config,
            resolver,
            memo,
            compiled,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse an expression, reusing a cached parse of the same text
    pub fn compile(&self, text: &str) -> Result<Arc<Expression>> {
        let Some(compiled) = &self.compiled else {
            return Ok(Arc::new(parse_with_config(text, &self.config.parser)?));
        };

        if let Some(expr) = compiled.lock().get(text) {
            return Ok(Arc::clone(expr));
        }

        let expr = Arc::new(parse_with_config(text, &self.config.parser)?);
        if let Some((evicted, _)) = compiled.lock().push(text.to_string(), Arc::clone(&expr)) {
            if evicted != text {
                log::debug!("evicted compiled expression '{evicted}'");
            }
        }
        Ok(expr)
    }

    /// Context starting at a presentation-model node
    pub fn node_context(&self, node: &Arc<PmNode>) -> EvaluationContext {
        EvaluationContext::for_node(node, Arc::clone(&self.resolver))
    }

    /// Context over a plain value
    pub fn plain_context(&self, value: Value) -> EvaluationContext {
        EvaluationContext::plain(value, Arc::clone(&self.resolver))
    }

    /// Compile and evaluate `text` against `ctx`
    pub fn evaluate(&self, text: &str, ctx: &EvaluationContext) -> Result<Value> {
        let expr = self.compile(text)?;
        Ok(expr.evaluate(ctx)?)
    }

    /// Compile and evaluate `text` starting at `node`
    pub fn evaluate_on_node(&self, text: &str, node: &Arc<PmNode>) -> Result<Value> {
        self.evaluate(text, &self.node_context(node))
    }

    /// Compile `text` and assign `value` to the location it denotes
    pub fn assign(&self, text: &str, ctx: &EvaluationContext, value: Value) -> Result<()> {
        let expr = self.compile(text)?;
        Ok(expr.assign(ctx, value)?)
    }

    /// Number of compiled expressions currently cached
    pub fn cached_expressions(&self) -> usize {
        self.compiled.as_ref().map_or(0, |cache| cache.lock().len())
    }

    /// Accessor memoization statistics, `None` when memoization is disabled
    pub fn resolver_stats(&self) -> Option<ResolverCacheStats> {
        self.memo.as_ref().map(|memo| memo.stats())
    }
}

impl std::fmt::Debug for ExpressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionEngine")
            .field("config", &self.config)
            .field("cached_expressions", &self.cached_expressions())
            .finish_non_exhaustive()
    }
}
