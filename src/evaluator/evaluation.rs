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

//! Expression evaluation and assignment
//!
//! # Name resolution
//!
//! An attribute-or-variable name is resolved in two stages against the
//! runtime type of the current value:
//!
//! 1. look up an accessor for `(type, name)`;
//! 2. if there is none, node contexts fall back to a named variable, while
//!    plain contexts report the name as unresolved (or yield null when the
//!    name is optional).
//!
//! The decision is recomputed from the resolver on every call, so a value
//! whose runtime type changes between evaluations is always resolved against
//! its current type. Resolvers may memoize per `(type, name)`.
//!
//! # Null navigation
//!
//! When a chain step other than the last yields null, the chain stops. The
//! result is null if that step or the step that would navigate on the null is
//! optional, otherwise [`EvaluationError::NullNavigation`].

use super::{EvaluationContext, EvaluationError, EvaluationResult};
use crate::accessor::Accessor;
use crate::ast::{
    AttributeOrVariableExpression, ChainExpression, Expression, NameWithModifier,
    VariableExpression,
};
use crate::model::{TypeKey, Value};

impl Expression {
    /// Evaluate the expression against `ctx`
    pub fn evaluate(&self, ctx: &EvaluationContext) -> EvaluationResult<Value> {
        match self {
            Expression::This => Ok(ctx.current_value().clone()),
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Variable(expr) => expr.evaluate(ctx),
            Expression::AttributeOrVariable(expr) => expr.evaluate(ctx),
            Expression::Chain(chain) => chain.evaluate(ctx),
        }
    }

    /// Assign `value` to the location the expression denotes
    pub fn assign(&self, ctx: &EvaluationContext, value: Value) -> EvaluationResult<()> {
        match self {
            Expression::This | Expression::Literal(_) => Err(EvaluationError::NotAssignable {
                expression: self.to_string(),
            }),
            Expression::Variable(expr) => expr.assign(ctx, value),
            Expression::AttributeOrVariable(expr) => expr.assign(ctx, value),
            Expression::Chain(chain) => chain.assign(ctx, value),
        }
    }
}

fn read_variable(name: &NameWithModifier, ctx: &EvaluationContext) -> EvaluationResult<Value> {
    match ctx.find_variable(name.name()) {
        Some(variable) => Ok(variable.get()),
        None if name.is_optional() => Ok(Value::Null),
        None => Err(EvaluationError::UnresolvedVariable {
            name: name.name().to_string(),
        }),
    }
}

fn write_variable(
    name: &NameWithModifier,
    ctx: &EvaluationContext,
    value: Value,
) -> EvaluationResult<()> {
    match ctx.find_variable(name.name()) {
        Some(variable) => {
            if !variable.set(value) {
                log::debug!("ignoring assignment to read-only variable '{}'", name.name());
            }
            Ok(())
        }
        None if name.is_optional() => Ok(()),
        None => Err(EvaluationError::UnresolvedVariable {
            name: name.name().to_string(),
        }),
    }
}

impl VariableExpression {
    /// Read the variable visible from the context's originating node
    pub fn evaluate(&self, ctx: &EvaluationContext) -> EvaluationResult<Value> {
        read_variable(self.name(), ctx)
    }

    /// Write the variable; read-only variables silently keep their value
    pub fn assign(&self, ctx: &EvaluationContext, value: Value) -> EvaluationResult<()> {
        write_variable(self.name(), ctx, value)
    }
}

/// Outcome of resolving an attribute-or-variable name against one runtime type
enum Resolution {
    Attribute(Accessor),
    Variable,
    Unresolved(TypeKey),
}

impl AttributeOrVariableExpression {
    fn resolve(&self, ctx: &EvaluationContext, type_key: TypeKey) -> Resolution {
        let name = self.name().name();
        match ctx.resolver().resolve(&type_key, name) {
            Some(accessor) => {
                log::trace!("'{name}' resolved as attribute of {type_key}");
                Resolution::Attribute(accessor)
            }
            None if ctx.supports_variables() => {
                log::trace!("'{name}' is no attribute of {type_key}, trying variables");
                Resolution::Variable
            }
            None => Resolution::Unresolved(type_key),
        }
    }

    fn null_target(&self) -> EvaluationResult<()> {
        if self.name().is_optional() {
            Ok(())
        } else {
            Err(EvaluationError::NullNavigation {
                path: self.name().to_string(),
            })
        }
    }

    fn unresolved(&self, type_key: &TypeKey) -> EvaluationError {
        EvaluationError::UnresolvedName {
            name: self.name().name().to_string(),
            type_name: type_key.to_string(),
        }
    }

    /// Read the attribute, or the variable when the current value has no such attribute
    pub fn evaluate(&self, ctx: &EvaluationContext) -> EvaluationResult<Value> {
        let Some(type_key) = ctx.current_value().type_key() else {
            return self.null_target().map(|_| Value::Null);
        };

        match self.resolve(ctx, type_key) {
            Resolution::Attribute(accessor) => accessor.read(ctx.current_value()),
            Resolution::Variable => read_variable(self.name(), ctx),
            Resolution::Unresolved(_) if self.name().is_optional() => Ok(Value::Null),
            Resolution::Unresolved(type_key) => Err(self.unresolved(&type_key)),
        }
    }

    /// Write the attribute, or the variable when the current value has no such attribute
    pub fn assign(&self, ctx: &EvaluationContext, value: Value) -> EvaluationResult<()> {
        let Some(type_key) = ctx.current_value().type_key() else {
            return self.null_target();
        };

        match self.resolve(ctx, type_key) {
            Resolution::Attribute(accessor) => {
                if !accessor.is_writable() {
                    return Err(EvaluationError::NotAssignable {
                        expression: self.name().to_string(),
                    });
                }
                accessor.write(ctx.current_value(), value)
            }
            Resolution::Variable => write_variable(self.name(), ctx, value),
            Resolution::Unresolved(_) if self.name().is_optional() => Ok(()),
            Resolution::Unresolved(type_key) => Err(self.unresolved(&type_key)),
        }
    }
}

impl ChainExpression {
    /// Evaluate all steps left to right
    pub fn evaluate(&self, ctx: &EvaluationContext) -> EvaluationResult<Value> {
        let Some((last, _)) = self.segments().split_last() else {
            return Ok(ctx.current_value().clone());
        };
        match self.navigate(ctx)? {
            Some(target) => last.evaluate(&target),
            None => Ok(Value::Null),
        }
    }

    /// Resolve all but the last step read-only, then assign through the last step
    pub fn assign(&self, ctx: &EvaluationContext, value: Value) -> EvaluationResult<()> {
        let Some((last, _)) = self.segments().split_last() else {
            return Err(EvaluationError::NotAssignable {
                expression: self.to_string(),
            });
        };
        match self.navigate(ctx)? {
            Some(target) => last.assign(&target, value),
            None => Ok(()),
        }
    }

    /// Context positioned on the value the last step applies to; `None` when
    /// an optional step stopped navigation at a null value
    fn navigate(&self, ctx: &EvaluationContext) -> EvaluationResult<Option<EvaluationContext>> {
        let segments = self.segments();
        let mut current = ctx.clone();

        for (index, step) in segments.iter().enumerate().take(segments.len().saturating_sub(1)) {
            let value = step.evaluate(&current)?;
            if value.is_null() {
                let next = &segments[index + 1];
                if step.is_optional() || next.is_optional() {
                    return Ok(None);
                }
                return Err(EvaluationError::NullNavigation {
                    path: self.render_prefix(index + 1),
                });
            }
            current = current.with_current_value(value);
        }

        Ok(Some(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::AccessorRegistry;
    use crate::model::{NodeType, PmNode};
    use crate::parser::parse;
    use parking_lot::RwLock;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Customer {
        name: RwLock<String>,
        address: RwLock<Option<Arc<Address>>>,
    }

    #[derive(Debug)]
    struct Address {
        city: String,
    }

    fn registry() -> Arc<AccessorRegistry> {
        let mut registry = AccessorRegistry::new();
        registry
            .bean::<Customer>()
            .property(
                "name",
                |c| Value::from(c.name.read().clone()),
                |c, v| {
                    *c.name.write() = v.to_string();
                    Ok(())
                },
            )
            .getter("address", |c| match c.address.read().as_ref() {
                Some(address) => Value::Object(address.clone()),
                None => Value::Null,
            });
        registry
            .bean::<Address>()
            .getter("city", |a| Value::from(a.city.as_str()));
        Arc::new(registry)
    }

    fn customer(address: Option<&str>) -> Value {
        Value::object(Customer {
            name: RwLock::new("Ada".to_string()),
            address: RwLock::new(address.map(|city| {
                Arc::new(Address {
                    city: city.to_string(),
                })
            })),
        })
    }

    fn eval(text: &str, ctx: &EvaluationContext) -> EvaluationResult<Value> {
        parse(text).unwrap().evaluate(ctx)
    }

    #[test]
    fn test_this_and_literals() {
        let ctx = EvaluationContext::plain(Value::from(5), registry());
        assert_eq!(eval("", &ctx).unwrap(), Value::from(5));
        assert_eq!(eval("'x'", &ctx).unwrap(), Value::from("x"));
        assert!(matches!(
            parse("").unwrap().assign(&ctx, Value::Null),
            Err(EvaluationError::NotAssignable { .. })
        ));
        assert!(matches!(
            parse("7").unwrap().assign(&ctx, Value::Null),
            Err(EvaluationError::NotAssignable { .. })
        ));
    }

    #[test]
    fn test_attribute_chain() {
        let ctx = EvaluationContext::plain(customer(Some("Berlin")), registry());
        assert_eq!(eval("address.city", &ctx).unwrap(), Value::from("Berlin"));
        assert_eq!(eval("name", &ctx).unwrap(), Value::from("Ada"));
    }

    #[test]
    fn test_null_navigation() {
        let ctx = EvaluationContext::plain(customer(None), registry());
        assert_eq!(
            eval("address.city", &ctx).unwrap_err(),
            EvaluationError::NullNavigation {
                path: "address".to_string()
            }
        );
        assert_eq!(eval("?address.city", &ctx).unwrap(), Value::Null);
        assert_eq!(eval("address.?city", &ctx).unwrap(), Value::Null);
        // A null at the end of the chain is a plain result
        assert_eq!(eval("address", &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_unresolved_names_on_plain_context() {
        let ctx = EvaluationContext::plain(customer(None), registry());
        let type_name = std::any::type_name::<Customer>().to_string();

        assert_eq!(
            eval("phone", &ctx).unwrap_err(),
            EvaluationError::UnresolvedName {
                name: "phone".to_string(),
                type_name
            }
        );
        assert_eq!(eval("?phone", &ctx).unwrap(), Value::Null);
        assert_eq!(eval("?phone.number", &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_assignment() {
        let ctx = EvaluationContext::plain(customer(Some("Berlin")), registry());
        parse("name").unwrap().assign(&ctx, Value::from("Grace")).unwrap();
        assert_eq!(eval("name", &ctx).unwrap(), Value::from("Grace"));

        assert_eq!(
            parse("address").unwrap().assign(&ctx, Value::Null).unwrap_err(),
            EvaluationError::NotAssignable {
                expression: "address".to_string()
            }
        );
        assert_eq!(
            parse("address.city")
                .unwrap()
                .assign(&ctx, Value::from("Paris"))
                .unwrap_err(),
            EvaluationError::NotAssignable {
                expression: "city".to_string()
            }
        );
        parse("?phone").unwrap().assign(&ctx, Value::from("1")).unwrap();
    }

    #[test]
    fn test_runtime_type_change_is_rechecked() {
        let expr = parse("city").unwrap();
        let registry = registry();

        let address = Value::object(Address {
            city: "Rome".to_string(),
        });
        let ctx = EvaluationContext::plain(address, registry.clone());
        assert_eq!(expr.evaluate(&ctx).unwrap(), Value::from("Rome"));

        // Same expression instance, different runtime type
        let ctx = EvaluationContext::plain(customer(None), registry);
        assert!(matches!(
            expr.evaluate(&ctx),
            Err(EvaluationError::UnresolvedName { .. })
        ));
    }

    #[test]
    fn test_variable_fallback_on_node_context() {
        let order_type = NodeType::builder("OrderPm").property("total").build();
        let registry = AccessorRegistry::new();

        let order = PmNode::root("order", &order_type);
        order.set_property("total", Value::from(10));
        order.define_variable("total", Value::from(99));
        order.define_variable("currency", Value::from("EUR"));

        let ctx = EvaluationContext::for_node(&order, Arc::new(registry));
        // Attribute wins over a variable of the same name
        assert_eq!(eval("total", &ctx).unwrap(), Value::from(10));
        assert_eq!(eval("$total", &ctx).unwrap(), Value::from(99));
        assert_eq!(eval("currency", &ctx).unwrap(), Value::from("EUR"));
        assert_eq!(
            eval("rate", &ctx).unwrap_err(),
            EvaluationError::UnresolvedVariable {
                name: "rate".to_string()
            }
        );
        assert_eq!(eval("?rate", &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_variable_on_plain_context() {
        let ctx = EvaluationContext::plain(customer(None), registry());
        assert_eq!(
            eval("$total", &ctx).unwrap_err(),
            EvaluationError::UnresolvedVariable {
                name: "total".to_string()
            }
        );
        assert_eq!(eval("?$total", &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_null_current_value() {
        let ctx = EvaluationContext::plain(Value::Null, registry());
        assert_eq!(eval("?name", &ctx).unwrap(), Value::Null);
        assert_eq!(
            eval("name", &ctx).unwrap_err(),
            EvaluationError::NullNavigation {
                path: "name".to_string()
            }
        );
    }
}
