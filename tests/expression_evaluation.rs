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

//! Integration tests for evaluating and assigning path expressions

use pm_expr::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

mod utils;
use utils::{Opaque, customer, init_logging, registry, shop};

fn plain_engine() -> ExpressionEngine {
    ExpressionEngine::new(Arc::new(registry()))
}

#[test]
fn optional_missing_attribute_on_plain_context_is_absent() {
    let engine = plain_engine();
    let ctx = engine.plain_context(Value::object(Opaque));

    assert_eq!(engine.evaluate("?address.city", &ctx).unwrap(), Value::Null);
}

#[test]
fn missing_attribute_on_plain_context_is_unresolved() {
    let engine = plain_engine();
    let ctx = engine.plain_context(Value::object(Opaque));

    assert_eq!(
        engine.evaluate("address.city", &ctx).unwrap_err(),
        PmError::Evaluation(EvaluationError::UnresolvedName {
            name: "address".to_string(),
            type_name: std::any::type_name::<Opaque>().to_string(),
        })
    );
}

#[test]
fn variable_from_ancestor_on_node_context() {
    let shop = shop(customer("Ada", None));
    let engine = ExpressionEngine::new(shop.registry.clone());

    assert_eq!(
        engine.evaluate_on_node("$total", &shop.order).unwrap(),
        Value::from(42)
    );
    assert_eq!(
        engine.evaluate_on_node("$total", &shop.customer_node).unwrap(),
        Value::from(42)
    );
}

#[test]
fn variable_on_plain_context_is_unresolved() {
    let shop = shop(customer("Ada", None));
    let engine = ExpressionEngine::new(shop.registry.clone());
    let ctx = engine.plain_context(Value::Node(shop.order.clone()));

    assert_eq!(
        engine.evaluate("$total", &ctx).unwrap_err(),
        PmError::Evaluation(EvaluationError::UnresolvedVariable {
            name: "total".to_string()
        })
    );
}

#[test]
fn navigates_from_nodes_into_host_objects() {
    let shop = shop(customer("Ada", Some("Berlin")));
    let engine = ExpressionEngine::new(shop.registry.clone());

    assert_eq!(
        engine
            .evaluate_on_node("customer.bean.address.city", &shop.order)
            .unwrap(),
        Value::from("Berlin")
    );
    assert_eq!(
        engine.evaluate_on_node("order.customer.bean.name", &shop.shop).unwrap(),
        Value::from("Ada")
    );
}

#[rstest]
#[case("?missing")]
#[case("customer.?missing")]
#[case("customer.bean.?phone")]
#[case("customer.bean.address.?city")]
#[case("customer.bean.?address.city")]
#[case("label")]
fn optional_misses_yield_null(#[case] path: &str) {
    let shop = shop(customer("Ada", None));
    let engine = ExpressionEngine::new(shop.registry.clone());

    assert_eq!(engine.evaluate_on_node(path, &shop.order).unwrap(), Value::Null);
}

#[rstest]
#[case(
    "customer.bean.address.city",
    EvaluationError::NullNavigation { path: "customer.bean.address".to_string() }
)]
#[case(
    "missing",
    EvaluationError::UnresolvedVariable { name: "missing".to_string() }
)]
#[case(
    "customer.bean.phone.number",
    EvaluationError::UnresolvedVariable { name: "phone".to_string() }
)]
fn non_optional_misses_fail(#[case] path: &str, #[case] expected: EvaluationError) {
    let shop = shop(customer("Ada", None));
    let engine = ExpressionEngine::new(shop.registry.clone());

    assert_eq!(
        engine.evaluate_on_node(path, &shop.order).unwrap_err(),
        PmError::Evaluation(expected)
    );
}

#[test]
fn assignment_writes_last_segment() {
    let bean = customer("Ada", Some("Berlin"));
    let shop = shop(bean.clone());
    let engine = ExpressionEngine::new(shop.registry.clone());
    let ctx = engine.node_context(&shop.order);

    engine
        .assign("customer.bean.address.city", &ctx, Value::from("Hamburg"))
        .unwrap();
    engine.assign("note", &ctx, Value::from("fragile")).unwrap();

    assert_eq!(
        engine.evaluate("customer.bean.address.city", &ctx).unwrap(),
        Value::from("Hamburg")
    );
    assert_eq!(shop.order.property("note"), Value::from("fragile"));
    assert_eq!(*bean.name.read(), "Ada");
}

#[test]
fn failed_assignment_leaves_state_unchanged() {
    let bean = customer("Ada", None);
    let shop = shop(bean.clone());
    let engine = ExpressionEngine::new(shop.registry.clone());
    let ctx = engine.node_context(&shop.order);

    let err = engine
        .assign("customer.bean.address.city", &ctx, Value::from("Hamburg"))
        .unwrap_err();
    assert_eq!(
        err,
        PmError::Evaluation(EvaluationError::NullNavigation {
            path: "customer.bean.address".to_string()
        })
    );

    let err = engine
        .assign("customer.bean.nickname.name", &ctx, Value::from("Grace"))
        .unwrap_err();
    assert!(matches!(
        err,
        PmError::Evaluation(EvaluationError::UnresolvedVariable { .. })
    ));

    assert_eq!(*bean.name.read(), "Ada");
    assert!(bean.address.read().is_none());
}

#[test]
fn this_and_literals_are_not_assignable() {
    let engine = plain_engine();
    let ctx = engine.plain_context(Value::from(1));

    for text in ["", "  ", "'text'", "-3"] {
        assert!(
            matches!(
                engine.assign(text, &ctx, Value::Null),
                Err(PmError::Evaluation(EvaluationError::NotAssignable { .. }))
            ),
            "{text:?} should not be assignable"
        );
    }
    assert_eq!(engine.evaluate("", &ctx).unwrap(), Value::from(1));
    assert_eq!(engine.evaluate("'text'", &ctx).unwrap(), Value::from("text"));
}

#[test]
fn writable_variable_assignment() {
    let shop = shop(customer("Ada", None));
    let engine = ExpressionEngine::new(shop.registry.clone());
    let ctx = engine.node_context(&shop.order);

    engine.assign("$total", &ctx, Value::from(7)).unwrap();
    assert_eq!(engine.evaluate("total", &ctx).unwrap(), Value::from(7));
    assert_eq!(
        shop.shop.local_variable("total").unwrap().get(),
        Value::from(7)
    );
}

/// Writing a read-only variable is currently accepted and ignored. This keeps
/// callers that rely on the silent no-op working; it is tolerated behavior
/// rather than a guarantee.
#[test]
fn read_only_variable_write_is_tolerated_no_op() {
    init_logging();
    let shop = shop(customer("Ada", None));
    let engine = ExpressionEngine::new(shop.registry.clone());
    let ctx = engine.node_context(&shop.order);

    engine.assign("$currency", &ctx, Value::from("USD")).unwrap();
    engine.assign("currency", &ctx, Value::from("USD")).unwrap();

    assert_eq!(engine.evaluate("currency", &ctx).unwrap(), Value::from("EUR"));
}

#[test]
fn missing_variable_assignment_fails_unless_optional() {
    let shop = shop(customer("Ada", None));
    let engine = ExpressionEngine::new(shop.registry.clone());
    let ctx = engine.node_context(&shop.order);

    assert_eq!(
        engine.assign("$rate", &ctx, Value::from(1)).unwrap_err(),
        PmError::Evaluation(EvaluationError::UnresolvedVariable {
            name: "rate".to_string()
        })
    );
    engine.assign("?$rate", &ctx, Value::from(1)).unwrap();
    assert!(shop.order.find_variable("rate").is_none());
}

#[test]
fn parse_errors_surface_through_the_engine() {
    let engine = plain_engine();
    let ctx = engine.plain_context(Value::Null);

    assert!(matches!(
        engine.evaluate("customer..name", &ctx),
        Err(PmError::Parse(ParseError::ExpectedName { .. }))
    ));
    assert!(matches!(
        engine.evaluate("customer.", &ctx),
        Err(PmError::Parse(ParseError::ExpectedName { .. }))
    ));
}

#[test]
fn custom_delimiters() {
    let shop = shop(customer("Ada", None));
    let config = EngineConfig::default().with_parser(ParserConfig::new('~', '@', '/'));
    let engine = ExpressionEngine::with_config(shop.registry.clone(), config).unwrap();

    assert_eq!(
        engine.evaluate_on_node("customer/bean/name", &shop.order).unwrap(),
        Value::from("Ada")
    );
    assert_eq!(
        engine.evaluate_on_node("@total", &shop.order).unwrap(),
        Value::from(42)
    );
    assert_eq!(
        engine.evaluate_on_node("customer/~nothing", &shop.order).unwrap(),
        Value::Null
    );
}

#[test]
fn custom_delimiters_in_error_payloads() {
    let shop = shop(customer("Ada", None));
    let config = EngineConfig::default().with_parser(ParserConfig::new('~', '@', '/'));
    let engine = ExpressionEngine::with_config(shop.registry.clone(), config).unwrap();
    let ctx = engine.node_context(&shop.order);

    assert_eq!(
        engine.evaluate("customer/bean/address/city", &ctx).unwrap_err(),
        PmError::Evaluation(EvaluationError::NullNavigation {
            path: "customer/bean/address".to_string()
        })
    );
    assert_eq!(
        engine.assign("customer/bean/~address", &ctx, Value::Null).unwrap_err(),
        PmError::Evaluation(EvaluationError::NotAssignable {
            expression: "~address".to_string()
        })
    );

    // The reported path is valid syntax for the same engine
    let err = engine.evaluate("customer/bean/address/city", &ctx).unwrap_err();
    let PmError::Evaluation(EvaluationError::NullNavigation { path }) = err else {
        panic!("Expected null navigation, got {err:?}");
    };
    assert!(engine.compile(&path).is_ok());
}

#[test]
fn node_fields_resolve_from_the_node_own_type() {
    let base = NodeType::builder("BasePm").property("label").build();
    let order_type = NodeType::builder("OrderPm")
        .extends(&base)
        .child("line")
        .build();
    // Never mentioned to the registry
    let line_type = NodeType::builder("LinePm").property("quantity").build();

    let order = PmNode::root("order", &order_type);
    let line = order.add_child("line", &line_type);
    line.set_property("quantity", Value::from(3));

    let engine = ExpressionEngine::new(Arc::new(AccessorRegistry::new()));
    assert_eq!(
        engine.evaluate_on_node("line.quantity", &order).unwrap(),
        Value::from(3)
    );
    assert_eq!(
        engine.evaluate_on_node("label", &line).unwrap_err(),
        PmError::Evaluation(EvaluationError::UnresolvedVariable {
            name: "label".to_string()
        })
    );
}

#[test]
fn same_named_node_types_do_not_shadow_each_other() {
    let draft_type = NodeType::builder("OrderPm").property("note").build();
    let final_type = NodeType::builder("OrderPm").property("total").build();

    let draft = PmNode::root("draft", &draft_type);
    draft.set_property("note", Value::from("rush"));
    let order = PmNode::root("order", &final_type);
    order.set_property("total", Value::from(12));

    // One engine, one accessor memo for both types
    let engine = ExpressionEngine::new(Arc::new(registry()));
    assert_eq!(engine.evaluate_on_node("note", &draft).unwrap(), Value::from("rush"));
    assert_eq!(engine.evaluate_on_node("total", &order).unwrap(), Value::from(12));
    assert_eq!(engine.evaluate_on_node("?note", &order).unwrap(), Value::Null);
    assert_eq!(engine.evaluate_on_node("?total", &draft).unwrap(), Value::Null);
}

#[test]
fn engine_is_shared_across_threads() {
    init_logging();
    let shop = shop(customer("Ada", Some("Berlin")));
    let engine = ExpressionEngine::new(shop.registry.clone());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let city = engine
                        .evaluate_on_node("customer.bean.address.city", &shop.order)
                        .unwrap();
                    assert_eq!(city, Value::from("Berlin"));
                }
            });
        }
    });

    let stats = engine.resolver_stats().unwrap();
    assert!(stats.hits > 0);
    assert_eq!(engine.cached_expressions(), 1);
}
