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

//! Shared fixtures for integration tests

#![allow(dead_code)]

use parking_lot::RwLock;
use pm_expr::{AccessorRegistry, NodeType, PmNode, Value};
use std::sync::Arc;

/// Host object with a writable name and an optional address
#[derive(Debug)]
pub struct Customer {
    pub name: RwLock<String>,
    pub address: RwLock<Option<Arc<Address>>>,
}

/// Host object with a writable city
#[derive(Debug)]
pub struct Address {
    pub city: RwLock<String>,
}

pub fn customer(name: &str, city: Option<&str>) -> Arc<Customer> {
    Arc::new(Customer {
        name: RwLock::new(name.to_string()),
        address: RwLock::new(city.map(|city| {
            Arc::new(Address {
                city: RwLock::new(city.to_string()),
            })
        })),
    })
}

/// Route library logging to the test output; safe to call repeatedly
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A bare host object without any registered accessors
#[derive(Debug)]
pub struct Opaque;

pub struct Shop {
    pub registry: Arc<AccessorRegistry>,
    pub shop: Arc<PmNode>,
    pub order: Arc<PmNode>,
    pub customer_node: Arc<PmNode>,
}

pub fn registry() -> AccessorRegistry {
    let mut registry = AccessorRegistry::new();
    registry
        .bean::<Customer>()
        .property(
            "name",
            |c| Value::from(c.name.read().clone()),
            |c, value| {
                *c.name.write() = value.to_string();
                Ok(())
            },
        )
        .getter("address", |c| match c.address.read().as_ref() {
            Some(address) => Value::Object(address.clone()),
            None => Value::Null,
        });
    registry.bean::<Address>().property(
        "city",
        |a| Value::from(a.city.read().clone()),
        |a, value| {
            *a.city.write() = value.to_string();
            Ok(())
        },
    );
    registry
}

/// `shop` root with an `order` node holding a `customer` node whose `bean`
/// property refers to a host [`Customer`]
pub fn shop(customer: Arc<Customer>) -> Shop {
    let base = NodeType::builder("BasePm").property("label").build();
    let customer_type = NodeType::builder("CustomerPm")
        .extends(&base)
        .property("bean")
        .build();
    let order_type = NodeType::builder("OrderPm")
        .extends(&base)
        .child("customer")
        .property("note")
        .build();
    let shop_type = NodeType::builder("ShopPm").child("order").build();

    let shop = PmNode::root("shop", &shop_type);
    shop.define_variable("total", Value::from(42));
    shop.define_constant("currency", Value::from("EUR"));

    let order = shop.add_child("order", &order_type);
    let customer_node = order.add_child("customer", &customer_type);
    customer_node.set_property("bean", Value::Object(customer));

    Shop {
        registry: Arc::new(registry()),
        shop,
        order,
        customer_node,
    }
}
