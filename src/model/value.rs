//! Runtime values flowing through expression evaluation

use super::{NodeType, PmNode};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Host object reachable from an expression.
///
/// Implemented for every `Send + Sync + Debug` type; accessors for a bean
/// type are registered in an [`AccessorRegistry`](crate::accessor::AccessorRegistry).
/// Setters rely on interior mutability since beans are shared behind `Arc`.
pub trait Bean: Any + Send + Sync + fmt::Debug {
    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type
    fn bean_type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync + fmt::Debug> Bean for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn bean_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Runtime type identity used for accessor lookup.
///
/// Node types compare by identity: two declarations sharing a name are
/// different types. Host types compare by [`TypeId`].
#[derive(Clone)]
pub enum TypeKey {
    /// Boolean values
    Boolean,
    /// Integer values
    Integer,
    /// String values
    String,
    /// Presentation-model node of the given node type
    Node(Arc<NodeType>),
    /// Host bean type
    Native {
        /// Rust type id
        id: TypeId,
        /// Rust type name, for messages
        name: &'static str,
    },
}

impl TypeKey {
    /// Key for a host bean type
    pub fn native<T: Any>() -> Self {
        TypeKey::Native {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Key for a node type
    pub fn node(node_type: &Arc<NodeType>) -> Self {
        TypeKey::Node(Arc::clone(node_type))
    }

    /// Readable type name
    pub fn name(&self) -> &str {
        match self {
            TypeKey::Boolean => "Boolean",
            TypeKey::Integer => "Integer",
            TypeKey::String => "String",
            TypeKey::Node(node_type) => node_type.name(),
            TypeKey::Native { name, .. } => name,
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeKey::Boolean, TypeKey::Boolean)
            | (TypeKey::Integer, TypeKey::Integer)
            | (TypeKey::String, TypeKey::String) => true,
            (TypeKey::Node(a), TypeKey::Node(b)) => Arc::ptr_eq(a, b),
            (TypeKey::Native { id: a, .. }, TypeKey::Native { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TypeKey::Node(node_type) => Arc::as_ptr(node_type).hash(state),
            TypeKey::Native { id, .. } => id.hash(state),
            TypeKey::Boolean | TypeKey::Integer | TypeKey::String => {}
        }
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Node(node_type) => f.debug_tuple("Node").field(&node_type.name()).finish(),
            TypeKey::Native { name, .. } => f.debug_tuple("Native").field(name).finish(),
            _ => f.write_str(self.name()),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value produced or consumed by an expression.
///
/// `Null` doubles as the absent result of optional misses.
#[derive(Clone, Default)]
pub enum Value {
    /// No value
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// String value
    String(Arc<str>),
    /// Node of a presentation-model tree
    Node(Arc<PmNode>),
    /// Host object
    Object(Arc<dyn Bean>),
}

impl Value {
    /// Wrap a host object
    pub fn object<T: Bean>(bean: T) -> Self {
        Value::Object(Arc::new(bean))
    }

    /// Check for null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type, `None` for null
    pub fn type_key(&self) -> Option<TypeKey> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(TypeKey::Boolean),
            Value::Integer(_) => Some(TypeKey::Integer),
            Value::String(_) => Some(TypeKey::String),
            Value::Node(node) => Some(TypeKey::node(node.node_type())),
            Value::Object(bean) => {
                let bean: &dyn Bean = bean.as_ref();
                Some(TypeKey::Native {
                    id: bean.as_any().type_id(),
                    name: bean.bean_type_name(),
                })
            }
        }
    }

    /// Readable type name, `"Null"` for null
    pub fn type_name(&self) -> String {
        self.type_key()
            .map(|key| key.name().to_string())
            .unwrap_or_else(|| "Null".to_string())
    }

    /// Get the boolean if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer if this is an integer value
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the string if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the node if this is a node value
    pub fn as_node(&self) -> Option<&Arc<PmNode>> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Downcast a host object to its concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(bean) => {
                let bean: &dyn Bean = bean.as_ref();
                bean.as_any().downcast_ref::<T>()
            }
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Node(node) => f.debug_tuple("Node").field(&node.path()).finish(),
            Value::Object(bean) => f.debug_tuple("Object").field(bean).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::String(s) => f.write_str(s),
            Value::Node(node) => f.write_str(&node.path()),
            Value::Object(bean) => write!(f, "{bean:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<Arc<PmNode>> for Value {
    fn from(node: Arc<PmNode>) -> Self {
        Value::Node(node)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
