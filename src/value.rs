//! The decoded value model.
//!
//! [`Value`] is a tagged union over everything the wire format can
//! carry. Composite values (list, map, object) are shared handles:
//! resolving a Ref clones the handle, never the contents, so a container
//! populated in place stays visible through every holder — including
//! itself, for genuinely cyclic graphs.
//!
//! Equality and hashing are **structural for primitive variants and by
//! instance identity for composite variants**. This diverges from
//! Rust's default deep equality on purpose: the wire format keys maps by
//! reference identity for composites, and deep equality cannot terminate
//! on cyclic values. For the same reason `Debug` prints composites
//! shallowly.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::class_registry::ObjectRef;
use crate::datetime::DateTime;
use crate::FastIndexMap;

/// Shared handle to a decoded list, populated in place.
pub type ListRef = Rc<RefCell<Vec<Value>>>;

/// Insertion-ordered map keyed by arbitrary decoded values.
pub type ValueMap = FastIndexMap<Value, Value>;

/// Shared handle to a decoded map, populated in place.
pub type MapRef = Rc<RefCell<ValueMap>>;

/// A decoded wire value.
#[derive(Clone)]
pub enum Value {
    /// The Null tag.
    Null,
    /// True or False.
    Bool(bool),
    /// A digit literal or Integer body.
    Int(i64),
    /// A Long body (arbitrary precision).
    Long(BigInt),
    /// A Double body (arbitrary precision).
    Double(BigDecimal),
    /// The NaN tag.
    NaN,
    /// Positive infinity.
    Infinity,
    /// Negative infinity.
    NegInfinity,
    /// A single UTF8Char value.
    Char(char),
    /// A String value; the Empty tag yields the empty string.
    String(Rc<str>),
    /// A Bytes blob.
    Bytes(Rc<[u8]>),
    /// A Guid token, stored opaquely.
    Guid(Rc<str>),
    /// A Date or Time value.
    DateTime(DateTime),
    /// An ordered sequence.
    List(ListRef),
    /// An insertion-ordered map with arbitrary keys.
    Map(MapRef),
    /// A nominal object instance.
    Object(ObjectRef),
}

impl Value {
    /// True for the Null variant.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The machine integer, if this is an Int.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The string contents, if this is a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// The list handle, if this is a List.
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// The map handle, if this is a Map.
    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The object handle, if this is an Object.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// True if `self` and `other` are the same composite instance.
    ///
    /// Immer false für Primitive: Identität ist nur für geteilte
    /// Container definiert.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            // NaN als Map-Key muss sich selbst wiederfinden können.
            (Self::NaN, Self::NaN) => true,
            (Self::Infinity, Self::Infinity) => true,
            (Self::NegInfinity, Self::NegInfinity) => true,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Guid(a), Self::Guid(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            Self::Null | Self::NaN | Self::Infinity | Self::NegInfinity => {}
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Double(v) => v.hash(state),
            Self::Char(v) => v.hash(state),
            Self::String(v) => v.hash(state),
            Self::Bytes(v) => v.hash(state),
            Self::Guid(v) => v.hash(state),
            Self::DateTime(v) => v.hash(state),
            Self::List(v) => (Rc::as_ptr(v) as usize).hash(state),
            Self::Map(v) => (Rc::as_ptr(v) as usize).hash(state),
            Self::Object(v) => (Rc::as_ptr(v) as usize).hash(state),
        }
    }
}

impl fmt::Debug for Value {
    /// Composites print shallowly (length only): a cyclic value must not
    /// recurse.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::Int(v) => write!(f, "Int({v})"),
            Self::Long(v) => write!(f, "Long({v})"),
            Self::Double(v) => write!(f, "Double({v})"),
            Self::NaN => write!(f, "NaN"),
            Self::Infinity => write!(f, "Infinity"),
            Self::NegInfinity => write!(f, "NegInfinity"),
            Self::Char(v) => write!(f, "Char({v:?})"),
            Self::String(v) => write!(f, "String({v:?})"),
            Self::Bytes(v) => write!(f, "Bytes({} bytes)", v.len()),
            Self::Guid(v) => write!(f, "Guid({v:?})"),
            Self::DateTime(v) => write!(f, "DateTime({v:?})"),
            Self::List(v) => match v.try_borrow() {
                Ok(inner) => write!(f, "List({} elements)", inner.len()),
                Err(_) => write!(f, "List(<in progress>)"),
            },
            Self::Map(v) => match v.try_borrow() {
                Ok(inner) => write!(f, "Map({} entries)", inner.len()),
                Err(_) => write!(f, "Map(<in progress>)"),
            },
            Self::Object(v) => match v.try_borrow() {
                Ok(inner) => write!(f, "Object({})", inner.class_name()),
                Err(_) => write!(f, "Object(<in progress>)"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    /// Primitive equality is structural.
    #[test]
    fn primitive_equality() {
        assert_eq!(Value::Int(5), Value::Int(5));
        assert_ne!(Value::Int(5), Value::Int(6));
        assert_eq!(
            Value::String(Rc::from("a")),
            Value::String(Rc::from("a"))
        );
        assert_eq!(Value::NaN, Value::NaN);
    }

    /// Cross-variant comparisons are false, not coerced.
    #[test]
    fn no_cross_variant_equality() {
        assert_ne!(Value::Int(0), Value::Null);
        assert_ne!(Value::Int(1), Value::Long(BigInt::from(1)));
    }

    /// Composite equality is instance identity, not structure.
    #[test]
    fn composite_identity() {
        let a: ListRef = Rc::new(RefCell::new(vec![Value::Int(1)]));
        let b: ListRef = Rc::new(RefCell::new(vec![Value::Int(1)]));
        assert_ne!(Value::List(Rc::clone(&a)), Value::List(b));
        assert_eq!(Value::List(Rc::clone(&a)), Value::List(a));
    }

    /// Equal primitives hash equal; distinct instances hash apart.
    #[test]
    fn hashing_follows_equality() {
        assert_eq!(hash_of(&Value::Int(5)), hash_of(&Value::Int(5)));
        let a: ListRef = Rc::new(RefCell::new(vec![]));
        let clone = Value::List(Rc::clone(&a));
        assert_eq!(hash_of(&Value::List(a)), hash_of(&clone));
    }

    /// A composite's hash is stable under mutation (pointer, not state).
    #[test]
    fn composite_hash_stable_under_mutation() {
        let list: ListRef = Rc::new(RefCell::new(vec![]));
        let value = Value::List(Rc::clone(&list));
        let before = hash_of(&value);
        list.borrow_mut().push(Value::Int(1));
        assert_eq!(hash_of(&value), before);
    }

    /// Identity-keyed map lookup finds the instance, not the structure.
    #[test]
    fn identity_keyed_map() {
        let key_list: ListRef = Rc::new(RefCell::new(vec![Value::Int(1), Value::Int(2)]));
        let key = Value::List(Rc::clone(&key_list));

        let mut map = ValueMap::default();
        map.insert(key.clone(), Value::Int(42));

        // same instance: found
        assert_eq!(map.get(&key), Some(&Value::Int(42)));
        // structurally equal, different instance: not found
        let other = Value::List(Rc::new(RefCell::new(vec![
            Value::Int(1),
            Value::Int(2),
        ])));
        assert_eq!(map.get(&other), None);
    }

    /// Debug on a self-containing list terminates.
    #[test]
    fn debug_is_cycle_safe() {
        let list: ListRef = Rc::new(RefCell::new(vec![]));
        list.borrow_mut().push(Value::List(Rc::clone(&list)));
        let text = format!("{:?}", Value::List(list));
        assert!(text.contains("List"), "{text}");
    }

    /// same_instance distinguishes sharing from structural equality.
    #[test]
    fn same_instance_checks_pointer() {
        let a: ListRef = Rc::new(RefCell::new(vec![]));
        let shared = Value::List(Rc::clone(&a));
        assert!(Value::List(a).same_instance(&shared));
        assert!(!Value::Int(1).same_instance(&Value::Int(1)));
    }
}
