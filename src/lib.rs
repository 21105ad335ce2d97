//! hproser – decoding engine for the Hprose 2.0 serialization format
//!
//! Hprose serializes arbitrary structured values — scalars,
//! arbitrary-precision numbers, temporal values, binary blobs, nested
//! lists and maps, and nominally-typed objects — as a compact,
//! self-describing, tag-prefixed byte stream. This crate implements the
//! read side: a single-pass, recursive-descent [`Decoder`] that consumes
//! the stream one tag at a time and reconstructs typed [`Value`]s,
//! including shared and genuinely cyclic object graphs via a
//! session-scoped reference table.
//!
//! Encoding, transport and RPC dispatch are out of scope.
//!
//! # Beispiel
//!
//! ```
//! use hproser::decode;
//!
//! // Map {"name": "Alice", "age": 30}
//! let value = decode(b"m2{s4\"name\"s5\"Alice\"s3\"age\"i30;}").unwrap();
//! let map = value.as_map().unwrap().borrow();
//! assert_eq!(map.len(), 2);
//!
//! // Eine Liste, die sich selbst enthält (Referenz auf den eigenen Slot)
//! let cyclic = decode(b"a1{r0;}").unwrap();
//! let list = cyclic.as_list().unwrap().borrow();
//! assert!(list[0].same_instance(&cyclic));
//! ```

pub mod binary;
pub mod class_registry;
pub mod datetime;
pub mod decoder;
pub mod double;
pub mod error;
pub mod integer;
pub mod reference;
pub mod source;
pub mod tag;
pub mod text;
pub mod value;

pub use error::{Error, Result};

/// HashMap mit ahash (schneller, nicht DoS-resistent — für interne
/// Datenstrukturen).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// IndexMap mit ahash (deterministische Einfüge-Reihenfolge + schnelles
/// Hashing). Öffentlich, weil Map-Werte und Objekt-Felder darin landen.
pub type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: decoding
pub use decoder::{decode, decode_with_registry, Decoder};

// Public API: values
pub use datetime::DateTime;
pub use value::{ListRef, MapRef, Value, ValueMap};

// Re-Export der Zahlentypen, die in `Value` erscheinen.
pub use bigdecimal::BigDecimal;
pub use num_bigint::BigInt;

// Public API: collaborators
pub use class_registry::{
    ClassBinding, ClassRegistry, GenericRegistry, ObjectInstance, ObjectRef,
};
pub use reference::ReferenceTable;
pub use source::{ByteSource, IoSource, SliceSource};
