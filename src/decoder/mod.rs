//! The Hprose 2.0 decoding engine.
//!
//! A single-pass, recursive-descent reader: the entry point reads one
//! tag and dispatches through one exhaustive `match`; container and
//! composite decoders recurse back into the entry point for their
//! elements. The decoder owns the two session-scoped tables (reference
//! table and class table) and is not safe for concurrent use; one
//! decoder per session, or an explicit [`Decoder::reset`] between
//! independent top-level values on a shared stream.
//!
//! # Beispiel
//!
//! ```
//! use hproser::{decode, Value};
//!
//! // Liste [1, "ab", 3.5]
//! let value = decode(b"a3{1s2\"ab\"d3.5;}").unwrap();
//! let list = value.as_list().unwrap().borrow();
//! assert_eq!(list[0], Value::Int(1));
//! assert_eq!(list[1].as_str(), Some("ab"));
//! ```

mod api;
pub use api::{decode, decode_with_registry};

use std::rc::Rc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::class_registry::{ClassRegistry, GenericRegistry};
use crate::error::{Error, Result};
use crate::reference::ReferenceTable;
use crate::source::{expect_one_of, expect_tag, ByteSource};
use crate::value::{ListRef, MapRef, Value, ValueMap};
use crate::{binary, class_registry::ClassTable, datetime, double, integer, tag, text};

/// Maximum container count (list elements, map pairs, class fields) to
/// prevent OOM from corrupted streams.
pub const MAX_CONTAINER_LENGTH: usize = 1 << 24;

/// Obergrenze für spekulative Vorab-Allokation: die tatsächliche Länge
/// ist erst nach dem Lesen aller Elemente verlässlich.
const PREALLOC_LIMIT: usize = 4096;

/// The stateful decoding engine over a byte source.
pub struct Decoder<S, R = GenericRegistry> {
    source: S,
    registry: R,
    refs: ReferenceTable,
    classes: ClassTable,
}

impl<S: ByteSource> Decoder<S> {
    /// Creates a decoder with the default [`GenericRegistry`].
    pub fn new(source: S) -> Self {
        Self::with_registry(source, GenericRegistry::new())
    }
}

impl<S: ByteSource, R: ClassRegistry> Decoder<S, R> {
    /// Creates a decoder with an injected class registry.
    pub fn with_registry(source: S, registry: R) -> Self {
        Self {
            source,
            registry,
            refs: ReferenceTable::new(),
            classes: ClassTable::default(),
        }
    }

    /// The underlying byte source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The injected class registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable access to the injected class registry.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Clears both session tables.
    ///
    /// Permits one decoder/stream pair to decode multiple logically
    /// independent top-level values without leaking stale indices; a Ref
    /// that was valid before the reset is out of range afterwards.
    pub fn reset(&mut self) {
        log::trace!(
            "session reset ({} references, {} classes dropped)",
            self.refs.len(),
            self.classes.len()
        );
        self.refs.reset();
        self.classes.reset();
    }

    /// Decodes one value from the stream (the top-level entry point,
    /// also used recursively for container elements).
    ///
    /// The Error tag aborts with [`Error::RemoteError`] instead of
    /// producing a value.
    pub fn read_value(&mut self) -> Result<Value> {
        let tag = self.next_tag()?;
        self.dispatch(tag)
    }

    /// Reads one tag; a clean end-of-stream here is [`Error::EmptyStream`].
    fn next_tag(&mut self) -> Result<u8> {
        self.source.try_read_byte()?.ok_or(Error::EmptyStream)
    }

    /// Die eine, geschlossene Dispatch-Stelle: Tag-Byte → Decoder.
    fn dispatch(&mut self, tag_byte: u8) -> Result<Value> {
        match tag_byte {
            // Digit shortcut: the tag is the value, no terminator.
            t if tag::is_digit(t) => Ok(Value::Int(tag::digit_value(t) as i64)),
            tag::INTEGER => Ok(Value::Int(integer::decode_i64(&mut self.source)?)),
            tag::LONG => Ok(Value::Long(integer::decode_big(&mut self.source)?)),
            tag::DOUBLE => Ok(Value::Double(double::decode_big_decimal(&mut self.source)?)),
            tag::NAN => Ok(Value::NaN),
            tag::INFINITY => {
                if double::decode_infinity_sign(&mut self.source)? {
                    Ok(Value::NegInfinity)
                } else {
                    Ok(Value::Infinity)
                }
            }
            tag::NULL => Ok(Value::Null),
            tag::EMPTY => Ok(Value::String(Rc::from(""))),
            tag::TRUE => Ok(Value::Bool(true)),
            tag::FALSE => Ok(Value::Bool(false)),
            tag::UTF8CHAR => Ok(Value::Char(text::decode_char(&mut self.source)?)),
            tag::STRING => Ok(Value::String(self.read_tracked_string()?)),
            tag::BYTES => {
                let blob: Rc<[u8]> = binary::decode_bytes(&mut self.source)?.into();
                self.refs.allocate(Value::Bytes(Rc::clone(&blob)));
                Ok(Value::Bytes(blob))
            }
            tag::GUID => {
                let guid: Rc<str> = Rc::from(text::decode_guid(&mut self.source)?);
                self.refs.allocate(Value::Guid(Rc::clone(&guid)));
                Ok(Value::Guid(guid))
            }
            tag::DATE => {
                let dt = datetime::decode_date(&mut self.source)?;
                self.refs.allocate(Value::DateTime(dt));
                Ok(Value::DateTime(dt))
            }
            tag::TIME => {
                let dt = datetime::decode_time(&mut self.source)?;
                self.refs.allocate(Value::DateTime(dt));
                Ok(Value::DateTime(dt))
            }
            tag::LIST => self.read_list(),
            tag::MAP => self.read_map(),
            tag::CLASS => {
                // Klassen-Definitionen stapeln sich vor dem eigentlichen
                // Wert; nach der Registrierung erneut dispatchen.
                self.read_class()?;
                self.read_value()
            }
            tag::OBJECT => self.read_object(),
            tag::REF => self.read_ref(),
            tag::ERROR => self.read_error(),
            other => Err(Error::UnexpectedTag(other)),
        }
    }

    /// Decodes a String value and allocates its reference slot.
    fn read_tracked_string(&mut self) -> Result<Rc<str>> {
        let s: Rc<str> = Rc::from(text::decode_string_body(&mut self.source)?);
        self.refs.allocate(Value::String(Rc::clone(&s)));
        Ok(s)
    }

    /// List body: count, elements, Closebrace. The slot is allocated
    /// before the first element so an element can Ref this very list.
    fn read_list(&mut self) -> Result<Value> {
        let count = self.read_count(tag::OPENBRACE)?;
        let list: ListRef = Rc::new(std::cell::RefCell::new(Vec::with_capacity(
            count.min(PREALLOC_LIMIT),
        )));
        self.refs.allocate(Value::List(Rc::clone(&list)));
        for _ in 0..count {
            let element = self.read_value()?;
            list.borrow_mut().push(element);
        }
        expect_tag(&mut self.source, tag::CLOSEBRACE)?;
        Ok(Value::List(list))
    }

    /// Map body: count, key/value pairs in order, Closebrace. Keys may
    /// be any decoded value; composite keys compare by instance
    /// identity.
    fn read_map(&mut self) -> Result<Value> {
        let count = self.read_count(tag::OPENBRACE)?;
        let map: MapRef = Rc::new(std::cell::RefCell::new(ValueMap::with_capacity_and_hasher(
            count.min(PREALLOC_LIMIT),
            Default::default(),
        )));
        self.refs.allocate(Value::Map(Rc::clone(&map)));
        for _ in 0..count {
            let key = self.read_value()?;
            let value = self.read_value()?;
            map.borrow_mut().insert(key, value);
        }
        expect_tag(&mut self.source, tag::CLOSEBRACE)?;
        Ok(Value::Map(map))
    }

    /// Class definition: name, field count, field names, Closebrace.
    /// Name and field names go through the string leaf decoder but are
    /// **not** reference-tracked.
    fn read_class(&mut self) -> Result<()> {
        let name = text::decode_string_body(&mut self.source)?;
        let count = self.read_count(tag::OPENBRACE)?;
        let mut fields = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            expect_tag(&mut self.source, tag::STRING)?;
            fields.push(Rc::from(text::decode_string_body(&mut self.source)?));
        }
        expect_tag(&mut self.source, tag::CLOSEBRACE)?;
        let binding = self.registry.resolve(&name)?;
        let index = self.classes.register(binding, fields);
        log::debug!("registered class '{name}' at index {index}");
        Ok(())
    }

    /// Object body: class-table index, one value per registered field
    /// name in order, Closebrace. The slot is allocated before the
    /// fields so a field can Ref this very object.
    fn read_object(&mut self) -> Result<Value> {
        let index = self.read_count(tag::OPENBRACE)?;
        let class = self.classes.get(index)?.clone();
        let object = self.registry.instantiate(&class.binding)?;
        self.refs.allocate(Value::Object(Rc::clone(&object)));
        for field in class.fields.iter() {
            let value = self.read_value()?;
            self.registry.set_field(&object, field, value)?;
        }
        expect_tag(&mut self.source, tag::CLOSEBRACE)?;
        Ok(Value::Object(object))
    }

    /// Ref body: index, Semicolon; yields the shared table entry.
    fn read_ref(&mut self) -> Result<Value> {
        let index = integer::decode_count(&mut self.source, tag::SEMICOLON)?;
        self.refs.resolve(index)
    }

    /// Error body: a string payload raised as a remote failure.
    fn read_error(&mut self) -> Result<Value> {
        let message = self.read_string()?;
        Err(Error::RemoteError(message.to_string()))
    }

    /// Liest einen Container-Count und prüft die Obergrenze.
    fn read_count(&mut self, terminator: u8) -> Result<usize> {
        let count = integer::decode_count(&mut self.source, terminator)?;
        if count > MAX_CONTAINER_LENGTH {
            return Err(Error::ContainerLengthOverflow(count as u64));
        }
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Typed convenience readers
    // ------------------------------------------------------------------

    /// Reads a boolean value (True or False tag).
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(expect_one_of(&mut self.source, &[tag::TRUE, tag::FALSE])? == tag::TRUE)
    }

    /// Reads a machine integer (digit shortcut or Integer body).
    pub fn read_int(&mut self) -> Result<i64> {
        let t = self.next_tag()?;
        match t {
            t if tag::is_digit(t) => Ok(tag::digit_value(t) as i64),
            tag::INTEGER => integer::decode_i64(&mut self.source),
            other => Err(Error::tag_mismatch("an integer value", other)),
        }
    }

    /// Reads an arbitrary-precision integer (digit shortcut, Integer or
    /// Long body).
    pub fn read_long(&mut self) -> Result<BigInt> {
        let t = self.next_tag()?;
        match t {
            t if tag::is_digit(t) => Ok(BigInt::from(tag::digit_value(t))),
            tag::INTEGER | tag::LONG => integer::decode_big(&mut self.source),
            other => Err(Error::tag_mismatch("a long value", other)),
        }
    }

    /// Reads an arbitrary-precision decimal (digit shortcut for exact
    /// integer-valued doubles 0-9, or an Integer, Long or Double body).
    pub fn read_double(&mut self) -> Result<BigDecimal> {
        let t = self.next_tag()?;
        match t {
            t if tag::is_digit(t) => Ok(BigDecimal::from(tag::digit_value(t) as i64)),
            tag::INTEGER | tag::LONG => Ok(BigDecimal::from(integer::decode_big(
                &mut self.source,
            )?)),
            tag::DOUBLE => double::decode_big_decimal(&mut self.source),
            other => Err(Error::tag_mismatch("a double value", other)),
        }
    }

    /// Reads a string value (Empty, UTF8Char, String or a Ref resolving
    /// to a String).
    pub fn read_string(&mut self) -> Result<Rc<str>> {
        let t = self.next_tag()?;
        match t {
            tag::EMPTY => Ok(Rc::from("")),
            tag::UTF8CHAR => Ok(Rc::from(
                text::decode_char(&mut self.source)?.to_string(),
            )),
            tag::STRING => self.read_tracked_string(),
            tag::REF => match self.read_ref()? {
                Value::String(s) => Ok(s),
                _ => Err(Error::tag_mismatch("a reference to a string", t)),
            },
            other => Err(Error::tag_mismatch("a string value", other)),
        }
    }
}
