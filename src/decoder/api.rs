//! High-level decode entry points over in-memory buffers.

use crate::class_registry::ClassRegistry;
use crate::error::Result;
use crate::source::SliceSource;
use crate::value::Value;

use super::Decoder;

/// Decodes one top-level value from `data` with the default
/// [`GenericRegistry`](crate::GenericRegistry).
///
/// # Beispiel
///
/// ```
/// use hproser::decode;
///
/// assert_eq!(decode(b"5").unwrap().as_i64(), Some(5));
/// ```
pub fn decode(data: &[u8]) -> Result<Value> {
    Decoder::new(SliceSource::new(data)).read_value()
}

/// Decodes one top-level value from `data` with an injected class
/// registry.
///
/// Die Registry wird per `&mut` übergeben und behält ihren Zustand
/// (aufgelöste Bindings) über den Aufruf hinaus.
pub fn decode_with_registry<R: ClassRegistry>(data: &[u8], registry: &mut R) -> Result<Value> {
    Decoder::with_registry(SliceSource::new(data), registry).read_value()
}
