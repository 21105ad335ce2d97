//! Class-registry bridging: the injected capability that turns a wire
//! class name into an instantiable object, plus the session class table.
//!
//! The core never does runtime class loading; field assignment is driven
//! entirely by the field-name list captured at registration time. The
//! [`ClassRegistry`] trait keeps the hydration policy injectable:
//! [`GenericRegistry`] hydrates into a generic field map, a caller with
//! native types can substitute its own policy.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::value::Value;
use crate::{FastHashMap, FastIndexMap};

/// An instantiable descriptor for a wire class name, produced by a
/// [`ClassRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBinding {
    name: Rc<str>,
}

impl ClassBinding {
    /// Creates a binding for `name`.
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// The wire class name this binding resolves.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A hydrated nominal object instance.
///
/// Felder in Zuweisungs-Reihenfolge; die Reihenfolge ist durch die
/// Feldliste der Klassen-Registrierung bestimmt.
#[derive(Debug)]
pub struct ObjectInstance {
    class_name: Rc<str>,
    fields: FastIndexMap<Rc<str>, Value>,
}

/// Shared handle to a (possibly still field-less) object instance.
pub type ObjectRef = Rc<RefCell<ObjectInstance>>;

impl ObjectInstance {
    /// Creates a field-less instance of the named class.
    pub fn new(class_name: Rc<str>) -> Self {
        Self {
            class_name,
            fields: FastIndexMap::default(),
        }
    }

    /// The wire class name of this instance.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The value of `field`, if assigned.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All fields in assignment order.
    pub fn fields(&self) -> &FastIndexMap<Rc<str>, Value> {
        &self.fields
    }

    /// Assigns `value` to `field` (insertion order preserved).
    pub fn set(&mut self, field: Rc<str>, value: Value) {
        self.fields.insert(field, value);
    }
}

/// The injected class-resolution capability consumed by the decoder.
///
/// The core asks it to resolve a wire class name once per Class
/// definition, to instantiate a field-less object per Object value, and
/// to assign each decoded field. How field storage is laid out is the
/// registry's business.
pub trait ClassRegistry {
    /// Resolves or creates an instantiable binding for `name`.
    fn resolve(&mut self, name: &str) -> Result<Rc<ClassBinding>>;

    /// Creates a new, field-less instance of the bound class.
    fn instantiate(&mut self, binding: &Rc<ClassBinding>) -> Result<ObjectRef>;

    /// Assigns one decoded value to `field` on `object`.
    fn set_field(&mut self, object: &ObjectRef, field: &Rc<str>, value: Value) -> Result<()>;
}

impl<R: ClassRegistry + ?Sized> ClassRegistry for &mut R {
    fn resolve(&mut self, name: &str) -> Result<Rc<ClassBinding>> {
        (**self).resolve(name)
    }

    fn instantiate(&mut self, binding: &Rc<ClassBinding>) -> Result<ObjectRef> {
        (**self).instantiate(binding)
    }

    fn set_field(&mut self, object: &ObjectRef, field: &Rc<str>, value: Value) -> Result<()> {
        (**self).set_field(object, field, value)
    }
}

/// Default registry: every class name resolves, instances hydrate into a
/// generic field map.
#[derive(Default)]
pub struct GenericRegistry {
    bindings: FastHashMap<Rc<str>, Rc<ClassBinding>>,
}

impl GenericRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClassRegistry for GenericRegistry {
    fn resolve(&mut self, name: &str) -> Result<Rc<ClassBinding>> {
        if let Some(binding) = self.bindings.get(name) {
            return Ok(Rc::clone(binding));
        }
        let binding = Rc::new(ClassBinding::new(name));
        self.bindings.insert(Rc::from(name), Rc::clone(&binding));
        Ok(binding)
    }

    fn instantiate(&mut self, binding: &Rc<ClassBinding>) -> Result<ObjectRef> {
        Ok(Rc::new(RefCell::new(ObjectInstance::new(Rc::from(
            binding.name(),
        )))))
    }

    fn set_field(&mut self, object: &ObjectRef, field: &Rc<str>, value: Value) -> Result<()> {
        object.borrow_mut().set(Rc::clone(field), value);
        Ok(())
    }
}

/// One Class registration: the binding plus the captured field list.
#[derive(Debug, Clone)]
pub(crate) struct RegisteredClass {
    pub binding: Rc<ClassBinding>,
    /// Feldnamen in Wire-Reihenfolge; geteilt, damit der Decoder ohne
    /// Borrow auf die Tabelle iterieren kann.
    pub fields: Rc<[Rc<str>]>,
}

/// Session class table, indexed by registration order.
#[derive(Default)]
pub(crate) struct ClassTable {
    entries: Vec<RegisteredClass>,
}

impl ClassTable {
    /// Appends a registration and returns its index.
    pub fn register(&mut self, binding: Rc<ClassBinding>, fields: Vec<Rc<str>>) -> usize {
        let index = self.entries.len();
        self.entries.push(RegisteredClass {
            binding,
            fields: fields.into(),
        });
        index
    }

    /// The registration at `index`; unregistered indices are a contract
    /// violation.
    pub fn get(&self, index: usize) -> Result<&RegisteredClass> {
        self.entries.get(index).ok_or(Error::UnregisteredClassIndex {
            index,
            registered: self.entries.len(),
        })
    }

    /// Clears all registrations.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
