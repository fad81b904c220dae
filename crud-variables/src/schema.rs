//! A read-only index over an introspection document.
//!
//! The [`Schema`] answers the questions the builder has about the generated input types: does a
//! type exist, which input fields does it declare, and what type does each of them reference. A
//! type which does not exist is not an error for these queries, it simply has no fields. Callers
//! which need a type to exist use [`Schema::require_type`], which reports the missing name.

use crate::Error;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

pub mod introspection;
pub mod mock;

pub use introspection::{FieldDescriptor, TypeDescriptor, TypeKind, TypeRef};

/// An introspection document indexed by type name.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    types: Vec<TypeDescriptor>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Index a list of type descriptors.
    ///
    /// If two descriptors have the same name, the first one wins.
    pub fn new(types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let types: Vec<_> = types.into_iter().collect();
        let mut index = HashMap::with_capacity(types.len());
        for (i, ty) in types.iter().enumerate() {
            index.entry(ty.name().to_string()).or_insert(i);
        }
        Self { types, index }
    }

    /// Parse and index an introspection document.
    ///
    /// The document may be the full response to an introspection query
    /// (`{ "data": { "__schema": { "types": [...] } } }`), just the `__schema` object, or any object
    /// with a `types` list.
    pub fn from_json(mut doc: serde_json::Value) -> Result<Self, Error> {
        for wrapper in ["data", "__schema"] {
            if let Some(inner) = doc.get_mut(wrapper).map(serde_json::Value::take) {
                doc = inner;
            }
        }
        let types = doc
            .get_mut("types")
            .map(serde_json::Value::take)
            .ok_or_else(|| Error::introspection("document has no types"))?;
        let types: Vec<TypeDescriptor> =
            serde_json::from_value(types).map_err(Error::introspection)?;
        tracing::debug!("indexed introspection document with {} types", types.len());
        Ok(Self::new(types))
    }

    /// All the types in the document, in document order.
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Look up a type by its exact name.
    pub fn find_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// Look up a type which must exist.
    ///
    /// `referenced_by` describes where the name came from, so that a schema mismatch can be traced
    /// back to the field which caused it.
    pub fn require_type(
        &self,
        name: &str,
        referenced_by: impl Display,
    ) -> Result<&TypeDescriptor, Error> {
        self.find_type(name).ok_or_else(|| Error::MissingType {
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }

    /// The name of the concrete type behind a possibly wrapped type reference.
    pub fn unwrap<'a>(&self, ty: &'a TypeRef) -> Option<&'a str> {
        ty.name()
    }

    /// Look up the input field `field` of the input type `ty`.
    pub fn input_field(&self, ty: &str, field: &str) -> Option<&FieldDescriptor> {
        self.find_type(ty)?.input_field(field)
    }

    /// The names of the input fields of `ty`.
    ///
    /// This is empty if `ty` does not exist or is not an input object type.
    pub fn input_field_names(&self, ty: &str) -> BTreeSet<&str> {
        self.find_type(ty)
            .map(|ty| {
                ty.input_fields()
                    .iter()
                    .map(|field| field.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the input type `ty` exists and declares the input field `field`.
    pub fn has_input_field(&self, ty: &str, field: &str) -> bool {
        self.input_field(ty, field).is_some()
    }
}

impl FromIterator<TypeDescriptor> for Schema {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        Self::new(iter)
    }
}
