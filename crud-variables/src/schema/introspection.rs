//! Descriptors of the types in an introspection document.
//!
//! These mirror the `__Type` and `__InputValue` objects returned by a standard introspection query,
//! restricted to the parts the builder consumes: names, kinds, fields and input fields. Type
//! references (the `type` of a field) are a recursive structure of [`TypeRef::List`] and
//! [`TypeRef::NonNull`] wrappers around a [`TypeRef::Named`] type.

use derive_more::Display;
use serde::{Deserialize, Deserializer};

/// The kind of a GraphQL type, as reported by introspection.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    #[display(fmt = "SCALAR")]
    Scalar,
    #[display(fmt = "OBJECT")]
    Object,
    #[display(fmt = "INTERFACE")]
    Interface,
    #[display(fmt = "UNION")]
    Union,
    #[display(fmt = "ENUM")]
    Enum,
    #[display(fmt = "INPUT_OBJECT")]
    InputObject,
    #[display(fmt = "LIST")]
    List,
    #[display(fmt = "NON_NULL")]
    NonNull,
}

/// A reference to a type, as it appears in the `type` of a field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawTypeRef")]
pub enum TypeRef {
    /// A reference to a named type in the document.
    ///
    /// Introspection results are allowed to omit the name of a named type reference, in which case
    /// the reference is unusable for anything but existence checks.
    Named { kind: TypeKind, name: Option<String> },
    /// A list of the inner type.
    List(Box<TypeRef>),
    /// A non-null version of the inner type.
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// A reference to the named type `name`.
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self::Named {
            kind,
            name: Some(name.into()),
        }
    }

    /// Strip all [`List`](Self::List) and [`NonNull`](Self::NonNull) wrappers.
    pub fn unwrap(&self) -> &TypeRef {
        match self {
            Self::List(inner) | Self::NonNull(inner) => inner.unwrap(),
            named => named,
        }
    }

    /// The name of the innermost named type, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self.unwrap() {
            Self::Named {
                name: Some(name), ..
            } if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// The kind of the innermost named type.
    pub fn kind(&self) -> TypeKind {
        match self.unwrap() {
            Self::Named { kind, .. } => *kind,
            // `unwrap` never returns a wrapper.
            Self::List(_) => TypeKind::List,
            Self::NonNull(_) => TypeKind::NonNull,
        }
    }

    /// Whether the referenced type is a list, after stripping a non-null wrapper.
    pub fn is_list(&self) -> bool {
        match self {
            Self::NonNull(inner) => inner.is_list(),
            Self::List(_) => true,
            Self::Named { .. } => false,
        }
    }
}

/// The wire format of a type reference: `{ kind, name, ofType }`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeRef {
    kind: TypeKind,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    of_type: Option<Box<RawTypeRef>>,
}

impl TryFrom<RawTypeRef> for TypeRef {
    type Error = String;

    fn try_from(raw: RawTypeRef) -> Result<Self, Self::Error> {
        let inner = match (raw.kind, raw.of_type) {
            (TypeKind::List | TypeKind::NonNull, Some(of_type)) => {
                Box::new(TypeRef::try_from(*of_type)?)
            }
            (kind @ (TypeKind::List | TypeKind::NonNull), None) => {
                return Err(format!("{kind} type reference has no ofType"));
            }
            (kind, _) => {
                return Ok(Self::Named {
                    kind,
                    name: raw.name,
                })
            }
        };
        Ok(match raw.kind {
            TypeKind::List => Self::List(inner),
            _ => Self::NonNull(inner),
        })
    }
}

/// A field of an object type or an input field of an input object type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A named type in the introspection document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeDescriptor {
    Scalar {
        name: String,
    },
    Object {
        name: String,
        #[serde(default, deserialize_with = "null_as_empty")]
        fields: Vec<FieldDescriptor>,
    },
    Interface {
        name: String,
        #[serde(default, deserialize_with = "null_as_empty")]
        fields: Vec<FieldDescriptor>,
    },
    Union {
        name: String,
    },
    Enum {
        name: String,
    },
    InputObject {
        name: String,
        #[serde(
            default,
            rename = "inputFields",
            deserialize_with = "null_as_empty"
        )]
        input_fields: Vec<FieldDescriptor>,
    },
}

impl TypeDescriptor {
    /// The name of this type.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name }
            | Self::Object { name, .. }
            | Self::Interface { name, .. }
            | Self::Union { name }
            | Self::Enum { name }
            | Self::InputObject { name, .. } => name,
        }
    }

    /// The kind of this type.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar { .. } => TypeKind::Scalar,
            Self::Object { .. } => TypeKind::Object,
            Self::Interface { .. } => TypeKind::Interface,
            Self::Union { .. } => TypeKind::Union,
            Self::Enum { .. } => TypeKind::Enum,
            Self::InputObject { .. } => TypeKind::InputObject,
        }
    }

    /// The output fields of an object or interface type; empty for all other kinds.
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self {
            Self::Object { fields, .. } | Self::Interface { fields, .. } => fields,
            _ => &[],
        }
    }

    /// The input fields of an input object type; empty for all other kinds.
    pub fn input_fields(&self) -> &[FieldDescriptor] {
        match self {
            Self::InputObject { input_fields, .. } => input_fields,
            _ => &[],
        }
    }

    /// Look up an input field by name.
    pub fn input_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.input_fields().iter().find(|field| field.name == name)
    }
}

/// Introspection reports the fields of types which have none as `null` rather than `[]`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
