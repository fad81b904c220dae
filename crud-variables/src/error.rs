//! Errors which abort the construction of a variables object.
//!
//! Most problems with a payload are not errors at all: fields the schema does not know about are
//! dropped (see [`Disposition`](crate::variables::relation::Disposition)). The variants here cover
//! the cases where continuing would send a corrupt operation to the server.

use snafu::Snafu;
use std::fmt::Display;

/// Errors encountered while building variables.
#[derive(Clone, Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("unknown operation kind {kind}"))]
    UnknownOperation { kind: String },

    #[snafu(display("error parsing introspection document: {error}"))]
    Introspection { error: String },

    #[snafu(display("type {name} (referenced by {referenced_by}) is missing from the schema"))]
    MissingType { name: String, referenced_by: String },

    #[snafu(display("type reference of {ty}.{field} does not name a type"))]
    UnnamedType { ty: String, field: String },

    #[snafu(display("invalid parameters for {operation}: {error}"))]
    Params {
        operation: &'static str,
        error: String,
    },

    #[snafu(display("{operation} requires an id"))]
    MissingId { operation: &'static str },
}

impl Error {
    /// An error in the structure of the introspection document.
    pub fn introspection(error: impl Display) -> Self {
        Self::Introspection {
            error: error.to_string(),
        }
    }

    /// An error parsing the parameters of `operation`.
    pub fn params(operation: &'static str, error: impl Display) -> Self {
        Self::Params {
            operation,
            error: error.to_string(),
        }
    }
}
