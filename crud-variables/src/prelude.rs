//! Common items that you will always want in scope when building variables.

pub use crate::{
    convention::Conventions,
    schema::Schema,
    value,
    variables::{Operation, OperationKind, Resource, VariableBuilder},
    Error, Value, Variables,
};
