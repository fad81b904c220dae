//! Framework-agnostic parameters of the CRUD operations.

use crate::{Error, Value};
use derive_more::Display;
use serde::{de::DeserializeOwned, Deserialize};
use std::str::FromStr;

/// The resource an operation targets, identified by its GraphQL type name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Resource {
    pub name: String,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for Resource {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The kinds of operation the builder understands.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    #[display(fmt = "GET_LIST")]
    GetList,
    #[display(fmt = "GET_ONE")]
    GetOne,
    #[display(fmt = "GET_MANY")]
    GetMany,
    #[display(fmt = "GET_MANY_REFERENCE")]
    GetManyReference,
    #[display(fmt = "CREATE")]
    Create,
    #[display(fmt = "UPDATE")]
    Update,
    #[display(fmt = "DELETE")]
    Delete,
}

impl OperationKind {
    pub const ALL: [Self; 7] = [
        Self::GetList,
        Self::GetOne,
        Self::GetMany,
        Self::GetManyReference,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];

    /// The tag identifying this kind of operation.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetList => "GET_LIST",
            Self::GetOne => "GET_ONE",
            Self::GetMany => "GET_MANY",
            Self::GetManyReference => "GET_MANY_REFERENCE",
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownOperation { kind: s.into() })
    }
}

/// Which page of a list to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The 1-based page number.
    pub page: u64,
    pub per_page: u64,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[display(fmt = "ASC")]
    Asc,
    #[display(fmt = "DESC")]
    Desc,
}

/// The order in which to list results.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Parameters of [`Operation::GetList`].
///
/// The filter maps field names, or dotted `relation.field` paths, to the values to match.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub filter: Value,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub sort: Option<Sort>,
}

/// Parameters of [`Operation::GetOne`] and [`Operation::Delete`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IdParams {
    pub id: Value,
}

/// Parameters of [`Operation::GetMany`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ManyParams {
    pub ids: Vec<Value>,
}

/// Parameters of [`Operation::GetManyReference`].
///
/// Selects the objects whose `target` (a dotted path such as `author.id`) equals `id`. The list
/// parameters are optional and shaped as for [`Operation::GetList`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReferenceParams {
    pub target: String,
    pub id: Value,
    #[serde(default)]
    pub filter: Value,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub sort: Option<Sort>,
}

/// Parameters of [`Operation::Create`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CreateParams {
    pub data: Value,
}

/// Parameters of [`Operation::Update`].
///
/// `data` is the edited object, including its `id`, and `previous_data` the object as it was
/// loaded before the edit.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParams {
    pub data: Value,
    #[serde(default)]
    pub previous_data: Value,
}

/// A CRUD intent together with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    GetList(ListParams),
    GetOne(IdParams),
    GetMany(ManyParams),
    GetManyReference(ReferenceParams),
    Create(CreateParams),
    Update(UpdateParams),
    Delete(IdParams),
}

impl Operation {
    /// Parse an operation from its tag and JSON parameters.
    ///
    /// Fails with [`Error::UnknownOperation`] if `kind` is not one of the supported tags and with
    /// [`Error::Params`] if `params` do not have the shape `kind` requires.
    pub fn parse(kind: &str, params: serde_json::Value) -> Result<Self, Error> {
        let kind: OperationKind = kind.parse()?;
        Ok(match kind {
            OperationKind::GetList => Self::GetList(parse_params(kind, params)?),
            OperationKind::GetOne => Self::GetOne(parse_params(kind, params)?),
            OperationKind::GetMany => Self::GetMany(parse_params(kind, params)?),
            OperationKind::GetManyReference => {
                Self::GetManyReference(parse_params(kind, params)?)
            }
            OperationKind::Create => Self::Create(parse_params(kind, params)?),
            OperationKind::Update => Self::Update(parse_params(kind, params)?),
            OperationKind::Delete => Self::Delete(parse_params(kind, params)?),
        })
    }

    /// The kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::GetList(_) => OperationKind::GetList,
            Self::GetOne(_) => OperationKind::GetOne,
            Self::GetMany(_) => OperationKind::GetMany,
            Self::GetManyReference(_) => OperationKind::GetManyReference,
            Self::Create(_) => OperationKind::Create,
            Self::Update(_) => OperationKind::Update,
            Self::Delete(_) => OperationKind::Delete,
        }
    }
}

fn parse_params<T: DeserializeOwned>(
    kind: OperationKind,
    params: serde_json::Value,
) -> Result<T, Error> {
    serde_json::from_value(params).map_err(|err| Error::params(kind.name(), err))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.name().parse::<OperationKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            Operation::parse("UPDATE_MANY", json!({ "ids": [] })).unwrap_err(),
            Error::UnknownOperation {
                kind: "UPDATE_MANY".into()
            }
        );
        assert!(matches!(
            "get_list".parse::<OperationKind>(),
            Err(Error::UnknownOperation { .. })
        ));
    }

    #[test]
    fn test_parse_list() {
        let op = Operation::parse(
            "GET_LIST",
            json!({
                "filter": { "ids": ["a", "b"], "views": 100 },
                "pagination": { "page": 2, "perPage": 5 },
                "sort": { "field": "createdAt", "order": "DESC" },
            }),
        )
        .unwrap();
        assert_eq!(
            op,
            Operation::GetList(ListParams {
                filter: value!({ "ids": ["a", "b"], "views": 100 }),
                pagination: Some(Pagination {
                    page: 2,
                    per_page: 5
                }),
                sort: Some(Sort {
                    field: "createdAt".into(),
                    order: SortOrder::Desc
                }),
            })
        );
    }

    #[test]
    fn test_parse_list_defaults() {
        assert_eq!(
            Operation::parse("GET_LIST", json!({})).unwrap(),
            Operation::GetList(ListParams::default())
        );
    }

    #[test]
    fn test_parse_update() {
        let op = Operation::parse(
            "UPDATE",
            json!({
                "data": { "id": "post1", "title": "Foo" },
                "previousData": { "id": "post1", "title": "Bar" },
            }),
        )
        .unwrap();
        assert_eq!(op.kind(), OperationKind::Update);
        assert_eq!(
            op,
            Operation::Update(UpdateParams {
                data: value!({ "id": "post1", "title": "Foo" }),
                previous_data: value!({ "id": "post1", "title": "Bar" }),
            })
        );
    }

    #[test]
    fn test_invalid_params() {
        let err = Operation::parse("GET_MANY_REFERENCE", json!({ "id": "author1" })).unwrap_err();
        assert!(
            matches!(&err, Error::Params { operation: "GET_MANY_REFERENCE", error } if error.contains("target")),
            "{err}"
        );

        let err = Operation::parse(
            "GET_LIST",
            json!({ "sort": { "field": "title", "order": "UP" } }),
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::Params { operation: "GET_LIST", .. }),
            "{err}"
        );
    }
}
