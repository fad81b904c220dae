//! Construction of GraphQL variables for CRUD operations.
//!
//! The entrypoint is [`VariableBuilder::build`], which takes a [`Resource`] and an [`Operation`]
//! and returns the [`Variables`] of the corresponding query or mutation:
//!
//! | Operation            | Variables                                              |
//! |----------------------|--------------------------------------------------------|
//! | `GET_LIST`           | `where`, `orderBy`, `first`, `skip`                    |
//! | `GET_ONE`            | `where: { id }`                                        |
//! | `GET_MANY`           | `where: { id_in }`                                     |
//! | `GET_MANY_REFERENCE` | `where` on the target path, plus the list variables    |
//! | `CREATE`             | `data`, shaped against `${Type}CreateInput`            |
//! | `UPDATE`             | `where: { id }` and `data`, against `${Type}UpdateInput` |
//! | `DELETE`             | `where: { id }`                                        |

use crate::{convention::Conventions, schema::Schema, Error, Name, Value, Variables};

pub mod diff;
pub mod filter;
pub mod params;
pub mod relation;

pub use params::*;
pub use relation::{Disposition, DropReason, WriteMode};

use filter::FilterBuilder;
use relation::RelationResolver;

/// Builds the variables of CRUD operations against one schema.
///
/// The builder only reads the schema, so one schema can back any number of builders, and a
/// builder can be shared between threads.
#[derive(Clone, Debug)]
pub struct VariableBuilder<'a> {
    schema: &'a Schema,
    conventions: Conventions,
}

impl<'a> VariableBuilder<'a> {
    /// A builder using the default naming [`Conventions`].
    pub fn new(schema: &'a Schema) -> Self {
        Self::with_conventions(schema, Conventions::default())
    }

    pub fn with_conventions(schema: &'a Schema, conventions: Conventions) -> Self {
        Self {
            schema,
            conventions,
        }
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Build the variables for `operation` on `resource`.
    pub fn build(&self, resource: &Resource, operation: &Operation) -> Result<Variables, Error> {
        tracing::trace!(resource = %resource.name, operation = %operation.kind(), "building variables");
        let vars = match operation {
            Operation::GetList(params) => self.list(resource, params),
            Operation::GetOne(params) | Operation::Delete(params) => {
                object([("where", id_object(&params.id))])
            }
            Operation::GetMany(params) => self.many(params),
            Operation::GetManyReference(params) => self.reference(resource, params),
            Operation::Create(params) => self.create(resource, params)?,
            Operation::Update(params) => self.update(resource, params)?,
        };
        Ok(Variables::from_value(vars))
    }

    /// Parse an operation from its tag and JSON parameters and build its variables.
    pub fn build_json(
        &self,
        resource: &Resource,
        kind: &str,
        params: serde_json::Value,
    ) -> Result<Variables, Error> {
        self.build(resource, &Operation::parse(kind, params)?)
    }

    fn list(&self, resource: &Resource, params: &ListParams) -> Value {
        self.list_variables(resource, &params.filter, params.pagination, params.sort.as_ref())
    }

    fn list_variables(
        &self,
        resource: &Resource,
        filter: &Value,
        pagination: Option<Pagination>,
        sort: Option<&Sort>,
    ) -> Value {
        let filters = FilterBuilder::new(self.schema, &self.conventions, &resource.name);
        let mut vars = object([("where", filters.build(filter))]);
        if let Some(sort) = sort {
            insert_path(
                &mut vars,
                &["orderBy"],
                Value::String(format!("{}_{}", sort.field, sort.order)),
            );
        }
        if let Some(Pagination { page, per_page }) = pagination {
            let skip = page.saturating_sub(1).saturating_mul(per_page);
            insert_path(&mut vars, &["first"], Value::Number(per_page.into()));
            insert_path(&mut vars, &["skip"], Value::Number(skip.into()));
        }
        vars
    }

    fn many(&self, params: &ManyParams) -> Value {
        let id_in = self.conventions.in_filter("id");
        object([(
            "where",
            object([(id_in.as_str(), Value::List(params.ids.clone()))]),
        )])
    }

    fn reference(&self, resource: &Resource, params: &ReferenceParams) -> Value {
        let mut vars = self.list_variables(
            resource,
            &params.filter,
            params.pagination,
            params.sort.as_ref(),
        );
        if let Some(clause) = field_mut(&mut vars, "where") {
            filter::expand_path(clause, &params.target, params.id.clone());
        }
        vars
    }

    fn create(&self, resource: &Resource, params: &CreateParams) -> Result<Value, Error> {
        let input = self.conventions.create_input(&resource.name);
        let data = self.payload(WriteMode::Create, &input, &params.data, &Value::Null)?;
        Ok(object([("data", data)]))
    }

    fn update(&self, resource: &Resource, params: &UpdateParams) -> Result<Value, Error> {
        let id = field(&params.data, "id")
            .filter(|id| !matches!(id, Value::Null))
            .ok_or(Error::MissingId {
                operation: OperationKind::Update.name(),
            })?;
        let input = self.conventions.update_input(&resource.name);
        let data = self.payload(
            WriteMode::Update,
            &input,
            &params.data,
            &params.previous_data,
        )?;
        Ok(object([("where", id_object(id)), ("data", data)]))
    }

    /// Shape the payload `data` against the write input type `input`.
    ///
    /// Each field is [classified](RelationResolver::classify): kept fields are copied into the
    /// result, possibly rewritten into nested mutations, dropped fields are left out, and the
    /// first fatal field aborts the whole payload.
    pub fn payload(
        &self,
        mode: WriteMode,
        input: &str,
        data: &Value,
        previous: &Value,
    ) -> Result<Value, Error> {
        if self.schema.find_type(input).is_none() {
            tracing::warn!("no input type {input}, {mode} payload will be empty");
        }
        let resolver = RelationResolver::new(self.schema, &self.conventions);
        let Value::Object(fields) = data else {
            return Ok(Value::Object(Default::default()));
        };

        let mut payload = Value::Object(Default::default());
        for name in fields.keys() {
            match resolver.classify(mode, input, name.as_str(), data, previous) {
                Disposition::Keep(value) => insert_path(&mut payload, &[name.as_str()], value),
                Disposition::Drop(reason) => tracing::debug!("dropping {input}.{name}: {reason}"),
                Disposition::Fatal(err) => return Err(err),
            }
        }
        Ok(payload)
    }
}

/// Build an object value from a list of fields.
pub(crate) fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(name, value)| (Name::new(name), value))
            .collect(),
    )
}

/// The object `{ id }`.
pub(crate) fn id_object(id: &Value) -> Value {
    object([("id", id.clone())])
}

/// The field `name` of `value`, if `value` is an object which has one.
pub(crate) fn field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Object(fields) => fields.get(name),
        _ => None,
    }
}

fn field_mut<'a>(value: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(fields) => fields.get_mut(name),
        _ => None,
    }
}

/// Set the value at `path` in the object `target`, creating intermediate objects as needed.
///
/// Intermediate values which are not objects are replaced. Nothing happens if `target` is not an
/// object or `path` is empty.
pub(crate) fn insert_path(target: &mut Value, path: &[&str], leaf: Value) {
    let Value::Object(fields) = target else {
        return;
    };
    match path {
        [] => {}
        [last] => {
            fields.insert(Name::new(last), leaf);
        }
        [first, rest @ ..] => {
            let child = fields
                .entry(Name::new(first))
                .or_insert_with(|| Value::Object(Default::default()));
            if !matches!(child, Value::Object(_)) {
                *child = Value::Object(Default::default());
            }
            insert_path(child, rest, leaf);
        }
    }
}
