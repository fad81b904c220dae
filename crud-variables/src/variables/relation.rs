//! Shaping of payload fields for create and update mutations.
//!
//! Every top-level field of a payload is classified against the resource's write input type
//! (`PostCreateInput` or `PostUpdateInput`) into a [`Disposition`]:
//!
//! * Fields the input type does not declare are dropped. This is how computed fields, timestamps
//!   and client-side bookkeeping are kept out of outgoing mutations.
//! * Fields whose input type is a scalar, an enum or a list of those are kept as they are.
//! * Fields whose input type is an input object are relations, and the payload value is rewritten
//!   into a nested mutation. A to-one relation becomes `connect` if the value carries an `id` and
//!   `create` otherwise. A to-many relation becomes `connect` on create and the
//!   [`Delta`](super::diff::Delta) between the previous and new members on update. A relation
//!   set to `null` on update is disconnected: `disconnect: true` for a to-one relation, every
//!   previous member for a to-many relation.
//!
//! Classification never fails because of the payload. It only fails when the schema itself is
//! inconsistent, for example when an input field references a type the document does not contain.

use super::{diff::Delta, field, id_object, object};
use crate::{
    convention::Conventions,
    schema::{Schema, TypeDescriptor, TypeKind},
    Error, Value,
};
use derive_more::Display;

/// What to do with one field of a payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Disposition {
    /// Send the field with this value.
    Keep(Value),
    /// Leave the field out of the mutation.
    Drop(DropReason),
    /// Abort building the variables.
    Fatal(Error),
}

impl Disposition {
    fn from_result(result: Result<Disposition, Error>) -> Self {
        result.unwrap_or_else(Self::Fatal)
    }
}

/// Why a field was left out of a mutation.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum DropReason {
    #[display(fmt = "not declared by the input type")]
    NotInSchema,
    #[display(fmt = "the resource has no input type")]
    NoInputType,
    #[display(fmt = "the relation input offers no applicable operation")]
    NoSubOperation,
    #[display(fmt = "the value is not shaped like a relation")]
    NotARelation,
    #[display(fmt = "the id of an updated object is not writable")]
    Identifier,
    #[display(fmt = "creating related objects through a list is not supported")]
    NestedCreate,
    #[display(fmt = "member ids are sent through their relation")]
    IdsSibling,
}

/// Whether a payload is for a create or an update mutation.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum WriteMode {
    #[display(fmt = "create")]
    Create,
    #[display(fmt = "update")]
    Update,
}

/// Classifies payload fields and rewrites relations into nested mutations.
#[derive(Clone, Copy, Debug)]
pub struct RelationResolver<'a> {
    schema: &'a Schema,
    conventions: &'a Conventions,
}

impl<'a> RelationResolver<'a> {
    pub fn new(schema: &'a Schema, conventions: &'a Conventions) -> Self {
        Self {
            schema,
            conventions,
        }
    }

    /// Classify the field `name` of the payload `data`.
    ///
    /// `input_type` is the write input type of the resource. On update, `previous` is the object
    /// before the edit, which is used to compute the changes to to-many relations.
    pub fn classify(
        &self,
        mode: WriteMode,
        input_type: &str,
        name: &str,
        data: &Value,
        previous: &Value,
    ) -> Disposition {
        if mode == WriteMode::Update && name == "id" {
            return Disposition::Drop(DropReason::Identifier);
        }
        let Some(input) = self.schema.find_type(input_type) else {
            return Disposition::Drop(DropReason::NoInputType);
        };
        let Some(declared) = input.input_field(name) else {
            return Disposition::Drop(self.undeclared(input, name, data));
        };
        let value = field(data, name).unwrap_or(&Value::Null);
        if declared.ty.kind() != TypeKind::InputObject {
            return Disposition::Keep(value.clone());
        }
        let Some(relation_input) = declared.ty.name() else {
            return Disposition::Fatal(Error::UnnamedType {
                ty: input_type.into(),
                field: name.into(),
            });
        };
        let relation_input = match self
            .schema
            .require_type(relation_input, format_args!("{input_type}.{name}"))
        {
            Ok(ty) => ty,
            Err(err) => return Disposition::Fatal(err),
        };

        match (value, mode) {
            (Value::List(_), WriteMode::Create) => self.connect_many(name, data),
            (Value::List(_), WriteMode::Update) => self.update_many(name, data, previous),
            (Value::Object(_), _) => Disposition::from_result(self.to_one(relation_input, value)),
            (Value::Null, WriteMode::Update) if is_to_many(relation_input) => {
                self.clear_many(name, previous)
            }
            (Value::Null, WriteMode::Update) => self.disconnect_one(relation_input),
            (Value::Null, WriteMode::Create) => Disposition::Drop(DropReason::NoSubOperation),
            _ => Disposition::Drop(DropReason::NotARelation),
        }
    }

    /// Why a field which `input` does not declare is dropped.
    fn undeclared(&self, input: &TypeDescriptor, name: &str, data: &Value) -> DropReason {
        match self.conventions.relation_of_ids_sibling(name) {
            Some(relation)
                if input.input_field(relation).is_some() && field(data, relation).is_some() =>
            {
                DropReason::IdsSibling
            }
            _ => DropReason::NotInSchema,
        }
    }

    /// Rewrite the value of a to-one relation into `connect` or `create`.
    ///
    /// A value with an `id` always refers to an existing object, even if it has other fields as
    /// well, so it becomes `connect: { id }`. A value without an `id` becomes `create` with those of
    /// its fields that the created type declares.
    pub fn to_one(
        &self,
        relation_input: &TypeDescriptor,
        value: &Value,
    ) -> Result<Disposition, Error> {
        if let Some(id) = item_id(value) {
            if relation_input.input_field("connect").is_none() {
                return Ok(Disposition::Drop(DropReason::NoSubOperation));
            }
            return Ok(Disposition::Keep(object([("connect", id_object(id))])));
        }

        let Some(create) = relation_input.input_field("create") else {
            return Ok(Disposition::Drop(DropReason::NoSubOperation));
        };
        let target = create.ty.name().ok_or_else(|| Error::UnnamedType {
            ty: relation_input.name().into(),
            field: "create".into(),
        })?;
        let target = self
            .schema
            .require_type(target, format_args!("{}.create", relation_input.name()))?;

        let Value::Object(fields) = value else {
            return Ok(Disposition::Drop(DropReason::NotARelation));
        };
        let fields = fields
            .iter()
            .filter(|(name, _)| {
                let declared = target.input_field(name.as_str()).is_some();
                if !declared {
                    tracing::debug!(
                        "dropping {}.{name}: {}",
                        target.name(),
                        DropReason::NotInSchema
                    );
                }
                declared
            })
            .map(|(name, value)| (name.as_str(), value.clone()));
        Ok(Disposition::Keep(object([("create", object(fields))])))
    }

    /// Disconnect a to-one relation which was cleared in an update.
    pub fn disconnect_one(&self, relation_input: &TypeDescriptor) -> Disposition {
        let disconnect = relation_input.input_field("disconnect");
        if disconnect.map_or(false, |field| !field.ty.is_list()) {
            Disposition::Keep(object([("disconnect", Value::Boolean(true))]))
        } else {
            Disposition::Drop(DropReason::NoSubOperation)
        }
    }

    /// Connect the members of the to-many relation `name` of a new object.
    pub fn connect_many(&self, name: &str, data: &Value) -> Disposition {
        let Some(ids) = self.member_ids(name, data) else {
            return self.nested_create(name);
        };
        Disposition::Keep(object([(
            "connect",
            Value::List(ids.iter().map(id_object).collect()),
        )]))
    }

    /// Rewrite the to-many relation `name` of an updated object into its edit script.
    ///
    /// The result always contains `connect`, `disconnect` and `update`, even if they are empty.
    pub fn update_many(&self, name: &str, data: &Value, previous: &Value) -> Disposition {
        let Some(new_ids) = self.member_ids(name, data) else {
            return self.nested_create(name);
        };
        // Members of the previous object come from the server, so an item without an id is
        // not something we could disconnect anyway.
        let old_ids = self
            .member_ids(name, previous)
            .unwrap_or_else(|| known_ids(field(previous, name)));
        let old_items = field(previous, name).unwrap_or(&Value::Null);
        let new_items = field(data, name).unwrap_or(&Value::Null);

        let delta = Delta::compute(&old_ids, &new_ids, old_items, new_items);
        Disposition::Keep(edit_script(delta))
    }

    /// Disconnect every previous member of the to-many relation `name`, which was cleared in an
    /// update.
    pub fn clear_many(&self, name: &str, previous: &Value) -> Disposition {
        let old_ids = self
            .member_ids(name, previous)
            .unwrap_or_else(|| known_ids(field(previous, name)));
        let old_items = field(previous, name).unwrap_or(&Value::Null);
        let delta = Delta::compute(&old_ids, &[], old_items, &Value::Null);
        Disposition::Keep(edit_script(delta))
    }

    /// The member ids of the to-many relation `name` in `payload`.
    ///
    /// The `<name>Ids` sibling is authoritative if it is present. Otherwise the ids are taken from
    /// the members themselves, which may be `{ id }` objects or bare ids. Returns [`None`] if some
    /// member has no id, meaning it is a new object.
    fn member_ids(&self, name: &str, payload: &Value) -> Option<Vec<Value>> {
        if let Some(Value::List(ids)) = field(payload, &self.conventions.ids_sibling(name)) {
            return Some(ids.clone());
        }
        match field(payload, name) {
            Some(Value::List(items)) => items.iter().map(|item| item_id(item).cloned()).collect(),
            _ => Some(vec![]),
        }
    }

    /// Members without ids are new objects. Whether these should become `create` entries is
    /// undecided, so for now such a relation is left out of the mutation.
    fn nested_create(&self, name: &str) -> Disposition {
        tracing::warn!("dropping relation {name}: {}", DropReason::NestedCreate);
        Disposition::Drop(DropReason::NestedCreate)
    }
}

/// The nested mutation of a to-many relation. All three keys are present even if empty.
fn edit_script(delta: Delta) -> Value {
    object([
        ("connect", Value::List(delta.to_add)),
        ("disconnect", Value::List(delta.to_remove)),
        ("update", Value::List(delta.to_update)),
    ])
}

/// Whether `relation_input` belongs to a to-many relation, i.e. connects or disconnects lists.
fn is_to_many(relation_input: &TypeDescriptor) -> bool {
    ["connect", "disconnect"]
        .into_iter()
        .filter_map(|op| relation_input.input_field(op))
        .any(|field| field.ty.is_list())
}

/// The id of a member of a relation: the `id` field of an object, or a bare scalar id.
fn item_id(item: &Value) -> Option<&Value> {
    match item {
        Value::Object(_) => field(item, "id").filter(|id| !matches!(id, Value::Null)),
        Value::String(_) | Value::Number(_) => Some(item),
        _ => None,
    }
}

/// The ids of the members of `items` which have one.
fn known_ids(items: Option<&Value>) -> Vec<Value> {
    match items {
        Some(Value::List(items)) => items.iter().filter_map(item_id).cloned().collect(),
        _ => vec![],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{init_logging, schema::mock, value};

    fn classify(mode: WriteMode, name: &str, data: Value, previous: Value) -> Disposition {
        let schema = mock::blog();
        let conventions = Conventions::default();
        let input = match mode {
            WriteMode::Create => "PostCreateInput",
            WriteMode::Update => "PostUpdateInput",
        };
        RelationResolver::new(&schema, &conventions).classify(mode, input, name, &data, &previous)
    }

    fn create(name: &str, data: Value) -> Disposition {
        classify(WriteMode::Create, name, data, Value::Null)
    }

    #[test]
    fn test_scalars() {
        init_logging();

        assert_eq!(
            create("title", value!({ "title": "Foo" })),
            Disposition::Keep(value!("Foo"))
        );
        assert_eq!(
            create("views", value!({ "views": null })),
            Disposition::Keep(Value::Null)
        );
        assert_eq!(
            create("keywords", value!({ "keywords": ["rust", "graphql"] })),
            Disposition::Keep(value!(["rust", "graphql"]))
        );
        assert_eq!(
            create("createdAt", value!({ "createdAt": "2020-01-01" })),
            Disposition::Drop(DropReason::NotInSchema)
        );
    }

    #[test]
    fn test_ids_sibling() {
        init_logging();

        let data = value!({ "tags": [{ "id": "t1" }], "tagsIds": ["t1"], "fooIds": ["x"] });
        assert_eq!(
            create("tagsIds", data.clone()),
            Disposition::Drop(DropReason::IdsSibling)
        );
        assert_eq!(
            create("fooIds", data),
            Disposition::Drop(DropReason::NotInSchema)
        );
    }

    #[test]
    fn test_connect_over_create() {
        init_logging();

        assert_eq!(
            create("author", value!({ "author": { "id": "author1" } })),
            Disposition::Keep(value!({ "connect": { "id": "author1" } }))
        );
        assert_eq!(
            create(
                "author",
                value!({ "author": { "id": "author1", "name": "differentName" } })
            ),
            Disposition::Keep(value!({ "connect": { "id": "author1" } }))
        );
    }

    #[test]
    fn test_create_to_one() {
        init_logging();

        assert_eq!(
            create(
                "author",
                value!({ "author": { "name": "author1", "createdAt": "2020-01-01" } })
            ),
            Disposition::Keep(value!({ "create": { "name": "author1" } }))
        );
        assert_eq!(
            create("author", value!({ "author": { "id": null, "name": "author1" } })),
            Disposition::Keep(value!({ "create": { "name": "author1" } }))
        );
    }

    #[test]
    fn test_missing_sub_operation() {
        init_logging();

        // `AuthorUpdateOneInput` can connect and disconnect, but not create.
        assert_eq!(
            classify(
                WriteMode::Update,
                "author",
                value!({ "id": "post1", "author": { "name": "author1" } }),
                Value::Null
            ),
            Disposition::Drop(DropReason::NoSubOperation)
        );
    }

    #[test]
    fn test_disconnect_to_one() {
        init_logging();

        assert_eq!(
            classify(
                WriteMode::Update,
                "author",
                value!({ "id": "post1", "author": null }),
                value!({ "id": "post1", "author": { "id": "author1" } })
            ),
            Disposition::Keep(value!({ "disconnect": true }))
        );
        assert_eq!(
            create("author", value!({ "author": null })),
            Disposition::Drop(DropReason::NoSubOperation)
        );
        assert_eq!(
            create("author", value!({ "author": "author1" })),
            Disposition::Drop(DropReason::NotARelation)
        );
    }

    #[test]
    fn test_clear_to_many() {
        init_logging();

        assert_eq!(
            classify(
                WriteMode::Update,
                "tags",
                value!({ "id": "post1", "tags": null }),
                value!({ "id": "post1", "tags": [{ "id": "t1" }, { "id": "t2" }], "tagsIds": ["t1", "t2"] })
            ),
            Disposition::Keep(value!({
                "connect": [],
                "disconnect": [{ "id": "t1" }, { "id": "t2" }],
                "update": [],
            }))
        );
        assert_eq!(
            classify(
                WriteMode::Update,
                "tags",
                value!({ "id": "post1", "tags": null }),
                Value::Null
            ),
            Disposition::Keep(value!({ "connect": [], "disconnect": [], "update": [] }))
        );
    }

    #[test]
    fn test_list_disconnect_is_not_to_one() {
        init_logging();

        let schema = mock::blog();
        let conventions = Conventions::default();
        let resolver = RelationResolver::new(&schema, &conventions);
        let tags = schema.find_type("TagUpdateManyInput").unwrap();
        assert_eq!(
            resolver.disconnect_one(tags),
            Disposition::Drop(DropReason::NoSubOperation)
        );
        let author = schema.find_type("AuthorUpdateOneInput").unwrap();
        assert_eq!(
            resolver.disconnect_one(author),
            Disposition::Keep(value!({ "disconnect": true }))
        );
    }

    #[test]
    fn test_update_drops_id() {
        init_logging();

        assert_eq!(
            classify(
                WriteMode::Update,
                "id",
                value!({ "id": "post1" }),
                Value::Null
            ),
            Disposition::Drop(DropReason::Identifier)
        );
    }

    #[test]
    fn test_connect_many() {
        init_logging();

        assert_eq!(
            create(
                "tags",
                value!({ "tags": [{ "id": "tags1" }, { "id": "tags2" }], "tagsIds": ["tags1", "tags2"] })
            ),
            Disposition::Keep(value!({ "connect": [{ "id": "tags1" }, { "id": "tags2" }] }))
        );

        // Without the sibling the members are their own ids.
        assert_eq!(
            create("tags", value!({ "tags": [{ "id": "tags1" }, "tags2"] })),
            Disposition::Keep(value!({ "connect": [{ "id": "tags1" }, { "id": "tags2" }] }))
        );
    }

    #[test]
    fn test_ids_sibling_is_authoritative_on_create() {
        init_logging();

        assert_eq!(
            create(
                "tags",
                value!({ "tags": [{ "name": "tags1" }, { "name": "tags2" }], "tagsIds": ["tags1", "tags2"] })
            ),
            Disposition::Keep(value!({ "connect": [{ "id": "tags1" }, { "id": "tags2" }] }))
        );
    }

    #[test]
    fn test_nested_create_is_unsupported() {
        init_logging();

        assert_eq!(
            create("tags", value!({ "tags": [{ "name": "tags1" }, { "name": "tags2" }] })),
            Disposition::Drop(DropReason::NestedCreate)
        );
    }

    #[test]
    fn test_update_many() {
        init_logging();

        assert_eq!(
            classify(
                WriteMode::Update,
                "tags",
                value!({
                    "id": "postId",
                    "tags": [{ "id": "tags1", "name": "test" }, { "id": "tags2" }, { "id": "tags4" }],
                    "tagsIds": ["tags1", "tags2", "tags4"],
                }),
                value!({
                    "id": "postId",
                    "tags": [{ "id": "tags1", "name": "works" }, { "id": "tags2" }, { "id": "tags3" }],
                    "tagsIds": ["tags1", "tags2", "tags3"],
                })
            ),
            Disposition::Keep(value!({
                "connect": [{ "id": "tags4" }],
                "disconnect": [{ "id": "tags3" }],
                "update": [{ "where": { "id": "tags1" }, "data": { "name": "test" } }],
            }))
        );
    }

    #[test]
    fn test_update_many_without_previous() {
        init_logging();

        assert_eq!(
            classify(
                WriteMode::Update,
                "tags",
                value!({ "id": "postId", "tags": [{ "id": "tags1" }], "tagsIds": ["tags1"] }),
                Value::Null
            ),
            Disposition::Keep(value!({
                "connect": [{ "id": "tags1" }],
                "disconnect": [],
                "update": [],
            }))
        );
    }

    #[test]
    fn test_no_input_type() {
        init_logging();

        let schema = mock::blog();
        let conventions = Conventions::default();
        assert_eq!(
            RelationResolver::new(&schema, &conventions).classify(
                WriteMode::Create,
                "CommentCreateInput",
                "body",
                &value!({ "body": "hi" }),
                &Value::Null
            ),
            Disposition::Drop(DropReason::NoInputType)
        );
    }

    #[test]
    fn test_dangling_reference_is_fatal() {
        init_logging();

        let schema = mock::schema([mock::input_object(
            "PostCreateInput",
            [("author", mock::named("INPUT_OBJECT", "AuthorCreateOneInput"))],
        )]);
        let conventions = Conventions::default();
        assert_eq!(
            RelationResolver::new(&schema, &conventions).classify(
                WriteMode::Create,
                "PostCreateInput",
                "author",
                &value!({ "author": { "id": "author1" } }),
                &Value::Null
            ),
            Disposition::Fatal(Error::MissingType {
                name: "AuthorCreateOneInput".into(),
                referenced_by: "PostCreateInput.author".into(),
            })
        );
    }

    #[test]
    fn test_unnamed_reference_is_fatal() {
        init_logging();

        let schema = mock::schema([mock::input_object(
            "PostCreateInput",
            [("author", mock::named("INPUT_OBJECT", ""))],
        )]);
        let conventions = Conventions::default();
        assert_eq!(
            RelationResolver::new(&schema, &conventions).classify(
                WriteMode::Create,
                "PostCreateInput",
                "author",
                &value!({ "author": { "id": "author1" } }),
                &Value::Null
            ),
            Disposition::Fatal(Error::UnnamedType {
                ty: "PostCreateInput".into(),
                field: "author".into(),
            })
        );
    }
}
