//! Introspection fixtures for testing.
//!
//! The fixture is a small blog schema in the style of the generators this crate targets: a `Post`
//! with a to-one relation `author` and a to-many relation `tags`, along with all of the generated
//! create, update and filter input types.
#![cfg(any(test, feature = "mocks"))]

use super::Schema;
use serde_json::{json, Value};

/// A reference to a named type.
pub fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

/// A non-null reference to `inner`.
pub fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

/// A list reference to `inner`.
pub fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

/// An input object type with the given input fields.
pub fn input_object<'a>(name: &str, fields: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    let fields: Vec<_> = fields
        .into_iter()
        .map(|(name, ty)| json!({ "name": name, "type": ty, "defaultValue": null }))
        .collect();
    json!({ "kind": "INPUT_OBJECT", "name": name, "fields": null, "inputFields": fields })
}

/// An object type with the given fields.
pub fn object<'a>(name: &str, fields: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    let fields: Vec<_> = fields
        .into_iter()
        .map(|(name, ty)| json!({ "name": name, "args": [], "type": ty }))
        .collect();
    json!({ "kind": "OBJECT", "name": name, "fields": fields, "inputFields": null })
}

/// A scalar type.
pub fn scalar(name: &str) -> Value {
    json!({ "kind": "SCALAR", "name": name, "fields": null, "inputFields": null })
}

fn string() -> Value {
    named("SCALAR", "String")
}

fn id() -> Value {
    named("SCALAR", "ID")
}

fn input(name: &str) -> Value {
    named("INPUT_OBJECT", name)
}

fn input_list(name: &str) -> Value {
    list(non_null(input(name)))
}

/// The introspection document of the blog schema, as returned by an introspection query.
pub fn blog_document() -> Value {
    let types = vec![
        scalar("ID"),
        scalar("String"),
        scalar("Int"),
        scalar("Boolean"),
        object(
            "Post",
            [
                ("id", non_null(id())),
                ("title", non_null(string())),
                ("views", named("SCALAR", "Int")),
                ("keywords", list(non_null(string()))),
                ("author", non_null(named("OBJECT", "Author"))),
                ("tags", list(non_null(named("OBJECT", "Tag")))),
                ("createdAt", non_null(string())),
            ],
        ),
        object(
            "Author",
            [("id", non_null(id())), ("name", non_null(string()))],
        ),
        object("Tag", [("id", non_null(id())), ("name", non_null(string()))]),
        input_object(
            "PostWhereInput",
            [
                ("id", id()),
                ("id_in", list(non_null(id()))),
                ("title", string()),
                ("views", named("SCALAR", "Int")),
                ("author", input("AuthorWhereInput")),
                ("tags_some", input("TagWhereInput")),
            ],
        ),
        input_object(
            "PostCreateInput",
            [
                ("title", non_null(string())),
                ("views", named("SCALAR", "Int")),
                ("keywords", list(non_null(string()))),
                ("author", non_null(input("AuthorCreateOneInput"))),
                ("tags", input("TagCreateManyInput")),
            ],
        ),
        input_object(
            "PostUpdateInput",
            [
                ("title", string()),
                ("views", named("SCALAR", "Int")),
                ("keywords", list(non_null(string()))),
                ("author", input("AuthorUpdateOneInput")),
                ("tags", input("TagUpdateManyInput")),
            ],
        ),
        input_object(
            "AuthorWhereInput",
            [
                ("id", id()),
                ("id_in", list(non_null(id()))),
                ("name", string()),
            ],
        ),
        input_object(
            "AuthorCreateOneInput",
            [
                ("connect", input("AuthorWhereUniqueInput")),
                ("create", input("AuthorCreateInput")),
            ],
        ),
        input_object(
            "AuthorUpdateOneInput",
            [
                ("connect", input("AuthorWhereUniqueInput")),
                ("disconnect", named("SCALAR", "Boolean")),
            ],
        ),
        input_object("AuthorCreateInput", [("name", non_null(string()))]),
        input_object("AuthorWhereUniqueInput", [("id", id())]),
        input_object(
            "TagWhereInput",
            [
                ("id", id()),
                ("id_in", list(non_null(id()))),
                ("name", string()),
            ],
        ),
        input_object(
            "TagCreateManyInput",
            [
                ("connect", input_list("TagWhereUniqueInput")),
                ("create", input_list("TagCreateInput")),
            ],
        ),
        input_object(
            "TagUpdateManyInput",
            [
                ("connect", input_list("TagWhereUniqueInput")),
                ("disconnect", input_list("TagWhereUniqueInput")),
                ("update", input_list("TagUpdateWithWhereUniqueNestedInput")),
            ],
        ),
        input_object(
            "TagUpdateWithWhereUniqueNestedInput",
            [
                ("where", non_null(input("TagWhereUniqueInput"))),
                ("data", non_null(input("TagUpdateDataInput"))),
            ],
        ),
        input_object("TagUpdateDataInput", [("name", string())]),
        input_object("TagCreateInput", [("name", non_null(string()))]),
        input_object("TagWhereUniqueInput", [("id", id())]),
    ];
    json!({ "data": { "__schema": { "types": types } } })
}

/// The blog schema.
pub fn blog() -> Schema {
    Schema::from_json(blog_document()).unwrap()
}

/// A schema containing only the given types.
pub fn schema(types: impl IntoIterator<Item = Value>) -> Schema {
    Schema::from_json(json!({ "types": types.into_iter().collect::<Vec<_>>() })).unwrap()
}
