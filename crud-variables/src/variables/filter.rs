//! Translation of list filters into `where` clauses.
//!
//! A list filter maps field names to the values to match. Most keys pass through unchanged as
//! equality filters, but a few are rewritten into the generated filter operators:
//!
//! * `ids` becomes `id_in`.
//! * A list or object value for a to-many relation becomes an "any member matches" filter on
//!   `<key>_some`, if the resource's `WhereInput` declares one. Each field of an object value
//!   becomes an `<field>_in` filter, with a single value matched as a one-element list.
//! * A dotted key `relation.field` becomes a nested filter `{ relation: { field } }`. Keys sharing
//!   a prefix are merged into the same nested filter.

use super::insert_path;
use crate::{convention::Conventions, schema::Schema, Name, Value};

/// Builds the `where` clause of a list query on one resource.
#[derive(Clone, Debug)]
pub struct FilterBuilder<'a> {
    schema: &'a Schema,
    conventions: &'a Conventions,
    where_input: String,
}

impl<'a> FilterBuilder<'a> {
    /// A builder for filters on the resource type `resource`.
    pub fn new(schema: &'a Schema, conventions: &'a Conventions, resource: &str) -> Self {
        Self {
            schema,
            conventions,
            where_input: conventions.where_input(resource),
        }
    }

    /// Translate `filter` into a `where` clause.
    ///
    /// A filter which is not an object (usually `null`, when the caller passed no filter) yields an
    /// empty clause.
    pub fn build(&self, filter: &Value) -> Value {
        let mut clause = Value::Object(Default::default());
        let Value::Object(filter) = filter else {
            return clause;
        };
        for (key, value) in filter {
            self.add(&mut clause, key.as_str(), value);
        }
        clause
    }

    fn add(&self, clause: &mut Value, key: &str, value: &Value) {
        if key == "ids" {
            let id_in = self.conventions.in_filter("id");
            insert_path(clause, &[id_in.as_str()], value.clone());
            return;
        }

        let some = self.conventions.some_filter(key);
        if self.declares(&some) {
            match value {
                Value::List(_) => {
                    let id_in = self.conventions.in_filter("id");
                    let filter = super::object([(id_in.as_str(), value.clone())]);
                    insert_path(clause, &[some.as_str()], filter);
                    return;
                }
                Value::Object(members) => {
                    let filter = Value::Object(
                        members
                            .iter()
                            .map(|(name, value)| {
                                let values = match value {
                                    Value::List(_) => value.clone(),
                                    value => Value::List(vec![value.clone()]),
                                };
                                (Name::new(self.conventions.in_filter(name.as_str())), values)
                            })
                            .collect(),
                    );
                    insert_path(clause, &[some.as_str()], filter);
                    return;
                }
                _ => {}
            }
        }

        let path: Vec<&str> = key.split('.').collect();
        if let [relation, "id"] = path.as_slice() {
            let some = self.conventions.some_filter(relation);
            if self.declares(&some) {
                insert_path(clause, &[some.as_str(), "id"], value.clone());
                return;
            }
        }
        // A key with an empty segment cannot be a path, so it is matched literally.
        if path.iter().any(|segment| segment.is_empty()) {
            insert_path(clause, &[key], value.clone());
        } else {
            insert_path(clause, &path, value.clone());
        }
    }

    /// Whether the resource's filter input declares `name`.
    fn declares(&self, name: &str) -> bool {
        self.schema.has_input_field(&self.where_input, name)
    }
}

/// Expand a dotted path such as `author.id` into a nested filter with `leaf` at the bottom.
pub fn expand_path(clause: &mut Value, path: &str, leaf: Value) {
    let path: Vec<&str> = path.split('.').collect();
    insert_path(clause, &path, leaf);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{init_logging, schema::mock, value};

    fn build(filter: Value) -> Value {
        let schema = mock::blog();
        let conventions = Conventions::default();
        FilterBuilder::new(&schema, &conventions, "Post").build(&filter)
    }

    #[test]
    fn test_filter() {
        init_logging();

        assert_eq!(
            build(value!({
                "ids": ["foo1", "foo2"],
                "tags": { "id": ["tag1", "tag2"] },
                "author.id": "author1",
                "views": 100,
            })),
            value!({
                "id_in": ["foo1", "foo2"],
                "tags_some": { "id_in": ["tag1", "tag2"] },
                "author": { "id": "author1" },
                "views": 100,
            })
        );
    }

    #[test]
    fn test_empty_filter() {
        init_logging();

        assert_eq!(build(Value::Null), value!({}));
        assert_eq!(build(value!({})), value!({}));
    }

    #[test]
    fn test_list_filter_on_relation() {
        init_logging();

        assert_eq!(
            build(value!({ "tags": ["tag1"] })),
            value!({ "tags_some": { "id_in": ["tag1"] } })
        );
        assert_eq!(
            build(value!({ "tags.id": "tag1" })),
            value!({ "tags_some": { "id": "tag1" } })
        );
    }

    #[test]
    fn test_scalar_member_filter() {
        init_logging();

        assert_eq!(
            build(value!({ "tags": { "name": "rust", "id": ["tag1"] } })),
            value!({ "tags_some": { "name_in": ["rust"], "id_in": ["tag1"] } })
        );
    }

    #[test]
    fn test_object_filter_without_some() {
        init_logging();

        // `PostWhereInput` has no `author_some`, so the object is nested as it is.
        assert_eq!(
            build(value!({ "author": { "id": "author1" } })),
            value!({ "author": { "id": "author1" } })
        );
        assert_eq!(
            build(value!({ "keywords": ["a", "b"] })),
            value!({ "keywords": ["a", "b"] })
        );
    }

    #[test]
    fn test_dotted_keys_merge() {
        init_logging();

        assert_eq!(
            build(value!({ "author.name": "Jeb", "author.id": "author1", "a.b.c": 1 })),
            value!({
                "author": { "name": "Jeb", "id": "author1" },
                "a": { "b": { "c": 1 } },
            })
        );
    }

    #[test]
    fn test_malformed_path() {
        init_logging();

        assert_eq!(build(value!({ "a..b": 1 })), value!({ "a..b": 1 }));
    }

    #[test]
    fn test_missing_where_input() {
        init_logging();

        let schema = mock::schema([]);
        let conventions = Conventions::default();
        assert_eq!(
            FilterBuilder::new(&schema, &conventions, "Post")
                .build(&value!({ "tags": { "id": ["tag1"] }, "ids": ["p1"] })),
            value!({ "tags": { "id": ["tag1"] }, "id_in": ["p1"] })
        );
    }

    #[test]
    fn test_expand_path() {
        let mut clause = value!({ "views": 1 });
        expand_path(&mut clause, "author.id", value!("author1"));
        assert_eq!(
            clause,
            value!({ "views": 1, "author": { "id": "author1" } })
        );
    }
}
