//! Naming conventions of the generated schema.
//!
//! Schema generators derive the names of input types and filter fields from the name of the
//! resource type or field they belong to: the resource `Post` gets a `PostCreateInput`, a
//! `PostUpdateInput` and a `PostWhereInput`, and a relation field `tags` gets list filters named
//! `tags_some` and `id_in`. The whole builder relies on these conventions, so they live in one
//! place, [`Conventions`], which can be substituted when a generator uses different suffixes.

use serde::Deserialize;

/// The naming policy used to find generated types and fields.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Conventions {
    /// Suffix of the input type used to create a resource.
    pub create_input_suffix: String,
    /// Suffix of the input type used to update a resource.
    pub update_input_suffix: String,
    /// Suffix of the input type used to filter a resource.
    pub where_input_suffix: String,
    /// Suffix of the payload field carrying the member ids of a to-many relation.
    pub ids_suffix: String,
    /// Suffix of the filter matching any of a list of values.
    pub in_suffix: String,
    /// Suffix of the filter matching a to-many relation with at least one matching member.
    pub some_suffix: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            create_input_suffix: "CreateInput".into(),
            update_input_suffix: "UpdateInput".into(),
            where_input_suffix: "WhereInput".into(),
            ids_suffix: "Ids".into(),
            in_suffix: "_in".into(),
            some_suffix: "_some".into(),
        }
    }
}

impl Conventions {
    /// The input type used to create objects of type `ty`, e.g. `PostCreateInput`.
    pub fn create_input(&self, ty: &str) -> String {
        format!("{ty}{}", self.create_input_suffix)
    }

    /// The input type used to update objects of type `ty`, e.g. `PostUpdateInput`.
    pub fn update_input(&self, ty: &str) -> String {
        format!("{ty}{}", self.update_input_suffix)
    }

    /// The input type used to filter objects of type `ty`, e.g. `PostWhereInput`.
    pub fn where_input(&self, ty: &str) -> String {
        format!("{ty}{}", self.where_input_suffix)
    }

    /// The payload field listing the members of the to-many relation `field`, e.g. `tagsIds`.
    pub fn ids_sibling(&self, field: &str) -> String {
        format!("{field}{}", self.ids_suffix)
    }

    /// If `field` is the id sibling of a relation, the name of that relation.
    pub fn relation_of_ids_sibling<'a>(&self, field: &'a str) -> Option<&'a str> {
        field
            .strip_suffix(self.ids_suffix.as_str())
            .filter(|relation| !relation.is_empty())
    }

    /// The filter matching any of a list of values of `field`, e.g. `id_in`.
    pub fn in_filter(&self, field: &str) -> String {
        format!("{field}{}", self.in_suffix)
    }

    /// The filter matching a relation with at least one matching member, e.g. `tags_some`.
    pub fn some_filter(&self, field: &str) -> String {
        format!("{field}{}", self.some_suffix)
    }
}
