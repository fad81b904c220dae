//! Edit scripts for to-many relations.
//!
//! When an object is updated, each of its to-many relations is sent as the difference between the
//! old and the new set of members: members to [`connect`](Delta::to_add), members to
//! [`disconnect`](Delta::to_remove), and members present in both sets whose own scalar fields were
//! edited, which become nested [`update`](Delta::to_update)s.
//!
//! Members are identified by their `id` alone. Nested updates only look one level deep: a field
//! of a member which is itself an object or a list is never part of its update.

use super::{field, id_object, object};
use crate::Value;

/// The difference between two memberships of a to-many relation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Delta {
    /// Members of the new set which are not in the old set, as `{ id }` objects.
    pub to_add: Vec<Value>,
    /// Members of the old set which are not in the new set, as `{ id }` objects.
    pub to_remove: Vec<Value>,
    /// Members of both sets whose scalar fields changed, as `{ where: { id }, data }` objects.
    pub to_update: Vec<Value>,
}

impl Delta {
    /// Compute the edit script turning `old_ids` into `new_ids`.
    ///
    /// `old_items` and `new_items` are the lists of member objects the ids were taken from. They are
    /// used to compute the nested updates of members which are in both sets.
    pub fn compute(
        old_ids: &[Value],
        new_ids: &[Value],
        old_items: &Value,
        new_items: &Value,
    ) -> Self {
        let membership = Membership::compute(old_ids, new_ids);
        Self {
            to_add: membership.added.into_iter().map(id_object).collect(),
            to_remove: membership.removed.into_iter().map(id_object).collect(),
            to_update: nested_updates(&membership.kept, old_items, new_items),
        }
    }
}

/// The partition of two id lists into added, removed and kept ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Membership<'a> {
    /// Ids in the new list but not the old one, in the order of the new list.
    pub added: Vec<&'a Value>,
    /// Ids in the old list but not the new one, in the order of the old list.
    pub removed: Vec<&'a Value>,
    /// Ids in both lists, in the order of the old list.
    pub kept: Vec<&'a Value>,
}

impl<'a> Membership<'a> {
    pub fn compute(old_ids: &'a [Value], new_ids: &'a [Value]) -> Self {
        let (kept, removed) = old_ids.iter().partition(|id| new_ids.contains(id));
        let added = new_ids.iter().filter(|id| !old_ids.contains(id)).collect();
        Self {
            added,
            removed,
            kept,
        }
    }
}

/// Nested updates for the members `ids`, which are present in both `old_items` and `new_items`.
///
/// A member is skipped if it cannot be found in either list or if none of its scalar fields
/// changed.
pub fn nested_updates(ids: &[&Value], old_items: &Value, new_items: &Value) -> Vec<Value> {
    ids.iter()
        .filter_map(|&id| {
            let old = find_item(old_items, id)?;
            let new = find_item(new_items, id)?;
            let changes = changed_fields(old, new);
            if changes.is_empty() {
                return None;
            }
            Some(object([
                ("where", id_object(id)),
                ("data", object(changes)),
            ]))
        })
        .collect()
}

/// The scalar fields of `old` whose value is different in `new`, with their new values.
///
/// Only the fields of `old` are considered. A field missing from `new` is not a change, and
/// neither is a field whose old value is an object or a list.
pub fn changed_fields<'a>(old: &'a Value, new: &'a Value) -> Vec<(&'a str, Value)> {
    let Value::Object(old) = old else {
        return vec![];
    };
    old.iter()
        .filter(|(_, old_value)| !matches!(old_value, Value::Object(_) | Value::List(_)))
        .filter_map(|(name, old_value)| {
            let new_value = field(new, name)?;
            (new_value != old_value).then(|| (name.as_str(), new_value.clone()))
        })
        .collect()
}

/// The first object in the list `items` whose `id` is `id`.
fn find_item<'a>(items: &'a Value, id: &Value) -> Option<&'a Value> {
    let Value::List(items) = items else {
        return None;
    };
    items.iter().find(|item| field(item, "id") == Some(id))
}
