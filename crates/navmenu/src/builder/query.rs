//! Attribute queries, tree navigation, filtering, and sorting.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde_json::Value;

use super::Builder;
use crate::error::{MenuError, MenuResult};
use crate::item::Item;

/// Direction for [`Builder::sort_by`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl Builder {
    /// Items whose `attribute` loosely equals `value`.
    ///
    /// The attribute is looked up with [`Item::get`]: declared fields
    /// first, then metadata. With `recursive`, each match is followed by
    /// its descendants, parent before children.
    pub fn where_attr(&self, attribute: &str, value: &Value, recursive: bool) -> Vec<&Item> {
        if !recursive {
            return self
                .items
                .iter()
                .filter(|item| matches_attr(item, attribute, value))
                .collect();
        }

        let mut seen = HashSet::new();
        self.where_recursive(attribute, value, &mut seen)
    }

    fn where_recursive<'a>(
        &'a self,
        attribute: &str,
        value: &Value,
        seen: &mut HashSet<&'a str>,
    ) -> Vec<&'a Item> {
        let mut found = Vec::new();
        for item in self
            .items
            .iter()
            .filter(|item| matches_attr(item, attribute, value))
        {
            if !seen.insert(item.id.as_str()) {
                continue;
            }
            found.push(item);
            if self.has_children(&item.id) {
                let id = Value::String(item.id.clone());
                found.extend(self.where_recursive("parent", &id, seen));
            }
        }
        found
    }

    pub fn where_id(&self, id: &str) -> Vec<&Item> {
        self.where_attr("id", &Value::String(id.to_string()), false)
    }

    pub fn where_nickname(&self, nickname: &str) -> Vec<&Item> {
        self.where_attr("nickname", &Value::String(nickname.to_string()), false)
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    pub fn where_parent(&self, parent: Option<&str>, recursive: bool) -> Vec<&Item> {
        let value = parent.map_or(Value::Null, |p| Value::String(p.to_string()));
        self.where_attr("parent", &value, recursive)
    }

    /// Item by id; the first match wins.
    pub fn find(&self, id: &str) -> Option<&Item> {
        self.where_id(id).into_iter().next()
    }

    /// Item by nickname; the last match wins.
    pub fn get(&self, nickname: &str) -> Option<&Item> {
        self.where_nickname(nickname).into_iter().last()
    }

    /// Alias of [`Builder::get`].
    pub fn item(&self, nickname: &str) -> Option<&Item> {
        self.get(nickname)
    }

    pub fn all(&self) -> &[Item] {
        &self.items
    }

    pub fn first(&self) -> Option<&Item> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&Item> {
        self.items.last()
    }

    /// Items with no parent.
    pub fn roots(&self) -> Vec<&Item> {
        self.where_parent(None, false)
    }

    /// The item matched by activation, if any.
    pub fn active(&self) -> Option<&Item> {
        self.where_attr("active", &Value::Bool(true), false)
            .into_iter()
            .next()
    }

    pub fn children_of(&self, id: &str) -> Vec<&Item> {
        self.where_parent(Some(id), false)
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.parent.as_deref() == Some(id))
    }

    /// All descendants of `id`, pre-order.
    pub fn descendants(&self, id: &str) -> Vec<&Item> {
        self.where_parent(Some(id), true)
    }

    pub fn parent_of(&self, item: &Item) -> Option<&Item> {
        item.parent.as_deref().and_then(|p| self.find(p))
    }

    /// Ancestors of `item`, root first, excluding the item itself.
    pub fn ancestors(&self, item: &Item) -> MenuResult<Vec<&Item>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([item.id.as_str()]);
        let mut current = self.parent_of(item);
        while let Some(parent) = current {
            if !seen.insert(parent.id.as_str()) {
                return Err(MenuError::ParentCycle {
                    menu: self.name.clone(),
                    id: item.id.clone(),
                });
            }
            chain.push(parent);
            current = self.parent_of(parent);
        }
        chain.reverse();
        Ok(chain)
    }

    /// Keep only the items matching `predicate`.
    pub fn filter<P>(&mut self, mut predicate: P) -> &mut Self
    where
        P: FnMut(&Item) -> bool,
    {
        self.items.retain(|item| predicate(item));
        self
    }

    /// Stable sort by an attribute looked up through [`Item::get`].
    pub fn sort_by(&mut self, attribute: &str, direction: SortDirection) -> &mut Self {
        self.items.sort_by(|a, b| {
            let ordering = compare_values(a.get(attribute).as_ref(), b.get(attribute).as_ref());
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        self
    }

    /// Replace the items with whatever `reorder` returns for them.
    pub fn sort_with<F>(&mut self, reorder: F) -> &mut Self
    where
        F: FnOnce(Vec<Item>) -> Vec<Item>,
    {
        let items = std::mem::take(&mut self.items);
        self.items = reorder(items);
        self
    }
}

fn matches_attr(item: &Item, attribute: &str, value: &Value) -> bool {
    item.get(attribute)
        .is_some_and(|actual| loose_eq(&actual, value))
}

/// Value equality where numeric strings equal numbers and booleans compare
/// by truthiness. Null only equals null.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == truthy(other),
        (Value::String(x), Value::String(y)) => {
            x == y || matches!((as_number(x), as_number(y)), (Some(m), Some(n)) if m == n)
        }
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            matches!((n.as_f64(), as_number(s)), (Some(m), Some(k)) if m == k)
        }
        (Value::Number(m), Value::Number(n)) => m.as_f64() == n.as_f64(),
        _ => a == b,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn as_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Ordering for sort keys: missing first, numbers numerically, numeric
/// strings numerically, other strings lexically. Anything else ties.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    let numeric = |v: &Value| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => as_number(s),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    };

    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
