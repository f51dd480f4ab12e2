//! JSON (de)serialization of a tree's node-record shape (§6, §4.9).
//!
//! A node record is `{min_x, min_y, max_x, max_y, height, leaf, children}`;
//! `children` holds item records (`{min_x, min_y, max_x, max_y, data}`) when
//! `leaf` is `true`, nested node records otherwise. `from_json` validates
//! this shape explicitly rather than trusting `#[derive(Deserialize)]` to
//! reject a malformed tree, since a structurally valid-but-inconsistent
//! record (wrong `height`, a leaf with node children) would otherwise
//! deserialize into a tree that violates the crate's own invariants.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::error::Error;
use crate::item::Item;
use crate::node::{Node, NodeChildren};
use crate::rect::Rectangle;

fn shape_err(reason: impl Into<String>) -> Error {
    Error::InvalidShape {
        reason: reason.into(),
    }
}

pub fn to_json<T: Serialize>(root: &Node<T>) -> String {
    node_to_value(root).to_string()
}

pub fn from_json<T: DeserializeOwned>(data: &str) -> Result<Node<T>, Error> {
    let value: Value =
        serde_json::from_str(data).map_err(|e| shape_err(format!("invalid JSON: {e}")))?;
    value_to_node(&value)
}

fn node_to_value<T: Serialize>(node: &Node<T>) -> Value {
    let mut obj = Map::new();
    obj.insert("min_x".into(), Value::from(node.rect.min_x));
    obj.insert("min_y".into(), Value::from(node.rect.min_y));
    obj.insert("max_x".into(), Value::from(node.rect.max_x));
    obj.insert("max_y".into(), Value::from(node.rect.max_y));
    obj.insert("height".into(), Value::from(node.height));
    obj.insert("leaf".into(), Value::from(node.is_leaf()));
    let children = match &node.children {
        NodeChildren::Leaf(items) => Value::Array(items.iter().map(item_to_value).collect()),
        NodeChildren::Interior(nodes) => Value::Array(nodes.iter().map(node_to_value).collect()),
    };
    obj.insert("children".into(), children);
    Value::Object(obj)
}

fn item_to_value<T: Serialize>(item: &Item<T>) -> Value {
    let mut obj = Map::new();
    obj.insert("min_x".into(), Value::from(item.min_x));
    obj.insert("min_y".into(), Value::from(item.min_y));
    obj.insert("max_x".into(), Value::from(item.max_x));
    obj.insert("max_y".into(), Value::from(item.max_y));
    // falls back to null on a payload whose Serialize impl fails, rather
    // than panicking mid-traversal.
    obj.insert(
        "data".into(),
        serde_json::to_value(&item.data).unwrap_or(Value::Null),
    );
    Value::Object(obj)
}

fn get_f64(obj: &Map<String, Value>, key: &str) -> Result<f64, Error> {
    obj.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| shape_err(format!("missing numeric `{key}`")))
}

fn get_usize(obj: &Map<String, Value>, key: &str) -> Result<usize, Error> {
    obj.get(key)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .ok_or_else(|| shape_err(format!("missing numeric `{key}`")))
}

fn value_to_node<T: DeserializeOwned>(value: &Value) -> Result<Node<T>, Error> {
    let obj = value
        .as_object()
        .ok_or_else(|| shape_err("expected a node record object"))?;
    let min_x = get_f64(obj, "min_x")?;
    let min_y = get_f64(obj, "min_y")?;
    let max_x = get_f64(obj, "max_x")?;
    let max_y = get_f64(obj, "max_y")?;
    let height = get_usize(obj, "height")?;
    let leaf = obj
        .get("leaf")
        .and_then(Value::as_bool)
        .ok_or_else(|| shape_err("missing boolean `leaf`"))?;
    let children_array = obj
        .get("children")
        .and_then(Value::as_array)
        .ok_or_else(|| shape_err("`children` must be an array"))?;

    let children = if leaf {
        if height != 1 {
            return Err(shape_err("a leaf node record must have height 1"));
        }
        let items = children_array
            .iter()
            .map(value_to_item::<T>)
            .collect::<Result<Vec<_>, _>>()?;
        NodeChildren::Leaf(SmallVec::from_vec(items))
    } else {
        let nodes = children_array
            .iter()
            .map(value_to_node::<T>)
            .collect::<Result<Vec<_>, _>>()?;
        for child in &nodes {
            if child.height + 1 != height {
                return Err(shape_err(
                    "child node height is inconsistent with its parent's height",
                ));
            }
        }
        NodeChildren::Interior(SmallVec::from_vec(nodes))
    };

    Ok(Node {
        rect: Rectangle::new(min_x, min_y, max_x, max_y),
        height,
        children,
    })
}

fn value_to_item<T: DeserializeOwned>(value: &Value) -> Result<Item<T>, Error> {
    let obj = value
        .as_object()
        .ok_or_else(|| shape_err("expected an item record object"))?;
    let min_x = get_f64(obj, "min_x")?;
    let min_y = get_f64(obj, "min_y")?;
    let max_x = get_f64(obj, "max_x")?;
    let max_y = get_f64(obj, "max_y")?;
    let data_value = obj
        .get("data")
        .ok_or_else(|| shape_err("item record missing `data`"))?;
    let data: T = serde_json::from_value(data_value.clone())
        .map_err(|e| shape_err(format!("invalid item `data`: {e}")))?;
    Ok(Item::new(min_x, min_y, max_x, max_y, data))
}
