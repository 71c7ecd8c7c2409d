//! The capability contract every container is reached through.
//!
//! A [`Record`] only has to answer indexed lookups. Records that can also list their
//! indices are *discrete* and report a [`Shape`]: keyed (mapping-like) or positional
//! (sequence-like). Text can be indexed by position but is deliberately shapeless, so
//! walking or merging never descends into single characters.
//!
//! Implementations are provided for [`Value`], slices and vectors of values, the
//! standard and insertion-ordered maps keyed by [`Key`], text, and `serde_json::Value`.
//! Callers wrap anything else in a small shim implementing [`Record`].

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::error::Miss;
use crate::value::{Key, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Keyed,
    Positional,
}

pub trait Record {
    /// Looks up a single index.
    fn fetch(&self, index: &Value) -> Result<Value, Miss>;

    /// `None` for records that can only be indexed.
    fn shape(&self) -> Option<Shape> {
        None
    }
    fn indices(&self) -> Vec<Key> {
        Vec::new()
    }
    fn size(&self) -> usize {
        self.indices().len()
    }
    fn is_discrete(&self) -> bool {
        self.shape().is_some()
    }
    fn pairs(&self) -> Vec<(Key, Value)> {
        self.indices()
            .into_iter()
            .filter_map(|key| {
                let element = self.fetch(&Value::from(key.clone())).ok()?;
                Some((key, element))
            })
            .collect()
    }
    /// The record itself as a dynamic value, for records that are plain values.
    ///
    /// Walks start from here when it is available, so a scalar root becomes a
    /// terminal and a container root is tracked by identity.
    fn as_value(&self) -> Option<Value> {
        None
    }
}

// Positions are plain non-negative integers; counting from the end is not supported
// so that every position a record answers is also one it enumerates.
fn position(index: &Value, len: usize) -> Result<usize, Miss> {
    match index {
        Value::Int(i) if *i >= 0 && (*i as u64) < len as u64 => Ok(*i as usize),
        Value::Int(_) => Err(Miss::Absent),
        other => Err(Miss::Mismatch(format!(
            "positions must be integers, not {}",
            other.type_name()
        ))),
    }
}

fn positions(len: usize) -> Vec<Key> {
    (0..len).map(Key::from).collect()
}

// ------------- Positional -------------
impl Record for [Value] {
    fn fetch(&self, index: &Value) -> Result<Value, Miss> {
        position(index, self.len()).map(|i| self[i].clone())
    }
    fn shape(&self) -> Option<Shape> {
        Some(Shape::Positional)
    }
    fn indices(&self) -> Vec<Key> {
        positions(self.len())
    }
    fn size(&self) -> usize {
        self.len()
    }
    fn pairs(&self) -> Vec<(Key, Value)> {
        self.iter()
            .enumerate()
            .map(|(i, element)| (Key::from(i), element.clone()))
            .collect()
    }
}

impl Record for Vec<Value> {
    fn fetch(&self, index: &Value) -> Result<Value, Miss> {
        self.as_slice().fetch(index)
    }
    fn shape(&self) -> Option<Shape> {
        Some(Shape::Positional)
    }
    fn indices(&self) -> Vec<Key> {
        positions(self.len())
    }
    fn size(&self) -> usize {
        self.len()
    }
    fn pairs(&self) -> Vec<(Key, Value)> {
        self.as_slice().pairs()
    }
}

// ------------- Keyed -------------
macro_rules! keyed_record {
    ($map:ty $(, $param:ident : $bound:path)*) => {
        impl<$($param: $bound),*> Record for $map {
            fn fetch(&self, index: &Value) -> Result<Value, Miss> {
                let key = Key::try_from(index)?;
                self.get(&key).cloned().ok_or(Miss::Absent)
            }
            fn shape(&self) -> Option<Shape> {
                Some(Shape::Keyed)
            }
            fn indices(&self) -> Vec<Key> {
                self.keys().cloned().collect()
            }
            fn size(&self) -> usize {
                self.len()
            }
            fn pairs(&self) -> Vec<(Key, Value)> {
                self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
        }
    };
}

keyed_record!(IndexMap<Key, Value, S>, S: BuildHasher);
keyed_record!(HashMap<Key, Value, S>, S: BuildHasher);
keyed_record!(BTreeMap<Key, Value>);

// ------------- Text -------------
impl Record for str {
    fn fetch(&self, index: &Value) -> Result<Value, Miss> {
        let i = position(index, self.chars().count())?;
        self.chars()
            .nth(i)
            .map(|c| Value::Text(c.to_string()))
            .ok_or(Miss::Absent)
    }
    fn as_value(&self) -> Option<Value> {
        Some(Value::Text(self.to_owned()))
    }
}

impl Record for String {
    fn fetch(&self, index: &Value) -> Result<Value, Miss> {
        self.as_str().fetch(index)
    }
    fn as_value(&self) -> Option<Value> {
        Some(Value::Text(self.clone()))
    }
}

// ------------- Dynamic -------------
impl Record for Value {
    fn fetch(&self, index: &Value) -> Result<Value, Miss> {
        match self {
            Value::Seq(items) => Record::fetch(items.as_slice(), index),
            Value::Map(map) => Record::fetch(&**map, index),
            Value::Text(text) => text.as_str().fetch(index),
            Value::Shared(_) => match self.resolved() {
                Value::Shared(_) => Err(Miss::Mismatch("shared slot refers only to itself".into())),
                inner => inner.fetch(index),
            },
            other => Err(Miss::Mismatch(format!("{} is not itemized", other.type_name()))),
        }
    }
    fn shape(&self) -> Option<Shape> {
        match self.resolved() {
            Value::Seq(_) => Some(Shape::Positional),
            Value::Map(_) => Some(Shape::Keyed),
            _ => None,
        }
    }
    fn indices(&self) -> Vec<Key> {
        match self.resolved() {
            Value::Seq(items) => positions(items.len()),
            Value::Map(map) => Record::indices(&*map),
            _ => Vec::new(),
        }
    }
    fn size(&self) -> usize {
        match self.resolved() {
            Value::Seq(items) => items.len(),
            Value::Map(map) => map.len(),
            _ => 0,
        }
    }
    fn pairs(&self) -> Vec<(Key, Value)> {
        match self.resolved() {
            Value::Seq(items) => Record::pairs(items.as_slice()),
            Value::Map(map) => Record::pairs(&*map),
            _ => Vec::new(),
        }
    }
    fn as_value(&self) -> Option<Value> {
        Some(self.clone())
    }
}

impl Record for serde_json::Value {
    fn fetch(&self, index: &Value) -> Result<Value, Miss> {
        match self {
            serde_json::Value::Array(items) => {
                position(index, items.len()).map(|i| Value::from(&items[i]))
            }
            serde_json::Value::Object(map) => match index {
                Value::Text(name) => map.get(name).map(Value::from).ok_or(Miss::Absent),
                // objects only hold text keys, anything else hashable is just absent
                other => Key::try_from(other).and(Err(Miss::Absent)),
            },
            serde_json::Value::String(text) => text.as_str().fetch(index),
            other => Err(Miss::Mismatch(format!("json {} is not itemized", json_type(other)))),
        }
    }
    fn shape(&self) -> Option<Shape> {
        match self {
            serde_json::Value::Array(_) => Some(Shape::Positional),
            serde_json::Value::Object(_) => Some(Shape::Keyed),
            _ => None,
        }
    }
    fn indices(&self) -> Vec<Key> {
        match self {
            serde_json::Value::Array(items) => positions(items.len()),
            serde_json::Value::Object(map) => map.keys().map(|k| Key::Text(k.clone())).collect(),
            _ => Vec::new(),
        }
    }
    // containers are walked through their pairs, scalars are terminals
    fn as_value(&self) -> Option<Value> {
        match self {
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
            scalar => Some(Value::from(scalar)),
        }
    }
}

fn json_type(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
