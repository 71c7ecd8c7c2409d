//! Dynamic values held by, and used to index into, itemized records.
//!
//! Two types make up the data model:
//! * [`Key`] – a hashable index. Discrete records enumerate their indices as keys,
//!   and a [`Path`] is a sequence of keys.
//! * [`Value`] – anything an element can be, including nested sequences and mappings.
//!   A value used as a probe index is converted to a key on demand; values that
//!   cannot become keys (mappings, shared slots) simply never match a keyed record.
//!
//! Containers inside a value are reference counted, so cloning a nested value is
//! cheap and the identity of a container survives cloning. [`Shared`] slots are
//! the only way to tie a structure back onto itself.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// used to keep mappings (and everything derived from them) in insertion order
use indexmap::IndexMap;
// used to allow floats as keys
use ordered_float::OrderedFloat;

use crate::error::Miss;

pub type Mapping = IndexMap<Key, Value>;

/// A route from the root of a nested structure down to a terminal value.
pub type Path = Vec<Key>;

// ------------- Key -------------
/// A hashable index.
///
/// Floats with an integral value are stored as `Int`, so `3.0` and `3` name the
/// same mapping key. Positions into sequences still have to be integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    Tuple(Vec<Key>),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => write!(f, "null"),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::Float(x) => write!(f, "{:?}", x.into_inner()),
            Key::Text(s) => write!(f, "'{}'", s),
            Key::Tuple(items) => {
                let items: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                if items.len() == 1 {
                    write!(f, "({},)", items[0])
                } else {
                    write!(f, "({})", items.join(", "))
                }
            }
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self { Key::Text(s.to_owned()) }
}
impl From<String> for Key {
    fn from(s: String) -> Self { Key::Text(s) }
}
impl From<i64> for Key {
    fn from(i: i64) -> Self { Key::Int(i) }
}
impl From<i32> for Key {
    fn from(i: i32) -> Self { Key::Int(i64::from(i)) }
}
impl From<usize> for Key {
    fn from(position: usize) -> Self { Key::Int(position as i64) }
}
impl From<bool> for Key {
    fn from(b: bool) -> Self { Key::Bool(b) }
}
impl From<f64> for Key {
    fn from(x: f64) -> Self {
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 {
            Key::Int(x as i64)
        } else {
            Key::Float(OrderedFloat(x))
        }
    }
}

impl TryFrom<&Value> for Key {
    type Error = Miss;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Key::Null),
            Value::Bool(b) => Ok(Key::Bool(*b)),
            Value::Int(i) => Ok(Key::Int(*i)),
            Value::Float(x) => Ok(Key::from(*x)),
            Value::Text(s) => Ok(Key::Text(s.clone())),
            Value::Seq(items) => items
                .iter()
                .map(Key::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Key::Tuple),
            other => Err(Miss::Mismatch(format!(
                "unhashable {} used as an index",
                other.type_name()
            ))),
        }
    }
}

// ------------- Shared -------------
/// A mutable slot that may be referenced from several places, itself included.
#[derive(Clone)]
pub struct Shared(Rc<RefCell<Value>>);

impl Shared {
    pub fn new(value: Value) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }
    /// Puts a new value in the slot and hands back the previous one.
    pub fn replace(&self, value: Value) -> Value {
        self.0.replace(value)
    }
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

// Structural equality recurses into the slot, so comparing two distinct cyclic
// structures does not terminate. Use `recursive::rec_eq` for those.
impl PartialEq for Shared {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.identity())
    }
}

// ------------- Value -------------
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Seq(Rc<Vec<Value>>),
    Map(Rc<Mapping>),
    Shared(Shared),
}

impl Value {
    pub fn seq<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Seq(Rc::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Value::Map(Rc::new(
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }

    pub fn shared(value: impl Into<Value>) -> Self {
        Value::Shared(Shared::new(value.into()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "mapping",
            Value::Shared(_) => "shared",
        }
    }

    /// Address of the underlying container, for values that have one.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Seq(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Map(map) => Some(Rc::as_ptr(map) as *const () as usize),
            Value::Shared(cell) => Some(cell.identity()),
            _ => None,
        }
    }

    /// Follows shared slots until a plain value is reached.
    ///
    /// A ring made only of shared slots has no plain value; the slot where the
    /// ring closes is returned instead.
    pub fn resolved(&self) -> Value {
        let mut current = self.clone();
        let mut seen = Vec::new();
        loop {
            let next = match &current {
                Value::Shared(cell) if !seen.contains(&cell.identity()) => {
                    seen.push(cell.identity());
                    cell.get()
                }
                _ => break,
            };
            current = next;
        }
        current
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::Seq(items) => {
                let items: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Map(map) => {
                let items: Vec<String> = map.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            // slots may point back at their container
            Value::Shared(_) => write!(f, "<shared>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_owned()) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Int(i64::from(i)) }
}
impl From<usize> for Value {
    fn from(position: usize) -> Self { Value::Int(position as i64) }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}
impl From<()> for Value {
    fn from(_: ()) -> Self { Value::Null }
}
impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self { Value::Seq(Rc::new(items)) }
}
impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self { Value::Map(Rc::new(map)) }
}
impl From<Shared> for Value {
    fn from(cell: Shared) -> Self { Value::Shared(cell) }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Null => Value::Null,
            Key::Bool(b) => Value::Bool(b),
            Key::Int(i) => Value::Int(i),
            Key::Float(x) => Value::Float(x.into_inner()),
            Key::Text(s) => Value::Text(s),
            Key::Tuple(items) => Value::seq(items),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::seq(items.iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::map(map.iter().map(|(k, v)| (Key::Text(k.clone()), Value::from(v))))
            }
        }
    }
}
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self { Value::from(&json) }
}
