//! Defaults that may or may not have been passed, and normalized lists of indices.

use std::fmt;
use std::rc::Rc;

use crate::error::{ItemizeError, Result};
use crate::value::{Key, Value};

/// A default value that was either passed or not.
///
/// `Given(Value::Null)` is a real default that happens to be null, which is
/// different from `NotPassed`: only the latter lets a failed lookup surface
/// as [`ItemizeError::NotFound`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback<V = Value> {
    NotPassed,
    Given(V),
}

impl<V> Default for Fallback<V> {
    fn default() -> Self {
        Fallback::NotPassed
    }
}

impl<V> Fallback<V> {
    pub fn given(value: impl Into<V>) -> Self {
        Fallback::Given(value.into())
    }
    pub fn is_passed(&self) -> bool {
        matches!(self, Fallback::Given(_))
    }
    /// Keeps `self` when it was passed, otherwise falls through to `other`.
    pub fn or(self, other: Fallback<V>) -> Fallback<V> {
        match self {
            Fallback::Given(_) => self,
            Fallback::NotPassed => other,
        }
    }
    pub fn as_ref(&self) -> Fallback<&V> {
        match self {
            Fallback::Given(value) => Fallback::Given(value),
            Fallback::NotPassed => Fallback::NotPassed,
        }
    }
    pub fn into_option(self) -> Option<V> {
        match self {
            Fallback::Given(value) => Some(value),
            Fallback::NotPassed => None,
        }
    }
    pub(crate) fn or_not_found<T: fmt::Display>(self, attempted: &[T]) -> Result<V> {
        self.into_option()
            .ok_or_else(|| ItemizeError::not_found(attempted))
    }
}

/// An ordered list of candidate indices; earlier ones are tried first.
///
/// A sequence value is spread into its elements, every other value becomes a
/// one-element list. Use [`Indices::one`] to look up a tuple key as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Indices(Vec<Value>);

impl Indices {
    pub fn one(index: impl Into<Value>) -> Self {
        Self(vec![index.into()])
    }
    /// Consumes an iterator of indices in order.
    pub fn drain<I, V>(indices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self(indices.into_iter().map(Into::into).collect())
    }
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.0.get(position)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl IntoIterator for Indices {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for Indices {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Indices::drain(iter)
    }
}

impl fmt::Display for Indices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.0.iter().map(|index| index.to_string()).collect();
        write!(f, "{}", items.join(", "))
    }
}

impl From<Value> for Indices {
    fn from(value: Value) -> Self {
        match value {
            Value::Seq(items) => Self(Rc::unwrap_or_clone(items)),
            other => Self::one(other),
        }
    }
}
impl From<&Value> for Indices {
    fn from(value: &Value) -> Self { Indices::from(value.clone()) }
}
impl From<Key> for Indices {
    fn from(key: Key) -> Self { Indices::from(Value::from(key)) }
}
impl From<&str> for Indices {
    fn from(s: &str) -> Self { Indices::one(s) }
}
impl From<String> for Indices {
    fn from(s: String) -> Self { Indices::one(s) }
}
impl From<i64> for Indices {
    fn from(i: i64) -> Self { Indices::one(i) }
}
impl From<i32> for Indices {
    fn from(i: i32) -> Self { Indices::one(i) }
}
impl From<usize> for Indices {
    fn from(position: usize) -> Self { Indices::one(position) }
}
impl From<bool> for Indices {
    fn from(b: bool) -> Self { Indices::one(b) }
}
impl From<f64> for Indices {
    fn from(x: f64) -> Self { Indices::one(x) }
}
impl<V: Into<Value>> From<Vec<V>> for Indices {
    fn from(indices: Vec<V>) -> Self { Indices::drain(indices) }
}
impl<V: Into<Value>, const N: usize> From<[V; N]> for Indices {
    fn from(indices: [V; N]) -> Self { Indices::drain(indices) }
}
impl<V: Into<Value> + Clone> From<&[V]> for Indices {
    fn from(indices: &[V]) -> Self { Indices::drain(indices.iter().cloned()) }
}
