//! The fallback search with the lookup itself left open.
//!
//! [`try_getter`] walks associations (outer) and indices (inner) and returns the first
//! success. Which failures mean "try the next one" is up to the caller: item lookups
//! move on after any [`Miss`], attribute lookups only after [`Miss::Absent`].

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{ItemizeError, Miss, Result};
use crate::fallback::{Fallback, Indices};
use crate::record::Record;
use crate::value::{Key, Value};

pub fn try_getter<A, I, V, E, G, P>(
    mut getter: G,
    retry: P,
    associations: &[A],
    indices: &[I],
    default: Fallback<V>,
) -> Result<V>
where
    I: fmt::Display,
    E: Into<ItemizeError> + fmt::Display,
    G: FnMut(&A, &I) -> std::result::Result<V, E>,
    P: Fn(&E) -> bool,
{
    for (position, association) in associations.iter().enumerate() {
        for index in indices {
            match getter(association, index) {
                Ok(found) => return Ok(found),
                Err(e) if retry(&e) => {
                    trace!(association = position, %index, error = %e, "retrying")
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    if default.is_passed() {
        debug!(associations = associations.len(), "no association matched, using default");
    }
    default.or_not_found(indices)
}

/// Item lookup across several records; the first record holding any index wins.
pub fn try_get_item(
    records: &[&dyn Record],
    indices: impl Into<Indices>,
    default: Fallback<Value>,
) -> Result<Value> {
    let indices = indices.into();
    try_getter(
        |record, index| record.fetch(index),
        |_| true,
        records,
        indices.as_slice(),
        default,
    )
}

/// Something exposing named attributes.
pub trait Attributes {
    fn attribute(&self, name: &str) -> std::result::Result<Value, Miss>;
}

/// Attribute lookup across several sources.
///
/// Only absent attributes move the search on. A source that has the attribute but
/// fails to produce it stops the search with that failure.
pub fn try_get_attr(
    sources: &[&dyn Attributes],
    names: &[&str],
    default: Fallback<Value>,
) -> Result<Value> {
    try_getter(
        |source, name| source.attribute(name),
        |miss| *miss == Miss::Absent,
        sources,
        names,
        default,
    )
}

/// A named bag of attributes, the simplest [`Attributes`] source.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    name: String,
    attributes: IndexMap<String, Value>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Attributes for Namespace {
    fn attribute(&self, name: &str) -> std::result::Result<Value, Miss> {
        self.attributes.get(name).cloned().ok_or(Miss::Absent)
    }
}

// mappings expose their text keys as attributes
impl Attributes for Value {
    fn attribute(&self, name: &str) -> std::result::Result<Value, Miss> {
        match self.resolved() {
            Value::Map(map) => map.get(&Key::Text(name.to_owned())).cloned().ok_or(Miss::Absent),
            _ => Err(Miss::Absent),
        }
    }
}
