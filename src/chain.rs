//! Several discrete records searched in priority order, like layered configuration.
//!
//! A [`Chain`] resolves indices container-major: the first record is tried with every
//! candidate index before the second record is consulted. Defaults come in three tiers:
//! the one passed to the call, then the one the chain was built with, and failing
//! both, [`ItemizeError::NotFound`].
//!
//! ```
//! use itemize::{chain, Fallback, Value};
//! let options = Value::map([("driver", "stuff")]);
//! let defaults = Value::map([("driver", "mysql"), ("login", "user")]);
//! let settings = chain![&options, &defaults].unwrap().with_default(Value::Null);
//! assert_eq!(settings.item("driver").unwrap(), Value::from("stuff"));
//! assert_eq!(settings.item("login").unwrap(), Value::from("user"));
//! assert_eq!(settings.item("socket").unwrap(), Value::Null);
//! assert_eq!(settings.get("socket", Fallback::given(3306)).unwrap(), Value::from(3306));
//! ```

use std::fmt;
use std::hash::BuildHasherDefault;
use std::rc::Rc;

use indexmap::IndexSet;
use seahash::SeaHasher;
use tracing::{debug, trace};

use crate::error::{ItemizeError, Miss, Result};
use crate::fallback::{Fallback, Indices};
use crate::record::{Record, Shape};
use crate::value::{Key, Mapping, Value};

pub type KeyHasher = BuildHasherDefault<SeaHasher>;

/// The deduplicated union of every index in a chain.
pub type KeySet = IndexSet<Key, KeyHasher>;

/// Builds a [`Chain`] from records of different types.
///
/// Evaluates to `Result<Chain>`, failing when any record is not discrete.
#[macro_export]
macro_rules! chain {
    ($($record:expr),* $(,)?) => {
        $crate::Chain::new(::std::vec![$($record as &dyn $crate::Record),*])
    };
}

pub struct Chain<'r> {
    records: Vec<&'r dyn Record>,
    default: Fallback<Value>,
}

impl<'r> Chain<'r> {
    pub fn new<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'r dyn Record>,
    {
        Ok(Self {
            records: validate(records)?,
            default: Fallback::NotPassed,
        })
    }

    /// Sets the chain-wide default, used when a call passes none.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Fallback::Given(default.into());
        self
    }

    /// A chain over other records, keeping this chain's default.
    pub fn with_records<I>(&self, records: I) -> Result<Chain<'r>>
    where
        I: IntoIterator<Item = &'r dyn Record>,
    {
        Ok(Chain {
            records: validate(records)?,
            default: self.default.clone(),
        })
    }

    pub fn records(&self) -> &[&'r dyn Record] {
        &self.records
    }

    pub fn fallback(&self) -> &Fallback<Value> {
        &self.default
    }

    /// Every element found for `indices` across all records, container-major.
    pub fn resolve(&self, indices: impl Into<Indices>, default: Fallback<Value>) -> Resolve<'_> {
        Resolve {
            records: &self.records,
            indices: indices.into(),
            chain_default: &self.default,
            call_default: default,
            record: 0,
            index: 0,
            found: false,
            done: false,
        }
    }

    /// The first element found; nothing further is probed.
    pub fn get(&self, indices: impl Into<Indices>, default: Fallback<Value>) -> Result<Value> {
        let mut found = self.resolve(indices, default);
        found
            .next()
            .unwrap_or_else(|| Err(ItemizeError::not_found(found.indices.as_slice())))
    }

    pub fn get_all(
        &self,
        indices: impl Into<Indices>,
        default: Fallback<Value>,
    ) -> Result<Vec<Value>> {
        self.resolve(indices, default).collect()
    }

    /// Indexing with only the chain-wide default to fall back on.
    pub fn item(&self, indices: impl Into<Indices>) -> Result<Value> {
        self.get(indices, Fallback::NotPassed)
    }

    pub fn keys(&self) -> KeySet {
        self.records
            .iter()
            .flat_map(|record| record.indices())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    pub fn contains(&self, index: &Value) -> bool {
        match Key::try_from(index) {
            Ok(key) => self.keys().contains(&key),
            Err(_) => false,
        }
    }

    pub fn iter(&self) -> indexmap::set::IntoIter<Key> {
        self.keys().into_iter()
    }

    /// The chain flattened into one mapping, as it would be seen through `item`.
    pub fn merged(&self) -> Result<Mapping> {
        self.keys()
            .into_iter()
            .map(|key| {
                let element = self.item(Indices::one(key.clone()))?;
                Ok((key, element))
            })
            .collect()
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(Value::Map(Rc::new(self.merged()?)))
    }
}

fn validate<'r, I>(records: I) -> Result<Vec<&'r dyn Record>>
where
    I: IntoIterator<Item = &'r dyn Record>,
{
    let records: Vec<&'r dyn Record> = records.into_iter().collect();
    for (position, record) in records.iter().enumerate() {
        if !record.is_discrete() {
            return Err(ItemizeError::Configuration {
                position,
                reason: "records must be keyed or positional".to_owned(),
            });
        }
    }
    Ok(records)
}

/// Lazily yields every element found by a chain lookup.
///
/// Created by [`Chain::resolve`].
pub struct Resolve<'c> {
    records: &'c [&'c dyn Record],
    indices: Indices,
    chain_default: &'c Fallback<Value>,
    call_default: Fallback<Value>,
    record: usize,
    index: usize,
    found: bool,
    done: bool,
}

impl Iterator for Resolve<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let records = self.records;
        while let Some(record) = records.get(self.record) {
            while let Some(index) = self.indices.get(self.index) {
                self.index += 1;
                match record.fetch(index) {
                    Ok(element) => {
                        self.found = true;
                        return Some(Ok(element));
                    }
                    Err(miss) => trace!(record = self.record, %index, %miss, "probe missed"),
                }
            }
            self.record += 1;
            self.index = 0;
        }
        self.done = true;
        if self.found {
            return None;
        }
        // the call's default wins outright over the chain's
        let default = std::mem::take(&mut self.call_default).or(self.chain_default.clone());
        if default.is_passed() {
            debug!(indices = %self.indices, "no index found in chain, using default");
        }
        Some(default.or_not_found(self.indices.as_slice()))
    }
}

impl Record for Chain<'_> {
    fn fetch(&self, index: &Value) -> std::result::Result<Value, Miss> {
        self.item(Indices::one(index.clone()))
            .map_err(|_| Miss::Absent)
    }
    fn shape(&self) -> Option<Shape> {
        Some(Shape::Keyed)
    }
    fn indices(&self) -> Vec<Key> {
        self.keys().into_iter().collect()
    }
}

impl fmt::Debug for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("records", &self.records.len())
            .field("default", &self.default)
            .finish()
    }
}

impl fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_value() {
            Ok(merged) => write!(f, "Chain{}", merged),
            Err(_) => write!(f, "Chain({} records)", self.records.len()),
        }
    }
}
