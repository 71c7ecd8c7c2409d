//! Presence checks, generalized accessors and multi-index lookups over a single record.
//!
//! Every probe that fails, whether because the index is absent or because it does not
//! apply to the record (a text index into a sequence, an unhashable index into a
//! mapping), just moves on to the next candidate. Only running out of candidates with
//! no default is an error.

use tracing::{debug, trace};

use crate::error::{ItemizeError, Result};
use crate::fallback::{Fallback, Indices};
use crate::record::Record;
use crate::value::{Key, Mapping, Value};

/// Indices which are not present in `record`, in the order they were given.
///
/// Records that answer every index (a chain with a default, say) never report
/// anything as missing.
pub fn missing<R>(record: &R, indices: impl Into<Indices>) -> Vec<Value>
where
    R: Record + ?Sized,
{
    indices
        .into()
        .into_iter()
        .filter(|index| record.fetch(index).is_err())
        .collect()
}

pub fn has<R>(record: &R, indices: impl Into<Indices>) -> bool
where
    R: Record + ?Sized,
{
    missing(record, indices).is_empty()
}

/// Hands `record` back if all `indices` are present, otherwise reports the missing
/// ones under `name`.
pub fn assert_missing<'r, R>(
    record: &'r R,
    indices: impl Into<Indices>,
    name: &str,
) -> Result<&'r R>
where
    R: Record + ?Sized,
{
    let missing = missing(record, indices);
    if missing.is_empty() {
        Ok(record)
    } else {
        Err(ItemizeError::Validation {
            name: name.to_owned(),
            missing: missing.iter().map(|index| index.to_string()).collect(),
        })
    }
}

// ------------- Generalized accessors -------------
/// Generalization of `items()`: natural pairs for keyed records, `(position, element)`
/// for positional ones.
pub fn pairs<R>(record: &R) -> Result<Vec<(Key, Value)>>
where
    R: Record + ?Sized,
{
    if record.is_discrete() {
        Ok(record.pairs())
    } else {
        Err(ItemizeError::TypeMismatch(
            "record should be keyed or positional".to_owned(),
        ))
    }
}

/// Generalization of `keys()`.
pub fn indices<R>(record: &R) -> Result<Vec<Key>>
where
    R: Record + ?Sized,
{
    Ok(pairs(record)?.into_iter().map(|(key, _)| key).collect())
}

/// Generalization of `values()`.
pub fn elements<R>(record: &R) -> Result<Vec<Value>>
where
    R: Record + ?Sized,
{
    Ok(pairs(record)?.into_iter().map(|(_, element)| element).collect())
}

/// Flattens discrete records into one mapping; earlier records win on shared keys.
pub fn merge(records: &[&dyn Record]) -> Result<Mapping> {
    let mut merged = Mapping::new();
    for record in records {
        for (key, element) in pairs(*record)? {
            merged.entry(key).or_insert(element);
        }
    }
    Ok(merged)
}

// ------------- Multi-index lookups -------------
/// Lazily yields the element at every index found in `record`.
///
/// Created by [`iterget`].
pub struct IterGet<'r, R: Record + ?Sized> {
    record: &'r R,
    indices: Indices,
    default: Fallback<Value>,
    next: usize,
    found: bool,
    done: bool,
}

impl<R: Record + ?Sized> Iterator for IterGet<'_, R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while let Some(index) = self.indices.get(self.next) {
            self.next += 1;
            match self.record.fetch(index) {
                Ok(element) => {
                    self.found = true;
                    return Some(Ok(element));
                }
                Err(miss) => trace!(%index, %miss, "probe missed"),
            }
        }
        self.done = true;
        if self.found {
            return None;
        }
        let default = std::mem::take(&mut self.default);
        if default.is_passed() {
            debug!(indices = %self.indices, "no index found, using default");
        }
        Some(default.or_not_found(self.indices.as_slice()))
    }
}

/// Tries `indices` in order against `record`, yielding each element found.
///
/// If none is found the default is yielded instead, or a single
/// [`ItemizeError::NotFound`] when no default was passed.
pub fn iterget<R>(
    record: &R,
    indices: impl Into<Indices>,
    default: Fallback<Value>,
) -> IterGet<'_, R>
where
    R: Record + ?Sized,
{
    IterGet {
        record,
        indices: indices.into(),
        default,
        next: 0,
        found: false,
        done: false,
    }
}

/// The element at the first index found; later indices are not probed.
pub fn get<R>(record: &R, indices: impl Into<Indices>, default: Fallback<Value>) -> Result<Value>
where
    R: Record + ?Sized,
{
    let mut found = iterget(record, indices, default);
    found
        .next()
        .unwrap_or_else(|| Err(ItemizeError::not_found(found.indices.as_slice())))
}

/// Every element found, in index order. The default is only included when
/// nothing was found.
pub fn get_all<R>(
    record: &R,
    indices: impl Into<Indices>,
    default: Fallback<Value>,
) -> Result<Vec<Value>>
where
    R: Record + ?Sized,
{
    iterget(record, indices, default).collect()
}
