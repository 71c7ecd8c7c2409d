//! Paths through nested itemized structures.
//!
//! [`walk`] visits a structure depth-first and yields every terminal value (anything
//! that is not discrete) together with the [`Path`] leading to it. Containers are
//! tracked by identity while they are being visited, so a structure reaching back to
//! one of its own ancestors is cut off at that point instead of recursing forever.
//! The same container reached along two separate branches is visited both times.
//!
//! Deep equality is built on top: [`rec_eq`] holds when every terminal path of each
//! side resolves to an equal value in the other. It looks at the shape of the data
//! only through lookups, so a sequence equals a mapping keyed by its positions.
//!
//! Any [`Record`] can be the root: a `serde_json` document, a map keyed by [`Key`] or
//! a [`Chain`](crate::Chain). A root that is neither discrete nor a plain value has
//! nothing to walk.

use std::collections::HashSet;
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;
use tracing::debug;

use crate::basics;
use crate::error::{ItemizeError, Result};
use crate::fallback::{Fallback, Indices};
use crate::record::Record;
use crate::value::{Key, Path, Value};

type IdentityHasher = BuildHasherDefault<SeaHasher>;

struct Frame {
    // the root of a walk over a foreign record has no identity to track
    identity: Option<usize>,
    path: Path,
    // shared slots contribute a child without a key of their own
    children: std::vec::IntoIter<(Option<Key>, Value)>,
}

/// Depth-first iterator over `(path, terminal value)` pairs.
///
/// Created by [`walk`].
pub struct Walk {
    frames: Vec<Frame>,
    active: HashSet<usize, IdentityHasher>,
    pending: Option<(Path, Value)>,
}

impl Walk {
    fn enter(&mut self, path: Path, node: Value) -> Option<(Path, Value)> {
        let children: Vec<(Option<Key>, Value)> = match &node {
            Value::Seq(_) | Value::Map(_) => node
                .pairs()
                .into_iter()
                .map(|(key, child)| (Some(key), child))
                .collect(),
            Value::Shared(cell) => vec![(None, cell.get())],
            _ => Vec::new(),
        };
        let Some(identity) = node.identity() else {
            return Some((path, node));
        };
        if !self.active.insert(identity) {
            debug!(?path, "closing branch that leads back to an ancestor");
            return None;
        }
        self.frames.push(Frame {
            identity: Some(identity),
            path,
            children: children.into_iter(),
        });
        None
    }
}

impl Iterator for Walk {
    type Item = (Path, Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((path, node)) = self.pending.take() {
                if let Some(terminal) = self.enter(path, node) {
                    return Some(terminal);
                }
                continue;
            }
            let frame = self.frames.last_mut()?;
            match frame.children.next() {
                Some((key, child)) => {
                    let mut path = frame.path.clone();
                    path.extend(key);
                    self.pending = Some((path, child));
                }
                None => {
                    if let Some(identity) = self.frames.pop().and_then(|done| done.identity) {
                        self.active.remove(&identity);
                    }
                }
            }
        }
    }
}

pub fn walk<R>(root: &R) -> Walk
where
    R: Record + ?Sized,
{
    let mut walk = Walk {
        frames: Vec::new(),
        active: HashSet::default(),
        pending: None,
    };
    match root.as_value() {
        Some(value) => walk.pending = Some((Path::new(), value)),
        None if root.is_discrete() => walk.frames.push(Frame {
            identity: None,
            path: Path::new(),
            children: root
                .pairs()
                .into_iter()
                .map(|(key, child)| (Some(key), child))
                .collect::<Vec<_>>()
                .into_iter(),
        }),
        None => debug!("root is neither discrete nor a value, nothing to walk"),
    }
    walk
}

/// Terminal paths only.
pub struct Paths(Walk);

impl Iterator for Paths {
    type Item = Path;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(path, _)| path)
    }
}

pub fn paths<R>(root: &R) -> Paths
where
    R: Record + ?Sized,
{
    Paths(walk(root))
}

/// Follows `path` one segment at a time.
///
/// The empty path leads to the root itself, which only a plain value can hand out.
pub fn get_path<R>(root: &R, path: &[Key]) -> Result<Value>
where
    R: Record + ?Sized,
{
    let Some((first, rest)) = path.split_first() else {
        return root.as_value().ok_or_else(|| {
            ItemizeError::TypeMismatch("the root of this record is not a value".to_owned())
        });
    };
    let start = basics::get(root, Indices::one(first.clone()), Fallback::NotPassed)?;
    rest.iter().try_fold(start, |node, key| {
        basics::get(&node, Indices::one(key.clone()), Fallback::NotPassed)
    })
}

/// The value at each of `paths`, or the lookup failure for paths that do not resolve.
pub fn iter_pairs<'r, R, I>(
    root: &'r R,
    paths: I,
) -> impl Iterator<Item = Result<(Path, Value)>> + 'r
where
    R: Record + ?Sized,
    I: IntoIterator<Item = Path>,
    I::IntoIter: 'r,
{
    paths
        .into_iter()
        .map(move |path| get_path(root, &path).map(|found| (path, found)))
}

/// Terminal paths whose value satisfies `predicate`.
pub fn find<R, P>(root: &R, mut predicate: P) -> impl Iterator<Item = Path>
where
    R: Record + ?Sized,
    P: FnMut(&Value) -> bool,
{
    walk(root).filter_map(move |(path, terminal)| predicate(&terminal).then_some(path))
}

/// One-way comparison: every terminal path of `a` leads to an equal value in `b`.
pub fn rec_compare<A, B>(a: &A, b: &B) -> bool
where
    A: Record + ?Sized,
    B: Record + ?Sized,
{
    walk(a).all(|(path, terminal)| match get_path(b, &path) {
        Ok(other) => other.resolved() == terminal,
        Err(_) => false,
    })
}

pub fn rec_eq<A, B>(a: &A, b: &B) -> bool
where
    A: Record + ?Sized,
    B: Record + ?Sized,
{
    rec_compare(a, b) && rec_compare(b, a)
}
