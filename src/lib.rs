//! Itemize – uniform lookups over anything that can be indexed.
//!
//! Itemize treats mappings and sequences alike as *records*: containers answering
//! indexed lookups. On top of that single capability it offers:
//! * [`basics`] – presence checks (`missing`, `has`, `assert_missing`), generalized
//!   `pairs`/`indices`/`elements`, and multi-index lookups (`iterget`, `get`, `get_all`)
//!   that try candidate indices in order and fall back to a default.
//! * [`chain`] – a [`Chain`] of records searched in priority order, with a chain-wide
//!   default sitting between the per-call default and failure.
//! * [`tryget`] – the same fallback search with the lookup left open, used for item
//!   lookups and attribute lookups alike.
//! * [`recursive`] – depth-first walks over nested records yielding terminal paths,
//!   with cycle protection, and the deep equality built from them.
//! * [`layers`] – configuration sources (via the `config` crate) and JSON loaded as
//!   values ready to be chained.
//!
//! ## Records
//! Anything implementing [`Record`] can be looked up. A record that can also list
//! its indices is *discrete* and reports a [`Shape`], keyed or positional. Text can
//! be indexed but is never treated as positional. [`Value`] is the dynamic element
//! type, and [`Key`] the hashable index type discrete records enumerate.
//!
//! ## Defaults
//! Lookups take a [`Fallback`]: `Fallback::NotPassed` turns "nothing found" into
//! [`ItemizeError::NotFound`], while `Fallback::Given(value)` returns `value` instead,
//! even when `value` is `Value::Null`.
//!
//! ## Quick Start
//! ```
//! use itemize::{basics, Fallback, Value};
//! let record = Value::map([("a", 1), ("b", 2)]);
//! let found = basics::get(&record, ["nonexistent", "a"], Fallback::given(99));
//! assert_eq!(found.unwrap(), Value::from(1));
//! assert_eq!(basics::get(&record, ["x", "y"], Fallback::given(99)).unwrap(), Value::from(99));
//! assert!(basics::get(&record, ["x", "y"], Fallback::NotPassed).is_err());
//! assert_eq!(
//!     basics::get_all(&record, ["a", "x", "b"], Fallback::NotPassed).unwrap(),
//!     vec![Value::from(1), Value::from(2)]
//! );
//! ```
//!
//! ## Status
//! Lookups never mutate the records they are given, and nothing is cached between
//! calls. Values use `Rc` internally and are meant for single-threaded use.

pub mod basics;
pub mod chain;
pub mod error;
pub mod fallback;
pub mod layers;
pub mod record;
pub mod recursive;
pub mod tryget;
pub mod value;

pub use chain::{Chain, Resolve};
pub use error::{ItemizeError, Miss, Result};
pub use fallback::{Fallback, Indices};
pub use record::{Record, Shape};
pub use tryget::{Attributes, Namespace};
pub use value::{Key, Mapping, Path, Shared, Value};
