use thiserror::Error;

/// Failure of a single probe: one index tried against one record.
///
/// Resolvers swallow these and move on to the next candidate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Miss {
    #[error("index not present")]
    Absent,
    #[error("index not applicable: {0}")]
    Mismatch(String),
}

#[derive(Error, Debug)]
pub enum ItemizeError {
    #[error("Could not find any of the indices: {}", .indices.join(", "))]
    NotFound { indices: Vec<String> },
    #[error("'{name}' is missing required indices: {}", .missing.join(", "))]
    Validation { name: String, missing: Vec<String> },
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Record {position} of the chain is not discrete: {reason}")]
    Configuration { position: usize, reason: String },
    #[error("Source error: {0}")]
    Source(String),
    #[error(transparent)]
    Miss(#[from] Miss),
}

pub type Result<T> = std::result::Result<T, ItemizeError>;

impl ItemizeError {
    pub(crate) fn not_found<T: std::fmt::Display>(indices: &[T]) -> Self {
        Self::NotFound {
            indices: indices.iter().map(|i| i.to_string()).collect(),
        }
    }
}

// Helper conversions
impl From<config::ConfigError> for ItemizeError {
    fn from(e: config::ConfigError) -> Self { Self::Source(e.to_string()) }
}
impl From<serde_json::Error> for ItemizeError {
    fn from(e: serde_json::Error) -> Self { Self::Source(e.to_string()) }
}
