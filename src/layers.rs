//! Configuration sources turned into values that can be stacked in a [`Chain`](crate::Chain).
//!
//! ```
//! use config::FileFormat;
//! use itemize::{chain, layers, Value};
//! let toml = "port = 3000\nhost = \"localhost\"";
//! let defaults = layers::from_source(toml, FileFormat::Toml).unwrap();
//! let overrides = layers::from_json(r#"{"port": 4000}"#).unwrap();
//! let settings = chain![&overrides, &defaults].unwrap();
//! assert_eq!(settings.item("port").unwrap(), Value::from(4000));
//! assert_eq!(settings.item("host").unwrap(), Value::from("localhost"));
//! ```

// config lets you read a separate config file
use config::{Config, File, FileFormat};
use tracing::debug;

use crate::error::Result;
use crate::record::Record;
use crate::value::Value;

/// A built configuration as one nested value.
pub fn from_config(settings: &Config) -> Result<Value> {
    let tree: serde_json::Value = settings.clone().try_deserialize()?;
    let layer = Value::from(tree);
    debug!(indices = layer.size(), "loaded configuration layer");
    Ok(layer)
}

/// Parses `text` in the given format, e.g. TOML, YAML or INI.
pub fn from_source(text: &str, format: FileFormat) -> Result<Value> {
    let settings = Config::builder()
        .add_source(File::from_str(text, format))
        .build()?;
    from_config(&settings)
}

pub fn from_json(text: &str) -> Result<Value> {
    let tree: serde_json::Value = serde_json::from_str(text)?;
    Ok(Value::from(tree))
}
