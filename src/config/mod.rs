//! Export configuration.
//!
//! Values come from three layers, later ones winning: built-in defaults, a
//! YAML config file, and command-line arguments (which also read the
//! `BLACKDUCK_URL` / `BLACKDUCK_API_TOKEN` environment variables).
//!
//! Place a `.bd-spdx-export.yaml` file in the working directory or in
//! `~/.config/bd-spdx-export/`:
//!
//! ```yaml
//! server:
//!   url: https://hub.example.com
//!   timeout_secs: 30
//! enrichment:
//!   files: false
//!   max_concurrent: 8
//! recursive: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT_SECS, ExportPreset, MAX_CONCURRENT_LIMIT};
pub use file::{ConfigFileError, discover_config_file, load_config_file, load_or_default};
pub use types::{EnrichmentConfig, ExportConfig, OutputConfig, ServerConfig};
pub use validation::{ConfigError, Validatable};

use crate::error::{ExportError, OutputErrorKind, Result};

/// JSON Schema of the config file format.
pub fn generate_json_schema() -> Result<String> {
    let schema = schemars::schema_for!(ExportConfig);
    serde_json::to_string_pretty(&schema).map_err(|e| {
        ExportError::output(
            "config schema",
            OutputErrorKind::Serialization(e.to_string()),
        )
    })
}
