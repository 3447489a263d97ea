//! Configuration types for exports.

use super::defaults::{DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT_SECS};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level export configuration.
///
/// Built from a YAML config file, then overlaid with command-line values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExportConfig {
    /// BOM server connection
    pub server: ServerConfig,
    /// Which metadata to fetch per component
    pub enrichment: EnrichmentConfig,
    /// Output document location
    pub output: OutputConfig,
    /// Descend into sub-projects found in the BOM
    pub recursive: bool,
    /// Read server data from a JSON snapshot instead of the REST API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the Black Duck server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// API token exchanged for a bearer token
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    /// Accept invalid TLS certificates
    pub trust_certs: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_token: None,
            trust_certs: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Enrichment
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Fetch copyright statements
    pub copyrights: bool,
    /// Fetch matched files to find a package file name
    pub files: bool,
    /// Fetch review comments as annotations
    pub comments: bool,
    /// Resolve download locations through the configured locator
    pub download_locations: bool,
    /// Worker pool size for concurrent lookups
    pub max_concurrent: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            copyrights: true,
            files: true,
            comments: true,
            download_locations: false,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file; derived from project and version when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Move an existing output file aside before writing
    pub backup_existing: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: None,
            backup_existing: true,
        }
    }
}

// ============================================================================
// Merging
// ============================================================================

impl ExportConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Switches in `other` can only disable enrichment kinds; values left at
    /// their defaults do not override.
    pub fn merge(&mut self, other: &Self) {
        if other.server.url.is_some() {
            self.server.url.clone_from(&other.server.url);
        }
        if other.server.api_token.is_some() {
            self.server.api_token.clone_from(&other.server.api_token);
        }
        if other.server.trust_certs {
            self.server.trust_certs = true;
        }
        if other.server.timeout_secs != DEFAULT_TIMEOUT_SECS {
            self.server.timeout_secs = other.server.timeout_secs;
        }

        if !other.enrichment.copyrights {
            self.enrichment.copyrights = false;
        }
        if !other.enrichment.files {
            self.enrichment.files = false;
        }
        if !other.enrichment.comments {
            self.enrichment.comments = false;
        }
        if other.enrichment.download_locations {
            self.enrichment.download_locations = true;
        }
        if other.enrichment.max_concurrent != DEFAULT_MAX_CONCURRENT {
            self.enrichment.max_concurrent = other.enrichment.max_concurrent;
        }

        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if !other.output.backup_existing {
            self.output.backup_existing = false;
        }

        if other.recursive {
            self.recursive = true;
        }
        if other.snapshot.is_some() {
            self.snapshot.clone_from(&other.snapshot);
        }
    }
}
