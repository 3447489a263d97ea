//! **Export a Black Duck project version's bill of materials as an SPDX 2.2 JSON document.**
//!
//! `bd-spdx-export` walks the hierarchical BOM of a project version,
//! enriches every distinct component version with its copyrights, review
//! comments, package file and license expression, and assembles one SPDX
//! package per component with classified relationships between them.
//! Sub-projects found in the BOM can be exported into the same document.
//!
//! ## Core Concepts & Modules
//!
//! - **[`source`]**: The [`BomSource`] and [`ProjectResolver`] traits the exporter reads
//!   through, with a REST client (feature `remote`) and an offline [`SnapshotSource`].
//! - **[`purl`]**: Package-URL synthesis from Black Duck origin records.
//! - **[`enrichment`]**: The concurrent [`MetadataEnricher`] and the run-wide license text cache.
//! - **[`walker`]**: The [`GraphWalker`], relationship classification and package construction.
//! - **[`spdx`]**: The [`SpdxDocument`] under construction and its output records.
//! - **[`pipeline`]**: The [`Exporter`] tying the pieces together, and output file handling.
//!
//! ## Getting Started
//!
//! ```no_run
//! use bd_spdx_export::{ExportConfig, Exporter, SnapshotSource};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = SnapshotSource::from_path("snapshot.json".as_ref())?;
//!     let config = ExportConfig::default();
//!
//!     let outcome = Exporter::new(&source, &config).export("acme", "1.0")?;
//!     println!("{}", outcome.document.to_json_string()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `remote` (default): the blocking REST client for a live Black Duck server.
//!   Without it, exports run from snapshot files only.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod purl;
pub mod source;
pub mod spdx;
pub mod walker;

// Re-export main types for convenience
pub use config::{ConfigError, EnrichmentConfig, ExportConfig, ExportPreset, Validatable};
pub use enrichment::{
    DownloadLocator, EnrichedMetadata, EnrichmentStats, LicenseTextCache, MetadataEnricher,
    NoOpLocator,
};
pub use error::{ErrorContext, ExportError, OptionContext, Result};
pub use model::{BomNode, BomSnapshot, ComponentVersion, Origin, ResolvedVersion};
pub use pipeline::{ExportOutcome, Exporter};
pub use purl::normalize;
#[cfg(feature = "remote")]
pub use source::HubClient;
pub use source::{BomServer, BomSource, ProjectResolver, SnapshotSource};
pub use spdx::{RelationshipType, SpdxDocument, SpdxPackage, SpdxRelationship};
pub use walker::{ExportContext, GraphWalker};
