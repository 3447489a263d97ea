//! Collaborator traits for the BOM server.
//!
//! The exporter talks to the server only through these traits, so the REST
//! client and offline snapshots are interchangeable.

use crate::error::Result;
use crate::model::{
    BomNode, BomSnapshot, ComponentDetails, ComponentVersion, CopyrightEntry, CustomField,
    MatchedFile, Origin, ResolvedVersion, ReviewComment,
};

/// Resolves project and version names to server handles.
pub trait ProjectResolver {
    /// Resolve a project version by name.
    ///
    /// Fails with [`ExportError::NotFound`](crate::ExportError::NotFound) when
    /// either name does not exist.
    fn resolve(&self, project: &str, version: &str) -> Result<ResolvedVersion>;

    /// Names of all projects visible to the caller.
    fn project_names(&self) -> Result<Vec<String>>;
}

/// Read access to BOMs and their sub-resources.
///
/// Sub-resource lookups run concurrently from the enrichment pool.
pub trait BomSource: Send + Sync {
    /// Flat list of all BOM entries for a project version.
    fn bom_components(&self, version: &ResolvedVersion) -> Result<Vec<ComponentVersion>>;

    /// Hierarchical BOM tree with children resolved.
    fn hierarchical_bom(&self, version: &ResolvedVersion) -> Result<Vec<BomNode>>;

    /// Copyright statements of a component origin.
    fn copyrights(&self, origin: &Origin) -> Result<Vec<CopyrightEntry>>;

    /// Review comments on a BOM entry.
    fn comments(&self, component: &ComponentVersion) -> Result<Vec<ReviewComment>>;

    /// Scanned files matched to a BOM entry.
    fn matched_files(&self, component: &ComponentVersion) -> Result<Vec<MatchedFile>>;

    /// User-defined fields on a BOM entry.
    fn custom_fields(&self, component: &ComponentVersion) -> Result<Vec<CustomField>>;

    /// The component resource behind a BOM entry.
    fn component_details(&self, component: &ComponentVersion) -> Result<ComponentDetails>;

    /// Raw text of a license, by license key.
    fn license_text(&self, license_key: &str) -> Result<String>;

    /// Fetch both BOM views of a project version.
    fn snapshot(&self, version: &ResolvedVersion) -> Result<BomSnapshot> {
        let components = self.bom_components(version)?;
        let hierarchy = self.hierarchical_bom(version)?;
        Ok(BomSnapshot::new(components, hierarchy))
    }
}

/// A full BOM server: name resolution plus BOM access.
pub trait BomServer: ProjectResolver + BomSource {}

impl<T: ProjectResolver + BomSource + ?Sized> BomServer for T {}
