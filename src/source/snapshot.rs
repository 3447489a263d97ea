//! Offline BOM source backed by a JSON snapshot.
//!
//! A snapshot holds the projects and versions known to a server, the flat
//! and hierarchical BOM of each version, and sub-resource tables keyed by
//! the URL (or license key) the REST API would be queried with:
//!
//! ```json
//! {
//!   "projects": [{
//!     "name": "acme",
//!     "versions": [{
//!       "versionName": "1.0",
//!       "_meta": {"href": "https://hub/api/projects/p1/versions/v1"},
//!       "components": [],
//!       "hierarchy": []
//!     }]
//!   }],
//!   "copyrights": {},
//!   "comments": {},
//!   "matchedFiles": {},
//!   "customFields": {},
//!   "componentDetails": {},
//!   "licenseTexts": {},
//!   "failures": []
//! }
//! ```
//!
//! Every lookup is counted so callers can check how often each resource
//! was requested. Keys listed under `failures` answer with a network error.

use super::traits::{BomSource, ProjectResolver};
use crate::error::{
    EnrichmentErrorKind, ErrorContext, ExportError, Result, SourceErrorKind,
};
use crate::model::{
    BomNode, ComponentDetails, ComponentVersion, CopyrightEntry, CustomField, MatchedFile,
    Origin, Project, ProjectVersion, ResolvedVersion, ReviewComment,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Kind of resource fetched from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Bom,
    Hierarchy,
    Copyrights,
    Comments,
    MatchedFiles,
    CustomFields,
    ComponentDetails,
    LicenseText,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bom => "components",
            Self::Hierarchy => "hierarchical-components",
            Self::Copyrights => "copyrights",
            Self::Comments => "comments",
            Self::MatchedFiles => "matched-files",
            Self::CustomFields => "custom-fields",
            Self::ComponentDetails => "component",
            Self::LicenseText => "license text",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotData {
    #[serde(default)]
    projects: Vec<SnapshotProject>,
    #[serde(default)]
    copyrights: HashMap<String, Vec<CopyrightEntry>>,
    #[serde(default)]
    comments: HashMap<String, Vec<ReviewComment>>,
    #[serde(default)]
    matched_files: HashMap<String, Vec<MatchedFile>>,
    #[serde(default)]
    custom_fields: HashMap<String, Vec<CustomField>>,
    #[serde(default)]
    component_details: HashMap<String, ComponentDetails>,
    #[serde(default)]
    license_texts: HashMap<String, String>,
    #[serde(default)]
    failures: HashSet<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotProject {
    #[serde(flatten)]
    project: Project,
    #[serde(default)]
    versions: Vec<SnapshotVersion>,
}

#[derive(Debug, Deserialize)]
struct SnapshotVersion {
    #[serde(flatten)]
    version: ProjectVersion,
    #[serde(default)]
    components: Vec<ComponentVersion>,
    #[serde(default)]
    hierarchy: Vec<BomNode>,
}

/// BOM source reading from an in-memory snapshot.
#[derive(Debug, Default)]
pub struct SnapshotSource {
    data: SnapshotData,
    fetches: Mutex<HashMap<(FetchKind, String), usize>>,
}

impl SnapshotSource {
    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: SnapshotData = serde_json::from_str(json).context("parsing BOM snapshot")?;
        Ok(Self {
            data,
            fetches: Mutex::default(),
        })
    }

    /// Load a snapshot file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        Self::from_json(&json).with_context(|| format!("snapshot {}", path.display()))
    }

    /// Total number of fetches of one kind.
    #[must_use]
    pub fn fetch_count(&self, kind: FetchKind) -> usize {
        self.lock_fetches()
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, n)| n)
            .sum()
    }

    /// Number of fetches of one kind for one key.
    #[must_use]
    pub fn fetch_count_for(&self, kind: FetchKind, key: &str) -> usize {
        self.lock_fetches()
            .get(&(kind, key.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Highest fetch count of any single key of one kind.
    #[must_use]
    pub fn max_fetches_per_key(&self, kind: FetchKind) -> usize {
        self.lock_fetches()
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, n)| *n)
            .max()
            .unwrap_or(0)
    }

    fn lock_fetches(&self) -> std::sync::MutexGuard<'_, HashMap<(FetchKind, String), usize>> {
        self.fetches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a fetch and fail if the key is marked as failing.
    fn record(&self, kind: FetchKind, key: &str) -> Result<()> {
        *self
            .lock_fetches()
            .entry((kind, key.to_string()))
            .or_default() += 1;

        if self.data.failures.contains(key) {
            return Err(ExportError::source(
                format!("{kind} {key}"),
                SourceErrorKind::NetworkError("simulated failure".to_string()),
            ));
        }
        Ok(())
    }

    fn version_entry(&self, version: &ResolvedVersion) -> Result<&SnapshotVersion> {
        self.data
            .projects
            .iter()
            .filter(|p| p.project.name == version.project.name)
            .flat_map(|p| &p.versions)
            .find(|v| v.version.version_name == version.version.version_name)
            .ok_or_else(|| ExportError::version_not_found(&version.version.version_name))
    }

    fn linked_list<T: Clone>(
        &self,
        kind: FetchKind,
        table: &HashMap<String, Vec<T>>,
        url: Option<&str>,
        rel: &str,
    ) -> Result<Vec<T>> {
        let url = url.ok_or_else(|| {
            ExportError::enrichment(
                kind.to_string(),
                EnrichmentErrorKind::MissingLink(rel.to_string()),
            )
        })?;
        self.record(kind, url)?;
        Ok(table.get(url).cloned().unwrap_or_default())
    }
}

impl ProjectResolver for SnapshotSource {
    fn resolve(&self, project: &str, version: &str) -> Result<ResolvedVersion> {
        let Some(entry) = self.data.projects.iter().find(|p| p.project.name == project) else {
            return Err(ExportError::project_not_found(project, self.project_names()?));
        };
        let found = entry
            .versions
            .iter()
            .find(|v| v.version.version_name == version)
            .ok_or_else(|| ExportError::version_not_found(version))?;

        Ok(ResolvedVersion {
            project: entry.project.clone(),
            version: found.version.clone(),
        })
    }

    fn project_names(&self) -> Result<Vec<String>> {
        Ok(self
            .data
            .projects
            .iter()
            .map(|p| p.project.name.clone())
            .collect())
    }
}

impl BomSource for SnapshotSource {
    fn bom_components(&self, version: &ResolvedVersion) -> Result<Vec<ComponentVersion>> {
        self.record(FetchKind::Bom, &version.key())?;
        Ok(self.version_entry(version)?.components.clone())
    }

    fn hierarchical_bom(&self, version: &ResolvedVersion) -> Result<Vec<BomNode>> {
        self.record(FetchKind::Hierarchy, &version.key())?;
        Ok(self.version_entry(version)?.hierarchy.clone())
    }

    fn copyrights(&self, origin: &Origin) -> Result<Vec<CopyrightEntry>> {
        self.linked_list(
            FetchKind::Copyrights,
            &self.data.copyrights,
            origin.copyrights_url(),
            "component-origin-copyrights",
        )
    }

    fn comments(&self, component: &ComponentVersion) -> Result<Vec<ReviewComment>> {
        self.linked_list(
            FetchKind::Comments,
            &self.data.comments,
            component.link("comments"),
            "comments",
        )
    }

    fn matched_files(&self, component: &ComponentVersion) -> Result<Vec<MatchedFile>> {
        self.linked_list(
            FetchKind::MatchedFiles,
            &self.data.matched_files,
            component.link("matched-files"),
            "matched-files",
        )
    }

    fn custom_fields(&self, component: &ComponentVersion) -> Result<Vec<CustomField>> {
        self.linked_list(
            FetchKind::CustomFields,
            &self.data.custom_fields,
            component.link("custom-fields"),
            "custom-fields",
        )
    }

    fn component_details(&self, component: &ComponentVersion) -> Result<ComponentDetails> {
        let href = component.component.as_deref().ok_or_else(|| {
            ExportError::enrichment(
                FetchKind::ComponentDetails.to_string(),
                EnrichmentErrorKind::MissingLink("component".to_string()),
            )
        })?;
        self.record(FetchKind::ComponentDetails, href)?;
        Ok(self
            .data
            .component_details
            .get(href)
            .cloned()
            .unwrap_or_default())
    }

    fn license_text(&self, license_key: &str) -> Result<String> {
        self.record(FetchKind::LicenseText, license_key)?;
        self.data.license_texts.get(license_key).cloned().ok_or_else(|| {
            ExportError::missing_resource("license text", license_key)
        })
    }
}
