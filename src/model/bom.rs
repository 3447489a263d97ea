//! BOM data structures as served by the Black Duck REST API.
//!
//! The types deserialize directly from the server's JSON (camelCase fields,
//! `_meta.links` hypermedia), so the same structures back both the remote
//! client and offline snapshots.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A hypermedia link attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

/// The `_meta` block of a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ResourceMeta {
    /// Find the first link with the given relation.
    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel == rel)
            .map(|l| l.href.as_str())
    }
}

// ============================================================================
// Tag vocabularies
// ============================================================================

/// Kind of component carried in the BOM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    /// Knowledge-base component
    #[default]
    OpenSource,
    /// Component defined by the user
    Custom,
    /// Another project version nested in this BOM
    SubProject,
    Other(String),
}

impl From<String> for ComponentKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "KB_COMPONENT" => Self::OpenSource,
            "CUSTOM_COMPONENT" => Self::Custom,
            "SUB_PROJECT" => Self::SubProject,
            _ => Self::Other(s),
        }
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenSource => write!(f, "KB_COMPONENT"),
            Self::Custom => write!(f, "CUSTOM_COMPONENT"),
            Self::SubProject => write!(f, "SUB_PROJECT"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// How a component was detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchType {
    FileDependencyDirect,
    FileDependencyTransitive,
    FileDependency,
    FileExact,
    FileExactFileMatch,
    FilesAddedDeletedAndModified,
    FileSomeFilesModified,
    ManualBomComponent,
    ManualBomFile,
    PartialFile,
    Binary,
    Snippet,
    Other(String),
}

impl MatchType {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("FILE_DEPENDENCY_DIRECT", Self::FileDependencyDirect),
        ("FILE_DEPENDENCY_TRANSITIVE", Self::FileDependencyTransitive),
        ("FILE_DEPENDENCY", Self::FileDependency),
        ("FILE_EXACT", Self::FileExact),
        ("FILE_EXACT_FILE_MATCH", Self::FileExactFileMatch),
        (
            "FILE_FILES_ADDED_DELETED_AND_MODIFIED",
            Self::FilesAddedDeletedAndModified,
        ),
        ("FILE_SOME_FILES_MODIFIED", Self::FileSomeFilesModified),
        ("MANUAL_BOM_COMPONENT", Self::ManualBomComponent),
        ("MANUAL_BOM_FILE", Self::ManualBomFile),
        ("PARTIAL_FILE", Self::PartialFile),
        ("BINARY", Self::Binary),
        ("SNIPPET", Self::Snippet),
    ];

    /// Wire name of this tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Other(s) => s,
            known => Self::TABLE
                .iter()
                .find(|(_, t)| t == known)
                .map_or("", |(name, _)| *name),
        }
    }
}

impl From<String> for MatchType {
    fn from(s: String) -> Self {
        Self::TABLE
            .iter()
            .find(|(name, _)| *name == s)
            .map_or(Self::Other(s), |(_, t)| t.clone())
    }
}

impl From<&str> for MatchType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<MatchType> for String {
    fn from(m: MatchType) -> Self {
        m.as_str().to_string()
    }
}

/// Declared usage of a component (linkage semantics).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Usage {
    SourceCode,
    StaticallyLinked,
    DynamicallyLinked,
    SeparateWork,
    MerelyAggregated,
    ImplementationOfStandard,
    Prerequisite,
    DevToolExcluded,
    Other(String),
}

impl From<String> for Usage {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SOURCE_CODE" => Self::SourceCode,
            "STATICALLY_LINKED" => Self::StaticallyLinked,
            "DYNAMICALLY_LINKED" => Self::DynamicallyLinked,
            "SEPARATE_WORK" => Self::SeparateWork,
            "MERELY_AGGREGATED" => Self::MerelyAggregated,
            "IMPLEMENTATION_OF_STANDARD" => Self::ImplementationOfStandard,
            "PREREQUISITE" => Self::Prerequisite,
            "DEV_TOOL_EXCLUDED" => Self::DevToolExcluded,
            _ => Self::Other(s),
        }
    }
}

impl From<Usage> for String {
    fn from(u: Usage) -> Self {
        match u {
            Usage::SourceCode => "SOURCE_CODE".to_string(),
            Usage::StaticallyLinked => "STATICALLY_LINKED".to_string(),
            Usage::DynamicallyLinked => "DYNAMICALLY_LINKED".to_string(),
            Usage::SeparateWork => "SEPARATE_WORK".to_string(),
            Usage::MerelyAggregated => "MERELY_AGGREGATED".to_string(),
            Usage::ImplementationOfStandard => "IMPLEMENTATION_OF_STANDARD".to_string(),
            Usage::Prerequisite => "PREREQUISITE".to_string(),
            Usage::DevToolExcluded => "DEV_TOOL_EXCLUDED".to_string(),
            Usage::Other(s) => s,
        }
    }
}

// ============================================================================
// Component versions
// ============================================================================

/// One upstream catalog identity of a component version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    /// Ecosystem name, e.g. "npmjs" or "maven"
    #[serde(rename = "externalNamespace", default)]
    pub ecosystem: Option<String>,
    /// Ecosystem-specific packed identifier
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(rename = "_meta", default)]
    pub meta: ResourceMeta,
}

impl Origin {
    pub fn new(ecosystem: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            ecosystem: Some(ecosystem.into()),
            external_id: Some(external_id.into()),
            meta: ResourceMeta::default(),
        }
    }

    /// URL of this origin's copyright statements.
    #[must_use]
    pub fn copyrights_url(&self) -> Option<&str> {
        self.meta.link("component-origin-copyrights")
    }
}

/// A license attached to a BOM entry; may nest a list of alternatives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomLicense {
    /// Catalog SPDX identifier; absent for custom licenses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spdx_id: Option<String>,
    #[serde(default)]
    pub license_display: String,
    /// License resource URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<BomLicense>,
}

impl BomLicense {
    /// Trailing path segment of the license resource URL.
    #[must_use]
    pub fn license_key(&self) -> Option<&str> {
        self.license
            .as_deref()
            .and_then(|href| href.rsplit('/').next())
            .filter(|k| !k.is_empty())
    }
}

/// One resolved component at one version, as listed in a BOM.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentVersion {
    pub component_name: String,
    #[serde(default)]
    pub component_version_name: Option<String>,
    /// Component resource URL
    #[serde(default)]
    pub component: Option<String>,
    /// Component-version resource URL; the stable dedup key
    #[serde(default)]
    pub component_version: Option<String>,
    #[serde(default)]
    pub component_type: ComponentKind,
    #[serde(default)]
    pub match_types: Vec<MatchType>,
    #[serde(default)]
    pub usages: Vec<Usage>,
    #[serde(default)]
    pub origins: Vec<Origin>,
    #[serde(default)]
    pub licenses: Vec<BomLicense>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "_meta", default)]
    pub meta: ResourceMeta,
}

impl ComponentVersion {
    /// Stable key identifying this component version.
    #[must_use]
    pub fn version_id(&self) -> Option<&str> {
        self.component_version.as_deref()
    }

    /// Version name, if one was assigned.
    #[must_use]
    pub fn version_name(&self) -> Option<&str> {
        self.component_version_name.as_deref()
    }

    /// First listed origin, used for purl and copyright lookups.
    #[must_use]
    pub fn first_origin(&self) -> Option<&Origin> {
        self.origins.first()
    }

    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.meta.link(rel)
    }

    /// `name/version` label for logging.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}/{}",
            self.component_name,
            self.version_name().unwrap_or("?")
        )
    }
}

/// A node in the hierarchical BOM tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BomNode {
    #[serde(flatten)]
    pub component: ComponentVersion,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BomNode>,
}

impl BomNode {
    pub fn new(component: ComponentVersion) -> Self {
        Self {
            component,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<BomNode>) -> Self {
        self.children = children;
        self
    }

    /// Visit this node and all descendants depth-first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a BomNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

// ============================================================================
// Sub-resources
// ============================================================================

/// A copyright statement attached to an origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyrightEntry {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub updated_copyright: String,
}

/// Author of a review comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentUser {
    #[serde(default)]
    pub email: String,
}

/// A reviewer comment on a BOM entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewComment {
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub user: CommentUser,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilePath {
    #[serde(default)]
    pub path: String,
}

/// A scanned file matched to a BOM entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedFile {
    #[serde(default)]
    pub file_path: FilePath,
}

/// A user-defined field on a BOM entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Details of the component resource itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentDetails {
    /// Homepage URL
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "_meta", default)]
    pub meta: ResourceMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionLicense {
    #[serde(default)]
    pub license_display: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectVersion {
    pub version_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub license: Option<VersionLicense>,
    #[serde(rename = "_meta", default)]
    pub meta: ResourceMeta,
}

/// A project and one of its versions, as resolved on the server.
#[derive(Debug, Clone, Default)]
pub struct ResolvedVersion {
    pub project: Project,
    pub version: ProjectVersion,
}

impl ResolvedVersion {
    /// Key used to detect re-entry of the same project version.
    #[must_use]
    pub fn key(&self) -> String {
        self.version
            .meta
            .href
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.project.name, self.version.version_name))
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.project.name, self.version.version_name)
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// The BOM of one project version: flat list plus hierarchical tree.
#[derive(Debug, Clone, Default)]
pub struct BomSnapshot {
    /// Flat BOM entries keyed by component-version id, in server order
    pub components: IndexMap<String, ComponentVersion>,
    pub hierarchy: Vec<BomNode>,
    /// Flat entries dropped because they carry no version
    pub unversioned: Vec<String>,
}

impl BomSnapshot {
    pub fn new(components: Vec<ComponentVersion>, hierarchy: Vec<BomNode>) -> Self {
        let mut map = IndexMap::with_capacity(components.len());
        let mut unversioned = Vec::new();
        for comp in components {
            match comp.component_version.clone() {
                Some(id) => {
                    map.insert(id, comp);
                }
                None => unversioned.push(comp.component_name),
            }
        }
        Self {
            components: map,
            hierarchy,
            unversioned,
        }
    }

    /// The flat BOM entry for a component version, if listed.
    #[must_use]
    pub fn entry(&self, version_id: &str) -> Option<&ComponentVersion> {
        self.components.get(version_id)
    }

    /// Every distinct component version in the snapshot.
    ///
    /// Flat entries come first in server order, followed by tree-only
    /// entries in depth-first order.
    #[must_use]
    pub fn distinct_components(&self) -> Vec<&ComponentVersion> {
        let mut seen: HashSet<&str> = self.components.keys().map(String::as_str).collect();
        let mut out: Vec<&ComponentVersion> = self.components.values().collect();
        for root in &self.hierarchy {
            root.visit(&mut |node| {
                if let Some(id) = node.component.version_id() {
                    if seen.insert(id) {
                        out.push(&node.component);
                    }
                }
            });
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.hierarchy.is_empty()
    }
}
