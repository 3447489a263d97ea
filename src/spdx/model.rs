//! SPDX 2.2 JSON output records.
//!
//! Field names follow the SPDX 2.2 JSON schema exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a relationship between two SPDX elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Describes,
    Contains,
    DependsOn,
    StaticLink,
    DynamicLink,
    HasPrerequisite,
    DevToolOf,
    Other,
}

impl RelationshipType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Describes => "DESCRIBES",
            Self::Contains => "CONTAINS",
            Self::DependsOn => "DEPENDS_ON",
            Self::StaticLink => "STATIC_LINK",
            Self::DynamicLink => "DYNAMIC_LINK",
            Self::HasPrerequisite => "HAS_PREREQUISITE",
            Self::DevToolOf => "DEV_TOOL_OF",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge between two SPDX elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxRelationship {
    pub spdx_element_id: String,
    pub relationship_type: RelationshipType,
    pub related_spdx_element: String,
}

impl SpdxRelationship {
    pub fn new(
        from: impl Into<String>,
        relationship_type: RelationshipType,
        to: impl Into<String>,
    ) -> Self {
        Self {
            spdx_element_id: from.into(),
            relationship_type,
            related_spdx_element: to.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceCategory {
    Security,
    PackageManager,
    Other,
}

/// External reference from a package or document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRef {
    pub reference_category: ReferenceCategory,
    pub reference_type: String,
    pub reference_locator: String,
}

impl ExternalRef {
    pub fn purl(locator: impl Into<String>) -> Self {
        Self {
            reference_category: ReferenceCategory::PackageManager,
            reference_type: "purl".to_string(),
            reference_locator: locator.into(),
        }
    }

    pub fn other(reference_type: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            reference_category: ReferenceCategory::Other,
            reference_type: reference_type.into(),
            reference_locator: locator.into(),
        }
    }
}

/// A reviewer comment carried on a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub annotation_date: String,
    pub annotation_type: String,
    pub annotator: String,
    pub comment: String,
}

/// Text of a license outside the SPDX catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLicense {
    pub license_id: String,
    pub extracted_text: String,
}

/// One package entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    pub spdx_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub download_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_homepage: Option<String>,
    pub license_concluded: String,
    pub license_declared: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_supplier: Option<String>,
    pub files_analyzed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_comment: Option<String>,
    pub copyright_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<ExternalRef>,
}

/// Document creation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationInfo {
    pub created: String,
    pub creators: Vec<String>,
    pub license_list_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
