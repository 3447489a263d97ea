//! In-memory SPDX document and its assembly operations.

use super::model::{
    CreationInfo, ExternalRef, ExtractedLicense, RelationshipType, SpdxPackage, SpdxRelationship,
};
use crate::error::{ExportError, OutputErrorKind, Result};
use crate::model::{DOCUMENT_ID, NOASSERTION, ResolvedVersion, clean_for_spdx, strip_quotes};
use serde::Serialize;
use std::collections::HashSet;

pub const SPDX_VERSION: &str = "SPDX-2.2";
pub const DATA_LICENSE: &str = "CC0-1.0";
pub const LICENSE_LIST_VERSION: &str = "3.9";
const TOP_PACKAGE_COMMENT: &str = "Generated top level package representing Black Duck project";
const UNKNOWN_LICENSE: &str = "Unknown License";

/// Creator string naming this tool.
#[must_use]
pub fn tool_creator() -> String {
    format!(
        "Tool: {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// An SPDX 2.2 document under construction.
///
/// Packages and extracted licenses are added idempotently by identifier;
/// relationships are appended as given.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxDocument {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    spdx_version: String,
    creation_info: CreationInfo,
    name: String,
    data_license: String,
    document_describes: Vec<String>,
    document_namespace: String,
    download_location: String,
    files_analyzed: bool,
    copyright_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_refs: Vec<ExternalRef>,
    packages: Vec<SpdxPackage>,
    relationships: Vec<SpdxRelationship>,
    snippets: Vec<serde_json::Value>,
    has_extracted_licensing_infos: Vec<ExtractedLicense>,
    #[serde(skip)]
    package_ids: HashSet<String>,
    #[serde(skip)]
    license_ids: HashSet<String>,
}

impl SpdxDocument {
    /// Start a document for a project version.
    ///
    /// The document is created with the top-level package representing the
    /// project version and the DESCRIBES relationship pointing at it.
    pub fn for_project(resolved: &ResolvedVersion) -> Self {
        let project = &resolved.project;
        let version = &resolved.version;
        let top_id = top_package_id(&project.name, &version.version_name);

        let mut external_refs = Vec::new();
        if let Some(href) = &project.meta.href {
            external_refs.push(ExternalRef::other("BlackDuckHub-Project", href.as_str()));
        }
        if let Some(href) = &version.meta.href {
            external_refs.push(ExternalRef::other(
                "BlackDuckHub-Project-Version",
                href.as_str(),
            ));
        }

        let description = project.description.as_deref().map(strip_quotes);

        let mut doc = Self {
            spdx_id: DOCUMENT_ID.to_string(),
            spdx_version: SPDX_VERSION.to_string(),
            creation_info: CreationInfo {
                created: creation_timestamp(version.created_at.as_deref()),
                creators: vec![tool_creator()],
                license_list_version: LICENSE_LIST_VERSION.to_string(),
                comment: description.clone(),
            },
            name: strip_quotes(&resolved.label()),
            data_license: DATA_LICENSE.to_string(),
            document_describes: vec![top_id.clone()],
            document_namespace: version
                .meta
                .href
                .clone()
                .unwrap_or_else(|| format!("urn:bd-spdx-export:{}", clean_for_spdx(&resolved.label()))),
            download_location: NOASSERTION.to_string(),
            files_analyzed: false,
            copyright_text: NOASSERTION.to_string(),
            external_refs,
            packages: Vec::new(),
            relationships: Vec::new(),
            snippets: Vec::new(),
            has_extracted_licensing_infos: Vec::new(),
            package_ids: HashSet::new(),
            license_ids: HashSet::new(),
        };

        let license_declared = version
            .license
            .as_ref()
            .map(|l| l.license_display.as_str())
            .filter(|display| !display.is_empty() && *display != UNKNOWN_LICENSE)
            .map_or_else(|| NOASSERTION.to_string(), strip_quotes);

        doc.add_relationship(DOCUMENT_ID, RelationshipType::Describes, &top_id);
        doc.add_package(SpdxPackage {
            spdx_id: top_id,
            name: strip_quotes(&project.name),
            version_info: Some(strip_quotes(&version.version_name)),
            description,
            download_location: NOASSERTION.to_string(),
            license_concluded: NOASSERTION.to_string(),
            license_declared,
            files_analyzed: false,
            package_comment: Some(TOP_PACKAGE_COMMENT.to_string()),
            copyright_text: NOASSERTION.to_string(),
            ..Default::default()
        });
        doc
    }

    /// Identifier of the package representing the project version.
    #[must_use]
    pub fn top_package_id(&self) -> &str {
        self.document_describes
            .first()
            .map_or(DOCUMENT_ID, String::as_str)
    }

    /// Add a package unless one with the same identifier exists.
    ///
    /// Returns true if the package was inserted.
    pub fn add_package(&mut self, package: SpdxPackage) -> bool {
        if !self.package_ids.insert(package.spdx_id.clone()) {
            return false;
        }
        self.packages.push(package);
        true
    }

    #[must_use]
    pub fn has_package(&self, spdx_id: &str) -> bool {
        self.package_ids.contains(spdx_id)
    }

    /// Append a relationship.
    pub fn add_relationship(&mut self, from: &str, relationship_type: RelationshipType, to: &str) {
        self.relationships.push(SpdxRelationship::new(
            strip_quotes(from),
            relationship_type,
            strip_quotes(to),
        ));
    }

    /// Register a custom license unless its id is already present.
    pub fn add_extracted_license(&mut self, license: ExtractedLicense) -> bool {
        if !self.license_ids.insert(license.license_id.clone()) {
            return false;
        }
        self.has_extracted_licensing_infos.push(license);
        true
    }

    #[must_use]
    pub fn packages(&self) -> &[SpdxPackage] {
        &self.packages
    }

    #[must_use]
    pub fn package(&self, spdx_id: &str) -> Option<&SpdxPackage> {
        self.packages.iter().find(|p| p.spdx_id == spdx_id)
    }

    #[must_use]
    pub fn relationships(&self) -> &[SpdxRelationship] {
        &self.relationships
    }

    #[must_use]
    pub fn extracted_licenses(&self) -> &[ExtractedLicense] {
        &self.has_extracted_licensing_infos
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn creation_info(&self) -> &CreationInfo {
        &self.creation_info
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.document_namespace
    }

    /// Convert to a JSON value with sorted object keys.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| {
            ExportError::output("serializing document", OutputErrorKind::Serialization(e.to_string()))
        })
    }

    /// Render as pretty-printed JSON with a four-space indent.
    pub fn to_json_string(&self) -> Result<String> {
        let value = self.to_json_value()?;
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer).map_err(|e| {
            ExportError::output("serializing document", OutputErrorKind::Serialization(e.to_string()))
        })?;
        String::from_utf8(buf).map_err(|e| {
            ExportError::output("serializing document", OutputErrorKind::Serialization(e.to_string()))
        })
    }
}

/// Identifier of the package representing a project version.
#[must_use]
pub fn top_package_id(project: &str, version: &str) -> String {
    crate::model::package_id(project, version)
}

/// Creation timestamp in whole seconds with a `Z` suffix.
fn creation_timestamp(created_at: Option<&str>) -> String {
    match created_at {
        Some(ts) if !ts.is_empty() => {
            let whole = ts.split('.').next().unwrap_or(ts).trim_end_matches('Z');
            strip_quotes(&format!("{whole}Z"))
        }
        _ => chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, ProjectVersion, ResourceMeta, VersionLicense};

    fn resolved() -> ResolvedVersion {
        ResolvedVersion {
            project: Project {
                name: "acme".to_string(),
                description: Some("Acme's \"main\" app".to_string()),
                meta: ResourceMeta {
                    href: Some("https://hub/api/projects/p1".to_string()),
                    links: Vec::new(),
                },
            },
            version: ProjectVersion {
                version_name: "1.0".to_string(),
                created_at: Some("2021-03-04T10:11:12.345Z".to_string()),
                license: Some(VersionLicense {
                    license_display: "Apache License 2.0".to_string(),
                }),
                meta: ResourceMeta {
                    href: Some("https://hub/api/projects/p1/versions/v1".to_string()),
                    links: Vec::new(),
                },
            },
        }
    }

    fn package(id: &str) -> SpdxPackage {
        SpdxPackage {
            spdx_id: id.to_string(),
            name: id.to_string(),
            download_location: NOASSERTION.to_string(),
            license_concluded: NOASSERTION.to_string(),
            license_declared: NOASSERTION.to_string(),
            copyright_text: NOASSERTION.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_for_project_top_level() {
        let doc = SpdxDocument::for_project(&resolved());
        assert_eq!(doc.top_package_id(), "SPDXRef-Package-acme-10");
        assert_eq!(doc.packages().len(), 1);
        assert_eq!(doc.relationships().len(), 1);

        let rel = &doc.relationships()[0];
        assert_eq!(rel.spdx_element_id, "SPDXRef-DOCUMENT");
        assert_eq!(rel.relationship_type, RelationshipType::Describes);
        assert_eq!(rel.related_spdx_element, "SPDXRef-Package-acme-10");

        let top = &doc.packages()[0];
        assert_eq!(top.license_declared, "Apache License 2.0");
        assert_eq!(top.description.as_deref(), Some("Acmes main app"));
        assert_eq!(doc.creation_info().created, "2021-03-04T10:11:12Z");
        assert_eq!(doc.namespace(), "https://hub/api/projects/p1/versions/v1");
        assert_eq!(doc.name(), "acme/1.0");
    }

    #[test]
    fn test_unknown_license_is_noassertion() {
        let mut r = resolved();
        r.version.license = Some(VersionLicense {
            license_display: "Unknown License".to_string(),
        });
        let doc = SpdxDocument::for_project(&r);
        assert_eq!(doc.packages()[0].license_declared, NOASSERTION);
    }

    #[test]
    fn test_add_package_idempotent() {
        let mut doc = SpdxDocument::for_project(&resolved());
        assert!(doc.add_package(package("SPDXRef-Package-a-1")));
        assert!(!doc.add_package(package("SPDXRef-Package-a-1")));
        assert_eq!(doc.packages().len(), 2);
        assert!(doc.has_package("SPDXRef-Package-a-1"));
    }

    #[test]
    fn test_relationships_not_deduplicated() {
        let mut doc = SpdxDocument::for_project(&resolved());
        doc.add_relationship("A", RelationshipType::Contains, "B");
        doc.add_relationship("A", RelationshipType::Contains, "B");
        assert_eq!(doc.relationships().len(), 3);
    }

    #[test]
    fn test_extracted_license_idempotent() {
        let mut doc = SpdxDocument::for_project(&resolved());
        let lic = ExtractedLicense {
            license_id: "LicenseRef-Acme".to_string(),
            extracted_text: "text".to_string(),
        };
        assert!(doc.add_extracted_license(lic.clone()));
        assert!(!doc.add_extracted_license(lic));
        assert_eq!(doc.extracted_licenses().len(), 1);
    }

    #[test]
    fn test_json_layout() {
        let doc = SpdxDocument::for_project(&resolved());
        let text = doc.to_json_string().unwrap();
        assert!(text.contains("\"spdxVersion\": \"SPDX-2.2\""));
        assert!(text.contains("\"snippets\": []"));
        assert!(!text.contains("packageIds"));

        assert!(text.starts_with("{\n    \"SPDXID\""));
        let pos = |key: &str| text.find(&format!("\n    \"{key}\"")).unwrap();
        assert!(pos("creationInfo") < pos("dataLicense"));
        assert!(pos("packages") < pos("relationships"));
        assert!(pos("snippets") < pos("spdxVersion"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["documentDescribes"][0], "SPDXRef-Package-acme-10");
    }

    #[test]
    fn test_creation_timestamp_variants() {
        assert_eq!(
            creation_timestamp(Some("2020-01-02T03:04:05Z")),
            "2020-01-02T03:04:05Z"
        );
        assert!(creation_timestamp(None).ends_with('Z'));
    }
}
