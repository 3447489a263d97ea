//! Project export driver.

use crate::config::ExportConfig;
use crate::enrichment::{DownloadLocator, EnrichmentStats, MetadataEnricher, NoOpLocator};
use crate::error::{ErrorContext, Result};
use crate::model::ResolvedVersion;
use crate::source::BomServer;
use crate::spdx::SpdxDocument;
use crate::walker::{ExportContext, GraphWalker, PackageFactory};
use std::collections::HashSet;
use std::time::Instant;

static NO_OP_LOCATOR: NoOpLocator = NoOpLocator;

/// Result of a finished export.
#[derive(Debug)]
pub struct ExportOutcome {
    pub document: SpdxDocument,
    /// Enrichment and lookup statistics for the whole run
    pub stats: EnrichmentStats,
    /// BOM positions processed, nested projects included
    pub components_processed: usize,
}

/// Exports one project version, and optionally its sub-projects, into a
/// single SPDX document.
pub struct Exporter<'a, S: BomServer + ?Sized> {
    server: &'a S,
    config: &'a ExportConfig,
    locator: &'a dyn DownloadLocator,
}

impl<'a, S: BomServer + ?Sized> Exporter<'a, S> {
    pub fn new(server: &'a S, config: &'a ExportConfig) -> Self {
        Self {
            server,
            config,
            locator: &NO_OP_LOCATOR,
        }
    }

    /// Use a custom download-location locator.
    #[must_use]
    pub fn with_locator(mut self, locator: &'a dyn DownloadLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Resolve `project`/`version` and build its document.
    ///
    /// Fails only if the project version cannot be resolved or its BOM
    /// cannot be fetched. Failures inside nested sub-projects skip that
    /// sub-project.
    pub fn export(&self, project: &str, version: &str) -> Result<ExportOutcome> {
        let resolved = self.server.resolve(project, version)?;
        tracing::info!(
            "Working on project '{}' version '{}'",
            resolved.project.name,
            resolved.version.version_name
        );

        let known_projects: HashSet<String> = if self.config.recursive {
            self.server
                .project_names()
                .context("listing projects")?
                .into_iter()
                .collect()
        } else {
            HashSet::new()
        };

        let mut document = SpdxDocument::for_project(&resolved);
        let mut ctx = ExportContext::new();
        let top = document.top_package_id().to_string();
        ctx.mark_emitted(&top);

        let components_processed =
            self.process_project(&resolved, &top, &known_projects, &mut document, &mut ctx)?;

        Ok(ExportOutcome {
            document,
            stats: ctx.stats,
            components_processed,
        })
    }

    fn process_project(
        &self,
        resolved: &ResolvedVersion,
        parent_id: &str,
        known_projects: &HashSet<String>,
        document: &mut SpdxDocument,
        ctx: &mut ExportContext,
    ) -> Result<usize> {
        if !ctx.enter_project(&resolved.key()) {
            tracing::info!("Project '{}' already exported, linking only", resolved.label());
            return Ok(0);
        }

        let start = Instant::now();
        tracing::info!("Getting components ...");
        let snapshot = self
            .server
            .snapshot(resolved)
            .with_context(|| format!("BOM of {}", resolved.label()))?;
        tracing::info!("Retrieved {} components", snapshot.components.len());
        for name in &snapshot.unversioned {
            tracing::info!("Skipping component {} which has no assigned version", name);
        }
        tracing::debug!("--- {:?} ---", start.elapsed());

        let pending = ctx.pending_enrichment(&snapshot.distinct_components());
        let enricher = MetadataEnricher::new(self.server, self.config.enrichment.clone());
        let outcome = enricher.enrich(&pending, &ctx.licenses)?;
        tracing::info!(
            "Enriched {} components ({} degraded fields)",
            outcome.stats.components_enriched,
            outcome.stats.degraded_fields
        );
        tracing::debug!("--- {:?} ---", start.elapsed());

        for metadata in pending
            .iter()
            .filter_map(|c| c.version_id().and_then(|id| outcome.metadata.get(id)))
        {
            for license in &metadata.extracted_licenses {
                document.add_extracted_license(license.clone());
            }
        }
        ctx.absorb(outcome);

        let walker = GraphWalker::new(
            &snapshot,
            PackageFactory::new(self.locator, self.config.enrichment.download_locations),
        );

        let start = Instant::now();
        tracing::info!("Processing hierarchical BOM ...");
        let hierarchical = walker.walk_hierarchy(parent_id, document, ctx);
        tracing::info!("Processed {} hierarchical components", hierarchical);
        tracing::debug!("--- {:?} ---", start.elapsed());

        let start = Instant::now();
        tracing::info!("Processing other components ...");
        let remaining = walker.walk_remaining(parent_id, document, ctx);
        let mut others = remaining.len();

        if self.config.recursive {
            for (spdx_id, entry) in remaining {
                if !known_projects.contains(&entry.component_name) {
                    continue;
                }
                let Some(version) = entry.version_name() else {
                    continue;
                };
                let nested = match self.server.resolve(&entry.component_name, version) {
                    Ok(nested) => nested,
                    Err(e) => {
                        tracing::warn!("Cannot resolve sub-project {}: {}", entry.label(), e);
                        continue;
                    }
                };
                tracing::info!("Processing project within project '{}'", entry.label());
                match self.process_project(&nested, &spdx_id, known_projects, document, ctx) {
                    Ok(count) => others += count,
                    Err(e) => tracing::warn!("Skipping sub-project {}: {}", entry.label(), e),
                }
            }
        }
        tracing::info!("Processed {} other components", others);
        tracing::debug!("--- {:?} ---", start.elapsed());

        Ok(hierarchical + others)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FetchKind, SnapshotSource};

    /// app 1.0 -> lib 2.0 -> app 1.0 (cycle); `shared` sits in both BOMs
    /// and in lib's tree.
    const NESTED: &str = r#"{
        "projects": [
            {
                "name": "app",
                "_meta": {"href": "https://hub/p/app"},
                "versions": [{
                    "versionName": "1.0",
                    "_meta": {"href": "https://hub/p/app/v/1"},
                    "components": [
                        {"componentName": "lib", "componentVersionName": "2.0", "componentVersion": "cv-lib",
                         "componentType": "SUB_PROJECT", "matchTypes": ["MANUAL_BOM_COMPONENT"]},
                        SHARED
                    ]
                }]
            },
            {
                "name": "lib",
                "versions": [{
                    "versionName": "2.0",
                    "_meta": {"href": "https://hub/p/lib/v/2"},
                    "components": [
                        {"componentName": "app", "componentVersionName": "1.0", "componentVersion": "cv-app",
                         "componentType": "SUB_PROJECT", "matchTypes": ["MANUAL_BOM_COMPONENT"]},
                        {"componentName": "zlib", "componentVersionName": "1.2.13", "componentVersion": "cv-zlib",
                         "matchTypes": ["FILE_EXACT"]},
                        SHARED
                    ],
                    "hierarchy": [SHARED]
                }]
            }
        ],
        "copyrights": {"cr-shared": [{"active": true, "updatedCopyright": "Copyright (c) Shared Authors"}]},
        "comments": {"cm-shared": [{"comment": "reviewed", "user": {"email": "legal@acme.example"}}]},
        "matchedFiles": {"mf-shared": [{"filePath": {"path": "vendor/shared-3.0.tar.gz"}}]},
        "customFields": {"cf-shared": [{"label": "PackageSupplier", "values": ["Organization: Shared Inc"]}]},
        "componentDetails": {"https://hub/c/shared": {"url": "https://shared.example"}},
        "licenseTexts": {"shared-1": "Shared license text"}
    }"#;

    const SHARED: &str = r#"{
        "componentName": "shared", "componentVersionName": "3.0",
        "component": "https://hub/c/shared", "componentVersion": "cv-shared",
        "matchTypes": ["FILE_DEPENDENCY_DIRECT"],
        "origins": [{
            "externalNamespace": "npmjs", "externalId": "shared/3.0",
            "_meta": {"links": [{"rel": "component-origin-copyrights", "href": "cr-shared"}]}
        }],
        "licenses": [{"licenseDisplay": "Shared License", "license": "https://hub/api/licenses/shared-1"}],
        "_meta": {"links": [
            {"rel": "comments", "href": "cm-shared"},
            {"rel": "matched-files", "href": "mf-shared"},
            {"rel": "custom-fields", "href": "cf-shared"}
        ]}
    }"#;

    fn nested_source() -> SnapshotSource {
        SnapshotSource::from_json(&NESTED.replace("SHARED", SHARED)).unwrap()
    }

    #[test]
    fn test_nested_projects_with_cycle() {
        let source = nested_source();
        let config = ExportConfig {
            recursive: true,
            ..Default::default()
        };
        let outcome = Exporter::new(&source, &config).export("app", "1.0").unwrap();
        let doc = &outcome.document;

        let lib = crate::model::package_id("lib", "2.0");
        let zlib = crate::model::package_id("zlib", "1.2.13");
        assert!(doc.has_package(&lib));
        assert!(doc.has_package(&zlib));
        assert!(
            doc.relationships()
                .iter()
                .any(|r| r.spdx_element_id == lib && r.related_spdx_element == zlib)
        );
        // app is entered once; its second appearance inside lib is only linked
        assert_eq!(source.fetch_count_for(FetchKind::Bom, "https://hub/p/app/v/1"), 1);
        // app: lib, shared; lib: shared (tree), app, zlib
        assert_eq!(outcome.components_processed, 5);
    }

    #[test]
    fn test_shared_component_enriched_once_across_projects() {
        let source = nested_source();
        let config = ExportConfig {
            recursive: true,
            ..Default::default()
        };
        let outcome = Exporter::new(&source, &config).export("app", "1.0").unwrap();
        let doc = &outcome.document;

        for kind in [
            FetchKind::Copyrights,
            FetchKind::Comments,
            FetchKind::MatchedFiles,
            FetchKind::CustomFields,
            FetchKind::ComponentDetails,
            FetchKind::LicenseText,
        ] {
            assert_eq!(source.max_fetches_per_key(kind), 1, "{kind} fetched more than once");
        }
        assert_eq!(source.fetch_count_for(FetchKind::LicenseText, "shared-1"), 1);
        // lib, shared in app's pass; app, zlib in lib's pass
        assert_eq!(outcome.stats.components_enriched, 4);

        let shared = crate::model::package_id("shared", "3.0");
        let packages: Vec<_> = doc.packages().iter().filter(|p| p.spdx_id == shared).collect();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].package_supplier.as_deref(), Some("Organization: Shared Inc"));
        assert_eq!(packages[0].package_homepage.as_deref(), Some("https://shared.example"));
        assert_eq!(doc.extracted_licenses().len(), 1);

        let lib = crate::model::package_id("lib", "2.0");
        assert!(
            doc.relationships()
                .iter()
                .any(|r| r.spdx_element_id == lib && r.related_spdx_element == shared)
        );
    }

    #[test]
    fn test_not_recursive_stays_flat() {
        let source = nested_source();
        let config = ExportConfig::default();
        let outcome = Exporter::new(&source, &config).export("app", "1.0").unwrap();

        // top, lib, shared
        assert_eq!(outcome.document.packages().len(), 3);
        assert_eq!(source.fetch_count(FetchKind::Bom), 1);
    }

    #[test]
    fn test_unknown_version_is_not_found() {
        let source = nested_source();
        let config = ExportConfig::default();
        let err = Exporter::new(&source, &config)
            .export("app", "9.9")
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
