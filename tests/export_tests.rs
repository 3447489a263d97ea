//! End-to-end export tests.
//!
//! These tests run the full resolve → enrich → walk → assemble pipeline
//! against a snapshot fixture and check the resulting SPDX document.

use bd_spdx_export::cli::run_export;
use bd_spdx_export::config::{ExportConfig, ExportPreset};
use bd_spdx_export::model::{NOASSERTION, package_id};
use bd_spdx_export::pipeline::{ExportOutcome, Exporter, exit_codes};
use bd_spdx_export::source::{FetchKind, SnapshotSource};
use bd_spdx_export::spdx::{RelationshipType, SpdxPackage};
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn acme_source() -> SnapshotSource {
    SnapshotSource::from_path(&fixture_path("acme_snapshot.json"))
        .expect("fixture snapshot should parse")
}

fn export(source: &SnapshotSource, config: &ExportConfig) -> ExportOutcome {
    Exporter::new(source, config)
        .export("acme", "1.0")
        .expect("export should succeed")
}

fn package<'a>(outcome: &'a ExportOutcome, name: &str, version: &str) -> &'a SpdxPackage {
    let id = package_id(name, version);
    outcome
        .document
        .package(&id)
        .unwrap_or_else(|| panic!("package {id} missing"))
}

fn has_edge(outcome: &ExportOutcome, from: &str, kind: RelationshipType, to: &str) -> bool {
    outcome.document.relationships().iter().any(|r| {
        r.spdx_element_id == from && r.relationship_type == kind && r.related_spdx_element == to
    })
}

// ============================================================================
// Document Assembly
// ============================================================================

mod document {
    use super::*;

    #[test]
    fn top_level_package_and_describes() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());
        let doc = &outcome.document;
        let top = package_id("acme", "1.0");

        assert_eq!(doc.top_package_id(), top);
        assert_eq!(doc.name(), "acme/1.0");
        assert_eq!(doc.creation_info().created, "2023-05-06T07:08:09Z");
        assert_eq!(
            doc.creation_info().comment.as_deref(),
            Some("Acmes main application")
        );
        assert_eq!(
            doc.namespace(),
            "https://hub.example.com/api/projects/p-acme/versions/v-1"
        );
        assert!(has_edge(
            &outcome,
            "SPDXRef-DOCUMENT",
            RelationshipType::Describes,
            &top
        ));

        let top_pkg = doc.package(&top).unwrap();
        assert_eq!(top_pkg.license_declared, "Apache License 2.0");
        assert_eq!(top_pkg.license_concluded, NOASSERTION);
    }

    #[test]
    fn each_component_version_emitted_once() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        // top + left-pad + zlib + openssl + foo_bar@baz
        assert_eq!(outcome.document.packages().len(), 5);
        let zlib = package_id("zlib", "1.2.13");
        assert_eq!(
            outcome
                .document
                .packages()
                .iter()
                .filter(|p| p.spdx_id == zlib)
                .count(),
            1
        );
    }

    #[test]
    fn unversioned_entries_are_skipped() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        for pkg in outcome.document.packages() {
            assert_ne!(pkg.name, "vendored-blob");
            assert_ne!(pkg.name, "unreleased-helper");
        }
    }

    #[test]
    fn identifiers_are_sanitized() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        let foo = package(&outcome, "foo_bar@baz", "2.0 (beta)");
        assert_eq!(foo.spdx_id, "SPDXRef-Package-foouubar-at-baz-20beta");
        assert_eq!(foo.name, "foo_bar@baz");
        assert_eq!(foo.version_info.as_deref(), Some("2.0 (beta)"));
    }

    #[test]
    fn empty_bom_has_only_top_level_package() {
        let source = acme_source();
        let outcome = Exporter::new(&source, &ExportConfig::default())
            .export("empty", "0.1")
            .unwrap();
        let doc = &outcome.document;

        assert_eq!(doc.packages().len(), 1);
        assert_eq!(doc.relationships().len(), 1);
        assert_eq!(
            doc.relationships()[0].relationship_type,
            RelationshipType::Describes
        );
        assert!(doc.extracted_licenses().is_empty());
        assert_eq!(outcome.components_processed, 0);
    }

    #[test]
    fn json_output_is_deterministic() {
        // annotations are stamped with the wall clock
        let mut config = ExportConfig::default();
        config.enrichment.comments = false;

        let first = export(&acme_source(), &config)
            .document
            .to_json_string()
            .unwrap();
        let second = export(&acme_source(), &config)
            .document
            .to_json_string()
            .unwrap();
        assert_eq!(first, second);

        let value: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(value["spdxVersion"], "SPDX-2.2");
        assert_eq!(value["dataLicense"], "CC0-1.0");
        assert_eq!(value["SPDXID"], "SPDXRef-DOCUMENT");
        assert!(first.contains("\n    \"SPDXID\""));
    }
}

// ============================================================================
// Relationships
// ============================================================================

mod relationships {
    use super::*;

    #[test]
    fn one_relationship_per_edge() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        // DESCRIBES + 4 tree edges + 1 flat-only entry
        assert_eq!(outcome.document.relationships().len(), 6);
    }

    #[test]
    fn edges_classified_by_usage_and_match_type() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        let top = package_id("acme", "1.0");
        let left_pad = package_id("left-pad", "1.3.0");
        let openssl = package_id("openssl", "1.1.1k");
        let zlib = package_id("zlib", "1.2.13");
        let foo = package_id("foo_bar@baz", "2.0 (beta)");

        assert!(has_edge(&outcome, &top, RelationshipType::DynamicLink, &left_pad));
        assert!(has_edge(&outcome, &left_pad, RelationshipType::DependsOn, &zlib));
        assert!(has_edge(&outcome, &top, RelationshipType::DependsOn, &openssl));
        assert!(has_edge(&outcome, &openssl, RelationshipType::DependsOn, &zlib));
        assert!(has_edge(&outcome, &top, RelationshipType::Contains, &foo));
    }
}

// ============================================================================
// Package Metadata
// ============================================================================

mod metadata {
    use super::*;

    #[test]
    fn purl_from_origin() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        let zlib = package(&outcome, "zlib", "1.2.13");
        assert_eq!(
            zlib.external_refs[0].reference_locator,
            "pkg:deb/debian/zlib@1.2.13-1?arch=amd64"
        );
        assert_eq!(
            zlib.package_supplier.as_deref(),
            Some("Organization: debian")
        );
    }

    #[test]
    fn explicit_supplier_replaces_purl() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        let openssl = package(&outcome, "openssl", "1.1.1k");
        assert_eq!(
            openssl.package_supplier.as_deref(),
            Some("Organization: Red Hat")
        );
        assert_eq!(
            openssl.external_refs[0].reference_locator,
            "supplier:Red Hat/openssl/1.1.1k"
        );

        let left_pad = package(&outcome, "left-pad", "1.3.0");
        assert_eq!(left_pad.package_supplier.as_deref(), Some("Cameron Westland"));
        assert_eq!(
            left_pad.package_homepage.as_deref(),
            Some("https://github.com/stevemao/left-pad")
        );
    }

    #[test]
    fn enriched_fields() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        let left_pad = package(&outcome, "left-pad", "1.3.0");
        assert_eq!(left_pad.license_concluded, "(MIT AND GPL-2.0-only)");
        assert_eq!(left_pad.license_declared, "(MIT AND GPL-2.0-only)");
        assert_eq!(left_pad.copyright_text, "Copyright (c) 2016 Cameron Westland");
        assert_eq!(
            left_pad.package_file_name.as_deref(),
            Some("vendor/left-pad-1.3.0.tar.gz")
        );
        assert_eq!(left_pad.description.as_deref(), Some("String padding utility"));
        assert_eq!(left_pad.annotations.len(), 1);
        assert_eq!(left_pad.annotations[0].comment, "Approved by legal");

        let zlib = package(&outcome, "zlib", "1.2.13");
        assert_eq!(zlib.license_concluded, "Zlib");
        assert_eq!(zlib.copyright_text, NOASSERTION);
        assert_eq!(zlib.package_file_name.as_deref(), Some(NOASSERTION));
    }

    #[test]
    fn custom_license_extracted_once() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        let foo = package(&outcome, "foo_bar@baz", "2.0 (beta)");
        assert_eq!(foo.license_concluded, "LicenseRef-AcmeProprietary");

        let extracted = outcome.document.extracted_licenses();
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].license_id, "LicenseRef-AcmeProprietary");
        assert_eq!(
            extracted[0].extracted_text,
            "Copyright Acme Corp. All rights reserved."
        );
    }

    #[test]
    fn provenance_comment_names_discovery_and_supplier() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        let foo = package(&outcome, "foo_bar@baz", "2.0 (beta)");
        let comment = foo.package_comment.as_deref().unwrap();
        assert!(comment.starts_with("This is a custom component"));
        assert!(comment.contains("as a direct file match"));
        assert!(comment.contains("PackageSupplier was not populated"));
    }
}

// ============================================================================
// Lookup Counting
// ============================================================================

mod lookups {
    use super::*;

    #[test]
    fn each_resource_fetched_at_most_once() {
        let source = acme_source();
        let outcome = export(&source, &ExportConfig::default());

        for kind in [
            FetchKind::Bom,
            FetchKind::Copyrights,
            FetchKind::Comments,
            FetchKind::MatchedFiles,
            FetchKind::CustomFields,
            FetchKind::ComponentDetails,
            FetchKind::LicenseText,
        ] {
            assert!(
                source.max_fetches_per_key(kind) <= 1,
                "{kind} fetched more than once for one key"
            );
        }
        assert_eq!(source.fetch_count_for(FetchKind::LicenseText, "acme-1"), 1);
        assert_eq!(outcome.stats.components_enriched, 4);
        assert!(!outcome.stats.has_errors());
    }

    #[test]
    fn basic_preset_skips_optional_lookups() {
        let source = acme_source();
        let config = ExportConfig::from_preset(ExportPreset::Basic);
        let outcome = export(&source, &config);

        assert_eq!(source.fetch_count(FetchKind::Copyrights), 0);
        assert_eq!(source.fetch_count(FetchKind::MatchedFiles), 0);
        assert_eq!(source.fetch_count(FetchKind::Comments), 1);

        let left_pad = package(&outcome, "left-pad", "1.3.0");
        assert_eq!(left_pad.copyright_text, NOASSERTION);
        assert_eq!(left_pad.license_concluded, "(MIT AND GPL-2.0-only)");
    }
}

// ============================================================================
// Command Handler
// ============================================================================

mod command {
    use super::*;

    fn snapshot_config(output: &Path) -> ExportConfig {
        let mut config = ExportConfig::default();
        config.snapshot = Some(fixture_path("acme_snapshot.json"));
        config.output.file = Some(output.to_path_buf());
        config
    }

    #[test]
    fn writes_document_and_backs_up_previous() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("acme.json");
        std::fs::write(&out, "old").unwrap();

        let config = snapshot_config(&out);
        assert_eq!(run_export(&config, "acme", "1.0").unwrap(), exit_codes::SUCCESS);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["packages"].as_array().unwrap().len(), 5);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("acme.000")).unwrap(),
            "old"
        );
    }

    #[test]
    fn unknown_version_exits_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("acme.json");

        let config = snapshot_config(&out);
        assert_eq!(
            run_export(&config, "acme", "9.9").unwrap(),
            exit_codes::NOT_FOUND
        );
        assert!(!out.exists());
    }

    #[test]
    fn unwritable_output_exits_output_failed() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should go
        let out = dir.path().join("acme.json");
        std::fs::create_dir(&out).unwrap();

        let config = snapshot_config(&out);
        assert_eq!(
            run_export(&config, "acme", "1.0").unwrap(),
            exit_codes::OUTPUT_FAILED
        );
    }
}
