//! Package entries for component versions.

use super::provenance::{SupplierSource, provenance};
use crate::enrichment::{
    DownloadLocator, EnrichedField, EnrichedMetadata, EnrichmentError, EnrichmentStats,
};
use crate::model::{ComponentVersion, NOASSERTION, strip_quotes};
use crate::purl;
use crate::spdx::{ExternalRef, SpdxPackage};
use regex::Regex;
use std::sync::LazyLock;

const ORGANIZATION_PREFIX: &str = "Organization: ";

static DESCRIPTION_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z.()\d\s\-:]").expect("static regex"));

/// Reduce a description to letters, digits, whitespace and `.()-:`.
#[must_use]
pub fn clean_description(description: &str) -> String {
    DESCRIPTION_STRIP.replace_all(description, "").into_owned()
}

/// A resolved supplier attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    pub name: String,
    pub source: SupplierSource,
}

impl Supplier {
    /// Locator standing in for a purl when the supplier was given explicitly.
    #[must_use]
    pub fn locator(&self, component: &str, version: &str) -> Option<String> {
        self.source.is_explicit().then(|| {
            format!(
                "supplier:{}/{component}/{version}",
                self.name.replace(ORGANIZATION_PREFIX, "")
            )
        })
    }
}

/// Builds [`SpdxPackage`] entries from BOM records and their enriched
/// metadata. The download locator is the only lookup made here.
pub struct PackageFactory<'a> {
    locator: &'a dyn DownloadLocator,
    download_locations: bool,
}

impl<'a> PackageFactory<'a> {
    pub fn new(locator: &'a dyn DownloadLocator, download_locations: bool) -> Self {
        Self {
            locator,
            download_locations,
        }
    }

    /// Build the package for `listed`, the BOM entry as it appears in the
    /// tree, using `entry` (its flat BOM record) for metadata.
    pub fn build(
        &self,
        spdx_id: &str,
        listed: &ComponentVersion,
        entry: &ComponentVersion,
        metadata: &EnrichedMetadata,
        stats: &mut EnrichmentStats,
    ) -> SpdxPackage {
        let name = listed.component_name.as_str();
        let version = listed.version_name().unwrap_or_default();

        let supplier = supplier(entry, metadata);

        let origin = entry.first_origin();
        let mut locator = origin.and_then(|o| match (&o.ecosystem, &o.external_id) {
            (Some(ecosystem), Some(external_id)) => purl::normalize(ecosystem, external_id),
            _ => None,
        });
        if let Some(sentinel) = supplier.locator(name, version) {
            locator = Some(sentinel);
        }

        let openhub = entry.link("openhub");
        let external_refs = locator
            .map(|locator| {
                let mut refs = vec![ExternalRef::purl(strip_quotes(&locator))];
                if let Some(component) = &entry.component {
                    refs.push(ExternalRef::other("BlackDuckHub-Component", component.as_str()));
                }
                if let Some(version_id) = entry.version_id() {
                    refs.push(ExternalRef::other("BlackDuckHub-Component-Version", version_id));
                }
                if let Some(openhub) = openhub {
                    refs.push(ExternalRef::other("OpenHub", openhub));
                }
                refs
            })
            .unwrap_or_default();

        let homepage = metadata
            .homepage
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(NOASSERTION);

        SpdxPackage {
            spdx_id: strip_quotes(spdx_id),
            name: strip_quotes(name),
            version_info: Some(strip_quotes(version)),
            package_file_name: Some(strip_quotes(&metadata.package_file_name)),
            description: Some(
                entry
                    .description
                    .as_deref()
                    .map_or_else(|| NOASSERTION.to_string(), clean_description),
            ),
            download_location: strip_quotes(&self.download_location(entry, openhub, stats)),
            package_homepage: Some(strip_quotes(homepage)),
            license_concluded: strip_quotes(&metadata.license_expression),
            license_declared: strip_quotes(&metadata.license_expression),
            package_supplier: Some(strip_quotes(&supplier.name)),
            files_analyzed: false,
            package_comment: Some(strip_quotes(&provenance(
                &entry.component_type,
                entry.match_types.first(),
                supplier.source,
            ))),
            copyright_text: strip_quotes(&metadata.copyright_text),
            annotations: metadata.annotations.clone(),
            external_refs,
        }
    }

    fn download_location(
        &self,
        entry: &ComponentVersion,
        openhub: Option<&str>,
        stats: &mut EnrichmentStats,
    ) -> String {
        let Some(catalog_url) = openhub.filter(|_| self.download_locations) else {
            return NOASSERTION.to_string();
        };
        stats.lookups += 1;
        self.locator.locate(catalog_url).unwrap_or_else(|e| {
            tracing::debug!("{} locator failed for {}", self.locator.name(), catalog_url);
            stats.record(EnrichmentError::degraded(
                entry.label(),
                EnrichedField::DownloadLocation,
                e,
            ));
            NOASSERTION.to_string()
        })
    }
}

/// Supplier by priority: BOM custom field, component record, origin
/// ecosystem, then NOASSERTION.
fn supplier(entry: &ComponentVersion, metadata: &EnrichedMetadata) -> Supplier {
    if let Some(name) = metadata.bom_supplier.clone().filter(|n| !n.is_empty()) {
        return Supplier {
            name,
            source: SupplierSource::BomField,
        };
    }
    if let Some(name) = metadata.component_supplier.clone().filter(|n| !n.is_empty()) {
        return Supplier {
            name,
            source: SupplierSource::Component,
        };
    }
    if let Some(ecosystem) = entry.first_origin().and_then(|o| o.ecosystem.as_deref()) {
        return Supplier {
            name: format!("{ORGANIZATION_PREFIX}{ecosystem}"),
            source: SupplierSource::Ecosystem,
        };
    }
    Supplier {
        name: NOASSERTION.to_string(),
        source: SupplierSource::Unknown,
    }
}
