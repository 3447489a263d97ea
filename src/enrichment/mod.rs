//! Concurrent metadata enrichment.
//!
//! For every distinct component version in a BOM, the per-component lookups
//! run against the [`BomSource`]: copyrights, review comments, matched files,
//! custom license texts, the component record (supplier and homepage) and the
//! BOM's custom fields. Components are spread over a bounded worker pool; the
//! lookups of one component run independently of each other. The pass returns
//! only after every component is done, so traversal makes no lookups of its
//! own apart from the optional download locator.
//!
//! Failed lookups never abort the pass. The affected field keeps its fallback
//! value (NOASSERTION, or an empty annotation list) and the failure is
//! recorded in [`EnrichmentStats`].
//!
//! ```no_run
//! use bd_spdx_export::config::EnrichmentConfig;
//! use bd_spdx_export::enrichment::{LicenseTextCache, MetadataEnricher};
//! use bd_spdx_export::source::{BomSource, ProjectResolver, SnapshotSource};
//!
//! let source = SnapshotSource::from_path("snapshot.json".as_ref()).unwrap();
//! let version = source.resolve("acme", "1.0").unwrap();
//! let snapshot = source.snapshot(&version).unwrap();
//!
//! let enricher = MetadataEnricher::new(&source, EnrichmentConfig::default());
//! let outcome = enricher
//!     .enrich(&snapshot.distinct_components(), &LicenseTextCache::new())
//!     .unwrap();
//! outcome.stats.log_summary();
//! ```

mod cache;
mod comments;
mod copyrights;
mod download;
mod files;
mod licenses;
mod stats;

pub use cache::{CachedText, LicenseTextCache};
pub use comments::{annotation_timestamp, comment_annotations};
pub use copyrights::aggregate_copyrights;
pub use download::{DownloadLocator, NoOpLocator};
pub use files::select_package_file;
pub use licenses::{
    LicenseResolution, compose_expression, current_spdx_id, effective_licenses, resolve_licenses,
};
pub use stats::{EnrichedField, EnrichmentError, EnrichmentStats};

use crate::config::EnrichmentConfig;
use crate::error::{ExportError, Result};
use crate::model::{ComponentDetails, ComponentVersion, NOASSERTION};
use crate::source::BomSource;
use crate::spdx::{Annotation, ExtractedLicense};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Custom field label that overrides the package supplier.
pub const SUPPLIER_FIELD: &str = "PackageSupplier";

/// Metadata gathered for one component version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMetadata {
    /// Newline-joined copyright statements, or NOASSERTION
    pub copyright_text: String,
    /// SPDX license expression, or NOASSERTION
    pub license_expression: String,
    pub annotations: Vec<Annotation>,
    /// Representative package archive, or NOASSERTION
    pub package_file_name: String,
    /// Custom licenses referenced by the expression
    pub extracted_licenses: Vec<ExtractedLicense>,
    /// Supplier named by the BOM's custom field
    pub bom_supplier: Option<String>,
    /// Supplier recorded on the component itself
    pub component_supplier: Option<String>,
    pub homepage: Option<String>,
}

impl Default for EnrichedMetadata {
    fn default() -> Self {
        Self {
            copyright_text: NOASSERTION.to_string(),
            license_expression: NOASSERTION.to_string(),
            annotations: Vec::new(),
            package_file_name: NOASSERTION.to_string(),
            extracted_licenses: Vec::new(),
            bom_supplier: None,
            component_supplier: None,
            homepage: None,
        }
    }
}

/// Result of one enrichment pass.
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    /// Metadata keyed by component-version id
    pub metadata: HashMap<String, EnrichedMetadata>,
    pub stats: EnrichmentStats,
}

/// One field's value plus the bookkeeping of how it was obtained.
struct FieldResult<T> {
    value: T,
    lookups: usize,
    error: Option<EnrichmentError>,
}

impl<T> FieldResult<T> {
    const fn skipped(value: T) -> Self {
        Self {
            value,
            lookups: 0,
            error: None,
        }
    }

    const fn fetched(value: T) -> Self {
        Self {
            value,
            lookups: 1,
            error: None,
        }
    }

    const fn degraded(value: T, error: EnrichmentError) -> Self {
        Self {
            value,
            lookups: 1,
            error: Some(error),
        }
    }
}

/// Fetches per-component metadata concurrently.
pub struct MetadataEnricher<'a, S: BomSource + ?Sized> {
    source: &'a S,
    config: EnrichmentConfig,
}

impl<'a, S: BomSource + ?Sized> MetadataEnricher<'a, S> {
    pub fn new(source: &'a S, config: EnrichmentConfig) -> Self {
        Self { source, config }
    }

    /// Enrich each distinct component version exactly once.
    ///
    /// Components without a version id, and repeats of an id already in the
    /// list, are skipped.
    pub fn enrich(
        &self,
        components: &[&ComponentVersion],
        licenses: &LicenseTextCache,
    ) -> Result<EnrichmentOutcome> {
        let start = Instant::now();

        let mut seen = HashSet::new();
        let distinct: Vec<(&str, &ComponentVersion)> = components
            .iter()
            .filter_map(|c| c.version_id().map(|id| (id, *c)))
            .filter(|(id, _)| seen.insert(*id))
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_concurrent.max(1))
            .thread_name(|i| format!("enrich-{i}"))
            .build()
            .map_err(|e| ExportError::config(format!("cannot start enrichment pool: {e}")))?;

        tracing::debug!(
            "Enriching {} components with {} workers",
            distinct.len(),
            self.config.max_concurrent
        );

        let results: Vec<(String, EnrichedMetadata, EnrichmentStats)> = pool.install(|| {
            distinct
                .par_iter()
                .map(|(id, comp)| {
                    let (metadata, stats) = self.enrich_one(comp, licenses);
                    ((*id).to_string(), metadata, stats)
                })
                .collect()
        });

        let mut outcome = EnrichmentOutcome::default();
        for (id, metadata, stats) in results {
            outcome.stats.merge(&stats);
            outcome.metadata.insert(id, metadata);
        }
        outcome.stats.components_enriched = outcome.metadata.len();
        outcome.stats.duration = start.elapsed();
        Ok(outcome)
    }

    fn enrich_one(
        &self,
        comp: &ComponentVersion,
        licenses: &LicenseTextCache,
    ) -> (EnrichedMetadata, EnrichmentStats) {
        let (((copyrights, comments), (package_file, license)), (details, bom_supplier)) =
            rayon::join(
                || {
                    rayon::join(
                        || rayon::join(|| self.copyrights(comp), || self.comments(comp)),
                        || rayon::join(|| self.package_file(comp), || self.licenses(comp, licenses)),
                    )
                },
                || rayon::join(|| self.details(comp), || self.bom_supplier(comp)),
            );

        let mut stats = EnrichmentStats::new();
        stats.lookups = copyrights.lookups
            + comments.lookups
            + package_file.lookups
            + details.lookups
            + bom_supplier.lookups;
        for error in [
            copyrights.error,
            comments.error,
            package_file.error,
            details.error,
            bom_supplier.error,
        ]
        .into_iter()
        .flatten()
        {
            stats.record(error);
        }

        let (resolution, license_errors) = license;
        stats.lookups += resolution.texts_fetched;
        stats.license_texts_fetched = resolution.texts_fetched;
        stats.license_cache_hits = resolution.cache_hits;
        for error in license_errors {
            stats.record(error);
        }

        let metadata = EnrichedMetadata {
            copyright_text: copyrights.value,
            license_expression: resolution.expression,
            annotations: comments.value,
            package_file_name: package_file.value,
            extracted_licenses: resolution.extracted,
            bom_supplier: bom_supplier.value,
            component_supplier: details.value.as_ref().and_then(|d| d.supplier.clone()),
            homepage: details.value.and_then(|d| d.url),
        };
        (metadata, stats)
    }

    fn copyrights(&self, comp: &ComponentVersion) -> FieldResult<String> {
        let origin = comp.first_origin().filter(|o| o.copyrights_url().is_some());
        let Some(origin) = origin.filter(|_| self.config.copyrights) else {
            return FieldResult::skipped(NOASSERTION.to_string());
        };
        match self.source.copyrights(origin) {
            Ok(entries) => FieldResult::fetched(aggregate_copyrights(&entries)),
            Err(e) => FieldResult::degraded(
                NOASSERTION.to_string(),
                EnrichmentError::degraded(comp.label(), EnrichedField::Copyrights, e),
            ),
        }
    }

    fn comments(&self, comp: &ComponentVersion) -> FieldResult<Vec<Annotation>> {
        if !self.config.comments || comp.link("comments").is_none() {
            return FieldResult::skipped(Vec::new());
        }
        match self.source.comments(comp) {
            Ok(comments) => {
                FieldResult::fetched(comment_annotations(&comments, &annotation_timestamp()))
            }
            Err(e) => FieldResult::degraded(
                Vec::new(),
                EnrichmentError::degraded(comp.label(), EnrichedField::Comments, e),
            ),
        }
    }

    fn package_file(&self, comp: &ComponentVersion) -> FieldResult<String> {
        if !self.config.files || comp.link("matched-files").is_none() {
            return FieldResult::skipped(NOASSERTION.to_string());
        }
        match self.source.matched_files(comp) {
            Ok(files) => FieldResult::fetched(
                select_package_file(&files).unwrap_or_else(|| NOASSERTION.to_string()),
            ),
            Err(e) => FieldResult::degraded(
                NOASSERTION.to_string(),
                EnrichmentError::degraded(comp.label(), EnrichedField::PackageFile, e),
            ),
        }
    }

    fn details(&self, comp: &ComponentVersion) -> FieldResult<Option<ComponentDetails>> {
        if comp.component.is_none() {
            return FieldResult::skipped(None);
        }
        match self.source.component_details(comp) {
            Ok(details) => FieldResult::fetched(Some(details)),
            Err(e) => FieldResult::degraded(
                None,
                EnrichmentError::degraded(comp.label(), EnrichedField::Homepage, e),
            ),
        }
    }

    fn bom_supplier(&self, comp: &ComponentVersion) -> FieldResult<Option<String>> {
        if comp.link("custom-fields").is_none() {
            return FieldResult::skipped(None);
        }
        match self.source.custom_fields(comp) {
            Ok(fields) => FieldResult::fetched(
                fields
                    .into_iter()
                    .find(|f| f.label == SUPPLIER_FIELD)
                    .and_then(|f| f.values.into_iter().next()),
            ),
            Err(e) => FieldResult::degraded(
                None,
                EnrichmentError::degraded(comp.label(), EnrichedField::Supplier, e),
            ),
        }
    }

    fn licenses(
        &self,
        comp: &ComponentVersion,
        cache: &LicenseTextCache,
    ) -> (LicenseResolution, Vec<EnrichmentError>) {
        let mut errors = Vec::new();
        let resolution = resolve_licenses(self.source, &comp.licenses, cache, &mut errors);
        (resolution, errors)
    }
}
