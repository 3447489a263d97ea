//! BOM graph traversal.
//!
//! [`GraphWalker`] turns one project version's BOM into packages and
//! relationships on an [`SpdxDocument`]. All run-wide state lives in an
//! [`ExportContext`] that the caller threads through every walk, so nested
//! sub-project walks share package deduplication, enrichment results and
//! the custom license cache with their parent.

mod classify;
mod package;
mod provenance;

pub use classify::{classify, usage_relationship};
pub use package::{PackageFactory, Supplier, clean_description};
pub use provenance::{SupplierSource, provenance};

use crate::enrichment::{EnrichedMetadata, EnrichmentOutcome, EnrichmentStats, LicenseTextCache};
use crate::model::{BomNode, BomSnapshot, ComponentVersion, package_id};
use crate::spdx::SpdxDocument;
use std::collections::{HashMap, HashSet};

// ============================================================================
// Export context
// ============================================================================

/// State shared by every walk in one export run.
#[derive(Debug, Default)]
pub struct ExportContext {
    /// Package ids already emitted
    emitted: HashSet<String>,
    /// Component-version ids linked from their parent
    processed: HashSet<String>,
    /// Project versions entered so far
    projects: HashSet<String>,
    /// Enrichment results by component-version id
    metadata: HashMap<String, EnrichedMetadata>,
    /// Custom license texts, shared across nested projects
    pub licenses: LicenseTextCache,
    pub stats: EnrichmentStats,
}

impl ExportContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a package id; false if it was already emitted.
    pub fn mark_emitted(&mut self, spdx_id: &str) -> bool {
        self.emitted.insert(spdx_id.to_string())
    }

    pub fn mark_processed(&mut self, version_id: &str) {
        self.processed.insert(version_id.to_string());
    }

    #[must_use]
    pub fn is_processed(&self, version_id: &str) -> bool {
        self.processed.contains(version_id)
    }

    /// Record entry into a project version; false if it was entered before.
    pub fn enter_project(&mut self, key: &str) -> bool {
        self.projects.insert(key.to_string())
    }

    /// Components that still need enrichment.
    #[must_use]
    pub fn pending_enrichment<'b>(&self, components: &[&'b ComponentVersion]) -> Vec<&'b ComponentVersion> {
        components
            .iter()
            .filter(|c| c.version_id().is_some_and(|id| !self.metadata.contains_key(id)))
            .copied()
            .collect()
    }

    /// Keep the results of an enrichment pass.
    pub fn absorb(&mut self, outcome: EnrichmentOutcome) {
        self.stats.merge(&outcome.stats);
        self.metadata.extend(outcome.metadata);
    }

    #[must_use]
    pub fn metadata(&self, version_id: &str) -> Option<&EnrichedMetadata> {
        self.metadata.get(version_id)
    }

    /// Number of distinct packages emitted so far.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.emitted.len()
    }
}

// ============================================================================
// Walker
// ============================================================================

/// Walks one project version's BOM.
pub struct GraphWalker<'a> {
    snapshot: &'a BomSnapshot,
    packages: PackageFactory<'a>,
}

impl<'a> GraphWalker<'a> {
    pub fn new(snapshot: &'a BomSnapshot, packages: PackageFactory<'a>) -> Self {
        Self { snapshot, packages }
    }

    /// Walk the hierarchical BOM below `parent_id`.
    ///
    /// Every tree position yields one relationship, whether or not its
    /// package was emitted earlier. Returns the number of positions visited.
    pub fn walk_hierarchy(
        &self,
        parent_id: &str,
        doc: &mut SpdxDocument,
        ctx: &mut ExportContext,
    ) -> usize {
        self.snapshot
            .hierarchy
            .iter()
            .map(|root| self.walk_node(parent_id, root, doc, ctx, 0))
            .sum()
    }

    fn walk_node(
        &self,
        parent_id: &str,
        node: &BomNode,
        doc: &mut SpdxDocument,
        ctx: &mut ExportContext,
        depth: usize,
    ) -> usize {
        let comp = &node.component;
        if comp.version_name().is_none() {
            tracing::info!(
                "{:indent$}{}/? (no version, skipping)",
                "",
                comp.component_name,
                indent = depth * 4
            );
            return 0;
        }
        tracing::debug!("{:indent$}{}", "", comp.label(), indent = depth * 4);

        let spdx_id = self.emit_package(comp, doc, ctx);
        doc.add_relationship(parent_id, classify(&comp.match_types, &comp.usages), &spdx_id);
        if let Some(version_id) = comp.version_id() {
            ctx.mark_processed(version_id);
        }

        1 + node
            .children
            .iter()
            .map(|child| self.walk_node(&spdx_id, child, doc, ctx, depth + 1))
            .sum::<usize>()
    }

    /// Link every flat BOM entry the hierarchy walk did not reach.
    ///
    /// Returns the linked entries with their package ids, in BOM order, so
    /// the caller can descend into sub-projects among them.
    pub fn walk_remaining(
        &self,
        parent_id: &str,
        doc: &mut SpdxDocument,
        ctx: &mut ExportContext,
    ) -> Vec<(String, &'a ComponentVersion)> {
        let snapshot = self.snapshot;
        let mut linked = Vec::new();
        for (version_id, entry) in &snapshot.components {
            if ctx.is_processed(version_id) {
                continue;
            }
            tracing::debug!("{}", entry.label());

            let spdx_id = self.emit_package(entry, doc, ctx);
            doc.add_relationship(parent_id, classify(&entry.match_types, &entry.usages), &spdx_id);
            ctx.mark_processed(version_id);
            linked.push((spdx_id, entry));
        }
        linked
    }

    /// Emit the package for a component unless its id is already taken.
    ///
    /// Returns the package id either way.
    pub fn emit_package(
        &self,
        listed: &ComponentVersion,
        doc: &mut SpdxDocument,
        ctx: &mut ExportContext,
    ) -> String {
        let spdx_id = package_id(
            &listed.component_name,
            listed.version_name().unwrap_or_default(),
        );
        if !ctx.mark_emitted(&spdx_id) {
            return spdx_id;
        }

        let entry = listed
            .version_id()
            .and_then(|id| self.snapshot.entry(id))
            .unwrap_or(listed);
        let metadata = entry
            .version_id()
            .and_then(|id| ctx.metadata(id))
            .cloned()
            .unwrap_or_default();

        let package = self
            .packages
            .build(&spdx_id, listed, entry, &metadata, &mut ctx.stats);
        doc.add_package(package);
        spdx_id
    }
}
