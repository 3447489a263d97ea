//! Provenance sentences for package comments.
//!
//! The sentence is assembled from three table lookups: what the component
//! is, how it was discovered, and where its supplier came from.
//!
//! ```
//! use bd_spdx_export::model::{ComponentKind, MatchType};
//! use bd_spdx_export::walker::{SupplierSource, provenance};
//!
//! assert_eq!(
//!     provenance(&ComponentKind::Custom, Some(&MatchType::ManualBomComponent), SupplierSource::Unknown),
//!     "This is a custom component which was manually added, the PackageSupplier was not populated"
//! );
//! ```

use crate::model::{ComponentKind, MatchType};

const OPEN_SOURCE: &str = "This is an open source component from the Black Duck Knowledge Base";
const CUSTOM: &str = "This is a custom component";
const SUB_PROJECT: &str = "This is a sub project";

const AUTOMATIC: &str = " which was automatically detected";

/// Discovery phrase by primary match type.
const DISCOVERY: &[(MatchType, &str)] = &[
    (MatchType::ManualBomComponent, " which was manually added"),
    (
        MatchType::FileExact,
        " which was automatically detected as a direct file match",
    ),
    (
        MatchType::Snippet,
        " which was automatically detected as a code snippet",
    ),
    (
        MatchType::FileDependencyDirect,
        " which was automatically detected as a directly declared dependency",
    ),
    (
        MatchType::FileDependencyTransitive,
        " which was automatically detected as a transitive dependency",
    ),
];

/// Where a package's supplier attribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierSource {
    /// `PackageSupplier` custom field on the BOM entry
    BomField,
    /// Supplier recorded on the component itself
    Component,
    /// Derived from the origin's ecosystem
    Ecosystem,
    Unknown,
}

impl SupplierSource {
    /// True when the supplier was given explicitly rather than derived.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::BomField | Self::Component)
    }

    const fn phrase(self) -> &'static str {
        match self {
            Self::BomField => ", the PackageSupplier was provided by the user at the BOM level",
            Self::Component => ", the PackageSupplier was populated in the component",
            Self::Ecosystem => ", the PackageSupplier was based on the externalNamespace",
            Self::Unknown => ", the PackageSupplier was not populated",
        }
    }
}

const fn subject(kind: &ComponentKind) -> &'static str {
    match kind {
        ComponentKind::Custom => CUSTOM,
        ComponentKind::SubProject => SUB_PROJECT,
        ComponentKind::OpenSource | ComponentKind::Other(_) => OPEN_SOURCE,
    }
}

fn discovery(primary: Option<&MatchType>) -> &'static str {
    let Some(primary) = primary else {
        return "";
    };
    DISCOVERY
        .iter()
        .find(|(m, _)| m == primary)
        .map_or(AUTOMATIC, |(_, phrase)| *phrase)
}

/// Describe a component's kind, discovery and supplier origin.
#[must_use]
pub fn provenance(
    kind: &ComponentKind,
    primary_match: Option<&MatchType>,
    supplier: SupplierSource,
) -> String {
    format!(
        "{}{}{}",
        subject(kind),
        discovery(primary_match),
        supplier.phrase()
    )
}
