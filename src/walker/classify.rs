//! Relationship classification for BOM edges.

use crate::model::{MatchType, Usage};
use crate::spdx::RelationshipType;

/// Match types that make the child a dependency of the parent.
const DEPENDENCY_MATCHES: &[MatchType] = &[
    MatchType::FileDependencyDirect,
    MatchType::FileDependencyTransitive,
];

/// Match types that place the child's content inside the parent.
const CONTAINMENT_MATCHES: &[MatchType] = &[
    MatchType::FileExact,
    MatchType::FilesAddedDeletedAndModified,
    MatchType::FileDependency,
    MatchType::FileExactFileMatch,
    MatchType::FileSomeFilesModified,
    MatchType::ManualBomComponent,
    MatchType::ManualBomFile,
    MatchType::PartialFile,
    MatchType::Binary,
];

/// Relationship implied by an explicit usage, if any.
#[must_use]
pub const fn usage_relationship(usage: &Usage) -> Option<RelationshipType> {
    match usage {
        Usage::SourceCode => Some(RelationshipType::Contains),
        Usage::StaticallyLinked => Some(RelationshipType::StaticLink),
        Usage::DynamicallyLinked => Some(RelationshipType::DynamicLink),
        Usage::SeparateWork | Usage::MerelyAggregated | Usage::ImplementationOfStandard => {
            Some(RelationshipType::Other)
        }
        Usage::Prerequisite => Some(RelationshipType::HasPrerequisite),
        Usage::DevToolExcluded => Some(RelationshipType::DevToolOf),
        Usage::Other(_) => None,
    }
}

/// Classify a parent-to-child edge.
///
/// The first recognised usage wins. Otherwise dependency matches beat
/// containment matches, and anything else (snippets included) is OTHER.
#[must_use]
pub fn classify(match_types: &[MatchType], usages: &[Usage]) -> RelationshipType {
    if let Some(rel) = usages.iter().find_map(usage_relationship) {
        return rel;
    }
    if match_types.iter().any(|m| DEPENDENCY_MATCHES.contains(m)) {
        RelationshipType::DependsOn
    } else if match_types.iter().any(|m| CONTAINMENT_MATCHES.contains(m)) {
        RelationshipType::Contains
    } else {
        RelationshipType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_beats_containment() {
        let types = vec![MatchType::FileExact, MatchType::FileDependencyTransitive];
        assert_eq!(classify(&types, &[]), RelationshipType::DependsOn);
    }

    #[test]
    fn test_containment() {
        assert_eq!(
            classify(&[MatchType::ManualBomComponent], &[]),
            RelationshipType::Contains
        );
        assert_eq!(
            classify(&[MatchType::FilesAddedDeletedAndModified], &[]),
            RelationshipType::Contains
        );
        assert_eq!(classify(&[MatchType::Binary], &[]), RelationshipType::Contains);
    }

    #[test]
    fn test_snippet_and_unknown_are_other() {
        assert_eq!(classify(&[MatchType::Snippet], &[]), RelationshipType::Other);
        assert_eq!(
            classify(&[MatchType::from("SOMETHING_NEW")], &[]),
            RelationshipType::Other
        );
        assert_eq!(classify(&[], &[]), RelationshipType::Other);
    }

    #[test]
    fn test_usage_takes_precedence() {
        let types = vec![MatchType::FileDependencyDirect];
        assert_eq!(
            classify(&types, &[Usage::DynamicallyLinked]),
            RelationshipType::DynamicLink
        );
        assert_eq!(
            classify(&types, &[Usage::Prerequisite]),
            RelationshipType::HasPrerequisite
        );
        assert_eq!(
            classify(&types, &[Usage::DevToolExcluded]),
            RelationshipType::DevToolOf
        );
        assert_eq!(
            classify(&[], &[Usage::MerelyAggregated]),
            RelationshipType::Other
        );
    }

    #[test]
    fn test_unknown_usage_falls_through() {
        let usages = vec![Usage::Other("FUTURE".to_string()), Usage::SourceCode];
        assert_eq!(classify(&[], &usages), RelationshipType::Contains);
        assert_eq!(
            classify(&[MatchType::FileDependencyDirect], &[Usage::Other("X".to_string())]),
            RelationshipType::DependsOn
        );
    }
}
