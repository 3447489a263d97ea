//! Ecosystem → package-URL type table.

/// How one Black Duck ecosystem maps onto package-URL syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginRule {
    /// purl type, e.g. `deb` or `npm`
    pub purl_type: &'static str,
    /// Fixed namespace implied by the ecosystem, e.g. the distro name
    pub namespace: Option<&'static str>,
    /// Separator packing the segments of an external id
    pub separator: char,
}

impl OriginRule {
    const fn new(purl_type: &'static str, namespace: Option<&'static str>, separator: char) -> Self {
        Self {
            purl_type,
            namespace,
            separator,
        }
    }

    /// True for Linux distribution package ecosystems.
    #[must_use]
    pub fn is_distro(&self) -> bool {
        matches!(self.purl_type, "apk" | "deb" | "rpm")
    }
}

/// Sorted by ecosystem name for binary search.
static ORIGIN_RULES: &[(&str, OriginRule)] = &[
    ("alpine", OriginRule::new("apk", Some("alpine"), '/')),
    ("android", OriginRule::new("apk", Some("android"), ':')),
    ("bitbucket", OriginRule::new("bitbucket", None, ':')),
    ("bower", OriginRule::new("bower", None, '/')),
    ("centos", OriginRule::new("rpm", Some("centos"), '/')),
    ("clearlinux", OriginRule::new("rpm", Some("clearlinux"), '/')),
    ("cpan", OriginRule::new("cpan", None, '/')),
    ("cran", OriginRule::new("cran", None, '/')),
    ("crates", OriginRule::new("cargo", None, '/')),
    ("dart", OriginRule::new("pub", None, '/')),
    ("debian", OriginRule::new("deb", Some("debian"), '/')),
    ("fedora", OriginRule::new("rpm", Some("fedora"), '/')),
    ("gitcafe", OriginRule::new("gitcafe", None, ':')),
    ("github", OriginRule::new("github", None, ':')),
    ("gitlab", OriginRule::new("gitlab", None, ':')),
    ("gitorious", OriginRule::new("gitorious", None, ':')),
    ("golang", OriginRule::new("golang", None, ':')),
    ("hackage", OriginRule::new("hackage", None, '/')),
    ("hex", OriginRule::new("hex", None, '/')),
    ("maven", OriginRule::new("maven", None, ':')),
    ("mongodb", OriginRule::new("rpm", Some("mongodb"), '/')),
    ("npmjs", OriginRule::new("npm", None, '/')),
    ("nuget", OriginRule::new("nuget", None, '/')),
    ("opensuse", OriginRule::new("rpm", Some("opensuse"), '/')),
    ("oracle_linux", OriginRule::new("rpm", Some("oracle"), '/')),
    ("packagist", OriginRule::new("composer", None, ':')),
    ("pear", OriginRule::new("pear", None, '/')),
    ("photon", OriginRule::new("rpm", Some("photon"), '/')),
    ("pypi", OriginRule::new("pypi", None, '/')),
    ("redhat", OriginRule::new("rpm", Some("redhat"), '/')),
    ("ros", OriginRule::new("deb", Some("ros"), '/')),
    ("rubygems", OriginRule::new("gem", None, '/')),
    ("ubuntu", OriginRule::new("deb", Some("ubuntu"), '/')),
    ("yocto", OriginRule::new("yocto", None, '/')),
];

/// Look up the rule for an ecosystem name.
#[must_use]
pub fn origin_rule(ecosystem: &str) -> Option<&'static OriginRule> {
    ORIGIN_RULES
        .binary_search_by(|(name, _)| (*name).cmp(ecosystem))
        .ok()
        .map(|idx| &ORIGIN_RULES[idx].1)
}

/// All ecosystem names with a known mapping.
pub fn known_ecosystems() -> impl Iterator<Item = &'static str> {
    ORIGIN_RULES.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorted() {
        let names: Vec<_> = known_ecosystems().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_lookup() {
        let rule = origin_rule("oracle_linux").unwrap();
        assert_eq!(rule.purl_type, "rpm");
        assert_eq!(rule.namespace, Some("oracle"));
        assert!(rule.is_distro());

        assert_eq!(origin_rule("maven").unwrap().separator, ':');
        assert!(origin_rule("sourceforge").is_none());
    }
}
