//! Package-URL synthesis from Black Duck origin records.
//!
//! An origin carries an ecosystem name and an external id whose segments are
//! packed with an ecosystem-specific separator (`left-pad/1.3.0`,
//! `org.apache.commons:commons-lang3:3.12.0`, ...). [`normalize`] unpacks the
//! id and emits the matching `pkg:` URL.

mod origin_map;

pub use origin_map::{OriginRule, known_ecosystems, origin_rule};

use crate::model::strip_quotes;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static PYPI_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("static regex"));
static EPOCH_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):").expect("static regex"));

/// Ecosystems whose ids always split at the last separator.
const LAST_SEPARATOR_ECOSYSTEMS: &[&str] = &["npmjs", "maven"];

/// Derive a package URL from an origin's ecosystem and external id.
///
/// Returns `None` for ecosystems without a known mapping.
///
/// ```
/// use bd_spdx_export::purl::normalize;
///
/// assert_eq!(
///     normalize("maven", "org.apache.commons:commons-lang3:3.12.0").as_deref(),
///     Some("pkg:maven/org.apache.commons/commons-lang3@3.12.0")
/// );
/// assert_eq!(normalize("sourceforge", "foo/1.0"), None);
/// ```
#[must_use]
pub fn normalize(ecosystem: &str, external_id: &str) -> Option<String> {
    let rule = origin_rule(ecosystem)?;
    let sep = rule.separator;

    let (component_id, version) = split_external_id(ecosystem, external_id, sep);

    let mut purl = format!("pkg:{}", rule.purl_type);
    if let Some(namespace) = rule.namespace {
        purl.push('/');
        purl.push_str(namespace);
    }

    if component_id.contains(sep) {
        for segment in component_id.split(sep) {
            purl.push('/');
            purl.push_str(&strip_quotes(segment));
        }
    } else if ecosystem == "pypi" {
        purl.push('/');
        purl.push_str(&strip_quotes(&canonical_pypi_name(component_id)));
    } else {
        purl.push('/');
        purl.push_str(&strip_quotes(component_id));
    }

    let mut qualifiers: Vec<(&str, String)> = Vec::new();
    if let Some(version) = version {
        let (version, arch) = split_version(rule, version);
        if let Some(arch) = arch {
            qualifiers.push(("arch", arch.to_string()));
        }

        let bare = EPOCH_PREFIX.replace(version, "");
        purl.push('@');
        purl.push_str(&strip_quotes(&bare));

        if let Some(caps) = EPOCH_PREFIX.captures(version) {
            qualifiers.push(("epoch", caps[1].to_string()));
        }
    }

    if !qualifiers.is_empty() {
        let encoded: Vec<String> = qualifiers
            .iter()
            .map(|(k, v)| format!("{k}={}", strip_quotes(v)))
            .collect();
        purl.push('?');
        purl.push_str(&encoded.join("&"));
    }

    if let Err(e) = packageurl::PackageUrl::from_str(&purl) {
        tracing::debug!("Synthesized purl '{}' does not parse cleanly: {}", purl, e);
    }

    Some(purl)
}

/// Split an external id into component id and optional version.
fn split_external_id<'a>(ecosystem: &str, external_id: &'a str, sep: char) -> (&'a str, Option<&'a str>) {
    let segments = external_id.split(sep).count();
    let split = if !LAST_SEPARATOR_ECOSYSTEMS.contains(&ecosystem) && segments > 2 {
        external_id.split_once(sep)
    } else {
        external_id.rsplit_once(sep)
    };
    match split {
        Some((id, version)) => (id, Some(version).filter(|v| !v.is_empty())),
        None => (external_id, None),
    }
}

/// Split an architecture suffix off a version string.
///
/// The suffix follows the ecosystem separator; distro ecosystems also accept
/// a trailing `:<arch>` once any leading epoch is set aside.
fn split_version<'a>(rule: &OriginRule, version: &'a str) -> (&'a str, Option<&'a str>) {
    if let Some((v, arch)) = version.split_once(rule.separator) {
        return (v, Some(arch));
    }
    if rule.is_distro() && rule.separator != ':' {
        let epoch_len = EPOCH_PREFIX.find(version).map_or(0, |m| m.end());
        if let Some((v, arch)) = version[epoch_len..].rsplit_once(':') {
            if !arch.is_empty() {
                return (&version[..epoch_len + v.len()], Some(arch));
            }
        }
    }
    (version, None)
}

/// PyPI name canonicalization: lower-case, runs of `-_.` collapsed to `-`.
fn canonical_pypi_name(name: &str) -> String {
    PYPI_SEPARATORS
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}
