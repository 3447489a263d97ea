//! License expression composition.
//!
//! Catalog licenses keep their SPDX id (deprecated ids are mapped to their
//! current form). Custom licenses become `LicenseRef-` references whose text
//! is fetched once per run and carried as an extracted license.

use super::cache::LicenseTextCache;
use super::stats::EnrichmentError;
use crate::model::{BomLicense, NOASSERTION, license_ref, strip_quotes};
use crate::source::BomSource;
use crate::spdx::ExtractedLicense;

/// Deprecated SPDX ids and their replacements.
const DEPRECATED_IDS: &[(&str, &str)] = &[
    ("AGPL-1.0", "AGPL-1.0-only"),
    ("AGPL-3.0", "AGPL-3.0-only"),
    ("BSD-2-Clause-FreeBSD", "BSD-2-Clause"),
    ("BSD-2-Clause-NetBSD", "BSD-2-Clause"),
    ("eCos-2.0", NOASSERTION),
    ("GFDL-1.1", "GFDL-1.1-only"),
    ("GFDL-1.2", "GFDL-1.2-only"),
    ("GFDL-1.3", "GFDL-1.3-only"),
    ("GPL-1.0", "GPL-1.0-only"),
    ("GPL-1.0+", "GPL-1.0-or-later"),
    ("GPL-2.0-with-autoconf-exception", "GPL-2.0-only"),
    ("GPL-2.0-with-bison-exception", "GPL-2.0-only"),
    ("GPL-2.0-with-classpath-exception", "GPL-2.0-only"),
    ("GPL-2.0-with-font-exception", "GPL-2.0-only"),
    ("GPL-2.0-with-GCC-exception", "GPL-2.0-only"),
    ("GPL-2.0", "GPL-2.0-only"),
    ("GPL-2.0+", "GPL-2.0-or-later"),
    ("GPL-3.0-with-autoconf-exception", "GPL-3.0-only"),
    ("GPL-3.0-with-GCC-exception", "GPL-3.0-only"),
    ("GPL-3.0", "GPL-3.0-only"),
    ("GPL-3.0+", "GPL-3.0-or-later"),
    ("LGPL-2.0", "LGPL-2.0-only"),
    ("LGPL-2.0+", "LGPL-2.0-or-later"),
    ("LGPL-2.1", "LGPL-2.1-only"),
    ("LGPL-2.1+", "LGPL-2.1-or-later"),
    ("LGPL-3.0", "LGPL-3.0-only"),
    ("LGPL-3.0+", "LGPL-3.0-or-later"),
    ("Nunit", NOASSERTION),
    ("StandardML-NJ", "SMLNJ"),
    ("wxWindows", NOASSERTION),
];

/// Current form of a possibly deprecated SPDX id.
#[must_use]
pub fn current_spdx_id(id: &str) -> &str {
    DEPRECATED_IDS
        .iter()
        .find(|(old, _)| *old == id)
        .map_or(id, |(_, new)| *new)
}

/// Join license ids with AND, parenthesized when more than one.
#[must_use]
pub fn compose_expression(ids: &[String]) -> String {
    match ids {
        [] => NOASSERTION.to_string(),
        [single] => single.clone(),
        many => format!("({})", many.join(" AND ")),
    }
}

/// Licenses to evaluate for a BOM entry.
///
/// An entry whose first license nests more than one alternative is
/// flattened to that inner list.
#[must_use]
pub fn effective_licenses(licenses: &[BomLicense]) -> &[BomLicense] {
    match licenses.first() {
        Some(first) if first.licenses.len() > 1 => &first.licenses,
        _ => licenses,
    }
}

/// License expression and custom license texts for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseResolution {
    pub expression: String,
    pub extracted: Vec<ExtractedLicense>,
    /// Custom license texts fetched by this resolution
    pub texts_fetched: usize,
    /// Custom license texts served from the cache
    pub cache_hits: usize,
}

/// Resolve the license expression of a BOM entry.
///
/// Custom licenses whose text cannot be fetched are left out of the
/// expression; the failure is pushed onto `errors`.
pub fn resolve_licenses<S: BomSource + ?Sized>(
    source: &S,
    licenses: &[BomLicense],
    cache: &LicenseTextCache,
    errors: &mut Vec<EnrichmentError>,
) -> LicenseResolution {
    let mut resolution = LicenseResolution::default();
    let mut ids = Vec::new();

    for license in effective_licenses(licenses) {
        if let Some(spdx_id) = license.spdx_id.as_deref() {
            let id = current_spdx_id(spdx_id);
            if id != NOASSERTION && spdx::license_id(id).is_none() {
                tracing::debug!("License id '{}' is not in the SPDX license list", id);
            }
            ids.push(strip_quotes(id));
            continue;
        }

        let reference = strip_quotes(&license_ref(&license.license_display));
        let Some(key) = license.license_key() else {
            errors.push(EnrichmentError::LicenseTextUnavailable {
                license_ref: reference,
                reason: "license has no resource link".to_string(),
            });
            continue;
        };

        let mut failure = None;
        let cached = cache.get_or_fetch(&reference, || match source.license_text(key) {
            Ok(text) => Some(text),
            Err(e) => {
                failure = Some(e.to_string());
                None
            }
        });
        if cached.fetched {
            resolution.texts_fetched += 1;
        } else {
            resolution.cache_hits += 1;
        }

        match cached.text {
            Some(text) => {
                resolution.extracted.push(ExtractedLicense {
                    license_id: reference.clone(),
                    extracted_text: strip_quotes(&text),
                });
                ids.push(reference);
            }
            None => {
                if let Some(reason) = failure {
                    errors.push(EnrichmentError::LicenseTextUnavailable {
                        license_ref: reference,
                        reason,
                    });
                }
            }
        }
    }

    resolution.expression = compose_expression(&ids);
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FetchKind, SnapshotSource};

    fn catalog(id: &str) -> BomLicense {
        BomLicense {
            spdx_id: Some(id.to_string()),
            license_display: id.to_string(),
            ..Default::default()
        }
    }

    fn custom(display: &str, key: &str) -> BomLicense {
        BomLicense {
            license_display: display.to_string(),
            license: Some(format!("https://hub/api/licenses/{key}")),
            ..Default::default()
        }
    }

    const TEXTS: &str = r#"{
        "licenseTexts": {"acme-eula": "Acme EULA text"},
        "failures": ["acme-broken"]
    }"#;

    #[test]
    fn test_custom_license_text_fetched_once() {
        let source = SnapshotSource::from_json(TEXTS).unwrap();
        let cache = LicenseTextCache::new();
        let licenses = vec![catalog("MIT"), custom("Acme EULA", "acme-eula")];

        let mut errors = Vec::new();
        let first = resolve_licenses(&source, &licenses, &cache, &mut errors);
        assert_eq!(first.expression, "(MIT AND LicenseRef-AcmeEULA)");
        assert_eq!(first.extracted.len(), 1);
        assert_eq!(first.extracted[0].extracted_text, "Acme EULA text");
        assert_eq!((first.texts_fetched, first.cache_hits), (1, 0));

        let second = resolve_licenses(&source, &licenses, &cache, &mut errors);
        assert_eq!(second.expression, first.expression);
        assert_eq!((second.texts_fetched, second.cache_hits), (0, 1));
        assert_eq!(source.fetch_count_for(FetchKind::LicenseText, "acme-eula"), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_failed_license_text_dropped_from_expression() {
        let source = SnapshotSource::from_json(TEXTS).unwrap();
        let cache = LicenseTextCache::new();
        let licenses = vec![catalog("MIT"), custom("Acme Broken", "acme-broken")];

        let mut errors = Vec::new();
        let first = resolve_licenses(&source, &licenses, &cache, &mut errors);
        assert_eq!(first.expression, "MIT");
        assert!(first.extracted.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            EnrichmentError::LicenseTextUnavailable { license_ref, .. }
                if license_ref == "LicenseRef-AcmeBroken"
        ));

        // Another component carrying the same reference reuses the failed entry
        let second = resolve_licenses(&source, &licenses, &cache, &mut errors);
        assert_eq!(second.expression, "MIT");
        assert!(second.extracted.is_empty());
        assert_eq!(second.cache_hits, 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(source.fetch_count_for(FetchKind::LicenseText, "acme-broken"), 1);
    }

    #[test]
    fn test_deprecated_remap() {
        assert_eq!(current_spdx_id("GPL-2.0"), "GPL-2.0-only");
        assert_eq!(current_spdx_id("LGPL-2.1+"), "LGPL-2.1-or-later");
        assert_eq!(current_spdx_id("StandardML-NJ"), "SMLNJ");
        assert_eq!(current_spdx_id("wxWindows"), NOASSERTION);
        assert_eq!(current_spdx_id("MIT"), "MIT");
    }

    #[test]
    fn test_compose_expression() {
        assert_eq!(compose_expression(&[]), NOASSERTION);
        assert_eq!(compose_expression(&["MIT".to_string()]), "MIT");
        assert_eq!(
            compose_expression(&["MIT".to_string(), "GPL-2.0-only".to_string()]),
            "(MIT AND GPL-2.0-only)"
        );
    }

    #[test]
    fn test_flatten_nested_alternatives() {
        let outer = BomLicense {
            license_display: "MIT OR Apache-2.0".to_string(),
            licenses: vec![catalog("MIT"), catalog("Apache-2.0")],
            ..Default::default()
        };
        let licenses = vec![outer];
        let effective = effective_licenses(&licenses);
        assert_eq!(effective.len(), 2);
        assert_eq!(effective[1].spdx_id.as_deref(), Some("Apache-2.0"));

        let single = vec![BomLicense {
            licenses: vec![catalog("MIT")],
            ..catalog("MIT")
        }];
        assert_eq!(effective_licenses(&single).len(), 1);
    }
}
