//! Enrichment statistics and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Statistics from one enrichment pass.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EnrichmentStats {
    /// Distinct component versions enriched
    pub components_enriched: usize,
    /// Lookups sent to the BOM source
    pub lookups: usize,
    /// Custom license texts served from the run-wide cache
    pub license_cache_hits: usize,
    /// Custom license texts fetched from the source
    pub license_texts_fetched: usize,
    /// Fields that fell back to their sentinel value
    pub degraded_fields: usize,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Failures recovered during enrichment
    pub errors: Vec<EnrichmentError>,
}

impl EnrichmentStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a summary of the enrichment pass
    pub fn log_summary(&self) {
        tracing::info!(
            "Enrichment complete: {} components, {} lookups, {} license texts fetched \
             ({} cache hits), {} degraded fields in {:?}",
            self.components_enriched,
            self.lookups,
            self.license_texts_fetched,
            self.license_cache_hits,
            self.degraded_fields,
            self.duration
        );

        for err in &self.errors {
            tracing::warn!("Enrichment error: {}", err);
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record a recovered failure.
    pub fn record(&mut self, error: EnrichmentError) {
        tracing::debug!("{}", error);
        self.degraded_fields += 1;
        self.errors.push(error);
    }

    /// Merge stats from another enrichment pass
    pub fn merge(&mut self, other: &Self) {
        self.components_enriched += other.components_enriched;
        self.lookups += other.lookups;
        self.license_cache_hits += other.license_cache_hits;
        self.license_texts_fetched += other.license_texts_fetched;
        self.degraded_fields += other.degraded_fields;
        self.duration += other.duration;
        self.errors.extend(other.errors.iter().cloned());
    }
}

/// Which piece of metadata a failure affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrichedField {
    Copyrights,
    Comments,
    PackageFile,
    License,
    Supplier,
    Homepage,
    DownloadLocation,
}

impl fmt::Display for EnrichedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copyrights => write!(f, "copyrights"),
            Self::Comments => write!(f, "comments"),
            Self::PackageFile => write!(f, "package file"),
            Self::License => write!(f, "license"),
            Self::Supplier => write!(f, "supplier"),
            Self::Homepage => write!(f, "homepage"),
            Self::DownloadLocation => write!(f, "download location"),
        }
    }
}

/// A recovered enrichment failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnrichmentError {
    /// A lookup failed; the field uses its fallback value
    Degraded {
        component: String,
        field: EnrichedField,
        reason: String,
    },
    /// A custom license's text could not be fetched; the license is omitted
    LicenseTextUnavailable { license_ref: String, reason: String },
}

impl EnrichmentError {
    pub fn degraded(component: impl Into<String>, field: EnrichedField, reason: impl fmt::Display) -> Self {
        Self::Degraded {
            component: component.into(),
            field,
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degraded {
                component,
                field,
                reason,
            } => write!(f, "{component}: {field} unavailable ({reason})"),
            Self::LicenseTextUnavailable {
                license_ref,
                reason,
            } => write!(f, "{license_ref}: license text unavailable ({reason})"),
        }
    }
}

impl std::error::Error for EnrichmentError {}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_degraded() {
        let mut stats = EnrichmentStats::new();
        stats.record(EnrichmentError::degraded(
            "left-pad/1.3.0",
            EnrichedField::Copyrights,
            "timeout",
        ));
        assert!(stats.has_errors());
        assert_eq!(stats.degraded_fields, 1);
        assert_eq!(
            stats.errors[0].to_string(),
            "left-pad/1.3.0: copyrights unavailable (timeout)"
        );
    }

    #[test]
    fn test_merge() {
        let mut a = EnrichmentStats {
            components_enriched: 2,
            lookups: 8,
            ..Default::default()
        };
        let b = EnrichmentStats {
            components_enriched: 1,
            lookups: 4,
            license_texts_fetched: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.components_enriched, 3);
        assert_eq!(a.lookups, 12);
        assert_eq!(a.license_texts_fetched, 1);
    }

    #[test]
    fn test_stats_serialize_duration_as_millis() {
        let stats = EnrichmentStats {
            duration: Duration::from_millis(1500),
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["duration"], 1500);
    }
}
