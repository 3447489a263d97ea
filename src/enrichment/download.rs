//! Download location lookup.

use crate::error::Result;
use crate::model::NOASSERTION;

/// Resolves a catalog cross-reference to a source download URL.
///
/// Implement this trait to plug in a catalog scraper or mirror lookup.
///
/// ```
/// use bd_spdx_export::enrichment::{DownloadLocator, NoOpLocator};
///
/// let locator = NoOpLocator;
/// assert_eq!(locator.locate("https://openhub.net/p/curl").unwrap(), "NOASSERTION");
/// ```
pub trait DownloadLocator: Send + Sync {
    /// Best-effort download URL for a catalog page, or NOASSERTION.
    fn locate(&self, catalog_url: &str) -> Result<String>;

    /// Name of this locator, for logging.
    fn name(&self) -> &'static str;
}

/// Locator that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLocator;

impl DownloadLocator for NoOpLocator {
    fn locate(&self, _catalog_url: &str) -> Result<String> {
        Ok(NOASSERTION.to_string())
    }

    fn name(&self) -> &'static str {
        "NoOp"
    }
}
