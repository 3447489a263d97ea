//! BOM sources.
//!
//! - [`SnapshotSource`] reads everything from a JSON snapshot file
//! - [`HubClient`] talks to a live Black Duck server (feature `remote`)

#[cfg(feature = "remote")]
pub mod hub;
mod snapshot;
mod traits;

#[cfg(feature = "remote")]
pub use hub::{HubClient, HubClientConfig};
pub use snapshot::{FetchKind, SnapshotSource};
pub use traits::{BomServer, BomSource, ProjectResolver};
