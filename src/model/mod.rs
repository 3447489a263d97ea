//! Input data model.
//!
//! [`bom`] holds the BOM structures as served by the Black Duck REST API
//! (components, hierarchical nodes, origins, licences and the sub-resources
//! hanging off them). [`identifiers`] derives stable SPDX identifiers from
//! component names:
//!
//! ```
//! use bd_spdx_export::model::package_id;
//!
//! assert_eq!(package_id("left-pad", "1.3.0"), "SPDXRef-Package-left-pad-130");
//! ```

mod bom;
mod identifiers;

pub use bom::*;
pub use identifiers::*;
