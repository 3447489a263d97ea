//! SPDX document assembly.

mod document;
mod model;

pub use document::{
    DATA_LICENSE, LICENSE_LIST_VERSION, SPDX_VERSION, SpdxDocument, tool_creator, top_package_id,
};
pub use model::{
    Annotation, CreationInfo, ExternalRef, ExtractedLicense, ReferenceCategory, RelationshipType,
    SpdxPackage, SpdxRelationship,
};
