/// Open Packaging Conventions (OPC) implementation.
///
/// An OPC package is a ZIP container of parts connected by relationships,
/// with a `[Content_Types].xml` item mapping each part to its content type.
/// This module provides:
///
/// - Package structure (parts, relationships, pack URIs)
/// - Content type management
/// - ZIP-based physical packaging
/// - Reachability pruning so that detached parts are never serialized

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, PartFactory, XmlPart};
pub use rel::{Relationship, Relationships};
