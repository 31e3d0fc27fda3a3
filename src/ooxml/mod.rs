//! Office Open XML (OOXML) support for presentations.
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, parts, relationships)
//! 2. **Errors** (`error`): XML and part lookup failures on top of OPC errors
//! 3. **PresentationML** (`pptx`): slides, layouts, masters and their writers
pub mod error;
pub mod opc;
pub mod pptx;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};
