//! XML text helpers.

mod escape;

pub use escape::{escape_xml, resolve_entity, unescape_xml};
