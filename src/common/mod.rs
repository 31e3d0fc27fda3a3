//! Common utilities shared by the package layer and the deck compiler.

pub mod unit;
pub mod xml;

pub use unit::{EMUS_PER_INCH, EMUS_PER_PT, inches_to_emu, pt_to_centipoints};
pub use xml::{escape_xml, unescape_xml};
