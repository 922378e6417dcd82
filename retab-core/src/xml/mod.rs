//! XML document model and location-path queries
//!
//! Data and schema files share one abstraction: an owned, ordered, immutable
//! node tree ([`dom::XmlDocument`]) with a location-path query method
//! ([`path`]). [`loader::XmlFile`] couples a parsed tree with the name it was
//! loaded under, which is what the `_FileName` pseudo-field reports.

pub mod dom;
pub mod loader;
pub mod path;

pub use dom::{Element, XmlDocument, XmlNode};
pub use loader::XmlFile;
