//! Encodes modifications, ion types, and catalogs as a small tree of tagged elements with string attributes, ready to
//! be written out by whatever persists a project

mod catalog;
mod errors;
mod ion_type;
mod modification;
mod node;

use crate::Modification;

pub use catalog::{decode_catalog, encode_catalog};
pub use errors::CodecError;
pub use ion_type::{decode_ion_type, encode_ion_type};
pub use modification::{decode_modification, encode_modification};

/// Receives a tree one element at a time. Attributes belong to the most recently started element that hasn't ended
pub trait TreeWriter {
    fn start_element(&mut self, tag: &str);

    fn write_attribute(&mut self, key: &str, value: &str);

    fn end_element(&mut self);
}

/// A decoded element, with its attributes kept in the order they were written
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// A [`TreeWriter`] that builds [`Node`]s in memory
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct NodeBuilder {
    open: Vec<Node>,
    finished: Vec<Node>,
}

/// A modification in a catalog, and whether it's been selected for searching
pub type CatalogEntry = (Modification, bool);
