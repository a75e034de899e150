// External Crate Imports
use log::warn;

// Local Crate Imports
use super::{
    CatalogEntry, CodecError, Node, TreeWriter,
    modification::{MODIFICATION, decode_modification, encode_modification},
};
use crate::Modification;

const CATALOG: &str = "catalog";
const ENTRY: &str = "entry";
const SELECTED: &str = "selected";

// Public API ==========================================================================================================

/// Writes a `<catalog>` with one `<entry>` per modification, recording whether it's selected
pub fn encode_catalog<'m>(
    writer: &mut impl TreeWriter,
    entries: impl IntoIterator<Item = (&'m Modification, bool)>,
) {
    writer.start_element(CATALOG);
    for (modification, selected) in entries {
        writer.start_element(ENTRY);
        writer.write_attribute(SELECTED, &selected.to_string());
        encode_modification(writer, modification);
        writer.end_element();
    }
    writer.end_element();
}

/// Decodes every readable entry of a `<catalog>`. Unreadable entries are skipped with a warning, and returned
/// alongside the entries that could be read.
///
/// # Errors
///
/// Fails only if `node` isn't a `<catalog>`
pub fn decode_catalog(node: &Node) -> Result<(Vec<CatalogEntry>, Vec<CodecError>), CodecError> {
    node.expect_tag(CATALOG)?;
    let mut entries = Vec::new();
    let mut errors = Vec::new();
    for (index, entry) in node.children().iter().enumerate() {
        match decode_entry(entry) {
            Ok(entry) => entries.push(entry),
            Err(error) => {
                warn!("skipping catalog entry {index}: {error}");
                errors.push(error);
            }
        }
    }
    Ok((entries, errors))
}

// Private Helper Functions ============================================================================================

fn decode_entry(node: &Node) -> Result<CatalogEntry, CodecError> {
    node.expect_tag(ENTRY)?;
    let selected = match node.attribute(SELECTED) {
        Some(selected) => selected
            .parse()
            .map_err(|_| node.invalid(SELECTED, selected))?,
        None => false,
    };
    let modification = node.children().first().ok_or_else(|| CodecError::Empty {
        tag: ENTRY.to_owned(),
        expected: MODIFICATION,
    })?;
    Ok((decode_modification(modification)?, selected))
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModificationRegistry, Polarity, codec::NodeBuilder};

    fn encode<'m>(entries: impl IntoIterator<Item = (&'m Modification, bool)>) -> Node {
        let mut builder = NodeBuilder::new();
        encode_catalog(&mut builder, entries);
        builder.finish().remove(0)
    }

    #[test]
    fn round_trip() {
        let adducts = ModificationRegistry::defaults().adducts(Polarity::Positive);
        let entries = adducts.iter().enumerate().map(|(i, m)| (m, i % 3 == 0));
        let (decoded, errors) = decode_catalog(&encode(entries)).unwrap();

        assert!(errors.is_empty());
        assert_eq!(decoded.len(), adducts.len());
        for (i, ((modification, selected), original)) in decoded.iter().zip(&adducts).enumerate() {
            assert_eq!(modification, original);
            assert_eq!(*selected, i % 3 == 0);
        }
    }

    #[test]
    fn bad_entries_are_skipped() {
        let neutral = ModificationRegistry::defaults().neutral_modifications();
        let catalog = encode(neutral.iter().take(3).map(|m| (m, true)));

        let broken_mass = Node::new(MODIFICATION).with_child(
            Node::new("part")
                .with_attribute("name", "H2O")
                .with_attribute("mass", "lots")
                .with_attribute("type", "NEUTRAL_LOSS")
                .with_attribute("charge", "0"),
        );
        let broken_flag = catalog.children()[0]
            .clone()
            .with_attribute(SELECTED, "maybe");
        let catalog = catalog
            .with_child(Node::new(ENTRY).with_child(broken_mass))
            .with_child(broken_flag)
            .with_child(Node::new(ENTRY))
            .with_child(Node::new("comment"));

        let (decoded, errors) = decode_catalog(&catalog).unwrap();
        assert_eq!(decoded.len(), 3);
        assert!(decoded.iter().all(|&(_, selected)| selected));
        assert_eq!(
            errors,
            [
                CodecError::InvalidValue {
                    tag: "part".to_owned(),
                    attribute: "mass",
                    value: "lots".to_owned()
                },
                CodecError::InvalidValue {
                    tag: ENTRY.to_owned(),
                    attribute: SELECTED,
                    value: "maybe".to_owned()
                },
                CodecError::Empty {
                    tag: ENTRY.to_owned(),
                    expected: MODIFICATION
                },
                CodecError::UnexpectedTag {
                    expected: ENTRY,
                    found: "comment".to_owned()
                },
            ]
        );
    }

    #[test]
    fn missing_flags_are_unselected() {
        let water = ModificationRegistry::defaults().neutral_modifications()[0].clone();
        let mut builder = NodeBuilder::new();
        encode_modification(&mut builder, &water);
        let entry = Node::new(ENTRY).with_child(builder.finish().remove(0));
        let catalog = Node::new(CATALOG).with_child(entry);

        assert_eq!(decode_catalog(&catalog), Ok((vec![(water, false)], Vec::new())));
        assert!(decode_catalog(&Node::new("catalogue")).is_err());
    }
}
