// Local Crate Imports
use super::{
    CodecError, Node, TreeWriter,
    modification::{MODIFICATION, decode_modification, encode_modification},
};
use crate::{Count, IonType};

const ION_TYPE: &str = "ion-type";
const MULTIPLIER: &str = "multiplier";

// Public API ==========================================================================================================

/// Writes `ion_type` as an `<ion-type>` containing its adduct, then its modification (if it has one)
pub fn encode_ion_type(writer: &mut impl TreeWriter, ion_type: &IonType) {
    writer.start_element(ION_TYPE);
    writer.write_attribute(MULTIPLIER, &ion_type.multiplier().get().to_string());
    encode_modification(writer, ion_type.adduct());
    if let Some(modification) = ion_type.modification() {
        encode_modification(writer, modification);
    }
    writer.end_element();
}

/// # Errors
///
/// Fails if `node` isn't an `<ion-type>` containing an adduct, or if any of its parts are malformed
pub fn decode_ion_type(node: &Node) -> Result<IonType, CodecError> {
    node.expect_tag(ION_TYPE)?;
    let multiplier = match node.attribute(MULTIPLIER) {
        Some(multiplier) => multiplier
            .parse()
            .ok()
            .and_then(Count::new)
            .ok_or_else(|| node.invalid(MULTIPLIER, multiplier))?,
        None => Count::default(),
    };

    let mut modifications = node.children().iter().map(decode_modification);
    let adduct = modifications.next().ok_or_else(|| CodecError::Empty {
        tag: ION_TYPE.to_owned(),
        expected: MODIFICATION,
    })??;
    let modification = modifications.next().transpose()?;

    Ok(IonType::from_parts(multiplier, adduct, modification))
}

// Module Tests ========================================================================================================
