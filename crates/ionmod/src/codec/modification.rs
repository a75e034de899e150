// Standard Library Imports
use std::str::FromStr;

// External Crate Imports
use rust_decimal::Decimal;

// Local Crate Imports
use super::{CodecError, Node, TreeWriter};
use crate::{AtomicModification, Charged, Massive, Modification, ModificationType};

pub(super) const MODIFICATION: &str = "modification";
const PART: &str = "part";
const NAME: &str = "name";
const FORMULA: &str = "formula";
const MASS: &str = "mass";
const TYPE: &str = "type";
const CHARGE: &str = "charge";

// NOTE: Stands in for a missing formula, so it can never name a real formula
const NO_FORMULA: &str = "null";

// Public API ==========================================================================================================

/// Writes `modification` as a `<modification>` element with one `<part>` per atomic part
pub fn encode_modification(writer: &mut impl TreeWriter, modification: &Modification) {
    writer.start_element(MODIFICATION);
    for part in modification.parts() {
        writer.start_element(PART);
        writer.write_attribute(NAME, part.name());
        writer.write_attribute(FORMULA, part.formula().unwrap_or(NO_FORMULA));
        writer.write_attribute(MASS, &part.mass().to_string());
        writer.write_attribute(TYPE, part.kind().name());
        writer.write_attribute(CHARGE, &part.charge().to_string());
        writer.end_element();
    }
    writer.end_element();
}

/// # Errors
///
/// Fails if `node` isn't a `<modification>` with at least one valid `<part>`
pub fn decode_modification(node: &Node) -> Result<Modification, CodecError> {
    node.expect_tag(MODIFICATION)?;
    let parts = node
        .children()
        .iter()
        .map(decode_part)
        .collect::<Result<_, _>>()?;
    Modification::from_parts(parts).ok_or_else(|| CodecError::Empty {
        tag: MODIFICATION.to_owned(),
        expected: "parts",
    })
}

// Private Helper Functions ============================================================================================

fn decode_part(node: &Node) -> Result<AtomicModification, CodecError> {
    node.expect_tag(PART)?;
    let name = node.required(NAME)?;
    let formula = node
        .attribute(FORMULA)
        .filter(|&formula| formula != NO_FORMULA);

    let mass = node.required(MASS)?;
    let mass = Decimal::from_str_exact(mass).map_err(|_| node.invalid(MASS, mass))?;
    let kind = ModificationType::from_str(node.required(TYPE)?)?;
    let charge = node.required(CHARGE)?;
    let charge = charge.parse().map_err(|_| node.invalid(CHARGE, charge))?;

    Ok(AtomicModification::new(kind, name, formula, mass, charge)?)
}

// Module Tests ========================================================================================================
