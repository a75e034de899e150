pub(crate) mod chemical_formula;
pub mod errors;
pub mod ion_notation;
pub(crate) mod primitives;
