pub mod atomic_database;
mod charge;
pub mod chemical_formula;
mod count;
mod element;
pub mod errors;
mod mass;
mod offset_kind;
mod particle;
mod polarity;
