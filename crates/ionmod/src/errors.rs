use miette::Diagnostic;
use thiserror::Error;

use crate::{Charge, parsers::errors::ParseError};

pub type Result<T, E = Box<IonError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum IonError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Formula {
        #[from]
        error: ParseError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Notation { error: ParseError },

    #[diagnostic(help(
        "only charged species show up on an m/z axis, so try pairing {name:?} with a charged adduct"
    ))]
    #[error("cannot convert between mass and m/z for {name:?}, since it carries no charge")]
    ZeroCharge { name: String },

    #[diagnostic(help("masses and m/z values are exact decimals, and can't grow past about 7.9e28"))]
    #[error("converting between mass and m/z for {name:?} overflowed")]
    Overflow { name: String },

    #[diagnostic(help("pick the type shared by the parts of this modification, or use UNKNOWN"))]
    #[error("the modification {name:?} is a single part, so it cannot have the MIXED type")]
    MixedAtomic { name: String },

    #[error("the modification {name:?} has no chemical formula to add to or remove from a molecule")]
    MissingFormula { name: String },

    #[diagnostic(help("the charge after the closing ']' must match the charge of the parts inside the brackets"))]
    #[error("the ion {notation:?} declares a charge of {declared}, but its parts carry a charge of {actual}")]
    ChargeMismatch {
        notation: String,
        declared: Charge,
        actual: Charge,
    },
}

impl IonError {
    pub(crate) fn zero_charge(name: impl Into<String>) -> Box<Self> {
        let name = name.into();

        Box::new(Self::ZeroCharge { name })
    }

    pub(crate) fn overflow(name: impl Into<String>) -> Box<Self> {
        let name = name.into();

        Box::new(Self::Overflow { name })
    }

    pub(crate) fn missing_formula(name: &str) -> Box<Self> {
        let name = name.to_owned();

        Box::new(Self::MissingFormula { name })
    }
}
