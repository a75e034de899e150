use miette::Diagnostic;
use thiserror::Error;

use crate::{errors::IonError, modifications::UnknownTypeError};

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum CodecError {
    #[error("the <{tag}> element is missing its {attribute:?} attribute")]
    MissingAttribute { tag: String, attribute: &'static str },

    #[diagnostic(help("numbers are written like 1.007276 or -1, and flags as true or false"))]
    #[error("the {attribute:?} attribute of <{tag}> has the unreadable value {value:?}")]
    InvalidValue {
        tag: String,
        attribute: &'static str,
        value: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    UnknownType(#[from] UnknownTypeError),

    #[error("expected a <{expected}> element, but found <{found}>")]
    UnexpectedTag {
        expected: &'static str,
        found: String,
    },

    #[error("the <{tag}> element doesn't contain any {expected}")]
    Empty {
        tag: String,
        expected: &'static str,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] Box<IonError>),
}
