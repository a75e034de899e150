use miette::Diagnostic;
use nom::{IResult, error::ErrorKind};
use nom_miette::{FromExternalError, LabeledError, LabeledErrorKind, LabeledParseError};
use thiserror::Error;

use crate::{atoms::errors::AtomicLookupError, errors::IonError};

use super::ion_notation::MAX_ION_COUNT;

pub type ParseError = LabeledError<ParseErrorKind>;
pub(crate) type ParseResult<'a, O> = IResult<&'a str, O, LabeledParseError<'a, ParseErrorKind>>;

/// A count in ion notation above [`MAX_ION_COUNT`]
#[derive(Copy, Clone, Debug)]
pub struct CountTooLarge(pub u32);

#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum ParseErrorKind {
    #[error(
        "expected a chemical formula (optionally followed by a '+' or '-' and a particle offset), \
        or a standalone particle offset"
    )]
    ExpectedChemicalFormula,

    #[error(
        "expected an element (like Na) or an isotope (like [13C]) optionally followed by a number"
    )]
    ExpectedAtomicOffset,

    #[error("expected a particle (like p or e), optionally preceded by a number")]
    ExpectedParticleOffset,

    #[diagnostic(help(
        "a 0 value doesn't make sense here, if you've mistakenly included a leading zero, like \
        H02O, try just H2O instead"
    ))]
    #[error("counts cannot start with 0")]
    ExpectedNoLeadingZero,

    #[error("expected an ASCII digit 1-9")]
    ExpectedDigit,

    #[error("expected an element symbol")]
    ExpectedElementSymbol,

    #[error("expected '[' to open isotope brackets")]
    ExpectedIsotopeStart,

    #[error("expected an isotopic mass number")]
    ExpectedMassNumber,

    #[diagnostic(help("you've probably forgotten to close an earlier '[' bracket"))]
    #[error("expected ']' to close isotope brackets")]
    ExpectedIsotopeEnd,

    #[error("expected a particle symbol")]
    ExpectedParticleSymbol,

    #[error("expected an uppercase ASCII letter")]
    ExpectedUppercase,

    #[error("expected a lowercase ASCII letter")]
    ExpectedLowercase,

    #[error("expected a '+' or a '-'")]
    ExpectedSign,

    #[diagnostic(help("ions are written like [M+H]+, [2M-H2O+Na]+, or [M-2H]2-"))]
    #[error("expected an ion, like [M+H]+")]
    ExpectedIon,

    #[error("expected '[' to open the ion")]
    ExpectedIonStart,

    #[error("expected 'M' to stand in for the molecule")]
    ExpectedMolecule,

    #[diagnostic(help("every modification inside an ion starts with a '+' or a '-', like +Na or -H2O"))]
    #[error("expected ']' to close the ion")]
    ExpectedIonEnd,

    #[error("expected the charge of the ion, like +, 2+, or -")]
    ExpectedIonCharge,

    #[error("expected the name or formula of a modification, like Na, NH4, or H2O")]
    ExpectedToken,

    #[diagnostic(help("multipliers, charges, and repeated modifications are capped, since each copy is stored"))]
    #[error("expected a count no larger than {max}, but found {0}", max = MAX_ION_COUNT)]
    ExpectedSmallerCount(u32),

    #[diagnostic(transparent)]
    #[error(transparent)]
    LookupError(Box<AtomicLookupError>),

    #[diagnostic(transparent)]
    #[error(transparent)]
    UnresolvedToken(Box<IonError>),

    #[diagnostic(help(
        "this is an internal error that you shouldn't ever see! If you have gotten this error, \
        then please report it as a bug!"
    ))]
    #[error("internal `nom` error: {0:?}")]
    NomError(ErrorKind),

    #[diagnostic(help("check the unparsed region for errors, or remove it from the rest of the input"))]
    #[error("could not interpret the full input")]
    Incomplete,
}

impl LabeledErrorKind for ParseErrorKind {
    fn label(&self) -> Option<&'static str> {
        Some(match self {
            Self::LookupError(e) => match **e {
                AtomicLookupError::Element(..) => "element not found",
                AtomicLookupError::Isotope(..) => "isotope not found",
                AtomicLookupError::Particle(..) => "particle not found",
                AtomicLookupError::Abundance(..) => "no natural abundance",
            },
            Self::UnresolvedToken(_) => "unknown modification",
            Self::ExpectedUppercase => "expected uppercase",
            Self::ExpectedLowercase => "expected lowercase",
            Self::ExpectedDigit => "expected digit",
            Self::ExpectedIsotopeStart => "'['",
            Self::ExpectedIsotopeEnd => "expected ']'",
            Self::ExpectedMassNumber => "expected a mass number",
            Self::ExpectedNoLeadingZero => "expected non-zero",
            Self::ExpectedSign => "expected '+' or '-'",
            Self::ExpectedIonStart => "expected '['",
            Self::ExpectedMolecule => "expected 'M'",
            Self::ExpectedIonEnd => "expected ']'",
            Self::ExpectedToken => "expected a modification",
            Self::ExpectedSmallerCount(_) => "count too large",
            Self::Incomplete => "input was valid up until this point",
            Self::NomError(_) => "the region that triggered this bug!",
            _ => return None,
        })
    }
}

impl FromExternalError<AtomicLookupError> for ParseErrorKind {
    const FATAL: bool = true;

    fn from_external_error(error: AtomicLookupError) -> Self {
        Self::LookupError(Box::new(error))
    }
}

impl FromExternalError<Box<IonError>> for ParseErrorKind {
    const FATAL: bool = true;

    fn from_external_error(error: Box<IonError>) -> Self {
        Self::UnresolvedToken(error)
    }
}

impl FromExternalError<CountTooLarge> for ParseErrorKind {
    const FATAL: bool = true;

    fn from_external_error(CountTooLarge(count): CountTooLarge) -> Self {
        Self::ExpectedSmallerCount(count)
    }
}

impl From<ErrorKind> for ParseErrorKind {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::Eof => Self::Incomplete,
            kind => Self::NomError(kind),
        }
    }
}
