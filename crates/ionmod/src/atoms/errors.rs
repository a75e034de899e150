use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use crate::MassNumber;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum AtomicLookupError {
    #[diagnostic(help("double-check for typos, or add a new entry to the atomic database"))]
    #[error("the element {0:?} could not be found in the supplied atomic database")]
    Element(String),

    #[diagnostic(help("double-check for typos, or add a new entry to the atomic database"))]
    #[error(
        "the isotope \"{0}-{1}\" could not be found in the supplied atomic database, though the following {2} \
        isotopes were found: {3}"
    )]
    Isotope(String, MassNumber, String, String),

    #[diagnostic(help("double-check for typos, or add a new entry to the atomic database"))]
    #[error("the particle {0:?} could not be found in the supplied atomic database")]
    Particle(String),

    #[diagnostic(help(
        "consider explicitly selecting the isotope to be used in mass calculations, e.g. [{1}{0}]"
    ))]
    #[error("no natural abundance data could be found for {0}, though the following isotopes were found: {2}")]
    Abundance(String, MassNumber, String),
}

impl AtomicLookupError {
    pub(crate) fn display_vec(items: impl IntoIterator<Item = MassNumber>) -> String {
        format!("[{}]", items.into_iter().sorted().join(", "))
    }
}
