use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use miette::Diagnostic;
use thiserror::Error;

use crate::ModificationType;

#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
#[diagnostic(help(
    "valid types are ADDUCT, UNDEFINED_ADDUCT, NEUTRAL_LOSS, CLUSTER, ISOTOPE, UNKNOWN, and MIXED"
))]
#[error("{0:?} is not a known modification type")]
pub struct UnknownTypeError(String);

impl ModificationType {
    const ALL: [Self; 7] = [
        Self::Adduct,
        Self::UndefinedAdduct,
        Self::NeutralLoss,
        Self::Cluster,
        Self::Isotope,
        Self::Unknown,
        Self::Mixed,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Adduct => "ADDUCT",
            Self::UndefinedAdduct => "UNDEFINED_ADDUCT",
            Self::NeutralLoss => "NEUTRAL_LOSS",
            Self::Cluster => "CLUSTER",
            Self::Isotope => "ISOTOPE",
            Self::Unknown => "UNKNOWN",
            Self::Mixed => "MIXED",
        }
    }

    /// The type shared by every one of `kinds`, or `Mixed` if they differ
    pub fn common(kinds: impl IntoIterator<Item = Self>) -> Self {
        let mut kinds = kinds.into_iter();
        let first = kinds.next().unwrap_or_default();
        if kinds.all(|k| k == first) {
            first
        } else {
            Self::Mixed
        }
    }
}

impl Display for ModificationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModificationType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTypeError(s.to_owned()))
    }
}
