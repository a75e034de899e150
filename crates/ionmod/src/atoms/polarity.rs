use std::fmt::{self, Display, Formatter};

use crate::{Charge, Polarity};

impl Polarity {
    /// The polarity of an ion carrying `charge`
    #[must_use]
    pub const fn of(charge: Charge) -> Self {
        match charge.0 {
            0 => Self::Neutral,
            c if c > 0 => Self::Positive,
            _ => Self::Negative,
        }
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Any => "ANY",
        })
    }
}
