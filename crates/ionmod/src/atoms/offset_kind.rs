use std::fmt::{self, Display, Formatter};

use crate::OffsetKind;

impl OffsetKind {
    /// Applies this offset's sign to `count`
    #[must_use]
    pub const fn offset(self, count: i64) -> i64 {
        match self {
            Self::Add => count,
            Self::Remove => -count,
        }
    }
}

impl Display for OffsetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Remove => "-",
        })
    }
}
