use std::ops::Mul;

use crate::{Charge, Count};

impl Charge {
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl PartialEq<i64> for Charge {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl Mul<Count> for Charge {
    type Output = Self;

    fn mul(self, rhs: Count) -> Self::Output {
        Self(self.0 * i64::from(rhs.get()))
    }
}
