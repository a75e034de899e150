use std::{
    fmt::Display,
    ops::{Div, Mul},
};

use rust_decimal::Decimal;

use crate::{Charge, Count, IonError, Mass, Mz, Result};

impl Mass {
    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[must_use]
    pub fn is_sign_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// The m/z of `multiplier` copies of a molecule with this neutral mass, shifted by `shift` and carrying `charge`.
    /// The `name` of whatever is doing the shifting only shows up in errors
    pub(crate) fn ionize(
        self,
        multiplier: Count,
        shift: Self,
        charge: Charge,
        name: impl Display,
    ) -> Result<Mz> {
        if charge.is_zero() {
            return Err(IonError::zero_charge(name.to_string()));
        }
        self.0
            .checked_mul(Decimal::from(multiplier.get()))
            .and_then(|total| total.checked_add(shift.0))
            .and_then(|total| total.checked_div(Decimal::from(i64::from(charge.abs()))))
            .map(Mz)
            .ok_or_else(|| IonError::overflow(name.to_string()))
    }
}

impl Mz {
    /// Undoes [`Mass::ionize`], giving back the neutral mass of a single molecule
    pub(crate) fn neutralize(
        self,
        multiplier: Count,
        shift: Mass,
        charge: Charge,
        name: impl Display,
    ) -> Result<Mass> {
        if charge.is_zero() {
            return Err(IonError::zero_charge(name.to_string()));
        }
        self.0
            .checked_mul(Decimal::from(i64::from(charge.abs())))
            .and_then(|total| total.checked_sub(shift.0))
            .and_then(|total| total.checked_div(Decimal::from(multiplier.get())))
            .map(Mass)
            .ok_or_else(|| IonError::overflow(name.to_string()))
    }
}

impl Mul<Count> for Mass {
    type Output = Self;

    fn mul(self, rhs: Count) -> Self::Output {
        Self(self.0 * Decimal::from(rhs.get()))
    }
}

impl Div<Count> for Mass {
    type Output = Self;

    fn div(self, rhs: Count) -> Self::Output {
        Self(self.0 / Decimal::from(rhs.get()))
    }
}

impl Mul<i64> for Mass {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}
