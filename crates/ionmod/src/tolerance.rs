use rust_decimal::Decimal;

use crate::{Mz, MzTolerance};

const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

impl MzTolerance {
    #[must_use]
    pub const fn new(absolute: Decimal, ppm: Decimal) -> Self {
        Self { absolute, ppm }
    }

    #[must_use]
    pub const fn absolute(absolute: Decimal) -> Self {
        Self::new(absolute, Decimal::ZERO)
    }

    #[must_use]
    pub const fn ppm(ppm: Decimal) -> Self {
        Self::new(Decimal::ZERO, ppm)
    }

    /// The half-width of the window around `mz`, taking the wider of the absolute and relative tolerances
    #[must_use]
    pub fn window(&self, mz: Mz) -> Decimal {
        let relative = mz.0.abs() * self.ppm / MILLION;
        self.absolute.max(relative)
    }

    #[must_use]
    pub fn matches(&self, expected: Mz, observed: Mz) -> bool {
        (expected.0 - observed.0).abs() <= self.window(expected)
    }
}

impl From<Decimal> for MzTolerance {
    fn from(value: Decimal) -> Self {
        Self::absolute(value)
    }
}
