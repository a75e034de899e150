use std::fmt::{self, Display, Formatter};

use crate::{Charge, Charged, Mass, Massive, Particle};

use super::{
    atomic_database::{AtomicDatabase, ParticleDescription},
    errors::AtomicLookupError,
};

impl<'a> Particle<'a> {
    pub(crate) fn new(db: &'a AtomicDatabase, symbol: &str) -> Result<Self, AtomicLookupError> {
        let (symbol, ParticleDescription { name, mass, charge }) = db
            .particles
            .get_key_value(symbol)
            .ok_or_else(|| AtomicLookupError::Particle(symbol.to_owned()))?;
        Ok(Self {
            symbol,
            name,
            mass,
            charge,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

impl Display for Particle<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl Massive for Particle<'_> {
    fn mass(&self) -> Mass {
        *self.mass
    }
}

impl Charged for Particle<'_> {
    fn charge(&self) -> Charge {
        *self.charge
    }
}
