use std::fmt::{self, Display, Formatter};

use crate::{Element, Isotope, Mass, MassNumber, Massive};

use super::{
    atomic_database::{AtomicDatabase, ElementDescription},
    errors::AtomicLookupError,
};

impl<'a> Element<'a> {
    pub(crate) fn new(db: &'a AtomicDatabase, symbol: &str) -> Result<Self, AtomicLookupError> {
        let element = Self::lookup(db, symbol)?;
        let has_abundances = element.isotopes.values().any(|i| i.abundance.is_some());
        if has_abundances {
            return Ok(element);
        }

        // SAFETY: Every element in the database has at least one isotope
        let lightest = *element.isotopes.keys().min().unwrap();
        Err(AtomicLookupError::Abundance(
            element.symbol.to_owned(),
            lightest,
            AtomicLookupError::display_vec(element.isotopes.keys().copied()),
        ))
    }

    pub(crate) fn new_isotope(
        db: &'a AtomicDatabase,
        symbol: &str,
        mass_number: MassNumber,
    ) -> Result<Self, AtomicLookupError> {
        let element = Self::lookup(db, symbol)?;
        if element.isotopes.contains_key(&mass_number) {
            Ok(Self {
                mass_number: Some(mass_number),
                ..element
            })
        } else {
            Err(AtomicLookupError::Isotope(
                element.symbol.to_owned(),
                mass_number,
                element.name.to_owned(),
                AtomicLookupError::display_vec(element.isotopes.keys().copied()),
            ))
        }
    }

    #[must_use]
    pub const fn symbol(&self) -> &'a str {
        self.symbol
    }

    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    fn lookup(db: &'a AtomicDatabase, symbol: &str) -> Result<Self, AtomicLookupError> {
        let (symbol, ElementDescription { name, isotopes }) = db
            .elements
            .get_key_value(symbol)
            .ok_or_else(|| AtomicLookupError::Element(symbol.to_owned()))?;
        Ok(Self {
            symbol,
            name,
            mass_number: None,
            isotopes,
        })
    }

    fn most_abundant(&self) -> Option<&Isotope> {
        self.isotopes
            .values()
            .filter(|i| i.abundance.is_some())
            .max_by_key(|i| i.abundance)
    }
}

impl Display for Element<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.mass_number {
            Some(mass_number) => write!(f, "[{mass_number}{}]", self.symbol),
            None => write!(f, "{}", self.symbol),
        }
    }
}

impl Massive for Element<'_> {
    fn mass(&self) -> Mass {
        let isotope = match self.mass_number {
            Some(mass_number) => self.isotopes.get(&mass_number),
            None => self.most_abundant(),
        };
        // SAFETY: Both constructors check that this isotope exists
        isotope.unwrap().relative_mass
    }
}
