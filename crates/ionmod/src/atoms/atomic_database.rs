// Standard Library Imports
use std::{num::NonZeroU32, str::FromStr};

// External Crate Imports
use ahash::HashMap;
use knuffel::Decode;
use miette::{Diagnostic, Result, miette};
use thiserror::Error;

// Local Crate Imports
use crate::{
    Charge, ChemicalFormula, FormulaMass, Isotope, Mass, MassNumber, Massive, kdl::DecimalKdl,
};

// Public API ==========================================================================================================

pub const DEFAULT_KDL: &str = include_str!("../../data/atomic_database.kdl");

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AtomicDatabase {
    pub(crate) elements: HashMap<String, ElementDescription>,
    pub(crate) particles: HashMap<String, ParticleDescription>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct ElementDescription {
    pub(crate) name: String,
    pub(crate) isotopes: HashMap<MassNumber, Isotope>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct ParticleDescription {
    pub(crate) name: String,
    pub(crate) mass: Mass,
    pub(crate) charge: Charge,
}

impl AtomicDatabase {
    pub fn from_kdl(file_name: impl AsRef<str>, text: impl AsRef<str>) -> Result<Self> {
        let parsed_db: AtomicDatabaseKdl = knuffel::parse(file_name.as_ref(), text.as_ref())?;
        let elements = parsed_db
            .elements
            .into_iter()
            .map(ElementKdl::validate)
            .collect::<Result<_>>()?;
        let particles = parsed_db
            .particles
            .into_iter()
            .map(ParticleKdl::into_entry)
            .collect();
        Ok(Self {
            elements,
            particles,
        })
    }
}

impl Default for AtomicDatabase {
    fn default() -> Self {
        // SAFETY: The embedded database is loaded by the tests below
        Self::from_kdl("atomic_database.kdl", DEFAULT_KDL)
            .expect("the embedded atomic database failed to load")
    }
}

impl FormulaMass for AtomicDatabase {
    fn formula_mass(&self, formula: &str) -> crate::Result<Mass> {
        ChemicalFormula::new(self, formula).map(|f| f.mass())
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
struct AtomicDatabaseKdl {
    #[knuffel(child, unwrap(children))]
    elements: Vec<ElementKdl>,
    #[knuffel(child, unwrap(children))]
    particles: Vec<ParticleKdl>,
}

#[derive(Debug, Decode)]
struct ElementKdl {
    #[knuffel(node_name)]
    symbol: ElementSymbol,
    #[knuffel(argument)]
    name: String,
    #[knuffel(children(name = "isotope", non_empty))]
    isotopes: Vec<IsotopeKdl>,
}

#[derive(Debug, Decode)]
struct ParticleKdl {
    #[knuffel(node_name)]
    symbol: ParticleSymbol,
    #[knuffel(argument)]
    name: String,
    #[knuffel(child, unwrap(argument))]
    mass: DecimalKdl,
    #[knuffel(child, unwrap(argument))]
    charge: i64,
}

#[derive(Debug, Decode)]
struct IsotopeKdl {
    #[knuffel(argument)]
    mass_number: u32,
    #[knuffel(argument)]
    relative_mass: DecimalKdl,
    #[knuffel(argument)]
    abundance: Option<DecimalKdl>,
}

// Element and Particle Symbol Validation ==============================================================================

#[derive(Debug)]
struct ElementSymbol(String);

impl FromStr for ElementSymbol {
    type Err = InvalidAtomicSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<_> = s.chars().collect();
        match chars[..] {
            [f] if f.is_ascii_uppercase() => Ok(Self(s.to_owned())),
            [f, l] if f.is_ascii_uppercase() && l.is_ascii_lowercase() => Ok(Self(s.to_owned())),
            _ => Err(InvalidAtomicSymbolError::Element(s.to_owned())),
        }
    }
}

#[derive(Debug)]
struct ParticleSymbol(String);

impl FromStr for ParticleSymbol {
    type Err = InvalidAtomicSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_lowercase() => Ok(Self(s.to_owned())),
            _ => Err(InvalidAtomicSymbolError::Particle(s.to_owned())),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Diagnostic, Error)]
enum InvalidAtomicSymbolError {
    #[error(
        "expected a single uppercase ASCII letter optionally followed by a lowercase ASCII letter, got {0:?}"
    )]
    Element(String),
    #[error("expected a single lowercase ASCII letter, got {0:?}")]
    Particle(String),
}

// Conversion From Parsed KDL to Internal Representation ===============================================================

impl ElementKdl {
    fn validate(self) -> Result<(String, ElementDescription)> {
        let Self {
            symbol: ElementSymbol(symbol),
            name,
            isotopes,
        } = self;
        let isotopes = isotopes
            .into_iter()
            .map(
                |IsotopeKdl {
                     mass_number,
                     relative_mass,
                     abundance,
                 }| {
                    let mass_number = NonZeroU32::new(mass_number).ok_or_else(|| {
                        miette!("the element {symbol} has an isotope with a mass number of zero")
                    })?;
                    let isotope = Isotope {
                        relative_mass: relative_mass.0.into(),
                        abundance: abundance.map(|a| a.0),
                    };
                    Ok((MassNumber(mass_number), isotope))
                },
            )
            .collect::<Result<_>>()?;
        Ok((symbol, ElementDescription { name, isotopes }))
    }
}

impl ParticleKdl {
    fn into_entry(self) -> (String, ParticleDescription) {
        let Self {
            symbol: ParticleSymbol(symbol),
            name,
            mass,
            charge,
        } = self;
        let particle = ParticleDescription {
            name,
            mass: mass.0.into(),
            charge: charge.into(),
        };
        (symbol, particle)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_database_loads() {
        let db = AtomicDatabase::default();
        for symbol in ["H", "C", "N", "O", "Na", "K", "Cl", "Br", "F", "S", "P", "Ca", "Fe", "Mg"] {
            assert!(db.elements.contains_key(symbol), "missing {symbol}");
        }
        let proton = &db.particles["p"];
        assert_eq!(proton.name, "Proton");
        assert_eq!(proton.mass, Mass(dec!(1.007276466621)));
        assert_eq!(proton.charge, 1);
        let electron = &db.particles["e"];
        assert_eq!(electron.mass, Mass(dec!(0.000548579909065)));
        assert_eq!(electron.charge, -1);
    }

    #[test]
    fn custom_database() {
        let kdl = indoc! {r#"
            elements {
                Xx "Examplium" {
                    isotope 7 7.0160034366 0.9241
                    isotope 6 6.0151228874 0.0759
                }
            }
            particles {
                q "Quark" {
                    mass 0.5
                    charge 1
                }
            }
        "#};
        let db = AtomicDatabase::from_kdl("custom.kdl", kdl).unwrap();
        let examplium = &db.elements["Xx"];
        assert_eq!(examplium.name, "Examplium");
        assert_eq!(examplium.isotopes.len(), 2);
        assert_eq!(
            examplium.isotopes[&MassNumber(NonZeroU32::new(7).unwrap())].relative_mass,
            Mass(dec!(7.0160034366))
        );
        assert_eq!(db.particles["q"].charge, 1);
    }

    #[test]
    fn invalid_databases() {
        let bad_symbol = indoc! {r#"
            elements {
                xx "Lowercase" {
                    isotope 1 1.0 1.0
                }
            }
            particles {}
        "#};
        assert!(AtomicDatabase::from_kdl("bad.kdl", bad_symbol).is_err());

        let zero_mass_number = indoc! {r#"
            elements {
                Xx "Nothing" {
                    isotope 0 1.0 1.0
                }
            }
            particles {}
        "#};
        assert!(AtomicDatabase::from_kdl("bad.kdl", zero_mass_number).is_err());

        let no_isotopes = indoc! {r#"
            elements {
                Xx "Empty" {
                    // isotope 1 1.0 1.0
                }
            }
            particles {}
        "#};
        assert!(AtomicDatabase::from_kdl("bad.kdl", no_isotopes).is_err());
    }

    #[test]
    fn formula_mass_service() {
        let db = AtomicDatabase::default();
        assert_eq!(db.formula_mass("H2O").unwrap(), Mass(dec!(18.01056468403)));
        assert!(db.formula_mass("H2Xx").is_err());
    }
}
