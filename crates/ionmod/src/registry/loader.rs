// External Crate Imports
use knuffel::Decode;
use log::warn;
use miette::Result;
use rust_decimal::{Decimal, prelude::ToPrimitive};

// Local Crate Imports
use crate::{AtomicModification, Charged, Modification, ModificationType, kdl::LenientDecimalKdl};

use super::ModificationRegistry;

// Public API ==========================================================================================================

impl ModificationRegistry {
    /// Loads custom catalogs from KDL, like:
    ///
    /// ```kdl
    /// positive {
    ///     modification "Na" formula="Na" mass=22.989218 charge=1 type="ADDUCT"
    /// }
    /// neutral {
    ///     modification "H2O" formula="H2O" mass=-18.010565
    /// }
    /// ```
    ///
    /// Any of the `positive`, `negative`, `neutral`, and `isotopes` sections can be left out. Entries that don't make
    /// sense (like an unknown type, a mass that isn't a number, or an uncharged adduct) are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fails if `text` isn't valid KDL, or doesn't match the layout above (an entry missing its mass, for example)
    pub fn from_kdl(file_name: impl AsRef<str>, text: impl AsRef<str>) -> Result<Self> {
        let file_name = file_name.as_ref();
        let parsed: RegistryKdl = knuffel::parse(file_name, text.as_ref())?;
        let load = |section, entries: Vec<ModificationKdl>, check: fn(&Modification) -> bool| {
            entries
                .into_iter()
                .filter_map(|entry| {
                    let name = entry.name.clone();
                    let loaded = entry.validate().filter(check);
                    if loaded.is_none() {
                        warn!("skipping the {section} modification {name:?} in {file_name}");
                    }
                    loaded
                })
                .collect()
        };

        Ok(Self {
            positive: load("positive", parsed.positive, |m| m.charge().0 > 0),
            negative: load("negative", parsed.negative, |m| m.charge().0 < 0),
            neutral: load("neutral", parsed.neutral, |_| true),
            isotopes: load("isotope", parsed.isotopes, |_| true),
        })
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
struct RegistryKdl {
    #[knuffel(child, unwrap(children), default)]
    positive: Vec<ModificationKdl>,
    #[knuffel(child, unwrap(children), default)]
    negative: Vec<ModificationKdl>,
    #[knuffel(child, unwrap(children), default)]
    neutral: Vec<ModificationKdl>,
    #[knuffel(child, unwrap(children), default)]
    isotopes: Vec<ModificationKdl>,
}

#[derive(Debug, Decode)]
struct ModificationKdl {
    #[knuffel(argument)]
    name: String,
    #[knuffel(property)]
    formula: Option<String>,
    #[knuffel(property)]
    mass: LenientDecimalKdl,
    #[knuffel(property)]
    charge: Option<LenientDecimalKdl>,
    #[knuffel(property(name = "type"))]
    kind: Option<String>,
}

// Conversion From Parsed KDL to Internal Representation ===============================================================

impl ModificationKdl {
    fn validate(self) -> Option<Modification> {
        let kind = match self.kind.as_deref().map(str::parse) {
            Some(Ok(kind)) => kind,
            Some(Err(error)) => {
                warn!("{error}");
                return None;
            }
            None => ModificationType::Unknown,
        };
        let mass = match self.mass.0 {
            Ok(mass) => mass,
            Err(error) => {
                warn!("the mass of {:?} is invalid: {error}", self.name);
                return None;
            }
        };
        let charge = match self.charge.map(|charge| charge.0) {
            Some(Ok(charge)) => whole_number(charge)?,
            Some(Err(error)) => {
                warn!("the charge of {:?} is invalid: {error}", self.name);
                return None;
            }
            None => 0,
        };
        let modification =
            AtomicModification::new(kind, &self.name, self.formula.as_deref(), mass, charge);
        match modification {
            Ok(modification) => Some(modification.into()),
            Err(error) => {
                warn!("{error}");
                None
            }
        }
    }
}

// Private Helper Functions ============================================================================================

fn whole_number(charge: Decimal) -> Option<i64> {
    let whole = charge.fract().is_zero().then(|| charge.to_i64()).flatten();
    if whole.is_none() {
        warn!("charges must be whole numbers, but found {charge}");
    }
    whole
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rust_decimal_macros::dec;

    use crate::{Charge, Mass, Massive};

    use super::*;

    const CATALOG: &str = indoc! {r#"
        positive {
            modification "Na" formula="Na" mass=22.989218 charge=1 type="ADDUCT"
            modification "Li" formula="Li" mass=7.015455 charge=1 type="adduct"
            // Uncharged, so it can't be an adduct
            modification "X" mass=1.5
            // Wrong polarity
            modification "Cl" formula="Cl" mass=34.969402 charge=-1 type="ADDUCT"
        }
        neutral {
            modification "H2O" formula="H2O" mass=-18.010565 type="NEUTRAL_LOSS"
            modification "Weird" mass=1 type="SIDEWAYS"
            modification "Mixed" mass=1 type="MIXED"
        }
        isotopes {
            modification "(15N)" mass=0.997035 type="ISOTOPE"
        }
    "#};

    #[test]
    fn load_catalogs() {
        let registry = ModificationRegistry::from_kdl("catalog.kdl", CATALOG).unwrap();

        let positive = registry.positive_adducts();
        let names: Vec<_> = positive.iter().map(Modification::name).collect();
        assert_eq!(names, ["Na", "Li"]);
        assert_eq!(positive[1].kind(), ModificationType::Adduct);
        assert_eq!(positive[1].mass(), Mass(dec!(7.015455)));
        assert_eq!(positive[1].charge(), Charge(1));

        assert!(registry.negative_adducts().is_empty());

        let neutral = registry.neutral_modifications();
        assert_eq!(neutral.len(), 1);
        assert_eq!(neutral[0].parsed_name(), "-H2O");
        assert_eq!(neutral[0].formula(), Some("H2O"));

        let isotopes = registry.isotopes();
        assert_eq!(isotopes[0].kind(), ModificationType::Isotope);
        assert_eq!(isotopes[0].formula(), None);
    }

    #[test]
    fn untyped_entries_are_unknown() {
        let registry =
            ModificationRegistry::from_kdl("untyped.kdl", r#"neutral { modification "CO" mass=-27.994915 }"#)
                .unwrap();
        assert_eq!(
            registry.neutral_modifications()[0].kind(),
            ModificationType::Unknown
        );
    }

    #[test]
    fn malformed_catalogs() {
        // Missing the required mass
        let missing_mass = r#"positive { modification "Na" charge=1 }"#;
        assert!(ModificationRegistry::from_kdl("bad.kdl", missing_mass).is_err());
        // Not KDL at all
        assert!(ModificationRegistry::from_kdl("bad.kdl", "positive {").is_err());
    }

    #[test]
    fn bad_numbers_only_skip_their_entry() {
        let catalog = indoc! {r#"
            positive {
                modification "Na" formula="Na" mass=22.989218 charge=1 type="ADDUCT"
                modification "Bad" mass="heavy" charge=1
                modification "Half" mass=1 charge=0.5
                modification "Worse" mass=1 charge="one"
                modification "Tiny" mass=1e-42 charge=1
                modification "K" formula="K" mass=38.963158 charge=1 type="ADDUCT"
            }
        "#};
        let registry = ModificationRegistry::from_kdl("numbers.kdl", catalog).unwrap();
        let positive = registry.positive_adducts();
        let names: Vec<_> = positive.iter().map(Modification::name).collect();
        assert_eq!(names, ["Na", "K"]);
        assert_eq!(positive[1].mass(), Mass(dec!(38.963158)));
    }
}
