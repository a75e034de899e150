//! Catalogs of well-known modifications, and searches over them

mod defaults;
mod loader;

// Standard Library Imports
use std::sync::LazyLock;

// External Crate Imports
use log::debug;

// Local Crate Imports
use crate::{
    AtomicModification, Charge, Charged, FormulaMass, IonType, Mass, Modification,
    ModificationType, Mz, MzTolerance, Polarity, Result,
};

static DEFAULTS: LazyLock<ModificationRegistry> = LazyLock::new(defaults::build);

/// Positive adducts, negative adducts, neutral modifications, and isotopes. Catalogs are never changed once built, so
/// every getter hands out copies
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ModificationRegistry {
    positive: Vec<Modification>,
    negative: Vec<Modification>,
    neutral: Vec<Modification>,
    isotopes: Vec<Modification>,
}

// Public API ==========================================================================================================

impl ModificationRegistry {
    /// The built-in catalogs, shared by the whole process
    #[must_use]
    pub fn defaults() -> &'static Self {
        &DEFAULTS
    }

    #[must_use]
    pub fn positive_adducts(&self) -> Vec<Modification> {
        self.positive.clone()
    }

    #[must_use]
    pub fn negative_adducts(&self) -> Vec<Modification> {
        self.negative.clone()
    }

    #[must_use]
    pub fn neutral_modifications(&self) -> Vec<Modification> {
        self.neutral.clone()
    }

    #[must_use]
    pub fn isotopes(&self) -> Vec<Modification> {
        self.isotopes.clone()
    }

    /// The adducts searched for a given polarity: `Neutral` has none, and `Any` has both positive and negative
    #[must_use]
    pub fn adducts(&self, polarity: Polarity) -> Vec<Modification> {
        self.adduct_catalog(polarity).cloned().collect()
    }

    /// Every adduct for `polarity`, as an ion type without any other modifications
    #[must_use]
    pub fn default_ion_types(&self, polarity: Polarity) -> Vec<IonType> {
        self.adduct_catalog(polarity)
            .cloned()
            .map(IonType::new)
            .collect()
    }

    /// Finds the charged adduct that best explains `neutral_mass` being observed at `mz`. Of the adducts within
    /// `tolerance`, the one with the smallest deviation wins, with ties going to whichever comes first in the catalog
    pub fn get_best_ion_modification(
        &self,
        neutral_mass: Mass,
        mz: Mz,
        tolerance: impl Into<MzTolerance>,
        polarity: Polarity,
    ) -> Option<Modification> {
        let tolerance = tolerance.into();
        self.adduct_catalog(polarity)
            .filter(|adduct| !adduct.charge().is_zero())
            .filter_map(|adduct| {
                let predicted = adduct.mz(neutral_mass).ok()?;
                let deviation = (predicted.0 - mz.0).abs();
                tolerance
                    .matches(predicted, mz)
                    .then_some((adduct, deviation))
            })
            .min_by_key(|&(_, deviation)| deviation)
            .map(|(adduct, _)| adduct.clone())
    }

    /// Resolves a (optionally signed) name or formula, like `+Na`, `-H2O`, or `C2H4O2`, into a modification.
    ///
    /// Catalog entries are searched first: an exact signed match wins, then a match on name or formula (flipped into
    /// a loss or gain if the sign disagrees). Anything else is treated as a chemical formula and has its mass looked up
    /// with `formulas`, giving an `UNKNOWN` modification with a charge of zero. That charge is a placeholder, and
    /// callers that know the polarity need to assign the real one.
    ///
    /// # Errors
    ///
    /// Fails if `token` matches nothing in the catalogs and isn't a valid chemical formula
    pub fn parse_from_string(
        &self,
        token: &str,
        formulas: &impl FormulaMass,
    ) -> Result<Modification> {
        let (sign, body) = match token.chars().next() {
            Some(sign @ ('+' | '-')) => (Some(sign), &token[1..]),
            _ => (None, token),
        };

        if sign.is_some() {
            if let Some(exact) = self.all().find(|m| m.parsed_name() == token) {
                return Ok(exact.clone());
            }
        }

        let by_name = self
            .all()
            .find(|m| m.name() == body || m.formula() == Some(body));
        if let Some(modification) = by_name {
            let is_loss = modification.mass().is_sign_negative();
            return Ok(match sign {
                Some('-') if !is_loss => modification.create_opposite(),
                Some('+') if is_loss => modification.create_opposite(),
                _ => modification.clone(),
            });
        }

        debug!("{token:?} isn't in any catalog, so it will be treated as a chemical formula");
        let mass = formulas.formula_mass(body)?;
        let mass = if sign == Some('-') { -mass } else { mass };
        let unknown = AtomicModification::build(
            ModificationType::Unknown,
            body.to_owned(),
            Some(body.to_owned()),
            mass,
            Charge(0),
        );
        Ok(unknown.into())
    }
}

impl Default for ModificationRegistry {
    fn default() -> Self {
        DEFAULTS.clone()
    }
}

// Crate API ===========================================================================================================

impl ModificationRegistry {
    pub(crate) fn electron(charge: Charge) -> Modification {
        defaults::electron(charge)
    }
}

// Private Helper Methods ==============================================================================================

impl ModificationRegistry {
    fn adduct_catalog(&self, polarity: Polarity) -> impl Iterator<Item = &Modification> {
        let none: &[Modification] = &[];
        let (positive, negative) = match polarity {
            Polarity::Positive => (self.positive.as_slice(), none),
            Polarity::Negative => (none, self.negative.as_slice()),
            Polarity::Neutral => (none, none),
            Polarity::Any => (self.positive.as_slice(), self.negative.as_slice()),
        };
        positive.iter().chain(negative)
    }

    fn all(&self) -> impl Iterator<Item = &Modification> {
        self.positive
            .iter()
            .chain(&self.negative)
            .chain(&self.neutral)
            .chain(&self.isotopes)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::{AtomicDatabase, IonError, Massive};

    use super::*;

    static DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

    fn registry() -> &'static ModificationRegistry {
        ModificationRegistry::defaults()
    }

    fn parse(token: &str) -> Modification {
        registry().parse_from_string(token, &*DB).unwrap()
    }

    #[test]
    fn concrete_catalog_entries() {
        let positive = registry().positive_adducts();
        let h = positive.iter().find(|m| m.name() == "H").unwrap();
        assert_eq!(h.mass(), Mass(dec!(1.007276)));
        assert_eq!(h.charge(), 1);
        let na = positive.iter().find(|m| m.name() == "Na").unwrap();
        assert_eq!(na.mass(), Mass(dec!(22.989218)));
        assert_eq!(na.charge(), 1);

        let water = &registry().neutral_modifications()[0];
        let combined = Modification::combine([h.clone(), water.clone()]).unwrap();
        assert_eq!(combined.mass(), Mass(dec!(-17.003289)));
        assert_eq!(combined.charge(), 1);
        assert_eq!(combined.parsed_name(), "-H2O+H");
    }

    #[test]
    fn adducts_by_polarity() {
        let registry = registry();
        let positive = registry.adducts(Polarity::Positive);
        let negative = registry.adducts(Polarity::Negative);
        assert_eq!(positive, registry.positive_adducts());
        assert_eq!(negative, registry.negative_adducts());
        assert!(registry.adducts(Polarity::Neutral).is_empty());
        assert_eq!(
            registry.adducts(Polarity::Any).len(),
            positive.len() + negative.len()
        );
        assert!(registry.isotopes()[0].kind() == ModificationType::Isotope);
    }

    #[test]
    fn best_ion_modification() {
        let best = registry().get_best_ion_modification(
            Mass(dec!(180.063)),
            Mz(dec!(203.0526)),
            dec!(0.003),
            Polarity::Positive,
        );
        let best = best.unwrap();
        assert_eq!(best.name(), "Na");
        assert_eq!(best.mz(Mass(dec!(180.063))).unwrap(), Mz(dec!(203.052218)));

        // Nothing negative is anywhere close
        let negative = registry().get_best_ion_modification(
            Mass(dec!(180.063)),
            Mz(dec!(203.0526)),
            dec!(0.003),
            Polarity::Negative,
        );
        assert_eq!(negative, None);
        // There are never any neutral adducts
        let neutral = registry().get_best_ion_modification(
            Mass(dec!(180.063)),
            Mz(dec!(203.0526)),
            dec!(0.003),
            Polarity::Neutral,
        );
        assert_eq!(neutral, None);
    }

    #[test]
    fn best_ion_modification_picks_closest() {
        // [M+H]+ lands at 181.070276 and [M+NH4]+ at 198.096823
        let tolerance = MzTolerance::absolute(dec!(20));
        let best = registry().get_best_ion_modification(
            Mass(dec!(180.063)),
            Mz(dec!(182)),
            tolerance,
            Polarity::Any,
        );
        assert_eq!(best.unwrap().parsed_name(), "+H");
        let best = registry().get_best_ion_modification(
            Mass(dec!(180.063)),
            Mz(dec!(197)),
            tolerance,
            Polarity::Any,
        );
        assert_eq!(best.unwrap().parsed_name(), "+NH4");
    }

    #[test]
    fn best_ion_modification_ties_go_to_the_first() {
        let registry = ModificationRegistry::from_kdl(
            "ties.kdl",
            r#"
            positive {
                modification "A" mass=1 charge=1
                modification "B" mass=3 charge=1
            }
            "#,
        )
        .unwrap();
        let best = registry.get_best_ion_modification(
            Mass(dec!(100)),
            Mz(dec!(102)),
            dec!(1),
            Polarity::Positive,
        );
        assert_eq!(best.unwrap().name(), "A");
    }

    #[test]
    fn parse_catalog_tokens() {
        let h = parse("+H");
        assert_eq!((h.mass(), h.charge()), (Mass(dec!(1.007276)), Charge(1)));
        let h_loss = parse("-H");
        assert_eq!(
            (h_loss.mass(), h_loss.charge()),
            (Mass(dec!(-1.007276)), Charge(-1))
        );
        assert_eq!(parse("-H2O").kind(), ModificationType::NeutralLoss);
        assert_eq!(parse("H2O").parsed_name(), "-H2O");
        assert_eq!(parse("Na").parsed_name(), "+Na");
        // Formulas of catalog entries work as well as their names
        assert_eq!(parse("+CH4O").name(), "MeOH");
        assert_eq!(parse("CHO2").charge(), -1);
    }

    #[test]
    fn parse_flips_mismatched_signs() {
        let water_gain = parse("+H2O");
        assert_eq!(water_gain.parsed_name(), "+H2O");
        assert_eq!(water_gain.mass(), Mass(dec!(18.010565)));
        let acn_loss = parse("-ACN");
        assert_eq!(acn_loss.parsed_name(), "-ACN");
        assert_eq!(acn_loss.mass(), Mass(dec!(-41.026549)));
    }

    #[test]
    fn parse_falls_back_to_formulas() {
        // Unknown formulas keep a charge of zero until a caller assigns one
        let gain = parse("C2H2O");
        assert_eq!(gain.kind(), ModificationType::Unknown);
        assert_eq!(gain.charge(), 0);
        assert_eq!(gain.mass(), Mass(dec!(42.01056468403)));
        assert_eq!(gain.formula(), Some("C2H2O"));
        let loss = parse("-C2H2O");
        assert_eq!(loss.parsed_name(), "-C2H2O");
        assert_eq!(loss.mass(), Mass(dec!(-42.01056468403)));

        let error = registry().parse_from_string("+Xyz", &*DB).unwrap_err();
        assert!(matches!(*error, IonError::Formula { .. }));
    }
}
