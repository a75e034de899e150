// Standard Library Imports
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

// Local Crate Imports
use crate::{
    AtomicModification, Charge, Charged, Count, IonError, Mass, Massive, ModificationType, Mz,
    Result,
};

/// The symbol of the electron pseudo-modification, which carries charge but is never named
pub(crate) const ELECTRON: &str = "e";

// Public API ==========================================================================================================

impl AtomicModification {
    /// # Errors
    ///
    /// Fails if `kind` is [`ModificationType::Mixed`], since that's reserved for combinations of differing parts
    pub fn new(
        kind: ModificationType,
        name: impl Into<String>,
        formula: Option<&str>,
        mass: impl Into<Mass>,
        charge: i64,
    ) -> Result<Self> {
        let name = name.into();
        if kind == ModificationType::Mixed {
            return Err(Box::new(IonError::MixedAtomic { name }));
        }
        Ok(Self::build(
            kind,
            name,
            formula.map(ToOwned::to_owned),
            mass.into(),
            Charge(charge),
        ))
    }

    #[must_use]
    pub const fn kind(&self) -> ModificationType {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    /// The signed name of this modification (like `+Na` or `-H2O`), or nothing for the electron
    #[must_use]
    pub fn parsed_name(&self) -> &str {
        &self.parsed_name
    }

    #[must_use]
    pub fn is_electron(&self) -> bool {
        self.name == ELECTRON
    }

    #[must_use]
    pub fn with_charge(&self, charge: i64) -> Self {
        Self {
            charge: Charge(charge),
            ..self.clone()
        }
    }

    /// Turns a gain into a loss (or a loss into a gain), keeping the name, formula, and charge
    #[must_use]
    pub fn create_opposite(&self) -> Self {
        Self::build(
            self.kind,
            self.name.clone(),
            self.formula.clone(),
            -self.mass,
            self.charge,
        )
    }

    /// # Errors
    ///
    /// Fails if this modification carries no charge
    pub fn mz(&self, neutral_mass: Mass) -> Result<Mz> {
        neutral_mass.ionize(Count::default(), self.mass, self.charge, &self.parsed_name)
    }

    /// # Errors
    ///
    /// Fails if this modification carries no charge
    pub fn neutral_mass(&self, mz: Mz) -> Result<Mass> {
        mz.neutralize(Count::default(), self.mass, self.charge, &self.parsed_name)
    }
}

// Crate API ===========================================================================================================

impl AtomicModification {
    pub(crate) fn build(
        kind: ModificationType,
        name: String,
        formula: Option<String>,
        mass: Mass,
        charge: Charge,
    ) -> Self {
        let parsed_name = if name == ELECTRON {
            String::new()
        } else {
            format!("{}{name}", sign_of(mass))
        };
        Self {
            kind,
            name,
            formula,
            mass,
            charge,
            parsed_name,
        }
    }
}

impl AtomicModification {
    fn sort_key(&self) -> (bool, bool, &str, Mass, Charge) {
        (
            self.is_electron(),
            !self.mass.is_sign_negative(),
            &self.name,
            self.mass,
            self.charge,
        )
    }
}

pub(crate) fn sign_of(mass: Mass) -> char {
    if mass.is_sign_negative() {
        '-'
    } else {
        '+'
    }
}

// Massive and Charged Trait Implementations ===========================================================================

impl Massive for AtomicModification {
    fn mass(&self) -> Mass {
        self.mass
    }
}

impl Charged for AtomicModification {
    fn charge(&self) -> Charge {
        self.charge
    }
}

// Equality, Ordering, and Display Trait Implementations ===============================================================

impl PartialEq for AtomicModification {
    fn eq(&self, other: &Self) -> bool {
        self.parsed_name == other.parsed_name
            && self.mass == other.mass
            && self.charge == other.charge
    }
}

impl Eq for AtomicModification {}

impl Hash for AtomicModification {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parsed_name.hash(state);
        self.mass.hash(state);
        self.charge.hash(state);
    }
}

// NOTE: This is the order parts appear in combinations: electrons always come last, losses come before gains, and
// then parts are sorted by name, mass, and charge
impl Ord for AtomicModification {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for AtomicModification {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for AtomicModification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parsed_name)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn sodium() -> AtomicModification {
        AtomicModification::new(
            ModificationType::Adduct,
            "Na",
            Some("Na"),
            dec!(22.989218),
            1,
        )
        .unwrap()
    }

    fn water_loss() -> AtomicModification {
        AtomicModification::new(
            ModificationType::NeutralLoss,
            "H2O",
            Some("H2O"),
            dec!(-18.010565),
            0,
        )
        .unwrap()
    }

    fn electron() -> AtomicModification {
        AtomicModification::new(ModificationType::Adduct, "e", None, dec!(0.00054858), 1).unwrap()
    }

    #[test]
    fn new_modification() {
        let na = sodium();
        assert_eq!(na.kind(), ModificationType::Adduct);
        assert_eq!(na.name(), "Na");
        assert_eq!(na.formula(), Some("Na"));
        assert_eq!(na.mass(), Mass(dec!(22.989218)));
        assert_eq!(na.charge(), 1);
        assert_eq!(na.parsed_name(), "+Na");

        let mixed = AtomicModification::new(ModificationType::Mixed, "Na", None, dec!(1), 1);
        assert_eq!(
            mixed.unwrap_err(),
            Box::new(IonError::MixedAtomic {
                name: "Na".to_owned()
            })
        );
    }

    #[test]
    fn parsed_names() {
        assert_eq!(water_loss().parsed_name(), "-H2O");
        assert_eq!(water_loss().to_string(), "-H2O");
        assert_eq!(electron().parsed_name(), "");
        assert!(electron().is_electron());
        assert!(!sodium().is_electron());
    }

    #[test]
    fn opposites() {
        let water_gain = water_loss().create_opposite();
        assert_eq!(water_gain.parsed_name(), "+H2O");
        assert_eq!(water_gain.mass(), Mass(dec!(18.010565)));
        assert_eq!(water_gain.formula(), Some("H2O"));
        assert_eq!(water_gain.create_opposite(), water_loss());
    }

    #[test]
    fn with_charge() {
        let na = sodium();
        let na2 = na.with_charge(2);
        assert_eq!(na2.charge(), 2);
        assert_eq!(na2.mass(), na.mass());
        assert_eq!(na2.parsed_name(), na.parsed_name());
        assert_ne!(na2, na);
    }

    #[test]
    fn equality_ignores_type() {
        let cluster = AtomicModification::new(
            ModificationType::Cluster,
            "Na",
            None,
            dec!(22.989218),
            1,
        )
        .unwrap();
        assert_eq!(cluster, sodium());
        let heavier = AtomicModification::new(ModificationType::Adduct, "Na", None, dec!(23), 1);
        assert_ne!(heavier.unwrap(), sodium());
    }

    #[test]
    fn canonical_order() {
        let mut parts = vec![electron(), sodium(), water_loss()];
        parts.sort();
        assert_eq!(parts, [water_loss(), sodium(), electron()]);
    }

    #[test]
    fn mass_and_mz() {
        let na = sodium();
        let mz = na.mz(Mass(dec!(180.063))).unwrap();
        assert_eq!(mz, Mz(dec!(203.052218)));
        assert_eq!(na.neutral_mass(mz).unwrap(), Mass(dec!(180.063)));
        assert_eq!(
            water_loss().mz(Mass(dec!(180.063))),
            Err(IonError::zero_charge("-H2O"))
        );
        assert!(water_loss().neutral_mass(Mz(dec!(162))).is_err());
    }
}
