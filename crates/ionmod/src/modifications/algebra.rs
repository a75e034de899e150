// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    ops::Add,
    slice,
};

// Local Crate Imports
use crate::{
    AtomicModification, Charge, Charged, CombinedModification, Count, Mass, Massive, Modification,
    ModificationType, Mz, Result,
};

// Public API ==========================================================================================================

impl Modification {
    /// Flattens every modification into its parts, then rebuilds them into a single modification in canonical order.
    /// Returns `None` when given nothing to combine
    pub fn combine(modifications: impl IntoIterator<Item = Self>) -> Option<Self> {
        let parts = modifications
            .into_iter()
            .flat_map(Self::into_parts)
            .collect();
        Self::from_parts(parts)
    }

    #[must_use]
    pub fn parts(&self) -> &[AtomicModification] {
        match self {
            Self::Atomic(atomic) => slice::from_ref(atomic),
            Self::Combined(combined) => combined.parts(),
        }
    }

    #[must_use]
    pub fn into_parts(self) -> Vec<AtomicModification> {
        match self {
            Self::Atomic(atomic) => vec![atomic],
            Self::Combined(combined) => combined.parts,
        }
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts().len()
    }

    /// The name of an atomic modification, or the canonical name of a combination
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Atomic(atomic) => atomic.name(),
            Self::Combined(combined) => combined.parsed_name(),
        }
    }

    #[must_use]
    pub fn parsed_name(&self) -> &str {
        match self {
            Self::Atomic(atomic) => atomic.parsed_name(),
            Self::Combined(combined) => combined.parsed_name(),
        }
    }

    /// Only atomic modifications carry a formula. Combinations keep one per part
    #[must_use]
    pub fn formula(&self) -> Option<&str> {
        match self {
            Self::Atomic(atomic) => atomic.formula(),
            Self::Combined(_) => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ModificationType {
        match self {
            Self::Atomic(atomic) => atomic.kind(),
            Self::Combined(combined) => combined.kind(),
        }
    }

    #[must_use]
    pub fn create_opposite(&self) -> Self {
        match self {
            Self::Atomic(atomic) => Self::Atomic(atomic.create_opposite()),
            Self::Combined(combined) => {
                let mut parts: Vec<_> = combined
                    .parts()
                    .iter()
                    .map(AtomicModification::create_opposite)
                    .collect();
                parts.sort();
                Self::Combined(CombinedModification::new(parts))
            }
        }
    }

    #[must_use]
    pub fn contains(&self, part: &AtomicModification) -> bool {
        self.parts().contains(part)
    }

    /// Multiset containment: every part of `self` needs its own matching part in `parent`, so `-2H2O` is not a subset
    /// of `-H2O`
    #[must_use]
    pub fn is_subset_of(&self, parent: &Self) -> bool {
        let parent = parent.parts();
        let mut used = vec![false; parent.len()];
        self.parts().iter().all(|part| {
            let unused_match = (0..parent.len()).find(|&i| !used[i] && parent[i] == *part);
            if let Some(i) = unused_match {
                used[i] = true;
            }
            unused_match.is_some()
        })
    }

    /// Multiset difference, removing one matching part for every part of `other`. Returns `None` if nothing remains
    #[must_use]
    pub fn remove(&self, other: &Self) -> Option<Self> {
        let mut remaining = self.parts().to_vec();
        for part in other.parts() {
            if let Some(i) = remaining.iter().position(|p| p == part) {
                remaining.remove(i);
            }
        }
        Self::from_parts(remaining)
    }

    /// # Errors
    ///
    /// Fails if this modification carries no charge
    pub fn mz(&self, neutral_mass: Mass) -> Result<Mz> {
        neutral_mass.ionize(Count::default(), self.mass(), self.charge(), self.parsed_name())
    }

    /// # Errors
    ///
    /// Fails if this modification carries no charge
    pub fn neutral_mass(&self, mz: Mz) -> Result<Mass> {
        mz.neutralize(Count::default(), self.mass(), self.charge(), self.parsed_name())
    }
}

// Crate API ===========================================================================================================

impl Modification {
    pub(crate) fn from_parts(mut parts: Vec<AtomicModification>) -> Option<Self> {
        parts.sort();
        match parts.len() {
            0 => None,
            1 => parts.pop().map(Self::Atomic),
            _ => Some(Self::Combined(CombinedModification::new(parts))),
        }
    }
}

// Conversion and Operator Trait Implementations =======================================================================

impl From<AtomicModification> for Modification {
    fn from(value: AtomicModification) -> Self {
        Self::Atomic(value)
    }
}

impl From<CombinedModification> for Modification {
    fn from(value: CombinedModification) -> Self {
        Self::Combined(value)
    }
}

impl Add for Modification {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let mut parts = self.into_parts();
        parts.extend(rhs.into_parts());
        parts.sort();
        Self::Combined(CombinedModification::new(parts))
    }
}

// Massive and Charged Trait Implementations ===========================================================================

impl Massive for Modification {
    fn mass(&self) -> Mass {
        match self {
            Self::Atomic(atomic) => atomic.mass(),
            Self::Combined(combined) => combined.mass(),
        }
    }
}

impl Charged for Modification {
    fn charge(&self) -> Charge {
        match self {
            Self::Atomic(atomic) => atomic.charge(),
            Self::Combined(combined) => combined.charge(),
        }
    }
}

// Equality and Display Trait Implementations ==========================================================================

impl PartialEq for Modification {
    fn eq(&self, other: &Self) -> bool {
        self.parsed_name() == other.parsed_name()
            && self.mass() == other.mass()
            && self.charge() == other.charge()
    }
}

impl Eq for Modification {}

impl Hash for Modification {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parsed_name().hash(state);
        self.mass().hash(state);
        self.charge().hash(state);
    }
}

impl Display for Modification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.parsed_name())
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::IonError;

    use super::*;

    fn atomic(kind: ModificationType, name: &str, mass: Decimal, charge: i64) -> Modification {
        AtomicModification::new(kind, name, Some(name), mass, charge)
            .unwrap()
            .into()
    }

    fn h() -> Modification {
        atomic(ModificationType::Adduct, "H", dec!(1.007276), 1)
    }

    fn na() -> Modification {
        atomic(ModificationType::Adduct, "Na", dec!(22.989218), 1)
    }

    fn h2o() -> Modification {
        atomic(ModificationType::NeutralLoss, "H2O", dec!(-18.010565), 0)
    }

    fn nh3() -> Modification {
        atomic(ModificationType::NeutralLoss, "NH3", dec!(-17.026549), 0)
    }

    fn electron() -> Modification {
        atomic(ModificationType::Adduct, "e", dec!(0.00054858), 1)
    }

    fn combine<const N: usize>(modifications: [Modification; N]) -> Modification {
        Modification::combine(modifications).unwrap()
    }

    #[test]
    fn combine_protonated_water_loss() {
        let combined = combine([h(), h2o()]);
        assert_eq!(combined.mass(), Mass(dec!(-17.003289)));
        assert_eq!(combined.charge(), 1);
        assert_eq!(combined.parsed_name(), "-H2O+H");
        assert_eq!(combined.name(), "-H2O+H");
        assert_eq!(combined.kind(), ModificationType::Mixed);
        assert_eq!(combined.formula(), None);
    }

    #[test]
    fn combine_is_order_independent() {
        let orders = [
            combine([h2o(), h2o(), na()]),
            combine([na(), h2o(), h2o()]),
            combine([h2o(), na(), h2o()]),
            combine([combine([na(), h2o()]), h2o()]),
        ];
        for combined in &orders {
            assert_eq!(combined.parsed_name(), "-2H2O+Na");
            assert_eq!(combined.mass(), Mass(dec!(-13.031912)));
            assert_eq!(combined, &orders[0]);
        }
    }

    #[test]
    fn combine_edge_cases() {
        assert_eq!(Modification::combine(std::iter::empty()), None);
        let single = combine([na()]);
        assert!(matches!(single, Modification::Atomic(_)));
        assert_eq!(single, na());
        let ionized = combine([electron(), h2o()]);
        assert_eq!(ionized.parsed_name(), "-H2O");
        assert_eq!(ionized.charge(), 1);
        assert_eq!(combine([electron(), electron()]).parsed_name(), "");
    }

    #[test]
    fn add_operator() {
        let combined = na() + h2o();
        assert_eq!(combined, combine([h2o(), na()]));
        assert_eq!(combined.part_count(), 2);
        assert_eq!((combined + na()).parsed_name(), "-H2O+2Na");
    }

    #[test]
    fn opposites() {
        let combined = combine([h2o(), nh3()]);
        let opposite = combined.create_opposite();
        assert_eq!(opposite.parsed_name(), "+H2O+NH3");
        assert_eq!(opposite.mass(), -combined.mass());
        assert_eq!(opposite.create_opposite(), combined);
        assert_eq!(h2o().create_opposite().parsed_name(), "+H2O");
    }

    #[test]
    fn subsets_respect_multiplicity() {
        let one_water = h2o();
        let two_waters = combine([h2o(), h2o()]);
        assert!(one_water.is_subset_of(&two_waters));
        assert!(!two_waters.is_subset_of(&one_water));
        assert!(two_waters.is_subset_of(&combine([h2o(), na(), h2o()])));
        assert!(!nh3().is_subset_of(&two_waters));
        assert!(two_waters.contains(&one_water.parts()[0]));
        assert!(!two_waters.contains(&na().parts()[0]));
    }

    #[test]
    fn remove_parts() {
        let combined = combine([h2o(), h2o(), na()]);
        let no_sodium = combined.remove(&na()).unwrap();
        assert_eq!(no_sodium.parsed_name(), "-2H2O");
        let one_water = no_sodium.remove(&h2o()).unwrap();
        assert!(matches!(one_water, Modification::Atomic(_)));
        assert_eq!(one_water, h2o());
        assert_eq!(one_water.remove(&h2o()), None);
        // Removing parts that aren't there changes nothing
        assert_eq!(combined.remove(&nh3()), Some(combined.clone()));
    }

    #[test]
    fn mass_and_mz() {
        let sodiated = combine([h2o(), na()]);
        let mz = sodiated.mz(Mass(dec!(180.063))).unwrap();
        assert_eq!(mz, Mz(dec!(185.041653)));
        assert_eq!(sodiated.neutral_mass(mz).unwrap(), Mass(dec!(180.063)));

        let doubly = combine([h(), h()]);
        assert_eq!(doubly.mz(Mass(dec!(180))).unwrap(), Mz(dec!(91.007276)));
        assert_eq!(h2o().mz(Mass(dec!(180))), Err(IonError::zero_charge("-H2O")));
        assert!(combine([h2o(), nh3()]).neutral_mass(Mz(dec!(180))).is_err());
    }
}
