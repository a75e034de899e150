// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// Local Crate Imports
use crate::{
    AtomicDatabase, Charge, Charged, ChemicalFormula, Count, IonError, IonType, Mass, Massive,
    Modification, Mz, Result,
};

// Public API ==========================================================================================================

impl IonType {
    #[must_use]
    pub fn new(adduct: Modification) -> Self {
        Self::from_parts(Count::default(), adduct, None)
    }

    #[must_use]
    pub fn with_modification(adduct: Modification, modification: Modification) -> Self {
        Self::from_parts(Count::default(), adduct, Some(modification))
    }

    #[must_use]
    pub fn multimer(multiplier: Count, adduct: Modification) -> Self {
        Self::from_parts(multiplier, adduct, None)
    }

    #[must_use]
    pub fn from_parts(
        multiplier: Count,
        adduct: Modification,
        modification: Option<Modification>,
    ) -> Self {
        let modification_name = modification.as_ref().map_or("", Modification::parsed_name);
        let name = format!("{modification_name}{}", adduct.parsed_name());
        Self {
            multiplier,
            adduct,
            modification,
            name,
        }
    }

    #[must_use]
    pub const fn multiplier(&self) -> Count {
        self.multiplier
    }

    #[must_use]
    pub const fn adduct(&self) -> &Modification {
        &self.adduct
    }

    #[must_use]
    pub const fn modification(&self) -> Option<&Modification> {
        self.modification.as_ref()
    }

    /// Modifications come before the adduct, like `-H2O+Na`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn modification_count(&self) -> usize {
        self.modification.as_ref().map_or(0, Modification::part_count)
    }

    /// Keeps the adduct and multiplier, adding `modifications` to any this ion already has
    #[must_use]
    pub fn create_modified(&self, modifications: impl IntoIterator<Item = Modification>) -> Self {
        let combined = Modification::combine(self.modification.iter().cloned().chain(modifications));
        Self::from_parts(self.multiplier, self.adduct.clone(), combined)
    }

    /// Removes the modifications of `other` from this ion's. Unless both ions have modifications, nothing changes
    #[must_use]
    pub fn subtract_mods(&self, other: &Self) -> Self {
        match (&self.modification, &other.modification) {
            (Some(modification), Some(other)) => Self::from_parts(
                self.multiplier,
                self.adduct.clone(),
                modification.remove(other),
            ),
            _ => self.clone(),
        }
    }

    /// Whether this ion is `parent` with some extra modifications
    #[must_use]
    pub fn is_modification_of(&self, parent: &Self) -> bool {
        let Some(modification) = &self.modification else {
            return false;
        };
        let parent_is_subset = parent
            .modification
            .as_ref()
            .is_none_or(|parent| parent.is_subset_of(modification));

        parent.modification_count() < self.modification_count()
            && self.mass() != parent.mass()
            && self.adduct == parent.adduct
            && self.multiplier == parent.multiplier
            && self.charge() == parent.charge()
            && parent_is_subset
    }

    /// Builds the formula of this ion from that of its neutral molecule: the molecule is repeated once per multimer,
    /// then every gained part's formula is added and every lost part's formula removed. When `ionize` is set, the
    /// charge of the ion is added to that of `base`.
    ///
    /// # Errors
    ///
    /// Fails if a part (other than an electron) has no formula, or if a formula isn't valid
    pub fn add_to_formula<'a>(
        &self,
        db: &'a AtomicDatabase,
        base: &ChemicalFormula<'a>,
        ionize: bool,
    ) -> Result<ChemicalFormula<'a>> {
        let parts = self
            .adduct
            .parts()
            .iter()
            .chain(self.modification.iter().flat_map(Modification::parts))
            .filter(|part| !part.is_electron());

        let mut formula = base.repeated(self.multiplier);
        for part in parts {
            let part_formula = part
                .formula()
                .ok_or_else(|| IonError::missing_formula(part.name()))?;
            let part_formula = ChemicalFormula::new(db, part_formula)?;
            formula = if part.mass().is_sign_negative() {
                formula - part_formula
            } else {
                formula + part_formula
            };
        }

        let charge = if ionize {
            base.charge() + self.charge()
        } else {
            base.charge()
        };
        Ok(formula.with_charge(charge))
    }

    /// # Errors
    ///
    /// Fails if this ion carries no charge
    pub fn mz(&self, neutral_mass: Mass) -> Result<Mz> {
        neutral_mass.ionize(self.multiplier, self.mass(), self.charge(), self)
    }

    /// # Errors
    ///
    /// Fails if this ion carries no charge
    pub fn neutral_mass(&self, mz: Mz) -> Result<Mass> {
        mz.neutralize(self.multiplier, self.mass(), self.charge(), self)
    }
}

// Massive and Charged Trait Implementations ===========================================================================

impl Massive for IonType {
    fn mass(&self) -> Mass {
        self.adduct.mass() + self.modification.as_ref().map(Massive::mass).unwrap_or_default()
    }
}

impl Charged for IonType {
    fn charge(&self) -> Charge {
        self.adduct.charge()
    }
}

// Display Trait Implementation ========================================================================================

impl Display for IonType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            multiplier, name, ..
        } = self;
        write!(f, "[{multiplier}M{name}]")?;

        let charge = self.charge();
        let magnitude = charge.abs();
        if magnitude > Charge(1) {
            write!(f, "{magnitude}")?;
        }
        match charge.0.signum() {
            1 => write!(f, "+"),
            -1 => write!(f, "-"),
            _ => Ok(()),
        }
    }
}

// Module Tests ========================================================================================================
