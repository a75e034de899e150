// Standard Library Imports
use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Neg, Sub},
};

// External Crate Imports
use nom_miette::final_parser;

// Local Crate Imports
use crate::{
    AtomicDatabase, Charge, Charged, ChemicalFormula, Count, Element, Mass, Massive, Particle,
    Result, parsers::chemical_formula::chemical_formula,
};

// Public API ==========================================================================================================

impl<'a> ChemicalFormula<'a> {
    pub fn new(db: &'a AtomicDatabase, formula: impl AsRef<str>) -> Result<Self> {
        let mut parser = final_parser(chemical_formula(db));
        parser(formula.as_ref()).map_err(|e| Box::new(e.into()))
    }

    /// Overrides the declared charge without changing any atoms or particles
    #[must_use]
    pub fn with_charge(self, charge: Charge) -> Self {
        Self {
            charge,
            ..self
        }
    }

    #[must_use]
    pub fn repeated(&self, count: Count) -> Self {
        let times = i64::from(count.get());
        let atoms = self.atoms.iter().map(|(e, n)| (e.clone(), n * times));
        let particles = self.particles.iter().map(|(p, n)| (p.clone(), n * times));
        let formula = Self::from_parts(atoms, particles);
        formula.with_charge(self.charge * count)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty() && self.particles.is_empty()
    }

    pub(crate) fn from_parts(
        atoms: impl IntoIterator<Item = (Element<'a>, i64)>,
        particles: impl IntoIterator<Item = (Particle<'a>, i64)>,
    ) -> Self {
        let atoms = merge_counts(atoms, |e| (e.symbol, e.mass_number));
        let particles = merge_counts(particles, |p| p.symbol);
        let charge = particles
            .iter()
            .map(|&(ref particle, n)| Charge(particle.charge.0 * n))
            .sum();
        Self {
            atoms,
            particles,
            charge,
        }
    }
}

// Arithmetic Trait Implementations ====================================================================================

impl<'a> Add for ChemicalFormula<'a> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let charge = self.charge + rhs.charge;
        Self::from_parts(
            self.atoms.into_iter().chain(rhs.atoms),
            self.particles.into_iter().chain(rhs.particles),
        )
        .with_charge(charge)
    }
}

impl Neg for ChemicalFormula<'_> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            atoms: self.atoms.into_iter().map(|(e, n)| (e, -n)).collect(),
            particles: self.particles.into_iter().map(|(p, n)| (p, -n)).collect(),
            charge: -self.charge,
        }
    }
}

impl<'a> Sub for ChemicalFormula<'a> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

// Massive and Charged Trait Implementations ===========================================================================

impl Massive for ChemicalFormula<'_> {
    fn mass(&self) -> Mass {
        let atom_masses = self.atoms.iter().map(|&(ref e, n)| e.mass() * n);
        let particle_masses = self.particles.iter().map(|&(ref p, n)| p.mass() * n);
        atom_masses.chain(particle_masses).sum()
    }
}

impl Charged for ChemicalFormula<'_> {
    fn charge(&self) -> Charge {
        self.charge
    }
}

// Display Trait Implementation ========================================================================================

// NOTE: Atoms are written in Hill order: carbon, then hydrogen, then everything else alphabetically. Without any
// carbon, everything (hydrogen included) is alphabetical
impl Display for ChemicalFormula<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let has_carbon = self.atoms.iter().any(|(e, _)| e.symbol == "C");
        let hill_rank = |e: &Element| match e.symbol {
            "C" if has_carbon => 0,
            "H" if has_carbon => 1,
            _ => 2,
        };
        let mut atoms: Vec<_> = self.atoms.iter().collect();
        atoms.sort_by_key(|(e, _)| (hill_rank(e), e.symbol, e.mass_number));

        for &(ref element, n) in atoms {
            write!(f, "{element}")?;
            if n != 1 {
                write!(f, "{n}")?;
            }
        }

        for &(ref particle, n) in &self.particles {
            if !self.atoms.is_empty() || n < 0 {
                let sign = if n < 0 { "-" } else { "+" };
                write!(f, "{sign}")?;
            }
            if n.abs() != 1 {
                write!(f, "{}", n.abs())?;
            }
            write!(f, "{particle}")?;
        }

        Ok(())
    }
}

// Private Helper Functions ============================================================================================

fn merge_counts<T, K: Ord>(
    items: impl IntoIterator<Item = (T, i64)>,
    key: impl Fn(&T) -> K,
) -> Vec<(T, i64)> {
    let mut merged: Vec<(T, i64)> = Vec::new();
    for (item, n) in items {
        if let Some((_, total)) = merged.iter_mut().find(|(m, _)| key(m) == key(&item)) {
            *total += n;
        } else {
            merged.push((item, n));
        }
    }
    merged.retain(|&(_, n)| n != 0);
    merged.sort_by_key(|(item, _)| key(item));
    merged
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use rust_decimal_macros::dec;

    use miette::Diagnostic;

    use crate::{
        IonError,
        parsers::errors::{ParseError, ParseErrorKind},
    };

    use super::*;

    static DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

    fn formula(formula: &str) -> ChemicalFormula<'static> {
        ChemicalFormula::new(&DB, formula).unwrap()
    }

    fn parse_error(formula: &str) -> ParseError {
        match *ChemicalFormula::new(&DB, formula).unwrap_err() {
            IonError::Formula { error } => error,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn labels(formula: &str) -> Vec<String> {
        parse_error(formula)
            .labels()
            .into_iter()
            .flatten()
            .filter_map(|l| l.label().map(ToOwned::to_owned))
            .collect()
    }

    #[test]
    fn formula_errors() {
        // Looking up elements, isotopes, and particles that don't exist
        assert_eq!(labels("H2Xx"), ["element not found"]);
        assert_eq!(labels("[100Tc]"), ["isotope not found"]);
        assert_eq!(labels("H2O+m"), ["particle not found"]);
        // Elements without natural abundances need an explicit isotope
        assert_eq!(labels("HTcO4"), ["no natural abundance"]);
        assert!(ChemicalFormula::new(&DB, "H[99Tc]O4").is_ok());
        // Counts can't be zero or have leading zeroes
        assert_eq!(labels("C3H06"), ["expected non-zero"]);
        assert_eq!(labels("C3H0"), ["expected non-zero"]);
        // Trailing input
        let error = parse_error("H2O,");
        assert_eq!(error.kind(), &ParseErrorKind::Incomplete);
        assert_eq!(labels("H2O,"), ["input was valid up until this point"]);
        // Formulas must start with an element, isotope, or particle
        let error = parse_error("-H2O");
        assert_eq!(error.kind(), &ParseErrorKind::ExpectedChemicalFormula);
    }

    #[test]
    fn formula_display() {
        let formulae = [
            "2p",
            "C6H12O6",
            "C2H3N",
            "H2O",
            "HN3",
            "Na-e",
            "Ca-2e",
            "H3N+p",
            "[13C]H4",
            "C[13C]H4O",
            "e",
        ];
        for f in formulae {
            assert_eq!(formula(f).to_string(), f);
        }
        assert_eq!(formula("NH3").to_string(), "H3N");
        assert_eq!(formula("OHCH3").to_string(), "CH4O");
    }

    #[test]
    fn formula_mass() {
        assert_eq!(formula("H2O").mass(), Mass(dec!(18.01056468403)));
        assert_eq!(formula("C6H12O6").mass(), Mass(dec!(180.06338810418)));
        assert_eq!(formula("[13C]H4").mass(), Mass(dec!(17.03465496399)));
        assert_eq!(formula("Na-e").mass(), Mass(dec!(22.989220702050935)));
        assert_eq!(formula("H2O+p").mass(), Mass(dec!(19.017841150651)));
    }

    #[test]
    fn formula_charge() {
        assert_eq!(formula("H2O").charge(), 0);
        assert_eq!(formula("Na-e").charge(), 1);
        assert_eq!(formula("Ca-2e").charge(), 2);
        assert_eq!(formula("Cl+e").charge(), -1);
        assert_eq!(formula("3p").charge(), 3);
        assert_eq!(formula("H2O").with_charge(Charge(-2)).charge(), -2);
    }

    #[test]
    fn formula_arithmetic() {
        let glucose = formula("C6H12O6");
        let water = formula("H2O");
        assert_eq!((glucose.clone() - water.clone()).to_string(), "C6H10O5");
        assert_eq!((glucose.clone() + formula("Na")).to_string(), "C6H12NaO6");
        assert_eq!(
            glucose.repeated(Count::new(2).unwrap()).mass(),
            Mass(dec!(360.12677620836))
        );
        assert_eq!(
            water.repeated(Count::new(3).unwrap()).mass(),
            Mass(dec!(54.03169405209))
        );
        assert!((water.clone() - water).is_empty());
        let sodiated = formula("H2O") + formula("Na-e");
        assert_eq!(sodiated.to_string(), "H2NaO-e");
        assert_eq!(sodiated.charge(), 1);
    }
}
