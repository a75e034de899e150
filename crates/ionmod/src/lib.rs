//! An algebra over the ion modifications (adducts, neutral losses, clusters, and isotopes) used when annotating mass
//! spectrometry data

pub mod atoms;
pub mod codec;
pub mod errors;
mod ion_type;
mod kdl;
pub mod modifications;
pub mod parsers;
pub mod registry;
mod tolerance;

// Standard Library Imports
use std::num::NonZeroU32;

// External Crate Imports
use ahash::HashMap;
use derive_more::{Add, AddAssign, Display, From, Into, Neg, Sub, SubAssign, Sum};
use rust_decimal::Decimal;

// FIXME: Work on what's publicly exported / part of the API! Maybe create a prelude?
pub use atoms::atomic_database::AtomicDatabase;
pub use errors::{IonError, Result};
pub use parsers::ion_notation::{MAX_ION_COUNT, parse_ion_type};
pub use registry::ModificationRegistry;

// Quantities ==========================================================================================================

/// A (signed) mass in daltons, kept as an exact decimal so that sums of catalog values stay exact
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Display,
    From,
    Into,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Neg,
    Sum,
)]
pub struct Mass(Decimal);

/// A mass-to-charge ratio, as measured by a mass spectrometer
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Display, From, Into, Sub,
)]
pub struct Mz(Decimal);

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Default,
    Display,
    From,
    Into,
    Add,
    AddAssign,
    Sub,
    Neg,
    Sum,
)]
pub struct Charge(i64);

/// A strictly positive count, used for molecule multipliers and repeated modifications
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Count(NonZeroU32);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Into)]
pub struct MassNumber(NonZeroU32);

// Modifications =======================================================================================================

/// What sort of chemical change a modification describes
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum ModificationType {
    Adduct,
    UndefinedAdduct,
    NeutralLoss,
    Cluster,
    Isotope,
    #[default]
    Unknown,
    // NOTE: Only ever derived from a combination of parts with differing types, never assigned to an atomic part
    Mixed,
}

/// Whether something is added to or removed from a molecule
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum OffsetKind {
    Add,
    Remove,
}

/// The sign of an ion's charge, or `Any` when searching both positive and negative ions
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
    #[default]
    Any,
}

/// An indivisible, named mass and charge delta
#[derive(Clone, Debug)]
pub struct AtomicModification {
    kind: ModificationType,
    name: String,
    formula: Option<String>,
    mass: Mass,
    charge: Charge,
    parsed_name: String,
}

/// Two or more atomic parts, kept in canonical order
#[derive(Clone, Debug)]
pub struct CombinedModification {
    parts: Vec<AtomicModification>,
    kind: ModificationType,
    mass: Mass,
    charge: Charge,
    parsed_name: String,
}

#[derive(Clone, Debug)]
pub enum Modification {
    Atomic(AtomicModification),
    Combined(CombinedModification),
}

/// An adduct, an optional set of modifications, and the number of molecules carrying them
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct IonType {
    multiplier: Count,
    adduct: Modification,
    modification: Option<Modification>,
    name: String,
}

/// A tolerance for comparing m/z values. The wider of an absolute window and a parts-per-million window is used
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct MzTolerance {
    absolute: Decimal,
    ppm: Decimal,
}

// Chemistry ===========================================================================================================

/// A chemical formula, optionally offset by charged particles, with a declared charge
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ChemicalFormula<'a> {
    atoms: Vec<(Element<'a>, i64)>,
    particles: Vec<(Particle<'a>, i64)>,
    charge: Charge,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Element<'a> {
    symbol: &'a str,
    name: &'a str,
    mass_number: Option<MassNumber>,
    isotopes: &'a HashMap<MassNumber, Isotope>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Particle<'a> {
    symbol: &'a str,
    name: &'a str,
    mass: &'a Mass,
    charge: &'a Charge,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Isotope {
    relative_mass: Mass,
    abundance: Option<Decimal>,
}

// Traits ==============================================================================================================

pub trait Massive {
    fn mass(&self) -> Mass;
}

pub trait Charged {
    fn charge(&self) -> Charge;

    fn polarity(&self) -> Polarity {
        Polarity::of(self.charge())
    }
}

/// Looks up the monoisotopic mass of a chemical formula, like `H2O` or `C6H12O6`
pub trait FormulaMass {
    fn formula_mass(&self, formula: &str) -> Result<Mass>;
}

// Blanket impls

macro_rules! massive_ref_impls {
    ($($ref_type:ty),+ $(,)?) => {
        $(
            impl<T: Massive + ?Sized> Massive for $ref_type {
                fn mass(&self) -> Mass {
                    (**self).mass()
                }
            }
        )+
    };
}

massive_ref_impls!(&T, &mut T, Box<T>);

macro_rules! charged_ref_impls {
    ($($ref_type:ty),+ $(,)?) => {
        $(
            impl<T: Charged + ?Sized> Charged for $ref_type {
                fn charge(&self) -> Charge {
                    (**self).charge()
                }
            }
        )+
    };
}

charged_ref_impls!(&T, &mut T, Box<T>);
