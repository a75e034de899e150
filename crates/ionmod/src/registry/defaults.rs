use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{AtomicModification, Charge, Modification, ModificationType, modifications::ELECTRON};

use super::ModificationRegistry;

// NOTE: Everything is built in dependency order: atomic parts first, then the combinations made from them
pub(super) fn build() -> ModificationRegistry {
    use ModificationType::{Adduct, Cluster, Isotope, NeutralLoss};

    // Positive adducts
    let h = atomic(Adduct, "H", Some("H"), dec!(1.007276), 1);
    let electron_loss = atomic(Adduct, ELECTRON, None, ELECTRON_MASS, 1);
    let h2 = atomic(Adduct, "H2", Some("H2"), dec!(2.014552), 2);
    let na = atomic(Adduct, "Na", Some("Na"), dec!(22.989218), 1);
    let nh4 = atomic(Adduct, "NH4", Some("NH4"), dec!(18.033823), 1);
    let k = atomic(Adduct, "K", Some("K"), dec!(38.963158), 1);
    let ca = atomic(Adduct, "Ca", Some("Ca"), dec!(39.961493820), 2);
    let mg = atomic(Adduct, "Mg", Some("Mg"), dec!(23.983944537), 2);
    let fe = atomic(Adduct, "Fe", Some("Fe"), dec!(55.933839170), 2);

    // Negative adducts
    let h_loss = atomic(Adduct, "H", Some("H"), dec!(-1.007276), -1);
    let electron_gain = atomic(Adduct, ELECTRON, None, -ELECTRON_MASS, -1);
    let f = atomic(Adduct, "F", Some("F"), dec!(18.998950), -1);
    let cl = atomic(Adduct, "Cl", Some("Cl"), dec!(34.969402), -1);
    let br = atomic(Adduct, "Br", Some("Br"), dec!(78.918885), -1);
    let formate = atomic(Adduct, "FA", Some("CHO2"), dec!(44.998201), -1);

    // Neutral losses and clusters
    let h2o = atomic(NeutralLoss, "H2O", Some("H2O"), dec!(-18.010565), 0);
    let nh3 = atomic(NeutralLoss, "NH3", Some("NH3"), dec!(-17.026549), 0);
    let co = atomic(NeutralLoss, "CO", Some("CO"), dec!(-27.994915), 0);
    let co2 = atomic(NeutralLoss, "CO2", Some("CO2"), dec!(-43.989829), 0);
    let c2h4 = atomic(NeutralLoss, "C2H4", Some("C2H4"), dec!(-28.031300), 0);
    let formic_acid = atomic(Cluster, "HFA", Some("CH2O2"), dec!(46.005479), 0);
    let acetic_acid = atomic(Cluster, "HAc", Some("C2H4O2"), dec!(60.021129), 0);
    let methanol = atomic(Cluster, "MeOH", Some("CH4O"), dec!(32.026215), 0);
    let acetonitrile = atomic(Cluster, "ACN", Some("C2H3N"), dec!(41.026549), 0);
    let isopropanol = atomic(Cluster, "IsoProp", Some("C3H8O"), dec!(60.058064), 0);

    // Isotopes
    let carbon_13 = atomic(Isotope, "(13C)", None, dec!(1.003354838), 0);

    let waters = |n| combine(vec![&h2o; n]);
    let positive = vec![
        h.clone(),
        electron_loss,
        h2,
        na.clone(),
        nh4.clone(),
        k.clone(),
        ca,
        mg,
        fe,
        combine(vec![&h, &na]),
        combine(vec![&h, &nh4]),
        combine(vec![&h, &k]),
        combine(vec![&na, &na, &h_loss]),
        combine(vec![&k, &k, &h_loss]),
    ];
    let negative = vec![
        h_loss.clone(),
        electron_gain,
        f,
        cl,
        br,
        formate,
        combine(vec![&na, &h_loss, &h_loss]),
        combine(vec![&k, &h_loss, &h_loss]),
    ];
    let neutral = vec![
        h2o.clone(),
        waters(2),
        waters(3),
        waters(4),
        waters(5),
        nh3,
        co,
        co2,
        c2h4,
        formic_acid,
        acetic_acid,
        methanol,
        acetonitrile,
        isopropanol,
    ];
    let isotopes = vec![carbon_13];

    ModificationRegistry {
        positive,
        negative,
        neutral,
        isotopes,
    }
}

pub(super) const ELECTRON_MASS: Decimal = dec!(0.00054858);

pub(super) fn electron(charge: Charge) -> Modification {
    let mass = if charge.0 < 0 {
        -ELECTRON_MASS
    } else {
        ELECTRON_MASS
    };
    atomic(ModificationType::Adduct, ELECTRON, None, mass, charge.0.signum())
}

fn atomic(
    kind: ModificationType,
    name: &str,
    formula: Option<&str>,
    mass: Decimal,
    charge: i64,
) -> Modification {
    AtomicModification::build(
        kind,
        name.to_owned(),
        formula.map(ToOwned::to_owned),
        mass.into(),
        Charge(charge),
    )
    .into()
}

fn combine(parts: Vec<&Modification>) -> Modification {
    let parts = parts.into_iter().flat_map(Modification::parts).cloned().collect();
    // SAFETY: Every combination above is built from at least two parts
    Modification::from_parts(parts).unwrap()
}

#[cfg(test)]
mod tests {
    use crate::{Charged, Mass, Massive};

    use super::*;

    #[test]
    fn default_catalogs() {
        let registry = build();
        assert_eq!(registry.positive.len(), 14);
        assert_eq!(registry.negative.len(), 8);
        assert_eq!(registry.neutral.len(), 14);
        assert_eq!(registry.isotopes.len(), 1);

        assert!(registry.positive.iter().all(|m| m.charge() > Charge(0)));
        assert!(registry.negative.iter().all(|m| m.charge() < Charge(0)));
        assert!(registry.neutral.iter().all(|m| m.charge().is_zero()));
    }

    #[test]
    fn default_combinations() {
        let registry = build();
        let names: Vec<_> = registry.positive[9..].iter().map(Modification::parsed_name).collect();
        assert_eq!(names, ["+H+Na", "+H+NH4", "+H+K", "-H+2Na", "-H+2K"]);
        let sodium_dimer = &registry.positive[12];
        assert_eq!(sodium_dimer.mass(), Mass(dec!(44.971160)));
        assert_eq!(sodium_dimer.charge(), 1);

        let waters = &registry.neutral[4];
        assert_eq!(waters.parsed_name(), "-5H2O");
        assert_eq!(waters.mass(), Mass(dec!(-90.052825)));
    }

    #[test]
    fn electrons() {
        let lost = electron(Charge(1));
        assert_eq!(lost.mass(), Mass(ELECTRON_MASS));
        assert_eq!(lost.charge(), 1);
        assert_eq!(lost.parsed_name(), "");
        let gained = electron(Charge(-3));
        assert_eq!(gained.mass(), Mass(-ELECTRON_MASS));
        assert_eq!(gained.charge(), -1);
    }
}
