use std::{
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

use itertools::Itertools;

use crate::{AtomicModification, Charge, Charged, CombinedModification, Mass, Massive, ModificationType};

use super::atomic::sign_of;

impl CombinedModification {
    // NOTE: Callers must pass at least two parts, already in canonical order
    pub(crate) fn new(parts: Vec<AtomicModification>) -> Self {
        let kind = ModificationType::common(parts.iter().map(AtomicModification::kind));
        let mass = parts.iter().map(Massive::mass).sum();
        let charge = parts.iter().map(Charged::charge).sum();
        let parsed_name = run_length_name(&parts);
        Self {
            parts,
            kind,
            mass,
            charge,
            parsed_name,
        }
    }

    #[must_use]
    pub fn parts(&self) -> &[AtomicModification] {
        &self.parts
    }

    #[must_use]
    pub const fn kind(&self) -> ModificationType {
        self.kind
    }

    #[must_use]
    pub fn parsed_name(&self) -> &str {
        &self.parsed_name
    }
}

/// Collapses runs of parts sharing a name and sign into a single counted token, like `-2H2O`. Electrons aren't named
fn run_length_name(parts: &[AtomicModification]) -> String {
    let runs = parts
        .iter()
        .filter(|part| !part.is_electron())
        .chunk_by(|&part| (part.name(), sign_of(part.mass())));
    runs.into_iter()
        .map(|((name, sign), run)| match run.count() {
            1 => format!("{sign}{name}"),
            count => format!("{sign}{count}{name}"),
        })
        .collect()
}

impl Massive for CombinedModification {
    fn mass(&self) -> Mass {
        self.mass
    }
}

impl Charged for CombinedModification {
    fn charge(&self) -> Charge {
        self.charge
    }
}

impl PartialEq for CombinedModification {
    fn eq(&self, other: &Self) -> bool {
        self.parsed_name == other.parsed_name
            && self.mass == other.mass
            && self.charge == other.charge
    }
}

impl Eq for CombinedModification {}

impl Hash for CombinedModification {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parsed_name.hash(state);
        self.mass.hash(state);
        self.charge.hash(state);
    }
}

impl Display for CombinedModification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parsed_name)
    }
}
