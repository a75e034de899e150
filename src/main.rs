use std::sync::LazyLock;

use ionmod::{
    AtomicDatabase, Charged, ChemicalFormula, IonType, Mass, Massive, ModificationRegistry, Result,
    parse_ion_type,
};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, IntoDiagnostic};
use rust_decimal::Decimal;
use rustyline::DefaultEditor;

static DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

fn main() -> miette::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut rl = DefaultEditor::new().into_diagnostic()?;
    while let Ok(line) = rl.readline("Ion (and optional formula or mass): ") {
        rl.add_history_entry(&line).into_diagnostic()?;
        match ion_info(&line) {
            Ok(info) => print!("{info}"),
            Err(diagnostic) => render_error(*diagnostic)?,
        }
    }
    Ok(())
}

// NOTE: Lines look like `[2M-H2O+Na]+ C6H12O6` or `[M+H]+ 180.063388`
fn ion_info(line: &str) -> Result<String> {
    let mut words = line.split_whitespace();
    let Some(notation) = words.next() else {
        return Ok(String::new());
    };
    let ion = parse_ion_type(ModificationRegistry::defaults(), &DB, notation)?;

    let mut lines = vec![
        format!("Ion: {ion}"),
        format!("Adduct: {}", ion.adduct()),
    ];
    if let Some(modification) = ion.modification() {
        lines.push(format!("Modification: {modification}"));
    }
    lines.push(format!("Mass Shift: {}", decimal_round_workaround(ion.mass(), 6)));
    lines.push(format!("Charge: {}", ion.charge()));

    if let Some(molecule) = words.next() {
        lines.extend(molecule_info(&ion, molecule)?);
    }

    lines.push(String::new());
    Ok(lines.join("\n") + "\n")
}

fn molecule_info(ion: &IonType, molecule: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let neutral_mass = if let Ok(mass) = Decimal::from_str_exact(molecule) {
        Mass::from(mass)
    } else {
        let formula = ChemicalFormula::new(&DB, molecule)?;
        let ion_formula = ion.add_to_formula(&DB, &formula, true)?;
        lines.push(format!("Ion Formula: {ion_formula}"));
        formula.mass()
    };

    let mz = ion.mz(neutral_mass)?;
    lines.push(format!(
        "Neutral Mass: {}",
        decimal_round_workaround(neutral_mass, 6)
    ));
    lines.push(format!("m/z: {}", decimal_round_workaround(mz, 6)));
    Ok(lines)
}

fn render_error(diagnostic: impl Into<Box<dyn Diagnostic + 'static>>) -> miette::Result<()> {
    let mut buf = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode())
        .render_report(&mut buf, diagnostic.into().as_ref())
        .into_diagnostic()?;
    println!("{buf}");
    Ok(())
}

// FIXME: Really this should be fixed in `rust_decimal`...
fn decimal_round_workaround(value: impl Into<Decimal>, decimal_points: u32) -> String {
    let value = value.into().round_dp(decimal_points);
    format!("{value}")
}
