// Standard Library Imports
use std::iter;

// External Crate Imports
use nom::{
    Parser,
    bytes::complete::take_while,
    character::complete::{char, satisfy},
    combinator::{cut, opt, recognize},
    multi::many0,
    sequence::{pair, preceded, tuple},
};
use nom_miette::{expect, final_parser, map_res, wrap_err};

// Local Crate Imports
use super::{
    errors::{CountTooLarge, ParseErrorKind, ParseResult},
    primitives::{count, offset_kind},
};
use crate::{
    AtomicDatabase, Charge, Charged, Count, IonError, IonType, Modification, ModificationRegistry,
    Result,
};

/// The largest multiplier, charge, or modification count allowed in ion notation
pub const MAX_ION_COUNT: u32 = 1000;

// Public API ==========================================================================================================

/// Parses ion notation like `[M+H]+`, `[2M-H2O+Na]+`, or `[M-2H]2-`, looking up every modification in `registry`.
///
/// Charged modifications make up the adduct, and the rest become the ion's modification. An ion without any charged
/// modifications (like `[M]+`) is charged by losing or gaining electrons.
///
/// # Errors
///
/// Fails if the notation is malformed, if a modification can't be resolved, or if the charge written after the
/// brackets doesn't match the charge of the adduct
pub fn parse_ion_type(
    registry: &ModificationRegistry,
    db: &AtomicDatabase,
    notation: &str,
) -> Result<IonType> {
    let mut parser = final_parser(ion(registry, db));
    let (multiplier, modifications, declared) =
        parser(notation).map_err(|error| Box::new(IonError::Notation { error }))?;

    let parts = modifications
        .into_iter()
        .flat_map(|(count, modification)| iter::repeat_n(modification, count.get() as usize))
        .flat_map(Modification::into_parts);
    let (charged, uncharged): (Vec<_>, Vec<_>) = parts.partition(|part| !part.charge().is_zero());

    let adduct_parts = if charged.is_empty() {
        let electrons = declared.abs().0 as usize;
        ModificationRegistry::electron(declared)
            .into_parts()
            .into_iter()
            .flat_map(|electron| iter::repeat_n(electron, electrons))
            .collect()
    } else {
        charged
    };
    let adduct =
        Modification::from_parts(adduct_parts).ok_or_else(|| IonError::zero_charge(notation))?;

    let actual = adduct.charge();
    if actual != declared {
        return Err(Box::new(IonError::ChargeMismatch {
            notation: notation.to_owned(),
            declared,
            actual,
        }));
    }

    let modification = Modification::from_parts(uncharged);
    Ok(IonType::from_parts(multiplier, adduct, modification))
}

// Private Sub-Parsers =================================================================================================

type Ion = (Count, Vec<(Count, Modification)>, Charge);

// NOTE: These are not meant to be links, it's just EBNF
#[allow(clippy::doc_link_with_quotes)]
/// Ion = "[" , [ Bounded Count ] , "M" , { Modification } , "]" , Ion Charge ;
fn ion<'a, 's>(
    registry: &'a ModificationRegistry,
    db: &'a AtomicDatabase,
) -> impl FnMut(&'s str) -> ParseResult<'s, Ion> {
    let opening_bracket = expect(char('['), ParseErrorKind::ExpectedIonStart);
    let multiplier = opt(bounded_count).map(Option::unwrap_or_default);
    let molecule = expect(char('M'), ParseErrorKind::ExpectedMolecule);
    let modifications = many0(modification(registry, db));
    let closing_bracket = expect(char(']'), ParseErrorKind::ExpectedIonEnd);

    let parser = preceded(
        opening_bracket,
        cut(tuple((
            multiplier,
            preceded(molecule, modifications),
            preceded(closing_bracket, ion_charge),
        ))),
    );
    wrap_err(parser, ParseErrorKind::ExpectedIon)
}

/// Modification = Offset Kind , [ Bounded Count ] , Token ;
fn modification<'a, 's>(
    registry: &'a ModificationRegistry,
    db: &'a AtomicDatabase,
) -> impl FnMut(&'s str) -> ParseResult<'s, (Count, Modification)> {
    let optional_count = opt(bounded_count).map(Option::unwrap_or_default);
    let parser = pair(offset_kind, pair(optional_count, cut(token)));
    map_res(parser, move |(kind, (count, token))| {
        registry
            .parse_from_string(&format!("{kind}{token}"), db)
            .map(|modification| (count, modification))
    })
}

/// Ion Charge = [ Bounded Count ] , Offset Kind ;
fn ion_charge(i: &str) -> ParseResult<Charge> {
    let optional_count = opt(bounded_count).map(Option::unwrap_or_default);
    let parser = pair(optional_count, offset_kind)
        .map(|(count, kind)| Charge(kind.offset(count.get().into())));
    wrap_err(parser, ParseErrorKind::ExpectedIonCharge)(i)
}

// ---------------------------------------------------------------------------------------------------------------------

/// Bounded Count = Count ; (* no larger than MAX_ION_COUNT *)
fn bounded_count(i: &str) -> ParseResult<Count> {
    map_res(count, |count: Count| {
        if count.get() <= MAX_ION_COUNT {
            Ok(count)
        } else {
            Err(CountTooLarge(count.get()))
        }
    })(i)
}

/// Token = ( letter | "(" ) , { letter | digit | "(" | ")" } ;
fn token(i: &str) -> ParseResult<&str> {
    let first = satisfy(|c| c.is_ascii_alphabetic() || c == '(');
    let rest = take_while(|c: char| c.is_ascii_alphanumeric() || c == '(' || c == ')');
    expect(recognize(pair(first, rest)), ParseErrorKind::ExpectedToken)(i)
}

// Module Tests ========================================================================================================
