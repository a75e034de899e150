// External Crate Imports
use nom::{
    Parser,
    branch::alt,
    character::complete::char,
    combinator::{cut, map, opt, recognize},
    multi::many1,
    sequence::{delimited, pair},
};
use nom_miette::{expect, map_res, wrap_err};

// Local Crate Imports
use super::{
    errors::{ParseErrorKind, ParseResult},
    primitives::{count, lowercase, offset_kind, uppercase},
};
use crate::{AtomicDatabase, ChemicalFormula, Count, Element, MassNumber, OffsetKind, Particle};

// Public API ==========================================================================================================

/// Chemical Formula
///   = { Atomic Offset }- , [ Offset Kind , Particle Offset ]
///   | Particle Offset
///   ;
pub fn chemical_formula<'a, 's>(
    db: &'a AtomicDatabase,
) -> impl FnMut(&'s str) -> ParseResult<'s, ChemicalFormula<'a>> {
    let atoms = many1(atomic_offset(db));
    let optional_particles = opt(pair(offset_kind, cut(particle_offset(db))));
    let atoms_and_particles = map(pair(atoms, optional_particles), |(atoms, particles)| {
        let particles = particles
            .map(|(kind, (count, particle))| (particle, kind.offset(count.get().into())));
        ChemicalFormula::from_parts(atoms, particles)
    });

    let just_particles = map(particle_offset(db), |(count, particle)| {
        let particles = Some((particle, OffsetKind::Add.offset(count.get().into())));
        ChemicalFormula::from_parts(Vec::new(), particles)
    });

    let parser = alt((atoms_and_particles, just_particles));
    wrap_err(parser, ParseErrorKind::ExpectedChemicalFormula)
}

// Private Sub-Parsers =================================================================================================

/// Atomic Offset = ( Element | Isotope ) , [ Count ] ;
fn atomic_offset<'a, 's>(
    db: &'a AtomicDatabase,
) -> impl FnMut(&'s str) -> ParseResult<'s, (Element<'a>, i64)> {
    let element_or_isotope = alt((element(db), isotope(db)));
    let optional_count = opt(count).map(|c| i64::from(c.unwrap_or_default().get()));
    let parser = pair(element_or_isotope, optional_count);
    wrap_err(parser, ParseErrorKind::ExpectedAtomicOffset)
}

/// Particle Offset = [ Count ] , Particle ;
fn particle_offset<'a, 's>(
    db: &'a AtomicDatabase,
) -> impl FnMut(&'s str) -> ParseResult<'s, (Count, Particle<'a>)> {
    let optional_count = opt(count).map(Option::unwrap_or_default);
    let parser = pair(optional_count, particle(db));
    wrap_err(parser, ParseErrorKind::ExpectedParticleOffset)
}

// ---------------------------------------------------------------------------------------------------------------------

/// Element = uppercase , [ lowercase ] ;
fn element<'a, 's>(db: &'a AtomicDatabase) -> impl FnMut(&'s str) -> ParseResult<'s, Element<'a>> {
    map_res(element_symbol, |symbol| Element::new(db, symbol))
}

// NOTE: These are not meant to be links, it's just EBNF
#[allow(clippy::doc_link_with_quotes)]
/// Isotope = "[" , Count , Element , "]" ;
fn isotope<'a, 's>(db: &'a AtomicDatabase) -> impl FnMut(&'s str) -> ParseResult<'s, Element<'a>> {
    map_res(isotope_expr, |(mass_number, symbol)| {
        Element::new_isotope(db, symbol, mass_number)
    })
}

/// Particle = lowercase ;
fn particle<'a, 's>(db: &'a AtomicDatabase) -> impl FnMut(&'s str) -> ParseResult<'s, Particle<'a>> {
    map_res(particle_symbol, |symbol| Particle::new(db, symbol))
}

// ---------------------------------------------------------------------------------------------------------------------

fn element_symbol(i: &str) -> ParseResult<&str> {
    let parser = recognize(pair(uppercase, opt(lowercase)));
    wrap_err(parser, ParseErrorKind::ExpectedElementSymbol)(i)
}

fn isotope_expr(i: &str) -> ParseResult<(MassNumber, &str)> {
    let opening_bracket = expect(char('['), ParseErrorKind::ExpectedIsotopeStart);
    let mass_number = map(wrap_err(count, ParseErrorKind::ExpectedMassNumber), |c| {
        MassNumber(c.0)
    });
    let closing_bracket = expect(cut(char(']')), ParseErrorKind::ExpectedIsotopeEnd);
    delimited(
        opening_bracket,
        cut(pair(mass_number, element_symbol)),
        closing_bracket,
    )(i)
}

fn particle_symbol(i: &str) -> ParseResult<&str> {
    let parser = recognize(lowercase);
    wrap_err(parser, ParseErrorKind::ExpectedParticleSymbol)(i)
}

// Module Tests ========================================================================================================
