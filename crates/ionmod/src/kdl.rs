// Standard Library Imports
use std::ops::Deref;

// External Crate Imports
use knuffel::{
    DecodeScalar,
    ast::{self, Integer, Literal, Radix, TypeName},
    decode::{Context, Kind},
    errors::{DecodeError, ExpectedType},
    span::Spanned,
    traits::ErrorSpan,
};
use rust_decimal::Decimal;

// Lossless Parsing of KDL Numbers to Decimal ==========================================================================

// NOTE: Going through `f64` would round catalog masses like 1.007276, so the literal text is parsed directly
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DecimalKdl(pub(crate) Decimal);

impl<S: ErrorSpan> DecodeScalar<S> for DecimalKdl {
    fn type_check(type_name: &Option<Spanned<TypeName, S>>, ctx: &mut Context<S>) {
        if let Some(t) = type_name {
            ctx.emit_error(DecodeError::TypeName {
                span: t.span().clone(),
                found: Some(t.deref().clone()),
                expected: ExpectedType::no_type(),
                rust_type: "Decimal",
            });
        }
    }

    fn raw_decode(
        value: &Spanned<Literal, S>,
        ctx: &mut Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        match parse_literal(value) {
            Some(Ok(d)) => Ok(Self(d)),
            Some(Err(e)) => {
                ctx.emit_error(DecodeError::conversion(value, Box::new(e)));
                Ok(Self::default())
            }
            None => {
                ctx.emit_error(DecodeError::unsupported(value, expected_decimal(value)));
                Ok(Self::default())
            }
        }
    }
}

/// A decimal that's allowed to be wrong: failures are kept for the caller instead of failing the whole document
#[derive(Clone, Debug)]
pub(crate) struct LenientDecimalKdl(pub(crate) Result<Decimal, String>);

impl<S: ErrorSpan> DecodeScalar<S> for LenientDecimalKdl {
    fn type_check(_type_name: &Option<Spanned<TypeName, S>>, _ctx: &mut Context<S>) {}

    fn raw_decode(
        value: &Spanned<Literal, S>,
        _ctx: &mut Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        let decoded = match parse_literal(value) {
            Some(parsed) => parsed.map_err(|e| e.to_string()),
            None => Err(expected_decimal(value)),
        };
        Ok(Self(decoded))
    }
}

// Private Helper Functions ============================================================================================

// NOTE: Returns `None` when the literal isn't a (base 10) number at all
fn parse_literal(literal: &Literal) -> Option<Result<Decimal, rust_decimal::Error>> {
    match literal {
        Literal::Decimal(ast::Decimal(s)) | Literal::Int(Integer(Radix::Dec, s)) => {
            Some(if s.contains(['e', 'E']) {
                Decimal::from_scientific(s)
            } else {
                Decimal::from_str_exact(s)
            })
        }
        _ => None,
    }
}

fn expected_decimal(literal: &Literal) -> String {
    format!("expected a decimal number, found {}", Kind::from(literal))
}
