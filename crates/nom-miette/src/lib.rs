//! Turns `nom` parse failures into labelled `miette` diagnostics

// Standard Library Imports
use std::{fmt, mem};

// External Crate Imports
use miette::{Diagnostic, LabeledSpan, SourceSpan};
use nom::{
    Err, Finish, IResult, Parser,
    combinator::{all_consuming, complete},
    error::{ErrorKind, ParseError},
};
use thiserror::Error;

// Public API ==========================================================================================================

/// A finished parse error, carrying the full input so that `miette` can render it with labels
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{kind}")]
pub struct LabeledError<K: LabeledErrorKind> {
    source_code: String,
    labels: Vec<LabeledSpan>,
    kind: K,
    #[source]
    cause: Option<Box<LabeledError<K>>>,
    related: Vec<LabeledError<K>>,
}

/// The in-flight error type threaded through `nom` parsers
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LabeledParseError<'a, K> {
    input: &'a str,
    length: usize,
    kind: K,
    source: Option<Box<LabeledParseError<'a, K>>>,
    alternatives: Vec<LabeledParseError<'a, K>>,
}

pub trait LabeledErrorKind: Diagnostic + Clone + Eq + From<ErrorKind> {
    fn label(&self) -> Option<&'static str> {
        None
    }
}

pub trait FromExternalError<E> {
    // NOTE: Errors from external lookups (like a missing element) can't be fixed by backtracking, so they're usually
    // worth reporting immediately
    const FATAL: bool = false;

    fn from_external_error(error: E) -> Self;
}

impl<K: LabeledErrorKind> LabeledError<K> {
    pub const fn kind(&self) -> &K {
        &self.kind
    }
}

impl<'a, K: LabeledErrorKind> LabeledParseError<'a, K> {
    pub const fn new(input: &'a str, kind: K) -> Self {
        Self {
            input,
            length: 0,
            kind,
            source: None,
            alternatives: Vec::new(),
        }
    }

    pub fn new_with_source(input: &'a str, kind: K, source: Self) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(input, kind)
        }
    }
}

/// Runs `parser` to completion, requiring that it consumes the whole input
pub fn final_parser<'a, O, K, P>(parser: P) -> impl FnMut(&'a str) -> Result<O, LabeledError<K>>
where
    K: LabeledErrorKind,
    P: Parser<&'a str, O, LabeledParseError<'a, K>>,
{
    let mut parser = all_consuming(complete(parser));
    move |input| {
        parser
            .parse(input)
            .finish()
            .map(|(_, output)| output)
            .map_err(|e| e.into_final_error(input))
    }
}

/// Replaces any error from `parser` with `kind`, discarding the original error
pub fn expect<'a, O, K, P>(
    mut parser: P,
    kind: K,
) -> impl FnMut(&'a str) -> IResult<&'a str, O, LabeledParseError<'a, K>>
where
    K: LabeledErrorKind,
    P: Parser<&'a str, O, LabeledParseError<'a, K>>,
{
    move |i| {
        parser
            .parse(i)
            .map_err(|e| e.map(|_| LabeledParseError::new(i, kind.clone())))
    }
}

/// Wraps any error from `parser` in `kind`, keeping the original error as its source
pub fn wrap_err<'a, O, K, P>(
    mut parser: P,
    kind: K,
) -> impl FnMut(&'a str) -> IResult<&'a str, O, LabeledParseError<'a, K>>
where
    K: LabeledErrorKind,
    P: Parser<&'a str, O, LabeledParseError<'a, K>>,
{
    move |i| {
        parser
            .parse(i)
            .map_err(|e| e.map(|e| LabeledParseError::new_with_source(i, kind.clone(), e)))
    }
}

/// Like `nom::combinator::map_res`, but labels the whole consumed region when `f` fails
pub fn map_res<'a, O1, O2, E, K, P, F>(
    mut parser: P,
    mut f: F,
) -> impl FnMut(&'a str) -> IResult<&'a str, O2, LabeledParseError<'a, K>>
where
    K: LabeledErrorKind + FromExternalError<E>,
    P: Parser<&'a str, O1, LabeledParseError<'a, K>>,
    F: FnMut(O1) -> Result<O2, E>,
{
    move |input| {
        let (rest, output) = parser.parse(input)?;
        let length = input.len() - rest.len();
        f(output).map(|o| (rest, o)).map_err(|e| {
            let error = LabeledParseError {
                length,
                ..LabeledParseError::new(input, K::from_external_error(e))
            };
            if K::FATAL {
                Err::Failure(error)
            } else {
                Err::Error(error)
            }
        })
    }
}

// Diagnostic Trait Implementation =====================================================================================

impl<K: LabeledErrorKind> Diagnostic for LabeledError<K> {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.labels.iter().cloned()))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            return None;
        }
        Some(Box::new(self.related.iter().map(|e| e as &dyn Diagnostic)))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        self.cause.as_deref().map(|e| e as &dyn Diagnostic)
    }
}

impl<'a, K: LabeledErrorKind> ParseError<&'a str> for LabeledParseError<'a, K> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self::new(input, kind.into())
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn or(mut self, other: Self) -> Self {
        self.alternatives.push(other);
        self
    }
}

// Private Helper Methods ==============================================================================================

impl<K: LabeledErrorKind> LabeledParseError<'_, K> {
    fn into_final_error(self, full_input: &str) -> LabeledError<K> {
        // NOTE: Every `input` is a suffix of `full_input`, so the offset is just the difference in lengths
        let start = full_input.len() - self.input.len();
        let span = SourceSpan::from(start..start + self.length);
        let labels = self
            .kind
            .label()
            .map(|label| LabeledSpan::new_with_span(Some(label.to_owned()), span))
            .into_iter()
            .collect();
        let cause = self
            .source
            .map(|source| Box::new(source.into_final_error(full_input)));
        let related = self
            .alternatives
            .into_iter()
            .map(|alternative| alternative.into_final_error(full_input))
            .collect();

        let mut error = LabeledError {
            // NOTE: The trailing space lets labels point just past the end of the input
            source_code: format!("{full_input} "),
            labels,
            kind: self.kind,
            cause,
            related,
        };
        error.bubble_labels();
        error
    }
}

impl<K: LabeledErrorKind> LabeledError<K> {
    // Errors without labels of their own borrow them from whatever caused them, and alternatives always contribute
    fn bubble_labels(&mut self) {
        let mut labels = mem::take(&mut self.labels);
        if labels.is_empty() {
            if let Some(cause) = &mut self.cause {
                labels.append(&mut cause.labels);
            }
        }
        for related in &mut self.related {
            labels.append(&mut related.labels);
        }
        self.labels = merge_labels(labels);
    }
}

// Labels sharing a span are joined into a single "a or b" label, keeping their first-seen order
fn merge_labels(labels: Vec<LabeledSpan>) -> Vec<LabeledSpan> {
    let mut merged: Vec<(SourceSpan, Vec<String>)> = Vec::new();
    for labeled_span in labels {
        let span = *labeled_span.inner();
        let label = labeled_span.label().unwrap_or_default().to_owned();
        if let Some((_, texts)) = merged.iter_mut().find(|(s, _)| *s == span) {
            if !texts.contains(&label) {
                texts.push(label);
            }
        } else {
            merged.push((span, vec![label]));
        }
    }
    merged
        .into_iter()
        .map(|(span, texts)| LabeledSpan::new_with_span(Some(texts.join(" or ")), span))
        .collect()
}

// Module Tests ========================================================================================================
