//! Atomic modifications, their combinations, and the algebra over both

mod algebra;
mod atomic;
mod combined;
mod kind;

pub use kind::UnknownTypeError;

pub(crate) use atomic::ELECTRON;
