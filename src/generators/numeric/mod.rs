//! Number-theory generators over a handful of registers
//!
//! These traces keep their state in a short array (two or three registers, or
//! the list of terms/factors found so far). Argument-count problems produce a
//! single explanatory step rather than an error.

pub mod factorize;
pub mod fibonacci;
pub mod gcd;
pub mod modexp;
pub mod sieve;

use crate::snapshot::{ArrayElement, Step};

/// Single-step trace explaining why the arguments were refused
pub(crate) fn refusal(message: impl Into<String>) -> Vec<Step> {
    let message = message.into();
    tracing::warn!(%message, "refusing numeric input");
    vec![Step::error(message)]
}

/// Registers with consecutive origins, for traces that are not permutations
pub(crate) fn registers(values: &[i64]) -> Vec<ArrayElement> {
    ArrayElement::from_values(values)
}

/// Final registers with the terminal flag set on every slot
pub(crate) fn terminal(values: &[i64]) -> Vec<ArrayElement> {
    let mut regs = registers(values);
    for r in regs.iter_mut() {
        r.is_sorted = true;
    }
    regs
}
