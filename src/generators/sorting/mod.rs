//! Sorting generators
//!
//! Every sorting trace shares the same frame:
//! - the first step narrates the initial array with zero counters,
//! - every step's array has the input's length,
//! - the last step holds the sorted output with every slot `is_sorted`.
//!
//! Mutation steps show the array *before* the write, with the affected slots
//! flagged `is_swapping`; the write is visible from the following step on.
//! Elements carry their input index in `origin`, so stability can be audited
//! on the final step.

pub mod bubble;
pub mod counting;
pub mod merge;
pub mod radix;
pub mod selection;

use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, StepRecorder};

pub(crate) fn check_len(values: &[i64], limits: TraceLimits) -> Result<(), GeneratorError> {
    if values.len() > limits.max_array_len {
        return Err(GeneratorError::InputTooLarge {
            len: values.len(),
            limit: limits.max_array_len,
        });
    }
    Ok(())
}

pub(crate) fn check_non_negative(
    values: &[i64],
    algorithm: &'static str,
) -> Result<(), GeneratorError> {
    match values.iter().find(|&&v| v < 0) {
        Some(&value) => Err(GeneratorError::NegativeValue { algorithm, value }),
        None => Ok(()),
    }
}

/// Mark every slot sorted and record the completion step
pub(crate) fn finish(
    rec: &mut StepRecorder,
    array: &mut [ArrayElement],
    code_line: usize,
) -> Result<(), GeneratorError> {
    for slot in array.iter_mut() {
        slot.is_sorted = true;
    }
    rec.push(rec.snap(array, &[], "Sorting complete", code_line))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::snapshot::Step;

    /// Shared trace invariants for every sorting generator
    pub fn assert_sort_trace(input: &[i64], steps: &[Step]) {
        assert!(!steps.is_empty());
        let first = &steps[0];
        assert_eq!((first.comparisons, first.swaps), (0, 0));

        for pair in steps.windows(2) {
            assert!(pair[0].comparisons <= pair[1].comparisons);
            assert!(pair[0].swaps <= pair[1].swaps);
        }
        for step in steps {
            assert_eq!(step.array.len(), input.len(), "{}", step.description);
        }

        let last = steps.last().unwrap();
        let mut expected = input.to_vec();
        expected.sort();
        assert_eq!(last.values(), expected);
        assert!(last.array.iter().all(|e| e.is_sorted));
    }
}
