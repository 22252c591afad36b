//! Bubble sort trace

use super::{check_len, finish};
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "procedure bubbleSort(A)",
    "  for i = 0 to n - 2",
    "    swapped = false",
    "    for j = 0 to n - i - 2",
    "      if A[j] > A[j + 1]",
    "        swap(A[j], A[j + 1]); swapped = true",
    "    mark A[n - i - 1] sorted",
    "    if not swapped: break",
    "  return A",
];

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    check_len(values, limits)?;
    let mut rec = StepRecorder::new(limits);
    let mut arr = ArrayElement::from_values(values);
    let n = arr.len();

    rec.push(rec.snap(&arr, &[], "Initial array", 0))?;

    for i in 0..n.saturating_sub(1) {
        rec.push(rec.snap(&arr, &[], format!("Pass {}", i + 1), 2).at(i, None))?;
        let mut swapped = false;

        for j in 0..n - i - 1 {
            rec.count_comparison();
            let (a, b) = (arr[j].value, arr[j + 1].value);
            rec.push(
                rec.snap(
                    &arr,
                    &[(j, Mark::Comparing), (j + 1, Mark::Comparing)],
                    format!("Compare A[{}] = {} with A[{}] = {}", j, a, j + 1, b),
                    4,
                )
                .at(i, j),
            )?;

            if a > b {
                rec.count_swap();
                rec.push(
                    rec.snap(
                        &arr,
                        &[(j, Mark::Swapping), (j + 1, Mark::Swapping)],
                        format!("{} > {}: swap them", a, b),
                        5,
                    )
                    .at(i, j),
                )?;
                arr.swap(j, j + 1);
                swapped = true;
            }
        }

        let last = n - i - 1;
        arr[last].is_sorted = true;
        rec.push(
            rec.snap(
                &arr,
                &[],
                format!("{} is in its final position", arr[last].value),
                6,
            )
            .at(i, None),
        )?;

        if !swapped {
            rec.push(rec.snap(&arr, &[], "No swaps in this pass: array is sorted", 7))?;
            break;
        }
    }

    finish(&mut rec, &mut arr, 8)?;
    Ok(rec.finish())
}
