//! Selection sort trace
//!
//! The minimum of the unsorted suffix is rotated into place instead of swapped,
//! which keeps equal elements in input order.

use super::{check_len, finish};
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "procedure selectionSort(A)",
    "  for i = 0 to n - 2",
    "    min = i",
    "    for j = i + 1 to n - 1",
    "      if A[j] < A[min]",
    "        min = j",
    "    if min != i: rotate A[i..min] right by one",
    "    mark A[i] sorted",
    "  return A",
];

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    check_len(values, limits)?;
    let mut rec = StepRecorder::new(limits);
    let mut arr = ArrayElement::from_values(values);
    let n = arr.len();

    rec.push(rec.snap(&arr, &[], "Initial array", 0))?;

    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        rec.push(
            rec.snap(
                &arr,
                &[(i, Mark::Selected)],
                format!("Assume A[{}] = {} is the minimum", i, arr[i].value),
                2,
            )
            .at(i, None),
        )?;

        for j in i + 1..n {
            rec.count_comparison();
            rec.push(
                rec.snap(
                    &arr,
                    &[(min, Mark::Selected), (j, Mark::Comparing), (min, Mark::Comparing)],
                    format!("Compare A[{}] = {} with current minimum {}", j, arr[j].value, arr[min].value),
                    4,
                )
                .at(i, j),
            )?;

            if arr[j].value < arr[min].value {
                min = j;
                rec.push(
                    rec.snap(
                        &arr,
                        &[(min, Mark::Selected)],
                        format!("New minimum {} at index {}", arr[min].value, min),
                        5,
                    )
                    .at(i, j),
                )?;
            }
        }

        if min != i {
            rec.count_swap();
            rec.push(
                rec.snap(
                    &arr,
                    &[(i, Mark::Swapping), (min, Mark::Swapping)],
                    format!("Move {} from index {} to index {}", arr[min].value, min, i),
                    6,
                )
                .at(i, min),
            )?;
            arr[i..=min].rotate_right(1);
        }

        arr[i].is_sorted = true;
        rec.push(
            rec.snap(&arr, &[], format!("{} is in its final position", arr[i].value), 7)
                .at(i, None),
        )?;
    }

    finish(&mut rec, &mut arr, 8)?;
    Ok(rec.finish())
}
