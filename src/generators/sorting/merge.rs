//! Merge sort trace
//!
//! Indices in every step are absolute positions in the full array, so split and
//! merge steps highlight the active sub-range where it actually lives. Each
//! write of a merged element back into its slot counts as a swap.

use super::{check_len, finish};
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "procedure mergeSort(A, l, r)",
    "  if l >= r: return",
    "  m = (l + r) / 2",
    "  mergeSort(A, l, m); mergeSort(A, m + 1, r)",
    "  merge(A, l, m, r)",
    "  while i <= m and j <= r",
    "    if L[i] <= R[j]: A[k] = L[i++]",
    "    else: A[k] = R[j++]",
    "  copy the remaining elements",
    "  return A",
];

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    check_len(values, limits)?;
    let mut rec = StepRecorder::new(limits);
    let mut arr = ArrayElement::from_values(values);

    rec.push(rec.snap(&arr, &[], "Initial array", 0))?;
    if !arr.is_empty() {
        let last = arr.len() - 1;
        sort_range(&mut rec, &mut arr, 0, last)?;
    }

    finish(&mut rec, &mut arr, 9)?;
    Ok(rec.finish())
}

fn range_marks(l: usize, r: usize) -> Vec<(usize, Mark)> {
    (l..=r).map(|k| (k, Mark::Selected)).collect()
}

fn sort_range(
    rec: &mut StepRecorder,
    arr: &mut [ArrayElement],
    l: usize,
    r: usize,
) -> Result<(), GeneratorError> {
    if l >= r {
        return Ok(());
    }
    let m = l + (r - l) / 2;
    rec.push(
        rec.snap(
            arr,
            &range_marks(l, r),
            format!("Split [{}..{}] into [{}..{}] and [{}..{}]", l, r, l, m, m + 1, r),
            2,
        )
        .at(l, r),
    )?;

    sort_range(rec, arr, l, m)?;
    sort_range(rec, arr, m + 1, r)?;
    merge(rec, arr, l, m, r)
}

fn merge(
    rec: &mut StepRecorder,
    arr: &mut [ArrayElement],
    l: usize,
    m: usize,
    r: usize,
) -> Result<(), GeneratorError> {
    let left: Vec<ArrayElement> = arr[l..=m].to_vec();
    let right: Vec<ArrayElement> = arr[m + 1..=r].to_vec();
    let left_values: Vec<i64> = left.iter().map(|e| e.value).collect();
    let right_values: Vec<i64> = right.iter().map(|e| e.value).collect();

    rec.push(
        rec.snap(
            arr,
            &range_marks(l, r),
            format!("Merge [{}..{}] with [{}..{}]", l, m, m + 1, r),
            4,
        )
        .at(l, r)
        .with_info("left", left_values.clone())
        .with_info("right", right_values.clone()),
    )?;

    let (mut i, mut j, mut k) = (0, 0, l);
    while i < left.len() && j < right.len() {
        rec.count_comparison();
        rec.push(
            rec.snap(
                arr,
                &[(k, Mark::Comparing)],
                format!("Compare L[{}] = {} with R[{}] = {}", i, left[i].value, j, right[j].value),
                5,
            )
            .at(i, j)
            .with_info("left", left_values.clone())
            .with_info("right", right_values.clone()),
        )?;

        // ties take from the left run to stay stable
        let (next, line) = if left[i].value <= right[j].value {
            i += 1;
            (left[i - 1], 6)
        } else {
            j += 1;
            (right[j - 1], 7)
        };
        write(rec, arr, k, next, line, i, j)?;
        k += 1;
    }

    for &next in left[i..].iter().chain(right[j..].iter()) {
        write(rec, arr, k, next, 8, i, j)?;
        k += 1;
    }

    rec.push(
        rec.snap(arr, &range_marks(l, r), format!("Merged range [{}..{}]", l, r), 4)
            .at(l, r),
    )
}

fn write(
    rec: &mut StepRecorder,
    arr: &mut [ArrayElement],
    k: usize,
    next: ArrayElement,
    code_line: usize,
    i: usize,
    j: usize,
) -> Result<(), GeneratorError> {
    rec.count_swap();
    rec.push(
        rec.snap(
            arr,
            &[(k, Mark::Swapping)],
            format!("Write {} into position {}", next.value, k),
            code_line,
        )
        .at(i, j),
    )?;
    arr[k] = next.cleared();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::sorting::test_support::assert_sort_trace;

    #[test]
    fn sorts_odd_length_input() {
        let input = [38, 27, 43, 3, 9, 82, 10];
        let steps = steps(&input, TraceLimits::default()).unwrap();
        assert_sort_trace(&input, &steps);
    }

    #[test]
    fn split_steps_use_absolute_indices() {
        let steps = steps(&[4, 3, 2, 1], TraceLimits::default()).unwrap();
        let splits: Vec<&str> = steps
            .iter()
            .filter(|s| s.description.starts_with("Split"))
            .map(|s| s.description.as_str())
            .collect();
        assert_eq!(
            splits,
            vec![
                "Split [0..3] into [0..1] and [2..3]",
                "Split [0..1] into [0..0] and [1..1]",
                "Split [2..3] into [2..2] and [3..3]",
            ]
        );
    }

    #[test]
    fn merge_is_stable() {
        let steps = steps(&[1, 0, 1, 0], TraceLimits::default()).unwrap();
        let origins: Vec<usize> = steps.last().unwrap().array.iter().map(|e| e.origin).collect();
        assert_eq!(origins, vec![1, 3, 0, 2]);
    }

    #[test]
    fn writes_are_counted_as_swaps() {
        let steps = steps(&[2, 1], TraceLimits::default()).unwrap();
        let last = steps.last().unwrap();
        assert_eq!(last.swaps, 2);
        assert_eq!(last.comparisons, 1);
    }
}
