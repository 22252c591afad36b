//! Counting sort trace in three phases: count, cumulative, place
//!
//! During placement the step array is the output buffer. Slots that have not
//! been filled yet hold 0; the input stays available in `info["input"]`.

use super::{check_len, check_non_negative, finish};
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "procedure countingSort(A)",
    "  count = array of max + 1 zeros",
    "  for each x in A: count[x]++",
    "  for v = 1 to max: count[v] += count[v - 1]",
    "  for i = n - 1 down to 0",
    "    pos = count[A[i]] - 1",
    "    output[pos] = A[i]; count[A[i]]--",
    "  return output",
];

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    check_len(values, limits)?;
    check_non_negative(values, "counting sort")?;

    let mut rec = StepRecorder::new(limits);
    let input = ArrayElement::from_values(values);
    let n = input.len();
    let max = values.iter().copied().max().unwrap_or(0);
    let bound = usize::try_from(max).map_err(|_| GeneratorError::InvalidParameter {
        name: "max",
        reason: format!("{} does not fit in memory", max),
    })?;
    if bound >= limits.max_memory / std::mem::size_of::<i64>() {
        return Err(GeneratorError::InvalidParameter {
            name: "max",
            reason: format!("count array of {} entries exceeds the trace budget", bound + 1),
        });
    }
    let mut count = vec![0i64; bound + 1];

    rec.push(rec.snap(&input, &[], "Initial array", 0).with_info("phase", "init"))?;
    rec.push(
        rec.snap(&input, &[], format!("Allocate count array for values 0..={}", max), 1)
            .with_info("phase", "count")
            .with_info("count", count.clone()),
    )?;

    // phase 1: occurrences
    for (i, element) in input.iter().enumerate() {
        let v = element.value as usize;
        rec.push(
            rec.snap(
                &input,
                &[(i, Mark::Comparing)],
                format!("Examine A[{}] = {}", i, element.value),
                2,
            )
            .at(i, v)
            .with_info("phase", "count")
            .with_info("count", count.clone()),
        )?;
        count[v] += 1;
        rec.push(
            rec.snap(
                &input,
                &[(i, Mark::Selected)],
                format!("count[{}] is now {}", v, count[v]),
                2,
            )
            .at(i, v)
            .with_info("phase", "count")
            .with_info("count", count.clone()),
        )?;
    }

    // phase 2: prefix sums
    for v in 0..count.len() {
        let description = if v == 0 {
            format!("count[0] stays {}", count[0])
        } else {
            count[v] += count[v - 1];
            format!("count[{}] += count[{}] -> {}", v, v - 1, count[v])
        };
        rec.push(
            rec.snap(&input, &[], description, 3)
                .at(None, v)
                .with_info("phase", "cumulative")
                .with_info("count", count.clone()),
        )?;
    }

    // phase 3: right-to-left placement keeps equal values in input order
    let input_values: Vec<i64> = values.to_vec();
    let mut output: Vec<ArrayElement> = (0..n).map(|k| ArrayElement::new(0, k)).collect();
    for i in (0..n).rev() {
        let element = input[i];
        let v = element.value as usize;
        let pos = (count[v] - 1) as usize;

        rec.count_swap();
        rec.push(
            rec.snap(
                &output,
                &[(pos, Mark::Swapping)],
                format!("A[{}] = {} goes to position count[{}] - 1 = {}", i, element.value, v, pos),
                5,
            )
            .at(i, pos)
            .with_info("phase", "place")
            .with_info("input", input_values.clone())
            .with_info("count", count.clone()),
        )?;

        count[v] -= 1;
        output[pos] = element.cleared();
        rec.push(
            rec.snap(
                &output,
                &[(pos, Mark::Selected)],
                format!("Placed {} at position {}; count[{}] is now {}", element.value, pos, v, count[v]),
                6,
            )
            .at(i, pos)
            .with_info("phase", "place")
            .with_info("input", input_values.clone())
            .with_info("count", count.clone()),
        )?;
    }

    finish(&mut rec, &mut output, 7)?;
    Ok(rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::sorting::test_support::assert_sort_trace;
    use crate::snapshot::InfoValue;

    #[test]
    fn sorts_through_three_phases() {
        let input = [4, 2, 2, 8, 3, 3, 1];
        let steps = steps(&input, TraceLimits::default()).unwrap();
        assert_sort_trace(&input, &steps);

        let phases: Vec<&str> = steps
            .iter()
            .filter_map(|s| s.info.get("phase").and_then(InfoValue::as_text))
            .collect();
        let first_place = phases.iter().position(|p| *p == "place").unwrap();
        let last_count = phases.iter().rposition(|p| *p == "count").unwrap();
        assert!(last_count < first_place);
    }

    #[test]
    fn emits_two_steps_per_element_when_counting() {
        let steps = steps(&[1, 0, 1], TraceLimits::default()).unwrap();
        let counting = steps
            .iter()
            .filter(|s| s.code_line == 2)
            .count();
        assert_eq!(counting, 6);
    }

    #[test]
    fn cumulative_counts_are_prefix_sums() {
        let steps = steps(&[2, 0, 2, 1], TraceLimits::default()).unwrap();
        let last_cumulative = steps.iter().filter(|s| s.code_line == 3).last().unwrap();
        assert_eq!(last_cumulative.info["count"], InfoValue::List(vec![1, 2, 4]));
    }

    #[test]
    fn all_zeros_uses_single_bucket() {
        let input = [0, 0, 0];
        let steps = steps(&input, TraceLimits::default()).unwrap();
        assert_sort_trace(&input, &steps);
    }

    #[test]
    fn rejects_negative_values() {
        let err = steps(&[3, -1], TraceLimits::default()).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::NegativeValue {
                algorithm: "counting sort",
                value: -1
            }
        );
    }

    #[test]
    fn is_stable() {
        let steps = steps(&[1, 0, 1, 0], TraceLimits::default()).unwrap();
        let origins: Vec<usize> = steps.last().unwrap().array.iter().map(|e| e.origin).collect();
        assert_eq!(origins, vec![1, 3, 0, 2]);
    }
}
