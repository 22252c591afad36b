//! LSD radix sort trace, base 10
//!
//! Buckets hold whole elements, so the collection phase writes back exactly the
//! element that was distributed. Duplicates keep their identity through every
//! pass.

use super::{check_len, check_non_negative, finish};
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "procedure radixSort(A)",
    "  max = maximum(A)",
    "  for exp = 1; max / exp > 0; exp *= 10",
    "    buckets = 10 empty lists",
    "    for each x in A: buckets[(x / exp) % 10].append(x)",
    "    k = 0",
    "    for d = 0 to 9: for each x in buckets[d]: A[k++] = x",
    "  return A",
];

fn bucket_table(buckets: &[Vec<ArrayElement>]) -> Vec<Vec<i64>> {
    buckets
        .iter()
        .map(|b| b.iter().map(|e| e.value).collect())
        .collect()
}

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    check_len(values, limits)?;
    check_non_negative(values, "radix sort")?;

    let mut rec = StepRecorder::new(limits);
    let mut arr = ArrayElement::from_values(values);
    let max = values.iter().copied().max().unwrap_or(0);

    rec.push(rec.snap(&arr, &[], "Initial array", 0))?;
    rec.push(rec.snap(&arr, &[], format!("Maximum value is {}", max), 1).with_info("max", max))?;

    let mut exp: i64 = 1;
    let mut pass = 1;
    while max / exp > 0 {
        let mut buckets: Vec<Vec<ArrayElement>> = vec![Vec::new(); 10];
        rec.push(
            rec.snap(&arr, &[], format!("Pass {}: sort by digit place {}", pass, exp), 3)
                .with_info("exp", exp)
                .with_info("buckets", bucket_table(&buckets)),
        )?;

        for (i, element) in arr.iter().enumerate() {
            let digit = ((element.value / exp) % 10) as usize;
            buckets[digit].push(element.cleared());
            rec.push(
                rec.snap(
                    &arr,
                    &[(i, Mark::Comparing)],
                    format!("{} has digit {} -> bucket {}", element.value, digit, digit),
                    4,
                )
                .at(i, digit)
                .with_info("exp", exp)
                .with_info("buckets", bucket_table(&buckets)),
            )?;
        }

        let mut k = 0;
        for (digit, bucket) in buckets.iter().enumerate() {
            for element in bucket {
                rec.count_swap();
                rec.push(
                    rec.snap(
                        &arr,
                        &[(k, Mark::Swapping)],
                        format!("Collect {} from bucket {} into position {}", element.value, digit, k),
                        6,
                    )
                    .at(k, digit)
                    .with_info("exp", exp)
                    .with_info("buckets", bucket_table(&buckets)),
                )?;
                arr[k] = *element;
                k += 1;
            }
        }

        rec.push(
            rec.snap(&arr, &[], format!("Pass {} complete", pass), 6)
                .with_info("exp", exp),
        )?;

        match exp.checked_mul(10) {
            Some(next) => exp = next,
            None => break,
        }
        pass += 1;
    }

    finish(&mut rec, &mut arr, 7)?;
    Ok(rec.finish())
}
