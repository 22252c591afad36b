//! Sieve of Eratosthenes trace
//!
//! The array holds the candidates `2..=n`. Crossed-out composites carry
//! `is_selected`, the current prime `is_pivot`, and the multiple being struck
//! `is_swapping`. The final step sets the terminal flag on every candidate and
//! lists the primes in `info["primes"]`.

use super::refusal;
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "procedure sieve(n)",
    "  mark every number in 2..n as prime",
    "  for p = 2; p * p <= n; p++",
    "    if p is composite: continue",
    "    for m = p * p; m <= n; m += p",
    "      mark m composite",
    "  return the numbers still marked prime",
];

fn crossed(composite: &[bool]) -> Vec<(usize, Mark)> {
    composite
        .iter()
        .enumerate()
        .filter(|(_, &c)| c)
        .map(|(idx, _)| (idx, Mark::Selected))
        .collect()
}

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    let &[n] = values else {
        return Ok(refusal(format!(
            "The sieve takes a single upper bound, got {} values",
            values.len()
        )));
    };

    let mut rec = StepRecorder::new(limits);
    if n < 2 {
        rec.push(rec.snap(&[], &[], format!("Find primes up to {}", n), 0))?;
        rec.push(
            rec.snap(&[], &[], format!("There are no primes up to {}", n), 6)
                .with_info("primes", Vec::<i64>::new()),
        )?;
        return Ok(rec.finish());
    }

    let count = (n - 1) as usize;
    if count > limits.max_array_len {
        return Err(GeneratorError::InputTooLarge {
            len: count,
            limit: limits.max_array_len,
        });
    }

    let candidates: Vec<i64> = (2..=n).collect();
    let mut arr = ArrayElement::from_values(&candidates);
    let mut composite = vec![false; count];
    let idx = |v: i64| (v - 2) as usize;

    rec.push(rec.snap(&arr, &[], format!("Find primes up to {}", n), 0))?;
    rec.push(rec.snap(&arr, &[], format!("Assume every number in 2..{} is prime", n), 1))?;

    let mut p: i64 = 2;
    while p * p <= n {
        rec.count_comparison();
        if composite[idx(p)] {
            let mut marks = crossed(&composite);
            marks.push((idx(p), Mark::Comparing));
            rec.push(
                rec.snap(&arr, &marks, format!("{} is already composite: skip", p), 3)
                    .at(idx(p), None),
            )?;
            p += 1;
            continue;
        }

        let mut marks = crossed(&composite);
        marks.push((idx(p), Mark::Pivot));
        rec.push(
            rec.snap(&arr, &marks, format!("{} is prime: strike its multiples from {}", p, p * p), 2)
                .at(idx(p), None),
        )?;

        let mut m = p * p;
        while m <= n {
            let mut marks = crossed(&composite);
            marks.push((idx(p), Mark::Pivot));
            marks.push((idx(m), Mark::Swapping));
            let verb = if composite[idx(m)] { "already struck" } else { "strike" };
            rec.count_swap();
            rec.push(
                rec.snap(&arr, &marks, format!("{} = {} x {}: {}", m, p, m / p, verb), 5)
                    .at(idx(p), idx(m)),
            )?;
            composite[idx(m)] = true;
            m += p;
        }
        p += 1;
    }

    let primes: Vec<i64> = candidates
        .iter()
        .zip(&composite)
        .filter(|(_, &c)| !c)
        .map(|(&v, _)| v)
        .collect();
    for slot in arr.iter_mut() {
        slot.is_sorted = true;
    }
    let listing = primes
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    rec.push(
        rec.snap(&arr, &crossed(&composite), format!("Primes up to {}: {}", n, listing), 6)
            .with_info("primes", primes),
    )?;
    Ok(rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::InfoValue;

    #[test]
    fn primes_up_to_thirty() {
        let steps = steps(&[30], TraceLimits::default()).unwrap();
        assert_eq!(
            steps.last().unwrap().info["primes"],
            InfoValue::List(vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29])
        );
    }

    #[test]
    fn composite_candidates_are_skipped() {
        let steps = steps(&[30], TraceLimits::default()).unwrap();
        assert!(steps.iter().any(|s| s.description == "4 is already composite: skip"));
        // marking for p starts at p * p, so 6 is only struck once (by 2)
        let strikes_of_six = steps
            .iter()
            .filter(|s| s.description.starts_with("6 = "))
            .count();
        assert_eq!(strikes_of_six, 1);
    }

    #[test]
    fn tiny_bounds_have_no_primes() {
        let steps = steps(&[1], TraceLimits::default()).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].info["primes"], InfoValue::List(vec![]));
    }
}
