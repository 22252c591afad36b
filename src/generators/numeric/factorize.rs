//! Trial-division prime factorization trace
//!
//! The step array lists the factors found so far; the value still being
//! reduced and the current divisor ride along in `info`.

use super::{refusal, registers, terminal};
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "function factorize(n)",
    "  while n mod 2 == 0: add 2; n = n / 2",
    "  for d = 3; d * d <= n; d += 2",
    "    while n mod d == 0",
    "      add d; n = n / d",
    "  if n > 1: add n",
    "  return factors",
];

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    let &[n] = values else {
        return Ok(refusal(format!(
            "Prime factorization takes a single number, got {}",
            values.len()
        )));
    };
    if n < 2 {
        return Ok(refusal(format!("{} has no prime factorization (need n >= 2)", n)));
    }

    let mut rec = StepRecorder::new(limits);
    let mut factors: Vec<i64> = Vec::new();
    let mut remaining = n;

    rec.push(
        rec.snap(&[], &[], format!("Factorize {}", n), 0)
            .with_info("remaining", remaining),
    )?;

    // divisor 2, then odd divisors
    let mut d: i64 = 2;
    while d.checked_mul(d).is_some_and(|sq| sq <= remaining) {
        let line = if d == 2 { 1 } else { 3 };
        loop {
            rec.count_comparison();
            let divides = remaining % d == 0;
            rec.push(
                rec.snap(
                    &registers(&factors),
                    &[],
                    format!(
                        "Does {} divide {}? {}",
                        d,
                        remaining,
                        if divides { "yes" } else { "no" }
                    ),
                    line,
                )
                .with_info("remaining", remaining)
                .with_info("divisor", d),
            )?;
            if !divides {
                break;
            }

            remaining /= d;
            factors.push(d);
            rec.count_swap();
            let last = factors.len() - 1;
            rec.push(
                rec.snap(
                    &registers(&factors),
                    &[(last, Mark::Selected)],
                    format!("Found factor {}; {} remains", d, remaining),
                    if d == 2 { 1 } else { 4 },
                )
                .with_info("remaining", remaining)
                .with_info("divisor", d),
            )?;
        }
        d = if d == 2 { 3 } else { d + 2 };
    }

    if remaining > 1 {
        factors.push(remaining);
        rec.count_swap();
        let last = factors.len() - 1;
        rec.push(
            rec.snap(
                &registers(&factors),
                &[(last, Mark::Selected)],
                format!("{} is left over and is itself prime", remaining),
                5,
            )
            .with_info("remaining", 1i64),
        )?;
    }

    let listing = factors
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" x ");
    rec.push(
        rec.snap(&terminal(&factors), &[], format!("{} = {}", n, listing), 6)
            .with_info("factors", factors.clone()),
    )?;
    Ok(rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(360, &[2, 2, 2, 3, 3, 5] ; "smooth number")]
    #[test_case(97, &[97] ; "prime")]
    #[test_case(2 * 101, &[2, 101] ; "large leftover")]
    #[test_case(49, &[7, 7] ; "square of prime")]
    fn factors(n: i64, expected: &[i64]) {
        let steps = steps(&[n], TraceLimits::default()).unwrap();
        assert_eq!(steps.last().unwrap().values(), expected.to_vec());
        assert!(steps.last().unwrap().array.iter().all(|e| e.is_sorted));
    }

    #[test]
    fn values_below_two_are_refused() {
        let steps = steps(&[1], TraceLimits::default()).unwrap();
        assert!(steps[0].is_error());
    }
}
