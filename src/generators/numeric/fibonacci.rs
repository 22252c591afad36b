//! Linear Fibonacci trace

use super::{refusal, registers, terminal};
use crate::config::{TraceLimits, MAX_FIBONACCI_N};
use crate::errors::GeneratorError;
use crate::snapshot::{Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "function fib(n)",
    "  if n == 0: return [0]",
    "  if n == 1: return [0, 1]",
    "  F = [0, 1]",
    "  for k = 2 to n",
    "    F[k] = F[k - 1] + F[k - 2]",
    "  return F",
];

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    let &[n] = values else {
        return Ok(refusal(format!(
            "Fibonacci takes a single index n, got {} values",
            values.len()
        )));
    };
    if !(0..=MAX_FIBONACCI_N).contains(&n) {
        return Ok(refusal(format!(
            "n must be between 0 and {}, got {}",
            MAX_FIBONACCI_N, n
        )));
    }

    let mut rec = StepRecorder::new(limits);
    rec.push(rec.snap(&[], &[], format!("Generate Fibonacci terms up to F({})", n), 0))?;

    match n {
        0 => {
            rec.push(rec.snap(&terminal(&[0]), &[], "F(0) = 0", 1))?;
            return Ok(rec.finish());
        }
        1 => {
            rec.push(rec.snap(&terminal(&[0, 1]), &[], "F(0) = 0, F(1) = 1", 2))?;
            return Ok(rec.finish());
        }
        _ => {}
    }

    let mut terms: Vec<i64> = vec![0, 1];
    rec.push(rec.snap(&registers(&terms), &[], "Start with F(0) = 0 and F(1) = 1", 3))?;

    for k in 2..=n as usize {
        let (a, b) = (terms[k - 2], terms[k - 1]);
        rec.count_comparison();
        terms.push(a + b);
        rec.count_swap();
        rec.push(
            rec.snap(
                &registers(&terms),
                &[
                    (k - 2, Mark::Comparing),
                    (k - 1, Mark::Comparing),
                    (k, Mark::Selected),
                ],
                format!("F({}) = {} + {} = {}", k, b, a, a + b),
                5,
            )
            .at(k, None),
        )?;
    }

    rec.push(
        rec.snap(&terminal(&terms), &[], format!("F({}) = {}", n, terms[n as usize]), 6)
            .with_info("result", terms[n as usize]),
    )?;
    Ok(rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_terms() {
        let steps = steps(&[10], TraceLimits::default()).unwrap();
        assert_eq!(
            steps.last().unwrap().values(),
            vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55]
        );
    }

    #[test]
    fn small_indices_have_their_own_terminal_step() {
        let zero = steps(&[0], TraceLimits::default()).unwrap();
        assert_eq!(zero.len(), 2);
        assert_eq!(zero[1].values(), vec![0]);
        assert_eq!(zero[1].swaps, 0);

        let one = steps(&[1], TraceLimits::default()).unwrap();
        assert_eq!(one.len(), 2);
        assert_eq!(one[1].values(), vec![0, 1]);
    }

    #[test]
    fn largest_index_fits() {
        let steps = steps(&[MAX_FIBONACCI_N], TraceLimits::default()).unwrap();
        assert_eq!(*steps.last().unwrap().values().last().unwrap(), 7_540_113_804_746_346_429);
    }

    #[test]
    fn overflowing_index_is_refused() {
        let steps = steps(&[MAX_FIBONACCI_N + 1], TraceLimits::default()).unwrap();
        assert!(steps[0].is_error());
    }
}
