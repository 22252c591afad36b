//! Square-and-multiply modular exponentiation trace
//!
//! Registers are `[result, base, exponent]`. With only `[a, m]` the trace
//! degrades to a single `a mod m` reduction.

use super::{refusal, registers, terminal};
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "function modPow(base, exp, mod)",
    "  result = 1 mod mod; base = base mod mod",
    "  while exp > 0",
    "    if exp is odd: result = (result * base) mod mod",
    "    base = (base * base) mod mod",
    "    exp = exp >> 1",
    "  return result",
];

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    let (base, exp, modulus) = match *values {
        [a, m] => return plain_modulo(a, m, limits),
        [b, e, m] => (b, e, m),
        _ => {
            return Ok(refusal(format!(
                "Modular exponentiation takes (base, exponent, modulus) or (value, modulus), got {} values",
                values.len()
            )))
        }
    };
    if modulus <= 0 {
        return Ok(refusal(format!("Modulus must be positive, got {}", modulus)));
    }
    if exp < 0 {
        return Ok(refusal(format!("Exponent must be non-negative, got {}", exp)));
    }

    let mut rec = StepRecorder::new(limits);
    let m = modulus as i128;
    rec.push(rec.snap(
        &registers(&[1, base, exp]),
        &[],
        format!("Compute {}^{} mod {}", base, exp, modulus),
        0,
    ))?;

    let mut result: i128 = 1 % m;
    let mut b: i128 = (base as i128).rem_euclid(m);
    let mut e = exp;
    rec.push(rec.snap(
        &registers(&[result as i64, b as i64, e]),
        &[(0, Mark::Selected), (1, Mark::Selected)],
        format!("result = {}, base = {} mod {} = {}", result, base, modulus, b),
        1,
    ))?;

    while e > 0 {
        rec.count_comparison();
        if e & 1 == 1 {
            let next = (result * b) % m;
            rec.count_swap();
            rec.push(
                rec.snap(
                    &registers(&[result as i64, b as i64, e]),
                    &[(0, Mark::Swapping), (2, Mark::Comparing)],
                    format!("Bit is 1: result = {} * {} mod {} = {}", result, b, modulus, next),
                    3,
                )
                .with_info("bit", 1i64),
            )?;
            result = next;
        } else {
            rec.push(
                rec.snap(
                    &registers(&[result as i64, b as i64, e]),
                    &[(2, Mark::Comparing)],
                    "Bit is 0: skip the multiply",
                    3,
                )
                .with_info("bit", 0i64),
            )?;
        }

        let squared = (b * b) % m;
        rec.push(rec.snap(
            &registers(&[result as i64, b as i64, e]),
            &[(1, Mark::Swapping)],
            format!("base = {}^2 mod {} = {}", b, modulus, squared),
            4,
        ))?;
        b = squared;

        rec.push(rec.snap(
            &registers(&[result as i64, b as i64, e]),
            &[(2, Mark::Swapping)],
            format!("exp = {} >> 1 = {}", e, e >> 1),
            5,
        ))?;
        e >>= 1;
    }

    let result = result as i64;
    rec.push(
        rec.snap(
            &terminal(&[result]),
            &[],
            format!("{}^{} mod {} = {}", base, exp, modulus, result),
            6,
        )
        .with_info("result", result),
    )?;
    Ok(rec.finish())
}

fn plain_modulo(a: i64, m: i64, limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    if m <= 0 {
        return Ok(refusal(format!("Modulus must be positive, got {}", m)));
    }
    let mut rec = StepRecorder::new(limits);
    rec.push(rec.snap(&registers(&[a, m]), &[], format!("Compute {} mod {}", a, m), 0))?;
    let r = a.rem_euclid(m);
    rec.push(
        rec.snap(&terminal(&[r]), &[], format!("{} mod {} = {}", a, m, r), 6)
            .with_info("result", r),
    )?;
    Ok(rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::InfoValue;
    use test_case::test_case;

    #[test_case(&[2, 10, 1000], 24 ; "two to the tenth")]
    #[test_case(&[3, 0, 7], 1 ; "zero exponent")]
    #[test_case(&[5, 3, 1], 0 ; "modulus one")]
    #[test_case(&[-2, 3, 5], 2 ; "negative base")]
    #[test_case(&[17, 5], 2 ; "plain modulo")]
    fn computes(input: &[i64], expected: i64) {
        let steps = steps(input, TraceLimits::default()).unwrap();
        assert_eq!(steps.last().unwrap().info["result"], InfoValue::Int(expected));
    }

    #[test]
    fn one_multiply_decision_per_bit() {
        // 13 = 0b1101
        let steps = steps(&[3, 13, 100], TraceLimits::default()).unwrap();
        let decisions = steps.iter().filter(|s| s.code_line == 3).count();
        assert_eq!(decisions, 4);
        assert_eq!(steps.last().unwrap().swaps, 3);
    }

    #[test]
    fn non_positive_modulus_is_refused() {
        let steps = steps(&[2, 3, 0], TraceLimits::default()).unwrap();
        assert_eq!(steps.len(), 1);
        assert!(steps[0].is_error());
    }
}
