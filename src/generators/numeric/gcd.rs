//! Euclid's algorithm trace

use super::{refusal, registers, terminal};
use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "function gcd(a, b)",
    "  while b != 0",
    "    r = a mod b",
    "    a = b; b = r",
    "  return a",
];

pub fn steps(values: &[i64], limits: TraceLimits) -> Result<Vec<Step>, GeneratorError> {
    let &[a, b] = values else {
        return Ok(refusal(format!(
            "GCD needs exactly two values, got {}",
            values.len()
        )));
    };

    let mut rec = StepRecorder::new(limits);
    // magnitudes live in u64 so that |i64::MIN| is exact
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    rec.push(rec.snap(
        &registers(&[shown(a), shown(b)]),
        &[],
        format!("Compute gcd({}, {})", a, b),
        0,
    ))?;

    while b != 0 {
        rec.count_comparison();
        let r = a % b;
        rec.push(
            rec.snap(
                &registers(&[shown(a), shown(b)]),
                &[(0, Mark::Comparing), (1, Mark::Comparing)],
                format!("{} mod {} = {}", a, b, r),
                2,
            )
            .with_info("remainder", shown(r)),
        )?;

        rec.count_swap();
        rec.push(
            rec.snap(
                &registers(&[shown(a), shown(b)]),
                &[(0, Mark::Swapping), (1, Mark::Swapping)],
                format!("a = {}, b = {}", b, r),
                3,
            )
            .with_info("remainder", shown(r)),
        )?;
        a = b;
        b = r;
    }

    let Ok(result) = i64::try_from(a) else {
        tracing::warn!(gcd = a, "gcd does not fit in a signed 64-bit register");
        rec.push(
            rec.snap(&[], &[], format!("GCD is {}, which does not fit in an i64", a), 4)
                .with_info("error", true),
        )?;
        return Ok(rec.finish());
    };
    let description = if result == 0 {
        "gcd(0, 0) is defined as 0".to_string()
    } else {
        format!("GCD is {}", result)
    };
    rec.push(rec.snap(&terminal(&[result]), &[], description, 4).with_info("gcd", result))?;
    Ok(rec.finish())
}

/// Register value for display; only 2^63 saturates
fn shown(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Plain gcd of the magnitudes, used by tests and by callers that only need the answer
pub fn gcd(a: i64, b: i64) -> u64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::InfoValue;

    #[test]
    fn gcd_of_48_and_18_is_6() {
        let steps = steps(&[48, 18], TraceLimits::default()).unwrap();
        let last = steps.last().unwrap();
        assert_eq!(last.values(), vec![6]);
        assert_eq!(last.info["gcd"], InfoValue::Int(6));
        assert_eq!(gcd(48, 18), 6);
    }

    #[test]
    fn alternates_remainder_and_reassign() {
        let steps = steps(&[48, 18], TraceLimits::default()).unwrap();
        let lines: Vec<usize> = steps.iter().map(|s| s.code_line).collect();
        assert_eq!(lines, vec![0, 2, 3, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn zero_zero_is_zero() {
        let steps = steps(&[0, 0], TraceLimits::default()).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps.last().unwrap().values(), vec![0]);
    }

    #[test]
    fn minimum_i64_inputs_do_not_overflow() {
        let coprime = steps(&[5, i64::MIN], TraceLimits::default()).unwrap();
        assert_eq!(coprime.last().unwrap().info["gcd"], InfoValue::Int(1));
        assert_eq!(gcd(5, i64::MIN), 1);
        assert_eq!(gcd(i64::MIN, 6), 2);

        let power = steps(&[i64::MIN, 4096], TraceLimits::default()).unwrap();
        assert_eq!(power.last().unwrap().info["gcd"], InfoValue::Int(4096));
    }

    #[test]
    fn gcd_beyond_i64_is_an_error_step() {
        let steps = steps(&[0, i64::MIN], TraceLimits::default()).unwrap();
        let last = steps.last().unwrap();
        assert!(last.is_error());
        assert_eq!(last.code_line, 4);
        assert_eq!(gcd(0, i64::MIN), 1u64 << 63);
    }

    #[test]
    fn wrong_argument_count_is_a_single_error_step() {
        let steps = steps(&[4, 6, 8], TraceLimits::default()).unwrap();
        assert_eq!(steps.len(), 1);
        assert!(steps[0].is_error());
    }
}
