//! Knuth-Morris-Pratt: LPS construction and search as two steppable traces
//!
//! Both traces share one pseudocode listing; search lines start at
//! [`SEARCH_OFFSET`]. The LPS trace's array is the table being built, the
//! search trace's array is the text as code points with the current window
//! highlighted.

use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use crate::snapshot::{ArrayElement, Mark, Step, StepRecorder};

pub const PSEUDOCODE: &[&str] = &[
    "function buildLPS(P)",
    "  lps[0] = 0; len = 0; i = 1",
    "  while i < m",
    "    if P[i] == P[len]",
    "      len++; lps[i] = len; i++",
    "    else if len != 0",
    "      len = lps[len - 1]",
    "    else",
    "      lps[i] = 0; i++",
    "  return lps",
    "function kmpSearch(T, P)",
    "  i = 0; j = 0",
    "  while i < n",
    "    if T[i] == P[j]",
    "      i++; j++",
    "      if j == m: match at i - j; j = lps[j - 1]",
    "    else if j > 0",
    "      j = lps[j - 1]",
    "    else",
    "      i++",
    "  return matches",
];

/// First search line in [`PSEUDOCODE`]
pub const SEARCH_OFFSET: usize = 10;

/// Both traces plus the values they compute
#[derive(Debug, Clone)]
pub struct KmpTrace {
    pub lps: Vec<usize>,
    pub lps_steps: Vec<Step>,
    pub matches: Vec<usize>,
    pub search_steps: Vec<Step>,
}

impl KmpTrace {
    /// LPS trace followed by the search trace, for single-cursor playback
    pub fn combined(&self) -> Vec<Step> {
        self.lps_steps
            .iter()
            .chain(&self.search_steps)
            .cloned()
            .collect()
    }
}

fn lps_array(lps: &[usize]) -> Vec<ArrayElement> {
    lps.iter()
        .enumerate()
        .map(|(k, &v)| ArrayElement::new(v as i64, k))
        .collect()
}

/// Build the LPS table, recording a step before and after each decision
pub fn build_lps(pattern: &[char], limits: TraceLimits) -> Result<(Vec<usize>, Vec<Step>), GeneratorError> {
    let m = pattern.len();
    let text: String = pattern.iter().collect();
    let mut rec = StepRecorder::new(limits);
    let mut lps = vec![0usize; m];
    let mut len = 0usize;
    let mut i = 1usize;

    rec.push(
        rec.snap(&lps_array(&lps), &[], format!("Build the LPS table for \"{}\"", text), 0)
            .with_info("pattern", text.clone()),
    )?;
    rec.push(
        rec.snap(&lps_array(&lps), &[(0, Mark::Sorted)], "lps[0] = 0, len = 0, i = 1", 1)
            .at(i, len)
            .with_info("pattern", text.clone())
            .with_info("len", len),
    )?;

    while i < m {
        rec.count_comparison();
        let matched = pattern[i] == pattern[len];
        rec.push(
            rec.snap(
                &lps_array(&lps),
                &[(i, Mark::Comparing), (len, Mark::Comparing)],
                format!(
                    "Compare P[{}] = '{}' with P[{}] = '{}'",
                    i, pattern[i], len, pattern[len]
                ),
                3,
            )
            .at(i, len)
            .with_info("pattern", text.clone())
            .with_info("len", len),
        )?;

        let (description, line) = if matched {
            len += 1;
            lps[i] = len;
            i += 1;
            (format!("Match: len = {}, lps[{}] = {}", len, i - 1, len), 4)
        } else if len != 0 {
            let fallback = lps[len - 1];
            let description = format!("Mismatch: fall back len = lps[{}] = {}", len - 1, fallback);
            len = fallback;
            (description, 6)
        } else {
            lps[i] = 0;
            i += 1;
            (format!("Mismatch with len = 0: lps[{}] = 0", i - 1), 8)
        };
        if line != 6 {
            rec.count_swap();
        }

        let done: Vec<(usize, Mark)> = (0..i).map(|k| (k, Mark::Sorted)).collect();
        rec.push(
            rec.snap(&lps_array(&lps), &done, description, line)
                .at(i, len)
                .with_info("pattern", text.clone())
                .with_info("len", len),
        )?;
    }

    let mut finished = lps_array(&lps);
    for slot in finished.iter_mut() {
        slot.is_sorted = true;
    }
    let listing: Vec<String> = lps.iter().map(|v| v.to_string()).collect();
    rec.push(
        rec.snap(&finished, &[], format!("LPS table: [{}]", listing.join(", ")), 9)
            .with_info("pattern", text)
            .with_info("lps", lps.clone()),
    )?;
    Ok((lps, rec.finish()))
}

fn text_array(text: &[char]) -> Vec<ArrayElement> {
    text.iter()
        .enumerate()
        .map(|(k, &c)| ArrayElement::new(c as i64, k))
        .collect()
}

/// Search `text` for `pattern` using a prebuilt LPS table.
/// Counters start from `carried`, the (comparisons, swaps) totals of the LPS phase.
pub fn search(
    text: &[char],
    pattern: &[char],
    lps: &[usize],
    carried: (u64, u64),
    limits: TraceLimits,
) -> Result<(Vec<usize>, Vec<Step>), GeneratorError> {
    let (n, m) = (text.len(), pattern.len());
    let pattern_text: String = pattern.iter().collect();
    let lps_list: Vec<usize> = lps.to_vec();
    let mut rec = StepRecorder::resume(carried.0, carried.1, limits);
    let base = text_array(text);
    let mut matches: Vec<usize> = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    let window = |i: usize, j: usize, extra: Option<(usize, Mark)>| -> Vec<(usize, Mark)> {
        let mut marks: Vec<(usize, Mark)> = (i - j..i).map(|k| (k, Mark::Selected)).collect();
        marks.extend(extra);
        marks
    };

    rec.push(
        rec.snap(&base, &[], format!("Search for \"{}\"", pattern_text), SEARCH_OFFSET)
            .with_info("pattern", pattern_text.clone())
            .with_info("lps", lps_list.clone()),
    )?;
    rec.push(
        rec.snap(&base, &[], "i = 0, j = 0", SEARCH_OFFSET + 1)
            .at(0, 0)
            .with_info("pattern", pattern_text.clone())
            .with_info("lps", lps_list.clone()),
    )?;

    while i < n {
        rec.count_comparison();
        let matched = text[i] == pattern[j];
        rec.push(
            rec.snap(
                &base,
                &window(i, j, Some((i, Mark::Comparing))),
                format!("Compare T[{}] = '{}' with P[{}] = '{}'", i, text[i], j, pattern[j]),
                SEARCH_OFFSET + 3,
            )
            .at(i, j)
            .with_info("pattern", pattern_text.clone())
            .with_info("lps", lps_list.clone())
            .with_info("matches", matches.clone()),
        )?;

        let (description, line) = if matched {
            i += 1;
            j += 1;
            if j == m {
                let at = i - j;
                matches.push(at);
                rec.count_swap();
                let fallback = lps[j - 1];
                rec.push(
                    rec.snap(
                        &base,
                        &window(i, j, Some((at, Mark::Pivot))),
                        format!("Full match at index {}", at),
                        SEARCH_OFFSET + 5,
                    )
                    .at(i, j)
                    .with_info("pattern", pattern_text.clone())
                    .with_info("lps", lps_list.clone())
                    .with_info("matches", matches.clone()),
                )?;
                j = fallback;
                (format!("Continue with j = lps[{}] = {}", m - 1, fallback), SEARCH_OFFSET + 5)
            } else {
                ("Characters match: advance i and j".to_string(), SEARCH_OFFSET + 4)
            }
        } else if j > 0 {
            let fallback = lps[j - 1];
            let description = format!("Mismatch: j = lps[{}] = {}, i stays {}", j - 1, fallback, i);
            j = fallback;
            (description, SEARCH_OFFSET + 7)
        } else {
            i += 1;
            ("Mismatch at j = 0: advance i".to_string(), SEARCH_OFFSET + 9)
        };

        rec.push(
            rec.snap(&base, &window(i, j, None), description, line)
                .at(i, j)
                .with_info("pattern", pattern_text.clone())
                .with_info("lps", lps_list.clone())
                .with_info("matches", matches.clone()),
        )?;
    }

    let mut finished = base.clone();
    for slot in finished.iter_mut() {
        slot.is_sorted = true;
    }
    let marks: Vec<(usize, Mark)> = matches.iter().map(|&at| (at, Mark::Pivot)).collect();
    let listing: Vec<String> = matches.iter().map(|v| v.to_string()).collect();
    rec.push(
        rec.snap(
            &finished,
            &marks,
            format!("Found {} match(es) at [{}]", matches.len(), listing.join(", ")),
            SEARCH_OFFSET + 10,
        )
        .with_info("pattern", pattern_text)
        .with_info("lps", lps_list)
        .with_info("matches", matches.clone()),
    )?;
    Ok((matches, rec.finish()))
}

/// Run both phases. An empty pattern yields a single explanatory step in each trace.
pub fn trace(text: &str, pattern: &str, limits: TraceLimits) -> Result<KmpTrace, GeneratorError> {
    if pattern.is_empty() {
        tracing::warn!("refusing empty KMP pattern");
        let refusal = vec![Step::error("The pattern must not be empty")];
        return Ok(KmpTrace {
            lps: Vec::new(),
            lps_steps: refusal.clone(),
            matches: Vec::new(),
            search_steps: refusal,
        });
    }

    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    if text.len() > limits.max_array_len {
        return Err(GeneratorError::InputTooLarge {
            len: text.len(),
            limit: limits.max_array_len,
        });
    }

    let (lps, lps_steps) = build_lps(&pattern, limits)?;
    let carried = lps_steps
        .last()
        .map_or((0, 0), |step| (step.comparisons, step.swaps));
    let (matches, search_steps) = search(&text, &pattern, &lps, carried, limits)?;
    Ok(KmpTrace {
        lps,
        lps_steps,
        matches,
        search_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(text: &str, pattern: &str) -> Vec<usize> {
        let t: Vec<char> = text.chars().collect();
        let p: Vec<char> = pattern.chars().collect();
        if p.len() > t.len() {
            return Vec::new();
        }
        (0..=t.len() - p.len()).filter(|&i| t[i..i + p.len()] == p[..]).collect()
    }

    #[test]
    fn lps_matches_reference_table() {
        let pattern: Vec<char> = "AABAACAABAA".chars().collect();
        let (lps, steps) = build_lps(&pattern, TraceLimits::default()).unwrap();
        assert_eq!(lps, vec![0, 1, 0, 1, 2, 0, 1, 2, 3, 4, 5]);
        let last = steps.last().unwrap();
        assert_eq!(last.values(), vec![0, 1, 0, 1, 2, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn finds_overlapping_matches() {
        let trace = trace("AABAACAADAABAABA", "AABA", TraceLimits::default()).unwrap();
        assert_eq!(trace.matches, vec![0, 9, 12]);
        assert_eq!(trace.matches, brute_force("AABAACAADAABAABA", "AABA"));
    }

    #[test]
    fn never_moves_back_in_the_text() {
        let trace = trace("ABABDABACDABABCABAB", "ABABCABAB", TraceLimits::default()).unwrap();
        let positions: Vec<usize> = trace.search_steps.iter().filter_map(|s| s.i).collect();
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(trace.matches, vec![10]);
    }

    #[test]
    fn pattern_longer_than_text_has_no_match() {
        let trace = trace("AB", "ABC", TraceLimits::default()).unwrap();
        assert!(trace.matches.is_empty());
    }

    #[test]
    fn empty_pattern_is_refused() {
        let trace = trace("ABC", "", TraceLimits::default()).unwrap();
        assert_eq!(trace.lps_steps.len(), 1);
        assert!(trace.lps_steps[0].is_error());
    }

    #[test]
    fn combined_trace_keeps_both_phases() {
        let trace = trace("AAB", "AB", TraceLimits::default()).unwrap();
        let combined = trace.combined();
        assert_eq!(combined.len(), trace.lps_steps.len() + trace.search_steps.len());
        assert!(combined.last().unwrap().code_line >= SEARCH_OFFSET);
    }

    #[test]
    fn search_counters_continue_from_the_lps_phase() {
        let trace = trace("AABAACAADAABAABA", "AABA", TraceLimits::default()).unwrap();
        let lps_last = trace.lps_steps.last().unwrap();
        let search_first = &trace.search_steps[0];
        assert_eq!(
            (search_first.comparisons, search_first.swaps),
            (lps_last.comparisons, lps_last.swaps)
        );
        for pair in trace.combined().windows(2) {
            assert!(pair[0].comparisons <= pair[1].comparisons);
            assert!(pair[0].swaps <= pair[1].swaps);
        }
    }
}
