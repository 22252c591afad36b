//! Step model and trace recording
//!
//! A [`Step`] is a complete, owned snapshot of an algorithm at one instant.
//! Generators build traces through a [`StepRecorder`], which stamps the running
//! comparison/swap totals onto every step and enforces a memory budget, the
//! same way an execution history caps its snapshot ring.
//!
//! Nothing in a step is shared with any other step: arrays are cloned on every
//! snapshot, so a renderer can hold several steps at once and stepping back
//! never observes a later mutation.

pub mod playback;

use crate::config::TraceLimits;
use crate::errors::GeneratorError;
use serde::Serialize;
use std::collections::BTreeMap;

pub use playback::{Playback, Stepper};

/// Sentinel rendered as infinity (unreachable distance, unset low-link)
pub const INFINITY: i64 = i64::MAX;

/// One slot of the visualized array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArrayElement {
    pub value: i64,
    /// Position of this element in the original input
    pub origin: usize,
    pub is_comparing: bool,
    pub is_swapping: bool,
    pub is_sorted: bool,
    pub is_selected: bool,
    pub is_pivot: bool,
}

impl ArrayElement {
    pub fn new(value: i64, origin: usize) -> Self {
        ArrayElement {
            value,
            origin,
            is_comparing: false,
            is_swapping: false,
            is_sorted: false,
            is_selected: false,
            is_pivot: false,
        }
    }

    /// Build a fresh array from raw values, tagging each with its input index
    pub fn from_values(values: &[i64]) -> Vec<ArrayElement> {
        values
            .iter()
            .enumerate()
            .map(|(origin, &value)| ArrayElement::new(value, origin))
            .collect()
    }

    /// Copy without any transient role markers (`is_sorted` is kept)
    pub fn cleared(&self) -> Self {
        ArrayElement {
            is_comparing: false,
            is_swapping: false,
            is_selected: false,
            is_pivot: false,
            ..*self
        }
    }

    fn apply(&mut self, mark: Mark) {
        match mark {
            Mark::Comparing => self.is_comparing = true,
            Mark::Swapping => self.is_swapping = true,
            Mark::Selected => self.is_selected = true,
            Mark::Pivot => self.is_pivot = true,
            Mark::Sorted => self.is_sorted = true,
        }
    }
}

/// Transient role applied to one slot of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Comparing,
    Swapping,
    Selected,
    Pivot,
    Sorted,
}

/// Snapshot `array` with transient flags cleared and `marks` applied.
///
/// Marks pointing past the end of the array are ignored.
pub fn marked(array: &[ArrayElement], marks: &[(usize, Mark)]) -> Vec<ArrayElement> {
    let mut view: Vec<ArrayElement> = array.iter().map(ArrayElement::cleared).collect();
    for &(index, mark) in marks {
        if let Some(slot) = view.get_mut(index) {
            slot.apply(mark);
        }
    }
    view
}

/// Algorithm-specific extra state attached to a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InfoValue {
    Int(i64),
    Bool(bool),
    Text(String),
    List(Vec<i64>),
    Table(Vec<Vec<i64>>),
}

impl InfoValue {
    fn estimated_size(&self) -> usize {
        match self {
            InfoValue::Int(_) | InfoValue::Bool(_) => 8,
            InfoValue::Text(s) => s.len(),
            InfoValue::List(items) => items.len() * 8,
            InfoValue::Table(rows) => rows.iter().map(|r| r.len() * 8 + 24).sum(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            InfoValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[i64]> {
        match self {
            InfoValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&[Vec<i64>]> {
        match self {
            InfoValue::Table(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InfoValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for InfoValue {
    fn from(v: i64) -> Self {
        InfoValue::Int(v)
    }
}

impl From<usize> for InfoValue {
    fn from(v: usize) -> Self {
        InfoValue::Int(v as i64)
    }
}

impl From<bool> for InfoValue {
    fn from(v: bool) -> Self {
        InfoValue::Bool(v)
    }
}

impl From<&str> for InfoValue {
    fn from(v: &str) -> Self {
        InfoValue::Text(v.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(v: String) -> Self {
        InfoValue::Text(v)
    }
}

impl From<Vec<i64>> for InfoValue {
    fn from(v: Vec<i64>) -> Self {
        InfoValue::List(v)
    }
}

impl From<&[i64]> for InfoValue {
    fn from(v: &[i64]) -> Self {
        InfoValue::List(v.to_vec())
    }
}

impl From<Vec<usize>> for InfoValue {
    fn from(v: Vec<usize>) -> Self {
        InfoValue::List(v.into_iter().map(|x| x as i64).collect())
    }
}

impl From<Vec<Vec<i64>>> for InfoValue {
    fn from(v: Vec<Vec<i64>>) -> Self {
        InfoValue::Table(v)
    }
}

/// Snapshot of algorithm state at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub array: Vec<ArrayElement>,
    pub description: String,
    /// Index into the algorithm's pseudocode listing
    pub code_line: usize,
    /// Running totals as of this step
    pub comparisons: u64,
    pub swaps: u64,
    pub i: Option<usize>,
    pub j: Option<usize>,
    pub info: BTreeMap<String, InfoValue>,
}

impl Step {
    pub fn new(array: Vec<ArrayElement>, description: impl Into<String>, code_line: usize) -> Self {
        Step {
            array,
            description: description.into(),
            code_line,
            comparisons: 0,
            swaps: 0,
            i: None,
            j: None,
            info: BTreeMap::new(),
        }
    }

    /// A single explanatory step returned for malformed argument lists
    pub fn error(description: impl Into<String>) -> Self {
        Step::new(Vec::new(), description, 0).with_info("error", true)
    }

    pub fn at(mut self, i: impl Into<Option<usize>>, j: impl Into<Option<usize>>) -> Self {
        self.i = i.into();
        self.j = j.into();
        self
    }

    pub fn with_info(mut self, key: &str, value: impl Into<InfoValue>) -> Self {
        self.info.insert(key.to_string(), value.into());
        self
    }

    /// Value sequence of the array, ignoring flags
    pub fn values(&self) -> Vec<i64> {
        self.array.iter().map(|e| e.value).collect()
    }

    pub fn is_error(&self) -> bool {
        matches!(self.info.get("error"), Some(InfoValue::Bool(true)))
    }

    /// Estimate the memory usage of this step in bytes
    pub fn estimated_size(&self) -> usize {
        let array = self.array.len() * std::mem::size_of::<ArrayElement>();
        let info: usize = self
            .info
            .iter()
            .map(|(k, v)| k.len() + v.estimated_size())
            .sum();
        array + self.description.len() + info + std::mem::size_of::<Step>()
    }
}

/// Builds a trace, carrying running counters and a memory budget
#[derive(Debug)]
pub struct StepRecorder {
    steps: Vec<Step>,
    comparisons: u64,
    swaps: u64,
    max_memory: usize,
    current_memory: usize,
}

impl StepRecorder {
    pub fn new(limits: TraceLimits) -> Self {
        StepRecorder {
            steps: Vec::new(),
            comparisons: 0,
            swaps: 0,
            max_memory: limits.max_memory,
            current_memory: 0,
        }
    }

    /// A recorder whose counters continue from an earlier phase's totals
    pub fn resume(comparisons: u64, swaps: u64, limits: TraceLimits) -> Self {
        StepRecorder {
            comparisons,
            swaps,
            ..StepRecorder::new(limits)
        }
    }

    pub fn count_comparison(&mut self) {
        self.comparisons += 1;
    }

    pub fn count_swap(&mut self) {
        self.swaps += 1;
    }

    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Build a step from `array` with `marks` applied and the current counters
    pub fn snap(
        &self,
        array: &[ArrayElement],
        marks: &[(usize, Mark)],
        description: impl Into<String>,
        code_line: usize,
    ) -> Step {
        let mut step = Step::new(marked(array, marks), description, code_line);
        step.comparisons = self.comparisons;
        step.swaps = self.swaps;
        step
    }

    /// Append a step to the trace
    pub fn push(&mut self, step: Step) -> Result<(), GeneratorError> {
        let size = step.estimated_size();
        if self.current_memory + size > self.max_memory {
            return Err(GeneratorError::TraceLimitExceeded {
                current: self.current_memory,
                step: size,
                limit: self.max_memory,
            });
        }
        self.current_memory += size;
        self.steps.push(step);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn finish(self) -> Vec<Step> {
        self.steps
    }
}

impl Default for StepRecorder {
    fn default() -> Self {
        Self::new(TraceLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_clears_transient_flags_but_keeps_sorted() {
        let mut base = ArrayElement::from_values(&[3, 1, 2]);
        base[0].is_comparing = true;
        base[2].is_sorted = true;

        let view = marked(&base, &[(1, Mark::Swapping), (7, Mark::Pivot)]);
        assert!(!view[0].is_comparing);
        assert!(view[1].is_swapping);
        assert!(view[2].is_sorted);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn recorder_stamps_running_counters() {
        let mut rec = StepRecorder::default();
        let arr = ArrayElement::from_values(&[1, 2]);
        rec.push(rec.snap(&arr, &[], "start", 0)).unwrap();
        rec.count_comparison();
        rec.count_swap();
        rec.push(rec.snap(&arr, &[], "after", 1)).unwrap();

        let steps = rec.finish();
        assert_eq!((steps[0].comparisons, steps[0].swaps), (0, 0));
        assert_eq!((steps[1].comparisons, steps[1].swaps), (1, 1));
    }

    #[test]
    fn recorder_rejects_steps_past_budget() {
        let limits = TraceLimits {
            max_memory: 64,
            ..TraceLimits::default()
        };
        let mut rec = StepRecorder::new(limits);
        let arr = ArrayElement::from_values(&[1; 32]);
        let err = rec.push(rec.snap(&arr, &[], "too big", 0)).unwrap_err();
        assert!(matches!(err, GeneratorError::TraceLimitExceeded { .. }));
        assert!(rec.is_empty());
    }

    #[test]
    fn error_step_is_flagged() {
        let step = Step::error("GCD needs exactly two values");
        assert!(step.is_error());
        assert!(step.array.is_empty());
    }
}
