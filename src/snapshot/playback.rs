//! Cursor over a finished trace, and the stepping seam used by the player
//!
//! Playback is a pure transition over an index: `step_forward` and
//! `step_backward` only move the cursor, they never touch the steps. The timer
//! that calls them lives in the UI layer.

use super::Step;
use crate::errors::PlaybackError;
use std::borrow::Cow;

/// Anything the player can drive one step at a time
pub trait Stepper {
    /// Snapshot to render at the current position
    fn current(&self) -> Cow<'_, Step>;

    fn step_forward(&mut self) -> Result<(), PlaybackError>;

    fn step_backward(&mut self) -> Result<(), PlaybackError>;

    fn rewind_to_start(&mut self) -> Result<(), PlaybackError>;

    /// Zero-based index of the current step
    fn position(&self) -> usize;

    /// Total number of steps, `None` when the engine generates steps live
    fn total(&self) -> Option<usize>;

    /// Narration of every step up to and including the current one
    fn narration(&self) -> Vec<String>;
}

/// Index-based playback over a fully generated trace
#[derive(Debug, Clone)]
pub struct Playback {
    steps: Vec<Step>,
    position: usize,
}

impl Playback {
    pub fn new(steps: Vec<Step>) -> Result<Self, PlaybackError> {
        if steps.is_empty() {
            return Err(PlaybackError::Empty);
        }
        Ok(Playback { steps, position: 0 })
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.steps.len()
    }

    /// Jump directly to step `index`
    pub fn seek(&mut self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.steps.len() {
            return Err(PlaybackError::OutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        self.position = index;
        Ok(())
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.steps.len() - 1;
    }
}

impl Stepper for Playback {
    fn current(&self) -> Cow<'_, Step> {
        Cow::Borrowed(&self.steps[self.position])
    }

    fn step_forward(&mut self) -> Result<(), PlaybackError> {
        if self.is_at_end() {
            return Err(PlaybackError::AtEnd);
        }
        self.position += 1;
        Ok(())
    }

    fn step_backward(&mut self) -> Result<(), PlaybackError> {
        if self.position == 0 {
            return Err(PlaybackError::AtStart);
        }
        self.position -= 1;
        Ok(())
    }

    fn rewind_to_start(&mut self) -> Result<(), PlaybackError> {
        self.position = 0;
        Ok(())
    }

    fn position(&self) -> usize {
        self.position
    }

    fn total(&self) -> Option<usize> {
        Some(self.steps.len())
    }

    fn narration(&self) -> Vec<String> {
        self.steps[..=self.position]
            .iter()
            .map(|s| s.description.clone())
            .collect()
    }
}
