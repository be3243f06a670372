use std::time::Duration;

/// Accumulated stage durations. Slot `i` holds the running total for pipeline stage `i`.
#[derive(Debug, Default, Clone)]
pub struct TimeCalc {
    samples: usize,
    stages: Vec<Duration>,
}

impl TimeCalc {
    pub fn total(&self) -> Duration {
        self.stages.iter().sum()
    }

    /// Number of complete runs recorded, assuming every run fills every slot.
    pub fn n(&self) -> usize {
        match self.stages.len() {
            0 => 0,
            slots => self.samples / slots,
        }
    }

    /// Mean duration of a whole run.
    pub fn avg(&self) -> Duration {
        match self.n() {
            0 => Duration::ZERO,
            n => self.total() / n as u32,
        }
    }

    /// Mean duration of stage `i`, `None` if that stage was never recorded.
    pub fn avg_i(&self, i: usize) -> Option<Duration> {
        let total = self.stages.get(i)?;
        Some(match self.n() {
            0 => Duration::ZERO,
            n => *total / n as u32,
        })
    }

    pub fn stages(&self) -> &[Duration] {
        &self.stages
    }

    /// Adds `x` to slot `i`. A slot past the end is appended.
    pub fn add_or_push(&mut self, i: usize, x: Duration) {
        match self.stages.get_mut(i) {
            Some(slot) => *slot += x,
            None => self.stages.push(x),
        }
        self.samples += 1;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
