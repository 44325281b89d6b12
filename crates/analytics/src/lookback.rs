//! Backward walk over ticks.

use advisor_core::Result;
use advisor_dataset::Dataset;
use std::collections::HashMap;

/// Iterator over `n` ticks ending at a start timestamp, newest first.
///
/// The start timestamp is yielded as given; each following item is the
/// previous tick in circular order, so a walk longer than the history wraps
/// around to the latest tick.
pub struct Lookback<'a> {
    dataset: &'a Dataset,
    next: Option<&'a str>,
    remaining: usize,
}

impl<'a> Lookback<'a> {
    /// Start a walk of `ticks` steps at `start`.
    ///
    /// Fails if the dataset is empty.
    pub fn new(dataset: &'a Dataset, start: &'a str, ticks: usize) -> Result<Self> {
        dataset.earliest_timestamp()?;
        Ok(Self {
            dataset,
            next: Some(start),
            remaining: ticks,
        })
    }
}

impl<'a> Iterator for Lookback<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = if self.remaining > 0 {
            self.dataset.previous_timestamp(current).ok()
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Distinct ticks of a `ticks`-step walk from `start`, newest first, each
/// with the number of times the walk visits it.
///
/// The walk is periodic once a tick repeats, so only the first lap is
/// walked; the remaining steps are spread over the cycle arithmetically.
/// The visit counts always sum to `ticks`.
pub fn tick_weights<'a>(dataset: &'a Dataset, start: &'a str, ticks: usize) -> Result<Vec<(&'a str, usize)>> {
    let mut first_visit: HashMap<&'a str, usize> = HashMap::new();
    let mut walk: Vec<(&'a str, usize)> = Vec::new();

    for ts in Lookback::new(dataset, start, ticks)? {
        if let Some(&cycle_start) = first_visit.get(ts) {
            let remaining = ticks - walk.len();
            let cycle = &mut walk[cycle_start..];
            let laps = remaining / cycle.len();
            let extra = remaining % cycle.len();
            for (offset, (_, visits)) in cycle.iter_mut().enumerate() {
                *visits += laps + usize::from(offset < extra);
            }
            break;
        }
        first_visit.insert(ts, walk.len());
        walk.push((ts, 1));
    }

    Ok(walk)
}
