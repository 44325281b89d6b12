//! Exponentially weighted moving average.
//!
//! The oldest sample seeds the average; each newer sample `p` updates it as
//! `E = p * alpha + E_prev * (1 - alpha)`.

/// EWMA with a fixed smoothing factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ewma {
    alpha: f64,
}

impl Ewma {
    /// Create an EWMA with smoothing factor `alpha`.
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Fold samples given oldest first into a single average.
    ///
    /// Returns `None` when there are no samples.
    pub fn fold<I>(&self, oldest_first: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut samples = oldest_first.into_iter();
        let seed = samples.next()?;
        Some(samples.fold(seed, |prev, price| self.step(prev, price)))
    }

    /// Running average after each sample, oldest first.
    ///
    /// The first element is the seed; the last equals [`Ewma::fold`].
    pub fn path<I>(&self, oldest_first: I) -> Vec<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut samples = oldest_first.into_iter();
        let Some(seed) = samples.next() else {
            return Vec::new();
        };
        std::iter::once(seed)
            .chain(samples.scan(seed, |prev, price| {
                *prev = self.step(*prev, price);
                Some(*prev)
            }))
            .collect()
    }

    // Same as price * alpha + prev * (1 - alpha), but exact for flat series.
    #[inline]
    fn step(&self, prev: f64, price: f64) -> f64 {
        (price - prev) * self.alpha + prev
    }
}
