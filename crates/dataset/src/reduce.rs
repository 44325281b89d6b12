//! Min/max reduction over price windows.

use advisor_core::{Error, PriceRange, Quote, Result};

/// Minimum and maximum price of a window of quotes.
///
/// Fails with an empty-window error when there is nothing to reduce.
pub fn min_max(quotes: &[&Quote]) -> Result<PriceRange> {
    let prices: Vec<f64> = quotes.iter().map(|q| q.price).collect();
    min_max_prices(&prices)
        .ok_or_else(|| Error::empty_window("cannot take min/max of an empty window"))
}

/// Pairwise min/max over raw prices.
///
/// Elements are compared two at a time (larger against the running max,
/// smaller against the running min), so a window of `n` prices costs about
/// `3n/2` comparisons. An odd-length window seeds both ends with its first
/// price; an even-length one seeds them from its first pair.
pub fn min_max_prices(prices: &[f64]) -> Option<PriceRange> {
    let (mut range, rest) = match prices {
        [] => return None,
        [a, b, rest @ ..] if prices.len() % 2 == 0 => (ordered_pair(*a, *b), rest),
        [a, rest @ ..] => (PriceRange { min: *a, max: *a }, rest),
    };

    for pair in rest.chunks_exact(2) {
        let PriceRange { min: lo, max: hi } = ordered_pair(pair[0], pair[1]);
        if hi > range.max {
            range.max = hi;
        }
        if lo < range.min {
            range.min = lo;
        }
    }

    Some(range)
}

#[inline]
fn ordered_pair(a: f64, b: f64) -> PriceRange {
    if a > b {
        PriceRange { min: b, max: a }
    } else {
        PriceRange { min: a, max: b }
    }
}
