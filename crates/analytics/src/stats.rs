//! Price statistics over windows.

use ordered_float::OrderedFloat;
use statrs::statistics::Statistics;

/// Arithmetic mean, or `None` for an empty window.
pub fn mean(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    Some(prices.mean())
}

/// Mean with empty windows counting as zero.
#[inline]
pub fn mean_or_zero(prices: &[f64]) -> f64 {
    mean(prices).unwrap_or(0.0)
}

/// Median of a price pool where each price stands for `weight` copies of
/// itself, or `None` when the total weight is zero.
///
/// Odd-sized pools yield the middle element; even-sized pools the mean of
/// the two central elements. Input order does not matter and the pool is
/// never expanded.
pub fn weighted_median(prices: &[(f64, usize)]) -> Option<f64> {
    let mut sorted: Vec<(OrderedFloat<f64>, u128)> = prices
        .iter()
        .filter(|(_, weight)| *weight > 0)
        .map(|&(price, weight)| (OrderedFloat(price), weight as u128))
        .collect();
    sorted.sort_unstable_by_key(|&(price, _)| price);

    let total: u128 = sorted.iter().map(|&(_, weight)| weight).sum();
    if total == 0 {
        return None;
    }
    let mid = total / 2;
    if total % 2 == 1 {
        nth_weighted(&sorted, mid)
    } else {
        Some((nth_weighted(&sorted, mid - 1)? + nth_weighted(&sorted, mid)?) / 2.0)
    }
}

/// Element at zero-based `rank` of the expanded, sorted pool.
fn nth_weighted(sorted: &[(OrderedFloat<f64>, u128)], rank: u128) -> Option<f64> {
    let mut seen = 0u128;
    sorted
        .iter()
        .find(|&&(_, weight)| {
            seen += weight;
            seen > rank
        })
        .map(|&(price, _)| price.0)
}
