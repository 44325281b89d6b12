//! Circular timestamp navigation.
//!
//! Quotes are assumed ordered by non-decreasing timestamp. Ticks are the
//! distinct timestamps in that order; stepping past either end wraps.

use advisor_core::Quote;

/// Index of the first quote whose timestamp is strictly greater than `ts`.
#[inline]
pub(crate) fn upper_bound(quotes: &[Quote], ts: &str) -> usize {
    quotes.partition_point(|q| q.timestamp.as_str() <= ts)
}

/// Index of the first quote whose timestamp is not less than `ts`.
#[inline]
pub(crate) fn lower_bound(quotes: &[Quote], ts: &str) -> usize {
    quotes.partition_point(|q| q.timestamp.as_str() < ts)
}

/// Smallest timestamp strictly greater than `ts`, wrapping to the first.
///
/// Returns `None` only for an empty slice. `ts` need not be present.
pub(crate) fn next_timestamp<'a>(quotes: &'a [Quote], ts: &str) -> Option<&'a str> {
    let first = quotes.first()?;
    let last = quotes.last()?;

    if ts == last.timestamp {
        return Some(&first.timestamp);
    }

    let next = quotes.get(upper_bound(quotes, ts)).unwrap_or(first);
    Some(&next.timestamp)
}

/// Largest timestamp strictly less than `ts`, wrapping to the last.
///
/// Returns `None` only for an empty slice. `ts` need not be present.
pub(crate) fn previous_timestamp<'a>(quotes: &'a [Quote], ts: &str) -> Option<&'a str> {
    let first = quotes.first()?;
    let last = quotes.last()?;

    if ts == first.timestamp {
        return Some(&last.timestamp);
    }

    let prev = lower_bound(quotes, ts)
        .checked_sub(1)
        .map_or(last, |idx| &quotes[idx]);
    Some(&prev.timestamp)
}

/// Distinct timestamps in dataset order.
pub(crate) fn distinct_timestamps(quotes: &[Quote]) -> impl Iterator<Item = &str> + '_ {
    quotes
        .iter()
        .enumerate()
        .filter(move |(idx, q)| *idx == 0 || quotes[idx - 1].timestamp != q.timestamp)
        .map(|(_, q)| q.timestamp.as_str())
}
