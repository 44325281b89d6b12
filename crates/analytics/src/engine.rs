//! Analytics engine.
//!
//! Stateless queries over a borrowed [`Dataset`]. Each query takes raw
//! string arguments, validates all of them first, and only then computes.

use crate::ewma::Ewma;
use crate::lookback::{tick_weights, Lookback};
use crate::stats;
use crate::validation::{validate_extremum, validate_product, validate_side, validate_tick_count};
use advisor_core::{AnalyticsConfig, Error, Extremum, HistoryPolicy, Result, Side};
use advisor_dataset::Dataset;
use serde::Serialize;
use tracing::debug;

/// Mean price for one tick of an average query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickAverage {
    /// Tick timestamp.
    pub timestamp: String,
    /// Mean price, zero when no quotes matched.
    pub mean: f64,
    /// Number of quotes that matched.
    pub count: usize,
    /// Times the backward walk landed on this tick; above one once it wraps.
    pub visits: usize,
}

/// Result of an average query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageReport {
    /// Equal-weight mean of the per-tick means.
    pub average: f64,
    /// Per-tick breakdown of the distinct ticks walked, newest first.
    pub ticks: Vec<TickAverage>,
}

/// Result of a prediction query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted price for the next tick.
    pub price: f64,
    /// Which extremum was predicted.
    pub extremum: Extremum,
    /// Per-tick min or max samples, newest first.
    pub samples: Vec<f64>,
    /// Running EWMA, oldest first; the last value is `price`.
    pub smoothed: Vec<f64>,
}

/// Query engine over a dataset.
pub struct Analytics<'a> {
    dataset: &'a Dataset,
    prediction_ticks: usize,
    short_history: HistoryPolicy,
    ewma: Ewma,
}

impl<'a> Analytics<'a> {
    /// Create an engine over `dataset`.
    pub fn new(dataset: &'a Dataset, config: &AnalyticsConfig) -> Self {
        Self {
            dataset,
            prediction_ticks: config.prediction_ticks,
            short_history: config.short_history,
            ewma: Ewma::new(config.smoothing_factor()),
        }
    }

    /// The dataset being queried.
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Products available for querying, sorted.
    pub fn products(&self) -> Vec<&'a str> {
        self.dataset.unique_products().iter().map(String::as_str).collect()
    }

    /// Lowest `side` price for `product` at `timestamp`.
    pub fn min(&self, side: &str, product: &str, timestamp: &str) -> Result<f64> {
        let side = validate_side(side)?;
        let product = validate_product(self.dataset, product)?;
        self.extremum_at(Extremum::Min, side, product, timestamp)
    }

    /// Highest `side` price for `product` at `timestamp`.
    pub fn max(&self, side: &str, product: &str, timestamp: &str) -> Result<f64> {
        let side = validate_side(side)?;
        let product = validate_product(self.dataset, product)?;
        self.extremum_at(Extremum::Max, side, product, timestamp)
    }

    /// Mean `side` price over the last `ticks` ticks ending at `timestamp`.
    ///
    /// Each tick contributes its own mean with equal weight; ticks with no
    /// matching quotes contribute zero.
    pub fn average(&self, side: &str, product: &str, timestamp: &str, ticks: &str) -> Result<f64> {
        self.average_report(side, product, timestamp, ticks)
            .map(|report| report.average)
    }

    /// Average query with its per-tick breakdown.
    pub fn average_report(
        &self,
        side: &str,
        product: &str,
        timestamp: &str,
        ticks: &str,
    ) -> Result<AverageReport> {
        let side = validate_side(side)?;
        let product = validate_product(self.dataset, product)?;
        let n = validate_tick_count(ticks)?;

        let mut breakdown = Vec::new();
        for (ts, visits) in tick_weights(self.dataset, timestamp, n)? {
            let prices = self.prices(side, product, ts);
            let mean = stats::mean_or_zero(&prices);
            debug!(timestamp = ts, mean, count = prices.len(), visits, "tick average");
            breakdown.push(TickAverage {
                timestamp: ts.to_string(),
                mean,
                count: prices.len(),
                visits,
            });
        }

        let total: f64 = breakdown.iter().map(|t| t.mean * t.visits as f64).sum();
        Ok(AverageReport {
            average: total / n as f64,
            ticks: breakdown,
        })
    }

    /// Median of every `side` price over the last `ticks` ticks.
    ///
    /// Prices from all ticks are pooled before taking the median. Fails with
    /// an empty-window error if no quote matched in any tick.
    pub fn median(&self, side: &str, product: &str, timestamp: &str, ticks: &str) -> Result<f64> {
        let side = validate_side(side)?;
        let product = validate_product(self.dataset, product)?;
        let n = validate_tick_count(ticks)?;

        let mut pool = Vec::new();
        for (ts, visits) in tick_weights(self.dataset, timestamp, n)? {
            let prices = self.prices(side, product, ts);
            debug!(timestamp = ts, count = prices.len(), visits, "pooling tick prices");
            pool.extend(prices.into_iter().map(|price| (price, visits)));
        }

        stats::weighted_median(&pool).ok_or_else(|| {
            Error::empty_window(format!(
                "no {side} quotes for {product} in the last {n} tick(s) from {timestamp}"
            ))
        })
    }

    /// Predicted min or max `side` price for `product` at the next tick.
    pub fn predict(&self, product: &str, extremum: &str, side: &str, timestamp: &str) -> Result<f64> {
        self.prediction(product, extremum, side, timestamp)
            .map(|p| p.price)
    }

    /// Prediction with its samples and running average.
    ///
    /// Takes the min or max price at each of the last N ticks (N from the
    /// configuration, 10 by default) and folds them oldest to newest into an
    /// EWMA with smoothing factor `2 / (N + 1)`.
    pub fn prediction(
        &self,
        product: &str,
        extremum: &str,
        side: &str,
        timestamp: &str,
    ) -> Result<Prediction> {
        let product = validate_product(self.dataset, product)?;
        let extremum = validate_extremum(extremum)?;
        let side = validate_side(side)?;

        let n = self.prediction_ticks;
        if self.short_history == HistoryPolicy::Strict {
            let available = self.dataset.ticks_until(timestamp);
            if available < n {
                return Err(Error::insufficient_data(format!(
                    "prediction needs {n} ticks up to {timestamp}, only {available} available"
                )));
            }
        }

        let samples = Lookback::new(self.dataset, timestamp, n)?
            .map(|ts| self.extremum_at(extremum, side, product, ts))
            .collect::<Result<Vec<f64>>>()?;

        let oldest_first = samples.iter().rev().copied();
        let price = self
            .ewma
            .fold(oldest_first.clone())
            .ok_or_else(|| Error::insufficient_data("prediction window is empty"))?;
        let smoothed = self.ewma.path(oldest_first);

        debug!(%extremum, %side, product, price, "ewma prediction");

        Ok(Prediction {
            price,
            extremum,
            samples,
            smoothed,
        })
    }

    /// Min or max over one tick's window, on already-validated arguments.
    fn extremum_at(&self, extremum: Extremum, side: Side, product: &str, timestamp: &str) -> Result<f64> {
        let window = self.dataset.filter(side, product, timestamp);
        if window.is_empty() {
            return Err(Error::empty_window(format!(
                "no {side} quotes for {product} at {timestamp}"
            )));
        }
        let range = self.dataset.min_max(&window)?;
        Ok(extremum.select(range))
    }

    fn prices(&self, side: Side, product: &str, timestamp: &str) -> Vec<f64> {
        self.dataset
            .filter(side, product, timestamp)
            .into_iter()
            .map(|q| q.price)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Quote, ValidationError};
    use approx::assert_relative_eq;

    fn make_quote(ts: &str, product: &str, side: Side, price: f64) -> Quote {
        Quote::new(price, 1.0, ts, product, side)
    }

    fn config() -> AnalyticsConfig {
        AnalyticsConfig::default()
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(vec![
            make_quote("T1", "ABC", Side::Bid, 10.0),
            make_quote("T1", "ABC", Side::Bid, 20.0),
            make_quote("T1", "ABC", Side::Ask, 30.0),
            make_quote("T2", "ABC", Side::Bid, 12.0),
            make_quote("T2", "XYZ", Side::Ask, 1.0),
            make_quote("T3", "ABC", Side::Bid, 14.0),
            make_quote("T3", "ABC", Side::Bid, 18.0),
            make_quote("T3", "ABC", Side::Bid, 16.0),
        ])
    }

    /// `ticks` ticks, each with one bid per price in `prices(tick_index)`.
    fn ladder(ticks: usize, prices: impl Fn(usize) -> Vec<f64>) -> Dataset {
        let mut quotes = Vec::new();
        for i in 0..ticks {
            let ts = format!("2020/03/17 17:{i:02}:00");
            for p in prices(i) {
                quotes.push(make_quote(&ts, "ETH/BTC", Side::Bid, p));
            }
        }
        Dataset::new(quotes)
    }

    #[test]
    fn test_min_max_single_tick() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        assert_eq!(analytics.min("bid", "ABC", "T1").unwrap(), 10.0);
        assert_eq!(analytics.max("bid", "ABC", "T1").unwrap(), 20.0);
        assert_eq!(analytics.max("ASK", "abc", "T1").unwrap(), 30.0);
    }

    #[test]
    fn test_min_on_empty_window() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        let err = analytics.min("ask", "ABC", "T2").unwrap_err();
        assert!(matches!(err, Error::EmptyWindow(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_validation_before_computation() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());

        let err = analytics.min("mid", "ABC", "T1").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::UnknownSide(_))));

        let err = analytics.max("bid", "NOPE", "T1").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::UnknownProduct(_))));

        let err = analytics.average("bid", "ABC", "T3", "0").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidTickCount(_))));

        let err = analytics.median("bid", "ABC", "T3", "two").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidTickCount(_))));

        let err = analytics.predict("ABC", "mean", "bid", "T3").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::UnknownExtremum(_))));
    }

    #[test]
    fn test_average_single_tick_is_tick_mean() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        assert_relative_eq!(analytics.average("bid", "ABC", "T3", "1").unwrap(), 16.0);
        assert_relative_eq!(analytics.average("bid", "ABC", "T1", "1").unwrap(), 15.0);
    }

    #[test]
    fn test_average_equal_weight_per_tick() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        // T3 mean 16, T2 mean 12, T1 mean 15
        let report = analytics.average_report("bid", "ABC", "T3", "3").unwrap();
        assert_relative_eq!(report.average, (16.0 + 12.0 + 15.0) / 3.0);
        let stamps: Vec<&str> = report.ticks.iter().map(|t| t.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["T3", "T2", "T1"]);
        assert_eq!(report.ticks[0].count, 3);
    }

    #[test]
    fn test_average_zero_fills_empty_ticks() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        // Asks only at T1 (30); T3 and T2 contribute zero.
        let report = analytics.average_report("ask", "ABC", "T3", "3").unwrap();
        assert_relative_eq!(report.average, 10.0);
        assert_eq!(report.ticks[0].mean, 0.0);
        assert_eq!(report.ticks[0].count, 0);
    }

    #[test]
    fn test_average_wraps_backward() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        // T1 then wrap to T3
        let report = analytics.average_report("bid", "ABC", "T1", "2").unwrap();
        assert_eq!(report.ticks[1].timestamp, "T3");
        assert_relative_eq!(report.average, (15.0 + 16.0) / 2.0);
    }

    #[test]
    fn test_average_counts_repeated_ticks() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        // T3 T2 T1 T3 T2
        let report = analytics.average_report("bid", "ABC", "T3", "5").unwrap();
        let visits: Vec<usize> = report.ticks.iter().map(|t| t.visits).collect();
        assert_eq!(visits, vec![2, 2, 1]);
        assert_relative_eq!(report.average, (16.0 * 2.0 + 12.0 * 2.0 + 15.0) / 5.0);
    }

    #[test]
    fn test_huge_tick_count_stays_bounded() {
        let dataset = Dataset::new(vec![make_quote("t1", "ABC", Side::Bid, 2.5)]);
        let analytics = Analytics::new(&dataset, &config());
        let ticks = usize::MAX.to_string();

        let report = analytics.average_report("bid", "ABC", "t1", &ticks).unwrap();
        assert_eq!(report.ticks.len(), 1);
        assert_eq!(report.ticks[0].visits, usize::MAX);
        assert_relative_eq!(report.average, 2.5);
        assert_relative_eq!(analytics.median("bid", "ABC", "t1", &ticks).unwrap(), 2.5);

        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        assert_relative_eq!(
            analytics.average("bid", "ABC", "T3", &ticks).unwrap(),
            (16.0 + 12.0 + 15.0) / 3.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_median_counts_repeated_ticks() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        // T2 T1 T3 T2: 12 12 10 20 14 16 18 -> 14
        assert_relative_eq!(analytics.median("bid", "ABC", "T2", "4").unwrap(), 14.0);
    }

    #[test]
    fn test_median_pools_all_prices() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        // pool: 14, 18, 16, 12 -> sorted 12 14 16 18 -> 15
        assert_relative_eq!(analytics.median("bid", "ABC", "T3", "2").unwrap(), 15.0);
        // pool adds 10, 20 -> 10 12 14 16 18 20 -> 15
        assert_relative_eq!(analytics.median("bid", "ABC", "T3", "3").unwrap(), 15.0);
        // single tick, odd
        assert_relative_eq!(analytics.median("bid", "ABC", "T3", "1").unwrap(), 16.0);
    }

    #[test]
    fn test_median_empty_pool() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        let err = analytics.median("ask", "XYZ", "T1", "1").unwrap_err();
        assert!(matches!(err, Error::EmptyWindow(_)));
    }

    #[test]
    fn test_median_known_values() {
        let odd = ladder(1, |_| vec![7.0, 1.0, 9.0, 3.0, 5.0]);
        let even = ladder(1, |_| vec![8.0, 2.0, 6.0, 4.0]);
        let ts = "2020/03/17 17:00:00";
        assert_eq!(Analytics::new(&odd, &config()).median("bid", "ETH/BTC", ts, "1").unwrap(), 5.0);
        assert_eq!(Analytics::new(&even, &config()).median("bid", "ETH/BTC", ts, "1").unwrap(), 5.0);
    }

    #[test]
    fn test_predict_constant_series() {
        let dataset = ladder(12, |_| vec![0.025, 0.03]);
        let analytics = Analytics::new(&dataset, &config());
        let ts = "2020/03/17 17:11:00";
        assert_eq!(analytics.predict("ETH/BTC", "min", "bid", ts).unwrap(), 0.025);
        assert_eq!(analytics.predict("eth/btc", "MAX", "BID", ts).unwrap(), 0.03);
    }

    #[test]
    fn test_prediction_samples_and_fold_direction() {
        // min at tick i is i + 1
        let dataset = ladder(10, |i| vec![i as f64 + 1.0, 100.0]);
        let analytics = Analytics::new(&dataset, &config());
        let ts = "2020/03/17 17:09:00";

        let prediction = analytics.prediction("ETH/BTC", "min", "bid", ts).unwrap();
        assert_eq!(prediction.samples.len(), 10);
        assert_eq!(prediction.samples[0], 10.0);
        assert_eq!(prediction.samples[9], 1.0);
        assert_eq!(prediction.smoothed.len(), 10);
        assert_eq!(prediction.smoothed[0], 1.0);

        let alpha = 2.0 / 11.0;
        let expected = (2..=10).fold(1.0, |e, p| p as f64 * alpha + e * (1.0 - alpha));
        assert_relative_eq!(prediction.price, expected, epsilon = 1e-12);
        // Rising series: EWMA lags the latest sample but exceeds the simple mean.
        assert!(prediction.price < 10.0);
        assert!(prediction.price > 5.5);
    }

    #[test]
    fn test_predict_strict_short_history() {
        let dataset = ladder(5, |_| vec![1.0]);
        let analytics = Analytics::new(&dataset, &config());
        let err = analytics
            .predict("ETH/BTC", "max", "bid", "2020/03/17 17:04:00")
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_predict_wrap_short_history() {
        let dataset = ladder(5, |i| vec![i as f64]);
        let config = AnalyticsConfig {
            short_history: HistoryPolicy::Wrap,
            ..AnalyticsConfig::default()
        };
        let analytics = Analytics::new(&dataset, &config);
        let prediction = analytics
            .prediction("ETH/BTC", "max", "bid", "2020/03/17 17:04:00")
            .unwrap();
        // Walk 4 3 2 1 0 then wraps to 4 3 2 1 0
        assert_eq!(
            prediction.samples,
            vec![4.0, 3.0, 2.0, 1.0, 0.0, 4.0, 3.0, 2.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_predict_empty_tick_is_empty_window() {
        let mut quotes = Vec::new();
        for i in 0..10 {
            let product = if i == 3 { "XYZ" } else { "ETH/BTC" };
            quotes.push(make_quote(&format!("t{i}"), product, Side::Bid, 1.0));
        }
        let dataset = Dataset::new(quotes);
        let analytics = Analytics::new(&dataset, &config());
        let err = analytics.predict("ETH/BTC", "min", "bid", "t9").unwrap_err();
        assert!(matches!(err, Error::EmptyWindow(_)));
    }

    #[test]
    fn test_products_sorted() {
        let dataset = sample_dataset();
        let analytics = Analytics::new(&dataset, &config());
        assert_eq!(analytics.products(), vec!["ABC", "XYZ"]);
    }
}
