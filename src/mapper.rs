//! Coordinate mapping between screen pixels and chart data space.
//!
//! Data space is `(candle index, price)`. The engine talks to the mapper only
//! through [`CoordinateMapper`]; [`LinearMapper`] is the straightforward
//! implementation for a linear price axis.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::MAGNET_WEAK_RADIUS;
use crate::drawing::DataPoint;

const MIN_BAR_SPACING: f64 = 1e-6;
const MIN_PRICE_RANGE: f64 = 1e-9;

/// Visible chart window: pixel size plus the data range it shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub width: f32,
    pub height: f32,
    /// Candle index at x = 0
    pub first_index: f64,
    /// Pixels per candle
    pub bar_spacing: f64,
    /// Price at y = 0
    pub price_high: f64,
    /// Price at y = height
    pub price_low: f64,
}

impl Default for Scales {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            first_index: 0.0,
            bar_spacing: 8.0,
            price_high: 100.0,
            price_low: 0.0,
        }
    }
}

impl Scales {
    /// Visible price range, floored so it is never zero
    pub fn price_range(&self) -> f64 {
        (self.price_high - self.price_low).abs().max(MIN_PRICE_RANGE)
    }

    /// Screen rectangle of the chart pane
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Pixel length of a price difference
    pub fn price_to_pixels(&self, price_delta: f64) -> f32 {
        (price_delta.abs() / self.price_range() * f64::from(self.height)) as f32
    }
}

/// How strongly placed points are pulled to candle OHLC values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MagnetMode {
    #[default]
    Off,
    /// Snap only when an OHLC value is within a short pixel radius
    Weak,
    /// Always snap to the nearest OHLC value of the candle under the pointer
    Strong,
}

/// One candle of the active timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in milliseconds since the epoch
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn ohlc(&self) -> [f64; 4] {
        [self.open, self.high, self.low, self.close]
    }
}

/// Converts between screen and data space.
pub trait CoordinateMapper: Send + Sync {
    /// Pixel position to data point. With `continuous` off the candle index is
    /// rounded to a whole bar.
    fn screen_to_data(&self, position: Vec2, scales: &Scales, continuous: bool) -> DataPoint;

    fn data_to_screen(&self, point: DataPoint, scales: &Scales) -> Vec2;

    /// Pull `point` onto an OHLC value of the candle beneath it.
    fn snap_to_ohlc(
        &self,
        point: DataPoint,
        candles: &[Candle],
        scales: &Scales,
        mode: MagnetMode,
    ) -> DataPoint;
}

/// Linear index and price axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearMapper;

impl CoordinateMapper for LinearMapper {
    fn screen_to_data(&self, position: Vec2, scales: &Scales, continuous: bool) -> DataPoint {
        let spacing = scales.bar_spacing.max(MIN_BAR_SPACING);
        let mut x = scales.first_index + f64::from(position.x) / spacing;
        if !continuous {
            x = x.round();
        }
        let height = f64::from(scales.height).max(MIN_BAR_SPACING);
        let y = scales.price_high - f64::from(position.y) / height * (scales.price_high - scales.price_low);
        DataPoint::new(x, y)
    }

    fn data_to_screen(&self, point: DataPoint, scales: &Scales) -> Vec2 {
        let x = (point.x - scales.first_index) * scales.bar_spacing;
        let span = scales.price_high - scales.price_low;
        let span = if span.abs() < MIN_PRICE_RANGE {
            MIN_PRICE_RANGE
        } else {
            span
        };
        let y = (scales.price_high - point.y) / span * f64::from(scales.height);
        Vec2::new(x as f32, y as f32)
    }

    fn snap_to_ohlc(
        &self,
        point: DataPoint,
        candles: &[Candle],
        scales: &Scales,
        mode: MagnetMode,
    ) -> DataPoint {
        if mode == MagnetMode::Off || candles.is_empty() {
            return point;
        }
        let index = point.x.round();
        if index < 0.0 || index >= candles.len() as f64 {
            return point;
        }
        let candle = &candles[index as usize];

        let Some(nearest) = candle
            .ohlc()
            .into_iter()
            .min_by(|a, b| (a - point.y).abs().total_cmp(&(b - point.y).abs()))
        else {
            return point;
        };

        if mode == MagnetMode::Weak && scales.price_to_pixels(nearest - point.y) > MAGNET_WEAK_RADIUS {
            return point;
        }
        DataPoint::new(index, nearest)
    }
}

/// Candle times for the active timeframe, used to translate between candle
/// indices and absolute timestamps.
#[derive(Debug, Clone, Default)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

/// Fallback bar interval when the series is too short to measure one (1 minute)
const DEFAULT_INTERVAL_MS: i64 = 60_000;

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Bar interval measured from the last two candles.
    pub fn interval(&self) -> i64 {
        match self.candles.as_slice() {
            [.., a, b] if b.time > a.time => b.time - a.time,
            _ => DEFAULT_INTERVAL_MS,
        }
    }

    /// Timestamp at a (possibly fractional, possibly off-series) candle index.
    pub fn time_at(&self, index: f64) -> Option<i64> {
        let n = self.candles.len();
        let first = self.candles.first()?;
        let last = self.candles.last()?;
        let interval = self.interval() as f64;

        if index < 0.0 {
            return Some(first.time + (index * interval).round() as i64);
        }
        let last_index = (n - 1) as f64;
        if index >= last_index {
            return Some(last.time + ((index - last_index) * interval).round() as i64);
        }

        let i0 = index.floor() as usize;
        let frac = index - i0 as f64;
        let t0 = self.candles[i0].time as f64;
        let t1 = self.candles[i0 + 1].time as f64;
        Some((t0 + frac * (t1 - t0)).round() as i64)
    }

    /// Candle index (possibly fractional) for a timestamp.
    pub fn index_at(&self, time: i64) -> Option<f64> {
        let n = self.candles.len();
        let first = self.candles.first()?;
        let last = self.candles.last()?;
        let interval = self.interval() as f64;

        if time <= first.time {
            return Some((time - first.time) as f64 / interval);
        }
        if time >= last.time {
            return Some((n - 1) as f64 + (time - last.time) as f64 / interval);
        }

        let after = self.candles.partition_point(|c| c.time <= time);
        let i = after - 1;
        let t0 = self.candles[i].time;
        let t1 = self.candles[i + 1].time;
        let frac = if t1 > t0 {
            (time - t0) as f64 / (t1 - t0) as f64
        } else {
            0.0
        };
        Some(i as f64 + frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            time,
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn test_screen_data_round_trip_continuous() {
        let scales = Scales::default();
        let mapper = LinearMapper;
        let screen = Vec2::new(123.0, 77.0);
        let data = mapper.screen_to_data(screen, &scales, true);
        let back = mapper.data_to_screen(data, &scales);
        assert!((back - screen).length() < 1e-3);
    }

    #[test]
    fn test_screen_to_data_rounds_index_when_not_continuous() {
        let scales = Scales::default();
        let data = LinearMapper.screen_to_data(Vec2::new(13.0, 0.0), &scales, false);
        assert_eq!(data.x, 2.0);
        assert_eq!(data.y, 100.0);
    }

    #[test]
    fn test_snap_strong_picks_nearest_ohlc() {
        let candles = [candle(0, 10.0, 20.0, 5.0, 15.0)];
        let snapped = LinearMapper.snap_to_ohlc(
            DataPoint::new(0.2, 18.0),
            &candles,
            &Scales::default(),
            MagnetMode::Strong,
        );
        assert_eq!(snapped, DataPoint::new(0.0, 20.0));
    }

    #[test]
    fn test_snap_weak_ignores_far_values() {
        let candles = [candle(0, 10.0, 20.0, 5.0, 15.0)];
        // 400px tall pane over 100 price units: 1 price unit = 4px
        let point = DataPoint::new(0.0, 50.0);
        let snapped =
            LinearMapper.snap_to_ohlc(point, &candles, &Scales::default(), MagnetMode::Weak);
        assert_eq!(snapped, point);
    }

    #[test]
    fn test_snap_off_is_identity() {
        let candles = [candle(0, 10.0, 20.0, 5.0, 15.0)];
        let point = DataPoint::new(0.0, 19.0);
        let snapped = LinearMapper.snap_to_ohlc(point, &candles, &Scales::default(), MagnetMode::Off);
        assert_eq!(snapped, point);
    }

    #[test]
    fn test_candle_series_time_and_index_are_inverse() {
        let series = CandleSeries::new(
            (0..10)
                .map(|i| candle(1_000 + i * 100, 1.0, 1.0, 1.0, 1.0))
                .collect(),
        );
        assert_eq!(series.time_at(2.5), Some(1_250));
        assert_eq!(series.index_at(1_250), Some(2.5));
        // Extrapolated beyond the last candle
        assert_eq!(series.time_at(11.0), Some(2_100));
        assert_eq!(series.index_at(2_100), Some(11.0));
        // Before the first candle
        assert_eq!(series.index_at(800), Some(-2.0));
    }

    #[test]
    fn test_empty_series_has_no_mapping() {
        let series = CandleSeries::default();
        assert!(series.time_at(0.0).is_none());
        assert!(series.index_at(0).is_none());
    }
}
