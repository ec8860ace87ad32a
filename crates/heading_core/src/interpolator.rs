//! Circular interpolation of headings
//!
//! Headings cannot be interpolated directly: between 3.0 and -3.0 rad a
//! straight line passes through 0 instead of ±π. Each heading is projected
//! onto the unit circle, the cosine and sine components are interpolated
//! independently, and `atan2` folds the result back into an angle.

use crate::calibration::CalibrationTable;
use crate::error::{HeadingError, Result};
use std::f64::consts::{PI, TAU};

/// Piecewise-linear interpolant with linear extrapolation at both ends.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    /// `xs` must be strictly increasing and hold at least two points.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(HeadingError::InsufficientCalibration(format!(
                "{} positions but {} values",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(HeadingError::InsufficientCalibration(format!(
                "need at least 2 points, found {}",
                xs.len()
            )));
        }
        if let Some(w) = xs.windows(2).find(|w| w[0] >= w[1]) {
            return Err(HeadingError::InsufficientCalibration(format!(
                "positions not strictly increasing at {} -> {}",
                w[0], w[1]
            )));
        }
        Ok(Self { xs, ys })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let k = self.segment(x);
        let (x0, x1) = (self.xs[k], self.xs[k + 1]);
        let (y0, y1) = (self.ys[k], self.ys[k + 1]);
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }

    /// Index of the segment `[xs[k], xs[k+1]]` used for `x`.
    ///
    /// Out-of-range queries use the nearest end segment, which turns the
    /// segment formula into linear extrapolation.
    fn segment(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        self.xs
            .partition_point(|&knot| knot <= x)
            .saturating_sub(1)
            .min(last)
    }
}

/// Wrap any finite angle into `(-π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = angle.sin().atan2(angle.cos());
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Immutable screen position → heading mapping.
#[derive(Debug, Clone)]
pub struct HeadingFunction {
    positions: Vec<f64>,
    headings: Vec<f64>,
    fx: LinearInterpolant,
    fy: LinearInterpolant,
}

impl HeadingFunction {
    pub fn new(table: &CalibrationTable) -> Result<Self> {
        let positions: Vec<f64> = table.entries().iter().map(|e| e.screen_position).collect();
        let headings: Vec<f64> = table.entries().iter().map(|e| e.heading).collect();

        let fx = LinearInterpolant::new(
            positions.clone(),
            headings.iter().map(|h| h.cos()).collect(),
        )?;
        let fy = LinearInterpolant::new(
            positions.clone(),
            headings.iter().map(|h| h.sin()).collect(),
        )?;

        Ok(Self {
            positions,
            headings,
            fx,
            fy,
        })
    }

    /// Heading in `(-π, π]` for a screen position.
    ///
    /// Calibrated positions return their calibrated heading unchanged. NaN
    /// propagates.
    pub fn evaluate(&self, screen_position: f64) -> f64 {
        if screen_position.is_nan() {
            return f64::NAN;
        }
        if let Ok(k) = self
            .positions
            .binary_search_by(|p| p.total_cmp(&screen_position))
        {
            return wrap_angle(self.headings[k]);
        }

        let angle = self
            .fy
            .evaluate(screen_position)
            .atan2(self.fx.evaluate(screen_position));
        if angle <= -PI {
            PI
        } else {
            angle
        }
    }

    pub fn calibrated_range(&self) -> (f64, f64) {
        (self.positions[0], self.positions[self.positions.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationEntry, DEFAULT_CALIBRATION};

    const EPS: f64 = 1e-9;

    fn default_fn() -> HeadingFunction {
        HeadingFunction::new(&CalibrationTable::builtin()).unwrap()
    }

    /// Shortest signed difference between two angles
    fn angular_diff(a: f64, b: f64) -> f64 {
        wrap_angle(a - b)
    }

    #[test]
    fn test_linear_interpolant_segments_and_extrapolation() {
        let f = LinearInterpolant::new(vec![0.0, 10.0, 20.0], vec![0.0, 10.0, 0.0]).unwrap();
        assert_eq!(f.evaluate(5.0), 5.0);
        assert_eq!(f.evaluate(10.0), 10.0);
        assert_eq!(f.evaluate(15.0), 5.0);
        // Extrapolates along the first and last segment slopes
        assert_eq!(f.evaluate(-10.0), -10.0);
        assert_eq!(f.evaluate(30.0), -10.0);
    }

    #[test]
    fn test_linear_interpolant_rejects_bad_input() {
        assert!(LinearInterpolant::new(vec![0.0], vec![1.0]).is_err());
        assert!(LinearInterpolant::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(LinearInterpolant::new(vec![0.0, 0.0], vec![1.0, 2.0]).is_err());
        assert!(LinearInterpolant::new(vec![1.0, 0.0], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_default_table_passes_through_knots_exactly() {
        let f = default_fn();
        for (screen, heading) in DEFAULT_CALIBRATION {
            assert_eq!(f.evaluate(screen), heading, "screen {}", screen);
        }
    }

    #[test]
    fn test_default_table_is_periodic() {
        let f = default_fn();
        assert_eq!(f.evaluate(0.0), f.evaluate(640.0));
    }

    #[test]
    fn test_wrap_segment_is_continuous() {
        let f = default_fn();
        let mut prev = f.evaluate(560.0);
        let mut x = 560.0;
        while x < 700.0 {
            x += 0.25;
            let cur = f.evaluate(x);
            assert!(
                angular_diff(cur, prev).abs() < 0.05,
                "jump at {}: {} -> {}",
                x,
                prev,
                cur
            );
            prev = cur;
        }

        let below = f.evaluate(640.0 - 1e-6);
        let above = f.evaluate(640.0 + 1e-6);
        assert!(angular_diff(below, above).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_midpoint_stays_near_pi() {
        let f = default_fn();
        let mid = f.evaluate(600.0);
        // A naive angle average lands near -0.33 rad, on the far side of the circle.
        let naive = (-3.0123437340031307 + 2.3513283485530456) / 2.0;
        assert!(mid.abs() > 2.5, "mid = {}", mid);
        assert!(angular_diff(mid, naive).abs() > 2.0);
        assert!((mid - 2.81108).abs() < 1e-4, "mid = {}", mid);
    }

    #[test]
    fn test_extrapolation_stays_in_range() {
        let f = default_fn();
        for x in [-1e9, -5000.0, -1.0, 641.0, 1e4, 1e12] {
            let h = f.evaluate(x);
            assert!(h > -PI && h <= PI, "evaluate({}) = {}", x, h);
        }
    }

    #[test]
    fn test_two_point_table_interpolates_across_pi() {
        let table = CalibrationTable::from_entries(vec![
            CalibrationEntry::new(0.0, 3.0),
            CalibrationEntry::new(1.0, -3.0),
        ])
        .unwrap();
        let f = HeadingFunction::new(&table).unwrap();
        assert!((f.evaluate(0.5) - PI).abs() < EPS);
    }

    #[test]
    fn test_negative_pi_maps_to_positive_pi() {
        let table = CalibrationTable::from_entries(vec![
            CalibrationEntry::new(0.0, -PI),
            CalibrationEntry::new(10.0, -PI),
        ])
        .unwrap();
        let f = HeadingFunction::new(&table).unwrap();
        assert_eq!(f.evaluate(0.0), PI);
        let between = f.evaluate(5.0);
        assert!(between > -PI && between <= PI);
        assert!((between.abs() - PI).abs() < EPS);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(default_fn().evaluate(f64::NAN).is_nan());
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(1.0), 1.0);
        assert_eq!(wrap_angle(-PI), PI);
        assert!((wrap_angle(3.0 * PI) - PI).abs() < EPS);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_calibrated_range() {
        assert_eq!(default_fn().calibrated_range(), (0.0, 640.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_table() -> impl Strategy<Value = CalibrationTable> {
            prop::collection::vec((0.5f64..50.0, -PI..PI), 2..12).prop_map(|steps| {
                let mut screen = -100.0;
                let entries = steps
                    .into_iter()
                    .map(|(step, heading)| {
                        screen += step;
                        CalibrationEntry::new(screen, heading)
                    })
                    .collect();
                CalibrationTable::from_entries(entries).unwrap()
            })
        }

        proptest! {
            /// Property: the function passes through every calibration point
            #[test]
            fn prop_passes_through_knots(table in arb_table()) {
                let f = HeadingFunction::new(&table).unwrap();
                for entry in table.entries() {
                    let h = f.evaluate(entry.screen_position);
                    prop_assert!(angular_diff(h, entry.heading).abs() < EPS);
                }
            }

            /// Property: output is always a well-formed angle
            #[test]
            fn prop_output_in_range(table in arb_table(), x in -1e7f64..1e7f64) {
                let f = HeadingFunction::new(&table).unwrap();
                let h = f.evaluate(x);
                prop_assert!(h > -PI && h <= PI, "evaluate({}) = {}", x, h);
            }

            /// Property: default table stays in range far outside 0..640
            #[test]
            fn prop_default_in_range(x in -1e12f64..1e12f64) {
                let h = default_fn().evaluate(x);
                prop_assert!(h > -PI && h <= PI);
            }
        }
    }
}
