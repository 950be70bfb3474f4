//! Parametric → simplified EQ reduction
//!
//! Approximates a 4-band parametric EQ as the three low/mid/high gains the
//! rest of the engine works with. Each band contributes `gain × influence`
//! at three fixed measurement frequencies; influence falls off linearly in
//! octaves. This is not a filter transfer function.

use crate::params::{EqParams, FilterKind, ParametricBand, ParametricEqParams};

/// Measurement frequency for the low band (Hz)
pub const LOW_MEASURE_HZ: f64 = 200.0;
/// Measurement frequency for the mid band (Hz)
pub const MID_MEASURE_HZ: f64 = 1000.0;
/// Measurement frequency for the high band (Hz)
pub const HIGH_MEASURE_HZ: f64 = 5000.0;

/// Simplified EQ gain limit (dB)
pub const MAX_SIMPLE_GAIN_DB: f64 = 12.0;

/// Shelf influence lost per octave past the corner
const SHELF_SLOPE_PER_OCTAVE: f64 = 0.5;

/// Reduce a parametric EQ to an effective low/mid/high EQ
pub fn reduce_parametric_eq(params: &ParametricEqParams) -> EqParams {
    let low = response_at(params, LOW_MEASURE_HZ);
    let mid = response_at(params, MID_MEASURE_HZ);
    let high = response_at(params, HIGH_MEASURE_HZ);

    log::trace!("parametric reduce: low={} mid={} high={}", low, mid, high);

    EqParams::new(low, mid, high)
}

/// Summed, rounded and clamped gain at one measurement frequency
fn response_at(params: &ParametricEqParams, freq: f64) -> f64 {
    let total: f64 = params
        .bands
        .iter()
        .filter(|band| band.gain != 0.0)
        .map(|band| band.gain * influence(band, freq))
        .sum();

    ((total * 10.0).round() / 10.0).clamp(-MAX_SIMPLE_GAIN_DB, MAX_SIMPLE_GAIN_DB)
}

/// How much of `band`'s gain reaches `freq` (0..=1)
fn influence(band: &ParametricBand, freq: f64) -> f64 {
    let octave_dist = (freq / band.frequency).log2().abs();

    match band.kind {
        FilterKind::Lowshelf => {
            if freq <= band.frequency {
                1.0
            } else {
                (1.0 - SHELF_SLOPE_PER_OCTAVE * octave_dist).max(0.0)
            }
        }
        FilterKind::Highshelf => {
            if freq >= band.frequency {
                1.0
            } else {
                (1.0 - SHELF_SLOPE_PER_OCTAVE * octave_dist).max(0.0)
            }
        }
        FilterKind::Peaking => {
            let bandwidth_octaves = 1.0 / band.q;
            (1.0 - octave_dist / bandwidth_octaves).max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_eq() -> ParametricEqParams {
        ParametricEqParams::new(
            ParametricBand::low_shelf(100.0, 6.0),
            ParametricBand::peaking(1000.0, 4.0, 1.0),
            ParametricBand::peaking(2000.0, 6.0, 2.0),
            ParametricBand::high_shelf(5000.0, -3.0),
        )
    }

    #[test]
    fn test_flat_is_zero() {
        let out = reduce_parametric_eq(&ParametricEqParams::default());
        assert_eq!(out, EqParams::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_band_contributions() {
        let out = reduce_parametric_eq(&sample_eq());
        // low shelf one octave below 200 Hz → half gain
        assert_abs_diff_eq!(out.low, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.mid, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.high, -3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shelf_full_gain_inside() {
        let eq = ParametricEqParams::new(
            ParametricBand::low_shelf(300.0, 5.0),
            ParametricBand::peaking(500.0, 0.0, 1.0),
            ParametricBand::peaking(2500.0, 0.0, 1.0),
            ParametricBand::high_shelf(4000.0, 2.0),
        );
        let out = reduce_parametric_eq(&eq);
        assert_abs_diff_eq!(out.low, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.high, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_one_decimal_rounding() {
        // peak at 1000 Hz, Q 1, measured at 1000 Hz → full gain 2.345
        let eq = ParametricEqParams::new(
            ParametricBand::low_shelf(100.0, 0.0),
            ParametricBand::peaking(1000.0, 2.345, 1.0),
            ParametricBand::peaking(2500.0, 0.0, 1.0),
            ParametricBand::high_shelf(8000.0, 0.0),
        );
        let out = reduce_parametric_eq(&eq);
        assert_abs_diff_eq!(out.mid, 2.3, epsilon = 1e-9);
    }

    #[test]
    fn test_clamped_to_range() {
        let eq = ParametricEqParams::new(
            ParametricBand::low_shelf(1000.0, 40.0),
            ParametricBand::peaking(200.0, 40.0, 0.5),
            ParametricBand::peaking(5000.0, -40.0, 0.5),
            ParametricBand::high_shelf(1000.0, -40.0),
        );
        let out = reduce_parametric_eq(&eq);
        for v in [out.low, out.mid, out.high] {
            assert!((-12.0..=12.0).contains(&v), "{} out of range", v);
        }
        assert_eq!(out.low, 12.0);
        assert_eq!(out.high, -12.0);
    }

    #[test]
    fn test_odd_symmetry() {
        let eq = sample_eq();
        let pos = reduce_parametric_eq(&eq);
        let neg = reduce_parametric_eq(&eq.inverted());
        assert_abs_diff_eq!(pos.low, -neg.low, epsilon = 0.1);
        assert_abs_diff_eq!(pos.mid, -neg.mid, epsilon = 0.1);
        assert_abs_diff_eq!(pos.high, -neg.high, epsilon = 0.1);
    }
}
