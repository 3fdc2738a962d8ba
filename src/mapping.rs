//! Linear range mapping between g-values and one-byte samples.
//!
//! A reading is scaled to hundredths of a g, mapped from `[-200, 200]` onto
//! `[0, 255]` and truncated. The inverse mapping recovers the value to within
//! one quantisation step.
//!
//! ```rust
//! use vibroguard::mapping::{dequantize, quantize};
//!
//! assert_eq!(quantize(0.25), 143);
//! assert!((dequantize(quantize(1.0)) - 1.0).abs() <= 4.0 / 255.0);
//! ```

/// Lower bound of the quantised range in hundredths of a g.
pub const RANGE_MIN_CENTI_G: f32 = -200.0;
/// Upper bound of the quantised range in hundredths of a g.
pub const RANGE_MAX_CENTI_G: f32 = 200.0;
/// Width of one quantisation step in g.
pub const QUANTIZATION_STEP_G: f32 = 4.0 / 255.0;

/// Maps `value` linearly from `[lo1, hi1]` onto `[lo2, hi2]`.
///
/// Values outside the source range extrapolate; callers clamp as needed.
pub fn map_range(value: f32, lo1: f32, hi1: f32, lo2: f32, hi2: f32) -> f32 {
    lo2 + (value - lo1) / (hi1 - lo1) * (hi2 - lo2)
}

/// Quantises an acceleration in g to one byte, saturating at ±2 g.
pub fn quantize(g: f32) -> u8 {
    let mapped = map_range(g * 100.0, RANGE_MIN_CENTI_G, RANGE_MAX_CENTI_G, 0.0, 255.0);
    // `as` truncates toward zero and maps NaN to 0.
    mapped.clamp(0.0, 255.0) as u8
}

/// Recovers an acceleration in g from a quantised byte.
pub fn dequantize(byte: u8) -> f32 {
    map_range(
        f32::from(byte),
        0.0,
        255.0,
        RANGE_MIN_CENTI_G,
        RANGE_MAX_CENTI_G,
    ) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_points_map_to_expected_bytes() {
        assert_eq!(quantize(0.25), 143);
        assert_eq!(quantize(0.0), 127);
        assert_eq!(quantize(-0.25), 111);
        assert_eq!(quantize(2.0), 255);
        assert_eq!(quantize(-2.0), 0);
    }

    #[test]
    fn out_of_range_values_saturate() {
        assert_eq!(quantize(3.5), 255);
        assert_eq!(quantize(-16.0), 0);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn bytes_recover_to_within_one_step() {
        let mut g = -2.0f32;
        while g <= 2.0 {
            let recovered = dequantize(quantize(g));
            assert!(
                (recovered - g).abs() <= QUANTIZATION_STEP_G + 1e-5,
                "{g} recovered as {recovered}"
            );
            g += 0.01;
        }
    }

    #[test]
    fn dequantize_spans_the_full_range() {
        assert_eq!(dequantize(0), -2.0);
        assert_eq!(dequantize(255), 2.0);
        assert!(dequantize(127) < 0.0 && dequantize(128) > 0.0);
    }

    #[test]
    fn map_range_is_linear() {
        assert_eq!(map_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(map_range(0.0, -1.0, 1.0, 10.0, 20.0), 15.0);
    }
}
