//! Angle reduction helpers.
//!
//! Every reduction here is a floored modulo: negative inputs wrap into the
//! positive range instead of keeping their sign.

/// Fractional part of `x` in `[0, 1)`.
pub fn frac(x: f64) -> f64 {
    let f = x - x.floor();
    // `x - floor(x)` can round up to exactly 1.0 for tiny negative inputs.
    if f >= 1.0 { 0.0 } else { f }
}

/// Reduces degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    360.0 * frac(deg / 360.0)
}

/// Reduces hours into `[0, 24)`.
pub fn normalize_hours(hours: f64) -> f64 {
    24.0 * frac(hours / 24.0)
}

pub fn hours_to_degrees(hours: f64) -> f64 {
    hours * 15.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn frac_wraps_negative_inputs() {
        assert_close(frac(1.25), 0.25, 1e-12);
        assert_close(frac(-0.25), 0.75, 1e-12);
        assert_close(frac(-3.0), 0.0, 1e-12);
        assert!(frac(-1e-18) < 1.0);
    }

    #[test]
    fn normalize_degrees_is_floored() {
        assert_close(normalize_degrees(370.0), 10.0, 1e-9);
        assert_close(normalize_degrees(-10.0), 350.0, 1e-9);
        assert_close(normalize_degrees(-730.0), 350.0, 1e-9);
        assert_close(normalize_degrees(0.0), 0.0, 1e-12);
    }

    #[test]
    fn normalize_hours_stays_in_range() {
        for h in [-48.5, -0.001, 0.0, 23.999, 24.0, 100.25] {
            let n = normalize_hours(h);
            assert!((0.0..24.0).contains(&n), "{h} -> {n}");
        }
    }

    #[test]
    fn hour_degree_conversion() {
        assert_close(hours_to_degrees(5.8), 87.0, 1e-12);
        assert_close(hours_to_degrees(-1.0), -15.0, 1e-12);
    }
}
