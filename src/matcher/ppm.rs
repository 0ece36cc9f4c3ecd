//! Parts-per-million arithmetic.

/// Relative deviation of `experimental` from `theoretical` in ppm,
/// `1e6 * |e - t| / |e|`.
///
/// The experimental value is the denominator. Returns `None` for an
/// experimental mass of exactly zero, where the deviation is undefined.
pub fn ppm_error(experimental: f64, theoretical: f64) -> Option<f64> {
    if experimental == 0.0 {
        return None;
    }
    Some((1e6 * (experimental - theoretical) / experimental).abs())
}

/// Whether `experimental` lies strictly inside `tolerance_ppm` of
/// `theoretical`. A deviation equal to the tolerance does not match.
pub fn within_tolerance(experimental: f64, theoretical: f64, tolerance_ppm: f64) -> bool {
    ppm_error(experimental, theoretical).is_some_and(|ppm| ppm < tolerance_ppm)
}

/// Round to two decimals for reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denominator_is_experimental() {
        let ppm = ppm_error(100.0004, 100.0).unwrap();
        assert!((ppm - 1e6 * 0.0004 / 100.0004).abs() < 1e-9);
        assert_eq!(round2(ppm), 4.0);
    }

    #[test]
    fn zero_experimental_mass_is_undefined() {
        assert_eq!(ppm_error(0.0, 100.0), None);
        assert!(!within_tolerance(0.0, 0.0, 1e9));
    }

    #[test]
    fn tolerance_is_strict() {
        assert!(!within_tolerance(100.0, 100.0, 0.0));
        assert!(within_tolerance(100.0, 100.0, 1e-12));
        // 1e6 * 0.5 / 1000.0 == 500 exactly
        assert!(!within_tolerance(1000.0, 1000.5, 500.0));
        assert!(within_tolerance(1000.0, 1000.5, 500.0001));
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.999), 3.0);
        assert_eq!(round2(0.0), 0.0);
    }
}
