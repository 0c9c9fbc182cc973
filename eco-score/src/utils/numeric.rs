//! Numeric helpers

/// Round to `places` decimal places (half away from zero)
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(9.004, 2), 9.0);
        assert_eq!(round_to(0.125, 1), 0.1);
        assert_eq!(round_to(2.675, 0), 3.0);
        assert_eq!(round_to(-1.25, 1), -1.3);
    }
}
