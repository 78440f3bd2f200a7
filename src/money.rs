//! Currency rounding helpers

/// Balance at or below which a loan counts as settled
pub const SETTLEMENT_EPSILON: f64 = 0.01;

/// Round to `dec` decimal places
pub fn round_to(amount: f64, dec: u32) -> f64 {
    if amount == 0.0 {
        return 0.0;
    }
    let scale = 10_f64.powi(dec as i32);
    (amount * scale).round() / scale
}

/// Round to the nearest whole currency unit (ringgit)
pub fn round_whole(amount: f64) -> f64 {
    amount.round()
}

/// Round to sen (two decimal places)
pub fn round_sen(amount: f64) -> f64 {
    round_to(amount, 2)
}

/// Treat NaN and negative values as zero, the way the input forms default empty fields
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1209.58655, 2), 1209.59);
        assert_eq!(round_to(1209.58655, 4), 1209.5866);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn test_round_whole() {
        assert_eq!(round_whole(3099.87), 3100.0);
        assert_eq!(round_whole(258.49), 258.0);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(-5.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(12.5), 12.5);
    }
}
