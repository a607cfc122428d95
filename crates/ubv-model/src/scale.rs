//! Fixed-point scaling and viewport rounding

/// Scale factor for Type 1 streams (one unit = 0x8000)
pub const TYPE1_SCALE: i32 = 0x8000;

/// Scale factor for Type 2 streams (one unit = 0x10000, Q16.16)
pub const TYPE2_SCALE: i32 = 0x10000;

/// Convert a fixed-point coordinate to a real value
pub fn to_real(v: i32, scale: i32) -> f64 {
    f64::from(v) / f64::from(scale)
}

/// Round a fixed-point value to an integer number of scale units.
///
/// Keeps the truncated quotient while the remainder is below a quarter of
/// the divisor, otherwise moves one further from zero. Negative dividends
/// always truncate toward zero: their remainder is negative, so the first
/// branch wins.
pub fn round_int(n: i32, d: i32) -> i32 {
    let l = n / d;
    let r = n % d;
    if r < d / 4 {
        return l;
    }
    if l > 0 { l + 1 } else { l - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_int_exact_multiples() {
        assert_eq!(round_int(0, 0x8000), 0);
        assert_eq!(round_int(0x8000, 0x8000), 1);
        assert_eq!(round_int(0x8000 * 7, 0x8000), 7);
    }

    #[test]
    fn test_round_int_below_quarter_rounds_down() {
        // remainder just under d/4
        assert_eq!(round_int(0x8000 + 0x1FFF, 0x8000), 1);
        assert_eq!(round_int(100 * 8 + 1, 8), 100);
    }

    #[test]
    fn test_round_int_at_quarter_rounds_up() {
        // remainder exactly d/4 crosses the threshold
        assert_eq!(round_int(0x8000 + 0x2000, 0x8000), 2);
        assert_eq!(round_int(8 + 2, 8), 2);
    }

    #[test]
    fn test_round_int_at_d_minus_one_rounds_up() {
        assert_eq!(round_int(0x8000 + 0x7FFF, 0x8000), 2);
        assert_eq!(round_int(8 + 7, 8), 2);
    }

    #[test]
    fn test_round_int_negative_truncates() {
        // negative remainders never reach the round-away branch
        assert_eq!(round_int(-0x8000, 0x8000), -1);
        assert_eq!(round_int(-(0x8000 + 0x7FFF), 0x8000), -1);
    }

    #[test]
    fn test_to_real() {
        assert_eq!(to_real(0x8000, TYPE1_SCALE), 1.0);
        assert_eq!(to_real(0x18000, TYPE2_SCALE), 1.5);
        assert_eq!(to_real(-0x10000, TYPE2_SCALE), -1.0);
    }
}
