//! Minimal bit widths for numeric values
//!
//! Widths are snapped to the canonical buckets in [`WIDTHS`], which map
//! directly onto fixed-width storage types (byte, short, int, long).

/// Canonical widths, narrowest first
pub const WIDTHS: [u8; 6] = [2, 4, 8, 16, 32, 64];

/// Smallest width that holds `x` as an unsigned integer (`x <= 2^b - 1`)
pub fn unsigned(x: u64) -> u8 {
    // 64 bits hold every u64
    WIDTHS
        .iter()
        .copied()
        .find(|&b| b == 64 || x < 1u64 << b)
        .unwrap_or(64)
}

/// Smallest width that holds `x` as a two's-complement signed integer
///
/// Non-negative values need one bit more than their unsigned width. A
/// negative value fits in `b` bits when `|x| <= 2^(b-1)`, one more than the
/// positive side allows.
pub fn signed(x: i64) -> u8 {
    let magnitude = x.unsigned_abs();
    WIDTHS
        .iter()
        .copied()
        .find(|&b| {
            let half = 1u64 << (b - 1);
            if x < 0 {
                magnitude <= half
            } else {
                magnitude < half
            }
        })
        .unwrap_or(64)
}

/// 32 when `x` lies in single-precision range, otherwise 64
pub fn float(x: f64) -> u8 {
    let magnitude = x.abs();
    if magnitude == 0.0
        || (magnitude >= f64::from(f32::from_bits(1)) && magnitude <= f64::from(f32::MAX))
    {
        32
    } else {
        64
    }
}

/// Values already held as `f32` are always single precision
pub fn single(_x: f32) -> u8 {
    32
}

/// Next bucket above `bits`, saturating at 64
pub(crate) fn widen(bits: u8) -> u8 {
    WIDTHS.iter().copied().find(|&b| b > bits).unwrap_or(64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 2 ; "zero")]
    #[test_case(3, 2 ; "max uint2")]
    #[test_case(4, 4 ; "min uint4")]
    #[test_case(15, 4 ; "max uint4")]
    #[test_case(255, 8 ; "max uint8")]
    #[test_case(256, 16 ; "min uint16")]
    #[test_case(65_535, 16 ; "max uint16")]
    #[test_case(u64::from(u32::MAX), 32 ; "max uint32")]
    #[test_case(u64::from(u32::MAX) + 1, 64 ; "min uint64")]
    #[test_case(u64::MAX, 64 ; "max uint64")]
    fn test_unsigned(x: u64, expected: u8) {
        assert_eq!(unsigned(x), expected);
    }

    #[test_case(1, 2 ; "max int2")]
    #[test_case(-2, 2 ; "min int2")]
    #[test_case(-1, 2 ; "minus one")]
    #[test_case(7, 4 ; "max int4")]
    #[test_case(-8, 4 ; "min int4")]
    #[test_case(127, 8 ; "max int8")]
    #[test_case(128, 16 ; "above int8")]
    #[test_case(-128, 8 ; "min int8")]
    #[test_case(-129, 16 ; "below int8")]
    #[test_case(i64::from(i16::MAX), 16 ; "max int16")]
    #[test_case(i64::from(i16::MIN), 16 ; "min int16")]
    #[test_case(i64::from(i32::MAX), 32 ; "max int32")]
    #[test_case(i64::from(i32::MIN), 32 ; "min int32")]
    #[test_case(i64::MAX, 64 ; "max int64")]
    #[test_case(i64::MIN, 64 ; "min int64")]
    fn test_signed(x: i64, expected: u8) {
        assert_eq!(signed(x), expected);
    }

    #[test]
    fn test_float() {
        assert_eq!(float(f64::from(f32::MAX)), 32);
        assert_eq!(float(f64::from(f32::from_bits(1))), 32);
        assert_eq!(float(-1.5), 32);
        assert_eq!(float(0.0), 32);
        assert_eq!(float(f64::MAX), 64);
        assert_eq!(float(f64::MIN_POSITIVE), 64);
        assert_eq!(single(f32::MAX), 32);
    }

    #[test]
    fn test_widen() {
        assert_eq!(widen(2), 4);
        assert_eq!(widen(8), 16);
        assert_eq!(widen(64), 64);
    }
}
