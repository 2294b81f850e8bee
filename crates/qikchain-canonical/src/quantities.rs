use num_bigint::BigUint;
use num_traits::Zero;
use regex::Regex;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::sync::LazyLock;

use crate::validation::ValidationError;

/// Decimal places between wei and the display unit.
pub const WEI_DECIMALS: u32 = 18;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("invalid regex"));

/// Non-negative token amount denominated in wei.
///
/// Parsed only from base-10 digit strings of any length. Arithmetic is exact
/// and unbounded; nothing in this type ever goes through floating point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Wei(BigUint);

impl Wei {
    /// Zero wei.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Parses a base-10 non-negative integer string.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if let Some(rest) = value.strip_prefix('-') {
            if DIGITS.is_match(rest) {
                return Err(ValidationError::Negative {
                    field: "amount",
                    value: value.to_string(),
                });
            }
        }
        if !is_digit_string(value) {
            return Err(ValidationError::Malformed {
                field: "amount",
                value: value.to_string(),
            });
        }
        BigUint::parse_bytes(value.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| ValidationError::Malformed {
                field: "amount",
                value: value.to_string(),
            })
    }

    /// True for zero wei.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Renders the amount in display units (wei / 10^18).
    ///
    /// The fractional part is truncated, never rounded, to `max_decimals`
    /// digits and stripped of trailing zeros. With `max_decimals <= 0`, or
    /// when no fractional digit survives, only the whole part is returned.
    pub fn format_units(&self, max_decimals: i32) -> String {
        let unit = BigUint::from(10u32).pow(WEI_DECIMALS);
        let whole = &self.0 / &unit;
        let rem = &self.0 % &unit;
        if max_decimals <= 0 {
            return whole.to_string();
        }
        let padded = format!("{:0>width$}", rem.to_string(), width = WEI_DECIMALS as usize);
        let keep = (max_decimals as usize).min(padded.len());
        let fraction = padded[..keep].trim_end_matches('0');
        if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, fraction)
        }
    }
}

impl From<u64> for Wei {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl Add for Wei {
    type Output = Wei;

    fn add(self, other: Wei) -> Wei {
        Wei(self.0 + other.0)
    }
}

impl<'a> Add<&'a Wei> for Wei {
    type Output = Wei;

    fn add(self, other: &'a Wei) -> Wei {
        Wei(self.0 + &other.0)
    }
}

impl AddAssign<&Wei> for Wei {
    fn add_assign(&mut self, other: &Wei) {
        self.0 += &other.0;
    }
}

impl Sum for Wei {
    fn sum<I: Iterator<Item = Wei>>(iter: I) -> Wei {
        iter.fold(Wei::zero(), |acc, w| acc + w)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True for a non-empty string of ASCII digits.
pub fn is_digit_string(value: &str) -> bool {
    DIGITS.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_truncates_and_strips_zeros() {
        let wei = Wei::parse("4100000000000000000").unwrap();
        assert_eq!(wei.format_units(6), "4.1");
        assert_eq!(Wei::from(1).format_units(0), "0");
        assert_eq!(Wei::from(1).format_units(18), "0.000000000000000001");
        assert_eq!(Wei::from(1).format_units(17), "0");
        assert_eq!(Wei::parse("1999999999999999999").unwrap().format_units(2), "1.99");
        assert_eq!(Wei::parse("5000000000000000000").unwrap().format_units(-3), "5");
        assert_eq!(Wei::from(1).format_units(40), "0.000000000000000001");
    }

    #[test]
    fn parse_rejects_non_digits_and_negatives() {
        assert!(matches!(
            Wei::parse("-5"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            Wei::parse("12x"),
            Err(ValidationError::Malformed { .. })
        ));
        assert!(Wei::parse("").is_err());
        assert!(Wei::parse("+5").is_err());
        assert!(Wei::parse(" 5").is_err());
        assert_eq!(Wei::parse("007").unwrap().to_string(), "7");
    }

    #[test]
    fn parse_accepts_amounts_past_256_bits() {
        // 2^256
        let two_pow_256 =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        let wei = Wei::parse(two_pow_256).unwrap();
        assert_eq!(wei.to_string(), two_pow_256);

        let ninety = "1".repeat(90);
        assert_eq!(Wei::parse(&ninety).unwrap().to_string(), ninety);
    }

    #[test]
    fn addition_is_exact() {
        assert_eq!(Wei::from(2) + Wei::from(3), Wei::from(5));

        let max_u256 =
            "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let mut total = Wei::parse(max_u256).unwrap();
        total += &Wei::from(1);
        assert_eq!(
            total.to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639936"
        );
        let sum: Wei = [Wei::from(1), Wei::from(2), Wei::from(3)].into_iter().sum();
        assert_eq!(sum, Wei::from(6));
        assert!(Wei::zero().is_zero());
    }

    #[test]
    fn format_handles_large_whole_parts() {
        let wei = Wei::parse(&format!("{}{}", "9".repeat(70), "5".repeat(18))).unwrap();
        assert_eq!(wei.format_units(2), format!("{}.55", "9".repeat(70)));
    }
}
