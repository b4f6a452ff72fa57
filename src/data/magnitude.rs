//! Magnitude Suffix Module
//! Turns a (mantissa, suffix) damage pair into a dollar amount.
//!
//! The source data mixes letter codes (H/K/M/B), bare digits and a few
//! symbols. Digits 1-8 are read as the power-of-ten exponent itself. The
//! competing reading (every digit means a flat x10) gives implausibly small
//! totals for the affected rows, so the exponent reading is used here. It
//! remains a judgment call about the source data, not a published rule.

use serde::Serialize;
use std::fmt;

/// Decoded meaning of a raw magnitude code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MagnitudeSuffix {
    /// `H`: x10^2
    Hundred,
    /// `K`: x10^3
    Thousand,
    /// `M`: x10^6
    Million,
    /// `B`: x10^9
    Billion,
    /// `1`..=`8`: the digit is the exponent
    Exponent(u8),
    /// `+`: legacy code, always worth exactly 1
    Plus,
    /// `?`, `-`, `0`, blank or anything else: worth 0
    Unknown,
}

impl MagnitudeSuffix {
    /// Classify a raw code. Matching ignores case; surrounding whitespace is
    /// not stripped.
    pub fn parse(code: &str) -> Self {
        let mut chars = code.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return MagnitudeSuffix::Unknown;
        };

        match c.to_ascii_uppercase() {
            'H' => MagnitudeSuffix::Hundred,
            'K' => MagnitudeSuffix::Thousand,
            'M' => MagnitudeSuffix::Million,
            'B' => MagnitudeSuffix::Billion,
            '+' => MagnitudeSuffix::Plus,
            d @ '1'..='8' => MagnitudeSuffix::Exponent(d as u8 - b'0'),
            _ => MagnitudeSuffix::Unknown,
        }
    }

    /// Dollar value of `mantissa` under this code.
    pub fn apply(self, mantissa: f64) -> f64 {
        match self {
            MagnitudeSuffix::Hundred => mantissa * 1e2,
            MagnitudeSuffix::Thousand => mantissa * 1e3,
            MagnitudeSuffix::Million => mantissa * 1e6,
            MagnitudeSuffix::Billion => mantissa * 1e9,
            MagnitudeSuffix::Exponent(exp) => mantissa * 10f64.powi(i32::from(exp)),
            // Open question in the data: this might mean "x1". Kept literal.
            MagnitudeSuffix::Plus => 1.0,
            MagnitudeSuffix::Unknown => 0.0,
        }
    }
}

impl fmt::Display for MagnitudeSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagnitudeSuffix::Hundred => write!(f, "x10^2"),
            MagnitudeSuffix::Thousand => write!(f, "x10^3"),
            MagnitudeSuffix::Million => write!(f, "x10^6"),
            MagnitudeSuffix::Billion => write!(f, "x10^9"),
            MagnitudeSuffix::Exponent(exp) => write!(f, "x10^{}", exp),
            MagnitudeSuffix::Plus => write!(f, "constant 1"),
            MagnitudeSuffix::Unknown => write!(f, "zero"),
        }
    }
}

/// Decode a single damage figure.
pub fn decode(mantissa: f64, suffix: &str) -> f64 {
    MagnitudeSuffix::parse(suffix).apply(mantissa)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 5] = [0.0, 1.0, 2.5, 25.0, 1234.5];

    #[test]
    fn letter_codes_scale_by_named_power() {
        for x in SAMPLES {
            assert_eq!(decode(x, "H"), x * 100.0);
            assert_eq!(decode(x, "K"), x * 1000.0);
            assert_eq!(decode(x, "M"), x * 1e6);
            assert_eq!(decode(x, "B"), x * 1e9);
        }
    }

    #[test]
    fn letter_codes_ignore_case() {
        for x in SAMPLES {
            assert_eq!(decode(x, "k"), decode(x, "K"));
            assert_eq!(decode(x, "h"), decode(x, "H"));
            assert_eq!(decode(x, "m"), decode(x, "M"));
            assert_eq!(decode(x, "b"), decode(x, "B"));
        }
    }

    // Exponent reading of digit codes; the flat x10 reading would give 25.0 * 10.
    #[test]
    fn digit_codes_are_exponents() {
        assert_eq!(decode(25.0, "3"), 25.0 * 1000.0);
        assert_eq!(decode(2.0, "1"), 20.0);
        assert_eq!(decode(2.0, "5"), 200_000.0);
        assert_eq!(decode(1.0, "8"), 1e8);
        assert_eq!(MagnitudeSuffix::parse("6"), MagnitudeSuffix::Exponent(6));
    }

    #[test]
    fn plus_is_constant_one() {
        assert_eq!(decode(0.0, "+"), 1.0);
        assert_eq!(decode(50.0, "+"), 1.0);
        assert_eq!(decode(1e6, "+"), 1.0);
    }

    #[test]
    fn unknown_codes_decode_to_zero() {
        for code in ["?", "-", "0", "", "9", "X", "KK", " K"] {
            assert_eq!(decode(12.0, code), 0.0, "code {:?}", code);
            assert_eq!(MagnitudeSuffix::parse(code), MagnitudeSuffix::Unknown);
        }
    }
}
