//! Profile arity rules
//!
//! An arity says how many hosts a profile may have:
//! - `3`: exactly three
//! - `n`, `2n`: any multiple of the multiplier (zero included)
//! - `1+2n`: the offset plus any multiple of the multiplier
//!
//! Whitespace is ignored in the residue forms (` 2 + 2n `).

use std::fmt;
use std::str::FromStr;

use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    sequence::{pair, terminated},
    IResult,
};

use crate::error::{InventoryError, Result};

/// Marker closing every residue form
pub const MULTIPLIER_MARKER: char = 'n';

/// Parsed arity rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(i64),
    Residue { offset: i64, multiplier: i64 },
}

impl Arity {
    pub fn parse(rule: &str) -> Result<Self> {
        if let Ok(count) = rule.trim().parse::<i64>() {
            return Ok(Arity::Exact(count));
        }

        let compact: String = rule.chars().filter(|c| !c.is_whitespace()).collect();
        if !compact.ends_with(MULTIPLIER_MARKER) {
            return Err(InventoryError::invalid(format!(
                "Invalid arity '{rule}': missing multiplier marker '{MULTIPLIER_MARKER}'"
            )));
        }

        let (_, (offset, multiplier)) = residue(&compact)
            .map_err(|_| InventoryError::invalid(format!("Invalid arity '{rule}'")))?;
        let multiplier = multiplier.unwrap_or(1);
        if multiplier == 0 {
            return Err(InventoryError::invalid(format!(
                "Invalid arity '{rule}': multiplier must be positive"
            )));
        }

        Ok(Arity::Residue {
            offset: offset.unwrap_or(0),
            multiplier,
        })
    }

    /// Does `count` hosts satisfy this rule
    pub fn admits(&self, count: usize) -> bool {
        // Widened so extreme offsets cannot overflow
        let count = count as i128;
        match *self {
            Arity::Exact(expected) => count == i128::from(expected),
            Arity::Residue { offset, multiplier } => {
                let surplus = count - i128::from(offset);
                surplus >= 0 && surplus % i128::from(multiplier) == 0
            }
        }
    }
}

impl FromStr for Arity {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        Arity::parse(s)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(count) => write!(f, "{count}"),
            Arity::Residue { offset: 0, multiplier: 1 } => write!(f, "n"),
            Arity::Residue { offset: 0, multiplier } => write!(f, "{multiplier}n"),
            Arity::Residue { offset, multiplier: 1 } => write!(f, "{offset}+n"),
            Arity::Residue { offset, multiplier } => write!(f, "{offset}+{multiplier}n"),
        }
    }
}

/// Check `count` against the textual arity `rule`.
///
/// A malformed rule is an error, not a failed check.
pub fn validate_arity(rule: &str, count: usize) -> Result<bool> {
    Ok(Arity::parse(rule)?.admits(count))
}

// =============================================================================
// PARSER
// =============================================================================

fn integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| s.parse::<i64>())(input)
}

fn multiplier(input: &str) -> IResult<&str, Option<i64>> {
    terminated(
        opt(map_res(digit1, |s: &str| s.parse::<i64>())),
        char(MULTIPLIER_MARKER),
    )(input)
}

/// `[offset '+'] [multiplier] 'n'`, whitespace already removed
fn residue(input: &str) -> IResult<&str, (Option<i64>, Option<i64>)> {
    all_consuming(pair(opt(terminated(integer, char('+'))), multiplier))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_arity_exact() {
        assert!(validate_arity("1", 1).unwrap());
        assert!(!validate_arity("2", 1).unwrap());
        assert!(validate_arity(" 0 ", 0).unwrap());
    }

    #[test]
    fn test_validate_arity_offset_below_count() {
        assert!(!validate_arity(" 2 + n ", 1).unwrap());
    }

    #[test]
    fn test_validate_arity_offset_multiple() {
        assert!(validate_arity(" 2 + 2n ", 8).unwrap());
        assert!(!validate_arity(" 2 + 2n ", 7).unwrap());
        assert!(validate_arity("1+2n", 1).unwrap());
    }

    #[test]
    fn test_validate_arity_any() {
        assert!(validate_arity("n", 0).unwrap());
        assert!(validate_arity("n", 17).unwrap());
        assert!(validate_arity("3n", 9).unwrap());
        assert!(!validate_arity("3n", 10).unwrap());
    }

    #[test]
    fn test_validate_arity_extreme_offset() {
        assert!(validate_arity("-9223372036854775808+n", 0).unwrap());
        assert!(validate_arity("-9223372036854775808+2n", 0).unwrap());
        assert!(!validate_arity("-9223372036854775808+2n", 1).unwrap());
        assert!(!validate_arity("9223372036854775807+n", 3).unwrap());
    }

    #[test]
    fn test_missing_marker_is_error() {
        let err = validate_arity("2+2", 4).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.to_string().contains("missing multiplier marker"));
    }

    #[test]
    fn test_malformed_rules_are_errors() {
        for rule in ["x+n", "1+2+n", "an", "0n", "+n", ""] {
            assert!(Arity::parse(rule).is_err(), "{rule:?} should be rejected");
        }
    }

    #[test]
    fn test_display_round_trip() {
        for rule in ["4", "n", "3n", "1+n", "2+2n"] {
            assert_eq!(rule.parse::<Arity>().unwrap().to_string(), rule);
        }
    }

    proptest! {
        #[test]
        fn residue_admits_offset_plus_multiples(offset in 0i64..50, multiplier in 1i64..20, k in 0i64..50) {
            let rule = Arity::Residue { offset, multiplier };
            prop_assert!(rule.admits((offset + k * multiplier) as usize));
            if multiplier > 1 {
                prop_assert!(!rule.admits((offset + k * multiplier + 1) as usize));
            }
            if offset > 0 {
                prop_assert!(!rule.admits((offset - 1) as usize));
            }
        }
    }
}
