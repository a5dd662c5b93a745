//! Range patterns
//!
//! A pattern string is one of:
//! - a numeric range list: `10-12`, `001-003`, `1-3:10-12`, `100-94`
//! - a name carrying a range: `host10-12`, `ceph001-006`
//! - a dotted-quad range: `192.168.1.10-12`, `10.0.1-2.2-254`
//! - anything else, which is a constant literal
//!
//! Nothing here fails. Text that only looks like a range expands to itself.

use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// PATTERN GRAMMAR
// =============================================================================

/// Optional literal head, a colon-chained range list, optional literal tail
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)([0-9]+-[0-9]+(?::[0-9]+-[0-9]+)*)(.*)$").unwrap()
});

/// Characters allowed in a dotted-quad range
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9:.\-]+$").unwrap());

/// True when `text` contains a numeric range somewhere in it
pub fn is_range_pattern(text: &str) -> bool {
    RANGE_RE.is_match(text)
}

fn is_address_pattern(text: &str, parts: &[&str]) -> bool {
    parts.len() == 4 && ADDRESS_RE.is_match(text) && (text.contains('-') || text.contains(':'))
}

// =============================================================================
// NUMERIC RANGE LISTS
// =============================================================================

/// One `low-high` run, inclusive at both ends
#[derive(Debug, Clone)]
struct Run {
    cursor: i64,
    last: i64,
    step: i64,
    width: usize,
    done: bool,
}

impl Run {
    fn new(low: i64, high: i64, width: usize) -> Self {
        Self {
            cursor: low,
            last: high,
            step: if high >= low { 1 } else { -1 },
            width,
            done: false,
        }
    }
}

impl Iterator for Run {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let value = self.cursor;
        if value == self.last {
            self.done = true;
        } else {
            self.cursor += self.step;
        }
        Some(format!("{:0width$}", value, width = self.width))
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Numeric(Run),
    /// Unparsable segment: emits the whole pattern text once
    Verbatim(Option<String>),
}

impl Segment {
    fn parse(segment: &str, pattern: &str) -> Self {
        let verbatim = || Segment::Verbatim(Some(pattern.to_string()));

        let mut bounds = segment.split('-');
        let (Some(low), Some(high), None) = (bounds.next(), bounds.next(), bounds.next()) else {
            return verbatim();
        };
        let (low, high) = (low.trim(), high.trim());
        match (low.parse::<i64>(), high.parse::<i64>()) {
            (Ok(start), Ok(end)) => {
                // Zero-padded output keeps the width of the low bound
                let width = if low.starts_with('0') { low.len() } else { 0 };
                Segment::Numeric(Run::new(start, end, width))
            }
            _ => verbatim(),
        }
    }

    fn next(&mut self) -> Option<String> {
        match self {
            Segment::Numeric(run) => run.next(),
            Segment::Verbatim(text) => text.take(),
        }
    }
}

/// Lazy expansion of a colon-separated list of `low-high` runs
#[derive(Debug, Clone)]
pub struct RangeIter {
    segments: Vec<Segment>,
    index: usize,
}

impl Iterator for RangeIter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(segment) = self.segments.get_mut(self.index) {
            if let Some(value) = segment.next() {
                return Some(value);
            }
            self.index += 1;
        }
        None
    }
}

/// Expand a range list such as `1-3:10-12` into its values.
///
/// Runs are emitted in declared order; a run whose high bound is below its
/// low bound counts down. A bare string without `-` yields itself once.
pub fn expand_range(pattern: &str) -> RangeIter {
    RangeIter {
        segments: pattern
            .split(':')
            .map(|segment| Segment::parse(segment, pattern))
            .collect(),
        index: 0,
    }
}

// =============================================================================
// DOTTED-QUAD RANGES
// =============================================================================

/// Odometer over four octet ranges, last octet spinning fastest
#[derive(Debug, Clone)]
pub struct AddressRange {
    octets: [String; 4],
    iters: [RangeIter; 4],
    current: [String; 4],
    started: bool,
    exhausted: bool,
}

impl AddressRange {
    fn new(parts: &[&str]) -> Self {
        let octets: [String; 4] = std::array::from_fn(|i| parts[i].to_string());
        let iters = std::array::from_fn(|i| expand_range(&octets[i]));
        Self {
            octets,
            iters,
            current: Default::default(),
            started: false,
            exhausted: false,
        }
    }

    fn prime(&mut self) -> bool {
        for pos in 0..4 {
            match self.iters[pos].next() {
                Some(value) => self.current[pos] = value,
                None => return false,
            }
        }
        true
    }

    /// Step octet `pos`; on wrap, carry into `pos - 1` and restart `pos`.
    fn advance(&mut self, pos: usize) -> bool {
        if let Some(value) = self.iters[pos].next() {
            self.current[pos] = value;
            return true;
        }
        if pos == 0 || !self.advance(pos - 1) {
            return false;
        }
        self.iters[pos] = expand_range(&self.octets[pos]);
        match self.iters[pos].next() {
            Some(value) => {
                self.current[pos] = value;
                true
            }
            None => false,
        }
    }
}

impl Iterator for AddressRange {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        let moved = if self.started {
            self.advance(3)
        } else {
            self.started = true;
            self.prime()
        };
        if moved {
            Some(self.current.join("."))
        } else {
            self.exhausted = true;
            None
        }
    }
}

// =============================================================================
// PATTERN SEQUENCES
// =============================================================================

/// The sequence denoted by one pattern string
#[derive(Debug, Clone)]
pub enum PatternSeq {
    /// `head` + each range value + `tail`
    Range {
        head: String,
        tail: String,
        values: RangeIter,
    },
    /// Dotted-quad cross product
    Address(AddressRange),
    /// Not a pattern: the same literal, forever
    Constant(String),
}

impl PatternSeq {
    /// False for [`PatternSeq::Constant`], which never runs out
    pub fn is_bounded(&self) -> bool {
        !matches!(self, PatternSeq::Constant(_))
    }
}

impl Iterator for PatternSeq {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self {
            PatternSeq::Range { head, tail, values } => {
                values.next().map(|value| format!("{head}{value}{tail}"))
            }
            PatternSeq::Address(range) => range.next(),
            PatternSeq::Constant(text) => Some(text.clone()),
        }
    }
}

/// Classify `pattern` and return the lazy sequence of its values.
///
/// Dotted quads are tried first, then an embedded range list, and anything
/// left over becomes a [`PatternSeq::Constant`].
pub fn expand_pattern(pattern: &str) -> PatternSeq {
    let parts: Vec<&str> = pattern.split('.').collect();
    if is_address_pattern(pattern, &parts) {
        return PatternSeq::Address(AddressRange::new(&parts));
    }

    match RANGE_RE.captures(pattern) {
        Some(caps) => PatternSeq::Range {
            head: caps[1].to_string(),
            tail: caps[3].to_string(),
            values: expand_range(&caps[2]),
        },
        None => PatternSeq::Constant(pattern.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(pattern: &str) -> Vec<String> {
        expand_range(pattern).collect()
    }

    fn values(pattern: &str) -> Vec<String> {
        expand_pattern(pattern).collect()
    }

    #[test]
    fn test_range_ascending() {
        assert_eq!(range("10-12"), vec!["10", "11", "12"]);
    }

    #[test]
    fn test_range_zero_padded() {
        assert_eq!(range("001-003"), vec!["001", "002", "003"]);
        assert_eq!(range("08-11"), vec!["08", "09", "10", "11"]);
    }

    #[test]
    fn test_range_colon_chain() {
        assert_eq!(range("1-3:10-12"), vec!["1", "2", "3", "10", "11", "12"]);
    }

    #[test]
    fn test_range_descending_segment() {
        assert_eq!(
            range("100-100:94-90"),
            vec!["100", "94", "93", "92", "91", "90"]
        );
    }

    #[test]
    fn test_range_invalid_falls_back_to_pattern() {
        assert_eq!(range("D7-H.1.0.0"), vec!["D7-H.1.0.0"]);
        assert_eq!(range("-5"), vec!["-5"]);
    }

    #[test]
    fn test_range_plain_integer() {
        assert_eq!(range("5"), vec!["5"]);
    }

    #[test]
    fn test_range_invalid_segment_keeps_others() {
        assert_eq!(range("1-2:x-y"), vec!["1", "2", "1-2:x-y"]);
    }

    #[test]
    fn test_pattern_ips() {
        assert_eq!(
            values("192.168.1.10-12"),
            vec!["192.168.1.10", "192.168.1.11", "192.168.1.12"]
        );
    }

    #[test]
    fn test_pattern_names() {
        assert_eq!(values("host10-12"), vec!["host10", "host11", "host12"]);
        assert_eq!(values("ceph001-003.lab"), vec!["ceph001.lab", "ceph002.lab", "ceph003.lab"]);
    }

    #[test]
    fn test_pattern_nothing_is_constant() {
        let mut seq = expand_pattern("host");
        assert!(!seq.is_bounded());
        assert_eq!(seq.next().as_deref(), Some("host"));
        assert_eq!(seq.next().as_deref(), Some("host"));
    }

    #[test]
    fn test_pattern_invalid_version_is_constant() {
        assert!(!expand_pattern("D7-H.1.0.0").is_bounded());
    }

    #[test]
    fn test_address_odometer_order() {
        assert_eq!(
            values("10.0.1-2.7-8"),
            vec!["10.0.1.7", "10.0.1.8", "10.0.2.7", "10.0.2.8"]
        );
    }

    #[test]
    fn test_address_cross_product_size() {
        assert_eq!(expand_pattern("10.0.1-2.2-254").count(), 2 * 253);
    }

    #[test]
    fn test_address_colon_octet_without_range_is_verbatim() {
        // `1:5` holds no `-`, so each of its two segments emits the octet text
        assert_eq!(
            values("10.0-1.1-2.1:5"),
            vec![
                "10.0.1.1:5", "10.0.1.1:5", "10.0.2.1:5", "10.0.2.1:5",
                "10.1.1.1:5", "10.1.1.1:5", "10.1.2.1:5", "10.1.2.1:5",
            ]
        );
    }

    #[test]
    fn test_is_range_pattern() {
        assert!(is_range_pattern("host10-12"));
        assert!(is_range_pattern("192.168.1.1-4"));
        assert!(!is_range_pattern("192.168.1.1"));
        assert!(!is_range_pattern("D7-H.1.0.0"));
    }
}
