//! Bit-level hexagram and trigram codes.
//!
//! A hexagram code is the 6-character bit string from the dataset read as a
//! number: the first character (top line) is bit 5 and the last character
//! (bottom line, line position 1) is bit 0. Trigram codes use the same
//! orientation over 3 bits, so a hexagram is `upper << 3 | lower`.
//!
//! The three structural transformations are served from precomputed tables:
//!
//! ```
//! use yijing_engine::HexagramCode;
//!
//! let zhun: HexagramCode = "010001".parse()?;      // 屯
//! assert_eq!(zhun.opposite().to_string(), "101110"); // 鼎
//! assert_eq!(zhun.inverse().to_string(), "100010");  // 蒙
//! assert_eq!(zhun.mutual().to_string(), "100000");   // 剥
//! # Ok::<(), yijing_engine::CodeError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::CodeError;

/// Number of distinct hexagram codes.
pub const HEXAGRAM_CODES: u8 = 64;

/// Number of distinct trigram codes.
pub const TRIGRAM_CODES: u8 = 8;

/// Line polarities a line must have to stand in its proper place (当位):
/// yang on odd positions, yin on even ones. Written top line first, `010101`.
pub const PROPER_POSITIONS: u8 = 0b01_0101;

// ============================================================================
// Lookup tables
// ============================================================================

const fn bit(x: u8, i: u8) -> u8 {
    (x >> i) & 1
}

const fn reverse6(x: u8) -> u8 {
    let mut out = 0u8;
    let mut i = 0u8;
    while i < 6 {
        out |= bit(x, i) << (5 - i);
        i += 1;
    }
    out
}

// b0..b5 top to bottom live at bits 5..0; the mutual code is b1 b2 b3 b2 b3 b4.
const fn mutual6(x: u8) -> u8 {
    (bit(x, 4) << 5)
        | (bit(x, 3) << 4)
        | (bit(x, 2) << 3)
        | (bit(x, 3) << 2)
        | (bit(x, 2) << 1)
        | bit(x, 1)
}

/// `INVERSE[x]` is `x` with its six lines in reverse order (综卦).
pub static INVERSE: [u8; 64] = {
    let mut table = [0u8; 64];
    let mut i = 0u8;
    while i < HEXAGRAM_CODES {
        table[i as usize] = reverse6(i);
        i += 1;
    }
    table
};

/// `MUTUAL[x]` is the nuclear hexagram (互卦) built from lines 2–5 of `x`.
pub static MUTUAL: [u8; 64] = {
    let mut table = [0u8; 64];
    let mut i = 0u8;
    while i < HEXAGRAM_CODES {
        table[i as usize] = mutual6(i);
        i += 1;
    }
    table
};

// ============================================================================
// Polarity
// ============================================================================

/// Polarity of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Broken line, bit value 0.
    Yin,
    /// Solid line, bit value 1.
    Yang,
}

impl Polarity {
    /// Maps a bit (0 or non-zero) to a polarity.
    #[must_use]
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Polarity::Yin
        } else {
            Polarity::Yang
        }
    }

    /// Returns the bit value: 1 for yang, 0 for yin.
    #[must_use]
    pub fn bit(self) -> u8 {
        match self {
            Polarity::Yin => 0,
            Polarity::Yang => 1,
        }
    }

    /// Returns the other polarity.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Polarity::Yin => Polarity::Yang,
            Polarity::Yang => Polarity::Yin,
        }
    }

    /// Returns `"yin"` or `"yang"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Yin => "yin",
            Polarity::Yang => "yang",
        }
    }
}

// ============================================================================
// Codes
// ============================================================================

fn parse_bits(s: &str, width: usize) -> Result<u8, CodeError> {
    let found = s.chars().count();
    if found != width {
        return Err(CodeError::Length {
            expected: width,
            found,
        });
    }
    s.chars().try_fold(0u8, |acc, c| match c {
        '0' => Ok(acc << 1),
        '1' => Ok((acc << 1) | 1),
        other => Err(CodeError::Digit(other)),
    })
}

/// A 3-bit trigram code, top line first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrigramCode(u8);

impl TrigramCode {
    /// Builds a code from its numeric value. Returns `None` above `0b111`.
    #[must_use]
    pub fn new(bits: u8) -> Option<Self> {
        (bits < TRIGRAM_CODES).then_some(Self(bits))
    }

    /// Parses a 3-character `'0'`/`'1'` string.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError`] on wrong length or a character other than `0`/`1`.
    pub fn parse(s: &str) -> Result<Self, CodeError> {
        parse_bits(s, 3).map(Self)
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TrigramCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03b}", self.0)
    }
}

impl FromStr for TrigramCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A 6-bit hexagram code, top line first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexagramCode(u8);

impl HexagramCode {
    /// Builds a code from its numeric value. Returns `None` above `0b111111`.
    #[must_use]
    pub fn new(bits: u8) -> Option<Self> {
        (bits < HEXAGRAM_CODES).then_some(Self(bits))
    }

    /// Parses a 6-character `'0'`/`'1'` string.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError`] on wrong length or a character other than `0`/`1`.
    pub fn parse(s: &str) -> Result<Self, CodeError> {
        parse_bits(s, 6).map(Self)
    }

    /// Stacks an upper trigram over a lower one.
    #[must_use]
    pub fn from_trigrams(upper: TrigramCode, lower: TrigramCode) -> Self {
        Self((upper.0 << 3) | lower.0)
    }

    /// Builds a code from six line polarities listed bottom line first.
    #[must_use]
    pub fn from_lines(lines: [Polarity; 6]) -> Self {
        let bits = lines
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, line)| acc | (line.bit() << i));
        Self(bits)
    }

    /// Iterates over all 64 codes in numeric order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..HEXAGRAM_CODES).map(Self)
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Upper trigram: the first three characters.
    #[must_use]
    pub fn upper(self) -> TrigramCode {
        TrigramCode(self.0 >> 3)
    }

    /// Lower trigram: the last three characters.
    #[must_use]
    pub fn lower(self) -> TrigramCode {
        TrigramCode(self.0 & 0b111)
    }

    /// Every line flipped (错卦).
    #[must_use]
    pub fn opposite(self) -> Self {
        Self(!self.0 & 0b11_1111)
    }

    /// Lines in reverse order (综卦).
    #[must_use]
    pub fn inverse(self) -> Self {
        Self(INVERSE[usize::from(self.0)])
    }

    /// Nuclear hexagram (互卦).
    #[must_use]
    pub fn mutual(self) -> Self {
        Self(MUTUAL[usize::from(self.0)])
    }

    /// Polarity of the line at `position`, 1 (bottom) to 6 (top).
    #[must_use]
    pub fn line(self, position: u8) -> Option<Polarity> {
        (1..=6)
            .contains(&position)
            .then(|| Polarity::from_bit(bit(self.0, position - 1)))
    }

    /// Whether the line at `position` stands in its proper place (当位).
    #[must_use]
    pub fn is_in_position(self, position: u8) -> Option<bool> {
        let line = self.line(position)?;
        Some(line.bit() == bit(PROPER_POSITIONS, position - 1))
    }

    /// Whether the code reads the same top-down and bottom-up.
    #[must_use]
    pub fn is_palindrome(self) -> bool {
        self.inverse() == self
    }
}

impl fmt::Display for HexagramCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06b}", self.0)
    }
}

impl FromStr for HexagramCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexagramCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for TrigramCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn code(s: &str) -> HexagramCode {
        HexagramCode::parse(s).unwrap()
    }

    #[test]
    fn parse_and_display_agree() {
        for c in HexagramCode::all() {
            assert_eq!(code(&c.to_string()), c);
        }
    }

    #[test]
    fn first_character_is_top_line() {
        let c = code("100000");
        assert_eq!(c.line(6), Some(Polarity::Yang));
        assert_eq!(c.line(1), Some(Polarity::Yin));
        assert_eq!(c.line(0), None);
        assert_eq!(c.line(7), None);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            HexagramCode::parse("11111"),
            Err(CodeError::Length { expected: 6, found: 5 })
        ));
        assert!(matches!(
            HexagramCode::parse("11x111"),
            Err(CodeError::Digit('x'))
        ));
        assert!(TrigramCode::parse("1111").is_err());
        assert!(HexagramCode::parse("").is_err());
    }

    #[test]
    fn trigram_split() {
        let pi = code("111000");
        assert_eq!(pi.upper().to_string(), "111");
        assert_eq!(pi.lower().to_string(), "000");
        assert_eq!(HexagramCode::from_trigrams(pi.upper(), pi.lower()), pi);
    }

    #[test]
    fn transformations_on_known_codes() {
        assert_eq!(code("111111").opposite(), code("000000"));
        assert_eq!(code("111111").inverse(), code("111111"));
        assert_eq!(code("010101").mutual(), code("101010"));
        assert_eq!(code("000111").mutual(), code("001011"));
    }

    #[test]
    fn from_lines_reads_bottom_up() {
        use Polarity::{Yang, Yin};
        // 既济: yang at 1, 3, 5.
        let c = HexagramCode::from_lines([Yang, Yin, Yang, Yin, Yang, Yin]);
        assert_eq!(c.to_string(), "010101");
    }

    #[test]
    fn ji_ji_is_fully_in_position() {
        let c = code("010101");
        assert!((1..=6).all(|p| c.is_in_position(p) == Some(true)));
        let wei_ji = code("101010");
        assert!((1..=6).all(|p| wei_ji.is_in_position(p) == Some(false)));
    }

    #[test]
    fn new_bounds() {
        assert!(HexagramCode::new(63).is_some());
        assert!(HexagramCode::new(64).is_none());
        assert!(TrigramCode::new(7).is_some());
        assert!(TrigramCode::new(8).is_none());
    }
}
