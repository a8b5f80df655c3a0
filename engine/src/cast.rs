//! Three-coin casting.
//!
//! Each line is cast by tossing three coins: heads count 3, tails 2. The sum
//! (6 to 9) fixes the line's polarity and whether it is changing. Six lines,
//! cast bottom first, give the primary hexagram; flipping the changing lines
//! gives the resulting one.
//!
//! ```
//! use yijing_engine::cast::Caster;
//!
//! let mut caster = Caster::seeded(64);
//! let casting = caster.cast();
//! assert!(casting.is_complete());
//! let primary = casting.code()?;
//! if let Some(changed) = casting.changed_code()? {
//!     assert_ne!(primary, changed);
//! }
//! # Ok::<(), yijing_engine::CastError>(())
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::trace;

use crate::code::{HexagramCode, Polarity};
use crate::error::CastError;

/// Lines in a complete casting.
pub const LINE_COUNT: usize = 6;

/// One face of a coin, valued by its count in the sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinFace {
    /// Counts 3.
    Heads = 3,
    /// Counts 2.
    Tails = 2,
}

impl CoinFace {
    /// The count this face adds to the sum.
    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Polarity label shown for the face.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CoinFace::Heads => "阳",
            CoinFace::Tails => "阴",
        }
    }
}

/// A cast line, named by its coin sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// 6: yin, changing to yang.
    OldYin = 6,
    /// 7: yang, at rest.
    YoungYang = 7,
    /// 8: yin, at rest.
    YoungYin = 8,
    /// 9: yang, changing to yin.
    OldYang = 9,
}

impl LineKind {
    /// Maps a coin sum to its line. Returns `None` outside 6..=9.
    #[must_use]
    pub fn from_sum(sum: u8) -> Option<Self> {
        match sum {
            6 => Some(LineKind::OldYin),
            7 => Some(LineKind::YoungYang),
            8 => Some(LineKind::YoungYin),
            9 => Some(LineKind::OldYang),
            _ => None,
        }
    }

    /// The line three coins produce.
    #[must_use]
    pub fn from_coins(coins: [CoinFace; 3]) -> Self {
        match coins.iter().filter(|&&c| c == CoinFace::Heads).count() {
            0 => LineKind::OldYin,
            1 => LineKind::YoungYang,
            2 => LineKind::YoungYin,
            3.. => LineKind::OldYang,
        }
    }

    /// The coin sum.
    #[must_use]
    pub fn sum(self) -> u8 {
        self as u8
    }

    /// Polarity as cast.
    #[must_use]
    pub fn polarity(self) -> Polarity {
        match self {
            LineKind::OldYin | LineKind::YoungYin => Polarity::Yin,
            LineKind::YoungYang | LineKind::OldYang => Polarity::Yang,
        }
    }

    /// Whether the line changes into its opposite.
    #[must_use]
    pub fn is_changing(self) -> bool {
        matches!(self, LineKind::OldYin | LineKind::OldYang)
    }

    /// Polarity after changing lines have turned.
    #[must_use]
    pub fn settled(self) -> Polarity {
        if self.is_changing() {
            self.polarity().flip()
        } else {
            self.polarity()
        }
    }

    /// Traditional label: 老阴, 少阳, 少阴 or 老阳.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LineKind::OldYin => "老阴",
            LineKind::YoungYang => "少阳",
            LineKind::YoungYin => "少阴",
            LineKind::OldYang => "老阳",
        }
    }
}

/// Up to six cast lines, bottom line first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Casting {
    lines: Vec<LineKind>,
}

impl Casting {
    /// An empty casting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete casting from six lines, bottom line first.
    #[must_use]
    pub fn from_lines(lines: [LineKind; LINE_COUNT]) -> Self {
        Self {
            lines: lines.to_vec(),
        }
    }

    /// Adds the next line above those already cast.
    ///
    /// # Errors
    ///
    /// Returns [`CastError::Complete`] if six lines are already cast.
    pub fn push(&mut self, line: LineKind) -> Result<(), CastError> {
        if self.is_complete() {
            return Err(CastError::Complete);
        }
        self.lines.push(line);
        Ok(())
    }

    /// Lines cast so far, bottom line first.
    #[must_use]
    pub fn lines(&self) -> &[LineKind] {
        &self.lines
    }

    /// Number of lines cast so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True before the first line is cast.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True once six lines are cast.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lines.len() == LINE_COUNT
    }

    fn code_with<F>(&self, polarity: F) -> Result<HexagramCode, CastError>
    where
        F: Fn(LineKind) -> Polarity,
    {
        if !self.is_complete() {
            return Err(CastError::Incomplete(self.lines.len()));
        }
        let mut lines = [Polarity::Yin; LINE_COUNT];
        for (slot, line) in lines.iter_mut().zip(&self.lines) {
            *slot = polarity(*line);
        }
        Ok(HexagramCode::from_lines(lines))
    }

    /// The primary hexagram.
    ///
    /// # Errors
    ///
    /// Returns [`CastError::Incomplete`] before six lines are cast.
    pub fn code(&self) -> Result<HexagramCode, CastError> {
        self.code_with(LineKind::polarity)
    }

    /// The resulting hexagram with every changing line flipped, or `None`
    /// when no line changes.
    ///
    /// # Errors
    ///
    /// Returns [`CastError::Incomplete`] before six lines are cast.
    pub fn changed_code(&self) -> Result<Option<HexagramCode>, CastError> {
        let changed = self.code_with(LineKind::settled)?;
        Ok((self.changing_count() > 0).then_some(changed))
    }

    /// Positions (1 = bottom) of the changing lines.
    #[must_use]
    pub fn changing_positions(&self) -> Vec<u8> {
        (1u8..)
            .zip(&self.lines)
            .filter(|(_, line)| line.is_changing())
            .map(|(position, _)| position)
            .collect()
    }

    /// Number of changing lines.
    #[must_use]
    pub fn changing_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_changing()).count()
    }

    /// Whether the line at `position` (1 = bottom) stands in its proper place:
    /// yang on an odd position, yin on an even one. `None` if that line has
    /// not been cast.
    #[must_use]
    pub fn is_in_position(&self, position: u8) -> Option<bool> {
        let index = usize::from(position).checked_sub(1)?;
        let line = self.lines.get(index)?;
        let odd = position % 2 == 1;
        Some((line.polarity() == Polarity::Yang) == odd)
    }
}

/// The outcome of tossing three coins once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throw {
    /// The three faces.
    pub coins: [CoinFace; 3],
    /// The line they produce.
    pub line: LineKind,
}

/// Tosses coins with a random source.
#[derive(Debug, Clone)]
pub struct Caster<R> {
    rng: R,
}

impl Caster<StdRng> {
    /// A reproducible caster.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// A caster seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Caster<R> {
    /// Wraps a random source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn toss(&mut self) -> CoinFace {
        if self.rng.gen_bool(0.5) {
            CoinFace::Heads
        } else {
            CoinFace::Tails
        }
    }

    /// Tosses three coins.
    pub fn throw(&mut self) -> Throw {
        let coins = [self.toss(), self.toss(), self.toss()];
        let line = LineKind::from_coins(coins);
        trace!(sum = line.sum(), line = line.label(), "coins thrown");
        Throw { coins, line }
    }

    /// Casts one line.
    pub fn cast_line(&mut self) -> LineKind {
        self.throw().line
    }

    /// Casts lines into `casting` until it is complete.
    pub fn cast_into(&mut self, casting: &mut Casting) {
        while !casting.is_complete() {
            let line = self.cast_line();
            if casting.push(line).is_err() {
                break;
            }
        }
    }

    /// Casts a complete six-line casting.
    pub fn cast(&mut self) -> Casting {
        let mut casting = Casting::new();
        self.cast_into(&mut casting);
        casting
    }
}
