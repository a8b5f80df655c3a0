//! Structural relations between hexagrams.
//!
//! Each hexagram is related to three others: its opposite (every line
//! flipped), its inverse (turned upside down) and its mutual hexagram (built
//! from the inner lines). When the derived code has no hexagram in the
//! dataset, the outcome is decided by [`RelationFallback`].

use serde::Deserialize;

use crate::code::HexagramCode;

/// Kind of structural relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    /// 错卦: every line flipped.
    Opposite,
    /// 综卦: line order reversed.
    Inverse,
    /// 互卦: nuclear hexagram from lines 2–5.
    Mutual,
}

impl RelationKind {
    /// All kinds, in presentation order.
    pub const ALL: [RelationKind; 3] = [
        RelationKind::Opposite,
        RelationKind::Inverse,
        RelationKind::Mutual,
    ];

    /// Returns the key used in serialized output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Opposite => "opposite",
            RelationKind::Inverse => "inverse",
            RelationKind::Mutual => "mutual",
        }
    }

    /// Returns the traditional label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RelationKind::Opposite => "对宫卦",
            RelationKind::Inverse => "综卦",
            RelationKind::Mutual => "互卦",
        }
    }

    /// Applies the transformation to a code.
    #[must_use]
    pub fn apply(self, code: HexagramCode) -> HexagramCode {
        match self {
            RelationKind::Opposite => code.opposite(),
            RelationKind::Inverse => code.inverse(),
            RelationKind::Mutual => code.mutual(),
        }
    }
}

/// What to record when a derived code matches no hexagram.
///
/// In TOML: `relation_fallback = "unresolved"` or
/// `relation_fallback = { default_id = 1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationFallback {
    /// Record the relation as [`RelationTarget::Unresolved`].
    #[default]
    Unresolved,
    /// Alias the relation to a fixed hexagram id, marked as
    /// [`RelationTarget::Fallback`].
    DefaultId(u8),
}

impl RelationFallback {
    /// The target recorded for a code with no match.
    #[must_use]
    pub fn target(self) -> RelationTarget {
        match self {
            RelationFallback::Unresolved => RelationTarget::Unresolved,
            RelationFallback::DefaultId(id) => RelationTarget::Fallback(id),
        }
    }
}

/// Outcome of resolving one relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationTarget {
    /// The derived code belongs to this hexagram.
    Resolved(u8),
    /// No hexagram matched; aliased to this id by the fallback policy.
    Fallback(u8),
    /// No hexagram matched.
    Unresolved,
}

impl RelationTarget {
    /// The hexagram id to display, including fallback aliases.
    #[must_use]
    pub fn id(self) -> Option<u8> {
        match self {
            RelationTarget::Resolved(id) | RelationTarget::Fallback(id) => Some(id),
            RelationTarget::Unresolved => None,
        }
    }

    /// The hexagram id only when it is a genuine relation.
    #[must_use]
    pub fn resolved(self) -> Option<u8> {
        match self {
            RelationTarget::Resolved(id) => Some(id),
            _ => None,
        }
    }

    /// Whether this target came from the fallback policy.
    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, RelationTarget::Fallback(_))
    }
}

/// The three relations of one hexagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relations {
    /// 错卦.
    pub opposite: RelationTarget,
    /// 综卦.
    pub inverse: RelationTarget,
    /// 互卦.
    pub mutual: RelationTarget,
}

impl Relations {
    /// Returns the target for one kind.
    #[must_use]
    pub fn get(&self, kind: RelationKind) -> RelationTarget {
        match kind {
            RelationKind::Opposite => self.opposite,
            RelationKind::Inverse => self.inverse,
            RelationKind::Mutual => self.mutual,
        }
    }

    /// Iterates in [`RelationKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (RelationKind, RelationTarget)> + '_ {
        RelationKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }

    /// Resolves all three relations of `code` with `lookup`, falling back per `policy`.
    pub fn derive<F>(code: HexagramCode, policy: RelationFallback, mut lookup: F) -> Self
    where
        F: FnMut(HexagramCode) -> Option<u8>,
    {
        let mut resolve = |kind: RelationKind| match lookup(kind.apply(code)) {
            Some(id) => RelationTarget::Resolved(id),
            None => policy.target(),
        };
        Self {
            opposite: resolve(RelationKind::Opposite),
            inverse: resolve(RelationKind::Inverse),
            mutual: resolve(RelationKind::Mutual),
        }
    }
}
