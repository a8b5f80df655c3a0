//! The hexagram lookup engine.
//!
//! An engine starts uninitialized. [`HexagramEngine::initialize`] loads the
//! dataset, runs the derivation pass once and moves the engine to
//! [`EngineStatus::Ready`]. Queries never fail: before readiness they return
//! `None` or an empty result.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, error, info};
use yijing_dataset::Dataset;

use crate::code::HexagramCode;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::index::{Hexagram, Index, Trigram};
use crate::relation::RelationKind;
use crate::report::LoadReport;
use crate::source::SourceKind;

/// Lifecycle state reported by [`HexagramEngine::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// [`HexagramEngine::initialize`] has not succeeded yet.
    Uninitialized,
    /// The index is built and queries are answered.
    Ready,
    /// The last initialization attempt failed. Initialization may be retried.
    Failed,
}

type ReadyListener = Box<dyn FnOnce(&LoadReport)>;

enum State {
    Uninitialized,
    Failed,
    Ready(Index),
}

/// One hexagram reached through a structural relation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelatedHexagram<'a> {
    /// The relation that leads here.
    pub kind: RelationKind,
    /// The related hexagram.
    pub hexagram: &'a Hexagram,
    /// True when the hexagram is an alias from the fallback policy rather
    /// than a genuine relation.
    pub fallback: bool,
}

/// The relations of one hexagram, keyed by kind. Unresolved relations are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Related<'a> {
    /// The hexagram the relations were derived from.
    pub source: &'a Hexagram,
    entries: BTreeMap<RelationKind, RelatedHexagram<'a>>,
}

impl<'a> Related<'a> {
    /// Returns the hexagram related by `kind`.
    #[must_use]
    pub fn get(&self, kind: RelationKind) -> Option<&RelatedHexagram<'a>> {
        self.entries.get(&kind)
    }

    /// Iterates in [`RelationKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &RelatedHexagram<'a>> {
        self.entries.values()
    }

    /// Number of relations present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no relation could be resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hexagram lookup engine.
///
/// ```
/// use yijing_engine::{EngineConfig, HexagramEngine, RelationKind};
///
/// let mut engine = HexagramEngine::new(EngineConfig::default());
/// assert!(engine.by_id(1).is_none());
///
/// engine.initialize()?;
/// let pi = engine.by_trigrams("乾", "坤").map(|h| h.name());
/// assert_eq!(pi, Some("否"));
///
/// let opposite = engine
///     .related(1)
///     .and_then(|related| related.get(RelationKind::Opposite).map(|r| r.hexagram.id));
/// assert_eq!(opposite, Some(2));
/// # Ok::<(), yijing_engine::EngineError>(())
/// ```
pub struct HexagramEngine {
    config: EngineConfig,
    state: State,
    listeners: Vec<ReadyListener>,
}

impl fmt::Debug for HexagramEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HexagramEngine")
            .field("config", &self.config)
            .field("status", &self.status())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for HexagramEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl HexagramEngine {
    /// Creates an uninitialized engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: State::Uninitialized,
            listeners: Vec::new(),
        }
    }

    /// The settings this engine was created with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        match self.state {
            State::Uninitialized => EngineStatus::Uninitialized,
            State::Failed => EngineStatus::Failed,
            State::Ready(_) => EngineStatus::Ready,
        }
    }

    /// True once initialization has succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Registers a callback for the ready signal. It runs once, when
    /// initialization succeeds, or right away if the engine is already ready.
    pub fn on_ready<F>(&mut self, listener: F)
    where
        F: FnOnce(&LoadReport) + 'static,
    {
        match &self.state {
            State::Ready(index) => listener(&index.report),
            State::Uninitialized | State::Failed => self.listeners.push(Box::new(listener)),
        }
    }

    /// Loads the configured dataset and builds the index.
    ///
    /// Calling this on a ready engine does nothing and returns the existing
    /// report.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DatasetUnavailable`] if no dataset could be
    /// loaded, or [`EngineError::NothingIndexed`] if it held no usable
    /// hexagram. The engine is then [`EngineStatus::Failed`].
    pub fn initialize(&mut self) -> Result<&LoadReport, EngineError> {
        if !self.is_ready() {
            match self.config.source().load() {
                Ok((dataset, kind)) => self.install(dataset, kind)?,
                Err(e) => return Err(self.fail(e)),
            }
        }
        self.ready_report()
    }

    /// Builds the index from a dataset the caller already holds.
    ///
    /// Calling this on a ready engine does nothing; `dataset` is dropped and
    /// the existing report is returned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NothingIndexed`] if `dataset` held no usable
    /// hexagram.
    pub fn initialize_with(&mut self, dataset: Dataset) -> Result<&LoadReport, EngineError> {
        if self.is_ready() {
            debug!("engine already ready, ignoring provided dataset");
        } else {
            self.install(dataset, SourceKind::Provided)?;
        }
        self.ready_report()
    }

    fn install(&mut self, dataset: Dataset, kind: SourceKind) -> Result<(), EngineError> {
        let index = match Index::build(dataset, self.config.relation_fallback, kind) {
            Ok(index) => index,
            Err(e) => return Err(self.fail(e)),
        };
        info!(
            source = %index.report.source,
            hexagrams = index.report.hexagram_count,
            warnings = index.report.warning_count(),
            "hexagram engine ready"
        );
        self.state = State::Ready(index);

        let listeners = std::mem::take(&mut self.listeners);
        if let State::Ready(index) = &self.state {
            for listener in listeners {
                listener(&index.report);
            }
        }
        Ok(())
    }

    fn fail(&mut self, e: EngineError) -> EngineError {
        error!(error = %e, "hexagram engine initialization failed");
        self.state = State::Failed;
        e
    }

    fn ready_report(&self) -> Result<&LoadReport, EngineError> {
        self.index()
            .map(|index| &index.report)
            .ok_or(EngineError::NotReady)
    }

    fn index(&self) -> Option<&Index> {
        match &self.state {
            State::Ready(index) => Some(index),
            State::Uninitialized | State::Failed => None,
        }
    }

    /// The report of the successful initialization.
    #[must_use]
    pub fn report(&self) -> Option<&LoadReport> {
        self.index().map(|index| &index.report)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Hexagram with the exact 6-character bit string `binary`.
    #[must_use]
    pub fn by_binary(&self, binary: &str) -> Option<&Hexagram> {
        let code = HexagramCode::parse(binary).ok()?;
        self.by_code(code)
    }

    /// Hexagram with `code`. On duplicate codes the lowest id is returned.
    #[must_use]
    pub fn by_code(&self, code: HexagramCode) -> Option<&Hexagram> {
        self.index()?.hexagram_by_code(code)
    }

    /// Hexagram with King Wen number `id`.
    #[must_use]
    pub fn by_id(&self, id: u8) -> Option<&Hexagram> {
        self.index()?.hexagram_by_id(id)
    }

    /// Hexagram formed by stacking the trigram named `upper` over `lower`.
    ///
    /// The match is on the derived trigram names, so a trigram whose code is
    /// shadowed by an earlier one never matches.
    #[must_use]
    pub fn by_trigrams(&self, upper: &str, lower: &str) -> Option<&Hexagram> {
        let index = self.index()?;
        let upper_code = index.trigram(upper)?.code?;
        let lower_code = index.trigram(lower)?.code?;
        index
            .hexagram_by_code(HexagramCode::from_trigrams(upper_code, lower_code))
            .filter(|h| {
                h.upper_trigram.as_deref() == Some(upper)
                    && h.lower_trigram.as_deref() == Some(lower)
            })
    }

    /// Opposite, inverse and mutual hexagrams of `id`.
    ///
    /// Returns `None` for an unknown id. A hexagram whose code was malformed
    /// yields an empty [`Related`].
    #[must_use]
    pub fn related(&self, id: u8) -> Option<Related<'_>> {
        let index = self.index()?;
        let source = index.hexagram_by_id(id)?;
        let entries = source
            .relations
            .iter()
            .flat_map(|relations| relations.iter())
            .filter_map(|(kind, target)| {
                let hexagram = index.hexagram_by_id(target.id()?)?;
                Some((
                    kind,
                    RelatedHexagram {
                        kind,
                        hexagram,
                        fallback: target.is_fallback(),
                    },
                ))
            })
            .collect();
        Some(Related { source, entries })
    }

    /// Hexagrams whose name or any text field contains `keyword`, ignoring
    /// case, in dataset order. String values of unrecognised fields count as
    /// text.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<&Hexagram> {
        let Some(index) = self.index() else {
            return Vec::new();
        };
        let needle = keyword.to_lowercase();
        index
            .hexagrams
            .iter()
            .filter(|h| h.mentions(&needle))
            .collect()
    }

    /// All trigrams in dataset order.
    #[must_use]
    pub fn trigrams(&self) -> &[Trigram] {
        match self.index() {
            Some(index) => &index.trigrams,
            None => &[],
        }
    }

    /// Trigram named `name`.
    #[must_use]
    pub fn trigram(&self, name: &str) -> Option<&Trigram> {
        self.index()?.trigram(name)
    }

    /// All hexagrams in dataset order.
    #[must_use]
    pub fn hexagrams(&self) -> &[Hexagram] {
        match self.index() {
            Some(index) => &index.hexagrams,
            None => &[],
        }
    }
}
