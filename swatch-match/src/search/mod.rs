//! Similarity search over a color corpus
//!
//! # Architecture
//!
//! A [`SimilaritySearch`] is one search session. It owns the result cache and
//! the run counter; everything else (reference, corpus, controls, weighting
//! tables) is passed in fully resolved on each call. No I/O happens here.
//!
//! ```text
//! reference ──► ResolutionChain ──► reference Lab ──┐
//!                                                   ├──► delta E scan ──► sort ──► cache
//! corpus ─────► ResolutionChain ──► candidate Labs ─┘                               │
//!                                                                                   ▼
//!                                                       threshold / max_results filter
//! ```
//!
//! # Early exit
//!
//! Scanning stops once `early_exit_factor × max_results` candidates within
//! the threshold have been collected. On corpora larger than that, which
//! candidates make it into the result depends on corpus order. Set
//! `exhaustive_scan` in [`SearchConfig`] to always scan everything.
//!
//! The early-exit bound is part of the cache key, so a cached result set is
//! only reused for the `max_results` it was scanned with. Exhaustive sessions
//! reuse one result set for any `max_results`.
//!
//! An outcome where every candidate is still waiting for standards is not
//! cached.
//!
//! # Staleness
//!
//! Every invocation is tagged with a [`RunId`]. Callers that start searches
//! while data is still loading compare the outcome's run against
//! [`SimilaritySearch::is_current`] and discard superseded results.

mod cache;
mod controls;

pub use cache::{CacheKey, ResultCache, ThresholdKey};
pub use controls::{SearchControls, DEFAULT_MAX_RESULTS, MIN_THRESHOLD};

use crate::delta_e::compute_delta_e;
use crate::resolve::{Resolution, ResolutionChain, ResolveContext};
use serde::{Deserialize, Serialize};
use swatch_common::config::SearchConfig;
use swatch_common::{CandidateColor, Corpus, Error, LabColor, Result, WeightingTables};
use tracing::{debug, info};
use uuid::Uuid;

/// One scored candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub candidate_id: Uuid,
    pub delta_e: f64,
    /// The candidate's Lab value that was compared, with its provenance
    pub lab_used: LabColor,
}

/// Identifier of one search invocation, increasing per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(u64);

impl RunId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Result of one search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub run: RunId,
    /// Every scored candidate, ascending by delta E
    pub all: Vec<SimilarityResult>,
    /// Candidates within the threshold, capped at `max_results`; falls back
    /// to the closest `max_results` when none are within the threshold
    pub filtered: Vec<SimilarityResult>,
    /// True when `all` was served from the session cache
    pub from_cache: bool,
    /// Candidates skipped because they need standards that are not loaded
    pub awaiting_standards: usize,
}

/// A search session: result cache plus run counter
#[derive(Debug)]
pub struct SimilaritySearch {
    chain: ResolutionChain,
    cache: ResultCache,
    latest_run: u64,
    early_exit_factor: usize,
    exhaustive_scan: bool,
}

impl Default for SimilaritySearch {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl SimilaritySearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session using the configured scan policy
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            chain: ResolutionChain::default(),
            cache: ResultCache::new(),
            latest_run: 0,
            early_exit_factor: config.early_exit_factor.max(1),
            exhaustive_scan: config.exhaustive_scan,
        }
    }

    /// Replace the Lab resolution order
    pub fn with_chain(mut self, chain: ResolutionChain) -> Self {
        self.chain = chain;
        self
    }

    /// Start a new run; every earlier run becomes stale
    pub fn begin_run(&mut self) -> RunId {
        self.latest_run += 1;
        RunId(self.latest_run)
    }

    /// True if no newer run has been started since `run`
    pub fn is_current(&self, run: RunId) -> bool {
        run.0 == self.latest_run
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Begin a run and search within it
    pub fn find_similar(
        &mut self,
        reference: &CandidateColor,
        corpus: &Corpus,
        controls: &SearchControls,
        standards: Option<&WeightingTables>,
    ) -> Result<SearchOutcome> {
        let run = self.begin_run();
        self.find_similar_in_run(run, reference, corpus, controls, standards)
    }

    /// Search within a run obtained from [`begin_run`](Self::begin_run)
    ///
    /// # Errors
    ///
    /// - [`Error::NotReady`] if the reference only has spectral data and the
    ///   standards are not loaded yet
    /// - [`Error::ReferenceUnavailable`] if the reference has no usable color
    ///   data at all
    pub fn find_similar_in_run(
        &mut self,
        run: RunId,
        reference: &CandidateColor,
        corpus: &Corpus,
        controls: &SearchControls,
        standards: Option<&WeightingTables>,
    ) -> Result<SearchOutcome> {
        let weighting = controls.weighting_key();
        let ctx = ResolveContext {
            mode: controls.mode,
            weighting: &weighting,
            standards,
        };

        let reference_lab = match self.chain.resolve(reference, &ctx) {
            Resolution::Resolved(lab) => lab,
            Resolution::AwaitingStandards => {
                return Err(Error::NotReady(format!(
                    "reference {} needs weighting table {} which is not loaded yet",
                    reference.id, weighting
                )));
            }
            Resolution::Unavailable => return Err(Error::ReferenceUnavailable(reference.id)),
        };

        let mut candidates = Vec::with_capacity(corpus.len());
        let mut awaiting_standards = 0;
        for color in corpus.colors.iter().filter(|c| c.id != reference.id) {
            match self.chain.resolve(color, &ctx) {
                Resolution::Resolved(lab) => candidates.push((color.id, lab)),
                Resolution::AwaitingStandards => awaiting_standards += 1,
                Resolution::Unavailable => {}
            }
        }
        if awaiting_standards > 0 {
            info!(
                %run,
                awaiting_standards,
                "Excluding spectral-only candidates until standards are loaded"
            );
        }

        let threshold = controls.effective_threshold();
        let max_results = controls.effective_max_results();
        let exit_at = (!self.exhaustive_scan).then(|| self.early_exit_factor.saturating_mul(max_results));
        let key = CacheKey {
            reference_id: reference.id,
            method: controls.method,
            threshold: ThresholdKey::from_threshold(threshold),
            mode: controls.mode,
            illuminant: controls.illuminant.clone(),
            observer: controls.observer.clone(),
            table: controls.table,
            corpus_size: corpus.len(),
            resolvable_candidates: candidates.len(),
            corpus_enriched: corpus.enriched,
            standards_loaded: standards.is_some(),
            exit_at,
        };

        if let Some(cached) = self.cache.get(&key) {
            debug!(%run, results = cached.len(), "Similarity cache hit");
            let all = cached.to_vec();
            let filtered = filter_results(&all, threshold, max_results);
            return Ok(SearchOutcome {
                run,
                all,
                filtered,
                from_cache: true,
                awaiting_standards,
            });
        }

        // Nothing scannable yet; the next call with standards loaded must rescan
        let cacheable = !(candidates.is_empty() && awaiting_standards > 0);

        let mut all = Vec::with_capacity(candidates.len());
        let mut within_threshold = 0;
        for (candidate_id, lab) in candidates {
            let delta_e = compute_delta_e(&reference_lab, &lab, controls.method)?;
            if delta_e <= threshold {
                within_threshold += 1;
            }
            all.push(SimilarityResult {
                candidate_id,
                delta_e,
                lab_used: lab,
            });
            if exit_at.is_some_and(|n| within_threshold >= n) {
                debug!(%run, scanned = all.len(), "Early exit after {} matches", within_threshold);
                break;
            }
        }

        all.sort_by(|a, b| a.delta_e.total_cmp(&b.delta_e));
        if cacheable {
            self.cache.insert(key, all.clone());
        }

        let filtered = filter_results(&all, threshold, max_results);
        debug!(
            %run,
            method = %controls.method,
            scanned = all.len(),
            matches = filtered.len(),
            "Similarity search complete"
        );

        Ok(SearchOutcome {
            run,
            all,
            filtered,
            from_cache: false,
            awaiting_standards,
        })
    }
}

/// Apply threshold and cap to a sorted result set
///
/// Falls back to the closest `max_results` entries when nothing is within
/// the threshold, so a non-empty corpus never filters down to nothing.
pub fn filter_results(all: &[SimilarityResult], threshold: f64, max_results: usize) -> Vec<SimilarityResult> {
    let within: Vec<SimilarityResult> = all
        .iter()
        .filter(|r| r.delta_e <= threshold)
        .take(max_results)
        .cloned()
        .collect();

    if within.is_empty() {
        all.iter().take(max_results).cloned().collect()
    } else {
        within
    }
}

/// One-shot search over a fresh session
pub fn find_similar_colors(
    reference: &CandidateColor,
    corpus: &Corpus,
    controls: &SearchControls,
    standards: Option<&WeightingTables>,
) -> Result<SearchOutcome> {
    SimilaritySearch::new().find_similar(reference, corpus, controls, standards)
}
