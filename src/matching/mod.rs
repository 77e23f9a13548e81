use std::collections::HashMap;

use log::info;
use strsim::jaro_winkler;

use crate::models::{AgreementTract, NormalizedTract};
use crate::normalize::normalize_tract;

pub mod composer;

/// Normalized fields compared per candidate pair, in output column order.
pub const COMPARE_FIELDS: [&str; 4] = ["FirstParty_clean", "Book_clean", "Page_clean", "Entry_clean"];

/// Blocking key fields: a candidate pair must agree exactly on all five.
pub const BLOCK_FIELDS: [&str; 5] = ["SEC", "TWP", "TWPDIR", "RNG", "RNGDIR"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePair {
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScores {
    pub first_party: f64,
    pub book: f64,
    pub page: f64,
    pub entry: f64,
}

impl FieldScores {
    /// Scores in `COMPARE_FIELDS` order.
    pub fn as_array(&self) -> [f64; 4] {
        [self.first_party, self.book, self.page, self.entry]
    }

    pub fn mean(&self) -> f64 {
        let arr = self.as_array();
        arr.iter().sum::<f64>() / arr.len() as f64
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredPair {
    pub left: usize,
    pub right: usize,
    pub scores: FieldScores,
    pub overall: f64,
}

/// The selected production-side match for one client record.
#[derive(Debug, Clone, Copy)]
pub struct BestMatch {
    pub right: usize,
    pub scores: FieldScores,
    pub overall: f64,
}

#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// Blocking produced zero candidate pairs.
    NoCandidates,
    /// Candidates existed but none scored above zero.
    NoPositiveScores,
    /// One slot per left record, in input order.
    Matched(Vec<Option<BestMatch>>),
}

/// Blocking key over the raw legal-description tuple. A record missing any
/// key field never enters a block: null keys do not match null keys.
pub fn block_key(t: &AgreementTract) -> Option<String> {
    let sec = t.sec.as_deref()?;
    let twp = t.twp.as_deref()?;
    let twp_dir = t.twp_dir.as_deref()?;
    let rng = t.rng.as_deref()?;
    let rng_dir = t.rng_dir.as_deref()?;
    Some(format!("{}|{}|{}|{}|{}", sec, twp, twp_dir, rng, rng_dir))
}

/// Multimap from blocking key to right-side indices, built once and probed
/// once per left record (O(n+m), never the full cross product).
pub fn build_block_index(rights: &[AgreementTract]) -> HashMap<String, Vec<usize>> {
    let mut index: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, t) in rights.iter().enumerate() {
        if let Some(key) = block_key(t) {
            index.entry(key).or_default().push(idx);
        }
    }
    index
}

pub fn candidate_pairs(
    lefts: &[AgreementTract],
    index: &HashMap<String, Vec<usize>>,
) -> Vec<CandidatePair> {
    let mut pairs = Vec::new();
    for (li, l) in lefts.iter().enumerate() {
        let Some(key) = block_key(l) else { continue };
        if let Some(rights) = index.get(&key) {
            pairs.extend(rights.iter().map(|&ri| CandidatePair { left: li, right: ri }));
        }
    }
    pairs
}

/// Jaro-Winkler similarity per compared field, each in [0, 1].
pub fn score_fields(a: &NormalizedTract, b: &NormalizedTract) -> FieldScores {
    FieldScores {
        first_party: jaro_winkler(&a.first_party, &b.first_party),
        book: jaro_winkler(&a.book, &b.book),
        page: jaro_winkler(&a.page, &b.page),
        entry: jaro_winkler(&a.entry, &b.entry),
    }
}

pub fn score_pairs(
    pairs: &[CandidatePair],
    left_norms: &[NormalizedTract],
    right_norms: &[NormalizedTract],
) -> Vec<ScoredPair> {
    pairs
        .iter()
        .map(|p| {
            let scores = score_fields(&left_norms[p.left], &right_norms[p.right]);
            ScoredPair {
                left: p.left,
                right: p.right,
                scores,
                overall: scores.mean(),
            }
        })
        .collect()
}

/// Keep, per left index, the single pair with maximal overall score among
/// pairs scoring strictly above zero. Ties go to the lowest right index so
/// reruns over identical inputs select identically.
pub fn select_best(scored: &[ScoredPair], left_count: usize) -> Vec<Option<BestMatch>> {
    let mut best: Vec<Option<BestMatch>> = vec![None; left_count];
    for sp in scored {
        if sp.overall <= 0.0 {
            continue;
        }
        let slot = &mut best[sp.left];
        let take = match slot {
            None => true,
            Some(cur) => {
                sp.overall > cur.overall || (sp.overall == cur.overall && sp.right < cur.right)
            }
        };
        if take {
            *slot = Some(BestMatch {
                right: sp.right,
                scores: sp.scores,
                overall: sp.overall,
            });
        }
    }
    best
}

/// Full pipeline: block, score, aggregate, select.
pub fn match_tracts(lefts: &[AgreementTract], rights: &[AgreementTract]) -> MatchOutcome {
    let index = build_block_index(rights);
    let pairs = candidate_pairs(lefts, &index);
    info!(
        "Blocking on {}: {} candidate pairs from {} x {} records",
        BLOCK_FIELDS.join("/"),
        pairs.len(),
        lefts.len(),
        rights.len()
    );
    if pairs.is_empty() {
        return MatchOutcome::NoCandidates;
    }

    let left_norms: Vec<NormalizedTract> = lefts.iter().map(normalize_tract).collect();
    let right_norms: Vec<NormalizedTract> = rights.iter().map(normalize_tract).collect();
    let scored = score_pairs(&pairs, &left_norms, &right_norms);
    let best = select_best(&scored, lefts.len());

    let matched = best.iter().filter(|b| b.is_some()).count();
    if matched == 0 {
        return MatchOutcome::NoPositiveScores;
    }
    info!("Selected best matches for {} of {} client records", matched, lefts.len());
    MatchOutcome::Matched(best)
}
