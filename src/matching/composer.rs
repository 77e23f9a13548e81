//! Merges selected matches back onto the full client record set.

use std::cmp::Ordering;

use crate::matching::{BestMatch, FieldScores};
use crate::models::{AgreementTract, NormalizedTract};
use crate::normalize::normalize_tract;

/// One output row: a client record plus its selected production match,
/// if any. Unmatched client rows keep all production-side material unset.
#[derive(Debug, Clone)]
pub struct MatchRow {
    pub overall: Option<f64>,
    pub client: AgreementTract,
    pub client_norm: NormalizedTract,
    pub production: Option<AgreementTract>,
    pub production_norm: Option<NormalizedTract>,
    pub scores: Option<FieldScores>,
}

/// Build one row per client record and rank by overall score descending.
/// Unmatched rows sort after every scored row; equal scores keep client
/// input order (stable sort).
pub fn compose_rows(
    lefts: &[AgreementTract],
    rights: &[AgreementTract],
    best: &[Option<BestMatch>],
) -> Vec<MatchRow> {
    let mut rows: Vec<MatchRow> = lefts
        .iter()
        .zip(best)
        .map(|(l, b)| match b {
            Some(bm) => {
                let r = &rights[bm.right];
                MatchRow {
                    overall: Some(bm.overall),
                    client: l.clone(),
                    client_norm: normalize_tract(l),
                    production: Some(r.clone()),
                    production_norm: Some(normalize_tract(r)),
                    scores: Some(bm.scores),
                }
            }
            None => MatchRow {
                overall: None,
                client: l.clone(),
                client_norm: normalize_tract(l),
                production: None,
                production_norm: None,
                scores: None,
            },
        })
        .collect();

    rows.sort_by(|a, b| match (a.overall, b.overall) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows
}
