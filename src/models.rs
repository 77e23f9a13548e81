use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AgreementTract {
    pub agreement_id: i64,
    pub agreement_tract_id: i64,
    pub agreement_number: Option<String>,
    pub agreement_tract_number: Option<String>,
    pub first_party: Option<String>,
    pub state_abbr: Option<String>,
    pub county: Option<String>,
    pub sec: Option<String>,
    pub twp: Option<String>,
    pub twp_dir: Option<String>,
    pub rng: Option<String>,
    pub rng_dir: Option<String>,
    pub quartering: Option<String>,
    pub lot: Option<String>,
    pub book: Option<String>,
    pub page: Option<String>,
    pub entry: Option<String>,
    pub recording_date: Option<NaiveDate>,
}

/// Canonical text derived from a tract's compared fields. Missing source
/// values normalize to the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTract {
    pub first_party: String,
    pub book: String,
    pub page: String,
    pub entry: String,
}

#[cfg(test)]
impl AgreementTract {
    pub fn blank(agreement_id: i64, agreement_tract_id: i64) -> Self {
        Self {
            agreement_id,
            agreement_tract_id,
            agreement_number: None,
            agreement_tract_number: None,
            first_party: None,
            state_abbr: None,
            county: None,
            sec: None,
            twp: None,
            twp_dir: None,
            rng: None,
            rng_dir: None,
            quartering: None,
            lot: None,
            book: None,
            page: None,
            entry: None,
            recording_date: None,
        }
    }
}
