use sqlx::MySqlPool;

use crate::config::MatchConfig;
use crate::error::DbError;
use crate::models::AgreementTract;

// Shared select list. SEC/TWP/RNG are numeric in some deployments; casting
// to CHAR keeps blocking-key equality a plain string comparison on both
// sides. DATE() strips any time component from the recording timestamp.
const TRACT_SELECT_LIST: &str = "\
    a.AgreementID AS agreement_id, \
    t.AgreementTractID AS agreement_tract_id, \
    a.AgreementNumber AS agreement_number, \
    t.AgreementTractNumber AS agreement_tract_number, \
    a.FirstParty AS first_party, \
    t.StateAbbr AS state_abbr, \
    t.County AS county, \
    CAST(t.SEC AS CHAR) AS sec, \
    CAST(t.TWP AS CHAR) AS twp, \
    t.TWPDIR AS twp_dir, \
    CAST(t.RNG AS CHAR) AS rng, \
    t.RNGDIR AS rng_dir, \
    t.Quartering AS quartering, \
    t.Lot AS lot, \
    t.Book AS book, \
    t.Page AS page, \
    t.Entry AS entry, \
    DATE(t.RecordingDate) AS recording_date";

/// Client-supplied agreement list joined out to full tract records.
pub async fn fetch_client_tracts(pool: &MySqlPool) -> Result<Vec<AgreementTract>, DbError> {
    let sql = format!(
        "SELECT DISTINCT {TRACT_SELECT_LIST} \
         FROM tmp_client_list c \
         JOIN Agreement a ON a.AgreementNumber = c.AgreementNumber \
         JOIN AgreementTract t ON a.AgreementID = t.AgreementID"
    );
    sqlx::query_as::<_, AgreementTract>(&sql)
        .fetch_all(pool)
        .await
        .map_err(|e| DbError::Query(format!("client tract query failed: {}", e)))
}

/// Production tracts restricted to the configured state/county.
pub async fn fetch_production_tracts(
    pool: &MySqlPool,
    filter: &MatchConfig,
) -> Result<Vec<AgreementTract>, DbError> {
    let sql = format!(
        "SELECT DISTINCT {TRACT_SELECT_LIST} \
         FROM Agreement a \
         JOIN AgreementTract t ON a.AgreementID = t.AgreementID \
         WHERE t.StateAbbr = ? AND t.County = ?"
    );
    sqlx::query_as::<_, AgreementTract>(&sql)
        .bind(&filter.state_abbr)
        .bind(&filter.county)
        .fetch_all(pool)
        .await
        .map_err(|e| DbError::Query(format!("production tract query failed: {}", e)))
}
