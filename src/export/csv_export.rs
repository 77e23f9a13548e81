use std::fs::File;
use std::io::BufWriter;

use csv::{Writer, WriterBuilder};

use crate::error::ExportError;
use crate::matching::COMPARE_FIELDS;
use crate::matching::composer::MatchRow;
use crate::models::{AgreementTract, NormalizedTract};

pub fn export_to_csv(rows: &[MatchRow], path: &str) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let buf_writer = BufWriter::with_capacity(512 * 1024, file);
    let mut w = WriterBuilder::new().from_writer(buf_writer);
    write_headers(&mut w)?;
    for row in rows {
        write_row(&mut w, row)?;
    }
    w.flush()?;
    Ok(())
}

// Score first, identity keys from both sides, the compared FirstParty
// material, per-field similarities, then every remaining column suffixed
// by side.
fn write_headers<W: std::io::Write>(w: &mut Writer<W>) -> Result<(), ExportError> {
    let mut headers: Vec<String> = vec!["overall_similarity".into()];
    for side in ["client", "production"] {
        for key in [
            "AgreementID",
            "AgreementTractID",
            "AgreementNumber",
            "AgreementTractNumber",
        ] {
            headers.push(format!("{}_{}", key, side));
        }
    }
    headers.push("FirstParty_client".into());
    headers.push("FirstParty_production".into());
    headers.push("FirstParty_clean_client".into());
    headers.push("FirstParty_clean_production".into());
    for field in COMPARE_FIELDS {
        headers.push(format!("{}_sim", field));
    }
    for side in ["client", "production"] {
        for col in [
            "StateAbbr",
            "County",
            "SEC",
            "TWP",
            "TWPDIR",
            "RNG",
            "RNGDIR",
            "Quartering",
            "Lot",
            "Book",
            "Page",
            "Entry",
            "RecordingDate",
            "Book_clean",
            "Page_clean",
            "Entry_clean",
        ] {
            headers.push(format!("{}_{}", col, side));
        }
    }
    w.write_record(&headers)?;
    Ok(())
}

fn write_row<W: std::io::Write>(w: &mut Writer<W>, row: &MatchRow) -> Result<(), ExportError> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let sim = |s: f64| format!("{:.6}", s);

    let mut record: Vec<String> = Vec::with_capacity(49);
    record.push(row.overall.map(sim).unwrap_or_default());

    identity_fields(&mut record, Some(&row.client));
    identity_fields(&mut record, row.production.as_ref());

    record.push(opt(&row.client.first_party));
    record.push(
        row.production
            .as_ref()
            .map(|p| opt(&p.first_party))
            .unwrap_or_default(),
    );
    record.push(row.client_norm.first_party.clone());
    record.push(
        row.production_norm
            .as_ref()
            .map(|n| n.first_party.clone())
            .unwrap_or_default(),
    );

    match row.scores {
        Some(scores) => record.extend(scores.as_array().map(sim)),
        None => record.extend(std::iter::repeat_n(String::new(), COMPARE_FIELDS.len())),
    }

    trailing_fields(&mut record, Some(&row.client), Some(&row.client_norm));
    trailing_fields(
        &mut record,
        row.production.as_ref(),
        row.production_norm.as_ref(),
    );

    w.write_record(&record)?;
    Ok(())
}

fn identity_fields(record: &mut Vec<String>, t: Option<&AgreementTract>) {
    match t {
        Some(t) => {
            record.push(t.agreement_id.to_string());
            record.push(t.agreement_tract_id.to_string());
            record.push(t.agreement_number.clone().unwrap_or_default());
            record.push(t.agreement_tract_number.clone().unwrap_or_default());
        }
        None => record.extend(std::iter::repeat_n(String::new(), 4)),
    }
}

fn trailing_fields(
    record: &mut Vec<String>,
    t: Option<&AgreementTract>,
    norm: Option<&NormalizedTract>,
) {
    match (t, norm) {
        (Some(t), Some(n)) => {
            let opt = |v: &Option<String>| v.clone().unwrap_or_default();
            record.push(opt(&t.state_abbr));
            record.push(opt(&t.county));
            record.push(opt(&t.sec));
            record.push(opt(&t.twp));
            record.push(opt(&t.twp_dir));
            record.push(opt(&t.rng));
            record.push(opt(&t.rng_dir));
            record.push(opt(&t.quartering));
            record.push(opt(&t.lot));
            record.push(opt(&t.book));
            record.push(opt(&t.page));
            record.push(opt(&t.entry));
            record.push(t.recording_date.map(|d| d.to_string()).unwrap_or_default());
            record.push(n.book.clone());
            record.push(n.page.clone());
            record.push(n.entry.clone());
        }
        _ => record.extend(std::iter::repeat_n(String::new(), 16)),
    }
}

/// Echo the top ranked rows to the console, pandas-head style.
pub fn print_preview(rows: &[MatchRow], n: usize) {
    println!(
        "{:>10}  {:>12}  {:>12}  {:<28}  {:<28}",
        "score", "client_tract", "prod_tract", "first_party_client", "first_party_production"
    );
    for row in rows.iter().take(n) {
        println!(
            "{:>10}  {:>12}  {:>12}  {:<28}  {:<28}",
            row.overall
                .map(|s| format!("{:.4}", s))
                .unwrap_or_else(|| "-".into()),
            row.client.agreement_tract_id,
            row.production
                .as_ref()
                .map(|p| p.agreement_tract_id.to_string())
                .unwrap_or_else(|| "-".into()),
            row.client.first_party.as_deref().unwrap_or(""),
            row.production
                .as_ref()
                .and_then(|p| p.first_party.as_deref())
                .unwrap_or(""),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::composer::compose_rows;
    use crate::matching::{MatchOutcome, match_tracts};
    use crate::models::AgreementTract;

    fn keyed_tract(id: i64, first_party: &str) -> AgreementTract {
        let mut t = AgreementTract::blank(id, id);
        t.sec = Some("14".into());
        t.twp = Some("3".into());
        t.twp_dir = Some("S".into());
        t.rng = Some("5".into());
        t.rng_dir = Some("W".into());
        t.first_party = Some(first_party.into());
        t.book = Some("102".into());
        t.page = Some("44".into());
        t.entry = Some("990".into());
        t
    }

    fn temp_csv(name: &str) -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("tract_matcher_{}_{}.csv", std::process::id(), name));
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn header_and_rows_are_rectangular() {
        let lefts = vec![keyed_tract(1, "Smith Family Trust"), {
            let mut t = AgreementTract::blank(2, 2);
            t.first_party = Some("No Key".into());
            t
        }];
        let rights = vec![keyed_tract(10, "Smith Family Trust")];
        let MatchOutcome::Matched(best) = match_tracts(&lefts, &rights) else {
            panic!("expected matches");
        };
        let rows = compose_rows(&lefts, &rights, &best);

        let path = temp_csv("rect");
        export_to_csv(&rows, &path).expect("export");

        let mut rdr = csv::Reader::from_path(&path).expect("read back");
        let headers = rdr.headers().expect("headers").clone();
        assert_eq!(headers.get(0), Some("overall_similarity"));
        assert_eq!(headers.get(1), Some("AgreementID_client"));
        assert!(headers.iter().any(|h| h == "FirstParty_clean_sim"));
        assert!(headers.iter().any(|h| h == "RecordingDate_production"));
        let width = headers.len();
        let records: Vec<csv::StringRecord> =
            rdr.records().map(|r| r.expect("record")).collect();
        assert_eq!(records.len(), 2);
        for rec in &records {
            assert_eq!(rec.len(), width);
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn matched_row_leads_and_unmatched_row_is_blank_on_the_right() {
        let lefts = vec![
            {
                let mut t = AgreementTract::blank(1, 1);
                t.first_party = Some("No Key".into());
                t
            },
            keyed_tract(2, "Smith Family Trust"),
        ];
        let rights = vec![keyed_tract(10, "Smith Family Trust")];
        let MatchOutcome::Matched(best) = match_tracts(&lefts, &rights) else {
            panic!("expected matches");
        };
        let rows = compose_rows(&lefts, &rights, &best);

        let path = temp_csv("blank");
        export_to_csv(&rows, &path).expect("export");

        let mut rdr = csv::Reader::from_path(&path).expect("read back");
        let records: Vec<csv::StringRecord> =
            rdr.records().map(|r| r.expect("record")).collect();
        // Scored row first.
        assert_eq!(records[0].get(0), Some("1.000000"));
        assert_eq!(records[0].get(5), Some("10"));
        // Unmatched row: empty score and empty production identity keys.
        assert_eq!(records[1].get(0), Some(""));
        assert_eq!(records[1].get(5), Some(""));
        assert_eq!(records[1].get(1), Some("1"));
        std::fs::remove_file(&path).ok();
    }
}
