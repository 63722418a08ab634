//! Counting totals to per-game and per-opportunity rates.
//!
//! A rate with a zero (or absent) denominator is `None`. It is never coerced
//! to zero or infinity, and the percentile ranker leaves it out of the cohort.

use tracing::debug;

use crate::error::TableError;
use crate::table::{Cell, StatTable};

pub const TOUCH_PER_GAME: &str = "Touch/G";
pub const RUSH_TD_PER_GAME: &str = "Rush TD/G";
pub const RUSH_ATT_PER_GAME: &str = "Rush Att/G";
pub const RUSH_YDS_PER_ATT: &str = "Rush Yds/Att";
pub const RUSH_YDS_PER_GAME: &str = "Rush Yds/G";
pub const TGT_PER_GAME: &str = "Tgt/G";
pub const REC_PER_GAME: &str = "Rec/G";
pub const REC_YDS_PER_REC: &str = "Receiving Yds/Rec";
pub const REC_YDS_PER_GAME: &str = "Receiving Yds/G";
pub const REC_TD_PER_GAME: &str = "Receiving TD/G";
pub const CATCH_PERCENTAGE: &str = "Catch Percentage";

pub const RUSHING_RATE_COLUMNS: [&str; 4] = [
    RUSH_ATT_PER_GAME,
    RUSH_TD_PER_GAME,
    RUSH_YDS_PER_ATT,
    RUSH_YDS_PER_GAME,
];

pub const RECEIVING_RATE_COLUMNS: [&str; 6] = [
    TGT_PER_GAME,
    CATCH_PERCENTAGE,
    REC_PER_GAME,
    REC_YDS_PER_REC,
    REC_YDS_PER_GAME,
    REC_TD_PER_GAME,
];

/// Everything `derive_rates` leaves on a merged two-season table.
pub const PROFILE_RATE_COLUMNS: [&str; 11] = [
    TOUCH_PER_GAME,
    RUSH_TD_PER_GAME,
    RUSH_ATT_PER_GAME,
    RUSH_YDS_PER_ATT,
    RUSH_YDS_PER_GAME,
    TGT_PER_GAME,
    REC_PER_GAME,
    REC_YDS_PER_REC,
    REC_YDS_PER_GAME,
    REC_TD_PER_GAME,
    CATCH_PERCENTAGE,
];

const MERGED_RAW_COLUMNS: [&str; 8] = [
    "Rush Att",
    "Rush Yds",
    "Rush TD",
    "Tgt",
    "Rec",
    "Receiving Yds",
    "Receiving TD",
    "Touch",
];

const RECEIVING_SOURCE_DROP: [&str; 12] = [
    "Rk", "Tm", "Tgt", "Rec", "Yds", "Y/R", "TD", "Lng", "R/G", "Y/G", "Fmb", "Ctch%",
];

const RUSHING_SOURCE_DROP: [&str; 10] = [
    "Rk", "Tm", "Age", "Att", "Yds", "TD", "Lng", "Y/A", "Y/G", "Fmb",
];

pub fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    let (num, den) = (num?, den?);
    if den == 0.0 {
        return None;
    }
    let v = num / den;
    v.is_finite().then_some(v)
}

fn ratio_column(num: &[f64], den: &[f64]) -> Vec<Cell> {
    num.iter()
        .zip(den)
        .map(|(n, d)| Cell::from_opt(ratio(Some(*n), Some(*d))))
        .collect()
}

/// A rate the source already printed, kept only where its denominator is
/// non-zero. Some exports print 0.0 instead of leaving the cell blank.
fn reported_rate(reported: &[Option<f64>], den: &[f64]) -> Vec<Cell> {
    reported
        .iter()
        .zip(den)
        .map(|(v, d)| Cell::from_opt(if *d == 0.0 { None } else { *v }))
        .collect()
}

/// Rate profile for a merged two-season table. Raw counting columns are
/// replaced by their rates; `G`, `GS` and any `Catch Percentage` stay.
pub fn derive_rates(table: &StatTable) -> Result<StatTable, TableError> {
    let games = table.count_column("G")?;
    let touch = table.count_column("Touch")?;
    let rush_att = table.count_column("Rush Att")?;
    let rush_yds = table.count_column("Rush Yds")?;
    let rush_td = table.count_column("Rush TD")?;
    let tgt = table.count_column("Tgt")?;
    let rec = table.count_column("Rec")?;
    let rec_yds = table.count_column("Receiving Yds")?;
    let rec_td = table.count_column("Receiving TD")?;

    let out = table
        .with_column(TOUCH_PER_GAME, ratio_column(&touch, &games))?
        .with_column(RUSH_TD_PER_GAME, ratio_column(&rush_td, &games))?
        .with_column(RUSH_ATT_PER_GAME, ratio_column(&rush_att, &games))?
        .with_column(RUSH_YDS_PER_ATT, ratio_column(&rush_yds, &rush_att))?
        .with_column(RUSH_YDS_PER_GAME, ratio_column(&rush_yds, &games))?
        .with_column(TGT_PER_GAME, ratio_column(&tgt, &games))?
        .with_column(REC_PER_GAME, ratio_column(&rec, &games))?
        .with_column(REC_YDS_PER_REC, ratio_column(&rec_yds, &rec))?
        .with_column(REC_YDS_PER_GAME, ratio_column(&rec_yds, &games))?
        .with_column(REC_TD_PER_GAME, ratio_column(&rec_td, &games))?
        .drop_columns(&MERGED_RAW_COLUMNS)?;
    debug!(rows = out.len(), "derived merged rate profile");
    Ok(out)
}

/// Rates for a single-season receiving page (raw `Yds`/`TD` headers). Yards
/// per reception and per game are taken from the page's own `Y/R` and `Y/G`.
pub fn normalize_receiving_source(table: &StatTable) -> Result<StatTable, TableError> {
    let games = table.count_column("G")?;
    let tgt = table.count_column("Tgt")?;
    let rec = table.count_column("Rec")?;
    let td = table.count_column("TD")?;
    let yds_per_rec = table.numeric_column("Y/R")?;
    let yds_per_game = table.numeric_column("Y/G")?;
    table.require_column("Yds")?;

    let out = table
        .with_column(TGT_PER_GAME, ratio_column(&tgt, &games))?
        .with_column(REC_PER_GAME, ratio_column(&rec, &games))?
        .with_column(REC_YDS_PER_REC, reported_rate(&yds_per_rec, &rec))?
        .with_column(REC_YDS_PER_GAME, reported_rate(&yds_per_game, &games))?
        .with_column(REC_TD_PER_GAME, ratio_column(&td, &games))?
        .with_column(CATCH_PERCENTAGE, ratio_column(&rec, &tgt))?
        .drop_columns_if_present(&RECEIVING_SOURCE_DROP);
    debug!(rows = out.len(), "derived receiving source rates");
    Ok(out)
}

/// Rates for a single-season rushing page (raw `Att`/`Yds`/`TD` headers).
pub fn normalize_rushing_source(table: &StatTable) -> Result<StatTable, TableError> {
    let games = table.count_column("G")?;
    let att = table.count_column("Att")?;
    let yds = table.count_column("Yds")?;
    let td = table.count_column("TD")?;

    let out = table
        .with_column(RUSH_ATT_PER_GAME, ratio_column(&att, &games))?
        .with_column(RUSH_TD_PER_GAME, ratio_column(&td, &games))?
        .with_column(RUSH_YDS_PER_ATT, ratio_column(&yds, &att))?
        .with_column(RUSH_YDS_PER_GAME, ratio_column(&yds, &games))?
        .drop_columns_if_present(&RUSHING_SOURCE_DROP);
    debug!(rows = out.len(), "derived rushing source rates");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_rejects_zero_denominator() {
        assert_eq!(ratio(Some(5.0), Some(0.0)), None);
        assert_eq!(ratio(Some(0.0), Some(0.0)), None);
        assert_eq!(ratio(None, Some(2.0)), None);
        assert_eq!(ratio(Some(3.0), Some(2.0)), Some(1.5));
    }

    fn merged_row(values: [f64; 11]) -> StatTable {
        let mut t = StatTable::with_columns(&[
            "G",
            "GS",
            "Rush Att",
            "Rush Yds",
            "Rush TD",
            "Tgt",
            "Rec",
            "Receiving Yds",
            "Receiving TD",
            "Touch",
            CATCH_PERCENTAGE,
        ]);
        t.push_numbers("Todd Gurley", Some("RB"), &values).unwrap();
        t
    }

    #[test]
    fn derive_rates_divides_by_games_and_opportunities() {
        let t = merged_row([
            28.0, 28.0, 535.0, 2108.0, 30.0, 168.0, 123.0, 1368.0, 10.0, 658.0, 123.0 / 168.0,
        ]);
        let out = derive_rates(&t).unwrap();
        let yds_g = out.value("Todd Gurley", RUSH_YDS_PER_GAME).unwrap();
        assert!((yds_g - 75.285_714_285_714_29).abs() < 1e-9);
        assert_eq!(out.value("Todd Gurley", RUSH_YDS_PER_ATT), Some(2108.0 / 535.0));
        assert_eq!(out.value("Todd Gurley", TOUCH_PER_GAME), Some(658.0 / 28.0));
        assert!(!out.has_column("Rush Att"));
        assert!(!out.has_column("Touch"));
        assert!(out.has_column("G"));
        for col in PROFILE_RATE_COLUMNS {
            assert!(out.has_column(col), "missing {col}");
        }
    }

    #[test]
    fn zero_attempts_leave_yards_per_attempt_missing() {
        let t = merged_row([16.0, 16.0, 0.0, 0.0, 0.0, 90.0, 60.0, 800.0, 5.0, 60.0, 60.0 / 90.0]);
        let out = derive_rates(&t).unwrap();
        assert_eq!(out.value("Todd Gurley", RUSH_YDS_PER_ATT), None);
        assert_eq!(out.value("Todd Gurley", RUSH_ATT_PER_GAME), Some(0.0));
    }

    #[test]
    fn derive_rates_requires_games() {
        let t = StatTable::with_columns(&["Touch"]);
        assert_eq!(
            derive_rates(&t).unwrap_err(),
            TableError::MissingColumn("G".to_string())
        );
    }

    #[test]
    fn receiving_source_uses_reported_rates() {
        let mut t = StatTable::with_columns(&[
            "Rk", "Tm", "G", "GS", "Tgt", "Rec", "Yds", "Y/R", "TD", "Y/G", "Ctch%",
        ]);
        t.push_numbers("Cooper Kupp", Some("WR"), &[1.0, 0.0, 15.0, 13.0, 94.0, 62.0, 869.0, 14.0, 5.0, 57.9, 66.0])
            .unwrap();
        t.push_numbers("Blocker", Some("TE"), &[2.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
            .unwrap();
        let out = normalize_receiving_source(&t).unwrap();
        assert_eq!(out.value("Cooper Kupp", REC_YDS_PER_REC), Some(14.0));
        assert_eq!(out.value("Cooper Kupp", CATCH_PERCENTAGE), Some(62.0 / 94.0));
        assert_eq!(out.value("Blocker", REC_YDS_PER_REC), None);
        assert_eq!(out.value("Blocker", CATCH_PERCENTAGE), None);
        assert_eq!(out.columns(), &["G", "GS", TGT_PER_GAME, REC_PER_GAME, REC_YDS_PER_REC, REC_YDS_PER_GAME, REC_TD_PER_GAME, CATCH_PERCENTAGE]);
    }

    #[test]
    fn rushing_source_rates() {
        let mut t = StatTable::with_columns(&["G", "GS", "Att", "Yds", "TD", "Lng", "Y/A", "Y/G"]);
        t.push_numbers("Matt Breida", Some("RB"), &[16.0, 0.0, 105.0, 465.0, 2.0, 33.0, 4.4, 29.1])
            .unwrap();
        let out = normalize_rushing_source(&t).unwrap();
        assert_eq!(out.value("Matt Breida", RUSH_YDS_PER_ATT), Some(465.0 / 105.0));
        assert_eq!(out.value("Matt Breida", RUSH_ATT_PER_GAME), Some(105.0 / 16.0));
        assert_eq!(out.columns(), &["G", "GS", RUSH_ATT_PER_GAME, RUSH_TD_PER_GAME, RUSH_YDS_PER_ATT, RUSH_YDS_PER_GAME]);
    }
}
