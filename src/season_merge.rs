//! Two-season merge.
//!
//! Counting totals from two consecutive seasons are outer-joined on the
//! cleaned player name and summed. A season a player did not appear in counts
//! as zero. Maxima and ratios are not additive, so they are dropped up front
//! and the catch rate is rebuilt from the summed counts.

use std::collections::HashMap;

use tracing::debug;

use crate::error::TableError;
use crate::rates::{CATCH_PERCENTAGE, ratio};
use crate::table::{Cell, StatTable};

/// Additive counting columns, in output order.
pub const MERGED_COUNT_COLUMNS: [&str; 10] = [
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
];

/// Derived, maximum or descriptive columns that must not be summed.
pub const NON_ADDITIVE_COLUMNS: [&str; 15] = [
    "No.",
    "Age",
    "Rush Lng",
    "Rush Y/A",
    "Rush Y/G",
    "Rush A/G",
    "Receiving Y/R",
    "Receiving Lng",
    "R/G",
    "Receiving Y/G",
    "Fmb",
    "Y/Tch",
    "YScm",
    "RRTD",
    "Ctch%",
];

/// How `Catch Percentage` is produced for a merged table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatchRateMode {
    /// Merged receptions over merged targets.
    #[default]
    Merged,
    /// Mean of each season's own receptions over targets, over the seasons
    /// with at least one target.
    SeasonMean,
}

impl CatchRateMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "merged" | "post_merge" => Some(CatchRateMode::Merged),
            "season_mean" | "pre_merge" => Some(CatchRateMode::SeasonMean),
            _ => None,
        }
    }
}

/// One summed output column and the two season-suffixed inputs it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPair {
    pub first: String,
    pub second: String,
    pub merged: &'static str,
}

pub fn column_pairs(first_season: &str, second_season: &str) -> Vec<ColumnPair> {
    MERGED_COUNT_COLUMNS
        .iter()
        .map(|&merged| ColumnPair {
            first: format!("{merged} {first_season}"),
            second: format!("{merged} {second_season}"),
            merged,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SeasonMerge<'a> {
    pub first_season: &'a str,
    pub second_season: &'a str,
    pub catch_rate: CatchRateMode,
}

impl<'a> SeasonMerge<'a> {
    pub fn new(first_season: &'a str, second_season: &'a str) -> Self {
        Self {
            first_season,
            second_season,
            catch_rate: CatchRateMode::default(),
        }
    }

    pub fn catch_rate(mut self, mode: CatchRateMode) -> Self {
        self.catch_rate = mode;
        self
    }

    /// Merges `first` and `second` (already renamed and name-cleaned). Row
    /// order is the first season's roster followed by players new in the
    /// second. The position comes from the most recent season listing it.
    pub fn merge(&self, first: &StatTable, second: &StatTable) -> Result<StatTable, TableError> {
        let a = first.drop_columns_if_present(&NON_ADDITIVE_COLUMNS);
        let b = second.drop_columns_if_present(&NON_ADDITIVE_COLUMNS);
        let pairs = column_pairs(self.first_season, self.second_season);
        let joined = outer_join(&a, &b, self.first_season, self.second_season)?;

        let mut columns: Vec<String> = MERGED_COUNT_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.push(CATCH_PERCENTAGE.to_string());
        let mut out = StatTable::new(columns);

        for row in &joined {
            let mut cells = Vec::with_capacity(pairs.len() + 1);
            for pair in &pairs {
                cells.push(Cell::Num(row.first(&pair.first) + row.second(&pair.second)));
            }
            cells.push(Cell::from_opt(self.catch_percentage(row, &pairs)));
            out.push_row(row.player.clone(), row.pos.clone(), cells)?;
        }

        debug!(
            first = first.len(),
            second = second.len(),
            merged = out.len(),
            "merged seasons {} and {}",
            self.first_season,
            self.second_season
        );
        Ok(out)
    }

    fn catch_percentage(&self, row: &JoinedRow, pairs: &[ColumnPair]) -> Option<f64> {
        let pair = |name: &str| pairs.iter().find(|p| p.merged == name);
        let (rec, tgt) = (pair("Rec")?, pair("Tgt")?);
        match self.catch_rate {
            CatchRateMode::Merged => ratio(
                Some(row.first(&rec.first) + row.second(&rec.second)),
                Some(row.first(&tgt.first) + row.second(&tgt.second)),
            ),
            CatchRateMode::SeasonMean => {
                let seasons: Vec<f64> = [
                    ratio(Some(row.first(&rec.first)), Some(row.first(&tgt.first))),
                    ratio(Some(row.second(&rec.second)), Some(row.second(&tgt.second))),
                ]
                .into_iter()
                .flatten()
                .collect();
                if seasons.is_empty() {
                    None
                } else {
                    Some(seasons.iter().sum::<f64>() / seasons.len() as f64)
                }
            }
        }
    }
}

/// A player's counting totals per side of the join, keyed by
/// season-suffixed column name ("Rush Att 2017"). A season the player is
/// absent from has no keys. Sides are kept apart so equal season labels
/// cannot overwrite each other.
#[derive(Debug)]
struct JoinedRow {
    player: String,
    pos: Option<String>,
    values: [HashMap<String, f64>; 2],
}

impl JoinedRow {
    fn first(&self, column: &str) -> f64 {
        self.values[0].get(column).copied().unwrap_or(0.0)
    }

    fn second(&self, column: &str) -> f64 {
        self.values[1].get(column).copied().unwrap_or(0.0)
    }

    fn absorb(&mut self, side: usize, table: &StatTable, counts: &[Vec<f64>], row: usize, season: &str) {
        for (col, values) in MERGED_COUNT_COLUMNS.iter().zip(counts) {
            self.values[side].insert(format!("{col} {season}"), values[row]);
        }
        if let Some(pos) = &table.rows()[row].pos {
            self.pos = Some(pos.clone());
        }
    }
}

fn outer_join(
    a: &StatTable,
    b: &StatTable,
    first_season: &str,
    second_season: &str,
) -> Result<Vec<JoinedRow>, TableError> {
    let counts_a = season_counts(a)?;
    let counts_b = season_counts(b)?;

    let mut order: Vec<JoinedRow> = Vec::with_capacity(a.len() + b.len());
    let mut by_player: HashMap<String, usize> = HashMap::with_capacity(a.len() + b.len());

    for (side, (table, counts, season)) in [(a, &counts_a, first_season), (b, &counts_b, second_season)]
        .into_iter()
        .enumerate()
    {
        for (i, row) in table.rows().iter().enumerate() {
            let idx = *by_player.entry(row.player.clone()).or_insert_with(|| {
                order.push(JoinedRow {
                    player: row.player.clone(),
                    pos: None,
                    values: [HashMap::new(), HashMap::new()],
                });
                order.len() - 1
            });
            let joined = &mut order[idx];
            // A repeated name within one season keeps its first row.
            if !joined.values[side].is_empty() {
                continue;
            }
            joined.absorb(side, table, counts, i, season);
        }
    }
    Ok(order)
}

/// Column-major counting totals; blank cells read as zero.
fn season_counts(table: &StatTable) -> Result<Vec<Vec<f64>>, TableError> {
    MERGED_COUNT_COLUMNS
        .iter()
        .map(|col| table.count_column(col))
        .collect()
}

/// Merges with the default catch-rate mode.
pub fn merge_seasons(
    first: &StatTable,
    second: &StatTable,
    first_season: &str,
    second_season: &str,
) -> Result<StatTable, TableError> {
    SeasonMerge::new(first_season, second_season).merge(first, second)
}
