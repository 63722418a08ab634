use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::TableError;
use crate::positions::{Position, canonical};
use crate::rates::{PROFILE_RATE_COLUMNS, RECEIVING_RATE_COLUMNS, RUSHING_RATE_COLUMNS};
use crate::table::{Cell, StatTable};

pub const PERCENTILE_SUFFIX: &str = " Percentile";

pub fn percentile_column(stat: &str) -> String {
    format!("{stat}{PERCENTILE_SUFFIX}")
}

/// Percent of `sorted` at or below `value`, in [0, 100]. `sorted` must be
/// ascending and non-empty.
pub fn percentile_of_score(sorted: &[f64], value: f64) -> f64 {
    let at_or_below = sorted.partition_point(|v| *v <= value);
    (at_or_below as f64) * 100.0 / (sorted.len() as f64)
}

/// Reference value lists per (position, stat). Built once from the reference
/// population; scoring never touches them.
#[derive(Debug, Clone, Default)]
pub struct Cohorts {
    values: HashMap<(Position, String), Vec<f64>>,
}

impl Cohorts {
    pub fn build(reference: &StatTable, stats: &[&str]) -> Result<Self, TableError> {
        let positions: Vec<Option<Position>> = reference
            .rows()
            .iter()
            .map(|r| canonical(r.pos.as_deref()))
            .collect();
        let skipped = positions.iter().filter(|p| p.is_none()).count();
        if skipped > 0 {
            warn!(skipped, "reference rows without a cohort position were left out");
        }

        let mut values: HashMap<(Position, String), Vec<f64>> = HashMap::new();
        for stat in stats {
            for (pos, v) in positions.iter().zip(reference.numeric_column(stat)?) {
                let (Some(pos), Some(v)) = (pos, v) else {
                    continue;
                };
                values.entry((*pos, stat.to_string())).or_default().push(v);
            }
        }
        for list in values.values_mut() {
            list.sort_by(f64::total_cmp);
        }
        debug!(cohorts = values.len(), "built percentile cohorts");
        Ok(Self { values })
    }

    pub fn cohort(&self, pos: Position, stat: &str) -> Option<&[f64]> {
        self.values
            .get(&(pos, stat.to_string()))
            .map(Vec::as_slice)
            .filter(|v| !v.is_empty())
    }

    pub fn percentile(&self, pos: Position, stat: &str, value: f64) -> Option<f64> {
        Some(percentile_of_score(self.cohort(pos, stat)?, value))
    }
}

/// Scores every `target` row against the `reference` cohort sharing its
/// position. Each stat column is replaced by `<stat> Percentile`, appended
/// after the remaining columns. A missing value, or a position with no
/// cohort, scores as missing.
pub fn rank_percentiles(
    reference: &StatTable,
    target: &StatTable,
    stats: &[&str],
) -> Result<StatTable, TableError> {
    let cohorts = Cohorts::build(reference, stats)?;
    score(&cohorts, target, stats)
}

pub fn score(cohorts: &Cohorts, target: &StatTable, stats: &[&str]) -> Result<StatTable, TableError> {
    let positions: Vec<Option<Position>> = target
        .rows()
        .iter()
        .map(|r| canonical(r.pos.as_deref()))
        .collect();

    let mut scored = Vec::with_capacity(stats.len());
    for stat in stats {
        let column: Vec<Cell> = positions
            .iter()
            .zip(target.numeric_column(stat)?)
            .map(|(pos, v)| {
                Cell::from_opt(pos.zip(v).and_then(|(p, v)| cohorts.percentile(p, stat, v)))
            })
            .collect();
        scored.push((percentile_column(stat), column));
    }

    let mut out = target.drop_columns(stats)?;
    for (name, column) in scored {
        out = out.with_column(&name, column)?;
    }
    debug!(rows = out.len(), stats = stats.len(), "scored percentiles");
    Ok(out)
}

pub fn rushing_percentiles(reference: &StatTable, target: &StatTable) -> Result<StatTable, TableError> {
    rank_percentiles(reference, target, &RUSHING_RATE_COLUMNS)
}

pub fn receiving_percentiles(reference: &StatTable, target: &StatTable) -> Result<StatTable, TableError> {
    rank_percentiles(reference, target, &RECEIVING_RATE_COLUMNS)
}

pub fn profile_percentiles(reference: &StatTable, target: &StatTable) -> Result<StatTable, TableError> {
    rank_percentiles(reference, target, &PROFILE_RATE_COLUMNS)
}
