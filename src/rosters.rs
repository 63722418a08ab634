use std::collections::HashMap;

use tracing::debug;

use crate::error::TableError;
use crate::table::{Cell, StatTable};

/// Left-joins `stats` onto `roster` by player name. The roster's own `G`/`GS`
/// give way to the stat table's, and the roster's position wins. Rostered
/// players with no stat line get missing cells.
pub fn merge_in_stats(stats: &StatTable, roster: &StatTable) -> Result<StatTable, TableError> {
    let roster = roster.drop_columns(&["G", "GS"])?;

    let stat_cols: Vec<usize> = (0..stats.columns().len())
        .filter(|&i| !roster.has_column(&stats.columns()[i]))
        .collect();
    let mut columns: Vec<String> = roster.columns().to_vec();
    columns.extend(stat_cols.iter().map(|&i| stats.columns()[i].clone()));

    let mut by_player: HashMap<&str, usize> = HashMap::with_capacity(stats.len());
    for (i, row) in stats.rows().iter().enumerate() {
        by_player.entry(row.player.as_str()).or_insert(i);
    }

    let mut out = StatTable::new(columns);
    let mut unmatched = 0usize;
    for row in roster.rows() {
        let mut cells = row.cells().to_vec();
        match by_player.get(row.player.as_str()) {
            Some(&idx) => {
                let stat_row = &stats.rows()[idx];
                cells.extend(stat_cols.iter().map(|&i| stat_row.cells()[i].clone()));
            }
            None => {
                unmatched += 1;
                cells.extend(std::iter::repeat_n(Cell::Missing, stat_cols.len()));
            }
        }
        out.push_row(row.player.clone(), row.pos.clone(), cells)?;
    }
    debug!(rows = out.len(), unmatched, "merged stats into roster");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_replace_roster_games() {
        let mut roster = StatTable::with_columns(&["Age", "G", "GS"]);
        roster.push_numbers("Robert Woods", Some("WR"), &[26.0, 1.0, 1.0]).unwrap();
        roster.push_numbers("Practice Squad", Some("WR"), &[23.0, 0.0, 0.0]).unwrap();
        let mut stats = StatTable::with_columns(&["Age", "G", "GS", "Tgt"]);
        stats.push_numbers("Robert Woods", Some("WR/PR"), &[26.0, 16.0, 16.0, 130.0]).unwrap();

        let out = merge_in_stats(&stats, &roster).unwrap();
        assert_eq!(out.columns(), &["Age", "G", "GS", "Tgt"]);
        assert_eq!(out.value("Robert Woods", "G"), Some(16.0));
        assert_eq!(out.find_player("Robert Woods").unwrap().pos.as_deref(), Some("WR"));
        assert!(out.get(1, "Tgt").unwrap().is_missing());
    }
}
