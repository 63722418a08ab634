use std::collections::HashSet;

use serde::Serialize;

use crate::error::TableError;

pub const PLAYER_COL: &str = "Player";
pub const POS_COL: &str = "Pos";

/// A single value in a stat table. Source tables mix numbers with text
/// columns (team, awards), and blank cells are common in scraped data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Num(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Missing;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Num(v),
            Ok(_) => Cell::Missing,
            Err(_) => Cell::Text(s.to_string()),
        }
    }

    pub fn from_opt(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Cell::Num(v),
            _ => Cell::Missing,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Num(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub player: String,
    pub pos: Option<String>,
    cells: Vec<Cell>,
}

impl StatRow {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// An immutable-by-convention tabular snapshot. Every stage takes a `&StatTable`
/// and returns a new one.
///
/// `Player` and `Pos` are carried as dedicated row fields rather than cells
/// because every stage keys on them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTable {
    columns: Vec<String>,
    rows: Vec<StatRow>,
}

impl StatTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_columns(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn push_row(
        &mut self,
        player: impl Into<String>,
        pos: Option<String>,
        cells: Vec<Cell>,
    ) -> Result<(), TableError> {
        let player = player.into();
        if cells.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                player,
                expected: self.columns.len(),
                got: cells.len(),
            });
        }
        self.rows.push(StatRow { player, pos, cells });
        Ok(())
    }

    /// Convenience for numeric-only rows, mostly used by tests and benches.
    pub fn push_numbers(
        &mut self,
        player: &str,
        pos: Option<&str>,
        values: &[f64],
    ) -> Result<(), TableError> {
        let cells = values.iter().map(|v| Cell::Num(*v)).collect();
        self.push_row(player, pos.map(str::to_string), cells)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.cells.get(idx)
    }

    pub fn find_player(&self, player: &str) -> Option<&StatRow> {
        self.rows.iter().find(|r| r.player == player)
    }

    pub fn value(&self, player: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.find_player(player)?.cells.get(idx)?.as_f64()
    }

    /// Numeric view of one column. Text cells count as missing.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| r.cells[idx].as_f64()).collect())
    }

    /// Like `numeric_column`, but a blank cell reads as zero. Counting totals
    /// in the season sources are left blank when a player had none.
    pub fn count_column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .map(|r| match &r.cells[idx] {
                Cell::Num(v) => Ok(*v),
                Cell::Missing => Ok(0.0),
                Cell::Text(raw) => Err(TableError::NotNumeric {
                    column: name.to_string(),
                    player: r.player.clone(),
                    raw: raw.clone(),
                }),
            })
            .collect()
    }

    /// Renames columns that are present; unknown keys are ignored.
    pub fn rename(&self, pairs: &[(&str, &str)]) -> StatTable {
        let mut out = self.clone();
        for col in out.columns.iter_mut() {
            if let Some((_, to)) = pairs.iter().find(|(from, _)| *from == col.as_str()) {
                *col = to.to_string();
            }
        }
        out
    }

    /// Drops the named columns; every one of them must exist.
    pub fn drop_columns(&self, names: &[&str]) -> Result<StatTable, TableError> {
        for name in names {
            self.require_column(name)?;
        }
        Ok(self.drop_columns_if_present(names))
    }

    pub fn drop_columns_if_present(&self, names: &[&str]) -> StatTable {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.contains(&self.columns[i].as_str()))
            .collect();
        self.project(&keep)
    }

    fn project(&self, idx: &[usize]) -> StatTable {
        StatTable {
            columns: idx.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| StatRow {
                    player: r.player.clone(),
                    pos: r.pos.clone(),
                    cells: idx.iter().map(|&i| r.cells[i].clone()).collect(),
                })
                .collect(),
        }
    }

    /// Appends a column, or overwrites it when the name already exists.
    pub fn with_column(&self, name: &str, values: Vec<Cell>) -> Result<StatTable, TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                column: name.to_string(),
                expected: self.rows.len(),
                got: values.len(),
            });
        }
        let mut out = self.clone();
        match out.column_index(name) {
            Some(idx) => {
                for (row, v) in out.rows.iter_mut().zip(values) {
                    row.cells[idx] = v;
                }
            }
            None => {
                out.columns.push(name.to_string());
                for (row, v) in out.rows.iter_mut().zip(values) {
                    row.cells.push(v);
                }
            }
        }
        Ok(out)
    }

    pub fn filter_rows(&self, mut keep: impl FnMut(&StatRow) -> bool) -> StatTable {
        StatTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Rewrites each row's position; rows mapped to `None` are dropped.
    pub fn map_positions(&self, mut f: impl FnMut(Option<&str>) -> Option<String>) -> StatTable {
        StatTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter_map(|r| {
                    let pos = f(r.pos.as_deref())?;
                    Some(StatRow {
                        pos: Some(pos),
                        ..r.clone()
                    })
                })
                .collect(),
        }
    }

    pub fn map_players(&self, mut f: impl FnMut(&str) -> String) -> StatTable {
        StatTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|r| StatRow {
                    player: f(&r.player),
                    ..r.clone()
                })
                .collect(),
        }
    }

    /// Keeps the first row for every player name.
    pub fn dedup_players(&self) -> StatTable {
        let mut seen = HashSet::new();
        self.filter_rows(|r| seen.insert(r.player.clone()))
    }

    pub fn without_positions(&self) -> StatTable {
        StatTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|r| StatRow {
                    pos: None,
                    ..r.clone()
                })
                .collect(),
        }
    }

    /// Stacks tables with the union of their columns. Cells a table lacks
    /// are filled as missing.
    pub fn concat(tables: &[&StatTable]) -> StatTable {
        let mut columns: Vec<String> = Vec::new();
        for t in tables {
            for c in &t.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
        }
        let mut rows = Vec::new();
        for t in tables {
            let idx: Vec<Option<usize>> = columns.iter().map(|c| t.column_index(c)).collect();
            for r in &t.rows {
                rows.push(StatRow {
                    player: r.player.clone(),
                    pos: r.pos.clone(),
                    cells: idx
                        .iter()
                        .map(|i| i.map(|i| r.cells[i].clone()).unwrap_or(Cell::Missing))
                        .collect(),
                });
            }
        }
        StatTable { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatTable {
        let mut t = StatTable::with_columns(&["G", "Yds", "Yds.1"]);
        t.push_numbers("A", Some("RB"), &[16.0, 900.0, 300.0]).unwrap();
        t.push_numbers("B", Some("WR"), &[15.0, 10.0, 1100.0]).unwrap();
        t
    }

    #[test]
    fn cell_parse_handles_blank_and_text() {
        assert_eq!(Cell::parse(" 12 "), Cell::Num(12.0));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("LAR"), Cell::Text("LAR".to_string()));
    }

    #[test]
    fn rename_ignores_unknown_keys() {
        let t = sample().rename(&[("Yds", "Rush Yds"), ("Nope", "X")]);
        assert_eq!(t.columns(), &["G", "Rush Yds", "Yds.1"]);
    }

    #[test]
    fn strict_drop_reports_missing_column() {
        let err = sample().drop_columns(&["G", "AV"]).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(c) if c == "AV"));
    }

    #[test]
    fn concat_fills_missing_cells() {
        let a = sample();
        let mut b = StatTable::with_columns(&["G", "Tgt"]);
        b.push_numbers("C", Some("TE"), &[12.0, 40.0]).unwrap();
        let out = StatTable::concat(&[&a, &b]);
        assert_eq!(out.columns(), &["G", "Yds", "Yds.1", "Tgt"]);
        assert_eq!(out.len(), 3);
        assert!(out.get(0, "Tgt").unwrap().is_missing());
        assert_eq!(out.value("C", "Tgt"), Some(40.0));
    }

    #[test]
    fn count_column_reads_blank_as_zero() {
        let mut t = StatTable::with_columns(&["Tgt"]);
        t.push_row("A", None, vec![Cell::Missing]).unwrap();
        assert_eq!(t.count_column("Tgt").unwrap(), vec![0.0]);
    }
}
