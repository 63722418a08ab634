//! Position taxonomy.
//!
//! Scraped position fields list secondary roles slash-joined ("FB/RB/TE").
//! The same combined label means different things depending on which stat
//! page it came from, so there are two lookup tables. They are kept separate
//! on purpose: "RB/TE" is a fullback in the rushing pages but the receiving
//! pages disagree on several other labels.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::schema::drop_missing_positions;
use crate::table::StatTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    RB,
    WR,
    TE,
    QB,
    FB,
    CB,
    DB,
    T,
    C,
    DT,
    DE,
    P,
}

/// Positions that form percentile cohorts.
pub const WANTED_POSITIONS: [Position; 3] = [Position::RB, Position::WR, Position::TE];

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::QB => "QB",
            Position::FB => "FB",
            Position::CB => "CB",
            Position::DB => "DB",
            Position::T => "T",
            Position::C => "C",
            Position::DT => "DT",
            Position::DE => "DE",
            Position::P => "P",
        }
    }

    /// Parses an exact canonical label. Combined labels go through a
    /// `PositionMap` instead.
    pub fn from_label(raw: &str) -> Option<Position> {
        let p = match raw.trim().to_uppercase().as_str() {
            "RB" => Position::RB,
            "WR" => Position::WR,
            "TE" => Position::TE,
            "QB" => Position::QB,
            "FB" => Position::FB,
            "CB" => Position::CB,
            "DB" => Position::DB,
            "T" => Position::T,
            "C" => Position::C,
            "DT" => Position::DT,
            "DE" => Position::DE,
            "P" => Position::P,
            _ => return None,
        };
        Some(p)
    }

    pub fn is_wanted(self) -> bool {
        WANTED_POSITIONS.contains(&self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, versioned label lookup for one source context.
#[derive(Debug)]
pub struct PositionMap {
    pub name: &'static str,
    pub version: u32,
    entries: HashMap<&'static str, Position>,
}

impl PositionMap {
    fn new(name: &'static str, version: u32, pairs: &[(&'static str, Position)]) -> Self {
        Self {
            name,
            version,
            entries: pairs.iter().copied().collect(),
        }
    }

    /// Exact match on the trimmed label. Case is significant: the stat
    /// pages print non-starters in lower case, and those labels are not in
    /// either table.
    pub fn lookup(&self, label: &str) -> Option<Position> {
        self.entries.get(label.trim()).copied()
    }
}

pub static RECEIVING_POSITIONS: Lazy<PositionMap> = Lazy::new(|| {
    use Position::*;
    PositionMap::new(
        "receiving",
        1,
        &[
            ("TE/WR", TE),
            ("RB/WR", RB),
            ("FB/WR", FB),
            ("LCB/WR", WR),
            ("T/TE", T),
            ("RB/TE", FB),
            ("CB/RCB", CB),
            ("QB/RB", RB),
            ("FB/RB/WR", FB),
            ("FB/RB/TE", FB),
            ("WR", WR),
            ("TE", TE),
            ("RB", RB),
            ("FB", FB),
            ("QB", QB),
            ("T", T),
            ("C", C),
            ("DT/LDT/RDT", DT),
        ],
    )
});

pub static RUSHING_POSITIONS: Lazy<PositionMap> = Lazy::new(|| {
    use Position::*;
    PositionMap::new(
        "rushing",
        1,
        &[
            ("QB/RB", RB),
            ("QB", QB),
            ("RB", RB),
            ("RB/WR", RB),
            ("WR", WR),
            ("TE/WR", TE),
            ("QB/WR", QB),
            ("FB/WR", FB),
            ("FB", FB),
            ("FB/RB/TE", FB),
            ("RB/TE", FB),
            ("TE", TE),
            ("DB", DB),
            ("CB", DB),
            ("LCB/WR", WR),
            ("P", P),
            ("FS/SS", DB),
            ("DT/LDT", DT),
            ("DE", DE),
            ("FS", DB),
            ("DB/S/SS", DB),
        ],
    )
});

/// Maps every position label through `map` and keeps only cohort positions.
/// Unmapped labels are dropped, never passed through.
pub fn map_positions(table: &StatTable, map: &PositionMap) -> StatTable {
    let mut unmapped = 0usize;
    let mut filtered = 0usize;
    let out = table.map_positions(|label| {
        let Some(label) = label else {
            unmapped += 1;
            return None;
        };
        match map.lookup(label) {
            Some(pos) if pos.is_wanted() => Some(pos.as_str().to_string()),
            Some(_) => {
                filtered += 1;
                None
            }
            None => {
                unmapped += 1;
                debug!(map = map.name, label, "unmapped position label");
                None
            }
        }
    });
    if unmapped > 0 {
        warn!(map = map.name, unmapped, "dropped rows with unmapped position labels");
    }
    debug!(map = map.name, rows_in = table.len(), rows_out = out.len(), filtered, "mapped positions");
    out
}

pub fn map_receiving_positions(table: &StatTable) -> StatTable {
    map_positions(table, &RECEIVING_POSITIONS)
}

pub fn map_rushing_positions(table: &StatTable) -> StatTable {
    map_positions(table, &RUSHING_POSITIONS)
}

/// For roster tables whose labels are already single positions: upper-case,
/// drop blanks, keep exact RB/WR/TE.
pub fn clean_position(table: &StatTable) -> StatTable {
    drop_missing_positions(table).map_positions(|label| {
        let pos = Position::from_label(label?)?;
        pos.is_wanted().then(|| pos.as_str().to_string())
    })
}

/// Parses a row's already-canonical position.
pub fn canonical(label: Option<&str>) -> Option<Position> {
    label.and_then(Position::from_label).filter(|p| p.is_wanted())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(labels: &[&str]) -> StatTable {
        let mut t = StatTable::with_columns(&["G"]);
        for (i, label) in labels.iter().enumerate() {
            t.push_numbers(&format!("P{i}"), Some(label), &[16.0]).unwrap();
        }
        t
    }

    fn positions(t: &StatTable) -> Vec<(&str, &str)> {
        t.rows()
            .iter()
            .map(|r| (r.player.as_str(), r.pos.as_deref().unwrap_or("")))
            .collect()
    }

    #[test]
    fn same_label_differs_by_context() {
        assert_eq!(RECEIVING_POSITIONS.lookup("CB"), None);
        assert_eq!(RUSHING_POSITIONS.lookup("CB"), Some(Position::DB));
        assert_eq!(RECEIVING_POSITIONS.lookup(" RB/TE "), Some(Position::FB));
        assert_eq!(RUSHING_POSITIONS.lookup("QB/WR"), Some(Position::QB));
    }

    #[test]
    fn receiving_map_keeps_only_skill_positions() {
        let t = labelled(&["TE/WR", "RB/TE", "QB/RB", "LCB/WR", "T/TE", "LB", "wr"]);
        let out = map_receiving_positions(&t);
        assert_eq!(
            positions(&out),
            vec![("P0", "TE"), ("P2", "RB"), ("P3", "WR")]
        );
    }

    #[test]
    fn lower_case_labels_are_unmapped() {
        assert_eq!(RECEIVING_POSITIONS.lookup("wr"), None);
        assert_eq!(RUSHING_POSITIONS.lookup("rb"), None);
        let out = map_receiving_positions(&labelled(&["wr"]));
        assert!(out.is_empty());
    }

    #[test]
    fn rushing_map_drops_unmapped_and_defense() {
        let t = labelled(&["QB/RB", "FB/RB/TE", "CB", "ILB", "TE/WR"]);
        let out = map_rushing_positions(&t);
        assert_eq!(positions(&out), vec![("P0", "RB"), ("P4", "TE")]);
    }

    #[test]
    fn clean_position_rejects_combined_labels() {
        let t = labelled(&["rb", "TE/WR", "QB", "te"]);
        let out = clean_position(&t);
        assert_eq!(positions(&out), vec![("P0", "RB"), ("P3", "TE")]);
    }

    #[test]
    fn every_table_entry_is_deterministic() {
        for map in [&*RECEIVING_POSITIONS, &*RUSHING_POSITIONS] {
            assert!(!map.entries.is_empty());
            for (label, pos) in &map.entries {
                assert_eq!(map.lookup(label), Some(*pos));
            }
        }
    }
}
