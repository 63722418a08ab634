//! Column vocabulary harmonization.
//!
//! The season and college sources print a rushing section and a receiving
//! section side by side under the same generic headers ("Yds", "TD", "Lng").
//! The loader disambiguates repeated headers with a `.1`/`.2` suffix, and the
//! tables below turn those into one category-prefixed name per statistic.

use tracing::debug;

use crate::error::TableError;
use crate::table::StatTable;

pub type RenameTable = &'static [(&'static str, &'static str)];

/// Professional season tables (rushing section first).
pub const PRO_SEASON_RENAMES: RenameTable = &[
    ("Att", "Rush Att"),
    ("Yds", "Rush Yds"),
    ("TD", "Rush TD"),
    ("Lng", "Rush Lng"),
    ("Y/A", "Rush Y/A"),
    ("Y/G", "Rush Y/G"),
    ("Yds.1", "Receiving Yds"),
    ("TD.1", "Receiving TD"),
    ("Lng.1", "Receiving Lng"),
    ("Y/G.1", "Receiving Y/G"),
    ("A/G", "Rush A/G"),
    ("Y/R", "Receiving Y/R"),
];

/// College tables whose first section is rushing.
pub const COLLEGE_RUSHING_RENAMES: RenameTable = &[
    ("Yds", "Rush Yds"),
    ("Avg", "Rush Yds/Att"),
    ("TD", "Rush TD"),
    ("Yds.1", "Receiving Yds"),
    ("Avg.1", "Yds/Reception"),
    ("TD.1", "Receiving TD"),
];

/// College tables whose first section is receiving.
pub const COLLEGE_RECEIVING_RENAMES: RenameTable = &[
    ("Yds", "Receiving Yds"),
    ("Avg", "Yds/Reception"),
    ("TD", "Receiving TD"),
    ("Yds.1", "Rush Yds"),
    ("Avg.1", "Rush Yds/Att"),
    ("TD.1", "Rush TD"),
];

/// Hand-curated single-player source with its own header spelling.
pub const SINGLE_PLAYER_RENAMES: RenameTable = &[
    ("Yds", "Rush Yds"),
    ("Rush", "Att"),
    ("Yd/Rush", "Rush Yds/Att"),
    ("TDs", "Rush TD"),
    ("Yds.1", "Receiving Yds"),
    ("Yd/Rec", "Yds/Reception"),
    ("TDs.1", "Receiving TD"),
];

/// The unused scrimmage section of college box scores, plus its play count.
pub const COLLEGE_EXTRA_COLUMNS: &[&str] = &["Plays", "Yds.2", "Avg.2", "TD.2"];

pub const ROSTER_EXTRA_COLUMNS: &[&str] = &["No.", "BirthDate", "Yrs", "AV", "Salary"];

pub fn rename_pro_season(table: &StatTable) -> StatTable {
    table.rename(PRO_SEASON_RENAMES)
}

pub fn rename_college_rushing(table: &StatTable) -> Result<StatTable, TableError> {
    table.rename(COLLEGE_RUSHING_RENAMES).drop_columns(COLLEGE_EXTRA_COLUMNS)
}

pub fn rename_college_receiving(table: &StatTable) -> Result<StatTable, TableError> {
    table.rename(COLLEGE_RECEIVING_RENAMES).drop_columns(COLLEGE_EXTRA_COLUMNS)
}

pub fn rename_single_player_source(table: &StatTable) -> StatTable {
    table.rename(SINGLE_PLAYER_RENAMES)
}

pub fn drop_roster_columns(table: &StatTable) -> Result<StatTable, TableError> {
    table.drop_columns(ROSTER_EXTRA_COLUMNS)
}

/// Strips award markers (`*` Pro Bowl, `+` All-Pro) and the `\id` suffix
/// some exports append to the display name.
pub fn clean_player_name(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| *c != '*' && *c != '+').collect();
    let base = stripped.split('\\').next().unwrap_or_default();
    base.trim().to_string()
}

/// Cleans every name, drops rows left without one, and keeps the first row
/// per cleaned name.
pub fn clean_player_names(table: &StatTable) -> StatTable {
    let cleaned = table.map_players(clean_player_name);
    let named = cleaned.filter_rows(|r| !r.player.is_empty());
    let out = named.dedup_players();
    debug!(
        rows_in = table.len(),
        unnamed = cleaned.len() - named.len(),
        duplicates = named.len() - out.len(),
        "cleaned player names"
    );
    out
}

pub fn drop_missing_positions(table: &StatTable) -> StatTable {
    let out = table.filter_rows(|r| r.pos.as_deref().is_some_and(|p| !p.trim().is_empty()));
    if out.len() < table.len() {
        debug!(dropped = table.len() - out.len(), "dropped rows without a position");
    }
    out
}
