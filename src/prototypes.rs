use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::TableError;
use crate::table::StatTable;

/// Reference archetypes used as anchor profiles by similarity consumers.
pub const PROTOTYPE_NAMES: [&str; 9] = [
    "Todd Gurley",
    "Brandin Cooks",
    "Cooper Kupp",
    "Robert Woods",
    "Sammy Watkins",
    "Matt Breida",
    "Dante Pettis",
    "Marquise Goodwin",
    "George Kittle",
];

const PROTOTYPE_DROP: [&str; 2] = ["G", "GS"];

/// Stacks the candidate tables and keeps rows whose player is in `names`.
/// Row order follows the stacked tables, not `names`; look prototypes up by
/// player. Games, starts and position are removed.
pub fn select_prototypes_from(
    tables: &[&StatTable],
    names: &[&str],
) -> Result<StatTable, TableError> {
    let wanted: HashSet<&str> = names.iter().copied().collect();
    let pool = StatTable::concat(tables);
    let picked = pool.filter_rows(|r| wanted.contains(r.player.as_str()));

    let found: HashSet<&str> = picked.rows().iter().map(|r| r.player.as_str()).collect();
    for name in names.iter().filter(|n| !found.contains(*n)) {
        warn!(player = *name, "prototype not found in candidate tables");
    }

    let out = picked.drop_columns(&PROTOTYPE_DROP)?.without_positions();
    info!(prototypes = out.len(), "selected prototypes");
    Ok(out)
}

pub fn select_prototypes(tables: &[&StatTable]) -> Result<StatTable, TableError> {
    select_prototypes_from(tables, &PROTOTYPE_NAMES)
}
