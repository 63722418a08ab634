use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::table::{Cell, PLAYER_COL, POS_COL, StatTable};

/// Suffixes repeated headers `.1`, `.2`, ... in order of appearance, so
/// the second "Yds" becomes "Yds.1". The rename tables in `schema` rely on it.
pub fn dedupe_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|h| {
            let h = h.as_ref().trim().to_string();
            let n = seen.entry(h.clone()).or_insert(0);
            let out = if *n == 0 { h.clone() } else { format!("{h}.{n}") };
            *n += 1;
            out
        })
        .collect()
}

pub fn read_table(path: &Path) -> Result<StatTable> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let table = read_table_from_reader(file).with_context(|| format!("parse {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "loaded table");
    Ok(table)
}

/// Parses a scraped CSV table. `Player` is required; `Pos` is optional.
/// Rows with a blank name and repeated header rows are skipped.
pub fn read_table_from_reader<R: Read>(rdr: R) -> Result<StatTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers = dedupe_headers(reader.headers().context("read header row")?.iter());

    let player_idx = headers
        .iter()
        .position(|h| h == PLAYER_COL)
        .ok_or_else(|| anyhow!("table has no '{PLAYER_COL}' column"))?;
    let pos_idx = headers.iter().position(|h| h == POS_COL);
    let data_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != player_idx && Some(i) != pos_idx)
        .collect();

    let mut table = StatTable::new(data_idx.iter().map(|&i| headers[i].clone()).collect());
    let mut skipped = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read record {}", line + 1))?;
        let player = record.get(player_idx).unwrap_or_default().trim();
        if player.is_empty() || player == PLAYER_COL {
            skipped += 1;
            continue;
        }
        let pos = pos_idx
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let cells = data_idx
            .iter()
            .map(|&i| record.get(i).map(Cell::parse).unwrap_or(Cell::Missing))
            .collect();
        table.push_row(player, pos, cells)?;
    }
    if skipped > 0 {
        debug!(skipped, "skipped unnamed or repeated-header rows");
    }
    Ok(table)
}
