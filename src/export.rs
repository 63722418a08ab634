use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::{Map, Value};

use crate::table::{Cell, PLAYER_COL, POS_COL, StatTable};

pub struct ExportReport {
    pub sheets: usize,
    pub rows: usize,
}

/// One JSON object per row. Missing cells serialize as `null`; the position
/// key is omitted for tables that carry none.
pub fn table_records(table: &StatTable) -> Vec<Map<String, Value>> {
    let with_pos = table.rows().iter().any(|r| r.pos.is_some());
    table
        .rows()
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert(PLAYER_COL.to_string(), Value::String(row.player.clone()));
            if with_pos {
                obj.insert(
                    POS_COL.to_string(),
                    row.pos.clone().map(Value::String).unwrap_or(Value::Null),
                );
            }
            for (col, cell) in table.columns().iter().zip(row.cells()) {
                let v = serde_json::to_value(cell).unwrap_or(Value::Null);
                obj.insert(col.clone(), v);
            }
            obj
        })
        .collect()
}

pub fn write_json(path: &Path, table: &StatTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(&table_records(table)).context("serialize table")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

/// Writes each table to its own sheet, plus an `Info` sheet stamped with
/// `generated_at`.
pub fn write_workbook(
    path: &Path,
    sheets: &[(&str, &StatTable)],
    generated_at: &str,
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut rows = 0usize;
    for (name, table) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        write_table(sheet, table)?;
        rows += table.len();
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Info")?;
        sheet.write_string(0, 0, "Generated")?;
        sheet.write_string(0, 1, generated_at)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        sheets: sheets.len(),
        rows,
    })
}

fn write_table(worksheet: &mut Worksheet, table: &StatTable) -> Result<()> {
    let with_pos = table.rows().iter().any(|r| r.pos.is_some());
    let mut header = vec![PLAYER_COL.to_string()];
    if with_pos {
        header.push(POS_COL.to_string());
    }
    header.extend(table.columns().iter().cloned());
    for (col_idx, value) in header.iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, value)
            .with_context(|| format!("write header ({col_idx})"))?;
    }

    let offset = if with_pos { 2 } else { 1 };
    for (idx, row) in table.rows().iter().enumerate() {
        let row_idx = (idx + 1) as u32;
        worksheet.write_string(row_idx, 0, &row.player)?;
        if with_pos {
            worksheet.write_string(row_idx, 1, row.pos.as_deref().unwrap_or_default())?;
        }
        for (i, cell) in row.cells().iter().enumerate() {
            let col_idx = (i + offset) as u16;
            match cell {
                Cell::Num(v) => {
                    worksheet
                        .write_number(row_idx, col_idx, *v)
                        .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
                }
                Cell::Text(s) => {
                    worksheet
                        .write_string(row_idx, col_idx, s)
                        .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
                }
                Cell::Missing => {}
            }
        }
    }
    Ok(())
}
