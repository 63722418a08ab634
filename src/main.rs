use std::fs;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skill_profiles::config::PipelineConfig;
use skill_profiles::export::{write_json, write_workbook};
use skill_profiles::pipeline;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut cfg = PipelineConfig::from_env()?;
    if let Some(dir) = std::env::args().nth(1) {
        cfg.data_dir = dir.into();
    }
    info!("Loaded configuration: {:?}", cfg);

    let inputs = pipeline::load_inputs(&cfg)?;
    let out = pipeline::run(&inputs, &cfg).context("run pipeline")?;

    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create {}", cfg.output_dir.display()))?;
    let mut sheets = vec![
        ("Profiles", &out.profile_percentiles),
        ("Rushing", &out.rushing_percentiles),
        ("Receiving", &out.receiving_percentiles),
        ("Prototypes", &out.prototypes),
    ];
    if let Some(college) = &out.college {
        sheets.push(("College", college));
    }
    for (name, table) in &sheets {
        let path = cfg.output_dir.join(format!("{}.json", name.to_lowercase()));
        write_json(&path, table)?;
        info!(path = %path.display(), rows = table.len(), "wrote table");
    }

    if cfg.export_xlsx {
        let path = cfg.output_dir.join("skill_profiles.xlsx");
        let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let report = write_workbook(&path, &sheets, &generated_at)?;
        info!(path = %path.display(), sheets = report.sheets, rows = report.rows, "wrote workbook");
    }
    Ok(())
}
