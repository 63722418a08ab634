use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::season_merge::CatchRateMode;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub first_season: String,
    pub second_season: String,
    pub rushing_file: Option<String>,
    pub receiving_file: Option<String>,
    pub catch_rate: CatchRateMode,
    pub export_xlsx: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            first_season: "2017".to_string(),
            second_season: "2018".to_string(),
            rushing_file: None,
            receiving_file: None,
            catch_rate: CatchRateMode::Merged,
            export_xlsx: true,
        }
    }
}

impl PipelineConfig {
    /// Reads `SKILL_*` variables over the defaults. Call `dotenvy::dotenv()`
    /// first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(opt_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(dir) = lookup("SKILL_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("SKILL_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("SKILL_SEASONS") {
            let (first, second) = parse_seasons(&raw)?;
            cfg.first_season = first;
            cfg.second_season = second;
        }
        cfg.rushing_file = lookup("SKILL_RUSHING_FILE");
        cfg.receiving_file = lookup("SKILL_RECEIVING_FILE");
        if let Some(raw) = lookup("SKILL_CATCH_RATE") {
            cfg.catch_rate = CatchRateMode::parse(&raw)
                .ok_or_else(|| anyhow!("SKILL_CATCH_RATE must be 'merged' or 'season_mean', got '{raw}'"))?;
        }
        if let Some(raw) = lookup("SKILL_EXPORT_XLSX") {
            cfg.export_xlsx = parse_bool(&raw).ok_or_else(|| anyhow!("SKILL_EXPORT_XLSX is not a bool: '{raw}'"))?;
        }
        Ok(cfg)
    }

    pub fn season_file(&self, season: &str) -> PathBuf {
        self.data_dir.join(format!("rushing_receiving_{season}.csv"))
    }

    pub fn roster_file(&self, season: &str) -> PathBuf {
        self.data_dir.join(format!("roster_{season}.csv"))
    }

    pub fn rushing_path(&self) -> PathBuf {
        match &self.rushing_file {
            Some(name) => self.data_dir.join(name),
            None => self.data_dir.join(format!("rushing_{}.csv", self.second_season)),
        }
    }

    pub fn receiving_path(&self) -> PathBuf {
        match &self.receiving_file {
            Some(name) => self.data_dir.join(name),
            None => self.data_dir.join(format!("receiving_{}.csv", self.second_season)),
        }
    }
}

fn parse_seasons(raw: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        [first, second] if first != second => Ok((first.to_string(), second.to_string())),
        _ => Err(anyhow!("SKILL_SEASONS must name two distinct seasons, got '{raw}'")),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}
