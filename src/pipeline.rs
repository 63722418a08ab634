//! End-to-end stage composition.
//!
//! raw tables -> schema -> positions -> season merge / rates -> percentiles,
//! with prototypes branching off the merged rate profile. Every stage returns
//! a fresh table; nothing here keeps state between runs.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::TableError;
use crate::loader::read_table;
use crate::percentiles::{profile_percentiles, receiving_percentiles, rushing_percentiles};
use crate::positions::{clean_position, map_receiving_positions, map_rushing_positions};
use crate::prototypes::select_prototypes;
use crate::rates::{derive_rates, normalize_receiving_source, normalize_rushing_source};
use crate::rosters::merge_in_stats;
use crate::schema::{
    clean_player_names, drop_roster_columns, rename_college_receiving, rename_college_rushing,
    rename_pro_season, rename_single_player_source,
};
use crate::season_merge::SeasonMerge;
use crate::table::StatTable;

/// A season's combined rushing & receiving page, optionally with the
/// matching roster (games, starts and listed position).
#[derive(Debug, Clone)]
pub struct SeasonInput {
    pub stats: StatTable,
    pub roster: Option<StatTable>,
}

#[derive(Debug, Clone, Default)]
pub struct CollegeInputs {
    pub rushing: Option<StatTable>,
    pub receiving: Option<StatTable>,
    pub single_player: Option<StatTable>,
}

#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub first_season: SeasonInput,
    pub second_season: SeasonInput,
    /// Single-season rushing page, raw headers.
    pub rushing: StatTable,
    /// Single-season receiving page, raw headers.
    pub receiving: StatTable,
    pub college: CollegeInputs,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Two-season rate profile, before ranking.
    pub profiles: StatTable,
    pub profile_percentiles: StatTable,
    pub rushing_percentiles: StatTable,
    pub receiving_percentiles: StatTable,
    pub prototypes: StatTable,
    pub college: Option<StatTable>,
}

/// Renames, cleans names, joins the roster if present and maps positions.
/// Roster labels are single positions, so they take the exact-label path
/// before the join.
fn prepare_season(input: &SeasonInput) -> Result<StatTable, TableError> {
    let stats = clean_player_names(&rename_pro_season(&input.stats));
    let stats = match &input.roster {
        Some(roster) => {
            let roster = clean_position(&clean_player_names(&drop_roster_columns(roster)?));
            merge_in_stats(&stats, &roster)?
        }
        None => stats,
    };
    Ok(map_receiving_positions(&stats))
}

/// Prototypes are picked from the merged rate profile, which carries both the
/// rushing and the receiving rates for every player.
pub fn run(inputs: &PipelineInputs, cfg: &PipelineConfig) -> Result<PipelineOutput, TableError> {
    let first = prepare_season(&inputs.first_season)?;
    let second = prepare_season(&inputs.second_season)?;
    let merged = SeasonMerge::new(&cfg.first_season, &cfg.second_season)
        .catch_rate(cfg.catch_rate)
        .merge(&first, &second)?;
    let profiles = derive_rates(&merged)?;
    let profile_pct = profile_percentiles(&profiles, &profiles)?;

    let rushing = normalize_rushing_source(&map_rushing_positions(&clean_player_names(&inputs.rushing)))?;
    let rushing_pct = rushing_percentiles(&rushing, &rushing)?;

    let receiving =
        normalize_receiving_source(&map_receiving_positions(&clean_player_names(&inputs.receiving)))?;
    let receiving_pct = receiving_percentiles(&receiving, &receiving)?;

    let prototypes = select_prototypes(&[&profiles])?;
    let college = normalize_college(&inputs.college)?;

    info!(
        profiles = profiles.len(),
        rushing = rushing_pct.len(),
        receiving = receiving_pct.len(),
        prototypes = prototypes.len(),
        "pipeline complete"
    );
    Ok(PipelineOutput {
        profiles,
        profile_percentiles: profile_pct,
        rushing_percentiles: rushing_pct,
        receiving_percentiles: receiving_pct,
        prototypes,
        college,
    })
}

/// Brings the college and single-player sources onto the shared vocabulary
/// and stacks them. The hand-curated single-player source goes first, so its
/// row wins when a player also appears in a college table. `None` when no
/// college source was supplied.
pub fn normalize_college(inputs: &CollegeInputs) -> Result<Option<StatTable>, TableError> {
    let mut parts = Vec::new();
    if let Some(t) = &inputs.single_player {
        parts.push(rename_single_player_source(t));
    }
    if let Some(t) = &inputs.rushing {
        parts.push(rename_college_rushing(t)?);
    }
    if let Some(t) = &inputs.receiving {
        parts.push(rename_college_receiving(t)?);
    }
    if parts.is_empty() {
        return Ok(None);
    }
    let refs: Vec<&StatTable> = parts.iter().collect();
    Ok(Some(clean_player_names(&StatTable::concat(&refs))))
}

fn read_optional(path: &Path) -> Result<Option<StatTable>> {
    if path.exists() {
        read_table(path).map(Some)
    } else {
        Ok(None)
    }
}

pub fn load_inputs(cfg: &PipelineConfig) -> Result<PipelineInputs> {
    let season = |label: &str| -> Result<SeasonInput> {
        Ok(SeasonInput {
            stats: read_table(&cfg.season_file(label))
                .with_context(|| format!("load season {label}"))?,
            roster: read_optional(&cfg.roster_file(label))?,
        })
    };
    Ok(PipelineInputs {
        first_season: season(&cfg.first_season)?,
        second_season: season(&cfg.second_season)?,
        rushing: read_table(&cfg.rushing_path()).context("load rushing table")?,
        receiving: read_table(&cfg.receiving_path()).context("load receiving table")?,
        college: CollegeInputs {
            rushing: read_optional(&cfg.data_dir.join("college_rushing.csv"))?,
            receiving: read_optional(&cfg.data_dir.join("college_receiving.csv"))?,
            single_player: read_optional(&cfg.data_dir.join("single_player.csv"))?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_table_from_reader;

    #[test]
    fn curated_single_player_row_wins_over_college_row() {
        let receiving = read_table_from_reader(
            "Player,School,G,Rec,Yds,Avg,TD,Att,Yds,Avg,TD,Plays,Yds,Avg,TD\n\
             Dante Pettis*,Washington,14,63,761,12.1,7,3,29,9.7,0,66,790,12.0,7\n"
                .as_bytes(),
        )
        .unwrap();
        let single = read_table_from_reader(
            "Player,G,Rush,Yds,Yd/Rush,TDs,Rec,Yds,Yd/Rec,TDs\n\
             Dante Pettis,13,5,40,8.0,1,63,761,12.1,7\n"
                .as_bytes(),
        )
        .unwrap();
        let college = normalize_college(&CollegeInputs {
            rushing: None,
            receiving: Some(receiving),
            single_player: Some(single),
        })
        .unwrap()
        .expect("two sources were supplied");

        assert_eq!(college.len(), 1);
        assert_eq!(college.value("Dante Pettis", "Att"), Some(5.0));
        assert_eq!(college.value("Dante Pettis", "G"), Some(13.0));
    }

    #[test]
    fn no_college_sources_yield_none() {
        assert!(normalize_college(&CollegeInputs::default()).unwrap().is_none());
    }
}
