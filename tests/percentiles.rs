use skill_profiles::percentiles::{Cohorts, percentile_column, percentile_of_score, rank_percentiles};
use skill_profiles::rates::{RUSH_YDS_PER_ATT, derive_rates};
use skill_profiles::positions::canonical;
use skill_profiles::StatTable;

const STAT: &str = "Rec/G";

fn cohort_table(rows: &[(&str, &str, Option<f64>)]) -> StatTable {
    let mut t = StatTable::with_columns(&[STAT]);
    for (player, pos, v) in rows {
        t.push_row(*player, Some(pos.to_string()), vec![skill_profiles::Cell::from_opt(*v)])
            .unwrap();
    }
    t
}

fn league() -> StatTable {
    cohort_table(&[
        ("W1", "WR", Some(5.1)),
        ("W2", "WR", Some(3.2)),
        ("W3", "WR", Some(4.4)),
        ("W4", "WR", Some(3.2)),
        ("W5", "WR", None),
        ("T1", "TE", Some(2.0)),
        ("T2", "TE", Some(6.0)),
        ("R1", "RB", Some(1.5)),
    ])
}

#[test]
fn every_percentile_matches_direct_recount() {
    let reference = league();
    let ranked = rank_percentiles(&reference, &reference, &[STAT]).unwrap();
    let col = percentile_column(STAT);

    for (i, row) in reference.rows().iter().enumerate() {
        let pos = canonical(row.pos.as_deref());
        let Some(v) = reference.get(i, STAT).and_then(|c| c.as_f64()) else {
            assert_eq!(ranked.value(&row.player, &col), None);
            continue;
        };
        let peers: Vec<f64> = reference
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, r)| canonical(r.pos.as_deref()) == pos)
            .filter_map(|(j, _)| reference.get(j, STAT).and_then(|c| c.as_f64()))
            .collect();
        let at_or_below = peers.iter().filter(|p| **p <= v).count();
        let want = at_or_below as f64 * 100.0 / peers.len() as f64;
        assert_eq!(ranked.value(&row.player, &col), Some(want), "{}", row.player);
    }
}

#[test]
fn unique_extremes_score_one_hundred_and_one_over_n() {
    let ranked = rank_percentiles(&league(), &league(), &[STAT]).unwrap();
    let col = percentile_column(STAT);
    assert_eq!(ranked.value("W1", &col), Some(100.0));
    // Ties share the higher rank: both 3.2s are at or below 3.2.
    assert_eq!(ranked.value("W2", &col), Some(50.0));
    assert_eq!(ranked.value("W4", &col), Some(50.0));
    assert_eq!(ranked.value("T1", &col), Some(50.0));
    assert_eq!(ranked.value("R1", &col), Some(100.0));
}

#[test]
fn outside_target_scores_against_reference_only() {
    let reference = league();
    let target = cohort_table(&[("New WR", "WR", Some(4.0)), ("New TE", "TE", Some(99.0))]);
    let ranked = rank_percentiles(&reference, &target, &[STAT]).unwrap();
    let col = percentile_column(STAT);
    assert_eq!(ranked.value("New WR", &col), Some(50.0));
    assert_eq!(ranked.value("New TE", &col), Some(100.0));

    let cohorts = Cohorts::build(&reference, &[STAT]).unwrap();
    let wr = cohorts.cohort(skill_profiles::Position::WR, STAT).unwrap();
    assert_eq!(wr.len(), 4);
    assert_eq!(percentile_of_score(wr, 0.0), 0.0);
}

#[test]
fn zero_attempt_players_are_left_out_of_yards_per_carry() {
    let mut merged = StatTable::with_columns(&[
        "G", "Rush Att", "Rush Yds", "Rush TD", "Tgt", "Rec", "Receiving Yds", "Receiving TD",
        "Touch",
    ]);
    merged
        .push_numbers("Carrier", Some("RB"), &[16.0, 200.0, 900.0, 6.0, 30.0, 20.0, 150.0, 1.0, 220.0])
        .unwrap();
    merged
        .push_numbers("Backup", Some("RB"), &[16.0, 50.0, 150.0, 1.0, 10.0, 8.0, 60.0, 0.0, 58.0])
        .unwrap();
    merged
        .push_numbers("Returner", Some("RB"), &[10.0, 0.0, 0.0, 0.0, 4.0, 3.0, 20.0, 0.0, 3.0])
        .unwrap();
    let profiles = derive_rates(&merged).unwrap();
    let ranked = rank_percentiles(&profiles, &profiles, &[RUSH_YDS_PER_ATT]).unwrap();
    let col = percentile_column(RUSH_YDS_PER_ATT);

    assert_eq!(ranked.value("Returner", &col), None);
    assert_eq!(ranked.value("Carrier", &col), Some(100.0));
    assert_eq!(ranked.value("Backup", &col), Some(50.0));
}
