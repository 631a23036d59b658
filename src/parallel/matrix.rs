//! Round-robin comparison of a whole roster, run on a [WorkerPool].

use std::collections::BTreeMap;
use std::io::Write;

use rayon::prelude::*;
use serde::Serialize;

use crate::battle::balance::Balance;
use crate::battle::fighter::Fighter;
use crate::battle::highlights::build_highlights;
use crate::battle::winrate::calc_winrate;
use crate::error::EngineError;
use crate::parallel::pool::WorkerPool;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupRow {
    pub a_id: String,
    pub b_id: String,
    pub p_a: f64,
    pub p_b: f64,
    pub delta: f64,
    pub top_highlight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub id: String,
    pub expected_wins: f64,
    pub matchups: usize,
    pub mean_winrate: f64,
}

/// Every ordered pair `(i, j)` with `i != j`, row-major by input index.
pub fn round_robin(
    fighters: &[Fighter],
    balance: &Balance,
    pool: &WorkerPool,
) -> Result<Vec<MatchupRow>, EngineError> {
    let pairs: Vec<(usize, usize)> = (0..fighters.len())
        .flat_map(|i| (0..fighters.len()).filter(move |&j| j != i).map(move |j| (i, j)))
        .collect();
    log::info!(
        "round robin over {} fighters ({} matchups, workers={})",
        fighters.len(),
        pairs.len(),
        pool.workers
    );

    pool.install(|| {
        pairs
            .par_iter()
            .map(|&(i, j)| matchup(&fighters[i], &fighters[j], balance))
            .collect()
    })
}

fn matchup(a: &Fighter, b: &Fighter, balance: &Balance) -> MatchupRow {
    let result = calc_winrate(a, b, balance);
    let top_highlight = build_highlights(a, b, balance, 1)
        .into_iter()
        .next()
        .unwrap_or_default();
    MatchupRow {
        a_id: a.id.clone(),
        b_id: b.id.clone(),
        p_a: result.p_a,
        p_b: result.p_b,
        delta: result.delta,
        top_highlight,
    }
}

pub fn write_matrix_csv<W: Write>(rows: &[MatchupRow], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Folds side-A win probabilities per fighter, best first.
pub fn standings(rows: &[MatchupRow]) -> Vec<Standing> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(row.a_id.as_str()).or_insert((0.0, 0));
        entry.0 += row.p_a;
        entry.1 += 1;
    }

    let mut ranked: Vec<Standing> = totals
        .into_iter()
        .map(|(id, (expected_wins, matchups))| Standing {
            id: id.to_string(),
            expected_wins,
            matchups,
            mean_winrate: expected_wins / matchups as f64,
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .expected_wins
            .total_cmp(&left.expected_wins)
            .then_with(|| left.id.cmp(&right.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::stats::BattleStats;
    use crate::battle::tags::TagSet;

    fn fighter(id: &str, power: f64) -> Fighter {
        Fighter::new(
            id,
            id.to_uppercase(),
            BattleStats {
                hp: 180,
                power,
                defense: 50.0,
                speed: 50.0,
                physical: 50.0,
                magic: 50.0,
                range: 50.0,
            },
            TagSet::try_from_strs(&["tank", "sustain", "counter"]).expect("valid tags"),
        )
    }

    fn roster() -> Vec<Fighter> {
        vec![fighter("a", 80.0), fighter("b", 50.0), fighter("c", 20.0)]
    }

    #[test]
    fn covers_ordered_pairs_in_row_major_order() {
        let rows = round_robin(&roster(), &Balance::reference(), &WorkerPool::default())
            .expect("matrix");
        let ids: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| (row.a_id.as_str(), row.b_id.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![("a", "b"), ("a", "c"), ("b", "a"), ("b", "c"), ("c", "a"), ("c", "b")]
        );
        for row in &rows {
            assert!((row.p_a + row.p_b - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn worker_count_does_not_change_output() {
        let balance = Balance::reference();
        let serial = round_robin(&roster(), &balance, &WorkerPool::with_workers(1)).expect("1");
        let parallel = round_robin(&roster(), &balance, &WorkerPool::with_workers(4)).expect("4");
        assert_eq!(serial, parallel);
    }

    #[test]
    fn standings_rank_strongest_first() {
        let rows = round_robin(&roster(), &Balance::reference(), &WorkerPool::default())
            .expect("matrix");
        let table = standings(&rows);
        let order: Vec<&str> = table.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(table.iter().all(|s| s.matchups == 2));
        assert!(table[0].mean_winrate > 0.5);
    }

    #[test]
    fn csv_export_has_header_and_one_line_per_row() {
        let rows = round_robin(&roster(), &Balance::reference(), &WorkerPool::default())
            .expect("matrix");
        let mut buffer = Vec::new();
        write_matrix_csv(&rows, &mut buffer).expect("csv");
        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("a_id,b_id,p_a,p_b,delta,top_highlight")
        );
        assert_eq!(lines.count(), rows.len());
    }
}
