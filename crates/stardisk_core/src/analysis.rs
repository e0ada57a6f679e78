//! Post-run statistics over a recorded history.

use stardisk_data::CellRecord;

/// Splits a history into its per-tick snapshots.
///
/// Consecutive records sharing a timestamp form one snapshot.
pub fn ticks(history: &[CellRecord]) -> Vec<&[CellRecord]> {
    let mut snapshots = Vec::new();
    let mut start = 0;
    for i in 1..=history.len() {
        if i == history.len() || history[i].t != history[start].t {
            snapshots.push(&history[start..i]);
            start = i;
        }
    }
    snapshots
}

/// Newly formed stars per tick: records at exactly `regen_time`.
///
/// Every recorded tick is counted, the last one included, unlike the older
/// per-frame script that stopped one frame short.
pub fn star_formation_rate(history: &[CellRecord], regen_time: u32) -> Vec<usize> {
    ticks(history)
        .into_iter()
        .map(|snapshot| snapshot.iter().filter(|r| r.age == regen_time).count())
        .collect()
}

pub fn mean_rate(rates: &[usize]) -> f64 {
    if rates.is_empty() {
        return 0.0;
    }
    rates.iter().sum::<usize>() as f64 / rates.len() as f64
}
