//! Orders a collection by one benchmark metric, with pinned entries floated to the top.

use serde::Serialize;

use crate::{schemas::computing::Cpu, selection::IdSet};

/// The value a CPU is ranked by. Missing metrics and non-finite scores count as zero.
pub fn value(cpu: &Cpu, source: &str, metric: &str) -> Option<f64> {
    cpu.score(source, metric)
        .map(|score| if score.is_finite() { score } else { 0.0 })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ranked<'a> {
    pub cpu: &'a Cpu,
    pub value: f64,
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking<'a> {
    pub entries: Vec<Ranked<'a>>,
    /// Never below 1, so it is always safe to divide by.
    pub max_value: f64,
}

impl<'a> Ranking<'a> {
    pub fn ordered(&self) -> impl Iterator<Item = &'a Cpu> + '_ {
        self.entries.iter().map(|entry| entry.cpu)
    }

    pub fn percent_of_max(&self, entry: &Ranked<'_>) -> f64 {
        entry.value / self.max_value * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank `items` by `source`/`metric`.
///
/// Items without a `source` block are left out. Members of `pinned` that are
/// present come first, in pin order, regardless of their value. Everything else
/// follows, highest value first; equal values keep their input order.
pub fn rank<'a, I>(items: I, source: &str, metric: &str, pinned: &IdSet) -> Ranking<'a>
where
    I: IntoIterator<Item = &'a Cpu>,
{
    let candidates: Vec<Ranked<'a>> = items
        .into_iter()
        .filter_map(|cpu| {
            value(cpu, source, metric).map(|value| Ranked {
                cpu,
                value,
                pinned: pinned.contains(&cpu.id),
            })
        })
        .collect();

    let mut entries: Vec<Ranked<'a>> = pinned
        .iter()
        .filter_map(|id| candidates.iter().find(|entry| entry.cpu.id == id).cloned())
        .collect();

    let mut unpinned: Vec<Ranked<'a>> = candidates
        .into_iter()
        .filter(|entry| !entry.pinned)
        .collect();
    unpinned.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries.extend(unpinned);

    let max_value = entries
        .iter()
        .map(|entry| entry.value)
        .fold(1.0, f64::max);

    Ranking { entries, max_value }
}
