//! Side-by-side specification sheet for the compared CPUs.

use serde::Serialize;

use crate::{
    registry::sources,
    schemas::{computing::Cpu, money::Price},
    selection::IdSet,
};

const MISSING: &str = "-";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpecRow {
    pub label: String,
    /// One cell per compared CPU, in compare order.
    pub cells: Vec<String>,
}

/// The catalog entries in `compared`, in the order they were added. Unknown ids are skipped.
pub fn compared_cpus<'a>(catalog: &'a [Cpu], compared: &IdSet) -> Vec<&'a Cpu> {
    compared
        .iter()
        .filter_map(|id| catalog.iter().find(|cpu| cpu.id == id))
        .collect()
}

fn row<F>(label: &str, cpus: &[&Cpu], cell: F) -> SpecRow
where
    F: Fn(&Cpu) -> Option<String>,
{
    SpecRow {
        label: label.to_string(),
        cells: cpus
            .iter()
            .map(|cpu| cell(*cpu).unwrap_or_else(|| MISSING.to_string()))
            .collect(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

pub fn spec_sheet(cpus: &[&Cpu]) -> Vec<SpecRow> {
    if cpus.is_empty() {
        return Vec::new();
    }

    let mut rows = vec![
        row("Brand", cpus, |cpu| Some(cpu.brand.to_string())),
        row("Architecture", cpus, |cpu| non_empty(&cpu.architecture)),
        row("Cores / Threads", cpus, |cpu| {
            Some(format!("{} / {}", cpu.cores, cpu.threads))
        }),
        row("Base / Boost Clock", cpus, |cpu| {
            Some(format!("{} / {} GHz", cpu.base_clock, cpu.boost_clock))
        }),
        row("TDP", cpus, |cpu| Some(format!("{}W", cpu.tdp))),
        row("Socket", cpus, |cpu| non_empty(&cpu.socket)),
        row("Release Date", cpus, |cpu| {
            cpu.release_date.map(|date| date.format("%Y-%m-%d").to_string())
        }),
        row("Price", cpus, |cpu| Some(Price::usd(cpu.price).to_string())),
    ];

    for source in sources() {
        if !cpus.iter().any(|cpu| cpu.block(source.name).is_some()) {
            continue;
        }
        for tab in source.tabs {
            let label = format!("{} {}", source.display_name, tab.label);
            rows.push(row(&label, cpus, |cpu| {
                let block = cpu.block(source.name)?;
                let score = block.get(tab.key)?;
                Some(match tab.unit {
                    Some(unit) => format!("{} {}", score, unit),
                    None => score.to_string(),
                })
            }));
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::{compared_cpus, spec_sheet};
    use crate::{
        filter::tests::cpu,
        schemas::computing::{Brand, Cpu},
        selection::IdSet,
    };
    use maplit::btreemap;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compared_order_and_unknown_ids() {
        let catalog = vec![cpu("a", Brand::AMD, 8, 300.0), cpu("b", Brand::Intel, 6, 200.0)];
        let compared: IdSet = vec!["b", "gone", "a"].into_iter().collect();
        let ids: Vec<&str> = compared_cpus(&catalog, &compared)
            .iter()
            .map(|cpu| cpu.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_sheet_rows() {
        let mut a = cpu("a", Brand::AMD, 8, 329.0);
        a.benchmarks = btreemap! {
            "passmark".to_string() => btreemap! { "cpuScore".to_string() => 34000.0 },
        };
        let b: Cpu = cpu("b", Brand::Intel, 6, 199.5);

        let sheet = spec_sheet(&[&a, &b]);
        let labels: Vec<&str> = sheet.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Brand",
                "Architecture",
                "Cores / Threads",
                "Base / Boost Clock",
                "TDP",
                "Socket",
                "Release Date",
                "Price",
                "Passmark CPU Score",
                "Passmark Single Thread",
            ]
        );
        assert_eq!(sheet[0].cells, vec!["AMD", "Intel"]);
        assert_eq!(sheet[1].cells, vec!["-", "-"]);
        assert_eq!(sheet[2].cells, vec!["8 / 16", "6 / 12"]);
        assert_eq!(sheet[7].cells, vec!["$329.00", "$199.50"]);
        assert_eq!(sheet[8].cells, vec!["34000", "-"]);
        assert_eq!(sheet[9].cells, vec!["-", "-"]);
    }

    #[test]
    fn test_empty_sheet() {
        assert!(spec_sheet(&[]).is_empty());
    }
}
