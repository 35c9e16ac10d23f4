//! The benchmark sources a ranking can be drawn from, and the metric tabs each one offers.

use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTab {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSource {
    pub name: &'static str,
    pub display_name: &'static str,
    pub tabs: &'static [MetricTab],
}

impl BenchmarkSource {
    /// The tab that becomes active whenever this source does. Every source has at least one.
    pub fn default_metric(&self) -> &'static MetricTab {
        &self.tabs[0]
    }

    pub fn tab(&self, key: &str) -> Option<&'static MetricTab> {
        self.tabs.iter().find(|tab| tab.key == key)
    }
}

/// Declaration order is display order.
pub static SOURCES: &[BenchmarkSource] = &[
    BenchmarkSource {
        name: "passmark",
        display_name: "Passmark",
        tabs: &[
            MetricTab {
                key: "cpuScore",
                label: "CPU Score",
                unit: None,
            },
            MetricTab {
                key: "threadScore",
                label: "Single Thread",
                unit: None,
            },
        ],
    },
    BenchmarkSource {
        name: "geekbench",
        display_name: "Geekbench",
        tabs: &[
            MetricTab {
                key: "singleScore",
                label: "Single Core",
                unit: None,
            },
            MetricTab {
                key: "multiScore",
                label: "Multi Core",
                unit: None,
            },
        ],
    },
    BenchmarkSource {
        name: "benchmarks",
        display_name: "Legacy",
        tabs: &[
            MetricTab {
                key: "singleCore",
                label: "Single-Core Performance",
                unit: None,
            },
            MetricTab {
                key: "multiCore",
                label: "Multi-Core Performance",
                unit: None,
            },
            MetricTab {
                key: "gaming",
                label: "Gaming",
                unit: Some("fps"),
            },
        ],
    },
];

pub fn sources() -> impl Iterator<Item = &'static BenchmarkSource> {
    SOURCES.iter()
}

pub fn source_by_name(name: &str) -> Option<&'static BenchmarkSource> {
    SOURCES.iter().find(|source| source.name == name)
}

/// The source/metric pair a ranking view is currently showing.
///
/// Switching source always lands on that source's first tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveMetric {
    source: &'static BenchmarkSource,
    metric: &'static MetricTab,
}

impl ActiveMetric {
    pub fn new(source: &str) -> Option<Self> {
        let source = source_by_name(source)?;
        Some(Self {
            source,
            metric: source.default_metric(),
        })
    }

    pub fn source(&self) -> &'static BenchmarkSource {
        self.source
    }

    pub fn metric(&self) -> &'static MetricTab {
        self.metric
    }

    /// Returns `false` (and changes nothing) if no source goes by `name`.
    pub fn switch_source(&mut self, name: &str) -> bool {
        match Self::new(name) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }

    /// Returns `false` (and changes nothing) if the active source has no such tab.
    pub fn select_metric(&mut self, key: &str) -> bool {
        match self.source.tab(key) {
            Some(tab) => {
                self.metric = tab;
                true
            }
            None => false,
        }
    }
}

impl Default for ActiveMetric {
    fn default() -> Self {
        Self {
            source: &SOURCES[0],
            metric: SOURCES[0].default_metric(),
        }
    }
}
