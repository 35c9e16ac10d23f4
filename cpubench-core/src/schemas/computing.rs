use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{
    collections::{BTreeMap, BTreeSet},
    convert::Infallible,
    fmt::Display,
    str::FromStr,
};

/// Stable, unique identity of a catalog entry.
pub type CpuId = String;

/// Scores reported by one benchmark source, keyed by metric (e.g. `cpuScore`).
pub type BenchmarkBlock = BTreeMap<String, f64>;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub enum Brand {
    AMD,
    Intel,
    Apple,
    Other,
}

impl FromStr for Brand {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "amd" => Self::AMD,
            "intel" => Self::Intel,
            "apple" => Self::Apple,
            _ => Self::Other,
        })
    }
}

impl Display for Brand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::AMD => "AMD",
                Self::Intel => "Intel",
                Self::Apple => "Apple",
                Self::Other => "Other",
            }
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Cache {
    pub l1: Option<String>,
    pub l2: Option<String>,
    pub l3: Option<String>,
}

/// One processor model in the catalog.
///
/// This is the only shape the engines ever see; the historic record layouts
/// are folded into it by [`crate::modules::catalog`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cpu {
    pub id: CpuId,
    pub name: String,
    pub brand: Brand,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub socket: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub cores: u32,
    #[serde(default)]
    pub threads: u32,
    /// GHz
    #[serde(default)]
    pub base_clock: f64,
    /// GHz
    #[serde(default)]
    pub boost_clock: f64,
    /// Watts
    #[serde(default)]
    pub tdp: u32,
    /// List price, USD
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub cache: Option<Cache>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Marketplace identifiers, in the order their prices should be looked up.
    #[serde(default)]
    pub asins: Vec<String>,
    /// Benchmark blocks keyed by source name.
    #[serde(default)]
    pub benchmarks: BTreeMap<String, BenchmarkBlock>,
}

impl Cpu {
    pub fn block(&self, source: &str) -> Option<&BenchmarkBlock> {
        self.benchmarks.get(source)
    }

    /// `None` if the block is missing, `Some(0.0)` if the block is there but the metric isn't.
    pub fn score(&self, source: &str, metric: &str) -> Option<f64> {
        self.block(source)
            .map(|block| block.get(metric).copied().unwrap_or(0.0))
    }
}
