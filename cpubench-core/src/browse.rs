//! Free-text search and catalog sort orders for the browsing grid.

use anyhow::bail;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{cmp::Ordering, fmt::Display, str::FromStr};

use crate::{
    filter::{filter, FilterSpec},
    schemas::computing::Cpu,
};

/// Case-insensitive match of `query` against name, brand and socket.
pub fn search_matches(cpu: &Cpu, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || cpu.name.to_lowercase().contains(&query)
        || cpu.brand.to_string().to_lowercase().contains(&query)
        || cpu.socket.to_lowercase().contains(&query)
}

pub fn search<'a, I>(items: I, query: &str) -> Vec<&'a Cpu>
where
    I: IntoIterator<Item = &'a Cpu>,
{
    items
        .into_iter()
        .filter(|cpu| search_matches(cpu, query))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub enum SortOption {
    /// cheapest first
    Price,
    Cores,
    BaseClock,
    BoostClock,
    SingleCore,
    MultiCore,
    /// most frugal first
    Tdp,
    /// newest first, undated last
    ReleaseDate,
}

impl SortOption {
    pub const ALL: [SortOption; 8] = [
        Self::Price,
        Self::Cores,
        Self::BaseClock,
        Self::BoostClock,
        Self::SingleCore,
        Self::MultiCore,
        Self::Tdp,
        Self::ReleaseDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Price => "Price",
            Self::Cores => "Core Count",
            Self::BaseClock => "Base Clock",
            Self::BoostClock => "Boost Clock",
            Self::SingleCore => "Single-Core Performance",
            Self::MultiCore => "Multi-Core Performance",
            Self::Tdp => "Power Consumption (TDP)",
            Self::ReleaseDate => "Release Date",
        }
    }

    fn compare(&self, a: &Cpu, b: &Cpu) -> Ordering {
        let legacy = |cpu: &Cpu, metric: &str| cpu.score("benchmarks", metric).unwrap_or(0.0);
        match self {
            Self::Price => a.price.total_cmp(&b.price),
            Self::Cores => b.cores.cmp(&a.cores),
            Self::BaseClock => b.base_clock.total_cmp(&a.base_clock),
            Self::BoostClock => b.boost_clock.total_cmp(&a.boost_clock),
            Self::SingleCore => legacy(b, "singleCore").total_cmp(&legacy(a, "singleCore")),
            Self::MultiCore => legacy(b, "multiCore").total_cmp(&legacy(a, "multiCore")),
            Self::Tdp => a.tdp.cmp(&b.tdp),
            Self::ReleaseDate => b.release_date.cmp(&a.release_date),
        }
    }
}

impl Default for SortOption {
    fn default() -> Self {
        Self::Price
    }
}

impl FromStr for SortOption {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::ALL.iter().find(|option| option.to_string() == s) {
            Some(option) => Ok(*option),
            None => bail!("unknown sort option {:?}", s),
        }
    }
}

impl Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Price => "price",
                Self::Cores => "cores",
                Self::BaseClock => "baseClock",
                Self::BoostClock => "boostClock",
                Self::SingleCore => "singleCore",
                Self::MultiCore => "multiCore",
                Self::Tdp => "tdp",
                Self::ReleaseDate => "releaseDate",
            }
        )
    }
}

/// Stable sort; entries that compare equal keep their relative order.
pub fn sort_by(items: &mut [&Cpu], option: SortOption) {
    items.sort_by(|a, b| option.compare(a, b));
}

/// search, then filter, then sort: what the browsing grid shows.
pub fn browse<'a, I>(items: I, query: &str, spec: &FilterSpec, option: SortOption) -> Vec<&'a Cpu>
where
    I: IntoIterator<Item = &'a Cpu>,
{
    let mut shown = filter(search(items, query), spec);
    sort_by(&mut shown, option);
    shown
}
