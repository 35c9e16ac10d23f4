use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    common::Client,
    modules::{amazon::AmazonLookup, catalog::EndpointCatalog},
    prices::PriceAggregator,
};

/// Where the catalog and prices come from, and how long to wait for them.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Document-store `find` endpoint serving the catalog.
    pub catalog_url: String,
    pub database_name: String,
    pub collection_name: String,
    /// Marketplace price-lookup endpoint.
    pub price_url: String,
    /// Storefront region prices are looked up in, e.g. `com` or `it`.
    pub region: String,
    /// Upper bound on each HTTP request, catalog and price lookups alike.
    pub lookup_timeout_secs: u64,
    pub favorites_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: "http://localhost:3000/api/find".to_string(),
            database_name: "codex".to_string(),
            collection_name: "cpus".to_string(),
            price_url: "http://localhost:3000/api/prices".to_string(),
            region: "com".to_string(),
            lookup_timeout_secs: 10,
            favorites_path: PathBuf::from("favorites.json"),
        }
    }
}

impl Config {
    /// Read a JSON config file. Fields it leaves out keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the given file if there is one.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.lookup_timeout_secs > 0, "lookup_timeout_secs must be positive");
        ensure!(!self.region.trim().is_empty(), "region must not be empty");
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn client(&self) -> anyhow::Result<Client> {
        Client::with_timeout(self.lookup_timeout())
    }

    pub fn catalog(&self) -> anyhow::Result<EndpointCatalog> {
        Ok(EndpointCatalog::new(
            self.client()?,
            &self.catalog_url,
            &self.database_name,
            &self.collection_name,
        ))
    }

    pub fn price_aggregator(&self) -> anyhow::Result<PriceAggregator<AmazonLookup>> {
        Ok(
            PriceAggregator::new(AmazonLookup::new(self.client()?, &self.price_url))
                .with_timeout(self.lookup_timeout()),
        )
    }
}
