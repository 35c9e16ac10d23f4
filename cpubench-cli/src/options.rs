use crate::{
    modules::{
        browse::Browse, compare::Compare, favorites::Favorites, prices::Prices, rank::Rank,
        sources::Sources,
    },
    run_impl_enum,
};
use cpubench_core::config::Config;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "cpubench-cli")]
pub struct Options {
    /// JSON config file; every field is optional
    #[structopt(long, parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Storefront region to look prices up in (overrides the config file)
    #[structopt(long)]
    pub region: Option<String>,
    /// Catalog endpoint (overrides the config file)
    #[structopt(long)]
    pub catalog_url: Option<String>,
    /// Price lookup endpoint (overrides the config file)
    #[structopt(long)]
    pub price_url: Option<String>,
    /// Favorites file (overrides the config file)
    #[structopt(long, parse(from_os_str))]
    pub favorites: Option<PathBuf>,
    #[structopt(subcommand)]
    pub command: Command,
}

impl Options {
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(url) = &self.catalog_url {
            config.catalog_url = url.clone();
        }
        if let Some(url) = &self.price_url {
            config.price_url = url.clone();
        }
        if let Some(path) = &self.favorites {
            config.favorites_path = path.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(StructOpt)]
pub enum Command {
    /// List benchmark sources and their metrics
    Sources(Sources),
    /// Rank CPUs by one benchmark metric
    Rank(Rank),
    /// Search, filter and sort the catalog
    Browse(Browse),
    /// Side-by-side specification sheet
    Compare(Compare),
    /// Look up marketplace prices
    Prices(Prices),
    Favorites(Favorites),
}

run_impl_enum!(Command, self, ctx, ser, {
    match self {
        Self::Sources(s) => s.run(ctx, ser).await?,
        Self::Rank(r) => r.run(ctx, ser).await?,
        Self::Browse(b) => b.run(ctx, ser).await?,
        Self::Compare(c) => c.run(ctx, ser).await?,
        Self::Prices(p) => p.run(ctx, ser).await?,
        Self::Favorites(f) => f.run(ctx, ser).await?,
    }
});
