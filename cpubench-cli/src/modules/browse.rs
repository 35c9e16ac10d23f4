use crate::{
    common::{CatalogArgs, FilterArgs},
    run_impl_enum,
};
use cpubench_core::{
    browse::{browse, SortOption},
    favorites::FavoritesStore,
    schemas::{computing::Cpu, money::Price},
};
use serde::Serialize;
use structopt::StructOpt;
use tracing::info;

#[derive(StructOpt)]
pub struct Browse {
    #[structopt(flatten)]
    catalog: CatalogArgs,
    #[structopt(flatten)]
    filters: FilterArgs,
    /// Match against name, brand or socket
    #[structopt(long, default_value = "")]
    search: String,
    /// price, cores, baseClock, boostClock, singleCore, multiCore, tdp or releaseDate
    #[structopt(long, default_value = "price")]
    sort: SortOption,
    /// Only show favorited CPUs
    #[structopt(long)]
    favorites_only: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Card<'a> {
    #[serde(flatten)]
    cpu: &'a Cpu,
    list_price: String,
    favorite: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrowseOutput<'a> {
    sort: SortOption,
    sort_label: &'static str,
    count: usize,
    cpus: Vec<Card<'a>>,
}

run_impl_enum!(Browse, self, ctx, ser, {
    let catalog = self.catalog.load(ctx).await?;
    let favorites = FavoritesStore::load(&ctx.config.favorites_path)?;

    let cards: Vec<Card> = browse(&catalog, &self.search, &self.filters.spec(), self.sort)
        .into_iter()
        .map(|cpu| Card {
            cpu,
            list_price: Price::usd(cpu.price).to_string(),
            favorite: favorites.contains(&cpu.id),
        })
        .filter(|card| !self.favorites_only || card.favorite)
        .collect();

    if cards.is_empty() {
        info!("no CPUs match; try adjusting the filters or search query");
    }

    erased_serde::serialize(
        &BrowseOutput {
            sort: self.sort,
            sort_label: self.sort.label(),
            count: cards.len(),
            cpus: cards,
        },
        ser,
    )?;
});
