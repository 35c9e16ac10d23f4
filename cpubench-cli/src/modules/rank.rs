use crate::{
    common::{confirmation, display_name, CatalogArgs, FilterArgs, SetKind},
    run_impl_enum,
};
use anyhow::anyhow;
use cpubench_core::{
    filter::filter, ranking::rank, registry::ActiveMetric, schemas::computing::Brand,
    selection::Selections,
};
use serde::Serialize;
use structopt::StructOpt;
use tracing::info;

#[derive(StructOpt)]
pub struct Rank {
    #[structopt(flatten)]
    catalog: CatalogArgs,
    #[structopt(flatten)]
    filters: FilterArgs,
    /// Benchmark source to rank by
    #[structopt(long, default_value = "passmark")]
    source: String,
    /// Metric of that source; defaults to its first tab
    #[structopt(long)]
    metric: Option<String>,
    /// Keep this CPU at the top, in the order given (repeatable)
    #[structopt(long = "pin")]
    pins: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankRow<'a> {
    position: usize,
    id: &'a str,
    name: &'a str,
    brand: Brand,
    value: f64,
    /// share of the top value, one decimal
    percent: f64,
    pinned: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankOutput<'a> {
    source: &'static str,
    metric: &'static str,
    max_value: f64,
    rows: Vec<RankRow<'a>>,
}

run_impl_enum!(Rank, self, ctx, ser, {
    let mut active = ActiveMetric::new(&self.source)
        .ok_or_else(|| anyhow!("unknown benchmark source {:?}", self.source))?;
    if let Some(metric) = &self.metric {
        if !active.select_metric(metric) {
            return Err(anyhow!(
                "{} has no metric {:?}",
                active.source().display_name,
                metric
            ));
        }
    }

    let catalog = self.catalog.load(ctx).await?;

    let mut selections = Selections::default();
    for id in &self.pins {
        let toggled = selections.toggle_pinned(id);
        info!("{}", confirmation(SetKind::Pins, toggled, display_name(&catalog, id)));
    }

    let shown = filter(&catalog, &self.filters.spec());
    let ranking = rank(
        shown,
        active.source().name,
        active.metric().key,
        &selections.pinned,
    );

    let rows = ranking
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| RankRow {
            position: index + 1,
            id: &entry.cpu.id,
            name: &entry.cpu.name,
            brand: entry.cpu.brand,
            value: entry.value,
            percent: (ranking.percent_of_max(entry) * 10.0).round() / 10.0,
            pinned: entry.pinned,
        })
        .collect();

    erased_serde::serialize(
        &RankOutput {
            source: active.source().name,
            metric: active.metric().key,
            max_value: ranking.max_value,
            rows,
        },
        ser,
    )?;
});
