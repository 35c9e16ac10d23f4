use crate::{common::CatalogArgs, run_impl_enum};
use anyhow::bail;
use cpubench_core::prices::{LookupOutcome, PriceState, PriceTask};
use serde::Serialize;
use std::sync::Arc;
use structopt::StructOpt;
use tracing::warn;

#[derive(StructOpt)]
pub struct Prices {
    #[structopt(flatten)]
    catalog: CatalogArgs,
    /// Price these catalog CPUs by their marketplace ids (repeatable)
    #[structopt(long = "cpu")]
    cpus: Vec<String>,
    /// Look these marketplace ids up directly, skipping the catalog (repeatable)
    #[structopt(long = "market-id", conflicts_with = "cpus")]
    market_ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupReport {
    market_item_id: String,
    #[serde(flatten)]
    outcome: LookupOutcome,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DirectOutput {
    region: String,
    state: PriceState,
    lookups: Vec<LookupReport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemPrices {
    id: String,
    name: String,
    state: PriceState,
}

run_impl_enum!(Prices, self, ctx, ser, {
    let region = ctx.config.region.clone();
    let aggregator = ctx.config.price_aggregator()?;

    if !self.market_ids.is_empty() {
        // same sequential loop as fetch_outcomes, but Ctrl-C leaves the rest unattempted
        let mut outcomes = Vec::with_capacity(self.market_ids.len());
        let mut interrupted = false;
        for id in &self.market_ids {
            let outcome = if interrupted {
                LookupOutcome::NotAttempted
            } else {
                tokio::select! {
                    outcome = aggregator.lookup_one(id, &region) => outcome,
                    _ = tokio::signal::ctrl_c() => {
                        warn!("interrupted; remaining lookups not attempted");
                        interrupted = true;
                        LookupOutcome::NotAttempted
                    }
                }
            };
            outcomes.push((id.clone(), outcome));
        }
        let quotes = outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.quote().cloned())
            .collect();
        erased_serde::serialize(
            &DirectOutput {
                region,
                state: PriceState::from_quotes(quotes),
                lookups: outcomes
                    .into_iter()
                    .map(|(market_item_id, outcome)| LookupReport {
                        market_item_id,
                        outcome,
                    })
                    .collect(),
            },
            ser,
        )?;
        return Ok(());
    }

    if self.cpus.is_empty() {
        bail!("give at least one --cpu or --market-id");
    }

    let catalog = self.catalog.load(ctx).await?;
    let aggregator = Arc::new(aggregator);

    // one independent fetch per item, like one price widget per card
    let mut pending = Vec::new();
    for id in &self.cpus {
        match catalog.iter().find(|cpu| &cpu.id == id) {
            Some(cpu) => {
                let (task, rx) =
                    PriceTask::spawn(Arc::clone(&aggregator), cpu.asins.clone(), region.clone());
                pending.push((cpu, task, rx));
            }
            None => warn!(id = %id, "not in the catalog"),
        }
    }

    let mut items = Vec::with_capacity(pending.len());
    let mut interrupted = false;
    for (cpu, task, rx) in pending {
        if !interrupted {
            tokio::select! {
                _ = task.finished() => {}
                _ = tokio::signal::ctrl_c() => {
                    warn!("interrupted; discarding outstanding lookups");
                    interrupted = true;
                }
            }
        }
        let state = rx.borrow().clone();
        items.push(ItemPrices {
            id: cpu.id.clone(),
            name: cpu.name.clone(),
            state,
        });
    }

    erased_serde::serialize(&items, ser)?;
});
