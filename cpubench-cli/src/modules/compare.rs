use crate::{
    common::{confirmation, display_name, CatalogArgs, SetKind},
    run_impl_enum,
};
use cpubench_core::{
    compare::{compared_cpus, spec_sheet, SpecRow},
    selection::Selections,
};
use serde::Serialize;
use structopt::StructOpt;
use tracing::{info, warn};

#[derive(StructOpt)]
pub struct Compare {
    #[structopt(flatten)]
    catalog: CatalogArgs,
    /// CPUs to compare; naming one twice takes it back out
    #[structopt(required = true)]
    ids: Vec<String>,
}

#[derive(Serialize)]
struct CompareOutput<'a> {
    cpus: Vec<&'a str>,
    rows: Vec<SpecRow>,
}

run_impl_enum!(Compare, self, ctx, ser, {
    let catalog = self.catalog.load(ctx).await?;

    let mut selections = Selections::default();
    for id in &self.ids {
        let toggled = selections.toggle_compared(id);
        info!("{}", confirmation(SetKind::Comparison, toggled, display_name(&catalog, id)));
    }

    let cpus = compared_cpus(&catalog, &selections.compared);
    if cpus.len() < selections.compared.len() {
        warn!(
            missing = selections.compared.len() - cpus.len(),
            "some compared ids are not in the catalog"
        );
    }

    erased_serde::serialize(
        &CompareOutput {
            cpus: cpus.iter().map(|cpu| cpu.name.as_str()).collect(),
            rows: spec_sheet(&cpus),
        },
        ser,
    )?;
});
