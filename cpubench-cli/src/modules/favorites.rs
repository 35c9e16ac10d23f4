use crate::{run_impl_enum, run_impl_struct};
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct Favorites {
    #[structopt(subcommand)]
    action: Action,
}

run_impl_struct!(Favorites, action);

#[derive(StructOpt)]
enum Action {
    /// Print the favorited ids
    List,
    /// Add a CPU to favorites, or take it back out
    Toggle(toggle::SubCommand),
}

run_impl_enum!(Action, self, ctx, ser, {
    match self {
        Self::List => {
            let store = cpubench_core::favorites::FavoritesStore::load(&ctx.config.favorites_path)?;
            erased_serde::serialize(store.ids(), ser)?;
        }
        Self::Toggle(t) => t.run(ctx, ser).await?,
    }
});

mod toggle {
    use crate::{
        common::{confirmation, display_name, CatalogArgs, SetKind},
        run_impl_enum,
    };
    use cpubench_core::{favorites::FavoritesStore, selection::Toggled};
    use serde::Serialize;
    use structopt::StructOpt;
    use tracing::{info, warn};

    #[derive(StructOpt)]
    pub(super) struct SubCommand {
        #[structopt(flatten)]
        catalog: CatalogArgs,
        id: String,
        /// Skip loading the catalog; the confirmation then names the raw id
        #[structopt(long)]
        offline: bool,
    }

    #[derive(Serialize)]
    struct ToggleOutput<'a> {
        id: &'a str,
        toggled: Toggled,
        message: String,
    }

    run_impl_enum!(SubCommand, self, ctx, ser, {
        let catalog = if self.offline {
            Vec::new()
        } else {
            match self.catalog.load(ctx).await {
                Ok(catalog) => catalog,
                Err(err) => {
                    warn!(error = %err, "catalog unavailable; naming the raw id");
                    Vec::new()
                }
            }
        };

        let mut store = FavoritesStore::load(&ctx.config.favorites_path)?;
        let toggled = store.toggle(&self.id)?;
        let message = confirmation(SetKind::Favorites, toggled, display_name(&catalog, &self.id));
        info!("{}", message);

        erased_serde::serialize(
            &ToggleOutput {
                id: &self.id,
                toggled,
                message,
            },
            ser,
        )?;
    });
}
