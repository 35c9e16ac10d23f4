use async_trait::async_trait;
use cpubench_core::{
    config::Config,
    filter::FilterSpec,
    modules::catalog::{CatalogSource, FileCatalog},
    schemas::computing::{Brand, Cpu},
    selection::Toggled,
};
use erased_serde::Serializer;
use std::path::PathBuf;
use structopt::StructOpt;

/// Everything a subcommand needs besides its own arguments.
pub struct Context {
    pub config: Config,
}

#[async_trait]
pub trait Run {
    async fn run(
        &self,
        ctx: &Context,
        serializer: &mut (dyn Serializer + Send),
    ) -> anyhow::Result<()>;
}

#[macro_export]
macro_rules! run_impl_enum {
    ($i:ident, $self:ident, $ctx:ident, $ser:ident, $b:block) => {
        #[async_trait::async_trait]
        impl $crate::common::Run for $i {
            async fn run(
                &$self,
                $ctx: &$crate::common::Context,
                $ser: &mut (dyn erased_serde::Serializer + Send),
            ) -> anyhow::Result<()> {
                $b;

                Ok(())
            }
        }
    }
}

#[macro_export]
macro_rules! run_impl_struct {
    ($i:ident, $b:ident) => {
        #[async_trait::async_trait]
        impl $crate::common::Run for $i {
            async fn run(
                &self,
                ctx: &$crate::common::Context,
                serializer: &mut (dyn erased_serde::Serializer + Send),
            ) -> anyhow::Result<()> {
                self.$b.run(ctx, serializer).await
            }
        }
    };
}

#[derive(StructOpt)]
pub(crate) struct CatalogArgs {
    /// Read the catalog from a JSON dump instead of the catalog endpoint
    #[structopt(long, parse(from_os_str))]
    catalog_file: Option<PathBuf>,
}

impl CatalogArgs {
    pub(crate) async fn load(&self, ctx: &Context) -> anyhow::Result<Vec<Cpu>> {
        match &self.catalog_file {
            Some(path) => FileCatalog::new(path).load().await,
            None => ctx.config.catalog()?.load().await,
        }
    }
}

#[derive(StructOpt)]
pub(crate) struct FilterArgs {
    /// Only show these brands (repeatable)
    #[structopt(long = "brand")]
    brands: Vec<Brand>,
    #[structopt(long, default_value = "1")]
    min_cores: u32,
    #[structopt(long, default_value = "128")]
    max_cores: u32,
    #[structopt(long, default_value = "0")]
    min_price: f64,
    #[structopt(long, default_value = "10000")]
    max_price: f64,
    #[structopt(long)]
    socket: Option<String>,
    /// Accepted for compatibility with saved filters; not applied
    #[structopt(long, default_value = "0")]
    min_benchmark: f64,
}

impl FilterArgs {
    pub(crate) fn spec(&self) -> FilterSpec {
        FilterSpec {
            brands: self.brands.iter().copied().collect(),
            min_cores: self.min_cores,
            max_cores: self.max_cores,
            min_price: self.min_price,
            max_price: self.max_price,
            socket: self.socket.clone().unwrap_or_default(),
            min_benchmark: self.min_benchmark,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum SetKind {
    Comparison,
    Pins,
    Favorites,
}

/// The line a user sees after toggling `name` in or out of a set.
pub(crate) fn confirmation(kind: SetKind, toggled: Toggled, name: &str) -> String {
    match (kind, toggled) {
        (SetKind::Comparison, Toggled::Added) => format!("Added {} to comparison", name),
        (SetKind::Comparison, Toggled::Removed) => format!("Removed {} from comparison", name),
        (SetKind::Pins, Toggled::Added) => format!("Pinned {}", name),
        (SetKind::Pins, Toggled::Removed) => format!("Unpinned {}", name),
        (SetKind::Favorites, Toggled::Added) => format!("Added {} to favorites", name),
        (SetKind::Favorites, Toggled::Removed) => format!("Removed {} from favorites", name),
    }
}

/// A display name for `id`, falling back to the id itself.
pub(crate) fn display_name<'a>(catalog: &'a [Cpu], id: &'a str) -> &'a str {
    catalog
        .iter()
        .find(|cpu| cpu.id == id)
        .map(|cpu| cpu.name.as_str())
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::{confirmation, SetKind};
    use cpubench_core::selection::Toggled;

    #[test]
    fn test_confirmations() {
        assert_eq!(
            confirmation(SetKind::Pins, Toggled::Added, "Ryzen 5 5600X"),
            "Pinned Ryzen 5 5600X"
        );
        assert_eq!(
            confirmation(SetKind::Comparison, Toggled::Removed, "M2"),
            "Removed M2 from comparison"
        );
        assert_eq!(
            confirmation(SetKind::Favorites, Toggled::Added, "M2"),
            "Added M2 to favorites"
        );
    }
}
