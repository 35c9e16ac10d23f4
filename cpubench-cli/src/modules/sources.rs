use crate::run_impl_enum;
use cpubench_core::registry::sources;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct Sources {}

run_impl_enum!(Sources, self, _ctx, ser, {
    erased_serde::serialize(&sources().collect::<Vec<_>>(), ser)?;
});
