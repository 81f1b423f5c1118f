use anyhow::{Context, Result};
use clap::Parser;

mod catalog;
mod cli;
mod collect;
mod logging;
mod manifest;

use catalog::{default_search_path, Catalog, ProviderCatalog};
use cli::RootArgs;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    logging::init(args.verbose);

    let catalog = match args.provider_path.as_deref() {
        Some(list) if !list.trim().is_empty() => ProviderCatalog::from_path_list(list),
        _ => ProviderCatalog::new(default_search_path()),
    };
    generate(&catalog, &args)
}

/// Load the catalog, ask the operator, merge the answers into the manifest.
/// An unconfirmed session writes nothing.
fn generate(catalog: &dyn Catalog, args: &RootArgs) -> Result<()> {
    let tree = catalog.object_tree().context("load job catalog")?;
    let groups = manifest::collect_manifest_entries(&tree)?;

    let Some(answers) = collect::run(&args.title, groups, args.no_tui)? else {
        eprintln!("Manifest not saved.");
        return Ok(());
    };
    manifest::save_manifest(&answers, &args.output_file)
}
