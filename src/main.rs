use anonymize::Anonymizer;
use config::{update_integration_properties, PersisterConfig};
use read::load_snapshot;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;
use write::save_snapshot;

mod anonymize;
mod balance;
mod config;
mod data;
mod mask;
mod perturb;
mod read;
mod remap;
mod write;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), anyhow::Error> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        anyhow::bail!(
            "usage: {} persister_prod.properties persister_integ.properties",
            args[0]
        );
    }
    setup_logging();
    let (source, target) = (Path::new(&args[1]), Path::new(&args[2]));

    info!("Loading production records");
    let original = load_snapshot(&PersisterConfig::load(source)?)?;

    info!("Anonymizing records");
    let anonymized = Anonymizer::new().anonymize(&original)?;

    info!("Saving anonymized records");
    update_integration_properties(target)?;
    save_snapshot(&PersisterConfig::load(target)?, &anonymized)?;

    let (before, after) = (original.counts(), anonymized.counts());
    info!("Original   record counts: {before}");
    info!("Anonymized record counts: {after}");
    anyhow::ensure!(after.owners == before.owners, "Owners count mismatch");
    anyhow::ensure!(after.accounts == before.accounts, "Account count mismatch");
    anyhow::ensure!(
        after.register_entries == before.register_entries,
        "RegisterEntries count mismatch"
    );
    Ok(())
}
