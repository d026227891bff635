mod args;
mod classifier;
mod error;
mod line_reader;
mod lookup;
mod output;
mod report;
mod tally;
mod tests;

use std::{path::Path, time::Instant};

use anyhow::Context;
use args::{Cli, ConfigFile};
use classifier::classify_flow_log;
use clap::Parser;
use log::{debug, error, info, warn};
use lookup::{load_lookup_table, UNTAGGED};
use output::export_report;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading configuration file: {:?}", e);
            std::process::exit(1);
        }
    };

    run_with_config(config);
}

/// Uses the config file when one is given, the command line otherwise.
fn load_config(mut cli: Cli) -> anyhow::Result<ConfigFile> {
    match cli.config_file.take() {
        Some(config_path) => confy::load_path::<ConfigFile>(&config_path)
            .with_context(|| format!("failed to load {}", config_path)),
        None => Ok(ConfigFile::from(cli)),
    }
}

fn run_with_config(config: ConfigFile) {
    debug!("Running with configuration: {:?}", config);
    let start = Instant::now();

    let lookup = load_lookup_table(Path::new(&config.input.lookup));
    if let Some(e) = &lookup.error {
        error!("Error reading lookup table: {}", e);
    }
    let table = lookup.value;
    if table.is_empty() {
        warn!("Lookup table is empty, every flow will be tagged {}", UNTAGGED);
    } else {
        info!("Loaded {} lookup entries", table.len());
    }

    let classified = classify_flow_log(
        Path::new(&config.input.flow_log),
        &table,
        &config.layout,
    );
    if let Some(e) = &classified.error {
        error!("Error reading flow logs: {}", e);
    }
    let tallies = classified.value;
    if !tallies.is_consistent() {
        warn!("Tag and port/protocol counts disagree with the number of valid records");
    }

    if let Err(e) = export_report(&config.output, &tallies) {
        error!("Error writing output: {}", e);
    }

    info!(
        "Classified {} flow records into {} tags, {} untagged ({} lines skipped)",
        tallies.valid_records,
        tallies.tags.len(),
        tallies.tags.get(UNTAGGED),
        tallies.skipped_records
    );
    info!("Duration: {:.4} seconds", start.elapsed().as_secs_f64());
}
