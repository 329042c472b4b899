use anyhow::Result;
use clap::Parser;

use species_regress::app;
use species_regress::cli::Cli;
use species_regress::config::RunConfig;

fn main() -> Result<()> {
    env_logger::init();

    let config = RunConfig::from(Cli::parse());
    let reports = app::run(&config)?;
    log::info!(
        "wrote {} plot(s) to {}",
        reports.len(),
        config.output_dir.display()
    );
    Ok(())
}
