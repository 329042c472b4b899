use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use plotters::style::RGBColor;

use crate::color::generate_palette;
use crate::config::{RunConfig, TextMode};
use crate::data::filter::{filter_species, species_labels};
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::fonts;
use crate::plot::{Figure, output_file_name};
use crate::regression::{self, LinearFit};

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Outcome for one species.
#[derive(Debug, Clone)]
pub struct SpeciesReport {
    pub species: String,
    pub fit: LinearFit,
    pub path: PathBuf,
}

/// Load the table, then fit and plot every species in first-seen order.
///
/// The first failure aborts the run.
pub fn run(config: &RunConfig) -> Result<Vec<SpeciesReport>> {
    let text = match &config.text {
        TextMode::Auto => fonts::install(None)?,
        TextMode::Font(path) => fonts::install(Some(path.as_path()))?,
        TextMode::Disabled => false,
    };

    let table = load_file(&config.input)?;
    if table.is_empty() {
        bail!("{} contains no records", config.input.display());
    }

    let labels = species_labels(&table);
    check_file_names(&labels)?;

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let palette = generate_palette(labels.len());
    let mut reports = Vec::with_capacity(labels.len());

    for (label, color) in labels.into_iter().zip(palette) {
        let report = plot_species(&table, label, color, text, config)
            .with_context(|| format!("species '{label}'"))?;
        println!("Plot successful: {}", report.path.display());
        reports.push(report);
    }

    Ok(reports)
}

fn plot_species(
    table: &Table,
    species: &str,
    color: RGBColor,
    text: bool,
    config: &RunConfig,
) -> Result<SpeciesReport> {
    let group = filter_species(table, species);
    let (x, y) = group.xy();
    let fit = regression::fit(&x, &y)?;
    log::info!("{species}: {fit}");

    let mut figure = Figure::new(config.width, config.height, text)?;
    figure.draw_regression(species, &x, &y, &fit, color)?;

    let path = config.output_dir.join(output_file_name(species));
    figure.save_png(&path)?;

    Ok(SpeciesReport {
        species: species.to_string(),
        fit,
        path,
    })
}

/// Two labels must never be written to the same file.
///
/// Names are compared case-insensitively so `A` and `a` cannot overwrite
/// each other on case-insensitive filesystems.
fn check_file_names(labels: &[&str]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for &label in labels {
        if let Some(other) = seen.insert(output_file_name(label).to_lowercase(), label) {
            bail!(
                "species '{other}' and '{label}' would both be written to {}",
                output_file_name(label)
            );
        }
    }
    Ok(())
}
