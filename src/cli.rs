use std::path::PathBuf;

use clap::Parser;

/// Fit sepal length against petal length for each species in a table and
/// save one scatter plot with its regression line per species.
#[derive(Debug, Parser)]
#[command(name = "species-regress", version)]
pub struct Cli {
    /// Measurement table (.csv, .json or .parquet) with columns
    /// `species`, `petal_length_cm` and `sepal_length_cm`
    pub input: PathBuf,

    /// Directory the `<species>.png` files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// TrueType font for chart text (defaults to a common system font)
    #[arg(long, conflicts_with = "no_text")]
    pub font: Option<PathBuf>,

    /// Draw charts without any text
    #[arg(long)]
    pub no_text: bool,
}
