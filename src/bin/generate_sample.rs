use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a deterministic iris-like measurement table for trying out
/// `species-regress`.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// CSV output path
    #[arg(short, long, default_value = "sample_iris.csv")]
    output: PathBuf,

    /// Also write the same rows as Parquet next to the CSV
    #[arg(long)]
    parquet: bool,

    /// Rows generated per species
    #[arg(long, default_value_t = 50)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Column order mirrors the classic iris table; the tool only reads three of them.
#[derive(Debug, Serialize)]
struct SampleRow {
    sepal_length_cm: f64,
    sepal_width_cm: f64,
    petal_length_cm: f64,
    petal_width_cm: f64,
    species: &'static str,
}

/// Per-species generator parameters.
struct SpeciesModel {
    name: &'static str,
    petal_mean: f64,
    petal_sd: f64,
    /// sepal = intercept + slope * petal + noise
    intercept: f64,
    slope: f64,
    noise: f64,
    sepal_width_mean: f64,
    petal_width_ratio: f64,
}

const MODELS: [SpeciesModel; 3] = [
    SpeciesModel {
        name: "setosa",
        petal_mean: 1.46,
        petal_sd: 0.17,
        intercept: 4.21,
        slope: 0.54,
        noise: 0.33,
        sepal_width_mean: 3.43,
        petal_width_ratio: 0.17,
    },
    SpeciesModel {
        name: "versicolor",
        petal_mean: 4.26,
        petal_sd: 0.47,
        intercept: 2.41,
        slope: 0.83,
        noise: 0.34,
        sepal_width_mean: 2.77,
        petal_width_ratio: 0.31,
    },
    SpeciesModel {
        name: "virginica",
        petal_mean: 5.55,
        petal_sd: 0.55,
        intercept: 1.06,
        slope: 1.0,
        noise: 0.32,
        sepal_width_mean: 2.97,
        petal_width_ratio: 0.36,
    },
];

/// Seeded xoshiro256** stream; the same `--seed` always yields the same table.
struct SampleRng {
    s: [u64; 4],
}

impl SampleRng {
    /// Expand the seed with splitmix64 so nearby seeds give unrelated streams.
    fn seeded(seed: u64) -> Self {
        let mut z = seed;
        let mut splitmix = || {
            z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut v = z;
            v = (v ^ (v >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            v = (v ^ (v >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            v ^ (v >> 31)
        };
        SampleRng {
            s: [splitmix(), splitmix(), splitmix(), splitmix()],
        }
    }

    fn next_u64(&mut self) -> u64 {
        let [a, b, c, d] = self.s;
        let out = b.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let c = c ^ a;
        let d = d ^ b;
        self.s = [a ^ d, b ^ c, c ^ (b << 17), d.rotate_left(45)];
        out
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        mean + sd * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Measurements are recorded to one decimal, never below 0.1 cm.
fn cm(v: f64) -> f64 {
    ((v * 10.0).round() / 10.0).max(0.1)
}

fn generate(rows_per_species: usize, rng: &mut SampleRng) -> Vec<SampleRow> {
    let mut rows = Vec::with_capacity(rows_per_species * MODELS.len());
    for model in &MODELS {
        for _ in 0..rows_per_species {
            let petal = cm(rng.normal(model.petal_mean, model.petal_sd));
            let sepal = cm(model.intercept + model.slope * petal + rng.normal(0.0, model.noise));
            rows.push(SampleRow {
                sepal_length_cm: sepal,
                sepal_width_cm: cm(rng.normal(model.sepal_width_mean, 0.35)),
                petal_length_cm: petal,
                petal_width_cm: cm(petal * model.petal_width_ratio + rng.normal(0.0, 0.1)),
                species: model.name,
            });
        }
    }
    rows
}

fn write_csv(rows: &[SampleRow], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn f64_column(rows: &[SampleRow], field: impl Fn(&SampleRow) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(rows.iter().map(field).collect::<Vec<_>>()))
}

fn write_parquet(rows: &[SampleRow], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("sepal_length_cm", DataType::Float64, false),
        Field::new("sepal_width_cm", DataType::Float64, false),
        Field::new("petal_length_cm", DataType::Float64, false),
        Field::new("petal_width_cm", DataType::Float64, false),
        Field::new("species", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            f64_column(rows, |r| r.sepal_length_cm),
            f64_column(rows, |r| r.sepal_width_cm),
            f64_column(rows, |r| r.petal_length_cm),
            f64_column(rows, |r| r.petal_width_cm),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.species).collect::<Vec<_>>(),
            )) as ArrayRef,
        ],
    )
    .context("building record batch")?;

    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SampleRng::seeded(args.seed);
    let rows = generate(args.rows, &mut rng);

    write_csv(&rows, &args.output)?;
    println!("Wrote {} rows to {}", rows.len(), args.output.display());

    if args.parquet {
        let path = args.output.with_extension("parquet");
        write_parquet(&rows, &path)?;
        println!("Wrote {} rows to {}", rows.len(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        let a = generate(5, &mut SampleRng::seeded(7));
        let b = generate(5, &mut SampleRng::seeded(7));
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn rows_are_grouped_by_species() {
        let rows = generate(4, &mut SampleRng::seeded(1));
        assert_eq!(rows.len(), 12);
        assert!(rows[..4].iter().all(|r| r.species == "setosa"));
        assert!(rows[8..].iter().all(|r| r.species == "virginica"));
    }

    #[test]
    fn measurements_are_rounded_and_positive() {
        assert_eq!(cm(1.449), 1.4);
        assert_eq!(cm(-3.0), 0.1);
        let rows = generate(20, &mut SampleRng::seeded(3));
        assert!(rows.iter().all(|r| r.petal_length_cm > 0.0 && r.sepal_length_cm > 0.0));
    }
}
