use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    PETAL_LENGTH_COLUMN, Record, SEPAL_LENGTH_COLUMN, SPECIES_COLUMN, Table,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "species": "...", "petal_length_cm": 1.4, "sepal_length_cm": 5.1 }, ...]`
/// * `.parquet` – flat columns `species`, `petal_length_cm`, `sepal_length_cm`
/// * anything else is read as CSV with a header row
///
/// Columns other than the three above are ignored.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    log::debug!("loading {} (extension: {ext:?})", path.display());

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        _ => load_csv(path),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

/// Reject NaN / infinite measurements so they never reach the regression.
fn finite(value: f64, row: usize, col: &str) -> Result<f64> {
    if !value.is_finite() {
        bail!("Row {row}, {col}: {value} is not a finite number");
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one measurement per row.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let species_idx = column(SPECIES_COLUMN)?;
    let petal_idx = column(PETAL_LENGTH_COLUMN)?;
    let sepal_idx = column(SEPAL_LENGTH_COLUMN)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let species = record
            .get(species_idx)
            .with_context(|| format!("CSV row {row_no}: missing '{SPECIES_COLUMN}' field"))?;
        let petal = parse_float(record.get(petal_idx), row_no, PETAL_LENGTH_COLUMN)?;
        let sepal = parse_float(record.get(sepal_idx), row_no, SEPAL_LENGTH_COLUMN)?;

        records.push(Record::new(species, petal, sepal));
    }

    Ok(Table::from_records(records))
}

fn parse_float(field: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let tok = field.with_context(|| format!("CSV row {row}: missing '{col}' field"))?;
    let value = tok
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{tok}' is not a number"))?;
    finite(value, row, col)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "species": "setosa", "petal_length_cm": 1.4, "sepal_length_cm": 5.1 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let species = json_label(obj, i)?;
        let petal = json_number(obj, i, PETAL_LENGTH_COLUMN)?;
        let sepal = json_number(obj, i, SEPAL_LENGTH_COLUMN)?;

        records.push(Record::new(species, petal, sepal));
    }

    Ok(Table::from_records(records))
}

fn json_label(obj: &Map<String, JsonValue>, row: usize) -> Result<String> {
    match obj.get(SPECIES_COLUMN) {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        Some(other) => bail!("Row {row}, {SPECIES_COLUMN}: expected a string, got {other}"),
        None => bail!("Row {row}: missing '{SPECIES_COLUMN}' field"),
    }
}

fn json_number(obj: &Map<String, JsonValue>, row: usize, col: &str) -> Result<f64> {
    let value = match obj.get(col) {
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .with_context(|| format!("Row {row}, {col}: {n} is out of range"))?,
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))?,
        Some(other) => bail!("Row {row}, {col}: expected a number, got {other}"),
        None => bail!("Row {row}: missing '{col}' field"),
    };
    finite(value, row, col)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat measurement columns.
///
/// `species` may be any type castable to Utf8 and the measurements any type
/// castable to Float64. Nulls are rejected.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let index = |name: &str| {
            schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };

        let species = cast(batch.column(index(SPECIES_COLUMN)?), &DataType::Utf8)
            .with_context(|| format!("casting '{SPECIES_COLUMN}' to string"))?;
        let petal = cast(batch.column(index(PETAL_LENGTH_COLUMN)?), &DataType::Float64)
            .with_context(|| format!("casting '{PETAL_LENGTH_COLUMN}' to float"))?;
        let sepal = cast(batch.column(index(SEPAL_LENGTH_COLUMN)?), &DataType::Float64)
            .with_context(|| format!("casting '{SEPAL_LENGTH_COLUMN}' to float"))?;

        let species = species.as_string::<i32>();
        let petal = petal.as_primitive::<Float64Type>();
        let sepal = sepal.as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            for (name, array) in [
                (SPECIES_COLUMN, species as &dyn Array),
                (PETAL_LENGTH_COLUMN, petal as &dyn Array),
                (SEPAL_LENGTH_COLUMN, sepal as &dyn Array),
            ] {
                if array.is_null(row) {
                    bail!("Row {row_no}, {name}: null value");
                }
            }

            records.push(Record::new(
                species.value(row),
                finite(petal.value(row), row_no, PETAL_LENGTH_COLUMN)?,
                finite(sepal.value(row), row_no, SEPAL_LENGTH_COLUMN)?,
            ));
        }
    }

    Ok(Table::from_records(records))
}
