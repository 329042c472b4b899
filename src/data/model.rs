use serde::{Deserialize, Serialize};

/// Column holding the species discriminator.
pub const SPECIES_COLUMN: &str = "species";
/// Column plotted on the x axis.
pub const PETAL_LENGTH_COLUMN: &str = "petal_length_cm";
/// Column plotted on the y axis.
pub const SEPAL_LENGTH_COLUMN: &str = "sepal_length_cm";

// ---------------------------------------------------------------------------
// Record – one row of the input table
// ---------------------------------------------------------------------------

/// A single flower measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub species: String,
    /// Petal length in centimetres (x).
    pub petal_length_cm: f64,
    /// Sepal length in centimetres (y).
    pub sepal_length_cm: f64,
}

impl Record {
    pub fn new(species: impl Into<String>, petal_length_cm: f64, sepal_length_cm: f64) -> Self {
        Record {
            species: species.into(),
            petal_length_cm,
            sepal_length_cm,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All records of one input file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn from_records(records: Vec<Record>) -> Self {
        Table { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SpeciesGroup – rows sharing one species label
// ---------------------------------------------------------------------------

/// Borrowed subset of a [`Table`] whose records all carry `species`.
#[derive(Debug, Clone)]
pub struct SpeciesGroup<'a> {
    pub species: &'a str,
    pub records: Vec<&'a Record>,
}

impl SpeciesGroup<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split into `(petal lengths, sepal lengths)`, preserving row order.
    pub fn xy(&self) -> (Vec<f64>, Vec<f64>) {
        self.records
            .iter()
            .map(|r| (r.petal_length_cm, r.sepal_length_cm))
            .unzip()
    }
}
