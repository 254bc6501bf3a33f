use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::selection::SelectionError;

/// Species labels of the Palmer Penguins dataset, in sidebar order.
pub const KNOWN_SPECIES: [&str; 3] = ["Adelie", "Gentoo", "Chinstrap"];

// ---------------------------------------------------------------------------
// NumericAttribute – the measurement columns a histogram can bin
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NumericAttribute {
    #[default]
    #[serde(rename = "bill_length_mm")]
    BillLength,
    #[serde(rename = "bill_depth_mm")]
    BillDepth,
    #[serde(rename = "flipper_length_mm")]
    FlipperLength,
    #[serde(rename = "body_mass_g")]
    BodyMass,
}

impl NumericAttribute {
    pub const ALL: [NumericAttribute; 4] = [
        NumericAttribute::BillLength,
        NumericAttribute::BillDepth,
        NumericAttribute::FlipperLength,
        NumericAttribute::BodyMass,
    ];

    /// Column name in the source data, also used as the axis key.
    pub fn column(self) -> &'static str {
        match self {
            NumericAttribute::BillLength => "bill_length_mm",
            NumericAttribute::BillDepth => "bill_depth_mm",
            NumericAttribute::FlipperLength => "flipper_length_mm",
            NumericAttribute::BodyMass => "body_mass_g",
        }
    }

    /// Human-readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            NumericAttribute::BillLength => "Bill Length (mm)",
            NumericAttribute::BillDepth => "Bill Depth (mm)",
            NumericAttribute::FlipperLength => "Flipper Length (mm)",
            NumericAttribute::BodyMass => "Body Mass (g)",
        }
    }

    pub fn value_of(self, obs: &Observation) -> Option<f64> {
        match self {
            NumericAttribute::BillLength => obs.bill_length_mm,
            NumericAttribute::BillDepth => obs.bill_depth_mm,
            NumericAttribute::FlipperLength => obs.flipper_length_mm,
            NumericAttribute::BodyMass => obs.body_mass_g,
        }
    }
}

impl fmt::Display for NumericAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for NumericAttribute {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumericAttribute::ALL
            .into_iter()
            .find(|attr| attr.column() == s)
            .ok_or_else(|| SelectionError::UnknownAttribute(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the dataset
// ---------------------------------------------------------------------------

/// One penguin measurement. Missing measurements are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub species: String,
    pub island: Option<String>,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<String>,
    pub year: Option<i64>,
}

impl Observation {
    /// Read a single cell for table display and sorting.
    pub fn cell(&self, column: Column) -> CellValue<'_> {
        fn text(v: &Option<String>) -> CellValue<'_> {
            v.as_deref().map_or(CellValue::Missing, CellValue::Text)
        }
        fn number(v: Option<f64>) -> CellValue<'static> {
            v.map_or(CellValue::Missing, CellValue::Number)
        }
        match column {
            Column::Species => CellValue::Text(&self.species),
            Column::Island => text(&self.island),
            Column::BillLength => number(self.bill_length_mm),
            Column::BillDepth => number(self.bill_depth_mm),
            Column::FlipperLength => number(self.flipper_length_mm),
            Column::BodyMass => number(self.body_mass_g),
            Column::Sex => text(&self.sex),
            Column::Year => self.year.map_or(CellValue::Missing, CellValue::Integer),
        }
    }
}

// ---------------------------------------------------------------------------
// Column / CellValue – tabular access to observations
// ---------------------------------------------------------------------------

/// Columns of the dataset, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Species,
    Island,
    BillLength,
    BillDepth,
    FlipperLength,
    BodyMass,
    Sex,
    Year,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Species,
        Column::Island,
        Column::BillLength,
        Column::BillDepth,
        Column::FlipperLength,
        Column::BodyMass,
        Column::Sex,
        Column::Year,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Species => "species",
            Column::Island => "island",
            Column::BillLength => "bill_length_mm",
            Column::BillDepth => "bill_depth_mm",
            Column::FlipperLength => "flipper_length_mm",
            Column::BodyMass => "body_mass_g",
            Column::Sex => "sex",
            Column::Year => "year",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Species | Column::Island | Column::Sex)
    }
}

/// A borrowed table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
    Integer(i64),
    Missing,
}

impl CellValue<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Order two present cells of the same column. Missing cells compare
    /// equal to everything here; callers place them explicitly.
    pub fn cmp_present(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Missing => write!(f, "NA"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full, immutable set of observations. Cloning shares the rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Arc<[Observation]>,
    /// Species labels in order of first appearance.
    species: Arc<[String]>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<Observation>) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let species: Vec<String> = rows
            .iter()
            .filter(|obs| seen.insert(obs.species.as_str()))
            .map(|obs| obs.species.clone())
            .collect();
        Dataset {
            rows: rows.into(),
            species: species.into(),
        }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Species labels present in the data, in order of first appearance.
    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn species_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for obs in self.rows.iter() {
            *counts.entry(obs.species.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// A view over every row.
    pub fn view_all(&self) -> DatasetView {
        DatasetView {
            dataset: self.clone(),
            indices: (0..self.len()).collect::<Vec<_>>().into(),
        }
    }

    fn same_rows(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}

// ---------------------------------------------------------------------------
// DatasetView – an ordered subset of a dataset
// ---------------------------------------------------------------------------

/// Row indices into a [`Dataset`], in original relative order.
#[derive(Debug, Clone)]
pub struct DatasetView {
    dataset: Dataset,
    indices: Arc<[usize]>,
}

impl DatasetView {
    /// Indices must be ascending and in bounds for `dataset`.
    pub(crate) fn from_indices(dataset: Dataset, indices: Vec<usize>) -> Self {
        DatasetView {
            dataset,
            indices: indices.into(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.indices
            .iter()
            .filter_map(move |&i| self.dataset.get(i))
    }

    /// Species labels present in this view, in order of first appearance.
    pub fn species(&self) -> Vec<&str> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        self.iter()
            .map(|obs| obs.species.as_str())
            .filter(|s| seen.insert(s))
            .collect()
    }
}

impl PartialEq for DatasetView {
    fn eq(&self, other: &Self) -> bool {
        self.dataset.same_rows(&other.dataset) && self.indices == other.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(species: &str, mass: Option<f64>) -> Observation {
        Observation {
            species: species.to_string(),
            body_mass_g: mass,
            ..Default::default()
        }
    }

    #[test]
    fn attribute_parses_column_names() {
        for attr in NumericAttribute::ALL {
            assert_eq!(attr.column().parse::<NumericAttribute>().unwrap(), attr);
        }
        assert_eq!(
            "beak".parse::<NumericAttribute>(),
            Err(SelectionError::UnknownAttribute("beak".into()))
        );
    }

    #[test]
    fn species_in_order_of_first_appearance() {
        let ds = Dataset::from_rows(vec![
            obs("Gentoo", None),
            obs("Adelie", None),
            obs("Gentoo", None),
            obs("Chinstrap", None),
        ]);
        assert_eq!(ds.species(), ["Gentoo", "Adelie", "Chinstrap"]);
        assert_eq!(ds.species_counts().get("Gentoo"), Some(&2));
    }

    #[test]
    fn missing_cells_display_as_na() {
        let o = obs("Adelie", None);
        assert_eq!(o.cell(Column::BodyMass).to_string(), "NA");
        assert_eq!(o.cell(Column::Species).to_string(), "Adelie");
        assert!(o.cell(Column::Year).is_missing());
    }

    #[test]
    fn views_compare_by_source_and_rows() {
        let ds = Dataset::from_rows(vec![obs("Adelie", Some(1.0)), obs("Gentoo", None)]);
        let other = Dataset::from_rows(ds.rows().to_vec());
        assert_eq!(ds.view_all(), ds.view_all());
        assert_ne!(ds.view_all(), other.view_all());
        assert_eq!(ds.view_all().species(), vec!["Adelie", "Gentoo"]);
    }
}
