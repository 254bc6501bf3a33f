use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{Column, Dataset, Observation};

/// Cell text that stands for a missing value.
const MISSING_MARKERS: [&str; 2] = ["", "NA"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a penguin dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – palmerpenguins layout, header row, `NA` or empty = missing
/// * `.json`    – `[{ "species": "Adelie", "bill_length_mm": 39.1, ... }, ...]`
/// * `.parquet` – one column per field, strings or numbers
///
/// Only `species` is required; other known columns may be absent and unknown
/// columns are ignored.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} penguins from {} ({:?})",
        dataset.len(),
        path.display(),
        dataset.species_counts()
    );
    Ok(dataset)
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// `NaN` and infinities carry no measurement.
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Years must be whole numbers; `2007.0` is accepted, `2007.9` is not.
fn whole_year(value: Option<f64>, row: usize) -> Result<Option<i64>> {
    match value {
        Some(y) if y.fract() != 0.0 || y.abs() > i64::MAX as f64 => {
            bail!("Row {row}, {}: {y} is not a whole year", Column::Year.name())
        }
        other => Ok(other.map(|y| y as i64)),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column positions of the known fields in a header row.
struct CsvLayout {
    species: usize,
    island: Option<usize>,
    bill_length: Option<usize>,
    bill_depth: Option<usize>,
    flipper_length: Option<usize>,
    body_mass: Option<usize>,
    sex: Option<usize>,
    year: Option<usize>,
}

impl CsvLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |column: Column| headers.iter().position(|h| h.trim() == column.name());
        Ok(CsvLayout {
            species: find(Column::Species).context("CSV missing 'species' column")?,
            island: find(Column::Island),
            bill_length: find(Column::BillLength),
            bill_depth: find(Column::BillDepth),
            flipper_length: find(Column::FlipperLength),
            body_mass: find(Column::BodyMass),
            sex: find(Column::Sex),
            year: find(Column::Year),
        })
    }
}

/// Parse CSV text from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let layout = CsvLayout::from_headers(reader.headers().context("reading CSV headers")?)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let text = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|cell| !is_missing(cell))
                .map(|cell| cell.trim().to_string())
        };
        let number = |idx: Option<usize>, column: Column| -> Result<Option<f64>> {
            match idx.and_then(|i| record.get(i)) {
                Some(cell) if !is_missing(cell) => cell
                    .trim()
                    .parse::<f64>()
                    .map(finite)
                    .with_context(|| {
                        format!("Row {row_no}, {}: '{cell}' is not a number", column.name())
                    }),
                _ => Ok(None),
            }
        };

        let species = text(Some(layout.species))
            .with_context(|| format!("Row {row_no}: missing species"))?;

        rows.push(Observation {
            species,
            island: text(layout.island),
            bill_length_mm: number(layout.bill_length, Column::BillLength)?,
            bill_depth_mm: number(layout.bill_depth, Column::BillDepth)?,
            flipper_length_mm: number(layout.flipper_length, Column::FlipperLength)?,
            body_mass_g: number(layout.body_mass, Column::BodyMass)?,
            sex: text(layout.sex),
            year: whole_year(number(layout.year, Column::Year)?, row_no)?,
        });
    }

    Ok(Dataset::from_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "species": "Adelie", "island": "Torgersen", "bill_length_mm": 39.1,
///     "bill_depth_mm": 18.7, "flipper_length_mm": 181, "body_mass_g": 3750,
///     "sex": "male", "year": 2007 },
///   ...
/// ]
/// ```
///
/// `null`, `"NA"` and `""` are missing values.
pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            json_observation(obj, i)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::from_rows(rows))
}

fn json_observation(obj: &Map<String, JsonValue>, row: usize) -> Result<Observation> {
    let species = json_text(obj, Column::Species, row)?
        .with_context(|| format!("Row {row}: missing species"))?;
    Ok(Observation {
        species,
        island: json_text(obj, Column::Island, row)?,
        bill_length_mm: json_number(obj, Column::BillLength, row)?,
        bill_depth_mm: json_number(obj, Column::BillDepth, row)?,
        flipper_length_mm: json_number(obj, Column::FlipperLength, row)?,
        body_mass_g: json_number(obj, Column::BodyMass, row)?,
        sex: json_text(obj, Column::Sex, row)?,
        year: whole_year(json_number(obj, Column::Year, row)?, row)?,
    })
}

fn json_text(obj: &Map<String, JsonValue>, column: Column, row: usize) -> Result<Option<String>> {
    match obj.get(column.name()) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) if is_missing(s) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => bail!("Row {row}, {}: expected text, got {other}", column.name()),
    }
}

fn json_number(obj: &Map<String, JsonValue>, column: Column, row: usize) -> Result<Option<f64>> {
    match obj.get(column.name()) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .map(finite)
            .with_context(|| format!("Row {row}, {}: {n} is not representable", column.name())),
        Some(JsonValue::String(s)) if is_missing(s) => Ok(None),
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(finite)
            .with_context(|| format!("Row {row}, {}: '{s}' is not a number", column.name())),
        Some(other) => bail!("Row {row}, {}: expected a number, got {other}", column.name()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Text columns may be plain or dictionary-encoded strings; measurement
/// columns may be any integer or float type. Works with files written by
/// both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        read_batch(&batch, &mut rows)?;
    }

    Ok(Dataset::from_rows(rows))
}

fn read_batch(batch: &RecordBatch, rows: &mut Vec<Observation>) -> Result<()> {
    let schema = batch.schema();
    let column = |col: Column, to: &DataType| -> Result<Option<ArrayRef>> {
        match schema.index_of(col.name()) {
            Ok(idx) => cast(batch.column(idx).as_ref(), to)
                .map(Some)
                .with_context(|| format!("converting '{}' to {to}", col.name())),
            Err(_) => Ok(None),
        }
    };

    let species_col = column(Column::Species, &DataType::Utf8)?
        .context("Parquet file missing 'species' column")?;
    let island = column(Column::Island, &DataType::Utf8)?;
    let bill_length = column(Column::BillLength, &DataType::Float64)?;
    let bill_depth = column(Column::BillDepth, &DataType::Float64)?;
    let flipper_length = column(Column::FlipperLength, &DataType::Float64)?;
    let body_mass = column(Column::BodyMass, &DataType::Float64)?;
    let sex = column(Column::Sex, &DataType::Utf8)?;
    let year = column(Column::Year, &DataType::Int64)?;

    for row in 0..batch.num_rows() {
        let species = text_at(Some(&species_col), row)
            .with_context(|| format!("Row {row}: missing species"))?;
        rows.push(Observation {
            species,
            island: text_at(island.as_ref(), row),
            bill_length_mm: float_at(bill_length.as_ref(), row),
            bill_depth_mm: float_at(bill_depth.as_ref(), row),
            flipper_length_mm: float_at(flipper_length.as_ref(), row),
            body_mass_g: float_at(body_mass.as_ref(), row),
            sex: text_at(sex.as_ref(), row),
            year: year
                .as_ref()
                .and_then(|col| col.as_primitive_opt::<Int64Type>())
                .filter(|arr| arr.is_valid(row))
                .map(|arr| arr.value(row)),
        });
    }
    Ok(())
}

// -- Arrow helpers (columns already cast to Utf8 / Float64) --

fn text_at(col: Option<&ArrayRef>, row: usize) -> Option<String> {
    let arr = col?.as_string_opt::<i32>()?;
    if arr.is_null(row) {
        return None;
    }
    let value = arr.value(row);
    (!is_missing(value)).then(|| value.to_string())
}

fn float_at(col: Option<&ArrayRef>, row: usize) -> Option<f64> {
    let arr = col?.as_primitive_opt::<Float64Type>()?;
    arr.is_valid(row).then(|| arr.value(row)).and_then(finite)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::chart::{Histogram, ScatterSeries};
    use crate::data::model::NumericAttribute;

    const CSV: &str = "\
rownames,species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year
1,Adelie,Torgersen,39.1,18.7,181,3750,male,2007
2,Adelie,Torgersen,NA,NA,NA,NA,NA,2007
3,Gentoo,Biscoe,46.1,13.2,211,4500,female,2007
4,Chinstrap,Dream,46.5,17.9,192,3500,female,2007
";

    #[test]
    fn csv_reads_palmerpenguins_layout() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        let first = &ds.rows()[0];
        assert_eq!(first.species, "Adelie");
        assert_eq!(first.island.as_deref(), Some("Torgersen"));
        assert_eq!(first.bill_length_mm, Some(39.1));
        assert_eq!(first.body_mass_g, Some(3750.0));
        assert_eq!(first.year, Some(2007));
        assert_eq!(ds.species(), ["Adelie", "Gentoo", "Chinstrap"]);
    }

    #[test]
    fn csv_na_is_missing() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        let second = &ds.rows()[1];
        assert_eq!(second.bill_length_mm, None);
        assert_eq!(second.body_mass_g, None);
        assert_eq!(second.sex, None);
    }

    #[test]
    fn csv_rejects_malformed_numbers() {
        let text = "species,body_mass_g\nAdelie,heavy\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("body_mass_g"));
    }

    #[test]
    fn csv_non_finite_cells_are_missing() {
        let text = "species,bill_depth_mm,body_mass_g\nAdelie,18.0,NaN\nAdelie,17.0,inf\nGentoo,15.0,5000\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.rows()[0].body_mass_g, None);
        assert_eq!(ds.rows()[1].body_mass_g, None);
        assert_eq!(ds.rows()[2].body_mass_g, Some(5000.0));

        let scatter = ScatterSeries::by_species(
            &ds.view_all(),
            NumericAttribute::BodyMass,
            NumericAttribute::BillDepth,
        );
        let hist = Histogram::of(&ds.view_all(), NumericAttribute::BodyMass, 5);
        assert_eq!((scatter.point_count(), scatter.skipped), (1, 2));
        assert_eq!((hist.total(), hist.missing), (1, 2));
    }

    #[test]
    fn fractional_years_are_rejected() {
        let err = read_csv("species,year\nAdelie,2007.9\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("not a whole year"));
        let ds = read_csv("species,year\nAdelie,2007.0\n".as_bytes()).unwrap();
        assert_eq!(ds.rows()[0].year, Some(2007));

        let err = parse_json(r#"[{"species": "Gentoo", "year": 2008.5}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("year"));
    }

    #[test]
    fn csv_requires_species() {
        let text = "island,body_mass_g\nDream,3500\n";
        assert!(read_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn json_records_with_nulls_and_na() {
        let text = r#"[
            {"species": "Gentoo", "bill_length_mm": 46.1, "body_mass_g": 4500, "year": 2008},
            {"species": "Adelie", "bill_length_mm": null, "body_mass_g": "NA", "sex": "NA"}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].body_mass_g, Some(4500.0));
        assert_eq!(ds.rows()[0].year, Some(2008));
        assert_eq!(ds.rows()[1].bill_length_mm, None);
        assert_eq!(ds.rows()[1].body_mass_g, None);
        assert_eq!(ds.rows()[1].sex, None);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(parse_json(r#"{"species": "Adelie"}"#).is_err());
        assert!(parse_json(r#"["Adelie"]"#).is_err());
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 4);

        let other = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_file(other.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }
}
