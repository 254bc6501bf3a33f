use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{Column, Dataset, Observation};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write `dataset` in the format implied by the extension of `path`.
/// Every format written here is readable by [`super::loader::load_file`].
pub fn write_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let written = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::create(path).context("creating CSV file")?;
            write_csv(dataset, file)
        }
        "json" => {
            let file = std::fs::File::create(path).context("creating JSON file")?;
            serde_json::to_writer_pretty(BufWriter::new(file), dataset.rows())
                .context("writing JSON")
        }
        "parquet" | "pq" => write_parquet(dataset, path),
        other => bail!("Unsupported file extension: .{other}"),
    };
    written.with_context(|| format!("writing {}", path.display()))
}

/// CSV with one column per field, `NA` for missing values.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(Column::ALL.iter().map(|c| c.name()))
        .context("writing CSV header")?;
    for (row_no, obs) in dataset.rows().iter().enumerate() {
        writer
            .write_record(Column::ALL.iter().map(|&c| obs.cell(c).to_string()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

fn write_parquet(dataset: &Dataset, path: &Path) -> Result<()> {
    let rows = dataset.rows();
    let text = |get: fn(&Observation) -> Option<&str>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(get).collect::<Vec<_>>()))
    };
    let number = |get: fn(&Observation) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(get).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(Column::Species.name(), DataType::Utf8, false),
        Field::new(Column::Island.name(), DataType::Utf8, true),
        Field::new(Column::BillLength.name(), DataType::Float64, true),
        Field::new(Column::BillDepth.name(), DataType::Float64, true),
        Field::new(Column::FlipperLength.name(), DataType::Float64, true),
        Field::new(Column::BodyMass.name(), DataType::Float64, true),
        Field::new(Column::Sex.name(), DataType::Utf8, true),
        Field::new(Column::Year.name(), DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|o| Some(o.species.as_str())),
            text(|o| o.island.as_deref()),
            number(|o| o.bill_length_mm),
            number(|o| o.bill_depth_mm),
            number(|o| o.flipper_length_mm),
            number(|o| o.body_mass_g),
            text(|o| o.sex.as_deref()),
            Arc::new(Int64Array::from(
                rows.iter().map(|o| o.year).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
