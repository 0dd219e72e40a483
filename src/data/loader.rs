use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Sample, TimeSeries};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Accepted headers per required column, compared case-insensitively.
/// `Temps`/`Cx0`/`Cy0` are the headers written by the tunnel software.
const TIME_COLUMNS: &[&str] = &["time", "temps", "t"];
const DRAG_COLUMNS: &[&str] = &["dragforce", "dragcoefficient", "drag", "cx0", "cx"];
const LIFT_COLUMNS: &[&str] = &["liftforce", "liftcoefficient", "lift", "cy0", "cy"];

/// Positions of the three required columns in a header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    time: usize,
    drag: usize,
    lift: usize,
}

impl Columns {
    fn resolve(headers: &[&str], file: &str) -> Result<Self> {
        let find = |aliases: &[&str], column: &'static str| {
            headers
                .iter()
                .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
                .ok_or_else(|| Error::MissingColumn {
                    file: file.to_string(),
                    column,
                    found: headers.join(", "),
                })
        };
        Ok(Columns {
            time: find(TIME_COLUMNS, "time")?,
            drag: find(DRAG_COLUMNS, "dragForce")?,
            lift: find(LIFT_COLUMNS, "liftForce")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Reads one run table into a [`TimeSeries`].
pub trait SeriesLoader {
    fn load_series(&self, path: &Path) -> Result<TimeSeries>;
}

/// File loader dispatching on extension.
///
/// Supported formats:
/// * `.dat` / `.txt` / `.tsv` / none – tab-separated text with a header row
/// * `.csv`     – comma-separated text with a header row
/// * `.json`    – `[{ "time": 0.0, "dragForce": 1.2, "liftForce": 0.4 }, ...]`
/// * `.parquet` – scalar numeric columns
#[derive(Debug, Clone, Copy, Default)]
pub struct TableLoader;

impl SeriesLoader for TableLoader {
    fn load_series(&self, path: &Path) -> Result<TimeSeries> {
        load_file(path)
    }
}

/// Load a run table from a file.  Dispatch by extension.
pub fn load_file(path: &Path) -> Result<TimeSeries> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_delimited(path, b','),
        "" | "dat" | "txt" | "tsv" => load_delimited(path, b'\t'),
        other => Err(Error::UnsupportedFormat {
            file: file_name(path),
            reason: format!("unknown extension .{other}"),
        }),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<TimeSeries> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    read_delimited(file, delimiter, &file_name(path))
}

/// Header row, then one sample per row. Extra columns are ignored.
fn read_delimited<R: std::io::Read>(reader: R, delimiter: u8, file: &str) -> Result<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error(file))?.clone();
    let cols = Columns::resolve(&headers.iter().collect::<Vec<_>>(), file)?;

    let mut samples = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error(file))?;
        let cell = |idx: usize, column: &'static str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            finite(raw.parse::<f64>().ok()).ok_or_else(|| Error::InvalidValue {
                file: file.to_string(),
                row: row_no + 1,
                column,
                value: raw.to_string(),
            })
        };
        samples.push(Sample {
            time: cell(cols.time, "time")?,
            drag: cell(cols.drag, "dragForce")?,
            lift: cell(cols.lift, "liftForce")?,
        });
    }

    Ok(TimeSeries::from_samples(samples))
}

fn csv_error(file: &str) -> impl Fn(csv::Error) -> Error + '_ {
    move |source| Error::Csv {
        file: file.to_string(),
        source,
    }
}

/// Samples must be finite; `NaN` or `inf` would poison every average.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<TimeSeries> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    read_json(&text, &file_name(path))
}

fn read_json(text: &str, file: &str) -> Result<TimeSeries> {
    let root: JsonValue = serde_json::from_str(text).map_err(|source| Error::Json {
        file: file.to_string(),
        source,
    })?;
    let records = root.as_array().ok_or_else(|| Error::UnsupportedFormat {
        file: file.to_string(),
        reason: "expected a top-level JSON array of records".to_string(),
    })?;

    let mut samples = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| Error::UnsupportedFormat {
            file: file.to_string(),
            reason: format!("row {} is not a JSON object", i + 1),
        })?;

        let field = |aliases: &[&str], column: &'static str| -> Result<f64> {
            let (_, value) = obj
                .iter()
                .find(|(k, _)| aliases.iter().any(|a| k.eq_ignore_ascii_case(a)))
                .ok_or_else(|| Error::MissingColumn {
                    file: file.to_string(),
                    column,
                    found: obj.keys().cloned().collect::<Vec<_>>().join(", "),
                })?;
            finite(value.as_f64()).ok_or_else(|| Error::InvalidValue {
                file: file.to_string(),
                row: i + 1,
                column,
                value: value.to_string(),
            })
        };

        samples.push(Sample {
            time: field(TIME_COLUMNS, "time")?,
            drag: field(DRAG_COLUMNS, "dragForce")?,
            lift: field(LIFT_COLUMNS, "liftForce")?,
        });
    }

    Ok(TimeSeries::from_samples(samples))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parquet with one scalar numeric column per quantity (Float64, Float32,
/// Int64 or Int32), as written by `df.to_parquet()`.
fn load_parquet(path: &Path) -> Result<TimeSeries> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let name = file_name(path);
    let parquet_error = |source: parquet::errors::ParquetError| Error::Parquet {
        file: name.clone(),
        source,
    };
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .and_then(|builder| builder.build())
        .map_err(parquet_error)?;

    let mut samples = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|source| Error::Arrow {
            file: name.clone(),
            source,
        })?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let cols = Columns::resolve(&names, &name)?;

        let offset = samples.len();
        let time = numeric_column(batch.column(cols.time), &name, "time", offset)?;
        let drag = numeric_column(batch.column(cols.drag), &name, "dragForce", offset)?;
        let lift = numeric_column(batch.column(cols.lift), &name, "liftForce", offset)?;

        samples.extend(
            time.into_iter()
                .zip(drag)
                .zip(lift)
                .map(|((time, drag), lift)| Sample { time, drag, lift }),
        );
    }

    Ok(TimeSeries::from_samples(samples))
}

/// Read a whole numeric column as `f64`. Nulls and non-finite values are
/// rejected; `offset` is the number of rows in earlier batches.
fn numeric_column(
    col: &Arc<dyn Array>,
    file: &str,
    column: &'static str,
    offset: usize,
) -> Result<Vec<f64>> {
    if let Some(row) = (0..col.len()).find(|&i| col.is_null(i)) {
        return Err(Error::InvalidValue {
            file: file.to_string(),
            row: offset + row + 1,
            column,
            value: "null".to_string(),
        });
    }

    let any = col.as_any();
    let values: Option<Vec<f64>> = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| a.values().iter().copied().collect()),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.values().iter().map(|&v| v as f64).collect()),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.values().iter().map(|&v| v as f64).collect()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.values().iter().map(|&v| v as f64).collect()),
        _ => None,
    };

    let values = values.ok_or_else(|| Error::UnsupportedFormat {
        file: file.to_string(),
        reason: format!("column `{column}` has type {:?}, expected a number", col.data_type()),
    })?;

    match values.iter().position(|v| !v.is_finite()) {
        Some(row) => Err(Error::InvalidValue {
            file: file.to_string(),
            row: offset + row + 1,
            column,
            value: values[row].to_string(),
        }),
        None => Ok(values),
    }
}
