use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Record, RecordTable, Value};
use crate::error::DataLoadError;

type Result<T> = std::result::Result<T, DataLoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the customer table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one customer per line
/// * `.json`    – `[{ "age": 58, "job": "management", ... }, ...]`
/// * `.parquet` – flat scalar columns as written by pandas or polars;
///   integers are read as `Integer`, floats and decimals as `Float`,
///   text, categorical and date columns as `String`
///
/// The table must contain every column named by [`Field`](super::model::Field).
pub fn load_file(path: &Path) -> Result<RecordTable> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    let missing = table.missing_fields();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(
            missing.iter().map(|f| f.column().to_string()).collect(),
        ));
    }

    if table.is_empty() {
        log::warn!("{} contains no records", path.display());
    }
    log::info!(
        "Loaded {} records with columns {:?} from {}",
        table.len(),
        table.column_names,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Cell types are inferred per cell (see [`Value::infer`]).
fn load_csv(path: &Path) -> Result<RecordTable> {
    let csv_err = |source| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();

    for result in reader.records() {
        let row = result.map_err(csv_err)?;

        let fields: BTreeMap<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(col, cell)| (col.clone(), Value::infer(cell.trim())))
            .collect();

        records.push(Record { fields });
    }

    Ok(RecordTable::new(headers, records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "age": 58, "job": "management", "balance": 2143, "y": 0 },
///   ...
/// ]
/// ```
///
/// Column order follows the key order of the first record.
fn load_json(path: &Path) -> Result<RecordTable> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataLoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = root.as_array().ok_or_else(|| DataLoadError::Malformed {
        row: 0,
        message: "expected top-level JSON array".to_string(),
    })?;

    let mut column_names: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| DataLoadError::Malformed {
            row: i,
            message: "not a JSON object".to_string(),
        })?;

        if i == 0 {
            column_names = obj.keys().cloned().collect();
        }

        let fields = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_value(val)))
            .collect();
        records.push(Record { fields });
    }

    Ok(RecordTable::new(column_names, records))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), including categorical (dictionary)
/// columns and narrow or unsigned integer columns.
fn load_parquet(path: &Path) -> Result<RecordTable> {
    let parquet_err = |source| DataLoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| parquet_err(e.into()))?;
        let schema = batch.schema();
        let first_row = records.len();

        let columns = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, col)| normalize_column(field.name(), col, first_row))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let fields = schema
                .fields()
                .iter()
                .zip(&columns)
                .map(|(field, col)| (field.name().clone(), extract_value(col, row)))
                .collect();
            records.push(Record { fields });
        }
    }

    Ok(RecordTable::new(column_names, records))
}

// -- Parquet / Arrow helpers --

/// The column type a source type is read as: `Utf8`, `Int64`, `Float64`,
/// `Boolean` or `Null`. `None` when there is no scalar reading of it.
fn target_type(data_type: &DataType) -> Option<DataType> {
    match data_type {
        DataType::Null => Some(DataType::Null),
        DataType::Boolean => Some(DataType::Boolean),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => Some(DataType::Int64),
        DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal128(..)
        | DataType::Decimal256(..) => Some(DataType::Float64),
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Utf8View
        | DataType::Date32
        | DataType::Date64
        | DataType::Timestamp(..) => Some(DataType::Utf8),
        DataType::Dictionary(_, values) => target_type(values),
        _ => None,
    }
}

/// Cast a column to its [`target_type`]. Values that do not fit (e.g. a
/// `UInt64` above `i64::MAX`) fail instead of turning into nulls.
fn normalize_column(name: &str, col: &ArrayRef, first_row: usize) -> Result<ArrayRef> {
    let source = col.data_type();
    let target = target_type(source).ok_or_else(|| DataLoadError::Malformed {
        row: first_row,
        message: format!("column '{name}' has unsupported type {source}"),
    })?;
    if *source == target {
        return Ok(Arc::clone(col));
    }

    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    cast_with_options(col, &target, &options).map_err(|e| DataLoadError::Malformed {
        row: first_row,
        message: format!("column '{name}' cannot be read as {target}: {e}"),
    })
}

/// Extract a single cell from a column already passed through [`normalize_column`].
fn extract_value(col: &ArrayRef, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        _ => Value::Null,
    }
}
