use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::LazyLock;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use regex::Regex;
use serde_json::Value as JsonValue;

use super::model::{ProductRecord, ProductTable};
use crate::error::DataLoadError;

pub const NAME_COLUMN: &str = "Product Name";
pub const PRICE_COLUMN: &str = "Price";
pub const RATING_COLUMN: &str = "Rating";

/// Currency token stripped from raw price text.
pub const CURRENCY_PREFIX: &str = "KSh";

const REQUIRED_COLUMNS: [&str; 3] = [NAME_COLUMN, PRICE_COLUMN, RATING_COLUMN];

static RATING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("rating pattern is valid"));

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean a listing export.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`           – comma-separated with a header row
/// * `.tsv` / `.tab`  – tab-separated with a header row
/// * `.json`          – `[{ "Product Name": .., "Price": .., "Rating": .. }, ...]`
/// * `.parquet`       – string or numeric `Price` / `Rating` columns
///
/// Rows whose price or rating cannot be cleaned are dropped, not reported.
pub fn load(path: &Path) -> Result<ProductTable, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_delimited(open(path)?, b',')?,
        "tsv" | "tab" => read_delimited(open(path)?, b'\t')?,
        "json" => read_json(open(path)?)?,
        "parquet" | "pq" => read_parquet(open(path)?)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} listings from {}", table.len(), path.display());
    Ok(table)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DataLoadError::NotFound(path.to_path_buf()),
        _ => DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

// ---------------------------------------------------------------------------
// Field cleaning
// ---------------------------------------------------------------------------

/// Strip the currency token and thousands separators, then parse.
///
/// `"KSh 10,000"` → `Some(10000.0)`; `"KSh N/A"` → `None`.
pub fn clean_price(raw: &str) -> Option<f64> {
    let stripped = raw.replace(CURRENCY_PREFIX, "").replace(',', "");
    let price: f64 = stripped.trim().parse().ok()?;
    price.is_finite().then_some(price)
}

/// Pull the first `digits.digits` number out of free text.
///
/// `"4.3 out of 5"` → `Some(4.3)`.  Whole numbers without a decimal point
/// (`"4 out of 5"`) do not match.
pub fn extract_rating(raw: &str) -> Option<f64> {
    let found = RATING_PATTERN.find(raw)?;
    found.as_str().parse().ok().filter(|r| valid_rating(*r))
}

fn valid_rating(rating: f64) -> bool {
    rating.is_finite() && (0.0..=5.0).contains(&rating)
}

/// A raw cell before cleaning.
#[derive(Debug, Clone, Copy)]
enum RawValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl RawValue<'_> {
    fn price(self) -> Option<f64> {
        match self {
            RawValue::Text(s) => clean_price(s),
            RawValue::Number(v) => v.is_finite().then_some(v),
            RawValue::Missing => None,
        }
    }

    fn rating(self) -> Option<f64> {
        match self {
            RawValue::Text(s) => extract_rating(s),
            RawValue::Number(v) => valid_rating(v).then_some(v),
            RawValue::Missing => None,
        }
    }
}

/// Accumulates cleaned rows and counts the ones that were dropped.
#[derive(Default)]
struct Cleaner {
    records: Vec<ProductRecord>,
    dropped: usize,
}

impl Cleaner {
    fn push(&mut self, row: usize, name: &str, price: RawValue<'_>, rating: RawValue<'_>) {
        match (price.price(), rating.rating()) {
            (Some(price), Some(rating)) => {
                self.records
                    .push(ProductRecord::new(name.trim(), price, rating));
            }
            _ => self.drop_row(row, &format!("{price:?} / {rating:?}")),
        }
    }

    fn drop_row(&mut self, row: usize, reason: &str) {
        log::debug!("Dropping row {row}: {reason}");
        self.dropped += 1;
    }

    fn finish(self) -> ProductTable {
        if self.dropped > 0 {
            log::info!(
                "Kept {} rows, dropped {} with unusable price or rating",
                self.records.len(),
                self.dropped
            );
        }
        ProductTable::from_records(self.records)
    }
}

/// Header positions of the three required columns.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    price: usize,
    rating: usize,
}

impl ColumnIndex {
    fn locate<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self, DataLoadError> {
        let headers: Vec<&str> = headers
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let position = |col: &str| headers.iter().position(|h| *h == col);

        match (
            position(NAME_COLUMN),
            position(PRICE_COLUMN),
            position(RATING_COLUMN),
        ) {
            (Some(name), Some(price), Some(rating)) => Ok(Self {
                name,
                price,
                rating,
            }),
            _ => Err(missing_columns(|col| headers.iter().any(|h| *h == col))),
        }
    }
}

fn missing_columns(present: impl Fn(&str) -> bool) -> DataLoadError {
    DataLoadError::MissingColumns(
        REQUIRED_COLUMNS
            .iter()
            .filter(|col| !present(**col))
            .map(|col| col.to_string())
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Read a delimited table with a header row.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<ProductTable, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let columns = ColumnIndex::locate(reader.headers()?.iter())?;

    let mut cleaner = Cleaner::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                cleaner.drop_row(row_no, &e.to_string());
                continue;
            }
        };
        let field = |idx: usize| record.get(idx).map_or(RawValue::Missing, RawValue::Text);
        cleaner.push(
            row_no,
            record.get(columns.name).unwrap_or(""),
            field(columns.price),
            field(columns.rating),
        );
    }

    Ok(cleaner.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')` layout:
///
/// ```json
/// [
///   { "Product Name": "Phone A", "Price": "KSh 10,000", "Rating": "4.5 out of 5" },
///   { "Product Name": "Phone B", "Price": 8999, "Rating": 4.1 }
/// ]
/// ```
pub fn read_json<R: Read>(reader: R) -> Result<ProductTable, DataLoadError> {
    let root: JsonValue = serde_json::from_reader(io::BufReader::new(reader))?;
    let rows = root.as_array().ok_or(DataLoadError::JsonShape)?;

    let objects = rows
        .iter()
        .map(|row| row.as_object().ok_or(DataLoadError::JsonShape))
        .collect::<Result<Vec<_>, _>>()?;

    if !objects.is_empty() {
        let present = |col: &str| objects.iter().any(|obj| obj.contains_key(col));
        if !REQUIRED_COLUMNS.iter().all(|col| present(*col)) {
            return Err(missing_columns(present));
        }
    }

    let mut cleaner = Cleaner::default();
    for (row_no, obj) in objects.iter().enumerate() {
        let name = match obj.get(NAME_COLUMN) {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        cleaner.push(
            row_no,
            &name,
            json_value(obj.get(PRICE_COLUMN)),
            json_value(obj.get(RATING_COLUMN)),
        );
    }

    Ok(cleaner.finish())
}

fn json_value(value: Option<&JsonValue>) -> RawValue<'_> {
    match value {
        Some(JsonValue::String(s)) => RawValue::Text(s),
        Some(JsonValue::Number(n)) => n.as_f64().map_or(RawValue::Missing, RawValue::Number),
        _ => RawValue::Missing,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export.
///
/// `Product Name` must be a string column; `Price` and `Rating` may be
/// strings (cleaned like CSV text) or integer/float columns.
pub fn read_parquet(file: File) -> Result<ProductTable, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let lookup = |col: &str| schema.index_of(col).ok();
    let (Some(name_idx), Some(price_idx), Some(rating_idx)) = (
        lookup(NAME_COLUMN),
        lookup(PRICE_COLUMN),
        lookup(RATING_COLUMN),
    ) else {
        return Err(missing_columns(|col| lookup(col).is_some()));
    };

    let reader = builder.build()?;
    let mut cleaner = Cleaner::default();
    let mut row_offset = 0;

    for batch in reader {
        let batch = batch?;
        let names = batch.column(name_idx);
        let prices = batch.column(price_idx);
        let ratings = batch.column(rating_idx);

        for row in 0..batch.num_rows() {
            let name = match arrow_value(names, NAME_COLUMN, row)? {
                RawValue::Text(s) => s.to_string(),
                RawValue::Number(_) | RawValue::Missing => String::new(),
            };
            cleaner.push(
                row_offset + row,
                &name,
                arrow_value(prices, PRICE_COLUMN, row)?,
                arrow_value(ratings, RATING_COLUMN, row)?,
            );
        }
        row_offset += batch.num_rows();
    }

    Ok(cleaner.finish())
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_value<'a>(
    col: &'a ArrayRef,
    column: &str,
    row: usize,
) -> Result<RawValue<'a>, DataLoadError> {
    if col.is_null(row) {
        return Ok(RawValue::Missing);
    }
    let value = match col.data_type() {
        DataType::Utf8 => RawValue::Text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => RawValue::Text(col.as_string::<i64>().value(row)),
        DataType::Float64 => RawValue::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => RawValue::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => RawValue::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => RawValue::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        other => {
            return Err(DataLoadError::ColumnType {
                column: column.to_string(),
                found: format!("{other:?}"),
            })
        }
    };
    Ok(value)
}
