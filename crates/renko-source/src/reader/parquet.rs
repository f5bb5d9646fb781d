//! Parquet tick reader.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, TimeUnit, TimestampMicrosecondType};
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use renko_types::{RawTick, RenkoError, Result};
use std::fmt::Display;
use std::fs::File;
use std::path::Path;

use super::{origin, size_from_f64};
use crate::{FieldSet, LoadedTicks};

pub(super) fn read(path: &Path) -> Result<LoadedTicks> {
    let origin = origin(path);

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)
        .map_err(|e| parse_error(&origin, e))?;
    let fields = FieldSet::new(builder.schema().fields().iter().map(|f| f.name().as_str()));
    fields.require_core(&origin)?;

    let reader = builder.build().map_err(|e| parse_error(&origin, e))?;
    let utc_micros = DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()));

    let mut ticks = Vec::new();
    let mut row = 0;

    for batch in reader {
        let batch = batch.map_err(|e| parse_error(&origin, e))?;
        let column = |name: &str| -> Result<ArrayRef> {
            batch
                .column_by_name(name)
                .cloned()
                .ok_or_else(|| RenkoError::missing_field(name, origin.as_str()))
        };

        let timestamps = cast(&column(FieldSet::TIMESTAMP)?, &utc_micros)
            .map_err(|e| parse_error(&origin, e))?;
        let timestamps = timestamps
            .as_primitive_opt::<TimestampMicrosecondType>()
            .ok_or_else(|| parse_error(&origin, "timestamp column is not a timestamp"))?;

        let prices = to_f64(&column(FieldSet::PRICE)?, &origin)?;
        let prices = prices.as_primitive::<Float64Type>();
        let sizes = match batch.column_by_name(FieldSet::SIZE) {
            Some(col) => Some(to_f64(col, &origin)?),
            None => None,
        };
        let sizes = sizes.as_ref().map(|s| s.as_primitive::<Float64Type>());

        for i in 0..batch.num_rows() {
            let timestamp = timestamps
                .is_valid(i)
                .then(|| DateTime::from_timestamp_micros(timestamps.value(i)))
                .flatten()
                .ok_or_else(|| {
                    RenkoError::invalid_record(row, "timestamp is missing or unparseable")
                })?;
            let price = prices.is_valid(i).then(|| prices.value(i));
            let size = sizes
                .and_then(|s| s.is_valid(i).then(|| s.value(i)))
                .map(|v| size_from_f64(v, row))
                .transpose()?;

            ticks.push(RawTick::new(timestamp, price, size).normalize(row)?);
            row += 1;
        }
    }

    Ok(LoadedTicks {
        ticks,
        fields,
        path: path.to_path_buf(),
    })
}

/// Casts a numeric column to `Float64`.
fn to_f64(column: &ArrayRef, origin: &str) -> Result<ArrayRef> {
    let cast_col = cast(column, &DataType::Float64).map_err(|e| parse_error(origin, e))?;
    if cast_col.as_primitive_opt::<Float64Type>().is_some() {
        Ok(cast_col)
    } else {
        Err(parse_error(origin, "column is not numeric"))
    }
}

fn parse_error(origin: &str, err: impl Display) -> RenkoError {
    RenkoError::Parse(format!("{origin}: {err}"))
}
