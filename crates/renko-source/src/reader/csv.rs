//! CSV tick reader.

use renko_types::{RawTick, RenkoError, Result};
use std::path::Path;

use super::{origin, parse_cell, parse_timestamp, size_from_f64};
use crate::{FieldSet, LoadedTicks};

pub(super) fn read(path: &Path) -> Result<LoadedTicks> {
    let origin = origin(path);
    let parse_err = |e: csv::Error| RenkoError::Parse(format!("{origin}: {e}"));

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(parse_err)?;

    let headers = reader.headers().map_err(parse_err)?.clone();
    let fields = FieldSet::new(headers.iter());
    fields.require_core(&origin)?;

    let column = |name: &str| headers.iter().position(|h| h == name);
    let (Some(ts_col), Some(price_col)) = (column(FieldSet::TIMESTAMP), column(FieldSet::PRICE))
    else {
        return Err(RenkoError::missing_field(FieldSet::TIMESTAMP, origin.as_str()));
    };
    let size_col = column(FieldSet::SIZE);

    let mut ticks = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(parse_err)?;

        let ts_text = record.get(ts_col).unwrap_or_default();
        let timestamp = parse_timestamp(ts_text).ok_or_else(|| {
            RenkoError::invalid_record(row, format!("unparseable timestamp '{ts_text}'"))
        })?;
        let price = parse_cell::<f64>(record.get(price_col), row, FieldSet::PRICE)?;
        let size = match size_col {
            Some(col) => parse_cell::<f64>(record.get(col), row, FieldSet::SIZE)?
                .map(|v| size_from_f64(v, row))
                .transpose()?,
            None => None,
        };

        ticks.push(RawTick::new(timestamp, price, size).normalize(row)?);
    }

    Ok(LoadedTicks {
        ticks,
        fields,
        path: path.to_path_buf(),
    })
}
