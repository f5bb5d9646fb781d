//! JSON array and NDJSON tick readers.

use renko_types::{RawTick, RenkoError, Result};
use serde_json::{Map, Value};
use std::path::Path;

use super::{origin, parse_cell, parse_timestamp, size_from_f64};
use crate::{FieldSet, LoadedTicks};

type Object = Map<String, Value>;

pub(super) fn read_array(path: &Path) -> Result<LoadedTicks> {
    let text = std::fs::read_to_string(path)?;
    let objects = match serde_json::from_str::<Value>(&text)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(row, item)| into_object(item, row))
            .collect::<Result<Vec<_>>>()?,
        _ => {
            return Err(RenkoError::Parse(format!(
                "{}: expected a JSON array of objects",
                origin(path)
            )));
        }
    };
    convert(path, &objects)
}

pub(super) fn read_lines(path: &Path) -> Result<LoadedTicks> {
    let text = std::fs::read_to_string(path)?;
    let objects = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(row, line)| into_object(serde_json::from_str(line)?, row))
        .collect::<Result<Vec<_>>>()?;
    convert(path, &objects)
}

fn into_object(value: Value, row: usize) -> Result<Object> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RenkoError::invalid_record(
            row,
            format!("expected an object, got {other}"),
        )),
    }
}

fn convert(path: &Path, objects: &[Object]) -> Result<LoadedTicks> {
    let mut fields = FieldSet::default();
    for object in objects {
        for key in object.keys() {
            fields.insert(key.as_str());
        }
    }
    fields.require_core(&origin(path))?;

    let ticks = objects
        .iter()
        .enumerate()
        .map(|(row, object)| to_raw(object, row)?.normalize(row))
        .collect::<Result<Vec<_>>>()?;

    Ok(LoadedTicks {
        ticks,
        fields,
        path: path.to_path_buf(),
    })
}

fn to_raw(object: &Object, row: usize) -> Result<RawTick> {
    let timestamp = match object.get(FieldSet::TIMESTAMP) {
        Some(Value::String(text)) => parse_timestamp(text).ok_or_else(|| {
            RenkoError::invalid_record(row, format!("unparseable timestamp '{text}'"))
        })?,
        Some(other) if !other.is_null() => {
            return Err(RenkoError::invalid_record(
                row,
                format!("timestamp must be a string, got {other}"),
            ));
        }
        _ => return Err(RenkoError::invalid_record(row, "timestamp is missing")),
    };

    let price = number(object.get(FieldSet::PRICE), row, FieldSet::PRICE)?;
    let size = number(object.get(FieldSet::SIZE), row, FieldSet::SIZE)?
        .map(|v| size_from_f64(v, row))
        .transpose()?;

    Ok(RawTick::new(timestamp, price, size))
}

/// Reads a number or numeric string; null and absent are `None`.
fn number(value: Option<&Value>, row: usize, field: &str) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => parse_cell(Some(s.as_str()), row, field),
        Some(other) => Err(RenkoError::invalid_record(
            row,
            format!("{field} must be numeric, got {other}"),
        )),
    }
}
