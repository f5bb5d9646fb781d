//! Apache Parquet output format.

use arrow::array::{ArrayRef, Float64Array, TimestampMicrosecondArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use renko_aggregate::Ohlcv;
use renko_bricks::Brick;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Rows per row group.
    row_group_size: usize,
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a formatter with Snappy compression.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn timestamp_field() -> Field {
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        )
    }

    fn brick_schema() -> Schema {
        Schema::new(vec![
            Self::timestamp_field(),
            Field::new("open", DataType::Float64, false),
            Field::new("high", DataType::Float64, false),
            Field::new("low", DataType::Float64, false),
            Field::new("close", DataType::Float64, false),
        ])
    }

    fn ohlcv_schema() -> Schema {
        Schema::new(vec![
            Self::timestamp_field(),
            Field::new("open", DataType::Float64, false),
            Field::new("high", DataType::Float64, false),
            Field::new("low", DataType::Float64, false),
            Field::new("close", DataType::Float64, false),
            Field::new("volume", DataType::UInt64, false),
            Field::new("tick_count", DataType::UInt32, false),
        ])
    }

    fn timestamps<T>(rows: &[T], ts: impl Fn(&T) -> i64) -> ArrayRef {
        let micros: Vec<_> = rows.iter().map(ts).collect();
        Arc::new(TimestampMicrosecondArray::from(micros).with_timezone("UTC"))
    }

    fn floats<T>(rows: &[T], value: impl Fn(&T) -> f64) -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(value).collect::<Vec<_>>()))
    }

    fn bricks_to_batch(schema: SchemaRef, bricks: &[Brick]) -> Result<RecordBatch, FormatError> {
        RecordBatch::try_new(
            schema,
            vec![
                Self::timestamps(bricks, |b| b.timestamp.timestamp_micros()),
                Self::floats(bricks, |b| b.open),
                Self::floats(bricks, |b| b.high),
                Self::floats(bricks, |b| b.low),
                Self::floats(bricks, |b| b.close),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    fn ohlcv_to_batch(schema: SchemaRef, bars: &[Ohlcv]) -> Result<RecordBatch, FormatError> {
        let volumes: Vec<_> = bars.iter().map(|b| b.volume).collect();
        let tick_counts: Vec<_> = bars.iter().map(|b| b.tick_count).collect();

        RecordBatch::try_new(
            schema,
            vec![
                Self::timestamps(bars, |b| b.timestamp.timestamp_micros()),
                Self::floats(bars, |b| b.open),
                Self::floats(bars, |b| b.high),
                Self::floats(bars, |b| b.low),
                Self::floats(bars, |b| b.close),
                Arc::new(UInt64Array::from(volumes)),
                Arc::new(UInt32Array::from(tick_counts)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    fn write_batches<T, W: Write + Send>(
        &self,
        schema: Schema,
        rows: &[T],
        to_batch: impl Fn(SchemaRef, &[T]) -> Result<RecordBatch, FormatError>,
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(schema);
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = to_batch(Arc::clone(&schema), chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }
}

impl Formatter for ParquetFormatter {
    fn write_bricks<W: Write + Send>(
        &self,
        bricks: &[Brick],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_batches(Self::brick_schema(), bricks, Self::bricks_to_batch, writer)
    }

    fn write_ohlcv<W: Write + Send>(&self, bars: &[Ohlcv], writer: W) -> Result<(), FormatError> {
        self.write_batches(Self::ohlcv_schema(), bars, Self::ohlcv_to_batch, writer)
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
