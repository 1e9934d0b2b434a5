use std::io::{BufRead, Write};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Decoder, Encoder};
use crate::error::{CodecError, CodecResult, Direction};

/// One CSV row keyed by column name, in column order.
pub type Record = IndexMap<String, String>;

/// Tabular data in one of the two shapes the CSV codec understands.
#[derive(Debug, Clone, PartialEq)]
pub enum CsvData {
    /// Uniform records; the header is taken from the keys of the first record.
    Records(Vec<Record>),
    /// Plain rows. Writing requires a header.
    Rows {
        header: Option<Vec<String>>,
        rows: Vec<Vec<String>>,
    },
}

impl CsvData {
    /// Header and rows. Records yield the keys of the first record as header.
    pub fn into_rows(self) -> (Option<Vec<String>>, Vec<Vec<String>>) {
        match self {
            CsvData::Rows { header, rows } => (header, rows),
            CsvData::Records(records) => {
                let header: Option<Vec<String>> =
                    records.first().map(|first| first.keys().cloned().collect());
                let rows = match &header {
                    Some(header) => records
                        .into_iter()
                        .map(|mut record| {
                            header
                                .iter()
                                .map(|name| record.swap_remove(name).unwrap_or_default())
                                .collect()
                        })
                        .collect(),
                    None => Vec::new(),
                };
                (header, rows)
            }
        }
    }

    /// Field-name keyed records. Rows are zipped with the header.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            CsvData::Records(records) => records,
            CsvData::Rows { header, rows } => {
                let header = header.unwrap_or_default();
                rows.into_iter()
                    .map(|row| header.iter().cloned().zip(row).collect())
                    .collect()
            }
        }
    }
}

/// Output shape selected when reading.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub enum CsvShape {
    /// `(header, rows)`.
    #[default]
    Rows,
    /// Field-name keyed records.
    Records,
}

/// CSV through the `csv` crate.
#[derive(Debug, Copy, Clone)]
pub struct CsvCodec {
    delimiter: u8,
    shape: CsvShape,
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self {
            delimiter: b',',
            shape: CsvShape::Rows,
        }
    }
}

impl CsvCodec {
    pub fn new(shape: CsvShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn write_records(&self, writer: &mut dyn Write, records: &[Record]) -> CodecResult<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let header: Vec<&str> = first.keys().map(String::as_str).collect();

        let mut csv = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);
        csv.write_record(&header)
            .map_err(|e| csv_error(e, Direction::Write))?;

        for (n, record) in records.iter().enumerate() {
            if let Some(extra) = record.keys().find(|k| !first.contains_key(k.as_str())) {
                return Err(CodecError::invalid(format!(
                    "record {n} contains field '{extra}' which is not in the header"
                )));
            }
            let row = header
                .iter()
                .map(|name| record.get(*name).map(String::as_str).unwrap_or(""));
            csv.write_record(row)
                .map_err(|e| csv_error(e, Direction::Write))?;
        }
        csv.flush()?;
        Ok(())
    }

    fn write_rows(
        &self,
        writer: &mut dyn Write,
        header: Option<&[String]>,
        rows: &[Vec<String>],
    ) -> CodecResult<()> {
        let Some(header) = header else {
            return Err(CodecError::invalid(
                "a header is required when using a list of lists for CSV file data",
            ));
        };

        let mut csv = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);
        csv.write_record(header)
            .map_err(|e| csv_error(e, Direction::Write))?;
        for row in rows {
            csv.write_record(row)
                .map_err(|e| csv_error(e, Direction::Write))?;
        }
        csv.flush()?;
        Ok(())
    }
}

impl Encoder<CsvData> for CsvCodec {
    fn encode(&self, writer: &mut dyn Write, value: &CsvData) -> CodecResult<()> {
        match value {
            CsvData::Records(records) => self.write_records(writer, records),
            CsvData::Rows { header, rows } => self.write_rows(writer, header.as_deref(), rows),
        }
    }
}

impl Decoder<CsvData> for CsvCodec {
    fn decode(&self, reader: &mut dyn BufRead) -> CodecResult<CsvData> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_reader(reader);

        let mut rows = Vec::new();
        for row in csv.records() {
            let row = row.map_err(|e| csv_error(e, Direction::Read))?;
            rows.push(row.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let mut rows = rows.into_iter();
        let header = rows.next();
        let rows: Vec<Vec<String>> = rows.collect();

        match self.shape {
            CsvShape::Rows => Ok(CsvData::Rows { header, rows }),
            CsvShape::Records => Ok(CsvData::Records(
                CsvData::Rows { header, rows }.into_records(),
            )),
        }
    }
}

fn csv_error(err: csv::Error, direction: Direction) -> CodecError {
    if !err.is_io_error() {
        let cause = anyhow::Error::new(err);
        return match direction {
            Direction::Write => CodecError::Invalid(cause.context("failed to write CSV data")),
            Direction::Read => CodecError::Corrupt(cause.context("failed to read CSV data")),
        };
    }
    match err.into_kind() {
        csv::ErrorKind::Io(e) => CodecError::Io(e),
        kind => CodecError::corrupt(format!("{kind:?}")),
    }
}

/// Accepts an array of objects. An array of arrays has no header and is rejected.
pub(crate) fn data_from_value(value: Value) -> CodecResult<CsvData> {
    let Value::Array(items) = value else {
        return Err(CodecError::invalid(
            "CSV data must be a list of records or a list of rows",
        ));
    };
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(fields) => records.push(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, scalar_to_string(v)))
                    .collect(),
            ),
            Value::Array(_) => {
                return Err(CodecError::invalid(
                    "a header is required when using a list of lists for CSV file data",
                ));
            }
            _ => return Err(CodecError::invalid("the data is not writable as CSV")),
        }
    }
    Ok(CsvData::Records(records))
}

pub(crate) fn data_to_value(data: CsvData) -> Value {
    Value::Array(
        data.into_records()
            .into_iter()
            .map(|record| {
                Value::Object(
                    record
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect::<Map<_, _>>(),
                )
            })
            .collect(),
    )
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
