//! Streaming record reader

use crate::error::{Error, Result};
use serde_json::de::IoRead;
use serde_json::{Deserializer, Map, StreamDeserializer, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Iterator over the records of a JSON stream
pub struct RecordReader<R: Read> {
    values: StreamDeserializer<'static, IoRead<R>, Value>,
    /// Remaining elements of the current top-level array
    pending: std::vec::IntoIter<Value>,
    index: usize,
    failed: bool,
}

impl<R: Read> RecordReader<R> {
    /// Read records from `reader`
    ///
    /// The reader is consumed byte by byte; wrap unbuffered sources in a
    /// [`BufReader`].
    pub fn new(reader: R) -> Self {
        Self {
            values: Deserializer::from_reader(reader).into_iter(),
            pending: Vec::new().into_iter(),
            index: 0,
            failed: false,
        }
    }

    /// Number of records produced so far, including rejected ones
    pub fn records_read(&self) -> usize {
        self.index
    }

    fn record(&mut self, value: Value) -> Result<Map<String, Value>> {
        let index = self.index;
        self.index += 1;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::not_an_object(index, &other)),
        }
    }
}

/// Open an input file, reporting a missing path as [`Error::FileNotFound`]
pub fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.display().to_string(),
        },
        _ => Error::Io(e),
    })
}

impl RecordReader<BufReader<File>> {
    /// Open a file for reading records
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = open_file(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Map<String, Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.pending.next() {
                return Some(self.record(value));
            }
            // The stream cannot resynchronize after a syntax error
            if self.failed {
                return None;
            }

            match self.values.next()? {
                Ok(Value::Array(items)) => self.pending = items.into_iter(),
                Ok(value) => return Some(self.record(value)),
                Err(e) => {
                    self.failed = true;
                    let err = if e.is_io() {
                        Error::Io(e.into())
                    } else {
                        Error::JsonParse(e)
                    };
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Read every record from `reader`, stopping at the first error
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Map<String, Value>>> {
    let records = RecordReader::new(reader).collect::<Result<Vec<_>>>()?;
    tracing::debug!(records = records.len(), "Decoded records");
    Ok(records)
}
