//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::InferenceConfig;
use crate::decode::{open_file, read_records, RecordReader};
use crate::error::{Error, Result, ResultExt};
use crate::schema::{
    merge_schemas, Diagnostic, DiagnosticSink, LogSink, Schema, SchemaInferrer,
};
use serde_json::{json, Map, Value};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its output
    pub fn run(&self) -> Result<()> {
        let output = self.execute()?;
        self.output_message(&output);
        Ok(())
    }

    /// Run the CLI command and return its output document
    pub fn execute(&self) -> Result<Value> {
        match &self.cli.command {
            Commands::Infer {
                files,
                text_threshold,
                no_dates,
                parallel,
                conflicts,
            } => {
                let inferrer = self.inferrer(*text_threshold, *no_dates)?;
                self.infer(&inferrer, files, *parallel, *conflicts)
            }
            Commands::Merge { files, conflicts } => self.merge(files, *conflicts),
            Commands::Classify { value, name } => self.classify(value, name),
        }
    }

    /// Build the inferrer from the config file and flag overrides
    fn inferrer(&self, text_threshold: Option<usize>, no_dates: bool) -> Result<SchemaInferrer> {
        let mut config = match &self.cli.config {
            Some(path) => InferenceConfig::from_file(path)?,
            None => InferenceConfig::default(),
        };
        if let Some(threshold) = text_threshold {
            config.text_threshold = threshold;
        }
        if no_dates {
            config.detect_dates = false;
        }
        config.validate()?;

        if self.cli.verbose {
            tracing::info!(
                text_threshold = config.text_threshold,
                detect_dates = config.detect_dates,
                "Inference settings"
            );
        }
        Ok(SchemaInferrer::with_config(config))
    }

    /// Infer a schema from record files or stdin
    fn infer(
        &self,
        inferrer: &SchemaInferrer,
        files: &[PathBuf],
        parallel: bool,
        conflicts: bool,
    ) -> Result<Value> {
        let mut collected: Vec<Diagnostic> = Vec::new();

        let (schema, count) = {
            let mut log = LogSink;
            let sink: &mut dyn DiagnosticSink = if conflicts {
                &mut collected
            } else {
                &mut log
            };

            if parallel {
                let records = Self::load_records(files)?;
                let count = records.len();
                (inferrer.infer_parallel(&records, sink), count)
            } else {
                let mut schema = Schema::new();
                let count = Self::for_each_record(files, |record| {
                    schema = inferrer.accumulate(std::mem::take(&mut schema), &record, sink);
                })?;
                (schema, count)
            }
        };

        tracing::info!(records = count, fields = schema.len(), "Schema inferred");
        Self::with_conflicts(&schema, conflicts.then_some(collected))
    }

    /// Merge schema documents
    fn merge(&self, files: &[PathBuf], conflicts: bool) -> Result<Value> {
        let mut collected: Vec<Diagnostic> = Vec::new();

        let schema = {
            let mut log = LogSink;
            let sink: &mut dyn DiagnosticSink = if conflicts {
                &mut collected
            } else {
                &mut log
            };

            let mut schema = Schema::new();
            for path in files {
                let incoming = Self::load_schema(path)?;
                schema = merge_schemas(schema, incoming, sink);
            }
            schema
        };

        Self::with_conflicts(&schema, conflicts.then_some(collected))
    }

    /// Classify an inline value
    fn classify(&self, value: &str, name: &str) -> Result<Value> {
        let value: Value = serde_json::from_str(value)
            .map_err(|e| Error::decode(format!("Invalid JSON value: {e}")))?;
        let inferrer = self.inferrer(None, false)?;

        match inferrer.classify(name, &value, &mut LogSink) {
            Some(field) => Ok(serde_json::to_value(field)?),
            None => Ok(Value::Null),
        }
    }

    /// Feed every record from `files` (or stdin) to `f`
    fn for_each_record(
        files: &[PathBuf],
        mut f: impl FnMut(Map<String, Value>),
    ) -> Result<usize> {
        let mut count = 0;

        if files.is_empty() {
            for record in RecordReader::new(std::io::stdin().lock()) {
                f(record.context("stdin")?);
                count += 1;
            }
            return Ok(count);
        }

        for path in files {
            for record in RecordReader::open(path)? {
                f(record.with_context(|| path.display().to_string())?);
                count += 1;
            }
        }
        Ok(count)
    }

    /// Load all records into memory for parallel classification
    fn load_records(files: &[PathBuf]) -> Result<Vec<Map<String, Value>>> {
        if files.is_empty() {
            return read_records(std::io::stdin().lock()).context("stdin");
        }

        let mut records = Vec::new();
        for path in files {
            let reader = RecordReader::open(path)?;
            for record in reader {
                records.push(record.with_context(|| path.display().to_string())?);
            }
        }
        Ok(records)
    }

    /// Load a schema document
    fn load_schema(path: &Path) -> Result<Schema> {
        let file = open_file(path)?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid schema {}", path.display()))
    }

    /// Wrap the schema together with collected diagnostics when requested
    fn with_conflicts(schema: &Schema, conflicts: Option<Vec<Diagnostic>>) -> Result<Value> {
        let schema = serde_json::to_value(schema)?;
        Ok(match conflicts {
            Some(conflicts) => json!({
                "schema": schema,
                "conflicts": conflicts,
            }),
            None => schema,
        })
    }

    /// Print an output document in the selected format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
