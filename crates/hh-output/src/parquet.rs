//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `energy.parquet` (long format, one row per ledger column and step)
//! - `activations.parquet`
//! - `totals.parquet`

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, Int64Builder, StringBuilder, UInt16Builder, UInt32Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{ActivationRow, EnergyRow, LoadTypeColumns, OutputError, OutputResult, TotalRow};

fn energy_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("household",      DataType::UInt32,  false),
        Field::new("load_type",      DataType::UInt16,  false),
        Field::new("step",           DataType::Int64,   false),
        Field::new("unix_time_secs", DataType::Int64,   false),
        Field::new("column_name",    DataType::Utf8,    false),
        Field::new("value",          DataType::Float64, false),
    ]))
}

fn activation_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("household",      DataType::UInt32, false),
        Field::new("step",           DataType::UInt32, false),
        Field::new("unix_time_secs", DataType::Int64,  false),
        Field::new("person",         DataType::Utf8,   false),
        Field::new("affordance",     DataType::Utf8,   false),
        Field::new("location",       DataType::Utf8,   false),
        Field::new("duration_steps", DataType::UInt32, false),
        Field::new("data_source",    DataType::Utf8,   false),
    ]))
}

fn totals_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("household",   DataType::UInt32,  false),
        Field::new("load_type",   DataType::Utf8,    false),
        Field::new("unit_of_sum", DataType::Utf8,    false),
        Field::new("total",       DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// Writes simulation output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    energy:        Option<ArrowWriter<File>>,
    activations:   Option<ArrowWriter<File>>,
    totals:        Option<ArrowWriter<File>>,
    energy_schema: Arc<Schema>,
    act_schema:    Arc<Schema>,
    tot_schema:    Arc<Schema>,
    headers:       BTreeMap<u16, Vec<String>>,
}

impl ParquetWriter {
    /// Create all Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let energy_schema = energy_schema();
        let act_schema = activation_schema();
        let tot_schema = totals_schema();
        Ok(Self {
            energy: Some(open(dir, "energy.parquet", &energy_schema)?),
            activations: Some(open(dir, "activations.parquet", &act_schema)?),
            totals: Some(open(dir, "totals.parquet", &tot_schema)?),
            energy_schema,
            act_schema,
            tot_schema,
            headers: BTreeMap::new(),
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn begin_load_type(&mut self, columns: &LoadTypeColumns) -> OutputResult<()> {
        self.headers.insert(columns.load_type, columns.headers.clone());
        Ok(())
    }

    fn write_energy(&mut self, row: &EnergyRow) -> OutputResult<()> {
        let headers = self
            .headers
            .get(&row.load_type)
            .ok_or(OutputError::UnknownLoadType(row.load_type))?;
        let Some(writer) = self.energy.as_mut() else {
            return Ok(());
        };

        let mut households = UInt32Builder::new();
        let mut load_types = UInt16Builder::new();
        let mut steps      = Int64Builder::new();
        let mut unix_times = Int64Builder::new();
        let mut names      = StringBuilder::new();
        let mut values     = Float64Builder::new();

        for (header, value) in headers.iter().zip(&row.values) {
            households.append_value(row.household);
            load_types.append_value(row.load_type);
            steps.append_value(row.external_step);
            unix_times.append_value(row.unix_time_secs);
            names.append_value(header);
            values.append_value(*value);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.energy_schema),
            vec![
                Arc::new(households.finish()),
                Arc::new(load_types.finish()),
                Arc::new(steps.finish()),
                Arc::new(unix_times.finish()),
                Arc::new(names.finish()),
                Arc::new(values.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_activations(&mut self, rows: &[ActivationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.activations.as_mut() else {
            return Ok(());
        };

        let mut households  = UInt32Builder::new();
        let mut steps       = UInt32Builder::new();
        let mut unix_times  = Int64Builder::new();
        let mut persons     = StringBuilder::new();
        let mut affordances = StringBuilder::new();
        let mut locations   = StringBuilder::new();
        let mut durations   = UInt32Builder::new();
        let mut sources     = StringBuilder::new();

        for row in rows {
            households.append_value(row.household);
            steps.append_value(row.step);
            unix_times.append_value(row.unix_time_secs);
            persons.append_value(&row.person);
            affordances.append_value(&row.affordance);
            locations.append_value(&row.location);
            durations.append_value(row.duration_steps);
            sources.append_value(&row.data_source);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.act_schema),
            vec![
                Arc::new(households.finish()),
                Arc::new(steps.finish()),
                Arc::new(unix_times.finish()),
                Arc::new(persons.finish()),
                Arc::new(affordances.finish()),
                Arc::new(locations.finish()),
                Arc::new(durations.finish()),
                Arc::new(sources.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_totals(&mut self, rows: &[TotalRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.totals.as_mut() else {
            return Ok(());
        };

        let mut households = UInt32Builder::new();
        let mut names      = StringBuilder::new();
        let mut units      = StringBuilder::new();
        let mut totals     = Float64Builder::new();

        for row in rows {
            households.append_value(row.household);
            names.append_value(&row.load_type);
            units.append_value(&row.unit_of_sum);
            totals.append_value(row.total);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.tot_schema),
            vec![
                Arc::new(households.finish()),
                Arc::new(names.finish()),
                Arc::new(units.finish()),
                Arc::new(totals.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.energy.take() {
            w.close()?;
        }
        if let Some(w) = self.activations.take() {
            w.close()?;
        }
        if let Some(w) = self.totals.take() {
            w.close()?;
        }
        Ok(())
    }
}
