//! CSV output backend.
//!
//! Creates the following files in the configured output directory:
//! - `energy_<load type>.csv`, one per load type, one column per ledger column
//! - `activations.csv`
//! - `totals.csv`
//!
//! All files use the configured delimiter.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use crate::writer::OutputWriter;
use crate::{ActivationRow, EnergyRow, LoadTypeColumns, OutputError, OutputResult, TotalRow};

/// Writes simulation output to CSV files.
pub struct CsvWriter {
    dir:         PathBuf,
    delimiter:   u8,
    energy:      BTreeMap<u16, Writer<File>>,
    activations: Writer<File>,
    totals:      Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Create the activation and totals files in `dir` and write their
    /// header rows.  Energy files are created as load types are announced.
    pub fn new(dir: &Path, delimiter: char) -> OutputResult<Self> {
        let delimiter = u8::try_from(delimiter).map_err(|_| OutputError::Delimiter(delimiter))?;
        let open = |name: &str| WriterBuilder::new().delimiter(delimiter).from_path(dir.join(name));

        let mut activations = open("activations.csv")?;
        activations.write_record([
            "household",
            "step",
            "unix_time_secs",
            "person",
            "affordance",
            "location",
            "duration_steps",
            "data_source",
        ])?;

        let mut totals = open("totals.csv")?;
        totals.write_record(["household", "load_type", "unit", "total"])?;

        Ok(Self {
            dir: dir.to_owned(),
            delimiter,
            energy: BTreeMap::new(),
            activations,
            totals,
            finished: false,
        })
    }

    /// File name used for the energy rows of a load type.
    pub fn energy_file_name(load_type_name: &str) -> String {
        let safe: String = load_type_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("energy_{safe}.csv")
    }
}

impl OutputWriter for CsvWriter {
    fn begin_load_type(&mut self, columns: &LoadTypeColumns) -> OutputResult<()> {
        let path = self.dir.join(Self::energy_file_name(&columns.name));
        let mut w = WriterBuilder::new().delimiter(self.delimiter).from_path(path)?;
        let mut header = vec!["household".to_owned(), "step".to_owned(), "unix_time_secs".to_owned()];
        header.extend(columns.headers.iter().cloned());
        w.write_record(&header)?;
        self.energy.insert(columns.load_type, w);
        Ok(())
    }

    fn write_energy(&mut self, row: &EnergyRow) -> OutputResult<()> {
        let w = self
            .energy
            .get_mut(&row.load_type)
            .ok_or(OutputError::UnknownLoadType(row.load_type))?;
        let mut record = Vec::with_capacity(row.values.len() + 3);
        record.push(row.household.to_string());
        record.push(row.external_step.to_string());
        record.push(row.unix_time_secs.to_string());
        record.extend(row.values.iter().map(f64::to_string));
        w.write_record(&record)?;
        Ok(())
    }

    fn write_activations(&mut self, rows: &[ActivationRow]) -> OutputResult<()> {
        for row in rows {
            self.activations.write_record(&[
                row.household.to_string(),
                row.step.to_string(),
                row.unix_time_secs.to_string(),
                row.person.clone(),
                row.affordance.clone(),
                row.location.clone(),
                row.duration_steps.to_string(),
                row.data_source.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_totals(&mut self, rows: &[TotalRow]) -> OutputResult<()> {
        for row in rows {
            self.totals.write_record(&[
                row.household.to_string(),
                row.load_type.clone(),
                row.unit_of_sum.clone(),
                row.total.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        for w in self.energy.values_mut() {
            w.flush()?;
        }
        self.activations.flush()?;
        self.totals.flush()?;
        Ok(())
    }
}
