use std::{
    fs::File,
    io::{BufWriter, Write},
};

use crate::{
    args::{ExportMethodType, OutputConfig, ReportOrder},
    classifier::Tallies,
    error::TaggerError,
    report::write_report,
};
use log::debug;

pub struct OutputWriter {
    order: ReportOrder,
    writer: BufWriter<Box<dyn Write + Send>>,
}

impl OutputWriter {
    pub fn new(config: &OutputConfig) -> Result<Self, TaggerError> {
        let writer: Box<dyn Write + Send> = match config.output {
            ExportMethodType::File => {
                let file = File::create(&config.export_path)
                    .map_err(|e| TaggerError::path(&config.export_path, e))?;
                Box::new(file)
            }
            ExportMethodType::Print => Box::new(std::io::stdout()),
        };
        Ok(Self::from_writer(writer, config.order))
    }

    pub fn from_writer(writer: Box<dyn Write + Send>, order: ReportOrder) -> Self {
        OutputWriter {
            order,
            writer: BufWriter::new(writer),
        }
    }

    pub fn write_tallies(&mut self, tallies: &Tallies) -> Result<(), TaggerError> {
        debug!("Writing report ({} order)", self.order);
        write_report(&mut self.writer, tallies, self.order)?;
        self.flush_and_close()
    }

    /// Flushes the buffered report to the sink.
    pub fn flush_and_close(&mut self) -> Result<(), TaggerError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the report to the sink named by `config`.
pub fn export_report(config: &OutputConfig, tallies: &Tallies) -> Result<(), TaggerError> {
    debug!("Exporting report via {}", config.output);
    OutputWriter::new(config)?.write_tallies(tallies)
}
