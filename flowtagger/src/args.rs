use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// Load the run configuration from a TOML file instead of the flags below
    #[clap(short, long)]
    pub config_file: Option<String>,

    /// Input files
    #[clap(flatten)]
    pub input: InputConfig,

    /// Flow-log field positions
    #[clap(flatten)]
    pub layout: FieldLayout,

    /// Output method
    #[clap(flatten)]
    pub output: OutputConfig,
}

/// The on-disk form of a run configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub input: InputConfig,
    pub layout: FieldLayout,
    pub output: OutputConfig,
}

impl From<Cli> for ConfigFile {
    fn from(cli: Cli) -> Self {
        ConfigFile {
            input: cli.input,
            layout: cli.layout,
            output: cli.output,
        }
    }
}

#[derive(Args, Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct InputConfig {
    /// The lookup table mapping port/protocol pairs to tags
    #[clap(long, default_value = "./lookup.csv")]
    pub lookup: String,

    /// The flow log to classify
    #[clap(long, default_value = "./flowlog.txt")]
    pub flow_log: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            lookup: String::from("./lookup.csv"),
            flow_log: String::from("./flowlog.txt"),
        }
    }
}

/// Positions of the fields read from each space-delimited flow-log line.
#[derive(Args, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FieldLayout {
    /// Zero-based position of the destination port
    #[clap(long, default_value_t = 5)]
    pub port_field: usize,

    /// Zero-based position of the protocol number
    #[clap(long, default_value_t = 7)]
    pub protocol_field: usize,

    /// Lines with fewer fields are skipped
    #[clap(long, default_value_t = 13)]
    pub min_fields: usize,
}

impl Default for FieldLayout {
    fn default() -> Self {
        FieldLayout {
            port_field: 5,
            protocol_field: 7,
            min_fields: 13,
        }
    }
}

#[derive(Args, Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Output method
    #[clap(short, long, value_enum, default_value_t = ExportMethodType::File)]
    pub output: ExportMethodType,

    /// File path for output (used if method is File)
    #[clap(default_value = "./output.txt")]
    pub export_path: String,

    /// Order of the lines within each report section
    #[clap(long, value_enum, default_value_t = ReportOrder::Insertion)]
    pub order: ReportOrder,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            output: ExportMethodType::File,
            export_path: String::from("./output.txt"),
            order: ReportOrder::Insertion,
        }
    }
}

#[derive(clap::ValueEnum, Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportMethodType {
    /// The report will be printed to the console
    Print,

    /// The report will be written to a file
    File,
}

#[derive(clap::ValueEnum, Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportOrder {
    /// Lines appear in the order their tag or key was first seen
    Insertion,

    /// Highest count first, ties broken alphabetically
    Count,

    /// Alphabetical by tag or key
    Key,
}
